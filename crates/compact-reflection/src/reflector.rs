//! # Contract Reflection
//!
//! Loads a compiled contract's manifest and hands back an [`ArgumentParser`]
//! bound to its constructor and circuit signatures.

use crate::coercion::coerce;
use crate::errors::ReflectionError;
use crate::manifest::{ContractManifest, CONTRACT_FOLDER, MANIFEST_FILE, MANIFEST_VERSION};
use async_trait::async_trait;
use compact_executable::domain::{CompiledContract, Contract, Value};
use compact_executable::ContractRuntimeError;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Parses textual arguments for one contract.
#[derive(Debug, Clone)]
pub struct ArgumentParser {
    contract_tag: String,
    manifest: ContractManifest,
}

impl ArgumentParser {
    /// A parser over `manifest`.
    pub fn new(contract_tag: impl Into<String>, manifest: ContractManifest) -> Self {
        Self {
            contract_tag: contract_tag.into(),
            manifest,
        }
    }

    /// The manifest this parser reads signatures from.
    pub fn manifest(&self) -> &ContractManifest {
        &self.manifest
    }

    /// Coerce constructor arguments.
    pub fn parse_initialization_args<S: AsRef<str>>(
        &self,
        args: &[S],
    ) -> Result<Vec<Value>, ContractRuntimeError> {
        Ok(coerce(args, &self.manifest.constructor_types())?)
    }

    /// Coerce arguments of `circuit_id`.
    pub fn parse_circuit_args<S: AsRef<str>>(
        &self,
        circuit_id: &str,
        args: &[S],
    ) -> Result<Vec<Value>, ContractRuntimeError> {
        let types = self.manifest.circuit_types(circuit_id).ok_or_else(|| {
            ContractRuntimeError::new(format!(
                "Circuit '{circuit_id}' not found in the manifest of contract '{}'.",
                self.contract_tag
            ))
        })?;
        Ok(coerce(args, &types)?)
    }
}

/// Creates argument parsers for compiled contracts.
#[async_trait]
pub trait ContractReflection: Send + Sync {
    /// Build a parser from `compiled_contract`'s manifest.
    async fn create_argument_parser<C: Contract>(
        &self,
        compiled_contract: &CompiledContract<C>,
    ) -> Result<ArgumentParser, ReflectionError>;
}

/// Reads manifests from `{base}/{compiled assets}/contract/manifest.json`.
#[derive(Debug, Clone)]
pub struct FileContractReflection {
    base_path: PathBuf,
}

impl FileContractReflection {
    /// Resolve compiled assets relative to `base_path`.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Where the manifest of assets at `compiled_assets_path` lives.
    pub fn manifest_path(&self, compiled_assets_path: &Path) -> PathBuf {
        self.base_path
            .join(compiled_assets_path)
            .join(CONTRACT_FOLDER)
            .join(MANIFEST_FILE)
    }

    async fn load_manifest(&self, path: PathBuf) -> Result<ContractManifest, ReflectionError> {
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(source) => return Err(ReflectionError::Io { path, source }),
        };
        let manifest: ContractManifest = match serde_json::from_str(&text) {
            Ok(manifest) => manifest,
            Err(source) => return Err(ReflectionError::Malformed { path, source }),
        };
        if manifest.version != MANIFEST_VERSION {
            return Err(ReflectionError::UnsupportedVersion {
                path,
                found: manifest.version,
            });
        }
        debug!(
            path = %path.display(),
            constructor_params = manifest.constructor.len(),
            circuits = manifest.circuits.len(),
            "Loaded contract manifest"
        );
        Ok(manifest)
    }
}

#[async_trait]
impl ContractReflection for FileContractReflection {
    #[instrument(skip_all, fields(contract = %compiled_contract.tag()))]
    async fn create_argument_parser<C: Contract>(
        &self,
        compiled_contract: &CompiledContract<C>,
    ) -> Result<ArgumentParser, ReflectionError> {
        let tag = compiled_contract.tag().to_string();
        let assets = compiled_contract
            .compiled_assets_path()
            .ok_or_else(|| ReflectionError::UnresolvedAssets(tag.clone()))?;
        let manifest = self.load_manifest(self.manifest_path(assets)).await?;
        Ok(ArgumentParser::new(tag, manifest))
    }
}
