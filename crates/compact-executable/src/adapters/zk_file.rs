//! # File-Backed Verifier Keys
//!
//! Resolves `{base}/{compiled-assets-path}/keys/{circuit}.verifier`.
//!
//! Batch reads fan out one `tokio::fs` read per circuit and rejoin by
//! circuit id. A missing file means the circuit has no verifier key; any
//! other I/O failure fails the whole batch.

use crate::domain::{ImpureCircuitId, VerifierKey};
use crate::errors::{ZkAsset, ZkConfigurationReadError};
use crate::ports::outbound::{ZkConfiguration, ZkConfigurationReader};
use async_trait::async_trait;
use futures::future::try_join_all;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Directory under the compiled assets that holds keys.
pub const KEYS_DIRECTORY: &str = "keys";

/// File extension of verifier keys.
pub const VERIFIER_KEY_EXTENSION: &str = "verifier";

/// Creates [`FileZkConfigurationReader`]s rooted at a base directory.
#[derive(Debug, Clone)]
pub struct FileZkConfiguration {
    base_path: PathBuf,
}

impl FileZkConfiguration {
    /// Root readers at `base_path`.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

#[async_trait]
impl ZkConfiguration for FileZkConfiguration {
    type Reader = FileZkConfigurationReader;

    async fn create_reader(
        &self,
        contract_tag: &str,
        compiled_assets_path: &Path,
    ) -> Result<Self::Reader, ZkConfigurationReadError> {
        Ok(FileZkConfigurationReader {
            contract_tag: contract_tag.to_string(),
            keys_path: self
                .base_path
                .join(compiled_assets_path)
                .join(KEYS_DIRECTORY),
        })
    }
}

/// Reads verifier keys for one contract from disk.
#[derive(Debug, Clone)]
pub struct FileZkConfigurationReader {
    contract_tag: String,
    keys_path: PathBuf,
}

impl FileZkConfigurationReader {
    fn verifier_key_path(&self, circuit_id: &str) -> PathBuf {
        self.keys_path
            .join(format!("{circuit_id}.{VERIFIER_KEY_EXTENSION}"))
    }

    async fn read(&self, circuit_id: &str) -> io::Result<VerifierKey> {
        tokio::fs::read(self.verifier_key_path(circuit_id))
            .await
            .map(VerifierKey::new)
    }

    fn read_error(&self, circuit_id: &str, err: io::Error) -> ZkConfigurationReadError {
        ZkConfigurationReadError {
            contract_tag: self.contract_tag.clone(),
            circuit_id: circuit_id.to_string(),
            asset: ZkAsset::VerifierKey,
            cause: Box::new(err),
        }
    }
}

#[async_trait]
impl ZkConfigurationReader for FileZkConfigurationReader {
    async fn get_verifier_key(
        &self,
        circuit_id: &str,
    ) -> Result<VerifierKey, ZkConfigurationReadError> {
        self.read(circuit_id)
            .await
            .map_err(|err| self.read_error(circuit_id, err))
    }

    #[instrument(skip_all, fields(circuits = circuit_ids.len()))]
    async fn get_verifier_keys(
        &self,
        circuit_ids: &[ImpureCircuitId],
    ) -> Result<Vec<(ImpureCircuitId, Option<VerifierKey>)>, ZkConfigurationReadError> {
        let reads = circuit_ids.iter().map(|circuit_id| async move {
            match self.read(circuit_id).await {
                Ok(key) => Ok((circuit_id.clone(), Some(key))),
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    Ok((circuit_id.clone(), None))
                }
                Err(err) => Err(self.read_error(circuit_id, err)),
            }
        });
        let keys = try_join_all(reads).await?;
        debug!(
            contract = %self.contract_tag,
            found = keys.iter().filter(|(_, key)| key.is_some()).count(),
            "Read verifier keys"
        );
        Ok(keys)
    }
}
