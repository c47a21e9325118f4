//! # Compiled Contracts
//!
//! A contract's tag, constructor, witnesses and the location of its compiled
//! assets. Built once with [`CompiledContract::make`] and the `with_*`
//! combinators, then shared by every call.

use super::contract::{Contract, Witnesses};
use super::runtime::CompactError;
use crate::errors::ContractRuntimeError;
use std::fmt;
use std::path::{Path, PathBuf};

/// Constructor of a contract instance from its witnesses.
pub type ContractConstructor<C> =
    fn(Witnesses<<C as Contract>::PrivateState>) -> Result<C, CompactError>;

/// A compiled contract, ready to be made executable.
pub struct CompiledContract<C: Contract> {
    tag: String,
    constructor: ContractConstructor<C>,
    witnesses: Option<Witnesses<C::PrivateState>>,
    compiled_assets_path: Option<PathBuf>,
}

impl<C: Contract> CompiledContract<C> {
    /// A compiled contract with no witnesses or assets resolved yet.
    pub fn make(tag: impl Into<String>, constructor: ContractConstructor<C>) -> Self {
        Self {
            tag: tag.into(),
            constructor,
            witnesses: None,
            compiled_assets_path: None,
        }
    }

    /// Resolve the witnesses.
    #[must_use]
    pub fn with_witnesses(mut self, witnesses: Witnesses<C::PrivateState>) -> Self {
        self.witnesses = Some(witnesses);
        self
    }

    /// Resolve to no witnesses.
    #[must_use]
    pub fn with_vacant_witnesses(self) -> Self {
        self.with_witnesses(Witnesses::new())
    }

    /// Resolve the compiled assets directory (relative to the assets base).
    #[must_use]
    pub fn with_compiled_file_assets(mut self, path: impl Into<PathBuf>) -> Self {
        self.compiled_assets_path = Some(path.into());
        self
    }

    /// Contract tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Compiled assets directory, once resolved.
    pub fn compiled_assets_path(&self) -> Option<&Path> {
        self.compiled_assets_path.as_deref()
    }

    /// Construct a contract instance.
    pub fn create_contract(&self) -> Result<C, ContractRuntimeError> {
        let witnesses = self.witnesses.clone().ok_or_else(|| {
            ContractRuntimeError::new(format!("Witnesses for contract '{}' are not resolved", self.tag))
        })?;
        if self.compiled_assets_path.is_none() {
            return Err(ContractRuntimeError::new(format!(
                "Compiled assets for contract '{}' are not resolved",
                self.tag
            )));
        }
        (self.constructor)(witnesses).map_err(|err| {
            ContractRuntimeError::with_cause(
                format!("Failed to construct contract '{}'", self.tag),
                err,
            )
        })
    }
}

impl<C: Contract> fmt::Debug for CompiledContract<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledContract")
            .field("tag", &self.tag)
            .field("witnesses", &self.witnesses)
            .field("compiled_assets_path", &self.compiled_assets_path)
            .finish()
    }
}
