//! In-memory verifier key store, for tests and embedded use.

use crate::domain::{ImpureCircuitId, VerifierKey};
use crate::errors::{ZkAsset, ZkConfigurationReadError};
use crate::ports::outbound::{ZkConfiguration, ZkConfigurationReader};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::sync::Arc;

/// Verifier keys held in memory, keyed by circuit id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryZkConfiguration {
    keys: Arc<HashMap<String, VerifierKey>>,
}

impl InMemoryZkConfiguration {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key.
    #[must_use]
    pub fn with_key(self, circuit_id: impl Into<String>, key: VerifierKey) -> Self {
        let mut keys = Arc::unwrap_or_clone(self.keys);
        keys.insert(circuit_id.into(), key);
        Self {
            keys: Arc::new(keys),
        }
    }
}

#[async_trait]
impl ZkConfiguration for InMemoryZkConfiguration {
    type Reader = InMemoryZkConfigurationReader;

    async fn create_reader(
        &self,
        contract_tag: &str,
        _compiled_assets_path: &Path,
    ) -> Result<Self::Reader, ZkConfigurationReadError> {
        Ok(InMemoryZkConfigurationReader {
            contract_tag: contract_tag.to_string(),
            keys: Arc::clone(&self.keys),
        })
    }
}

/// Reader over an [`InMemoryZkConfiguration`].
#[derive(Debug, Clone)]
pub struct InMemoryZkConfigurationReader {
    contract_tag: String,
    keys: Arc<HashMap<String, VerifierKey>>,
}

#[async_trait]
impl ZkConfigurationReader for InMemoryZkConfigurationReader {
    async fn get_verifier_key(
        &self,
        circuit_id: &str,
    ) -> Result<VerifierKey, ZkConfigurationReadError> {
        self.keys
            .get(circuit_id)
            .cloned()
            .ok_or_else(|| ZkConfigurationReadError {
                contract_tag: self.contract_tag.clone(),
                circuit_id: circuit_id.to_string(),
                asset: ZkAsset::VerifierKey,
                cause: Box::new(io::Error::from(io::ErrorKind::NotFound)),
            })
    }

    async fn get_verifier_keys(
        &self,
        circuit_ids: &[ImpureCircuitId],
    ) -> Result<Vec<(ImpureCircuitId, Option<VerifierKey>)>, ZkConfigurationReadError> {
        Ok(circuit_ids
            .iter()
            .map(|id| (id.clone(), self.keys.get(id).cloned()))
            .collect())
    }
}
