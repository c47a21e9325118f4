//! # Driven Ports (SPI - Outbound)
//!
//! Collaborators the engine depends on:
//! - Verifier key storage
//! - Signing / coin key configuration
//! - Transcript partitioning

use crate::domain::{ImpureCircuitId, VerifierKey};
use crate::errors::{ContractConfigurationError, ZkConfigurationReadError};
use async_trait::async_trait;
use shared_types::{LedgerError, LedgerParameters, PartitionedTranscript, PreTranscript, SigningKey};
use std::path::Path;

// =============================================================================
// VERIFIER KEYS
// =============================================================================

/// Reads verifier keys for one contract.
#[async_trait]
pub trait ZkConfigurationReader: Send + Sync {
    /// Read one circuit's verifier key. Absence is an error.
    async fn get_verifier_key(
        &self,
        circuit_id: &str,
    ) -> Result<VerifierKey, ZkConfigurationReadError>;

    /// Read many verifier keys at once.
    ///
    /// A circuit without a key maps to `None`. Any other failure fails the
    /// whole batch. Order of the result is not significant.
    async fn get_verifier_keys(
        &self,
        circuit_ids: &[ImpureCircuitId],
    ) -> Result<Vec<(ImpureCircuitId, Option<VerifierKey>)>, ZkConfigurationReadError>;
}

/// Creates verifier key readers bound to a contract.
#[async_trait]
pub trait ZkConfiguration: Send + Sync {
    /// Reader type.
    type Reader: ZkConfigurationReader;

    /// Create a reader for the contract tagged `contract_tag` whose assets
    /// live under `compiled_assets_path`.
    async fn create_reader(
        &self,
        contract_tag: &str,
        compiled_assets_path: &Path,
    ) -> Result<Self::Reader, ZkConfigurationReadError>;
}

// =============================================================================
// KEYS
// =============================================================================

/// The caller's keys.
#[derive(Debug, Clone)]
pub struct Keys {
    /// Coin public key, as configured (hex, `0x` hex or Bech32m).
    pub coin_public_key: String,
    /// Signing key for maintenance operations.
    pub signing_key: Option<SigningKey>,
}

/// Supplies the caller's keys.
#[async_trait]
pub trait KeyConfiguration: Send + Sync {
    /// Current keys.
    async fn keys(&self) -> Result<Keys, ContractConfigurationError>;
}

// =============================================================================
// TRANSCRIPT PARTITIONING
// =============================================================================

/// Splits recorded programs into guaranteed and fallible segments.
pub trait TranscriptPartitioner: Send + Sync {
    /// One pair per input program.
    fn partition(
        &self,
        pre_transcripts: &[PreTranscript],
        parameters: &LedgerParameters,
    ) -> Result<Vec<PartitionedTranscript>, LedgerError>;
}
