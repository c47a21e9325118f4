//! # Error Types
//!
//! The three failure classes every engine operation can produce:
//!
//! | Error | Raised when |
//! |-------|-------------|
//! | [`ContractConfigurationError`] | Coin key malformed, signing key missing, operation absent from state |
//! | [`ContractRuntimeError`] | Contract construction or circuit execution failed, transcript partition count wrong |
//! | [`ZkConfigurationReadError`] | A verifier key could not be read |

use shared_types::ContractState;
use std::fmt;
use thiserror::Error;

/// A boxed, thread-safe error used as a cause.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// The engine was configured incorrectly for the requested operation.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ContractConfigurationError {
    /// Human-readable description.
    pub message: String,
    /// The contract state at the point of failure, when one existed.
    pub contract_state: Option<Box<ContractState>>,
    /// Underlying cause.
    #[source]
    pub cause: Option<BoxError>,
}

impl ContractConfigurationError {
    /// A configuration error with no state and no cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            contract_state: None,
            cause: None,
        }
    }

    /// Attach the contract state for diagnostics.
    #[must_use]
    pub fn with_state(mut self, contract_state: ContractState) -> Self {
        self.contract_state = Some(Box::new(contract_state));
        self
    }

    /// Attach an underlying cause.
    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<BoxError>) -> Self {
        self.cause = Some(cause.into());
        self
    }
}

// =============================================================================
// RUNTIME
// =============================================================================

/// Contract code failed while constructing or executing.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ContractRuntimeError {
    /// Human-readable description.
    pub message: String,
    /// Underlying cause.
    #[source]
    pub cause: Option<BoxError>,
}

impl ContractRuntimeError {
    /// A runtime error with no cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    /// A runtime error wrapping `cause`.
    pub fn with_cause(message: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            cause: Some(cause.into()),
        }
    }
}

// =============================================================================
// ZK CONFIGURATION READS
// =============================================================================

/// Kind of zero-knowledge asset being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZkAsset {
    /// A circuit verifier key.
    VerifierKey,
}

impl fmt::Display for ZkAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZkAsset::VerifierKey => f.write_str("verifier key"),
        }
    }
}

/// A zero-knowledge asset could not be read.
#[derive(Debug, Error)]
#[error("Failed to read {asset} for circuit '{circuit_id}' of contract '{contract_tag}'")]
pub struct ZkConfigurationReadError {
    /// Tag of the contract.
    pub contract_tag: String,
    /// Circuit whose asset was requested.
    pub circuit_id: String,
    /// Asset kind.
    pub asset: ZkAsset,
    /// Underlying cause.
    #[source]
    pub cause: BoxError,
}

impl ZkConfigurationReadError {
    /// Whether the asset simply does not exist.
    pub fn is_not_found(&self) -> bool {
        self.cause
            .downcast_ref::<std::io::Error>()
            .is_some_and(|err| err.kind() == std::io::ErrorKind::NotFound)
    }
}

// =============================================================================
// UNION
// =============================================================================

/// Any failure of an engine operation.
#[derive(Debug, Error)]
pub enum ContractExecutionError {
    /// Configuration failure.
    #[error(transparent)]
    Configuration(#[from] ContractConfigurationError),

    /// Construction or execution failure.
    #[error(transparent)]
    Runtime(#[from] ContractRuntimeError),

    /// Asset read failure.
    #[error(transparent)]
    Read(#[from] ZkConfigurationReadError),
}

impl ContractExecutionError {
    /// Short label of the failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            ContractExecutionError::Configuration(_) => "ContractConfigurationError",
            ContractExecutionError::Runtime(_) => "ContractRuntimeError",
            ContractExecutionError::Read(_) => "ZKConfigurationReadError",
        }
    }
}
