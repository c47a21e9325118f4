//! # Error Types
//!
//! Errors raised by the ledger data model.

use shared_crypto::CryptoError;
use thiserror::Error;

/// Errors that can occur while building, transforming or replaying ledger values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// A value could not be encoded.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Bytes could not be decoded into a ledger value.
    #[error("Deserialization failed: {0}")]
    Deserialization(String),

    /// Hex input is malformed.
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// A Bech32m network address is malformed or of the wrong kind.
    #[error("Invalid network address: {0}")]
    InvalidAddress(String),

    /// A fixed-size value had the wrong number of bytes.
    #[error("Invalid {what} length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// What was being decoded.
        what: &'static str,
        /// Required byte length.
        expected: usize,
        /// Received byte length.
        actual: usize,
    },

    /// The named operation does not exist on the contract.
    #[error("Unknown contract operation: {0}")]
    UnknownOperation(String),

    /// Maintenance authority threshold is outside `1..=committee`.
    #[error("Invalid maintenance threshold {threshold} for committee of {committee}")]
    InvalidThreshold {
        /// Requested threshold.
        threshold: u32,
        /// Committee size.
        committee: usize,
    },

    /// A maintenance update targets a different counter than the authority holds.
    #[error("Maintenance counter mismatch: authority at {expected}, update bound to {actual}")]
    CounterMismatch {
        /// Counter currently held by the authority.
        expected: u64,
        /// Counter carried by the update.
        actual: u64,
    },

    /// Not enough valid committee signatures.
    #[error("Insufficient signatures: {valid} valid, {required} required")]
    InsufficientSignatures {
        /// Threshold of the authority.
        required: u32,
        /// Valid signatures found.
        valid: u32,
    },

    /// A maintenance update was addressed to another contract.
    #[error("Maintenance update addressed to {actual}, expected {expected}")]
    AddressMismatch {
        /// Address of the contract being updated.
        expected: String,
        /// Address carried by the update.
        actual: String,
    },

    /// A `Popeq` saw a value different from what was read.
    #[error("Transcript mismatch at op {index}: expected {expected}, got {actual}")]
    TranscriptMismatch {
        /// Position of the failing op.
        index: usize,
        /// Value recorded in the transcript.
        expected: String,
        /// Value produced by replay.
        actual: String,
    },

    /// A `Popeq` with no preceding `Read`.
    #[error("Transcript op {index} pops a result but nothing was read")]
    EmptyStack {
        /// Position of the failing op.
        index: usize,
    },

    /// The state being queried is not a map.
    #[error("Contract state is not a map")]
    NotAMap,

    /// The value at a key is not a cell.
    #[error("Value at key {0} is not a cell")]
    NotACell(String),

    /// An increment overflowed the counter cell.
    #[error("Counter overflow at key {0}")]
    Overflow(String),

    /// Cryptographic failure.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}
