//! # Ledger State Codec
//!
//! Byte-level round trip between [`ContractState`] and its wire format.
//! Callers treat the bytes as opaque.

use crate::entities::ContractState;
use crate::errors::LedgerError;

/// Serializes and deserializes contract state.
pub trait LedgerStateCodec: Send + Sync {
    /// Encode a state.
    fn serialize(&self, state: &ContractState) -> Result<Vec<u8>, LedgerError>;

    /// Decode a state.
    fn deserialize(&self, bytes: &[u8]) -> Result<ContractState, LedgerError>;
}

/// Version byte leading every encoded state.
const STATE_FORMAT_VERSION: u8 = 1;

/// Bincode codec with a one-byte format version.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeLedgerCodec;

impl LedgerStateCodec for BincodeLedgerCodec {
    fn serialize(&self, state: &ContractState) -> Result<Vec<u8>, LedgerError> {
        let body =
            bincode::serialize(state).map_err(|err| LedgerError::Serialization(err.to_string()))?;
        let mut bytes = Vec::with_capacity(body.len() + 1);
        bytes.push(STATE_FORMAT_VERSION);
        bytes.extend_from_slice(&body);
        Ok(bytes)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<ContractState, LedgerError> {
        match bytes.split_first() {
            Some((&STATE_FORMAT_VERSION, body)) => bincode::deserialize(body)
                .map_err(|err| LedgerError::Deserialization(err.to_string())),
            Some((version, _)) => Err(LedgerError::Deserialization(format!(
                "unsupported state format version {version}"
            ))),
            None => Err(LedgerError::Deserialization("empty input".to_string())),
        }
    }
}
