//! Reading and writing command inputs and outputs.
//!
//! Contract state travels as ledger-encoded bytes, intents as their binary
//! encoding, everything else as JSON.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::{BincodeLedgerCodec, ContractState, Intent, LedgerStateCodec};
use std::path::Path;
use tokio::fs;

/// Validity window of intents written by commands.
pub const INTENT_TTL_MINUTES: i64 = 10;

/// An empty intent expiring [`INTENT_TTL_MINUTES`] from now.
pub fn new_intent() -> Intent {
    Intent::new(Utc::now() + Duration::minutes(INTENT_TTL_MINUTES))
}

/// Read raw bytes.
pub async fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path)
        .await
        .with_context(|| format!("Failed to read '{}'", path.display()))
}

async fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes)
        .await
        .with_context(|| format!("Failed to write '{}'", path.display()))
}

/// Write plain text.
pub async fn write_text(path: &Path, text: &str) -> Result<()> {
    write_bytes(path, text.as_bytes()).await
}

/// Read ledger-encoded contract state.
pub async fn read_contract_state(path: &Path) -> Result<ContractState> {
    let bytes = read_bytes(path).await?;
    BincodeLedgerCodec
        .deserialize(&bytes)
        .context("Unexpected error deserializing ledger contract state from bytes")
}

/// Write contract state in its ledger encoding.
pub async fn write_contract_state(path: &Path, state: &ContractState) -> Result<()> {
    let bytes = BincodeLedgerCodec
        .serialize(state)
        .context("Unexpected error converting runtime contract state")?;
    write_bytes(path, &bytes).await
}

/// Write an intent in its binary encoding.
pub async fn write_intent(path: &Path, intent: &Intent) -> Result<()> {
    let bytes = intent.to_bytes().context("Failed to encode intent")?;
    write_bytes(path, &bytes).await
}

/// Read a JSON document.
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = read_bytes(path).await?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("Malformed JSON in '{}'", path.display()))
}

/// Write a compact JSON document.
pub async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec(value).context("Failed to encode JSON")?;
    write_bytes(path, &bytes).await
}
