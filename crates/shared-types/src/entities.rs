//! # Core Ledger Entities
//!
//! Addresses, keys, state values and the contract state record.
//!
//! Every transformation on [`ContractState`] takes `self` by value and
//! returns the new state; nothing in this module mutates a state that
//! another caller can observe.

use crate::address::{NetworkAddress, COIN_PUBLIC_KEY_KIND};
use crate::errors::LedgerError;
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use shared_crypto::{blake3_derive_key, VerifyingKey};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Decode plain or `0x`-prefixed hex into exactly `N` bytes.
pub(crate) fn decode_fixed_hex<const N: usize>(
    what: &'static str,
    encoded: &str,
) -> Result<[u8; N], LedgerError> {
    let digits = encoded.strip_prefix("0x").unwrap_or(encoded);
    let bytes = hex::decode(digits).map_err(|err| LedgerError::InvalidHex(err.to_string()))?;
    let actual = bytes.len();
    <[u8; N]>::try_from(bytes).map_err(|_| LedgerError::InvalidLength {
        what,
        expected: N,
        actual,
    })
}

// =============================================================================
// ADDRESSES AND KEYS
// =============================================================================

/// A deployed contract's 32-byte address.
#[serde_as]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContractAddress(#[serde_as(as = "Hex")] [u8; 32]);

impl ContractAddress {
    /// Wrap raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive an address from deployment material.
    pub fn derive(seed: &[u8]) -> Self {
        Self(blake3_derive_key("compact contract address v1", seed))
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl FromStr for ContractAddress {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed_hex("contract address", s).map(Self)
    }
}

impl fmt::Display for ContractAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for ContractAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContractAddress({})", hex::encode(self.0))
    }
}

/// A shielded coin public key.
///
/// Accepts plain hex, `0x`-prefixed hex or a Bech32m `mn_shield-cpk` address.
#[serde_as]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CoinPublicKey(#[serde_as(as = "Hex")] [u8; 32]);

impl CoinPublicKey {
    /// Wrap raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Plain hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Bech32m rendering for `network` (`None` is mainnet).
    pub fn to_bech32m(&self, network: Option<&str>) -> Result<String, LedgerError> {
        NetworkAddress::new(
            COIN_PUBLIC_KEY_KIND,
            network.map(str::to_string),
            self.0.to_vec(),
        )
        .encode()
    }
}

impl FromStr for CoinPublicKey {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("mn_") {
            return NetworkAddress::parse(s)?
                .into_fixed(COIN_PUBLIC_KEY_KIND)
                .map(Self);
        }
        decode_fixed_hex("coin public key", s).map(Self)
    }
}

impl fmt::Display for CoinPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for CoinPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CoinPublicKey({})", self.to_hex())
    }
}

/// Zero-knowledge verifier key bytes bound to one circuit.
#[serde_as]
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierKey(#[serde_as(as = "Hex")] Vec<u8>);

impl VerifierKey {
    /// Wrap raw key bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Short fingerprint for logs.
    pub fn fingerprint(&self) -> String {
        hex::encode(&shared_crypto::blake3_hash(&self.0)[..8])
    }
}

impl fmt::Debug for VerifierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VerifierKey({} bytes, {})", self.0.len(), self.fingerprint())
    }
}

// =============================================================================
// STATE VALUES
// =============================================================================

/// A field-aligned binary value: the unit of keys and cells in contract state.
#[serde_as]
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct AlignedValue(#[serde_as(as = "Hex")] Vec<u8>);

impl AlignedValue {
    /// Wrap raw bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Encode an unsigned integer (little-endian, 8 bytes).
    pub fn from_u64(value: u64) -> Self {
        Self(value.to_le_bytes().to_vec())
    }

    /// Decode an unsigned integer; `None` unless exactly 8 bytes.
    pub fn to_u64(&self) -> Option<u64> {
        <[u8; 8]>::try_from(self.0.as_slice())
            .ok()
            .map(u64::from_le_bytes)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for AlignedValue {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

impl fmt::Display for AlignedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

impl fmt::Debug for AlignedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AlignedValue(0x{})", hex::encode(&self.0))
    }
}

/// A node in the contract's public state tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StateValue {
    /// Absent value.
    #[default]
    Null,
    /// A single aligned value.
    Cell(AlignedValue),
    /// Keyed children.
    Map(BTreeMap<AlignedValue, StateValue>),
    /// Positional children.
    Array(Vec<StateValue>),
}

impl StateValue {
    /// An empty map.
    pub fn empty_map() -> Self {
        StateValue::Map(BTreeMap::new())
    }

    /// Look up a key in a map node.
    pub fn get(&self, key: &AlignedValue) -> Option<&StateValue> {
        match self {
            StateValue::Map(entries) => entries.get(key),
            _ => None,
        }
    }

    /// The cell payload, if this node is a cell.
    pub fn as_cell(&self) -> Option<&AlignedValue> {
        match self {
            StateValue::Cell(value) => Some(value),
            _ => None,
        }
    }

    /// Mutable access to the entries of a map node. `Null` becomes an empty map.
    pub(crate) fn map_mut(&mut self) -> Result<&mut BTreeMap<AlignedValue, StateValue>, LedgerError> {
        if matches!(self, StateValue::Null) {
            *self = StateValue::empty_map();
        }
        match self {
            StateValue::Map(entries) => Ok(entries),
            _ => Err(LedgerError::NotAMap),
        }
    }
}

// =============================================================================
// CONTRACT STATE
// =============================================================================

/// The on-chain record of one impure circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ContractOperation {
    /// Verifier key, absent until attached (or for witness-only circuits).
    pub verifier_key: Option<VerifierKey>,
}

impl ContractOperation {
    /// An operation with no verifier key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a verifier key.
    #[must_use]
    pub fn with_verifier_key(mut self, verifier_key: VerifierKey) -> Self {
        self.verifier_key = Some(verifier_key);
        self
    }
}

/// Keys and anti-replay counter authorized to maintain a deployed contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ContractMaintenanceAuthority {
    /// Committee of verifying keys; signature slots index into this list.
    pub committee: Vec<VerifyingKey>,
    /// Number of valid committee signatures required.
    pub threshold: u32,
    /// Strictly monotonic update counter.
    pub counter: u64,
}

impl ContractMaintenanceAuthority {
    /// Build an authority, checking `1 <= threshold <= committee.len()`.
    pub fn new(
        committee: Vec<VerifyingKey>,
        threshold: u32,
        counter: u64,
    ) -> Result<Self, LedgerError> {
        if threshold == 0 || threshold as usize > committee.len() {
            return Err(LedgerError::InvalidThreshold {
                threshold,
                committee: committee.len(),
            });
        }
        Ok(Self {
            committee,
            threshold,
            counter,
        })
    }
}

/// A contract's public on-chain state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ContractState {
    /// Public state tree.
    pub data: StateValue,
    /// Impure circuit records keyed by circuit id.
    pub operations: BTreeMap<String, ContractOperation>,
    /// Current maintenance authority.
    pub maintenance_authority: ContractMaintenanceAuthority,
}

impl ContractState {
    /// Empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an operation record.
    pub fn operation(&self, id: &str) -> Option<&ContractOperation> {
        self.operations.get(id)
    }

    /// Ids of all operations, sorted.
    pub fn operation_ids(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    /// Insert or replace an operation record.
    #[must_use]
    pub fn with_operation(mut self, id: impl Into<String>, operation: ContractOperation) -> Self {
        self.operations.insert(id.into(), operation);
        self
    }

    /// Drop an operation record.
    #[must_use]
    pub fn without_operation(mut self, id: &str) -> Self {
        self.operations.remove(id);
        self
    }

    /// Replace the maintenance authority.
    #[must_use]
    pub fn with_maintenance_authority(mut self, authority: ContractMaintenanceAuthority) -> Self {
        self.maintenance_authority = authority;
        self
    }

    /// Replace the public state tree.
    #[must_use]
    pub fn with_data(mut self, data: StateValue) -> Self {
        self.data = data;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_crypto::SigningKey;

    const COIN_KEY: &str = "d2dc8d175c0ef7d1f7e5b7f32bd9da5fcd4c60fa1b651f1d312986269c2d3c79";

    #[test]
    fn test_coin_public_key_hex_forms() {
        let plain: CoinPublicKey = COIN_KEY.parse().unwrap();
        let prefixed: CoinPublicKey = format!("0x{COIN_KEY}").parse().unwrap();
        assert_eq!(plain, prefixed);
        assert_eq!(plain.to_hex(), COIN_KEY);
    }

    #[test]
    fn test_coin_public_key_bech32m() {
        let key: CoinPublicKey =
            "mn_shield-cpk_undeployed16twg696upmmaral9klejhkw6tlx5cc86rdj378f39xrzd8pd83uszfngt2"
                .parse()
                .unwrap();
        assert_eq!(key.to_hex(), COIN_KEY);
    }

    #[test]
    fn test_coin_public_key_invalid() {
        assert!(matches!(
            "INVALIDd9da5fcd4c601".parse::<CoinPublicKey>(),
            Err(LedgerError::InvalidHex(_))
        ));
        assert!(matches!(
            "abcd".parse::<CoinPublicKey>(),
            Err(LedgerError::InvalidLength { actual: 2, .. })
        ));
    }

    #[test]
    fn test_aligned_u64() {
        let value = AlignedValue::from_u64(42);
        assert_eq!(value.to_u64(), Some(42));
        assert_eq!(AlignedValue::from("count").to_u64(), None);
    }

    #[test]
    fn test_state_transformations_are_pure() {
        let original = ContractState::new().with_operation("increment", ContractOperation::new());
        let updated = original
            .clone()
            .with_operation("touch", ContractOperation::new())
            .without_operation("increment");

        assert!(original.operation("increment").is_some());
        assert!(original.operation("touch").is_none());
        assert_eq!(updated.operation_ids().collect::<Vec<_>>(), vec!["touch"]);
    }

    #[test]
    fn test_authority_threshold_bounds() {
        let key = SigningKey::sample().verifying_key();
        assert!(ContractMaintenanceAuthority::new(vec![key], 1, 0).is_ok());
        assert_eq!(
            ContractMaintenanceAuthority::new(vec![key], 2, 0),
            Err(LedgerError::InvalidThreshold {
                threshold: 2,
                committee: 1
            })
        );
        assert!(ContractMaintenanceAuthority::new(vec![key], 0, 0).is_err());
    }

    #[test]
    fn test_state_json_roundtrip() {
        let mut data = StateValue::empty_map();
        data.map_mut()
            .unwrap()
            .insert(AlignedValue::from("count"), StateValue::Cell(AlignedValue::from_u64(7)));
        let state = ContractState::new().with_data(data);

        let json = serde_json::to_string(&state).unwrap();
        let decoded: ContractState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, decoded);
    }
}
