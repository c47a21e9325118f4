//! # Contract Maintenance
//!
//! Signed updates that alter a deployed contract's operation set or rotate
//! its maintenance authority.
//!
//! ## Counter Discipline
//!
//! | Step | Counter |
//! |------|---------|
//! | Deploy | `0` |
//! | Update built | bound to the authority's current counter |
//! | Update applied | authority counter `+ 1` |
//!
//! An update whose counter differs from the authority's is rejected, so each
//! update is applicable exactly once.

use crate::entities::{ContractAddress, ContractMaintenanceAuthority, ContractState, VerifierKey};
use crate::errors::LedgerError;
use serde::{Deserialize, Serialize};
use shared_crypto::Signature;
use std::collections::BTreeMap;
use tracing::debug;

/// Domain separator prefixed to every signed maintenance payload.
const MAINTENANCE_SIGNING_DOMAIN: &[u8] = b"compact:contract-maintenance-update:";

/// Version marker of a verifier key attached to an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractOperationVersion {
    /// Current proving system version.
    #[serde(rename = "v3")]
    V3,
}

/// A verifier key tagged with its operation version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractOperationVersionedVerifierKey {
    /// Version marker.
    pub version: ContractOperationVersion,
    /// Key bytes.
    pub verifier_key: VerifierKey,
}

impl ContractOperationVersionedVerifierKey {
    /// Tag a key with a version.
    pub fn new(version: ContractOperationVersion, verifier_key: VerifierKey) -> Self {
        Self {
            version,
            verifier_key,
        }
    }
}

/// One atomic change within a maintenance update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SingleUpdate {
    /// Replace the maintenance authority.
    ReplaceAuthority(ContractMaintenanceAuthority),
    /// Remove an operation's verifier key (and the operation).
    VerifierKeyRemove {
        /// Circuit id.
        operation: String,
        /// Version being removed.
        version: ContractOperationVersion,
    },
    /// Insert or replace an operation's verifier key.
    VerifierKeyInsert {
        /// Circuit id.
        operation: String,
        /// Versioned key.
        verifier_key: ContractOperationVersionedVerifierKey,
    },
}

/// A batch of updates bound to a contract and an authority counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceUpdate {
    /// Target contract.
    pub address: ContractAddress,
    /// Updates, applied in order.
    pub updates: Vec<SingleUpdate>,
    /// Authority counter the update was built against.
    pub counter: u64,
    /// Signatures keyed by committee slot.
    pub signatures: BTreeMap<u64, Signature>,
}

impl MaintenanceUpdate {
    /// An unsigned update.
    pub fn new(address: ContractAddress, updates: Vec<SingleUpdate>, counter: u64) -> Self {
        Self {
            address,
            updates,
            counter,
            signatures: BTreeMap::new(),
        }
    }

    /// Canonical bytes covered by committee signatures.
    ///
    /// Signatures themselves are excluded so signing order does not matter.
    pub fn data_to_sign(&self) -> Result<Vec<u8>, LedgerError> {
        let body = bincode::serialize(&(&self.address, &self.updates, self.counter))
            .map_err(|err| LedgerError::Serialization(err.to_string()))?;
        let mut data = Vec::with_capacity(MAINTENANCE_SIGNING_DOMAIN.len() + body.len());
        data.extend_from_slice(MAINTENANCE_SIGNING_DOMAIN);
        data.extend_from_slice(&body);
        Ok(data)
    }

    /// Attach a signature at a committee slot.
    #[must_use]
    pub fn add_signature(mut self, slot: u64, signature: Signature) -> Self {
        self.signatures.insert(slot, signature);
        self
    }

    /// Check that enough committee members signed this update.
    pub fn verify_signatures(
        &self,
        authority: &ContractMaintenanceAuthority,
    ) -> Result<(), LedgerError> {
        let message = self.data_to_sign()?;
        let valid = self
            .signatures
            .iter()
            .filter(|(slot, signature)| {
                usize::try_from(**slot)
                    .ok()
                    .and_then(|slot| authority.committee.get(slot))
                    .is_some_and(|key| key.verify(&message, signature).is_ok())
            })
            .count();
        let valid = u32::try_from(valid).unwrap_or(u32::MAX);

        if authority.threshold == 0 || valid < authority.threshold {
            return Err(LedgerError::InsufficientSignatures {
                required: authority.threshold.max(1),
                valid,
            });
        }
        Ok(())
    }
}

impl ContractState {
    /// Apply a signed maintenance update, returning the new state.
    ///
    /// The resulting authority counter is always the previous counter plus one.
    pub fn apply_maintenance_update(
        &self,
        address: &ContractAddress,
        update: &MaintenanceUpdate,
    ) -> Result<ContractState, LedgerError> {
        if &update.address != address {
            return Err(LedgerError::AddressMismatch {
                expected: address.to_string(),
                actual: update.address.to_string(),
            });
        }

        let authority = &self.maintenance_authority;
        if update.counter != authority.counter {
            return Err(LedgerError::CounterMismatch {
                expected: authority.counter,
                actual: update.counter,
            });
        }
        update.verify_signatures(authority)?;

        let next_counter = authority
            .counter
            .checked_add(1)
            .ok_or_else(|| LedgerError::Overflow("maintenance_authority.counter".into()))?;
        let mut state = self.clone();
        for single in &update.updates {
            state = match single {
                SingleUpdate::ReplaceAuthority(replacement) => {
                    if replacement.counter != next_counter {
                        return Err(LedgerError::CounterMismatch {
                            expected: next_counter,
                            actual: replacement.counter,
                        });
                    }
                    state.with_maintenance_authority(replacement.clone())
                }
                SingleUpdate::VerifierKeyRemove { operation, .. } => {
                    if state.operation(operation).is_none() {
                        return Err(LedgerError::UnknownOperation(operation.clone()));
                    }
                    state.without_operation(operation)
                }
                SingleUpdate::VerifierKeyInsert {
                    operation,
                    verifier_key,
                } => {
                    let record = state
                        .operation(operation)
                        .cloned()
                        .unwrap_or_default()
                        .with_verifier_key(verifier_key.verifier_key.clone());
                    state.with_operation(operation.clone(), record)
                }
            };
        }
        state.maintenance_authority.counter = next_counter;

        debug!(
            address = %address,
            updates = update.updates.len(),
            counter = next_counter,
            "Applied maintenance update"
        );
        Ok(state)
    }
}
