//! # Domain Invariants
//!
//! Rules every engine operation upholds.
//!
//! - Each circuit call yields exactly one partitioned transcript pair.
//! - A new maintenance authority's counter is `0` at deploy and the current
//!   counter plus one when replacing.
//! - Maintenance updates are signed at a fixed committee slot with a
//!   threshold of one.

use crate::errors::ContractRuntimeError;
use shared_types::{
    ContractMaintenanceAuthority, ContractOperationVersion, ContractState, LedgerError,
    PartitionedTranscript, SigningKey,
};

/// Threshold of every authority the engine creates.
pub const DEFAULT_CMA_THRESHOLD: u32 = 1;

/// Committee slot the engine signs maintenance updates at.
pub const DEFAULT_SIGNATURE_INDEX: u64 = 0;

/// Version marker attached to inserted and removed verifier keys.
pub const OPERATION_VERSION: ContractOperationVersion = ContractOperationVersion::V3;

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// Take the single partition pair of a call, failing on any other count.
pub fn single_partition(
    mut partitions: Vec<PartitionedTranscript>,
) -> Result<PartitionedTranscript, ContractRuntimeError> {
    match partitions.len() {
        1 => partitions.pop().ok_or_else(|| {
            ContractRuntimeError::new("Expected one transcript partition pair, received: 0")
        }),
        count => Err(ContractRuntimeError::new(format!(
            "Expected one transcript partition pair, received: {count}"
        ))),
    }
}

/// Counter a new authority starts at: `0` on deploy, current + 1 on replace.
pub fn next_authority_counter(current: Option<&ContractState>) -> Result<u64, LedgerError> {
    match current {
        None => Ok(0),
        Some(state) => state
            .maintenance_authority
            .counter
            .checked_add(1)
            .ok_or_else(|| LedgerError::Overflow("maintenance_authority.counter".into())),
    }
}

/// Build a single-key authority for `signing_key`.
pub fn authority_for(
    signing_key: &SigningKey,
    current: Option<&ContractState>,
) -> Result<ContractMaintenanceAuthority, LedgerError> {
    ContractMaintenanceAuthority::new(
        vec![signing_key.verifying_key()],
        DEFAULT_CMA_THRESHOLD,
        next_authority_counter(current)?,
    )
}
