//! # Shared Types Crate
//!
//! The ledger data model consumed by the contract execution engine.
//!
//! ## Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | `entities` | Addresses, keys, state tree, `ContractState` |
//! | `maintenance` | `MaintenanceUpdate`, `SingleUpdate`, update application |
//! | `transcript` | `Op`, `QueryContext`, `partition_transcripts` |
//! | `zswap` | `ZswapLocalState` and its encoded wire form |
//! | `intent` | Deploy / call / maintenance intents |
//! | `codec` | `LedgerStateCodec` |
//! | `address` | Bech32m network addresses |
//!
//! ## Design Principles
//!
//! - **Values, not handles**: every state transformation consumes and
//!   returns a value. Nothing here holds shared mutable state.
//! - **Explicit failures**: decoding and replay return `LedgerError`,
//!   never panic.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod address;
pub mod codec;
pub mod entities;
pub mod errors;
pub mod intent;
pub mod maintenance;
pub mod transcript;
pub mod zswap;

pub use address::{NetworkAddress, UnshieldedAddress};
pub use codec::{BincodeLedgerCodec, LedgerStateCodec};
pub use entities::*;
pub use errors::LedgerError;
pub use intent::{ContractCall, ContractDeploy, Intent, IntentAction};
pub use maintenance::{
    ContractOperationVersion, ContractOperationVersionedVerifierKey, MaintenanceUpdate,
    SingleUpdate,
};
pub use shared_crypto::{Signature, SigningKey, VerifyingKey};
pub use transcript::{
    partition_transcripts, LedgerParameters, Op, PartitionedTranscript, PreTranscript,
    QueryContext, Transcript,
};
pub use zswap::{EncodedZswapLocalState, ZswapLocalState};
