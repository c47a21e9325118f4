//! # Intents
//!
//! The unproven transaction body a client submits: contract deployments,
//! circuit calls and maintenance updates, valid until a time-to-live.

use crate::entities::{AlignedValue, ContractAddress, ContractOperation, ContractState};
use crate::errors::LedgerError;
use crate::maintenance::MaintenanceUpdate;
use crate::transcript::Transcript;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Default validity window of a freshly built intent.
pub const DEFAULT_TTL_SECONDS: i64 = 3600;

/// Deploy a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractDeploy {
    /// Address the contract will live at.
    pub address: ContractAddress,
    /// Initial public state.
    pub initial_state: ContractState,
    /// Randomness mixed into the address.
    pub nonce: [u8; 32],
}

impl ContractDeploy {
    /// Build a deployment with a random nonce.
    pub fn new(initial_state: ContractState) -> Result<Self, LedgerError> {
        let mut nonce = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut nonce);
        Self::with_nonce(initial_state, nonce)
    }

    /// Build a deployment with an explicit nonce.
    pub fn with_nonce(initial_state: ContractState, nonce: [u8; 32]) -> Result<Self, LedgerError> {
        let mut seed = bincode::serialize(&initial_state)
            .map_err(|err| LedgerError::Serialization(err.to_string()))?;
        seed.extend_from_slice(&nonce);
        Ok(Self {
            address: ContractAddress::derive(&seed),
            initial_state,
            nonce,
        })
    }
}

/// Call an impure circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCall {
    /// Target contract.
    pub address: ContractAddress,
    /// Circuit id.
    pub entry_point: String,
    /// The operation being invoked, as recorded on chain.
    pub operation: ContractOperation,
    /// Segment that must succeed.
    pub guaranteed_transcript: Option<Transcript>,
    /// Segment that may fail without voiding the transaction.
    pub fallible_transcript: Option<Transcript>,
    /// Values returned by witnesses.
    pub private_transcript_outputs: Vec<AlignedValue>,
    /// Encoded circuit arguments.
    pub input: AlignedValue,
    /// Encoded circuit result.
    pub output: AlignedValue,
}

/// One action carried by an intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntentAction {
    /// Deployment.
    Deploy(ContractDeploy),
    /// Circuit call.
    Call(Box<ContractCall>),
    /// Maintenance update.
    Maintenance(MaintenanceUpdate),
}

/// An unproven transaction body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    /// Expiry.
    pub ttl: DateTime<Utc>,
    /// Actions, in order.
    pub actions: Vec<IntentAction>,
}

impl Intent {
    /// An empty intent expiring at `ttl`.
    pub fn new(ttl: DateTime<Utc>) -> Self {
        Self {
            ttl,
            actions: Vec::new(),
        }
    }

    /// An empty intent expiring [`DEFAULT_TTL_SECONDS`] from now.
    pub fn with_default_ttl() -> Self {
        Self::new(Utc::now() + Duration::seconds(DEFAULT_TTL_SECONDS))
    }

    /// Append a deployment.
    #[must_use]
    pub fn add_deploy(mut self, deploy: ContractDeploy) -> Self {
        self.actions.push(IntentAction::Deploy(deploy));
        self
    }

    /// Append a circuit call.
    #[must_use]
    pub fn add_call(mut self, call: ContractCall) -> Self {
        self.actions.push(IntentAction::Call(Box::new(call)));
        self
    }

    /// Append a maintenance update.
    #[must_use]
    pub fn add_maintenance_update(mut self, update: MaintenanceUpdate) -> Self {
        self.actions.push(IntentAction::Maintenance(update));
        self
    }

    /// Binary encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, LedgerError> {
        bincode::serialize(self).map_err(|err| LedgerError::Serialization(err.to_string()))
    }

    /// Decode from [`Intent::to_bytes`] output.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        bincode::deserialize(bytes).map_err(|err| LedgerError::Deserialization(err.to_string()))
    }
}
