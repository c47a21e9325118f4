//! # Driving Ports (API - Inbound)
//!
//! The operations an executable contract exposes.

use crate::domain::{
    CallResult, CircuitCallContext, ContractContext, DeployResult, ImpureCircuitId,
    MaintenanceResult, Value, VerifierKey,
};
use crate::errors::ContractExecutionError;
use async_trait::async_trait;
use shared_types::SigningKey;

/// Primary API of an executable contract.
#[async_trait]
pub trait ContractExecutableApi: Send + Sync {
    /// Private state type of the contract.
    type PrivateState: Clone + Send + Sync + 'static;

    /// Create and initialize a new contract instance.
    async fn initialize(
        &self,
        initial_private_state: Self::PrivateState,
        args: &[Value],
    ) -> Result<DeployResult<Self::PrivateState>, ContractExecutionError>;

    /// Invoke an impure circuit on a deployed instance.
    async fn circuit(
        &self,
        impure_circuit_id: &str,
        context: CircuitCallContext<Self::PrivateState>,
        args: &[Value],
    ) -> Result<CallResult<Self::PrivateState>, ContractExecutionError>;

    /// Impure circuits of the contract.
    async fn impure_circuit_ids(&self) -> Result<Vec<ImpureCircuitId>, ContractExecutionError>;

    /// Replace the maintenance authority with one for `new_signing_key`
    /// (or a freshly sampled key). Signed with the current key; returns the
    /// new key.
    async fn replace_contract_maintenance_authority(
        &self,
        new_signing_key: Option<SigningKey>,
        context: &ContractContext,
    ) -> Result<MaintenanceResult, ContractExecutionError>;

    /// Remove a circuit's verifier key.
    async fn remove_contract_operation(
        &self,
        impure_circuit_id: &str,
        context: &ContractContext,
    ) -> Result<MaintenanceResult, ContractExecutionError>;

    /// Add or replace a circuit's verifier key.
    async fn add_or_replace_contract_operation(
        &self,
        impure_circuit_id: &str,
        verifier_key: VerifierKey,
        context: &ContractContext,
    ) -> Result<MaintenanceResult, ContractExecutionError>;
}
