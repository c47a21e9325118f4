//! Result pairs returned by engine operations. The `public` half is meant for
//! the chain, the `private` half stays with the caller.

use super::value::Value;
use shared_types::{
    AlignedValue, ContractAddress, ContractState, EncodedZswapLocalState, MaintenanceUpdate, Op,
    PartitionedTranscript, SigningKey,
};

/// A public/private result pair.
#[derive(Debug, Clone)]
pub struct ExecutionResult<Public, Private> {
    /// Chain-visible part.
    pub public: Public,
    /// Caller-retained part.
    pub private: Private,
}

/// Public output of `initialize`.
#[derive(Debug, Clone)]
pub struct DeployResultPublic {
    /// Initial contract state, verifier keys and authority attached.
    pub contract_state: ContractState,
}

/// Private output of `initialize`.
#[derive(Debug, Clone)]
pub struct DeployResultPrivate<PS> {
    /// Key controlling the maintenance authority.
    pub signing_key: SigningKey,
    /// Private state after construction.
    pub private_state: PS,
    /// Zswap state after construction.
    pub zswap_local_state: EncodedZswapLocalState,
}

/// Result of `initialize`.
pub type DeployResult<PS> = ExecutionResult<DeployResultPublic, DeployResultPrivate<PS>>;

/// Public output of `circuit`.
#[derive(Debug, Clone)]
pub struct CallResultPublic {
    /// Contract state with the post-call state tree.
    pub contract_state: ContractState,
    /// Recorded ops.
    pub public_transcript: Vec<Op>,
    /// Guaranteed and fallible segments.
    pub partitioned_transcript: PartitionedTranscript,
}

/// Private output of `circuit`.
#[derive(Debug, Clone)]
pub struct CallResultPrivate<PS> {
    /// Encoded arguments.
    pub input: AlignedValue,
    /// Encoded return value.
    pub output: AlignedValue,
    /// Encoded witness outputs.
    pub private_transcript_outputs: Vec<AlignedValue>,
    /// Circuit return value.
    pub result: Value,
    /// Private state after the call.
    pub private_state: PS,
    /// Zswap state after the call.
    pub zswap_local_state: EncodedZswapLocalState,
}

/// Result of `circuit`.
pub type CallResult<PS> = ExecutionResult<CallResultPublic, CallResultPrivate<PS>>;

/// Public output of a maintenance operation.
#[derive(Debug, Clone)]
pub struct MaintenanceResultPublic {
    /// The signed update.
    pub maintenance_update: MaintenanceUpdate,
}

/// Private output of a maintenance operation.
#[derive(Debug, Clone)]
pub struct MaintenanceResultPrivate {
    /// Key to use for the next maintenance operation.
    pub signing_key: SigningKey,
}

/// Result of a maintenance operation.
pub type MaintenanceResult = ExecutionResult<MaintenanceResultPublic, MaintenanceResultPrivate>;

/// A deployed contract's address and current public state.
#[derive(Debug, Clone)]
pub struct ContractContext {
    /// Contract address.
    pub address: ContractAddress,
    /// Current public state.
    pub contract_state: ContractState,
}

/// Everything a circuit call needs besides its arguments.
#[derive(Debug, Clone)]
pub struct CircuitCallContext<PS> {
    /// Contract address.
    pub address: ContractAddress,
    /// Current public state.
    pub contract_state: ContractState,
    /// Current private state.
    pub private_state: PS,
    /// Current Zswap state; a fresh one is created when absent.
    pub zswap_local_state: Option<EncodedZswapLocalState>,
}
