//! # Circuit Runtime
//!
//! The contexts contract code runs in.
//!
//! - [`ConstructorContext`]: the initial private state and the caller's coin
//!   key, handed to a contract's constructor.
//! - [`CircuitContext`]: the live query context, private state and Zswap
//!   state of one circuit call. Every public-state access is recorded as a
//!   transcript [`Op`], and every witness result as a private transcript
//!   output.

use super::contract::Witnesses;
use super::value::Value;
use shared_types::{
    AlignedValue, CoinPublicKey, ContractAddress, ContractState, EncodedZswapLocalState,
    LedgerError, Op, QueryContext,
};
use thiserror::Error;

/// A failure raised by contract code while constructing or executing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct CompactError(String);

impl CompactError {
    /// A failure with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<LedgerError> for CompactError {
    fn from(err: LedgerError) -> Self {
        Self(err.to_string())
    }
}

// =============================================================================
// CONSTRUCTOR
// =============================================================================

/// Context for a contract constructor.
#[derive(Debug, Clone)]
pub struct ConstructorContext<PS> {
    /// Private state supplied by the deployer.
    pub initial_private_state: PS,
    /// The deployer's coin public key.
    pub coin_public_key: CoinPublicKey,
    /// Empty Zswap state for the deployer.
    pub initial_zswap_local_state: EncodedZswapLocalState,
}

impl<PS> ConstructorContext<PS> {
    /// Build a constructor context, parsing the coin key from hex, `0x` hex
    /// or Bech32m.
    pub fn new(initial_private_state: PS, coin_public_key: &str) -> Result<Self, LedgerError> {
        let coin_public_key: CoinPublicKey = coin_public_key.parse()?;
        Ok(Self {
            initial_private_state,
            initial_zswap_local_state: EncodedZswapLocalState::empty(&coin_public_key),
            coin_public_key,
        })
    }
}

/// What a constructor returns.
#[derive(Debug, Clone)]
pub struct ConstructorResult<PS> {
    /// Initial public state.
    pub current_contract_state: ContractState,
    /// Private state after construction.
    pub current_private_state: PS,
    /// Zswap state after construction.
    pub current_zswap_local_state: EncodedZswapLocalState,
}

// =============================================================================
// CIRCUITS
// =============================================================================

/// What a witness sees.
#[derive(Debug)]
pub struct WitnessContext<'a, PS> {
    /// Current public state.
    pub ledger: &'a shared_types::StateValue,
    /// Current private state.
    pub private_state: &'a PS,
    /// Address of the contract.
    pub contract_address: ContractAddress,
}

/// Execution context of one circuit call.
#[derive(Debug, Clone)]
pub struct CircuitContext<PS> {
    /// Public state before the call.
    pub original_state: ContractState,
    /// Live query context.
    pub current_query_context: QueryContext,
    /// Live private state.
    pub current_private_state: PS,
    /// Live Zswap state.
    pub current_zswap_local_state: EncodedZswapLocalState,
    transcript: Vec<Op>,
    private_transcript_outputs: Vec<AlignedValue>,
    stack: Vec<Option<AlignedValue>>,
}

/// Create the context for a circuit call.
pub fn create_circuit_context<PS>(
    address: ContractAddress,
    zswap_local_state: EncodedZswapLocalState,
    contract_state: ContractState,
    private_state: PS,
) -> CircuitContext<PS> {
    CircuitContext {
        current_query_context: QueryContext::new(contract_state.data.clone(), address),
        original_state: contract_state,
        current_private_state: private_state,
        current_zswap_local_state: zswap_local_state,
        transcript: Vec::new(),
        private_transcript_outputs: Vec::new(),
        stack: Vec::new(),
    }
}

impl<PS> CircuitContext<PS> {
    /// Address of the contract being called.
    pub fn address(&self) -> ContractAddress {
        self.current_query_context.address
    }

    /// Execute and record one op.
    pub fn query(&mut self, op: Op) -> Result<(), CompactError> {
        let index = self.transcript.len();
        self.current_query_context
            .query(index, &op, &mut self.stack)?;
        self.transcript.push(op);
        Ok(())
    }

    /// Read a cell, recording the read and the observed result.
    pub fn read(&mut self, key: impl Into<AlignedValue>) -> Result<Option<AlignedValue>, CompactError> {
        let key = key.into();
        self.query(Op::Read { key: key.clone() })?;
        let observed = self.current_query_context.lookup(&key);
        self.query(Op::Popeq {
            cached: false,
            result: observed.clone(),
        })?;
        Ok(observed)
    }

    /// Write a cell.
    pub fn write(&mut self, key: impl Into<AlignedValue>, value: AlignedValue) -> Result<(), CompactError> {
        self.query(Op::Write {
            key: key.into(),
            value,
        })
    }

    /// Remove a key.
    pub fn remove(&mut self, key: impl Into<AlignedValue>) -> Result<(), CompactError> {
        self.query(Op::Remove { key: key.into() })
    }

    /// Add to a counter cell.
    pub fn increment(&mut self, key: impl Into<AlignedValue>, amount: u64) -> Result<(), CompactError> {
        self.query(Op::Increment {
            key: key.into(),
            amount,
        })
    }

    /// End the guaranteed segment.
    pub fn checkpoint(&mut self) -> Result<(), CompactError> {
        self.query(Op::Ckpt)
    }

    /// Invoke a witness, adopting its private state and recording its output.
    pub fn witness(
        &mut self,
        witnesses: &Witnesses<PS>,
        name: &str,
        args: &[Value],
    ) -> Result<Value, CompactError> {
        let witness = witnesses
            .get(name)
            .ok_or_else(|| CompactError::new(format!("witness '{name}' is not defined")))?;
        let context = WitnessContext {
            ledger: &self.current_query_context.state,
            private_state: &self.current_private_state,
            contract_address: self.current_query_context.address,
        };
        let (private_state, value) = witness(context, args)?;
        self.current_private_state = private_state;
        self.private_transcript_outputs
            .push(Value::encode_all(std::slice::from_ref(&value))?);
        Ok(value)
    }

    /// Recorded public transcript so far.
    pub fn transcript(&self) -> &[Op] {
        &self.transcript
    }

    /// Finish the call.
    pub fn finish(self, args: &[Value], result: Value) -> Result<CircuitResults<PS>, CompactError> {
        Ok(CircuitResults {
            input: Value::encode_all(args)?,
            output: Value::encode_all(std::slice::from_ref(&result))?,
            result,
            public_transcript: self.transcript,
            private_transcript_outputs: self.private_transcript_outputs,
            query_context: self.current_query_context,
            private_state: self.current_private_state,
            zswap_local_state: self.current_zswap_local_state,
        })
    }
}

/// Everything a finished circuit call produced.
#[derive(Debug, Clone)]
pub struct CircuitResults<PS> {
    /// Circuit return value.
    pub result: Value,
    /// Encoded arguments.
    pub input: AlignedValue,
    /// Encoded return value.
    pub output: AlignedValue,
    /// Recorded public ops.
    pub public_transcript: Vec<Op>,
    /// Encoded witness outputs.
    pub private_transcript_outputs: Vec<AlignedValue>,
    /// Query context after the call.
    pub query_context: QueryContext,
    /// Private state after the call.
    pub private_state: PS,
    /// Zswap state after the call.
    pub zswap_local_state: EncodedZswapLocalState,
}
