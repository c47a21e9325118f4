//! # counter-contract
//!
//! A counter with a public round and a private tally.
//!
//! | Circuit | Arguments | Public effect | Private effect |
//! |---------|-----------|---------------|----------------|
//! | `increment` | none | `round += 1` | `count += 1` |
//! | `add` | `amount: bigint` | `round += amount`, returns new round | none |
//! | `touch` | none | none | `count += 1` |
//!
//! `touch` ships without a verifier key: it never touches the ledger.
//!
//! Compiled assets live in `managed/counter` next to this crate's manifest.

#![warn(missing_docs)]
#![warn(clippy::all)]

use compact_executable::domain::{
    CircuitContext, CircuitResults, CompactError, CompiledContract, ConstructorContext,
    ConstructorResult, Contract, ImpureCircuit, ImpureCircuitId, Value, Witnesses,
};
use serde::{Deserialize, Serialize};
use shared_types::{AlignedValue, ContractOperation, ContractState, StateValue};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Contract tag.
pub const CONTRACT_TAG: &str = "counter";

/// Compiled assets, relative to the assets base.
pub const COMPILED_ASSETS_PATH: &str = "managed/counter";

/// Assets base holding the bundled compiled assets.
pub const BUNDLED_ASSETS_BASE: &str = env!("CARGO_MANIFEST_DIR");

/// Ledger key of the public round.
pub const ROUND_KEY: &str = "round";

/// Witness bumping the private tally.
pub const PRIVATE_INCREMENT: &str = "private_increment";

/// Impure circuits, in declaration order.
pub const CIRCUITS: [&str; 3] = ["increment", "add", "touch"];

type CircuitOutcome = Result<CircuitResults<CounterPrivateState>, CompactError>;

/// Private state of the counter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterPrivateState {
    /// Number of private increments.
    pub count: u64,
}

/// The counter contract.
pub struct Counter {
    witnesses: Witnesses<CounterPrivateState>,
}

impl Counter {
    /// Construct from witnesses; `private_increment` must be provided.
    pub fn new(witnesses: Witnesses<CounterPrivateState>) -> Result<Self, CompactError> {
        if !witnesses.contains(PRIVATE_INCREMENT) {
            return Err(CompactError::new(format!(
                "missing witness '{PRIVATE_INCREMENT}'"
            )));
        }
        Ok(Self { witnesses })
    }

    fn increment(&self) -> ImpureCircuit<CounterPrivateState> {
        let witnesses = self.witnesses.clone();
        Arc::new(move |mut ctx: CircuitContext<CounterPrivateState>, args: &[Value]| -> CircuitOutcome {
            ctx.witness(&witnesses, PRIVATE_INCREMENT, &[])?;
            ctx.increment(ROUND_KEY, 1)?;
            ctx.finish(args, Value::Unit)
        })
    }

    fn add(&self) -> ImpureCircuit<CounterPrivateState> {
        Arc::new(|mut ctx: CircuitContext<CounterPrivateState>, args: &[Value]| -> CircuitOutcome {
            let amount = match args {
                [amount] => amount
                    .as_u64()
                    .ok_or_else(|| CompactError::new("amount must be a non-negative integer"))?,
                _ => {
                    return Err(CompactError::new(format!(
                        "add expects 1 argument, got {}",
                        args.len()
                    )))
                }
            };
            let current = ctx
                .read(ROUND_KEY)?
                .and_then(|value| value.to_u64())
                .unwrap_or(0);
            let next = current
                .checked_add(amount)
                .ok_or_else(|| CompactError::new("round overflow"))?;
            ctx.increment(ROUND_KEY, amount)?;
            debug!(current, amount, "Adding to round");
            ctx.finish(args, Value::from(next))
        })
    }

    fn touch(&self) -> ImpureCircuit<CounterPrivateState> {
        let witnesses = self.witnesses.clone();
        Arc::new(move |mut ctx: CircuitContext<CounterPrivateState>, args: &[Value]| -> CircuitOutcome {
            ctx.witness(&witnesses, PRIVATE_INCREMENT, &[])?;
            ctx.finish(args, Value::Unit)
        })
    }
}

impl Contract for Counter {
    type PrivateState = CounterPrivateState;

    fn impure_circuit_ids(&self) -> Vec<ImpureCircuitId> {
        CIRCUITS.iter().map(|id| id.to_string()).collect()
    }

    fn initial_state(
        &self,
        context: ConstructorContext<CounterPrivateState>,
        args: &[Value],
    ) -> Result<ConstructorResult<CounterPrivateState>, CompactError> {
        if !args.is_empty() {
            return Err(CompactError::new(format!(
                "constructor expects no arguments, got {}",
                args.len()
            )));
        }
        let data = StateValue::Map(BTreeMap::from([(
            AlignedValue::from(ROUND_KEY),
            StateValue::Cell(AlignedValue::from_u64(0)),
        )]));
        let state = CIRCUITS
            .iter()
            .fold(ContractState::new().with_data(data), |state, id| {
                state.with_operation(*id, ContractOperation::new())
            });

        Ok(ConstructorResult {
            current_contract_state: state,
            current_private_state: context.initial_private_state,
            current_zswap_local_state: context.initial_zswap_local_state,
        })
    }

    fn impure_circuit(&self, id: &str) -> Option<ImpureCircuit<CounterPrivateState>> {
        match id {
            "increment" => Some(self.increment()),
            "add" => Some(self.add()),
            "touch" => Some(self.touch()),
            _ => None,
        }
    }
}

/// The counter's witnesses.
pub fn witnesses() -> Witnesses<CounterPrivateState> {
    Witnesses::<CounterPrivateState>::new().with(PRIVATE_INCREMENT, |ctx, _args| {
        let next = CounterPrivateState {
            count: ctx.private_state.count + 1,
        };
        Ok((next, Value::Unit))
    })
}

/// The counter, with witnesses and compiled assets resolved.
pub fn compiled_contract() -> CompiledContract<Counter> {
    CompiledContract::make(CONTRACT_TAG, Counter::new)
        .with_witnesses(witnesses())
        .with_compiled_file_assets(COMPILED_ASSETS_PATH)
}

/// Public round recorded in `state`.
pub fn round(state: &ContractState) -> Option<u64> {
    state
        .data
        .get(&AlignedValue::from(ROUND_KEY))
        .and_then(StateValue::as_cell)
        .and_then(AlignedValue::to_u64)
}
