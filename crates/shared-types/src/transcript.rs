//! # Transcripts
//!
//! The low-level operation log a circuit records against public state, the
//! query context it runs in, and the partitioner that splits a finished
//! program into its guaranteed and fallible segments.
//!
//! ## Program Model
//!
//! | Op | Effect |
//! |----|--------|
//! | `Noop` | Charges gas only |
//! | `Read` | Pushes the value at a key (or absence) |
//! | `Popeq` | Pops the last read and checks it against the recorded result |
//! | `Write` | Stores a cell at a key |
//! | `Remove` | Deletes a key |
//! | `Increment` | Adds to a `u64` cell, treating absence as zero |
//! | `Ckpt` | Ends the guaranteed segment |

use crate::entities::{AlignedValue, ContractAddress, StateValue};
use crate::errors::LedgerError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, trace};

/// A single transcript operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    /// Idle for `n` steps.
    Noop {
        /// Number of steps.
        n: u32,
    },
    /// Read the value at `key`.
    Read {
        /// Key to read.
        key: AlignedValue,
    },
    /// Pop the last read and compare it with `result`.
    Popeq {
        /// Whether the read hit a cached value.
        cached: bool,
        /// Value the circuit observed; `None` for absence.
        result: Option<AlignedValue>,
    },
    /// Write a cell.
    Write {
        /// Target key.
        key: AlignedValue,
        /// New value.
        value: AlignedValue,
    },
    /// Delete a key.
    Remove {
        /// Target key.
        key: AlignedValue,
    },
    /// Add to a counter cell.
    Increment {
        /// Target key.
        key: AlignedValue,
        /// Amount to add.
        amount: u64,
    },
    /// Checkpoint between guaranteed and fallible execution.
    Ckpt,
}

/// Block-level facts visible to a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BlockContext {
    /// Block time.
    pub seconds_since_epoch: u64,
    /// Hash of the parent block.
    pub parent_block_hash: [u8; 32],
}

/// Keys touched by a program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Effects {
    /// Keys read.
    pub read_keys: BTreeSet<AlignedValue>,
    /// Keys written, incremented or removed.
    pub written_keys: BTreeSet<AlignedValue>,
}

impl Effects {
    /// Whether nothing was touched.
    pub fn is_empty(&self) -> bool {
        self.read_keys.is_empty() && self.written_keys.is_empty()
    }
}

/// The state a transcript program executes against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryContext {
    /// Current public state tree.
    pub state: StateValue,
    /// Contract being queried.
    pub address: ContractAddress,
    /// Coin commitments created so far, with their tree index.
    pub com_indices: BTreeMap<[u8; 32], u64>,
    /// Block facts.
    pub block: BlockContext,
    /// Accumulated effects.
    pub effects: Effects,
}

impl QueryContext {
    /// A context over `state` for `address`.
    pub fn new(state: StateValue, address: ContractAddress) -> Self {
        Self {
            state,
            address,
            com_indices: BTreeMap::new(),
            block: BlockContext::default(),
            effects: Effects::default(),
        }
    }

    /// Record a coin commitment at a tree index.
    #[must_use]
    pub fn insert_commitment(mut self, commitment: [u8; 32], index: u64) -> Self {
        self.com_indices.insert(commitment, index);
        self
    }

    /// Current value of the cell at `key`, if any.
    pub fn lookup(&self, key: &AlignedValue) -> Option<AlignedValue> {
        self.state.get(key).and_then(StateValue::as_cell).cloned()
    }

    /// Execute one op. `stack` holds reads not yet popped.
    pub fn query(
        &mut self,
        index: usize,
        op: &Op,
        stack: &mut Vec<Option<AlignedValue>>,
    ) -> Result<(), LedgerError> {
        trace!(index, ?op, "query");
        match op {
            Op::Noop { .. } | Op::Ckpt => {}
            Op::Read { key } => {
                let current = match self.state.get(key) {
                    None | Some(StateValue::Null) => None,
                    Some(StateValue::Cell(value)) => Some(value.clone()),
                    Some(_) => return Err(LedgerError::NotACell(key.to_string())),
                };
                self.effects.read_keys.insert(key.clone());
                stack.push(current);
            }
            Op::Popeq { result, .. } => {
                let observed = stack.pop().ok_or(LedgerError::EmptyStack { index })?;
                if &observed != result {
                    return Err(LedgerError::TranscriptMismatch {
                        index,
                        expected: render(result.as_ref()),
                        actual: render(observed.as_ref()),
                    });
                }
            }
            Op::Write { key, value } => {
                self.state
                    .map_mut()?
                    .insert(key.clone(), StateValue::Cell(value.clone()));
                self.effects.written_keys.insert(key.clone());
            }
            Op::Remove { key } => {
                self.state.map_mut()?.remove(key);
                self.effects.written_keys.insert(key.clone());
            }
            Op::Increment { key, amount } => {
                let current = match self.state.get(key) {
                    None | Some(StateValue::Null) => 0,
                    Some(StateValue::Cell(value)) => value
                        .to_u64()
                        .ok_or_else(|| LedgerError::NotACell(key.to_string()))?,
                    Some(_) => return Err(LedgerError::NotACell(key.to_string())),
                };
                let next = current
                    .checked_add(*amount)
                    .ok_or_else(|| LedgerError::Overflow(key.to_string()))?;
                self.state
                    .map_mut()?
                    .insert(key.clone(), StateValue::Cell(AlignedValue::from_u64(next)));
                self.effects.written_keys.insert(key.clone());
            }
        }
        Ok(())
    }

    /// Execute a whole program.
    pub fn run(&mut self, program: &[Op]) -> Result<(), LedgerError> {
        let mut stack = Vec::new();
        for (index, op) in program.iter().enumerate() {
            self.query(index, op, &mut stack)?;
        }
        Ok(())
    }
}

fn render(value: Option<&AlignedValue>) -> String {
    value.map_or_else(|| "<absent>".to_string(), ToString::to_string)
}

// =============================================================================
// GAS AND PARTITIONING
// =============================================================================

/// Per-op gas costs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostModel {
    /// Per `Noop` step.
    pub noop: u64,
    /// Per `Read`.
    pub read: u64,
    /// Per `Popeq`.
    pub popeq: u64,
    /// Per `Write` or `Remove`.
    pub write: u64,
    /// Per `Increment`.
    pub increment: u64,
    /// Per `Ckpt`.
    pub ckpt: u64,
}

impl CostModel {
    /// Gas charged for one op.
    pub fn cost(&self, op: &Op) -> u64 {
        match op {
            Op::Noop { n } => self.noop.saturating_mul(u64::from(*n)),
            Op::Read { .. } => self.read,
            Op::Popeq { .. } => self.popeq,
            Op::Write { .. } | Op::Remove { .. } => self.write,
            Op::Increment { .. } => self.increment,
            Op::Ckpt => self.ckpt,
        }
    }
}

/// Ledger-wide parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerParameters {
    /// Gas costs.
    pub cost_model: CostModel,
}

impl LedgerParameters {
    /// Parameters in force at genesis.
    pub fn initial() -> Self {
        Self {
            cost_model: CostModel {
                noop: 1,
                read: 10,
                popeq: 2,
                write: 25,
                increment: 30,
                ckpt: 1,
            },
        }
    }
}

impl Default for LedgerParameters {
    fn default() -> Self {
        Self::initial()
    }
}

/// A program with the context it started from.
#[derive(Debug, Clone)]
pub struct PreTranscript {
    /// Context before the first op.
    pub context: QueryContext,
    /// Recorded ops.
    pub program: Vec<Op>,
}

/// A replayed, costed segment of a program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    /// Total gas of the segment.
    pub gas: u64,
    /// Keys touched by the segment.
    pub effects: Effects,
    /// The segment's ops.
    pub program: Vec<Op>,
}

/// Guaranteed and fallible segments of one program.
pub type PartitionedTranscript = (Option<Transcript>, Option<Transcript>);

/// Replay each program against its starting context and split it at the
/// first checkpoint.
///
/// Returns one pair per input program, in order. Empty segments are `None`.
pub fn partition_transcripts(
    pre_transcripts: &[PreTranscript],
    parameters: &LedgerParameters,
) -> Result<Vec<PartitionedTranscript>, LedgerError> {
    pre_transcripts
        .iter()
        .map(|pre| {
            let split = pre
                .program
                .iter()
                .position(|op| matches!(op, Op::Ckpt))
                .unwrap_or(pre.program.len());
            let (guaranteed, rest) = pre.program.split_at(split);
            let fallible = rest.get(1..).unwrap_or_default();

            let mut context = pre.context.clone();
            context.effects = Effects::default();
            let mut stack = Vec::new();

            let guaranteed = replay_segment(&mut context, guaranteed, 0, &mut stack, parameters)?;
            let fallible =
                replay_segment(&mut context, fallible, split + 1, &mut stack, parameters)?;

            debug!(
                ops = pre.program.len(),
                guaranteed_gas = guaranteed.as_ref().map_or(0, |t| t.gas),
                fallible_gas = fallible.as_ref().map_or(0, |t| t.gas),
                "Partitioned transcript"
            );
            Ok((guaranteed, fallible))
        })
        .collect()
}

fn replay_segment(
    context: &mut QueryContext,
    ops: &[Op],
    offset: usize,
    stack: &mut Vec<Option<AlignedValue>>,
    parameters: &LedgerParameters,
) -> Result<Option<Transcript>, LedgerError> {
    if ops.is_empty() {
        return Ok(None);
    }
    let before = std::mem::take(&mut context.effects);
    let mut gas = 0u64;
    for (i, op) in ops.iter().enumerate() {
        context.query(offset + i, op, stack)?;
        gas = gas.saturating_add(parameters.cost_model.cost(op));
    }
    let effects = std::mem::replace(&mut context.effects, before);
    Ok(Some(Transcript {
        gas,
        effects,
        program: ops.to_vec(),
    }))
}
