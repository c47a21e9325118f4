//! # Contract Model
//!
//! The shape every executable contract has: a constructor producing initial
//! state, and a set of named impure circuits. Contracts are generic over the
//! private state type they thread through calls.

use super::runtime::{
    CircuitContext, CircuitResults, CompactError, ConstructorContext, ConstructorResult,
    WitnessContext,
};
use super::value::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub use shared_types::VerifierKey;

/// Identifier of an impure circuit.
pub type ImpureCircuitId = String;

/// An impure circuit implementation.
pub type ImpureCircuit<PS> =
    Arc<dyn Fn(CircuitContext<PS>, &[Value]) -> Result<CircuitResults<PS>, CompactError> + Send + Sync>;

/// A witness implementation: returns the new private state and a value.
pub type WitnessFn<PS> =
    Arc<dyn Fn(WitnessContext<'_, PS>, &[Value]) -> Result<(PS, Value), CompactError> + Send + Sync>;

/// A compiled contract instance.
pub trait Contract: Send + Sync + 'static {
    /// Off-chain state threaded through every call.
    type PrivateState: Clone + Send + Sync + 'static;

    /// Ids of the impure circuits, in declaration order.
    fn impure_circuit_ids(&self) -> Vec<ImpureCircuitId>;

    /// Run the constructor.
    fn initial_state(
        &self,
        context: ConstructorContext<Self::PrivateState>,
        args: &[Value],
    ) -> Result<ConstructorResult<Self::PrivateState>, CompactError>;

    /// Look up an impure circuit.
    fn impure_circuit(&self, id: &str) -> Option<ImpureCircuit<Self::PrivateState>>;
}

/// Named witness implementations.
pub struct Witnesses<PS> {
    functions: BTreeMap<String, WitnessFn<PS>>,
}

impl<PS> Witnesses<PS> {
    /// No witnesses.
    pub fn new() -> Self {
        Self {
            functions: BTreeMap::new(),
        }
    }

    /// Add a witness.
    #[must_use]
    pub fn with<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(WitnessContext<'_, PS>, &[Value]) -> Result<(PS, Value), CompactError>
            + Send
            + Sync
            + 'static,
    {
        self.functions.insert(name.into(), Arc::new(function));
        self
    }

    /// Look up a witness.
    pub fn get(&self, name: &str) -> Option<&WitnessFn<PS>> {
        self.functions.get(name)
    }

    /// Whether `name` is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Names of all witnesses.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }
}

impl<PS> Default for Witnesses<PS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<PS> Clone for Witnesses<PS> {
    fn clone(&self) -> Self {
        Self {
            functions: self.functions.clone(),
        }
    }
}

impl<PS> fmt::Debug for Witnesses<PS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
