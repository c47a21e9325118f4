//! # Domain Layer (Inner Hexagon)
//!
//! Contract model, runtime contexts and result types.
//! NO I/O, NO async.

pub mod compiled;
pub mod contract;
pub mod invariants;
pub mod results;
pub mod runtime;
pub mod value;

pub use compiled::*;
pub use contract::*;
pub use invariants::*;
pub use results::*;
pub use runtime::*;
pub use value::*;
