//! # Adapters Layer (Outer Hexagon)
//!
//! Implementations of the outbound ports.

pub mod in_memory;
pub mod keys;
pub mod partitioner;
pub mod zk_file;

pub use in_memory::*;
pub use keys::*;
pub use partitioner::*;
pub use zk_file::*;
