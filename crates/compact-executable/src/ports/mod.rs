//! # Ports Layer
//!
//! - `inbound`: the API the engine offers
//! - `outbound`: the collaborators it depends on

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
