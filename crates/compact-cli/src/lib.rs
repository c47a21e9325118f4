//! # compact-cli
//!
//! Command surface over the counter contract: reflection parses textual
//! arguments, the engine executes, and results land in files.
//!
//! | Command | Reads | Writes |
//! |---------|-------|--------|
//! | `deploy [ARGS]` | | deploy intent, private state, Zswap state |
//! | `circuit <ADDRESS> <CIRCUIT_ID> [ARGS]` | state, private state, Zswap state | call intent, result, private state, Zswap state |
//! | `maintain contract <ADDRESS> <NEW_SIGNING_KEY>` | state | maintenance intent |
//! | `maintain circuit <ADDRESS> <CIRCUIT_ID> [VK_PATH]` | state, verifier key | maintenance intent |
//!
//! Failures surface as a `ContractRuntimeError` naming the command's
//! operation, rendered with its cause chain by [`report::render`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod commands;
pub mod context;
pub mod files;
pub mod logging;
pub mod report;

pub use context::{CommandContext, CounterExecutable, GlobalOptions};
