//! # compact-executable
//!
//! Turns a compiled contract into an executable one: deploy it, invoke its
//! impure circuits, and authorize maintenance updates against a deployed
//! instance.
//!
//! ## Overview
//!
//! This crate provides:
//! - **Initialize**: run the constructor, attach verifier keys, install a
//!   single-key maintenance authority
//! - **Circuit**: execute an impure circuit and partition its transcript
//! - **Maintenance**: build and sign authority replacement and verifier key
//!   updates
//!
//! ## Architecture
//!
//! ```text
//! CompiledContract ──→ ContractExecutable ──→ DeployResult / CallResult / MaintenanceResult
//!                          │
//!                          ├── ZkConfiguration      (verifier keys)
//!                          ├── KeyConfiguration     (coin + signing keys)
//!                          └── TranscriptPartitioner (guaranteed / fallible split)
//! ```
//!
//! ## Error Classes
//!
//! | Error | Typical cause |
//! |-------|---------------|
//! | `ContractConfigurationError` | Bad coin key, missing signing key |
//! | `ContractRuntimeError` | Constructor or circuit failure |
//! | `ZkConfigurationReadError` | Verifier key unreadable |
//!
//! ## Example
//!
//! ```rust,ignore
//! use compact_executable::prelude::*;
//!
//! let config = ExecutableConfig::from_env();
//! let executable = ContractExecutable::new(
//!     CompiledContract::make("counter", Counter::new)
//!         .with_witnesses(witnesses)
//!         .with_compiled_file_assets("managed/counter"),
//!     FileZkConfiguration::new(config.assets_path.clone()),
//!     EnvKeyConfiguration::from_env()?,
//! );
//!
//! let deployed = executable.initialize(CounterPrivateState::default(), &[]).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod ports;
pub mod service;

pub use config::ExecutableConfig;
pub use errors::{
    ContractConfigurationError, ContractExecutionError, ContractRuntimeError,
    ZkConfigurationReadError,
};
pub use service::ContractExecutable;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything needed to make a contract executable.
pub mod prelude {
    pub use crate::adapters::{
        EnvKeyConfiguration, FileZkConfiguration, InMemoryZkConfiguration, LedgerPartitioner,
        StaticKeyConfiguration,
    };
    pub use crate::config::ExecutableConfig;
    pub use crate::domain::*;
    pub use crate::errors::*;
    pub use crate::ports::inbound::ContractExecutableApi;
    pub use crate::ports::outbound::{
        KeyConfiguration, Keys, TranscriptPartitioner, ZkConfiguration, ZkConfigurationReader,
    };
    pub use crate::service::ContractExecutable;
}
