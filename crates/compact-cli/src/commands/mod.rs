//! CLI Commands

mod circuit;
mod deploy;
mod maintain;

pub use circuit::CircuitCommand;
pub use deploy::DeployCommand;
pub use maintain::{MaintainCommand, MaintenanceFiles};
