//! # Compact Executable Test Suite
//!
//! Workspace-level flows that cross crate boundaries.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── engine_flows.rs   # initialize → circuit on the counter contract
//!     ├── maintenance.rs    # authority counter across applied updates
//!     └── cli_flows.rs      # deploy → circuit → maintain through files
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p compact-tests
//! cargo test -p compact-tests integration::maintenance::
//! ```

pub mod integration;
