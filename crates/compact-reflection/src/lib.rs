//! # compact-reflection
//!
//! Type reflection and argument coercion for compiled contracts.
//!
//! ## Overview
//!
//! - **Manifest**: constructor and circuit signatures as a tagged type tree
//! - **Literal**: parser for array, tuple and object arguments
//! - **Coercion**: strings to typed values, first failure wins
//! - **Reflector**: loads a manifest and builds an [`ArgumentParser`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use compact_reflection::{ContractReflection, FileContractReflection};
//!
//! let parser = FileContractReflection::new(&config.assets_path)
//!     .create_argument_parser(&compiled_contract)
//!     .await?;
//! let args = parser.parse_circuit_args("add", &["5"])?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod coercion;
pub mod errors;
pub mod literal;
pub mod manifest;
pub mod reflector;

pub use coercion::coerce;
pub use errors::{ArgumentError, CoercionCause, CoercionError, ReflectionError};
pub use literal::{Literal, LiteralError, MAX_DEPTH};
pub use manifest::{ContractManifest, Parameter, TypeDescriptor, MANIFEST_VERSION};
pub use reflector::{ArgumentParser, ContractReflection, FileContractReflection};
