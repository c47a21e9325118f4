//! # Error Types
//!
//! Coercion failures nest: the outermost error names the argument index,
//! the next names the input text and its expected type, and the innermost
//! says what went wrong.
//!
//! ```text
//! Failed to parse argument with index 0
//!   .. Failed to parse string '[100, maybe]' as type of [bigint, boolean]
//!   .. Invalid identifier 'maybe' at position 6
//! ```

use crate::literal::LiteralError;
use crate::manifest::MANIFEST_VERSION;
use compact_executable::ContractRuntimeError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// COERCION
// =============================================================================

/// Arguments could not be coerced to their declared types.
#[derive(Debug, Error)]
pub enum CoercionError {
    /// Wrong number of arguments.
    #[error("Invalid number of arguments. Expected {expected} arguments, but got {actual}")]
    Arity {
        /// Declared parameter count.
        expected: usize,
        /// Given argument count.
        actual: usize,
    },

    /// One positional argument failed.
    #[error("Failed to parse argument with index {index}")]
    Argument {
        /// Zero-based position.
        index: usize,
        /// What failed.
        #[source]
        source: ArgumentError,
    },

    /// One struct field failed.
    #[error("Failed to parse field '{name}'")]
    Field {
        /// Field name.
        name: String,
        /// What failed.
        #[source]
        source: ArgumentError,
    },
}

/// A single input could not be read as its expected type.
#[derive(Debug, Error)]
#[error("Failed to parse string '{input}' as type of {expected}")]
pub struct ArgumentError {
    /// The input text.
    pub input: String,
    /// Rendering of the expected type.
    pub expected: String,
    /// Underlying cause.
    #[source]
    pub cause: CoercionCause,
}

/// Why an input did not fit its type.
#[derive(Debug, Error)]
pub enum CoercionCause {
    /// Not a finite decimal number.
    #[error("Cannot convert {0} to a number")]
    InvalidNumber(String),

    /// Not a decimal integer.
    #[error("Cannot convert {0} to a BigInt")]
    InvalidBigInt(String),

    /// Neither `true` nor `false`.
    #[error("Cannot convert {0} to a Boolean")]
    InvalidBoolean(String),

    /// Not a string literal.
    #[error("Cannot convert {0} to a string")]
    NotAString(String),

    /// Not an array literal.
    #[error("Cannot convert {0} to an array")]
    NotAnArray(String),

    /// Not an object literal.
    #[error("Cannot convert {0} to an object literal")]
    NotAnObject(String),

    /// A declared field is absent.
    #[error("Missing field '{0}'")]
    MissingField(String),

    /// A field is not declared.
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    /// Neither a network address nor hex.
    #[error("Cannot convert {input} to a Uint8Array: {reason}")]
    InvalidBytes {
        /// The input text.
        input: String,
        /// The hex decoding failure.
        reason: String,
    },

    /// Literal syntax error.
    #[error(transparent)]
    Literal(#[from] LiteralError),

    /// Failure inside an array, tuple or struct element.
    #[error(transparent)]
    Nested(#[from] Box<CoercionError>),
}

impl From<CoercionError> for ContractRuntimeError {
    fn from(err: CoercionError) -> Self {
        match err {
            CoercionError::Arity { .. } => ContractRuntimeError::new(err.to_string()),
            CoercionError::Argument { index, source } => ContractRuntimeError::with_cause(
                format!("Failed to parse argument with index {index}"),
                source,
            ),
            CoercionError::Field { name, source } => {
                ContractRuntimeError::with_cause(format!("Failed to parse field '{name}'"), source)
            }
        }
    }
}

// =============================================================================
// REFLECTION
// =============================================================================

/// A contract's manifest could not be loaded.
#[derive(Debug, Error)]
pub enum ReflectionError {
    /// The compiled contract has no assets path.
    #[error("Compiled assets for contract '{0}' are not resolved")]
    UnresolvedAssets(String),

    /// The manifest could not be read.
    #[error("Failed to read contract manifest '{}'", path.display())]
    Io {
        /// Manifest path.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: io::Error,
    },

    /// The manifest is not valid JSON of the expected shape.
    #[error("Malformed contract manifest '{}'", path.display())]
    Malformed {
        /// Manifest path.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: serde_json::Error,
    },

    /// The manifest was written for another format version.
    #[error("Unsupported manifest version {found} in '{}' (expected {MANIFEST_VERSION})", path.display())]
    UnsupportedVersion {
        /// Manifest path.
        path: PathBuf,
        /// Version found.
        found: u32,
    },
}
