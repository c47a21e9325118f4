//! # Contract Manifest
//!
//! The interface description emitted next to a compiled contract, at
//! `{assets}/contract/manifest.json`. It lists the constructor's parameters
//! (context parameter excluded) and each impure circuit's parameters:
//!
//! ```json
//! {
//!   "version": 1,
//!   "constructor": [],
//!   "circuits": {
//!     "add": [{ "name": "amount", "type": { "kind": "BigInt" } }]
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Manifest version this crate understands.
pub const MANIFEST_VERSION: u32 = 1;

/// Folder under the compiled assets holding the manifest.
pub const CONTRACT_FOLDER: &str = "contract";

/// Manifest file name.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Declared type of a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TypeDescriptor {
    /// Floating point number.
    Number,
    /// Exact integer.
    BigInt,
    /// Text.
    String,
    /// `true` or `false`.
    Boolean,
    /// Homogeneous array.
    Array {
        /// Element type.
        element: Box<TypeDescriptor>,
    },
    /// Fixed-length heterogeneous sequence.
    Tuple {
        /// Element types, in order.
        elements: Vec<TypeDescriptor>,
    },
    /// Named fields, in declaration order.
    Struct {
        /// Field declarations.
        fields: Vec<Parameter>,
    },
    /// Raw byte sequence.
    Bytes,
}

impl TypeDescriptor {
    /// Array of `element`.
    pub fn array(element: TypeDescriptor) -> Self {
        TypeDescriptor::Array {
            element: Box::new(element),
        }
    }

    /// Tuple of `elements`.
    pub fn tuple(elements: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        TypeDescriptor::Tuple {
            elements: elements.into_iter().collect(),
        }
    }

    /// Struct of `(name, type)` fields.
    pub fn structure<N: Into<String>>(fields: impl IntoIterator<Item = (N, TypeDescriptor)>) -> Self {
        TypeDescriptor::Struct {
            fields: fields
                .into_iter()
                .map(|(name, ty)| Parameter::new(name, ty))
                .collect(),
        }
    }
}

/// Renders the way the contract's own source language spells the type.
impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Number => f.write_str("number"),
            TypeDescriptor::BigInt => f.write_str("bigint"),
            TypeDescriptor::String => f.write_str("string"),
            TypeDescriptor::Boolean => f.write_str("boolean"),
            TypeDescriptor::Array { element } => write!(f, "{element}[]"),
            TypeDescriptor::Tuple { elements } => {
                f.write_str("[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_str("]")
            }
            TypeDescriptor::Struct { fields } => {
                f.write_str("{ ")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", field.name, field.ty)?;
                }
                f.write_str(" }")
            }
            TypeDescriptor::Bytes => f.write_str("Uint8Array"),
        }
    }
}

/// A named, typed parameter or struct field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
}

impl Parameter {
    /// A parameter.
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A contract's manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractManifest {
    /// Format version.
    pub version: u32,
    /// Constructor parameters.
    pub constructor: Vec<Parameter>,
    /// Impure circuit parameters, by circuit id.
    pub circuits: BTreeMap<String, Vec<Parameter>>,
}

impl ContractManifest {
    /// An empty manifest at the current version.
    pub fn new() -> Self {
        Self {
            version: MANIFEST_VERSION,
            constructor: Vec::new(),
            circuits: BTreeMap::new(),
        }
    }

    /// Set the constructor parameters.
    #[must_use]
    pub fn with_constructor(mut self, parameters: Vec<Parameter>) -> Self {
        self.constructor = parameters;
        self
    }

    /// Add a circuit.
    #[must_use]
    pub fn with_circuit(mut self, id: impl Into<String>, parameters: Vec<Parameter>) -> Self {
        self.circuits.insert(id.into(), parameters);
        self
    }

    /// Parameter types of the constructor, in order.
    pub fn constructor_types(&self) -> Vec<TypeDescriptor> {
        self.constructor.iter().map(|p| p.ty.clone()).collect()
    }

    /// Parameter types of a circuit, in order.
    pub fn circuit_types(&self, id: &str) -> Option<Vec<TypeDescriptor>> {
        self.circuits
            .get(id)
            .map(|params| params.iter().map(|p| p.ty.clone()).collect())
    }
}

impl Default for ContractManifest {
    fn default() -> Self {
        Self::new()
    }
}
