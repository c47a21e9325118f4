//! # Shared Crypto - Signing and Hashing Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | BLAKE3 | Contract address derivation, key fingerprints |
//! | `signatures` | Ed25519 | Contract Maintenance Authority signing |
//!
//! ## Security Properties
//!
//! - **Ed25519**: Deterministic nonces, no RNG dependency when signing
//! - **Signing keys**: Secret material is zeroized on drop and never printed
//!   by `Debug`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod hashing;
pub mod signatures;

// Re-exports
pub use errors::CryptoError;
pub use hashing::{blake3_derive_key, blake3_hash, Hash};
pub use signatures::{Signature, SigningKey, VerifyingKey};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
