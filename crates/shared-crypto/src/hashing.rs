//! # BLAKE3 Hashing
//!
//! One-shot and domain-separated hashing used for contract addresses and
//! verifier key fingerprints.

/// BLAKE3 hash output (256-bit).
pub type Hash = [u8; 32];

/// Hash data with BLAKE3 (one-shot).
pub fn blake3_hash(data: &[u8]) -> Hash {
    *blake3::hash(data).as_bytes()
}

/// Derive a 32-byte value from a context string and input key material.
pub fn blake3_derive_key(context: &str, key_material: &[u8]) -> Hash {
    let mut hasher = blake3::Hasher::new_derive_key(context);
    hasher.update(key_material);
    *hasher.finalize().as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        assert_eq!(blake3_hash(b"test"), blake3_hash(b"test"));
        assert_ne!(blake3_hash(b"input1"), blake3_hash(b"input2"));
    }

    #[test]
    fn test_derive_key_is_context_bound() {
        let a = blake3_derive_key("compact contract address", b"state");
        let b = blake3_derive_key("compact verifier key", b"state");
        assert_ne!(a, b);
    }
}
