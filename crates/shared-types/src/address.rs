//! # Network Addresses
//!
//! Bech32m encoding of self-describing, network-bound addresses.
//!
//! The human-readable part is `mn_<kind>` on mainnet and
//! `mn_<kind>_<network>` elsewhere, e.g. `mn_addr_undeployed` or
//! `mn_shield-cpk_preview`. Kinds may contain `-` but never `_`.

use crate::errors::LedgerError;
use bech32::{FromBase32, ToBase32, Variant};
use std::str::FromStr;

/// Prefix shared by every network address.
pub const ADDRESS_PREFIX: &str = "mn";

/// Kind tag of an unshielded (user) address.
pub const UNSHIELDED_ADDRESS_KIND: &str = "addr";

/// Kind tag of a shielded coin public key.
pub const COIN_PUBLIC_KEY_KIND: &str = "shield-cpk";

/// A decoded Bech32m network address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkAddress {
    kind: String,
    network: Option<String>,
    payload: Vec<u8>,
}

impl NetworkAddress {
    /// Build an address from its parts. `None` network means mainnet.
    pub fn new(kind: impl Into<String>, network: Option<String>, payload: Vec<u8>) -> Self {
        Self {
            kind: kind.into(),
            network,
            payload,
        }
    }

    /// Decode a Bech32m string.
    pub fn parse(encoded: &str) -> Result<Self, LedgerError> {
        let (hrp, data, variant) =
            bech32::decode(encoded).map_err(|err| LedgerError::InvalidAddress(err.to_string()))?;

        if variant != Variant::Bech32m {
            return Err(LedgerError::InvalidAddress(
                "expected Bech32m checksum, found Bech32".to_string(),
            ));
        }

        let mut parts = hrp.splitn(3, '_');
        let prefix = parts.next().unwrap_or_default();
        if prefix != ADDRESS_PREFIX {
            return Err(LedgerError::InvalidAddress(format!(
                "expected prefix '{ADDRESS_PREFIX}', found '{hrp}'"
            )));
        }

        let kind = match parts.next() {
            Some(kind) if !kind.is_empty() => kind.to_string(),
            _ => {
                return Err(LedgerError::InvalidAddress(format!(
                    "missing address kind in '{hrp}'"
                )))
            }
        };
        let network = parts.next().map(str::to_string);

        let payload =
            Vec::<u8>::from_base32(&data).map_err(|err| LedgerError::InvalidAddress(err.to_string()))?;

        Ok(Self {
            kind,
            network,
            payload,
        })
    }

    /// The human-readable part for this address.
    pub fn hrp(&self) -> String {
        match &self.network {
            Some(network) => format!("{ADDRESS_PREFIX}_{}_{network}", self.kind),
            None => format!("{ADDRESS_PREFIX}_{}", self.kind),
        }
    }

    /// Encode as a Bech32m string.
    pub fn encode(&self) -> Result<String, LedgerError> {
        bech32::encode(&self.hrp(), self.payload.to_base32(), Variant::Bech32m)
            .map_err(|err| LedgerError::InvalidAddress(err.to_string()))
    }

    /// Address kind, e.g. `addr`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Network id, `None` on mainnet.
    pub fn network(&self) -> Option<&str> {
        self.network.as_deref()
    }

    /// Raw payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Check the kind and take a fixed-size payload.
    pub fn into_fixed<const N: usize>(self, kind: &'static str) -> Result<[u8; N], LedgerError> {
        if self.kind != kind {
            return Err(LedgerError::InvalidAddress(format!(
                "expected address of kind '{kind}', found '{}'",
                self.kind
            )));
        }
        let actual = self.payload.len();
        <[u8; N]>::try_from(self.payload).map_err(|_| LedgerError::InvalidLength {
            what: kind,
            expected: N,
            actual,
        })
    }
}

impl FromStr for NetworkAddress {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// An unshielded user address (32-byte public key hash).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnshieldedAddress([u8; 32]);

impl UnshieldedAddress {
    /// Wrap raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Decode from `mn_addr[_network]1…`.
    pub fn from_bech32m(encoded: &str) -> Result<Self, LedgerError> {
        NetworkAddress::parse(encoded)?
            .into_fixed(UNSHIELDED_ADDRESS_KIND)
            .map(Self)
    }

    /// Encode for the given network (`None` is mainnet).
    pub fn to_bech32m(&self, network: Option<&str>) -> Result<String, LedgerError> {
        NetworkAddress::new(
            UNSHIELDED_ADDRESS_KIND,
            network.map(str::to_string),
            self.0.to_vec(),
        )
        .encode()
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}
