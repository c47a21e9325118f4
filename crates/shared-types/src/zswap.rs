//! # Zswap Local State
//!
//! A party's bookkeeping of shielded coins, plus the encoded wire form used
//! when the state crosses a call boundary (files, JSON, other processes).
//!
//! The encoded form keeps byte fields as plain number arrays and 64/128-bit
//! integers as decimal strings.

use crate::entities::{CoinPublicKey, ContractAddress};
use crate::errors::LedgerError;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

/// A shielded coin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShieldedCoinInfo {
    /// Coin nonce.
    pub nonce: [u8; 32],
    /// Token type.
    pub color: [u8; 32],
    /// Amount.
    pub value: u128,
}

/// A shielded coin with its position in the commitment tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualifiedShieldedCoinInfo {
    /// Coin nonce.
    pub nonce: [u8; 32],
    /// Token type.
    pub color: [u8; 32],
    /// Amount.
    pub value: u128,
    /// Merkle tree index.
    pub mt_index: u64,
}

/// Who receives an output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    /// A user, by coin public key.
    User(CoinPublicKey),
    /// A contract.
    Contract(ContractAddress),
}

/// A coin produced by a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZswapOutput {
    /// The coin.
    pub coin_info: ShieldedCoinInfo,
    /// Its recipient.
    pub recipient: Recipient,
}

/// Local shielded state of one party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZswapLocalState {
    /// Owner key.
    pub coin_public_key: CoinPublicKey,
    /// Next free commitment tree index.
    pub current_index: u64,
    /// Coins spent by calls.
    pub inputs: Vec<QualifiedShieldedCoinInfo>,
    /// Coins produced by calls.
    pub outputs: Vec<ZswapOutput>,
}

impl ZswapLocalState {
    /// Fresh state for `coin_public_key`.
    pub fn new(coin_public_key: CoinPublicKey) -> Self {
        Self {
            coin_public_key,
            current_index: 0,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Convert to the wire form.
    pub fn encode(&self) -> EncodedZswapLocalState {
        EncodedZswapLocalState {
            coin_public_key: EncodedBytes::from(self.coin_public_key.as_bytes().as_slice()),
            current_index: self.current_index,
            inputs: self
                .inputs
                .iter()
                .map(|coin| EncodedQualifiedShieldedCoinInfo {
                    nonce: coin.nonce.to_vec(),
                    color: coin.color.to_vec(),
                    value: coin.value,
                    mt_index: coin.mt_index,
                })
                .collect(),
            outputs: self
                .outputs
                .iter()
                .map(|output| {
                    let (is_left, left, right) = match &output.recipient {
                        Recipient::User(key) => (
                            true,
                            EncodedBytes::from(key.as_bytes().as_slice()),
                            EncodedBytes::from([0u8; 32].as_slice()),
                        ),
                        Recipient::Contract(address) => (
                            false,
                            EncodedBytes::from([0u8; 32].as_slice()),
                            EncodedBytes::from(address.as_bytes().as_slice()),
                        ),
                    };
                    EncodedZswapOutput {
                        coin_info: EncodedShieldedCoinInfo {
                            nonce: output.coin_info.nonce.to_vec(),
                            color: output.coin_info.color.to_vec(),
                            value: output.coin_info.value,
                        },
                        recipient: EncodedRecipient {
                            is_left,
                            left,
                            right,
                        },
                    }
                })
                .collect(),
        }
    }
}

// =============================================================================
// WIRE FORM
// =============================================================================

/// A `{ "bytes": [...] }` wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedBytes {
    /// Raw bytes.
    pub bytes: Vec<u8>,
}

impl From<&[u8]> for EncodedBytes {
    fn from(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }
}

/// Wire form of [`QualifiedShieldedCoinInfo`].
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedQualifiedShieldedCoinInfo {
    /// Coin nonce.
    pub nonce: Vec<u8>,
    /// Token type.
    pub color: Vec<u8>,
    /// Amount.
    #[serde_as(as = "DisplayFromStr")]
    pub value: u128,
    /// Merkle tree index.
    #[serde_as(as = "DisplayFromStr")]
    pub mt_index: u64,
}

/// Wire form of [`ShieldedCoinInfo`].
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedShieldedCoinInfo {
    /// Coin nonce.
    pub nonce: Vec<u8>,
    /// Token type.
    pub color: Vec<u8>,
    /// Amount.
    #[serde_as(as = "DisplayFromStr")]
    pub value: u128,
}

/// Wire form of [`Recipient`]: `is_left` selects the user key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedRecipient {
    /// `true` for a user recipient.
    pub is_left: bool,
    /// User coin public key.
    pub left: EncodedBytes,
    /// Contract address.
    pub right: EncodedBytes,
}

/// Wire form of [`ZswapOutput`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedZswapOutput {
    /// The coin.
    pub coin_info: EncodedShieldedCoinInfo,
    /// Its recipient.
    pub recipient: EncodedRecipient,
}

/// Wire form of [`ZswapLocalState`].
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedZswapLocalState {
    /// Owner key.
    pub coin_public_key: EncodedBytes,
    /// Next free commitment tree index.
    #[serde_as(as = "DisplayFromStr")]
    pub current_index: u64,
    /// Spent coins.
    pub inputs: Vec<EncodedQualifiedShieldedCoinInfo>,
    /// Produced coins.
    pub outputs: Vec<EncodedZswapOutput>,
}

impl EncodedZswapLocalState {
    /// Wire form of an empty state.
    pub fn empty(coin_public_key: &CoinPublicKey) -> Self {
        ZswapLocalState::new(*coin_public_key).encode()
    }

    /// Convert back from the wire form, checking byte lengths.
    pub fn decode(&self) -> Result<ZswapLocalState, LedgerError> {
        let coin_public_key =
            CoinPublicKey::from_bytes(fixed("coin public key", &self.coin_public_key.bytes)?);

        let inputs = self
            .inputs
            .iter()
            .map(|coin| {
                Ok(QualifiedShieldedCoinInfo {
                    nonce: fixed("nonce", &coin.nonce)?,
                    color: fixed("color", &coin.color)?,
                    value: coin.value,
                    mt_index: coin.mt_index,
                })
            })
            .collect::<Result<Vec<_>, LedgerError>>()?;

        let outputs = self
            .outputs
            .iter()
            .map(|output| {
                let recipient = if output.recipient.is_left {
                    Recipient::User(CoinPublicKey::from_bytes(fixed(
                        "coin public key",
                        &output.recipient.left.bytes,
                    )?))
                } else {
                    Recipient::Contract(ContractAddress::from_bytes(fixed(
                        "contract address",
                        &output.recipient.right.bytes,
                    )?))
                };
                Ok(ZswapOutput {
                    coin_info: ShieldedCoinInfo {
                        nonce: fixed("nonce", &output.coin_info.nonce)?,
                        color: fixed("color", &output.coin_info.color)?,
                        value: output.coin_info.value,
                    },
                    recipient,
                })
            })
            .collect::<Result<Vec<_>, LedgerError>>()?;

        Ok(ZswapLocalState {
            coin_public_key,
            current_index: self.current_index,
            inputs,
            outputs,
        })
    }
}

fn fixed<const N: usize>(what: &'static str, bytes: &[u8]) -> Result<[u8; N], LedgerError> {
    <[u8; N]>::try_from(bytes).map_err(|_| LedgerError::InvalidLength {
        what,
        expected: N,
        actual: bytes.len(),
    })
}
