//! # Key Configuration Adapters
//!
//! - [`EnvKeyConfiguration`]: keys from `KEYS_COIN_PUBLIC` / `KEYS_SIGNING`
//! - [`StaticKeyConfiguration`]: keys given explicitly

use crate::errors::ContractConfigurationError;
use crate::ports::outbound::{KeyConfiguration, Keys};
use async_trait::async_trait;
use shared_types::SigningKey;
use std::env;

/// Environment variable holding the coin public key.
pub const COIN_PUBLIC_KEY_VAR: &str = "KEYS_COIN_PUBLIC";

/// Environment variable holding the signing key.
pub const SIGNING_KEY_VAR: &str = "KEYS_SIGNING";

/// Keys given explicitly.
#[derive(Debug, Clone)]
pub struct StaticKeyConfiguration {
    keys: Keys,
}

impl StaticKeyConfiguration {
    /// Keys with a coin public key and an optional signing key.
    pub fn new(coin_public_key: impl Into<String>, signing_key: Option<SigningKey>) -> Self {
        Self {
            keys: Keys {
                coin_public_key: coin_public_key.into(),
                signing_key,
            },
        }
    }
}

#[async_trait]
impl KeyConfiguration for StaticKeyConfiguration {
    async fn keys(&self) -> Result<Keys, ContractConfigurationError> {
        Ok(self.keys.clone())
    }
}

/// Keys read from the environment.
#[derive(Debug, Clone)]
pub struct EnvKeyConfiguration {
    inner: StaticKeyConfiguration,
}

impl EnvKeyConfiguration {
    /// Read keys from the environment.
    ///
    /// # Environment Variables
    ///
    /// - `KEYS_COIN_PUBLIC`: Coin public key (required)
    /// - `KEYS_SIGNING`: Hex signing key (optional)
    pub fn from_env() -> Result<Self, ContractConfigurationError> {
        let coin_public_key = env::var(COIN_PUBLIC_KEY_VAR).map_err(|err| {
            ContractConfigurationError::new(format!("Missing {COIN_PUBLIC_KEY_VAR}"))
                .with_cause(err)
        })?;

        let signing_key = env::var(SIGNING_KEY_VAR)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(|value| SigningKey::from_hex(value.trim()))
            .transpose()
            .map_err(|err| {
                ContractConfigurationError::new(format!("Invalid {SIGNING_KEY_VAR}")).with_cause(err)
            })?;

        Ok(Self {
            inner: StaticKeyConfiguration::new(coin_public_key, signing_key),
        })
    }
}

#[async_trait]
impl KeyConfiguration for EnvKeyConfiguration {
    async fn keys(&self) -> Result<Keys, ContractConfigurationError> {
        self.inner.keys().await
    }
}
