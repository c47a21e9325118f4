//! # Command Context
//!
//! Global options, resolved once, and the collaborators every command
//! builds from them.
//!
//! | Option | Alias | Environment | Default |
//! |--------|-------|-------------|---------|
//! | `--coin-public` | `-p` | `KEYS_COIN_PUBLIC` | none |
//! | `--signing` | `-s` | `KEYS_SIGNING` | none |
//! | `--network` | `-n` | `COMPACT_NETWORK` | `mainnet` |
//! | `--assets` | | `COMPACT_ASSETS_PATH` | bundled counter assets |
//! | `--log-level` | | `COMPACT_LOG_LEVEL` | `info` |
//!
//! Flags win over the environment; the last three fall back through
//! [`ExecutableConfig::with_env`].

use anyhow::{bail, Context, Result};
use clap::Args;
use compact_executable::adapters::{FileZkConfiguration, StaticKeyConfiguration};
use compact_executable::{ContractExecutable, ExecutableConfig};
use compact_reflection::{ArgumentParser, ContractReflection, FileContractReflection};
use counter_contract::{Counter, BUNDLED_ASSETS_BASE};
use shared_types::{NetworkAddress, SigningKey};
use std::path::PathBuf;

/// The counter contract wired to file-based assets and explicit keys.
pub type CounterExecutable =
    ContractExecutable<Counter, FileZkConfiguration, StaticKeyConfiguration>;

/// Options shared by every command.
#[derive(Debug, Clone, Args)]
pub struct GlobalOptions {
    /// A user public key capable of receiving Zswap coins, hex or Bech32m encoded
    #[arg(short = 'p', long = "coin-public", global = true, env = "KEYS_COIN_PUBLIC")]
    pub coin_public_key: Option<String>,

    /// The maintenance signing key, hex encoded
    #[arg(
        short = 's',
        long = "signing",
        global = true,
        env = "KEYS_SIGNING",
        hide_env_values = true
    )]
    pub signing_key: Option<String>,

    /// Network identifier
    #[arg(short, long, global = true)]
    pub network: Option<String>,

    /// Base directory that compiled contract assets are resolved against
    #[arg(long, global = true)]
    pub assets: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

impl GlobalOptions {
    /// Validate the options into a [`CommandContext`].
    pub fn resolve(&self) -> Result<CommandContext> {
        let defaults = ExecutableConfig {
            assets_path: PathBuf::from(BUNDLED_ASSETS_BASE),
            ..ExecutableConfig::default()
        }
        .with_env();
        let config = ExecutableConfig {
            assets_path: self.assets.clone().unwrap_or(defaults.assets_path),
            network: self.network.clone().unwrap_or(defaults.network),
            log_level: self.log_level.clone().unwrap_or(defaults.log_level),
        };

        let signing_key = self
            .signing_key
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(SigningKey::from_hex)
            .transpose()
            .context("Invalid signing key")?;

        let coin_public_key = self
            .coin_public_key
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        if let Some(key) = &coin_public_key {
            check_network(key, config.network_id())?;
        }

        Ok(CommandContext {
            config,
            coin_public_key,
            signing_key,
        })
    }
}

/// A Bech32m coin key must belong to the configured network.
fn check_network(coin_public_key: &str, network: Option<&str>) -> Result<()> {
    if !coin_public_key.starts_with("mn_") {
        return Ok(());
    }
    let address = NetworkAddress::parse(coin_public_key).context("Invalid coin public key")?;
    if address.network() != network {
        bail!(
            "Coin public key is encoded for network '{}' but the configured network is '{}'",
            address.network().unwrap_or("mainnet"),
            network.unwrap_or("mainnet")
        );
    }
    Ok(())
}

/// Resolved configuration for one command invocation.
#[derive(Clone)]
pub struct CommandContext {
    /// Assets base, network and log level.
    pub config: ExecutableConfig,
    coin_public_key: Option<String>,
    signing_key: Option<SigningKey>,
}

impl CommandContext {
    /// The configured signing key, if any.
    pub fn signing_key(&self) -> Option<&SigningKey> {
        self.signing_key.as_ref()
    }

    /// Fail unless a coin public key was given.
    pub fn require_coin_public_key(&self) -> Result<&str> {
        match self.coin_public_key.as_deref() {
            Some(key) => Ok(key),
            None => bail!("Missing coin public key; pass --coin-public or set KEYS_COIN_PUBLIC"),
        }
    }

    /// A fresh executable for the counter contract.
    pub fn executable(&self) -> CounterExecutable {
        ContractExecutable::new(
            counter_contract::compiled_contract(),
            FileZkConfiguration::new(self.config.assets_path.clone()),
            StaticKeyConfiguration::new(
                self.coin_public_key.clone().unwrap_or_default(),
                self.signing_key.clone(),
            ),
        )
    }

    /// Argument parser built from the counter's manifest.
    pub async fn argument_parser(&self, executable: &CounterExecutable) -> Result<ArgumentParser> {
        let parser = FileContractReflection::new(self.config.assets_path.clone())
            .create_argument_parser(executable.compiled_contract())
            .await?;
        Ok(parser)
    }
}
