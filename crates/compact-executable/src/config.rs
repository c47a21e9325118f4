//! Executable configuration from environment variables.

use std::env;
use std::path::PathBuf;

/// Where compiled assets live and which network addresses are rendered for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutableConfig {
    /// Base directory that compiled asset paths are resolved against.
    pub assets_path: PathBuf,

    /// Network identifier (mainnet, preview, undeployed, ...)
    pub network: String,

    /// Log level filter (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ExecutableConfig {
    fn default() -> Self {
        Self {
            assets_path: PathBuf::from("."),
            network: "mainnet".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl ExecutableConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `COMPACT_ASSETS_PATH`: Assets base directory (default: .)
    /// - `COMPACT_NETWORK`: Network name (default: mainnet)
    /// - `COMPACT_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Replace each field whose environment variable is set.
    #[must_use]
    pub fn with_env(self) -> Self {
        Self {
            assets_path: env::var_os("COMPACT_ASSETS_PATH")
                .map(PathBuf::from)
                .unwrap_or(self.assets_path),

            network: env::var("COMPACT_NETWORK").unwrap_or(self.network),

            log_level: env::var("COMPACT_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or(self.log_level),
        }
    }

    /// Network id for address rendering; `None` on mainnet.
    pub fn network_id(&self) -> Option<&str> {
        match self.network.as_str() {
            "mainnet" => None,
            other => Some(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExecutableConfig::default();
        assert_eq!(config.assets_path, PathBuf::from("."));
        assert_eq!(config.network_id(), None);
    }

    #[test]
    fn test_network_id() {
        let config = ExecutableConfig {
            network: "undeployed".into(),
            ..ExecutableConfig::default()
        };
        assert_eq!(config.network_id(), Some("undeployed"));
    }

    #[test]
    fn test_from_env() {
        env::set_var("COMPACT_ASSETS_PATH", "/srv/assets");
        env::set_var("COMPACT_NETWORK", "preview");
        env::set_var("COMPACT_LOG_LEVEL", "debug");

        let config = ExecutableConfig::from_env();
        assert_eq!(config.assets_path, PathBuf::from("/srv/assets"));
        assert_eq!(config.network_id(), Some("preview"));
        assert_eq!(config.log_level, "debug");

        env::remove_var("COMPACT_ASSETS_PATH");
        env::remove_var("COMPACT_NETWORK");
        env::remove_var("COMPACT_LOG_LEVEL");

        let bundled = ExecutableConfig {
            assets_path: PathBuf::from("bundled"),
            ..ExecutableConfig::default()
        }
        .with_env();
        assert_eq!(bundled.assets_path, PathBuf::from("bundled"));
        assert_eq!(bundled.network, "mainnet");
    }
}
