//! Cross-crate integration flows.

mod cli_flows;
mod engine_flows;
mod maintenance;

#[cfg(test)]
pub(crate) mod fixtures {
    use compact_cli::CounterExecutable;
    use compact_executable::adapters::{FileZkConfiguration, StaticKeyConfiguration};
    use compact_executable::ContractExecutable;
    use counter_contract::BUNDLED_ASSETS_BASE;
    use shared_types::SigningKey;
    use tracing_subscriber::EnvFilter;

    pub const COIN_KEY: &str = "d2dc8d175c0ef7d1f7e5b7f32bd9da5fcd4c60fa1b651f1d312986269c2d3c79";

    /// Route engine logs through the test harness.
    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    /// The counter against its bundled assets.
    pub fn counter(signing_key: Option<SigningKey>) -> CounterExecutable {
        ContractExecutable::new(
            counter_contract::compiled_contract(),
            FileZkConfiguration::new(BUNDLED_ASSETS_BASE),
            StaticKeyConfiguration::new(COIN_KEY, signing_key),
        )
    }
}
