//! Deploy Command - Initialize a new contract instance

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use compact_executable::ports::ContractExecutableApi;
use compact_executable::ContractRuntimeError;
use counter_contract::CounterPrivateState;
use shared_types::{ContractAddress, ContractDeploy};
use tracing::info;

use crate::context::CommandContext;
use crate::files::{new_intent, write_contract_state, write_intent, write_json, write_text};

/// Initialize a new contract and write its deploy intent
#[derive(Args)]
pub struct DeployCommand {
    /// Arguments forwarded, in order, to the contract constructor
    #[arg(value_name = "ARG", allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Where the deploy intent is written
    #[arg(short, long, default_value = "output.bin")]
    pub output: PathBuf,

    /// Where the private state is written
    #[arg(long = "output-ps", default_value = "output.ps.json")]
    pub output_private_state: PathBuf,

    /// Where the Zswap local state is written
    #[arg(long = "output-zswap", default_value = "zswap.json")]
    pub output_zswap: PathBuf,

    /// Where the initial public state is written, ledger encoded
    #[arg(long = "output-public")]
    pub output_public: Option<PathBuf>,

    /// Where the maintenance signing key is written, hex encoded
    #[arg(long = "output-signing")]
    pub output_signing: Option<PathBuf>,
}

impl DeployCommand {
    /// Run the command, printing the new contract address.
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let address = self
            .deploy(ctx)
            .await
            .map_err(|err| ContractRuntimeError::with_cause("Failed to initialize contract", err))?;
        println!("{address}");
        Ok(())
    }

    /// Initialize and write every output, returning the new address.
    pub async fn deploy(&self, ctx: &CommandContext) -> Result<ContractAddress> {
        ctx.require_coin_public_key()?;
        let executable = ctx.executable();
        let parser = ctx.argument_parser(&executable).await?;
        let args = parser.parse_initialization_args(&self.args)?;

        let result = executable
            .initialize(CounterPrivateState::default(), &args)
            .await?;

        let deploy = ContractDeploy::new(result.public.contract_state.clone())?;
        let address = deploy.address;
        write_intent(&self.output, &new_intent().add_deploy(deploy)).await?;
        write_json(&self.output_private_state, &result.private.private_state).await?;
        write_json(&self.output_zswap, &result.private.zswap_local_state).await?;
        if let Some(path) = &self.output_public {
            write_contract_state(path, &result.public.contract_state).await?;
        }
        if let Some(path) = &self.output_signing {
            write_text(path, &result.private.signing_key.to_hex()).await?;
        }

        info!(%address, "Contract deployed");
        Ok(address)
    }
}
