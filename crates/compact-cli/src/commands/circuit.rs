//! Circuit Command - Invoke an impure circuit

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use compact_executable::domain::CircuitCallContext;
use compact_executable::ports::ContractExecutableApi;
use compact_executable::ContractRuntimeError;
use counter_contract::CounterPrivateState;
use shared_types::{ContractAddress, ContractCall, EncodedZswapLocalState};
use tracing::{debug, info};

use crate::context::CommandContext;
use crate::files::{new_intent, read_contract_state, read_json, write_contract_state, write_intent, write_json};

/// Invoke a circuit on a deployed contract and write its call intent
#[derive(Args)]
pub struct CircuitCommand {
    /// A contract address, hex encoded
    pub address: ContractAddress,

    /// A circuit identifier
    pub circuit_id: String,

    /// Arguments forwarded, in order, to the circuit
    #[arg(value_name = "ARG", allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Where the current on-chain state can be read, ledger encoded
    #[arg(short, long)]
    pub input: PathBuf,

    /// Where the current private state can be read
    #[arg(long = "input-ps")]
    pub input_private_state: PathBuf,

    /// Where the current Zswap local state can be read
    #[arg(long = "input-zswap")]
    pub input_zswap: Option<PathBuf>,

    /// Where the call intent is written
    #[arg(short, long, default_value = "output.bin")]
    pub output: PathBuf,

    /// Where the updated on-chain state is written, ledger encoded
    #[arg(long = "output-public")]
    pub output_public: Option<PathBuf>,

    /// Where the updated private state is written
    #[arg(long = "output-ps", default_value = "output.ps.json")]
    pub output_private_state: PathBuf,

    /// Where the updated Zswap local state is written
    #[arg(long = "output-zswap", default_value = "zswap.json")]
    pub output_zswap: PathBuf,

    /// Where the circuit result is written
    #[arg(long = "output-result", default_value = "result.json")]
    pub output_result: PathBuf,
}

impl CircuitCommand {
    /// Run the command, printing the circuit result.
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let result = self
            .invoke(ctx)
            .await
            .map_err(|err| ContractRuntimeError::with_cause("Failed to invoke circuit", err))?;
        println!("{}", serde_json::to_string_pretty(&result)?);
        Ok(())
    }

    /// Invoke the circuit and write every output, returning the result as JSON.
    pub async fn invoke(&self, ctx: &CommandContext) -> Result<serde_json::Value> {
        ctx.require_coin_public_key()?;
        let executable = ctx.executable();
        let parser = ctx.argument_parser(&executable).await?;

        let contract_state = read_contract_state(&self.input).await?;
        let private_state: Option<CounterPrivateState> =
            read_json(&self.input_private_state).await?;
        let zswap_local_state = match &self.input_zswap {
            Some(path) => Some(read_json::<EncodedZswapLocalState>(path).await?),
            None => None,
        };
        let args = parser.parse_circuit_args(&self.circuit_id, &self.args)?;

        let result = executable
            .circuit(
                &self.circuit_id,
                CircuitCallContext {
                    address: self.address,
                    contract_state: contract_state.clone(),
                    private_state: private_state.unwrap_or_default(),
                    zswap_local_state,
                },
                &args,
            )
            .await?;

        let operation = contract_state
            .operation(&self.circuit_id)
            .cloned()
            .with_context(|| {
                format!(
                    "Circuit '{}' is not an operation of contract {}",
                    self.circuit_id, self.address
                )
            })?;
        let (guaranteed_transcript, fallible_transcript) = result.public.partitioned_transcript;
        debug!(
            guaranteed = guaranteed_transcript.is_some(),
            fallible = fallible_transcript.is_some(),
            "Partitioned call transcript"
        );
        let call = ContractCall {
            address: self.address,
            entry_point: self.circuit_id.clone(),
            operation,
            guaranteed_transcript,
            fallible_transcript,
            private_transcript_outputs: result.private.private_transcript_outputs,
            input: result.private.input,
            output: result.private.output,
        };

        let rendered = result.private.result.to_json();
        if let Some(path) = &self.output_public {
            write_contract_state(path, &result.public.contract_state).await?;
        }
        write_json(&self.output_result, &rendered).await?;
        write_intent(&self.output, &new_intent().add_call(call)).await?;
        write_json(&self.output_private_state, &result.private.private_state).await?;
        write_json(&self.output_zswap, &result.private.zswap_local_state).await?;

        info!(address = %self.address, circuit = %self.circuit_id, "Circuit invoked");
        Ok(rendered)
    }
}
