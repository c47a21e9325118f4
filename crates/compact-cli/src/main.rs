//! Counter contract CLI
//!
//! # Usage
//!
//! ```bash
//! # Deploy, keeping the initial state for later calls
//! counter -p $COIN_KEY deploy --output-public state.bin
//!
//! # Invoke `add` on the deployed instance
//! counter -p $COIN_KEY circuit $ADDRESS add 5 -i state.bin --input-ps output.ps.json
//!
//! # Remove the verifier key of `increment`
//! counter -s $SIGNING_KEY maintain circuit $ADDRESS increment -i state.bin
//! ```

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use compact_cli::commands::{CircuitCommand, DeployCommand, MaintainCommand};
use compact_cli::{logging, report, GlobalOptions};

/// Counter contract command line
#[derive(Parser)]
#[command(name = "counter")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Deploy, invoke and maintain the counter contract", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new contract
    Deploy(DeployCommand),

    /// Invoke an impure circuit
    Circuit(CircuitCommand),

    /// Contract maintenance operations
    Maintain(MaintainCommand),
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", report::render(&err));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = cli.global.resolve()?;
    logging::init(&ctx.config.log_level)?;

    match cli.command {
        Commands::Deploy(cmd) => cmd.execute(&ctx).await,
        Commands::Circuit(cmd) => cmd.execute(&ctx).await,
        Commands::Maintain(cmd) => cmd.execute(&ctx).await,
    }
}
