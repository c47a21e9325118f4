//! Maintain Command - Contract maintenance operations

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use compact_executable::domain::{ContractContext, MaintenanceResult};
use compact_executable::ports::ContractExecutableApi;
use compact_executable::ContractRuntimeError;
use shared_types::{ContractAddress, SigningKey, VerifierKey};
use tracing::info;

use crate::context::CommandContext;
use crate::files::{new_intent, read_bytes, read_contract_state, write_intent};

/// Contract maintenance operations
#[derive(Args)]
pub struct MaintainCommand {
    #[command(subcommand)]
    action: MaintainAction,
}

/// Files every maintenance operation reads and writes.
#[derive(Args)]
pub struct MaintenanceFiles {
    /// Where the current on-chain state can be read, ledger encoded
    #[arg(short, long)]
    pub input: PathBuf,

    /// Where the maintenance intent is written
    #[arg(short, long, default_value = "output.bin")]
    pub output: PathBuf,
}

#[derive(Subcommand)]
enum MaintainAction {
    /// Replace the contract maintenance authority
    Contract {
        /// A contract address, hex encoded
        address: ContractAddress,

        /// The new signing key, hex encoded
        #[arg(value_parser = SigningKey::from_hex)]
        new_signing_key: SigningKey,

        #[command(flatten)]
        files: MaintenanceFiles,
    },

    /// Insert or replace a circuit's verifier key, or remove it when no key is given
    Circuit {
        /// A contract address, hex encoded
        address: ContractAddress,

        /// A circuit identifier
        circuit_id: String,

        /// A path to a verifier key
        vk_path: Option<PathBuf>,

        #[command(flatten)]
        files: MaintenanceFiles,
    },
}

impl MaintainCommand {
    /// Run the command.
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        self.action.run(ctx).await.map_err(|err| {
            ContractRuntimeError::with_cause("Failed to apply maintenance operation", err)
        })?;
        Ok(())
    }
}

impl MaintainAction {
    async fn run(self, ctx: &CommandContext) -> Result<()> {
        let executable = ctx.executable();
        let (result, files) = match self {
            MaintainAction::Contract {
                address,
                new_signing_key,
                files,
            } => {
                let context = load_context(address, &files).await?;
                let result = executable
                    .replace_contract_maintenance_authority(Some(new_signing_key), &context)
                    .await?;
                info!(%address, "Maintenance authority replaced");
                (result, files)
            }
            MaintainAction::Circuit {
                address,
                circuit_id,
                vk_path: Some(path),
                files,
            } => {
                let context = load_context(address, &files).await?;
                let verifier_key = VerifierKey::new(read_bytes(&path).await?);
                let result = executable
                    .add_or_replace_contract_operation(&circuit_id, verifier_key, &context)
                    .await?;
                info!(%address, circuit = %circuit_id, "Verifier key inserted");
                (result, files)
            }
            MaintainAction::Circuit {
                address,
                circuit_id,
                vk_path: None,
                files,
            } => {
                let context = load_context(address, &files).await?;
                let result = executable
                    .remove_contract_operation(&circuit_id, &context)
                    .await?;
                info!(%address, circuit = %circuit_id, "Verifier key removed");
                (result, files)
            }
        };
        write_update(result, &files).await
    }
}

async fn load_context(address: ContractAddress, files: &MaintenanceFiles) -> Result<ContractContext> {
    Ok(ContractContext {
        address,
        contract_state: read_contract_state(&files.input).await?,
    })
}

async fn write_update(result: MaintenanceResult, files: &MaintenanceFiles) -> Result<()> {
    let intent = new_intent().add_maintenance_update(result.public.maintenance_update);
    write_intent(&files.output, &intent).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::DeployCommand;
    use crate::context::GlobalOptions;
    use shared_types::{Intent, IntentAction, MaintenanceUpdate, SingleUpdate};
    use tempfile::TempDir;

    const COIN_KEY: &str = "d2dc8d175c0ef7d1f7e5b7f32bd9da5fcd4c60fa1b651f1d312986269c2d3c79";

    fn context(signing_key: Option<&SigningKey>) -> CommandContext {
        GlobalOptions {
            coin_public_key: Some(COIN_KEY.into()),
            signing_key: signing_key.map(SigningKey::to_hex),
            network: Some("mainnet".into()),
            assets: None,
            log_level: Some("info".into()),
        }
        .resolve()
        .unwrap()
    }

    async fn deployed(dir: &TempDir, ctx: &CommandContext) -> (ContractAddress, MaintenanceFiles) {
        let deploy = DeployCommand {
            args: vec![],
            output: dir.path().join("deploy.bin"),
            output_private_state: dir.path().join("deploy.ps.json"),
            output_zswap: dir.path().join("deploy.zswap.json"),
            output_public: Some(dir.path().join("state.bin")),
            output_signing: None,
        };
        let address = deploy.deploy(ctx).await.unwrap();
        let files = MaintenanceFiles {
            input: dir.path().join("state.bin"),
            output: dir.path().join("maintain.bin"),
        };
        (address, files)
    }

    fn written_update(path: &std::path::Path) -> MaintenanceUpdate {
        let intent = Intent::from_bytes(&std::fs::read(path).unwrap()).unwrap();
        match intent.actions.as_slice() {
            [IntentAction::Maintenance(update)] => update.clone(),
            other => panic!("unexpected actions: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_remove_circuit_writes_signed_update() {
        let dir = TempDir::new().unwrap();
        let key = SigningKey::sample();
        let ctx = context(Some(&key));
        let (address, files) = deployed(&dir, &ctx).await;
        let output = files.output.clone();

        MaintainAction::Circuit {
            address,
            circuit_id: "increment".into(),
            vk_path: None,
            files,
        }
        .run(&ctx)
        .await
        .unwrap();

        let update = written_update(&output);
        assert_eq!(update.address, address);
        assert_eq!(update.counter, 0);
        assert_eq!(update.signatures.len(), 1);
        assert!(matches!(
            update.updates.as_slice(),
            [SingleUpdate::VerifierKeyRemove { operation, .. }] if operation == "increment"
        ));
    }

    #[tokio::test]
    async fn test_insert_circuit_reads_verifier_key() {
        let dir = TempDir::new().unwrap();
        let key = SigningKey::sample();
        let ctx = context(Some(&key));
        let (address, files) = deployed(&dir, &ctx).await;
        let output = files.output.clone();
        let vk_path = dir.path().join("touch.verifier");
        std::fs::write(&vk_path, b"touch verifier key").unwrap();

        MaintainAction::Circuit {
            address,
            circuit_id: "touch".into(),
            vk_path: Some(vk_path),
            files,
        }
        .run(&ctx)
        .await
        .unwrap();

        match written_update(&output).updates.as_slice() {
            [SingleUpdate::VerifierKeyInsert {
                operation,
                verifier_key,
            }] => {
                assert_eq!(operation, "touch");
                assert_eq!(verifier_key.verifier_key.as_bytes(), b"touch verifier key");
            }
            other => panic!("unexpected updates: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_replace_authority_without_signing_key_fails() {
        let dir = TempDir::new().unwrap();
        let (address, files) = deployed(&dir, &context(None)).await;

        let command = MaintainCommand {
            action: MaintainAction::Contract {
                address,
                new_signing_key: SigningKey::sample(),
                files,
            },
        };
        let err = command.execute(&context(None)).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to apply maintenance operation");
        assert!(crate::report::render(&err)
            .contains("Signing key required to authorize contract maintenance update"));
    }
}
