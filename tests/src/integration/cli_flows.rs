//! # CLI Flows
//!
//! Commands chained through the files they read and write, the way a user
//! drives the `counter` binary.

#[cfg(test)]
mod tests {
    use super::super::fixtures::{init_tracing, COIN_KEY};
    use compact_cli::commands::{CircuitCommand, DeployCommand};
    use compact_cli::files::read_contract_state;
    use compact_cli::{report, CommandContext, GlobalOptions};
    use counter_contract::{round, CounterPrivateState};
    use shared_types::{ContractAddress, EncodedZswapLocalState, Intent, IntentAction, SigningKey};
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn context() -> CommandContext {
        GlobalOptions {
            coin_public_key: Some(COIN_KEY.into()),
            signing_key: Some(SigningKey::sample().to_hex()),
            network: Some("mainnet".into()),
            assets: None,
            log_level: Some("info".into()),
        }
        .resolve()
        .unwrap()
    }

    fn path(dir: &TempDir, name: &str) -> PathBuf {
        dir.path().join(name)
    }

    fn read_intent(path: &Path) -> Intent {
        Intent::from_bytes(&std::fs::read(path).unwrap()).unwrap()
    }

    async fn deploy(dir: &TempDir, ctx: &CommandContext) -> ContractAddress {
        DeployCommand {
            args: vec![],
            output: path(dir, "deploy.bin"),
            output_private_state: path(dir, "state.ps.json"),
            output_zswap: path(dir, "zswap.json"),
            output_public: Some(path(dir, "state.bin")),
            output_signing: Some(path(dir, "signing.key")),
        }
        .deploy(ctx)
        .await
        .unwrap()
    }

    fn circuit(dir: &TempDir, address: ContractAddress, id: &str, args: &[&str]) -> CircuitCommand {
        CircuitCommand {
            address,
            circuit_id: id.into(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
            input: path(dir, "state.bin"),
            input_private_state: path(dir, "state.ps.json"),
            input_zswap: Some(path(dir, "zswap.json")),
            output: path(dir, "call.bin"),
            output_public: Some(path(dir, "state.bin")),
            output_private_state: path(dir, "state.ps.json"),
            output_zswap: path(dir, "zswap.json"),
            output_result: path(dir, "result.json"),
        }
    }

    #[tokio::test]
    async fn test_deploy_writes_every_output() {
        init_tracing();
        let dir = TempDir::new().unwrap();
        let ctx = context();
        let address = deploy(&dir, &ctx).await;

        match read_intent(&path(&dir, "deploy.bin")).actions.as_slice() {
            [IntentAction::Deploy(deploy)] => {
                assert_eq!(deploy.address, address);
                assert_eq!(round(&deploy.initial_state), Some(0));
            }
            other => panic!("unexpected actions: {other:?}"),
        }

        let private_state: CounterPrivateState =
            serde_json::from_slice(&std::fs::read(path(&dir, "state.ps.json")).unwrap()).unwrap();
        assert_eq!(private_state, CounterPrivateState::default());

        let zswap: EncodedZswapLocalState =
            serde_json::from_slice(&std::fs::read(path(&dir, "zswap.json")).unwrap()).unwrap();
        assert!(zswap.decode().is_ok());

        let signing = std::fs::read_to_string(path(&dir, "signing.key")).unwrap();
        assert_eq!(Some(signing), ctx.signing_key().map(SigningKey::to_hex));
    }

    #[tokio::test]
    async fn test_deploy_then_circuits_chain_through_files() {
        let dir = TempDir::new().unwrap();
        let ctx = context();
        let address = deploy(&dir, &ctx).await;

        let result = circuit(&dir, address, "increment", &[]).invoke(&ctx).await.unwrap();
        assert_eq!(result, serde_json::Value::Null);

        let result = circuit(&dir, address, "add", &["5"]).invoke(&ctx).await.unwrap();
        assert_eq!(result, serde_json::json!("6"));

        let state = read_contract_state(&path(&dir, "state.bin")).await.unwrap();
        assert_eq!(round(&state), Some(6));

        let private_state: CounterPrivateState =
            serde_json::from_slice(&std::fs::read(path(&dir, "state.ps.json")).unwrap()).unwrap();
        assert_eq!(private_state.count, 1);

        let written: serde_json::Value =
            serde_json::from_slice(&std::fs::read(path(&dir, "result.json")).unwrap()).unwrap();
        assert_eq!(written, serde_json::json!("6"));

        match read_intent(&path(&dir, "call.bin")).actions.as_slice() {
            [IntentAction::Call(call)] => {
                assert_eq!(call.address, address);
                assert_eq!(call.entry_point, "add");
                assert!(call.operation.verifier_key.is_some());
                assert!(call.guaranteed_transcript.is_some());
            }
            other => panic!("unexpected actions: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_bad_argument_renders_cause_chain() {
        let dir = TempDir::new().unwrap();
        let ctx = context();
        let address = deploy(&dir, &ctx).await;

        let err = circuit(&dir, address, "add", &["five"])
            .execute(&ctx)
            .await
            .unwrap_err();
        let rendered = report::render(&err);

        assert!(rendered.starts_with(
            "Failed to invoke circuit\n(cause)\n.. Failed to parse argument with index 0\n"
        ));
        assert!(rendered.contains("   Failed to parse string 'five' as type of bigint"));
        assert!(!path(&dir, "call.bin").exists());
    }

    #[tokio::test]
    async fn test_deploy_requires_coin_public_key() {
        let dir = TempDir::new().unwrap();
        let ctx = GlobalOptions {
            coin_public_key: None,
            signing_key: None,
            network: Some("mainnet".into()),
            assets: None,
            log_level: Some("info".into()),
        }
        .resolve()
        .unwrap();

        let err = DeployCommand {
            args: vec![],
            output: path(&dir, "deploy.bin"),
            output_private_state: path(&dir, "state.ps.json"),
            output_zswap: path(&dir, "zswap.json"),
            output_public: None,
            output_signing: None,
        }
        .execute(&ctx)
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "Failed to initialize contract");
        assert!(report::render(&err).contains("Missing coin public key"));
    }
}
