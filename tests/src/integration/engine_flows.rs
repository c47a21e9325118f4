//! # Engine Flows
//!
//! The counter contract driven through the engine with its bundled assets,
//! and through reflection for textual arguments.

#[cfg(test)]
mod tests {
    use super::super::fixtures::{counter, init_tracing};
    use compact_executable::domain::{CircuitCallContext, Value};
    use compact_executable::ports::ContractExecutableApi;
    use compact_reflection::{ContractReflection, FileContractReflection};
    use counter_contract::{round, CounterPrivateState, BUNDLED_ASSETS_BASE};
    use shared_types::{ContractAddress, SigningKey};
    use std::error::Error as _;

    fn address() -> ContractAddress {
        ContractAddress::from_bytes([0x42; 32])
    }

    // =============================================================================
    // INITIALIZE → CIRCUIT
    // =============================================================================

    #[tokio::test]
    async fn test_increment_updates_private_and_public_state() {
        init_tracing();
        let engine = counter(Some(SigningKey::sample()));

        let deployed = engine
            .initialize(CounterPrivateState::default(), &[])
            .await
            .unwrap();
        let before = deployed.public.contract_state.clone();
        assert_eq!(round(&before), Some(0));

        let called = engine
            .circuit(
                "increment",
                CircuitCallContext {
                    address: address(),
                    contract_state: before.clone(),
                    private_state: deployed.private.private_state,
                    zswap_local_state: Some(deployed.private.zswap_local_state),
                },
                &[],
            )
            .await
            .unwrap();

        assert_eq!(called.private.private_state.count, 1);
        assert_ne!(called.public.contract_state, before);
        assert_eq!(round(&called.public.contract_state), Some(1));
        assert!(!called.public.public_transcript.is_empty());
        assert_eq!(called.private.private_transcript_outputs.len(), 1);
    }

    #[tokio::test]
    async fn test_bundled_verifier_keys_are_attached() {
        let engine = counter(None);
        let deployed = engine
            .initialize(CounterPrivateState::default(), &[])
            .await
            .unwrap();
        let state = &deployed.public.contract_state;

        assert!(state.operation("increment").unwrap().verifier_key.is_some());
        assert!(state.operation("add").unwrap().verifier_key.is_some());
        assert!(state.operation("touch").unwrap().verifier_key.is_none());
        assert_eq!(state.maintenance_authority.counter, 0);
        assert_eq!(state.maintenance_authority.committee.len(), 1);
    }

    #[tokio::test]
    async fn test_state_threads_through_successive_calls() {
        let engine = counter(None);
        let deployed = engine
            .initialize(CounterPrivateState::default(), &[])
            .await
            .unwrap();

        let mut state = deployed.public.contract_state;
        let mut private_state = deployed.private.private_state;
        for id in ["increment", "touch", "increment"] {
            let called = engine
                .circuit(
                    id,
                    CircuitCallContext {
                        address: address(),
                        contract_state: state,
                        private_state,
                        zswap_local_state: None,
                    },
                    &[],
                )
                .await
                .unwrap();
            state = called.public.contract_state;
            private_state = called.private.private_state;
        }

        assert_eq!(round(&state), Some(2));
        assert_eq!(private_state.count, 3);
    }

    // =============================================================================
    // REFLECTION + ENGINE
    // =============================================================================

    #[tokio::test]
    async fn test_reflected_arguments_drive_add() {
        let engine = counter(None);
        let parser = FileContractReflection::new(BUNDLED_ASSETS_BASE)
            .create_argument_parser(engine.compiled_contract())
            .await
            .unwrap();

        let deployed = engine
            .initialize(
                CounterPrivateState::default(),
                &parser.parse_initialization_args::<&str>(&[]).unwrap(),
            )
            .await
            .unwrap();

        let args = parser.parse_circuit_args("add", &["5"]).unwrap();
        let called = engine
            .circuit(
                "add",
                CircuitCallContext {
                    address: address(),
                    contract_state: deployed.public.contract_state,
                    private_state: deployed.private.private_state,
                    zswap_local_state: None,
                },
                &args,
            )
            .await
            .unwrap();

        assert_eq!(called.private.result, Value::from(5));
        assert_eq!(called.private.result.to_json(), serde_json::json!("5"));
        assert_eq!(round(&called.public.contract_state), Some(5));
    }

    #[tokio::test]
    async fn test_reflection_rejects_bad_arguments_before_execution() {
        let engine = counter(None);
        let parser = FileContractReflection::new(BUNDLED_ASSETS_BASE)
            .create_argument_parser(engine.compiled_contract())
            .await
            .unwrap();

        let err = parser.parse_circuit_args("add", &["five"]).unwrap_err();
        assert_eq!(err.to_string(), "Failed to parse argument with index 0");
        assert_eq!(
            err.source().map(ToString::to_string).as_deref(),
            Some("Failed to parse string 'five' as type of bigint")
        );

        let err = parser.parse_circuit_args("increment", &["1"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid number of arguments. Expected 0 arguments, but got 1"
        );
    }

    #[tokio::test]
    async fn test_unknown_circuit_is_runtime_error() {
        let engine = counter(None);
        let deployed = engine
            .initialize(CounterPrivateState::default(), &[])
            .await
            .unwrap();

        let err = engine
            .circuit(
                "decrement",
                CircuitCallContext {
                    address: address(),
                    contract_state: deployed.public.contract_state,
                    private_state: deployed.private.private_state,
                    zswap_local_state: None,
                },
                &[],
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "ContractRuntimeError");
    }
}
