//! # Maintenance Flows
//!
//! Signed updates applied to the ledger state one after another. The
//! authority counter must advance by exactly one per applied update,
//! whatever counter the authority starts from.

#[cfg(test)]
mod tests {
    use super::super::fixtures::{counter, init_tracing};
    use compact_executable::domain::{ContractContext, MaintenanceResult};
    use compact_executable::ports::ContractExecutableApi;
    use counter_contract::{CounterPrivateState, BUNDLED_ASSETS_BASE, COMPILED_ASSETS_PATH};
    use shared_types::{ContractAddress, ContractState, SigningKey, VerifierKey};

    fn address() -> ContractAddress {
        ContractAddress::from_bytes([0x17; 32])
    }

    async fn deployed(key: &SigningKey) -> ContractState {
        counter(Some(key.clone()))
            .initialize(CounterPrivateState::default(), &[])
            .await
            .unwrap()
            .public
            .contract_state
    }

    fn apply(state: &ContractState, result: &MaintenanceResult) -> ContractState {
        state
            .apply_maintenance_update(&address(), &result.public.maintenance_update)
            .unwrap()
    }

    fn bundled_key(circuit_id: &str) -> VerifierKey {
        let path = std::path::Path::new(BUNDLED_ASSETS_BASE)
            .join(COMPILED_ASSETS_PATH)
            .join("keys")
            .join(format!("{circuit_id}.verifier"));
        VerifierKey::new(std::fs::read(path).unwrap())
    }

    #[tokio::test]
    async fn test_counter_advances_once_per_applied_update() {
        init_tracing();
        let key = SigningKey::sample();
        let mut state = deployed(&key).await;
        let start = state.maintenance_authority.counter;
        let engine = counter(Some(key));

        let updates = [
            ("remove", "increment"),
            ("insert", "increment"),
            ("insert", "touch"),
            ("remove", "touch"),
        ];
        for (step, circuit_id) in updates {
            let context = ContractContext {
                address: address(),
                contract_state: state.clone(),
            };
            let result = match step {
                "remove" => engine.remove_contract_operation(circuit_id, &context).await,
                _ => {
                    engine
                        .add_or_replace_contract_operation(
                            circuit_id,
                            bundled_key("increment"),
                            &context,
                        )
                        .await
                }
            }
            .unwrap();
            assert_eq!(result.public.maintenance_update.counter, state.maintenance_authority.counter);
            state = apply(&state, &result);
        }

        assert_eq!(state.maintenance_authority.counter, start + updates.len() as u64);
        assert!(state.operation("increment").unwrap().verifier_key.is_some());
        assert!(state.operation("touch").is_none());
    }

    #[tokio::test]
    async fn test_replaced_authority_signs_next_update() {
        let old_key = SigningKey::sample();
        let new_key = SigningKey::sample();
        let state = deployed(&old_key).await;

        let replaced = counter(Some(old_key.clone()))
            .replace_contract_maintenance_authority(
                Some(new_key.clone()),
                &ContractContext {
                    address: address(),
                    contract_state: state.clone(),
                },
            )
            .await
            .unwrap();
        assert_eq!(replaced.private.signing_key.to_hex(), new_key.to_hex());
        let state = apply(&state, &replaced);
        assert_eq!(state.maintenance_authority.counter, 1);

        let context = ContractContext {
            address: address(),
            contract_state: state.clone(),
        };

        // The old key no longer satisfies the authority.
        let stale = counter(Some(old_key))
            .remove_contract_operation("add", &context)
            .await
            .unwrap();
        assert!(state
            .apply_maintenance_update(&address(), &stale.public.maintenance_update)
            .is_err());

        let fresh = counter(Some(new_key))
            .remove_contract_operation("add", &context)
            .await
            .unwrap();
        let state = apply(&state, &fresh);
        assert_eq!(state.maintenance_authority.counter, 2);
        assert!(state.operation("add").is_none());
    }

    #[tokio::test]
    async fn test_missing_signing_key_is_rejected_before_mutation() {
        let state = deployed(&SigningKey::sample()).await;
        let context = ContractContext {
            address: address(),
            contract_state: state.clone(),
        };

        let err = counter(None)
            .remove_contract_operation("increment", &context)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "ContractConfigurationError");
        assert_eq!(
            err.to_string(),
            "Signing key required to authorize contract maintenance update"
        );
        assert_eq!(context.contract_state, state);
    }

    #[tokio::test]
    async fn test_update_is_bound_to_its_counter() {
        let key = SigningKey::sample();
        let state = deployed(&key).await;
        let engine = counter(Some(key));
        let context = ContractContext {
            address: address(),
            contract_state: state.clone(),
        };

        let first = engine.remove_contract_operation("touch", &context).await.unwrap();
        let replay = engine.remove_contract_operation("add", &context).await.unwrap();

        let state = apply(&state, &first);
        assert!(state
            .apply_maintenance_update(&address(), &replay.public.maintenance_update)
            .is_err());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;
        use shared_types::ContractMaintenanceAuthority;

        const CIRCUITS: [&str; 3] = ["increment", "add", "touch"];

        /// Toggle each chosen circuit: remove it when present, insert it otherwise.
        async fn run_toggles(start: u64, toggles: &[usize]) -> ContractState {
            let key = SigningKey::sample();
            let mut state = deployed(&key).await.with_maintenance_authority(
                ContractMaintenanceAuthority::new(vec![key.verifying_key()], 1, start).unwrap(),
            );
            let engine = counter(Some(key));

            for &choice in toggles {
                let circuit_id = CIRCUITS[choice];
                let context = ContractContext {
                    address: address(),
                    contract_state: state.clone(),
                };
                let result = if state.operation(circuit_id).is_some() {
                    engine.remove_contract_operation(circuit_id, &context).await
                } else {
                    engine
                        .add_or_replace_contract_operation(circuit_id, bundled_key("increment"), &context)
                        .await
                }
                .unwrap();
                state = apply(&state, &result);
            }
            state
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(24))]

            #[test]
            fn prop_counter_advances_by_update_count(
                start in 0u64..1_000_000,
                toggles in prop::collection::vec(0usize..CIRCUITS.len(), 0..12),
            ) {
                let runtime = tokio::runtime::Runtime::new().unwrap();
                let state = runtime.block_on(run_toggles(start, &toggles));
                prop_assert_eq!(
                    state.maintenance_authority.counter,
                    start + toggles.len() as u64
                );
            }
        }
    }
}
