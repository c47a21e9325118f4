//! # Contract Executable Service
//!
//! Wraps a [`CompiledContract`] and exposes its lifecycle:
//!
//! ```text
//! Undeployed --initialize--> Deployed (counter = 0)
//! Deployed --circuit--> Deployed (state tree changes, counter unchanged)
//! Deployed --maintenance--> Deployed (operations or authority change, counter + 1 once applied)
//! ```
//!
//! The service holds no per-contract state between calls. Callers persist the
//! returned state and serialize calls against the same deployed contract.
//! The only shared state is the contract instance, constructed once on first
//! use.

use crate::adapters::LedgerPartitioner;
use crate::domain::{
    create_circuit_context, single_partition, authority_for, CallResult, CallResultPrivate,
    CallResultPublic, CircuitCallContext, CompiledContract, ConstructorContext, Contract,
    ContractContext, DeployResult, DeployResultPrivate, DeployResultPublic, ExecutionResult,
    ImpureCircuitId, MaintenanceResult, MaintenanceResultPrivate, MaintenanceResultPublic, Value,
    VerifierKey, DEFAULT_SIGNATURE_INDEX, OPERATION_VERSION,
};
use crate::errors::{
    BoxError, ContractConfigurationError, ContractExecutionError, ContractRuntimeError,
};
use crate::ports::inbound::ContractExecutableApi;
use crate::ports::outbound::{
    KeyConfiguration, Keys, TranscriptPartitioner, ZkConfiguration, ZkConfigurationReader,
};

use async_trait::async_trait;
use shared_types::{
    CoinPublicKey, ContractMaintenanceAuthority, ContractOperationVersionedVerifierKey,
    ContractState, EncodedZswapLocalState, LedgerParameters, MaintenanceUpdate, PreTranscript,
    SigningKey, SingleUpdate,
};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// An executable form of a compiled contract.
pub struct ContractExecutable<C: Contract, Z, K, P = LedgerPartitioner> {
    compiled_contract: CompiledContract<C>,
    zk_configuration: Arc<Z>,
    key_configuration: Arc<K>,
    partitioner: P,
    parameters: LedgerParameters,
    /// Backing cell for the lazily constructed contract instance.
    contract: OnceCell<Arc<C>>,
}

impl<C, Z, K> ContractExecutable<C, Z, K, LedgerPartitioner>
where
    C: Contract,
    Z: ZkConfiguration,
    K: KeyConfiguration,
{
    /// Make `compiled_contract` executable against the given collaborators.
    pub fn new(compiled_contract: CompiledContract<C>, zk_configuration: Z, key_configuration: K) -> Self {
        Self {
            compiled_contract,
            zk_configuration: Arc::new(zk_configuration),
            key_configuration: Arc::new(key_configuration),
            partitioner: LedgerPartitioner,
            parameters: LedgerParameters::initial(),
            contract: OnceCell::new(),
        }
    }
}

impl<C, Z, K, P> ContractExecutable<C, Z, K, P>
where
    C: Contract,
    Z: ZkConfiguration,
    K: KeyConfiguration,
    P: TranscriptPartitioner,
{
    /// Use a different transcript partitioner.
    pub fn with_partitioner<Q: TranscriptPartitioner>(self, partitioner: Q) -> ContractExecutable<C, Z, K, Q> {
        ContractExecutable {
            compiled_contract: self.compiled_contract,
            zk_configuration: self.zk_configuration,
            key_configuration: self.key_configuration,
            partitioner,
            parameters: self.parameters,
            contract: self.contract,
        }
    }

    /// The wrapped compiled contract.
    pub fn compiled_contract(&self) -> &CompiledContract<C> {
        &self.compiled_contract
    }

    /// The contract instance, constructed on first use.
    async fn contract(&self) -> Result<&Arc<C>, ContractRuntimeError> {
        self.contract
            .get_or_try_init(|| async {
                debug!(contract = self.compiled_contract.tag(), "Constructing contract instance");
                self.compiled_contract.create_contract().map(Arc::new)
            })
            .await
    }

    fn compiled_assets_path(&self) -> Result<&Path, ContractRuntimeError> {
        self.compiled_contract.compiled_assets_path().ok_or_else(|| {
            ContractRuntimeError::new(format!(
                "Compiled assets for contract '{}' are not resolved",
                self.compiled_contract.tag()
            ))
        })
    }

    /// Build a single-key authority for `key` (or a freshly sampled key).
    fn create_maintenance_authority(
        &self,
        key: Option<SigningKey>,
        contract_state: Option<&ContractState>,
    ) -> Result<(ContractMaintenanceAuthority, SigningKey), ContractConfigurationError> {
        let signing_key = key.unwrap_or_else(SigningKey::sample);
        let authority = authority_for(&signing_key, contract_state).map_err(|err| {
            let error = ContractConfigurationError::new("Failed to create maintenance authority")
                .with_cause(err);
            match contract_state {
                Some(state) => error.with_state(state.clone()),
                None => error,
            }
        })?;
        Ok((authority, signing_key))
    }

    /// Bind `updates` to the contract's current counter and sign them with
    /// the configured signing key.
    fn create_signed_maintenance_update(
        &self,
        updates: Vec<SingleUpdate>,
        keys: &Keys,
        context: &ContractContext,
    ) -> Result<MaintenanceResult, ContractConfigurationError> {
        let Some(current_signing_key) = keys.signing_key.clone() else {
            return Err(ContractConfigurationError::new(
                "Signing key required to authorize contract maintenance update",
            )
            .with_state(context.contract_state.clone()));
        };

        let counter = context.contract_state.maintenance_authority.counter;
        let update = MaintenanceUpdate::new(context.address, updates, counter);
        let data = update.data_to_sign().map_err(|err| {
            ContractConfigurationError::new("Failed to encode maintenance update for signing")
                .with_state(context.contract_state.clone())
                .with_cause(err)
        })?;
        let signature = current_signing_key.sign(&data);

        debug!(
            address = %context.address,
            counter,
            updates = update.updates.len(),
            "Signed maintenance update"
        );

        Ok(ExecutionResult {
            public: MaintenanceResultPublic {
                maintenance_update: update.add_signature(DEFAULT_SIGNATURE_INDEX, signature),
            },
            private: MaintenanceResultPrivate {
                signing_key: current_signing_key,
            },
        })
    }

    async fn initialize_contract(
        &self,
        initial_private_state: C::PrivateState,
        args: &[Value],
    ) -> Result<DeployResult<C::PrivateState>, ContractExecutionError> {
        let tag = self.compiled_contract.tag();
        let compiled_assets_path = self.compiled_assets_path()?;

        let (reader, keys, contract) = tokio::try_join!(
            async {
                self.zk_configuration
                    .create_reader(tag, compiled_assets_path)
                    .await
                    .map_err(ContractExecutionError::from)
            },
            async {
                self.key_configuration
                    .keys()
                    .await
                    .map_err(ContractExecutionError::from)
            },
            async { self.contract().await.map_err(ContractExecutionError::from) },
        )?;

        let constructor_context =
            ConstructorContext::new(initial_private_state, &keys.coin_public_key).map_err(|err| {
                ContractConfigurationError::new(
                    "Failed to configure constructor context with coin public key",
                )
                .with_cause(err)
            })?;

        let constructed = contract
            .initial_state(constructor_context, args)
            .map_err(|err| ContractRuntimeError::with_cause("Failed to initialize contract", err))?;

        let mut contract_state = constructed.current_contract_state;
        let verifier_keys = reader
            .get_verifier_keys(&contract.impure_circuit_ids())
            .await?;

        for (circuit_id, verifier_key) in verifier_keys {
            let Some(verifier_key) = verifier_key else {
                warn!(circuit = %circuit_id, "No verifier key, treating circuit as witness-only");
                continue;
            };
            let Some(operation) = contract_state.operation(&circuit_id).cloned() else {
                return Err(ContractConfigurationError::new(format!(
                    "Circuit '{circuit_id}' is undefined for the given contract state"
                ))
                .with_state(contract_state)
                .into());
            };
            debug!(
                circuit = %circuit_id,
                fingerprint = %verifier_key.fingerprint(),
                "Attached verifier key"
            );
            contract_state =
                contract_state.with_operation(circuit_id, operation.with_verifier_key(verifier_key));
        }

        let (authority, signing_key) = self.create_maintenance_authority(keys.signing_key, None)?;
        contract_state = contract_state.with_maintenance_authority(authority);

        Ok(ExecutionResult {
            public: DeployResultPublic { contract_state },
            private: DeployResultPrivate {
                signing_key,
                private_state: constructed.current_private_state,
                zswap_local_state: constructed.current_zswap_local_state,
            },
        })
    }

    async fn call_circuit(
        &self,
        impure_circuit_id: &str,
        context: CircuitCallContext<C::PrivateState>,
        args: &[Value],
    ) -> Result<CallResult<C::PrivateState>, ContractExecutionError> {
        let (keys, contract) = tokio::try_join!(
            async {
                self.key_configuration
                    .keys()
                    .await
                    .map_err(ContractExecutionError::from)
            },
            async { self.contract().await.map_err(ContractExecutionError::from) },
        )?;

        self.execute_circuit(contract, &keys, impure_circuit_id, context, args)
            .map_err(|err| {
                ContractRuntimeError::with_cause(
                    format!("Error executing circuit '{impure_circuit_id}'"),
                    err,
                )
                .into()
            })
    }

    fn execute_circuit(
        &self,
        contract: &C,
        keys: &Keys,
        impure_circuit_id: &str,
        context: CircuitCallContext<C::PrivateState>,
        args: &[Value],
    ) -> Result<CallResult<C::PrivateState>, BoxError> {
        let circuit = contract.impure_circuit(impure_circuit_id).ok_or_else(|| {
            ContractRuntimeError::new(format!(
                "Circuit {}#{impure_circuit_id} could not be found.",
                self.compiled_contract.tag()
            ))
        })?;

        let zswap_local_state = match context.zswap_local_state {
            Some(zswap) => zswap,
            None => EncodedZswapLocalState::empty(&keys.coin_public_key.parse::<CoinPublicKey>()?),
        };

        let runtime_context = create_circuit_context(
            context.address,
            zswap_local_state,
            context.contract_state.clone(),
            context.private_state,
        );
        let initial_query_context = runtime_context.current_query_context.clone();

        let results = circuit(runtime_context, args)?;

        let pre_context = results
            .query_context
            .com_indices
            .iter()
            .fold(initial_query_context, |query_context, (commitment, index)| {
                query_context.insert_commitment(*commitment, *index)
            });
        let partitions = self.partitioner.partition(
            &[PreTranscript {
                context: pre_context,
                program: results.public_transcript.clone(),
            }],
            &self.parameters,
        )?;
        let partitioned_transcript = single_partition(partitions)?;

        debug!(
            ops = results.public_transcript.len(),
            private_outputs = results.private_transcript_outputs.len(),
            "Circuit executed"
        );

        Ok(ExecutionResult {
            public: CallResultPublic {
                contract_state: context.contract_state.with_data(results.query_context.state),
                public_transcript: results.public_transcript,
                partitioned_transcript,
            },
            private: CallResultPrivate {
                input: results.input,
                output: results.output,
                private_transcript_outputs: results.private_transcript_outputs,
                result: results.result,
                private_state: results.private_state,
                zswap_local_state: results.zswap_local_state,
            },
        })
    }
}

fn log_outcome<T>(
    operation: &str,
    result: Result<T, ContractExecutionError>,
) -> Result<T, ContractExecutionError> {
    match &result {
        Ok(_) => info!(operation, "Completed"),
        Err(err) => error!(operation, kind = err.kind(), error = %err, "Failed"),
    }
    result
}

#[async_trait]
impl<C, Z, K, P> ContractExecutableApi for ContractExecutable<C, Z, K, P>
where
    C: Contract,
    Z: ZkConfiguration,
    K: KeyConfiguration,
    P: TranscriptPartitioner,
{
    type PrivateState = C::PrivateState;

    #[instrument(skip_all, fields(correlation_id = %Uuid::new_v4()))]
    async fn initialize(
        &self,
        initial_private_state: Self::PrivateState,
        args: &[Value],
    ) -> Result<DeployResult<Self::PrivateState>, ContractExecutionError> {
        info!(
            contract = self.compiled_contract.tag(),
            args = args.len(),
            "Initializing contract"
        );
        log_outcome(
            "initialize",
            self.initialize_contract(initial_private_state, args).await,
        )
    }

    #[instrument(skip_all, fields(correlation_id = %Uuid::new_v4(), circuit = %impure_circuit_id))]
    async fn circuit(
        &self,
        impure_circuit_id: &str,
        context: CircuitCallContext<Self::PrivateState>,
        args: &[Value],
    ) -> Result<CallResult<Self::PrivateState>, ContractExecutionError> {
        info!(
            contract = self.compiled_contract.tag(),
            address = %context.address,
            args = args.len(),
            "Invoking circuit"
        );
        log_outcome(
            "circuit",
            self.call_circuit(impure_circuit_id, context, args).await,
        )
    }

    async fn impure_circuit_ids(&self) -> Result<Vec<ImpureCircuitId>, ContractExecutionError> {
        Ok(self.contract().await?.impure_circuit_ids())
    }

    #[instrument(skip_all, fields(correlation_id = %Uuid::new_v4()))]
    async fn replace_contract_maintenance_authority(
        &self,
        new_signing_key: Option<SigningKey>,
        context: &ContractContext,
    ) -> Result<MaintenanceResult, ContractExecutionError> {
        info!(
            address = %context.address,
            counter = context.contract_state.maintenance_authority.counter,
            sampled = new_signing_key.is_none(),
            "Replacing contract maintenance authority"
        );
        let result = async {
            let keys = self.key_configuration.keys().await?;
            let (authority, signing_key) = self
                .create_maintenance_authority(new_signing_key, Some(&context.contract_state))?;
            let mut result = self.create_signed_maintenance_update(
                vec![SingleUpdate::ReplaceAuthority(authority)],
                &keys,
                context,
            )?;
            // The caller needs the new key for subsequent maintenance calls.
            result.private.signing_key = signing_key;
            Ok::<_, ContractExecutionError>(result)
        }
        .await;
        log_outcome("replace_contract_maintenance_authority", result)
    }

    #[instrument(skip_all, fields(correlation_id = %Uuid::new_v4(), circuit = %impure_circuit_id))]
    async fn remove_contract_operation(
        &self,
        impure_circuit_id: &str,
        context: &ContractContext,
    ) -> Result<MaintenanceResult, ContractExecutionError> {
        info!(address = %context.address, "Removing contract operation");
        let result = async {
            let keys = self.key_configuration.keys().await?;
            Ok::<_, ContractExecutionError>(self.create_signed_maintenance_update(
                vec![SingleUpdate::VerifierKeyRemove {
                    operation: impure_circuit_id.to_string(),
                    version: OPERATION_VERSION,
                }],
                &keys,
                context,
            )?)
        }
        .await;
        log_outcome("remove_contract_operation", result)
    }

    #[instrument(skip_all, fields(correlation_id = %Uuid::new_v4(), circuit = %impure_circuit_id))]
    async fn add_or_replace_contract_operation(
        &self,
        impure_circuit_id: &str,
        verifier_key: VerifierKey,
        context: &ContractContext,
    ) -> Result<MaintenanceResult, ContractExecutionError> {
        info!(
            address = %context.address,
            fingerprint = %verifier_key.fingerprint(),
            "Adding or replacing contract operation"
        );
        let result = async {
            let keys = self.key_configuration.keys().await?;
            Ok::<_, ContractExecutionError>(self.create_signed_maintenance_update(
                vec![SingleUpdate::VerifierKeyInsert {
                    operation: impure_circuit_id.to_string(),
                    verifier_key: ContractOperationVersionedVerifierKey::new(
                        OPERATION_VERSION,
                        verifier_key,
                    ),
                }],
                &keys,
                context,
            )?)
        }
        .await;
        log_outcome("add_or_replace_contract_operation", result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryZkConfiguration, StaticKeyConfiguration};
    use crate::domain::{
        CircuitContext, CircuitResults, CompactError, ConstructorResult, ImpureCircuit, Witnesses,
    };
    use shared_types::{
        AlignedValue, ContractAddress, ContractOperation, LedgerError, PartitionedTranscript,
        StateValue,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    const COIN_KEY: &str = "d2dc8d175c0ef7d1f7e5b7f32bd9da5fcd4c60fa1b651f1d312986269c2d3c79";

    type Circuit = Result<CircuitResults<u64>, CompactError>;

    /// Private state counts witness invocations.
    struct Tally {
        witnesses: Witnesses<u64>,
    }

    impl Tally {
        fn construct(witnesses: Witnesses<u64>) -> Result<Self, CompactError> {
            Ok(Self { witnesses })
        }
    }

    impl Contract for Tally {
        type PrivateState = u64;

        fn impure_circuit_ids(&self) -> Vec<ImpureCircuitId> {
            vec!["bump".into(), "peek".into()]
        }

        fn initial_state(
            &self,
            context: ConstructorContext<u64>,
            _args: &[Value],
        ) -> Result<ConstructorResult<u64>, CompactError> {
            Ok(ConstructorResult {
                current_contract_state: ContractState::new()
                    .with_data(StateValue::empty_map())
                    .with_operation("bump", ContractOperation::new())
                    .with_operation("peek", ContractOperation::new()),
                current_private_state: context.initial_private_state,
                current_zswap_local_state: context.initial_zswap_local_state,
            })
        }

        fn impure_circuit(&self, id: &str) -> Option<ImpureCircuit<u64>> {
            let witnesses = self.witnesses.clone();
            match id {
                "bump" => Some(Arc::new(move |mut ctx: CircuitContext<u64>, args: &[Value]| -> Circuit {
                    ctx.witness(&witnesses, "tick", &[])?;
                    ctx.increment("round", 1)?;
                    ctx.finish(args, Value::Unit)
                })),
                "peek" => Some(Arc::new(|mut ctx: CircuitContext<u64>, args: &[Value]| -> Circuit {
                    let round = ctx.read("round")?.and_then(|v| v.to_u64()).unwrap_or(0);
                    ctx.finish(args, Value::from(round))
                })),
                _ => None,
            }
        }
    }

    fn compiled() -> CompiledContract<Tally> {
        CompiledContract::make("tally", Tally::construct)
            .with_witnesses(Witnesses::new().with("tick", |ctx, _| {
                Ok((*ctx.private_state + 1, Value::Unit))
            }))
            .with_compiled_file_assets("managed/tally")
    }

    fn executable(
        signing_key: Option<SigningKey>,
    ) -> ContractExecutable<Tally, InMemoryZkConfiguration, StaticKeyConfiguration> {
        ContractExecutable::new(
            compiled(),
            InMemoryZkConfiguration::new().with_key("bump", VerifierKey::new(vec![7; 16])),
            StaticKeyConfiguration::new(COIN_KEY, signing_key),
        )
    }

    /// Declares `bump` without putting it in its initial state, and rejects
    /// any constructor arguments.
    struct Sparse;

    impl Sparse {
        fn construct(_witnesses: Witnesses<u64>) -> Result<Self, CompactError> {
            Ok(Self)
        }
    }

    impl Contract for Sparse {
        type PrivateState = u64;

        fn impure_circuit_ids(&self) -> Vec<ImpureCircuitId> {
            vec!["bump".into()]
        }

        fn initial_state(
            &self,
            context: ConstructorContext<u64>,
            args: &[Value],
        ) -> Result<ConstructorResult<u64>, CompactError> {
            if !args.is_empty() {
                return Err(CompactError::new("Constructor takes no arguments"));
            }
            Ok(ConstructorResult {
                current_contract_state: ContractState::new().with_data(StateValue::empty_map()),
                current_private_state: context.initial_private_state,
                current_zswap_local_state: context.initial_zswap_local_state,
            })
        }

        fn impure_circuit(&self, _id: &str) -> Option<ImpureCircuit<u64>> {
            None
        }
    }

    fn sparse() -> ContractExecutable<Sparse, InMemoryZkConfiguration, StaticKeyConfiguration> {
        ContractExecutable::new(
            CompiledContract::make("sparse", Sparse::construct)
                .with_vacant_witnesses()
                .with_compiled_file_assets("managed/sparse"),
            InMemoryZkConfiguration::new().with_key("bump", VerifierKey::new(vec![7; 16])),
            StaticKeyConfiguration::new(COIN_KEY, None),
        )
    }

    static TALLY_CONSTRUCTIONS: AtomicUsize = AtomicUsize::new(0);

    fn construct_counted(witnesses: Witnesses<u64>) -> Result<Tally, CompactError> {
        TALLY_CONSTRUCTIONS.fetch_add(1, Ordering::SeqCst);
        Tally::construct(witnesses)
    }

    struct FixedPartitioner(usize);

    impl TranscriptPartitioner for FixedPartitioner {
        fn partition(
            &self,
            _pre_transcripts: &[PreTranscript],
            _parameters: &LedgerParameters,
        ) -> Result<Vec<PartitionedTranscript>, LedgerError> {
            Ok(vec![(None, None); self.0])
        }
    }

    async fn deploy(
        engine: &ContractExecutable<Tally, InMemoryZkConfiguration, StaticKeyConfiguration>,
    ) -> (ContractAddress, DeployResult<u64>) {
        let deployed = engine.initialize(0, &[]).await.unwrap();
        (ContractAddress::from_bytes([9; 32]), deployed)
    }

    #[tokio::test]
    async fn test_initialize_attaches_available_verifier_keys() {
        let key = SigningKey::sample();
        let engine = executable(Some(key.clone()));
        let (_, deployed) = deploy(&engine).await;
        let state = &deployed.public.contract_state;

        assert!(state.operation("bump").unwrap().verifier_key.is_some());
        assert!(state.operation("peek").unwrap().verifier_key.is_none());
        assert_eq!(state.maintenance_authority.counter, 0);
        assert_eq!(state.maintenance_authority.threshold, 1);
        assert_eq!(
            state.maintenance_authority.committee,
            vec![key.verifying_key()]
        );
        assert_eq!(deployed.private.signing_key, key);
    }

    #[tokio::test]
    async fn test_initialize_samples_key_when_unconfigured() {
        let engine = executable(None);
        let (_, deployed) = deploy(&engine).await;
        assert_eq!(
            deployed.public.contract_state.maintenance_authority.committee,
            vec![deployed.private.signing_key.verifying_key()]
        );
    }

    #[tokio::test]
    async fn test_initialize_rejects_bad_coin_key() {
        let engine = ContractExecutable::new(
            compiled(),
            InMemoryZkConfiguration::new(),
            StaticKeyConfiguration::new("INVALIDd9da5fcd4c601", None),
        );
        let err = engine.initialize(0, &[]).await.unwrap_err();
        match err {
            ContractExecutionError::Configuration(err) => {
                assert_eq!(
                    err.message,
                    "Failed to configure constructor context with coin public key"
                );
                assert!(err.contract_state.is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_initialize_rejects_key_for_undefined_operation() {
        let err = sparse().initialize(0, &[]).await.unwrap_err();
        match err {
            ContractExecutionError::Configuration(err) => {
                assert_eq!(
                    err.message,
                    "Circuit 'bump' is undefined for the given contract state"
                );
                let state = err.contract_state.expect("partial state attached");
                assert!(state.operation("bump").is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_constructor_failure_is_runtime_error() {
        let err = sparse().initialize(0, &[Value::from(1u64)]).await.unwrap_err();
        assert_eq!(err.kind(), "ContractRuntimeError");
        assert_eq!(err.to_string(), "Failed to initialize contract");
        let cause = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(cause.as_deref(), Some("Constructor takes no arguments"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_contract_is_constructed_once() {
        let engine = ContractExecutable::new(
            CompiledContract::make("tally", construct_counted)
                .with_witnesses(Witnesses::new())
                .with_compiled_file_assets("managed/tally"),
            InMemoryZkConfiguration::new(),
            StaticKeyConfiguration::new(COIN_KEY, None),
        );

        let (first, second, ids) = tokio::join!(
            engine.initialize(0, &[]),
            engine.initialize(0, &[]),
            engine.impure_circuit_ids(),
        );
        assert!(first.is_ok());
        assert!(second.is_ok());
        assert_eq!(ids.unwrap(), vec!["bump", "peek"]);
        assert_eq!(TALLY_CONSTRUCTIONS.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_circuit_updates_state_and_private_state() {
        let engine = executable(None);
        let (address, deployed) = deploy(&engine).await;

        let called = engine
            .circuit(
                "bump",
                CircuitCallContext {
                    address,
                    contract_state: deployed.public.contract_state.clone(),
                    private_state: deployed.private.private_state,
                    zswap_local_state: None,
                },
                &[],
            )
            .await
            .unwrap();

        assert_eq!(called.private.private_state, 1);
        assert_ne!(called.public.contract_state, deployed.public.contract_state);
        assert_eq!(
            called
                .public
                .contract_state
                .data
                .get(&AlignedValue::from("round"))
                .and_then(StateValue::as_cell)
                .and_then(AlignedValue::to_u64),
            Some(1)
        );
        let (guaranteed, fallible) = called.public.partitioned_transcript;
        assert!(guaranteed.is_some());
        assert!(fallible.is_none());
        assert_eq!(called.private.private_transcript_outputs.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_circuit_is_runtime_error() {
        let engine = executable(None);
        let (address, deployed) = deploy(&engine).await;

        let err = engine
            .circuit(
                "missing",
                CircuitCallContext {
                    address,
                    contract_state: deployed.public.contract_state,
                    private_state: 0,
                    zswap_local_state: None,
                },
                &[],
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "ContractRuntimeError");
        assert_eq!(err.to_string(), "Error executing circuit 'missing'");
        let cause = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(cause.as_deref(), Some("Circuit tally#missing could not be found."));
    }

    #[tokio::test]
    async fn test_partition_count_must_be_one() {
        for count in [0, 2] {
            let engine = executable(None).with_partitioner(FixedPartitioner(count));
            let deployed = engine.initialize(0, &[]).await.unwrap();
            let err = engine
                .circuit(
                    "bump",
                    CircuitCallContext {
                        address: ContractAddress::from_bytes([9; 32]),
                        contract_state: deployed.public.contract_state,
                        private_state: 0,
                        zswap_local_state: None,
                    },
                    &[],
                )
                .await
                .unwrap_err();
            assert_eq!(err.kind(), "ContractRuntimeError");
        }
    }

    #[tokio::test]
    async fn test_maintenance_requires_signing_key() {
        let deployer = executable(Some(SigningKey::sample()));
        let (address, deployed) = deploy(&deployer).await;

        let engine = executable(None);
        let context = ContractContext {
            address,
            contract_state: deployed.public.contract_state,
        };
        let err = engine
            .remove_contract_operation("bump", &context)
            .await
            .unwrap_err();

        match err {
            ContractExecutionError::Configuration(err) => {
                assert_eq!(
                    err.message,
                    "Signing key required to authorize contract maintenance update"
                );
                assert!(err.contract_state.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_replace_authority_requires_signing_key() {
        let deployer = executable(Some(SigningKey::sample()));
        let (address, deployed) = deploy(&deployer).await;
        let context = ContractContext {
            address,
            contract_state: deployed.public.contract_state.clone(),
        };

        let err = executable(None)
            .replace_contract_maintenance_authority(Some(SigningKey::sample()), &context)
            .await
            .unwrap_err();

        match err {
            ContractExecutionError::Configuration(err) => {
                assert_eq!(
                    err.message,
                    "Signing key required to authorize contract maintenance update"
                );
                assert_eq!(
                    err.contract_state.as_deref(),
                    Some(&deployed.public.contract_state)
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_maintenance_updates_apply_in_sequence() {
        let key = SigningKey::sample();
        let engine = executable(Some(key.clone()));
        let (address, deployed) = deploy(&engine).await;
        let mut context = ContractContext {
            address,
            contract_state: deployed.public.contract_state,
        };

        let removed = engine
            .remove_contract_operation("bump", &context)
            .await
            .unwrap();
        assert_eq!(removed.private.signing_key, key);
        context.contract_state = context
            .contract_state
            .apply_maintenance_update(&address, &removed.public.maintenance_update)
            .unwrap();
        assert!(context.contract_state.operation("bump").is_none());
        assert_eq!(context.contract_state.maintenance_authority.counter, 1);

        let added = engine
            .add_or_replace_contract_operation("bump", VerifierKey::new(vec![1; 8]), &context)
            .await
            .unwrap();
        context.contract_state = context
            .contract_state
            .apply_maintenance_update(&address, &added.public.maintenance_update)
            .unwrap();
        assert_eq!(
            context.contract_state.operation("bump").unwrap().verifier_key,
            Some(VerifierKey::new(vec![1; 8]))
        );
        assert_eq!(context.contract_state.maintenance_authority.counter, 2);
    }

    #[tokio::test]
    async fn test_replace_authority_returns_new_key() {
        let current = SigningKey::sample();
        let engine = executable(Some(current.clone()));
        let (address, deployed) = deploy(&engine).await;
        let context = ContractContext {
            address,
            contract_state: deployed.public.contract_state,
        };

        let replacement = SigningKey::sample();
        let replaced = engine
            .replace_contract_maintenance_authority(Some(replacement.clone()), &context)
            .await
            .unwrap();
        assert_eq!(replaced.private.signing_key, replacement);

        let next = context
            .contract_state
            .apply_maintenance_update(&address, &replaced.public.maintenance_update)
            .unwrap();
        assert_eq!(
            next.maintenance_authority.committee,
            vec![replacement.verifying_key()]
        );
        assert_eq!(next.maintenance_authority.counter, 1);
    }

    #[tokio::test]
    async fn test_impure_circuit_ids() {
        let engine = executable(None);
        assert_eq!(engine.impure_circuit_ids().await.unwrap(), vec!["bump", "peek"]);
    }
}
