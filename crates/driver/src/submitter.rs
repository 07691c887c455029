use std::{sync::Arc, time::Duration};

use alloy_primitives::{Address, BlockNumber, Bytes, U256};
use outpost_chainio::{
    factory::{DisputeGameFactory, create_game_tx_data},
    oracle::{L2OutputOracle, propose_l2_output_tx_data},
};
use outpost_clients::rollup::RollupClient;
use outpost_config::Opts;
use outpost_primitives::{
    output::{OutputResponse, SUPPORTED_OUTPUT_VERSION},
    shutdown::ShutdownSignal,
    summary::Summary,
};
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior, interval, sleep, timeout},
};
use tracing::{debug, error, info, warn};

use crate::{
    config::SubmitterConfig,
    error::{SubmitterError, SubmitterResult},
    metrics::SubmitterMetrics,
    traits::{GameFactory, OutputOracle, RollupNode, TxManager},
    txmgr::{TxCandidate, WalletTxManager},
};

/// The maximum time a single proposal is allowed to spend in flight,
/// from dispatch to L1 confirmation.
const PROPOSAL_TIMEOUT: Duration = Duration::from_secs(600);

/// How often to re-check the rollup node's derivation progress while waiting
/// for it to catch up to the L1 head on startup.
const NODE_SYNC_POLL_INTERVAL: Duration = Duration::from_secs(12);

/// The submission target: exactly one of the two contracts.
#[derive(Debug, Clone)]
pub enum Mode<O, F> {
    /// Propose outputs directly to an `L2OutputOracle`.
    Oracle(O),
    /// Propose outputs as root claims of new dispute games.
    Factory {
        /// The factory contract.
        factory: F,
        /// The type of game to create.
        game_type: u32,
    },
}

impl<O: OutputOracle, F: GameFactory> Mode<O, F> {
    /// Select the submission mode from the configured contracts.
    ///
    /// Exactly one contract must be configured; anything else is a
    /// configuration error the operator has to resolve.
    pub fn select(oracle: Option<O>, factory: Option<F>, game_type: u32) -> SubmitterResult<Self> {
        match (oracle, factory) {
            (Some(_), Some(_)) => Err(SubmitterError::AmbiguousModeAddress),
            (None, None) => Err(SubmitterError::NoModeAddress),
            (Some(oracle), None) => Ok(Self::Oracle(oracle)),
            (None, Some(factory)) => Ok(Self::Factory { factory, game_type }),
        }
    }
}

/// The outcome of evaluating the chain state for a new proposal.
#[derive(Debug, Clone)]
pub enum ProposalDecision {
    /// The output is eligible and should be proposed now.
    Propose(OutputResponse),
    /// Nothing to do until the chain state advances.
    Wait,
}

/// The periodic L2 output submitter.
///
/// Once started, a single background worker fetches output roots from the
/// rollup node and submits them to L1, either directly to an `L2OutputOracle`
/// or as dispute game root claims, depending on the configured [`Mode`].
#[derive(Debug)]
pub struct OutputSubmitter<R, T, O, F> {
    inner: Arc<SubmitterInner<R, T, O, F>>,
}

// Not derived: a derived impl would require all type params to be Clone.
impl<R, T, O, F> Clone for OutputSubmitter<R, T, O, F> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

#[derive(Debug)]
struct SubmitterInner<R, T, O, F> {
    cfg: SubmitterConfig,
    rollup: R,
    txmgr: T,
    mode: Mode<O, F>,
    shutdown: ShutdownSignal,
    state: Mutex<RunState>,
}

#[derive(Debug, Default)]
struct RunState {
    running: bool,
    handle: Option<JoinHandle<()>>,
}

impl OutputSubmitter<RollupClient, WalletTxManager, L2OutputOracle, DisputeGameFactory> {
    /// Create a production submitter from the CLI options.
    ///
    /// Connects to the configured submission target and fetches its version
    /// string as a reachability check before returning.
    pub async fn from_opts(opts: &Opts) -> SubmitterResult<Self> {
        let cfg = SubmitterConfig::from(&opts.submitter);
        let rollup = RollupClient::new(opts.rollup.node_url.clone());
        let txmgr = WalletTxManager::new(opts.l1.el_url.clone(), opts.operator.private_key.clone());

        let oracle = opts
            .contracts
            .l2_output_oracle
            .map(|addr| L2OutputOracle::new(opts.l1.el_url.clone(), addr));
        let factory = opts
            .contracts
            .dispute_game_factory
            .map(|addr| DisputeGameFactory::new(opts.l1.el_url.clone(), addr));
        let mode = Mode::select(oracle, factory, opts.submitter.game_type)?;

        match &mode {
            Mode::Oracle(oracle) => {
                let version = timeout(cfg.network_timeout, oracle.version())
                    .await
                    .map_err(|_| SubmitterError::Timeout("oracle version"))??;
                info!(address = %oracle.contract_address(), version, "Connected to L2OutputOracle");
            }
            Mode::Factory { factory, game_type } => {
                let version = timeout(cfg.network_timeout, factory.version())
                    .await
                    .map_err(|_| SubmitterError::Timeout("factory version"))??;
                info!(
                    address = %factory.contract_address(),
                    version,
                    game_type,
                    "Connected to DisputeGameFactory"
                );
            }
        }

        Ok(Self::new(cfg, rollup, txmgr, mode))
    }
}

impl<R: RollupNode, T: TxManager, O: OutputOracle, F: GameFactory> OutputSubmitter<R, T, O, F> {
    /// Create a new submitter from its collaborators. The worker is not started.
    pub fn new(cfg: SubmitterConfig, rollup: R, txmgr: T, mode: Mode<O, F>) -> Self {
        Self {
            inner: Arc::new(SubmitterInner {
                cfg,
                rollup,
                txmgr,
                mode,
                shutdown: ShutdownSignal::new(),
                state: Mutex::new(RunState::default()),
            }),
        }
    }

    /// Whether the submission worker is currently running.
    pub async fn is_running(&self) -> bool {
        self.inner.state.lock().await.running
    }

    /// Spawn the submission worker.
    ///
    /// Fails with [`SubmitterError::AlreadyRunning`] if the worker is already
    /// running: there is never more than one worker per submitter.
    pub async fn start(&self) -> SubmitterResult<()> {
        let mut state = self.inner.state.lock().await;
        if state.running {
            return Err(SubmitterError::AlreadyRunning);
        }

        info!(sender = %self.inner.txmgr.sender(), "Starting output submitter");
        state.running = true;
        SubmitterMetrics::set_running(true);

        let inner = Arc::clone(&self.inner);
        state.handle = Some(tokio::spawn(async move { inner.run().await }));

        Ok(())
    }

    /// Stop the submission worker and wait for it to wind down.
    ///
    /// Fails with [`SubmitterError::NotRunning`] if the worker is not running.
    pub async fn stop(&self) -> SubmitterResult<()> {
        let mut state = self.inner.state.lock().await;
        if !state.running {
            return Err(SubmitterError::NotRunning);
        }

        info!("Stopping output submitter");
        state.running = false;
        SubmitterMetrics::set_running(false);
        self.inner.shutdown.cancel();

        if let Some(handle) = state.handle.take() {
            if let Err(err) = handle.await {
                warn!(?err, "Submission worker task panicked");
            }
        }

        info!("Output submitter stopped");
        Ok(())
    }

    /// Stop the submission worker if it is running, doing nothing otherwise.
    pub async fn stop_if_running(&self) {
        match self.stop().await {
            Ok(()) | Err(SubmitterError::NotRunning) => {}
            Err(err) => warn!(?err, "Failed to stop output submitter"),
        }
    }
}

impl<R: RollupNode, T: TxManager, O: OutputOracle, F: GameFactory> SubmitterInner<R, T, O, F> {
    /// The worker entrypoint: optionally gate on node sync, then run the
    /// submission loop for the configured mode until shutdown.
    async fn run(&self) {
        if self.cfg.wait_node_sync {
            if let Err(err) = self.wait_node_sync().await {
                error!(%err, "Error waiting for rollup node sync, submission worker exiting");
                return;
            }
        }

        match &self.mode {
            Mode::Oracle(oracle) => self.run_oracle_loop(oracle).await,
            Mode::Factory { factory, game_type } => {
                self.run_factory_loop(factory, *game_type).await;
            }
        }
    }

    /// Block until the rollup node's derivation has caught up to the L1 head
    /// observed when this function was first called.
    async fn wait_node_sync(&self) -> SubmitterResult<()> {
        let l1_head = self.network_timeout("l1 head", self.txmgr.block_number()).await?;
        info!(l1_head, "Waiting for rollup node to sync up to the L1 head");

        loop {
            let status = self.network_timeout("sync status", self.rollup.sync_status()).await?;
            if status.current_l1.number >= l1_head {
                info!(current_l1 = status.current_l1.number, "Rollup node is synced");
                return Ok(());
            }

            debug!(current_l1 = status.current_l1.number, l1_head, "Rollup node still syncing");
            tokio::select! {
                biased;
                () = self.shutdown.cancelled() => return Err(SubmitterError::ShuttingDown),
                () = sleep(NODE_SYNC_POLL_INTERVAL) => {}
            }
        }
    }

    /// The direct-to-oracle submission loop: every poll interval, check
    /// whether the oracle expects a new output and propose it if eligible.
    async fn run_oracle_loop(&self, oracle: &O) {
        info!(interval = ?self.cfg.poll_interval, "Starting L2 output submission loop");

        let mut ticker = interval(self.cfg.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                () = self.shutdown.cancelled() => {
                    info!("L2 output submission loop shutting down");
                    return;
                }
                _ = ticker.tick() => {
                    match self.fetch_oracle_output(oracle).await {
                        Ok(ProposalDecision::Propose(output)) => {
                            let tx_data = propose_l2_output_tx_data(&output);
                            self.propose_output(oracle.address(), tx_data, U256::ZERO, &output)
                                .await;
                        }
                        Ok(ProposalDecision::Wait) => {}
                        Err(err) => {
                            warn!(%err, "Failed to fetch output for proposal");
                            SubmitterMetrics::increment_output_fetch_failures(err.to_string());
                        }
                    }
                }
            }
        }
    }

    /// The dispute game submission loop: every proposal interval, fetch the
    /// current eligible output (retrying until one is available) and propose
    /// it as the root claim of a new game.
    async fn run_factory_loop(&self, factory: &F, game_type: u32) {
        info!(
            interval = ?self.cfg.proposal_interval,
            game_type,
            "Starting dispute game submission loop"
        );

        let mut ticker = interval(self.cfg.proposal_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                () = self.shutdown.cancelled() => {
                    info!("Dispute game submission loop shutting down");
                    return;
                }
                _ = ticker.tick() => {
                    let Some(output) = self.fetch_factory_output_with_retries().await else {
                        info!("Dispute game submission loop shutting down");
                        return;
                    };

                    let bond = match self
                        .network_timeout("game bond", factory.init_bond(game_type))
                        .await
                    {
                        Ok(bond) => bond,
                        Err(err) => {
                            error!(%err, "Failed to fetch the required game bond");
                            SubmitterMetrics::increment_proposal_failures(err.to_string());
                            continue;
                        }
                    };

                    let tx_data =
                        create_game_tx_data(game_type, output.output_root, output.block_ref.number);
                    self.propose_output(factory.address(), tx_data, bond, &output).await;
                }
            }
        }
    }

    /// Evaluate the oracle and rollup node state for a new proposal.
    ///
    /// The output is only fetched once the rollup node has actually reached
    /// the block the oracle expects next, so no work is wasted computing
    /// output roots that cannot be proposed yet.
    async fn fetch_oracle_output(&self, oracle: &O) -> SubmitterResult<ProposalDecision> {
        let next_block =
            self.network_timeout("next block number", oracle.next_block_number()).await?;
        SubmitterMetrics::set_next_proposal_block(next_block);

        let current_block = self.fetch_current_block_number().await?;
        if current_block < next_block {
            debug!(current_block, next_block, "Rollup node has not reached the proposal block");
            return Ok(ProposalDecision::Wait);
        }

        let output = self.fetch_output(next_block).await?;
        if self.should_propose(&output) {
            Ok(ProposalDecision::Propose(output))
        } else {
            Ok(ProposalDecision::Wait)
        }
    }

    /// Fetch the current eligible output for a dispute game, sleeping and
    /// retrying on failure until shutdown.
    async fn fetch_factory_output_with_retries(&self) -> Option<OutputResponse> {
        loop {
            match self.fetch_factory_output().await {
                Ok(output) => return Some(output),
                Err(err) => {
                    warn!(%err, "Failed to fetch output for game proposal, retrying");
                    SubmitterMetrics::increment_output_fetch_failures(err.to_string());
                }
            }

            tokio::select! {
                biased;
                () = self.shutdown.cancelled() => return None,
                () = sleep(self.cfg.output_retry_interval) => {}
            }
        }
    }

    /// Fetch the output at the highest currently eligible L2 block.
    async fn fetch_factory_output(&self) -> SubmitterResult<OutputResponse> {
        let block_number = self.fetch_current_block_number().await?;
        self.fetch_output(block_number).await
    }

    /// The highest L2 block number that is currently eligible for proposal,
    /// according to the rollup node.
    async fn fetch_current_block_number(&self) -> SubmitterResult<BlockNumber> {
        let status = self.network_timeout("sync status", self.rollup.sync_status()).await?;

        let current = if self.cfg.allow_non_finalized {
            status.safe_l2.number
        } else {
            status.finalized_l2.number
        };

        Ok(current)
    }

    /// Fetch and validate the output at the given L2 block number.
    async fn fetch_output(&self, block_number: BlockNumber) -> SubmitterResult<OutputResponse> {
        let output =
            self.network_timeout("output at block", self.rollup.output_at_block(block_number)).await?;

        if output.version != SUPPORTED_OUTPUT_VERSION {
            return Err(SubmitterError::UnsupportedOutputVersion {
                got: output.version,
                supported: SUPPORTED_OUTPUT_VERSION,
            });
        }

        if output.block_ref.number != block_number {
            return Err(SubmitterError::BlockNumberMismatch {
                got: output.block_ref.number,
                requested: block_number,
            });
        }

        Ok(output)
    }

    /// Whether the output's block is old enough to be proposed, given the
    /// finality the operator is willing to accept.
    fn should_propose(&self, output: &OutputResponse) -> bool {
        let number = output.block_ref.number;
        let status = &output.sync_status;

        // Derived from finalized L1 data: always safe to propose.
        if number <= status.finalized_l2.number {
            return true;
        }

        // Derived from safe L1 data: only if the operator opted in.
        if self.cfg.allow_non_finalized && number <= status.safe_l2.number {
            return true;
        }

        debug!(
            block = number,
            finalized_l2 = status.finalized_l2.number,
            safe_l2 = status.safe_l2.number,
            "Output is not yet eligible for proposal"
        );
        false
    }

    /// Dispatch a proposal: wait for the L1 view to settle, then send the
    /// transaction and wait for its confirmation, bounded by [`PROPOSAL_TIMEOUT`].
    async fn propose_output(&self, to: Address, tx_data: Bytes, value: U256, output: &OutputResponse) {
        // The rollup node's L1 view must be behind the actual chain before we
        // send, otherwise the contract may reject the pinned L1 block.
        if let Err(err) = self.wait_for_l1_head(output.sync_status.head_l1.number).await {
            warn!(%err, "Aborting proposal while waiting for the L1 head");
            return;
        }

        match timeout(PROPOSAL_TIMEOUT, self.send_proposal(to, tx_data, value, output)).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                error!(%err, "Failed to submit output proposal");
                SubmitterMetrics::increment_proposal_failures(err.to_string());
            }
            Err(_) => {
                error!(block = output.block_ref.number, "Output proposal timed out");
                SubmitterMetrics::increment_proposal_failures("timeout".to_owned());
            }
        }
    }

    /// Poll the L1 chain until its head is strictly past the given block number.
    async fn wait_for_l1_head(&self, target: BlockNumber) -> SubmitterResult<()> {
        let mut head = self.network_timeout("l1 head", self.txmgr.block_number()).await?;

        while head <= target {
            debug!(head, target, "Waiting for the L1 head to advance");
            tokio::select! {
                biased;
                () = self.shutdown.cancelled() => return Err(SubmitterError::ShuttingDown),
                () = sleep(self.cfg.poll_interval) => {}
            }
            head = self.network_timeout("l1 head", self.txmgr.block_number()).await?;
        }

        SubmitterMetrics::set_l1_head_number(head);
        Ok(())
    }

    /// Send the proposal transaction and interpret its receipt.
    async fn send_proposal(
        &self,
        to: Address,
        tx_data: Bytes,
        value: U256,
        output: &OutputResponse,
    ) -> SubmitterResult<()> {
        info!(summary = output.summary(), "Proposing L2 output");
        let start = Instant::now();

        let receipt = self.txmgr.send(TxCandidate { tx_data, to, value }).await?;
        SubmitterMetrics::record_proposal_inclusion_time(start.elapsed());

        if receipt.status() {
            info!(
                tx_hash = %receipt.transaction_hash,
                block = output.block_ref.number,
                "Output proposal confirmed"
            );
            SubmitterMetrics::increment_proposals_submitted();
            SubmitterMetrics::set_latest_proposed_block(output.block_ref.number);
        } else {
            // Included but reverted. No point re-sending the same data right
            // away: the next tick re-evaluates from fresh chain state.
            error!(
                tx_hash = %receipt.transaction_hash,
                block = output.block_ref.number,
                "Output proposal transaction reverted"
            );
            SubmitterMetrics::increment_proposals_reverted();
        }

        Ok(())
    }

    /// Apply the configured network timeout to a single RPC or contract call.
    async fn network_timeout<V, E>(
        &self,
        what: &'static str,
        fut: impl Future<Output = Result<V, E>>,
    ) -> SubmitterResult<V>
    where
        SubmitterError: From<E>,
    {
        match timeout(self.cfg.network_timeout, fut).await {
            Ok(res) => res.map_err(SubmitterError::from),
            Err(_) => Err(SubmitterError::Timeout(what)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::{HashMap, VecDeque},
        sync::{
            Mutex as StdMutex,
            atomic::{AtomicU64, AtomicUsize, Ordering},
        },
    };

    use alloy::{
        consensus::{Receipt, ReceiptEnvelope, ReceiptWithBloom},
        contract::Result as ContractResult,
        rpc::types::TransactionReceipt,
        transports::{TransportErrorKind, TransportResult},
    };
    use alloy_primitives::{B256, Bloom};
    use alloy_sol_types::SolCall;
    use outpost_chainio::{factory::IDisputeGameFactory, oracle::IL2OutputOracle};
    use outpost_primitives::output::{L2BlockRef, SyncStatus};

    use super::*;

    fn test_cfg() -> SubmitterConfig {
        SubmitterConfig {
            poll_interval: Duration::from_millis(10),
            proposal_interval: Duration::from_millis(10),
            output_retry_interval: Duration::from_millis(5),
            network_timeout: Duration::from_secs(1),
            allow_non_finalized: false,
            wait_node_sync: false,
        }
    }

    fn status_with(finalized_l2: u64, safe_l2: u64, head_l1: u64) -> SyncStatus {
        let mut status = SyncStatus::default();
        status.finalized_l2.number = finalized_l2;
        status.safe_l2.number = safe_l2;
        status.head_l1.number = head_l1;
        status
    }

    fn output_at(number: u64, status: SyncStatus) -> OutputResponse {
        OutputResponse {
            version: SUPPORTED_OUTPUT_VERSION,
            output_root: B256::repeat_byte(0x42),
            block_ref: L2BlockRef { number, ..Default::default() },
            sync_status: status,
            ..Default::default()
        }
    }

    fn test_receipt(success: bool) -> TransactionReceipt {
        TransactionReceipt {
            inner: ReceiptEnvelope::Legacy(ReceiptWithBloom {
                receipt: Receipt {
                    status: success.into(),
                    cumulative_gas_used: 21_000,
                    logs: vec![],
                },
                logs_bloom: Bloom::ZERO,
            }),
            transaction_hash: B256::repeat_byte(0x77),
            transaction_index: None,
            block_hash: None,
            block_number: None,
            gas_used: 21_000,
            effective_gas_price: 0,
            blob_gas_used: None,
            blob_gas_price: None,
            from: Address::ZERO,
            to: None,
            contract_address: None,
        }
    }

    #[derive(Default)]
    struct MockRollup {
        status: StdMutex<SyncStatus>,
        outputs: StdMutex<HashMap<BlockNumber, OutputResponse>>,
        output_calls: AtomicUsize,
        output_failures: AtomicUsize,
    }

    impl RollupNode for Arc<MockRollup> {
        async fn sync_status(&self) -> TransportResult<SyncStatus> {
            Ok(*self.status.lock().unwrap())
        }

        async fn output_at_block(
            &self,
            block_number: BlockNumber,
        ) -> TransportResult<OutputResponse> {
            self.output_calls.fetch_add(1, Ordering::SeqCst);
            if self.output_failures.load(Ordering::SeqCst) > 0 {
                self.output_failures.fetch_sub(1, Ordering::SeqCst);
                return Err(TransportErrorKind::custom_str("output not available"));
            }
            self.outputs
                .lock()
                .unwrap()
                .get(&block_number)
                .cloned()
                .ok_or_else(|| TransportErrorKind::custom_str("unknown block"))
        }
    }

    #[derive(Default)]
    struct MockOracle {
        next_block: AtomicU64,
    }

    impl OutputOracle for Arc<MockOracle> {
        async fn version(&self) -> ContractResult<String> {
            Ok("1.8.0".to_owned())
        }

        async fn next_block_number(&self) -> ContractResult<BlockNumber> {
            Ok(self.next_block.load(Ordering::SeqCst))
        }

        fn address(&self) -> Address {
            Address::repeat_byte(0x0a)
        }
    }

    #[derive(Default)]
    struct MockFactory {
        bond: U256,
    }

    impl GameFactory for Arc<MockFactory> {
        async fn version(&self) -> ContractResult<String> {
            Ok("1.0.1".to_owned())
        }

        async fn init_bond(&self, _game_type: u32) -> ContractResult<U256> {
            Ok(self.bond)
        }

        fn address(&self) -> Address {
            Address::repeat_byte(0x0f)
        }
    }

    #[derive(Default)]
    struct MockTxManager {
        sent: StdMutex<Vec<TxCandidate>>,
        heads: StdMutex<VecDeque<u64>>,
        head_calls: AtomicUsize,
        fail_heads: bool,
        revert: bool,
    }

    impl MockTxManager {
        fn with_heads(heads: impl IntoIterator<Item = u64>) -> Arc<Self> {
            Arc::new(Self { heads: StdMutex::new(heads.into_iter().collect()), ..Self::default() })
        }
    }

    impl TxManager for Arc<MockTxManager> {
        async fn send(&self, candidate: TxCandidate) -> SubmitterResult<TransactionReceipt> {
            self.sent.lock().unwrap().push(candidate);
            Ok(test_receipt(!self.revert))
        }

        async fn block_number(&self) -> TransportResult<u64> {
            self.head_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_heads {
                return Err(TransportErrorKind::custom_str("no head"));
            }
            let mut heads = self.heads.lock().unwrap();
            // The last head repeats forever.
            if heads.len() > 1 {
                Ok(heads.pop_front().expect("non-empty"))
            } else {
                heads.front().copied().ok_or_else(|| TransportErrorKind::custom_str("no head"))
            }
        }

        fn sender(&self) -> Address {
            Address::repeat_byte(0x5e)
        }
    }

    type TestSubmitter =
        OutputSubmitter<Arc<MockRollup>, Arc<MockTxManager>, Arc<MockOracle>, Arc<MockFactory>>;

    fn oracle_submitter(
        cfg: SubmitterConfig,
        rollup: &Arc<MockRollup>,
        txmgr: &Arc<MockTxManager>,
        oracle: &Arc<MockOracle>,
    ) -> TestSubmitter {
        OutputSubmitter::new(cfg, Arc::clone(rollup), Arc::clone(txmgr), Mode::Oracle(Arc::clone(oracle)))
    }

    fn factory_submitter(
        cfg: SubmitterConfig,
        rollup: &Arc<MockRollup>,
        txmgr: &Arc<MockTxManager>,
        factory: &Arc<MockFactory>,
        game_type: u32,
    ) -> TestSubmitter {
        OutputSubmitter::new(
            cfg,
            Arc::clone(rollup),
            Arc::clone(txmgr),
            Mode::Factory { factory: Arc::clone(factory), game_type },
        )
    }

    #[test]
    fn mode_selection_requires_exactly_one_contract() {
        let oracle = Arc::new(MockOracle::default());
        let factory = Arc::new(MockFactory::default());

        assert!(matches!(
            Mode::<Arc<MockOracle>, Arc<MockFactory>>::select(None, None, 0),
            Err(SubmitterError::NoModeAddress)
        ));
        assert!(matches!(
            Mode::select(Some(Arc::clone(&oracle)), Some(Arc::clone(&factory)), 0),
            Err(SubmitterError::AmbiguousModeAddress)
        ));
        assert!(matches!(
            Mode::<_, Arc<MockFactory>>::select(Some(oracle), None, 0),
            Ok(Mode::Oracle(_))
        ));
        assert!(matches!(
            Mode::<Arc<MockOracle>, _>::select(None, Some(factory), 6),
            Ok(Mode::Factory { game_type: 6, .. })
        ));
    }

    #[tokio::test]
    async fn fetch_output_rejects_unsupported_version() {
        let rollup = Arc::new(MockRollup::default());
        let mut bad = output_at(420, SyncStatus::default());
        bad.version = B256::repeat_byte(0x01);
        rollup.outputs.lock().unwrap().insert(420, bad);

        let txmgr = MockTxManager::with_heads([0]);
        let oracle = Arc::new(MockOracle::default());
        let submitter = oracle_submitter(test_cfg(), &rollup, &txmgr, &oracle);

        let err = submitter.inner.fetch_output(420).await.unwrap_err();
        assert!(matches!(
            err,
            SubmitterError::UnsupportedOutputVersion { got, supported }
                if got == B256::repeat_byte(0x01) && supported == SUPPORTED_OUTPUT_VERSION
        ));
    }

    #[tokio::test]
    async fn fetch_output_rejects_mismatched_block_number() {
        let rollup = Arc::new(MockRollup::default());
        rollup.outputs.lock().unwrap().insert(420, output_at(419, SyncStatus::default()));

        let txmgr = MockTxManager::with_heads([0]);
        let oracle = Arc::new(MockOracle::default());
        let submitter = oracle_submitter(test_cfg(), &rollup, &txmgr, &oracle);

        let err = submitter.inner.fetch_output(420).await.unwrap_err();
        assert!(matches!(
            err,
            SubmitterError::BlockNumberMismatch { got: 419, requested: 420 }
        ));
    }

    #[tokio::test]
    async fn oracle_decision_waits_without_fetching_until_node_catches_up() {
        let rollup = Arc::new(MockRollup::default());
        *rollup.status.lock().unwrap() = status_with(150, 160, 10);

        let txmgr = MockTxManager::with_heads([0]);
        let oracle = Arc::new(MockOracle::default());
        oracle.next_block.store(200, Ordering::SeqCst);

        let submitter = oracle_submitter(test_cfg(), &rollup, &txmgr, &oracle);

        let decision = submitter.inner.fetch_oracle_output(&oracle).await.unwrap();
        assert!(matches!(decision, ProposalDecision::Wait));
        // The output must not be computed for a block we cannot propose yet.
        assert_eq!(rollup.output_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn oracle_decision_proposes_safe_output_when_non_finalized_allowed() {
        let status = status_with(100, 105, 10);
        let rollup = Arc::new(MockRollup::default());
        *rollup.status.lock().unwrap() = status;
        rollup.outputs.lock().unwrap().insert(103, output_at(103, status));

        let txmgr = MockTxManager::with_heads([0]);
        let oracle = Arc::new(MockOracle::default());
        oracle.next_block.store(103, Ordering::SeqCst);

        let mut cfg = test_cfg();
        cfg.allow_non_finalized = true;
        let submitter = oracle_submitter(cfg, &rollup, &txmgr, &oracle);

        let decision = submitter.inner.fetch_oracle_output(&oracle).await.unwrap();
        assert!(matches!(decision, ProposalDecision::Propose(output) if output.block_ref.number == 103));
    }

    #[tokio::test]
    async fn finality_gate_rejects_safe_only_output_by_default() {
        let rollup = Arc::new(MockRollup::default());
        let txmgr = MockTxManager::with_heads([0]);
        let oracle = Arc::new(MockOracle::default());
        let submitter = oracle_submitter(test_cfg(), &rollup, &txmgr, &oracle);

        // Block 103 is past the finalized head (100) but within the safe head (105).
        let output = output_at(103, status_with(100, 105, 10));
        assert!(!submitter.inner.should_propose(&output));

        // A finalized block is always eligible.
        let output = output_at(100, status_with(100, 105, 10));
        assert!(submitter.inner.should_propose(&output));
    }

    #[tokio::test]
    async fn factory_output_fetch_retries_until_success() {
        let status = status_with(420, 420, 10);
        let rollup = Arc::new(MockRollup::default());
        *rollup.status.lock().unwrap() = status;
        rollup.outputs.lock().unwrap().insert(420, output_at(420, status));
        rollup.output_failures.store(2, Ordering::SeqCst);

        let txmgr = MockTxManager::with_heads([0]);
        let factory = Arc::new(MockFactory::default());
        let submitter = factory_submitter(test_cfg(), &rollup, &txmgr, &factory, 0);

        let output = submitter.inner.fetch_factory_output_with_retries().await;
        assert_eq!(output.unwrap().block_ref.number, 420);
        // Two failed attempts, then the successful one.
        assert_eq!(rollup.output_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn wait_for_l1_head_polls_until_strictly_past_target() {
        let rollup = Arc::new(MockRollup::default());
        let txmgr = MockTxManager::with_heads([99, 100, 101]);
        let oracle = Arc::new(MockOracle::default());
        let submitter = oracle_submitter(test_cfg(), &rollup, &txmgr, &oracle);

        submitter.inner.wait_for_l1_head(100).await.unwrap();
        assert_eq!(txmgr.head_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn wait_for_l1_head_aborts_on_shutdown() {
        let rollup = Arc::new(MockRollup::default());
        let txmgr = MockTxManager::with_heads([99]);
        let oracle = Arc::new(MockOracle::default());
        let submitter = oracle_submitter(test_cfg(), &rollup, &txmgr, &oracle);

        submitter.inner.shutdown.cancel();
        let err = submitter.inner.wait_for_l1_head(100).await.unwrap_err();
        assert!(matches!(err, SubmitterError::ShuttingDown));
    }

    #[tokio::test]
    async fn stop_fails_when_not_running() {
        let rollup = Arc::new(MockRollup::default());
        let txmgr = MockTxManager::with_heads([0]);
        let oracle = Arc::new(MockOracle::default());
        let submitter = oracle_submitter(test_cfg(), &rollup, &txmgr, &oracle);

        assert!(matches!(submitter.stop().await, Err(SubmitterError::NotRunning)));

        // The soft variant swallows the error.
        submitter.stop_if_running().await;
        assert!(!submitter.is_running().await);
    }

    #[tokio::test]
    async fn start_twice_fails_with_already_running() {
        let rollup = Arc::new(MockRollup::default());
        // next_block stays at 0 while the node is at 0 too, so the loop idles.
        let txmgr = MockTxManager::with_heads([0]);
        let oracle = Arc::new(MockOracle::default());
        oracle.next_block.store(u64::MAX, Ordering::SeqCst);

        let submitter = oracle_submitter(test_cfg(), &rollup, &txmgr, &oracle);

        submitter.start().await.unwrap();
        assert!(submitter.is_running().await);
        assert!(matches!(submitter.start().await, Err(SubmitterError::AlreadyRunning)));

        submitter.stop().await.unwrap();
        assert!(!submitter.is_running().await);
    }

    #[tokio::test]
    async fn oracle_loop_proposes_eligible_output_end_to_end() {
        let status = status_with(420, 425, 105);
        let rollup = Arc::new(MockRollup::default());
        *rollup.status.lock().unwrap() = status;
        rollup.outputs.lock().unwrap().insert(420, output_at(420, status));

        // Head is already past the output's L1 view, so dispatch is immediate.
        let txmgr = MockTxManager::with_heads([200]);
        let oracle = Arc::new(MockOracle::default());
        oracle.next_block.store(420, Ordering::SeqCst);

        let submitter = oracle_submitter(test_cfg(), &rollup, &txmgr, &oracle);
        submitter.start().await.unwrap();
        sleep(Duration::from_millis(100)).await;
        submitter.stop().await.unwrap();

        let sent = txmgr.sent.lock().unwrap();
        assert!(!sent.is_empty(), "expected at least one proposal to be sent");

        let candidate = &sent[0];
        assert_eq!(candidate.to, Address::repeat_byte(0x0a));
        assert_eq!(candidate.value, U256::ZERO);

        let call = IL2OutputOracle::proposeL2OutputCall::abi_decode(&candidate.tx_data).unwrap();
        assert_eq!(call._outputRoot, B256::repeat_byte(0x42));
        assert_eq!(call._l2BlockNumber, U256::from(420));
    }

    #[tokio::test]
    async fn factory_loop_creates_game_with_bond_attached() {
        let status = status_with(420, 425, 105);
        let rollup = Arc::new(MockRollup::default());
        *rollup.status.lock().unwrap() = status;
        rollup.outputs.lock().unwrap().insert(420, output_at(420, status));

        let txmgr = MockTxManager::with_heads([200]);
        let factory = Arc::new(MockFactory { bond: U256::from(7) });

        let submitter = factory_submitter(test_cfg(), &rollup, &txmgr, &factory, 6);
        submitter.start().await.unwrap();
        sleep(Duration::from_millis(100)).await;
        submitter.stop().await.unwrap();

        let sent = txmgr.sent.lock().unwrap();
        assert!(!sent.is_empty(), "expected at least one game creation to be sent");

        let candidate = &sent[0];
        assert_eq!(candidate.to, Address::repeat_byte(0x0f));
        assert_eq!(candidate.value, U256::from(7));

        let call = IDisputeGameFactory::createCall::abi_decode(&candidate.tx_data).unwrap();
        assert_eq!(call._gameType, 6);
        assert_eq!(call._rootClaim, B256::repeat_byte(0x42));
        assert_eq!(call._extraData, Bytes::from(U256::from(420u64).to_be_bytes::<32>()));
    }

    #[tokio::test]
    async fn no_dispatch_after_stop() {
        let status = status_with(420, 425, 105);
        let rollup = Arc::new(MockRollup::default());
        *rollup.status.lock().unwrap() = status;
        rollup.outputs.lock().unwrap().insert(420, output_at(420, status));

        let txmgr = MockTxManager::with_heads([200]);
        let oracle = Arc::new(MockOracle::default());
        oracle.next_block.store(420, Ordering::SeqCst);

        let submitter = oracle_submitter(test_cfg(), &rollup, &txmgr, &oracle);
        submitter.start().await.unwrap();
        sleep(Duration::from_millis(50)).await;
        submitter.stop().await.unwrap();

        let sent_at_stop = txmgr.sent.lock().unwrap().len();
        sleep(Duration::from_millis(50)).await;
        assert_eq!(txmgr.sent.lock().unwrap().len(), sent_at_stop);
    }

    #[tokio::test]
    async fn reverted_proposal_is_recorded_but_not_a_failure() {
        let rollup = Arc::new(MockRollup::default());
        let txmgr =
            Arc::new(MockTxManager { revert: true, ..MockTxManager::default() });
        let oracle = Arc::new(MockOracle::default());
        let submitter = oracle_submitter(test_cfg(), &rollup, &txmgr, &oracle);

        let output = output_at(420, status_with(420, 425, 105));
        let result = submitter
            .inner
            .send_proposal(Address::repeat_byte(0x0a), Bytes::new(), U256::ZERO, &output)
            .await;

        // A confirmed-but-reverted transaction is not a dispatch fault.
        assert!(result.is_ok());
        assert_eq!(txmgr.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn worker_exits_when_node_sync_gate_fails() {
        let rollup = Arc::new(MockRollup::default());
        let txmgr = Arc::new(MockTxManager { fail_heads: true, ..MockTxManager::default() });
        let oracle = Arc::new(MockOracle::default());

        let mut cfg = test_cfg();
        cfg.wait_node_sync = true;
        let submitter = oracle_submitter(cfg, &rollup, &txmgr, &oracle);

        submitter.start().await.unwrap();
        sleep(Duration::from_millis(50)).await;
        submitter.stop().await.unwrap();

        assert!(txmgr.sent.lock().unwrap().is_empty());
    }
}
