//! Traits for the collaborators of the submission worker.
//!
//! The worker is generic over these so that its decision logic can be
//! exercised in tests without a live node or chain.

use std::future::Future;

use alloy::{
    contract::Result as ContractResult, rpc::types::TransactionReceipt,
    transports::TransportResult,
};
use alloy_primitives::{Address, BlockNumber, U256};
use outpost_chainio::{factory::DisputeGameFactory, oracle::L2OutputOracle};
use outpost_clients::rollup::RollupClient;
use outpost_primitives::output::{OutputResponse, SyncStatus};

use crate::{error::SubmitterResult, txmgr::TxCandidate};

/// A rollup node that can report its sync progress and compute output roots.
pub trait RollupNode: Send + Sync + 'static {
    /// Get the node's view of L1 and L2 chain progress.
    fn sync_status(&self) -> impl Future<Output = TransportResult<SyncStatus>> + Send;

    /// Get the output root the node computed for the given L2 block number.
    fn output_at_block(
        &self,
        block_number: BlockNumber,
    ) -> impl Future<Output = TransportResult<OutputResponse>> + Send;
}

/// An `L2OutputOracle` contract that tracks which L2 block must be proposed next.
pub trait OutputOracle: Send + Sync + 'static {
    /// The semantic version of the deployed contract.
    fn version(&self) -> impl Future<Output = ContractResult<String>> + Send;

    /// The L2 block number expected by the next output proposal.
    fn next_block_number(&self) -> impl Future<Output = ContractResult<BlockNumber>> + Send;

    /// The address proposals must be sent to.
    fn address(&self) -> Address;
}

/// A `DisputeGameFactory` contract that accepts output roots as game root claims.
pub trait GameFactory: Send + Sync + 'static {
    /// The semantic version of the deployed contract.
    fn version(&self) -> impl Future<Output = ContractResult<String>> + Send;

    /// The bond required to create a game of the given type, in wei.
    fn init_bond(&self, game_type: u32) -> impl Future<Output = ContractResult<U256>> + Send;

    /// The address proposals must be sent to.
    fn address(&self) -> Address;
}

/// A transaction manager that signs, sends and confirms L1 transactions.
pub trait TxManager: Send + Sync + 'static {
    /// Send the given candidate and wait for its receipt.
    fn send(
        &self,
        candidate: TxCandidate,
    ) -> impl Future<Output = SubmitterResult<TransactionReceipt>> + Send;

    /// The latest L1 block number.
    fn block_number(&self) -> impl Future<Output = TransportResult<u64>> + Send;

    /// The address transactions are sent from.
    fn sender(&self) -> Address;
}

impl RollupNode for RollupClient {
    async fn sync_status(&self) -> TransportResult<SyncStatus> {
        RollupClient::sync_status(self).await
    }

    async fn output_at_block(&self, block_number: BlockNumber) -> TransportResult<OutputResponse> {
        RollupClient::output_at_block(self, block_number).await
    }
}

impl OutputOracle for L2OutputOracle {
    async fn version(&self) -> ContractResult<String> {
        L2OutputOracle::version(self).await
    }

    async fn next_block_number(&self) -> ContractResult<BlockNumber> {
        L2OutputOracle::next_block_number(self).await
    }

    fn address(&self) -> Address {
        self.contract_address()
    }
}

impl GameFactory for DisputeGameFactory {
    async fn version(&self) -> ContractResult<String> {
        DisputeGameFactory::version(self).await
    }

    async fn init_bond(&self, game_type: u32) -> ContractResult<U256> {
        DisputeGameFactory::init_bond(self, game_type).await
    }

    fn address(&self) -> Address {
        self.contract_address()
    }
}
