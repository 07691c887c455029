use alloy::{
    rpc::client::{ClientBuilder, RpcClient},
    transports::TransportResult,
};
use alloy_primitives::{BlockNumber, U64};
use outpost_primitives::{
    output::{OutputResponse, SyncStatus},
    retries::default_retry_layer,
};
use url::Url;

/// An HTTP-based JSON-RPC client for the rollup node (consensus layer driver).
///
/// Exposes the `optimism_` namespace methods the submitter needs: the node's
/// sync status and output roots at specific L2 block numbers.
#[derive(Clone, Debug)]
pub struct RollupClient {
    rpc: RpcClient,
}

impl RollupClient {
    /// Create a new [`RollupClient`] with the given HTTP URL.
    pub fn new<U: Into<Url>>(http_url: U) -> Self {
        let rpc = ClientBuilder::default().layer(default_retry_layer()).http(http_url.into());

        Self { rpc }
    }

    /// Get the rollup node's view of L1 and L2 chain progress.
    pub async fn sync_status(&self) -> TransportResult<SyncStatus> {
        self.rpc.request("optimism_syncStatus", ()).await
    }

    /// Get the output root the rollup node computed for the given L2 block
    /// number, along with a sync status snapshot taken at the same time.
    ///
    /// The response is returned as-is: callers are responsible for checking
    /// the version tag and that the block number matches the request.
    pub async fn output_at_block(&self, block_number: BlockNumber) -> TransportResult<OutputResponse> {
        self.rpc.request("optimism_outputAtBlock", (U64::from(block_number),)).await
    }
}
