use alloy::{
    providers::{
        Provider, ProviderBuilder, RootProvider, fillers::FillProvider,
        utils::JoinedRecommendedFillers,
    },
    rpc::{
        client::{ClientBuilder, RpcClient},
        types::{Block, BlockNumberOrTag, Header, SyncStatus},
    },
    transports::{TransportErrorKind, TransportResult},
};
use alloy_primitives::U64;
use derive_more::derive::{Deref, DerefMut};
use outpost_primitives::retries::default_retry_layer;
use url::Url;

/// An HTTP-based JSON-RPC execution client provider that supports batching.
///
/// This struct is a wrapper over an inner [`RootProvider`] and extends it with
/// methods that are relevant to output submission.
#[derive(Clone, Debug, Deref, DerefMut)]
pub struct ExecutionClient {
    /// The custom RPC client that allows us to add custom batching and extend the provider.
    rpc: RpcClient,
    /// The inner provider that implements all the JSON-RPC methods, that can be
    /// easily used via dereferencing this struct.
    #[deref]
    #[deref_mut]
    inner: FillProvider<JoinedRecommendedFillers, RootProvider>,
}

impl ExecutionClient {
    /// Create a new [`ExecutionClient`] with the given HTTP URL.
    pub fn new<U: Into<Url>>(http_url: U) -> Self {
        let rpc = ClientBuilder::default().layer(default_retry_layer()).http(http_url.into());
        let inner = ProviderBuilder::new().connect_client(rpc.clone());

        Self { rpc, inner }
    }

    /// Get the latest block number.
    pub async fn get_head(&self) -> TransportResult<u64> {
        let result: U64 = self.rpc.request("eth_blockNumber", ()).await?;

        Ok(result.to())
    }

    /// Get the header of the block with the given number. If `None`, the latest block is returned.
    pub async fn get_header(&self, block_number: Option<u64>) -> TransportResult<Header> {
        let tag = block_number.map_or(BlockNumberOrTag::Latest, BlockNumberOrTag::Number);

        let block: Option<Block> = self.rpc.request("eth_getBlockByNumber", (tag, false)).await?;
        block
            .map(|b| b.header)
            .ok_or_else(|| TransportErrorKind::custom_str(&format!("Block not found: {tag}")))
    }

    /// Check if the client is synced. Returns `true` if the client is synced.
    pub async fn is_synced(&self) -> TransportResult<bool> {
        let status = self.syncing().await?;
        Ok(matches!(status, SyncStatus::None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_head_parses_hex_quantity() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"jsonrpc":"2.0","id":0,"result":"0x539"}"#)
            .expect(1)
            .create_async()
            .await;

        let client = ExecutionClient::new(Url::parse(&server.url()).unwrap());
        let head = client.get_head().await.unwrap();

        mock.assert_async().await;
        assert_eq!(head, 1337);
    }
}
