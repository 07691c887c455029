use alloy::{
    network::TransactionBuilder,
    providers::Provider,
    rpc::{
        client::ClientBuilder,
        types::{TransactionReceipt, TransactionRequest},
    },
    signers::local::PrivateKeySigner,
    transports::TransportResult,
};
use alloy_primitives::{Address, Bytes, U256};
use outpost_chainio::{
    WalletProviderWithSimpleNonceManager, new_wallet_provider_with_simple_nonce_management,
};
use outpost_clients::execution::ExecutionClient;
use outpost_primitives::retries::default_retry_layer;
use tracing::debug;
use url::Url;

use crate::{error::SubmitterResult, traits::TxManager};

/// A transaction ready to be signed and dispatched.
#[derive(Debug, Clone)]
pub struct TxCandidate {
    /// The calldata of the transaction.
    pub tx_data: Bytes,
    /// The contract address the transaction is sent to.
    pub to: Address,
    /// The ETH value attached to the transaction, in wei.
    pub value: U256,
}

/// A [`TxManager`] that signs transactions with a local wallet and sends them
/// through an L1 execution client.
///
/// Gas, nonce and chain-id filling are delegated to the provider stack, with a
/// simple (non-cached) nonce manager so a dropped transaction never wedges the
/// submitter on a stale nonce.
#[derive(Debug, Clone)]
pub struct WalletTxManager {
    provider: WalletProviderWithSimpleNonceManager,
    el: ExecutionClient,
    sender: Address,
}

impl WalletTxManager {
    /// Create a new [`WalletTxManager`] sending through the given L1 execution client.
    pub fn new<U: Into<Url>>(el_url: U, wallet: PrivateKeySigner) -> Self {
        let el_url = el_url.into();
        let sender = wallet.address();

        let rpc = ClientBuilder::default().layer(default_retry_layer()).http(el_url.clone());
        let provider = new_wallet_provider_with_simple_nonce_management(rpc, wallet);
        let el = ExecutionClient::new(el_url);

        Self { provider, el, sender }
    }
}

impl TxManager for WalletTxManager {
    async fn send(&self, candidate: TxCandidate) -> SubmitterResult<TransactionReceipt> {
        let request = TransactionRequest::default()
            .with_from(self.sender)
            .with_to(candidate.to)
            .with_value(candidate.value)
            .with_input(candidate.tx_data);

        let pending = self.provider.send_transaction(request).await?;
        debug!(tx_hash = %pending.tx_hash(), "Sent proposal transaction");

        Ok(pending.get_receipt().await?)
    }

    async fn block_number(&self) -> TransportResult<u64> {
        self.el.get_head().await
    }

    fn sender(&self) -> Address {
        self.sender
    }
}
