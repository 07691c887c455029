#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! Chain I/O module to interact with smart contracts on EVM chains.

use alloy::{
    contract::Error as ContractError,
    network::EthereumWallet,
    providers::{
        RootProvider,
        fillers::{
            BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller,
            SimpleNonceManager, WalletFiller,
        },
        utils::JoinedRecommendedFillers,
    },
    rpc::client::RpcClient,
    signers::local::PrivateKeySigner,
};
use alloy_sol_types::SolInterface;

/// `L2OutputOracle` contract bindings.
pub mod oracle;

/// `DisputeGameFactory` contract bindings.
pub mod factory;

/// Alias to the joined recommended fillers + wallet filler for Ethereum wallets.
pub type JoinedWalletFillers = JoinFill<JoinedRecommendedFillers, WalletFiller<EthereumWallet>>;

/// Alias to the default provider with all recommended fillers (read-only).
pub type DefaultProvider = FillProvider<JoinedRecommendedFillers, RootProvider>;

/// Alias to the default fillers with a simple nonce manager instead of the default cached one.
pub type DefaultFillersWithSimpleNonceManager = JoinFill<
    GasFiller,
    JoinFill<BlobGasFiller, JoinFill<NonceFiller<SimpleNonceManager>, ChainIdFiller>>,
>;

/// Alias to the wallet provider with recommended fillers (read + write) and a simple nonce manager.
pub type WalletProviderWithSimpleNonceManager = FillProvider<
    JoinFill<DefaultFillersWithSimpleNonceManager, WalletFiller<EthereumWallet>>,
    RootProvider,
>;

/// Create a new wallet provider with a simple nonce manager instead of the default cached one.
/// We have to build the entire provider fill stack manually.
///
/// This is necessary after alloy 0.14.0 because of: <https://github.com/alloy-rs/alloy/pull/2289>
pub fn new_wallet_provider_with_simple_nonce_management(
    rpc_client: RpcClient,
    wallet: PrivateKeySigner,
) -> WalletProviderWithSimpleNonceManager {
    FillProvider::new(
        RootProvider::new(rpc_client),
        JoinFill::new(
            JoinFill::new(
                GasFiller,
                JoinFill::new(
                    BlobGasFiller::default(),
                    JoinFill::new(
                        NonceFiller::new(SimpleNonceManager::default()),
                        ChainIdFiller::default(),
                    ),
                ),
            ),
            WalletFiller::new(wallet.into()),
        ),
    )
}

/// Try to decode a contract error into a specific Solidity error interface.
/// If the error cannot be decoded or it is not a contract error, return the original error.
///
/// See also [`ContractError::as_decoded_interface_error`] for more details.
pub fn try_parse_contract_error<I: SolInterface>(error: ContractError) -> Result<I, ContractError> {
    error.as_decoded_interface_error::<I>().ok_or(error)
}
