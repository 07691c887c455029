use IDisputeGameFactory::{IDisputeGameFactoryErrors, IDisputeGameFactoryInstance};
use alloy::{contract::Result as ContractResult, rpc::client::ClientBuilder, sol};
use alloy_primitives::{Address, B256, BlockNumber, Bytes, U256};
use alloy_sol_types::{Error as SolError, SolCall};
use derive_more::derive::Deref;
use outpost_primitives::retries::default_retry_layer;
use tracing::error;
use url::Url;

use crate::{DefaultProvider, try_parse_contract_error};

/// A wrapper over a `DisputeGameFactory` contract that exposes read-only utility methods.
///
/// Game creation is not sent through this instance. The submitter builds the
/// raw calldata with [`create_game_tx_data`] and dispatches it through its own
/// transaction manager, attaching the bond returned by
/// [`DisputeGameFactory::init_bond`] as the transaction value.
#[derive(Debug, Clone, Deref)]
pub struct DisputeGameFactory(IDisputeGameFactoryInstance<DefaultProvider>);

impl DisputeGameFactory {
    /// Create a new `DisputeGameFactory` instance at the given contract address.
    pub fn new<U: Into<Url>>(el_client_url: U, address: Address) -> Self {
        let client =
            ClientBuilder::default().layer(default_retry_layer()).http(el_client_url.into());
        let provider = alloy::providers::ProviderBuilder::new().connect_client(client);

        Self(IDisputeGameFactoryInstance::new(address, provider))
    }

    /// The address of the factory contract.
    pub fn contract_address(&self) -> Address {
        *self.0.address()
    }

    /// Retrieves the semantic version of the deployed factory contract.
    pub async fn version(&self) -> ContractResult<String> {
        match self.0.version().call().await {
            Ok(version) => Ok(version),
            Err(err) => {
                error!("Failed to call version: {:?}", err);
                let decoded_error = try_parse_contract_error::<IDisputeGameFactoryErrors>(err)?;
                Err(SolError::custom(format!("{decoded_error:?}")).into())
            }
        }
    }

    /// Retrieves the bond required to create a game of the given type, in wei.
    pub async fn init_bond(&self, game_type: u32) -> ContractResult<U256> {
        match self.0.initBonds(game_type).call().await {
            Ok(bond) => Ok(bond),
            Err(err) => {
                let decoded_error = try_parse_contract_error::<IDisputeGameFactoryErrors>(err)?;
                Err(SolError::custom(format!("{decoded_error:?}")).into())
            }
        }
    }

    /// Retrieves the total number of games created by this factory.
    pub async fn game_count(&self) -> ContractResult<U256> {
        match self.0.gameCount().call().await {
            Ok(count) => Ok(count),
            Err(err) => {
                let decoded_error = try_parse_contract_error::<IDisputeGameFactoryErrors>(err)?;
                Err(SolError::custom(format!("{decoded_error:?}")).into())
            }
        }
    }
}

/// Builds the `create` calldata proposing the given output root as the root
/// claim of a new dispute game.
///
/// The L2 block number is packed into the game's extra data as a left-padded
/// 32-byte big-endian integer, as fault dispute games expect.
pub fn create_game_tx_data(game_type: u32, output_root: B256, block_number: BlockNumber) -> Bytes {
    IDisputeGameFactory::createCall {
        _gameType: game_type,
        _rootClaim: output_root,
        _extraData: U256::from(block_number).to_be_bytes::<32>().into(),
    }
    .abi_encode()
    .into()
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    interface IDisputeGameFactory {
        error GameAlreadyExists(bytes32 uuid);
        error NoImplementation(uint32 gameType);
        error InsufficientBond();
        error Error(string);

        #[derive(Default)]
        event DisputeGameCreated(
            address indexed disputeProxy,
            uint32 indexed gameType,
            bytes32 indexed rootClaim
        );

        /// @notice Semantic version of the deployed contract.
        function version() external view returns (string memory);

        /// @notice The bond required to create a game of the given type.
        function initBonds(uint32 _gameType) external view returns (uint256);

        /// @notice The total number of games created by this factory.
        function gameCount() external view returns (uint256);

        /// @notice Creates a new dispute game proposing `_rootClaim`.
        /// @param _gameType  The type of the game to create.
        /// @param _rootClaim The root claim of the game, i.e. the proposed output root.
        /// @param _extraData Any extra data the game requires; for fault games,
        ///                   the L2 block number as a 32-byte big-endian integer.
        function create(
            uint32 _gameType,
            bytes32 _rootClaim,
            bytes calldata _extraData
        ) external payable returns (address proxy_);
    }
}
