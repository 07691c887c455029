use IL2OutputOracle::{IL2OutputOracleErrors, IL2OutputOracleInstance};
use alloy::{contract::Result as ContractResult, rpc::client::ClientBuilder, sol};
use alloy_primitives::{Address, BlockNumber, Bytes, U256};
use alloy_sol_types::{Error as SolError, SolCall};
use derive_more::derive::Deref;
use outpost_primitives::{output::OutputResponse, retries::default_retry_layer};
use tracing::error;
use url::Url;

use crate::{DefaultProvider, try_parse_contract_error};

/// A wrapper over an `L2OutputOracle` contract that exposes read-only utility methods.
///
/// Proposals are not sent through this instance. The submitter builds the raw
/// calldata with [`propose_l2_output_tx_data`] and dispatches it through its
/// own transaction manager.
#[derive(Debug, Clone, Deref)]
pub struct L2OutputOracle(IL2OutputOracleInstance<DefaultProvider>);

impl L2OutputOracle {
    /// Create a new `L2OutputOracle` instance at the given contract address.
    pub fn new<U: Into<Url>>(el_client_url: U, address: Address) -> Self {
        let client =
            ClientBuilder::default().layer(default_retry_layer()).http(el_client_url.into());
        let provider = alloy::providers::ProviderBuilder::new().connect_client(client);

        Self(IL2OutputOracleInstance::new(address, provider))
    }

    /// The address of the oracle contract.
    pub fn contract_address(&self) -> Address {
        *self.0.address()
    }

    /// Retrieves the semantic version of the deployed oracle contract.
    pub async fn version(&self) -> ContractResult<String> {
        match self.0.version().call().await {
            Ok(version) => Ok(version),
            Err(err) => {
                error!("Failed to call version: {:?}", err);
                let decoded_error = try_parse_contract_error::<IL2OutputOracleErrors>(err)?;
                Err(SolError::custom(format!("{decoded_error:?}")).into())
            }
        }
    }

    /// Retrieves the L2 block number expected by the next output proposal.
    pub async fn next_block_number(&self) -> ContractResult<BlockNumber> {
        match self.0.nextBlockNumber().call().await {
            Ok(number) => Ok(number.to::<u64>()),
            Err(err) => {
                let decoded_error = try_parse_contract_error::<IL2OutputOracleErrors>(err)?;
                Err(SolError::custom(format!("{decoded_error:?}")).into())
            }
        }
    }

    /// Retrieves the L2 block number of the latest accepted output proposal.
    pub async fn latest_block_number(&self) -> ContractResult<BlockNumber> {
        match self.0.latestBlockNumber().call().await {
            Ok(number) => Ok(number.to::<u64>()),
            Err(err) => {
                let decoded_error = try_parse_contract_error::<IL2OutputOracleErrors>(err)?;
                Err(SolError::custom(format!("{decoded_error:?}")).into())
            }
        }
    }
}

/// Builds the `proposeL2Output` calldata for the given output.
///
/// The L1 block hash and number pinned into the proposal are taken from the
/// `current_l1` of the output's sync status snapshot, so the contract can
/// reject proposals built on an L1 block that was since reorged out.
pub fn propose_l2_output_tx_data(output: &OutputResponse) -> Bytes {
    IL2OutputOracle::proposeL2OutputCall {
        _outputRoot: output.output_root,
        _l2BlockNumber: U256::from(output.block_ref.number),
        _l1BlockHash: output.sync_status.current_l1.hash,
        _l1BlockNumber: U256::from(output.sync_status.current_l1.number),
    }
    .abi_encode()
    .into()
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    interface IL2OutputOracle {
        // The oracle reverts with require strings only.
        error Error(string);

        #[derive(Default)]
        event OutputProposed(
            bytes32 indexed outputRoot,
            uint256 indexed l2OutputIndex,
            uint256 indexed l2BlockNumber,
            uint256 l1Timestamp
        );

        /// @notice Semantic version of the deployed contract.
        function version() external view returns (string memory);

        /// @notice Computes the block number of the next L2 block that needs to be checkpointed.
        function nextBlockNumber() public view returns (uint256);

        /// @notice Returns the block number of the latest submitted L2 output proposal.
        function latestBlockNumber() public view returns (uint256);

        /// @notice Accepts an outputRoot and the timestamp of the corresponding L2 block.
        /// @param _outputRoot    The L2 output of the checkpoint block.
        /// @param _l2BlockNumber The L2 block number that resulted in _outputRoot.
        /// @param _l1BlockHash   A block hash which must be included in the current chain.
        /// @param _l1BlockNumber The block number with the specified block hash.
        function proposeL2Output(
            bytes32 _outputRoot,
            uint256 _l2BlockNumber,
            bytes32 _l1BlockHash,
            uint256 _l1BlockNumber
        ) external payable;
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::B256;
    use outpost_primitives::output::{L1BlockRef, L2BlockRef, SyncStatus};

    use super::*;

    #[test]
    fn propose_tx_data_packs_output_and_current_l1() {
        let output = OutputResponse {
            output_root: B256::repeat_byte(0xaa),
            block_ref: L2BlockRef { number: 42, ..Default::default() },
            sync_status: SyncStatus {
                current_l1: L1BlockRef {
                    hash: B256::repeat_byte(0xbb),
                    number: 1337,
                    ..Default::default()
                },
                ..Default::default()
            },
            ..Default::default()
        };

        let data = propose_l2_output_tx_data(&output);

        assert_eq!(&data[..4], IL2OutputOracle::proposeL2OutputCall::SELECTOR);

        let decoded = IL2OutputOracle::proposeL2OutputCall::abi_decode(&data).expect("valid data");
        assert_eq!(decoded._outputRoot, B256::repeat_byte(0xaa));
        assert_eq!(decoded._l2BlockNumber, U256::from(42));
        assert_eq!(decoded._l1BlockHash, B256::repeat_byte(0xbb));
        assert_eq!(decoded._l1BlockNumber, U256::from(1337));
    }
}
