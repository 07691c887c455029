use alloy::{
    contract::Error as ContractError,
    providers::PendingTransactionError,
    transports::{RpcError, TransportErrorKind},
};
use alloy_primitives::{B256, BlockNumber};

/// The result type used throughout the submitter driver.
pub type SubmitterResult<T> = Result<T, SubmitterError>;

/// All the ways the submitter driver can fail.
#[derive(Debug, thiserror::Error)]
pub enum SubmitterError {
    /// The submission worker was started while already running.
    #[error("submitter is already running")]
    AlreadyRunning,
    /// The submission worker was stopped while not running.
    #[error("submitter is not running")]
    NotRunning,
    /// No submission target contract address was configured.
    #[error("neither an L2OutputOracle nor a DisputeGameFactory address was configured")]
    NoModeAddress,
    /// Both submission target contract addresses were configured.
    #[error("both an L2OutputOracle and a DisputeGameFactory address were configured")]
    AmbiguousModeAddress,
    /// A contract call failed.
    #[error("contract error: {0}")]
    Contract(#[from] ContractError),
    /// A JSON-RPC request failed.
    #[error("transport error: {0}")]
    Transport(#[from] RpcError<TransportErrorKind>),
    /// The rollup node returned an output with a version tag we don't understand.
    #[error("unsupported output version: got {got}, supported {supported}")]
    UnsupportedOutputVersion {
        /// The version tag found in the response.
        got: B256,
        /// The only version tag this submitter accepts.
        supported: B256,
    },
    /// The rollup node returned an output for a different block than requested.
    #[error("output block number mismatch: got {got}, requested {requested}")]
    BlockNumberMismatch {
        /// The block number found in the response.
        got: BlockNumber,
        /// The block number that was requested.
        requested: BlockNumber,
    },
    /// Waiting for a sent transaction to be confirmed failed.
    #[error("pending transaction error: {0}")]
    PendingTransaction(#[from] PendingTransactionError),
    /// A network request took longer than the configured timeout.
    #[error("operation timed out: {0}")]
    Timeout(&'static str),
    /// The operation was interrupted by a shutdown signal.
    #[error("submitter is shutting down")]
    ShuttingDown,
}
