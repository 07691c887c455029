use alloy::signers::local::PrivateKeySigner;
use clap::Parser;

/// Operator-related configuration options
#[derive(Debug, Clone, Parser)]
pub struct OperatorOpts {
    /// The private key of the output proposer, also called "operator"
    #[clap(long = "operator.private-key", env = "OUTPOST_OPERATOR_PRIVATE_KEY")]
    pub private_key: PrivateKeySigner,
}
