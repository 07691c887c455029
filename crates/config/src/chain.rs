use alloy::primitives::Address;
use clap::Parser;
use url::Url;

/// L1-related configuration options
#[derive(Debug, Clone, Parser)]
pub struct L1Opts {
    /// The URL of the L1 execution client HTTP connection
    #[clap(long = "l1.el-url", env = "OUTPOST_L1_EXECUTION_URL")]
    pub el_url: Url,
}

/// Rollup-node-related configuration options
#[derive(Debug, Clone, Parser)]
pub struct RollupOpts {
    /// The URL of the rollup node (consensus layer driver) HTTP connection
    #[clap(long = "rollup.node-url", env = "OUTPOST_ROLLUP_NODE_URL")]
    pub node_url: Url,
}

/// The contract addresses required to run the submitter.
///
/// Exactly one of the two addresses must be set: it selects whether outputs
/// are submitted to an `L2OutputOracle` or proposed as dispute games.
#[derive(Debug, Clone, Parser)]
pub struct ContractAddresses {
    /// The address of the L1 `L2OutputOracle.sol`
    #[clap(long = "contracts.l2-output-oracle", env = "OUTPOST_L2_OUTPUT_ORACLE")]
    pub l2_output_oracle: Option<Address>,
    /// The address of the L1 `DisputeGameFactory.sol`
    #[clap(long = "contracts.dispute-game-factory", env = "OUTPOST_DISPUTE_GAME_FACTORY")]
    pub dispute_game_factory: Option<Address>,
}
