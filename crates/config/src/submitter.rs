use std::time::Duration;

use clap::Parser;

/// Submitter-related configuration options
#[derive(Debug, Clone, Parser)]
pub struct SubmitterOpts {
    /// How often to query the L1 and rollup nodes for updates (in seconds)
    #[clap(long = "submitter.poll-interval", env = "OUTPOST_POLL_INTERVAL", default_value_t = 6)]
    pub poll_interval_secs: u64,
    /// The delay between successive dispute game proposals (in seconds).
    /// Only used when submitting to a `DisputeGameFactory`.
    #[clap(
        long = "submitter.proposal-interval",
        env = "OUTPOST_PROPOSAL_INTERVAL",
        default_value_t = 3600
    )]
    pub proposal_interval_secs: u64,
    /// How long to wait before re-fetching an output that failed to fetch or
    /// validate (in seconds). Only used when submitting to a `DisputeGameFactory`.
    #[clap(
        long = "submitter.output-retry-interval",
        env = "OUTPOST_OUTPUT_RETRY_INTERVAL",
        default_value_t = 12
    )]
    pub output_retry_interval_secs: u64,
    /// Timeout applied to individual RPC and contract calls (in seconds)
    #[clap(
        long = "submitter.network-timeout",
        env = "OUTPOST_NETWORK_TIMEOUT",
        default_value_t = 10
    )]
    pub network_timeout_secs: u64,
    /// The type of dispute game to create when submitting to a `DisputeGameFactory`
    #[clap(long = "submitter.game-type", env = "OUTPOST_GAME_TYPE", default_value_t = 0)]
    pub game_type: u32,
    /// Allow the submitter to propose L2 outputs derived from non-finalized L1 data
    #[clap(
        long = "submitter.allow-non-finalized",
        env = "OUTPOST_ALLOW_NON_FINALIZED",
        default_value_t = false
    )]
    pub allow_non_finalized: bool,
    /// Wait for the rollup node to catch up to the current L1 head before
    /// submitting any outputs
    #[clap(
        long = "submitter.wait-node-sync",
        env = "OUTPOST_WAIT_NODE_SYNC",
        default_value_t = false
    )]
    pub wait_node_sync: bool,
}

impl SubmitterOpts {
    /// How often to query the L1 and rollup nodes for updates.
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// The delay between successive dispute game proposals.
    pub const fn proposal_interval(&self) -> Duration {
        Duration::from_secs(self.proposal_interval_secs)
    }

    /// How long to wait before re-fetching an output that failed to fetch or validate.
    pub const fn output_retry_interval(&self) -> Duration {
        Duration::from_secs(self.output_retry_interval_secs)
    }

    /// Timeout applied to individual RPC and contract calls.
    pub const fn network_timeout(&self) -> Duration {
        Duration::from_secs(self.network_timeout_secs)
    }
}
