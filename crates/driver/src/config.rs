use std::time::Duration;

use outpost_config::SubmitterOpts;

/// Resolved runtime configuration of the submission worker.
#[derive(Debug, Clone)]
pub struct SubmitterConfig {
    /// How often to query the L1 and rollup nodes for updates.
    pub poll_interval: Duration,
    /// The delay between successive dispute game proposals.
    pub proposal_interval: Duration,
    /// How long to wait before re-fetching an output that failed to fetch or validate.
    pub output_retry_interval: Duration,
    /// Timeout applied to individual RPC and contract calls.
    pub network_timeout: Duration,
    /// Whether to propose L2 outputs derived from non-finalized L1 data.
    pub allow_non_finalized: bool,
    /// Whether to wait for the rollup node to catch up to the L1 head on startup.
    pub wait_node_sync: bool,
}

impl From<&SubmitterOpts> for SubmitterConfig {
    fn from(opts: &SubmitterOpts) -> Self {
        Self {
            poll_interval: opts.poll_interval(),
            proposal_interval: opts.proposal_interval(),
            output_retry_interval: opts.output_retry_interval(),
            network_timeout: opts.network_timeout(),
            allow_non_finalized: opts.allow_non_finalized,
            wait_node_sync: opts.wait_node_sync,
        }
    }
}
