use std::time::Duration;

use metrics::{counter, gauge, histogram};

#[derive(Debug, Clone, Copy)]
pub(crate) struct SubmitterMetrics;

impl SubmitterMetrics {
    // ################ COUNTERS ################ //

    /// Sets the latest L1 head block number observed by the submitter.
    pub(crate) fn set_l1_head_number(value: u64) {
        counter!("submitter_l1_head_number").absolute(value);
    }

    /// Sets the L2 block number expected by the next oracle proposal.
    pub(crate) fn set_next_proposal_block(value: u64) {
        counter!("submitter_next_proposal_block").absolute(value);
    }

    /// Sets the L2 block number of the latest confirmed proposal.
    pub(crate) fn set_latest_proposed_block(value: u64) {
        counter!("submitter_latest_proposed_block").absolute(value);
    }

    /// Increments the amount of proposals confirmed on L1.
    pub(crate) fn increment_proposals_submitted() {
        counter!("submitter_proposals_submitted").increment(1);
    }

    /// Increments the amount of proposals included on L1 but reverted.
    pub(crate) fn increment_proposals_reverted() {
        counter!("submitter_proposals_reverted").increment(1);
    }

    /// Increments the amount of proposal dispatch failures by reason.
    pub(crate) fn increment_proposal_failures(reason: String) {
        counter!("submitter_proposal_failures", "reason" => reason).increment(1);
    }

    /// Increments the amount of output fetch failures by reason.
    pub(crate) fn increment_output_fetch_failures(reason: String) {
        counter!("submitter_output_fetch_failures", "reason" => reason).increment(1);
    }

    // ################ GAUGES ################ //

    /// Sets whether the submission worker is currently running.
    pub(crate) fn set_running(value: bool) {
        gauge!("submitter_running").set(if value { 1.0 } else { 0.0 });
    }

    // ################ HISTOGRAMS ################ //

    /// Records the time it took to include a proposal transaction in an L1 block.
    pub(crate) fn record_proposal_inclusion_time(time_elapsed: Duration) {
        histogram!("submitter_proposal_inclusion_time").record(time_elapsed.as_secs_f64());
    }
}
