use alloy_primitives::{B256, BlockNumber};
use serde::{Deserialize, Serialize};

use crate::summary::Summary;

/// The only L2 output root version understood by this submitter.
///
/// Rollup nodes currently emit version zero exclusively; any other value in an
/// `optimism_outputAtBlock` response must be rejected.
pub const SUPPORTED_OUTPUT_VERSION: B256 = B256::ZERO;

/// A reference to a canonical L1 block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct L1BlockRef {
    /// The block hash.
    pub hash: B256,
    /// The block number.
    pub number: BlockNumber,
    /// The parent block hash.
    pub parent_hash: B256,
    /// The block timestamp.
    pub timestamp: u64,
}

/// A bare block identifier, as used for the L1 origin of an L2 block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockId {
    /// The block hash.
    pub hash: B256,
    /// The block number.
    pub number: BlockNumber,
}

/// A reference to an L2 block, including the L1 block it was derived from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct L2BlockRef {
    /// The block hash.
    pub hash: B256,
    /// The block number.
    pub number: BlockNumber,
    /// The parent block hash.
    pub parent_hash: B256,
    /// The block timestamp.
    pub timestamp: u64,
    /// The L1 block this L2 block was derived from.
    #[serde(rename = "l1origin")]
    pub l1_origin: BlockId,
    /// The distance of this block from the start of its epoch.
    pub sequence_number: u64,
}

/// The rollup node's view of L1 and L2 chain progress at a point in time.
///
/// Field names are snake_case on the wire, matching the rollup node's
/// `optimism_syncStatus` encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStatus {
    /// The L1 block the derivation process is currently at.
    pub current_l1: L1BlockRef,
    /// The head of the L1 chain as seen by the rollup node.
    pub head_l1: L1BlockRef,
    /// The L1 safe head.
    pub safe_l1: L1BlockRef,
    /// The L1 finalized head.
    pub finalized_l1: L1BlockRef,
    /// The L2 unsafe head (latest, not yet derived from L1).
    pub unsafe_l2: L2BlockRef,
    /// The L2 safe head (derived from non-finalized L1 data).
    pub safe_l2: L2BlockRef,
    /// The L2 finalized head (derived from finalized L1 data).
    pub finalized_l2: L2BlockRef,
}

/// An L2 output root proposal as returned by `optimism_outputAtBlock`.
///
/// Constructed fresh for every fetch and consumed by at most one dispatch;
/// never cached across submitter ticks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputResponse {
    /// The output format version tag.
    pub version: B256,
    /// The output root committing to the full L2 state at `block_ref`.
    pub output_root: B256,
    /// The L2 block this output describes.
    pub block_ref: L2BlockRef,
    /// The storage root of the L2-to-L1 message passer contract.
    pub withdrawal_storage_root: B256,
    /// The L2 state root at `block_ref`.
    pub state_root: B256,
    /// Sync status snapshot taken when the output was computed.
    pub sync_status: SyncStatus,
}

impl Summary for OutputResponse {
    fn summary(&self) -> String {
        format!(
            "output_root={}, block={}, block_hash={}, current_l1={}, head_l1={}, safe_l2={}, finalized_l2={}",
            self.output_root,
            self.block_ref.number,
            self.block_ref.hash,
            self.sync_status.current_l1.number,
            self.sync_status.head_l1.number,
            self.sync_status.safe_l2.number,
            self.sync_status.finalized_l2.number,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_version_is_zero() {
        assert_eq!(SUPPORTED_OUTPUT_VERSION, B256::ZERO);
    }

    #[test]
    fn deserialize_output_at_block_response() {
        let raw = serde_json::json!({
            "version": "0x0000000000000000000000000000000000000000000000000000000000000000",
            "outputRoot": "0x1111111111111111111111111111111111111111111111111111111111111111",
            "blockRef": {
                "hash": "0x2222222222222222222222222222222222222222222222222222222222222222",
                "number": 420,
                "parentHash": "0x3333333333333333333333333333333333333333333333333333333333333333",
                "timestamp": 1700000000,
                "l1origin": {
                    "hash": "0x4444444444444444444444444444444444444444444444444444444444444444",
                    "number": 100
                },
                "sequenceNumber": 3
            },
            "withdrawalStorageRoot": "0x5555555555555555555555555555555555555555555555555555555555555555",
            "stateRoot": "0x6666666666666666666666666666666666666666666666666666666666666666",
            "syncStatus": {
                "current_l1": { "hash": "0x4444444444444444444444444444444444444444444444444444444444444444", "number": 100, "parentHash": "0x0000000000000000000000000000000000000000000000000000000000000000", "timestamp": 0 },
                "head_l1": { "hash": "0x0000000000000000000000000000000000000000000000000000000000000000", "number": 105, "parentHash": "0x0000000000000000000000000000000000000000000000000000000000000000", "timestamp": 0 },
                "safe_l1": { "hash": "0x0000000000000000000000000000000000000000000000000000000000000000", "number": 103, "parentHash": "0x0000000000000000000000000000000000000000000000000000000000000000", "timestamp": 0 },
                "finalized_l1": { "hash": "0x0000000000000000000000000000000000000000000000000000000000000000", "number": 90, "parentHash": "0x0000000000000000000000000000000000000000000000000000000000000000", "timestamp": 0 },
                "unsafe_l2": { "hash": "0x0000000000000000000000000000000000000000000000000000000000000000", "number": 430, "parentHash": "0x0000000000000000000000000000000000000000000000000000000000000000", "timestamp": 0, "l1origin": { "hash": "0x0000000000000000000000000000000000000000000000000000000000000000", "number": 0 }, "sequenceNumber": 0 },
                "safe_l2": { "hash": "0x0000000000000000000000000000000000000000000000000000000000000000", "number": 425, "parentHash": "0x0000000000000000000000000000000000000000000000000000000000000000", "timestamp": 0, "l1origin": { "hash": "0x0000000000000000000000000000000000000000000000000000000000000000", "number": 0 }, "sequenceNumber": 0 },
                "finalized_l2": { "hash": "0x0000000000000000000000000000000000000000000000000000000000000000", "number": 420, "parentHash": "0x0000000000000000000000000000000000000000000000000000000000000000", "timestamp": 0, "l1origin": { "hash": "0x0000000000000000000000000000000000000000000000000000000000000000", "number": 0 }, "sequenceNumber": 0 }
            }
        });

        let output: OutputResponse = serde_json::from_value(raw).expect("valid response");

        assert_eq!(output.version, SUPPORTED_OUTPUT_VERSION);
        assert_eq!(output.block_ref.number, 420);
        assert_eq!(output.block_ref.l1_origin.number, 100);
        assert_eq!(output.block_ref.sequence_number, 3);
        assert_eq!(output.sync_status.head_l1.number, 105);
        assert_eq!(output.sync_status.safe_l2.number, 425);
        assert_eq!(output.sync_status.finalized_l2.number, 420);
    }

    #[test]
    fn output_round_trips_through_json() {
        let mut output = OutputResponse::default();
        output.block_ref.number = 7;
        output.sync_status.current_l1.number = 12;

        let encoded = serde_json::to_string(&output).expect("serialize");
        let decoded: OutputResponse = serde_json::from_str(&encoded).expect("deserialize");
        assert_eq!(output, decoded);
    }
}
