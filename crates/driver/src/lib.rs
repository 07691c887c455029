#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! Outpost submitter driver
//!
//! The driver is responsible for:
//! - Periodically fetching L2 output roots from the rollup node
//! - Submitting eligible outputs to L1, either directly to an `L2OutputOracle`
//!   or as root claims of new dispute games

/// The main submitter module with the core submission loops.
mod submitter;
pub use submitter::{Mode, OutputSubmitter, ProposalDecision};

/// The submitter runtime configuration.
mod config;
pub use config::SubmitterConfig;

/// The driver error taxonomy.
mod error;
pub use error::{SubmitterError, SubmitterResult};

/// Traits for the collaborators of the submission worker.
pub mod traits;

/// The transaction manager, responsible for signing and dispatching proposals.
mod txmgr;
pub use txmgr::{TxCandidate, WalletTxManager};

/// The metrics for the submitter.
mod metrics;
