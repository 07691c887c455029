#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! Outpost submitter primitive types, utilities and constants.

/// L2 output and sync status types.
pub mod output;

/// Transport retries utilities.
pub mod retries;

/// Utility for summarizing objects into a string for logging purposes.
pub mod summary;

/// Utilities for cooperative shutdown signalling across tasks.
pub mod shutdown;
