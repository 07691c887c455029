#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! Client connections to the L1 execution layer and the L2 rollup node.

/// L1 execution layer JSON-RPC client.
pub mod execution;

/// L2 rollup node JSON-RPC client.
pub mod rollup;
