//! Submission client, chain transport, and validity parameters.

/// Submission client implementation.
mod client;
/// JSON-RPC chain transport implementation.
mod rpc;
/// Shared submission types, errors, and the chain transport trait.
mod types;

pub use client::BatchSubmitter;
pub use rpc::JsonRpcChainClient;
pub use types::{BlockAnchor, ChainError, ChainRpc, SubmitError, SubmitParams};
