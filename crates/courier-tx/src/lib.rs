#![forbid(unsafe_code)]

//! One-shot transaction courier: load a signing credential and a prepared
//! action batch, sign the batch as a single ledger transaction, submit it to
//! one remote node, and report the transaction identifier.

/// Action batch file loading and decoding.
pub mod batch;
/// Process configuration loading.
pub mod config;
/// End-to-end submission pipeline.
pub mod pipeline;
/// Operator-facing failure reports.
pub mod report;
/// Credential decoding for the transaction signer.
pub mod signing;
/// Submission client, chain transport, and validity parameters.
pub mod submit;

pub use batch::{ActionBatch, ActionRecord, BatchError};
pub use config::{Config, ConfigError};
pub use pipeline::PipelineError;
pub use report::FailureReport;
pub use signing::SigningError;
pub use submit::{
    BatchSubmitter, BlockAnchor, ChainError, ChainRpc, JsonRpcChainClient, SubmitError,
    SubmitParams,
};
