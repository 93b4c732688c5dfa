//! End-to-end submission pipeline.
//!
//! The pipeline is the single failure-collapse point for everything after
//! configuration load: decode the credential, resolve and load the batch,
//! submit, and hand back the transaction identifier. Every dependency is
//! passed in explicitly so the routine can be exercised with fake chain
//! clients.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::batch::{self, ActionBatch, BatchError};
use crate::config::Config;
use crate::signing::{self, SigningError};
use crate::submit::{BatchSubmitter, ChainRpc, SubmitError, SubmitParams};

/// Pipeline errors. Displays stay transparent so the operator-facing
/// report carries the underlying message unmodified.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Batch resolution, loading, or decoding failed.
    #[error(transparent)]
    Batch {
        /// Batch-layer failure.
        source: BatchError,
    },
    /// Credential could not be decoded into a signer.
    #[error(transparent)]
    Credential {
        /// Credential decoding failure.
        source: SigningError,
    },
    /// Submission failed.
    #[error(transparent)]
    Submit {
        /// Submission-layer failure.
        source: SubmitError,
    },
}

impl PipelineError {
    /// Returns the node's structured error payload when one was returned.
    #[must_use]
    pub fn remote_payload(&self) -> Option<&Value> {
        match self {
            Self::Submit { source } => source.remote_payload(),
            _ => None,
        }
    }
}

/// Runs one submission end to end and returns the transaction identifier.
///
/// The batch is read from the configured override path when present, else
/// from `actions.json` next to the program.
///
/// # Errors
///
/// Returns [`PipelineError`] when credential decoding, batch loading, or
/// the submission fails. Every failure is terminal; nothing is retried.
pub async fn run(
    chain: Arc<dyn ChainRpc>,
    config: &Config,
    params: &SubmitParams,
) -> Result<String, PipelineError> {
    let keypair = signing::decode_keypair(config.credential())
        .map_err(|source| PipelineError::Credential { source })?;

    let batch_path = match config.batch_path_override() {
        Some(path) => path.clone(),
        None => batch::default_path().map_err(|source| PipelineError::Batch { source })?,
    };
    let batch =
        ActionBatch::load(&batch_path).map_err(|source| PipelineError::Batch { source })?;

    BatchSubmitter::new(chain)
        .submit(&batch, &keypair, params)
        .await
        .map_err(|source| PipelineError::Submit { source })
}
