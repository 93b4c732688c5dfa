//! Shared submission types, errors, and the chain transport trait.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use solana_signer::SignerError;
use thiserror::Error;

use crate::batch::BatchError;

/// Validity window for one submission.
///
/// `blocks_behind` picks how deep behind the tip the transaction anchors;
/// the ledger accepts the transaction only while that anchor is recent.
/// `expire_seconds` bounds the single broadcast attempt so it cannot outlive
/// the window.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SubmitParams {
    /// Blocks behind the tip the anchor block is taken from.
    pub blocks_behind: u64,
    /// Seconds the submission may remain in flight.
    pub expire_seconds: u64,
}

impl Default for SubmitParams {
    fn default() -> Self {
        Self {
            blocks_behind: 3,
            expire_seconds: 30,
        }
    }
}

/// Recent block the transaction anchors to.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct BlockAnchor {
    /// Slot of the anchor block.
    pub slot: u64,
    /// Blockhash bytes of the anchor block.
    pub blockhash: [u8; 32],
}

/// Chain-facing errors surfaced by the transport.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChainError {
    /// Transport could not be constructed.
    #[error("transport configuration invalid: {message}")]
    Config {
        /// Human-readable description.
        message: String,
    },
    /// Request-level failure: connectivity, deadline, or HTTP status.
    #[error("transport failure: {message}")]
    Transport {
        /// Human-readable description.
        message: String,
    },
    /// Node answered with a structured error payload, kept verbatim.
    #[error("remote node rejected the request: {payload}")]
    Remote {
        /// Structured error payload as returned by the node.
        payload: Value,
    },
    /// Node answer was not a valid response envelope.
    #[error("remote node returned a malformed response: {message}")]
    MalformedResponse {
        /// Human-readable description.
        message: String,
    },
    /// Node answered with neither a result nor an error.
    #[error("remote node returned neither result nor error for `{method}`")]
    MissingResult {
        /// JSON-RPC method name.
        method: &'static str,
    },
}

impl ChainError {
    /// Returns the node's structured error payload when one was returned.
    #[must_use]
    pub fn remote_payload(&self) -> Option<&Value> {
        match self {
            Self::Remote { payload } => Some(payload),
            _ => None,
        }
    }
}

/// Submission-level errors. Every failure is terminal for the invocation.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Batch could not be decoded into ledger instructions.
    #[error(transparent)]
    Batch {
        /// Action decoding failure.
        source: BatchError,
    },
    /// Anchor block lookup failed.
    #[error("failed to anchor transaction: {source}")]
    Anchor {
        /// Chain transport failure.
        source: ChainError,
    },
    /// Transaction could not be signed.
    #[error("failed to sign transaction: {source}")]
    Sign {
        /// Signer-level failure.
        source: SignerError,
    },
    /// Signed transaction could not be serialized for the wire.
    #[error("failed to encode signed transaction: {source}")]
    Encode {
        /// Serialization failure.
        source: Box<bincode::ErrorKind>,
    },
    /// Broadcast failed or the node rejected the transaction.
    #[error("failed to broadcast transaction: {source}")]
    Broadcast {
        /// Chain transport failure.
        source: ChainError,
    },
}

impl SubmitError {
    /// Returns the node's structured error payload when one was returned.
    #[must_use]
    pub fn remote_payload(&self) -> Option<&Value> {
        match self {
            Self::Anchor { source } | Self::Broadcast { source } => source.remote_payload(),
            _ => None,
        }
    }
}

/// Chain-facing operations needed to anchor and broadcast one transaction.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Returns the anchor block `blocks_behind` blocks behind the tip.
    async fn recent_anchor(&self, blocks_behind: u64) -> Result<BlockAnchor, ChainError>;

    /// Broadcasts signed transaction bytes and returns the transaction
    /// identifier reported by the node.
    async fn broadcast(&self, tx_bytes: &[u8], deadline: Duration) -> Result<String, ChainError>;
}
