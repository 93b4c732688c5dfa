//! JSON-RPC chain transport implementation.

use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64_STANDARD};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{BlockAnchor, ChainError, ChainRpc};

/// Deadline applied to anchor lookups, which are not bound by the
/// submission's validity window.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// JSON-RPC envelope.
#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    /// Result value for successful calls.
    result: Option<T>,
    /// Error payload for failed calls, kept verbatim.
    error: Option<Value>,
}

/// Anchor block fields read from the node.
#[derive(Debug, Deserialize)]
struct RpcBlockSummary {
    /// Base58 blockhash of the block.
    blockhash: String,
}

/// JSON-RPC chain client bound to one remote node endpoint.
#[derive(Debug, Clone)]
pub struct JsonRpcChainClient {
    /// HTTP client used for RPC calls.
    client: reqwest::Client,
    /// Target JSON-RPC endpoint URL.
    endpoint: String,
    /// Skip the node's pre-broadcast validation pass when true.
    skip_preflight: bool,
}

impl JsonRpcChainClient {
    /// Creates a chain client bound to one endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Config`] when HTTP client creation fails.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ChainError> {
        let client = reqwest::Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .build()
            .map_err(|error| ChainError::Config {
                message: error.to_string(),
            })?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            skip_preflight: false,
        })
    }

    /// Skips the node's pre-broadcast validation pass.
    ///
    /// Validation is on by default so rejected transactions surface the
    /// node's structured error payload instead of failing silently later.
    #[must_use]
    pub fn with_skip_preflight(mut self, skip_preflight: bool) -> Self {
        self.skip_preflight = skip_preflight;
        self
    }

    /// Performs one JSON-RPC call and unwraps the response envelope.
    async fn rpc_call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: Value,
        deadline: Option<Duration>,
    ) -> Result<T, ChainError> {
        tracing::debug!(method, "chain rpc call");
        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let mut request = self.client.post(&self.endpoint).json(&payload);
        if let Some(deadline) = deadline {
            request = request.timeout(deadline);
        }
        let response = request.send().await.map_err(|error| ChainError::Transport {
            message: format!("request for `{method}` failed: {error}"),
        })?;
        let response = response
            .error_for_status()
            .map_err(|error| ChainError::Transport {
                message: format!("`{method}` failed with http status: {error}"),
            })?;
        let parsed: JsonRpcResponse<T> =
            response
                .json()
                .await
                .map_err(|error| ChainError::MalformedResponse {
                    message: format!("`{method}` returned invalid json: {error}"),
                })?;
        if let Some(result) = parsed.result {
            return Ok(result);
        }
        if let Some(payload) = parsed.error {
            return Err(ChainError::Remote { payload });
        }
        Err(ChainError::MissingResult { method })
    }
}

#[async_trait]
impl ChainRpc for JsonRpcChainClient {
    async fn recent_anchor(&self, blocks_behind: u64) -> Result<BlockAnchor, ChainError> {
        let tip: u64 = self
            .rpc_call(
                "getSlot",
                serde_json::json!([{"commitment": "confirmed"}]),
                None,
            )
            .await?;
        let slot = tip.saturating_sub(blocks_behind);
        let block: RpcBlockSummary = self
            .rpc_call(
                "getBlock",
                serde_json::json!([slot, {
                    "commitment": "confirmed",
                    "encoding": "json",
                    "transactionDetails": "none",
                    "rewards": false,
                    "maxSupportedTransactionVersion": 0,
                }]),
                None,
            )
            .await?;
        let blockhash = decode_blockhash(&block.blockhash)?;
        Ok(BlockAnchor { slot, blockhash })
    }

    async fn broadcast(&self, tx_bytes: &[u8], deadline: Duration) -> Result<String, ChainError> {
        let encoded_tx = BASE64_STANDARD.encode(tx_bytes);
        // maxRetries 0: the node must not re-broadcast on our behalf; this
        // program makes exactly one attempt.
        self.rpc_call(
            "sendTransaction",
            serde_json::json!([encoded_tx, {
                "encoding": "base64",
                "skipPreflight": self.skip_preflight,
                "maxRetries": 0,
            }]),
            Some(deadline),
        )
        .await
    }
}

/// Decodes a base58 blockhash into its 32-byte form.
fn decode_blockhash(encoded: &str) -> Result<[u8; 32], ChainError> {
    let bytes = bs58::decode(encoded)
        .into_vec()
        .map_err(|error| ChainError::MalformedResponse {
            message: format!("anchor blockhash is not base58: {error}"),
        })?;
    <[u8; 32]>::try_from(bytes).map_err(|bytes| ChainError::MalformedResponse {
        message: format!("anchor blockhash has {} bytes, expected 32", bytes.len()),
    })
}
