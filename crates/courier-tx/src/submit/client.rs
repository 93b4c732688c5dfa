//! Submission client implementation.

use std::sync::Arc;
use std::time::Duration;

use solana_hash::Hash;
use solana_keypair::Keypair;
use solana_message::{Message, VersionedMessage};
use solana_signer::Signer as _;
use solana_transaction::versioned::VersionedTransaction;

use super::{ChainRpc, SubmitError, SubmitParams};
use crate::batch::ActionBatch;

/// Signs an action batch as one transaction and broadcasts it.
pub struct BatchSubmitter {
    /// Chain transport the transaction is anchored against and sent through.
    chain: Arc<dyn ChainRpc>,
}

impl BatchSubmitter {
    /// Creates a submitter over one chain transport.
    #[must_use]
    pub fn new(chain: Arc<dyn ChainRpc>) -> Self {
        Self { chain }
    }

    /// Submits the full batch as a single transaction and returns the
    /// transaction identifier reported by the node.
    ///
    /// Actions are placed into the transaction in batch order. The whole
    /// flow is linear; the first failure ends the invocation.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError`] when action decoding, anchoring, signing,
    /// encoding, or the broadcast fails.
    pub async fn submit(
        &self,
        batch: &ActionBatch,
        signer: &Keypair,
        params: &SubmitParams,
    ) -> Result<String, SubmitError> {
        let instructions = batch
            .instructions()
            .map_err(|source| SubmitError::Batch { source })?;
        let anchor = self
            .chain
            .recent_anchor(params.blocks_behind)
            .await
            .map_err(|source| SubmitError::Anchor { source })?;
        tracing::debug!(slot = anchor.slot, actions = instructions.len(), "anchored transaction");

        let blockhash = Hash::new_from_array(anchor.blockhash);
        let message =
            Message::new_with_blockhash(&instructions, Some(&signer.pubkey()), &blockhash);
        let tx = VersionedTransaction::try_new(VersionedMessage::Legacy(message), &[signer])
            .map_err(|source| SubmitError::Sign { source })?;
        let tx_bytes =
            bincode::serialize(&tx).map_err(|source| SubmitError::Encode { source })?;

        self.chain
            .broadcast(&tx_bytes, Duration::from_secs(params.expire_seconds))
            .await
            .map_err(|source| SubmitError::Broadcast { source })
    }
}
