//! Credential decoding for the transaction signer.

use secrecy::{ExposeSecret as _, SecretString};
use solana_keypair::Keypair;
use thiserror::Error;

/// Credential decoding errors. None of the variants carry key material.
#[derive(Debug, Error)]
pub enum SigningError {
    /// Credential is not valid base58 text.
    #[error("credential is not valid base58: {source}")]
    InvalidEncoding {
        /// Base58 decode failure.
        source: bs58::decode::Error,
    },
    /// Credential decodes to bytes that are not a signing keypair.
    #[error("credential does not decode to a signing keypair: {message}")]
    InvalidKeyMaterial {
        /// Human-readable description.
        message: String,
    },
}

/// Decodes a base58 credential into the signing keypair.
///
/// # Errors
///
/// Returns [`SigningError`] when the credential is not base58 or does not
/// hold valid 64-byte keypair material.
pub fn decode_keypair(credential: &SecretString) -> Result<Keypair, SigningError> {
    let bytes = bs58::decode(credential.expose_secret())
        .into_vec()
        .map_err(|source| SigningError::InvalidEncoding { source })?;
    Keypair::from_bytes(&bytes).map_err(|error| SigningError::InvalidKeyMaterial {
        message: error.to_string(),
    })
}
