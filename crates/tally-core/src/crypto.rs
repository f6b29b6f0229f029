//! Ed25519 signing and verification for transaction inputs.
//!
//! Uses ed25519-dalek for the underlying Ed25519 implementation and BLAKE3
//! for signing hashes.
//!
//! # Signing scheme
//!
//! Each input is signed over a **sighash** that commits to:
//! - A fixed domain separator and the transaction version
//! - All input outpoints (txid + index)
//! - All outputs (value + owner key)
//! - The index of the input being signed
//!
//! Signatures are excluded from the sighash to avoid circularity and allow
//! inputs to be signed independently in any order.

use ed25519_dalek::{Signer, Verifier};
use std::fmt;

use crate::constants::SIGHASH_DOMAIN;
use crate::error::CryptoError;
use crate::traits::{SighashEncoder, SignatureVerifier};
use crate::types::{Hash256, OwnerKey, Transaction};

/// Ed25519 keypair for signing transaction inputs.
///
/// Wraps [`ed25519_dalek::SigningKey`]. The secret key is zeroized on drop
/// by the underlying library.
pub struct KeyPair {
    signing_key: ed25519_dalek::SigningKey,
}

impl KeyPair {
    /// Generate a random keypair using the OS cryptographic RNG.
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        Self {
            signing_key: ed25519_dalek::SigningKey::generate(&mut csprng),
        }
    }

    /// Create a keypair from 32-byte secret key material.
    pub fn from_secret_bytes(bytes: [u8; 32]) -> Self {
        Self {
            signing_key: ed25519_dalek::SigningKey::from_bytes(&bytes),
        }
    }

    /// The public key, in the form stored on outputs.
    pub fn owner_key(&self) -> OwnerKey {
        OwnerKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Get the raw secret key bytes (32 bytes). Handle with care.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    /// Sign a message, returning the raw 64-byte Ed25519 signature.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl Clone for KeyPair {
    fn clone(&self) -> Self {
        Self::from_secret_bytes(self.secret_bytes())
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("owner_key", &self.owner_key())
            .finish_non_exhaustive()
    }
}

/// Verify an Ed25519 signature by `owner` on `message`.
pub fn verify_signature(
    owner: &OwnerKey,
    message: &[u8],
    signature: &[u8],
) -> Result<(), CryptoError> {
    let vk = ed25519_dalek::VerifyingKey::from_bytes(owner.as_bytes())
        .map_err(|_| CryptoError::InvalidPublicKey)?;
    let sig_bytes: [u8; 64] = signature
        .try_into()
        .map_err(|_| CryptoError::InvalidSignature)?;
    let sig = ed25519_dalek::Signature::from_bytes(&sig_bytes);
    vk.verify(message, &sig)
        .map_err(|_| CryptoError::VerificationFailed)
}

/// Compute the signing hash (sighash) for a transaction input.
///
/// Commits to all input outpoints, all outputs, the version, and the index
/// of the input being signed.
pub fn signing_hash(tx: &Transaction, input_index: usize) -> Result<Hash256, CryptoError> {
    if input_index >= tx.inputs.len() {
        return Err(CryptoError::InputIndexOutOfBounds {
            index: input_index,
            len: tx.inputs.len(),
        });
    }

    let mut data = Vec::new();

    data.extend_from_slice(SIGHASH_DOMAIN);
    data.extend_from_slice(&tx.version.to_le_bytes());

    // All input outpoints (no signatures)
    data.extend_from_slice(&(tx.inputs.len() as u64).to_le_bytes());
    for input in &tx.inputs {
        data.extend_from_slice(input.previous_output.txid.as_bytes());
        data.extend_from_slice(&input.previous_output.index.to_le_bytes());
    }

    // All outputs
    data.extend_from_slice(&(tx.outputs.len() as u64).to_le_bytes());
    for output in &tx.outputs {
        data.extend_from_slice(&output.value.to_le_bytes());
        data.extend_from_slice(output.owner.as_bytes());
    }

    data.extend_from_slice(&(input_index as u64).to_le_bytes());

    Ok(Hash256(blake3::hash(&data).into()))
}

/// Sign a transaction input in place.
///
/// Inputs can be signed in any order since the sighash excludes signatures.
pub fn sign_transaction_input(
    tx: &mut Transaction,
    input_index: usize,
    keypair: &KeyPair,
) -> Result<(), CryptoError> {
    let sighash = signing_hash(tx, input_index)?;
    tx.inputs[input_index].signature = keypair.sign(sighash.as_bytes()).to_vec();
    Ok(())
}

/// [`SignatureVerifier`] backed by Ed25519.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, owner: &OwnerKey, message: &[u8], signature: &[u8]) -> bool {
        verify_signature(owner, message, signature).is_ok()
    }
}

/// [`SighashEncoder`] producing the 32-byte [`signing_hash`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalSighash;

impl SighashEncoder for CanonicalSighash {
    fn signing_bytes(&self, tx: &Transaction, input_index: usize) -> Result<Vec<u8>, CryptoError> {
        Ok(signing_hash(tx, input_index)?.as_bytes().to_vec())
    }
}
