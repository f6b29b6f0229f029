//! Capability interfaces consumed by the validator and epoch processor.
//!
//! - [`UtxoView`]: read-only access to a set of unspent outputs
//! - [`SignatureVerifier`]: public-key signature check
//! - [`SighashEncoder`]: per-input signable byte encoding of a transaction
//!
//! The production implementations live in [`crate::utxo_pool`] and
//! [`crate::crypto`]; tests substitute deterministic fakes.

use crate::error::CryptoError;
use crate::types::{OutPoint, OwnerKey, Transaction, TxOutput};

/// Read-only view of unspent outputs.
pub trait UtxoView {
    /// Look up an unspent output. Returns `None` if spent or unknown.
    fn get_utxo(&self, outpoint: &OutPoint) -> Option<&TxOutput>;

    /// Check whether an outpoint is currently spendable.
    ///
    /// Default implementation delegates to [`get_utxo`](Self::get_utxo).
    fn contains_utxo(&self, outpoint: &OutPoint) -> bool {
        self.get_utxo(outpoint).is_some()
    }
}

/// Signature verification primitive.
///
/// Returns `false` for any malformed key or signature instead of an error;
/// a signature that cannot be parsed is a signature that does not verify.
pub trait SignatureVerifier {
    fn verify(&self, owner: &OwnerKey, message: &[u8], signature: &[u8]) -> bool;
}

/// Produces the exact bytes an input's signature is computed over.
///
/// The encoding must be deterministic in the transaction's content with all
/// signatures excluded, and must commit to `input_index`.
pub trait SighashEncoder {
    fn signing_bytes(&self, tx: &Transaction, input_index: usize) -> Result<Vec<u8>, CryptoError>;
}

impl<T: UtxoView + ?Sized> UtxoView for &T {
    fn get_utxo(&self, outpoint: &OutPoint) -> Option<&TxOutput> {
        (**self).get_utxo(outpoint)
    }
}

impl<T: SignatureVerifier + ?Sized> SignatureVerifier for &T {
    fn verify(&self, owner: &OwnerKey, message: &[u8], signature: &[u8]) -> bool {
        (**self).verify(owner, message, signature)
    }
}

impl<T: SighashEncoder + ?Sized> SighashEncoder for &T {
    fn signing_bytes(&self, tx: &Transaction, input_index: usize) -> Result<Vec<u8>, CryptoError> {
        (**self).signing_bytes(tx, input_index)
    }
}
