//! Shared test helpers for scenario and property tests.

use tally_core::crypto::{self, KeyPair};
use tally_core::traits::{SighashEncoder, SignatureVerifier};
use tally_core::types::{Amount, Hash256, OutPoint, OwnerKey, Transaction, TxOutput};
use tally_core::UtxoPool;

/// Deterministic keypair from a seed byte.
pub fn keypair(seed: u8) -> KeyPair {
    KeyPair::from_secret_bytes([seed; 32])
}

/// Outpoint of a made-up genesis transaction identified by `seed`.
pub fn genesis_outpoint(seed: u8, index: u64) -> OutPoint {
    OutPoint::new(Hash256([seed; 32]), index)
}

/// Build a pool from `(outpoint, value, owner)` triples.
pub fn make_pool(entries: &[(OutPoint, Amount, OwnerKey)]) -> UtxoPool {
    entries
        .iter()
        .map(|(op, value, owner)| (op.clone(), TxOutput { value: *value, owner: *owner }))
        .collect()
}

/// Create a transaction with the given inputs and outputs, signing input `i`
/// with the keypair paired with it.
pub fn make_signed_tx(
    inputs: &[(OutPoint, &KeyPair)],
    outputs: &[(Amount, OwnerKey)],
) -> Transaction {
    let mut tx = make_unsigned_tx(
        &inputs.iter().map(|(op, _)| op.clone()).collect::<Vec<_>>(),
        outputs,
    );
    for (i, (_, kp)) in inputs.iter().enumerate() {
        crypto::sign_transaction_input(&mut tx, i, kp).expect("input index in range");
    }
    tx
}

/// Create a transaction with empty signatures.
pub fn make_unsigned_tx(inputs: &[OutPoint], outputs: &[(Amount, OwnerKey)]) -> Transaction {
    let mut tx = Transaction::new();
    for op in inputs {
        tx.add_input(op.clone());
    }
    for (value, owner) in outputs {
        tx.add_output(*value, *owner);
    }
    tx
}

/// Fake signature: BLAKE3 of the owner key followed by the message.
pub fn fake_signature(owner: &OwnerKey, message: &[u8]) -> Vec<u8> {
    let mut hasher = blake3::Hasher::new();
    hasher.update(owner.as_bytes());
    hasher.update(message);
    hasher.finalize().as_bytes().to_vec()
}

/// Sign input `index` of `tx` with [`fake_signature`] for `owner`.
pub fn fake_sign_input<E: SighashEncoder>(tx: &mut Transaction, index: usize, owner: &OwnerKey, encoder: &E) {
    let message = encoder
        .signing_bytes(tx, index)
        .expect("input index in range");
    tx.inputs[index].signature = fake_signature(owner, &message);
}

/// Verifier accepting exactly the signatures produced by [`fake_signature`].
///
/// Orders of magnitude faster than Ed25519, for property tests that build
/// thousands of transactions.
#[derive(Debug, Clone, Copy, Default)]
pub struct FakeVerifier;

impl SignatureVerifier for FakeVerifier {
    fn verify(&self, owner: &OwnerKey, message: &[u8], signature: &[u8]) -> bool {
        fake_signature(owner, message) == signature
    }
}
