//! Ledger record types: hashes, outpoints, transactions.
//!
//! All monetary values are [`Amount`]s in base units (1 TALLY = 10^8 units).
//! Amounts are signed so that a negative output can be represented and then
//! rejected by validation rather than being unrepresentable.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::TX_VERSION;
use crate::error::LedgerError;

/// Fixed-point monetary amount in base units.
pub type Amount = i64;

/// A 32-byte hash value. Used for transaction IDs (BLAKE3).
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
    bincode::Encode, bincode::Decode,
)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    /// Return the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Raw Ed25519 public key of an output's owner.
///
/// Kept as plain bytes so that records stay cheap to copy, hash, and encode;
/// parsing into a curve point happens only inside the signature verifier.
#[derive(
    Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
    bincode::Encode, bincode::Decode,
)]
pub struct OwnerKey(pub [u8; 32]);

impl OwnerKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for OwnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OwnerKey({})", hex::encode(self.0))
    }
}

impl fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Identifier of one unspent output: the creating transaction plus the
/// output's position within it.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
    bincode::Encode, bincode::Decode,
)]
pub struct OutPoint {
    /// Transaction ID containing the referenced output.
    pub txid: Hash256,
    /// Index of the output within the transaction.
    pub index: u64,
}

impl OutPoint {
    pub fn new(txid: Hash256, index: u64) -> Self {
        Self { txid, index }
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.index)
    }
}

/// A transaction input, spending a previous output.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct TxInput {
    /// The outpoint being spent.
    pub previous_output: OutPoint,
    /// Signature by the referenced output's owner over the input's signing
    /// hash. Empty until signed.
    pub signature: Vec<u8>,
}

/// A transaction output, creating a new UTXO.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct TxOutput {
    /// Value in base units.
    pub value: Amount,
    /// Public key allowed to spend this output.
    pub owner: OwnerKey,
}

/// A transaction transferring value between owners.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct Transaction {
    /// Format version.
    pub version: u64,
    /// Inputs consuming previous outputs.
    pub inputs: Vec<TxInput>,
    /// New outputs created by this transaction.
    pub outputs: Vec<TxOutput>,
}

impl Transaction {
    /// Create an empty transaction at the current format version.
    pub fn new() -> Self {
        Self {
            version: TX_VERSION,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Append an unsigned input spending `previous_output`.
    pub fn add_input(&mut self, previous_output: OutPoint) -> &mut Self {
        self.inputs.push(TxInput {
            previous_output,
            signature: Vec::new(),
        });
        self
    }

    /// Append an output paying `value` to `owner`.
    pub fn add_output(&mut self, value: Amount, owner: OwnerKey) -> &mut Self {
        self.outputs.push(TxOutput { value, owner });
        self
    }

    /// Compute the transaction ID (BLAKE3 hash of the canonical encoding).
    ///
    /// Covers every field including signatures, so the ID is only stable once
    /// all inputs are signed.
    pub fn txid(&self) -> Result<Hash256, LedgerError> {
        let encoded = bincode::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| LedgerError::Serialization(e.to_string()))?;
        Ok(Hash256(blake3::hash(&encoded).into()))
    }

    /// The outpoint that output `index` of this transaction will occupy once
    /// the transaction is admitted.
    pub fn outpoint(&self, index: u64) -> Result<OutPoint, LedgerError> {
        Ok(OutPoint::new(self.txid()?, index))
    }

    /// Sum of all output values. Returns None on overflow.
    pub fn total_output_value(&self) -> Option<Amount> {
        self.outputs
            .iter()
            .try_fold(0 as Amount, |acc, out| acc.checked_add(out.value))
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}
