//! Error types for Tally.
use thiserror::Error;

use crate::handler::EpochSummary;
use crate::types::Amount;

/// Why a transaction was not admitted.
///
/// Every variant except [`TransactionError::Encoding`] is an ordinary
/// rejection: the transaction is invalid against the pool it was checked
/// against and is simply dropped from the epoch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("unknown UTXO: {0}")] UnknownUtxo(String),
    #[error("duplicate input: {0}")] DuplicateInput(String),
    #[error("invalid signature on input {index}")] InvalidSignature { index: usize },
    #[error("negative value on output {0}")] NegativeOutput(usize),
    #[error("insufficient funds: have {have}, need {need}")] InsufficientFunds { have: Amount, need: Amount },
    #[error("value overflow")] ValueOverflow,
    #[error("signing encoder failed on input {index}: {source}")] Encoding { index: usize, source: CryptoError },
}

impl TransactionError {
    /// Whether this error reflects a broken collaborator rather than an
    /// invalid transaction. Fatal errors abort an epoch instead of being
    /// dropped with the transaction.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Encoding { .. })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid public key bytes")] InvalidPublicKey,
    #[error("invalid signature bytes")] InvalidSignature,
    #[error("signature verification failed")] VerificationFailed,
    #[error("input index out of bounds: {index} >= {len}")] InputIndexOutOfBounds { index: usize, len: usize },
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error(transparent)] Transaction(#[from] TransactionError),
    #[error(transparent)] Crypto(#[from] CryptoError),
    #[error("serialization: {0}")] Serialization(String),
    /// A fatal error stopped an epoch part-way. `summary` holds the candidates
    /// before `position` that were already applied to the pool.
    #[error("epoch aborted at candidate {position}: {source}")]
    EpochAborted { position: usize, summary: Box<EpochSummary>, source: Box<LedgerError> },
}

impl LedgerError {
    /// The part of an aborted epoch that was committed before the failure.
    pub fn committed(&self) -> Option<&EpochSummary> {
        match self {
            Self::EpochAborted { summary, .. } => Some(&**summary),
            _ => None,
        }
    }
}
