//! Epoch processing: admitting a mutually consistent batch of transactions.
//!
//! [`TxHandler`] owns a private copy of the UTXO pool. Each epoch walks the
//! candidate transactions in the order given, validates each one against the
//! pool as left by the candidates accepted before it, and applies accepted
//! transactions immediately. Two consequences follow:
//!
//! - a candidate may spend outputs created earlier in the same epoch;
//! - when candidates race for one outpoint, the earliest one wins and the
//!   rest fail with [`TransactionError::UnknownUtxo`].
//!
//! No reordering, prioritization, or retry of rejected candidates happens here.

use tracing::{debug, info, warn};

use crate::crypto::{CanonicalSighash, Ed25519Verifier};
use crate::error::{LedgerError, TransactionError};
use crate::traits::{SighashEncoder, SignatureVerifier};
use crate::types::{OutPoint, Transaction};
use crate::utxo_pool::UtxoPool;
use crate::validation::{self, ValidatedTransaction};

/// A candidate that was not admitted in an epoch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RejectedTransaction {
    /// Position of the candidate in the submitted batch.
    pub position: usize,
    /// Why validation failed.
    pub reason: TransactionError,
}

/// Outcome of one epoch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EpochSummary {
    /// Admitted transactions, in candidate order.
    pub accepted: Vec<Transaction>,
    /// Candidates that were dropped, in candidate order.
    pub rejected: Vec<RejectedTransaction>,
    /// Number of UTXOs removed from the pool.
    pub utxos_spent: usize,
    /// Number of UTXOs added to the pool.
    pub utxos_created: usize,
}

/// Validates transactions and settles epochs against an owned UTXO pool.
///
/// Generic over the signature verifier and signing encoder so tests can
/// substitute deterministic fakes; [`TxHandler::new`] uses Ed25519 with the
/// canonical sighash.
///
/// Epoch processing takes `&mut self`, so one handler is driven by a single
/// writer at a time.
#[derive(Debug, Clone)]
pub struct TxHandler<S = Ed25519Verifier, E = CanonicalSighash> {
    pool: UtxoPool,
    verifier: S,
    encoder: E,
}

impl TxHandler {
    /// Create a handler over a private copy of `pool`.
    ///
    /// Later changes to `pool` do not affect the handler, and epochs
    /// processed by the handler do not affect `pool`.
    pub fn new(pool: &UtxoPool) -> Self {
        Self::with_collaborators(pool, Ed25519Verifier, CanonicalSighash)
    }
}

impl<S, E> TxHandler<S, E>
where
    S: SignatureVerifier,
    E: SighashEncoder,
{
    /// Create a handler over a private copy of `pool` using the given
    /// signature verifier and signing encoder.
    pub fn with_collaborators(pool: &UtxoPool, verifier: S, encoder: E) -> Self {
        Self {
            pool: pool.clone(),
            verifier,
            encoder,
        }
    }

    /// The handler's current pool.
    pub fn pool(&self) -> &UtxoPool {
        &self.pool
    }

    /// Consume the handler, returning its pool.
    pub fn into_pool(self) -> UtxoPool {
        self.pool
    }

    /// Validate `tx` against the current pool, reporting why it fails.
    pub fn check_tx(&self, tx: &Transaction) -> Result<ValidatedTransaction, TransactionError> {
        validation::validate_transaction(&self.pool, tx, &self.encoder, &self.verifier)
    }

    /// Whether `tx` is valid against the current pool.
    ///
    /// Has no effect on the pool; calling it repeatedly gives the same answer
    /// until an epoch changes the pool.
    pub fn is_valid_tx(&self, tx: &Transaction) -> bool {
        self.check_tx(tx).is_ok()
    }

    /// Process one epoch and return the admitted transactions in candidate
    /// order.
    ///
    /// Invalid and conflicting candidates are dropped silently. Only a fatal
    /// collaborator error is returned as `Err`, as
    /// [`LedgerError::EpochAborted`] carrying the candidates admitted before
    /// it; those stay applied.
    pub fn handle_txs(&mut self, candidates: &[Transaction]) -> Result<Vec<Transaction>, LedgerError> {
        Ok(self.process_epoch(candidates)?.accepted)
    }

    /// Process one epoch, reporting rejections and pool changes as well as the
    /// admitted transactions.
    pub fn process_epoch(&mut self, candidates: &[Transaction]) -> Result<EpochSummary, LedgerError> {
        let mut summary = EpochSummary::default();

        for (position, tx) in candidates.iter().enumerate() {
            if let Err(source) = self.admit(position, tx, &mut summary) {
                warn!(
                    position,
                    accepted = summary.accepted.len(),
                    error = %source,
                    "epoch aborted"
                );
                return Err(LedgerError::EpochAborted {
                    position,
                    summary: Box::new(summary),
                    source: Box::new(source),
                });
            }
        }

        info!(
            candidates = candidates.len(),
            accepted = summary.accepted.len(),
            rejected = summary.rejected.len(),
            utxos_spent = summary.utxos_spent,
            utxos_created = summary.utxos_created,
            pool_size = self.pool.len(),
            "epoch processed"
        );

        Ok(summary)
    }

    /// Validate one candidate and either apply it or record its rejection.
    ///
    /// `Err` only for fatal errors; the pool is untouched by the failing
    /// candidate.
    fn admit(&mut self, position: usize, tx: &Transaction, summary: &mut EpochSummary) -> Result<(), LedgerError> {
        let validated = match self.check_tx(tx) {
            Ok(validated) => validated,
            Err(reason) if reason.is_fatal() => return Err(reason.into()),
            Err(reason) => {
                debug!(position, %reason, "rejected transaction");
                summary.rejected.push(RejectedTransaction { position, reason });
                return Ok(());
            }
        };

        let (spent, created) = self.apply(tx, &validated.claimed)?;
        summary.utxos_spent += spent;
        summary.utxos_created += created;
        summary.accepted.push(tx.clone());
        Ok(())
    }

    /// Remove `claimed` from the pool and add the outputs of `tx`.
    ///
    /// The txid is computed before the pool is touched, so a failure leaves
    /// the pool unchanged.
    fn apply(&mut self, tx: &Transaction, claimed: &[OutPoint]) -> Result<(usize, usize), LedgerError> {
        let txid = tx.txid()?;

        let mut spent = 0;
        for outpoint in claimed {
            if self.pool.remove_utxo(outpoint).is_some() {
                spent += 1;
            }
        }

        for (index, output) in tx.outputs.iter().enumerate() {
            self.pool.add_utxo(OutPoint::new(txid, index as u64), output.clone());
        }

        debug!(%txid, spent, created = tx.outputs.len(), "applied transaction");
        Ok((spent, tx.outputs.len()))
    }
}
