//! Transaction validation against a UTXO view.
//!
//! A transaction is valid iff:
//! 1. every input references an outpoint present in the view,
//! 2. no outpoint is referenced by more than one input,
//! 3. every input's signature verifies against the referenced output's owner,
//! 4. every output value is non-negative, and
//! 5. the input total is at least the output total.
//!
//! Inputs are checked in order and validation stops at the first failing
//! input. Validation never mutates the view; the outpoints a transaction
//! claims are returned in [`ValidatedTransaction`] so the caller can apply
//! them.

use std::collections::HashSet;

use crate::error::TransactionError;
use crate::traits::{SighashEncoder, SignatureVerifier, UtxoView};
use crate::types::{Amount, OutPoint, Transaction};

/// Summary of a successfully validated transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTransaction {
    /// Outpoints consumed by the transaction, in input order. Never contains
    /// duplicates.
    pub claimed: Vec<OutPoint>,
    /// Total value of all spent inputs.
    pub total_input: Amount,
    /// Total value of all created outputs.
    pub total_output: Amount,
    /// Implicit fee (`total_input - total_output`). Zero is allowed.
    pub fee: Amount,
}

/// Validate `tx` against the unspent outputs in `utxos`.
///
/// Returns the claimed outpoints and value totals on success. Any rejection
/// reason is returned as a [`TransactionError`]; only
/// [`TransactionError::Encoding`] signals a collaborator failure rather
/// than an invalid transaction (see [`TransactionError::is_fatal`]).
pub fn validate_transaction<U, E, S>(
    utxos: &U,
    tx: &Transaction,
    encoder: &E,
    verifier: &S,
) -> Result<ValidatedTransaction, TransactionError>
where
    U: UtxoView + ?Sized,
    E: SighashEncoder + ?Sized,
    S: SignatureVerifier + ?Sized,
{
    let mut seen: HashSet<&OutPoint> = HashSet::with_capacity(tx.inputs.len());
    let mut total_input: Amount = 0;

    for (i, input) in tx.inputs.iter().enumerate() {
        let outpoint = &input.previous_output;

        let utxo = utxos
            .get_utxo(outpoint)
            .ok_or_else(|| TransactionError::UnknownUtxo(outpoint.to_string()))?;

        if !seen.insert(outpoint) {
            return Err(TransactionError::DuplicateInput(outpoint.to_string()));
        }

        let message = encoder
            .signing_bytes(tx, i)
            .map_err(|source| TransactionError::Encoding { index: i, source })?;
        if !verifier.verify(&utxo.owner, &message, &input.signature) {
            return Err(TransactionError::InvalidSignature { index: i });
        }

        total_input = total_input
            .checked_add(utxo.value)
            .ok_or(TransactionError::ValueOverflow)?;
    }

    if let Some(i) = tx.outputs.iter().position(|output| output.value < 0) {
        return Err(TransactionError::NegativeOutput(i));
    }
    let total_output = tx.total_output_value().ok_or(TransactionError::ValueOverflow)?;

    if total_output > total_input {
        return Err(TransactionError::InsufficientFunds {
            have: total_input,
            need: total_output,
        });
    }

    Ok(ValidatedTransaction {
        claimed: tx.inputs.iter().map(|input| input.previous_output.clone()).collect(),
        total_input,
        total_output,
        fee: total_input - total_output,
    })
}
