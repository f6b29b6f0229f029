//! In-memory set of unspent transaction outputs.
//!
//! A [`UtxoPool`] maps each [`OutPoint`] to the [`TxOutput`] it identifies.
//! Cloning a pool yields a fully independent snapshot; the epoch processor
//! relies on this for its defensive copy.

use std::collections::HashMap;

use crate::traits::UtxoView;
use crate::types::{Amount, OutPoint, TxOutput};

/// Unspent outputs keyed by outpoint.
///
/// Has no internal synchronization; every mutation takes `&mut self`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UtxoPool {
    utxos: HashMap<OutPoint, TxOutput>,
}

impl UtxoPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an output, replacing any existing entry under the same outpoint.
    ///
    /// Returns the replaced output, if there was one.
    pub fn add_utxo(&mut self, outpoint: OutPoint, output: TxOutput) -> Option<TxOutput> {
        self.utxos.insert(outpoint, output)
    }

    /// Remove an output. Returns `None` if it was not present.
    pub fn remove_utxo(&mut self, outpoint: &OutPoint) -> Option<TxOutput> {
        self.utxos.remove(outpoint)
    }

    /// Whether `outpoint` is currently spendable.
    pub fn contains(&self, outpoint: &OutPoint) -> bool {
        self.utxos.contains_key(outpoint)
    }

    /// Look up the output at `outpoint`.
    pub fn get(&self, outpoint: &OutPoint) -> Option<&TxOutput> {
        self.utxos.get(outpoint)
    }

    /// Number of unspent outputs.
    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }

    /// Iterate over all entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&OutPoint, &TxOutput)> {
        self.utxos.iter()
    }

    /// All outpoints, sorted for deterministic output.
    pub fn outpoints(&self) -> Vec<OutPoint> {
        let mut ops: Vec<OutPoint> = self.utxos.keys().cloned().collect();
        ops.sort();
        ops
    }

    /// Sum of all output values. Returns None on overflow.
    pub fn total_value(&self) -> Option<Amount> {
        self.utxos
            .values()
            .try_fold(0 as Amount, |acc, out| acc.checked_add(out.value))
    }
}

impl UtxoView for UtxoPool {
    fn get_utxo(&self, outpoint: &OutPoint) -> Option<&TxOutput> {
        self.get(outpoint)
    }
}

impl FromIterator<(OutPoint, TxOutput)> for UtxoPool {
    fn from_iter<I: IntoIterator<Item = (OutPoint, TxOutput)>>(iter: I) -> Self {
        Self {
            utxos: iter.into_iter().collect(),
        }
    }
}
