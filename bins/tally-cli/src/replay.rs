//! Run every epoch of a ledger file through one handler.

use serde::Serialize;
use tally_core::error::LedgerError;
use tally_core::types::Amount;
use tally_core::TxHandler;
use tracing::info;

use crate::ledger_file::LedgerFile;

/// A candidate dropped from an epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub position: usize,
    pub reason: String,
}

/// Result of one epoch, in printable form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpochReport {
    pub epoch: usize,
    /// Hex txids of admitted transactions, in admission order.
    pub accepted: Vec<String>,
    pub rejected: Vec<Rejection>,
    pub utxos_spent: usize,
    pub utxos_created: usize,
}

/// One unspent output left after the replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UtxoLine {
    /// `txid:index`.
    pub outpoint: String,
    pub value: Amount,
    /// Hex owner key.
    pub owner: String,
}

/// Result of a full replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    pub epochs: Vec<EpochReport>,
    pub final_utxo_count: usize,
    /// Final pool contents, sorted by outpoint.
    pub final_utxos: Vec<UtxoLine>,
    /// `None` if the total overflows.
    pub final_value: Option<Amount>,
}

pub fn replay(file: &LedgerFile) -> Result<ReplayReport, LedgerError> {
    let genesis = file.genesis_pool();
    info!(utxos = genesis.len(), epochs = file.epochs.len(), "replaying ledger");

    let mut handler = TxHandler::new(&genesis);
    let mut epochs = Vec::with_capacity(file.epochs.len());

    for (epoch, candidates) in file.epochs.iter().enumerate() {
        let summary = handler.process_epoch(candidates)?;
        let accepted = summary
            .accepted
            .iter()
            .map(|tx| tx.txid().map(|id| id.to_string()))
            .collect::<Result<Vec<_>, _>>()?;
        let rejected = summary
            .rejected
            .into_iter()
            .map(|r| Rejection { position: r.position, reason: r.reason.to_string() })
            .collect();

        epochs.push(EpochReport {
            epoch,
            accepted,
            rejected,
            utxos_spent: summary.utxos_spent,
            utxos_created: summary.utxos_created,
        });
    }

    let pool = handler.into_pool();
    let final_utxos = pool
        .outpoints()
        .into_iter()
        .filter_map(|op| {
            pool.get(&op).map(|out| UtxoLine {
                outpoint: op.to_string(),
                value: out.value,
                owner: out.owner.to_string(),
            })
        })
        .collect();

    Ok(ReplayReport {
        epochs,
        final_utxo_count: pool.len(),
        final_utxos,
        final_value: pool.total_value(),
    })
}
