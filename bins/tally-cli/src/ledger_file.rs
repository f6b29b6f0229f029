//! JSON ledger file: a genesis UTXO set plus a sequence of candidate epochs.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tally_core::constants::COIN;
use tally_core::crypto::{self, KeyPair};
use tally_core::error::LedgerError;
use tally_core::types::{Amount, Hash256, OutPoint, OwnerKey, Transaction, TxOutput};
use tally_core::UtxoPool;

/// One pre-funded output in the genesis pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisEntry {
    pub outpoint: OutPoint,
    pub output: TxOutput,
}

/// Contents of a ledger file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerFile {
    /// Initial unspent outputs.
    pub genesis: Vec<GenesisEntry>,
    /// Candidate batches, processed in order by one handler.
    pub epochs: Vec<Vec<Transaction>>,
}

impl LedgerFile {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_slice(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self).context("encoding ledger file")?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))
    }

    /// Build the genesis pool. Later entries win on duplicate outpoints.
    pub fn genesis_pool(&self) -> UtxoPool {
        self.genesis
            .iter()
            .map(|entry| (entry.outpoint.clone(), entry.output.clone()))
            .collect()
    }

    /// A signed demonstration ledger derived from `seed`.
    ///
    /// Alice and Bob start funded. Epoch 1 contains a payment, a competing
    /// double spend of the same output, and an independent payment. Epoch 2
    /// spends epoch-1 outputs, including one chained within the epoch and
    /// one overspend.
    pub fn sample(seed: u8) -> Result<Self, LedgerError> {
        let alice = KeyPair::from_secret_bytes([seed; 32]);
        let bob = KeyPair::from_secret_bytes([seed.wrapping_add(1); 32]);
        let carol = KeyPair::from_secret_bytes([seed.wrapping_add(2); 32]);

        let mut hasher = blake3::Hasher::new();
        hasher.update(b"tally genesis");
        hasher.update(&[seed]);
        let genesis_txid = Hash256(hasher.finalize().into());
        let alice_coin = OutPoint::new(genesis_txid, 0);
        let bob_coin = OutPoint::new(genesis_txid, 1);

        let genesis = vec![
            GenesisEntry {
                outpoint: alice_coin.clone(),
                output: TxOutput { value: 100 * COIN, owner: alice.owner_key() },
            },
            GenesisEntry {
                outpoint: bob_coin.clone(),
                output: TxOutput { value: 50 * COIN, owner: bob.owner_key() },
            },
        ];

        let alice_pays_bob = signed(
            &[(alice_coin.clone(), &alice)],
            &[(60 * COIN, bob.owner_key()), (40 * COIN, alice.owner_key())],
        )?;
        let alice_double_spend = signed(&[(alice_coin, &alice)], &[(100 * COIN, carol.owner_key())])?;
        let bob_pays_carol = signed(&[(bob_coin, &bob)], &[(49 * COIN, carol.owner_key())])?;

        let bob_splits = signed(
            &[(alice_pays_bob.outpoint(0)?, &bob)],
            &[(30 * COIN, carol.owner_key()), (30 * COIN, bob.owner_key())],
        )?;
        let carol_overspends = signed(&[(bob_pays_carol.outpoint(0)?, &carol)], &[(50 * COIN, carol.owner_key())])?;
        let carol_forwards = signed(&[(bob_splits.outpoint(0)?, &carol)], &[(30 * COIN, alice.owner_key())])?;

        Ok(Self {
            genesis,
            epochs: vec![
                vec![alice_pays_bob, alice_double_spend, bob_pays_carol],
                vec![bob_splits, carol_overspends, carol_forwards],
            ],
        })
    }
}

fn signed(inputs: &[(OutPoint, &KeyPair)], outputs: &[(Amount, OwnerKey)]) -> Result<Transaction, LedgerError> {
    let mut tx = Transaction::new();
    for (op, _) in inputs {
        tx.add_input(op.clone());
    }
    for (value, owner) in outputs {
        tx.add_output(*value, *owner);
    }
    for (i, (_, kp)) in inputs.iter().enumerate() {
        crypto::sign_transaction_input(&mut tx, i, kp)?;
    }
    Ok(tx)
}
