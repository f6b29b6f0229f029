//! Multi-party, multi-epoch settlement scenarios with real Ed25519 keys.

use tally_core::error::TransactionError;
use tally_core::types::{OutPoint, Transaction};
use tally_core::{TxHandler, UtxoPool};
use tally_tests::helpers::*;

/// Alice owns (genesis 0xA0, 0) = 10 and (genesis 0xA0, 1) = 5.
fn alice_genesis() -> UtxoPool {
    let alice = keypair(1);
    make_pool(&[
        (genesis_outpoint(0xA0, 0), 10, alice.owner_key()),
        (genesis_outpoint(0xA0, 1), 5, alice.owner_key()),
    ])
}

#[test]
fn overspend_of_single_utxo_is_rejected() {
    let alice = keypair(1);
    let bob = keypair(2);
    let handler = TxHandler::new(&alice_genesis());

    let tx = make_signed_tx(&[(genesis_outpoint(0xA0, 0), &alice)], &[(15, bob.owner_key())]);
    assert!(!handler.is_valid_tx(&tx));
}

#[test]
fn double_claim_within_one_tx_is_rejected() {
    let alice = keypair(1);
    let bob = keypair(2);
    let handler = TxHandler::new(&alice_genesis());

    let op = genesis_outpoint(0xA0, 0);
    let tx = make_signed_tx(&[(op.clone(), &alice), (op, &alice)], &[(1, bob.owner_key())]);
    assert!(matches!(
        handler.check_tx(&tx).unwrap_err(),
        TransactionError::DuplicateInput(_)
    ));
}

#[test]
fn signature_from_non_owner_is_rejected() {
    let alice = keypair(1);
    let mallory = keypair(9);
    let handler = TxHandler::new(&alice_genesis());

    let tx = make_signed_tx(&[(genesis_outpoint(0xA0, 0), &mallory)], &[(10, mallory.owner_key())]);
    assert!(!handler.is_valid_tx(&tx));

    let honest = make_signed_tx(&[(genesis_outpoint(0xA0, 0), &alice)], &[(10, mallory.owner_key())]);
    assert!(handler.is_valid_tx(&honest));
}

#[test]
fn negative_output_is_rejected_even_with_funds() {
    let alice = keypair(1);
    let bob = keypair(2);
    let handler = TxHandler::new(&alice_genesis());

    let tx = make_signed_tx(
        &[(genesis_outpoint(0xA0, 0), &alice), (genesis_outpoint(0xA0, 1), &alice)],
        &[(-3, bob.owner_key()), (1, bob.owner_key())],
    );
    assert!(!handler.is_valid_tx(&tx));
}

#[test]
fn exact_and_surplus_spends_are_both_accepted() {
    let alice = keypair(1);
    let bob = keypair(2);
    let handler = TxHandler::new(&alice_genesis());

    let exact = make_signed_tx(&[(genesis_outpoint(0xA0, 0), &alice)], &[(10, bob.owner_key())]);
    let surplus = make_signed_tx(&[(genesis_outpoint(0xA0, 0), &alice)], &[(4, bob.owner_key())]);
    assert!(handler.is_valid_tx(&exact));
    assert_eq!(handler.check_tx(&surplus).unwrap().fee, 6);
}

#[test]
fn validation_is_repeatable() {
    let alice = keypair(1);
    let bob = keypair(2);
    let handler = TxHandler::new(&alice_genesis());
    let before = handler.pool().clone();

    let good = make_signed_tx(&[(genesis_outpoint(0xA0, 0), &alice)], &[(10, bob.owner_key())]);
    let bad = make_signed_tx(&[(genesis_outpoint(0xA0, 0), &alice)], &[(11, bob.owner_key())]);
    for _ in 0..3 {
        assert!(handler.is_valid_tx(&good));
        assert!(!handler.is_valid_tx(&bad));
    }
    assert_eq!(handler.pool(), &before);
}

#[test]
fn reordering_conflicting_pair_flips_outcome() {
    let alice = keypair(1);
    let bob = keypair(2);
    let carol = keypair(3);
    let genesis = alice_genesis();

    let tx_a = make_signed_tx(&[(genesis_outpoint(0xA0, 0), &alice)], &[(10, bob.owner_key())]);
    let tx_b = make_signed_tx(&[(genesis_outpoint(0xA0, 0), &alice)], &[(10, carol.owner_key())]);

    let mut first = TxHandler::new(&genesis);
    assert_eq!(first.handle_txs(&[tx_a.clone(), tx_b.clone()]).unwrap(), vec![tx_a.clone()]);

    let mut second = TxHandler::new(&genesis);
    assert_eq!(second.handle_txs(&[tx_b.clone(), tx_a]).unwrap(), vec![tx_b]);
}

#[test]
fn pool_evolves_with_accepted_transactions() {
    let alice = keypair(1);
    let bob = keypair(2);
    let mut handler = TxHandler::new(&alice_genesis());

    let tx = make_signed_tx(
        &[(genesis_outpoint(0xA0, 0), &alice), (genesis_outpoint(0xA0, 1), &alice)],
        &[(12, bob.owner_key()), (3, alice.owner_key())],
    );
    let txid = tx.txid().unwrap();
    assert_eq!(handler.handle_txs(std::slice::from_ref(&tx)).unwrap(), vec![tx.clone()]);

    let pool = handler.pool();
    assert!(!pool.contains(&genesis_outpoint(0xA0, 0)));
    assert!(!pool.contains(&genesis_outpoint(0xA0, 1)));
    for (index, output) in tx.outputs.iter().enumerate() {
        assert_eq!(pool.get(&OutPoint::new(txid, index as u64)), Some(output));
    }
    assert_eq!(pool.len(), tx.outputs.len());
}

#[test]
fn three_epoch_payment_chain() {
    let alice = keypair(1);
    let bob = keypair(2);
    let carol = keypair(3);
    let mut handler = TxHandler::new(&alice_genesis());

    // Epoch 1: Alice pays Bob 7 with 3 change; a conflicting spend to Carol loses.
    let pay_bob = make_signed_tx(
        &[(genesis_outpoint(0xA0, 0), &alice)],
        &[(7, bob.owner_key()), (3, alice.owner_key())],
    );
    let conflicting = make_signed_tx(&[(genesis_outpoint(0xA0, 0), &alice)], &[(10, carol.owner_key())]);
    let summary = handler.process_epoch(&[pay_bob.clone(), conflicting]).unwrap();
    assert_eq!(summary.accepted, vec![pay_bob.clone()]);
    assert_eq!(summary.rejected.len(), 1);

    // Epoch 2: Bob forwards to Carol, and Carol spends it in the same epoch.
    let bob_to_carol = make_signed_tx(&[(pay_bob.outpoint(0).unwrap(), &bob)], &[(7, carol.owner_key())]);
    let carol_to_alice =
        make_signed_tx(&[(bob_to_carol.outpoint(0).unwrap(), &carol)], &[(6, alice.owner_key())]);
    let accepted = handler.handle_txs(&[bob_to_carol.clone(), carol_to_alice.clone()]).unwrap();
    assert_eq!(accepted, vec![bob_to_carol.clone(), carol_to_alice.clone()]);

    // Epoch 3: Alice consolidates everything she holds.
    let consolidate = make_signed_tx(
        &[
            (genesis_outpoint(0xA0, 1), &alice),
            (pay_bob.outpoint(1).unwrap(), &alice),
            (carol_to_alice.outpoint(0).unwrap(), &alice),
        ],
        &[(14, alice.owner_key())],
    );
    assert_eq!(handler.handle_txs(std::slice::from_ref(&consolidate)).unwrap().len(), 1);

    let pool = handler.into_pool();
    assert_eq!(pool.len(), 1);
    assert_eq!(pool.total_value(), Some(14));
    assert_eq!(pool.get(&consolidate.outpoint(0).unwrap()).unwrap().owner, alice.owner_key());
}

#[test]
fn empty_and_invalid_batches_leave_pool_unchanged() {
    let alice = keypair(1);
    let genesis = alice_genesis();
    let mut handler = TxHandler::new(&genesis);

    assert!(handler.handle_txs(&[]).unwrap().is_empty());

    let unknown = make_signed_tx(&[(genesis_outpoint(0xEE, 0), &alice)], &[(1, alice.owner_key())]);
    let unsigned = make_unsigned_tx(&[genesis_outpoint(0xA0, 0)], &[(1, alice.owner_key())]);
    assert!(handler.handle_txs(&[unknown, unsigned]).unwrap().is_empty());
    assert_eq!(handler.pool(), &genesis);
}

#[test]
fn empty_transaction_is_admitted_without_pool_change() {
    let genesis = alice_genesis();
    let mut handler = TxHandler::new(&genesis);

    let accepted = handler.handle_txs(&[Transaction::new()]).unwrap();
    assert_eq!(accepted.len(), 1);
    assert_eq!(handler.pool(), &genesis);
}

#[test]
fn repeated_input_less_transaction_overwrites_its_own_output() {
    let alice = keypair(1);
    let genesis = alice_genesis();
    let mut handler = TxHandler::new(&genesis);

    // No inputs, so nothing is claimed and every copy hashes to the same txid.
    let mut zero_payment = Transaction::new();
    zero_payment.add_output(0, alice.owner_key());
    let outpoint = zero_payment.outpoint(0).unwrap();

    let summary = handler
        .process_epoch(&[zero_payment.clone(), zero_payment.clone()])
        .unwrap();
    assert_eq!(summary.accepted, vec![zero_payment.clone(), zero_payment.clone()]);
    assert_eq!(summary.utxos_created, 2);

    // The second admission replaced the first under the same key.
    assert_eq!(handler.pool().len(), genesis.len() + 1);
    assert_eq!(handler.pool().get(&outpoint).unwrap().value, 0);

    assert_eq!(handler.handle_txs(std::slice::from_ref(&zero_payment)).unwrap().len(), 1);
    assert_eq!(handler.pool().len(), genesis.len() + 1);
    assert_eq!(handler.pool().total_value(), genesis.total_value());
}
