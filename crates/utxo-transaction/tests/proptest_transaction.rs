use proptest::prelude::*;

use utxo_primitives::chainhash::Hash;
use utxo_script::{Script, Witness};
use utxo_transaction::{Bitcoin, Groestlcoin, OutPoint, Transaction, TransactionFormat, TransactionInput, TransactionOutput};

/// Strategy for an input with an optional, possibly empty, witness.
fn arb_input() -> impl Strategy<Value = TransactionInput> {
    (
        prop::array::uniform32(any::<u8>()),
        any::<u32>(),
        prop::collection::vec(any::<u8>(), 0..64),
        any::<u32>(),
        prop::option::of(prop::collection::vec(prop::collection::vec(any::<u8>(), 0..40), 0..4)),
    )
        .prop_map(|(txid, vout, script, sequence, witness)| {
            let mut input = TransactionInput::new(OutPoint::new(Hash::new(txid), vout), sequence);
            input.unlocking_script = Script::from_bytes(&script);
            input.witness = witness.map(Witness::from_items);
            input
        })
}

fn arb_transaction() -> impl Strategy<Value = Transaction> {
    let arb_output = (any::<u64>(), prop::collection::vec(any::<u8>(), 0..64))
        .prop_map(|(amount, script)| TransactionOutput::new(amount, Script::from_bytes(&script)));

    (
        any::<u32>(),
        prop::collection::vec(arb_input(), 1..4),
        prop::collection::vec(arb_output, 0..4),
        any::<u32>(),
    )
        .prop_map(|(version, inputs, outputs, lock_time)| Transaction {
            version,
            inputs,
            outputs,
            lock_time,
        })
}

/// Witnesses as the decoder reports them: empty stacks become absent.
fn normalized(tx: &Transaction) -> Vec<Option<Witness>> {
    tx.inputs
        .iter()
        .map(|input| input.witness.clone().filter(|w| !w.is_empty()))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn transaction_serialize_deserialize_roundtrip(tx in arb_transaction()) {
        let bytes = tx.to_bytes();
        let tx2 = Transaction::from_bytes(&bytes).unwrap();
        prop_assert_eq!(tx2.to_bytes(), bytes);
        prop_assert_eq!(normalized(&tx2), normalized(&tx));
    }

    #[test]
    fn transaction_hex_roundtrip(tx in arb_transaction()) {
        let tx2 = Transaction::from_hex(&tx.to_hex()).unwrap();
        prop_assert_eq!(tx2.to_hex(), tx.to_hex());
    }

    #[test]
    fn witness_form_only_with_witness_data(tx in arb_transaction()) {
        let with = tx.encode(true);
        let without = tx.encode(false);
        if tx.has_witness() {
            prop_assert_eq!(with[4], 0x00);
            prop_assert_eq!(with[5], 0x01);
            prop_assert_eq!(with.len(), without.len() + tx.witness_size());
        } else {
            prop_assert_eq!(&with, &without);
        }
        prop_assert_eq!(without.len(), tx.stripped_size());
    }

    #[test]
    fn identifier_ignores_witness(tx in arb_transaction()) {
        let mut stripped = tx.clone();
        for input in stripped.inputs.iter_mut() {
            input.witness = None;
        }
        prop_assert_eq!(Bitcoin.identifier(&tx), Bitcoin.identifier(&stripped));
        prop_assert_eq!(Groestlcoin.identifier(&tx), Groestlcoin.identifier(&stripped));
        prop_assert_eq!(Bitcoin.identifier(&tx), tx.tx_id());
    }

    #[test]
    fn vsize_bounds(tx in arb_transaction()) {
        let vsize = tx.vsize();
        prop_assert!(vsize >= tx.stripped_size());
        prop_assert!(vsize <= tx.encode(true).len());
        prop_assert_eq!(vsize, (tx.weight() + 3) / 4);
    }
}
