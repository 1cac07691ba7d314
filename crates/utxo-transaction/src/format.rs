//! Chain-specific transaction capabilities.
//!
//! Chains that share the Bitcoin wire format still differ in how they hash
//! transactions. A [`TransactionFormat`] bundles those choices so the
//! planner and signer stay chain-agnostic.

use utxo_primitives::chainhash::Hash;
use utxo_primitives::hash::{sha256, sha256d};
use utxo_script::{Script, ScriptType};

use crate::sighash::{self, HashFn, SigVersion, SighashCache};
use crate::transaction::Transaction;
use crate::TransactionError;

/// Hashing, encoding and classification rules of one chain family.
///
/// Only [`name`](TransactionFormat::name) and
/// [`hasher`](TransactionFormat::hasher) are required; the remaining
/// methods follow Bitcoin unless a chain overrides them.
pub trait TransactionFormat: Send + Sync {
    /// Short lowercase name, used in logs.
    fn name(&self) -> &'static str;

    /// The transaction hash of this chain, used for identifiers and sighashes.
    fn hasher(&self) -> HashFn;

    /// Version written into new transactions.
    fn default_version(&self) -> u32 {
        1
    }

    fn transaction_hash(&self, data: &[u8]) -> [u8; 32] {
        (self.hasher())(data)
    }

    fn encode(&self, tx: &Transaction, include_witness: bool) -> Vec<u8> {
        tx.encode(include_witness)
    }

    fn classify(&self, script: &Script) -> ScriptType {
        ScriptType::classify(script)
    }

    /// Sub-hash cache for signing the segwit inputs of `tx`.
    fn sighash_cache(&self, tx: &Transaction) -> SighashCache {
        SighashCache::new(tx, self.hasher())
    }

    /// Digest to sign for input `input_index` of `tx`.
    ///
    /// `cache` must come from [`sighash_cache`](TransactionFormat::sighash_cache)
    /// on the same transaction.
    #[allow(clippy::too_many_arguments)]
    fn signature_hash(
        &self,
        tx: &Transaction,
        input_index: usize,
        script_code: &Script,
        amount: u64,
        sighash_type: u32,
        sig_version: SigVersion,
        cache: &SighashCache,
    ) -> Result<[u8; 32], TransactionError> {
        sighash::signature_hash(
            tx,
            input_index,
            script_code,
            amount,
            sighash_type,
            sig_version,
            cache,
        )
    }

    /// Transaction identifier: the chain hash of the non-witness encoding.
    fn identifier(&self, tx: &Transaction) -> Hash {
        Hash::new(self.transaction_hash(&self.encode(tx, false)))
    }
}

/// Bitcoin rules: double SHA-256 everywhere. Litecoin shares them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bitcoin;

impl TransactionFormat for Bitcoin {
    fn name(&self) -> &'static str {
        "bitcoin"
    }

    fn hasher(&self) -> HashFn {
        sha256d
    }
}

/// Groestlcoin rules: single SHA-256 for transaction hashes and sighashes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Groestlcoin;

impl TransactionFormat for Groestlcoin {
    fn name(&self) -> &'static str {
        "groestlcoin"
    }

    fn hasher(&self) -> HashFn {
        sha256
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{OutPoint, TransactionInput, DEFAULT_SEQUENCE_NUMBER};
    use crate::output::TransactionOutput;

    fn sample_tx() -> Transaction {
        let mut tx = Transaction::new(1);
        tx.inputs.push(TransactionInput::new(
            OutPoint::new(Hash::new([7u8; 32]), 0),
            DEFAULT_SEQUENCE_NUMBER,
        ));
        tx.outputs.push(TransactionOutput::new(
            1_000,
            Script::p2pkh(&[0x11; 20]),
        ));
        tx
    }

    #[test]
    fn test_identifiers_differ_between_chains() {
        let tx = sample_tx();
        let btc = Bitcoin.identifier(&tx);
        let grs = Groestlcoin.identifier(&tx);
        assert_ne!(btc, grs);
        assert_eq!(btc, tx.tx_id());
        assert_eq!(grs.as_bytes(), &sha256(&tx.encode(false)));
    }

    #[test]
    fn test_identifier_ignores_witness() {
        let mut tx = sample_tx();
        let before = Groestlcoin.identifier(&tx);
        tx.inputs[0].witness = Some(utxo_script::Witness::from_items(vec![vec![1, 2, 3]]));
        assert!(tx.has_witness());
        assert_eq!(Groestlcoin.identifier(&tx), before);
        assert_eq!(Bitcoin.identifier(&tx), tx.tx_id());
    }

    #[test]
    fn test_format_as_trait_object() {
        let formats: [&dyn TransactionFormat; 2] = [&Bitcoin, &Groestlcoin];
        let names: Vec<_> = formats.iter().map(|f| f.name()).collect();
        assert_eq!(names, ["bitcoin", "groestlcoin"]);
        assert!(formats.iter().all(|f| f.default_version() == 1));
    }
}
