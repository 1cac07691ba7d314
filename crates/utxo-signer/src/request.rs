//! What the caller asks the engine to do.

use serde::{Deserialize, Serialize};
use utxo_primitives::ec::PrivateKey;
use utxo_script::Script;
use utxo_transaction::input::DEFAULT_SEQUENCE_NUMBER;
use utxo_transaction::sighash::SIGHASH_ALL;
use utxo_transaction::{OutPoint, TransactionOutput};

use crate::config::{FeePolicy, PlannerConfig};

/// A spendable output owned by the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnspentOutput {
    pub out_point: OutPoint,
    pub amount: u64,
    /// Locking script of the output.
    pub script: Script,
    #[serde(default = "default_sequence")]
    pub sequence: u32,
    /// Wallet derivation path of the owning key. Carried through, never read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derivation_path: Option<String>,
}

fn default_sequence() -> u32 {
    DEFAULT_SEQUENCE_NUMBER
}

impl UnspentOutput {
    pub fn new(out_point: OutPoint, amount: u64, script: Script) -> Self {
        UnspentOutput {
            out_point,
            amount,
            script,
            sequence: DEFAULT_SEQUENCE_NUMBER,
            derivation_path: None,
        }
    }

    /// The output as it appears in the funding transaction.
    pub fn to_output(&self) -> TransactionOutput {
        TransactionOutput::new(self.amount, self.script.clone())
    }
}

/// A complete signing intent.
///
/// `utxos` are considered in the given order. `scripts` holds redeem and
/// witness scripts for P2SH and P2WSH candidates.
#[derive(Clone, Debug)]
pub struct SigningRequest {
    pub amount: u64,
    pub to_script: Script,
    pub change_script: Script,
    pub fee: FeePolicy,
    pub utxos: Vec<UnspentOutput>,
    pub private_keys: Vec<PrivateKey>,
    pub scripts: Vec<Script>,
    pub sighash_type: u32,
    /// Spend every usable candidate and send all of it, less the fee.
    pub use_max_amount: bool,
    pub lock_time: u32,
    /// Transaction version; the chain default when `None`.
    pub version: Option<u32>,
    pub config: PlannerConfig,
}

impl SigningRequest {
    /// A request with no inputs or keys, SIGHASH_ALL, lock time 0 and the
    /// default planner configuration.
    pub fn new(amount: u64, to_script: Script, change_script: Script, fee: FeePolicy) -> Self {
        SigningRequest {
            amount,
            to_script,
            change_script,
            fee,
            utxos: Vec::new(),
            private_keys: Vec::new(),
            scripts: Vec::new(),
            sighash_type: SIGHASH_ALL,
            use_max_amount: false,
            lock_time: 0,
            version: None,
            config: PlannerConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use utxo_primitives::chainhash::Hash;

    #[test]
    fn test_unspent_output_json() {
        let json = r#"{
            "out_point": {
                "txid": "e8151a2af31c368a35053ddd4bdb285a8595c769a3ad83e0fa02314a602d4609",
                "vout": 1
            },
            "amount": 5000,
            "script": "0014751e76e8199196d454941c45d1b3a323f1433bd6"
        }"#;
        let utxo: UnspentOutput = serde_json::from_str(json).unwrap();
        assert_eq!(utxo.sequence, DEFAULT_SEQUENCE_NUMBER);
        assert_eq!(utxo.derivation_path, None);
        assert_eq!(utxo.out_point.vout, 1);
        assert_eq!(
            utxo.out_point.txid,
            "e8151a2af31c368a35053ddd4bdb285a8595c769a3ad83e0fa02314a602d4609"
                .parse::<Hash>()
                .unwrap()
        );
        assert_eq!(utxo.to_output().amount, 5000);
    }
}
