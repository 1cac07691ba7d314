//! The engine's result.

use serde::{Serialize, Serializer};
use utxo_primitives::chainhash::Hash;

use crate::planner::TransactionPlan;
use crate::signer::SignedTransaction;

/// Wire bytes of a signed transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EncodedTransaction {
    #[serde(serialize_with = "as_hex")]
    pub bytes: Vec<u8>,
    /// Whether the segwit form (marker, flag and witnesses) was used.
    pub witness_included: bool,
}

impl EncodedTransaction {
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

fn as_hex<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}

/// Everything a successful signing call produces.
#[derive(Clone, Debug, Serialize)]
pub struct SigningOutput {
    /// The signed transaction, with the spent outputs attached to its inputs.
    pub transaction: SignedTransaction,
    pub encoded: EncodedTransaction,
    /// Displayed byte-reversed.
    pub transaction_id: Hash,
    pub plan: TransactionPlan,
}
