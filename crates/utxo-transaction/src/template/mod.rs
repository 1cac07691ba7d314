//! Spend templates: how each supported locking script is unlocked.
//!
//! [`Spend::resolve`] maps a locking script, together with whatever redeem
//! and witness scripts the caller holds, to a spend path and the script
//! code its signatures commit to. [`Spend::build`] then turns the
//! signature stack into the unlocking script and witness for the input.

mod signable;
mod spend;

pub use signable::{Signable, COMPRESSED_PUBKEY_LEN, MAX_SIGNATURE_LEN};
pub use spend::{InputSize, Spend, SpendPath};

use utxo_script::{Script, Witness};

use crate::input::TransactionInput;

/// Source of redeem and witness scripts, looked up by the hash a locking
/// script commits to.
pub trait ScriptLookup {
    /// Script whose hash160 is `hash` (P2SH redeem scripts).
    fn script_by_hash160(&self, hash: &[u8; 20]) -> Option<&Script>;

    /// Script whose single SHA-256 is `hash` (P2WSH witness scripts).
    fn script_by_sha256(&self, hash: &[u8; 32]) -> Option<&Script>;
}

impl ScriptLookup for [Script] {
    fn script_by_hash160(&self, hash: &[u8; 20]) -> Option<&Script> {
        self.iter().find(|s| &s.script_hash() == hash)
    }

    fn script_by_sha256(&self, hash: &[u8; 32]) -> Option<&Script> {
        self.iter().find(|s| &s.witness_script_hash() == hash)
    }
}

/// Unlocking data for one input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Unlocking {
    pub script_sig: Script,
    /// `None` for legacy spends.
    pub witness: Option<Witness>,
}

impl Unlocking {
    /// Install this unlocking data on `input`.
    pub fn apply_to(self, input: &mut TransactionInput) {
        input.unlocking_script = self.script_sig;
        input.witness = self.witness;
    }
}
