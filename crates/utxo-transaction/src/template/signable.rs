//! Key scripts: the templates a signature set can satisfy directly.
//!
//! Every spend path ends in one of these, either as the locking script
//! itself or as the redeem/witness script it commits to.

use utxo_script::ScriptType;

use crate::TemplateError;

/// Upper bound on a DER signature plus its sighash byte, low-S form.
pub const MAX_SIGNATURE_LEN: usize = 72;

/// Length of a compressed SEC1 public key.
pub const COMPRESSED_PUBKEY_LEN: usize = 33;

/// A script satisfied by signatures (and for PubKeyHash, the public key).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Signable {
    /// `<sig>` against `<pubkey> OP_CHECKSIG`.
    PubKey(Vec<u8>),
    /// `<sig> <pubkey>` against a key hash.
    PubKeyHash([u8; 20]),
    /// `OP_0 <sig>...` with `required` signatures in key order.
    Multisig {
        required: usize,
        pubkeys: Vec<Vec<u8>>,
    },
}

impl Signable {
    /// Map a classified script to the key script it is, if any.
    pub fn from_script_type(script_type: &ScriptType) -> Option<Self> {
        match script_type {
            ScriptType::PubKey(key) => Some(Signable::PubKey(key.clone())),
            ScriptType::PubKeyHash(hash) => Some(Signable::PubKeyHash(*hash)),
            ScriptType::Multisig { required, pubkeys } => Some(Signable::Multisig {
                required: *required,
                pubkeys: pubkeys.clone(),
            }),
            _ => None,
        }
    }

    /// Worst-case stack items, for size estimates before signing.
    pub fn placeholder_items(&self) -> Vec<Vec<u8>> {
        let sig = || vec![0u8; MAX_SIGNATURE_LEN];
        match self {
            Signable::PubKey(_) => vec![sig()],
            Signable::PubKeyHash(_) => vec![sig(), vec![0u8; COMPRESSED_PUBKEY_LEN]],
            Signable::Multisig { required, .. } => {
                let mut items = Vec::with_capacity(required + 1);
                items.push(Vec::new());
                items.extend((0..*required).map(|_| sig()));
                items
            }
        }
    }

    /// Check that `items` has the shape this script expects.
    ///
    /// # Returns
    /// `MissingKeyMaterial` if signatures are missing or the stack is
    /// otherwise malformed.
    pub fn check_items(&self, items: &[Vec<u8>]) -> Result<(), TemplateError> {
        let ok = match self {
            Signable::PubKey(_) => items.len() == 1 && !items[0].is_empty(),
            Signable::PubKeyHash(_) => {
                items.len() == 2 && !items[0].is_empty() && !items[1].is_empty()
            }
            Signable::Multisig { required, .. } => {
                items.len() == required + 1
                    && items[0].is_empty()
                    && items[1..].iter().all(|sig| !sig.is_empty())
            }
        };
        if ok {
            Ok(())
        } else {
            Err(TemplateError::MissingKeyMaterial(format!(
                "{} stack items do not satisfy {}",
                items.len(),
                self.name()
            )))
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Signable::PubKey(_) => "p2pk",
            Signable::PubKeyHash(_) => "p2pkh",
            Signable::Multisig { .. } => "multisig",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_items() {
        let pkh = Signable::PubKeyHash([0u8; 20]);
        assert!(pkh.check_items(&[vec![1], vec![2]]).is_ok());
        assert!(matches!(
            pkh.check_items(&[vec![1]]),
            Err(TemplateError::MissingKeyMaterial(_))
        ));

        let multi = Signable::Multisig { required: 2, pubkeys: vec![vec![2; 33]; 3] };
        assert!(multi.check_items(&[vec![], vec![1], vec![2]]).is_ok());
        assert!(multi.check_items(&[vec![], vec![1]]).is_err());
        assert!(multi.check_items(&[vec![0], vec![1], vec![2]]).is_err());
    }

    #[test]
    fn test_placeholders_satisfy_their_script() {
        for signable in [
            Signable::PubKey(vec![2; 33]),
            Signable::PubKeyHash([1; 20]),
            Signable::Multisig { required: 3, pubkeys: vec![vec![3; 33]; 3] },
        ] {
            assert!(signable.check_items(&signable.placeholder_items()).is_ok());
        }
    }

    #[test]
    fn test_from_script_type() {
        assert_eq!(
            Signable::from_script_type(&ScriptType::PubKeyHash([9; 20])),
            Some(Signable::PubKeyHash([9; 20]))
        );
        assert_eq!(Signable::from_script_type(&ScriptType::ScriptHash([9; 20])), None);
        assert_eq!(Signable::from_script_type(&ScriptType::NullData), None);
    }
}
