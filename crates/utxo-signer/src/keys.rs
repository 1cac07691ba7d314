//! Lookup of the caller's private keys and scripts.

use std::collections::HashMap;

use utxo_primitives::ec::PrivateKey;
use utxo_primitives::hash::hash160;
use utxo_script::Script;
use utxo_transaction::template::ScriptLookup;

/// Index over the keys and redeem/witness scripts of one request.
///
/// Keys are found by public key (compressed or uncompressed SEC1 form) and
/// by the hash160 of their compressed public key, which is the form every
/// hash-based spend signs with.
pub struct KeyStore<'a> {
    keys: &'a [PrivateKey],
    by_pubkey: HashMap<Vec<u8>, usize>,
    by_pubkey_hash: HashMap<[u8; 20], usize>,
    by_script_hash: HashMap<[u8; 20], &'a Script>,
    by_witness_script_hash: HashMap<[u8; 32], &'a Script>,
}

/// A key matched to a script, with the public key encoding the script uses.
pub struct KeyMatch<'a> {
    pub key: &'a PrivateKey,
    pub pubkey: Vec<u8>,
}

impl<'a> KeyStore<'a> {
    /// Index `keys` and `scripts`. On duplicates the first entry wins.
    pub fn new(keys: &'a [PrivateKey], scripts: &'a [Script]) -> Self {
        let mut by_pubkey = HashMap::new();
        let mut by_pubkey_hash = HashMap::new();
        for (i, key) in keys.iter().enumerate() {
            let pubkey = key.pub_key();
            let compressed = pubkey.to_compressed();
            by_pubkey_hash.entry(hash160(&compressed)).or_insert(i);
            by_pubkey.entry(compressed.to_vec()).or_insert(i);
            by_pubkey.entry(pubkey.to_uncompressed().to_vec()).or_insert(i);
        }

        let mut by_script_hash = HashMap::new();
        let mut by_witness_script_hash = HashMap::new();
        for script in scripts {
            by_script_hash.entry(script.script_hash()).or_insert(script);
            by_witness_script_hash
                .entry(script.witness_script_hash())
                .or_insert(script);
        }

        KeyStore {
            keys,
            by_pubkey,
            by_pubkey_hash,
            by_script_hash,
            by_witness_script_hash,
        }
    }

    /// Key for the exact public key encoding `pubkey`.
    pub fn by_pubkey(&self, pubkey: &[u8]) -> Option<KeyMatch<'a>> {
        self.by_pubkey.get(pubkey).map(|&i| KeyMatch {
            key: &self.keys[i],
            pubkey: pubkey.to_vec(),
        })
    }

    /// Key whose compressed public key hashes to `hash`.
    pub fn by_pubkey_hash(&self, hash: &[u8; 20]) -> Option<KeyMatch<'a>> {
        self.by_pubkey_hash.get(hash).map(|&i| {
            let key = &self.keys[i];
            KeyMatch {
                key,
                pubkey: key.pub_key().to_compressed().to_vec(),
            }
        })
    }
}

impl ScriptLookup for KeyStore<'_> {
    fn script_by_hash160(&self, hash: &[u8; 20]) -> Option<&Script> {
        self.by_script_hash.get(hash).copied()
    }

    fn script_by_sha256(&self, hash: &[u8; 32]) -> Option<&Script> {
        self.by_witness_script_hash.get(hash).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_HEX: &str = "bbc27228ddcb9209d7fd6f36b02f7dfa6252af40bb2f1cbc7a557da8027ff866";
    const PUBKEY: &str = "03c9f4836b9a4f77fc0d81f7bcb01b7f1b35916864b9476c241ce9fc198bd25432";

    #[test]
    fn test_key_lookup() {
        let keys = vec![PrivateKey::from_hex(KEY_HEX).unwrap()];
        let store = KeyStore::new(&keys, &[]);
        let pubkey = hex::decode(PUBKEY).unwrap();

        let found = store.by_pubkey(&pubkey).unwrap();
        assert_eq!(found.pubkey, pubkey);
        let found = store.by_pubkey_hash(&hash160(&pubkey)).unwrap();
        assert_eq!(found.pubkey, pubkey);
        assert_eq!(found.key, &keys[0]);

        let uncompressed = keys[0].pub_key().to_uncompressed();
        assert_eq!(store.by_pubkey(&uncompressed).unwrap().pubkey, uncompressed.to_vec());
        // Hash lookups only know the compressed form.
        assert!(store.by_pubkey_hash(&hash160(&uncompressed)).is_none());
        assert!(store.by_pubkey(&[0x02; 33]).is_none());
    }

    #[test]
    fn test_script_lookup() {
        let redeem = Script::p2wpkh(&[7u8; 20]);
        let scripts = vec![redeem.clone()];
        let store = KeyStore::new(&[], &scripts);
        // No keys were given, so no script resolves to a signer.
        assert!(store.by_pubkey_hash(&[7u8; 20]).is_none());
        assert_eq!(store.script_by_hash160(&redeem.script_hash()), Some(&redeem));
        assert_eq!(store.script_by_sha256(&redeem.witness_script_hash()), Some(&redeem));
        assert_eq!(store.script_by_hash160(&[0u8; 20]), None);
    }
}
