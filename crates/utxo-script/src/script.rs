//! Bitcoin Script type - a sequence of opcodes and data pushes.
//!
//! Scripts are used in transaction inputs (unlocking) and outputs (locking)
//! to define spending conditions. The Script wraps a `Vec<u8>` and provides
//! methods for construction, classification and serialization.

use std::fmt;

use utxo_primitives::hash::{hash160, sha256};

use crate::chunk::{decode_script, push_data_prefix, read_chunk, ScriptChunk};
use crate::opcodes::*;
use crate::ScriptError;

/// Largest number of public keys a standard multisig script may list.
pub const MAX_MULTISIG_KEYS: usize = 16;

/// A Bitcoin script, represented as a byte vector newtype.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Script(Vec<u8>);

impl Script {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Create a new empty script.
    pub fn new() -> Self {
        Script(Vec::new())
    }

    /// Create a script from a hex-encoded string.
    ///
    /// # Arguments
    /// * `hex_str` - A hex string (e.g. "76a914...88ac").
    ///
    /// # Returns
    /// A `Script` wrapping the decoded bytes, or an error if the hex is invalid.
    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptError> {
        Ok(Script(hex::decode(hex_str)?))
    }

    /// Create a script from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Script(bytes.to_vec())
    }

    /// Pay-to-public-key-hash: `OP_DUP OP_HASH160 <hash> OP_EQUALVERIFY OP_CHECKSIG`.
    pub fn p2pkh(pubkey_hash: &[u8; 20]) -> Self {
        let mut b = Vec::with_capacity(25);
        b.extend_from_slice(&[OP_DUP, OP_HASH160, OP_DATA_20]);
        b.extend_from_slice(pubkey_hash);
        b.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);
        Script(b)
    }

    /// Pay-to-script-hash: `OP_HASH160 <hash> OP_EQUAL`.
    pub fn p2sh(script_hash: &[u8; 20]) -> Self {
        let mut b = Vec::with_capacity(23);
        b.extend_from_slice(&[OP_HASH160, OP_DATA_20]);
        b.extend_from_slice(script_hash);
        b.push(OP_EQUAL);
        Script(b)
    }

    /// Native segwit v0 key hash: `OP_0 <20-byte hash>`.
    pub fn p2wpkh(pubkey_hash: &[u8; 20]) -> Self {
        let mut b = Vec::with_capacity(22);
        b.extend_from_slice(&[OP_0, OP_DATA_20]);
        b.extend_from_slice(pubkey_hash);
        Script(b)
    }

    /// Native segwit v0 script hash: `OP_0 <32-byte sha256>`.
    pub fn p2wsh(script_hash: &[u8; 32]) -> Self {
        let mut b = Vec::with_capacity(34);
        b.extend_from_slice(&[OP_0, OP_DATA_32]);
        b.extend_from_slice(script_hash);
        Script(b)
    }

    /// Pay-to-public-key: `<pubkey> OP_CHECKSIG`.
    ///
    /// # Arguments
    /// * `pubkey` - A 33-byte compressed or 65-byte uncompressed SEC1 key.
    pub fn p2pk(pubkey: &[u8]) -> Result<Self, ScriptError> {
        if !is_pubkey_encoding(pubkey) {
            return Err(ScriptError::InvalidScript(format!(
                "{} bytes is not a public key encoding",
                pubkey.len()
            )));
        }
        let mut script = Script::new();
        script.append_push_data(pubkey)?;
        script.0.push(OP_CHECKSIG);
        Ok(script)
    }

    /// Bare m-of-n multisig: `OP_m <pubkey>... OP_n OP_CHECKMULTISIG`.
    ///
    /// # Arguments
    /// * `required` - Number of signatures needed (m).
    /// * `pubkeys` - The n public keys, in the order signatures must follow.
    pub fn multisig<K: AsRef<[u8]>>(required: usize, pubkeys: &[K]) -> Result<Self, ScriptError> {
        let total = pubkeys.len();
        if required == 0 || required > total || total > MAX_MULTISIG_KEYS {
            return Err(ScriptError::InvalidScript(format!(
                "invalid multisig threshold {} of {}",
                required, total
            )));
        }
        let mut script = Script::new();
        // Both counts are 1..=16 after the check above.
        script.0.push(OP_1 + (required as u8) - 1);
        for key in pubkeys {
            let key = key.as_ref();
            if !is_pubkey_encoding(key) {
                return Err(ScriptError::InvalidScript(format!(
                    "{} bytes is not a public key encoding",
                    key.len()
                )));
            }
            script.append_push_data(key)?;
        }
        script.0.push(OP_1 + (total as u8) - 1);
        script.0.push(OP_CHECKMULTISIG);
        Ok(script)
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    /// Encode the script as a hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Return a reference to the underlying bytes.
    pub fn to_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Return the length of the script in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the script is empty (zero bytes).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    // -----------------------------------------------------------------------
    // Script classification
    // -----------------------------------------------------------------------

    /// Check if this is a Pay-to-Public-Key-Hash (P2PKH) output script.
    ///
    /// Pattern: OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG
    pub fn is_p2pkh(&self) -> bool {
        let b = &self.0;
        b.len() == 25
            && b[0] == OP_DUP
            && b[1] == OP_HASH160
            && b[2] == OP_DATA_20
            && b[23] == OP_EQUALVERIFY
            && b[24] == OP_CHECKSIG
    }

    /// Check if this is a Pay-to-Public-Key (P2PK) output script.
    ///
    /// Pattern: <pubkey> OP_CHECKSIG (pubkey is 33 or 65 bytes with valid prefix).
    pub fn is_p2pk(&self) -> bool {
        let b = &self.0;
        match b.len() {
            35 => b[0] == OP_DATA_33 && b[34] == OP_CHECKSIG && is_pubkey_encoding(&b[1..34]),
            67 => b[0] == OP_DATA_65 && b[66] == OP_CHECKSIG && is_pubkey_encoding(&b[1..66]),
            _ => false,
        }
    }

    /// Check if this is a Pay-to-Script-Hash (P2SH) output script.
    ///
    /// Pattern: OP_HASH160 <20 bytes> OP_EQUAL
    pub fn is_p2sh(&self) -> bool {
        let b = &self.0;
        b.len() == 23 && b[0] == OP_HASH160 && b[1] == OP_DATA_20 && b[22] == OP_EQUAL
    }

    /// Split a witness program into its version and program bytes.
    ///
    /// A witness program is a version opcode (OP_0, OP_1..OP_16) followed by
    /// a single direct push of 2 to 40 bytes.
    ///
    /// # Returns
    /// `Some((version, program))`, or `None` if this is not a witness program.
    pub fn witness_program(&self) -> Option<(u8, &[u8])> {
        let b = &self.0;
        if b.len() < 4 || b.len() > 42 {
            return None;
        }
        let version = small_int_value(b[0])?;
        let push = b[1] as usize;
        if (2..=40).contains(&push) && push + 2 == b.len() {
            Some((version, &b[2..]))
        } else {
            None
        }
    }

    /// Decompose a multisig script into its threshold and public keys.
    ///
    /// # Returns
    /// `Some((required, pubkeys))` when the script is a well-formed m-of-n
    /// multisig with `1 <= m <= n <= 16` and every key a valid encoding.
    pub fn multisig_parts(&self) -> Option<(usize, Vec<Vec<u8>>)> {
        let parts = self.chunks().ok()?;
        if parts.len() < 4 || parts[parts.len() - 1].op != OP_CHECKMULTISIG {
            return None;
        }
        let required = small_int_value(parts[0].op)? as usize;
        let total = small_int_value(parts[parts.len() - 2].op)? as usize;
        let keys = &parts[1..parts.len() - 2];
        if required == 0 || required > total || keys.len() != total {
            return None;
        }
        let pubkeys = keys
            .iter()
            .map(|chunk| match chunk.push_data() {
                Some(key) if is_pubkey_encoding(key) => Some(key.to_vec()),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()?;
        Some((required, pubkeys))
    }

    // -----------------------------------------------------------------------
    // Data extraction
    // -----------------------------------------------------------------------

    /// Parse the script into a vector of decoded chunks.
    ///
    /// # Returns
    /// A vector of `ScriptChunk` values, or an error if the script is malformed.
    pub fn chunks(&self) -> Result<Vec<ScriptChunk>, ScriptError> {
        decode_script(&self.0)
    }

    /// Hash160 of the script bytes, as committed to by a P2SH output.
    pub fn script_hash(&self) -> [u8; 20] {
        hash160(&self.0)
    }

    /// SHA-256 of the script bytes, as committed to by a P2WSH output.
    pub fn witness_script_hash(&self) -> [u8; 32] {
        sha256(&self.0)
    }

    /// Copy of this script with every OP_CODESEPARATOR removed.
    ///
    /// Push payloads are left untouched even if they contain the 0xab byte.
    /// If the script is malformed, the unparseable tail is kept as is.
    pub fn without_code_separators(&self) -> Script {
        let b = &self.0;
        let mut out = Vec::with_capacity(b.len());
        let mut pos = 0;
        while pos < b.len() {
            match read_chunk(b, pos) {
                Ok((chunk, next)) => {
                    if chunk.op != OP_CODESEPARATOR {
                        out.extend_from_slice(&b[pos..next]);
                    }
                    pos = next;
                }
                Err(_) => {
                    out.extend_from_slice(&b[pos..]);
                    break;
                }
            }
        }
        Script(out)
    }

    // -----------------------------------------------------------------------
    // Mutation / building
    // -----------------------------------------------------------------------

    /// Append data bytes to the script with the proper PUSHDATA prefix.
    ///
    /// Chooses the minimal encoding: direct push for 1-75 bytes,
    /// OP_PUSHDATA1 for 76-255, OP_PUSHDATA2 for 256-65535, etc.
    pub fn append_push_data(&mut self, data: &[u8]) -> Result<(), ScriptError> {
        let prefix = push_data_prefix(data.len())?;
        self.0.extend_from_slice(&prefix);
        self.0.extend_from_slice(data);
        Ok(())
    }

}

/// Whether `key` has the length and prefix of a SEC1 public key.
///
/// Only the encoding is checked, not that the point is on the curve.
pub fn is_pubkey_encoding(key: &[u8]) -> bool {
    match key.len() {
        33 => key[0] == 0x02 || key[0] == 0x03,
        65 => key[0] == 0x04 || key[0] == 0x06 || key[0] == 0x07,
        _ => false,
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Script(bytes)
    }
}

impl AsRef<[u8]> for Script {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Script {
    /// Display the script as a lowercase hex string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}

impl serde::Serialize for Script {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Script {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Script::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
