//! Standard output script classification.

use crate::opcodes::OP_RETURN;
use crate::Script;

/// The standard template a locking script matches, with the data it carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptType {
    /// `<pubkey> OP_CHECKSIG`
    PubKey(Vec<u8>),
    /// `OP_DUP OP_HASH160 <hash160(pubkey)> OP_EQUALVERIFY OP_CHECKSIG`
    PubKeyHash([u8; 20]),
    /// `OP_HASH160 <hash160(redeem script)> OP_EQUAL`
    ScriptHash([u8; 20]),
    /// `OP_m <pubkey>... OP_n OP_CHECKMULTISIG`
    Multisig {
        required: usize,
        pubkeys: Vec<Vec<u8>>,
    },
    /// `OP_0 <20-byte key hash>`
    WitnessV0KeyHash([u8; 20]),
    /// `OP_0 <32-byte sha256(witness script)>`
    WitnessV0ScriptHash([u8; 32]),
    /// Any other witness version or program length.
    WitnessUnknown {
        version: u8,
        program: Vec<u8>,
    },
    /// Provably unspendable `OP_RETURN` output.
    NullData,
    NonStandard,
}

impl ScriptType {
    /// Classify a locking script.
    ///
    /// Witness programs are checked before the legacy templates, so an
    /// `OP_0 <20 bytes>` script is never mistaken for anything else.
    pub fn classify(script: &Script) -> ScriptType {
        let b = script.to_bytes();

        if let Some((version, program)) = script.witness_program() {
            return match (version, program.len()) {
                (0, 20) => ScriptType::WitnessV0KeyHash(copy_array(program)),
                (0, 32) => ScriptType::WitnessV0ScriptHash(copy_array(program)),
                _ => ScriptType::WitnessUnknown {
                    version,
                    program: program.to_vec(),
                },
            };
        }
        if script.is_p2pkh() {
            return ScriptType::PubKeyHash(copy_array(&b[3..23]));
        }
        if script.is_p2sh() {
            return ScriptType::ScriptHash(copy_array(&b[2..22]));
        }
        if script.is_p2pk() {
            return ScriptType::PubKey(b[1..b.len() - 1].to_vec());
        }
        if let Some((required, pubkeys)) = script.multisig_parts() {
            return ScriptType::Multisig { required, pubkeys };
        }
        if b.first() == Some(&OP_RETURN) {
            return ScriptType::NullData;
        }
        ScriptType::NonStandard
    }

    /// Short name for logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            ScriptType::PubKey(_) => "p2pk",
            ScriptType::PubKeyHash(_) => "p2pkh",
            ScriptType::ScriptHash(_) => "p2sh",
            ScriptType::Multisig { .. } => "multisig",
            ScriptType::WitnessV0KeyHash(_) => "p2wpkh",
            ScriptType::WitnessV0ScriptHash(_) => "p2wsh",
            ScriptType::WitnessUnknown { .. } => "witness_unknown",
            ScriptType::NullData => "nulldata",
            ScriptType::NonStandard => "nonstandard",
        }
    }
}

impl std::fmt::Display for ScriptType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn copy_array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    out
}
