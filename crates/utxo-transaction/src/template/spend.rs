//! Spend path resolution and unlocking data assembly.

use utxo_primitives::util::VarInt;
use utxo_script::{Script, ScriptType, Witness};

use super::{ScriptLookup, Signable, Unlocking};
use crate::input::OutPoint;
use crate::sighash::SigVersion;
use crate::TemplateError;

/// How a locking script is satisfied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpendPath {
    /// P2PK, P2PKH or bare multisig, signed directly.
    Bare,
    /// Legacy P2SH around a key script.
    P2sh,
    /// Native segwit v0 key hash.
    P2wpkh,
    /// P2WPKH program wrapped in P2SH.
    P2shP2wpkh,
    /// Native segwit v0 script hash around a key script.
    P2wsh,
    /// P2WSH program wrapped in P2SH.
    P2shP2wsh,
}

impl SpendPath {
    pub fn is_witness(&self) -> bool {
        !matches!(self, SpendPath::Bare | SpendPath::P2sh)
    }

    pub fn sig_version(&self) -> SigVersion {
        if self.is_witness() {
            SigVersion::WitnessV0
        } else {
            SigVersion::Base
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SpendPath::Bare => "bare",
            SpendPath::P2sh => "p2sh",
            SpendPath::P2wpkh => "p2wpkh",
            SpendPath::P2shP2wpkh => "p2sh-p2wpkh",
            SpendPath::P2wsh => "p2wsh",
            SpendPath::P2shP2wsh => "p2sh-p2wsh",
        }
    }
}

/// Serialized size of one input, split the way weight is counted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSize {
    /// Outpoint, unlocking script with its length prefix, and sequence.
    pub stripped: usize,
    /// Witness stack bytes; zero for legacy spends.
    pub witness: usize,
}

/// A resolved spend of one locking script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Spend {
    pub path: SpendPath,
    /// The key script the signatures satisfy.
    pub signable: Signable,
    /// Script committed to by the signature hash.
    pub script_code: Script,
    /// Pushed at the end of the unlocking script (P2SH paths).
    pub redeem_script: Option<Script>,
    /// Pushed at the top of the witness (P2WSH paths).
    pub witness_script: Option<Script>,
}

impl Spend {
    /// Resolve the spend of `locking_script` using the standard classifier.
    pub fn resolve<L>(locking_script: &Script, lookup: &L) -> Result<Self, TemplateError>
    where
        L: ScriptLookup + ?Sized,
    {
        Self::resolve_with(locking_script, lookup, ScriptType::classify)
    }

    /// Resolve the spend of `locking_script`.
    ///
    /// Nested P2SH, unknown witness versions, null-data and non-standard
    /// scripts are rejected, as are redeem or witness scripts that are not
    /// key scripts.
    ///
    /// # Returns
    /// The spend, `UnsupportedScriptType`, or `MissingKeyMaterial` when a
    /// committed redeem or witness script is not available from `lookup`.
    pub fn resolve_with<L, C>(
        locking_script: &Script,
        lookup: &L,
        classify: C,
    ) -> Result<Self, TemplateError>
    where
        L: ScriptLookup + ?Sized,
        C: Fn(&Script) -> ScriptType,
    {
        let script_type = classify(locking_script);
        match &script_type {
            ScriptType::PubKey(_) | ScriptType::PubKeyHash(_) | ScriptType::Multisig { .. } => {
                Ok(Spend {
                    path: SpendPath::Bare,
                    signable: signable(&script_type)?,
                    script_code: locking_script.clone(),
                    redeem_script: None,
                    witness_script: None,
                })
            }
            ScriptType::WitnessV0KeyHash(hash) => Ok(Spend {
                path: SpendPath::P2wpkh,
                signable: Signable::PubKeyHash(*hash),
                script_code: Script::p2pkh(hash),
                redeem_script: None,
                witness_script: None,
            }),
            ScriptType::WitnessV0ScriptHash(hash) => {
                let witness_script = find_witness_script(lookup, hash)?;
                Ok(Spend {
                    path: SpendPath::P2wsh,
                    signable: signable(&classify(&witness_script))?,
                    script_code: witness_script.clone(),
                    redeem_script: None,
                    witness_script: Some(witness_script),
                })
            }
            ScriptType::ScriptHash(hash) => {
                let redeem_script = lookup
                    .script_by_hash160(hash)
                    .cloned()
                    .ok_or_else(|| {
                        TemplateError::MissingKeyMaterial(format!(
                            "redeem script for hash {} not supplied",
                            hex::encode(hash)
                        ))
                    })?;
                Self::resolve_redeem(redeem_script, lookup, &classify)
            }
            other => Err(TemplateError::UnsupportedScriptType(other.name().to_string())),
        }
    }

    fn resolve_redeem<L, C>(
        redeem_script: Script,
        lookup: &L,
        classify: &C,
    ) -> Result<Self, TemplateError>
    where
        L: ScriptLookup + ?Sized,
        C: Fn(&Script) -> ScriptType,
    {
        let inner = classify(&redeem_script);
        match &inner {
            ScriptType::WitnessV0KeyHash(hash) => Ok(Spend {
                path: SpendPath::P2shP2wpkh,
                signable: Signable::PubKeyHash(*hash),
                script_code: Script::p2pkh(hash),
                redeem_script: Some(redeem_script),
                witness_script: None,
            }),
            ScriptType::WitnessV0ScriptHash(hash) => {
                let witness_script = find_witness_script(lookup, hash)?;
                Ok(Spend {
                    path: SpendPath::P2shP2wsh,
                    signable: signable(&classify(&witness_script))?,
                    script_code: witness_script.clone(),
                    redeem_script: Some(redeem_script),
                    witness_script: Some(witness_script),
                })
            }
            ScriptType::ScriptHash(_) => Err(TemplateError::UnsupportedScriptType(
                "nested p2sh".to_string(),
            )),
            _ => Ok(Spend {
                path: SpendPath::P2sh,
                signable: signable(&inner)?,
                script_code: redeem_script.clone(),
                redeem_script: Some(redeem_script),
                witness_script: None,
            }),
        }
    }

    pub fn sig_version(&self) -> SigVersion {
        self.path.sig_version()
    }

    pub fn is_witness(&self) -> bool {
        self.path.is_witness()
    }

    /// Build the unlocking data from the signature stack.
    ///
    /// `items` is the stack the key script consumes: `[sig]` for P2PK,
    /// `[sig, pubkey]` for P2PKH and `[<empty>, sig...]` for multisig.
    pub fn build(&self, items: Vec<Vec<u8>>) -> Result<Unlocking, TemplateError> {
        self.signable.check_items(&items)?;

        if !self.is_witness() {
            let mut script_sig = Script::new();
            for item in &items {
                script_sig.append_push_data(item)?;
            }
            if let Some(redeem) = &self.redeem_script {
                script_sig.append_push_data(redeem.to_bytes())?;
            }
            return Ok(Unlocking { script_sig, witness: None });
        }

        let mut script_sig = Script::new();
        if let Some(redeem) = &self.redeem_script {
            script_sig.append_push_data(redeem.to_bytes())?;
        }
        let mut witness = Witness::from_items(items);
        if let Some(witness_script) = &self.witness_script {
            witness.push(witness_script.to_bytes());
        }
        Ok(Unlocking { script_sig, witness: Some(witness) })
    }

    /// Largest size the signed input can have.
    ///
    /// Uses 72-byte signatures and 33-byte public keys, which bound every
    /// low-S signature and compressed key the signer produces.
    pub fn estimated_size(&self) -> Result<InputSize, TemplateError> {
        let unlocking = self.build(self.signable.placeholder_items())?;
        let script_len = unlocking.script_sig.len();
        Ok(InputSize {
            stripped: OutPoint::SIZE + VarInt::from(script_len).length() + script_len + 4,
            witness: unlocking.witness.as_ref().map_or(0, Witness::serialized_size),
        })
    }
}

fn signable(script_type: &ScriptType) -> Result<Signable, TemplateError> {
    Signable::from_script_type(script_type)
        .ok_or_else(|| TemplateError::UnsupportedScriptType(script_type.name().to_string()))
}

fn find_witness_script<L>(lookup: &L, hash: &[u8; 32]) -> Result<Script, TemplateError>
where
    L: ScriptLookup + ?Sized,
{
    lookup.script_by_sha256(hash).cloned().ok_or_else(|| {
        TemplateError::MissingKeyMaterial(format!(
            "witness script for hash {} not supplied",
            hex::encode(hash)
        ))
    })
}
