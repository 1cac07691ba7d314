//! Signature hash computation for transaction signing.
//!
//! Computes the digest that ECDSA signs to authorize spending an input.
//! Two algorithms are supported: the original (legacy) algorithm, which
//! re-serializes a modified copy of the transaction, and the segwit v0
//! algorithm from BIP143, which commits to the amount being spent and
//! reuses per-transaction sub-hashes held in a [`SighashCache`].
//!
//! The hash function is a parameter: Bitcoin hashes with double SHA-256,
//! other chains may pick a different transaction hash.
//!
//! See <https://github.com/bitcoin/bips/blob/master/bip-0143.mediawiki>

use utxo_primitives::util::{ByteWriter, VarInt};
use utxo_script::Script;

use crate::transaction::Transaction;
use crate::TransactionError;

// -----------------------------------------------------------------------
// Sighash flag constants
// -----------------------------------------------------------------------

/// Sign all inputs and all outputs (the default).
pub const SIGHASH_ALL: u32 = 0x01;

/// Sign all inputs but no outputs, allowing outputs to be modified.
pub const SIGHASH_NONE: u32 = 0x02;

/// Sign all inputs and only the output with the same index as the signed input.
pub const SIGHASH_SINGLE: u32 = 0x03;

/// Combined with another flag: only sign the current input, allowing other
/// inputs to be added later.
pub const SIGHASH_ANYONECANPAY: u32 = 0x80;

/// Mask applied to extract the base sighash type (ALL, NONE, SINGLE).
pub const SIGHASH_MASK: u32 = 0x1f;

/// Digest signed by a legacy SIGHASH_SINGLE input that has no matching
/// output: the integer one, little-endian.
pub const SIGHASH_SINGLE_BUG: [u8; 32] = {
    let mut one = [0u8; 32];
    one[0] = 1;
    one
};

/// Hash function used for sub-hashes and the final digest.
pub type HashFn = fn(&[u8]) -> [u8; 32];

/// Which signature hash algorithm an input is signed under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SigVersion {
    /// Legacy and P2SH spends.
    Base,
    /// Native and nested segwit v0 spends (BIP143).
    WitnessV0,
}

fn base_type(sighash_type: u32) -> u32 {
    sighash_type & SIGHASH_MASK
}

fn anyone_can_pay(sighash_type: u32) -> bool {
    sighash_type & SIGHASH_ANYONECANPAY != 0
}

fn check_index(tx: &Transaction, input_index: usize) -> Result<(), TransactionError> {
    if input_index >= tx.inputs.len() {
        return Err(TransactionError::InvalidTransaction(format!(
            "input index {} out of range (tx has {} inputs)",
            input_index,
            tx.inputs.len()
        )));
    }
    Ok(())
}

// -----------------------------------------------------------------------
// Dispatch
// -----------------------------------------------------------------------

/// Compute the signature hash of one input under `sig_version`.
///
/// # Arguments
/// * `tx`           - The transaction being signed.
/// * `input_index`  - Index of the input being signed.
/// * `script_code`  - The script committed to for this input.
/// * `amount`       - Value of the output being spent (segwit only).
/// * `sighash_type` - The combined sighash flags.
/// * `sig_version`  - Legacy or segwit v0.
/// * `cache`        - Sub-hashes of `tx`, built with the same hash function.
#[allow(clippy::too_many_arguments)]
pub fn signature_hash(
    tx: &Transaction,
    input_index: usize,
    script_code: &Script,
    amount: u64,
    sighash_type: u32,
    sig_version: SigVersion,
    cache: &SighashCache,
) -> Result<[u8; 32], TransactionError> {
    match sig_version {
        SigVersion::Base => {
            legacy_signature_hash(tx, input_index, script_code, sighash_type, cache.hasher)
        }
        SigVersion::WitnessV0 => {
            witness_v0_signature_hash(tx, input_index, script_code, amount, sighash_type, cache)
        }
    }
}

// -----------------------------------------------------------------------
// Legacy signature hash
// -----------------------------------------------------------------------

/// Serialize the modified transaction the legacy algorithm hashes.
///
/// Every other input's script is emptied and the signed input carries
/// `script_code` with its OP_CODESEPARATORs removed. NONE drops all
/// outputs, SINGLE keeps outputs up to the input's index with earlier ones
/// nulled, and both zero the other inputs' sequence numbers.
/// ANYONECANPAY keeps only the signed input. The sighash type is appended
/// as a 4-byte little-endian integer.
///
/// # Returns
/// `Ok(None)` for SINGLE when the input has no matching output, in which
/// case the digest is [`SIGHASH_SINGLE_BUG`].
pub fn legacy_preimage(
    tx: &Transaction,
    input_index: usize,
    script_code: &Script,
    sighash_type: u32,
) -> Result<Option<Vec<u8>>, TransactionError> {
    check_index(tx, input_index)?;
    let base = base_type(sighash_type);
    if base == SIGHASH_SINGLE && input_index >= tx.outputs.len() {
        return Ok(None);
    }
    let script_code = script_code.without_code_separators();
    let zero_sequences = base == SIGHASH_NONE || base == SIGHASH_SINGLE;

    let mut w = ByteWriter::with_capacity(tx.stripped_size() + script_code.len() + 4);
    w.write_u32_le(tx.version);

    if anyone_can_pay(sighash_type) {
        let input = &tx.inputs[input_index];
        w.write_varint(VarInt(1));
        input.previous_output.write_to(&mut w);
        w.write_var_bytes(script_code.to_bytes());
        w.write_u32_le(input.sequence);
    } else {
        w.write_varint(VarInt::from(tx.inputs.len()));
        for (i, input) in tx.inputs.iter().enumerate() {
            input.previous_output.write_to(&mut w);
            if i == input_index {
                w.write_var_bytes(script_code.to_bytes());
                w.write_u32_le(input.sequence);
            } else {
                w.write_varint(VarInt(0));
                w.write_u32_le(if zero_sequences { 0 } else { input.sequence });
            }
        }
    }

    match base {
        SIGHASH_NONE => w.write_varint(VarInt(0)),
        SIGHASH_SINGLE => {
            w.write_varint(VarInt::from(input_index + 1));
            for _ in 0..input_index {
                w.write_u64_le(u64::MAX);
                w.write_varint(VarInt(0));
            }
            tx.outputs[input_index].write_to(&mut w);
        }
        _ => {
            w.write_varint(VarInt::from(tx.outputs.len()));
            for output in &tx.outputs {
                output.write_to(&mut w);
            }
        }
    }

    w.write_u32_le(tx.lock_time);
    w.write_u32_le(sighash_type);
    Ok(Some(w.into_bytes()))
}

/// Compute the legacy signature hash for an input.
pub fn legacy_signature_hash(
    tx: &Transaction,
    input_index: usize,
    script_code: &Script,
    sighash_type: u32,
    hasher: HashFn,
) -> Result<[u8; 32], TransactionError> {
    Ok(
        match legacy_preimage(tx, input_index, script_code, sighash_type)? {
            Some(preimage) => hasher(&preimage),
            None => SIGHASH_SINGLE_BUG,
        },
    )
}

// -----------------------------------------------------------------------
// BIP143 (segwit v0) signature hash
// -----------------------------------------------------------------------

/// Per-transaction sub-hashes shared by every segwit input.
///
/// Built once before signing; later changes to the inputs or outputs of
/// the transaction are not reflected.
#[derive(Clone, Debug)]
pub struct SighashCache {
    hasher: HashFn,
    hash_prevouts: [u8; 32],
    hash_sequence: [u8; 32],
    hash_outputs: [u8; 32],
}

impl SighashCache {
    /// Hash the outpoints, sequences and outputs of `tx` with `hasher`.
    pub fn new(tx: &Transaction, hasher: HashFn) -> Self {
        let mut prevouts = ByteWriter::with_capacity(tx.inputs.len() * 36);
        let mut sequences = ByteWriter::with_capacity(tx.inputs.len() * 4);
        for input in &tx.inputs {
            input.previous_output.write_to(&mut prevouts);
            sequences.write_u32_le(input.sequence);
        }
        let mut outputs = ByteWriter::new();
        for output in &tx.outputs {
            output.write_to(&mut outputs);
        }
        SighashCache {
            hasher,
            hash_prevouts: hasher(prevouts.as_bytes()),
            hash_sequence: hasher(sequences.as_bytes()),
            hash_outputs: hasher(outputs.as_bytes()),
        }
    }

    pub fn hasher(&self) -> HashFn {
        self.hasher
    }

    /// Hash of all outpoints.
    pub fn hash_prevouts(&self) -> &[u8; 32] {
        &self.hash_prevouts
    }

    /// Hash of all input sequence numbers.
    pub fn hash_sequence(&self) -> &[u8; 32] {
        &self.hash_sequence
    }

    /// Hash of all outputs.
    pub fn hash_outputs(&self) -> &[u8; 32] {
        &self.hash_outputs
    }
}

/// Build the BIP143 preimage for an input.
///
/// The preimage consists of:
/// 1. nVersion (4 bytes LE)
/// 2. hashPrevouts (32 bytes, zero with ANYONECANPAY)
/// 3. hashSequence (32 bytes, zero with ANYONECANPAY, NONE or SINGLE)
/// 4. outpoint (32-byte txid + 4-byte index)
/// 5. scriptCode (VarInt-prefixed)
/// 6. amount (8 bytes LE)
/// 7. nSequence (4 bytes LE)
/// 8. hashOutputs (32 bytes; the matching output only for SINGLE, zero for
///    NONE or SINGLE without a matching output)
/// 9. nLockTime (4 bytes LE)
/// 10. sighash type (4 bytes LE)
pub fn witness_v0_preimage(
    tx: &Transaction,
    input_index: usize,
    script_code: &Script,
    amount: u64,
    sighash_type: u32,
    cache: &SighashCache,
) -> Result<Vec<u8>, TransactionError> {
    check_index(tx, input_index)?;
    let base = base_type(sighash_type);
    let anyone = anyone_can_pay(sighash_type);
    let zero = [0u8; 32];

    let hash_prevouts = if anyone { zero } else { cache.hash_prevouts };
    let hash_sequence = if anyone || base == SIGHASH_SINGLE || base == SIGHASH_NONE {
        zero
    } else {
        cache.hash_sequence
    };
    let hash_outputs = if base != SIGHASH_SINGLE && base != SIGHASH_NONE {
        cache.hash_outputs
    } else if base == SIGHASH_SINGLE && input_index < tx.outputs.len() {
        let mut w = ByteWriter::new();
        tx.outputs[input_index].write_to(&mut w);
        (cache.hasher)(w.as_bytes())
    } else {
        zero
    };

    let input = &tx.inputs[input_index];
    let mut w = ByteWriter::with_capacity(156 + script_code.len());
    w.write_u32_le(tx.version);
    w.write_bytes(&hash_prevouts);
    w.write_bytes(&hash_sequence);
    input.previous_output.write_to(&mut w);
    w.write_var_bytes(script_code.to_bytes());
    w.write_u64_le(amount);
    w.write_u32_le(input.sequence);
    w.write_bytes(&hash_outputs);
    w.write_u32_le(tx.lock_time);
    w.write_u32_le(sighash_type);
    Ok(w.into_bytes())
}

/// Compute the BIP143 signature hash for an input.
pub fn witness_v0_signature_hash(
    tx: &Transaction,
    input_index: usize,
    script_code: &Script,
    amount: u64,
    sighash_type: u32,
    cache: &SighashCache,
) -> Result<[u8; 32], TransactionError> {
    let preimage = witness_v0_preimage(tx, input_index, script_code, amount, sighash_type, cache)?;
    Ok((cache.hasher)(&preimage))
}
