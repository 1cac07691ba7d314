//! Transaction input referencing a previous output.
//!
//! Contains the outpoint being spent, the unlocking script, sequence number,
//! the optional witness stack and an optional copy of the output being
//! spent (needed for signing). Provides binary serialization following the
//! Bitcoin wire format; the witness is written separately by the transaction.

use std::fmt;

use serde::{Deserialize, Serialize};
use utxo_primitives::chainhash::Hash;
use utxo_primitives::util::{ByteReader, ByteWriter, VarInt};
use utxo_script::{Script, Witness};

use crate::output::TransactionOutput;
use crate::TransactionError;

/// Default sequence number indicating a finalized input (no relative lock-time).
pub const DEFAULT_SEQUENCE_NUMBER: u32 = 0xFFFF_FFFF;

/// Reference to a specific output of a previous transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    /// Transaction id, internal byte order.
    pub txid: Hash,
    /// Output index within that transaction.
    pub vout: u32,
}

impl OutPoint {
    pub fn new(txid: Hash, vout: u32) -> Self {
        OutPoint { txid, vout }
    }

    /// Serialized size of an outpoint.
    pub const SIZE: usize = 36;

    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, TransactionError> {
        let txid = reader.read_array::<32>().map_err(|e| {
            TransactionError::SerializationError(format!("reading source txid: {}", e))
        })?;
        let vout = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading output index: {}", e))
        })?;
        Ok(OutPoint { txid: Hash::new(txid), vout })
    }

    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_bytes(self.txid.as_bytes());
        writer.write_u32_le(self.vout);
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.vout)
    }
}

/// A single input in a transaction.
///
/// `witness` distinguishes an absent witness (`None`) from an empty stack.
/// Only inputs with a non-empty stack make the transaction encode in the
/// segwit form.
///
/// # Wire format (non-witness part)
///
/// | Field            | Size          |
/// |------------------|---------------|
/// | txid             | 32 bytes (LE) |
/// | vout             | 4 bytes (LE)  |
/// | script length    | VarInt        |
/// | unlocking_script | variable      |
/// | sequence         | 4 bytes (LE)  |
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub previous_output: OutPoint,

    /// The unlocking script (scriptSig). Empty until signed, and for native
    /// segwit spends.
    pub unlocking_script: Script,

    /// Sequence number. Defaults to `0xFFFFFFFF` (finalized).
    pub sequence: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub witness: Option<Witness>,

    /// The output being spent. Not part of the wire format; the signer reads
    /// the locking script and amount from here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_output: Option<TransactionOutput>,
}

impl TransactionInput {
    /// Create an unsigned input spending `previous_output`.
    pub fn new(previous_output: OutPoint, sequence: u32) -> Self {
        TransactionInput {
            previous_output,
            unlocking_script: Script::new(),
            sequence,
            witness: None,
            source_output: None,
        }
    }

    /// Attach the output this input spends.
    pub fn with_source_output(mut self, output: TransactionOutput) -> Self {
        self.source_output = Some(output);
        self
    }

    /// True when the input carries a non-empty witness stack.
    pub fn has_witness(&self) -> bool {
        self.witness.as_ref().is_some_and(|w| !w.is_empty())
    }

    /// Deserialize the non-witness part of an input from a `ByteReader`.
    ///
    /// # Returns
    /// `Ok(TransactionInput)` with no witness, or a `SerializationError`
    /// if the data is truncated.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, TransactionError> {
        let previous_output = OutPoint::read_from(reader)?;
        let script = reader.read_var_bytes().map_err(|e| {
            TransactionError::SerializationError(format!("reading unlocking script: {}", e))
        })?;
        let sequence = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading sequence number: {}", e))
        })?;
        Ok(TransactionInput {
            previous_output,
            unlocking_script: Script::from_bytes(script),
            sequence,
            witness: None,
            source_output: None,
        })
    }

    /// Append the non-witness encoding of this input to `writer`.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        self.previous_output.write_to(writer);
        writer.write_var_bytes(self.unlocking_script.to_bytes());
        writer.write_u32_le(self.sequence);
    }

    /// Byte length of the non-witness encoding.
    pub fn serialized_size(&self) -> usize {
        let len = self.unlocking_script.len();
        OutPoint::SIZE + VarInt::from(len).length() + len + 4
    }
}
