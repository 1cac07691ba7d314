//! Core transaction type.
//!
//! Represents a complete transaction with version, inputs, outputs, and lock
//! time. Supports the legacy and segwit (BIP144) wire forms, size and weight
//! accounting, and the Bitcoin transaction id. Chain-specific identifiers
//! are computed through [`TransactionFormat`](crate::format::TransactionFormat).

use serde::{Deserialize, Serialize};
use utxo_primitives::chainhash::Hash;
use utxo_primitives::hash::sha256d;
use utxo_primitives::util::{ByteReader, ByteWriter, VarInt};
use utxo_script::Witness;

use crate::input::TransactionInput;
use crate::output::TransactionOutput;
use crate::TransactionError;

/// Segwit marker byte, written where the input count would be.
pub const SEGWIT_MARKER: u8 = 0x00;

/// Segwit flag byte following the marker.
pub const SEGWIT_FLAG: u8 = 0x01;

/// Weight units per virtual byte.
pub const WITNESS_SCALE_FACTOR: usize = 4;

/// A transaction consisting of a version, a set of inputs, a set of
/// outputs, and a lock time.
///
/// # Wire format
///
/// | Field        | Size                              |
/// |--------------|-----------------------------------|
/// | version      | 4 bytes (LE)                      |
/// | marker, flag | `00 01`, witness form only        |
/// | input count  | VarInt                            |
/// | inputs       | variable (per input)              |
/// | output count | VarInt                            |
/// | outputs      | variable (per output)             |
/// | witnesses    | one stack per input, witness form |
/// | lock_time    | 4 bytes (LE)                      |
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub version: u32,

    /// Ordered list of transaction inputs.
    pub inputs: Vec<TransactionInput>,

    /// Ordered list of transaction outputs.
    pub outputs: Vec<TransactionOutput>,

    /// Lock time. If non-zero, the transaction is not valid until the
    /// specified block height or Unix timestamp.
    pub lock_time: u32,
}

impl Transaction {
    /// Create a new empty transaction with the given version and lock time 0.
    pub fn new(version: u32) -> Self {
        Transaction {
            version,
            inputs: Vec::new(),
            outputs: Vec::new(),
            lock_time: 0,
        }
    }

    // -----------------------------------------------------------------
    // Deserialization
    // -----------------------------------------------------------------

    /// Parse a transaction from a hex-encoded string.
    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str).map_err(|e| {
            TransactionError::SerializationError(format!("invalid hex: {}", e))
        })?;
        Self::from_bytes(&bytes)
    }

    /// Parse a transaction from raw bytes in either wire form.
    ///
    /// The slice must contain exactly one complete transaction with no
    /// trailing data.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut reader = ByteReader::new(bytes);
        let tx = Self::read_from(&mut reader)?;
        if reader.remaining() != 0 {
            return Err(TransactionError::SerializationError(format!(
                "trailing {} bytes after transaction",
                reader.remaining()
            )));
        }
        Ok(tx)
    }

    /// Deserialize a transaction from a `ByteReader`.
    ///
    /// A zero byte where the input count belongs is read as the segwit
    /// marker. Empty witness stacks decode as no witness; a witness-form
    /// transaction where every stack is empty is rejected, since it would
    /// not re-encode to the same bytes.
    ///
    /// # Returns
    /// `Ok(Transaction)` on success, or a `SerializationError` on truncated
    /// or malformed data.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, TransactionError> {
        let version = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading version: {}", e))
        })?;

        let segwit = reader.peek_u8() == Some(SEGWIT_MARKER);
        if segwit {
            let marker_flag = reader.read_array::<2>().map_err(|e| {
                TransactionError::SerializationError(format!("reading segwit flag: {}", e))
            })?;
            if marker_flag[1] != SEGWIT_FLAG {
                return Err(TransactionError::SerializationError(format!(
                    "unknown segwit flag 0x{:02x}",
                    marker_flag[1]
                )));
            }
        }

        let input_count = read_count(reader, "input count")?;
        let mut inputs = Vec::with_capacity(input_count);
        for _ in 0..input_count {
            inputs.push(TransactionInput::read_from(reader)?);
        }

        let output_count = read_count(reader, "output count")?;
        let mut outputs = Vec::with_capacity(output_count);
        for _ in 0..output_count {
            outputs.push(TransactionOutput::read_from(reader)?);
        }

        if segwit {
            for input in inputs.iter_mut() {
                let witness = Witness::read_from(reader)?;
                input.witness = (!witness.is_empty()).then_some(witness);
            }
            if !inputs.iter().any(TransactionInput::has_witness) {
                return Err(TransactionError::SerializationError(
                    "witness flag set but no input has witness data".to_string(),
                ));
            }
        }

        let lock_time = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading lock time: {}", e))
        })?;

        Ok(Transaction {
            version,
            inputs,
            outputs,
            lock_time,
        })
    }

    // -----------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------

    /// Serialize this transaction.
    ///
    /// The witness form is produced only when `include_witness` is set and
    /// at least one input carries a non-empty witness; otherwise the legacy
    /// form is returned. Inputs without a witness write an empty stack.
    pub fn encode(&self, include_witness: bool) -> Vec<u8> {
        let segwit = include_witness && self.has_witness();
        let mut writer = ByteWriter::with_capacity(256);
        writer.write_u32_le(self.version);
        if segwit {
            writer.write_u8(SEGWIT_MARKER);
            writer.write_u8(SEGWIT_FLAG);
        }

        writer.write_varint(VarInt::from(self.inputs.len()));
        for input in &self.inputs {
            input.write_to(&mut writer);
        }

        writer.write_varint(VarInt::from(self.outputs.len()));
        for output in &self.outputs {
            output.write_to(&mut writer);
        }

        if segwit {
            for input in &self.inputs {
                match &input.witness {
                    Some(witness) => witness.write_to(&mut writer),
                    None => writer.write_varint(VarInt(0)),
                }
            }
        }

        writer.write_u32_le(self.lock_time);
        writer.into_bytes()
    }

    /// Serialize with witness data when present.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.encode(true)
    }

    /// Hex of [`Transaction::to_bytes`].
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// True when any input carries a non-empty witness stack.
    pub fn has_witness(&self) -> bool {
        self.inputs.iter().any(TransactionInput::has_witness)
    }

    // -----------------------------------------------------------------
    // Size accounting
    // -----------------------------------------------------------------

    /// Length of the legacy (witness-stripped) encoding.
    pub fn stripped_size(&self) -> usize {
        let ins: usize = self.inputs.iter().map(TransactionInput::serialized_size).sum();
        let outs: usize = self.outputs.iter().map(TransactionOutput::serialized_size).sum();
        4 + VarInt::from(self.inputs.len()).length()
            + ins
            + VarInt::from(self.outputs.len()).length()
            + outs
            + 4
    }

    /// Bytes the witness form adds over the stripped form: marker, flag and
    /// one stack per input. Zero when no input has witness data.
    pub fn witness_size(&self) -> usize {
        if !self.has_witness() {
            return 0;
        }
        2 + self
            .inputs
            .iter()
            .map(|input| input.witness.as_ref().map_or(1, Witness::serialized_size))
            .sum::<usize>()
    }

    /// Transaction weight: `4 × stripped + witness`.
    pub fn weight(&self) -> usize {
        WITNESS_SCALE_FACTOR * self.stripped_size() + self.witness_size()
    }

    /// Virtual size: weight divided by four, rounded up.
    pub fn vsize(&self) -> usize {
        self.weight().div_ceil(WITNESS_SCALE_FACTOR)
    }

    // -----------------------------------------------------------------
    // Transaction ID
    // -----------------------------------------------------------------

    /// Bitcoin transaction id: double SHA-256 of the legacy encoding.
    ///
    /// The hash is in internal byte order; its `Display` form is reversed.
    pub fn tx_id(&self) -> Hash {
        Hash::new(sha256d(&self.encode(false)))
    }
}

fn read_count(reader: &mut ByteReader<'_>, what: &str) -> Result<usize, TransactionError> {
    let count = reader
        .read_varint()
        .map_err(|e| TransactionError::SerializationError(format!("reading {}: {}", what, e)))?
        .value();
    // Inputs and outputs are at least 9 bytes each; reject counts the
    // remaining data cannot hold before allocating for them.
    if count > reader.remaining() as u64 {
        return Err(TransactionError::SerializationError(format!(
            "{} {} exceeds remaining {} bytes",
            what,
            count,
            reader.remaining()
        )));
    }
    Ok(count as usize)
}

impl std::fmt::Display for Transaction {
    /// Formats the transaction as its hex encoding, witness included.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
