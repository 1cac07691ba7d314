//! Transaction output: an amount locked to a script.

use serde::{Deserialize, Serialize};
use utxo_primitives::util::{ByteReader, ByteWriter, VarInt};
use utxo_script::Script;

use crate::TransactionError;

/// A single output in a transaction.
///
/// # Wire format
///
/// | Field          | Size          |
/// |----------------|---------------|
/// | amount         | 8 bytes (LE)  |
/// | script length  | VarInt        |
/// | locking_script | variable      |
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutput {
    /// Value in the chain's smallest unit.
    pub amount: u64,
    /// The script a spender must satisfy.
    pub locking_script: Script,
}

impl TransactionOutput {
    pub fn new(amount: u64, locking_script: Script) -> Self {
        TransactionOutput { amount, locking_script }
    }

    /// Deserialize an output from a `ByteReader`.
    ///
    /// # Returns
    /// The decoded output, or a `SerializationError` if the data is truncated.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, TransactionError> {
        let amount = reader.read_u64_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading amount: {}", e))
        })?;
        let script = reader.read_var_bytes().map_err(|e| {
            TransactionError::SerializationError(format!("reading locking script: {}", e))
        })?;
        Ok(TransactionOutput {
            amount,
            locking_script: Script::from_bytes(script),
        })
    }

    /// Append the wire encoding of this output to `writer`.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_u64_le(self.amount);
        writer.write_var_bytes(self.locking_script.to_bytes());
    }

    /// Byte length of the wire encoding: `8 + varint(len) + len`.
    pub fn serialized_size(&self) -> usize {
        let len = self.locking_script.len();
        8 + VarInt::from(len).length() + len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_wire_format() {
        let script = Script::from_hex("76a9141d0f172a0ecb48aee1be1f2687d2963ae33f71a188ac").unwrap();
        let output = TransactionOutput::new(50_000, script);
        let mut writer = ByteWriter::new();
        output.write_to(&mut writer);
        let bytes = writer.into_bytes();
        assert_eq!(
            hex::encode(&bytes),
            "50c3000000000000\
             1976a9141d0f172a0ecb48aee1be1f2687d2963ae33f71a188ac"
        );
        assert_eq!(bytes.len(), output.serialized_size());
        assert_eq!(output.serialized_size(), 34);

        let mut reader = ByteReader::new(&bytes);
        assert_eq!(TransactionOutput::read_from(&mut reader).unwrap(), output);
    }

    #[test]
    fn test_output_truncated() {
        let mut reader = ByteReader::new(&[0x01, 0x00, 0x00]);
        assert!(matches!(
            TransactionOutput::read_from(&mut reader),
            Err(TransactionError::SerializationError(_))
        ));
        // amount present, script length says 5 but only 1 byte follows
        let mut reader = ByteReader::new(&[0, 0, 0, 0, 0, 0, 0, 0, 0x05, 0xac]);
        assert!(TransactionOutput::read_from(&mut reader).is_err());
    }

    #[test]
    fn test_output_serde() {
        let output = TransactionOutput::new(1_000, Script::from_hex("0014751e76e8199196d454941c45d1b3a323f1433bd6").unwrap());
        let json = serde_json::to_string(&output).unwrap();
        assert_eq!(
            json,
            r#"{"amount":1000,"locking_script":"0014751e76e8199196d454941c45d1b3a323f1433bd6"}"#
        );
        let back: TransactionOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back, output);
    }
}
