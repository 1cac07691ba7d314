//! Segregated witness stack.
//!
//! A witness is the ordered list of byte strings that satisfies a segwit
//! output. On the wire it is a VarInt item count followed by each item with
//! its own VarInt length prefix.

use std::fmt;

use utxo_primitives::util::{ByteReader, ByteWriter, VarInt};

use crate::ScriptError;

/// An ordered witness stack for one input.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Witness(Vec<Vec<u8>>);

impl Witness {
    /// Create an empty witness stack.
    pub fn new() -> Self {
        Witness(Vec::new())
    }

    /// Create a witness from its items, bottom of the stack first.
    pub fn from_items(items: Vec<Vec<u8>>) -> Self {
        Witness(items)
    }

    /// Push an item on top of the stack.
    pub fn push(&mut self, item: impl Into<Vec<u8>>) {
        self.0.push(item.into());
    }

    /// The items, bottom of the stack first.
    pub fn items(&self) -> &[Vec<u8>] {
        &self.0
    }

    /// Number of stack items.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the stack has no items.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Byte length of the wire encoding produced by [`Witness::write_to`].
    pub fn serialized_size(&self) -> usize {
        VarInt::from(self.0.len()).length()
            + self
                .0
                .iter()
                .map(|item| VarInt::from(item.len()).length() + item.len())
                .sum::<usize>()
    }

    /// Append the wire encoding of this stack to `writer`.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_varint(VarInt::from(self.0.len()));
        for item in &self.0 {
            writer.write_var_bytes(item);
        }
    }

    /// Read one witness stack from `reader`.
    ///
    /// # Returns
    /// The decoded stack, or `InvalidWitness` if the data is truncated.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, ScriptError> {
        let count = reader
            .read_varint()
            .map_err(|e| ScriptError::InvalidWitness(e.to_string()))?
            .value();
        // Every item needs at least its length byte.
        if count > reader.remaining() as u64 {
            return Err(ScriptError::InvalidWitness(format!(
                "{} items declared with {} bytes left",
                count,
                reader.remaining()
            )));
        }
        let mut items = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let item = reader
                .read_var_bytes()
                .map_err(|e| ScriptError::InvalidWitness(e.to_string()))?;
            items.push(item.to_vec());
        }
        Ok(Witness(items))
    }
}

impl fmt::Debug for Witness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.0.iter().map(hex::encode))
            .finish()
    }
}

/// Serialize as a list of hex strings.
impl serde::Serialize for Witness {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.0.iter().map(hex::encode))
    }
}

impl<'de> serde::Deserialize<'de> for Witness {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let items = Vec::<String>::deserialize(deserializer)?;
        items
            .iter()
            .map(hex::decode)
            .collect::<Result<Vec<_>, _>>()
            .map(Witness)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_encoding() {
        let witness = Witness::from_items(vec![vec![0x30, 0x44], vec![], vec![0x02; 3]]);
        let mut writer = ByteWriter::new();
        witness.write_to(&mut writer);
        let bytes = writer.into_bytes();
        assert_eq!(hex::encode(&bytes), "030230440003020202");
        assert_eq!(bytes.len(), witness.serialized_size());

        let mut reader = ByteReader::new(&bytes);
        assert_eq!(Witness::read_from(&mut reader).unwrap(), witness);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_empty_stack() {
        let witness = Witness::new();
        assert!(witness.is_empty());
        assert_eq!(witness.serialized_size(), 1);
        let mut writer = ByteWriter::new();
        witness.write_to(&mut writer);
        assert_eq!(writer.into_bytes(), vec![0x00]);
    }

    #[test]
    fn test_truncated_rejected() {
        let mut reader = ByteReader::new(&[0x02, 0x01, 0xaa]);
        assert!(matches!(
            Witness::read_from(&mut reader),
            Err(ScriptError::InvalidWitness(_))
        ));
        let mut reader = ByteReader::new(&[0xfd, 0xff, 0xff]);
        assert!(Witness::read_from(&mut reader).is_err());
    }

    #[test]
    fn test_push_and_serde() {
        let mut witness = Witness::new();
        witness.push(vec![0xde, 0xad]);
        witness.push([0xbe, 0xef].as_slice());
        assert_eq!(witness.len(), 2);

        let json = serde_json::to_string(&witness).unwrap();
        assert_eq!(json, r#"["dead","beef"]"#);
        let back: Witness = serde_json::from_str(&json).unwrap();
        assert_eq!(back, witness);
        assert_eq!(format!("{:?}", witness), r#"["dead", "beef"]"#);
    }
}
