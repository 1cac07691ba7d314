//! Script chunk parsing and encoding.
//!
//! A script chunk is either an opcode or a data push with its associated bytes.
//! This module handles decoding raw script bytes into structured chunks and
//! choosing the minimal OP_PUSHDATA prefix for a payload.

use crate::opcodes::*;
use crate::ScriptError;

/// A single parsed element of a Bitcoin script.
///
/// Each chunk is either a standalone opcode (like OP_DUP) or a data push
/// that carries the opcode byte and the pushed data bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptChunk {
    /// The opcode byte. For direct pushes (1-75 bytes), this is the length.
    pub op: u8,
    /// The data payload, if this chunk is a push operation.
    pub data: Option<Vec<u8>>,
}

impl ScriptChunk {
    /// The pushed bytes, if this chunk is a push of at least one byte.
    pub fn push_data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }
}

/// Read one chunk starting at `pos`.
///
/// # Returns
/// The chunk and the position just past it, or `DataTooSmall` if a push
/// runs past the end of `bytes`.
pub(crate) fn read_chunk(bytes: &[u8], pos: usize) -> Result<(ScriptChunk, usize), ScriptError> {
    let op = bytes[pos];
    let (header, length) = match op {
        0x01..=OP_DATA_75 => (1, op as usize),
        OP_PUSHDATA1 => {
            let len = bytes.get(pos + 1).ok_or(ScriptError::DataTooSmall)?;
            (2, *len as usize)
        }
        OP_PUSHDATA2 => {
            let len = bytes.get(pos + 1..pos + 3).ok_or(ScriptError::DataTooSmall)?;
            (3, u16::from_le_bytes([len[0], len[1]]) as usize)
        }
        OP_PUSHDATA4 => {
            let len = bytes.get(pos + 1..pos + 5).ok_or(ScriptError::DataTooSmall)?;
            (5, u32::from_le_bytes([len[0], len[1], len[2], len[3]]) as usize)
        }
        _ => return Ok((ScriptChunk { op, data: None }, pos + 1)),
    };

    let start = pos + header;
    let data = bytes
        .get(start..start + length)
        .ok_or(ScriptError::DataTooSmall)?
        .to_vec();
    Ok((ScriptChunk { op, data: Some(data) }, start + length))
}

/// Decode raw script bytes into a vector of `ScriptChunk` values.
///
/// Handles OP_DATA_1..OP_DATA_75 (direct push) and OP_PUSHDATA1/2/4
/// (extended push); every other byte is a bare opcode.
///
/// # Arguments
/// * `bytes` - The raw script bytes to decode.
///
/// # Returns
/// A vector of parsed chunks, or a `ScriptError` if the data is truncated.
pub fn decode_script(bytes: &[u8]) -> Result<Vec<ScriptChunk>, ScriptError> {
    let mut chunks = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        let (chunk, next) = read_chunk(bytes, pos)?;
        chunks.push(chunk);
        pos = next;
    }
    Ok(chunks)
}

/// Compute the OP_PUSHDATA prefix bytes for a data payload of the given length.
///
/// # Arguments
/// * `data_len` - The length of the data to be pushed.
///
/// # Returns
/// The minimal prefix for the push, or `DataTooBig` beyond 4 GiB.
pub fn push_data_prefix(data_len: usize) -> Result<Vec<u8>, ScriptError> {
    if data_len <= OP_DATA_75 as usize {
        Ok(vec![data_len as u8])
    } else if data_len <= 0xFF {
        Ok(vec![OP_PUSHDATA1, data_len as u8])
    } else if data_len <= 0xFFFF {
        let mut buf = vec![OP_PUSHDATA2];
        buf.extend_from_slice(&(data_len as u16).to_le_bytes());
        Ok(buf)
    } else if data_len <= 0xFFFF_FFFF {
        let mut buf = vec![OP_PUSHDATA4];
        buf.extend_from_slice(&(data_len as u32).to_le_bytes());
        Ok(buf)
    } else {
        Err(ScriptError::DataTooBig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_script_simple() {
        let bytes = hex::decode("05000102030401ff02abcd").unwrap();
        let parts = decode_script(&bytes).unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].push_data(), Some(&[0xff][..]));
    }

    #[test]
    fn test_decode_script_empty() {
        assert!(decode_script(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_decode_multisig() {
        // OP_1 <33-byte key> <33-byte key> OP_2 OP_CHECKMULTISIG
        let script_hex = "5121025476c2e83188368da1ff3e292e7acafcdb3566bb0ad253f62fc70f07aeee6357\
                          2103c9f4836b9a4f77fc0d81f7bcb01b7f1b35916864b9476c241ce9fc198bd2543252ae";
        let parts = decode_script(&hex::decode(script_hex).unwrap()).unwrap();
        assert_eq!(parts.len(), 5);
        assert_eq!(parts[0].op, OP_1);
        assert_eq!(parts[1].push_data().map(|d| d.len()), Some(33));
        assert_eq!(parts[4].op, OP_CHECKMULTISIG);
    }

    #[test]
    fn test_op_return_payload_is_parsed_as_pushes() {
        let parts = decode_script(&hex::decode("6a0568656c6c6f").unwrap()).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].op, OP_RETURN);
        assert_eq!(parts[1].push_data(), Some(&b"hello"[..]));
    }

    #[test]
    fn test_truncated_pushes() {
        // 0x05 says "push 5 bytes" but only 3 bytes follow
        assert!(matches!(
            decode_script(&hex::decode("05000000").unwrap()),
            Err(ScriptError::DataTooSmall)
        ));
        assert!(decode_script(&hex::decode("4c05000000").unwrap()).is_err());
        assert!(decode_script(&[OP_PUSHDATA1]).is_err());
        assert!(decode_script(&[OP_PUSHDATA2, 0x01]).is_err());
        assert!(decode_script(&[OP_PUSHDATA4, 0x01, 0x00, 0x00]).is_err());
    }

    #[test]
    fn test_pushdata_forms() {
        let data = vec![0x42u8; 300];
        let mut script = push_data_prefix(data.len()).unwrap();
        script.extend_from_slice(&data);
        let parts = decode_script(&script).unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].op, OP_PUSHDATA2);
        assert_eq!(parts[0].push_data(), Some(&data[..]));
    }

    #[test]
    fn test_push_data_prefix_boundaries() {
        assert_eq!(push_data_prefix(0).unwrap(), vec![OP_0]);
        assert_eq!(push_data_prefix(20).unwrap(), vec![20u8]);
        assert_eq!(push_data_prefix(75).unwrap(), vec![75u8]);
        assert_eq!(push_data_prefix(76).unwrap(), vec![OP_PUSHDATA1, 76]);
        assert_eq!(push_data_prefix(255).unwrap(), vec![OP_PUSHDATA1, 255]);
        assert_eq!(push_data_prefix(256).unwrap(), vec![OP_PUSHDATA2, 0x00, 0x01]);
        assert_eq!(push_data_prefix(65535).unwrap(), vec![OP_PUSHDATA2, 0xff, 0xff]);
        assert_eq!(push_data_prefix(65536).unwrap(), vec![OP_PUSHDATA4, 0x00, 0x00, 0x01, 0x00]);
    }
}
