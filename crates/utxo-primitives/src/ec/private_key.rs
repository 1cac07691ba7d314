//! secp256k1 private key with WIF support.
//!
//! Wraps the k256 signing key. Key material is wiped when the key is dropped.

use k256::ecdsa::SigningKey;
use zeroize::Zeroize;

use crate::ec::public_key::PublicKey;
use crate::ec::signature::Signature;
use crate::hash::sha256d;
use crate::PrimitivesError;

/// A secp256k1 private key for signing.
#[derive(Clone)]
pub struct PrivateKey {
    inner: SigningKey,
}

/// Length of a serialized private key in bytes.
const PRIVATE_KEY_BYTES_LEN: usize = 32;

/// Compression flag byte appended to WIF for compressed public keys.
const COMPRESS_MAGIC: u8 = 0x01;

impl PrivateKey {
    /// Create a private key from raw 32-byte scalar.
    ///
    /// # Arguments
    /// * `bytes` - A 32-byte slice representing the private key scalar.
    ///
    /// # Returns
    /// `Ok(PrivateKey)` if the bytes represent a valid scalar on secp256k1,
    /// or an error if the scalar is zero or out of range.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != PRIVATE_KEY_BYTES_LEN {
            return Err(PrimitivesError::InvalidPrivateKey(format!(
                "expected {} bytes, got {}",
                PRIVATE_KEY_BYTES_LEN,
                bytes.len()
            )));
        }
        let inner = SigningKey::from_slice(bytes)
            .map_err(|e| PrimitivesError::InvalidPrivateKey(e.to_string()))?;
        Ok(PrivateKey { inner })
    }

    /// Create a private key from a hexadecimal string.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.is_empty() {
            return Err(PrimitivesError::InvalidPrivateKey(
                "private key hex is empty".to_string(),
            ));
        }
        let mut bytes = hex::decode(hex_str)?;
        let key = Self::from_bytes(&bytes);
        bytes.zeroize();
        key
    }

    /// Create a private key from a WIF (Wallet Import Format) string.
    ///
    /// Decodes the Base58Check-encoded string, validates the checksum,
    /// and extracts the 32-byte private key scalar. The network prefix byte
    /// is not checked, since every supported chain picks its own.
    ///
    /// # Arguments
    /// * `wif` - A Base58Check-encoded WIF string (compressed or uncompressed).
    ///
    /// # Returns
    /// `Ok(PrivateKey)` on success, or an error if the WIF is malformed or the checksum fails.
    pub fn from_wif(wif: &str) -> Result<Self, PrimitivesError> {
        let mut decoded = bs58::decode(wif)
            .into_vec()
            .map_err(|e| PrimitivesError::InvalidWif(e.to_string()))?;
        let result = Self::from_wif_payload(&decoded);
        decoded.zeroize();
        result
    }

    fn from_wif_payload(decoded: &[u8]) -> Result<Self, PrimitivesError> {
        // prefix + key + [compress flag] + checksum
        let payload_end = match decoded.len() {
            38 if decoded[33] == COMPRESS_MAGIC => 1 + PRIVATE_KEY_BYTES_LEN + 1,
            38 => {
                return Err(PrimitivesError::InvalidWif(
                    "malformed private key: invalid compression flag".to_string(),
                ))
            }
            37 => 1 + PRIVATE_KEY_BYTES_LEN,
            n => {
                return Err(PrimitivesError::InvalidWif(format!(
                    "malformed private key: invalid length {}",
                    n
                )))
            }
        };

        let checksum = sha256d(&decoded[..payload_end]);
        if checksum[..4] != decoded[payload_end..] {
            return Err(PrimitivesError::ChecksumMismatch);
        }

        Self::from_bytes(&decoded[1..1 + PRIVATE_KEY_BYTES_LEN])
    }

    /// Serialize the private key as a 32-byte big-endian array.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.inner.to_bytes().into()
    }

    /// Derive the corresponding public key for this private key.
    pub fn pub_key(&self) -> PublicKey {
        PublicKey::from_verifying_key(self.inner.verifying_key().clone())
    }

    /// Sign a 32-byte digest using deterministic RFC6979 nonces.
    ///
    /// # Returns
    /// A low-S normalized signature, or `SigningFailed`.
    pub fn sign(&self, digest: &[u8; 32]) -> Result<Signature, PrimitivesError> {
        Signature::sign(digest, self)
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.inner
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("pub_key", &self.pub_key().to_hex())
            .finish_non_exhaustive()
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for PrivateKey {}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_HEX: &str = "bbc27228ddcb9209d7fd6f36b02f7dfa6252af40bb2f1cbc7a557da8027ff866";
    const KEY_WIF: &str = "L3Wh2WPg21MWqzMFYsVC7PeBXcq1ow32KRccRihnTUnAhJaZUvg1";
    const KEY_WIF_TESTNET: &str = "cTsgVRPXT53n1RpWwHJKUi9F9r8RUP8iPTm5Y9AHxbSAx3arqX52";
    const KEY_WIF_UNCOMPRESSED: &str = "5KEyeVrzn64k1gGv98MtTNSeGzxjn55zPke4wzUpTPc9zhEUCqB";

    #[test]
    fn test_priv_key_pub_key() {
        let key = PrivateKey::from_hex(KEY_HEX).unwrap();
        assert_eq!(hex::encode(key.to_bytes()), KEY_HEX);
        assert_eq!(
            key.pub_key().to_hex(),
            "03c9f4836b9a4f77fc0d81f7bcb01b7f1b35916864b9476c241ce9fc198bd25432"
        );
    }

    #[test]
    fn test_wif_vectors() {
        let key = PrivateKey::from_hex(KEY_HEX).unwrap();
        assert_eq!(PrivateKey::from_wif(KEY_WIF).unwrap(), key);
        assert_eq!(PrivateKey::from_wif(KEY_WIF_TESTNET).unwrap(), key);
        assert_eq!(PrivateKey::from_wif(KEY_WIF_UNCOMPRESSED).unwrap(), key);
    }

    #[test]
    fn test_private_key_from_invalid_hex() {
        assert!(PrivateKey::from_hex("").is_err());
        assert!(PrivateKey::from_hex(KEY_WIF).is_err());
        // Zero scalar.
        assert!(PrivateKey::from_hex(&"00".repeat(32)).is_err());
        // Wrong length.
        assert!(PrivateKey::from_hex(&KEY_HEX[..62]).is_err());
    }

    #[test]
    fn test_private_key_from_invalid_wif() {
        // modified character
        assert!(PrivateKey::from_wif("L3Wh2WPg21MWqzMFYsVC7PeBXcq1ow32KRccRihnTUnAhJaZUvg2").is_err());
        // truncated
        assert!(PrivateKey::from_wif(&KEY_WIF[..KEY_WIF.len() - 1]).is_err());
        // doubled
        assert!(PrivateKey::from_wif(&format!("{}{}", KEY_WIF, KEY_WIF)).is_err());
        // not base58
        assert!(PrivateKey::from_wif("0OIl").is_err());
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let key = PrivateKey::from_hex(KEY_HEX).unwrap();
        let debug = format!("{:?}", key);
        assert!(!debug.contains(KEY_HEX));
    }
}
