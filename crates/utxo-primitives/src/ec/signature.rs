//! ECDSA signature with DER serialization and RFC6979 deterministic nonces.
//!
//! Every signature produced here is low-S normalized (BIP-0062), so the same
//! key and digest always yield the same DER bytes.

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa;

use crate::ec::private_key::PrivateKey;
use crate::ec::public_key::PublicKey;
use crate::PrimitivesError;

/// An ECDSA signature over secp256k1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    inner: ecdsa::Signature,
}

impl Signature {
    /// Parse a strict DER-encoded ECDSA signature.
    ///
    /// Expected format: 0x30 <len> 0x02 <r_len> <r> 0x02 <s_len> <s>
    ///
    /// # Arguments
    /// * `bytes` - DER-encoded signature bytes, without a trailing sighash byte.
    ///
    /// # Returns
    /// `Ok(Signature)` on success, or an error if the DER encoding is malformed.
    pub fn from_der(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let inner = ecdsa::Signature::from_der(bytes)
            .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;
        Ok(Signature { inner })
    }

    /// Serialize the signature in DER format.
    ///
    /// # Returns
    /// A byte vector of 8 to 72 bytes.
    pub fn to_der(&self) -> Vec<u8> {
        self.inner.to_der().as_bytes().to_vec()
    }

    /// Whether S is in the lower half of the curve order.
    pub fn is_low_s(&self) -> bool {
        self.inner.normalize_s().is_none()
    }

    /// Sign a 32-byte digest using RFC6979 deterministic nonces.
    ///
    /// Produces a low-S normalized signature per BIP-0062.
    ///
    /// # Arguments
    /// * `digest` - The sighash digest to sign.
    /// * `priv_key` - The private key to sign with.
    ///
    /// # Returns
    /// `Ok(Signature)` on success, or `SigningFailed` if the primitive rejects
    /// the digest.
    pub fn sign(digest: &[u8; 32], priv_key: &PrivateKey) -> Result<Self, PrimitivesError> {
        let sig: ecdsa::Signature = priv_key
            .signing_key()
            .sign_prehash(digest)
            .map_err(|e| PrimitivesError::SigningFailed(e.to_string()))?;
        let inner = sig.normalize_s().unwrap_or(sig);
        Ok(Signature { inner })
    }

    /// Verify this signature against a digest and public key.
    ///
    /// # Returns
    /// `true` if the signature is valid, `false` otherwise.
    pub fn verify(&self, digest: &[u8; 32], pub_key: &PublicKey) -> bool {
        pub_key
            .verifying_key()
            .verify_prehash(digest, &self.inner)
            .is_ok()
    }
}
