//! UTXO engine - Cryptographic primitives, hashing, and binary codecs.
//!
//! This crate provides the foundational building blocks the engine relies on:
//! - Hash functions (SHA-256, SHA-256d, RIPEMD-160, Hash160)
//! - Chain hash type for transaction identifiers (byte-reversed display)
//! - Little-endian reader/writer and variable-length integer encoding
//! - secp256k1 private/public keys and low-S ECDSA signatures

pub mod hash;
pub mod chainhash;
pub mod util;
pub mod ec;

mod error;
pub use error::PrimitivesError;
