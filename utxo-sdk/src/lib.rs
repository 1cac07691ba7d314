#![deny(missing_docs)]

//! UTXO engine - complete SDK.
//!
//! Re-exports the planning, signing and encoding crates for single-crate
//! usage. Most callers only need [`Chain`], [`SigningRequest`] and
//! [`sign`] or [`plan`].

pub use utxo_primitives as primitives;
pub use utxo_script as script;
pub use utxo_signer as signer;
pub use utxo_transaction as transaction;

pub use utxo_signer::{
    plan, sign, Chain, ErrorCode, FeePolicy, PlanError, SignError, SigningOutput, SigningRequest,
    TransactionPlan, UnspentOutput,
};
