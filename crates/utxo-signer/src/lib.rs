//! Coin selection, fee planning and signing for UTXO chains.
//!
//! The engine is a pure function of a [`SigningRequest`]: [`plan`] picks
//! coins and computes fee and change, [`sign`] additionally assembles,
//! signs and encodes the transaction. Chain differences are captured by a
//! [`TransactionFormat`](utxo_transaction::TransactionFormat), selected
//! through [`Chain`].

pub mod assembler;
pub mod chain;
pub mod config;
pub mod fee;
pub mod keys;
pub mod output;
pub mod planner;
pub mod request;
pub mod signer;

mod error;
pub use chain::Chain;
pub use config::{FeePolicy, OutputOrder, PlannerConfig};
pub use error::{ErrorCode, ParseChainError, PlanError, SignError};
pub use output::{EncodedTransaction, SigningOutput};
pub use planner::{plan, OutputKind, PlannedOutput, TransactionPlan};
pub use request::{SigningRequest, UnspentOutput};
pub use signer::{sign, SignedTransaction, TransactionSigner};
