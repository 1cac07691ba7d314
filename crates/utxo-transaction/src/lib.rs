//! Transaction building blocks for the UTXO engine.
//!
//! Provides the Transaction type with inputs, outputs and witness stacks,
//! the legacy and segwit wire codecs, signature hash computation, chain
//! formats, and the spend templates that turn signatures into unlocking
//! data.

pub mod transaction;
pub mod input;
pub mod output;
pub mod sighash;
pub mod format;
pub mod template;

mod error;
pub use error::{TemplateError, TransactionError};
pub use format::{Bitcoin, Groestlcoin, TransactionFormat};
pub use input::{OutPoint, TransactionInput};
pub use output::TransactionOutput;
pub use transaction::Transaction;
