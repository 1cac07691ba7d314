//! UTXO engine - Script construction, classification and witness stacks.
//!
//! Provides the Bitcoin Script type, opcode definitions, script chunk parsing,
//! standard template classification and the segwit witness stack.

pub mod script;
pub mod opcodes;
pub mod chunk;
pub mod script_type;
pub mod witness;

mod error;
pub use error::ScriptError;
pub use script::Script;
pub use chunk::ScriptChunk;
pub use script_type::ScriptType;
pub use witness::Witness;
