/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// The transaction structure is invalid (e.g. an input index out of range).
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),
    /// An error occurred during binary/hex serialization or deserialization.
    #[error("serialization error: {0}")]
    SerializationError(String),
    /// An underlying script error (forwarded from `utxo-script`).
    #[error("script error: {0}")]
    Script(#[from] utxo_script::ScriptError),
    /// An underlying primitives error (forwarded from `utxo-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] utxo_primitives::PrimitivesError),
}

/// Failures resolving or building the spend of a locking script.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// The locking (or inner) script is not a template this engine can spend.
    #[error("unsupported script type: {0}")]
    UnsupportedScriptType(String),
    /// A redeem or witness script, or enough signatures, were not supplied.
    #[error("missing key material: {0}")]
    MissingKeyMaterial(String),
    #[error("script error: {0}")]
    Script(#[from] utxo_script::ScriptError),
}
