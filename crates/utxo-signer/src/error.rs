use serde::{Deserialize, Serialize};
use utxo_transaction::{TemplateError, TransactionError};

/// Stable, serializable identifier for every failure the engine reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InsufficientFunds,
    InvalidTargetAmount,
    NoUsableInputs,
    ValueOverflow,
    InvalidSighashType,
    KeyNotFound,
    UnsupportedScriptType,
    MissingKeyMaterial,
    SigningPrimitiveFailure,
    Internal,
}

/// Planning failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// The candidates cannot cover the amount plus the fee of spending them.
    #[error("insufficient funds: available {available}, required {required}, short by {shortfall}")]
    InsufficientFunds {
        available: u64,
        required: u64,
        shortfall: u64,
    },
    #[error("invalid target amount: {0}")]
    InvalidTargetAmount(u64),
    #[error("no usable inputs")]
    NoUsableInputs,
    /// A sum of amounts exceeds the largest value an output can carry.
    #[error("value overflow: {0}")]
    ValueOverflow(String),
}

impl PlanError {
    pub fn code(&self) -> ErrorCode {
        match self {
            PlanError::InsufficientFunds { .. } => ErrorCode::InsufficientFunds,
            PlanError::InvalidTargetAmount(_) => ErrorCode::InvalidTargetAmount,
            PlanError::NoUsableInputs => ErrorCode::NoUsableInputs,
            PlanError::ValueOverflow(_) => ErrorCode::ValueOverflow,
        }
    }
}

/// Signing failures. Any of these aborts the whole request.
#[derive(Debug, thiserror::Error)]
pub enum SignError {
    /// No supplied private key matches what the input's script requires.
    #[error("no private key for input {index}: {detail}")]
    KeyNotFound { index: usize, detail: String },

    #[error("unsupported script type: {0}")]
    UnsupportedScriptType(String),

    /// The sighash type cannot be signed as requested.
    #[error("invalid sighash type {sighash_type:#x}: {detail}")]
    InvalidSighashType { sighash_type: u32, detail: String },

    #[error("missing key material: {0}")]
    MissingKeyMaterial(String),

    #[error("signing failed: {0}")]
    SigningPrimitiveFailure(#[from] utxo_primitives::PrimitivesError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    /// A broken engine invariant, e.g. a signed transaction larger than its
    /// fee estimate allowed for.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SignError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SignError::KeyNotFound { .. } => ErrorCode::KeyNotFound,
            SignError::UnsupportedScriptType(_) => ErrorCode::UnsupportedScriptType,
            SignError::InvalidSighashType { .. } => ErrorCode::InvalidSighashType,
            SignError::MissingKeyMaterial(_) => ErrorCode::MissingKeyMaterial,
            SignError::SigningPrimitiveFailure(_) => ErrorCode::SigningPrimitiveFailure,
            SignError::Plan(e) => e.code(),
            SignError::Internal(_) => ErrorCode::Internal,
        }
    }
}

impl From<TemplateError> for SignError {
    fn from(e: TemplateError) -> Self {
        match e {
            TemplateError::UnsupportedScriptType(name) => SignError::UnsupportedScriptType(name),
            TemplateError::MissingKeyMaterial(detail) => SignError::MissingKeyMaterial(detail),
            TemplateError::Script(e) => SignError::Internal(e.to_string()),
        }
    }
}

impl From<TransactionError> for SignError {
    fn from(e: TransactionError) -> Self {
        SignError::Internal(e.to_string())
    }
}

/// An unrecognized chain identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown chain: {0}")]
pub struct ParseChainError(pub String);
