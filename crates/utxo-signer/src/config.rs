//! Planner configuration.
//!
//! Plain serde structs so callers can load them from whatever source they
//! like; every field has a default.

use serde::{Deserialize, Serialize};

/// Outputs below this value are not created; the amount goes to the fee.
pub const DEFAULT_DUST_THRESHOLD: u64 = 546;

/// How the fee is determined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeePolicy {
    /// Fee per virtual byte of the signed transaction.
    ByteRate(u64),
    /// A fixed fee regardless of size.
    Fixed(u64),
}

impl FeePolicy {
    /// Fee for a transaction of `vsize` virtual bytes, saturating on overflow.
    pub fn fee_for(&self, vsize: usize) -> u64 {
        match *self {
            FeePolicy::ByteRate(rate) => rate.saturating_mul(vsize as u64),
            FeePolicy::Fixed(fee) => fee,
        }
    }
}

/// Position of the change output relative to the target output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputOrder {
    #[default]
    TargetFirst,
    ChangeFirst,
}

/// Tunables of the coin selector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub dust_threshold: u64,
    pub output_order: OutputOrder,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            dust_threshold: DEFAULT_DUST_THRESHOLD,
            output_order: OutputOrder::default(),
        }
    }
}
