//! Supported chains and their transaction formats.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utxo_transaction::{Bitcoin, Groestlcoin, TransactionFormat};

use crate::config::PlannerConfig;
use crate::output::SigningOutput;
use crate::planner::{self, TransactionPlan};
use crate::request::SigningRequest;
use crate::{signer, ParseChainError, PlanError, SignError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Bitcoin,
    Litecoin,
    Groestlcoin,
}

impl Chain {
    pub const ALL: [Chain; 3] = [Chain::Bitcoin, Chain::Litecoin, Chain::Groestlcoin];

    pub fn id(&self) -> &'static str {
        match self {
            Chain::Bitcoin => "bitcoin",
            Chain::Litecoin => "litecoin",
            Chain::Groestlcoin => "groestlcoin",
        }
    }

    pub fn format(&self) -> &'static dyn TransactionFormat {
        match self {
            Chain::Bitcoin | Chain::Litecoin => &Bitcoin,
            Chain::Groestlcoin => &Groestlcoin,
        }
    }

    pub fn default_config(&self) -> PlannerConfig {
        PlannerConfig::default()
    }

    pub fn plan(&self, request: &SigningRequest) -> Result<TransactionPlan, PlanError> {
        planner::plan(request, self.format())
    }

    pub fn sign(&self, request: &SigningRequest) -> Result<SigningOutput, SignError> {
        signer::sign(request, self.format())
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Chain {
    type Err = ParseChainError;

    /// Accepts the chain id or its ticker, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bitcoin" | "btc" => Ok(Chain::Bitcoin),
            "litecoin" | "ltc" => Ok(Chain::Litecoin),
            "groestlcoin" | "grs" => Ok(Chain::Groestlcoin),
            _ => Err(ParseChainError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_ids() {
        for chain in Chain::ALL {
            assert_eq!(chain.to_string().parse::<Chain>().unwrap(), chain);
            assert_eq!(chain.default_config().dust_threshold, 546);
        }
        assert_eq!("GRS".parse::<Chain>().unwrap(), Chain::Groestlcoin);
        assert_eq!("ltc".parse::<Chain>().unwrap(), Chain::Litecoin);
        assert_eq!("dogecoin".parse::<Chain>(), Err(ParseChainError("dogecoin".to_string())));
    }

    #[test]
    fn test_chain_formats() {
        assert_eq!(Chain::Bitcoin.format().name(), "bitcoin");
        assert_eq!(Chain::Litecoin.format().name(), "bitcoin");
        assert_eq!(Chain::Groestlcoin.format().name(), "groestlcoin");
        assert_eq!(serde_json::to_string(&Chain::Groestlcoin).unwrap(), r#""groestlcoin""#);
    }
}
