//! Fixture Registry
//!
//! Bundles chains, tokens and test addresses into a single read-only value
//! that is built once and passed by reference to catalogs and builders.

use thiserror::Error;

use super::addresses::TestAddressSet;
use super::amount::AmountError;
use super::chain::{ChainId, ChainRegistry};
use super::token::TokenRegistry;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("duplicate chain id {0}")]
    DuplicateChain(ChainId),

    #[error("duplicate token {symbol} on chain {chain}")]
    DuplicateToken { chain: ChainId, symbol: String },

    #[error("token {symbol} has {decimals} decimals (max 18)")]
    InvalidDecimals { symbol: String, decimals: u8 },

    #[error("scenario '{name}': {reason}")]
    InvalidScenario { name: String, reason: String },

    #[error("scenario '{name}': invalid fromAmount: {source}")]
    InvalidAmount {
        name: String,
        #[source]
        source: AmountError,
    },
}

#[derive(Debug, Clone)]
pub struct FixtureRegistry {
    pub chains: ChainRegistry,
    pub tokens: TokenRegistry,
    pub addresses: TestAddressSet,
}

impl FixtureRegistry {
    pub fn new(chains: ChainRegistry, tokens: TokenRegistry, addresses: TestAddressSet) -> Self {
        Self {
            chains,
            tokens,
            addresses,
        }
    }

    pub fn standard() -> Self {
        Self::new(
            ChainRegistry::standard(),
            TokenRegistry::standard(),
            TestAddressSet::default(),
        )
    }

    /// Resolve a token symbol on `chain`, passing unknown input through unchanged
    pub fn resolve_token_address(&self, chain: ChainId, symbol_or_address: &str) -> String {
        self.tokens.resolve_token_address(chain, symbol_or_address)
    }
}

impl Default for FixtureRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
