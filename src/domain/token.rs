//! Token Fixtures
//!
//! Per-chain token metadata (address, decimals, symbol). Native assets are
//! represented by the all-zero address. Symbols are unique within a chain;
//! address comparison is case-insensitive because checksummed and lowercase
//! forms are both in circulation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::chain::ChainId;
use super::fixtures::FixtureError;

/// Address used by the aggregator for a chain's native asset
pub const NATIVE_TOKEN_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Largest decimals value accepted for a fixture token
pub const MAX_TOKEN_DECIMALS: u8 = 18;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDescriptor {
    pub symbol: String,
    pub address: String,
    pub decimals: u8,
}

impl TokenDescriptor {
    pub fn new(symbol: impl Into<String>, address: impl Into<String>, decimals: u8) -> Self {
        Self {
            symbol: symbol.into(),
            address: address.into(),
            decimals,
        }
    }

    pub fn is_native(&self) -> bool {
        self.matches_address(NATIVE_TOKEN_ADDRESS)
    }

    pub fn matches_address(&self, address: &str) -> bool {
        self.address.eq_ignore_ascii_case(address)
    }
}

const STANDARD_TOKENS: &[(ChainId, &str, &str, u8)] = &[
    (ChainId::ETHEREUM, "ETH", NATIVE_TOKEN_ADDRESS, 18),
    (ChainId::ETHEREUM, "USDC", "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", 6),
    (ChainId::ETHEREUM, "USDT", "0xdAC17F958D2ee523a2206206994597C13D831ec7", 6),
    (ChainId::ETHEREUM, "WETH", "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2", 18),
    (ChainId::ETHEREUM, "DAI", "0x6B175474E89094C44Da98b954EedeAC495271d0F", 18),
    (ChainId::POLYGON, "MATIC", NATIVE_TOKEN_ADDRESS, 18),
    (ChainId::POLYGON, "USDC", "0x3c499c542cEF5E3811e1192ce70d8cC03d5c3359", 6),
    (ChainId::POLYGON, "USDC.e", "0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174", 6),
    (ChainId::POLYGON, "USDT", "0xc2132D05D31c914a87C6611C10748AEb04B58e8F", 6),
    (ChainId::ARBITRUM, "ETH", NATIVE_TOKEN_ADDRESS, 18),
    (ChainId::ARBITRUM, "USDC", "0xaf88d065e77c8cC2239327C5EDb3A432268e5831", 6),
    (ChainId::ARBITRUM, "USDC.e", "0xFF970A61A04b1cA14834A43f5dE4533eBDDB5CC8", 6),
    (ChainId::ARBITRUM, "USDT", "0xFd086bC7CD5C481DCC9C85ebE478A1C0b69FCbb9", 6),
    (ChainId::BSC, "BNB", NATIVE_TOKEN_ADDRESS, 18),
    (ChainId::BSC, "USDT", "0x55d398326f99059fF775485246999027B3197955", 18),
    (ChainId::BSC, "USDC", "0x8AC76a51cc950d9822D68b83fE1Ad97B32Cd580d", 18),
    (ChainId::BSC, "BUSD", "0xe9e7CEA3DedcA5984780Bafc599bD69ADd087D56", 18),
];

/// Token metadata grouped by chain
#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    tokens: HashMap<ChainId, Vec<TokenDescriptor>>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the curated token sample
    pub fn standard() -> Self {
        let mut tokens: HashMap<ChainId, Vec<TokenDescriptor>> = HashMap::new();
        for (chain, symbol, address, decimals) in STANDARD_TOKENS {
            tokens
                .entry(*chain)
                .or_default()
                .push(TokenDescriptor::new(*symbol, *address, *decimals));
        }
        Self { tokens }
    }

    /// Add a token, enforcing the decimals bound and per-chain symbol uniqueness
    pub fn insert(&mut self, chain: ChainId, token: TokenDescriptor) -> Result<(), FixtureError> {
        if token.decimals > MAX_TOKEN_DECIMALS {
            return Err(FixtureError::InvalidDecimals {
                symbol: token.symbol,
                decimals: token.decimals,
            });
        }
        let entries = self.tokens.entry(chain).or_default();
        if entries.iter().any(|t| t.symbol == token.symbol) {
            return Err(FixtureError::DuplicateToken {
                chain,
                symbol: token.symbol,
            });
        }
        entries.push(token);
        Ok(())
    }

    pub fn by_symbol(&self, chain: ChainId, symbol: &str) -> Option<&TokenDescriptor> {
        self.tokens.get(&chain)?.iter().find(|t| t.symbol == symbol)
    }

    pub fn by_address(&self, chain: ChainId, address: &str) -> Option<&TokenDescriptor> {
        self.tokens.get(&chain)?.iter().find(|t| t.matches_address(address))
    }

    /// Look up a token by symbol first, then by address
    pub fn lookup(&self, chain: ChainId, symbol_or_address: &str) -> Option<&TokenDescriptor> {
        self.by_symbol(chain, symbol_or_address)
            .or_else(|| self.by_address(chain, symbol_or_address))
    }

    /// Resolve a symbol to its address on `chain`.
    ///
    /// Unknown inputs come back unchanged so raw addresses and deliberately
    /// invalid strings travel through the same code path.
    pub fn resolve_token_address(&self, chain: ChainId, symbol_or_address: &str) -> String {
        match self.by_symbol(chain, symbol_or_address) {
            Some(token) => token.address.clone(),
            None => symbol_or_address.to_string(),
        }
    }

    pub fn tokens_for(&self, chain: ChainId) -> &[TokenDescriptor] {
        self.tokens.get(&chain).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn chains(&self) -> impl Iterator<Item = ChainId> + '_ {
        self.tokens.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_symbol() {
        let registry = TokenRegistry::standard();
        assert_eq!(
            registry.resolve_token_address(ChainId::ETHEREUM, "USDC"),
            "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"
        );
        assert_eq!(
            registry.resolve_token_address(ChainId::POLYGON, "USDC"),
            "0x3c499c542cEF5E3811e1192ce70d8cC03d5c3359"
        );
    }

    #[test]
    fn test_resolve_falls_back_to_literal() {
        let registry = TokenRegistry::standard();
        assert_eq!(
            registry.resolve_token_address(ChainId::ETHEREUM, "not-an-address"),
            "not-an-address"
        );
        // Symbol known on another chain only
        assert_eq!(registry.resolve_token_address(ChainId::ETHEREUM, "BUSD"), "BUSD");
        // Unknown chain
        assert_eq!(registry.resolve_token_address(ChainId::SOLANA, "USDC"), "USDC");
        assert_eq!(
            registry.resolve_token_address(ChainId::POLYGON, NATIVE_TOKEN_ADDRESS),
            NATIVE_TOKEN_ADDRESS
        );
    }

    #[test]
    fn test_address_lookup_is_case_insensitive() {
        let registry = TokenRegistry::standard();
        let token = registry
            .by_address(ChainId::ETHEREUM, "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48")
            .unwrap();
        assert_eq!(token.symbol, "USDC");
        assert_eq!(token.decimals, 6);
        assert!(registry.lookup(ChainId::ETHEREUM, "0xDAC17F958D2EE523A2206206994597C13D831EC7").is_some());
    }

    #[test]
    fn test_native_tokens() {
        let registry = TokenRegistry::standard();
        assert!(registry.by_symbol(ChainId::ETHEREUM, "ETH").unwrap().is_native());
        assert!(registry.by_symbol(ChainId::BSC, "BNB").unwrap().is_native());
        assert!(!registry.by_symbol(ChainId::BSC, "USDT").unwrap().is_native());
    }

    #[test]
    fn test_standard_decimals_within_bounds() {
        let registry = TokenRegistry::standard();
        for chain in registry.chains() {
            for token in registry.tokens_for(chain) {
                assert!(token.decimals <= MAX_TOKEN_DECIMALS, "{} on {}", token.symbol, chain);
            }
        }
        // BSC-pegged USDT uses 18 decimals
        assert_eq!(registry.by_symbol(ChainId::BSC, "USDT").unwrap().decimals, 18);
    }

    #[test]
    fn test_insert_rejects_duplicates_and_bad_decimals() {
        let mut registry = TokenRegistry::new();
        registry
            .insert(ChainId::BASE, TokenDescriptor::new("USDC", "0x01", 6))
            .unwrap();
        assert!(matches!(
            registry.insert(ChainId::BASE, TokenDescriptor::new("USDC", "0x02", 6)),
            Err(FixtureError::DuplicateToken { .. })
        ));
        assert!(matches!(
            registry.insert(ChainId::BASE, TokenDescriptor::new("WEIRD", "0x03", 24)),
            Err(FixtureError::InvalidDecimals { decimals: 24, .. })
        ));
        assert_eq!(registry.tokens_for(ChainId::BASE).len(), 1);
        assert!(registry.tokens_for(ChainId::OPTIMISM).is_empty());
    }
}
