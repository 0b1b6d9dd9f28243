//! Happy-path token pairs
//!
//! Six curated pairs: three cross-chain bridges and three same-chain swaps
//! over the major EVM chains. Non-EVM chains are only exercised through the
//! tools and token listing endpoints.

use crate::domain::{
    to_token_amount, ChainId, FixtureError, ScenarioCase, Tag, TransferType, NATIVE_TOKEN_ADDRESS,
};

/// `whole` tokens in smallest units
fn units(pair: &str, whole: u64, decimals: u8) -> Result<String, FixtureError> {
    to_token_amount(whole, decimals)
        .map(|amount| amount.to_string())
        .map_err(|source| FixtureError::InvalidAmount {
            name: pair.to_string(),
            source,
        })
}

pub fn happy_path_pairs() -> Result<Vec<ScenarioCase>, FixtureError> {
    Ok(vec![
        ScenarioCase::new(
            "USDC Ethereum to Polygon bridge",
            ChainId::ETHEREUM,
            ChainId::POLYGON,
            "USDC",
            "USDC",
            units("USDC Ethereum to Polygon bridge", 1, 6)?,
            TransferType::Bridge,
            [Tag::Smoke, Tag::Regression, Tag::Bridge],
        )?,
        ScenarioCase::new(
            "USDC Polygon to Arbitrum bridge",
            ChainId::POLYGON,
            ChainId::ARBITRUM,
            "USDC",
            "USDC",
            units("USDC Polygon to Arbitrum bridge", 1, 6)?,
            TransferType::Bridge,
            [Tag::Regression, Tag::Bridge],
        )?,
        // USDT has 18 decimals on BSC
        ScenarioCase::new(
            "USDT BSC to Ethereum bridge",
            ChainId::BSC,
            ChainId::ETHEREUM,
            "USDT",
            "USDT",
            units("USDT BSC to Ethereum bridge", 1, 18)?,
            TransferType::Bridge,
            [Tag::Regression, Tag::Bridge],
        )?,
        ScenarioCase::new(
            "ETH to USDC swap on Ethereum",
            ChainId::ETHEREUM,
            ChainId::ETHEREUM,
            "ETH",
            "USDC",
            // 0.1 ETH
            "100000000000000000",
            TransferType::Swap,
            [Tag::Smoke, Tag::Regression, Tag::Swap],
        )?,
        ScenarioCase::new(
            "USDC to USDT swap on Ethereum",
            ChainId::ETHEREUM,
            ChainId::ETHEREUM,
            "USDC",
            "USDT",
            units("USDC to USDT swap on Ethereum", 10, 6)?,
            TransferType::Swap,
            [Tag::Regression, Tag::Swap],
        )?,
        ScenarioCase::new(
            "POL to USDC swap on Polygon",
            ChainId::POLYGON,
            ChainId::POLYGON,
            NATIVE_TOKEN_ADDRESS,
            "USDC",
            units("POL to USDC swap on Polygon", 1, 18)?,
            TransferType::Swap,
            [Tag::Regression, Tag::Swap],
        )?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_cover_swap_and_bridge() {
        let pairs = happy_path_pairs().unwrap();
        assert_eq!(pairs.len(), 6);
        assert!(pairs.iter().any(|p| p.transfer_type == TransferType::Swap));
        assert!(pairs.iter().any(|p| p.transfer_type == TransferType::Bridge && p.is_cross_chain()));
        assert_eq!(pairs.iter().filter(|p| p.has_tag(Tag::Smoke)).count(), 2);
    }

    #[test]
    fn test_amounts_are_whole_tokens_in_smallest_units() {
        let pairs = happy_path_pairs().unwrap();
        let amount = |name: &str| pairs.iter().find(|p| p.name == name).unwrap().from_amount.clone();
        assert_eq!(amount("USDC Ethereum to Polygon bridge"), "1000000");
        assert_eq!(amount("USDT BSC to Ethereum bridge"), "1000000000000000000");
        assert_eq!(amount("USDC to USDT swap on Ethereum"), "10000000");
        assert_eq!(amount("POL to USDC swap on Polygon"), "1000000000000000000");
    }

    #[test]
    fn test_every_swap_stays_on_chain_and_changes_token() {
        for pair in happy_path_pairs().unwrap() {
            if pair.transfer_type == TransferType::Swap {
                assert_eq!(pair.from_chain, pair.to_chain, "{}", pair.name);
                assert!(!pair.from_token.eq_ignore_ascii_case(&pair.to_token), "{}", pair.name);
            }
        }
    }
}
