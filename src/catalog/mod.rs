//! Test Scenario Catalog
//!
//! Curated happy-path pairs, the chains used for listing-only coverage and
//! the negative cases for every endpoint. Built once from a
//! [`FixtureRegistry`] and shared read-only.

mod happy_path;
pub mod negative;

pub use happy_path::happy_path_pairs;
pub use negative::{NegativeCase, NON_EXISTENT_TOKEN, UNKNOWN_CHAIN};

use serde::Serialize;

use crate::api::Endpoint;
use crate::domain::{ChainDescriptor, FixtureError, FixtureRegistry, ScenarioCase, Tag, TransferType};

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioCatalog {
    pub happy_path: Vec<ScenarioCase>,
    /// Non-EVM chains, exercised through tools and token listings only
    pub listing_chains: Vec<ChainDescriptor>,
    pub negative: Vec<NegativeCase>,
}

impl ScenarioCatalog {
    pub fn standard(fixtures: &FixtureRegistry) -> Result<Self, FixtureError> {
        let mut negative = negative::quote_cases(fixtures);
        negative.extend(negative::routes_cases(fixtures));
        negative.extend(negative::tools_cases());
        negative.extend(negative::token_cases(fixtures));
        negative.extend(negative::tokens_cases());

        let catalog = Self {
            happy_path: happy_path_pairs()?,
            listing_chains: fixtures.chains.non_evm().cloned().collect(),
            negative,
        };
        catalog.check_coverage()?;
        Ok(catalog)
    }

    /// At least one same-chain swap, one cross-chain bridge and one non-EVM chain
    fn check_coverage(&self) -> Result<(), FixtureError> {
        let has_swap = self.happy_path.iter().any(|c| c.transfer_type == TransferType::Swap);
        let has_bridge = self
            .happy_path
            .iter()
            .any(|c| c.transfer_type == TransferType::Bridge && c.is_cross_chain());
        let reason = if !has_swap {
            "no same-chain swap"
        } else if !has_bridge {
            "no cross-chain bridge"
        } else if self.listing_chains.is_empty() {
            "no non-EVM chain"
        } else {
            return Ok(());
        };
        Err(FixtureError::InvalidScenario {
            name: "catalog".into(),
            reason: reason.into(),
        })
    }

    pub fn pairs_tagged(&self, tag: Tag) -> impl Iterator<Item = &ScenarioCase> {
        self.happy_path.iter().filter(move |c| c.has_tag(tag))
    }

    pub fn negative_for(&self, endpoint: Endpoint) -> impl Iterator<Item = &NegativeCase> {
        self.negative.iter().filter(move |c| c.endpoint == endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChainId, ChainType};

    fn catalog() -> ScenarioCatalog {
        ScenarioCatalog::standard(&FixtureRegistry::standard()).unwrap()
    }

    #[test]
    fn test_listing_chains_are_non_evm() {
        let catalog = catalog();
        let ids: Vec<ChainId> = catalog.listing_chains.iter().map(|c| c.id).collect();
        assert!(ids.contains(&ChainId::SOLANA));
        assert!(ids.contains(&ChainId::BITCOIN));
        assert!(ids.contains(&ChainId::SUI));
        assert!(catalog.listing_chains.iter().all(|c| c.chain_type != ChainType::Evm));
    }

    #[test]
    fn test_every_endpoint_except_chains_has_negative_cases() {
        let catalog = catalog();
        for endpoint in [Endpoint::Quote, Endpoint::Routes, Endpoint::Tools, Endpoint::Token, Endpoint::Tokens] {
            assert!(catalog.negative_for(endpoint).count() > 0, "{}", endpoint);
        }
        assert_eq!(catalog.negative_for(Endpoint::Chains).count(), 0);
    }

    #[test]
    fn test_smoke_subset() {
        let binding = catalog();
        let names: Vec<&str> = binding.pairs_tagged(Tag::Smoke).map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["USDC Ethereum to Polygon bridge", "ETH to USDC swap on Ethereum"]);
    }

    #[test]
    fn test_catalog_serializes_for_listing() {
        let value = serde_json::to_value(catalog()).unwrap();
        assert_eq!(value["happy_path"].as_array().unwrap().len(), 6);
        assert_eq!(value["negative"][0]["endpoint"], "quote");
    }

    #[test]
    fn test_catalog_without_non_evm_chain_is_rejected() {
        let mut catalog = catalog();
        catalog.listing_chains.clear();
        assert!(matches!(
            catalog.check_coverage(),
            Err(FixtureError::InvalidScenario { .. })
        ));
    }
}
