//! Token listing, token detail and chain listing types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::quote::TokenInfo;
use super::request::{ApiRequest, Endpoint};
use crate::domain::{ChainId, ChainType};

/// `GET /tokens?chains=...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokensQuery {
    pub chains: String,
}

impl TokensQuery {
    pub fn for_chains(chains: &[ChainId]) -> Self {
        let joined: Vec<String> = chains.iter().map(ChainId::to_string).collect();
        Self {
            chains: joined.join(","),
        }
    }

    pub fn raw(chains: impl Into<String>) -> Self {
        Self {
            chains: chains.into(),
        }
    }

    pub fn to_request(&self) -> ApiRequest {
        ApiRequest::get(Endpoint::Tokens).with_query("chains", self.chains.as_str())
    }
}

/// `GET /token?chain=...&token=...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenQuery {
    pub chain: String,
    /// Symbol or address
    pub token: String,
}

impl TokenQuery {
    pub fn new(chain: ChainId, token: impl Into<String>) -> Self {
        Self {
            chain: chain.to_string(),
            token: token.into(),
        }
    }

    pub fn raw(chain: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            chain: chain.into(),
            token: token.into(),
        }
    }

    pub fn to_request(&self) -> ApiRequest {
        ApiRequest::get(Endpoint::Token)
            .with_query("chain", self.chain.as_str())
            .with_query("token", self.token.as_str())
    }
}

/// `GET /chains[?chainTypes=EVM,SVM]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainsQuery {
    pub chain_types: Vec<ChainType>,
}

impl ChainsQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn of_types(chain_types: &[ChainType]) -> Self {
        Self {
            chain_types: chain_types.to_vec(),
        }
    }

    pub fn to_request(&self) -> ApiRequest {
        let req = ApiRequest::get(Endpoint::Chains);
        if self.chain_types.is_empty() {
            return req;
        }
        let joined: Vec<&str> = self.chain_types.iter().map(ChainType::as_str).collect();
        req.with_query("chainTypes", joined.join(","))
    }
}

/// Listing response: chain id (as a string key) to tokens on that chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokensResponse {
    pub tokens: HashMap<String, Vec<TokenInfo>>,
}

impl TokensResponse {
    pub fn for_chain(&self, chain: ChainId) -> Option<&[TokenInfo]> {
        self.tokens.get(&chain.to_string()).map(Vec::as_slice)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDetails {
    pub address: String,
    pub chain_id: ChainId,
    pub symbol: String,
    pub decimals: u8,
    pub name: String,
    #[serde(rename = "priceUSD")]
    pub price_usd: String,
    #[serde(default, rename = "logoURI", skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coin_key: Option<String>,
    #[serde(default, rename = "marketCapUSD", skip_serializing_if = "Option::is_none")]
    pub market_cap_usd: Option<f64>,
    #[serde(default, rename = "volumeUSD24H", skip_serializing_if = "Option::is_none")]
    pub volume_usd_24h: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainInfo {
    pub id: ChainId,
    pub key: String,
    pub name: String,
    pub chain_type: ChainType,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainsResponse {
    pub chains: Vec<ChainInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_query() {
        let req = TokensQuery::for_chains(&[ChainId::ETHEREUM, ChainId::SOLANA]).to_request();
        assert_eq!(req.query_value("chains"), Some("1,1151111081099710"));
    }

    #[test]
    fn test_token_query() {
        let req = TokenQuery::new(ChainId::ETHEREUM, "USDC").to_request();
        assert_eq!(req.query_value("chain"), Some("1"));
        assert_eq!(req.query_value("token"), Some("USDC"));
        assert_eq!(TokenQuery::raw("abc", "USDC").to_request().query_value("chain"), Some("abc"));
    }

    #[test]
    fn test_chains_query() {
        assert!(ChainsQuery::all().to_request().query.is_empty());
        let req = ChainsQuery::of_types(&[ChainType::Evm, ChainType::Svm]).to_request();
        assert_eq!(req.query_value("chainTypes"), Some("EVM,SVM"));
    }

    #[test]
    fn test_listing_lookup_by_chain() {
        let json = r#"{"tokens": {"1": [{"address": "0x0000000000000000000000000000000000000000",
            "chainId": 1, "symbol": "ETH", "decimals": 18, "name": "ETH", "priceUSD": "3000.12"}]}}"#;
        let listing: TokensResponse = serde_json::from_str(json).unwrap();
        let eth = listing.for_chain(ChainId::ETHEREUM).unwrap();
        assert_eq!(eth[0].price_usd.as_deref(), Some("3000.12"));
        assert!(listing.for_chain(ChainId::POLYGON).is_none());
    }

    #[test]
    fn test_token_details_market_data() {
        let json = r#"{"address": "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", "chainId": 1,
            "symbol": "USDC", "decimals": 6, "name": "USD Coin", "priceUSD": "0.9998",
            "marketCapUSD": 32000000000.5, "volumeUSD24H": 5400000000, "tags": ["stablecoin"]}"#;
        let details: TokenDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.market_cap_usd, Some(32_000_000_000.5));
        assert_eq!(details.tags, vec!["stablecoin"]);
    }
}
