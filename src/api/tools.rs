//! Tools Types
//!
//! `GET /tools` lists bridges and exchanges. The two report `supportedChains`
//! differently: bridges as directed (from, to) pairs, exchanges as a flat
//! list of chain ids.

use serde::{Deserialize, Serialize};

use super::request::{ApiRequest, Endpoint};
use crate::domain::ChainId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolsQuery {
    /// `None` sends no filter at all; `Some("")` sends an empty `chains=`
    pub chains: Option<String>,
}

impl ToolsQuery {
    pub fn all() -> Self {
        Self { chains: None }
    }

    pub fn for_chains(chains: &[ChainId]) -> Self {
        let joined: Vec<String> = chains.iter().map(ChainId::to_string).collect();
        Self {
            chains: Some(joined.join(",")),
        }
    }

    /// Filter passed through verbatim, for malformed values
    pub fn raw(chains: impl Into<String>) -> Self {
        Self {
            chains: Some(chains.into()),
        }
    }

    pub fn to_request(&self) -> ApiRequest {
        let req = ApiRequest::get(Endpoint::Tools);
        match &self.chains {
            Some(chains) => req.with_query("chains", chains.as_str()),
            None => req,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeChainPair {
    pub from_chain_id: ChainId,
    pub to_chain_id: ChainId,
}

impl BridgeChainPair {
    pub fn touches(&self, chain: ChainId) -> bool {
        self.from_chain_id == chain || self.to_chain_id == chain
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bridge {
    pub key: String,
    pub name: String,
    #[serde(rename = "logoURI")]
    pub logo_uri: String,
    pub supported_chains: Vec<BridgeChainPair>,
}

impl Bridge {
    pub fn supports(&self, chain: ChainId) -> bool {
        self.supported_chains.iter().any(|p| p.touches(chain))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exchange {
    pub key: String,
    pub name: String,
    #[serde(rename = "logoURI")]
    pub logo_uri: String,
    pub supported_chains: Vec<ChainId>,
}

impl Exchange {
    pub fn supports(&self, chain: ChainId) -> bool {
        self.supported_chains.contains(&chain)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsResponse {
    pub bridges: Vec<Bridge>,
    pub exchanges: Vec<Exchange>,
}

impl ToolsResponse {
    pub fn is_empty(&self) -> bool {
        self.bridges.is_empty() && self.exchanges.is_empty()
    }
}
