//! Chain Fixtures
//!
//! Chain identifiers and chain-type classification used to parameterize
//! requests. Several non-EVM ids exceed 2^53, so ids are carried as `u64`
//! end to end and never pass through a float.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::fixtures::FixtureError;

/// Numeric chain identifier as used by the aggregator API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl ChainId {
    // EVM chains
    pub const ETHEREUM: ChainId = ChainId(1);
    pub const OPTIMISM: ChainId = ChainId(10);
    pub const BSC: ChainId = ChainId(56);
    pub const POLYGON: ChainId = ChainId(137);
    pub const BASE: ChainId = ChainId(8453);
    pub const ARBITRUM: ChainId = ChainId(42161);
    pub const AVALANCHE: ChainId = ChainId(43114);

    // Non-EVM chains
    pub const SOLANA: ChainId = ChainId(1_151_111_081_099_710);
    pub const BITCOIN: ChainId = ChainId(20_000_000_000_001);
    pub const SUI: ChainId = ChainId(9_270_000_000_000_000);

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChainId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(ChainId)
    }
}

impl From<u64> for ChainId {
    fn from(value: u64) -> Self {
        ChainId(value)
    }
}

/// Virtual machine family of a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainType {
    #[serde(rename = "EVM")]
    Evm,
    #[serde(rename = "SVM")]
    Svm,
    #[serde(rename = "UTXO")]
    Utxo,
    #[serde(rename = "MVM")]
    Mvm,
}

impl ChainType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainType::Evm => "EVM",
            ChainType::Svm => "SVM",
            ChainType::Utxo => "UTXO",
            ChainType::Mvm => "MVM",
        }
    }
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chain known to the fixture set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainDescriptor {
    pub id: ChainId,
    pub display_name: String,
    pub chain_type: ChainType,
}

impl ChainDescriptor {
    pub fn new(id: ChainId, display_name: impl Into<String>, chain_type: ChainType) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            chain_type,
        }
    }

    pub fn is_evm(&self) -> bool {
        self.chain_type == ChainType::Evm
    }
}

const STANDARD_CHAINS: &[(ChainId, &str, ChainType)] = &[
    (ChainId::ETHEREUM, "Ethereum", ChainType::Evm),
    (ChainId::POLYGON, "Polygon", ChainType::Evm),
    (ChainId::ARBITRUM, "Arbitrum", ChainType::Evm),
    (ChainId::BSC, "BSC", ChainType::Evm),
    (ChainId::OPTIMISM, "Optimism", ChainType::Evm),
    (ChainId::BASE, "Base", ChainType::Evm),
    (ChainId::AVALANCHE, "Avalanche", ChainType::Evm),
    (ChainId::SOLANA, "Solana", ChainType::Svm),
    (ChainId::BITCOIN, "Bitcoin", ChainType::Utxo),
    (ChainId::SUI, "SUI", ChainType::Mvm),
];

/// Immutable registry of chains keyed by id
#[derive(Debug, Clone, Default)]
pub struct ChainRegistry {
    chains: Vec<ChainDescriptor>,
    index: HashMap<ChainId, usize>,
}

impl ChainRegistry {
    /// Build a registry, rejecting duplicate ids
    pub fn new(chains: Vec<ChainDescriptor>) -> Result<Self, FixtureError> {
        let mut index = HashMap::with_capacity(chains.len());
        for (i, chain) in chains.iter().enumerate() {
            if index.insert(chain.id, i).is_some() {
                return Err(FixtureError::DuplicateChain(chain.id));
            }
        }
        Ok(Self { chains, index })
    }

    /// The chains exercised by the standard catalog
    pub fn standard() -> Self {
        let chains: Vec<ChainDescriptor> = STANDARD_CHAINS
            .iter()
            .map(|(id, name, kind)| ChainDescriptor::new(*id, *name, *kind))
            .collect();
        let index = chains.iter().enumerate().map(|(i, c)| (c.id, i)).collect();
        Self { chains, index }
    }

    pub fn get(&self, id: ChainId) -> Option<&ChainDescriptor> {
        self.index.get(&id).map(|&i| &self.chains[i])
    }

    pub fn contains(&self, id: ChainId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChainDescriptor> {
        self.chains.iter()
    }

    pub fn by_type(&self, chain_type: ChainType) -> impl Iterator<Item = &ChainDescriptor> {
        self.chains.iter().filter(move |c| c.chain_type == chain_type)
    }

    pub fn non_evm(&self) -> impl Iterator<Item = &ChainDescriptor> {
        self.chains.iter().filter(|c| !c.is_evm())
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}
