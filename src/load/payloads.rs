//! Fixed payload pools
//!
//! Every iteration picks one request at random from the pool of its target.

use rand::seq::SliceRandom;
use rand::Rng;

use super::script::LoadTarget;
use super::LoadError;
use crate::api::{ApiRequest, QuoteParams, RoutesRequest, ToolsQuery};
use crate::domain::{ChainId, FixtureRegistry, NATIVE_TOKEN_ADDRESS};

const ROUTES_SLIPPAGE: f64 = 0.03;

#[derive(Debug, Clone)]
pub struct PayloadPool {
    target: LoadTarget,
    requests: Vec<ApiRequest>,
}

impl PayloadPool {
    pub fn new(target: LoadTarget, requests: Vec<ApiRequest>) -> Result<Self, LoadError> {
        if requests.is_empty() {
            return Err(LoadError::EmptyPool(target.to_string()));
        }
        Ok(Self { target, requests })
    }

    pub fn standard(target: LoadTarget, fixtures: &FixtureRegistry) -> Result<Self, LoadError> {
        let requests = match target {
            LoadTarget::Quote => quote_payloads(fixtures),
            LoadTarget::Routes => routes_payloads(fixtures),
            LoadTarget::Tools => tools_payloads(),
        };
        Self::new(target, requests)
    }

    pub fn target(&self) -> LoadTarget {
        self.target
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn requests(&self) -> &[ApiRequest] {
        &self.requests
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &ApiRequest {
        // non-empty by construction
        self.requests.choose(rng).unwrap_or(&self.requests[0])
    }
}

fn quote_payloads(fixtures: &FixtureRegistry) -> Vec<ApiRequest> {
    let from = fixtures.addresses.evm_default.as_str();
    [
        (ChainId::ETHEREUM, ChainId::POLYGON, "USDC", "USDC", "1000000"),
        (ChainId::ETHEREUM, ChainId::ETHEREUM, "ETH", "USDC", "100000000000000000"),
        (ChainId::POLYGON, ChainId::ARBITRUM, "USDC", "USDC", "5000000"),
        (ChainId::POLYGON, ChainId::POLYGON, NATIVE_TOKEN_ADDRESS, "USDC", "1000000000000000000"),
    ]
    .into_iter()
    .map(|(from_chain, to_chain, from_token, to_token, amount)| {
        QuoteParams::new(from_chain, to_chain, from_token, to_token, amount, from).to_request()
    })
    .collect()
}

fn routes_payloads(fixtures: &FixtureRegistry) -> Vec<ApiRequest> {
    let from = fixtures.addresses.evm_default.as_str();
    [
        (ChainId::ETHEREUM, "USDC", ChainId::POLYGON, "USDC", "10000000"),
        (ChainId::ETHEREUM, "ETH", ChainId::ETHEREUM, "USDC", "100000000000000000"),
        (ChainId::ETHEREUM, "USDC", ChainId::ARBITRUM, "USDC", "50000000"),
    ]
    .into_iter()
    .map(|(from_chain, from_token, to_chain, to_token, amount)| {
        RoutesRequest::new(
            from_chain,
            fixtures.resolve_token_address(from_chain, from_token),
            to_chain,
            fixtures.resolve_token_address(to_chain, to_token),
            amount,
        )
        .with_from_address(from)
        .with_slippage(ROUTES_SLIPPAGE)
        .to_request()
    })
    .collect()
}

fn tools_payloads() -> Vec<ApiRequest> {
    let mut requests = vec![ToolsQuery::all().to_request()];
    let filters: [&[ChainId]; 7] = [
        &[ChainId::ETHEREUM],
        &[ChainId::POLYGON],
        &[ChainId::ETHEREUM, ChainId::POLYGON],
        &[ChainId::ETHEREUM, ChainId::POLYGON, ChainId::ARBITRUM],
        &[ChainId::SOLANA],
        &[ChainId::BITCOIN],
        &[ChainId::SUI],
    ];
    requests.extend(filters.iter().map(|chains| ToolsQuery::for_chains(chains).to_request()));
    requests
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Endpoint;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_standard_pool_sizes() {
        let fixtures = FixtureRegistry::standard();
        assert_eq!(PayloadPool::standard(LoadTarget::Quote, &fixtures).unwrap().len(), 4);
        assert_eq!(PayloadPool::standard(LoadTarget::Routes, &fixtures).unwrap().len(), 3);
        assert_eq!(PayloadPool::standard(LoadTarget::Tools, &fixtures).unwrap().len(), 8);
    }

    #[test]
    fn test_pool_requests_target_their_endpoint() {
        let fixtures = FixtureRegistry::standard();
        let pool = PayloadPool::standard(LoadTarget::Routes, &fixtures).unwrap();
        for request in pool.requests() {
            assert_eq!(request.endpoint, Endpoint::Routes);
            let body = request.body.as_ref().unwrap();
            assert!(body["fromTokenAddress"].as_str().unwrap().starts_with("0x"));
            assert_eq!(body["fromAddress"], fixtures.addresses.evm_default.as_str());
        }
    }

    #[test]
    fn test_tools_pool_includes_unfiltered_and_non_evm() {
        let pool = PayloadPool::standard(LoadTarget::Tools, &FixtureRegistry::standard()).unwrap();
        let filters: Vec<Option<&str>> = pool.requests().iter().map(|r| r.query_value("chains")).collect();
        assert!(filters.contains(&None));
        assert!(filters.contains(&Some("1,137")));
        assert!(filters.contains(&Some("1151111081099710")));
    }

    #[test]
    fn test_pick_is_deterministic_for_seeded_rng() {
        let pool = PayloadPool::standard(LoadTarget::Quote, &FixtureRegistry::standard()).unwrap();
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            assert_eq!(pool.pick(&mut a), pool.pick(&mut b));
        }
    }

    #[test]
    fn test_empty_pool_rejected() {
        assert!(matches!(
            PayloadPool::new(LoadTarget::Tools, Vec::new()),
            Err(LoadError::EmptyPool(_))
        ));
    }
}
