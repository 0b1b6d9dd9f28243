//! Negative cases
//!
//! Each case starts from a valid request for its endpoint and breaks exactly
//! one thing, then declares the rejection it expects.

use serde::Serialize;
use serde_json::{json, Value};

use crate::api::{ApiRequest, Endpoint, QuoteParams, RoutesRequest, TokenQuery, TokensQuery, ToolsQuery};
use crate::assertions::{EmptySuccess, ExpectedOutcome};
use crate::domain::{ChainId, FixtureRegistry};

/// Chain id no aggregator knows about
pub const UNKNOWN_CHAIN: &str = "999999";

/// Well-formed address that is not a token contract
pub const NON_EXISTENT_TOKEN: &str = "0x0000000000000000000000000000000000000001";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NegativeCase {
    pub name: String,
    pub endpoint: Endpoint,
    pub request: ApiRequest,
    pub expected: ExpectedOutcome,
}

impl NegativeCase {
    pub fn new(name: impl Into<String>, request: ApiRequest, expected: ExpectedOutcome) -> Self {
        Self {
            name: name.into(),
            endpoint: request.endpoint,
            request,
            expected,
        }
    }
}

/// Valid USDC Ethereum -> Polygon quote every quote case mutates
fn quote_base(fixtures: &FixtureRegistry) -> ApiRequest {
    QuoteParams::new(
        ChainId::ETHEREUM,
        ChainId::POLYGON,
        "USDC",
        "USDC",
        "1000000",
        fixtures.addresses.evm_default.clone(),
    )
    .to_request()
}

/// Valid USDC Ethereum -> Polygon routes body every routes case mutates
fn routes_base(fixtures: &FixtureRegistry) -> ApiRequest {
    RoutesRequest::new(
        ChainId::ETHEREUM,
        fixtures.resolve_token_address(ChainId::ETHEREUM, "USDC"),
        ChainId::POLYGON,
        fixtures.resolve_token_address(ChainId::POLYGON, "USDC"),
        "1000000",
    )
    .with_from_address(fixtures.addresses.evm_default.clone())
    .to_request()
}

pub fn quote_cases(fixtures: &FixtureRegistry) -> Vec<NegativeCase> {
    let base = quote_base(fixtures);
    let invalid = &fixtures.addresses.invalid;
    let validation = ExpectedOutcome::validation;

    vec![
        NegativeCase::new(
            "Invalid token returns error",
            base.clone().set_query("fromToken", "INVALID_TOKEN_XYZ"),
            validation(),
        ),
        NegativeCase::new("Zero amount returns 400", base.clone().set_query("fromAmount", "0"), validation()),
        NegativeCase::new(
            "Negative amount returns 400",
            base.clone().set_query("fromAmount", "-1000000"),
            validation(),
        ),
        NegativeCase::new(
            "Missing fromAmount returns 400",
            base.clone().without_query("fromAmount"),
            validation().with_hint("fromAmount"),
        ),
        NegativeCase::new("Missing fromChain returns 400", base.clone().without_query("fromChain"), validation()),
        NegativeCase::new("Missing toChain returns 400", base.clone().without_query("toChain"), validation()),
        NegativeCase::new("Missing toToken returns 400", base.clone().without_query("toToken"), validation()),
        NegativeCase::new(
            "Invalid chain ID returns 400",
            base.clone().set_query("fromChain", UNKNOWN_CHAIN),
            ExpectedOutcome::validation_or_not_found(),
        ),
        NegativeCase::new(
            "Invalid fromAddress format returns error",
            base.clone().set_query("fromAddress", invalid.not_hex.clone()),
            validation(),
        ),
        NegativeCase::new(
            "Short address format returns error",
            base.clone().set_query("fromAddress", invalid.too_short.clone()),
            validation(),
        ),
        NegativeCase::new(
            "Same token on same chain returns 400",
            base.clone().set_query("toChain", ChainId::ETHEREUM.to_string()),
            validation().with_hint("same token"),
        ),
        NegativeCase::new(
            "Negative slippage returns 400",
            base.clone().with_query("slippage", "-0.05"),
            validation(),
        ),
        NegativeCase::new(
            "Slippage exceeding 100% returns 400",
            base.clone().with_query("slippage", "1.5"),
            validation(),
        ),
        NegativeCase::new(
            "Invalid slippage format returns 400",
            base.clone().with_query("slippage", "invalid"),
            validation(),
        ),
        NegativeCase::new(
            "Invalid toAddress format returns 400",
            base.clone().with_query("toAddress", "invalid-address"),
            validation().with_hint("toAddress"),
        ),
        NegativeCase::new(
            "Short toAddress returns 400",
            base.clone().with_query("toAddress", "0x1234"),
            validation(),
        ),
        NegativeCase::new(
            "Invalid order value returns 400",
            base.with_query("order", "INVALID_ORDER"),
            validation(),
        ),
    ]
}

pub fn routes_cases(fixtures: &FixtureRegistry) -> Vec<NegativeCase> {
    let base = routes_base(fixtures);
    let validation = ExpectedOutcome::validation;

    vec![
        NegativeCase::new(
            "Zero amount returns 400",
            base.clone().set_body_field("fromAmount", json!("0")),
            validation().with_hint("amount"),
        ),
        NegativeCase::new(
            "Negative amount returns 400",
            base.clone().set_body_field("fromAmount", json!("-1000000")),
            validation().with_hint("amount"),
        ),
        NegativeCase::new(
            "Missing fromChainId returns 400",
            base.clone().without_body_field("fromChainId"),
            validation().with_hint("fromChainId"),
        ),
        NegativeCase::new(
            "Missing fromAmount returns 400",
            base.clone().without_body_field("fromAmount"),
            validation().with_hint("fromAmount"),
        ),
        NegativeCase::new(
            "Invalid token address returns error",
            base.clone()
                .set_body_field("fromTokenAddress", json!(fixtures.addresses.invalid.not_hex)),
            ExpectedOutcome::validation_or_not_found()
                .with_hint("token")
                .with_hint("address"),
        ),
        NegativeCase::new(
            "Invalid chain ID returns error",
            base.clone().set_body_field("fromChainId", json!(999_999)),
            ExpectedOutcome::validation_or_not_found().with_hint("chain"),
        ),
        NegativeCase::new(
            "Empty request body returns 400",
            base.clone().with_body(Value::Object(Default::default())),
            validation(),
        ),
        NegativeCase::new(
            "Non-existent token returns 400",
            base.set_body_field("fromTokenAddress", json!(NON_EXISTENT_TOKEN)),
            validation().with_hint("invalid").with_hint("deny list"),
        ),
    ]
}

pub fn tools_cases() -> Vec<NegativeCase> {
    [
        ("Invalid chain ID returns 400", "999999999"),
        ("Invalid chain format returns 400", "invalid"),
        ("Empty chains parameter returns error", ""),
        ("Very large chain ID returns 400", "99999999999999999999"),
        ("Negative chain ID returns 400", "-1"),
        ("Mixed valid and invalid chains returns 400", "1,invalid,137"),
    ]
    .into_iter()
    .map(|(name, chains)| {
        NegativeCase::new(name, ToolsQuery::raw(chains).to_request(), ExpectedOutcome::validation())
    })
    .collect()
}

pub fn token_cases(fixtures: &FixtureRegistry) -> Vec<NegativeCase> {
    let eth = ChainId::ETHEREUM.to_string();
    let validation = ExpectedOutcome::validation;

    vec![
        NegativeCase::new(
            "Invalid token symbol returns 400",
            TokenQuery::raw(eth.clone(), "INVALID_TOKEN_XYZ").to_request(),
            validation(),
        ),
        NegativeCase::new(
            "Missing token parameter returns 400",
            ApiRequest::get(Endpoint::Token).with_query("chain", eth.clone()),
            validation(),
        ),
        NegativeCase::new(
            "Missing chain parameter returns 400",
            ApiRequest::get(Endpoint::Token).with_query("token", "USDC"),
            validation(),
        ),
        NegativeCase::new(
            "Invalid chain ID returns 400",
            TokenQuery::raw(UNKNOWN_CHAIN, "USDC").to_request(),
            validation(),
        ),
        NegativeCase::new(
            "Non-numeric chain ID returns 400",
            TokenQuery::raw("invalid", "USDC").to_request(),
            validation(),
        ),
        NegativeCase::new(
            "Invalid token address format returns 400",
            TokenQuery::raw(eth.clone(), fixtures.addresses.invalid.not_hex.clone()).to_request(),
            validation(),
        ),
        NegativeCase::new(
            "Non-existent token address returns 400",
            TokenQuery::raw(eth, NON_EXISTENT_TOKEN).to_request(),
            validation(),
        ),
    ]
}

/// Listing cases; the API may answer an unknown chain with an empty 200
pub fn tokens_cases() -> Vec<NegativeCase> {
    vec![
        NegativeCase::new(
            "Invalid chain ID returns empty or error",
            TokensQuery::raw(UNKNOWN_CHAIN).to_request(),
            ExpectedOutcome::client_error().or_empty_success(EmptySuccess::TokensFor(UNKNOWN_CHAIN.into())),
        ),
        NegativeCase::new(
            "Non-numeric chain ID returns error",
            TokensQuery::raw("invalid").to_request(),
            ExpectedOutcome::client_error(),
        ),
        NegativeCase::new(
            "Negative chain ID returns error or empty",
            TokensQuery::raw("-1").to_request(),
            ExpectedOutcome::client_error().or_empty_success(EmptySuccess::TokensFor("-1".into())),
        ),
    ]
}
