//! Aggregator API Contract Tests
//!
//! Golden response fixtures for every endpoint, checked against the compiled
//! schemas and the typed response models. Fixtures are immutable once
//! committed; a failure here means either the schema or the recorded
//! response shape changed.

use serde_json::Value;

use super::{CompiledSchemas, Constraint};
use crate::api::{
    ChainsResponse, ErrorEnvelope, QuoteResponse, RoutesResponse, TokenDetails, TokensResponse, ToolsResponse,
};
use crate::domain::{ChainId, ErrorCode};

fn load_fixture(name: &str) -> Value {
    let fixture_path = format!("{}/fixtures/lifi/{}.json", env!("CARGO_MANIFEST_DIR"), name);
    let content = std::fs::read_to_string(&fixture_path).unwrap_or_else(|e| {
        panic!("CONTRACT VIOLATION: Failed to load fixture '{}': {}", fixture_path, e)
    });
    serde_json::from_str(&content).unwrap_or_else(|e| {
        panic!("CONTRACT VIOLATION: Failed to parse fixture '{}' as JSON: {}", fixture_path, e)
    })
}

fn schemas() -> CompiledSchemas {
    CompiledSchemas::standard().expect("standard schemas compile")
}

fn assert_conforms(validator: &super::CompiledValidator, fixture_name: &str) -> Value {
    let fixture = load_fixture(fixture_name);
    let verdict = validator.validate(&fixture);
    assert!(
        verdict.is_valid(),
        "CONTRACT VIOLATION: fixture '{}' does not match its schema: {}",
        fixture_name,
        verdict.error_text()
    );
    fixture
}

mod quote_contract_tests {
    use super::*;

    fn quote_fixture_names() -> Vec<&'static str> {
        vec!["quote_swap_v1", "quote_bridge_v1"]
    }

    #[test]
    fn test_quote_fixtures_match_schema() {
        let schemas = schemas();
        for name in quote_fixture_names() {
            assert_conforms(&schemas.quote, name);
        }
    }

    #[test]
    fn test_quote_fixtures_decode_into_model() {
        for name in quote_fixture_names() {
            let fixture = load_fixture(name);
            let quote: QuoteResponse = serde_json::from_value(fixture).unwrap_or_else(|e| {
                panic!("CONTRACT VIOLATION: fixture '{}' does not decode as a quote: {}", name, e)
            });
            assert!(
                !quote.estimate.gas_costs.is_empty(),
                "CONTRACT VIOLATION: Field 'estimate.gasCosts' is empty in fixture '{}'",
                name
            );
            assert!(
                quote.transaction_request.is_some(),
                "CONTRACT VIOLATION: Field 'transactionRequest' is missing in fixture '{}'",
                name
            );
        }
    }

    #[test]
    fn test_bridge_fixture_crosses_chains() {
        let quote: QuoteResponse = serde_json::from_value(load_fixture("quote_bridge_v1")).unwrap();
        assert_eq!(quote.action.from_chain_id, ChainId::ETHEREUM);
        assert_eq!(quote.action.to_chain_id, ChainId::POLYGON);
        assert!(quote.is_cross_chain());
    }

    #[test]
    fn test_missing_to_amount_is_single_violation() {
        let schemas = schemas();
        let mut fixture = load_fixture("quote_swap_v1");
        fixture["estimate"]
            .as_object_mut()
            .unwrap()
            .remove("toAmount");

        let verdict = schemas.quote.validate(&fixture);
        assert_eq!(verdict.violations().len(), 1, "{}", verdict.error_text());
        assert_eq!(verdict.violations()[0].path, "estimate.toAmount");
        assert_eq!(verdict.violations()[0].constraint, Constraint::Required);
    }

    #[test]
    fn test_bad_gas_token_decimals_reports_full_path() {
        let schemas = schemas();
        let mut fixture = load_fixture("quote_swap_v1");
        fixture["estimate"]["gasCosts"][0]["token"]["decimals"] = Value::from(42);

        let verdict = schemas.quote.validate(&fixture);
        assert_eq!(verdict.violations().len(), 1);
        assert_eq!(verdict.violations()[0].path, "estimate.gasCosts[0].token.decimals");
    }

    #[test]
    fn test_unknown_step_type_and_float_amount_both_reported() {
        let schemas = schemas();
        let mut fixture = load_fixture("quote_bridge_v1");
        fixture["type"] = Value::from("teleport");
        fixture["estimate"]["toAmountMin"] = Value::from("994010.5");

        let verdict = schemas.quote.validate(&fixture);
        assert_eq!(verdict.violations().len(), 2, "{}", verdict.error_text());
    }
}

mod routes_contract_tests {
    use super::*;

    #[test]
    fn test_routes_fixture_matches_schema_and_model() {
        let schemas = schemas();
        let fixture = assert_conforms(&schemas.routes, "routes_cheapest_v1");
        let routes: RoutesResponse = serde_json::from_value(fixture).unwrap_or_else(|e| {
            panic!("CONTRACT VIOLATION: routes fixture does not decode: {}", e)
        });
        assert_eq!(routes.routes.len(), 2);
        for route in &routes.routes {
            assert!(
                !route.steps.is_empty(),
                "CONTRACT VIOLATION: Route '{}' has no steps",
                route.id
            );
        }
    }

    #[test]
    fn test_empty_steps_violates_min_items() {
        let schemas = schemas();
        let mut fixture = load_fixture("routes_cheapest_v1");
        fixture["routes"][1]["steps"] = Value::Array(vec![]);

        let verdict = schemas.routes.validate(&fixture);
        assert_eq!(verdict.violations().len(), 1);
        assert_eq!(verdict.violations()[0].path, "routes[1].steps");
        assert!(matches!(verdict.violations()[0].constraint, Constraint::MinItems { limit: 1 }));
    }
}

mod tools_contract_tests {
    use super::*;

    #[test]
    fn test_tools_fixture_matches_schema_and_model() {
        let schemas = schemas();
        let fixture = assert_conforms(&schemas.tools, "tools_v1");
        let tools: ToolsResponse = serde_json::from_value(fixture).unwrap();
        assert!(tools.bridges.iter().any(|b| b.supports(ChainId::SOLANA)));
        assert!(tools.bridges.iter().any(|b| b.supports(ChainId::BITCOIN)));
        assert!(tools.exchanges.iter().any(|e| e.supports(ChainId::SUI)));
    }

    #[test]
    fn test_flat_bridge_chains_are_a_violation() {
        let schemas = schemas();
        let mut fixture = load_fixture("tools_v1");
        fixture["bridges"][0]["supportedChains"] = serde_json::json!([1, 137]);

        let verdict = schemas.tools.validate(&fixture);
        assert_eq!(verdict.violations().len(), 2);
        assert_eq!(verdict.violations()[0].path, "bridges[0].supportedChains[0]");
    }
}

mod tokens_contract_tests {
    use super::*;

    #[test]
    fn test_tokens_listing_fixture() {
        let schemas = schemas();
        let fixture = assert_conforms(&schemas.tokens, "tokens_v1");
        let listing: TokensResponse = serde_json::from_value(fixture).unwrap();
        for chain in [ChainId::ETHEREUM, ChainId::POLYGON, ChainId::SOLANA] {
            let tokens = listing.for_chain(chain).unwrap_or_else(|| {
                panic!("CONTRACT VIOLATION: Field 'tokens.{}' is missing", chain)
            });
            assert!(!tokens.is_empty());
        }
    }

    #[test]
    fn test_token_detail_fixtures() {
        let schemas = schemas();
        for name in ["token_usdc_v1", "token_eth_v1"] {
            let fixture = assert_conforms(&schemas.token_details, name);
            let details: TokenDetails = serde_json::from_value(fixture).unwrap();
            assert!(
                !details.price_usd.is_empty(),
                "CONTRACT VIOLATION: Field 'priceUSD' is empty in fixture '{}'",
                name
            );
        }
    }

    #[test]
    fn test_market_cap_must_be_numeric() {
        let schemas = schemas();
        let mut fixture = load_fixture("token_usdc_v1");
        fixture["marketCapUSD"] = Value::from("32451877443.12");
        let verdict = schemas.token_details.validate(&fixture);
        assert_eq!(verdict.violations().len(), 1);
        assert_eq!(verdict.violations()[0].path, "marketCapUSD");
    }

    #[test]
    fn test_chains_fixture() {
        let schemas = schemas();
        let fixture = assert_conforms(&schemas.chains, "chains_v1");
        let chains: ChainsResponse = serde_json::from_value(fixture).unwrap();
        assert!(chains.chains.iter().any(|c| c.id == ChainId::SUI));
    }
}

mod error_contract_tests {
    use super::*;

    #[test]
    fn test_error_fixtures_match_envelope() {
        let schemas = schemas();
        let cases = [
            ("error_validation_v1", ErrorCode::Validation),
            ("error_not_found_v1", ErrorCode::NotFound),
        ];
        for (name, expected) in cases {
            let fixture = assert_conforms(&schemas.error, name);
            let envelope: ErrorEnvelope = serde_json::from_value(fixture).unwrap();
            assert_eq!(
                envelope.error_code(),
                Some(expected),
                "CONTRACT VIOLATION: Field 'code' in fixture '{}' is not {}",
                name,
                expected
            );
        }
    }

    #[test]
    fn test_empty_message_violates_envelope() {
        let schemas = schemas();
        let verdict = schemas.error.validate(&serde_json::json!({"message": "", "code": 1011}));
        assert_eq!(verdict.violations().len(), 1);
        assert!(matches!(verdict.violations()[0].constraint, Constraint::MinLength { limit: 1 }));
    }
}
