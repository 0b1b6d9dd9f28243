//! Functional Suite
//!
//! Turns the scenario catalog into concrete cases. A case owns the request it
//! sends and the expectation it checks the response against; cases share
//! nothing else.

use std::collections::BTreeSet;

use rust_decimal_macros::dec;
use serde::Serialize;

use crate::api::{
    ApiRequest, ChainsQuery, ChainsResponse, Endpoint, QuoteParams, RouteOrder, RoutesRequest, TokenQuery,
    TokensQuery, ToolsQuery,
};
use crate::assertions::{
    assert_quote, assert_rejection, assert_routes, assert_token_details, assert_token_listing, assert_tools,
    decode, expect_schema, expect_status, AssertionFailure, AssertionReport, BridgeCoverage, PriceRange,
    QuoteExpectation, RoutesExpectation, TokenDetailExpectation, TokenListingExpectation, ToolsExpectation,
};
use crate::catalog::{NegativeCase, ScenarioCatalog};
use crate::domain::{ChainId, ChainType, FixtureRegistry, Tag, NATIVE_TOKEN_ADDRESS};
use crate::ports::ApiResponse;
use crate::schema::CompiledSchemas;

#[derive(Debug, Clone, PartialEq)]
pub enum CaseKind {
    Quote {
        params: QuoteParams,
        expectation: QuoteExpectation,
    },
    Routes {
        request: RoutesRequest,
        expectation: RoutesExpectation,
    },
    Tools {
        query: ToolsQuery,
        expectation: ToolsExpectation,
    },
    TokenListing {
        query: TokensQuery,
        expectation: TokenListingExpectation,
    },
    TokenDetails {
        query: TokenQuery,
        expectation: TokenDetailExpectation,
    },
    Chains {
        query: ChainsQuery,
    },
    Negative(NegativeCase),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuiteCase {
    pub name: String,
    pub tags: BTreeSet<Tag>,
    pub kind: CaseKind,
}

impl SuiteCase {
    pub fn new(name: impl Into<String>, tags: impl IntoIterator<Item = Tag>, kind: CaseKind) -> Self {
        Self {
            name: name.into(),
            tags: tags.into_iter().collect(),
            kind,
        }
    }

    pub fn request(&self) -> ApiRequest {
        match &self.kind {
            CaseKind::Quote { params, .. } => params.to_request(),
            CaseKind::Routes { request, .. } => request.to_request(),
            CaseKind::Tools { query, .. } => query.to_request(),
            CaseKind::TokenListing { query, .. } => query.to_request(),
            CaseKind::TokenDetails { query, .. } => query.to_request(),
            CaseKind::Chains { query } => query.to_request(),
            CaseKind::Negative(case) => case.request.clone(),
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        match &self.kind {
            CaseKind::Quote { .. } => Endpoint::Quote,
            CaseKind::Routes { .. } => Endpoint::Routes,
            CaseKind::Tools { .. } => Endpoint::Tools,
            CaseKind::TokenListing { .. } => Endpoint::Tokens,
            CaseKind::TokenDetails { .. } => Endpoint::Token,
            CaseKind::Chains { .. } => Endpoint::Chains,
            CaseKind::Negative(case) => case.endpoint,
        }
    }

    pub fn is_negative(&self) -> bool {
        matches!(self.kind, CaseKind::Negative(_))
    }

    pub fn check(
        &self,
        response: &ApiResponse,
        schemas: &CompiledSchemas,
        strict_hints: bool,
    ) -> Result<AssertionReport, AssertionFailure> {
        match &self.kind {
            CaseKind::Quote { expectation, .. } => assert_quote(response, expectation, schemas),
            CaseKind::Routes { expectation, .. } => assert_routes(response, expectation, schemas),
            CaseKind::Tools { expectation, .. } => assert_tools(response, expectation, schemas),
            CaseKind::TokenListing { expectation, .. } => assert_token_listing(response, expectation, schemas),
            CaseKind::TokenDetails { expectation, .. } => assert_token_details(response, expectation, schemas),
            CaseKind::Chains { .. } => assert_chains(response, schemas),
            CaseKind::Negative(case) => assert_rejection(response, &case.expected, schemas, strict_hints),
        }
    }
}

fn assert_chains(response: &ApiResponse, schemas: &CompiledSchemas) -> Result<AssertionReport, AssertionFailure> {
    expect_status(response, &[200])?;
    expect_schema(&schemas.chains, &response.body)?;
    let listing: ChainsResponse = decode(response, "chains")?;
    if listing.chains.is_empty() {
        return Err(AssertionFailure::EmptyCollection("chains".into()));
    }
    Ok(AssertionReport::new())
}

/// Case selection; an empty list matches everything
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuiteFilter {
    pub tags: Vec<Tag>,
    pub endpoints: Vec<Endpoint>,
}

impl SuiteFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.tags.extend(tags);
        self
    }

    pub fn with_endpoints(mut self, endpoints: impl IntoIterator<Item = Endpoint>) -> Self {
        self.endpoints.extend(endpoints);
        self
    }

    pub fn matches(&self, case: &SuiteCase) -> bool {
        let tag_ok = self.tags.is_empty() || self.tags.iter().any(|t| case.tags.contains(t));
        let endpoint_ok = self.endpoints.is_empty() || self.endpoints.contains(&case.endpoint());
        tag_ok && endpoint_ok
    }
}

pub fn filter_cases(cases: Vec<SuiteCase>, filter: &SuiteFilter) -> Vec<SuiteCase> {
    cases.into_iter().filter(|c| filter.matches(c)).collect()
}

/// Every functional case: happy pairs, endpoint-specific checks and negatives
pub fn standard_suite(catalog: &ScenarioCatalog, fixtures: &FixtureRegistry) -> Vec<SuiteCase> {
    let mut cases = Vec::new();
    let from_address = fixtures.addresses.evm_default.as_str();

    for pair in &catalog.happy_path {
        let params = QuoteParams::from_scenario(pair, from_address);
        cases.push(SuiteCase::new(
            format!("Quote: {}", pair.name),
            pair.tags.iter().copied(),
            CaseKind::Quote {
                expectation: QuoteExpectation::for_params(&params),
                params,
            },
        ));

        let request = RoutesRequest::from_scenario(pair, &fixtures.tokens).with_from_address(from_address);
        cases.push(SuiteCase::new(
            format!("Routes: {}", pair.name),
            pair.tags.iter().copied(),
            CaseKind::Routes {
                expectation: RoutesExpectation::for_request(&request),
                request,
            },
        ));
    }

    cases.extend(quote_checks(from_address));
    cases.extend(routes_checks(fixtures));
    cases.extend(tools_checks(catalog));
    cases.extend(token_checks(catalog, fixtures));

    for negative in &catalog.negative {
        cases.push(SuiteCase::new(
            format!("{} rejects: {}", negative.endpoint, negative.name),
            [Tag::Negative, Tag::Regression],
            CaseKind::Negative(negative.clone()),
        ));
    }
    cases
}

fn quote_case(
    name: &str,
    tags: impl IntoIterator<Item = Tag>,
    params: QuoteParams,
    refine: fn(QuoteExpectation) -> QuoteExpectation,
) -> SuiteCase {
    SuiteCase::new(
        name,
        tags,
        CaseKind::Quote {
            expectation: refine(QuoteExpectation::for_params(&params)),
            params,
        },
    )
}

fn quote_checks(from_address: &str) -> Vec<SuiteCase> {
    vec![
        quote_case(
            "Quote includes transactionRequest for EVM swap",
            [Tag::Regression, Tag::Swap],
            QuoteParams::new(ChainId::ETHEREUM, ChainId::ETHEREUM, "USDC", "USDT", "10000000", from_address),
            QuoteExpectation::with_transaction_request,
        ),
        quote_case(
            "Quote includes gas cost estimates",
            [Tag::Regression, Tag::Bridge],
            QuoteParams::new(ChainId::ETHEREUM, ChainId::POLYGON, "USDC", "USDC", "10000000", from_address),
            QuoteExpectation::with_gas_costs,
        ),
        quote_case(
            "Quote includes execution duration",
            [Tag::Regression, Tag::Bridge],
            QuoteParams::new(ChainId::ETHEREUM, ChainId::ARBITRUM, "USDC", "USDC", "5000000", from_address),
            QuoteExpectation::with_execution_duration,
        ),
        quote_case(
            "Quote echoes slippage and toAddress",
            [Tag::Regression, Tag::Bridge],
            QuoteParams::new(ChainId::ETHEREUM, ChainId::POLYGON, "USDC", "USDC", "1000000", from_address)
                .with_slippage(0.01)
                .with_to_address(from_address),
            |e| e,
        ),
    ]
}

fn routes_checks(fixtures: &FixtureRegistry) -> Vec<SuiteCase> {
    let base = |amount: &str| {
        RoutesRequest::new(
            ChainId::ETHEREUM,
            fixtures.resolve_token_address(ChainId::ETHEREUM, "USDC"),
            ChainId::POLYGON,
            fixtures.resolve_token_address(ChainId::POLYGON, "USDC"),
            amount,
        )
        .with_from_address(fixtures.addresses.evm_default.as_str())
    };
    let case = |name: &str, request: RoutesRequest, expectation: RoutesExpectation| {
        SuiteCase::new(name, [Tag::Regression, Tag::Bridge], CaseKind::Routes { request, expectation })
    };

    let plain = base("10000000");
    let cheapest = base("100000000").with_order(RouteOrder::Cheapest);
    vec![
        case(
            "Routes include tool information",
            plain.clone(),
            RoutesExpectation::for_request(&plain),
        ),
        case(
            "Routes include gasCostUSD",
            plain.clone(),
            RoutesExpectation::for_request(&plain).with_gas_cost_usd(),
        ),
        case(
            "Routes first step is complete",
            plain.clone(),
            RoutesExpectation::for_request(&plain).with_complete_first_step(),
        ),
        case(
            "CHEAPEST routes are ordered by toAmount",
            cheapest.clone(),
            RoutesExpectation::for_request(&cheapest),
        ),
    ]
}

fn tools_checks(catalog: &ScenarioCatalog) -> Vec<SuiteCase> {
    let mut cases = vec![SuiteCase::new(
        "Tools lists bridges and exchanges",
        [Tag::Smoke, Tag::Regression],
        CaseKind::Tools {
            query: ToolsQuery::all(),
            expectation: ToolsExpectation::unfiltered(),
        },
    )];

    for chain in &catalog.listing_chains {
        // Solana support is established; other non-EVM families may have no bridges yet
        let coverage = if chain.id == ChainId::SOLANA {
            BridgeCoverage::Required(chain.id)
        } else {
            BridgeCoverage::WhenPresent(chain.id)
        };
        cases.push(SuiteCase::new(
            format!("Tools support {}", chain.display_name),
            [Tag::Regression, Tag::Bridge],
            CaseKind::Tools {
                query: ToolsQuery::for_chains(&[chain.id]),
                expectation: ToolsExpectation::new().with_any_tool().with_bridge_coverage(coverage),
            },
        ));
    }

    let filter = [ChainId::ETHEREUM, ChainId::POLYGON];
    cases.push(SuiteCase::new(
        "Tools filtered by Ethereum and Polygon",
        [Tag::Regression],
        CaseKind::Tools {
            query: ToolsQuery::for_chains(&filter),
            expectation: ToolsExpectation::filtered_by(&filter),
        },
    ));
    cases
}

fn token_checks(catalog: &ScenarioCatalog, fixtures: &FixtureRegistry) -> Vec<SuiteCase> {
    let mut cases = vec![
        SuiteCase::new(
            "Tokens lists Ethereum tokens",
            [Tag::Smoke, Tag::Regression],
            CaseKind::TokenListing {
                query: TokensQuery::for_chains(&[ChainId::ETHEREUM]),
                expectation: TokenListingExpectation::for_chains(&[ChainId::ETHEREUM])
                    .with_complete_first()
                    .with_priced(ChainId::ETHEREUM, "ETH"),
            },
        ),
        SuiteCase::new(
            "Tokens lists multiple chains",
            [Tag::Regression],
            CaseKind::TokenListing {
                query: TokensQuery::for_chains(&[ChainId::ETHEREUM, ChainId::POLYGON]),
                expectation: TokenListingExpectation::for_chains(&[ChainId::ETHEREUM, ChainId::POLYGON]),
            },
        ),
    ];

    for chain in catalog.listing_chains.iter().filter(|c| c.chain_type == ChainType::Svm) {
        cases.push(SuiteCase::new(
            format!("Tokens lists {} tokens", chain.display_name),
            [Tag::Regression],
            CaseKind::TokenListing {
                query: TokensQuery::for_chains(&[chain.id]),
                expectation: TokenListingExpectation::for_chains(&[chain.id]),
            },
        ));
    }

    let usdc_address = fixtures.resolve_token_address(ChainId::ETHEREUM, "USDC");
    let detail = |name: &str, tags: Vec<Tag>, query: TokenQuery, expectation: TokenDetailExpectation| {
        SuiteCase::new(name, tags, CaseKind::TokenDetails { query, expectation })
    };
    let usdc = || TokenDetailExpectation::new(ChainId::ETHEREUM);

    cases.extend([
        detail(
            "USDC details on Ethereum",
            vec![Tag::Smoke, Tag::Regression],
            TokenQuery::new(ChainId::ETHEREUM, "USDC"),
            usdc().with_symbol("USDC").with_decimals(6),
        ),
        detail(
            "USDC price within stablecoin band",
            vec![Tag::Regression],
            TokenQuery::new(ChainId::ETHEREUM, "USDC"),
            usdc().with_price(PriceRange::stablecoin()),
        ),
        detail(
            "USDC lookup by address",
            vec![Tag::Regression],
            TokenQuery::new(ChainId::ETHEREUM, usdc_address.clone()),
            usdc().with_symbol("USDC").with_address(usdc_address),
        ),
        detail(
            "USDC market data is well typed",
            vec![Tag::Regression],
            TokenQuery::new(ChainId::ETHEREUM, "USDC"),
            usdc().with_market_data(),
        ),
        detail(
            "Native ETH details",
            vec![Tag::Regression],
            TokenQuery::new(ChainId::ETHEREUM, NATIVE_TOKEN_ADDRESS),
            TokenDetailExpectation::new(ChainId::ETHEREUM)
                .with_decimals(18)
                .with_price(PriceRange::Above(dec!(100))),
        ),
        detail(
            "USDC details on Polygon",
            vec![Tag::Regression],
            TokenQuery::new(ChainId::POLYGON, "USDC"),
            TokenDetailExpectation::new(ChainId::POLYGON)
                .with_symbol("USDC")
                .with_decimals(6),
        ),
    ]);

    cases.push(SuiteCase::new(
        "Chains lists EVM chains",
        [Tag::Regression],
        CaseKind::Chains {
            query: ChainsQuery::of_types(&[ChainType::Evm]),
        },
    ));
    cases
}
