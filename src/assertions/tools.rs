//! Tools Assertions
//!
//! Bridges list `(from, to)` chain pairs while exchanges list flat chain ids;
//! both shapes are decoded into distinct types before any check runs.

use super::{decode, expect_non_empty, expect_schema, expect_status, AssertionFailure, AssertionReport};
use crate::api::{Bridge, Exchange, ToolsResponse};
use crate::domain::ChainId;
use crate::ports::ApiResponse;
use crate::schema::CompiledSchemas;

/// Bridge support demanded for a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeCoverage {
    /// Some bridge must touch the chain
    Required(ChainId),
    /// If any bridge is returned, one of them must touch the chain
    WhenPresent(ChainId),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolsExpectation {
    pub require_bridges: bool,
    pub require_exchanges: bool,
    /// At least one bridge or exchange in the response
    pub require_any: bool,
    /// First bridge and first exchange have key, name, logo and chains
    pub require_complete_entries: bool,
    pub bridge_coverage: Vec<BridgeCoverage>,
    /// Some exchange must support at least one of these chains
    pub exchange_supports_any: Vec<ChainId>,
}

impl ToolsExpectation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unfiltered listing: both collections non-empty with complete entries
    pub fn unfiltered() -> Self {
        Self {
            require_bridges: true,
            require_exchanges: true,
            require_complete_entries: true,
            ..Self::default()
        }
    }

    pub fn with_any_tool(mut self) -> Self {
        self.require_any = true;
        self
    }

    pub fn with_bridge_coverage(mut self, coverage: BridgeCoverage) -> Self {
        self.bridge_coverage.push(coverage);
        self
    }

    /// Filtered by `chains`: both collections non-empty, an exchange covers the filter
    pub fn filtered_by(chains: &[ChainId]) -> Self {
        Self {
            require_bridges: true,
            require_exchanges: true,
            exchange_supports_any: chains.to_vec(),
            ..Self::default()
        }
    }
}

pub fn assert_tools(
    response: &ApiResponse,
    expectation: &ToolsExpectation,
    schemas: &CompiledSchemas,
) -> Result<AssertionReport, AssertionFailure> {
    expect_status(response, &[200])?;
    expect_schema(&schemas.tools, &response.body)?;
    let tools: ToolsResponse = decode(response, "tools")?;
    let mut report = AssertionReport::new();

    if expectation.require_bridges && tools.bridges.is_empty() {
        return Err(AssertionFailure::EmptyCollection("bridges".into()));
    }
    if expectation.require_exchanges && tools.exchanges.is_empty() {
        return Err(AssertionFailure::EmptyCollection("exchanges".into()));
    }
    if expectation.require_any && tools.is_empty() {
        return Err(AssertionFailure::EmptyCollection("bridges and exchanges".into()));
    }

    if expectation.require_complete_entries {
        if let Some(bridge) = tools.bridges.first() {
            check_bridge(bridge)?;
        }
        if let Some(exchange) = tools.exchanges.first() {
            check_exchange(exchange)?;
        }
    }

    for coverage in &expectation.bridge_coverage {
        match *coverage {
            BridgeCoverage::Required(chain) => {
                if !tools.bridges.iter().any(|b| b.supports(chain)) {
                    return Err(missing_bridge(chain));
                }
            }
            BridgeCoverage::WhenPresent(chain) => {
                if tools.bridges.is_empty() {
                    report.warn(format!("no bridges returned for chain {}", chain));
                } else if !tools.bridges.iter().any(|b| b.supports(chain)) {
                    return Err(missing_bridge(chain));
                }
            }
        }
    }

    if !expectation.exchange_supports_any.is_empty() {
        let covered = tools
            .exchanges
            .iter()
            .any(|e| expectation.exchange_supports_any.iter().any(|c| e.supports(*c)));
        if !covered {
            return Err(AssertionFailure::Mismatch {
                field: "exchanges[].supportedChains".into(),
                expected: format!("one of [{}]", super::join(&expectation.exchange_supports_any)),
                observed: "no matching exchange".into(),
            });
        }
    }

    Ok(report)
}

fn missing_bridge(chain: ChainId) -> AssertionFailure {
    AssertionFailure::Mismatch {
        field: "bridges[].supportedChains".into(),
        expected: format!("a bridge touching chain {}", chain),
        observed: "none".into(),
    }
}

fn check_bridge(bridge: &Bridge) -> Result<(), AssertionFailure> {
    expect_non_empty("bridges[0].key", &bridge.key)?;
    expect_non_empty("bridges[0].name", &bridge.name)?;
    expect_non_empty("bridges[0].logoURI", &bridge.logo_uri)?;
    let pair = bridge
        .supported_chains
        .first()
        .ok_or_else(|| AssertionFailure::EmptyCollection("bridges[0].supportedChains".into()))?;
    if pair.from_chain_id.0 == 0 || pair.to_chain_id.0 == 0 {
        return Err(AssertionFailure::Mismatch {
            field: "bridges[0].supportedChains[0]".into(),
            expected: "positive chain ids".into(),
            observed: format!("{} -> {}", pair.from_chain_id, pair.to_chain_id),
        });
    }
    Ok(())
}

fn check_exchange(exchange: &Exchange) -> Result<(), AssertionFailure> {
    expect_non_empty("exchanges[0].key", &exchange.key)?;
    expect_non_empty("exchanges[0].name", &exchange.name)?;
    expect_non_empty("exchanges[0].logoURI", &exchange.logo_uri)?;
    if exchange.supported_chains.is_empty() {
        return Err(AssertionFailure::EmptyCollection("exchanges[0].supportedChains".into()));
    }
    Ok(())
}
