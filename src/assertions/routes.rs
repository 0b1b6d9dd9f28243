//! Routes Assertions
//!
//! Invariants for `POST /advanced/routes`. With `order = CHEAPEST` the first
//! route must deliver at least as much as the second.

use super::{
    decode, expect_chain, expect_non_empty, expect_schema, expect_status, parse_amount, AssertionFailure,
    AssertionReport,
};
use crate::api::{Route, RouteOrder, RoutesRequest, RoutesResponse};
use crate::domain::ChainId;
use crate::ports::ApiResponse;
use crate::schema::CompiledSchemas;

#[derive(Debug, Clone, PartialEq)]
pub struct RoutesExpectation {
    pub from_chain: ChainId,
    pub to_chain: ChainId,
    pub order: Option<RouteOrder>,
    /// Fail unless the first route carries a non-empty `gasCostUSD`
    pub require_gas_cost_usd: bool,
    /// Fail unless the first step of the first route has id, type, tool and an estimate amount
    pub require_complete_first_step: bool,
}

impl RoutesExpectation {
    pub fn new(from_chain: ChainId, to_chain: ChainId) -> Self {
        Self {
            from_chain,
            to_chain,
            order: None,
            require_gas_cost_usd: false,
            require_complete_first_step: false,
        }
    }

    pub fn for_request(request: &RoutesRequest) -> Self {
        Self {
            order: request.options.order,
            ..Self::new(request.from_chain_id, request.to_chain_id)
        }
    }

    pub fn with_gas_cost_usd(mut self) -> Self {
        self.require_gas_cost_usd = true;
        self
    }

    pub fn with_complete_first_step(mut self) -> Self {
        self.require_complete_first_step = true;
        self
    }
}

pub fn assert_routes(
    response: &ApiResponse,
    expectation: &RoutesExpectation,
    schemas: &CompiledSchemas,
) -> Result<AssertionReport, AssertionFailure> {
    expect_status(response, &[200])?;
    expect_schema(&schemas.routes, &response.body)?;
    let body: RoutesResponse = decode(response, "routes")?;
    let mut report = AssertionReport::new();

    let first = body
        .routes
        .first()
        .ok_or_else(|| AssertionFailure::EmptyCollection("routes".into()))?;
    expect_non_empty("routes[0].id", &first.id)?;
    expect_chain("routes[0].fromChainId", expectation.from_chain, first.from_chain_id)?;
    expect_chain("routes[0].toChainId", expectation.to_chain, first.to_chain_id)?;
    expect_non_empty("routes[0].fromAmount", &first.from_amount)?;
    expect_non_empty("routes[0].toAmount", &first.to_amount)?;

    for (i, route) in body.routes.iter().enumerate() {
        if route.steps.is_empty() {
            return Err(AssertionFailure::EmptyCollection(format!("routes[{}].steps", i)));
        }
    }

    if !body.routes.iter().flat_map(|r| r.steps.iter()).any(|s| !s.tool.is_empty()) {
        return Err(AssertionFailure::MissingField("routes[].steps[].tool".into()));
    }

    if expectation.require_gas_cost_usd {
        match first.gas_cost_usd.as_deref() {
            Some(cost) => expect_non_empty("routes[0].gasCostUSD", cost)?,
            None => return Err(AssertionFailure::MissingField("routes[0].gasCostUSD".into())),
        }
    }

    if expectation.require_complete_first_step {
        check_first_step(first)?;
    }

    if expectation.order == Some(RouteOrder::Cheapest) {
        check_cheapest_ordering(&body.routes)?;
    }

    if body.routes.len() == 1 && expectation.order.is_some() {
        report.warn(format!(
            "only one route returned; {} ordering not exercised",
            expectation.order.map(|o| o.as_str()).unwrap_or_default()
        ));
    }

    Ok(report)
}

fn check_first_step(route: &Route) -> Result<(), AssertionFailure> {
    let step = route
        .first_step()
        .ok_or_else(|| AssertionFailure::EmptyCollection("routes[0].steps".into()))?;
    expect_non_empty("routes[0].steps[0].id", &step.id)?;
    expect_non_empty("routes[0].steps[0].type", &step.step_type)?;
    expect_non_empty("routes[0].steps[0].tool", &step.tool)?;
    expect_non_empty("routes[0].steps[0].estimate.toAmount", &step.estimate.to_amount)?;
    Ok(())
}

/// With two or more routes, `routes[0].toAmount >= routes[1].toAmount`
pub fn check_cheapest_ordering(routes: &[Route]) -> Result<(), AssertionFailure> {
    let (first, second) = match routes {
        [first, second, ..] => (first, second),
        _ => return Ok(()),
    };
    let first_amount = parse_amount("routes[0].toAmount", &first.to_amount)?;
    let second_amount = parse_amount("routes[1].toAmount", &second.to_amount)?;
    if first_amount < second_amount {
        return Err(AssertionFailure::RouteOrdering {
            first: first.to_amount.clone(),
            second: second.to_amount.clone(),
        });
    }
    Ok(())
}
