//! Advanced Routes Types
//!
//! JSON body and response structures for `POST /advanced/routes`.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::quote::{Step, TokenInfo};
use super::request::{ApiRequest, Endpoint};
use crate::domain::{ChainId, ScenarioCase, TokenRegistry};

/// Route preference understood by both quote and routes endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RouteOrder {
    Fastest,
    Cheapest,
}

impl RouteOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteOrder::Fastest => "FASTEST",
            RouteOrder::Cheapest => "CHEAPEST",
        }
    }
}

impl fmt::Display for RouteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slippage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<RouteOrder>,
}

impl RouteOptions {
    fn is_empty(&self) -> bool {
        self.slippage.is_none() && self.order.is_none()
    }
}

/// Body for `POST /advanced/routes`. Tokens are addresses, never symbols.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutesRequest {
    pub from_chain_id: ChainId,
    pub from_amount: String,
    pub from_token_address: String,
    pub to_chain_id: ChainId,
    pub to_token_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_address: Option<String>,
    #[serde(skip_serializing_if = "RouteOptions::is_empty")]
    pub options: RouteOptions,
}

impl RoutesRequest {
    pub fn new(
        from_chain_id: ChainId,
        from_token_address: impl Into<String>,
        to_chain_id: ChainId,
        to_token_address: impl Into<String>,
        from_amount: impl Into<String>,
    ) -> Self {
        Self {
            from_chain_id,
            from_amount: from_amount.into(),
            from_token_address: from_token_address.into(),
            to_chain_id,
            to_token_address: to_token_address.into(),
            from_address: None,
            to_address: None,
            options: RouteOptions::default(),
        }
    }

    /// Routes body for a catalog pair, resolving symbols to addresses on each side
    pub fn from_scenario(case: &ScenarioCase, tokens: &TokenRegistry) -> Self {
        Self::new(
            case.from_chain,
            tokens.resolve_token_address(case.from_chain, &case.from_token),
            case.to_chain,
            tokens.resolve_token_address(case.to_chain, &case.to_token),
            case.from_amount.clone(),
        )
    }

    pub fn with_from_address(mut self, address: impl Into<String>) -> Self {
        self.from_address = Some(address.into());
        self
    }

    pub fn with_to_address(mut self, address: impl Into<String>) -> Self {
        self.to_address = Some(address.into());
        self
    }

    pub fn with_slippage(mut self, slippage: f64) -> Self {
        self.options.slippage = Some(slippage);
        self
    }

    pub fn with_order(mut self, order: RouteOrder) -> Self {
        self.options.order = Some(order);
        self
    }

    pub fn to_body(&self) -> Value {
        // Plain data with string keys; serialization cannot fail
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn to_request(&self) -> ApiRequest {
        ApiRequest::post(Endpoint::Routes, self.to_body())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: String,
    pub from_chain_id: ChainId,
    pub from_amount: String,
    pub from_token: TokenInfo,
    pub to_chain_id: ChainId,
    pub to_amount: String,
    pub to_token: TokenInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_amount_min: Option<String>,
    #[serde(default, rename = "fromAmountUSD", skip_serializing_if = "Option::is_none")]
    pub from_amount_usd: Option<String>,
    #[serde(default, rename = "toAmountUSD", skip_serializing_if = "Option::is_none")]
    pub to_amount_usd: Option<String>,
    #[serde(default, rename = "gasCostUSD", skip_serializing_if = "Option::is_none")]
    pub gas_cost_usd: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_address: Option<String>,
    pub steps: Vec<Step>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Route {
    pub fn first_step(&self) -> Option<&Step> {
        self.steps.first()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutesResponse {
    pub routes: Vec<Route>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unavailable_routes: Option<Value>,
}
