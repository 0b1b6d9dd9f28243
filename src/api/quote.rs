//! Quote Types
//!
//! Request parameters and response structures for `GET /quote`. The response
//! shape (a single step) is shared with the steps inside `/advanced/routes`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::request::{ApiRequest, Endpoint};
use super::routes::RouteOrder;
use crate::domain::{ChainId, ScenarioCase};

/// Query parameters for `GET /quote`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteParams {
    pub from_chain: ChainId,
    pub to_chain: ChainId,
    /// Symbol or address
    pub from_token: String,
    pub to_token: String,
    /// Smallest unit, decimal string
    pub from_amount: String,
    pub from_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_address: Option<String>,
    /// Fraction, e.g. 0.03 for 3%
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slippage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<RouteOrder>,
}

impl QuoteParams {
    pub fn new(
        from_chain: ChainId,
        to_chain: ChainId,
        from_token: impl Into<String>,
        to_token: impl Into<String>,
        from_amount: impl Into<String>,
        from_address: impl Into<String>,
    ) -> Self {
        Self {
            from_chain,
            to_chain,
            from_token: from_token.into(),
            to_token: to_token.into(),
            from_amount: from_amount.into(),
            from_address: from_address.into(),
            to_address: None,
            slippage: None,
            order: None,
        }
    }

    /// Quote parameters for a catalog pair; tokens are passed as symbols
    pub fn from_scenario(case: &ScenarioCase, from_address: &str) -> Self {
        Self::new(
            case.from_chain,
            case.to_chain,
            case.from_token.clone(),
            case.to_token.clone(),
            case.from_amount.clone(),
            from_address,
        )
    }

    pub fn with_to_address(mut self, address: impl Into<String>) -> Self {
        self.to_address = Some(address.into());
        self
    }

    pub fn with_slippage(mut self, slippage: f64) -> Self {
        self.slippage = Some(slippage);
        self
    }

    pub fn with_order(mut self, order: RouteOrder) -> Self {
        self.order = Some(order);
        self
    }

    pub fn to_request(&self) -> ApiRequest {
        let mut req = ApiRequest::get(Endpoint::Quote)
            .with_query("fromChain", self.from_chain.to_string())
            .with_query("toChain", self.to_chain.to_string())
            .with_query("fromToken", self.from_token.as_str())
            .with_query("toToken", self.to_token.as_str())
            .with_query("fromAmount", self.from_amount.as_str())
            .with_query("fromAddress", self.from_address.as_str());

        if let Some(ref to_address) = self.to_address {
            req = req.with_query("toAddress", to_address.as_str());
        }
        if let Some(slippage) = self.slippage {
            req = req.with_query("slippage", slippage.to_string());
        }
        if let Some(order) = self.order {
            req = req.with_query("order", order.as_str());
        }
        req
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub address: String,
    pub chain_id: ChainId,
    pub symbol: String,
    pub decimals: u8,
    pub name: String,
    #[serde(default, rename = "priceUSD", skip_serializing_if = "Option::is_none")]
    pub price_usd: Option<String>,
    #[serde(default, rename = "logoURI", skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coin_key: Option<String>,
}

/// Fields are optional inside route steps; `/quote` requires them via its schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolDetails {
    pub key: String,
    pub name: String,
    #[serde(rename = "logoURI")]
    pub logo_uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub from_token: TokenInfo,
    pub to_token: TokenInfo,
    pub from_amount: String,
    pub from_chain_id: ChainId,
    pub to_chain_id: ChainId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slippage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeCost {
    pub name: String,
    pub token: TokenInfo,
    pub amount: String,
    #[serde(default, rename = "amountUSD", skip_serializing_if = "Option::is_none")]
    pub amount_usd: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub included: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasCost {
    /// SEND, APPROVE, SUM, ...
    #[serde(rename = "type")]
    pub cost_type: String,
    pub estimate: String,
    pub token: TokenInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(default, rename = "amountUSD", skip_serializing_if = "Option::is_none")]
    pub amount_usd: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    pub to_amount: String,
    pub to_amount_min: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_amount: Option<String>,
    #[serde(default)]
    pub fee_costs: Vec<FeeCost>,
    #[serde(default)]
    pub gas_costs: Vec<GasCost>,
    /// Seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<ChainId>,
}

/// One executable step: the `/quote` response or an entry of `route.steps`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// lifi, swap, cross or protocol
    #[serde(rename = "type")]
    pub step_type: String,
    pub id: String,
    pub tool: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_details: Option<ToolDetails>,
    pub action: Action,
    pub estimate: Estimate,
    #[serde(default)]
    pub included_steps: Vec<Step>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_request: Option<TransactionRequest>,
    /// Catch-all for fields not modelled here
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

pub type QuoteResponse = Step;

impl Step {
    pub fn is_cross_chain(&self) -> bool {
        self.action.from_chain_id != self.action.to_chain_id
    }

    /// Tools used by this step and its included sub-steps
    pub fn tools(&self) -> Vec<&str> {
        let mut tools = vec![self.tool.as_str()];
        for step in &self.included_steps {
            tools.extend(step.tools());
        }
        tools
    }
}
