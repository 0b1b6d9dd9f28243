//! Response schemas for each aggregator endpoint.
//!
//! All objects are permissive about unknown keys: the upstream API adds
//! fields regularly and only removals or type changes are contract breaks.

use super::node::{PrimitiveSchema, SchemaNode};

/// Smallest-unit amount carried as a decimal string
pub const AMOUNT_PATTERN: &str = "^[0-9]+$";

fn amount() -> PrimitiveSchema {
    SchemaNode::string().pattern(AMOUNT_PATTERN)
}

pub fn token_schema() -> SchemaNode {
    SchemaNode::object()
        .field("address", SchemaNode::string())
        .field("chainId", SchemaNode::number())
        .field("symbol", SchemaNode::string().min_length(1))
        .field("decimals", SchemaNode::number().minimum(0.0).maximum(18.0))
        .field("name", SchemaNode::string())
        .field("coinKey", SchemaNode::string())
        .field("logoURI", SchemaNode::string())
        .field("priceUSD", SchemaNode::string())
        .required(["address", "chainId", "symbol", "decimals", "name"])
        .into()
}

/// Token as it appears in `/tokens` listings; decimals are only bounded below
pub fn listed_token_schema() -> SchemaNode {
    SchemaNode::object()
        .field("address", SchemaNode::string().min_length(1))
        .field("chainId", SchemaNode::number())
        .field("symbol", SchemaNode::string().min_length(1))
        .field("decimals", SchemaNode::number().minimum(0.0))
        .field("name", SchemaNode::string().min_length(1))
        .field("coinKey", SchemaNode::string())
        .field("logoURI", SchemaNode::string())
        .field("priceUSD", SchemaNode::string())
        .required(["address", "chainId", "symbol", "decimals", "name"])
        .into()
}

pub fn fee_cost_schema() -> SchemaNode {
    SchemaNode::object()
        .field("name", SchemaNode::string())
        .field("description", SchemaNode::string())
        .field("token", token_schema())
        .field("amount", amount())
        .field("amountUSD", SchemaNode::string())
        .field("percentage", SchemaNode::string())
        .field("included", SchemaNode::boolean())
        .required(["name", "token", "amount"])
        .into()
}

pub fn gas_cost_schema() -> SchemaNode {
    SchemaNode::object()
        .field("type", SchemaNode::string())
        .field("estimate", SchemaNode::string())
        .field("limit", SchemaNode::string())
        .field("amount", amount())
        .field("amountUSD", SchemaNode::string())
        .field("price", SchemaNode::string())
        .field("token", token_schema())
        .required(["type", "estimate", "token"])
        .into()
}

pub fn tool_details_schema() -> SchemaNode {
    SchemaNode::object()
        .field("key", SchemaNode::string())
        .field("name", SchemaNode::string())
        .field("logoURI", SchemaNode::string())
        .required(["key", "name", "logoURI"])
        .into()
}

fn action_schema() -> SchemaNode {
    SchemaNode::object()
        .field("fromToken", token_schema())
        .field("fromAmount", amount())
        .field("toToken", token_schema())
        .field("fromChainId", SchemaNode::number())
        .field("toChainId", SchemaNode::number())
        .field("slippage", SchemaNode::number())
        .field("fromAddress", SchemaNode::string())
        .field("toAddress", SchemaNode::string())
        .required(["fromToken", "fromAmount", "toToken", "fromChainId", "toChainId"])
        .into()
}

fn estimate_schema() -> SchemaNode {
    SchemaNode::object()
        .field("tool", SchemaNode::string())
        .field("approvalAddress", SchemaNode::string())
        .field("toAmountMin", amount())
        .field("toAmount", amount())
        .field("fromAmount", amount())
        .field("feeCosts", SchemaNode::array_of(fee_cost_schema()))
        .field("gasCosts", SchemaNode::array_of(gas_cost_schema()))
        .field("executionDuration", SchemaNode::number())
        .required(["toAmount", "toAmountMin"])
        .into()
}

fn transaction_request_schema() -> SchemaNode {
    SchemaNode::object()
        .field("to", SchemaNode::string())
        .field("from", SchemaNode::string())
        .field("data", SchemaNode::string())
        .field("value", SchemaNode::string())
        .field("gasLimit", SchemaNode::string())
        .field("gasPrice", SchemaNode::string())
        .into()
}

pub fn quote_response_schema() -> SchemaNode {
    SchemaNode::object()
        .field("type", SchemaNode::enumeration(["lifi", "swap", "cross"]))
        .field("id", SchemaNode::string().min_length(1))
        .field("tool", SchemaNode::string().min_length(1))
        .field("toolDetails", tool_details_schema())
        .field("action", action_schema())
        .field("estimate", estimate_schema())
        .field("transactionRequest", transaction_request_schema())
        .field("includedSteps", SchemaNode::array_of(SchemaNode::object()))
        .required(["type", "id", "tool", "toolDetails", "action", "estimate"])
        .into()
}

pub fn route_step_schema() -> SchemaNode {
    SchemaNode::object()
        .field("type", SchemaNode::string())
        .field("id", SchemaNode::string())
        .field("tool", SchemaNode::string())
        .field(
            "toolDetails",
            SchemaNode::object()
                .field("key", SchemaNode::string())
                .field("name", SchemaNode::string())
                .field("logoURI", SchemaNode::string()),
        )
        .field("action", SchemaNode::object())
        .field("estimate", SchemaNode::object())
        .required(["type", "id", "tool", "action", "estimate"])
        .into()
}

pub fn route_schema() -> SchemaNode {
    SchemaNode::object()
        .field("id", SchemaNode::string())
        .field("fromChainId", SchemaNode::number())
        .field("fromAmountUSD", SchemaNode::string())
        .field("fromAmount", amount())
        .field("fromToken", token_schema())
        .field("toChainId", SchemaNode::number())
        .field("toAmountUSD", SchemaNode::string())
        .field("toAmount", amount())
        .field("toAmountMin", amount())
        .field("toToken", token_schema())
        .field("gasCostUSD", SchemaNode::string())
        .field("containsSwitchChain", SchemaNode::boolean())
        .field("steps", SchemaNode::array_of(route_step_schema()).min_items(1))
        .required(["id", "fromChainId", "fromAmount", "fromToken", "toChainId", "toAmount", "toToken", "steps"])
        .into()
}

pub fn routes_response_schema() -> SchemaNode {
    SchemaNode::object()
        .field("routes", SchemaNode::array_of(route_schema()))
        .field(
            "unavailableRoutes",
            SchemaNode::object()
                .field("filteredOut", SchemaNode::array())
                .field("failed", SchemaNode::array()),
        )
        .required(["routes"])
        .into()
}

pub fn bridge_schema() -> SchemaNode {
    SchemaNode::object()
        .field("key", SchemaNode::string().min_length(1))
        .field("name", SchemaNode::string().min_length(1))
        .field("logoURI", SchemaNode::string())
        .field(
            "supportedChains",
            SchemaNode::array_of(
                SchemaNode::object()
                    .field("fromChainId", SchemaNode::number())
                    .field("toChainId", SchemaNode::number())
                    .required(["fromChainId", "toChainId"]),
            ),
        )
        .required(["key", "name", "logoURI", "supportedChains"])
        .into()
}

pub fn exchange_schema() -> SchemaNode {
    SchemaNode::object()
        .field("key", SchemaNode::string().min_length(1))
        .field("name", SchemaNode::string().min_length(1))
        .field("logoURI", SchemaNode::string())
        .field("supportedChains", SchemaNode::array_of(SchemaNode::number()))
        .required(["key", "name", "logoURI", "supportedChains"])
        .into()
}

pub fn tools_response_schema() -> SchemaNode {
    SchemaNode::object()
        .field("bridges", SchemaNode::array_of(bridge_schema()))
        .field("exchanges", SchemaNode::array_of(exchange_schema()))
        .required(["bridges", "exchanges"])
        .into()
}

pub fn tokens_response_schema() -> SchemaNode {
    SchemaNode::object()
        .field("tokens", SchemaNode::map_of(SchemaNode::array_of(listed_token_schema())))
        .required(["tokens"])
        .into()
}

pub fn token_details_schema() -> SchemaNode {
    SchemaNode::object()
        .field("address", SchemaNode::string().min_length(1))
        .field("chainId", SchemaNode::number())
        .field("symbol", SchemaNode::string().min_length(1))
        .field("decimals", SchemaNode::number().minimum(0.0))
        .field("name", SchemaNode::string().min_length(1))
        .field("coinKey", SchemaNode::string())
        .field("logoURI", SchemaNode::string())
        .field("priceUSD", SchemaNode::string())
        .field("marketCapUSD", SchemaNode::number())
        .field("volumeUSD24H", SchemaNode::number())
        .field("tags", SchemaNode::array_of(SchemaNode::string()))
        .required(["address", "chainId", "symbol", "decimals", "name", "priceUSD"])
        .into()
}

pub fn error_response_schema() -> SchemaNode {
    SchemaNode::object()
        .field("message", SchemaNode::string().min_length(1))
        .field("code", SchemaNode::number())
        .field("errors", SchemaNode::object())
        .required(["message"])
        .into()
}

pub fn chains_response_schema() -> SchemaNode {
    SchemaNode::object()
        .field(
            "chains",
            SchemaNode::array_of(
                SchemaNode::object()
                    .field("id", SchemaNode::number())
                    .field("key", SchemaNode::string().min_length(1))
                    .field("name", SchemaNode::string().min_length(1))
                    .field("chainType", SchemaNode::enumeration(["EVM", "SVM", "UTXO", "MVM"]))
                    .required(["id", "key", "name", "chainType"]),
            ),
        )
        .required(["chains"])
        .into()
}
