//! Endpoint Request Builders and response models
//!
//! Typed parameters for each aggregator endpoint, lowered into a generic
//! [`ApiRequest`] (query pairs for GET, JSON body for POST), plus serde
//! models of the documented response shapes.

mod envelope;
mod quote;
mod request;
mod routes;
mod tokens;
mod tools;

pub use envelope::ErrorEnvelope;
pub use quote::{
    Action, Estimate, FeeCost, GasCost, QuoteParams, QuoteResponse, Step, TokenInfo, ToolDetails,
    TransactionRequest,
};
pub use request::{ApiRequest, Endpoint, Method};
pub use routes::{Route, RouteOptions, RouteOrder, RoutesRequest, RoutesResponse};
pub use tokens::{ChainInfo, ChainsQuery, ChainsResponse, TokenDetails, TokenQuery, TokensQuery, TokensResponse};
pub use tools::{Bridge, BridgeChainPair, Exchange, ToolsQuery, ToolsResponse};
