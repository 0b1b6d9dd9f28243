//! Ports Layer - Trait definitions for external dependencies
//!
//! The only outside collaborator is the aggregator HTTP API. Suites and load
//! scripts talk to it through [`AggregatorApi`]; the reqwest adapter and
//! test doubles implement it.

pub mod api;

pub use api::{AggregatorApi, ApiResponse, TransportError};

#[cfg(test)]
pub use api::MockAggregatorApi;
