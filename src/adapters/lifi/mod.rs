//! LI.FI Adapter
//!
//! Implementation of the [`AggregatorApi`](crate::ports::AggregatorApi) port
//! over reqwest, plus typed convenience calls for the CLI.

mod client;

pub use client::{normalize_base_url, LiFiClient, LiFiConfig, API_KEY_HEADER, DEFAULT_BASE_URL};
