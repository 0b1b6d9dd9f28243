//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits:
//! - LI.FI: reqwest client for the aggregator HTTP API
//! - CLI: Command-line interface handlers

pub mod cli;
pub mod lifi;

pub use cli::CliApp;
pub use lifi::{LiFiClient, LiFiConfig};
