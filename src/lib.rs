//! xchain-conformance - cross-chain aggregator conformance and load harness
//!
//! Checks a LI.FI-style swap/bridge API against declarative response schemas
//! and endpoint business invariants, and drives staged load against it.
//!
//! # Modules
//!
//! - `domain`: Fixture data (chains, tokens, addresses, amounts, error codes, scenarios)
//! - `api`: Endpoint request builders and response models
//! - `schema`: Declarative schemas, compiled validators and verdicts
//! - `ports`: The aggregator API trait
//! - `adapters`: reqwest client and CLI
//! - `assertions`: Per-endpoint conformance checks
//! - `catalog`: Happy-path pairs and negative cases
//! - `application`: Functional suite and its runner
//! - `load`: Load profiles, payload pools and the VU driver
//! - `config`: Configuration loading and validation

pub mod adapters;
pub mod api;
pub mod application;
pub mod assertions;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod load;
pub mod ports;
pub mod schema;
