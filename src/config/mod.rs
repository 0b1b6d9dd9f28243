//! Configuration Module
//!
//! Loads and validates configuration from TOML files.

pub mod loader;

pub use loader::{
    load_config, ApiSection, ConfigError, HarnessConfig, LoadSection, LoggingSection, SuiteSection,
};
