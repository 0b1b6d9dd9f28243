//! Configuration Loader
//!
//! Loads and validates harness configuration from TOML files matching
//! config.toml structure. Every section is optional; environment variables
//! override file values.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::adapters::lifi::{normalize_base_url, LiFiConfig, DEFAULT_BASE_URL};
use crate::application::RunnerConfig;
use crate::domain::Tag;
use crate::load::{LoadScenario, LoadTarget};

/// Upper bound for `[api] max_retries`
pub const MAX_TRANSPORT_RETRIES: u32 = 10;

/// Main configuration structure matching config.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub api: ApiSection,
    pub suite: SuiteSection,
    pub load: LoadSection,
    pub logging: LoggingSection,
}

/// Aggregator API section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    /// API base URL, including the version segment
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Retries for connection failures and timeouts; HTTP answers are never retried
    pub max_retries: u32,
    /// Optional API key for higher rate limits
    pub api_key: Option<String>,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            max_retries: 3,
            api_key: None,
        }
    }
}

/// Functional suite section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SuiteSection {
    /// Whole-case re-runs after a failure
    pub retries: u32,
    /// Cases in flight at once
    pub workers: usize,
    /// Upper bound for one case, retries excluded
    pub case_timeout_secs: u64,
    /// Only run cases carrying one of these tags (empty = all)
    pub tags: Vec<String>,
    /// Fail negative cases whose error message misses its expected wording
    pub strict_message_hints: bool,
}

impl Default for SuiteSection {
    fn default() -> Self {
        Self {
            retries: 0,
            workers: 4,
            case_timeout_secs: 60,
            tags: Vec::new(),
            strict_message_hints: false,
        }
    }
}

/// Load testing section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoadSection {
    /// smoke, load or stress
    pub scenario: String,
    /// quote, routes or tools
    pub endpoint: String,
    /// Requests per second the run must sustain
    pub min_throughput: Option<f64>,
}

impl Default for LoadSection {
    fn default() -> Self {
        Self {
            scenario: "load".to_string(),
            endpoint: "quote".to_string(),
            min_throughput: None,
        }
    }
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level used when neither --verbose nor --debug is given
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<HarnessConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: HarnessConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Whether a `CI` value means "running in CI"
fn is_truthy(value: &str) -> bool {
    !matches!(value.trim().to_ascii_lowercase().as_str(), "" | "0" | "false" | "no")
}

impl HarnessConfig {
    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any variable lookup
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("API_BASE_URL").filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url;
        }
        if let Some(key) = lookup("LIFI_API_KEY").filter(|k| !k.is_empty()) {
            self.api.api_key = Some(key);
        }
        if lookup("CI").is_some_and(|v| is_truthy(&v)) {
            self.suite.retries = 2;
            self.suite.workers = 1;
        }
        if let Some(scenario) = lookup("LOAD_SCENARIO").or_else(|| lookup("K6_SCENARIO")) {
            self.load.scenario = scenario;
        }
    }

    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "base_url cannot be empty".to_string(),
            ));
        }

        if self.api.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(format!(
                "timeout_secs must be > 0, got {}",
                self.api.timeout_secs
            )));
        }

        if self.api.max_retries > MAX_TRANSPORT_RETRIES {
            return Err(ConfigError::ValidationError(format!(
                "max_retries must be <= {}, got {}",
                MAX_TRANSPORT_RETRIES, self.api.max_retries
            )));
        }

        if self.suite.workers == 0 {
            return Err(ConfigError::ValidationError(format!(
                "workers must be > 0, got {}",
                self.suite.workers
            )));
        }

        if self.suite.case_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(format!(
                "case_timeout_secs must be > 0, got {}",
                self.suite.case_timeout_secs
            )));
        }

        for tag in &self.suite.tags {
            tag.parse::<Tag>().map_err(ConfigError::ValidationError)?;
        }

        self.load_scenario()?;
        self.load_target()?;

        if let Some(rps) = self.load.min_throughput {
            if rps <= 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "min_throughput must be > 0, got {}",
                    rps
                )));
            }
        }

        Ok(())
    }

    pub fn load_scenario(&self) -> Result<LoadScenario, ConfigError> {
        self.load
            .scenario
            .parse()
            .map_err(|e: crate::load::LoadError| ConfigError::ValidationError(e.to_string()))
    }

    pub fn load_target(&self) -> Result<LoadTarget, ConfigError> {
        self.load
            .endpoint
            .parse()
            .map_err(|e: crate::load::LoadError| ConfigError::ValidationError(e.to_string()))
    }

    pub fn suite_tags(&self) -> Result<Vec<Tag>, ConfigError> {
        self.suite
            .tags
            .iter()
            .map(|t| t.parse::<Tag>().map_err(ConfigError::ValidationError))
            .collect()
    }
}

impl ApiSection {
    /// API key from config, `None` when blank
    pub fn get_api_key(&self) -> Option<String> {
        self.api_key.clone().filter(|k| !k.is_empty())
    }
}

impl From<&HarnessConfig> for LiFiConfig {
    fn from(config: &HarnessConfig) -> Self {
        LiFiConfig {
            base_url: normalize_base_url(&config.api.base_url),
            api_key: config.api.get_api_key(),
            timeout: Duration::from_secs(config.api.timeout_secs),
            max_retries: config.api.max_retries,
            ..LiFiConfig::default()
        }
    }
}

impl HarnessConfig {
    /// Client settings for load runs: one request per recorded iteration
    pub fn load_client_config(&self) -> LiFiConfig {
        LiFiConfig {
            max_retries: 0,
            ..LiFiConfig::from(self)
        }
    }
}

impl From<&HarnessConfig> for RunnerConfig {
    fn from(config: &HarnessConfig) -> Self {
        RunnerConfig {
            workers: config.suite.workers,
            retries: config.suite.retries,
            case_timeout: Duration::from_secs(config.suite.case_timeout_secs),
            strict_hints: config.suite.strict_message_hints,
        }
    }
}
