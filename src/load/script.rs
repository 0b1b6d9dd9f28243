//! Per-endpoint load scripts
//!
//! A script is the target endpoint, its think time and a shape check. No
//! schema validation happens under load.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

use super::profile::{LoadScenario, Thresholds};
use super::LoadError;
use crate::api::Endpoint;
use crate::ports::{ApiResponse, TransportError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadTarget {
    Quote,
    Routes,
    Tools,
}

impl LoadTarget {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            LoadTarget::Quote => Endpoint::Quote,
            LoadTarget::Routes => Endpoint::Routes,
            LoadTarget::Tools => Endpoint::Tools,
        }
    }

    pub fn think_time(&self) -> Duration {
        match self {
            LoadTarget::Quote => Duration::from_secs(1),
            LoadTarget::Routes => Duration::from_millis(1500),
            LoadTarget::Tools => Duration::from_millis(500),
        }
    }

    /// 95th percentile latency budget
    pub fn p95_limit(&self) -> Duration {
        match self {
            LoadTarget::Quote => Duration::from_secs(3),
            LoadTarget::Routes => Duration::from_secs(5),
            LoadTarget::Tools => Duration::from_secs(2),
        }
    }
}

impl fmt::Display for LoadTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.endpoint())
    }
}

impl FromStr for LoadTarget {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quote" => Ok(LoadTarget::Quote),
            "routes" | "advanced/routes" => Ok(LoadTarget::Routes),
            "tools" => Ok(LoadTarget::Tools),
            other => Err(LoadError::UnsupportedEndpoint(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadScript {
    pub target: LoadTarget,
    pub scenario: LoadScenario,
    pub think_time: Duration,
    pub thresholds: Thresholds,
}

impl LoadScript {
    pub fn new(target: LoadTarget, scenario: LoadScenario) -> Self {
        Self {
            target,
            scenario,
            think_time: target.think_time(),
            thresholds: Thresholds::new(target.p95_limit()),
        }
    }

    pub fn with_think_time(mut self, think_time: Duration) -> Self {
        self.think_time = think_time;
        self
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Status 200 plus the key the endpoint must carry
    pub fn check(&self, response: &ApiResponse) -> bool {
        if response.status != 200 {
            return false;
        }
        match self.target {
            LoadTarget::Quote => response.body.get("estimate").is_some(),
            LoadTarget::Routes => response.has_array("routes"),
            LoadTarget::Tools => response.has_array("bridges") && response.has_array("exchanges"),
        }
    }

    pub fn record(&self, result: &Result<ApiResponse, TransportError>, elapsed: Duration) -> IterationRecord {
        match result {
            Ok(response) => IterationRecord {
                elapsed,
                status: Some(response.status),
                failed: response.status >= 400,
                checks_passed: self.check(response),
            },
            Err(_) => IterationRecord {
                elapsed,
                status: None,
                failed: true,
                checks_passed: false,
            },
        }
    }
}

/// One request issued by a virtual user
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationRecord {
    pub elapsed: Duration,
    /// `None` when the request never got an answer
    pub status: Option<u16>,
    pub failed: bool,
    pub checks_passed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_target_budgets() {
        assert_eq!(LoadTarget::Routes.think_time(), Duration::from_millis(1500));
        assert_eq!(LoadTarget::Tools.p95_limit(), Duration::from_secs(2));
        assert_eq!("advanced/routes".parse::<LoadTarget>().unwrap(), LoadTarget::Routes);
        assert!(matches!("token".parse::<LoadTarget>(), Err(LoadError::UnsupportedEndpoint(_))));
    }

    #[test]
    fn test_shape_checks() {
        let quote = LoadScript::new(LoadTarget::Quote, LoadScenario::Smoke);
        assert!(quote.check(&ApiResponse::new(200, json!({"estimate": {"toAmount": "1"}}))));
        assert!(!quote.check(&ApiResponse::new(200, json!({"routes": []}))));
        assert!(!quote.check(&ApiResponse::new(400, json!({"estimate": {}}))));

        let tools = LoadScript::new(LoadTarget::Tools, LoadScenario::Smoke);
        assert!(tools.check(&ApiResponse::new(200, json!({"bridges": [], "exchanges": []}))));
        assert!(!tools.check(&ApiResponse::new(200, json!({"bridges": []}))));
    }

    #[test]
    fn test_record_marks_failures() {
        let routes = LoadScript::new(LoadTarget::Routes, LoadScenario::Load);
        let ok = routes.record(&Ok(ApiResponse::new(200, json!({"routes": []}))), Duration::from_millis(10));
        assert!(!ok.failed && ok.checks_passed);

        let rejected = routes.record(&Ok(ApiResponse::new(429, json!({}))), Duration::from_millis(10));
        assert!(rejected.failed);
        assert_eq!(rejected.status, Some(429));

        let lost = routes.record(&Err(TransportError::Timeout(Duration::from_secs(1))), Duration::from_secs(1));
        assert!(lost.failed);
        assert_eq!(lost.status, None);
    }
}
