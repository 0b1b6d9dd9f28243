//! Suite Runner
//!
//! Runs cases concurrently up to a worker limit. Each case gets its own
//! timeout and is re-run as a whole on failure when retries are configured.
//! A failing case never aborts its siblings.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Semaphore;

use super::report::SuiteReport;
use super::suite::SuiteCase;
use crate::api::Endpoint;
use crate::domain::Tag;
use crate::ports::AggregatorApi;
use crate::schema::CompiledSchemas;

#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    /// Cases in flight at once
    pub workers: usize,
    /// Whole-case re-runs after the first attempt
    pub retries: u32,
    pub case_timeout: Duration,
    /// Fail, rather than warn, when an error message misses its hints
    pub strict_hints: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            retries: 0,
            case_timeout: Duration::from_secs(60),
            strict_hints: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaseStatus {
    Passed,
    /// The API answered and an assertion failed
    Failed { reason: String },
    /// The API could not be reached or answered unreadably
    Transport { reason: String },
    TimedOut { after_ms: u64 },
}

impl CaseStatus {
    pub fn is_passed(&self) -> bool {
        matches!(self, CaseStatus::Passed)
    }

    pub fn label(&self) -> &'static str {
        match self {
            CaseStatus::Passed => "PASS",
            CaseStatus::Failed { .. } => "FAIL",
            CaseStatus::Transport { .. } => "ERROR",
            CaseStatus::TimedOut { .. } => "TIMEOUT",
        }
    }
}

/// Result of one case with the last request and response attached
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseOutcome {
    pub name: String,
    pub endpoint: Endpoint,
    pub tags: Vec<Tag>,
    #[serde(flatten)]
    pub status: CaseStatus,
    pub attempts: u32,
    pub request: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_body: Option<Value>,
    pub elapsed_ms: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

pub struct SuiteRunner {
    api: Arc<dyn AggregatorApi>,
    schemas: Arc<CompiledSchemas>,
    config: RunnerConfig,
}

impl SuiteRunner {
    pub fn new(api: Arc<dyn AggregatorApi>, schemas: Arc<CompiledSchemas>, config: RunnerConfig) -> Self {
        Self { api, schemas, config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub async fn run(&self, cases: Vec<SuiteCase>) -> SuiteReport {
        let started_at = Utc::now();
        tracing::info!(
            "Running {} cases with {} workers, {} retries",
            cases.len(),
            self.config.workers,
            self.config.retries
        );

        let permits = Arc::new(Semaphore::new(self.config.workers.max(1)));
        let mut handles = Vec::with_capacity(cases.len());

        for case in cases {
            let api = Arc::clone(&self.api);
            let schemas = Arc::clone(&self.schemas);
            let permits = Arc::clone(&permits);
            let config = self.config.clone();
            let placeholder = (
                case.name.clone(),
                case.endpoint(),
                case.tags.iter().copied().collect::<Vec<_>>(),
                case.request().describe(),
            );

            let handle = tokio::spawn(async move {
                // The semaphore is never closed
                let _permit = permits.acquire_owned().await.ok();
                run_case(api.as_ref(), &schemas, &case, &config).await
            });
            handles.push((placeholder, handle));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for ((name, endpoint, tags, request), handle) in handles {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    tracing::error!("Case task for {} aborted: {}", name, e);
                    outcomes.push(CaseOutcome {
                        name,
                        endpoint,
                        tags,
                        status: CaseStatus::Failed {
                            reason: format!("case task aborted: {}", e),
                        },
                        attempts: 0,
                        request,
                        response_status: None,
                        response_body: None,
                        elapsed_ms: 0,
                        warnings: Vec::new(),
                    });
                }
            }
        }

        let report = SuiteReport::new(started_at, Utc::now(), outcomes);
        tracing::info!(
            "Suite finished: {} passed, {} failed of {}",
            report.totals.passed,
            report.totals.total - report.totals.passed,
            report.totals.total
        );
        report
    }
}

pub async fn run_case(
    api: &dyn AggregatorApi,
    schemas: &CompiledSchemas,
    case: &SuiteCase,
    config: &RunnerConfig,
) -> CaseOutcome {
    let request = case.request();
    let started = Instant::now();
    let mut attempts = 0;

    let (status, response, warnings) = loop {
        attempts += 1;
        tracing::debug!("{} -> {}", case.name, request.describe());

        let (status, response, warnings) = match tokio::time::timeout(config.case_timeout, api.send(&request)).await {
            Err(_) => (
                CaseStatus::TimedOut {
                    after_ms: config.case_timeout.as_millis() as u64,
                },
                None,
                Vec::new(),
            ),
            Ok(Err(e)) => (CaseStatus::Transport { reason: e.to_string() }, None, Vec::new()),
            Ok(Ok(resp)) => match case.check(&resp, schemas, config.strict_hints) {
                Ok(report) => (CaseStatus::Passed, Some(resp), report.warnings),
                Err(failure) => (
                    CaseStatus::Failed {
                        reason: failure.to_string(),
                    },
                    Some(resp),
                    Vec::new(),
                ),
            },
        };

        if status.is_passed() || attempts > config.retries {
            break (status, response, warnings);
        }
        tracing::warn!(
            "Retrying {} (attempt {}/{}): {:?}",
            case.name,
            attempts + 1,
            config.retries + 1,
            status
        );
    };

    match status {
        CaseStatus::Passed => tracing::info!("PASS {}", case.name),
        ref other => tracing::info!("{} {}: {:?}", other.label(), case.name, other),
    }

    CaseOutcome {
        name: case.name.clone(),
        endpoint: case.endpoint(),
        tags: case.tags.iter().copied().collect(),
        status,
        attempts,
        request: request.describe(),
        response_status: response.as_ref().map(|r| r.status),
        response_body: response.map(|r| r.body),
        elapsed_ms: started.elapsed().as_millis() as u64,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiRequest, ToolsQuery};
    use crate::application::suite::{standard_suite, CaseKind};
    use crate::assertions::test_support::fixture;
    use crate::assertions::ToolsExpectation;
    use crate::catalog::ScenarioCatalog;
    use crate::domain::FixtureRegistry;
    use crate::ports::{ApiResponse, MockAggregatorApi, TransportError};
    use std::sync::atomic::{AtomicU32, Ordering};

    fn tools_case(name: &str) -> SuiteCase {
        SuiteCase::new(
            name,
            [Tag::Regression],
            CaseKind::Tools {
                query: ToolsQuery::all(),
                expectation: ToolsExpectation::unfiltered(),
            },
        )
    }

    fn runner(mock: MockAggregatorApi, config: RunnerConfig) -> SuiteRunner {
        SuiteRunner::new(Arc::new(mock), Arc::new(CompiledSchemas::standard().unwrap()), config)
    }

    #[tokio::test]
    async fn test_failing_case_does_not_abort_siblings() {
        let mut mock = MockAggregatorApi::new();
        mock.expect_send()
            .withf(|req| req.endpoint == Endpoint::Tools)
            .returning(|_| Ok(ApiResponse::new(200, fixture("tools_v1"))));
        mock.expect_send()
            .withf(|req| req.endpoint == Endpoint::Quote)
            .returning(|_| Ok(ApiResponse::new(500, serde_json::json!({"message": "boom"}))));

        let fixtures = FixtureRegistry::standard();
        let catalog = ScenarioCatalog::standard(&fixtures).unwrap();
        let mut cases: Vec<SuiteCase> = standard_suite(&catalog, &fixtures)
            .into_iter()
            .filter(|c| c.name == "Quote: USDC Ethereum to Polygon bridge")
            .collect();
        cases.push(tools_case("tools one"));
        cases.push(tools_case("tools two"));

        let report = runner(mock, RunnerConfig::default()).run(cases).await;
        assert_eq!(report.totals.total, 3);
        assert_eq!(report.totals.passed, 2);
        assert_eq!(report.totals.failed, 1);
        assert!(!report.is_success());

        let failed = &report.outcomes[0];
        assert_eq!(failed.response_status, Some(500));
        assert!(matches!(failed.status, CaseStatus::Failed { ref reason } if reason.contains("500")));
    }

    #[tokio::test]
    async fn test_retries_rerun_whole_case() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let mut mock = MockAggregatorApi::new();
        mock.expect_send().times(3).returning(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(TransportError::Timeout(Duration::from_secs(1)))
            } else {
                Ok(ApiResponse::new(200, fixture("tools_v1")))
            }
        });

        let config = RunnerConfig {
            retries: 2,
            ..RunnerConfig::default()
        };
        let report = runner(mock, config).run(vec![tools_case("flaky tools")]).await;
        assert!(report.is_success());
        assert_eq!(report.outcomes[0].attempts, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_transport_error_reported_distinctly() {
        let mut mock = MockAggregatorApi::new();
        mock.expect_send()
            .times(1)
            .returning(|_| Err(TransportError::Timeout(Duration::from_secs(30))));

        let report = runner(mock, RunnerConfig::default()).run(vec![tools_case("unreachable")]).await;
        assert_eq!(report.totals.transport, 1);
        assert!(matches!(report.outcomes[0].status, CaseStatus::Transport { .. }));
        assert_eq!(report.outcomes[0].response_status, None);
    }

    #[tokio::test]
    async fn test_case_timeout() {
        struct SlowApi;

        #[async_trait::async_trait]
        impl AggregatorApi for SlowApi {
            async fn send(&self, _request: &ApiRequest) -> Result<ApiResponse, TransportError> {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(ApiResponse::new(200, Value::Null))
            }
        }

        let config = RunnerConfig {
            case_timeout: Duration::from_millis(20),
            ..RunnerConfig::default()
        };
        let runner = SuiteRunner::new(Arc::new(SlowApi), Arc::new(CompiledSchemas::standard().unwrap()), config);
        let report = runner.run(vec![tools_case("slow")]).await;
        assert_eq!(report.outcomes[0].status, CaseStatus::TimedOut { after_ms: 20 });
        assert_eq!(report.totals.timed_out, 1);
    }
}
