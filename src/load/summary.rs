//! End-of-run summary
//!
//! Aggregates iteration records into request counts, failure rate, latency
//! percentiles and throughput, then applies the script thresholds.

use std::time::Duration;

use serde::Serialize;
use statrs::statistics::{Data, OrderStatistics};

use super::profile::{LoadScenario, ThresholdVerdict};
use super::script::{IterationRecord, LoadScript, LoadTarget};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestMetrics {
    pub requests: u64,
    pub failures: u64,
    /// Failed share of all requests, 0 when nothing was sent
    pub failure_rate: f64,
    /// Milliseconds
    pub duration_p95: f64,
    pub duration_p99: f64,
    pub duration_avg: f64,
    /// Requests per second over the wall-clock run
    pub throughput: f64,
    pub checks_passed: u64,
    pub checks_failed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadSummary {
    pub endpoint: LoadTarget,
    pub scenario: LoadScenario,
    pub metrics: RequestMetrics,
    pub thresholds: Vec<ThresholdVerdict>,
}

impl LoadSummary {
    pub fn from_records(script: &LoadScript, records: &[IterationRecord], wall_clock: Duration) -> Self {
        let requests = records.len() as u64;
        let failures = records.iter().filter(|r| r.failed).count() as u64;
        let checks_passed = records.iter().filter(|r| r.checks_passed).count() as u64;

        let failure_rate = if requests == 0 {
            0.0
        } else {
            failures as f64 / requests as f64
        };

        let millis: Vec<f64> = records.iter().map(|r| r.elapsed.as_secs_f64() * 1000.0).collect();
        let duration_avg = if millis.is_empty() {
            0.0
        } else {
            millis.iter().sum::<f64>() / millis.len() as f64
        };
        let (duration_p95, duration_p99) = percentiles(millis);

        let secs = wall_clock.as_secs_f64();
        let throughput = if secs > 0.0 { requests as f64 / secs } else { 0.0 };

        let thresholds = script.thresholds.evaluate(
            failure_rate,
            Duration::from_secs_f64(duration_p95 / 1000.0),
            throughput,
        );

        Self {
            endpoint: script.target,
            scenario: script.scenario,
            metrics: RequestMetrics {
                requests,
                failures,
                failure_rate,
                duration_p95,
                duration_p99,
                duration_avg,
                throughput,
                checks_passed,
                checks_failed: requests - checks_passed,
            },
            thresholds,
        }
    }

    pub fn passed(&self) -> bool {
        self.thresholds.iter().all(|t| t.passed)
    }

    pub fn failed_thresholds(&self) -> impl Iterator<Item = &ThresholdVerdict> {
        self.thresholds.iter().filter(|t| !t.passed)
    }
}

/// p95 and p99; both 0 for an empty sample
fn percentiles(samples: Vec<f64>) -> (f64, f64) {
    if samples.is_empty() {
        return (0.0, 0.0);
    }
    let mut data = Data::new(samples);
    (data.percentile(95), data.percentile(99))
}
