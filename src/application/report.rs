//! Suite Report
//!
//! Totals plus every case outcome, rendered as text for terminals or JSON
//! for CI artifacts.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::runner::{CaseOutcome, CaseStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub transport: usize,
    pub timed_out: usize,
    /// Passed cases that carried advisory warnings
    pub warned: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub totals: Totals,
    pub outcomes: Vec<CaseOutcome>,
}

impl SuiteReport {
    pub fn new(started_at: DateTime<Utc>, finished_at: DateTime<Utc>, outcomes: Vec<CaseOutcome>) -> Self {
        let mut totals = Totals {
            total: outcomes.len(),
            ..Totals::default()
        };
        for outcome in &outcomes {
            match outcome.status {
                CaseStatus::Passed => {
                    totals.passed += 1;
                    if !outcome.warnings.is_empty() {
                        totals.warned += 1;
                    }
                }
                CaseStatus::Failed { .. } => totals.failed += 1,
                CaseStatus::Transport { .. } => totals.transport += 1,
                CaseStatus::TimedOut { .. } => totals.timed_out += 1,
            }
        }
        Self {
            started_at,
            finished_at,
            totals,
            outcomes,
        }
    }

    pub fn is_success(&self) -> bool {
        self.totals.passed == self.totals.total
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.outcomes.iter().filter(|o| !o.status.is_passed())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "═══════════════════════════════════════════════════════════");
        let _ = writeln!(out, "  CONFORMANCE RUN  {}", self.started_at.format("%Y-%m-%d %H:%M:%S UTC"));
        let _ = writeln!(out, "═══════════════════════════════════════════════════════════");

        for outcome in &self.outcomes {
            let _ = writeln!(out, "  [{:<7}] {} ({}ms)", outcome.status.label(), outcome.name, outcome.elapsed_ms);
            match &outcome.status {
                CaseStatus::Passed => {}
                CaseStatus::Failed { reason } | CaseStatus::Transport { reason } => {
                    let _ = writeln!(out, "            {}", reason);
                    let _ = writeln!(out, "            {}", outcome.request);
                }
                CaseStatus::TimedOut { after_ms } => {
                    let _ = writeln!(out, "            no answer after {}ms", after_ms);
                    let _ = writeln!(out, "            {}", outcome.request);
                }
            }
            for warning in &outcome.warnings {
                let _ = writeln!(out, "            warning: {}", warning);
            }
        }

        let elapsed = self.finished_at - self.started_at;
        let _ = writeln!(out, "───────────────────────────────────────────────────────────");
        let _ = writeln!(
            out,
            "  {} passed, {} failed, {} transport errors, {} timed out ({} total, {:.1}s)",
            self.totals.passed,
            self.totals.failed,
            self.totals.transport,
            self.totals.timed_out,
            self.totals.total,
            elapsed.num_milliseconds() as f64 / 1000.0
        );
        out
    }
}
