//! Application Layer
//!
//! Builds the functional suite from the catalog and runs it against an
//! [`AggregatorApi`](crate::ports::AggregatorApi).

pub mod report;
pub mod runner;
pub mod suite;

pub use report::{SuiteReport, Totals};
pub use runner::{run_case, CaseOutcome, CaseStatus, RunnerConfig, SuiteRunner};
pub use suite::{filter_cases, standard_suite, CaseKind, SuiteCase, SuiteFilter};
