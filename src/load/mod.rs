//! Load Testing
//!
//! Virtual users drive one endpoint against a staged profile. Each iteration
//! picks a random payload, checks the response shape superficially and sleeps
//! a fixed think time. The run ends with a summary judged against thresholds.

pub mod driver;
pub mod payloads;
pub mod profile;
pub mod script;
pub mod summary;

pub use driver::LoadDriver;
pub use payloads::PayloadPool;
pub use profile::{Executor, LoadProfile, LoadScenario, Stage, ThresholdVerdict, Thresholds};
pub use script::{IterationRecord, LoadScript, LoadTarget};
pub use summary::LoadSummary;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unknown load scenario: {0} (expected smoke, load or stress)")]
    UnknownScenario(String),

    #[error("unsupported load endpoint: {0} (expected quote, routes or tools)")]
    UnsupportedEndpoint(String),

    #[error("payload pool for {0} is empty")]
    EmptyPool(String),

    #[error("virtual user task failed: {0}")]
    Worker(String),
}
