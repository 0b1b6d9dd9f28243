//! Load Scenario Profiles
//!
//! Virtual-user schedules and pass/fail thresholds. `smoke` holds one VU for
//! 30s; `load` and `stress` ramp linearly through their stages and back to 0.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

use super::LoadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadScenario {
    Smoke,
    Load,
    Stress,
}

impl LoadScenario {
    pub const ALL: [LoadScenario; 3] = [LoadScenario::Smoke, LoadScenario::Load, LoadScenario::Stress];

    pub fn as_str(&self) -> &'static str {
        match self {
            LoadScenario::Smoke => "smoke",
            LoadScenario::Load => "load",
            LoadScenario::Stress => "stress",
        }
    }
}

impl fmt::Display for LoadScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoadScenario {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "smoke" => Ok(LoadScenario::Smoke),
            "load" => Ok(LoadScenario::Load),
            "stress" => Ok(LoadScenario::Stress),
            other => Err(LoadError::UnknownScenario(other.to_string())),
        }
    }
}

/// Ramp linearly from the previous target to `target` over `duration`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stage {
    #[serde(with = "secs")]
    pub duration: Duration,
    pub target: u32,
}

impl Stage {
    pub const fn new(duration: Duration, target: u32) -> Self {
        Self { duration, target }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "executor", rename_all = "kebab-case")]
pub enum Executor {
    ConstantVus {
        vus: u32,
        #[serde(with = "secs")]
        duration: Duration,
    },
    RampingVus {
        start_vus: u32,
        stages: Vec<Stage>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadProfile {
    pub scenario: LoadScenario,
    #[serde(flatten)]
    pub executor: Executor,
}

const fn minutes(m: u64) -> Duration {
    Duration::from_secs(m * 60)
}

impl LoadProfile {
    pub fn for_scenario(scenario: LoadScenario) -> Self {
        let executor = match scenario {
            LoadScenario::Smoke => Executor::ConstantVus {
                vus: 1,
                duration: Duration::from_secs(30),
            },
            LoadScenario::Load => Executor::RampingVus {
                start_vus: 0,
                stages: vec![
                    Stage::new(minutes(1), 5),
                    Stage::new(minutes(3), 5),
                    Stage::new(minutes(1), 10),
                    Stage::new(minutes(3), 10),
                    Stage::new(minutes(1), 0),
                ],
            },
            LoadScenario::Stress => Executor::RampingVus {
                start_vus: 0,
                stages: vec![
                    Stage::new(minutes(2), 20),
                    Stage::new(minutes(5), 20),
                    Stage::new(minutes(2), 50),
                    Stage::new(minutes(5), 50),
                    Stage::new(minutes(2), 0),
                ],
            },
        };
        Self { scenario, executor }
    }

    pub fn total_duration(&self) -> Duration {
        match &self.executor {
            Executor::ConstantVus { duration, .. } => *duration,
            Executor::RampingVus { stages, .. } => stages.iter().map(|s| s.duration).sum(),
        }
    }

    pub fn max_vus(&self) -> u32 {
        match &self.executor {
            Executor::ConstantVus { vus, .. } => *vus,
            Executor::RampingVus { start_vus, stages } => {
                stages.iter().map(|s| s.target).fold(*start_vus, u32::max)
            }
        }
    }

    /// Target VU count `elapsed` into the run; 0 once the schedule is over
    pub fn target_at(&self, elapsed: Duration) -> u32 {
        match &self.executor {
            Executor::ConstantVus { vus, duration } => {
                if elapsed < *duration {
                    *vus
                } else {
                    0
                }
            }
            Executor::RampingVus { start_vus, stages } => {
                let mut from = *start_vus;
                let mut stage_start = Duration::ZERO;
                for stage in stages {
                    let stage_end = stage_start + stage.duration;
                    if elapsed < stage_end {
                        let progress = (elapsed - stage_start).as_secs_f64() / stage.duration.as_secs_f64();
                        let value = from as f64 + (stage.target as f64 - from as f64) * progress;
                        return value.round() as u32;
                    }
                    from = stage.target;
                    stage_start = stage_end;
                }
                0
            }
        }
    }

    /// Same shape with every duration multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        let scale = |d: Duration| d.mul_f64(factor);
        let executor = match &self.executor {
            Executor::ConstantVus { vus, duration } => Executor::ConstantVus {
                vus: *vus,
                duration: scale(*duration),
            },
            Executor::RampingVus { start_vus, stages } => Executor::RampingVus {
                start_vus: *start_vus,
                stages: stages
                    .iter()
                    .map(|s| Stage::new(scale(s.duration), s.target))
                    .collect(),
            },
        };
        Self {
            scenario: self.scenario,
            executor,
        }
    }
}

/// Pass/fail limits applied to a finished run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Thresholds {
    /// `http_req_failed` rate must stay strictly below this
    pub max_error_rate: f64,
    /// 95th percentile request latency must stay strictly below this
    #[serde(with = "millis")]
    pub p95_limit: Duration,
    /// Requests per second the run must sustain, if set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_throughput: Option<f64>,
}

pub const DEFAULT_MAX_ERROR_RATE: f64 = 0.05;

impl Thresholds {
    pub fn new(p95_limit: Duration) -> Self {
        Self {
            max_error_rate: DEFAULT_MAX_ERROR_RATE,
            p95_limit,
            min_throughput: None,
        }
    }

    pub fn with_min_throughput(mut self, rps: Option<f64>) -> Self {
        self.min_throughput = rps;
        self
    }

    pub fn evaluate(&self, error_rate: f64, p95: Duration, throughput: f64) -> Vec<ThresholdVerdict> {
        let mut verdicts = vec![
            ThresholdVerdict {
                name: format!("http_req_failed rate<{}", self.max_error_rate),
                observed: error_rate,
                limit: self.max_error_rate,
                passed: error_rate < self.max_error_rate,
            },
            ThresholdVerdict {
                name: format!("http_req_duration p(95)<{}", self.p95_limit.as_millis()),
                observed: p95.as_secs_f64() * 1000.0,
                limit: self.p95_limit.as_secs_f64() * 1000.0,
                passed: p95 < self.p95_limit,
            },
        ];
        if let Some(min) = self.min_throughput {
            verdicts.push(ThresholdVerdict {
                name: format!("http_reqs rate>={}", min),
                observed: throughput,
                limit: min,
                passed: throughput >= min,
            });
        }
        verdicts
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdVerdict {
    pub name: String,
    pub observed: f64,
    pub limit: f64,
    pub passed: bool,
}

mod secs {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }
}

mod millis {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }
}
