//! Validation verdicts and the individual violations they collect.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Longest rendering of an observed value kept in a diagnostic
const OBSERVED_MAX_CHARS: usize = 80;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Constraint {
    Required,
    Type { expected: String },
    MinLength { limit: usize },
    MaxLength { limit: usize },
    Minimum { limit: f64 },
    Maximum { limit: f64 },
    Pattern { pattern: String },
    Enum { allowed: Vec<Value> },
    AdditionalProperty,
    MinItems { limit: usize },
    MaxItems { limit: usize },
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Required => f.write_str("is required"),
            Constraint::Type { expected } => write!(f, "must be {}", expected),
            Constraint::MinLength { limit } => write!(f, "must have length >= {}", limit),
            Constraint::MaxLength { limit } => write!(f, "must have length <= {}", limit),
            Constraint::Minimum { limit } => write!(f, "must be >= {}", limit),
            Constraint::Maximum { limit } => write!(f, "must be <= {}", limit),
            Constraint::Pattern { pattern } => write!(f, "must match {}", pattern),
            Constraint::Enum { allowed } => {
                let values: Vec<String> = allowed.iter().map(Value::to_string).collect();
                write!(f, "must be one of [{}]", values.join(", "))
            }
            Constraint::AdditionalProperty => f.write_str("is not an allowed property"),
            Constraint::MinItems { limit } => write!(f, "must have >= {} items", limit),
            Constraint::MaxItems { limit } => write!(f, "must have <= {} items", limit),
        }
    }
}

/// One failed constraint at one location
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// Dotted path, e.g. `estimate.gasCosts[0].token.decimals`; empty at root
    pub path: String,
    pub constraint: Constraint,
    pub observed: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, constraint: Constraint, observed: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            constraint,
            observed: observed.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "(root)" } else { &self.path };
        write!(f, "{} {} (observed {})", path, self.constraint, self.observed)
    }
}

/// Outcome of one validation; immutable once produced
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationVerdict {
    violations: Vec<Violation>,
}

impl ValidationVerdict {
    pub(crate) fn from_violations(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn diagnostics(&self) -> Vec<String> {
        self.violations.iter().map(Violation::to_string).collect()
    }

    /// All diagnostics on one line
    pub fn error_text(&self) -> String {
        self.diagnostics().join("; ")
    }
}

/// Short human rendering of an observed JSON value
pub(crate) fn describe_value(value: &Value) -> String {
    let rendered = value.to_string();
    if rendered.chars().count() <= OBSERVED_MAX_CHARS {
        return rendered;
    }
    let truncated: String = rendered.chars().take(OBSERVED_MAX_CHARS).collect();
    format!("{}...", truncated)
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
