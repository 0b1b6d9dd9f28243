//! Assertion Layer
//!
//! Schema conformance plus endpoint business invariants. Every check takes a
//! raw [`ApiResponse`] and either passes (possibly with advisory warnings) or
//! fails with one [`AssertionFailure`] carrying expected and observed values.

pub mod negative;
pub mod quote;
pub mod routes;
pub mod tokens;
pub mod tools;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::domain::{Amount, AmountError, ChainId};
use crate::ports::ApiResponse;
use crate::schema::CompiledValidator;

pub use negative::{assert_rejection, EmptySuccess, ExpectedOutcome};
pub use quote::{assert_quote, QuoteExpectation};
pub use routes::{assert_routes, check_cheapest_ordering, RoutesExpectation};
pub use tokens::{
    assert_token_details, assert_token_listing, PriceRange, TokenDetailExpectation, TokenListingExpectation,
};
pub use tools::{assert_tools, BridgeCoverage, ToolsExpectation};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssertionFailure {
    #[error("expected HTTP status {expected}, got {observed}")]
    UnexpectedStatus { expected: String, observed: u16 },

    #[error("response does not match schema: {}", diagnostics.join("; "))]
    SchemaViolations { diagnostics: Vec<String> },

    #[error("{field} should be chain {expected}, got {observed}")]
    ChainMismatch {
        field: String,
        expected: ChainId,
        observed: ChainId,
    },

    #[error("toAmountMin {min} exceeds toAmount {amount}")]
    AmountOrdering { min: String, amount: String },

    #[error("{field} should be positive, got {observed}")]
    NonPositiveAmount { field: String, observed: String },

    #[error("missing field {0}")]
    MissingField(String),

    #[error("{field} is not a valid amount: {source}")]
    InvalidAmount {
        field: String,
        #[source]
        source: AmountError,
    },

    #[error("{field} should be 0x-prefixed, got {observed:?}")]
    NotHexPrefixed { field: String, observed: String },

    #[error("{0} should not be empty")]
    EmptyCollection(String),

    #[error("CHEAPEST routes out of order: routes[0].toAmount {first} < routes[1].toAmount {second}")]
    RouteOrdering { first: String, second: String },

    #[error("expected error code in [{expected}], got {observed}")]
    ErrorCodeMismatch { expected: String, observed: String },

    #[error("{field} {observed} outside [{min}, {max}]")]
    PriceOutOfRange {
        field: String,
        observed: String,
        min: String,
        max: String,
    },

    #[error("failed to decode {what}: {reason}")]
    Decode { what: String, reason: String },

    #[error("{field}: expected {expected}, got {observed}")]
    Mismatch {
        field: String,
        expected: String,
        observed: String,
    },
}

/// Outcome of a passing check
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssertionReport {
    /// Soft findings that did not fail the case
    pub warnings: Vec<String>,
}

impl AssertionReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.warnings.push(message);
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn merge(&mut self, other: AssertionReport) {
        self.warnings.extend(other.warnings);
    }
}

/// Fail unless the status is one of `allowed`
pub fn expect_status(response: &ApiResponse, allowed: &[u16]) -> Result<(), AssertionFailure> {
    if allowed.contains(&response.status) {
        return Ok(());
    }
    Err(AssertionFailure::UnexpectedStatus {
        expected: join(allowed),
        observed: response.status,
    })
}

pub fn expect_schema(validator: &CompiledValidator, body: &serde_json::Value) -> Result<(), AssertionFailure> {
    let verdict = validator.validate(body);
    if verdict.is_valid() {
        Ok(())
    } else {
        Err(AssertionFailure::SchemaViolations {
            diagnostics: verdict.diagnostics(),
        })
    }
}

pub fn decode<T: DeserializeOwned>(response: &ApiResponse, what: &str) -> Result<T, AssertionFailure> {
    T::deserialize(&response.body).map_err(|e| AssertionFailure::Decode {
        what: what.to_string(),
        reason: e.to_string(),
    })
}

pub fn parse_amount(field: &str, raw: &str) -> Result<Amount, AssertionFailure> {
    Amount::parse(raw).map_err(|source| AssertionFailure::InvalidAmount {
        field: field.to_string(),
        source,
    })
}

/// Parse and require a strictly positive amount
pub fn expect_positive(field: &str, raw: &str) -> Result<Amount, AssertionFailure> {
    let amount = parse_amount(field, raw)?;
    if amount.is_zero() {
        return Err(AssertionFailure::NonPositiveAmount {
            field: field.to_string(),
            observed: raw.to_string(),
        });
    }
    Ok(amount)
}

/// `min <= amount`, compared as 256-bit integers
pub fn check_amount_floor(min: &str, amount: &str) -> Result<(), AssertionFailure> {
    let min_value = parse_amount("toAmountMin", min)?;
    let amount_value = parse_amount("toAmount", amount)?;
    if min_value > amount_value {
        return Err(AssertionFailure::AmountOrdering {
            min: min.to_string(),
            amount: amount.to_string(),
        });
    }
    Ok(())
}

pub fn expect_chain(field: &str, expected: ChainId, observed: ChainId) -> Result<(), AssertionFailure> {
    if expected == observed {
        return Ok(());
    }
    Err(AssertionFailure::ChainMismatch {
        field: field.to_string(),
        expected,
        observed,
    })
}

pub fn expect_hex_prefixed(field: &str, value: Option<&str>) -> Result<(), AssertionFailure> {
    match value {
        None => Err(AssertionFailure::MissingField(field.to_string())),
        Some(v) if v.starts_with("0x") => Ok(()),
        Some(v) => Err(AssertionFailure::NotHexPrefixed {
            field: field.to_string(),
            observed: v.to_string(),
        }),
    }
}

pub fn expect_non_empty(field: &str, value: &str) -> Result<(), AssertionFailure> {
    if value.is_empty() {
        Err(AssertionFailure::EmptyCollection(field.to_string()))
    } else {
        Ok(())
    }
}

pub(crate) fn join<T: ToString>(items: &[T]) -> String {
    items.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
pub(crate) mod test_support {
    use serde_json::Value;

    use crate::ports::ApiResponse;

    pub fn fixture(name: &str) -> Value {
        let path = format!("{}/fixtures/lifi/{}.json", env!("CARGO_MANIFEST_DIR"), name);
        let content = std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("fixture {}: {}", path, e));
        serde_json::from_str(&content).unwrap()
    }

    pub fn ok(name: &str) -> ApiResponse {
        ApiResponse::new(200, fixture(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_expect_status_lists_allowed_set() {
        let resp = ApiResponse::new(500, json!({}));
        let err = expect_status(&resp, &[400, 404]).unwrap_err();
        assert_eq!(err.to_string(), "expected HTTP status 400, 404, got 500");
        assert!(expect_status(&ApiResponse::new(404, json!({})), &[400, 404]).is_ok());
    }

    #[test]
    fn test_amount_floor_beyond_f64_precision() {
        // Both exceed 2^53 and differ only in the last digit
        assert!(check_amount_floor("9007199254740993", "9007199254740993").is_ok());
        assert!(check_amount_floor("9007199254740992", "9007199254740993").is_ok());
        let err = check_amount_floor("9007199254740993", "9007199254740992").unwrap_err();
        assert!(matches!(err, AssertionFailure::AmountOrdering { .. }));
    }

    #[test]
    fn test_amount_floor_rejects_non_decimal() {
        let err = check_amount_floor("1.5", "2").unwrap_err();
        assert!(matches!(err, AssertionFailure::InvalidAmount { ref field, .. } if field == "toAmountMin"));
    }

    #[test]
    fn test_expect_positive() {
        assert_eq!(expect_positive("toAmount", "42").unwrap(), Amount::from_u64(42));
        assert!(matches!(
            expect_positive("toAmount", "0"),
            Err(AssertionFailure::NonPositiveAmount { .. })
        ));
    }

    #[test]
    fn test_hex_prefix_checks() {
        assert!(expect_hex_prefixed("tx.to", Some("0xabc")).is_ok());
        assert!(matches!(
            expect_hex_prefixed("tx.to", Some("abc")),
            Err(AssertionFailure::NotHexPrefixed { .. })
        ));
        assert_eq!(
            expect_hex_prefixed("tx.data", None),
            Err(AssertionFailure::MissingField("tx.data".into()))
        );
    }

    #[test]
    fn test_report_merge() {
        let mut a = AssertionReport::new();
        assert!(a.is_clean());
        let mut b = AssertionReport::new();
        b.warn("message hint missing");
        a.merge(b);
        assert_eq!(a.warnings.len(), 1);
    }
}
