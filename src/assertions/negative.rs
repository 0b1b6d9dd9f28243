//! Negative-case assertions
//!
//! A rejected request must come back with one of the declared statuses, a
//! well-formed error envelope and one of the declared error codes. Message
//! substring hints are brittle against upstream wording changes, so they only
//! warn unless strict mode is requested.

use serde::Serialize;

use super::{decode, expect_schema, expect_status, join, AssertionFailure, AssertionReport};
use crate::api::{ErrorEnvelope, TokensResponse};
use crate::domain::ErrorCode;
use crate::ports::ApiResponse;
use crate::schema::CompiledSchemas;

/// A 200 answer that counts as a rejection because it carries nothing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "key", rename_all = "snake_case")]
pub enum EmptySuccess {
    /// `tokens[key]` is absent or an empty list
    TokensFor(String),
}

impl EmptySuccess {
    fn check(&self, response: &ApiResponse) -> Result<(), AssertionFailure> {
        match self {
            EmptySuccess::TokensFor(key) => {
                let listing: TokensResponse = decode(response, "tokens")?;
                match listing.tokens.get(key) {
                    Some(tokens) if !tokens.is_empty() => Err(AssertionFailure::Mismatch {
                        field: format!("tokens.{}", key),
                        expected: "absent or empty".into(),
                        observed: format!("{} tokens", tokens.len()),
                    }),
                    _ => Ok(()),
                }
            }
        }
    }
}

/// Declared outcome of a negative case
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpectedOutcome {
    /// Any of these HTTP statuses
    pub statuses: Vec<u16>,
    /// Any of these envelope codes; empty means the code is not checked
    pub codes: Vec<ErrorCode>,
    /// Case-insensitive substrings, at least one expected in the message
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub message_hints: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_success: Option<EmptySuccess>,
}

impl ExpectedOutcome {
    pub fn new(status: u16, code: ErrorCode) -> Self {
        Self {
            statuses: vec![status],
            codes: vec![code],
            message_hints: Vec::new(),
            empty_success: None,
        }
    }

    /// `400` with a validation error code
    pub fn validation() -> Self {
        Self::new(400, ErrorCode::Validation)
    }

    /// `400|404` with a validation or not-found code
    pub fn validation_or_not_found() -> Self {
        Self {
            statuses: vec![400, 404],
            codes: vec![ErrorCode::Validation, ErrorCode::NotFound],
            ..Self::validation()
        }
    }

    /// `400|404` with any code
    pub fn client_error() -> Self {
        Self {
            statuses: vec![400, 404],
            codes: Vec::new(),
            ..Self::validation()
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.message_hints.push(hint.into());
        self
    }

    pub fn or_empty_success(mut self, empty: EmptySuccess) -> Self {
        self.empty_success = Some(empty);
        self
    }

    fn hint_matches(&self, message: &str) -> bool {
        let message = message.to_lowercase();
        self.message_hints.iter().any(|h| message.contains(&h.to_lowercase()))
    }
}

pub fn assert_rejection(
    response: &ApiResponse,
    expected: &ExpectedOutcome,
    schemas: &CompiledSchemas,
    strict_hints: bool,
) -> Result<AssertionReport, AssertionFailure> {
    let mut report = AssertionReport::new();

    if response.is_success() {
        if let Some(ref empty) = expected.empty_success {
            empty.check(response)?;
            return Ok(report);
        }
    }

    expect_status(response, &expected.statuses)?;
    expect_schema(&schemas.error, &response.body)?;
    let envelope: ErrorEnvelope = decode(response, "error envelope")?;

    if !expected.codes.is_empty() {
        let matched = envelope.error_code().is_some_and(|code| expected.codes.contains(&code));
        if !matched {
            return Err(AssertionFailure::ErrorCodeMismatch {
                expected: join(&expected.codes),
                observed: envelope
                    .code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "none".to_string()),
            });
        }
    }

    if !expected.message_hints.is_empty() && !expected.hint_matches(&envelope.message) {
        let hints = expected.message_hints.join("|");
        if strict_hints {
            return Err(AssertionFailure::Mismatch {
                field: "message".into(),
                expected: format!("to mention {}", hints),
                observed: envelope.message,
            });
        }
        report.warn(format!("error message {:?} does not mention {}", envelope.message, hints));
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assertions::test_support::fixture;
    use serde_json::json;

    fn schemas() -> CompiledSchemas {
        CompiledSchemas::standard().unwrap()
    }

    #[test]
    fn test_validation_fixture_round_trip() {
        let response = ApiResponse::new(400, fixture("error_validation_v1"));
        let expected = ExpectedOutcome::validation().with_hint("fromAmount");
        let report = assert_rejection(&response, &expected, &schemas(), true).unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn test_not_found_accepted_by_set() {
        let response = ApiResponse::new(404, fixture("error_not_found_v1"));
        assert!(assert_rejection(&response, &ExpectedOutcome::validation_or_not_found(), &schemas(), false).is_ok());
        assert!(matches!(
            assert_rejection(&response, &ExpectedOutcome::validation(), &schemas(), false),
            Err(AssertionFailure::UnexpectedStatus { observed: 404, .. })
        ));
    }

    #[test]
    fn test_wrong_code_reports_both_sides() {
        let response = ApiResponse::new(400, fixture("error_not_found_v1"));
        let err = assert_rejection(&response, &ExpectedOutcome::validation(), &schemas(), false).unwrap_err();
        assert_eq!(
            err,
            AssertionFailure::ErrorCodeMismatch {
                expected: "1011 (VALIDATION)".into(),
                observed: "1003".into(),
            }
        );
    }

    #[test]
    fn test_missing_code_fails_when_codes_declared() {
        let response = ApiResponse::new(400, json!({"message": "bad request"}));
        let err = assert_rejection(&response, &ExpectedOutcome::validation(), &schemas(), false).unwrap_err();
        assert!(matches!(err, AssertionFailure::ErrorCodeMismatch { ref observed, .. } if observed == "none"));
        assert!(assert_rejection(&response, &ExpectedOutcome::client_error(), &schemas(), false).is_ok());
    }

    #[test]
    fn test_hint_miss_is_soft_unless_strict() {
        let response = ApiResponse::new(400, json!({"message": "Bad input", "code": 1011}));
        let expected = ExpectedOutcome::validation().with_hint("same token");

        let report = assert_rejection(&response, &expected, &schemas(), false).unwrap();
        assert_eq!(report.warnings.len(), 1);

        assert!(matches!(
            assert_rejection(&response, &expected, &schemas(), true),
            Err(AssertionFailure::Mismatch { .. })
        ));
    }

    #[test]
    fn test_hints_are_case_insensitive_alternatives() {
        let response = ApiResponse::new(400, json!({"message": "Unknown TOKEN 0xnope", "code": 1011}));
        let expected = ExpectedOutcome::validation().with_hint("address").with_hint("token");
        assert!(assert_rejection(&response, &expected, &schemas(), true).unwrap().is_clean());
    }

    #[test]
    fn test_empty_success_alternative() {
        let expected = ExpectedOutcome::client_error().or_empty_success(EmptySuccess::TokensFor("999999".into()));

        let empty = ApiResponse::new(200, json!({"tokens": {}}));
        assert!(assert_rejection(&empty, &expected, &schemas(), false).is_ok());

        let populated = ApiResponse::new(200, json!({"tokens": {"999999": [
            {"address": "0x1", "chainId": 999999, "symbol": "X", "decimals": 18, "name": "X"}
        ]}}));
        assert!(assert_rejection(&populated, &expected, &schemas(), false).is_err());

        let rejected = ApiResponse::new(400, json!({"message": "invalid chain"}));
        assert!(assert_rejection(&rejected, &expected, &schemas(), false).is_ok());
    }

    #[test]
    fn test_success_without_alternative_fails() {
        let response = ApiResponse::new(200, json!({"bridges": [], "exchanges": []}));
        assert!(matches!(
            assert_rejection(&response, &ExpectedOutcome::validation(), &schemas(), false),
            Err(AssertionFailure::UnexpectedStatus { observed: 200, .. })
        ));
    }

    #[test]
    fn test_empty_message_breaks_envelope() {
        let response = ApiResponse::new(400, json!({"message": "", "code": 1011}));
        assert!(matches!(
            assert_rejection(&response, &ExpectedOutcome::validation(), &schemas(), false),
            Err(AssertionFailure::SchemaViolations { .. })
        ));
    }
}
