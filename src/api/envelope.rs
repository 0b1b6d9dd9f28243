//! Error envelope returned with non-2xx responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::ErrorCode;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub message: String,
    /// Raw numeric code; may fall outside the known enumeration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Value>,
}

impl ErrorEnvelope {
    pub fn error_code(&self) -> Option<ErrorCode> {
        self.code.and_then(ErrorCode::from_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_codes() {
        let env: ErrorEnvelope =
            serde_json::from_str(r#"{"message": "Invalid fromAmount", "code": 1011}"#).unwrap();
        assert_eq!(env.error_code(), Some(ErrorCode::Validation));

        let odd: ErrorEnvelope = serde_json::from_str(r#"{"message": "teapot", "code": 418}"#).unwrap();
        assert_eq!(odd.code, Some(418));
        assert_eq!(odd.error_code(), None);
    }
}
