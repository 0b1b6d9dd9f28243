//! Aggregator error codes carried in the `code` field of the error envelope.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum ErrorCode {
    Default,
    FailedToBuildTransaction,
    NoQuote,
    NotFound,
    NotProcessable,
    RateLimit,
    Server,
    Slippage,
    ThirdParty,
    Timeout,
    Unauthorized,
    Validation,
    RpcFailure,
    MalformedSchema,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 14] = [
        ErrorCode::Default,
        ErrorCode::FailedToBuildTransaction,
        ErrorCode::NoQuote,
        ErrorCode::NotFound,
        ErrorCode::NotProcessable,
        ErrorCode::RateLimit,
        ErrorCode::Server,
        ErrorCode::Slippage,
        ErrorCode::ThirdParty,
        ErrorCode::Timeout,
        ErrorCode::Unauthorized,
        ErrorCode::Validation,
        ErrorCode::RpcFailure,
        ErrorCode::MalformedSchema,
    ];

    pub fn code(self) -> u16 {
        match self {
            ErrorCode::Default => 1000,
            ErrorCode::FailedToBuildTransaction => 1001,
            ErrorCode::NoQuote => 1002,
            ErrorCode::NotFound => 1003,
            ErrorCode::NotProcessable => 1004,
            ErrorCode::RateLimit => 1005,
            ErrorCode::Server => 1006,
            ErrorCode::Slippage => 1007,
            ErrorCode::ThirdParty => 1008,
            ErrorCode::Timeout => 1009,
            ErrorCode::Unauthorized => 1010,
            ErrorCode::Validation => 1011,
            ErrorCode::RpcFailure => 1012,
            ErrorCode::MalformedSchema => 1013,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|c| i64::from(c.code()) == code)
    }

    pub fn name(self) -> &'static str {
        match self {
            ErrorCode::Default => "DEFAULT",
            ErrorCode::FailedToBuildTransaction => "FAILED_TO_BUILD_TRANSACTION",
            ErrorCode::NoQuote => "NO_QUOTE",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::NotProcessable => "NOT_PROCESSABLE",
            ErrorCode::RateLimit => "RATE_LIMIT",
            ErrorCode::Server => "SERVER",
            ErrorCode::Slippage => "SLIPPAGE",
            ErrorCode::ThirdParty => "THIRD_PARTY",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Validation => "VALIDATION",
            ErrorCode::RpcFailure => "RPC_FAILURE",
            ErrorCode::MalformedSchema => "MALFORMED_SCHEMA",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        ErrorCode::from_code(i64::from(value)).ok_or_else(|| format!("unknown error code {}", value))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code(), self.name())
    }
}
