//! Token Amounts
//!
//! Smallest-unit token amounts as unsigned 256-bit integers. The wire format
//! is a decimal string; values routinely exceed 2^53 (18-decimal tokens) so
//! nothing here ever goes through `f64`.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::U256;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("amount is negative: {0}")]
    Negative(String),

    #[error("amount is not a decimal integer: {0}")]
    NotDecimal(String),

    #[error("amount overflows 256 bits: {0}")]
    Overflow(String),
}

/// Non-negative integer amount in a token's smallest unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(U256);

impl Amount {
    pub const ZERO: Amount = Amount(U256::ZERO);

    pub fn parse(raw: &str) -> Result<Self, AmountError> {
        raw.parse()
    }

    pub fn from_u64(value: u64) -> Self {
        Amount(U256::from(value))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn as_u256(&self) -> U256 {
        self.0
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(AmountError::Empty);
        }
        if let Some(rest) = s.strip_prefix('-') {
            if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
                return Err(AmountError::Negative(s.to_string()));
            }
            return Err(AmountError::NotDecimal(s.to_string()));
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AmountError::NotDecimal(s.to_string()));
        }
        U256::from_str_radix(s, 10)
            .map(Amount)
            .map_err(|_| AmountError::Overflow(s.to_string()))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<U256> for Amount {
    fn from(value: U256) -> Self {
        Amount(value)
    }
}

/// Convert a whole-token quantity to smallest units: `whole * 10^decimals`
pub fn to_token_amount(whole: u64, decimals: u8) -> Result<Amount, AmountError> {
    let scale = U256::from(10u64)
        .checked_pow(U256::from(decimals))
        .ok_or_else(|| AmountError::Overflow(format!("10^{}", decimals)))?;
    U256::from(whole)
        .checked_mul(scale)
        .map(Amount)
        .ok_or_else(|| AmountError::Overflow(format!("{} * 10^{}", whole, decimals)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_amounts() {
        assert_eq!(Amount::parse("0").unwrap(), Amount::ZERO);
        assert_eq!(Amount::parse("1000000").unwrap(), Amount::from_u64(1_000_000));
        let big = Amount::parse("115792089237316195423570985008687907853269984665640564039457584007913129639935").unwrap();
        assert_eq!(big.as_u256(), U256::MAX);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(Amount::parse(""), Err(AmountError::Empty));
        assert!(matches!(Amount::parse("-1000000"), Err(AmountError::Negative(_))));
        assert!(matches!(Amount::parse("1.5"), Err(AmountError::NotDecimal(_))));
        assert!(matches!(Amount::parse("abc"), Err(AmountError::NotDecimal(_))));
        assert!(matches!(Amount::parse("-"), Err(AmountError::NotDecimal(_))));
        assert!(matches!(Amount::parse(" 1"), Err(AmountError::NotDecimal(_))));
        // 2^256
        assert!(matches!(
            Amount::parse("115792089237316195423570985008687907853269984665640564039457584007913129639936"),
            Err(AmountError::Overflow(_))
        ));
    }

    #[test]
    fn test_ordering_beyond_float_precision() {
        // Both round to the same f64
        let a = Amount::parse("9007199254740993").unwrap();
        let b = Amount::parse("9007199254740992").unwrap();
        assert!(a > b);
        assert_eq!(9007199254740993u64 as f64, 9007199254740992u64 as f64);
    }

    #[test]
    fn test_to_token_amount() {
        assert_eq!(to_token_amount(1, 6).unwrap().to_string(), "1000000");
        assert_eq!(to_token_amount(1, 18).unwrap().to_string(), "1000000000000000000");
        assert_eq!(to_token_amount(0, 18).unwrap(), Amount::ZERO);
        assert_eq!(
            to_token_amount(u64::MAX, 18).unwrap().to_string(),
            "18446744073709551615000000000000000000"
        );
    }

    #[test]
    fn test_display_round_trips_digits() {
        let raw = "100000000000000000";
        assert_eq!(Amount::parse(raw).unwrap().to_string(), raw);
    }
}
