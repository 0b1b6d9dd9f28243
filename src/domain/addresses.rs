//! Test Wallet Addresses
//!
//! Fixed address literals for request parameters. These are test addresses
//! only; the invalid ones exist solely to provoke validation failures.

use serde::Serialize;

use super::token::NATIVE_TOKEN_ADDRESS;

/// Generic sender/receiver used for EVM calls
pub const EVM_DEFAULT_ADDRESS: &str = "0x552008c0f6870c2f77e5cC1d2eb9bdff03e30Ea0";

/// Length of a `0x`-prefixed 20-byte hex address
const EVM_ADDRESS_LEN: usize = 42;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidAddresses {
    /// Not hex at all
    pub not_hex: String,
    /// Correct prefix, wrong length
    pub too_short: String,
    /// Right length of hex digits but no `0x` prefix
    pub missing_prefix: String,
    /// Right shape, non-hex characters
    pub non_hex_digits: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestAddressSet {
    pub evm_default: String,
    pub zero: String,
    pub invalid: InvalidAddresses,
}

impl Default for TestAddressSet {
    fn default() -> Self {
        Self {
            evm_default: EVM_DEFAULT_ADDRESS.to_string(),
            zero: NATIVE_TOKEN_ADDRESS.to_string(),
            invalid: InvalidAddresses {
                not_hex: "not-an-address".to_string(),
                too_short: "0x123".to_string(),
                missing_prefix: "552008c0f6870c2f77e5cC1d2eb9bdff03e30Ea0".to_string(),
                non_hex_digits: "0xZZ2008c0f6870c2f77e5cC1d2eb9bdff03e30Ea0".to_string(),
            },
        }
    }
}

impl TestAddressSet {
    pub fn invalid_all(&self) -> [&str; 4] {
        [
            &self.invalid.not_hex,
            &self.invalid.too_short,
            &self.invalid.missing_prefix,
            &self.invalid.non_hex_digits,
        ]
    }
}

/// Syntactic EVM address check: `0x` followed by 40 hex digits
pub fn is_evm_address(candidate: &str) -> bool {
    candidate.len() == EVM_ADDRESS_LEN
        && candidate.starts_with("0x")
        && candidate[2..].chars().all(|c| c.is_ascii_hexdigit())
}
