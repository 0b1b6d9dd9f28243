//! Domain Layer - fixtures and scenario data
//!
//! Pure data: chains, tokens, test addresses, amounts and error codes. No I/O.
//! Everything here is built once and shared read-only.

pub mod addresses;
pub mod amount;
pub mod chain;
pub mod error_code;
pub mod fixtures;
pub mod scenario;
pub mod token;

pub use addresses::{is_evm_address, InvalidAddresses, TestAddressSet, EVM_DEFAULT_ADDRESS};
pub use amount::{to_token_amount, Amount, AmountError};
pub use chain::{ChainDescriptor, ChainId, ChainRegistry, ChainType};
pub use error_code::ErrorCode;
pub use fixtures::{FixtureError, FixtureRegistry};
pub use scenario::{ScenarioCase, Tag, TransferType};
pub use token::{TokenDescriptor, TokenRegistry, MAX_TOKEN_DECIMALS, NATIVE_TOKEN_ADDRESS};
