//! Token Assertions
//!
//! `/tokens` maps chain id keys to token lists; `/token` returns one token
//! with its USD price. Prices are decimal strings and are only ever parsed
//! here, into [`Decimal`], for range checks.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{
    decode, expect_chain, expect_non_empty, expect_schema, expect_status, AssertionFailure, AssertionReport,
};
use crate::api::{TokenDetails, TokensResponse};
use crate::domain::ChainId;
use crate::ports::ApiResponse;
use crate::schema::CompiledSchemas;

/// Acceptable USD price for a token
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceRange {
    /// Inclusive on both ends
    Between(Decimal, Decimal),
    /// Strictly above
    Above(Decimal),
}

impl PriceRange {
    /// Dollar-pegged stablecoin band
    pub fn stablecoin() -> Self {
        PriceRange::Between(dec!(0.95), dec!(1.05))
    }

    pub fn positive() -> Self {
        PriceRange::Above(Decimal::ZERO)
    }

    pub fn contains(&self, price: Decimal) -> bool {
        match *self {
            PriceRange::Between(min, max) => price >= min && price <= max,
            PriceRange::Above(min) => price > min,
        }
    }

    fn bounds(&self) -> (String, String) {
        match *self {
            PriceRange::Between(min, max) => (min.to_string(), max.to_string()),
            PriceRange::Above(min) => (format!("> {}", min), "inf".to_string()),
        }
    }
}

/// Parse a `priceUSD` string, accepting plain and scientific notation
pub fn parse_price(field: &str, raw: &str) -> Result<Decimal, AssertionFailure> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| AssertionFailure::Mismatch {
            field: field.to_string(),
            expected: "decimal price string".into(),
            observed: raw.to_string(),
        })
}

fn check_price(field: &str, raw: &str, range: PriceRange) -> Result<Decimal, AssertionFailure> {
    let price = parse_price(field, raw)?;
    if !range.contains(price) {
        let (min, max) = range.bounds();
        return Err(AssertionFailure::PriceOutOfRange {
            field: field.to_string(),
            observed: raw.to_string(),
            min,
            max,
        });
    }
    Ok(price)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenListingExpectation {
    /// Each chain must map to a non-empty token list
    pub chains: Vec<ChainId>,
    /// Token (chain, symbol) that must be listed with a positive price
    pub priced: Option<(ChainId, String)>,
    /// First token of the first chain has address, symbol and name
    pub require_complete_first: bool,
}

impl TokenListingExpectation {
    pub fn for_chains(chains: &[ChainId]) -> Self {
        Self {
            chains: chains.to_vec(),
            ..Self::default()
        }
    }

    pub fn with_priced(mut self, chain: ChainId, symbol: impl Into<String>) -> Self {
        self.priced = Some((chain, symbol.into()));
        self
    }

    pub fn with_complete_first(mut self) -> Self {
        self.require_complete_first = true;
        self
    }
}

pub fn assert_token_listing(
    response: &ApiResponse,
    expectation: &TokenListingExpectation,
    schemas: &CompiledSchemas,
) -> Result<AssertionReport, AssertionFailure> {
    expect_status(response, &[200])?;
    expect_schema(&schemas.tokens, &response.body)?;
    let listing: TokensResponse = decode(response, "tokens")?;

    for chain in &expectation.chains {
        let tokens = listing
            .for_chain(*chain)
            .ok_or_else(|| AssertionFailure::MissingField(format!("tokens.{}", chain)))?;
        if tokens.is_empty() {
            return Err(AssertionFailure::EmptyCollection(format!("tokens.{}", chain)));
        }
    }

    if expectation.require_complete_first {
        if let Some(token) = expectation
            .chains
            .first()
            .and_then(|c| listing.for_chain(*c))
            .and_then(|tokens| tokens.first())
        {
            expect_non_empty("tokens[0].address", &token.address)?;
            expect_non_empty("tokens[0].symbol", &token.symbol)?;
            expect_non_empty("tokens[0].name", &token.name)?;
        }
    }

    if let Some((chain, ref symbol)) = expectation.priced {
        let field = format!("tokens.{}.{}.priceUSD", chain, symbol);
        let token = listing
            .for_chain(chain)
            .and_then(|tokens| tokens.iter().find(|t| t.symbol.eq_ignore_ascii_case(symbol)))
            .ok_or_else(|| AssertionFailure::MissingField(format!("tokens.{}.{}", chain, symbol)))?;
        let price = token
            .price_usd
            .as_deref()
            .ok_or_else(|| AssertionFailure::MissingField(field.clone()))?;
        check_price(&field, price, PriceRange::positive())?;
    }

    Ok(AssertionReport::new())
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenDetailExpectation {
    pub chain: ChainId,
    /// Compared case-insensitively
    pub symbol: Option<String>,
    /// Compared case-insensitively
    pub address: Option<String>,
    pub decimals: Option<u8>,
    pub price: PriceRange,
    /// When market fields are present they must be positive numbers
    pub check_market_data: bool,
}

impl TokenDetailExpectation {
    pub fn new(chain: ChainId) -> Self {
        Self {
            chain,
            symbol: None,
            address: None,
            decimals: None,
            price: PriceRange::positive(),
            check_market_data: false,
        }
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = Some(decimals);
        self
    }

    pub fn with_price(mut self, range: PriceRange) -> Self {
        self.price = range;
        self
    }

    pub fn with_market_data(mut self) -> Self {
        self.check_market_data = true;
        self
    }
}

pub fn assert_token_details(
    response: &ApiResponse,
    expectation: &TokenDetailExpectation,
    schemas: &CompiledSchemas,
) -> Result<AssertionReport, AssertionFailure> {
    expect_status(response, &[200])?;
    expect_schema(&schemas.token_details, &response.body)?;
    let token: TokenDetails = decode(response, "token")?;
    let mut report = AssertionReport::new();

    expect_chain("chainId", expectation.chain, token.chain_id)?;

    if let Some(ref symbol) = expectation.symbol {
        if !token.symbol.eq_ignore_ascii_case(symbol) {
            return Err(mismatch("symbol", symbol, &token.symbol));
        }
    }
    if let Some(ref address) = expectation.address {
        if !token.address.eq_ignore_ascii_case(address) {
            return Err(mismatch("address", address, &token.address));
        }
    }
    if let Some(decimals) = expectation.decimals {
        if token.decimals != decimals {
            return Err(mismatch("decimals", &decimals.to_string(), &token.decimals.to_string()));
        }
    }

    check_price("priceUSD", &token.price_usd, expectation.price)?;

    if expectation.check_market_data {
        match token.market_cap_usd {
            Some(cap) if cap <= 0.0 => {
                return Err(mismatch("marketCapUSD", "> 0", &cap.to_string()));
            }
            Some(_) => {}
            None => report.warn(format!("{} has no marketCapUSD", token.symbol)),
        }
        if let Some(volume) = token.volume_usd_24h {
            if volume < 0.0 {
                return Err(mismatch("volumeUSD24H", ">= 0", &volume.to_string()));
            }
        }
    }

    Ok(report)
}

fn mismatch(field: &str, expected: &str, observed: &str) -> AssertionFailure {
    AssertionFailure::Mismatch {
        field: field.to_string(),
        expected: expected.to_string(),
        observed: observed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assertions::test_support::{fixture, ok};
    use crate::domain::NATIVE_TOKEN_ADDRESS;
    use serde_json::Value;

    fn schemas() -> CompiledSchemas {
        CompiledSchemas::standard().unwrap()
    }

    fn usdc() -> TokenDetailExpectation {
        TokenDetailExpectation::new(ChainId::ETHEREUM)
            .with_symbol("USDC")
            .with_decimals(6)
            .with_price(PriceRange::stablecoin())
    }

    #[test]
    fn test_usdc_detail_passes() {
        let report = assert_token_details(&ok("token_usdc_v1"), &usdc().with_market_data(), &schemas()).unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn test_stablecoin_band_is_inclusive() {
        let band = PriceRange::stablecoin();
        assert!(band.contains(dec!(0.95)));
        assert!(band.contains(dec!(1.05)));
        assert!(!band.contains(dec!(1.0501)));
        assert!(!PriceRange::positive().contains(Decimal::ZERO));
    }

    #[test]
    fn test_depegged_price_fails() {
        let mut body = fixture("token_usdc_v1");
        body["priceUSD"] = Value::from("0.91");
        let err = assert_token_details(&ApiResponse::new(200, body), &usdc(), &schemas()).unwrap_err();
        assert_eq!(
            err,
            AssertionFailure::PriceOutOfRange {
                field: "priceUSD".into(),
                observed: "0.91".into(),
                min: "0.95".into(),
                max: "1.05".into(),
            }
        );
    }

    #[test]
    fn test_scientific_price_parses() {
        assert_eq!(parse_price("priceUSD", "1e-6").unwrap(), dec!(0.000001));
        assert!(parse_price("priceUSD", "about one dollar").is_err());
    }

    #[test]
    fn test_native_eth_detail() {
        let expectation = TokenDetailExpectation::new(ChainId::ETHEREUM)
            .with_symbol("eth")
            .with_address(NATIVE_TOKEN_ADDRESS)
            .with_decimals(18)
            .with_price(PriceRange::Above(dec!(100)));
        assert!(assert_token_details(&ok("token_eth_v1"), &expectation, &schemas()).is_ok());
    }

    #[test]
    fn test_address_compared_case_insensitively() {
        let expectation = TokenDetailExpectation::new(ChainId::ETHEREUM)
            .with_address("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
        assert!(assert_token_details(&ok("token_usdc_v1"), &expectation, &schemas()).is_ok());
    }

    #[test]
    fn test_wrong_chain_fails() {
        let expectation = TokenDetailExpectation::new(ChainId::POLYGON);
        assert!(matches!(
            assert_token_details(&ok("token_usdc_v1"), &expectation, &schemas()),
            Err(AssertionFailure::ChainMismatch { .. })
        ));
    }

    #[test]
    fn test_negative_market_cap_fails() {
        let mut body = fixture("token_usdc_v1");
        body["marketCapUSD"] = Value::from(-1.0);
        let err = assert_token_details(&ApiResponse::new(200, body), &usdc().with_market_data(), &schemas())
            .unwrap_err();
        assert!(matches!(err, AssertionFailure::Mismatch { ref field, .. } if field == "marketCapUSD"));
    }

    #[test]
    fn test_listing_covers_requested_chains() {
        let expectation = TokenListingExpectation::for_chains(&[ChainId::ETHEREUM, ChainId::POLYGON, ChainId::SOLANA])
            .with_priced(ChainId::ETHEREUM, "ETH")
            .with_complete_first();
        assert!(assert_token_listing(&ok("tokens_v1"), &expectation, &schemas()).is_ok());
    }

    #[test]
    fn test_listing_missing_chain_fails() {
        let expectation = TokenListingExpectation::for_chains(&[ChainId::ARBITRUM]);
        assert_eq!(
            assert_token_listing(&ok("tokens_v1"), &expectation, &schemas()).unwrap_err(),
            AssertionFailure::MissingField("tokens.42161".into())
        );
    }
}
