//! Quote Assertions
//!
//! Business invariants for `GET /quote`: chain ids echo the request, the
//! estimate is positive and ordered (`toAmountMin <= toAmount`), tool info is
//! present and any EVM transaction request is hex encoded.

use super::{
    check_amount_floor, decode, expect_chain, expect_hex_prefixed, expect_non_empty, expect_positive,
    expect_schema, expect_status, AssertionFailure, AssertionReport,
};
use crate::api::{QuoteParams, QuoteResponse};
use crate::domain::ChainId;
use crate::ports::ApiResponse;
use crate::schema::CompiledSchemas;

/// Absolute tolerance when comparing echoed slippage fractions
const SLIPPAGE_TOLERANCE: f64 = 1e-9;

/// What a successful quote must look like
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteExpectation {
    pub from_chain: ChainId,
    pub to_chain: ChainId,
    /// Fail when `transactionRequest` is absent
    pub require_transaction_request: bool,
    /// Fail when `estimate.gasCosts` is empty
    pub require_gas_costs: bool,
    /// Fail unless `estimate.executionDuration > 0`
    pub require_execution_duration: bool,
    /// Echoed `action.slippage`, checked only when the response carries it
    pub slippage: Option<f64>,
    /// Echoed `action.toAddress`, checked only when the response carries it
    pub to_address: Option<String>,
}

impl QuoteExpectation {
    pub fn new(from_chain: ChainId, to_chain: ChainId) -> Self {
        Self {
            from_chain,
            to_chain,
            require_transaction_request: false,
            require_gas_costs: false,
            require_execution_duration: false,
            slippage: None,
            to_address: None,
        }
    }

    /// Echo expectations derived from the request that produced the quote
    pub fn for_params(params: &QuoteParams) -> Self {
        Self {
            slippage: params.slippage,
            to_address: params.to_address.clone(),
            ..Self::new(params.from_chain, params.to_chain)
        }
    }

    pub fn with_transaction_request(mut self) -> Self {
        self.require_transaction_request = true;
        self
    }

    pub fn with_gas_costs(mut self) -> Self {
        self.require_gas_costs = true;
        self
    }

    pub fn with_execution_duration(mut self) -> Self {
        self.require_execution_duration = true;
        self
    }
}

/// Validate a quote response: status, schema, then business invariants
pub fn assert_quote(
    response: &ApiResponse,
    expectation: &QuoteExpectation,
    schemas: &CompiledSchemas,
) -> Result<AssertionReport, AssertionFailure> {
    expect_status(response, &[200])?;
    expect_schema(&schemas.quote, &response.body)?;
    let quote: QuoteResponse = decode(response, "quote")?;
    let mut report = AssertionReport::new();

    expect_chain("action.fromChainId", expectation.from_chain, quote.action.from_chain_id)?;
    expect_chain("action.toChainId", expectation.to_chain, quote.action.to_chain_id)?;

    expect_positive("estimate.toAmount", &quote.estimate.to_amount)?;
    check_amount_floor(&quote.estimate.to_amount_min, &quote.estimate.to_amount)?;

    expect_non_empty("tool", &quote.tool)?;
    let details = quote
        .tool_details
        .as_ref()
        .ok_or_else(|| AssertionFailure::MissingField("toolDetails".into()))?;
    expect_non_empty("toolDetails.key", &details.key)?;
    expect_non_empty("toolDetails.name", &details.name)?;

    match quote.transaction_request {
        Some(ref tx) => {
            expect_hex_prefixed("transactionRequest.to", tx.to.as_deref())?;
            expect_hex_prefixed("transactionRequest.data", tx.data.as_deref())?;
        }
        None if expectation.require_transaction_request => {
            return Err(AssertionFailure::MissingField("transactionRequest".into()));
        }
        None => {}
    }

    if expectation.require_gas_costs {
        let first = quote
            .estimate
            .gas_costs
            .first()
            .ok_or_else(|| AssertionFailure::EmptyCollection("estimate.gasCosts".into()))?;
        expect_non_empty("estimate.gasCosts[0].type", &first.cost_type)?;
        expect_non_empty("estimate.gasCosts[0].token.symbol", &first.token.symbol)?;
    }

    if expectation.require_execution_duration {
        match quote.estimate.execution_duration {
            Some(d) if d > 0.0 => {}
            Some(d) => {
                return Err(AssertionFailure::Mismatch {
                    field: "estimate.executionDuration".into(),
                    expected: "> 0".into(),
                    observed: d.to_string(),
                })
            }
            None => return Err(AssertionFailure::MissingField("estimate.executionDuration".into())),
        }
    }

    if let (Some(expected), Some(observed)) = (expectation.slippage, quote.action.slippage) {
        if (expected - observed).abs() > SLIPPAGE_TOLERANCE {
            return Err(AssertionFailure::Mismatch {
                field: "action.slippage".into(),
                expected: expected.to_string(),
                observed: observed.to_string(),
            });
        }
    }

    if let (Some(ref expected), Some(ref observed)) = (&expectation.to_address, &quote.action.to_address) {
        if !expected.eq_ignore_ascii_case(observed) {
            return Err(AssertionFailure::Mismatch {
                field: "action.toAddress".into(),
                expected: expected.clone(),
                observed: observed.clone(),
            });
        }
    }

    if quote.estimate.execution_duration.is_none() {
        report.warn(format!("quote {} has no executionDuration estimate", quote.id));
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assertions::test_support::{fixture, ok};
    use serde_json::{json, Value};

    fn schemas() -> CompiledSchemas {
        CompiledSchemas::standard().unwrap()
    }

    #[test]
    fn test_swap_fixture_passes_strict_expectation() {
        let expectation = QuoteExpectation::new(ChainId::ETHEREUM, ChainId::ETHEREUM)
            .with_transaction_request()
            .with_gas_costs()
            .with_execution_duration();
        let report = assert_quote(&ok("quote_swap_v1"), &expectation, &schemas()).unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn test_chain_echo_mismatch() {
        let expectation = QuoteExpectation::new(ChainId::ETHEREUM, ChainId::ARBITRUM);
        let err = assert_quote(&ok("quote_bridge_v1"), &expectation, &schemas()).unwrap_err();
        assert_eq!(
            err,
            AssertionFailure::ChainMismatch {
                field: "action.toChainId".into(),
                expected: ChainId::ARBITRUM,
                observed: ChainId::POLYGON,
            }
        );
    }

    #[test]
    fn test_min_above_amount_fails_beyond_2_pow_53() {
        let mut body = fixture("quote_bridge_v1");
        body["estimate"]["toAmount"] = Value::from("9007199254740992");
        body["estimate"]["toAmountMin"] = Value::from("9007199254740993");
        let expectation = QuoteExpectation::new(ChainId::ETHEREUM, ChainId::POLYGON);
        let err = assert_quote(&ApiResponse::new(200, body), &expectation, &schemas()).unwrap_err();
        assert!(matches!(err, AssertionFailure::AmountOrdering { .. }));
    }

    #[test]
    fn test_zero_to_amount_fails() {
        let mut body = fixture("quote_swap_v1");
        body["estimate"]["toAmount"] = Value::from("0");
        body["estimate"]["toAmountMin"] = Value::from("0");
        let expectation = QuoteExpectation::new(ChainId::ETHEREUM, ChainId::ETHEREUM);
        let err = assert_quote(&ApiResponse::new(200, body), &expectation, &schemas()).unwrap_err();
        assert!(matches!(err, AssertionFailure::NonPositiveAmount { .. }));
    }

    #[test]
    fn test_non_hex_transaction_data_fails() {
        let mut body = fixture("quote_swap_v1");
        body["transactionRequest"]["data"] = Value::from("deadbeef");
        let expectation = QuoteExpectation::new(ChainId::ETHEREUM, ChainId::ETHEREUM);
        let err = assert_quote(&ApiResponse::new(200, body), &expectation, &schemas()).unwrap_err();
        assert!(matches!(err, AssertionFailure::NotHexPrefixed { ref field, .. } if field == "transactionRequest.data"));
    }

    #[test]
    fn test_missing_transaction_request_only_fails_when_required() {
        let mut body = fixture("quote_swap_v1");
        body.as_object_mut().unwrap().remove("transactionRequest");
        let response = ApiResponse::new(200, body);
        let lenient = QuoteExpectation::new(ChainId::ETHEREUM, ChainId::ETHEREUM);
        assert!(assert_quote(&response, &lenient, &schemas()).is_ok());

        let strict = lenient.with_transaction_request();
        assert_eq!(
            assert_quote(&response, &strict, &schemas()).unwrap_err(),
            AssertionFailure::MissingField("transactionRequest".into())
        );
    }

    #[test]
    fn test_slippage_echo() {
        let params = QuoteParams::new(ChainId::ETHEREUM, ChainId::POLYGON, "USDC", "USDC", "1000000", "0xabc")
            .with_slippage(0.01);
        let err = assert_quote(&ok("quote_bridge_v1"), &QuoteExpectation::for_params(&params), &schemas()).unwrap_err();
        assert!(matches!(err, AssertionFailure::Mismatch { ref field, .. } if field == "action.slippage"));

        let params = params.with_slippage(0.005);
        assert!(assert_quote(&ok("quote_bridge_v1"), &QuoteExpectation::for_params(&params), &schemas()).is_ok());
    }

    #[test]
    fn test_error_status_fails_before_schema() {
        let response = ApiResponse::new(400, json!({"message": "bad", "code": 1011}));
        let expectation = QuoteExpectation::new(ChainId::ETHEREUM, ChainId::ETHEREUM);
        assert!(matches!(
            assert_quote(&response, &expectation, &schemas()),
            Err(AssertionFailure::UnexpectedStatus { observed: 400, .. })
        ));
    }
}
