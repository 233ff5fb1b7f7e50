use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use rental_analysis_core::amortization::{self, AmortizationInput};
use rental_analysis_core::metrics::{self, DscrStrength};
use rental_analysis_core::{analysis, grading, screening, Property};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_property(input_json: &str) -> NapiResult<Property> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Property analysis
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_property(input_json: String) -> NapiResult<String> {
    let property = parse_property(&input_json)?;
    let output = analysis::analyze_property(&property).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compute_metrics(input_json: String) -> NapiResult<String> {
    let property = parse_property(&input_json)?;
    serde_json::to_string(&metrics::investment_metrics(&property)).map_err(to_napi_error)
}

#[napi]
pub fn compute_grade(input_json: String) -> NapiResult<String> {
    let property = parse_property(&input_json)?;
    let breakdown = grading::score_investment(&metrics::investment_metrics(&property));
    serde_json::to_string(&breakdown).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Loan
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_loan_details(input_json: String) -> NapiResult<String> {
    let input: AmortizationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let details = amortization::loan_details(input.loan_amount, input.interest_rate, input.term_years);
    serde_json::to_string(&details).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: AmortizationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::build_amortization_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Ratios
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct OnePercentInput {
    monthly_rent: Decimal,
    purchase_price: Decimal,
}

#[derive(Deserialize)]
struct DscrInput {
    annual_noi: Decimal,
    annual_debt_service: Decimal,
}

#[napi]
pub fn one_percent_rule(input_json: String) -> NapiResult<String> {
    let input: OnePercentInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let ratio = metrics::one_percent_rule(input.monthly_rent, input.purchase_price);
    let output = json!({
        "one_percent_rule": ratio.round_dp(4),
        "passes": metrics::passes_one_percent_rule(ratio),
    });
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn dscr(input_json: String) -> NapiResult<String> {
    let input: DscrInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let ratio = metrics::dscr(input.annual_noi, input.annual_debt_service);
    let output = json!({
        "dscr": ratio.round_dp(4),
        "strength": DscrStrength::classify(ratio),
    });
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Screening
// ---------------------------------------------------------------------------

#[napi]
pub fn screen_properties(input_json: String) -> NapiResult<String> {
    let input: screening::ScreeningInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = screening::screen_properties(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
