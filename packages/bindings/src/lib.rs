use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use std::str::FromStr;

use loan_calc_core::amortization;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

#[napi]
pub fn compute_payment(input_json: String) -> NapiResult<String> {
    let input: amortization::PaymentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::calculate_payment(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let terms: amortization::LoanTerms =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::analyze_loan(&terms).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn what_if_analysis(input_json: String) -> NapiResult<String> {
    let terms: amortization::LoanTerms =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::compare_what_if(&terms).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Amount passed as a decimal string to avoid float rounding in JS.
#[napi]
pub fn human_currency(amount: String) -> NapiResult<String> {
    let value = Decimal::from_str(amount.trim()).map_err(to_napi_error)?;
    Ok(loan_calc_core::format::human_currency(value))
}
