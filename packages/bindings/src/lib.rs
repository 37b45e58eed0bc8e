use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Compute an amortization schedule from a JSON-encoded request.
///
/// Validation happens here at the boundary; a malformed or out-of-range
/// request is rejected before the engine runs.
#[napi]
pub fn compute_schedule(input_json: String) -> NapiResult<String> {
    let request: amort_core::schedule::LoanRequest =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amort_core::schedule::build_schedule(&request).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Map an external payment-scheme token onto its display label.
#[napi]
pub fn scheme_label(token: String) -> String {
    amort_core::schedule::PaymentScheme::from_token(&token)
        .label()
        .to_string()
}
