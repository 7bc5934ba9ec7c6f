use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

use loan_desk_core::dues::SelectionMode;
use loan_desk_core::payments::PaymentPlan;
use loan_desk_core::records::{decode_dues, parse_api_date, CustomerForm, Due};
use loan_desk_core::DueId;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Dues arrive exactly as the loan API returns them.
fn dues_from(raw: Value) -> NapiResult<Vec<Due>> {
    decode_dues(raw).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// EMI
// ---------------------------------------------------------------------------

#[napi]
pub fn preview_emi(input_json: String) -> NapiResult<String> {
    let input: loan_desk_core::emi::EmiInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = loan_desk_core::emi::preview_emi(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Dues
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct SelectDuesInput {
    dues: Value,
    mode: SelectionMode,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp.
    reference_date: String,
}

#[napi]
pub fn select_dues(input_json: String) -> NapiResult<String> {
    let input: SelectDuesInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let dues = dues_from(input.dues)?;
    let date = parse_api_date(&input.reference_date).map_err(to_napi_error)?;
    let output = loan_desk_core::dues::summarize_selection(&dues, &input.mode, date);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct ToggleDueInput {
    selected: Vec<DueId>,
    due: DueId,
}

#[napi]
pub fn toggle_due(input_json: String) -> NapiResult<String> {
    let input: ToggleDueInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let selected = loan_desk_core::dues::toggle_due(input.selected, &input.due);
    serde_json::to_string(&selected).map_err(to_napi_error)
}

#[napi]
pub fn due_table(dues_json: String) -> NapiResult<String> {
    let raw: Value = serde_json::from_str(&dues_json).map_err(to_napi_error)?;
    let rows = loan_desk_core::dues::due_table(&dues_from(raw)?);
    serde_json::to_string(&rows).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct AllocateInput {
    dues: Value,
    selected: Vec<DueId>,
    plan: PaymentPlan,
}

#[napi]
pub fn allocate_payment(input_json: String) -> NapiResult<String> {
    let input: AllocateInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let dues = dues_from(input.dues)?;
    let output = loan_desk_core::payments::allocate_payment(&dues, &input.selected, &input.plan)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn generate_transaction_id() -> String {
    loan_desk_core::TransactionId::generate().to_string()
}

#[napi]
pub fn format_rupees(amount: String) -> NapiResult<String> {
    let amount = rust_decimal::Decimal::from_str(amount.trim()).map_err(to_napi_error)?;
    Ok(loan_desk_core::format_rupees(amount))
}

// ---------------------------------------------------------------------------
// Customers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct CustomerFormInput {
    form: CustomerForm,
    today: String,
}

/// Returns the cleaned customer, or fails with every field issue joined.
#[napi]
pub fn validate_customer(input_json: String) -> NapiResult<String> {
    let input: CustomerFormInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let today = parse_api_date(&input.today).map_err(to_napi_error)?;
    let customer = input.form.validate(today).map_err(to_napi_error)?;
    serde_json::to_string(&customer).map_err(to_napi_error)
}
