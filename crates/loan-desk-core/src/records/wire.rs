//! Decoding helpers shared by the API record types.
//!
//! The loan API speaks loosely-typed JSON: ids under `_id`, references that are
//! either a bare id or an embedded document, numbers that sometimes arrive as
//! strings and dates as either `YYYY-MM-DD` or full RFC 3339 timestamps.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

use crate::error::LoanDeskError;
use crate::LoanDeskResult;

/// A reference to another document: bare id or embedded object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum IdRef {
    Id(String),
    Embedded {
        #[serde(rename = "_id")]
        id: String,
    },
}

impl IdRef {
    pub(crate) fn into_id(self) -> String {
        match self {
            IdRef::Id(id) | IdRef::Embedded { id } => id,
        }
    }
}

pub(crate) fn require<T>(value: Option<T>, resource: &str, field: &str) -> LoanDeskResult<T> {
    value.ok_or_else(|| LoanDeskError::schema(resource, format!("missing field '{field}'")))
}

pub(crate) fn require_id(
    value: Option<String>,
    resource: &str,
    field: &str,
) -> LoanDeskResult<String> {
    let id = require(value, resource, field)?;
    if id.trim().is_empty() {
        return Err(LoanDeskError::schema(resource, format!("empty '{field}'")));
    }
    Ok(id)
}

/// Non-empty trimmed text, or `None` for missing/blank values.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// A JSON number or numeric string as a Decimal. Blank strings and null are `None`.
pub(crate) fn optional_amount(
    value: Option<Value>,
    resource: &str,
    field: &str,
) -> LoanDeskResult<Option<Decimal>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .map(Some)
            .map_err(|e| not_decimal(resource, field, e)),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Decimal::from_str(s.trim())
            .map(Some)
            .map_err(|e| not_decimal(resource, field, e)),
        Some(other) => Err(LoanDeskError::schema(
            resource,
            format!("'{field}' must be a number, got {other}"),
        )),
    }
}

fn not_decimal(resource: &str, field: &str, err: rust_decimal::Error) -> LoanDeskError {
    LoanDeskError::schema(resource, format!("'{field}' is not a decimal: {err}"))
}

pub(crate) fn require_amount(
    value: Option<Value>,
    resource: &str,
    field: &str,
) -> LoanDeskResult<Decimal> {
    require(optional_amount(value, resource, field)?, resource, field)
}

/// A whole, non-negative count (e.g. a loan duration in months).
pub(crate) fn require_count(
    value: Option<Value>,
    resource: &str,
    field: &str,
) -> LoanDeskResult<u32> {
    let amount = require_amount(value, resource, field)?;
    if amount.fract() != Decimal::ZERO || amount < Decimal::ZERO {
        return Err(LoanDeskError::schema(
            resource,
            format!("'{field}' must be a whole number, got {amount}"),
        ));
    }
    amount
        .to_u32()
        .ok_or_else(|| LoanDeskError::schema(resource, format!("'{field}' is out of range")))
}

/// Calendar date from `YYYY-MM-DD` or an RFC 3339 timestamp.
///
/// Timestamps keep the calendar date as written in their own offset.
pub fn parse_api_date(raw: &str) -> LoanDeskResult<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .map_err(|e| LoanDeskError::DateError(format!("'{raw}': {e}")))
}

pub(crate) fn parse_api_timestamp(raw: &str) -> LoanDeskResult<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw.trim())?.with_timezone(&Utc))
}

pub(crate) fn date_field(
    value: Option<String>,
    resource: &str,
    field: &str,
) -> LoanDeskResult<Option<NaiveDate>> {
    match optional_text(value) {
        None => Ok(None),
        Some(s) => parse_api_date(&s)
            .map(Some)
            .map_err(|e| LoanDeskError::schema(resource, format!("'{field}': {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_parse_plain_and_timestamp_dates() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        assert_eq!(parse_api_date("2025-03-05").unwrap(), d);
        assert_eq!(parse_api_date("2025-03-05T00:00:00.000Z").unwrap(), d);
        assert_eq!(parse_api_date("2025-03-05T23:30:00+05:30").unwrap(), d);
        assert!(parse_api_date("05/03/2025").is_err());
    }

    #[test]
    fn test_amounts_from_numbers_and_strings() {
        assert_eq!(
            optional_amount(Some(json!(8884.88)), "due", "dueAmount").unwrap(),
            Some(dec!(8884.88))
        );
        assert_eq!(
            optional_amount(Some(json!("45000")), "customer", "income").unwrap(),
            Some(dec!(45000))
        );
        assert_eq!(optional_amount(Some(json!("")), "customer", "income").unwrap(), None);
        assert!(optional_amount(Some(json!(true)), "due", "dueAmount").is_err());
    }

    #[test]
    fn test_count_rejects_fractions() {
        assert_eq!(require_count(Some(json!(12)), "loan", "duration").unwrap(), 12);
        assert!(require_count(Some(json!(1.5)), "loan", "duration").is_err());
        assert!(require_count(Some(json!(-3)), "loan", "duration").is_err());
    }

    #[test]
    fn test_id_ref_accepts_embedded_documents() {
        let bare: IdRef = serde_json::from_value(json!("l1")).unwrap();
        let embedded: IdRef = serde_json::from_value(json!({"_id": "l1", "principal": 5})).unwrap();
        assert_eq!(bare.into_id(), "l1");
        assert_eq!(embedded.into_id(), "l1");
    }
}
