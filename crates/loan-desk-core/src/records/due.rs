use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::LoanDeskError;
use crate::records::wire::{
    date_field, optional_text, require, require_amount, require_id, IdRef,
};
use crate::types::{DueId, LoanId, Money, TransactionId};
use crate::LoanDeskResult;

const RESOURCE: &str = "due";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DueStatus {
    Unpaid,
    Paid,
}

impl DueStatus {
    fn parse(raw: &str) -> LoanDeskResult<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "unpaid" => Ok(DueStatus::Unpaid),
            "paid" => Ok(DueStatus::Paid),
            other => Err(LoanDeskError::schema(
                RESOURCE,
                format!("unknown status '{other}'"),
            )),
        }
    }
}

impl fmt::Display for DueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueStatus::Unpaid => f.write_str("Unpaid"),
            DueStatus::Paid => f.write_str("Paid"),
        }
    }
}

/// One scheduled installment of a loan, as generated by the loan API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Due {
    pub id: DueId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan: Option<LoanId>,
    pub due_date: NaiveDate,
    pub amount: Money,
    pub status: DueStatus,
    /// Lateness as reported by the API, when it reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_late: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<TransactionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_on: Option<NaiveDate>,
}

impl Due {
    pub fn new(
        id: impl Into<String>,
        due_date: NaiveDate,
        amount: Money,
        status: DueStatus,
    ) -> Self {
        Self {
            id: DueId::new(id),
            loan: None,
            due_date,
            amount,
            status,
            is_late: None,
            transaction_id: None,
            paid_on: None,
        }
    }

    pub fn is_unpaid(&self) -> bool {
        self.status == DueStatus::Unpaid
    }
}

/// Wire shape of a due document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawDue {
    #[serde(rename = "_id")]
    id: Option<String>,
    loan: Option<IdRef>,
    due_date: Option<String>,
    due_amount: Option<Value>,
    status: Option<String>,
    is_late: Option<bool>,
    transaction_id: Option<String>,
    #[serde(alias = "paidAt")]
    paid_date: Option<String>,
}

impl TryFrom<RawDue> for Due {
    type Error = LoanDeskError;

    fn try_from(raw: RawDue) -> LoanDeskResult<Self> {
        let id = require_id(raw.id, RESOURCE, "_id")?;
        let due_date = date_field(raw.due_date, RESOURCE, "dueDate")?;
        let due_date = require(due_date, RESOURCE, "dueDate")?;
        let amount = require_amount(raw.due_amount, RESOURCE, "dueAmount")?;
        if amount < Decimal::ZERO {
            return Err(LoanDeskError::schema(
                RESOURCE,
                format!("due '{id}' has negative amount {amount}"),
            ));
        }
        let status = DueStatus::parse(&require(raw.status, RESOURCE, "status")?)?;

        Ok(Due {
            id: DueId(id),
            loan: raw.loan.map(|r| LoanId(r.into_id())),
            due_date,
            amount,
            status,
            is_late: raw.is_late,
            transaction_id: optional_text(raw.transaction_id).map(TransactionId),
            paid_on: date_field(raw.paid_date, RESOURCE, "paidDate")?,
        })
    }
}

/// Decode one due document.
pub fn decode_due(value: Value) -> LoanDeskResult<Due> {
    let raw: RawDue = serde_json::from_value(value)
        .map_err(|e| LoanDeskError::schema(RESOURCE, e.to_string()))?;
    Due::try_from(raw)
}

/// Decode a JSON array of due documents, keeping API order.
pub fn decode_dues(value: Value) -> LoanDeskResult<Vec<Due>> {
    match value {
        Value::Array(items) => items.into_iter().map(decode_due).collect(),
        other => Err(LoanDeskError::schema(
            RESOURCE,
            format!("expected an array of dues, got {}", kind_of(&other)),
        )),
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
