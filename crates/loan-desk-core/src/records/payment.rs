use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::LoanDeskError;
use crate::records::wire::{
    optional_amount, optional_text, parse_api_timestamp, require, require_amount, require_count,
    require_id, IdRef,
};
use crate::types::{DueId, LoanId, Money, TransactionId};
use crate::LoanDeskResult;

const RESOURCE: &str = "payment";

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    Cash,
    #[serde(rename = "UPI")]
    Upi,
    Card,
    Bank,
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Card => "Card",
            PaymentMethod::Bank => "Bank Transfer",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = LoanDeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "upi" => Ok(PaymentMethod::Upi),
            "card" => Ok(PaymentMethod::Card),
            "bank" | "bank transfer" | "bank-transfer" => Ok(PaymentMethod::Bank),
            other => Err(LoanDeskError::invalid(
                "method",
                format!("unknown payment method '{other}' (cash, upi, card, bank)"),
            )),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a payment was assembled; sent to the API as `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    Single,
    Multiple,
    Settlement,
}

impl PaymentKind {
    fn parse(raw: &str) -> LoanDeskResult<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(PaymentKind::Single),
            "multiple" => Ok(PaymentKind::Multiple),
            "settlement" => Ok(PaymentKind::Settlement),
            other => Err(LoanDeskError::schema(
                RESOURCE,
                format!("unknown payment type '{other}'"),
            )),
        }
    }
}

impl fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentKind::Single => f.write_str("single"),
            PaymentKind::Multiple => f.write_str("multiple"),
            PaymentKind::Settlement => f.write_str("settlement"),
        }
    }
}

// ---------------------------------------------------------------------------
// Outgoing body
// ---------------------------------------------------------------------------

/// Body of `POST payments`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub loan_id: LoanId,
    pub transaction_id: TransactionId,
    pub method: PaymentMethod,
    /// Final amount after any settlement discount.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Money,
    #[serde(rename = "type")]
    pub kind: PaymentKind,
    pub count: u32,
    pub dues: Vec<DueId>,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Money,
}

// ---------------------------------------------------------------------------
// Stored transaction
// ---------------------------------------------------------------------------

/// A recorded payment as returned by `GET payments/transaction/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentRecord {
    pub transaction_id: TransactionId,
    pub loan: LoanId,
    pub method: PaymentMethod,
    pub kind: PaymentKind,
    pub amount: Money,
    pub discount: Money,
    pub count: u32,
    pub dues: Vec<DueId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawPayment {
    transaction_id: Option<String>,
    loan_id: Option<IdRef>,
    method: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    amount: Option<Value>,
    discount: Option<Value>,
    count: Option<Value>,
    #[serde(default)]
    dues: Vec<IdRef>,
    created_at: Option<String>,
}

impl TryFrom<RawPayment> for PaymentRecord {
    type Error = LoanDeskError;

    fn try_from(raw: RawPayment) -> LoanDeskResult<Self> {
        let transaction_id = require_id(raw.transaction_id, RESOURCE, "transactionId")?;
        let loan = require(raw.loan_id, RESOURCE, "loanId")?.into_id();
        let method = PaymentMethod::from_str(&require(raw.method, RESOURCE, "method")?)
            .map_err(|e| LoanDeskError::schema(RESOURCE, e.to_string()))?;
        let kind = PaymentKind::parse(&require(raw.kind, RESOURCE, "type")?)?;
        let amount = require_amount(raw.amount, RESOURCE, "amount")?;
        let discount =
            optional_amount(raw.discount, RESOURCE, "discount")?.unwrap_or(Decimal::ZERO);
        let dues: Vec<DueId> = raw.dues.into_iter().map(|r| DueId(r.into_id())).collect();
        let count = match raw.count {
            Some(v) => require_count(Some(v), RESOURCE, "count")?,
            None => dues.len() as u32,
        };
        let created_at = match optional_text(raw.created_at) {
            Some(ts) => Some(
                parse_api_timestamp(&ts)
                    .map_err(|e| LoanDeskError::schema(RESOURCE, format!("'createdAt': {e}")))?,
            ),
            None => None,
        };

        Ok(PaymentRecord {
            transaction_id: TransactionId(transaction_id),
            loan: LoanId(loan),
            method,
            kind,
            amount,
            discount,
            count,
            dues,
            created_at,
        })
    }
}

pub fn decode_payment(value: Value) -> LoanDeskResult<PaymentRecord> {
    let raw: RawPayment = serde_json::from_value(value)
        .map_err(|e| LoanDeskError::schema(RESOURCE, e.to_string()))?;
    PaymentRecord::try_from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_request_body_matches_api_fields() {
        let req = PaymentRequest {
            loan_id: LoanId::new("l1"),
            transaction_id: TransactionId::new("TXNABC"),
            method: PaymentMethod::Upi,
            amount: dec!(9500),
            kind: PaymentKind::Settlement,
            count: 2,
            dues: vec![DueId::new("d1"), DueId::new("d2")],
            discount: dec!(500),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "loanId": "l1",
                "transactionId": "TXNABC",
                "method": "UPI",
                "amount": 9500.0,
                "type": "settlement",
                "count": 2,
                "dues": ["d1", "d2"],
                "discount": 500.0
            })
        );
    }

    #[test]
    fn test_decode_payment_with_embedded_loan() {
        let p = decode_payment(json!({
            "transactionId": "TXN1",
            "loanId": {"_id": "l1", "principal": 1000},
            "method": "Bank",
            "type": "multiple",
            "amount": 2000,
            "count": 2,
            "dues": ["d1", {"_id": "d2"}],
            "createdAt": "2025-04-01T10:15:00.000Z"
        }))
        .unwrap();
        assert_eq!(p.loan, LoanId::new("l1"));
        assert_eq!(p.method, PaymentMethod::Bank);
        assert_eq!(p.kind, PaymentKind::Multiple);
        assert_eq!(p.discount, Decimal::ZERO);
        assert_eq!(p.dues, vec![DueId::new("d1"), DueId::new("d2")]);
        assert!(p.created_at.is_some());
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("upi".parse::<PaymentMethod>().unwrap(), PaymentMethod::Upi);
        assert_eq!("Bank Transfer".parse::<PaymentMethod>().unwrap(), PaymentMethod::Bank);
        assert!("cheque".parse::<PaymentMethod>().is_err());
    }
}
