//! Customer records and the intake form.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::error::{FieldIssue, LoanDeskError};
use crate::records::due::kind_of;
use crate::records::wire::{date_field, optional_amount, optional_text, require, require_id};
use crate::types::{CustomerId, Money};
use crate::LoanDeskResult;

const RESOURCE: &str = "customer";
const PHONE_DIGITS: usize = 10;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCustomer {
    #[serde(rename = "_id")]
    id: Option<String>,
    name: Option<String>,
    phone: Option<Value>,
    contact: Option<String>,
    occupation: Option<String>,
    income: Option<Value>,
    dob: Option<String>,
}

impl TryFrom<RawCustomer> for Customer {
    type Error = LoanDeskError;

    fn try_from(raw: RawCustomer) -> LoanDeskResult<Self> {
        let id = require_id(raw.id, RESOURCE, "_id")?;
        let name = require(optional_text(raw.name), RESOURCE, "name")?;
        // Some stores keep phone numbers as numbers.
        let phone = match require(raw.phone, RESOURCE, "phone")? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            other => {
                return Err(LoanDeskError::schema(
                    RESOURCE,
                    format!("'phone' must be text, got {}", kind_of(&other)),
                ))
            }
        };

        Ok(Customer {
            id: CustomerId(id),
            name,
            phone,
            contact: optional_text(raw.contact),
            occupation: optional_text(raw.occupation),
            income: optional_amount(raw.income, RESOURCE, "income")?,
            dob: date_field(raw.dob, RESOURCE, "dob")?,
        })
    }
}

pub fn decode_customer(value: Value) -> LoanDeskResult<Customer> {
    let raw: RawCustomer = serde_json::from_value(value)
        .map_err(|e| LoanDeskError::schema(RESOURCE, e.to_string()))?;
    Customer::try_from(raw)
}

pub fn decode_customers(value: Value) -> LoanDeskResult<Vec<Customer>> {
    match value {
        Value::Array(items) => items.into_iter().map(decode_customer).collect(),
        other => Err(LoanDeskError::schema(
            RESOURCE,
            format!("expected an array of customers, got {}", kind_of(&other)),
        )),
    }
}

// ---------------------------------------------------------------------------
// Intake form
// ---------------------------------------------------------------------------

/// Customer intake form exactly as typed in: every field is free text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerForm {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub occupation: String,
    #[serde(default)]
    pub income: String,
    #[serde(default)]
    pub dob: String,
}

/// A validated customer, ready for `POST customers`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub income: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<NaiveDate>,
}

impl CustomerForm {
    /// Validate every field and report all problems at once.
    ///
    /// `today` bounds the date of birth.
    pub fn validate(&self, today: NaiveDate) -> LoanDeskResult<NewCustomer> {
        let mut issues: Vec<FieldIssue> = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            issues.push(FieldIssue::new("name", "Name is required"));
        }

        let phone = self.phone.trim();
        if phone.is_empty() {
            issues.push(FieldIssue::new("phone", "Phone is required"));
        } else if phone.len() != PHONE_DIGITS || !phone.bytes().all(|b| b.is_ascii_digit()) {
            issues.push(FieldIssue::new("phone", "Phone must be 10 digits"));
        }

        let income = match self.income.trim() {
            "" => None,
            raw => match Decimal::from_str(raw) {
                Ok(v) if v > Decimal::ZERO => Some(v),
                Ok(_) => {
                    issues.push(FieldIssue::new("income", "Income must be greater than 0"));
                    None
                }
                Err(_) => {
                    issues.push(FieldIssue::new("income", "Income must be a number"));
                    None
                }
            },
        };

        let dob = match self.dob.trim() {
            "" => None,
            raw => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(d) if d > today => {
                    issues.push(FieldIssue::new("dob", "Date of Birth cannot be in the future"));
                    None
                }
                Ok(d) => Some(d),
                Err(_) => {
                    issues.push(FieldIssue::new("dob", "Date of Birth must be YYYY-MM-DD"));
                    None
                }
            },
        };

        if !issues.is_empty() {
            return Err(LoanDeskError::InvalidForm(issues));
        }

        Ok(NewCustomer {
            name: name.to_string(),
            phone: phone.to_string(),
            contact: optional_text(Some(self.contact.clone())),
            occupation: optional_text(Some(self.occupation.clone())),
            income,
            dob,
        })
    }
}
