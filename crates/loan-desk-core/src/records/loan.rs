use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LoanDeskError;
use crate::records::due::{kind_of, Due, RawDue};
use crate::records::wire::{require, require_amount, require_count, require_id, IdRef};
use crate::types::{CustomerId, LoanId, Money, Months, PercentRate};
use crate::LoanDeskResult;

const RESOURCE: &str = "loan";

/// An approved loan. `dues` is populated only when the API embeds them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Loan {
    pub id: LoanId,
    pub customer: CustomerId,
    pub principal: Money,
    /// Annual rate in percent.
    pub interest: PercentRate,
    pub duration: Months,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dues: Vec<Due>,
}

impl Loan {
    pub fn unpaid_dues(&self) -> impl Iterator<Item = &Due> {
        self.dues.iter().filter(|d| d.is_unpaid())
    }

    pub fn outstanding(&self) -> Money {
        self.unpaid_dues().map(|d| d.amount).sum()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawLoan {
    #[serde(rename = "_id")]
    id: Option<String>,
    customer: Option<IdRef>,
    principal: Option<Value>,
    interest: Option<Value>,
    duration: Option<Value>,
    #[serde(default)]
    dues: Option<Vec<RawDue>>,
}

impl TryFrom<RawLoan> for Loan {
    type Error = LoanDeskError;

    fn try_from(raw: RawLoan) -> LoanDeskResult<Self> {
        let id = require_id(raw.id, RESOURCE, "_id")?;
        let customer = require(raw.customer, RESOURCE, "customer")?.into_id();
        let principal = require_amount(raw.principal, RESOURCE, "principal")?;
        let interest = require_amount(raw.interest, RESOURCE, "interest")?;
        let duration = require_count(raw.duration, RESOURCE, "duration")?;

        if principal <= Decimal::ZERO {
            return Err(LoanDeskError::schema(
                RESOURCE,
                format!("loan '{id}' has non-positive principal {principal}"),
            ));
        }
        if interest < Decimal::ZERO {
            return Err(LoanDeskError::schema(
                RESOURCE,
                format!("loan '{id}' has negative interest {interest}"),
            ));
        }
        if duration == 0 {
            return Err(LoanDeskError::schema(
                RESOURCE,
                format!("loan '{id}' has zero duration"),
            ));
        }

        let dues = raw
            .dues
            .unwrap_or_default()
            .into_iter()
            .map(Due::try_from)
            .collect::<LoanDeskResult<Vec<_>>>()?;

        Ok(Loan {
            id: LoanId(id),
            customer: CustomerId(customer),
            principal,
            interest,
            duration,
            dues,
        })
    }
}

pub fn decode_loan(value: Value) -> LoanDeskResult<Loan> {
    let raw: RawLoan = serde_json::from_value(value)
        .map_err(|e| LoanDeskError::schema(RESOURCE, e.to_string()))?;
    Loan::try_from(raw)
}

pub fn decode_loans(value: Value) -> LoanDeskResult<Vec<Loan>> {
    match value {
        Value::Array(items) => items.into_iter().map(decode_loan).collect(),
        other => Err(LoanDeskError::schema(
            RESOURCE,
            format!("expected an array of loans, got {}", kind_of(&other)),
        )),
    }
}

/// Decode `GET loans/{id}`: either the loan itself or `{ "loan": ..., "dues": [...] }`.
///
/// Dues given beside the wrapped loan are used when the loan embeds none.
pub fn decode_loan_detail(value: Value) -> LoanDeskResult<Loan> {
    let Value::Object(mut map) = value else {
        return Err(LoanDeskError::schema(RESOURCE, "expected a loan object"));
    };

    let Some(inner) = map.remove("loan").filter(Value::is_object) else {
        return decode_loan(Value::Object(map));
    };

    let mut loan = decode_loan(inner)?;
    if loan.dues.is_empty() {
        if let Some(dues) = map.remove("dues") {
            loan.dues = crate::records::due::decode_dues(dues)?;
        }
    }
    Ok(loan)
}

/// Decode the `POST loans` response, which carries the generated id.
pub fn decode_created_loan(value: &Value) -> LoanDeskResult<LoanId> {
    value
        .get("loanId")
        .or_else(|| value.get("_id"))
        .and_then(Value::as_str)
        .filter(|id| !id.trim().is_empty())
        .map(LoanId::new)
        .ok_or_else(|| LoanDeskError::schema(RESOURCE, "creation response carries no 'loanId'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn loan_json() -> Value {
        json!({
            "_id": "l1",
            "customer": {"_id": "c1", "name": "Ravi"},
            "principal": 100000,
            "interest": 12,
            "duration": 2,
            "dues": [
                {"_id": "d1", "dueDate": "2025-01-05", "dueAmount": 50373.76, "status": "Paid"},
                {"_id": "d2", "dueDate": "2025-02-05", "dueAmount": 50373.76, "status": "Unpaid"}
            ]
        })
    }

    #[test]
    fn test_decode_loan_with_embedded_customer_and_dues() {
        let loan = decode_loan(loan_json()).unwrap();
        assert_eq!(loan.customer, CustomerId::new("c1"));
        assert_eq!(loan.principal, dec!(100000));
        assert_eq!(loan.duration, 2);
        assert_eq!(loan.dues.len(), 2);
        assert_eq!(loan.outstanding(), dec!(50373.76));
    }

    #[test]
    fn test_decode_wrapped_detail() {
        let loan = decode_loan_detail(json!({ "loan": loan_json() })).unwrap();
        assert_eq!(loan.id, LoanId::new("l1"));
        assert_eq!(loan.dues.len(), 2);
    }

    #[test]
    fn test_decode_wrapped_detail_with_sibling_dues() {
        let mut inner = loan_json();
        inner.as_object_mut().unwrap().remove("dues");
        let loan = decode_loan_detail(json!({
            "loan": inner,
            "dues": [{"_id": "d9", "dueDate": "2025-03-05", "dueAmount": 10, "status": "Unpaid"}]
        }))
        .unwrap();
        assert_eq!(loan.dues.len(), 1);
        assert_eq!(loan.dues[0].id.as_str(), "d9");
    }

    #[test]
    fn test_zero_duration_is_rejected() {
        let mut raw = loan_json();
        raw["duration"] = json!(0);
        assert!(matches!(decode_loan(raw), Err(LoanDeskError::SchemaError { .. })));
    }

    #[test]
    fn test_created_loan_id() {
        assert_eq!(
            decode_created_loan(&json!({"loanId": "l77"})).unwrap(),
            LoanId::new("l77")
        );
        assert!(decode_created_loan(&json!({"ok": true})).is_err());
    }
}
