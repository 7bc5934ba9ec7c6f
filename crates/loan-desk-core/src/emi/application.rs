//! Loan approval payload.
//!
//! Only the terms travel to the API; the preview schedule stays local and the
//! authoritative dues are generated server-side.

use serde::{Deserialize, Serialize};

use crate::emi::calculator::{validate_terms, EmiInput};
use crate::types::{CustomerId, Money, Months, PercentRate};
use crate::LoanDeskResult;

/// Body of `POST loans`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub customer: CustomerId,
    #[serde(with = "rust_decimal::serde::float")]
    pub principal: Money,
    /// Annual rate in percent.
    #[serde(with = "rust_decimal::serde::float")]
    pub interest: PercentRate,
    pub duration: Months,
}

impl LoanApplication {
    /// Build an application from calculator terms, rejecting terms the EMI
    /// engine would reject.
    pub fn new(customer: CustomerId, terms: &EmiInput) -> LoanDeskResult<Self> {
        validate_terms(terms.principal, terms.annual_rate_percent, terms.months)?;
        Ok(Self {
            customer,
            principal: terms.principal,
            interest: terms.annual_rate_percent,
            duration: terms.months,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoanDeskError;
    use rust_decimal_macros::dec;

    fn terms(principal: Money, months: Months) -> EmiInput {
        EmiInput {
            principal,
            annual_rate_percent: dec!(11.5),
            months,
        }
    }

    #[test]
    fn test_wire_body_uses_api_field_names() {
        let app = LoanApplication::new(CustomerId::new("c42"), &terms(dec!(50000), 24)).unwrap();
        let body = serde_json::to_value(&app).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "customer": "c42",
                "principal": 50000.0,
                "interest": 11.5,
                "duration": 24
            })
        );
    }

    #[test]
    fn test_rejects_terms_the_calculator_rejects() {
        let err = LoanApplication::new(CustomerId::new("c42"), &terms(dec!(50000), 0)).unwrap_err();
        assert!(matches!(err, LoanDeskError::InvalidInput { .. }));
    }
}
