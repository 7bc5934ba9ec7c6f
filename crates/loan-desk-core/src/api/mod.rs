//! The remote loan API as seen by the desk.
//!
//! [`LoanApi`] names one method per logical operation; the HTTP transport
//! lives behind the `api` feature so the pure calculators build without it.

#[cfg(feature = "api")]
pub mod http;

#[cfg(feature = "api")]
pub use http::{ApiConfig, HttpLoanApi};

use crate::emi::LoanApplication;
use crate::error::LoanDeskError;
use crate::records::{Customer, Due, Loan, NewCustomer, PaymentRecord, PaymentRequest};
use crate::types::{CustomerId, LoanId, TransactionId};
use crate::LoanDeskResult;

pub trait LoanApi {
    /// `GET customers`, optionally filtered with `?search=`.
    fn list_customers(&self, search: Option<&str>) -> LoanDeskResult<Vec<Customer>>;

    fn get_customer(&self, id: &CustomerId) -> LoanDeskResult<Customer>;

    fn create_customer(&self, customer: &NewCustomer) -> LoanDeskResult<Customer>;

    fn list_customer_loans(&self, customer: &CustomerId) -> LoanDeskResult<Vec<Loan>>;

    /// The loan with its dues embedded.
    fn get_loan(&self, id: &LoanId) -> LoanDeskResult<Loan>;

    /// Create a loan; the API generates its dues and returns the new id.
    fn create_loan(&self, application: &LoanApplication) -> LoanDeskResult<LoanId>;

    fn list_loan_dues(&self, loan: &LoanId) -> LoanDeskResult<Vec<Due>>;

    /// Record a payment. Success or failure only.
    fn create_payment(&self, payment: &PaymentRequest) -> LoanDeskResult<()>;

    fn get_payment(&self, id: &TransactionId) -> LoanDeskResult<PaymentRecord>;
}

impl<T: LoanApi + ?Sized> LoanApi for &T {
    fn list_customers(&self, search: Option<&str>) -> LoanDeskResult<Vec<Customer>> {
        (**self).list_customers(search)
    }
    fn get_customer(&self, id: &CustomerId) -> LoanDeskResult<Customer> {
        (**self).get_customer(id)
    }
    fn create_customer(&self, customer: &NewCustomer) -> LoanDeskResult<Customer> {
        (**self).create_customer(customer)
    }
    fn list_customer_loans(&self, customer: &CustomerId) -> LoanDeskResult<Vec<Loan>> {
        (**self).list_customer_loans(customer)
    }
    fn get_loan(&self, id: &LoanId) -> LoanDeskResult<Loan> {
        (**self).get_loan(id)
    }
    fn create_loan(&self, application: &LoanApplication) -> LoanDeskResult<LoanId> {
        (**self).create_loan(application)
    }
    fn list_loan_dues(&self, loan: &LoanId) -> LoanDeskResult<Vec<Due>> {
        (**self).list_loan_dues(loan)
    }
    fn create_payment(&self, payment: &PaymentRequest) -> LoanDeskResult<()> {
        (**self).create_payment(payment)
    }
    fn get_payment(&self, id: &TransactionId) -> LoanDeskResult<PaymentRecord> {
        (**self).get_payment(id)
    }
}

/// Ids are spliced into URL paths, so only `[A-Za-z0-9_-]` is accepted.
pub fn check_path_id(resource: &str, id: &str) -> LoanDeskResult<()> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-') {
        return Err(LoanDeskError::InvalidInput {
            field: format!("{resource}_id"),
            reason: format!("'{id}' is not a valid {resource} id"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_ids() {
        assert!(check_path_id("loan", "65f1c2ab9e").is_ok());
        assert!(check_path_id("loan", "TXN-1_a").is_ok());
        assert!(check_path_id("loan", "").is_err());
        assert!(check_path_id("loan", "../admin").is_err());
        assert!(check_path_id("loan", "a b").is_err());
    }
}
