//! Typed records exchanged with the loan API.
//!
//! Every response passes through a `Raw*` wire struct and a validating
//! `TryFrom` step; malformed documents surface as `LoanDeskError::SchemaError`.

pub mod customer;
pub mod due;
pub mod loan;
pub mod payment;
pub mod wire;

pub use customer::{decode_customer, decode_customers, Customer, CustomerForm, NewCustomer};
pub use due::{decode_due, decode_dues, Due, DueStatus};
pub use loan::{decode_created_loan, decode_loan, decode_loan_detail, decode_loans, Loan};
pub use payment::{decode_payment, PaymentKind, PaymentMethod, PaymentRecord, PaymentRequest};
pub use wire::parse_api_date;
