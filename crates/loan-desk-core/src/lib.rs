pub mod api;
pub mod desk;
pub mod dues;
pub mod emi;
pub mod error;
pub mod payments;
pub mod records;
pub mod types;

pub use desk::{DeskSession, PaymentReceipt};
pub use error::{FieldIssue, LoanDeskError};
pub use types::*;

/// Standard result type for all loan-desk operations
pub type LoanDeskResult<T> = Result<T, LoanDeskError>;
