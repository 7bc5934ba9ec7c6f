pub mod allocator;
pub mod session;
pub mod transaction;

pub use allocator::{allocate, allocate_payment, Allocation, PaymentPlan};
pub use session::PaymentSession;
