pub mod application;
pub mod calculator;

pub use application::LoanApplication;
pub use calculator::{
    compute_emi, preview_emi, preview_schedule, EmiInput, EmiOutput, ScheduleRow, MAX_TERM_MONTHS,
};
