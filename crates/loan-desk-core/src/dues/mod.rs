pub mod classifier;
pub mod selector;

pub use classifier::{classify_due, due_table, is_late_payment, DueStanding, DueTableRow};
pub use selector::{candidate_dues, select_dues, summarize_selection, toggle_due, SelectionMode};
