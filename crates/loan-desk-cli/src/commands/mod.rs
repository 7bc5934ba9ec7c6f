pub mod customers;
pub mod dues;
pub mod emi;
pub mod loans;
pub mod payments;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde_json::Value;

use loan_desk_core::api::HttpLoanApi;
use loan_desk_core::dues::SelectionMode;
use loan_desk_core::records::{decode_dues, decode_loan_detail, Due};
use loan_desk_core::{DeskSession, LoanDeskResult};

use crate::config::DeskConfig;

pub type CommandResult = Result<Value, Box<dyn std::error::Error>>;

/// Payment mode as typed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// This month's unpaid due
    Single,
    /// Dues picked one by one
    Multiple,
    /// Every unpaid due
    Settlement,
}

impl From<ModeArg> for SelectionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Single => SelectionMode::SingleMonth,
            ModeArg::Multiple => SelectionMode::Multiple,
            ModeArg::Settlement => SelectionMode::Settlement,
        }
    }
}

pub fn desk(config: &DeskConfig) -> Result<DeskSession<HttpLoanApi>, Box<dyn std::error::Error>> {
    let api = HttpLoanApi::new(&config.api_config())?;
    tracing::debug!(api = %config.api_url, "desk session ready");
    Ok(DeskSession::new(api))
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Dues from API-shaped JSON: a bare array of dues or a loan document.
pub fn dues_from_json(value: Value) -> LoanDeskResult<Vec<Due>> {
    match value {
        Value::Array(_) => decode_dues(value),
        other => Ok(decode_loan_detail(other)?.dues),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dues_from_array_or_loan() {
        let due = json!({
            "_id": "d1",
            "dueDate": "2025-03-05",
            "dueAmount": 1000,
            "status": "unpaid"
        });
        assert_eq!(dues_from_json(json!([due.clone()])).unwrap().len(), 1);

        let loan = json!({
            "_id": "l1", "customer": "c1", "principal": 1000, "interest": 0, "duration": 1,
            "dues": [due]
        });
        assert_eq!(dues_from_json(loan).unwrap()[0].id.as_str(), "d1");
    }
}
