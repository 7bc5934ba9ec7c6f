//! Paid / unpaid / late display state for dues.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::records::{Due, DueStatus};
use crate::types::{DueId, Money, TransactionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueStanding {
    Unpaid,
    PaidOnTime,
    PaidLate,
}

impl DueStanding {
    pub fn label(&self) -> &'static str {
        match self {
            DueStanding::Unpaid => "Unpaid",
            DueStanding::PaidOnTime => "Paid (On Time)",
            DueStanding::PaidLate => "Late Payment",
        }
    }
}

impl fmt::Display for DueStanding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A payment is late when it lands strictly after the scheduled date.
pub fn is_late_payment(paid_on: NaiveDate, due_date: NaiveDate) -> bool {
    paid_on > due_date
}

/// The API's `isLate` flag wins; without it, a known paid date decides.
/// A paid due with neither is shown as on time.
pub fn classify_due(due: &Due) -> DueStanding {
    if due.status == DueStatus::Unpaid {
        return DueStanding::Unpaid;
    }
    let late = due
        .is_late
        .or_else(|| due.paid_on.map(|paid| is_late_payment(paid, due.due_date)))
        .unwrap_or(false);
    if late {
        DueStanding::PaidLate
    } else {
        DueStanding::PaidOnTime
    }
}

/// One line of the loan's due table.
#[derive(Debug, Clone, Serialize)]
pub struct DueTableRow {
    pub serial: usize,
    pub id: DueId,
    pub due_date: NaiveDate,
    pub amount: Money,
    pub status: DueStatus,
    pub standing: DueStanding,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<TransactionId>,
}

/// Rows numbered from 1 in schedule order.
pub fn due_table(dues: &[Due]) -> Vec<DueTableRow> {
    dues.iter()
        .enumerate()
        .map(|(i, due)| {
            let standing = classify_due(due);
            DueTableRow {
                serial: i + 1,
                id: due.id.clone(),
                due_date: due.due_date,
                amount: due.amount,
                status: due.status,
                standing,
                label: standing.label(),
                transaction_id: due.transaction_id.clone(),
            }
        })
        .collect()
}
