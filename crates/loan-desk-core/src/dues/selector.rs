//! Which dues a payment covers.
//!
//! Four modes: the current month's installment, a manual pick among unpaid
//! dues, full settlement of everything unpaid, or one due named up front.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::records::Due;
use crate::types::{with_metadata, ComputationOutput, DueId, Money};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// The unpaid due falling in the reference month.
    SingleMonth,
    /// Manual selection among unpaid dues; nothing is picked automatically.
    Multiple,
    /// Every unpaid due.
    Settlement,
    /// Exactly this due, whatever else is outstanding.
    Explicit(DueId),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionOutput {
    pub mode: SelectionMode,
    pub reference_date: NaiveDate,
    pub selected: Vec<DueId>,
    /// Dues offered for display or manual selection under this mode.
    pub candidates: Vec<DueId>,
    pub selected_total: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Derive the automatic selection for `mode`.
///
/// `Multiple` never selects anything on its own; its selection is built with
/// [`toggle_due`].
pub fn select_dues(dues: &[Due], mode: &SelectionMode, reference_date: NaiveDate) -> Vec<DueId> {
    match mode {
        SelectionMode::Explicit(id) => vec![id.clone()],
        SelectionMode::SingleMonth => dues
            .iter()
            .find(|d| d.is_unpaid() && same_month(d.due_date, reference_date))
            .map(|d| vec![d.id.clone()])
            .unwrap_or_default(),
        SelectionMode::Multiple => Vec::new(),
        SelectionMode::Settlement => dues
            .iter()
            .filter(|d| d.is_unpaid())
            .map(|d| d.id.clone())
            .collect(),
    }
}

/// Dues shown under `mode`, in schedule order.
pub fn candidate_dues<'a>(
    dues: &'a [Due],
    mode: &SelectionMode,
    reference_date: NaiveDate,
) -> Vec<&'a Due> {
    dues.iter()
        .filter(|d| match mode {
            SelectionMode::Explicit(id) => &d.id == id,
            SelectionMode::SingleMonth => d.is_unpaid() && same_month(d.due_date, reference_date),
            SelectionMode::Multiple | SelectionMode::Settlement => d.is_unpaid(),
        })
        .collect()
}

/// Add `id` when absent, remove it when present. Order of the rest is kept.
pub fn toggle_due(mut selected: Vec<DueId>, id: &DueId) -> Vec<DueId> {
    if let Some(pos) = selected.iter().position(|s| s == id) {
        selected.remove(pos);
    } else {
        selected.push(id.clone());
    }
    selected
}

/// Selection plus candidates for one mode, wrapped with metadata.
pub fn summarize_selection(
    dues: &[Due],
    mode: &SelectionMode,
    reference_date: NaiveDate,
) -> ComputationOutput<SelectionOutput> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let selected = select_dues(dues, mode, reference_date);
    let candidates: Vec<DueId> = candidate_dues(dues, mode, reference_date)
        .into_iter()
        .map(|d| d.id.clone())
        .collect();

    match mode {
        SelectionMode::SingleMonth if selected.is_empty() => warnings.push(format!(
            "No unpaid due falls in {}.",
            reference_date.format("%B %Y")
        )),
        SelectionMode::Explicit(id) if candidates.is_empty() => {
            warnings.push(format!("Due '{id}' is not part of this loan."))
        }
        _ => {}
    }

    let selected_total: Money = dues
        .iter()
        .filter(|d| selected.contains(&d.id))
        .map(|d| d.amount)
        .sum();

    let output = SelectionOutput {
        mode: mode.clone(),
        reference_date,
        selected,
        candidates,
        selected_total,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Due selection by payment mode",
        &serde_json::json!({ "mode": mode, "reference_date": reference_date, "dues": dues.len() }),
        warnings,
        elapsed,
        output,
    )
}

fn same_month(date: NaiveDate, reference: NaiveDate) -> bool {
    date.year() == reference.year() && date.month() == reference.month()
}
