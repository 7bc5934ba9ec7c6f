//! Payment allocation: what the selected dues add up to and what is charged.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

use crate::error::LoanDeskError;
use crate::records::{Due, PaymentKind};
use crate::types::{with_metadata, ComputationOutput, DueId, Money};
use crate::LoanDeskResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How the payment is being made. Only a settlement can carry a discount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaymentPlan {
    #[serde(rename = "single")]
    SingleMonth,
    Multiple,
    Settlement {
        #[serde(default)]
        discount: Money,
    },
}

impl PaymentPlan {
    pub fn settlement(discount: Money) -> LoanDeskResult<Self> {
        check_discount(discount)?;
        Ok(PaymentPlan::Settlement { discount })
    }

    pub fn kind(&self) -> PaymentKind {
        match self {
            PaymentPlan::SingleMonth => PaymentKind::Single,
            PaymentPlan::Multiple => PaymentKind::Multiple,
            PaymentPlan::Settlement { .. } => PaymentKind::Settlement,
        }
    }

    pub fn discount(&self) -> Money {
        match self {
            PaymentPlan::Settlement { discount } => *discount,
            PaymentPlan::SingleMonth | PaymentPlan::Multiple => Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub kind: PaymentKind,
    pub dues: Vec<DueId>,
    pub count: u32,
    /// Sum of the selected dues.
    pub total_amount: Money,
    /// Discount as requested (settlement only).
    pub discount: Money,
    /// `max(total_amount - discount, 0)`.
    pub final_amount: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Total the selected dues and apply the plan's discount.
///
/// Fails with `NoSelection` on an empty selection, before anything is sent.
pub fn allocate(
    dues: &[Due],
    selected: &[DueId],
    plan: &PaymentPlan,
) -> LoanDeskResult<Allocation> {
    if selected.is_empty() {
        return Err(LoanDeskError::NoSelection);
    }
    let discount = plan.discount();
    check_discount(discount)?;

    let wanted: HashSet<&DueId> = selected.iter().collect();
    let total_amount: Money = dues
        .iter()
        .filter(|d| wanted.contains(&d.id))
        .map(|d| d.amount)
        .sum();

    let final_amount = (total_amount - discount).max(Decimal::ZERO);

    Ok(Allocation {
        kind: plan.kind(),
        dues: selected.to_vec(),
        count: selected.len() as u32,
        total_amount,
        discount,
        final_amount,
    })
}

/// [`allocate`] wrapped with metadata and warnings about the selection.
pub fn allocate_payment(
    dues: &[Due],
    selected: &[DueId],
    plan: &PaymentPlan,
) -> LoanDeskResult<ComputationOutput<Allocation>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let allocation = allocate(dues, selected, plan)?;

    for id in selected {
        match dues.iter().find(|d| &d.id == id) {
            None => warnings.push(format!("Due '{id}' is not part of this loan; it adds nothing.")),
            Some(d) if !d.is_unpaid() => warnings.push(format!("Due '{id}' is already paid.")),
            Some(_) => {}
        }
    }
    if allocation.discount > allocation.total_amount {
        tracing::warn!(
            discount = %allocation.discount,
            total = %allocation.total_amount,
            "settlement discount exceeds total; final amount clamped to zero"
        );
        warnings.push(format!(
            "Discount {} exceeds total {}; final amount clamped to 0.",
            allocation.discount, allocation.total_amount
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Sum of selected dues less settlement discount, floored at zero",
        &serde_json::json!({ "plan": plan, "selected": selected }),
        warnings,
        elapsed,
        allocation,
    ))
}

pub(crate) fn check_discount(discount: Money) -> LoanDeskResult<()> {
    if discount < Decimal::ZERO {
        return Err(LoanDeskError::InvalidInput {
            field: "discount".into(),
            reason: "Discount cannot be negative".into(),
        });
    }
    Ok(())
}
