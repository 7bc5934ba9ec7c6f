//! State of one payment being assembled against a loan.
//!
//! A session opens either pinned to a single due (mode locked) or in
//! single-month mode with this month's unpaid due pre-selected. Switching mode
//! always drops the manual selection and the discount before re-deriving.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::dues::{candidate_dues, select_dues, toggle_due, SelectionMode};
use crate::error::LoanDeskError;
use crate::payments::allocator::{allocate, check_discount, Allocation, PaymentPlan};
use crate::records::{Due, Loan, PaymentMethod, PaymentRequest};
use crate::types::{DueId, LoanId, Money, TransactionId};
use crate::LoanDeskResult;

#[derive(Debug, Clone, Serialize)]
pub struct PaymentSession {
    loan_id: LoanId,
    dues: Vec<Due>,
    reference_date: NaiveDate,
    mode: SelectionMode,
    selected: Vec<DueId>,
    discount: Money,
}

impl PaymentSession {
    /// Open a session on `loan`.
    ///
    /// With `explicit_due`, the session pays exactly that due and its mode is
    /// locked; the due must belong to the loan.
    pub fn open(
        loan: &Loan,
        explicit_due: Option<DueId>,
        reference_date: NaiveDate,
    ) -> LoanDeskResult<Self> {
        let mode = match explicit_due {
            Some(id) => {
                if !loan.dues.iter().any(|d| d.id == id) {
                    return Err(LoanDeskError::NotFound {
                        resource: "due".into(),
                        id: id.to_string(),
                    });
                }
                SelectionMode::Explicit(id)
            }
            None => SelectionMode::SingleMonth,
        };

        let selected = select_dues(&loan.dues, &mode, reference_date);
        tracing::debug!(
            loan = %loan.id,
            ?mode,
            selected = selected.len(),
            "payment session opened"
        );

        Ok(Self {
            loan_id: loan.id.clone(),
            dues: loan.dues.clone(),
            reference_date,
            mode,
            selected,
            discount: Decimal::ZERO,
        })
    }

    pub fn mode(&self) -> &SelectionMode {
        &self.mode
    }

    pub fn selected(&self) -> &[DueId] {
        &self.selected
    }

    pub fn discount(&self) -> Money {
        self.discount
    }

    pub fn dues(&self) -> &[Due] {
        &self.dues
    }

    pub fn is_pinned(&self) -> bool {
        matches!(self.mode, SelectionMode::Explicit(_))
    }

    /// Dues offered under the current mode.
    pub fn candidates(&self) -> Vec<&Due> {
        candidate_dues(&self.dues, &self.mode, self.reference_date)
    }

    /// Change payment mode, resetting selection and discount.
    pub fn switch_mode(&mut self, mode: SelectionMode) -> LoanDeskResult<()> {
        if self.is_pinned() {
            return Err(LoanDeskError::invalid(
                "mode",
                "Payment mode is fixed when paying a specific due",
            ));
        }
        if matches!(mode, SelectionMode::Explicit(_)) {
            return Err(LoanDeskError::invalid(
                "mode",
                "A specific due can only be chosen when opening the payment",
            ));
        }

        self.discount = Decimal::ZERO;
        self.selected = select_dues(&self.dues, &mode, self.reference_date);
        self.mode = mode;
        Ok(())
    }

    /// Tick or untick a due; only in `Multiple` mode and only for offered dues.
    pub fn toggle(&mut self, id: &DueId) -> LoanDeskResult<()> {
        if self.mode != SelectionMode::Multiple {
            return Err(LoanDeskError::invalid(
                "due",
                "Dues can only be picked one by one in multiple-months mode",
            ));
        }
        if !self.candidates().iter().any(|d| &d.id == id) {
            return Err(LoanDeskError::invalid(
                "due",
                format!("Due '{id}' is not an unpaid due of this loan"),
            ));
        }
        let current = std::mem::take(&mut self.selected);
        self.selected = toggle_due(current, id);
        Ok(())
    }

    /// Set the settlement discount. Amounts above the total are accepted and
    /// clamped when the payment is allocated.
    pub fn set_discount(&mut self, discount: Money) -> LoanDeskResult<()> {
        if self.mode != SelectionMode::Settlement {
            return Err(LoanDeskError::invalid(
                "discount",
                "A discount applies only to a settlement",
            ));
        }
        check_discount(discount)?;
        self.discount = discount;
        Ok(())
    }

    pub fn plan(&self) -> PaymentPlan {
        match self.mode {
            SelectionMode::SingleMonth | SelectionMode::Explicit(_) => PaymentPlan::SingleMonth,
            SelectionMode::Multiple => PaymentPlan::Multiple,
            SelectionMode::Settlement => PaymentPlan::Settlement {
                discount: self.discount,
            },
        }
    }

    pub fn allocation(&self) -> LoanDeskResult<Allocation> {
        allocate(&self.dues, &self.selected, &self.plan())
    }

    /// Build the `POST payments` body with a fresh transaction id.
    pub fn prepare(&self, method: PaymentMethod) -> LoanDeskResult<PaymentRequest> {
        let allocation = self.allocation()?;
        Ok(PaymentRequest {
            loan_id: self.loan_id.clone(),
            transaction_id: TransactionId::generate(),
            method,
            amount: allocation.final_amount,
            kind: allocation.kind,
            count: allocation.count,
            dues: allocation.dues,
            discount: allocation.discount,
        })
    }
}
