//! Desk-level workflows over a [`LoanApi`].
//!
//! `DeskSession` is the application state a front-end hands to each view:
//! the customer list, the customer being served, and the API behind them.
//! Every local check runs before the API is touched.

use chrono::NaiveDate;
use serde::Serialize;

use crate::api::LoanApi;
use crate::dues::{due_table, DueTableRow};
use crate::emi::{preview_emi, EmiInput, EmiOutput, LoanApplication};
use crate::error::LoanDeskError;
use crate::payments::PaymentSession;
use crate::records::{Customer, CustomerForm, Loan, PaymentKind, PaymentMethod, PaymentRecord};
use crate::types::{
    format_rupees, ComputationOutput, CustomerId, DueId, LoanId, Money, TransactionId,
};
use crate::LoanDeskResult;

/// Confirmation of a recorded payment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentReceipt {
    pub transaction_id: TransactionId,
    pub loan_id: LoanId,
    pub method: PaymentMethod,
    pub kind: PaymentKind,
    pub count: u32,
    pub amount: Money,
    pub discount: Money,
    pub message: String,
}

pub struct DeskSession<A: LoanApi> {
    api: A,
    customers: Vec<Customer>,
    selected_customer: Option<Customer>,
}

impl<A: LoanApi> DeskSession<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            customers: Vec::new(),
            selected_customer: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn selected_customer(&self) -> Option<&Customer> {
        self.selected_customer.as_ref()
    }

    // -- Customers -----------------------------------------------------------

    /// Reload the customer list, optionally filtered by a search term.
    pub fn load_customers(&mut self, search: Option<&str>) -> LoanDeskResult<&[Customer]> {
        self.customers = self.api.list_customers(search)?;
        Ok(&self.customers)
    }

    /// Validate the intake form, create the customer and append it to the list.
    pub fn add_customer(
        &mut self,
        form: &CustomerForm,
        today: NaiveDate,
    ) -> LoanDeskResult<Customer> {
        let new_customer = form.validate(today)?;
        let created = self.api.create_customer(&new_customer)?;
        self.customers.push(created.clone());
        Ok(created)
    }

    /// Make `id` the customer being served, fetching it when not listed.
    pub fn select_customer(&mut self, id: &CustomerId) -> LoanDeskResult<&Customer> {
        let customer = match self.customers.iter().find(|c| &c.id == id) {
            Some(c) => c.clone(),
            None => self.api.get_customer(id)?,
        };
        Ok(self.selected_customer.insert(customer))
    }

    pub fn customer_loans(&self, customer: &CustomerId) -> LoanDeskResult<Vec<Loan>> {
        self.api.list_customer_loans(customer)
    }

    // -- Loans ---------------------------------------------------------------

    /// EMI preview for the calculator; nothing is sent.
    pub fn preview_loan(&self, terms: &EmiInput) -> LoanDeskResult<ComputationOutput<EmiOutput>> {
        preview_emi(terms)
    }

    /// Approve a loan for `customer` on the given terms. Returns the new id.
    pub fn approve_loan(&self, customer: &CustomerId, terms: &EmiInput) -> LoanDeskResult<LoanId> {
        let application = LoanApplication::new(customer.clone(), terms)?;
        self.api.create_loan(&application)
    }

    pub fn due_table(&self, loan: &LoanId) -> LoanDeskResult<Vec<DueTableRow>> {
        Ok(due_table(&self.api.list_loan_dues(loan)?))
    }

    // -- Payments ------------------------------------------------------------

    pub fn open_payment(
        &self,
        loan: &LoanId,
        explicit_due: Option<DueId>,
        today: NaiveDate,
    ) -> LoanDeskResult<PaymentSession> {
        let loan = self.api.get_loan(loan)?;
        PaymentSession::open(&loan, explicit_due, today)
    }

    /// Allocate, build and send the payment. An empty selection fails with
    /// `NoSelection` before any request is made; nothing is retried.
    pub fn submit_payment(
        &self,
        session: &PaymentSession,
        method: PaymentMethod,
    ) -> LoanDeskResult<PaymentReceipt> {
        let request = session.prepare(method)?;
        tracing::info!(
            loan = %request.loan_id,
            transaction = %request.transaction_id,
            kind = %request.kind,
            count = request.count,
            "submitting payment"
        );

        self.api.create_payment(&request).map_err(|e| match e {
            LoanDeskError::SubmissionFailure { .. } => e,
            other => LoanDeskError::SubmissionFailure {
                operation: "record payment".into(),
                reason: other.to_string(),
            },
        })?;

        Ok(PaymentReceipt {
            message: format!(
                "Your payment of {} has been completed successfully!",
                format_rupees(request.amount)
            ),
            transaction_id: request.transaction_id,
            loan_id: request.loan_id,
            method: request.method,
            kind: request.kind,
            count: request.count,
            amount: request.amount,
            discount: request.discount,
        })
    }

    pub fn payment_details(&self, transaction: &TransactionId) -> LoanDeskResult<PaymentRecord> {
        self.api.get_payment(transaction)
    }
}
