use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use serde_json::json;

use loan_desk_core::api::LoanApi;
use loan_desk_core::{CustomerId, LoanId};

use super::emi::terms_from;
use super::{desk, CommandResult};
use crate::config::DeskConfig;

/// Loans held at the desk
#[derive(Args)]
pub struct LoansArgs {
    #[command(subcommand)]
    pub command: LoansCommand,
}

#[derive(Subcommand)]
pub enum LoansCommand {
    /// Loans of one customer
    List {
        #[arg(long)]
        customer: String,
    },
    /// One loan with its dues
    Show { id: String },
    /// Approve a loan on the given terms
    Approve(ApproveArgs),
}

#[derive(Args)]
pub struct ApproveArgs {
    #[arg(long)]
    pub customer: String,

    /// Path to JSON terms file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long, alias = "interest")]
    pub rate: Option<Decimal>,

    #[arg(long, alias = "duration")]
    pub months: Option<u32>,
}

pub fn run_loans(args: LoansArgs, config: &DeskConfig) -> CommandResult {
    match args.command {
        LoansCommand::List { customer } => {
            let loans = desk(config)?.customer_loans(&CustomerId::new(customer))?;
            Ok(serde_json::to_value(loans)?)
        }
        LoansCommand::Show { id } => {
            let loan = desk(config)?.api().get_loan(&LoanId::new(id))?;
            Ok(serde_json::to_value(loan)?)
        }
        LoansCommand::Approve(approve) => {
            let terms = terms_from(
                approve.input.as_deref(),
                approve.principal,
                approve.rate,
                approve.months,
            )?;
            let counter = desk(config)?;
            let preview = counter.preview_loan(&terms)?;
            let customer = CustomerId::new(approve.customer);
            let loan_id = counter.approve_loan(&customer, &terms)?;

            Ok(json!({
                "loan_id": loan_id,
                "customer": customer,
                "principal": terms.principal,
                "interest": terms.annual_rate_percent,
                "duration": terms.months,
                "emi": preview.result.emi,
                "total_payable": preview.result.total_payable,
            }))
        }
    }
}
