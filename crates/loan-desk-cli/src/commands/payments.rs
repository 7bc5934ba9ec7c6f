use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;

use loan_desk_core::payments::allocate_payment;
use loan_desk_core::records::PaymentMethod;
use loan_desk_core::{DueId, LoanId, TransactionId};

use super::{desk, today, CommandResult, ModeArg};
use crate::config::DeskConfig;

/// Arguments for paying dues of a loan
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct PayArgs {
    #[arg(long)]
    pub loan: String,

    /// Pay exactly this due; the mode is then fixed
    #[arg(long)]
    pub due: Option<String>,

    /// Payment mode
    #[arg(long, value_enum, default_value = "single")]
    pub mode: ModeArg,

    /// Due to tick in multiple mode (repeatable)
    #[arg(long = "select")]
    pub select: Vec<String>,

    /// Settlement discount
    #[arg(long)]
    pub discount: Option<Decimal>,

    /// cash, upi, card or bank
    #[arg(long, default_value = "cash")]
    pub method: PaymentMethod,

    /// Reference date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Show the allocation without recording the payment
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for payment lookup
#[derive(Args)]
pub struct PaymentShowArgs {
    /// Transaction id (TXN...)
    pub transaction: String,
}

pub fn run_pay(args: PayArgs, config: &DeskConfig) -> CommandResult {
    let counter = desk(config)?;
    let date = args.date.unwrap_or_else(today);
    let loan = LoanId::new(args.loan);
    let mut session = counter.open_payment(&loan, args.due.map(DueId::new), date)?;

    if args.mode != ModeArg::Single {
        session.switch_mode(args.mode.into())?;
    }
    for id in args.select {
        session.toggle(&DueId::new(id))?;
    }
    if let Some(discount) = args.discount {
        session.set_discount(discount)?;
    }

    if args.dry_run {
        let preview = allocate_payment(session.dues(), session.selected(), &session.plan())?;
        return Ok(serde_json::to_value(preview)?);
    }

    let receipt = counter.submit_payment(&session, args.method)?;
    Ok(serde_json::to_value(receipt)?)
}

pub fn run_payment_show(args: PaymentShowArgs, config: &DeskConfig) -> CommandResult {
    let record = desk(config)?.payment_details(&TransactionId::new(args.transaction))?;
    Ok(serde_json::to_value(record)?)
}
