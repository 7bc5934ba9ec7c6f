use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;

use loan_desk_core::dues::{due_table, select_dues, summarize_selection, SelectionMode};
use loan_desk_core::payments::{allocate_payment, PaymentPlan};
use loan_desk_core::records::Due;
use loan_desk_core::{DueId, LoanId};

use super::{desk, dues_from_json, today, CommandResult, ModeArg};
use crate::config::DeskConfig;
use crate::input;

/// Arguments for due selection
#[derive(Args)]
pub struct SelectDuesArgs {
    /// Dues as returned by the API: an array of dues or a loan document
    #[arg(long)]
    pub input: Option<String>,

    /// Selection mode
    #[arg(long, value_enum, default_value = "single")]
    pub mode: ModeArg,

    /// Select exactly this due (overrides --mode)
    #[arg(long)]
    pub due: Option<String>,

    /// Reference date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

/// Arguments for payment allocation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct AllocateArgs {
    /// Dues as returned by the API: an array of dues or a loan document
    #[arg(long)]
    pub input: Option<String>,

    /// Payment plan
    #[arg(long, value_enum, default_value = "single")]
    pub plan: ModeArg,

    /// Due to pay (repeatable); derived from --plan when omitted
    #[arg(long = "due")]
    pub dues: Vec<String>,

    /// Settlement discount
    #[arg(long)]
    pub discount: Option<Decimal>,

    /// Reference date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

/// Arguments for the due table
#[derive(Args)]
pub struct DueTableArgs {
    /// Fetch the dues of this loan from the API
    #[arg(long, conflicts_with = "input")]
    pub loan: Option<String>,

    /// Dues as returned by the API: an array of dues or a loan document
    #[arg(long)]
    pub input: Option<String>,
}

fn read_dues(path: Option<&str>) -> Result<Vec<Due>, Box<dyn std::error::Error>> {
    let value = input::read_value(path)?
        .ok_or("--input file (or dues JSON on stdin) is required")?;
    Ok(dues_from_json(value)?)
}

pub fn run_select_dues(args: SelectDuesArgs) -> CommandResult {
    let dues = read_dues(args.input.as_deref())?;
    let mode = match args.due {
        Some(id) => SelectionMode::Explicit(DueId::new(id)),
        None => args.mode.into(),
    };
    let result = summarize_selection(&dues, &mode, args.date.unwrap_or_else(today));
    Ok(serde_json::to_value(result)?)
}

pub fn run_allocate(args: AllocateArgs) -> CommandResult {
    let dues = read_dues(args.input.as_deref())?;

    let plan = match (args.plan, args.discount) {
        (ModeArg::Settlement, discount) => PaymentPlan::settlement(discount.unwrap_or_default())?,
        (_, Some(_)) => return Err("--discount applies only to --plan settlement".into()),
        (ModeArg::Single, None) => PaymentPlan::SingleMonth,
        (ModeArg::Multiple, None) => PaymentPlan::Multiple,
    };

    let selected: Vec<DueId> = if args.dues.is_empty() {
        let date = args.date.unwrap_or_else(today);
        select_dues(&dues, &SelectionMode::from(args.plan), date)
    } else {
        args.dues.into_iter().map(DueId::new).collect()
    };

    let result = allocate_payment(&dues, &selected, &plan)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_due_table(args: DueTableArgs, config: &DeskConfig) -> CommandResult {
    let rows = match args.loan {
        Some(loan) => desk(config)?.due_table(&LoanId::new(loan))?,
        None => due_table(&read_dues(args.input.as_deref())?),
    };
    Ok(serde_json::to_value(rows)?)
}
