use clap::Args;
use rust_decimal::Decimal;

use loan_desk_core::emi::{preview_emi, EmiInput};

use super::CommandResult;
use crate::input;

/// Arguments for the EMI preview
#[derive(Args)]
pub struct EmiArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (12 = 12% p.a.)
    #[arg(long, alias = "interest")]
    pub rate: Option<Decimal>,

    /// Term in months
    #[arg(long, alias = "duration")]
    pub months: Option<u32>,
}

pub fn run_emi(args: EmiArgs) -> CommandResult {
    let emi_input = terms_from(
        args.input.as_deref(),
        args.principal,
        args.rate,
        args.months,
    )?;
    let result = preview_emi(&emi_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Loan terms from `--input`, piped JSON, or flags, in that order. Stdin is
/// only consulted when no flag was given.
pub(crate) fn terms_from(
    path: Option<&str>,
    principal: Option<Decimal>,
    rate: Option<Decimal>,
    months: Option<u32>,
) -> Result<EmiInput, Box<dyn std::error::Error>> {
    let flags_given = principal.is_some() || rate.is_some() || months.is_some();
    if path.is_some() || !flags_given {
        if let Some(data) = input::read_value(path)? {
            return Ok(serde_json::from_value(data)?);
        }
    }

    Ok(EmiInput {
        principal: principal.ok_or("--principal is required (or provide --input)")?,
        annual_rate_percent: rate.ok_or("--rate is required (or provide --input)")?,
        months: months.ok_or("--months is required (or provide --input)")?,
    })
}
