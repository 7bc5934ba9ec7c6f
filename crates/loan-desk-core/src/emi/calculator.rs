//! Equated monthly installment (EMI) engine.
//!
//! Standard annuity formula on a monthly compounding basis, with the annual
//! rate quoted in percent. The preview schedule is flat: every month carries
//! the same rounded installment and no principal/interest split is made.

use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LoanDeskError;
use crate::types::{with_metadata, ComputationOutput, Money, Months, PercentRate};
use crate::LoanDeskResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const PERCENT: Decimal = dec!(100);
const MONTHS_PER_YEAR: Decimal = dec!(12);
/// Currency minor-unit precision.
const MONEY_DP: u32 = 2;
/// Longest accepted term: 100 years.
pub const MAX_TERM_MONTHS: Months = 1200;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Loan terms entered on the calculator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmiInput {
    pub principal: Money,
    /// Annual interest rate in percent (12 = 12% p.a.).
    pub annual_rate_percent: PercentRate,
    pub months: Months,
}

/// One row of the pre-approval preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub month: Months,
    pub amount: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmiOutput {
    pub emi: Money,
    pub total_payable: Money,
    pub total_interest: Money,
    pub schedule: Vec<ScheduleRow>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Check that loan terms are usable: principal > 0, rate >= 0, months > 0.
pub fn validate_terms(
    principal: Money,
    annual_rate_percent: PercentRate,
    months: Months,
) -> LoanDeskResult<()> {
    if principal <= Decimal::ZERO {
        return Err(LoanDeskError::invalid("principal", "Principal must be > 0"));
    }
    if annual_rate_percent < Decimal::ZERO {
        return Err(LoanDeskError::invalid(
            "annual_rate_percent",
            "Interest rate cannot be negative",
        ));
    }
    if months == 0 {
        return Err(LoanDeskError::invalid("months", "Duration must be > 0 months"));
    }
    if months > MAX_TERM_MONTHS {
        return Err(LoanDeskError::invalid(
            "months",
            format!("Duration cannot exceed {MAX_TERM_MONTHS} months"),
        ));
    }
    Ok(())
}

/// Fixed monthly installment, rounded to two decimals.
///
/// A zero rate degenerates to `principal / months`.
pub fn compute_emi(
    principal: Money,
    annual_rate_percent: PercentRate,
    months: Months,
) -> LoanDeskResult<Money> {
    validate_terms(principal, annual_rate_percent, months)?;

    let n = Decimal::from(months);
    let monthly_rate = annual_rate_percent / PERCENT / MONTHS_PER_YEAR;

    let raw = if monthly_rate.is_zero() {
        principal / n
    } else {
        let growth = (Decimal::ONE + monthly_rate)
            .checked_powu(u64::from(months))
            .ok_or_else(|| overflow("(1 + r)^n"))?;
        let denominator = growth - Decimal::ONE;
        if denominator.is_zero() {
            // Rate below Decimal resolution over this term.
            principal / n
        } else {
            principal
                .checked_mul(monthly_rate)
                .and_then(|v| v.checked_mul(growth))
                .and_then(|v| v.checked_div(denominator))
                .ok_or_else(|| overflow("principal * r * (1 + r)^n"))?
        }
    };

    Ok(round_money(raw))
}

/// Flat preview schedule: months `1..=months`, each carrying `emi`.
pub fn preview_schedule(emi: Money, months: Months) -> Vec<ScheduleRow> {
    (1..=months)
        .map(|month| ScheduleRow { month, amount: emi })
        .collect()
}

/// EMI plus its flat preview schedule and totals, wrapped with metadata.
pub fn preview_emi(input: &EmiInput) -> LoanDeskResult<ComputationOutput<EmiOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let emi = compute_emi(input.principal, input.annual_rate_percent, input.months)?;
    let total_payable = emi * Decimal::from(input.months);
    let residual = total_payable - input.principal;

    let total_interest = if residual < Decimal::ZERO {
        warnings.push(format!(
            "Rounded installments total {total_payable}, {} short of principal; \
             the residual is settled by the lender's final due.",
            -residual
        ));
        Decimal::ZERO
    } else {
        residual
    };

    let output = EmiOutput {
        emi,
        total_payable,
        total_interest,
        schedule: preview_schedule(emi, input.months),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Equated monthly installment, monthly compounding, flat preview schedule",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn round_money(amount: Money) -> Money {
    amount.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

fn overflow(expr: &str) -> LoanDeskError {
    LoanDeskError::invalid("months", format!("Loan terms overflow while computing {expr}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_zero_rate_is_straight_division() {
        assert_eq!(compute_emi(dec!(100000), dec!(0), 12).unwrap(), dec!(8333.33));
    }

    #[test]
    fn test_twelve_percent_one_year() {
        // r = 0.01, (1.01)^12 = 1.12682503...; EMI = 1000 * 1.1268 / 0.1268 = 8884.88
        assert_eq!(compute_emi(dec!(100000), dec!(12), 12).unwrap(), dec!(8884.88));
    }

    #[test]
    fn test_home_loan_style_terms() {
        // 5,00,000 at 10% for 5 years: well-known EMI of 10,623.52
        assert_eq!(compute_emi(dec!(500000), dec!(10), 60).unwrap(), dec!(10623.52));
    }

    #[test]
    fn test_single_month_repays_principal_plus_one_month_interest() {
        // n = 1: EMI = P * (1 + r)
        assert_eq!(compute_emi(dec!(1200), dec!(12), 1).unwrap(), dec!(1212));
    }

    #[test]
    fn test_rejects_non_positive_principal() {
        let err = compute_emi(dec!(0), dec!(10), 12).unwrap_err();
        match err {
            LoanDeskError::InvalidInput { field, .. } => assert_eq!(field, "principal"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
        assert!(compute_emi(dec!(-500), dec!(10), 12).is_err());
    }

    #[test]
    fn test_rejects_zero_months_and_negative_rate() {
        assert!(matches!(
            compute_emi(dec!(1000), dec!(10), 0),
            Err(LoanDeskError::InvalidInput { .. })
        ));
        assert!(matches!(
            compute_emi(dec!(1000), dec!(-1), 12),
            Err(LoanDeskError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_rejects_terms_beyond_maximum_before_building_schedule() {
        let err = preview_emi(&EmiInput {
            principal: dec!(1000),
            annual_rate_percent: dec!(0),
            months: u32::MAX,
        })
        .unwrap_err();
        match err {
            LoanDeskError::InvalidInput { field, .. } => assert_eq!(field, "months"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
        assert!(compute_emi(dec!(1000), dec!(10), MAX_TERM_MONTHS + 1).is_err());

        let longest = preview_emi(&EmiInput {
            principal: dec!(120000),
            annual_rate_percent: dec!(0),
            months: MAX_TERM_MONTHS,
        })
        .unwrap();
        assert_eq!(longest.result.schedule.len(), MAX_TERM_MONTHS as usize);
        assert_eq!(longest.result.emi, dec!(100));
    }

    #[test]
    fn test_preview_schedule_is_flat() {
        for months in [1u32, 6, 12, 36] {
            let out = preview_emi(&EmiInput {
                principal: dec!(250000),
                annual_rate_percent: dec!(9.5),
                months,
            })
            .unwrap();
            let r = &out.result;
            assert_eq!(r.schedule.len(), months as usize);
            assert!(r.schedule.iter().all(|row| row.amount == r.emi));
            assert_eq!(r.schedule.first().unwrap().month, 1);
            assert_eq!(r.schedule.last().unwrap().month, months);
        }
    }

    #[test]
    fn test_preview_totals() {
        let out = preview_emi(&EmiInput {
            principal: dec!(100000),
            annual_rate_percent: dec!(12),
            months: 12,
        })
        .unwrap();
        assert_eq!(out.result.total_payable, dec!(106618.56));
        assert_eq!(out.result.total_interest, dec!(6618.56));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_zero_rate_rounding_residual_is_warned() {
        let out = preview_emi(&EmiInput {
            principal: dec!(100000),
            annual_rate_percent: dec!(0),
            months: 12,
        })
        .unwrap();
        assert_eq!(out.result.total_payable, dec!(99999.96));
        assert_eq!(out.result.total_interest, Decimal::ZERO);
        assert_eq!(out.warnings.len(), 1);
    }
}
