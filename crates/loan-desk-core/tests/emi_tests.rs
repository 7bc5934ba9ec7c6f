use loan_desk_core::emi::{compute_emi, preview_emi, EmiInput, LoanApplication};
use loan_desk_core::{CustomerId, LoanDeskError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// EMI engine
// ===========================================================================

fn terms(principal: Decimal, rate: Decimal, months: u32) -> EmiInput {
    EmiInput {
        principal,
        annual_rate_percent: rate,
        months,
    }
}

#[test]
fn test_standard_one_year_loan() {
    // 1 lakh at 12% p.a. over 12 months
    let out = preview_emi(&terms(dec!(100_000), dec!(12), 12)).unwrap();
    let r = &out.result;
    assert_eq!(r.emi, dec!(8884.88));
    assert_eq!(r.total_payable, dec!(106_618.56));
    assert_eq!(r.total_interest, dec!(6618.56));
    assert_eq!(r.schedule.len(), 12);
    assert!(r.schedule.iter().all(|row| row.amount == r.emi));
    assert_eq!(r.schedule.first().unwrap().month, 1);
    assert_eq!(r.schedule.last().unwrap().month, 12);
    assert!(out.warnings.is_empty());
}

#[test]
fn test_emi_rises_with_rate_and_falls_with_term() {
    let p = dec!(250_000);
    let low = compute_emi(p, dec!(8), 24).unwrap();
    let high = compute_emi(p, dec!(14), 24).unwrap();
    assert!(high > low);

    let short = compute_emi(p, dec!(10), 12).unwrap();
    let long = compute_emi(p, dec!(10), 36).unwrap();
    assert!(short > long);
}

#[test]
fn test_emi_never_below_straight_line_share() {
    for months in [1u32, 6, 12, 60, 240] {
        let p = dec!(500_000);
        let emi = compute_emi(p, dec!(9.5), months).unwrap();
        let straight = (p / Decimal::from(months)).round_dp(2);
        assert!(emi >= straight, "{months} months: {emi} < {straight}");
    }
}

#[test]
fn test_single_month_loan_charges_one_month_of_interest() {
    // 12% p.a. is 1% a month
    assert_eq!(compute_emi(dec!(10_000), dec!(12), 1).unwrap(), dec!(10_100));
}

#[test]
fn test_interest_free_loan_warns_about_rounding_shortfall() {
    let out = preview_emi(&terms(dec!(100_000), Decimal::ZERO, 12)).unwrap();
    assert_eq!(out.result.emi, dec!(8333.33));
    assert_eq!(out.result.total_payable, dec!(99_999.96));
    assert_eq!(out.result.total_interest, Decimal::ZERO);
    assert_eq!(out.warnings.len(), 1);
}

#[test]
fn test_invalid_terms_rejected() {
    let cases = [
        terms(Decimal::ZERO, dec!(12), 12),
        terms(dec!(-1), dec!(12), 12),
        terms(dec!(1000), dec!(-0.5), 12),
        terms(dec!(1000), dec!(12), 0),
    ];
    for t in &cases {
        assert!(
            matches!(preview_emi(t), Err(LoanDeskError::InvalidInput { .. })),
            "accepted {t:?}"
        );
    }
}

#[test]
fn test_application_carries_entered_terms() {
    let app = LoanApplication::new(CustomerId::new("c42"), &terms(dec!(75_000), dec!(11.5), 18))
        .unwrap();
    assert_eq!(app.customer, CustomerId::new("c42"));
    assert_eq!(app.principal, dec!(75_000));
    assert_eq!(app.interest, dec!(11.5));
    assert_eq!(app.duration, 18);
}
