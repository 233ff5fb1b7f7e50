use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::RentalAnalysisError;
use crate::types::{round_cents, with_metadata, ComputationOutput, Money, Percent};
use crate::RentalAnalysisResult;

const MONTHS_PER_YEAR: u32 = 12;

/// Longest loan term the validating entry points accept.
pub const MAX_TERM_YEARS: u32 = 50;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Loan inputs echoed alongside the derived payment totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanDetails {
    pub loan_amount: Money,
    /// Annual rate, whole-number percent
    pub interest_rate: Percent,
    pub term_years: u32,
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_payments: Money,
}

/// One month of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationPeriod {
    /// 1-based payment number
    pub period: u32,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    /// Outstanding balance after this payment
    pub balance: Money,
}

/// Twelve months of a schedule folded together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualAmortization {
    pub year: u32,
    pub payments: Money,
    pub interest: Money,
    pub principal: Money,
    pub ending_balance: Money,
}

/// Input for a validated amortization schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationInput {
    pub loan_amount: Money,
    pub interest_rate: Percent,
    pub term_years: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationScheduleOutput {
    pub loan_details: LoanDetails,
    pub periods: Vec<AmortizationPeriod>,
    pub annual: Vec<AnnualAmortization>,
    /// Interest actually charged by the schedule (cent-rounded each month)
    pub scheduled_interest: Money,
}

// ---------------------------------------------------------------------------
// Payment formulas
// ---------------------------------------------------------------------------

/// Fixed-rate monthly payment: P * r(1+r)^n / ((1+r)^n - 1), rounded to cents.
///
/// A zero rate amortises straight-line and is returned unrounded. A
/// non-positive loan amount (or a zero term) pays nothing.
pub fn monthly_payment(loan_amount: Money, annual_rate_percent: Percent, term_years: u32) -> Money {
    if loan_amount <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let total_months = u64::from(term_years) * u64::from(MONTHS_PER_YEAR);
    if total_months == 0 {
        return Decimal::ZERO;
    }

    if annual_rate_percent.is_zero() {
        return loan_amount / Decimal::from(total_months);
    }

    let monthly_rate = annual_rate_percent / dec!(100) / Decimal::from(MONTHS_PER_YEAR);
    round_cents(amortizing_payment(loan_amount, monthly_rate, total_months))
}

fn amortizing_payment(principal: Money, monthly_rate: Decimal, total_months: u64) -> Money {
    match (Decimal::ONE + monthly_rate).checked_powu(total_months) {
        Some(compound) => {
            let denominator = compound - Decimal::ONE;
            if denominator.is_zero() {
                return Decimal::ZERO;
            }
            principal * monthly_rate * (compound / denominator)
        }
        // (1+r)^n beyond Decimal range: compound / (compound - 1) is 1 to 28 places
        None => principal * monthly_rate,
    }
}

/// Monthly payment plus lifetime totals.
pub fn loan_details(loan_amount: Money, interest_rate: Percent, term_years: u32) -> LoanDetails {
    let payment = monthly_payment(loan_amount, interest_rate, term_years);
    let total_payments = payment * Decimal::from(term_years) * Decimal::from(MONTHS_PER_YEAR);
    let total_interest = total_payments - loan_amount;

    LoanDetails {
        loan_amount,
        interest_rate,
        term_years,
        monthly_payment: payment,
        total_interest: round_cents(total_interest),
        total_payments: round_cents(total_payments),
    }
}

/// Rent that exactly covers debt service and operating costs.
pub fn break_even_rent(monthly_mortgage_payment: Money, monthly_operating_expenses: Money) -> Money {
    round_cents(monthly_mortgage_payment + monthly_operating_expenses)
}

pub fn loan_amount_from_price_and_down_payment(price: Money, down_payment: Money) -> Money {
    (price - down_payment).max(Decimal::ZERO)
}

/// Down payment amount for a percentage of the price, rounded to cents.
pub fn down_payment_from_percent(price: Money, down_payment_percent: Percent) -> Money {
    round_cents(price * down_payment_percent / dec!(100))
}

// ---------------------------------------------------------------------------
// Schedules
// ---------------------------------------------------------------------------

/// Month-by-month schedule at the cent-rounded payment.
///
/// Interest is rounded to cents each month; the last payment absorbs the
/// residual so the balance closes at exactly zero.
pub fn amortization_schedule(
    loan_amount: Money,
    interest_rate: Percent,
    term_years: u32,
) -> Vec<AmortizationPeriod> {
    schedule_periods(loan_amount, interest_rate, term_years, u32::MAX)
}

/// The first `limit` periods of the schedule, stopping early once the
/// balance is retired.
fn schedule_periods(
    loan_amount: Money,
    interest_rate: Percent,
    term_years: u32,
    limit: u32,
) -> Vec<AmortizationPeriod> {
    let total_months = term_years.saturating_mul(MONTHS_PER_YEAR);
    if loan_amount <= Decimal::ZERO || total_months == 0 {
        return Vec::new();
    }

    let scheduled_payment = round_cents(monthly_payment(loan_amount, interest_rate, term_years));
    let monthly_rate = interest_rate / dec!(100) / Decimal::from(MONTHS_PER_YEAR);

    let mut periods = Vec::new();
    let mut balance = loan_amount;

    for period in 1..=total_months.min(limit) {
        let interest = round_cents(balance * monthly_rate);
        let mut payment = scheduled_payment;
        let mut principal = payment - interest;

        if period == total_months || principal >= balance {
            principal = balance;
            payment = principal + interest;
        }

        balance -= principal;
        periods.push(AmortizationPeriod {
            period,
            payment,
            interest,
            principal,
            balance,
        });

        if balance.is_zero() {
            break;
        }
    }

    periods
}

/// Fold a monthly schedule into calendar years of the loan.
pub fn annual_summary(periods: &[AmortizationPeriod]) -> Vec<AnnualAmortization> {
    periods
        .chunks(MONTHS_PER_YEAR as usize)
        .enumerate()
        .map(|(i, months)| AnnualAmortization {
            year: i as u32 + 1,
            payments: months.iter().map(|m| m.payment).sum(),
            interest: months.iter().map(|m| m.interest).sum(),
            principal: months.iter().map(|m| m.principal).sum(),
            ending_balance: months.last().map(|m| m.balance).unwrap_or(Decimal::ZERO),
        })
        .collect()
}

/// Outstanding balance after `payments_made` scheduled payments.
pub fn remaining_balance(
    loan_amount: Money,
    interest_rate: Percent,
    term_years: u32,
    payments_made: u32,
) -> Money {
    if loan_amount <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    if payments_made == 0 {
        return loan_amount;
    }

    schedule_periods(loan_amount, interest_rate, term_years, payments_made)
        .get(payments_made as usize - 1)
        .map(|p| p.balance)
        .unwrap_or(Decimal::ZERO)
}

/// Validated schedule wrapped in the standard output envelope.
pub fn build_amortization_schedule(
    input: &AmortizationInput,
) -> RentalAnalysisResult<ComputationOutput<AmortizationScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.loan_amount <= Decimal::ZERO {
        return Err(RentalAnalysisError::InvalidInput {
            field: "loan_amount".into(),
            reason: "Loan amount must be positive to build a schedule".into(),
        });
    }
    if input.term_years == 0 || input.term_years > MAX_TERM_YEARS {
        return Err(RentalAnalysisError::InvalidInput {
            field: "term_years".into(),
            reason: format!("Loan term must be between 1 and {MAX_TERM_YEARS} years"),
        });
    }
    if input.interest_rate < Decimal::ZERO {
        return Err(RentalAnalysisError::InvalidInput {
            field: "interest_rate".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }

    let details = loan_details(input.loan_amount, input.interest_rate, input.term_years);
    let periods = amortization_schedule(input.loan_amount, input.interest_rate, input.term_years);
    let annual = annual_summary(&periods);
    let scheduled_interest: Money = periods.iter().map(|p| p.interest).sum();

    if let Some(last) = periods.last() {
        let adjustment = last.payment - round_cents(details.monthly_payment);
        if !adjustment.is_zero() {
            warnings.push(format!(
                "Final payment adjusted by {adjustment} to retire the remaining balance"
            ));
        }
    }

    debug!(
        loan_amount = %input.loan_amount,
        monthly_payment = %details.monthly_payment,
        periods = periods.len(),
        "built amortization schedule"
    );

    let output = AmortizationScheduleOutput {
        loan_details: details,
        periods,
        annual,
        scheduled_interest,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "compounding": "monthly",
        "payment_rounding": "cents, half away from zero",
        "interest_rounding": "cents per period",
    });

    Ok(with_metadata(
        "Fixed-Rate Mortgage Amortization",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_monthly_payment_30yr_7pct() {
        // 240k at 7% over 30 years: standard reference value
        assert_eq!(monthly_payment(dec!(240000), dec!(7.0), 30), dec!(1596.73));
    }

    #[test]
    fn test_monthly_payment_15yr_6pct() {
        assert_eq!(monthly_payment(dec!(200000), dec!(6), 15), dec!(1687.71));
    }

    #[test]
    fn test_zero_rate_is_straight_line_unrounded() {
        let payment = monthly_payment(dec!(100000), Decimal::ZERO, 30);
        assert_eq!(payment, dec!(100000) / dec!(360));
        assert!(payment.scale() > 2);
    }

    #[test]
    fn test_non_positive_loan_pays_nothing() {
        assert_eq!(monthly_payment(Decimal::ZERO, dec!(7), 30), Decimal::ZERO);
        assert_eq!(monthly_payment(dec!(-5000), dec!(7), 30), Decimal::ZERO);
    }

    #[test]
    fn test_zero_term_pays_nothing() {
        assert_eq!(monthly_payment(dec!(100000), dec!(5), 0), Decimal::ZERO);
        assert_eq!(monthly_payment(dec!(100000), Decimal::ZERO, 0), Decimal::ZERO);
    }

    #[test]
    fn test_extreme_rate_does_not_overflow() {
        // (1+r)^n overflows Decimal; payment tends to interest-only
        let payment = monthly_payment(dec!(100000), dec!(1200), 40);
        assert_eq!(payment, dec!(100000));
    }

    #[test]
    fn test_loan_details_totals() {
        let details = loan_details(dec!(240000), dec!(7), 30);
        assert_eq!(details.monthly_payment, dec!(1596.73));
        assert_eq!(details.total_payments, dec!(574822.80));
        assert_eq!(details.total_interest, dec!(334822.80));
        assert_eq!(details.term_years, 30);
    }

    #[test]
    fn test_loan_details_zero_rate_has_no_interest() {
        let details = loan_details(dec!(120000), Decimal::ZERO, 10);
        assert_eq!(details.monthly_payment, dec!(1000));
        assert_eq!(details.total_payments, dec!(120000));
        assert_eq!(details.total_interest, Decimal::ZERO);
    }

    #[test]
    fn test_break_even_rent_rounds() {
        assert_eq!(break_even_rent(dec!(1596.73), dec!(750)), dec!(2346.73));
        assert_eq!(break_even_rent(dec!(1000.004), dec!(0.001)), dec!(1000.01));
    }

    #[test]
    fn test_loan_amount_floor_at_zero() {
        assert_eq!(
            loan_amount_from_price_and_down_payment(dec!(300000), dec!(60000)),
            dec!(240000)
        );
        assert_eq!(
            loan_amount_from_price_and_down_payment(dec!(300000), dec!(350000)),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_down_payment_from_percent() {
        assert_eq!(down_payment_from_percent(dec!(300000), dec!(20)), dec!(60000));
        assert_eq!(down_payment_from_percent(dec!(123456), dec!(3.5)), dec!(4320.96));
    }

    #[test]
    fn test_schedule_retires_balance() {
        let schedule = amortization_schedule(dec!(240000), dec!(7), 30);
        assert_eq!(schedule.len(), 360);
        assert_eq!(schedule.last().unwrap().balance, Decimal::ZERO);

        let principal: Money = schedule.iter().map(|p| p.principal).sum();
        assert_eq!(principal, dec!(240000));

        // First month: interest = 240000 * 0.07 / 12 = 1400.00
        assert_eq!(schedule[0].interest, dec!(1400.00));
        assert_eq!(schedule[0].principal, dec!(196.73));
    }

    #[test]
    fn test_schedule_zero_rate() {
        let schedule = amortization_schedule(dec!(1000), Decimal::ZERO, 1);
        assert_eq!(schedule.len(), 12);
        assert!(schedule.iter().all(|p| p.interest.is_zero()));
        // 1000 / 12 = 83.33; final payment picks up the odd cents
        assert_eq!(schedule[0].payment, dec!(83.33));
        assert_eq!(schedule[11].payment, dec!(83.37));
        assert_eq!(schedule[11].balance, Decimal::ZERO);
    }

    #[test]
    fn test_schedule_empty_for_no_loan() {
        assert!(amortization_schedule(Decimal::ZERO, dec!(7), 30).is_empty());
        assert!(amortization_schedule(dec!(1000), dec!(7), 0).is_empty());
    }

    #[test]
    fn test_annual_summary_years() {
        let schedule = amortization_schedule(dec!(240000), dec!(7), 30);
        let annual = annual_summary(&schedule);
        assert_eq!(annual.len(), 30);
        assert_eq!(annual[0].year, 1);
        assert_eq!(annual[0].ending_balance, schedule[11].balance);
        assert_eq!(annual[29].ending_balance, Decimal::ZERO);
    }

    #[test]
    fn test_remaining_balance() {
        assert_eq!(remaining_balance(dec!(240000), dec!(7), 30, 0), dec!(240000));
        assert_eq!(remaining_balance(dec!(240000), dec!(7), 30, 360), Decimal::ZERO);
        let after_one = remaining_balance(dec!(240000), dec!(7), 30, 1);
        assert_eq!(after_one, dec!(239803.27));
    }

    #[test]
    fn test_build_schedule_validation() {
        let input = AmortizationInput {
            loan_amount: dec!(240000),
            interest_rate: dec!(7),
            term_years: 0,
        };
        assert!(build_amortization_schedule(&input).is_err());
    }

    #[test]
    fn test_build_schedule_rejects_excessive_term() {
        let input = AmortizationInput {
            loan_amount: dec!(1000),
            interest_rate: dec!(5),
            term_years: 200_000_000,
        };
        match build_amortization_schedule(&input) {
            Err(RentalAnalysisError::InvalidInput { field, .. }) => assert_eq!(field, "term_years"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }

        let longest = AmortizationInput {
            term_years: MAX_TERM_YEARS,
            ..input
        };
        let out = build_amortization_schedule(&longest).unwrap();
        assert_eq!(out.result.periods.len(), 600);
    }

    #[test]
    fn test_remaining_balance_stops_at_requested_payment() {
        // Only the first payment is walked, however long the term; a term
        // this long pays interest only, so the balance is untouched
        assert_eq!(remaining_balance(dec!(1000), dec!(12), u32::MAX, 1), dec!(1000));
    }

    #[test]
    fn test_build_schedule_envelope() {
        let input = AmortizationInput {
            loan_amount: dec!(240000),
            interest_rate: dec!(7),
            term_years: 30,
        };
        let out = build_amortization_schedule(&input).unwrap();
        assert_eq!(out.methodology, "Fixed-Rate Mortgage Amortization");
        assert_eq!(out.result.periods.len(), 360);
        assert_eq!(out.result.annual.len(), 30);
        assert_eq!(out.result.loan_details.monthly_payment, dec!(1596.73));
    }
}
