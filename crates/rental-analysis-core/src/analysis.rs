use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::amortization::{loan_details, LoanDetails};
use crate::assessment::{assess_risk, metric_statuses, MetricStatuses, RiskAssessment};
use crate::grading::{score_investment, GradeBreakdown};
use crate::metrics::{
    dscr, investment_metrics, one_percent_rule, passes_one_percent_rule, DscrStrength,
    InvestmentMetrics,
};
use crate::property::{validate_property, Property};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Ratio};
use crate::RentalAnalysisResult;

/// Everything derived from one property snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyAnalysis {
    pub metrics: InvestmentMetrics,
    pub loan_details: LoanDetails,
    pub grade: GradeBreakdown,
    pub grade_description: String,
    /// Monthly rent as % of purchase price
    pub one_percent_rule: Percent,
    pub passes_one_percent_rule: bool,
    /// Mortgage payment * 12
    pub annual_debt_service: Money,
    pub dscr: Ratio,
    pub dscr_strength: DscrStrength,
    pub metric_statuses: MetricStatuses,
    pub risk: RiskAssessment,
    pub summary: String,
}

/// Validate a property and run the full analysis.
///
/// The formulas themselves never fail; validation rejects negative amounts,
/// out-of-range percentages and a loan without a term before they can
/// degrade into silent zeros.
pub fn analyze_property(
    property: &Property,
) -> RentalAnalysisResult<ComputationOutput<PropertyAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_property(property, &mut warnings)?;

    let metrics = investment_metrics(property);
    let loan = loan_details(
        property.loan_amount,
        property.interest_rate,
        property.loan_term_years,
    );
    let grade = score_investment(&metrics);

    let one_percent = one_percent_rule(property.monthly_rent, property.purchase_price);
    let annual_debt_service = metrics.monthly_mortgage_payment * dec!(12);
    let coverage = dscr(metrics.annual_net_operating_income, annual_debt_service);
    let dscr_strength = DscrStrength::classify(coverage);

    if !metrics.cash_flow_break_even {
        warnings.push(format!(
            "Negative cash flow of {} per month; rent must reach {} to break even",
            metrics.net_monthly_cash_flow, metrics.break_even_rent
        ));
    }
    if annual_debt_service > Decimal::ZERO && coverage < Decimal::ONE {
        warnings.push(format!(
            "DSCR of {:.2}x is below 1.0; NOI does not cover debt service",
            coverage
        ));
    }

    let summary = summarise(&metrics);
    let grade_description = grade.grade.description().to_string();

    debug!(
        grade = %grade.grade,
        score = grade.total_score,
        cap_rate = %metrics.cap_rate,
        net_monthly_cash_flow = %metrics.net_monthly_cash_flow,
        "analysed property"
    );
    for w in &warnings {
        warn!("{w}");
    }

    let output = PropertyAnalysis {
        metric_statuses: metric_statuses(&metrics),
        risk: assess_risk(property, &metrics),
        metrics,
        loan_details: loan,
        grade,
        grade_description,
        one_percent_rule: one_percent,
        passes_one_percent_rule: passes_one_percent_rule(one_percent),
        annual_debt_service,
        dscr: coverage,
        dscr_strength,
        summary,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "percent_scale": "whole-number (5 = 5%)",
        "rounding": "cents, half away from zero, applied per output field",
        "total_roi": "one year of cash flow plus cumulative appreciation over down payment",
        "dscr_debt_service": "rounded monthly payment * 12",
    });

    Ok(with_metadata(
        "Rental Property Investment Analysis",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

fn summarise(metrics: &InvestmentMetrics) -> String {
    let tail = if metrics.cash_flow_break_even {
        "The property is cash flow positive."
    } else {
        "The property has negative cash flow and may require additional capital."
    };
    format!(
        "This property generates {:.0} in monthly cash flow with a {:.2}% cap rate and a {:.2}% cash-on-cash return. {tail}",
        metrics.net_monthly_cash_flow, metrics.cap_rate, metrics.cash_on_cash_return
    )
}
