use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::metrics::InvestmentMetrics;
use crate::property::Property;
use crate::types::Money;

/// Qualitative reading of a metric against a (good, fair) pair of bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricStatus {
    Excellent,
    Good,
    Poor,
}

impl MetricStatus {
    pub fn classify(value: Decimal, good: Decimal, fair: Decimal) -> Self {
        if value >= good {
            Self::Excellent
        } else if value >= fair {
            Self::Good
        } else {
            Self::Poor
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// How cautious an underwriting assumption is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssumptionStance {
    Conservative,
    Moderate,
    Aggressive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentPosition {
    Above,
    Below,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricStatuses {
    pub cap_rate: MetricStatus,
    pub cash_flow: MetricStatus,
    pub cash_on_cash_return: MetricStatus,
    pub total_roi: MetricStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub cash_flow_risk: RiskLevel,
    pub vacancy_assumption: AssumptionStance,
    pub maintenance_buffer: AssumptionStance,
    pub rent_vs_break_even: RentPosition,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn metric_statuses(metrics: &InvestmentMetrics) -> MetricStatuses {
    MetricStatuses {
        cap_rate: MetricStatus::classify(metrics.cap_rate, dec!(8), dec!(5)),
        cash_flow: MetricStatus::classify(metrics.net_monthly_cash_flow, dec!(500), dec!(200)),
        cash_on_cash_return: MetricStatus::classify(metrics.cash_on_cash_return, dec!(12), dec!(8)),
        total_roi: MetricStatus::classify(metrics.total_roi, dec!(15), dec!(10)),
    }
}

pub fn assess_risk(property: &Property, metrics: &InvestmentMetrics) -> RiskAssessment {
    RiskAssessment {
        cash_flow_risk: cash_flow_risk(metrics.net_monthly_cash_flow),
        vacancy_assumption: vacancy_assumption(property.vacancy_rate),
        maintenance_buffer: maintenance_buffer(property.maintenance_percentage),
        rent_vs_break_even: if property.monthly_rent > metrics.break_even_rent {
            RentPosition::Above
        } else {
            RentPosition::Below
        },
    }
}

/// Strictly above the bounds: 500 exactly is still medium risk.
fn cash_flow_risk(net_monthly_cash_flow: Money) -> RiskLevel {
    if net_monthly_cash_flow > dec!(500) {
        RiskLevel::Low
    } else if net_monthly_cash_flow > Decimal::ZERO {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

fn vacancy_assumption(vacancy_rate: Decimal) -> AssumptionStance {
    if vacancy_rate <= dec!(5) {
        AssumptionStance::Conservative
    } else if vacancy_rate <= dec!(10) {
        AssumptionStance::Moderate
    } else {
        AssumptionStance::Aggressive
    }
}

fn maintenance_buffer(maintenance_percentage: Decimal) -> AssumptionStance {
    if maintenance_percentage >= dec!(10) {
        AssumptionStance::Conservative
    } else if maintenance_percentage >= dec!(5) {
        AssumptionStance::Moderate
    } else {
        AssumptionStance::Aggressive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_status_bounds() {
        assert_eq!(MetricStatus::classify(dec!(8), dec!(8), dec!(5)), MetricStatus::Excellent);
        assert_eq!(MetricStatus::classify(dec!(5), dec!(8), dec!(5)), MetricStatus::Good);
        assert_eq!(MetricStatus::classify(dec!(4.99), dec!(8), dec!(5)), MetricStatus::Poor);
    }

    #[test]
    fn test_cash_flow_risk_strict_bounds() {
        assert_eq!(cash_flow_risk(dec!(500.01)), RiskLevel::Low);
        assert_eq!(cash_flow_risk(dec!(500)), RiskLevel::Medium);
        assert_eq!(cash_flow_risk(Decimal::ZERO), RiskLevel::High);
    }

    #[test]
    fn test_vacancy_assumption_bands() {
        assert_eq!(vacancy_assumption(dec!(5)), AssumptionStance::Conservative);
        assert_eq!(vacancy_assumption(dec!(10)), AssumptionStance::Moderate);
        assert_eq!(vacancy_assumption(dec!(12)), AssumptionStance::Aggressive);
    }

    #[test]
    fn test_maintenance_buffer_bands() {
        assert_eq!(maintenance_buffer(dec!(10)), AssumptionStance::Conservative);
        assert_eq!(maintenance_buffer(dec!(5)), AssumptionStance::Moderate);
        assert_eq!(maintenance_buffer(dec!(2)), AssumptionStance::Aggressive);
    }

    #[test]
    fn test_status_serialises_snake_case() {
        assert_eq!(
            serde_json::to_string(&AssumptionStance::Conservative).unwrap(),
            "\"conservative\""
        );
    }
}
