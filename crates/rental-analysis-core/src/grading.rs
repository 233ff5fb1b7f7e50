use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::metrics::InvestmentMetrics;

/// Descending (threshold, points) bands; the first band the value reaches wins.
type Bands = [(Decimal, u32); 4];

/// Points awarded when a metric clears none of its bands.
const FLOOR_POINTS: u32 = 5;

const CAP_RATE_BANDS: Bands = [(dec!(8), 25), (dec!(6), 20), (dec!(4), 15), (dec!(2), 10)];
const CASH_FLOW_BANDS: Bands = [(dec!(500), 25), (dec!(200), 20), (dec!(0), 15), (dec!(-200), 10)];
const CASH_ON_CASH_BANDS: Bands = [(dec!(12), 25), (dec!(8), 20), (dec!(5), 15), (dec!(2), 10)];
const TOTAL_ROI_BANDS: Bands = [(dec!(15), 25), (dec!(10), 20), (dec!(6), 15), (dec!(3), 10)];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InvestmentGrade {
    A,
    B,
    C,
    D,
    F,
}

impl InvestmentGrade {
    /// Letter grade for a 0-100 score.
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 90 => Self::A,
            s if s >= 80 => Self::B,
            s if s >= 70 => Self::C,
            s if s >= 60 => Self::D,
            _ => Self::F,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::A => "Excellent Investment Opportunity",
            Self::B => "Good Investment Opportunity",
            Self::C => "Fair Investment Opportunity",
            Self::D => "Poor Investment Opportunity",
            Self::F => "Avoid This Investment",
        }
    }
}

impl std::fmt::Display for InvestmentGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        };
        write!(f, "{}", s)
    }
}

/// Sub-scores behind a grade, 25 points available per metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeBreakdown {
    pub cap_rate_points: u32,
    pub cash_flow_points: u32,
    pub cash_on_cash_points: u32,
    pub total_roi_points: u32,
    pub total_score: u32,
    pub grade: InvestmentGrade,
    pub rationale: Vec<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Score the four headline metrics against the fixed rubric.
pub fn score_investment(metrics: &InvestmentMetrics) -> GradeBreakdown {
    let mut rationale = Vec::with_capacity(4);

    let cap_rate_points = band_points(metrics.cap_rate, &CAP_RATE_BANDS);
    rationale.push(format!(
        "Cap rate {}% => {cap_rate_points}/25",
        metrics.cap_rate
    ));

    let cash_flow_points = band_points(metrics.net_monthly_cash_flow, &CASH_FLOW_BANDS);
    rationale.push(format!(
        "Monthly cash flow {} => {cash_flow_points}/25",
        metrics.net_monthly_cash_flow
    ));

    let cash_on_cash_points = band_points(metrics.cash_on_cash_return, &CASH_ON_CASH_BANDS);
    rationale.push(format!(
        "Cash-on-cash {}% => {cash_on_cash_points}/25",
        metrics.cash_on_cash_return
    ));

    let total_roi_points = band_points(metrics.total_roi, &TOTAL_ROI_BANDS);
    rationale.push(format!(
        "Total ROI {}% => {total_roi_points}/25",
        metrics.total_roi
    ));

    let total_score = cap_rate_points + cash_flow_points + cash_on_cash_points + total_roi_points;

    GradeBreakdown {
        cap_rate_points,
        cash_flow_points,
        cash_on_cash_points,
        total_roi_points,
        total_score,
        grade: InvestmentGrade::from_score(total_score),
        rationale,
    }
}

pub fn investment_grade(metrics: &InvestmentMetrics) -> InvestmentGrade {
    score_investment(metrics).grade
}

fn band_points(value: Decimal, bands: &Bands) -> u32 {
    bands
        .iter()
        .find(|(threshold, _)| value >= *threshold)
        .map(|(_, points)| *points)
        .unwrap_or(FLOOR_POINTS)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
