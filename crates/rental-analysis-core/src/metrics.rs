use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::{break_even_rent, monthly_payment};
use crate::property::Property;
use crate::types::{round_cents, Money, Percent, Ratio};

/// Minimum DSCR for "strong" coverage
const DSCR_STRONG: Ratio = dec!(1.25);
/// Minimum DSCR for "adequate" coverage
const DSCR_ADEQUATE: Ratio = dec!(1.0);
/// Rent-to-price percentage the 1% rule asks for
const ONE_PERCENT_THRESHOLD: Percent = dec!(1);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Derived investment metrics for a single property snapshot.
///
/// Never stored: recompute from the `Property` whenever it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentMetrics {
    pub monthly_mortgage_payment: Money,
    pub monthly_operating_expenses: Money,
    pub net_monthly_cash_flow: Money,
    pub annual_gross_rent: Money,
    pub annual_net_operating_income: Money,
    pub annual_cash_flow: Money,
    /// Annual NOI / market value, percent
    pub cap_rate: Percent,
    /// Annual cash flow / down payment, percent
    pub cash_on_cash_return: Percent,
    /// (Annual cash flow + appreciation) / down payment, percent
    pub total_roi: Percent,
    pub break_even_rent: Money,
    pub cash_flow_break_even: bool,
}

/// Debt service coverage bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DscrStrength {
    Strong,
    Adequate,
    Weak,
}

impl DscrStrength {
    pub fn classify(dscr: Ratio) -> Self {
        if dscr >= DSCR_STRONG {
            Self::Strong
        } else if dscr >= DSCR_ADEQUATE {
            Self::Adequate
        } else {
            Self::Weak
        }
    }
}

impl std::fmt::Display for DscrStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Strong => "Strong",
            Self::Adequate => "Adequate",
            Self::Weak => "Weak",
        };
        write!(f, "{}", s)
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Tax + insurance + HOA plus the rent-proportional reserves, unrounded.
pub fn monthly_operating_expenses(property: &Property) -> Money {
    let base = property.monthly_property_tax + property.monthly_insurance + property.monthly_hoa();
    let rent = property.monthly_rent;

    let maintenance = rent * property.maintenance_percentage / dec!(100);
    let vacancy = rent * property.vacancy_rate / dec!(100);
    let management = rent * property.property_management_percentage() / dec!(100);

    base + maintenance + vacancy + management
}

/// Compute the full metrics record for a property.
///
/// Each output is rounded to cents from its own unrounded intermediate;
/// nothing downstream consumes a rounded field.
pub fn investment_metrics(property: &Property) -> InvestmentMetrics {
    let mortgage_payment = monthly_payment(
        property.loan_amount,
        property.interest_rate,
        property.loan_term_years,
    );
    let operating_expenses = monthly_operating_expenses(property);
    let net_monthly_cash_flow = property.monthly_rent - operating_expenses - mortgage_payment;

    let annual_gross_rent = property.monthly_rent * dec!(12);
    let annual_operating_expenses = operating_expenses * dec!(12);
    let annual_noi = annual_gross_rent - annual_operating_expenses;
    let annual_cash_flow = net_monthly_cash_flow * dec!(12);

    let cap_rate = percent_of(annual_noi, property.market_value);
    let cash_on_cash_return = percent_of(annual_cash_flow, property.down_payment);
    // Cumulative appreciation over one year's cash flow; not annualised
    let appreciation = property.market_value - property.purchase_price;
    let total_roi = percent_of(annual_cash_flow + appreciation, property.down_payment);

    InvestmentMetrics {
        monthly_mortgage_payment: round_cents(mortgage_payment),
        monthly_operating_expenses: round_cents(operating_expenses),
        net_monthly_cash_flow: round_cents(net_monthly_cash_flow),
        annual_gross_rent: round_cents(annual_gross_rent),
        annual_net_operating_income: round_cents(annual_noi),
        annual_cash_flow: round_cents(annual_cash_flow),
        cap_rate: round_cents(cap_rate),
        cash_on_cash_return: round_cents(cash_on_cash_return),
        total_roi: round_cents(total_roi),
        break_even_rent: break_even_rent(mortgage_payment, operating_expenses),
        cash_flow_break_even: net_monthly_cash_flow >= Decimal::ZERO,
    }
}

/// Monthly rent as a percentage of purchase price. Passes the rule at >= 1.
pub fn one_percent_rule(monthly_rent: Money, purchase_price: Money) -> Percent {
    percent_of(monthly_rent, purchase_price)
}

pub fn passes_one_percent_rule(ratio: Percent) -> bool {
    ratio >= ONE_PERCENT_THRESHOLD
}

/// Debt service coverage ratio, unrounded. Zero when there is no debt service.
pub fn dscr(annual_noi: Money, annual_debt_service: Money) -> Ratio {
    if annual_debt_service <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    annual_noi / annual_debt_service
}

/// `numerator / base * 100`, or 0 when the base is not positive.
fn percent_of(numerator: Decimal, base: Decimal) -> Percent {
    if base <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    numerator / base * dec!(100)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
