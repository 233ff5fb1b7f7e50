use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::{loan_amount_from_price_and_down_payment, MAX_TERM_YEARS};
use crate::error::RentalAnalysisError;
use crate::types::{Money, Percent};
use crate::RentalAnalysisResult;

/// Financial snapshot of a rental property.
///
/// Every percentage is on the whole-number scale (5 = 5%). Field names accept
/// the camelCase spelling as an alias so records exported from a JS front end
/// deserialise unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(alias = "purchasePrice")]
    pub purchase_price: Money,
    #[serde(alias = "marketValue")]
    pub market_value: Money,
    #[serde(alias = "monthlyRent")]
    pub monthly_rent: Money,
    #[serde(alias = "downPayment")]
    pub down_payment: Money,
    /// Independent input; not re-derived from price and down payment
    #[serde(alias = "loanAmount")]
    pub loan_amount: Money,
    /// Annual rate, e.g. 7 = 7%
    #[serde(alias = "interestRate")]
    pub interest_rate: Percent,
    #[serde(alias = "loanTermYears")]
    pub loan_term_years: u32,
    #[serde(alias = "monthlyPropertyTax")]
    pub monthly_property_tax: Money,
    #[serde(alias = "monthlyInsurance")]
    pub monthly_insurance: Money,
    #[serde(default, alias = "monthlyHOA", skip_serializing_if = "Option::is_none")]
    pub monthly_hoa: Option<Money>,
    /// Share of rent reserved for maintenance
    #[serde(alias = "maintenancePercentage")]
    pub maintenance_percentage: Percent,
    /// Share of rent lost to vacancy
    #[serde(alias = "vacancyRate")]
    pub vacancy_rate: Percent,
    #[serde(
        default,
        alias = "propertyManagementPercentage",
        skip_serializing_if = "Option::is_none"
    )]
    pub property_management_percentage: Option<Percent>,
}

impl Property {
    pub fn monthly_hoa(&self) -> Money {
        self.monthly_hoa.unwrap_or(Decimal::ZERO)
    }

    pub fn property_management_percentage(&self) -> Percent {
        self.property_management_percentage.unwrap_or(Decimal::ZERO)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Reject inputs the formulas would silently degrade on, and collect
/// warnings for values that are legal but suspicious.
pub fn validate_property(
    property: &Property,
    warnings: &mut Vec<String>,
) -> RentalAnalysisResult<()> {
    let money_fields = [
        ("purchase_price", property.purchase_price),
        ("market_value", property.market_value),
        ("monthly_rent", property.monthly_rent),
        ("down_payment", property.down_payment),
        ("loan_amount", property.loan_amount),
        ("monthly_property_tax", property.monthly_property_tax),
        ("monthly_insurance", property.monthly_insurance),
        ("monthly_hoa", property.monthly_hoa()),
    ];
    for (field, value) in money_fields {
        if value < Decimal::ZERO {
            return Err(RentalAnalysisError::InvalidInput {
                field: field.into(),
                reason: "Monetary amounts cannot be negative".into(),
            });
        }
    }

    let percent_fields = [
        ("maintenance_percentage", property.maintenance_percentage),
        ("vacancy_rate", property.vacancy_rate),
        (
            "property_management_percentage",
            property.property_management_percentage(),
        ),
    ];
    for (field, value) in percent_fields {
        if value < Decimal::ZERO || value > dec!(100) {
            return Err(RentalAnalysisError::InvalidInput {
                field: field.into(),
                reason: "Percentage must be between 0 and 100 (whole-number scale)".into(),
            });
        }
    }

    if property.interest_rate < Decimal::ZERO {
        return Err(RentalAnalysisError::InvalidInput {
            field: "interest_rate".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }

    if property.loan_amount > Decimal::ZERO && property.loan_term_years == 0 {
        return Err(RentalAnalysisError::InvalidInput {
            field: "loan_term_years".into(),
            reason: "Loan term must be at least 1 year when a loan is present".into(),
        });
    }

    if property.loan_term_years > MAX_TERM_YEARS {
        return Err(RentalAnalysisError::InvalidInput {
            field: "loan_term_years".into(),
            reason: format!("Loan term cannot exceed {MAX_TERM_YEARS} years"),
        });
    }

    // --- Warnings for unusual inputs ---
    let implied_loan =
        loan_amount_from_price_and_down_payment(property.purchase_price, property.down_payment);
    if property.loan_amount != implied_loan {
        warnings.push(format!(
            "Loan amount {} differs from purchase price less down payment ({implied_loan})",
            property.loan_amount
        ));
    }

    if property.market_value.is_zero() {
        warnings.push("Market value is zero; cap rate reported as 0 (undefined)".into());
    }

    if property.down_payment.is_zero() {
        warnings.push(
            "Down payment is zero; cash-on-cash return and total ROI reported as 0 (undefined)"
                .into(),
        );
    }

    if property.vacancy_rate > dec!(15) {
        warnings.push(format!(
            "Vacancy rate {}% exceeds 15%; above typical market norms",
            property.vacancy_rate
        ));
    }

    if property.interest_rate > dec!(25) {
        warnings.push(format!(
            "Interest rate {}% looks implausible; rates are whole-number percentages (7 = 7%)",
            property.interest_rate
        ));
    }

    Ok(())
}
