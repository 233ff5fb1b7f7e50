use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use rental_analysis_core::amortization::{
    down_payment_from_percent, loan_amount_from_price_and_down_payment,
};
use rental_analysis_core::{analysis, grading, metrics, Property};

use crate::input;

/// Property fields, or a JSON property record via --input / stdin
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct PropertyArgs {
    /// Path to JSON property file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Purchase price
    #[arg(long, alias = "price")]
    pub purchase_price: Option<Decimal>,

    /// Current market value (defaults to purchase price)
    #[arg(long)]
    pub market_value: Option<Decimal>,

    /// Monthly rent
    #[arg(long, alias = "rent")]
    pub monthly_rent: Option<Decimal>,

    /// Down payment amount
    #[arg(long, conflicts_with = "down_payment_percent")]
    pub down_payment: Option<Decimal>,

    /// Down payment as a percentage of price (20 = 20%)
    #[arg(long)]
    pub down_payment_percent: Option<Decimal>,

    /// Loan amount (defaults to price less down payment)
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Annual interest rate in percent (7 = 7%)
    #[arg(long, alias = "rate")]
    pub interest_rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long, alias = "term", default_value_t = 30)]
    pub term_years: u32,

    /// Monthly property tax
    #[arg(long, alias = "tax")]
    pub property_tax: Option<Decimal>,

    /// Monthly insurance
    #[arg(long)]
    pub insurance: Option<Decimal>,

    /// Monthly HOA dues
    #[arg(long)]
    pub hoa: Option<Decimal>,

    /// Maintenance reserve, percent of rent
    #[arg(long)]
    pub maintenance: Option<Decimal>,

    /// Vacancy allowance, percent of rent
    #[arg(long)]
    pub vacancy: Option<Decimal>,

    /// Property management fee, percent of rent
    #[arg(long)]
    pub management: Option<Decimal>,
}

/// Build a property from structured input if present, else from flags.
///
/// Flag input behaves like the entry form: the loan amount is derived from
/// price and down payment unless given explicitly.
pub fn resolve_property(args: PropertyArgs) -> Result<Property, Box<dyn std::error::Error>> {
    if let Some(property) = input::read_structured::<Property>(args.input.as_deref())? {
        return Ok(property);
    }

    let purchase_price = args
        .purchase_price
        .ok_or("--purchase-price is required (or provide --input)")?;
    let down_payment = match (args.down_payment, args.down_payment_percent) {
        (Some(amount), _) => amount,
        (None, Some(pct)) => down_payment_from_percent(purchase_price, pct),
        (None, None) => {
            return Err("--down-payment or --down-payment-percent is required (or provide --input)".into())
        }
    };

    Ok(Property {
        purchase_price,
        market_value: args.market_value.unwrap_or(purchase_price),
        monthly_rent: args
            .monthly_rent
            .ok_or("--monthly-rent is required (or provide --input)")?,
        down_payment,
        loan_amount: args
            .loan_amount
            .unwrap_or_else(|| loan_amount_from_price_and_down_payment(purchase_price, down_payment)),
        interest_rate: args
            .interest_rate
            .ok_or("--interest-rate is required (or provide --input)")?,
        loan_term_years: args.term_years,
        monthly_property_tax: args
            .property_tax
            .ok_or("--property-tax is required (or provide --input)")?,
        monthly_insurance: args
            .insurance
            .ok_or("--insurance is required (or provide --input)")?,
        monthly_hoa: args.hoa,
        maintenance_percentage: args
            .maintenance
            .ok_or("--maintenance is required (or provide --input)")?,
        vacancy_rate: args
            .vacancy
            .ok_or("--vacancy is required (or provide --input)")?,
        property_management_percentage: args.management,
    })
}

pub fn run_analyze(args: PropertyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let property = resolve_property(args)?;
    let result = analysis::analyze_property(&property)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_metrics(args: PropertyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let property = resolve_property(args)?;
    Ok(serde_json::to_value(metrics::investment_metrics(&property))?)
}

pub fn run_grade(args: PropertyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let property = resolve_property(args)?;
    let breakdown = grading::score_investment(&metrics::investment_metrics(&property));
    Ok(serde_json::to_value(breakdown)?)
}
