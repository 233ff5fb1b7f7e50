use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use rental_analysis_core::metrics::{self, DscrStrength};

/// Arguments for the 1% rule check
#[derive(Args)]
pub struct OnePercentArgs {
    /// Monthly rent
    #[arg(long, alias = "rent")]
    pub monthly_rent: Decimal,

    /// Purchase price
    #[arg(long, alias = "price")]
    pub purchase_price: Decimal,
}

/// Arguments for debt service coverage
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct DscrArgs {
    /// Annual net operating income
    #[arg(long)]
    pub noi: Decimal,

    /// Annual debt service (mortgage payment * 12)
    #[arg(long)]
    pub debt_service: Decimal,
}

pub fn run_one_percent(args: OnePercentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let ratio = metrics::one_percent_rule(args.monthly_rent, args.purchase_price);
    Ok(json!({
        "one_percent_rule": ratio.round_dp(4),
        "passes": metrics::passes_one_percent_rule(ratio),
    }))
}

pub fn run_dscr(args: DscrArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let ratio = metrics::dscr(args.noi, args.debt_service);
    Ok(json!({
        "dscr": ratio.round_dp(4),
        "strength": DscrStrength::classify(ratio),
    }))
}
