use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use rental_analysis_core::screening::{self, ScreeningInput, SortKey, SortOrder};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Price,
    Rent,
    CapRate,
    CashFlow,
    DateAdded,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Price => SortKey::Price,
            SortArg::Rent => SortKey::Rent,
            SortArg::CapRate => SortKey::CapRate,
            SortArg::CashFlow => SortKey::CashFlow,
            SortArg::DateAdded => SortKey::DateAdded,
        }
    }
}

/// Arguments for screening a list of properties
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ScreenArgs {
    /// JSON file: an array of listings, or `{listings, filters, sort_by, sort_order}`
    #[arg(long)]
    pub input: Option<String>,

    /// Sort key (overrides the file)
    #[arg(long)]
    pub sort_by: Option<SortArg>,

    /// Sort ascending instead of descending
    #[arg(long)]
    pub ascending: bool,

    /// Minimum cap rate, percent (overrides the file)
    #[arg(long)]
    pub min_cap_rate: Option<Decimal>,

    /// Minimum net monthly cash flow (overrides the file)
    #[arg(long)]
    pub min_cash_flow: Option<Decimal>,

    /// State, case-insensitive (overrides the file)
    #[arg(long)]
    pub state: Option<String>,
}

pub fn run_screen(args: ScreenArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let raw: Value = input::read_structured(args.input.as_deref())?
        .ok_or("--input <file.json> or stdin required for screening")?;
    // A bare array is a listing set with default filters
    let raw = match raw {
        Value::Array(listings) => serde_json::json!({ "listings": listings }),
        other => other,
    };
    let mut screen: ScreeningInput = serde_json::from_value(raw)?;

    if let Some(key) = args.sort_by {
        screen.sort_by = key.into();
    }
    if args.ascending {
        screen.sort_order = SortOrder::Asc;
    }
    if args.min_cap_rate.is_some() {
        screen.filters.min_cap_rate = args.min_cap_rate;
    }
    if args.min_cash_flow.is_some() {
        screen.filters.min_cash_flow = args.min_cash_flow;
    }
    if args.state.is_some() {
        screen.filters.state = args.state;
    }

    let result = screening::screen_properties(&screen)?;
    Ok(serde_json::to_value(result)?)
}
