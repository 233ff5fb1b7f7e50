use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use rental_analysis_core::amortization::{self, AmortizationInput};

use crate::input;

/// Loan terms, or a JSON `{loan_amount, interest_rate, term_years}` record
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long, alias = "principal")]
    pub loan_amount: Option<Decimal>,

    /// Purchase price (with --down-payment, derives the loan amount)
    #[arg(long, requires = "down_payment", conflicts_with = "loan_amount")]
    pub purchase_price: Option<Decimal>,

    /// Down payment amount
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Annual interest rate in percent (7 = 7%)
    #[arg(long, alias = "rate")]
    pub interest_rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long, alias = "term", default_value_t = 30)]
    pub term_years: u32,
}

/// Arguments for a full amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Print the yearly roll-up instead of every month
    #[arg(long)]
    pub yearly: bool,
}

fn resolve_loan(args: LoanArgs) -> Result<AmortizationInput, Box<dyn std::error::Error>> {
    if let Some(loan) = input::read_structured::<AmortizationInput>(args.input.as_deref())? {
        return Ok(loan);
    }

    let loan_amount = match (args.loan_amount, args.purchase_price, args.down_payment) {
        (Some(amount), _, _) => amount,
        (None, Some(price), Some(down)) => {
            amortization::loan_amount_from_price_and_down_payment(price, down)
        }
        _ => {
            return Err(
                "--loan-amount (or --purchase-price with --down-payment) is required".into(),
            )
        }
    };

    Ok(AmortizationInput {
        loan_amount,
        interest_rate: args
            .interest_rate
            .ok_or("--interest-rate is required (or provide --input)")?,
        term_years: args.term_years,
    })
}

pub fn run_loan(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = resolve_loan(args)?;
    let details = amortization::loan_details(loan.loan_amount, loan.interest_rate, loan.term_years);
    Ok(serde_json::to_value(details)?)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let yearly = args.yearly;
    let loan = resolve_loan(args.loan)?;
    let mut result = amortization::build_amortization_schedule(&loan)?;
    if yearly {
        result.result.periods.clear();
    } else {
        result.result.annual.clear();
    }
    Ok(serde_json::to_value(result)?)
}
