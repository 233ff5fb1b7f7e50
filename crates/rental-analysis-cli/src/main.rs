mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::loan::{LoanArgs, ScheduleArgs};
use commands::property::PropertyArgs;
use commands::ratios::{DscrArgs, OnePercentArgs};
use commands::screening::ScreenArgs;

/// Rental property investment analysis
#[derive(Parser)]
#[command(
    name = "rpa",
    version,
    about = "Rental property investment analysis",
    long_about = "Analyse rental properties with decimal precision: mortgage payments and \
                  amortization, cash flow, cap rate, cash-on-cash return, total ROI, \
                  the 1% rule, DSCR and an A-F investment grade."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log computation details to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Full analysis: metrics, grade, ratios and risk
    Analyze(PropertyArgs),
    /// Investment metrics only
    Metrics(PropertyArgs),
    /// Monthly payment, total payments and total interest for a loan
    Loan(LoanArgs),
    /// Month-by-month (or yearly) amortization schedule
    Schedule(ScheduleArgs),
    /// Score a property and assign a letter grade
    Grade(PropertyArgs),
    /// Check monthly rent against the 1% rule
    OnePercent(OnePercentArgs),
    /// Debt service coverage ratio
    Dscr(DscrArgs),
    /// Filter and sort a list of properties
    Screen(ScreenArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "rental_analysis_core=debug,rental_analysis_cli=debug"
    } else {
        "rental_analysis_core=warn,rental_analysis_cli=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stdout carries the result
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze(args) => commands::property::run_analyze(args),
        Commands::Metrics(args) => commands::property::run_metrics(args),
        Commands::Loan(args) => commands::loan::run_loan(args),
        Commands::Schedule(args) => commands::loan::run_schedule(args),
        Commands::Grade(args) => commands::property::run_grade(args),
        Commands::OnePercent(args) => commands::ratios::run_one_percent(args),
        Commands::Dscr(args) => commands::ratios::run_dscr(args),
        Commands::Screen(args) => commands::screening::run_screen(args),
        Commands::Version => {
            println!("rpa {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
