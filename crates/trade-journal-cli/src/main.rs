mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process;

use commands::analytics::{EquityCurveArgs, StatsArgs, SummaryArgs};
use commands::trade::{CloseArgs, NormalizeArgs};
use output::OutputFormat;
use trade_journal_core::settings::JournalSettings;

/// Trade journal normalization and performance analytics
#[derive(Parser)]
#[command(
    name = "tj",
    version,
    about = "Trade journal normalization and performance analytics",
    long_about = "Normalizes journal trades (net P&L, outcome, R result, balance rollforward, \
                  risk/reward) and derives portfolio statistics and equity curves with \
                  decimal precision. Reads JSON from --input or stdin."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, value_enum, default_value_t, global = true)]
    output: OutputFormat,

    /// Journal settings file (.yaml, .yml or .json)
    #[arg(long, global = true)]
    settings: Option<String>,

    /// Log filter, e.g. "debug" or "trade_journal_core=trace" (defaults to RUST_LOG, then warn)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive outcome, net P&L, R result and balances for one or more trades
    Normalize(NormalizeArgs),
    /// Close an open trade with an exit price and gross P&L
    Close(CloseArgs),
    /// Portfolio statistics (win rate, profit factor, drawdown, streaks)
    Stats(StatsArgs),
    /// Cumulative net P&L and drawdown per closed trade
    EquityCurve(EquityCurveArgs),
    /// Statistics and equity curve over the same filtered trades
    Summary(SummaryArgs),
    /// Print version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.log_level.as_deref());

    let settings = match cli.settings.as_deref().map(JournalSettings::load).transpose() {
        Ok(s) => s.unwrap_or_default(),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Normalize(args) => commands::trade::run_normalize(args, &settings),
        Commands::Close(args) => commands::trade::run_close(args),
        Commands::Stats(args) => commands::analytics::run_stats(args),
        Commands::EquityCurve(args) => commands::analytics::run_equity_curve(args),
        Commands::Summary(args) => commands::analytics::run_summary(args, &settings),
        Commands::Version => {
            println!("tj {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            cli.output.render(&value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
