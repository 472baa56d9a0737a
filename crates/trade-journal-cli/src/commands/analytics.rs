use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;
use std::time::Instant;

use trade_journal_core::analytics::equity_curve::calculate_equity_curve;
use trade_journal_core::analytics::statistics::calculate_statistics;
use trade_journal_core::analytics::summary::{self, JournalSummaryInput};
use trade_journal_core::journal::filter::TradeFilter;
use trade_journal_core::journal::trade::{Trade, TradeSide, TradeStatus};
use trade_journal_core::settings::JournalSettings;
use trade_journal_core::types::with_metadata;

use crate::input::{self, TradeSet};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SideArg {
    Buy,
    Sell,
}

impl From<SideArg> for TradeSide {
    fn from(s: SideArg) -> Self {
        match s {
            SideArg::Buy => TradeSide::Buy,
            SideArg::Sell => TradeSide::Sell,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Open,
    Closed,
    BreakEven,
    Cancelled,
}

impl From<StatusArg> for TradeStatus {
    fn from(s: StatusArg) -> Self {
        match s {
            StatusArg::Open => TradeStatus::Open,
            StatusArg::Closed => TradeStatus::Closed,
            StatusArg::BreakEven => TradeStatus::BreakEven,
            StatusArg::Cancelled => TradeStatus::Cancelled,
        }
    }
}

/// Trade filters shared by the aggregation commands
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Symbol substring, case-insensitive
    #[arg(long)]
    pub symbol: Option<String>,

    #[arg(long, value_enum)]
    pub side: Option<SideArg>,

    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,

    /// Setup name, case-insensitive exact match
    #[arg(long)]
    pub setup: Option<String>,

    /// Earliest open date (YYYY-MM-DD), inclusive
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Latest open date (YYYY-MM-DD), inclusive
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Keep winning trades only
    #[arg(long, conflicts_with = "losers_only")]
    pub winners_only: bool,

    /// Keep trades that did not win
    #[arg(long)]
    pub losers_only: bool,

    #[arg(long, allow_hyphen_values = true)]
    pub min_pnl: Option<Decimal>,

    #[arg(long, allow_hyphen_values = true)]
    pub max_pnl: Option<Decimal>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> TradeFilter {
        let winners_only = match (self.winners_only, self.losers_only) {
            (true, _) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        };
        TradeFilter {
            symbol: self.symbol.clone(),
            side: self.side.map(Into::into),
            status: self.status.map(Into::into),
            setup: self.setup.clone(),
            session: None,
            from_date: self.from,
            to_date: self.to,
            winners_only,
            min_pnl: self.min_pnl,
            max_pnl: self.max_pnl,
        }
    }

    /// Flags win over a filter carried in the input; with no flags set the
    /// input's own filter applies.
    pub fn resolve(&self, embedded: TradeFilter) -> TradeFilter {
        let from_flags = self.to_filter();
        if from_flags.is_empty() {
            embedded
        } else {
            from_flags
        }
    }
}

/// Load trades and narrow them with the resolved filter.
fn load_filtered(
    path: Option<&str>,
    what: &str,
    flags: &FilterArgs,
) -> Result<(Vec<Trade>, usize, TradeFilter), Box<dyn std::error::Error>> {
    let (trades, embedded) = input::load::<TradeSet>(path, what)?.into_parts();
    let filter = flags.resolve(embedded);
    let total = trades.len();
    if filter.is_empty() {
        Ok((trades, total, filter))
    } else {
        Ok((filter.apply(&trades), total, filter))
    }
}

/// Arguments for portfolio statistics
#[derive(Args)]
pub struct StatsArgs {
    /// Path to JSON input file (array of trades, or {"trades": [...], "filter": {...}})
    #[arg(long)]
    pub input: Option<String>,

    /// Filter flags replace any filter in the input file
    #[command(flatten)]
    pub filter: FilterArgs,
}

pub fn run_stats(args: StatsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (trades, total, filter) =
        load_filtered(args.input.as_deref(), "portfolio statistics", &args.filter)?;

    let start = Instant::now();
    let stats = calculate_statistics(&trades);
    let elapsed = start.elapsed().as_micros() as u64;

    let mut warnings = Vec::new();
    if stats.closed_trades == 0 {
        warnings.push("No closed trades; only counts are populated".to_string());
    }

    Ok(serde_json::to_value(with_metadata(
        "Portfolio statistics over closed trades",
        &serde_json::json!({
            "trades_in": total,
            "trades_after_filter": trades.len(),
            "filter": filter,
        }),
        warnings,
        elapsed,
        stats,
    ))?)
}

/// Arguments for the equity curve
#[derive(Args)]
pub struct EquityCurveArgs {
    /// Path to JSON input file (array of trades, or {"trades": [...], "filter": {...}})
    #[arg(long)]
    pub input: Option<String>,

    /// Filter flags replace any filter in the input file
    #[command(flatten)]
    pub filter: FilterArgs,
}

pub fn run_equity_curve(args: EquityCurveArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (trades, total, filter) =
        load_filtered(args.input.as_deref(), "the equity curve", &args.filter)?;

    let start = Instant::now();
    let curve = calculate_equity_curve(&trades);
    let elapsed = start.elapsed().as_micros() as u64;

    let mut warnings = Vec::new();
    if curve.is_empty() {
        warnings.push("No non-open trades to plot".to_string());
    }

    Ok(serde_json::to_value(with_metadata(
        "Cumulative net P&L with drawdown from running peak",
        &serde_json::json!({
            "trades_in": total,
            "trades_after_filter": trades.len(),
            "filter": filter,
            "ordering": "close time, falling back to open time",
        }),
        warnings,
        elapsed,
        curve,
    ))?)
}

/// Arguments for the journal summary
#[derive(Args)]
pub struct SummaryArgs {
    /// Path to JSON input file (array of trades, or {"trades": [...], "filter": {...}})
    #[arg(long)]
    pub input: Option<String>,

    /// Filter flags replace any filter in the input file
    #[command(flatten)]
    pub filter: FilterArgs,
}

pub fn run_summary(
    args: SummaryArgs,
    settings: &JournalSettings,
) -> Result<Value, Box<dyn std::error::Error>> {
    let value: Value = input::load(args.input.as_deref(), "the journal summary")?;
    let mut summary_input: JournalSummaryInput = if value.is_array() {
        JournalSummaryInput {
            trades: serde_json::from_value(value)?,
            filter: TradeFilter::default(),
            currency: None,
        }
    } else {
        serde_json::from_value(value)?
    };

    summary_input.filter = args.filter.resolve(summary_input.filter);
    if summary_input.currency.is_none() {
        summary_input.currency = Some(settings.base_currency.clone());
    }

    let result = summary::summarize_journal(&summary_input);
    Ok(serde_json::to_value(result)?)
}
