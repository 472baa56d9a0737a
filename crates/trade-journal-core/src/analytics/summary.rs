use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::analytics::equity_curve::{calculate_equity_curve, EquityCurvePoint};
use crate::analytics::statistics::{calculate_statistics, PortfolioStatistics};
use crate::journal::filter::TradeFilter;
use crate::journal::trade::Trade;
use crate::types::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalSummaryInput {
    pub trades: Vec<Trade>,
    #[serde(default)]
    pub filter: TradeFilter,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
}

/// Statistics and equity curve computed over the same filtered trades.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalSummary {
    pub statistics: PortfolioStatistics,
    pub equity_curve: Vec<EquityCurvePoint>,
}

/// Dashboard view of a journal: filter once, then run both aggregations.
pub fn summarize_journal(input: &JournalSummaryInput) -> ComputationOutput<JournalSummary> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let trades = if input.filter.is_empty() {
        input.trades.clone()
    } else {
        input.filter.apply(&input.trades)
    };

    let statistics = calculate_statistics(&trades);
    let equity_curve = calculate_equity_curve(&trades);

    if trades.is_empty() {
        warnings.push("No trades matched the filter".into());
    } else if statistics.closed_trades == 0 {
        warnings.push("No closed trades; only counts are populated".into());
    }
    let unnormalized = trades
        .iter()
        .filter(|t| t.closed_at.is_some() && t.outcome.is_none())
        .count();
    if unnormalized > 0 {
        warnings.push(format!(
            "{unnormalized} closed trade(s) have no outcome; run normalization before saving"
        ));
    }

    let output = JournalSummary {
        statistics,
        equity_curve,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Trade Journal — Portfolio Statistics and Equity Curve",
        &serde_json::json!({
            "trades_in": input.trades.len(),
            "trades_after_filter": trades.len(),
            "filter": input.filter,
            "ordering": "close time, falling back to open time",
            "profit_factor_cap": "999.99",
            "currency": format!("{:?}", input.currency.clone().unwrap_or_default()),
        }),
        warnings,
        elapsed,
        output,
    )
}
