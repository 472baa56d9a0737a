use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analytics::timeline::{chronological, RunningPeak};
use crate::journal::trade::Trade;
use crate::types::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityCurvePoint {
    /// Close time, or open time for trades without one
    pub date: DateTime<Utc>,
    pub cumulative_pnl: Money,
    /// Distance below the running peak, >= 0
    pub drawdown: Money,
    /// 1-based position in the curve
    pub trade_number: u32,
}

/// Cumulative net P&L after each non-open trade, in close-time order.
pub fn calculate_equity_curve(trades: &[Trade]) -> Vec<EquityCurvePoint> {
    let timeline = chronological(trades.iter().filter(|t| !t.is_open()));
    let mut running = RunningPeak::new();

    let curve: Vec<EquityCurvePoint> = timeline
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let drawdown = running.push(t.net_pnl);
            EquityCurvePoint {
                date: t.effective_date(),
                cumulative_pnl: round_money(running.cumulative()),
                drawdown: round_money(drawdown),
                trade_number: i as u32 + 1,
            }
        })
        .collect();

    debug!(points = curve.len(), "equity curve computed");
    curve
}
