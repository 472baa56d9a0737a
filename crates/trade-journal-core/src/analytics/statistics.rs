use chrono::Duration;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analytics::timeline::{chronological, RunningPeak};
use crate::journal::trade::{Trade, TradeSide, TradeStatus};
use crate::types::*;

/// Reported when there are winners but no losers.
pub const PROFIT_FACTOR_CAP: Decimal = dec!(999.99);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Summary statistics over a set of journal trades.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioStatistics {
    pub total_trades: u32,
    pub open_trades: u32,
    pub closed_trades: u32,
    pub win_count: u32,
    pub loss_count: u32,
    pub break_even_count: u32,

    /// 0-100
    pub win_rate: Percent,
    pub loss_rate: Percent,

    pub gross_pnl: Money,
    pub net_pnl: Money,
    pub total_fees: Money,

    pub average_win: Money,
    /// Magnitude, always >= 0
    pub average_loss: Money,
    pub average_net_pnl: Money,

    pub largest_win: Money,
    /// Most negative single result, <= 0
    pub largest_loss: Money,

    pub profit_factor: Decimal,
    pub expectancy: Money,
    pub expectancy_r: RMultiple,
    pub average_r: RMultiple,
    pub best_r: RMultiple,
    pub worst_r: RMultiple,

    pub max_consecutive_wins: u32,
    pub max_consecutive_losses: u32,
    /// Positive for an active win streak, negative for a loss streak
    pub current_streak: i32,

    pub max_drawdown: Money,
    /// Percent of the peak at the point of maximum absolute drawdown
    pub max_drawdown_percent: Percent,

    #[serde(rename = "average_hold_time_ms", default, with = "duration_ms")]
    pub average_hold_time: Option<Duration>,
    #[serde(rename = "longest_hold_time_ms", default, with = "duration_ms")]
    pub longest_hold_time: Option<Duration>,
    #[serde(rename = "shortest_hold_time_ms", default, with = "duration_ms")]
    pub shortest_hold_time: Option<Duration>,

    pub long_win_rate: Percent,
    pub short_win_rate: Percent,
    pub long_count: u32,
    pub short_count: u32,
}

impl PortfolioStatistics {
    /// The "no trades" value.
    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Streaks {
    max_wins: u32,
    max_losses: u32,
    current: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Drawdown {
    max: Money,
    percent_at_max: Percent,
}

// ---------------------------------------------------------------------------
// Main function
// ---------------------------------------------------------------------------

/// Reduce a collection of trades to summary statistics.
///
/// Input order does not matter. Open and cancelled trades only contribute to
/// the counts; everything else is computed over the remaining closed trades.
pub fn calculate_statistics(trades: &[Trade]) -> PortfolioStatistics {
    if trades.is_empty() {
        return PortfolioStatistics::empty();
    }

    let open_count = trades.iter().filter(|t| t.is_open()).count() as u32;
    let closed: Vec<&Trade> = trades
        .iter()
        .filter(|t| !matches!(t.status, TradeStatus::Open | TradeStatus::Cancelled))
        .collect();

    if closed.is_empty() {
        debug!(
            total = trades.len(),
            open = open_count,
            "no closed trades, statistics short-circuited"
        );
        return PortfolioStatistics {
            total_trades: trades.len() as u32,
            open_trades: open_count,
            ..PortfolioStatistics::empty()
        };
    }

    let wins: Vec<Money> = closed
        .iter()
        .map(|t| t.net_pnl)
        .filter(|p| *p > Decimal::ZERO)
        .collect();
    let losses: Vec<Money> = closed
        .iter()
        .map(|t| t.net_pnl)
        .filter(|p| *p < Decimal::ZERO)
        .collect();
    let break_even_count = closed.iter().filter(|t| t.net_pnl.is_zero()).count() as u32;

    let n_closed = Decimal::from(closed.len() as u32);

    // -- Rates --
    let win_rate = round_percent(Decimal::from(wins.len() as u32) / n_closed * Decimal::ONE_HUNDRED);
    let loss_rate =
        round_percent(Decimal::from(losses.len() as u32) / n_closed * Decimal::ONE_HUNDRED);

    // -- P&L --
    let gross_pnl: Money = closed.iter().map(|t| t.gross_pnl).sum();
    let net_pnl: Money = closed.iter().map(|t| t.net_pnl).sum();
    let total_fees: Money = closed.iter().map(|t| t.total_costs()).sum();

    // -- Averages --
    let win_sum: Money = wins.iter().copied().sum();
    let loss_sum: Money = losses.iter().copied().sum();
    let average_win = mean(win_sum, wins.len());
    let average_loss = mean(loss_sum, losses.len()).abs();
    let average_net_pnl = net_pnl / n_closed;

    // -- Extremes --
    let largest_win = wins.iter().copied().max().unwrap_or(Decimal::ZERO);
    let largest_loss = losses.iter().copied().min().unwrap_or(Decimal::ZERO);

    // -- Profit factor --
    let profit_factor = profit_factor(win_sum, loss_sum.abs());

    // -- R multiples --
    let r_values: Vec<RMultiple> = closed.iter().filter_map(|t| t.result_r).collect();
    let average_r = round_r(mean(r_values.iter().copied().sum(), r_values.len()));
    let best_r = r_values.iter().copied().max().unwrap_or(Decimal::ZERO);
    let worst_r = r_values.iter().copied().min().unwrap_or(Decimal::ZERO);

    // -- Streaks and drawdown share one chronological pass order --
    let timeline = chronological(closed.iter().copied());
    let streaks = streaks(&timeline);
    let drawdown = max_drawdown(&timeline);

    // -- Hold times --
    let holds: Vec<Duration> = closed.iter().filter_map(|t| t.hold_duration()).collect();
    let (average_hold_time, longest_hold_time, shortest_hold_time) = hold_times(&holds);

    // -- Side distribution --
    let (long_count, long_win_rate) = side_breakdown(&closed, TradeSide::Buy);
    let (short_count, short_win_rate) = side_breakdown(&closed, TradeSide::Sell);

    debug!(
        total = trades.len(),
        closed = closed.len(),
        net_pnl = %net_pnl,
        "statistics computed"
    );

    PortfolioStatistics {
        total_trades: trades.len() as u32,
        open_trades: open_count,
        closed_trades: closed.len() as u32,
        win_count: wins.len() as u32,
        loss_count: losses.len() as u32,
        break_even_count,
        win_rate,
        loss_rate,
        gross_pnl: round_money(gross_pnl),
        net_pnl: round_money(net_pnl),
        total_fees: round_money(total_fees),
        average_win: round_money(average_win),
        average_loss: round_money(average_loss),
        average_net_pnl: round_money(average_net_pnl),
        largest_win: round_money(largest_win),
        largest_loss: round_money(largest_loss),
        profit_factor,
        expectancy: round_money(average_net_pnl),
        expectancy_r: average_r,
        average_r,
        best_r: round_r(best_r),
        worst_r: round_r(worst_r),
        max_consecutive_wins: streaks.max_wins,
        max_consecutive_losses: streaks.max_losses,
        current_streak: streaks.current,
        max_drawdown: round_money(drawdown.max),
        max_drawdown_percent: drawdown.percent_at_max.round_dp(2),
        average_hold_time,
        longest_hold_time,
        shortest_hold_time,
        long_win_rate,
        short_win_rate,
        long_count,
        short_count,
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn mean(sum: Decimal, count: usize) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        sum / Decimal::from(count as u32)
    }
}

/// gross wins / |gross losses|, capped instead of dividing by zero.
fn profit_factor(win_sum: Money, loss_magnitude: Money) -> Decimal {
    if loss_magnitude > Decimal::ZERO {
        (win_sum / loss_magnitude).round_dp(2)
    } else if win_sum > Decimal::ZERO {
        PROFIT_FACTOR_CAP
    } else {
        Decimal::ZERO
    }
}

/// Win/loss runs over chronologically ordered trades; a flat trade ends both.
fn streaks(timeline: &[&Trade]) -> Streaks {
    let mut s = Streaks::default();
    let mut wins: u32 = 0;
    let mut losses: u32 = 0;

    for t in timeline {
        if t.net_pnl > Decimal::ZERO {
            wins += 1;
            losses = 0;
            s.current = wins as i32;
            s.max_wins = s.max_wins.max(wins);
        } else if t.net_pnl < Decimal::ZERO {
            losses += 1;
            wins = 0;
            s.current = -(losses as i32);
            s.max_losses = s.max_losses.max(losses);
        } else {
            wins = 0;
            losses = 0;
            s.current = 0;
        }
    }
    s
}

/// Largest peak-to-trough decline in cumulative net P&L, with the percentage
/// of the peak observed at that same point.
fn max_drawdown(timeline: &[&Trade]) -> Drawdown {
    let mut running = RunningPeak::new();
    let mut dd = Drawdown::default();

    for t in timeline {
        let current = running.push(t.net_pnl);
        if current > dd.max {
            dd.max = current;
            dd.percent_at_max = if running.peak() > Decimal::ZERO {
                current / running.peak() * Decimal::ONE_HUNDRED
            } else {
                Decimal::ZERO
            };
        }
    }
    dd
}

/// (average, longest, shortest); the average is taken over nanoseconds.
fn hold_times(holds: &[Duration]) -> (Option<Duration>, Option<Duration>, Option<Duration>) {
    if holds.is_empty() {
        return (None, None, None);
    }
    let total_nanos: i128 = holds.iter().map(|d| nanos(*d)).sum();
    let avg_nanos = total_nanos / holds.len() as i128;
    let average = i64::try_from(avg_nanos)
        .map(Duration::nanoseconds)
        .unwrap_or_else(|_| Duration::milliseconds((avg_nanos / 1_000_000) as i64));

    (
        Some(average),
        holds.iter().max().copied(),
        holds.iter().min().copied(),
    )
}

fn nanos(d: Duration) -> i128 {
    d.num_nanoseconds()
        .map(i128::from)
        .unwrap_or_else(|| i128::from(d.num_milliseconds()) * 1_000_000)
}

fn side_breakdown(closed: &[&Trade], side: TradeSide) -> (u32, Percent) {
    let on_side: Vec<&&Trade> = closed.iter().filter(|t| t.side == side).collect();
    if on_side.is_empty() {
        return (0, Decimal::ZERO);
    }
    let winners = on_side.iter().filter(|t| t.net_pnl > Decimal::ZERO).count();
    let rate = Decimal::from(winners as u32) / Decimal::from(on_side.len() as u32)
        * Decimal::ONE_HUNDRED;
    (on_side.len() as u32, round_percent(rate))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
