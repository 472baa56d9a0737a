use chrono::{DateTime, Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use trade_journal_core::analytics::equity_curve::calculate_equity_curve;
use trade_journal_core::analytics::statistics::{
    calculate_statistics, PortfolioStatistics, PROFIT_FACTOR_CAP,
};
use trade_journal_core::journal::normalizer::normalize;
use trade_journal_core::journal::trade::{Trade, TradeOutcome, TradeSide, TradeStatus};

// ===========================================================================
// Normalization and aggregation over realistic journal histories.
// ===========================================================================

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, d, 15, 30, 0).unwrap()
}

/// A trade as entered in the journal form, then normalized.
fn journal_entry(d: u32, side: TradeSide, gross: Decimal, costs: Decimal) -> Trade {
    let mut t = Trade::new("EURUSD", side, dec!(1.0800), day(d) - Duration::hours(2));
    t.closed_at = Some(day(d));
    t.gross_pnl = gross;
    t.commission = Some(costs);
    t.risk_amount = Some(dec!(50));
    normalize(&mut t);
    t
}

fn closed_with_net(d: u32, net: Decimal) -> Trade {
    let mut t = Trade::new("ES", TradeSide::Buy, dec!(5000), day(d));
    t.closed_at = Some(day(d) + Duration::minutes(45));
    t.net_pnl = net;
    t.gross_pnl = net;
    normalize(&mut t);
    t
}

// ---------------------------------------------------------------------------
// Normalizer properties
// ---------------------------------------------------------------------------

#[test]
fn test_costs_backfill_net_for_closed_trades() {
    for (gross, costs) in [
        (dec!(100), dec!(2.5)),
        (dec!(-80), dec!(1)),
        (dec!(0.01), dec!(0.02)),
    ] {
        let t = journal_entry(3, TradeSide::Buy, gross, costs);
        assert_eq!(t.net_pnl, gross - costs);
        assert_eq!(t.status, TradeStatus::Closed);
    }
}

#[test]
fn test_result_r_matches_net_over_risk() {
    let t = journal_entry(4, TradeSide::Sell, dec!(133.33), dec!(0.33));
    assert_eq!(t.net_pnl, dec!(133));
    assert_eq!(t.result_r, Some((dec!(133) / dec!(50)).round_dp(4)));
    assert_eq!(t.result_r, Some(dec!(2.66)));
}

#[test]
fn test_normalize_twice_changes_nothing() {
    let mut t = journal_entry(5, TradeSide::Buy, dec!(75), dec!(5));
    t.stop_loss = Some(dec!(1.0780));
    t.take_profit = Some(dec!(1.0860));
    t.account_balance_before = Some(dec!(2500));
    normalize(&mut t);
    let snapshot = t.clone();
    normalize(&mut t);
    assert_eq!(t, snapshot);
    assert_eq!(t.risk_reward_ratio, Some(dec!(3)));
    assert_eq!(t.account_balance_after, Some(dec!(2570)));
}

// ---------------------------------------------------------------------------
// Empty and open-only inputs
// ---------------------------------------------------------------------------

#[test]
fn test_empty_and_open_only_inputs() {
    assert_eq!(calculate_statistics(&[]), PortfolioStatistics::empty());
    assert!(calculate_equity_curve(&[]).is_empty());

    let open: Vec<Trade> = (1..=3)
        .map(|d| Trade::new("NQ", TradeSide::Buy, dec!(18000), day(d)))
        .collect();
    let stats = calculate_statistics(&open);
    assert_eq!(
        stats,
        PortfolioStatistics {
            total_trades: 3,
            open_trades: 3,
            ..PortfolioStatistics::empty()
        }
    );
    assert!(calculate_equity_curve(&open).is_empty());
}

// ---------------------------------------------------------------------------
// Scenario A: alternating results
// ---------------------------------------------------------------------------

#[test]
fn test_scenario_alternating_results() {
    let nets = [dec!(100), dec!(-50), dec!(30), dec!(-20), dec!(10)];
    // Supplied out of order; aggregation re-sorts by close time
    let mut trades: Vec<Trade> = nets
        .iter()
        .enumerate()
        .map(|(i, n)| closed_with_net(i as u32 + 1, *n))
        .collect();
    trades.reverse();

    let stats = calculate_statistics(&trades);
    assert_eq!(stats.closed_trades, 5);
    assert_eq!(stats.win_rate, dec!(60.0));
    assert_eq!(stats.loss_rate, dec!(40.0));
    assert_eq!(stats.net_pnl, dec!(70));
    assert_eq!(stats.profit_factor, dec!(2.00));
    assert_eq!(stats.max_consecutive_wins, 1);
    assert_eq!(stats.max_consecutive_losses, 1);
    assert_eq!(stats.current_streak, 1);
    // Cumulative 100, 50, 80, 60, 70 never gets above the first peak of 100
    assert_eq!(stats.max_drawdown, dec!(50));
    assert_eq!(stats.max_drawdown_percent, dec!(50.00));
    assert_eq!(stats.average_win, dec!(46.67));
    assert_eq!(stats.average_loss, dec!(35));
    assert_eq!(stats.largest_win, dec!(100));
    assert_eq!(stats.largest_loss, dec!(-50));
    assert_eq!(stats.expectancy, dec!(14));
    assert_eq!(stats.average_hold_time, Some(Duration::minutes(45)));

    let curve = calculate_equity_curve(&trades);
    let cumulative: Vec<Decimal> = curve.iter().map(|p| p.cumulative_pnl).collect();
    assert_eq!(
        cumulative,
        vec![dec!(100), dec!(50), dec!(80), dec!(60), dec!(70)]
    );
    let drawdowns: Vec<Decimal> = curve.iter().map(|p| p.drawdown).collect();
    assert_eq!(
        drawdowns,
        vec![dec!(0), dec!(50), dec!(20), dec!(40), dec!(30)]
    );
}

// ---------------------------------------------------------------------------
// Scenario B: winners only
// ---------------------------------------------------------------------------

#[test]
fn test_scenario_all_winners() {
    let trades: Vec<Trade> = [dec!(25), dec!(40.10), dec!(5)]
        .iter()
        .enumerate()
        .map(|(i, n)| closed_with_net(i as u32 + 1, *n))
        .collect();
    let stats = calculate_statistics(&trades);
    assert_eq!(stats.profit_factor, PROFIT_FACTOR_CAP);
    assert_eq!(stats.profit_factor, dec!(999.99));
    assert_eq!(stats.average_loss, Decimal::ZERO);
    assert_eq!(stats.largest_loss, Decimal::ZERO);
    assert_eq!(stats.max_drawdown, Decimal::ZERO);
    assert_eq!(stats.max_consecutive_wins, 3);
    assert_eq!(stats.current_streak, 3);
    assert_eq!(stats.win_rate, dec!(100));
}

// ---------------------------------------------------------------------------
// Scenario C: a single flat trade
// ---------------------------------------------------------------------------

#[test]
fn test_scenario_single_breakeven() {
    let t = closed_with_net(1, Decimal::ZERO);
    assert_eq!(t.outcome, Some(TradeOutcome::BreakEven));

    let stats = calculate_statistics(std::slice::from_ref(&t));
    assert_eq!(stats.break_even_count, 1);
    assert_eq!(stats.win_rate, dec!(0.0));
    assert_eq!(stats.loss_rate, dec!(0.0));
    assert_eq!(stats.profit_factor, Decimal::ZERO);
    assert_eq!(stats.current_streak, 0);
}

// ---------------------------------------------------------------------------
// Equity curve shape
// ---------------------------------------------------------------------------

#[test]
fn test_equity_curve_prefix_sums() {
    let nets = [
        dec!(12.34),
        dec!(-56.78),
        dec!(90.12),
        dec!(0),
        dec!(-3.45),
        dec!(67.89),
        dec!(-0.01),
    ];
    let mut trades: Vec<Trade> = nets
        .iter()
        .enumerate()
        .map(|(i, n)| closed_with_net(i as u32 + 1, *n))
        .collect();
    trades.push(Trade::new("ES", TradeSide::Sell, dec!(5000), day(20)));
    trades.rotate_left(3);

    let curve = calculate_equity_curve(&trades);
    assert_eq!(curve.len(), nets.len());

    let mut running = Decimal::ZERO;
    for (k, point) in curve.iter().enumerate() {
        running += nets[k];
        assert_eq!(point.trade_number, k as u32 + 1);
        assert_eq!(point.cumulative_pnl, running);
        assert!(point.drawdown >= Decimal::ZERO);
    }
}

#[test]
fn test_drawdown_percent_with_fractional_peak() {
    // Peak 130 then down 70: 70 / 130 = 53.846..%
    let trades: Vec<Trade> = [dec!(100), dec!(30), dec!(-50), dec!(-20), dec!(10)]
        .iter()
        .enumerate()
        .map(|(i, n)| closed_with_net(i as u32 + 1, *n))
        .collect();
    let stats = calculate_statistics(&trades);
    assert_eq!(stats.max_drawdown, dec!(70));
    assert_eq!(stats.max_drawdown_percent, dec!(53.85));
    assert_eq!(stats.max_consecutive_wins, 2);
    assert_eq!(stats.max_consecutive_losses, 2);
}

#[test]
fn test_statistics_and_curve_agree_on_drawdown() {
    let trades: Vec<Trade> = [dec!(30), dec!(-10), dec!(-25), dec!(50), dec!(-60)]
        .iter()
        .enumerate()
        .map(|(i, n)| closed_with_net(i as u32 + 1, *n))
        .collect();
    let stats = calculate_statistics(&trades);
    let curve = calculate_equity_curve(&trades);
    let deepest = curve.iter().map(|p| p.drawdown).max().unwrap();
    assert_eq!(stats.max_drawdown, deepest);
    assert_eq!(stats.max_drawdown, dec!(60));
}
