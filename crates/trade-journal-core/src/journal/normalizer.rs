use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::JournalError;
use crate::journal::trade::{PartialExit, Trade, TradeOutcome, TradeStatus};
use crate::types::*;
use crate::JournalResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Explicit close of an open trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloseRequest {
    pub exit_price: Money,
    pub gross_pnl: Money,
    /// Replaces any fees already on the trade when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fees: Option<Money>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Fill in derived fields on a trade that is about to be saved.
///
/// Rules run in a fixed order and each one only writes a field the caller
/// left unset, so explicit user values survive and a second call is a no-op:
///
/// 1. risk/reward ratio from stop and target distances
/// 2. net P&L = gross - costs, when net looks unset
/// 3. closed trades: status, outcome and R result
/// 4. account balance after = before + net
pub fn normalize(trade: &mut Trade) {
    apply_risk_reward(trade);
    backfill_net_pnl(trade);
    finalize_if_closed(trade);
    roll_balance_forward(trade);
}

/// Close a trade with an explicit exit, stamping the current time.
pub fn close_trade(trade: &mut Trade, request: &CloseRequest) {
    close_trade_at(trade, request, Utc::now());
}

/// Close a trade with an explicit exit at a given instant.
///
/// Unlike [`normalize`], this always recomputes `net_pnl` and `result_r`.
pub fn close_trade_at(trade: &mut Trade, request: &CloseRequest, closed_at: DateTime<Utc>) {
    trade.exit_price = Some(request.exit_price);
    trade.closed_at = Some(closed_at);
    trade.gross_pnl = request.gross_pnl;
    if let Some(fees) = request.fees {
        trade.fees = Some(fees);
    }

    trade.net_pnl = trade.gross_pnl - trade.total_costs();
    trade.status = TradeStatus::Closed;
    trade.outcome = Some(TradeOutcome::from_net_pnl(trade.net_pnl));

    if let Some(risk) = positive_risk(trade) {
        trade.result_r = Some(round_r(trade.net_pnl / risk));
    }

    debug!(
        trade_id = %trade.id,
        net_pnl = %trade.net_pnl,
        outcome = ?trade.outcome,
        "trade closed"
    );
}

/// Record a partial exit, optionally marking the stop as moved to breakeven.
pub fn record_partial(trade: &mut Trade, partial: PartialExit) -> JournalResult<()> {
    if partial.percent_closed < Decimal::ZERO || partial.percent_closed > Decimal::ONE_HUNDRED {
        return Err(JournalError::InvalidInput {
            field: "percent_closed".into(),
            reason: "Percent closed must be between 0 and 100".into(),
        });
    }
    let cumulative = trade.percent_closed() + partial.percent_closed;
    if cumulative > Decimal::ONE_HUNDRED {
        return Err(JournalError::InvalidInput {
            field: "percent_closed".into(),
            reason: format!("Partials would close {cumulative}% of the position"),
        });
    }

    if partial.moved_to_breakeven {
        trade.is_breakeven_active = true;
        trade.breakeven_at = Some(partial.closed_at);
        if trade.breakeven_price.is_none() {
            trade.breakeven_price = Some(trade.entry_price);
        }
    }

    debug!(
        trade_id = %trade.id,
        percent_closed = %partial.percent_closed,
        realized_pnl = %partial.realized_pnl,
        "partial exit recorded"
    );
    trade.partials.push(partial);
    Ok(())
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

fn apply_risk_reward(trade: &mut Trade) {
    if let (Some(stop), Some(target)) = (trade.stop_loss, trade.take_profit) {
        let risk = (trade.entry_price - stop).abs();
        let reward = (target - trade.entry_price).abs();
        if risk > Decimal::ZERO {
            trade.risk_reward_ratio = Some((reward / risk).round_dp(2));
            trace!(trade_id = %trade.id, rr = ?trade.risk_reward_ratio, "risk/reward derived");
        }
    }
}

fn backfill_net_pnl(trade: &mut Trade) {
    let costs = trade.total_costs();
    if costs > Decimal::ZERO && !trade.gross_pnl.is_zero() && trade.net_pnl.is_zero() {
        trade.net_pnl = trade.gross_pnl - costs;
        trace!(trade_id = %trade.id, net_pnl = %trade.net_pnl, "net P&L backfilled");
    }
}

fn finalize_if_closed(trade: &mut Trade) {
    if trade.status != TradeStatus::Closed && trade.closed_at.is_none() {
        return;
    }
    trade.status = TradeStatus::Closed;
    trade.outcome = Some(TradeOutcome::from_net_pnl(trade.net_pnl));

    if trade.result_r.is_none() {
        if let Some(risk) = positive_risk(trade) {
            trade.result_r = Some(round_r(trade.net_pnl / risk));
        }
    }
}

fn roll_balance_forward(trade: &mut Trade) {
    if trade.account_balance_after.is_some() || trade.net_pnl.is_zero() {
        return;
    }
    if let Some(before) = trade.account_balance_before {
        trade.account_balance_after = Some(before + trade.net_pnl);
    }
}

fn positive_risk(trade: &Trade) -> Option<Money> {
    trade.risk_amount.filter(|r| *r > Decimal::ZERO)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
