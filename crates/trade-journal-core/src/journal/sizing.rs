use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::JournalError;
use crate::journal::trade::{Trade, TradeSide};
use crate::settings::JournalSettings;
use crate::types::*;
use crate::JournalResult;

/// R result and P&L implied by the entry, exit and stop prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEstimate {
    pub result_r: RMultiple,
    /// Present only when the trade carries a positive risk amount
    pub gross_pnl: Option<Money>,
}

/// Money at risk for a given percentage of the account balance.
pub fn risk_amount_from_percent(balance: Money, percent: Percent) -> JournalResult<Money> {
    if balance <= Decimal::ZERO {
        return Err(JournalError::InvalidInput {
            field: "balance".into(),
            reason: "Account balance must be positive".into(),
        });
    }
    if percent <= Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
        return Err(JournalError::InvalidInput {
            field: "percent".into(),
            reason: "Risk percent must be greater than 0 and at most 100".into(),
        });
    }
    Ok(round_money(balance * percent / Decimal::ONE_HUNDRED))
}

/// Estimate the R result from prices, direction-aware.
///
/// result_r = move / |entry - stop|, where move is exit - entry for a buy and
/// entry - exit for a sell. Returns None without an exit, a stop, a non-zero
/// entry, or a non-zero stop distance.
pub fn estimate_from_prices(trade: &Trade) -> Option<PriceEstimate> {
    let exit = trade.exit_price?;
    let stop = trade.stop_loss?;
    if trade.entry_price.is_zero() {
        return None;
    }
    let risk_distance = (trade.entry_price - stop).abs();
    if risk_distance.is_zero() {
        return None;
    }

    let move_distance = match trade.side {
        TradeSide::Buy => exit - trade.entry_price,
        TradeSide::Sell => trade.entry_price - exit,
    };
    let result_r = round_r(move_distance / risk_distance);
    let gross_pnl = trade
        .risk_amount
        .filter(|r| *r > Decimal::ZERO)
        .map(|r| round_money(result_r * r));

    Some(PriceEstimate { result_r, gross_pnl })
}

/// Fill the starting balance from settings when unset.
///
/// Risk is never inferred here; see [`apply_risk_percent`].
pub fn apply_settings(trade: &mut Trade, settings: &JournalSettings) {
    if trade.account_balance_before.is_none() {
        trade.account_balance_before = settings.default_account_balance;
    }
}

/// Size `risk_amount` as a percentage of `account_balance_before`.
///
/// Only for callers that opted into percent-based risk. Leaves the trade
/// untouched when it already has a risk amount or has no starting balance.
pub fn apply_risk_percent(trade: &mut Trade, percent: Percent) -> JournalResult<()> {
    if trade.risk_amount.is_some() {
        return Ok(());
    }
    if let Some(balance) = trade.account_balance_before {
        let risk = risk_amount_from_percent(balance, percent)?;
        debug!(trade_id = %trade.id, risk = %risk, %percent, "risk amount from percent");
        trade.risk_amount = Some(risk);
    }
    Ok(())
}
