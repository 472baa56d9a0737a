use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::journal::trade::{SessionType, Trade, TradeSide, TradeStatus};
use crate::types::*;

/// User-facing trade filters applied before aggregation.
///
/// Every criterion is optional; an empty filter keeps every trade.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeFilter {
    /// Case-insensitive substring of the symbol
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<TradeSide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TradeStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionType>,
    /// Inclusive, compared against the UTC date the trade was opened
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_date: Option<NaiveDate>,
    /// true keeps winners only, false keeps everything that did not win
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winners_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_pnl: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pnl: Option<Money>,
}

impl TradeFilter {
    pub fn is_empty(&self) -> bool {
        self == &TradeFilter::default()
    }

    pub fn matches(&self, trade: &Trade) -> bool {
        if let Some(symbol) = self.symbol.as_deref().map(str::trim) {
            if !symbol.is_empty()
                && !trade
                    .symbol
                    .to_lowercase()
                    .contains(&symbol.to_lowercase())
            {
                return false;
            }
        }
        if self.side.is_some_and(|side| trade.side != side) {
            return false;
        }
        if self.status.is_some_and(|status| trade.status != status) {
            return false;
        }
        if let Some(setup) = self.setup.as_deref() {
            match trade.setup.as_deref() {
                Some(s) if s.eq_ignore_ascii_case(setup) => {}
                _ => return false,
            }
        }
        if self.session.is_some() && trade.session != self.session {
            return false;
        }

        let opened = trade.opened_at.date_naive();
        if self.from_date.is_some_and(|from| opened < from) {
            return false;
        }
        if self.to_date.is_some_and(|to| opened > to) {
            return false;
        }

        match self.winners_only {
            Some(true) if trade.net_pnl <= Decimal::ZERO => return false,
            Some(false) if trade.net_pnl > Decimal::ZERO => return false,
            _ => {}
        }
        if self.min_pnl.is_some_and(|min| trade.net_pnl < min) {
            return false;
        }
        if self.max_pnl.is_some_and(|max| trade.net_pnl > max) {
            return false;
        }
        true
    }

    /// Matching trades in their original order.
    pub fn apply(&self, trades: &[Trade]) -> Vec<Trade> {
        trades.iter().filter(|t| self.matches(t)).cloned().collect()
    }
}
