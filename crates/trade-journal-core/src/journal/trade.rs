use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::*;

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeSide {
    #[default]
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeStatus {
    #[default]
    Open,
    Closed,
    BreakEven,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeOutcome {
    Win,
    Loss,
    BreakEven,
}

impl TradeOutcome {
    /// Classify a net result by its sign.
    pub fn from_net_pnl(net_pnl: Money) -> Self {
        if net_pnl > Decimal::ZERO {
            TradeOutcome::Win
        } else if net_pnl < Decimal::ZERO {
            TradeOutcome::Loss
        } else {
            TradeOutcome::BreakEven
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmotionalState {
    Calm,
    Confident,
    Anxious,
    Fearful,
    Greedy,
    FOMO,
    Revenge,
    Frustrated,
    Euphoric,
    Indifferent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketCondition {
    Trending,
    Ranging,
    Volatile,
    LowVolatility,
    Breakout,
    Reversal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionType {
    Asian,
    London,
    NewYork,
    LondonNewYorkOverlap,
    Sydney,
    OffHours,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConfluenceLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A partial take-profit closure within a trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialExit {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub exit_price: Money,
    #[serde(default)]
    pub quantity: Decimal,
    #[serde(default)]
    pub realized_pnl: Money,
    /// Share of the original position closed, 0-100
    #[serde(default)]
    pub percent_closed: Percent,
    pub closed_at: DateTime<Utc>,
    #[serde(default)]
    pub moved_to_breakeven: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A single journal entry.
///
/// Fields marked as derived are filled by [`crate::journal::normalizer`];
/// `total_costs`, `hold_duration` and `effective_date` are computed on demand
/// and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub symbol: String,
    #[serde(default)]
    pub side: TradeSide,
    #[serde(default)]
    pub status: TradeStatus,
    /// Derived from the sign of `net_pnl` once closed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<TradeOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<String>,

    pub opened_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,

    pub entry_price: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_price: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<Money>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakeven_price: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakeven_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_breakeven_active: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_size: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fees: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commission: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swap: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slippage: Option<Money>,

    #[serde(default)]
    pub gross_pnl: Money,
    /// Zero is read as "not supplied" by the normalizer
    #[serde(default)]
    pub net_pnl: Money,

    /// Money the trader was willing to lose on this trade
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_amount: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_r: Option<RMultiple>,
    /// Derived: net_pnl / risk_amount
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_r: Option<RMultiple>,
    /// Derived: |take_profit - entry| / |entry - stop_loss|
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_reward_ratio: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_balance_before: Option<Money>,
    /// Derived: account_balance_before + net_pnl
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_balance_after: Option<Money>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion_before: Option<EmotionalState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion_after: Option<EmotionalState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_level: Option<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_condition: Option<MarketCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confluence: Option<ConfluenceLevel>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,

    /// Checklist rules satisfied before entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checklist_score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checklist_total: Option<u32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub partials: Vec<PartialExit>,
}

impl Trade {
    /// A fresh open trade with every optional field unset.
    pub fn new(
        symbol: impl Into<String>,
        side: TradeSide,
        entry_price: Money,
        opened_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbol: symbol.into(),
            side,
            status: TradeStatus::Open,
            outcome: None,
            timeframe: None,
            opened_at,
            closed_at: None,
            entry_price,
            exit_price: None,
            stop_loss: None,
            take_profit: None,
            breakeven_price: None,
            breakeven_at: None,
            is_breakeven_active: false,
            position_size: None,
            fees: None,
            commission: None,
            swap: None,
            slippage: None,
            gross_pnl: Decimal::ZERO,
            net_pnl: Decimal::ZERO,
            risk_amount: None,
            risk_r: None,
            result_r: None,
            risk_reward_ratio: None,
            account_balance_before: None,
            account_balance_after: None,
            emotion_before: None,
            emotion_after: None,
            confidence_level: None,
            setup: None,
            strategy: None,
            market_condition: None,
            session: None,
            confluence: None,
            notes: None,
            rating: None,
            tags: None,
            checklist_score: None,
            checklist_total: None,
            partials: Vec::new(),
        }
    }

    /// fees + commission + swap + slippage, absent components count as zero.
    pub fn total_costs(&self) -> Money {
        [self.fees, self.commission, self.swap, self.slippage]
            .iter()
            .map(|c| c.unwrap_or(Decimal::ZERO))
            .sum()
    }

    /// closed_at - opened_at; None while the trade is open.
    pub fn hold_duration(&self) -> Option<Duration> {
        self.closed_at.map(|closed| closed - self.opened_at)
    }

    /// The instant used to place the trade on a timeline.
    pub fn effective_date(&self) -> DateTime<Utc> {
        self.closed_at.unwrap_or(self.opened_at)
    }

    pub fn is_open(&self) -> bool {
        self.status == TradeStatus::Open
    }

    /// Sum of P&L realized through partial exits.
    pub fn realized_partial_pnl(&self) -> Money {
        self.partials.iter().map(|p| p.realized_pnl).sum()
    }

    /// Share of the position already closed through partials.
    pub fn percent_closed(&self) -> Percent {
        self.partials.iter().map(|p| p.percent_closed).sum()
    }

    /// Checklist compliance as a whole percentage; None without a checklist.
    pub fn checklist_compliance(&self) -> Option<Percent> {
        match (self.checklist_score, self.checklist_total) {
            (Some(score), Some(total)) if total > 0 => Some(
                (Decimal::from(score) / Decimal::from(total) * Decimal::ONE_HUNDRED).round_dp(0),
            ),
            _ => None,
        }
    }
}
