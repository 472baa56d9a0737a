use rust_decimal::Decimal;

use crate::journal::trade::Trade;
use crate::types::*;

/// Trades ordered by close time, falling back to open time.
///
/// The sort is stable, so trades sharing an instant keep their input order.
pub fn chronological<'a, I>(trades: I) -> Vec<&'a Trade>
where
    I: IntoIterator<Item = &'a Trade>,
{
    let mut ordered: Vec<&Trade> = trades.into_iter().collect();
    ordered.sort_by_key(|t| t.effective_date());
    ordered
}

/// Running cumulative P&L with a high-water mark floored at zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunningPeak {
    cumulative: Money,
    peak: Money,
}

impl RunningPeak {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one trade's result and return the drawdown from the peak.
    pub fn push(&mut self, pnl: Money) -> Money {
        self.cumulative += pnl;
        if self.cumulative > self.peak {
            self.peak = self.cumulative;
        }
        self.drawdown()
    }

    pub fn cumulative(&self) -> Money {
        self.cumulative
    }

    pub fn peak(&self) -> Money {
        self.peak
    }

    /// Never negative: the peak is at least the current cumulative value.
    pub fn drawdown(&self) -> Money {
        (self.peak - self.cumulative).max(Decimal::ZERO)
    }
}
