use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::time::Instant;
use tracing::{info, warn};

use trade_journal_core::journal::normalizer::{self, CloseRequest};
use trade_journal_core::journal::sizing;
use trade_journal_core::journal::trade::Trade;
use trade_journal_core::settings::JournalSettings;
use trade_journal_core::types::with_metadata;

use crate::input::{self, TradeSet};

/// Arguments for trade normalization
#[derive(Args)]
pub struct NormalizeArgs {
    /// Path to JSON input file (one trade, an array, or {"trades": [...]})
    #[arg(long)]
    pub input: Option<String>,

    /// Size unset risk amounts as a percent of the starting balance
    /// (the settings default when given without a value)
    #[arg(long, num_args = 0..=1, value_name = "PERCENT")]
    pub risk_percent: Option<Option<Decimal>>,
}

pub fn run_normalize(
    args: NormalizeArgs,
    settings: &JournalSettings,
) -> Result<Value, Box<dyn std::error::Error>> {
    let set: TradeSet = input::load(args.input.as_deref(), "trade normalization")?;
    let single = set.is_single();
    let (mut trades, _) = set.into_parts();
    let risk_percent = args
        .risk_percent
        .map(|p| p.unwrap_or(settings.default_risk_percent));

    let start = Instant::now();
    for trade in trades.iter_mut() {
        sizing::apply_settings(trade, settings);
        if let Some(percent) = risk_percent {
            sizing::apply_risk_percent(trade, percent)?;
        }
        normalizer::normalize(trade);
    }
    let elapsed = start.elapsed().as_micros() as u64;
    info!(count = trades.len(), "normalized trades");

    let assumptions = serde_json::json!({
        "risk_percent": risk_percent.map(|p| p.to_string()),
        "default_account_balance": settings.default_account_balance.map(|b| b.to_string()),
        "net_pnl_backfill": "only when net is zero and gross or costs are non-zero",
    });
    let methodology = "Journal trade normalization";

    if single {
        let trade = trades.into_iter().next();
        Ok(serde_json::to_value(with_metadata(
            methodology,
            &assumptions,
            Vec::new(),
            elapsed,
            trade,
        ))?)
    } else {
        Ok(serde_json::to_value(with_metadata(
            methodology,
            &assumptions,
            Vec::new(),
            elapsed,
            trades,
        ))?)
    }
}

/// Arguments for closing a trade
#[derive(Args)]
pub struct CloseArgs {
    /// Path to JSON file holding the open trade
    #[arg(long)]
    pub input: Option<String>,

    /// Exit price
    #[arg(long)]
    pub exit_price: Decimal,

    /// Gross P&L realised on the exit
    #[arg(long, allow_hyphen_values = true)]
    pub gross_pnl: Decimal,

    /// Fees, replacing any already recorded on the trade
    #[arg(long)]
    pub fees: Option<Decimal>,
}

pub fn run_close(args: CloseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut trade: Trade = input::load(args.input.as_deref(), "closing a trade")?;
    let mut warnings = Vec::new();
    if !trade.is_open() {
        warn!(id = %trade.id, status = ?trade.status, "closing a trade that is not open");
        warnings.push(format!("Trade {} was already {:?}", trade.id, trade.status));
    }

    let request = CloseRequest {
        exit_price: args.exit_price,
        gross_pnl: args.gross_pnl,
        fees: args.fees,
    };

    let start = Instant::now();
    normalizer::close_trade(&mut trade, &request);
    let elapsed = start.elapsed().as_micros() as u64;
    info!(id = %trade.id, net_pnl = %trade.net_pnl, "closed trade");

    Ok(serde_json::to_value(with_metadata(
        "Explicit trade close",
        &request,
        warnings,
        elapsed,
        trade,
    ))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures;
    use rust_decimal_macros::dec;
    use trade_journal_core::journal::trade::{TradeOutcome, TradeStatus};

    const UNSIZED: &str = r#"{"symbol":"EURUSD","status":"Closed","entry_price":"1.1",
        "opened_at":"2025-05-01T09:00:00Z","net_pnl":"150","account_balance_before":"10000"}"#;

    fn normalized(value: Value) -> Vec<Trade> {
        match value["result"].clone() {
            Value::Array(_) => serde_json::from_value(value["result"].clone()).unwrap(),
            one => vec![serde_json::from_value(one).unwrap()],
        }
    }

    #[test]
    fn test_normalize_does_not_invent_risk() {
        let args = NormalizeArgs {
            input: Some(fixtures::input_file("normalize-unsized", UNSIZED)),
            risk_percent: None,
        };
        let out = run_normalize(args, &JournalSettings::default()).unwrap();
        let trade = &normalized(out)[0];
        assert_eq!(trade.risk_amount, None);
        assert_eq!(trade.result_r, None);
        assert_eq!(trade.outcome, Some(TradeOutcome::Win));
        assert_eq!(trade.account_balance_after, Some(dec!(10150)));
    }

    #[test]
    fn test_normalize_risk_percent_is_opt_in() {
        let settings = JournalSettings {
            default_risk_percent: dec!(1.5),
            ..Default::default()
        };
        let path = fixtures::input_file("normalize-sized", UNSIZED);

        let explicit = NormalizeArgs {
            input: Some(path.clone()),
            risk_percent: Some(Some(dec!(1))),
        };
        let trade = &normalized(run_normalize(explicit, &settings).unwrap())[0];
        assert_eq!(trade.risk_amount, Some(dec!(100)));
        assert_eq!(trade.result_r, Some(dec!(1.5)));

        let from_settings = NormalizeArgs {
            input: Some(path),
            risk_percent: Some(None),
        };
        let trade = &normalized(run_normalize(from_settings, &settings).unwrap())[0];
        assert_eq!(trade.risk_amount, Some(dec!(150)));
        assert_eq!(trade.result_r, Some(dec!(1)));
    }

    #[test]
    fn test_normalize_batch_fills_balance_from_settings() {
        let json = format!(
            "[{},{}]",
            fixtures::closed_trade("EURUSD", 2, "40"),
            fixtures::closed_trade("GBPUSD", 3, "-25")
        );
        let settings = JournalSettings {
            default_account_balance: Some(dec!(5000)),
            ..Default::default()
        };
        let args = NormalizeArgs {
            input: Some(fixtures::input_file("normalize-batch", &json)),
            risk_percent: None,
        };
        let out = run_normalize(args, &settings).unwrap();
        assert!(out["result"].is_array());
        let trades = normalized(out);
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].account_balance_after, Some(dec!(5040)));
        assert_eq!(trades[1].outcome, Some(TradeOutcome::Loss));
        assert!(trades.iter().all(|t| t.result_r.is_none()));
    }

    #[test]
    fn test_close_open_trade() {
        let json = r#"{"symbol":"XAUUSD","entry_price":"2300","opened_at":"2025-05-05T08:00:00Z",
            "commission":"5","risk_amount":"100"}"#;
        let args = CloseArgs {
            input: Some(fixtures::input_file("close-open", json)),
            exit_price: dec!(2310),
            gross_pnl: dec!(205),
            fees: Some(dec!(10)),
        };
        let out = run_close(args).unwrap();
        assert!(out["warnings"].as_array().unwrap().is_empty());
        let trade: Trade = serde_json::from_value(out["result"].clone()).unwrap();
        assert_eq!(trade.status, TradeStatus::Closed);
        assert_eq!(trade.net_pnl, dec!(190));
        assert_eq!(trade.result_r, Some(dec!(1.9)));
        assert_eq!(trade.exit_price, Some(dec!(2310)));
        assert!(trade.closed_at.is_some());
    }

    #[test]
    fn test_close_already_closed_trade_warns() {
        let args = CloseArgs {
            input: Some(fixtures::input_file(
                "close-closed",
                &fixtures::closed_trade("EURUSD", 6, "10"),
            )),
            exit_price: dec!(101),
            gross_pnl: dec!(-20),
            fees: None,
        };
        let out = run_close(args).unwrap();
        assert_eq!(out["warnings"].as_array().unwrap().len(), 1);
        let trade: Trade = serde_json::from_value(out["result"].clone()).unwrap();
        assert_eq!(trade.outcome, Some(TradeOutcome::Loss));
    }
}
