use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use trade_journal_core::journal::filter::TradeFilter;
use trade_journal_core::journal::trade::Trade;

/// Trades as accepted on input: a bare array, a `{"trades": [...]}` object
/// with an optional embedded filter, or a single trade object.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum TradeSet {
    Many(Vec<Trade>),
    Wrapped {
        trades: Vec<Trade>,
        #[serde(default)]
        filter: TradeFilter,
    },
    One(Box<Trade>),
}

impl TradeSet {
    pub fn is_single(&self) -> bool {
        matches!(self, TradeSet::One(_))
    }

    /// The trades and whatever filter travelled with them (empty if none).
    pub fn into_parts(self) -> (Vec<Trade>, TradeFilter) {
        match self {
            TradeSet::Many(trades) => (trades, TradeFilter::default()),
            TradeSet::Wrapped { trades, filter } => (trades, filter),
            TradeSet::One(trade) => (vec![*trade], TradeFilter::default()),
        }
    }
}

/// Parse typed JSON from `--input <file>` or, failing that, piped stdin.
pub fn load<T: DeserializeOwned>(path: Option<&str>, what: &str) -> Result<T, Box<dyn Error>> {
    let (origin, text) = match path {
        Some(p) => (format!("'{p}'"), read_file(Path::new(p))?),
        None => match read_piped()? {
            Some(text) => ("stdin".to_string(), text),
            None => return Err(format!("--input <file.json> or stdin required for {what}").into()),
        },
    };
    serde_json::from_str(&text).map_err(|e| format!("Failed to parse {origin}: {e}").into())
}

fn read_file(path: &Path) -> Result<String, Box<dyn Error>> {
    if !path.is_file() {
        return Err(format!("Input file not found: {}", path.display()).into());
    }
    fs::read_to_string(path).map_err(|e| format!("Failed to read '{}': {}", path.display(), e).into())
}

/// None when stdin is a terminal or carries only whitespace.
fn read_piped() -> io::Result<Option<String>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(Some(buffer).filter(|b| !b.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRADE: &str = r#"{"symbol":"GBPUSD","entry_price":"1.25","opened_at":"2025-03-03T09:00:00Z"}"#;

    #[test]
    fn test_trade_set_shapes() {
        let many: TradeSet = serde_json::from_str(&format!("[{TRADE},{TRADE}]")).unwrap();
        assert!(!many.is_single());
        assert_eq!(many.into_parts().0.len(), 2);

        let wrapped: TradeSet =
            serde_json::from_str(&format!(r#"{{"trades":[{TRADE}],"filter":{{"symbol":"gbp"}}}}"#))
                .unwrap();
        let (trades, filter) = wrapped.into_parts();
        assert_eq!(trades.len(), 1);
        assert_eq!(filter.symbol.as_deref(), Some("gbp"));

        let bare: TradeSet = serde_json::from_str(&format!(r#"{{"trades":[{TRADE}]}}"#)).unwrap();
        assert!(bare.into_parts().1.is_empty());

        let one: TradeSet = serde_json::from_str(TRADE).unwrap();
        assert!(one.is_single());
        assert_eq!(one.into_parts().0[0].symbol, "GBPUSD");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = load::<TradeSet>(Some("/nonexistent/trades.json"), "stats").err().unwrap();
        assert!(err.to_string().contains("not found"));
    }
}
