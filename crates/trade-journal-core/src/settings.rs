use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::JournalError;
use crate::types::*;
use crate::JournalResult;

/// Journal-wide user preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalSettings {
    /// Timeframes the user analyses, in display order
    pub timeframes: Vec<String>,
    /// Default risk per trade as a percentage of the account
    pub default_risk_percent: Percent,
    pub default_account_balance: Option<Money>,
    pub base_currency: Currency,
}

impl Default for JournalSettings {
    fn default() -> Self {
        Self {
            timeframes: ["M1", "M5", "M15", "H1", "H4", "D1"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            default_risk_percent: dec!(1.0),
            default_account_balance: None,
            base_currency: Currency::USD,
        }
    }
}

impl JournalSettings {
    pub fn from_json_str(s: &str) -> JournalResult<Self> {
        let settings: Self = serde_json::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_yaml_str(s: &str) -> JournalResult<Self> {
        let settings: Self = serde_yaml::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from a `.yaml`/`.yml` or JSON file.
    pub fn load(path: impl AsRef<Path>) -> JournalResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| JournalError::Settings(format!("{}: {}", path.display(), e)))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&contents),
            _ => Self::from_json_str(&contents),
        }
    }

    pub fn validate(&self) -> JournalResult<()> {
        if self.default_risk_percent <= Decimal::ZERO
            || self.default_risk_percent > Decimal::ONE_HUNDRED
        {
            return Err(JournalError::InvalidInput {
                field: "default_risk_percent".into(),
                reason: "Must be greater than 0 and at most 100".into(),
            });
        }
        if let Some(balance) = self.default_account_balance {
            if balance <= Decimal::ZERO {
                return Err(JournalError::InvalidInput {
                    field: "default_account_balance".into(),
                    reason: "Must be positive".into(),
                });
            }
        }
        let mut seen = HashSet::new();
        for tf in &self.timeframes {
            if !seen.insert(tf.as_str()) {
                return Err(JournalError::InvalidInput {
                    field: "timeframes".into(),
                    reason: format!("Duplicate timeframe: {tf}"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = JournalSettings::default();
        assert_eq!(s.timeframes.len(), 6);
        assert_eq!(s.default_risk_percent, dec!(1));
        assert_eq!(s.base_currency, Currency::USD);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_yaml_partial_overrides() {
        let yaml = "default_risk_percent: \"0.5\"\ndefault_account_balance: \"25000\"\nbase_currency: EUR\n";
        let s = JournalSettings::from_yaml_str(yaml).unwrap();
        assert_eq!(s.default_risk_percent, dec!(0.5));
        assert_eq!(s.default_account_balance, Some(dec!(25000)));
        assert_eq!(s.base_currency, Currency::EUR);
        assert_eq!(s.timeframes[0], "M1");
    }

    #[test]
    fn test_json_rejects_bad_values() {
        assert!(JournalSettings::from_json_str(r#"{"default_risk_percent": "0"}"#).is_err());
        assert!(JournalSettings::from_json_str(r#"{"default_risk_percent": "150"}"#).is_err());
        assert!(JournalSettings::from_json_str(r#"{"timeframes": ["H1", "H1"]}"#).is_err());
        assert!(JournalSettings::from_json_str("not json").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = JournalSettings::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, JournalError::Settings(_)));
    }
}
