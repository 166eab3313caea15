//! Configuration for the chain pipeline

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{ChainError, ChainResult};

/// Default demo price cycle
pub const DEFAULT_TICKER_PRICES: [f64; 8] = [175.3, 175.8, 175.2, 174.6, 173.8, 176.2, 170.0, 172.5];

/// Default ticker interval in milliseconds
pub const DEFAULT_TICKER_INTERVAL_MS: u64 = 5_000;

/// How filtered rows become call/put pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingMode {
    /// Group by (date, expiration, strike) and require one call plus one put
    #[default]
    Grouped,
    /// Row 2k is the call, row 2k+1 the put
    Positional,
}

/// What to do with rows that do not form a clean pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedPolicy {
    /// Drop the offending rows, log and report them as diagnostics
    #[default]
    Warn,
    /// Fail the view with the first issue found
    Reject,
}

/// Strike ordering applied to filtered rows before pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrikeOrder {
    /// Highest strike first
    #[default]
    Descending,
    Ascending,
    /// Keep the input order
    AsGiven,
}

/// Reference price ticker settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerConfig {
    /// Prices cycled through, in order
    pub prices: Vec<f64>,
    /// Time between steps in milliseconds
    pub interval_ms: u64,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            prices: DEFAULT_TICKER_PRICES.to_vec(),
            interval_ms: DEFAULT_TICKER_INTERVAL_MS,
        }
    }
}

impl TickerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Configuration for the options chain table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    pub pairing: PairingMode,
    pub unmatched: UnmatchedPolicy,
    pub strike_order: StrikeOrder,
    /// Call action button text
    pub call_label: String,
    /// Put action button text
    pub put_label: String,
    pub ticker: TickerConfig,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            pairing: PairingMode::Grouped,
            unmatched: UnmatchedPolicy::Warn,
            strike_order: StrikeOrder::Descending,
            call_label: "Call Click".to_string(),
            put_label: "Put Click".to_string(),
            ticker: TickerConfig::default(),
        }
    }
}

impl ChainConfig {
    /// Grouped pairing that fails on any malformed group
    pub fn strict() -> Self {
        Self {
            unmatched: UnmatchedPolicy::Reject,
            ..Default::default()
        }
    }

    /// Positional pairing over strike-sorted rows, problems only logged
    pub fn legacy() -> Self {
        Self {
            pairing: PairingMode::Positional,
            ..Default::default()
        }
    }

    /// Load from a JSON file; absent fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> ChainResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config: ChainConfig =
            serde_json::from_str(&json).map_err(|e| ChainError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ChainResult<()> {
        if self.ticker.prices.is_empty() {
            return Err(ChainError::invalid_input("ticker price list is empty"));
        }
        if self.ticker.interval_ms == 0 {
            return Err(ChainError::invalid_input("ticker interval must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ChainConfig::default();
        assert_eq!(config.pairing, PairingMode::Grouped);
        assert_eq!(config.unmatched, UnmatchedPolicy::Warn);
        assert_eq!(config.call_label, "Call Click");
        assert_eq!(config.put_label, "Put Click");
        assert_eq!(config.ticker.prices.len(), 8);
        assert_eq!(config.ticker.interval(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        assert_eq!(ChainConfig::strict().unmatched, UnmatchedPolicy::Reject);
        assert_eq!(ChainConfig::legacy().pairing, PairingMode::Positional);
    }

    #[test]
    fn test_partial_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"pairing": "positional", "call_label": "BOOM!", "ticker": {{"interval_ms": 250}}}}"#
        )
        .unwrap();

        let config = ChainConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.pairing, PairingMode::Positional);
        assert_eq!(config.call_label, "BOOM!");
        assert_eq!(config.put_label, "Put Click");
        assert_eq!(config.ticker.interval_ms, 250);
        assert_eq!(config.ticker.prices, DEFAULT_TICKER_PRICES.to_vec());
    }

    #[test]
    fn test_empty_prices_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"ticker": {{"prices": []}}}}"#).unwrap();

        let err = ChainConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, ChainError::InvalidInput(_)));
    }
}
