//! Option chain rows
//!
//! One quote line per contract, as delivered by the upstream query. Decimal
//! columns are kept as text so the table shows exactly what the source sent.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::{ChainError, ChainResult};

/// Contract side (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionSide {
    #[serde(rename = "Call", alias = "CALL", alias = "call")]
    Call,
    #[serde(rename = "Put", alias = "PUT", alias = "put")]
    Put,
}

impl OptionSide {
    /// Is a contract of this side in the money for the given strike and spot?
    pub fn is_itm(&self, strike: f64, spot: f64) -> bool {
        match self {
            OptionSide::Call => strike < spot,
            OptionSide::Put => strike > spot,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OptionSide::Call => "Call",
            OptionSide::Put => "Put",
        }
    }
}

impl fmt::Display for OptionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single option quote line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionRow {
    /// Trade/query date
    pub date: NaiveDate,
    /// Underlying symbol
    #[serde(rename = "act_symbol")]
    pub symbol: String,
    /// Expiration date
    pub expiration: NaiveDate,
    /// Strike price (decimal text)
    pub strike: String,
    /// Call or put
    #[serde(rename = "call_put")]
    pub side: OptionSide,
    pub bid: String,
    pub ask: String,
    /// `vol` column of the source data
    #[serde(rename = "vol")]
    pub volume: String,
    pub delta: String,
    pub gamma: String,
    pub theta: String,
    pub vega: String,
    pub rho: String,
}

impl OptionRow {
    /// Row with the identifying columns set and empty quote columns
    pub fn new(
        symbol: impl Into<String>,
        date: NaiveDate,
        expiration: NaiveDate,
        strike: impl Into<String>,
        side: OptionSide,
    ) -> Self {
        Self {
            date,
            symbol: symbol.into(),
            expiration,
            strike: strike.into(),
            side,
            bid: String::new(),
            ask: String::new(),
            volume: String::new(),
            delta: String::new(),
            gamma: String::new(),
            theta: String::new(),
            vega: String::new(),
            rho: String::new(),
        }
    }

    /// Numeric strike
    pub fn strike_value(&self) -> ChainResult<f64> {
        parse_decimal(&self.strike).ok_or_else(|| ChainError::InvalidStrikeFormat {
            symbol: self.symbol.clone(),
            expiration: self.expiration,
            strike: self.strike.clone(),
        })
    }

    pub fn is_call(&self) -> bool {
        self.side == OptionSide::Call
    }

    pub fn is_put(&self) -> bool {
        self.side == OptionSide::Put
    }
}

/// Parse a decimal column. Blank, malformed and non-finite text yield `None`.
pub fn parse_decimal(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Column description from the query result schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaColumn {
    #[serde(rename = "columnName")]
    pub column_name: String,
    #[serde(rename = "columnType")]
    pub column_type: String,
}

/// Query result wrapper the rows are delivered in
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionChainData {
    #[serde(default)]
    pub query_execution_status: String,
    #[serde(default)]
    pub query_execution_message: String,
    #[serde(default)]
    pub repository_owner: String,
    #[serde(default)]
    pub repository_name: String,
    #[serde(default)]
    pub commit_ref: String,
    #[serde(default)]
    pub sql_query: String,
    #[serde(default)]
    pub schema: Vec<SchemaColumn>,
    pub rows: Vec<OptionRow>,
}

impl OptionChainData {
    pub fn from_rows(rows: Vec<OptionRow>) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }
}

impl From<OptionChainData> for Vec<OptionRow> {
    fn from(data: OptionChainData) -> Self {
        data.rows
    }
}
