//! Error types for the options chain table

use chrono::NaiveDate;
use thiserror::Error;

use super::row::OptionSide;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("Unpaired {side} row: {symbol} {expiration} strike {strike}")]
    UnpairedRow {
        symbol: String,
        expiration: NaiveDate,
        strike: String,
        side: OptionSide,
    },

    #[error("Invalid strike format for {symbol} {expiration}: {strike:?}")]
    InvalidStrikeFormat {
        symbol: String,
        expiration: NaiveDate,
        strike: String,
    },

    #[error("Duplicate pair key: {key}")]
    DuplicatePairKey { key: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
}

pub type ChainResult<T> = Result<T, ChainError>;

impl ChainError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// True for the kinds that describe malformed chain shape rather than
    /// a failure of the surrounding plumbing.
    pub fn is_shape_issue(&self) -> bool {
        matches!(
            self,
            Self::UnpairedRow { .. } | Self::InvalidStrikeFormat { .. } | Self::DuplicatePairKey { .. }
        )
    }
}
