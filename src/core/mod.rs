//! Core data types for the options chain table
//!
//! Defines fundamental types:
//! - OptionRow: one quote line (symbol, dates, strike, side, quote columns)
//! - OptionChainData: the query result wrapper rows arrive in
//! - ChainError: error kinds shared by every module

pub mod row;
pub mod error;

pub use row::*;
pub use error::*;
