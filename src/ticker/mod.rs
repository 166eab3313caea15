//! Demo reference-price ticker
//!
//! Cycles through a fixed list of prices so in/out-of-the-money highlighting
//! has something to react to. Not a price feed.
//!
//! The stepping logic ([`PriceCycle`]) is plain state; [`PriceTicker`] drives
//! it on a tokio interval until cancelled.

mod task;

pub use task::*;

use crate::chain::DEFAULT_TICKER_PRICES;
use crate::core::{ChainError, ChainResult};

/// Position in a fixed, wrapping price list
#[derive(Debug, Clone, PartialEq)]
pub struct PriceCycle {
    prices: Vec<f64>,
    index: usize,
}

impl PriceCycle {
    pub fn new(prices: Vec<f64>) -> ChainResult<Self> {
        if prices.is_empty() {
            return Err(ChainError::invalid_input("price cycle needs at least one price"));
        }
        Ok(Self { prices, index: 0 })
    }

    /// The built-in eight-price demo cycle
    pub fn demo() -> Self {
        Self {
            prices: DEFAULT_TICKER_PRICES.to_vec(),
            index: 0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn current(&self) -> f64 {
        self.prices[self.index]
    }

    /// Index that follows `index` in a cycle of `len` prices
    pub fn next_index(index: usize, len: usize) -> usize {
        if index + 1 >= len {
            0
        } else {
            index + 1
        }
    }

    /// Step once and return the new current price
    pub fn advance(&mut self) -> f64 {
        self.index = Self::next_index(self.index, self.prices.len());
        self.current()
    }
}

impl Default for PriceCycle {
    fn default() -> Self {
        Self::demo()
    }
}
