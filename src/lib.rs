//! # Options Chain - call/put table model
//!
//! The data side of an options chain table: given a static list of quote
//! rows, derive the symbol and date choices, filter to the selection, pair
//! each call with its put and rank the pairs by moneyness.
//!
//! ## Key Components
//!
//! - **Rows**: `OptionRow` as delivered by the upstream query, decimals kept as text
//! - **Chain shaping**: filter, strike ordering, call/put pairing, ranking
//! - **Table**: selection state, computed views, call/put action hooks
//! - **Ticker**: demo reference price cycling on a cancellable tokio task
//!
//! ## Usage
//!
//! ```rust,no_run
//! use options_chain::prelude::*;
//!
//! let rows = load_rows("option_chain.json").unwrap();
//! let mut table = OptionsChainTable::new(rows);
//!
//! table.select_symbol(Some("AAPL"));
//! table.set_reference_price(Some(175.0));
//!
//! for pair in table.view().unwrap().pairs {
//!     println!("{} call ITM: {}", pair.key, pair.call_in_the_money);
//! }
//! ```
//!
//! ## What This Crate Does NOT Do
//!
//! - Render anything (markup, styling, colors)
//! - Fetch or persist market data
//! - Lay out the split view differently from the unified one

pub mod chain;
pub mod core;
pub mod data;
pub mod table;
pub mod ticker;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        parse_decimal, ChainError, ChainResult, OptionChainData, OptionRow, OptionSide,
        SchemaColumn,
    };

    // Chain shaping
    pub use crate::chain::{
        classify, filter_rows, order_by_strike, pair_rows, pair_rows_with, rank, shape_chain,
        shape_chain_with, unique_dates, unique_expirations, unique_symbols, ChainConfig, Diagnostics, OptionPair, PairKey,
        PairingMode, PairingOutcome, StrikeOrder, TickerConfig, UnmatchedPolicy,
    };

    // Data loading
    pub use crate::data::{load_chain_data, load_rows, parse_chain_data, parse_rows};

    // Table
    pub use crate::table::{
        ActionEvent, ChainView, Layout, LogAction, OptionsChainTable, RowActionHandler, Selection,
    };

    // Ticker
    pub use crate::ticker::{PriceCycle, PriceTicker, TickerHandle};
}

// Re-export main types at crate root
pub use crate::core::{ChainError, ChainResult};
pub use crate::table::OptionsChainTable;
