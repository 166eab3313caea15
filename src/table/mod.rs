//! OptionsChainTable - selection state over a static row set
//!
//! Holds the rows, the user's current selection and the action handlers.
//! Every [`OptionsChainTable::view`] recomputes the displayed pairs from
//! scratch; nothing derived is stored.

mod actions;

pub use actions::*;

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::chain::{
    filter_rows, shape_chain_with, unique_dates, unique_expirations, unique_symbols, ChainConfig,
    Diagnostics, OptionPair, PairKey,
};
use crate::core::{ChainError, ChainResult, OptionRow, OptionSide};

/// Row layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Call and put legs on one line
    #[default]
    Unified,
    /// Selectable, currently laid out the same as `Unified`
    Split,
}

/// Current user selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub symbol: Option<String>,
    /// Trade date filter; `None` shows every date
    pub date: Option<NaiveDate>,
    pub layout: Layout,
    /// Price the moneyness flags are computed against
    pub reference_price: Option<f64>,
}

/// The pairs to show for the current selection
#[derive(Debug)]
pub struct ChainView<'a> {
    pub selection: Selection,
    pub pairs: Vec<OptionPair<'a>>,
    /// Issues dropped under `UnmatchedPolicy::Warn`
    pub diagnostics: Vec<ChainError>,
}

impl<'a> ChainView<'a> {
    pub fn find(&self, key: &PairKey) -> Option<&OptionPair<'a>> {
        self.pairs.iter().find(|pair| &pair.key == key)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Options chain table
pub struct OptionsChainTable {
    rows: Vec<OptionRow>,
    selection: Selection,
    config: ChainConfig,
    call_action: Box<dyn RowActionHandler>,
    put_action: Box<dyn RowActionHandler>,
}

impl fmt::Debug for OptionsChainTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionsChainTable")
            .field("rows", &self.rows.len())
            .field("selection", &self.selection)
            .field("config", &self.config)
            .finish()
    }
}

impl OptionsChainTable {
    /// Table over `rows` (a row list or an `OptionChainData`) with default configuration
    pub fn new(rows: impl Into<Vec<OptionRow>>) -> Self {
        Self::with_config(rows, ChainConfig::default())
    }

    pub fn with_config(rows: impl Into<Vec<OptionRow>>, config: ChainConfig) -> Self {
        Self {
            rows: rows.into(),
            selection: Selection::default(),
            config,
            call_action: Box::new(LogAction),
            put_action: Box::new(LogAction),
        }
    }

    /// Replace the call trigger's handler
    pub fn with_call_action(mut self, handler: impl RowActionHandler + 'static) -> Self {
        self.call_action = Box::new(handler);
        self
    }

    /// Replace the put trigger's handler
    pub fn with_put_action(mut self, handler: impl RowActionHandler + 'static) -> Self {
        self.put_action = Box::new(handler);
        self
    }

    pub fn with_labels(mut self, call: impl Into<String>, put: impl Into<String>) -> Self {
        self.config.call_label = call.into();
        self.config.put_label = put.into();
        self
    }

    pub fn rows(&self) -> &[OptionRow] {
        &self.rows
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn call_label(&self) -> &str {
        &self.config.call_label
    }

    pub fn put_label(&self) -> &str {
        &self.config.put_label
    }

    /// Symbol choices
    pub fn symbols(&self) -> Vec<String> {
        unique_symbols(&self.rows)
    }

    /// Date choices for the selected symbol
    pub fn dates(&self) -> Vec<NaiveDate> {
        match &self.selection.symbol {
            Some(symbol) => unique_dates(&self.rows, symbol),
            None => Vec::new(),
        }
    }

    /// Expirations listed for the selected symbol
    pub fn expirations(&self) -> Vec<NaiveDate> {
        match &self.selection.symbol {
            Some(symbol) => unique_expirations(&self.rows, symbol),
            None => Vec::new(),
        }
    }

    /// Select a symbol; `None` or an empty string clears the selection.
    /// The date filter is left as is.
    pub fn select_symbol(&mut self, symbol: Option<&str>) {
        self.selection.symbol = symbol.filter(|s| !s.is_empty()).map(str::to_string);
        tracing::debug!("Selected symbol {:?}", self.selection.symbol);
    }

    pub fn select_date(&mut self, date: Option<NaiveDate>) {
        self.selection.date = date;
        tracing::debug!("Selected date {:?}", date);
    }

    pub fn select_layout(&mut self, layout: Layout) {
        self.selection.layout = layout;
    }

    pub fn set_reference_price(&mut self, price: Option<f64>) {
        self.selection.reference_price = price;
    }

    /// Take the latest ticker price as the reference price
    pub fn sync_reference_price(&mut self, rx: &mut watch::Receiver<f64>) {
        let price = *rx.borrow_and_update();
        self.set_reference_price(Some(price));
    }

    /// Rows matching the selection, in input order
    pub fn filtered_rows(&self) -> Vec<&OptionRow> {
        filter_rows(
            &self.rows,
            self.selection.symbol.as_deref(),
            self.selection.date,
        )
    }

    /// Compute the pairs for the current selection
    pub fn view(&self) -> ChainResult<ChainView<'_>> {
        self.view_with(Diagnostics::new(self.config.unmatched))
    }

    fn view_with(&self, mut diagnostics: Diagnostics) -> ChainResult<ChainView<'_>> {
        let filtered = self.filtered_rows();
        let pairs = shape_chain_with(
            &filtered,
            self.selection.reference_price,
            &self.config,
            &mut diagnostics,
        )?;

        Ok(ChainView {
            selection: self.selection.clone(),
            pairs,
            diagnostics: diagnostics.into_inner(),
        })
    }

    /// Fire the call or put trigger of the visible pair `key`.
    ///
    /// Dropped rows were already logged by `view`, so they are not logged again here.
    pub fn trigger(&self, key: &PairKey, side: OptionSide) -> ChainResult<()> {
        let view = self.view_with(Diagnostics::quiet(self.config.unmatched))?;
        let pair = view
            .find(key)
            .ok_or_else(|| ChainError::invalid_input(format!("no visible pair {}", key)))?;

        let (handler, label) = match side {
            OptionSide::Call => (&self.call_action, self.call_label()),
            OptionSide::Put => (&self.put_action, self.put_label()),
        };
        let event = ActionEvent {
            side,
            key: key.clone(),
            label: label.to_string(),
        };
        handler.handle(&event, pair.leg(side));
        Ok(())
    }

    pub fn trigger_call(&self, key: &PairKey) -> ChainResult<()> {
        self.trigger(key, OptionSide::Call)
    }

    pub fn trigger_put(&self, key: &PairKey) -> ChainResult<()> {
        self.trigger(key, OptionSide::Put)
    }
}
