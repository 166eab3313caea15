//! Call/put row actions
//!
//! Each displayed pair has a call trigger and a put trigger. A trigger hands
//! the event and the leg's row to a [`RowActionHandler`]; without one the
//! row is logged.

use serde::{Deserialize, Serialize};

use crate::chain::PairKey;
use crate::core::{OptionRow, OptionSide};

/// Tracing target of the default action
pub const ACTION_LOG_TARGET: &str = "options_chain::actions";

/// What was triggered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEvent {
    /// Which leg's trigger fired
    pub side: OptionSide,
    /// Pair the trigger belongs to
    pub key: PairKey,
    /// Button text at the time of the trigger
    pub label: String,
}

/// Receiver of row actions
pub trait RowActionHandler {
    fn handle(&self, event: &ActionEvent, row: &OptionRow);
}

impl<F> RowActionHandler for F
where
    F: Fn(&ActionEvent, &OptionRow),
{
    fn handle(&self, event: &ActionEvent, row: &OptionRow) {
        self(event, row)
    }
}

/// Default action: log the row
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAction;

impl RowActionHandler for LogAction {
    fn handle(&self, event: &ActionEvent, row: &OptionRow) {
        tracing::info!(
            target: ACTION_LOG_TARGET,
            "{} action on {}: {:?}",
            event.side,
            event.key,
            row
        );
    }
}
