//! Moneyness classification and ranking
//!
//! Call-ITM rows float to the top, put-ITM rows sink to the bottom, and
//! everything else keeps its place.

use super::pairing::OptionPair;
use super::Diagnostics;
use crate::core::{ChainResult, OptionSide};

/// Set the in-the-money flags of every pair against `reference`.
///
/// With no reference price every flag is cleared. A leg whose strike does
/// not parse is never in the money and is reported once per leg.
pub fn classify(
    pairs: &mut [OptionPair<'_>],
    reference: Option<f64>,
    diagnostics: &mut Diagnostics,
) -> ChainResult<()> {
    for pair in pairs.iter_mut() {
        let Some(price) = reference else {
            pair.call_in_the_money = false;
            pair.put_in_the_money = false;
            continue;
        };

        pair.call_in_the_money = match pair.call.strike_value() {
            Ok(strike) => OptionSide::Call.is_itm(strike, price),
            Err(err) => {
                diagnostics.report(err)?;
                false
            }
        };
        pair.put_in_the_money = match pair.put.strike_value() {
            Ok(strike) => OptionSide::Put.is_itm(strike, price),
            Err(err) => {
                diagnostics.report(err)?;
                false
            }
        };
    }
    Ok(())
}

/// Sort position of a pair: call-only, both, neither, put-only.
pub fn rank_key(pair: &OptionPair<'_>) -> (bool, bool) {
    (!pair.call_in_the_money, pair.put_in_the_money)
}

/// Stable sort by [`rank_key`]
pub fn rank(pairs: &mut [OptionPair<'_>]) {
    pairs.sort_by_key(rank_key);
}
