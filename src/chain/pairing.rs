//! Call/put pairing
//!
//! Turns a filtered row sequence into two-sided display pairs. Grouped mode
//! collects rows by contract identity and validates each group; positional
//! mode reads the sequence as alternating call/put legs.

use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::config::{PairingMode, UnmatchedPolicy};
use super::Diagnostics;
use crate::core::{ChainError, ChainResult, OptionRow, OptionSide};

/// Identity of a displayed pair, taken from its call leg
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    pub symbol: String,
    pub date: NaiveDate,
    pub expiration: NaiveDate,
    pub strike: String,
}

impl PairKey {
    pub fn of(row: &OptionRow) -> Self {
        Self {
            symbol: row.symbol.clone(),
            date: row.date,
            expiration: row.expiration,
            strike: row.strike.trim().to_string(),
        }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}_{}", self.symbol, self.date, self.expiration, self.strike)
    }
}

/// A call leg and a put leg shown on one line
#[derive(Debug, Clone, PartialEq)]
pub struct OptionPair<'a> {
    pub key: PairKey,
    pub call: &'a OptionRow,
    pub put: &'a OptionRow,
    /// Call strike below the reference price
    pub call_in_the_money: bool,
    /// Put strike above the reference price
    pub put_in_the_money: bool,
}

impl<'a> OptionPair<'a> {
    fn new(key: PairKey, call: &'a OptionRow, put: &'a OptionRow) -> Self {
        Self {
            key,
            call,
            put,
            call_in_the_money: false,
            put_in_the_money: false,
        }
    }

    pub fn leg(&self, side: OptionSide) -> &'a OptionRow {
        match side {
            OptionSide::Call => self.call,
            OptionSide::Put => self.put,
        }
    }
}

/// Pairs plus whatever was dropped on the way
#[derive(Debug, Default)]
pub struct PairingOutcome<'a> {
    pub pairs: Vec<OptionPair<'a>>,
    pub diagnostics: Vec<ChainError>,
}

/// Pair rows according to `mode`. Under `UnmatchedPolicy::Reject` the first
/// malformed group or leftover row is returned as the error.
pub fn pair_rows<'a>(
    rows: &[&'a OptionRow],
    mode: PairingMode,
    policy: UnmatchedPolicy,
) -> ChainResult<PairingOutcome<'a>> {
    let mut diagnostics = Diagnostics::new(policy);
    let pairs = pair_rows_with(rows, mode, &mut diagnostics)?;

    Ok(PairingOutcome {
        pairs,
        diagnostics: diagnostics.into_inner(),
    })
}

/// Pair rows, reporting issues into a caller-owned sink.
pub fn pair_rows_with<'a>(
    rows: &[&'a OptionRow],
    mode: PairingMode,
    diagnostics: &mut Diagnostics,
) -> ChainResult<Vec<OptionPair<'a>>> {
    match mode {
        PairingMode::Grouped => pair_grouped(rows, diagnostics),
        PairingMode::Positional => pair_positional(rows, diagnostics),
    }
}

fn unpaired(row: &OptionRow) -> ChainError {
    ChainError::UnpairedRow {
        symbol: row.symbol.clone(),
        expiration: row.expiration,
        strike: row.strike.clone(),
        side: row.side,
    }
}

fn pair_grouped<'a>(
    rows: &[&'a OptionRow],
    diagnostics: &mut Diagnostics,
) -> ChainResult<Vec<OptionPair<'a>>> {
    let mut groups: Vec<(PairKey, Vec<&'a OptionRow>)> = Vec::new();
    let mut index: HashMap<PairKey, usize> = HashMap::new();

    for &row in rows {
        let key = PairKey::of(row);
        match index.get(&key) {
            Some(&i) => groups[i].1.push(row),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![row]));
            }
        }
    }

    let mut pairs = Vec::with_capacity(groups.len());
    for (key, members) in groups {
        let calls: Vec<&OptionRow> = members.iter().copied().filter(|r| r.is_call()).collect();
        let puts: Vec<&OptionRow> = members.iter().copied().filter(|r| r.is_put()).collect();

        match (calls.first(), puts.first()) {
            (Some(&call), Some(&put)) => {
                for _extra in calls.iter().skip(1).chain(puts.iter().skip(1)) {
                    diagnostics.report(ChainError::DuplicatePairKey { key: key.to_string() })?;
                }
                pairs.push(OptionPair::new(key, call, put));
            }
            _ => {
                for row in members {
                    diagnostics.report(unpaired(row))?;
                }
            }
        }
    }

    Ok(pairs)
}

fn pair_positional<'a>(
    rows: &[&'a OptionRow],
    diagnostics: &mut Diagnostics,
) -> ChainResult<Vec<OptionPair<'a>>> {
    let mut seen = HashSet::new();
    let mut pairs = Vec::with_capacity(rows.len() / 2);

    for chunk in rows.chunks(2) {
        match *chunk {
            [call, put] => {
                let key = PairKey::of(call);
                if !seen.insert(key.clone()) {
                    diagnostics.report(ChainError::DuplicatePairKey { key: key.to_string() })?;
                    continue;
                }
                pairs.push(OptionPair::new(key, call, put));
            }
            [odd] => diagnostics.report(unpaired(odd))?,
            _ => {}
        }
    }

    Ok(pairs)
}
