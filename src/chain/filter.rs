//! Filter choices and the row filter
//!
//! Symbol and date choices are derived from the rows themselves, in the
//! order they first appear.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::Hash;

use chrono::NaiveDate;

use super::config::StrikeOrder;
use crate::core::{parse_decimal, OptionRow};

fn first_seen<T, I>(values: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

/// Distinct symbols, first occurrence order
pub fn unique_symbols(rows: &[OptionRow]) -> Vec<String> {
    first_seen(rows.iter().map(|row| row.symbol.clone()))
}

/// Distinct trade dates quoted for `symbol`, first occurrence order
pub fn unique_dates(rows: &[OptionRow], symbol: &str) -> Vec<NaiveDate> {
    first_seen(rows.iter().filter(|row| row.symbol == symbol).map(|row| row.date))
}

/// Distinct expirations listed for `symbol`, first occurrence order
pub fn unique_expirations(rows: &[OptionRow], symbol: &str) -> Vec<NaiveDate> {
    first_seen(
        rows.iter()
            .filter(|row| row.symbol == symbol)
            .map(|row| row.expiration),
    )
}

/// Rows for `symbol`, restricted to `date` when one is given.
///
/// Keeps input order and duplicates. No symbol means nothing is shown.
pub fn filter_rows<'a>(
    rows: &'a [OptionRow],
    symbol: Option<&str>,
    date: Option<NaiveDate>,
) -> Vec<&'a OptionRow> {
    let Some(symbol) = symbol else {
        return Vec::new();
    };

    rows.iter()
        .filter(|row| row.symbol == symbol && date.map_or(true, |d| row.date == d))
        .collect()
}

/// Stable sort by numeric strike. Unparseable strikes go last in either direction.
pub fn order_by_strike(rows: &mut [&OptionRow], order: StrikeOrder) {
    let cmp = |a: &&OptionRow, b: &&OptionRow| -> Ordering {
        match (parse_decimal(&a.strike), parse_decimal(&b.strike)) {
            (Some(x), Some(y)) => {
                let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
                if order == StrikeOrder::Descending {
                    ord.reverse()
                } else {
                    ord
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    };

    match order {
        StrikeOrder::AsGiven => {}
        StrikeOrder::Ascending | StrikeOrder::Descending => rows.sort_by(cmp),
    }
}
