//! Options chain shaping
//!
//! Turns flat quote rows into the two-sided rows an options chain shows.
//!
//! Pipeline:
//! 1. **Filter**: keep the selected symbol (and trade date, if one is chosen)
//! 2. **Order**: stable sort by strike
//! 3. **Pair**: group call and put legs of the same contract line
//! 4. **Rank**: call-ITM first, put-ITM last, against a reference price

mod config;
mod filter;
mod pairing;
mod ranking;

pub use config::*;
pub use filter::*;
pub use pairing::*;
pub use ranking::*;

use crate::core::{ChainError, ChainResult, OptionRow};

/// Collects shape issues under a policy: logged and kept for `Warn`,
/// returned as the error for `Reject`. Anything that is not a shape issue
/// is always returned as the error.
#[derive(Debug)]
pub struct Diagnostics {
    policy: UnmatchedPolicy,
    logging: bool,
    issues: Vec<ChainError>,
}

impl Diagnostics {
    pub fn new(policy: UnmatchedPolicy) -> Self {
        Self {
            policy,
            logging: true,
            issues: Vec::new(),
        }
    }

    /// Same policy, but kept issues are not logged
    pub fn quiet(policy: UnmatchedPolicy) -> Self {
        Self {
            logging: false,
            ..Self::new(policy)
        }
    }

    pub fn report(&mut self, issue: ChainError) -> ChainResult<()> {
        if !issue.is_shape_issue() {
            return Err(issue);
        }

        match self.policy {
            UnmatchedPolicy::Reject => Err(issue),
            UnmatchedPolicy::Warn => {
                if self.logging {
                    tracing::warn!("{}", issue);
                }
                self.issues.push(issue);
                Ok(())
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn into_inner(self) -> Vec<ChainError> {
        self.issues
    }
}

/// Order, pair, classify and rank already-filtered rows.
pub fn shape_chain<'a>(
    rows: &[&'a OptionRow],
    reference: Option<f64>,
    config: &ChainConfig,
) -> ChainResult<PairingOutcome<'a>> {
    let mut diagnostics = Diagnostics::new(config.unmatched);
    let pairs = shape_chain_with(rows, reference, config, &mut diagnostics)?;

    Ok(PairingOutcome {
        pairs,
        diagnostics: diagnostics.into_inner(),
    })
}

/// [`shape_chain`] reporting into a caller-owned sink. The sink's policy
/// applies, `config.unmatched` is not consulted.
pub fn shape_chain_with<'a>(
    rows: &[&'a OptionRow],
    reference: Option<f64>,
    config: &ChainConfig,
    diagnostics: &mut Diagnostics,
) -> ChainResult<Vec<OptionPair<'a>>> {
    let mut ordered = rows.to_vec();
    order_by_strike(&mut ordered, config.strike_order);

    let mut pairs = pair_rows_with(&ordered, config.pairing, diagnostics)?;
    classify(&mut pairs, reference, diagnostics)?;
    rank(&mut pairs);

    tracing::debug!(
        "Shaped {} rows into {} pairs ({} issues)",
        rows.len(),
        pairs.len(),
        diagnostics.len()
    );

    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OptionSide;
    use chrono::NaiveDate;

    fn row(strike: &str, side: OptionSide) -> OptionRow {
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        OptionRow::new("AAPL", day(2), day(19), strike, side)
    }

    #[test]
    fn test_shape_chain_sorts_then_ranks() {
        let rows = vec![
            row("170", OptionSide::Call),
            row("170", OptionSide::Put),
            row("175", OptionSide::Call),
            row("175", OptionSide::Put),
            row("180", OptionSide::Call),
            row("180", OptionSide::Put),
        ];
        let refs: Vec<&OptionRow> = rows.iter().collect();

        let unranked = shape_chain(&refs, None, &ChainConfig::default()).unwrap();
        let strikes: Vec<&str> = unranked.pairs.iter().map(|p| p.key.strike.as_str()).collect();
        assert_eq!(strikes, vec!["180", "175", "170"]);

        let ranked = shape_chain(&refs, Some(174.6), &ChainConfig::default()).unwrap();
        let strikes: Vec<&str> = ranked.pairs.iter().map(|p| p.key.strike.as_str()).collect();
        assert_eq!(strikes, vec!["170", "180", "175"]);
        assert!(ranked.diagnostics.is_empty());
    }

    #[test]
    fn test_legacy_positional_on_sorted_rows() {
        // Put listed before call at the same strike stays in that order after
        // the stable strike sort, so positional pairing takes the put as call leg.
        let rows = vec![
            row("180", OptionSide::Put),
            row("180", OptionSide::Call),
            row("170", OptionSide::Call),
        ];
        let refs: Vec<&OptionRow> = rows.iter().collect();

        let outcome = shape_chain(&refs, None, &ChainConfig::legacy()).unwrap();
        assert_eq!(outcome.pairs.len(), 1);
        assert_eq!(outcome.pairs[0].call.side, OptionSide::Put);
        assert_eq!(outcome.diagnostics.len(), 1);

        let grouped = shape_chain(&refs, None, &ChainConfig::default()).unwrap();
        assert_eq!(grouped.pairs.len(), 1);
        assert_eq!(grouped.pairs[0].call.side, OptionSide::Call);
        assert_eq!(grouped.diagnostics.len(), 1);

        assert!(shape_chain(&refs, None, &ChainConfig::strict()).is_err());
    }

    #[test]
    fn test_diagnostics_policy() {
        let mut warn = Diagnostics::new(UnmatchedPolicy::Warn);
        assert!(warn.report(ChainError::DuplicatePairKey { key: "k".into() }).is_ok());
        assert!(!warn.is_empty());

        let mut reject = Diagnostics::new(UnmatchedPolicy::Reject);
        assert!(reject.report(ChainError::DuplicatePairKey { key: "k".into() }).is_err());
        assert!(reject.is_empty());
    }

    #[test]
    fn test_diagnostics_propagates_plumbing_errors() {
        let mut warn = Diagnostics::new(UnmatchedPolicy::Warn);
        let err = warn.report(ChainError::invalid_input("bad row set")).unwrap_err();
        assert!(matches!(err, ChainError::InvalidInput(_)));
        assert!(warn.is_empty());

        let mut quiet = Diagnostics::quiet(UnmatchedPolicy::Warn);
        assert!(quiet.report(ChainError::invalid_input("bad row set")).is_err());
        assert!(quiet.report(ChainError::DuplicatePairKey { key: "k".into() }).is_ok());
        assert_eq!(quiet.len(), 1);
    }

    #[test]
    fn test_shape_chain_with_shared_sink() {
        let rows = vec![
            row("180", OptionSide::Call),
            row("180", OptionSide::Put),
            row("bad", OptionSide::Call),
            row("bad", OptionSide::Put),
            row("175", OptionSide::Call),
        ];
        let refs: Vec<&OptionRow> = rows.iter().collect();

        let mut diagnostics = Diagnostics::quiet(UnmatchedPolicy::Warn);
        let pairs = shape_chain_with(&refs, Some(190.0), &ChainConfig::default(), &mut diagnostics).unwrap();
        assert_eq!(pairs.len(), 2);
        // one unpaired 175 call, two invalid strikes on the "bad" pair
        assert_eq!(diagnostics.len(), 3);

        let outcome = shape_chain(&refs, Some(190.0), &ChainConfig::default()).unwrap();
        assert_eq!(outcome.pairs, pairs);
        assert_eq!(outcome.diagnostics.len(), 3);
    }
}
