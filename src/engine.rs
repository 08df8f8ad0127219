//! Query engine: candidate retrieval plus exact scoring.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::algorithms::jaro::jaro_winkler_chars;
use crate::config::MatchConfig;
use crate::error::{Error, Result};
use crate::indexing::ReferenceIndex;

/// A reference entry that met the threshold for some query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: u32,
    pub text: String,
    pub score: f64,
}

/// Scores queries against a built [`ReferenceIndex`].
///
/// Holds no mutable state; one engine can serve any number of
/// concurrent queries against the same corpus snapshot.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    index: Arc<ReferenceIndex>,
    config: MatchConfig,
}

impl QueryEngine {
    /// The configuration is validated here, before any query runs.
    pub fn new(index: Arc<ReferenceIndex>, config: MatchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { index, config })
    }

    pub fn index(&self) -> &ReferenceIndex {
        &self.index
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// All reference entries scoring at least the configured threshold.
    ///
    /// The result set is unordered by contract; entries come back in
    /// ascending id order, which keeps repeated queries deterministic.
    /// Duplicated corpus texts produce one record per identifier.
    pub fn query(&self, query: &str) -> Result<Vec<MatchRecord>> {
        self.query_with_threshold(query, self.config.threshold)
    }

    /// Same as [`Self::query`] with a per-call threshold.
    pub fn query_with_threshold(&self, query: &str, threshold: f64) -> Result<Vec<MatchRecord>> {
        validate_threshold(threshold)?;
        // An empty query matches nothing, never everything.
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let query_chars: SmallVec<[char; 32]> = query.chars().collect();
        let candidates = self.index.candidates(
            query,
            threshold,
            self.config.prefix_weight,
            self.config.prefix_cap,
        );
        debug!(
            candidates = candidates.len(),
            corpus = self.index.len(),
            "pruned candidate set"
        );

        let mut matches = Vec::new();
        let mut entry_chars: SmallVec<[char; 32]> = SmallVec::new();
        for id in candidates {
            let Some(entry) = self.index.get(id) else {
                continue;
            };
            entry_chars.clear();
            entry_chars.extend(entry.text.chars());
            let score = jaro_winkler_chars(
                &query_chars,
                &entry_chars,
                self.config.prefix_weight,
                self.config.prefix_cap,
            );
            if score >= threshold {
                matches.push(MatchRecord {
                    id,
                    text: entry.text.clone(),
                    score,
                });
            }
        }
        Ok(matches)
    }

    /// Full-corpus scan with the same kernel and filter.
    ///
    /// Ground truth for the pruned path; also usable when the corpus is
    /// small enough that pruning is not worth the lookup.
    pub fn query_exhaustive(&self, query: &str, threshold: f64) -> Result<Vec<MatchRecord>> {
        validate_threshold(threshold)?;
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let query_chars: SmallVec<[char; 32]> = query.chars().collect();
        let mut matches = Vec::new();
        let mut entry_chars: SmallVec<[char; 32]> = SmallVec::new();
        for (id, entry) in self.index.entries().iter().enumerate() {
            entry_chars.clear();
            entry_chars.extend(entry.text.chars());
            let score = jaro_winkler_chars(
                &query_chars,
                &entry_chars,
                self.config.prefix_weight,
                self.config.prefix_cap,
            );
            if score >= threshold {
                matches.push(MatchRecord {
                    id: id as u32,
                    text: entry.text.clone(),
                    score,
                });
            }
        }
        Ok(matches)
    }
}

fn validate_threshold(threshold: f64) -> Result<()> {
    if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
        return Err(Error::InvalidArgument(format!(
            "threshold must be in [0.0, 1.0], got {threshold}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexOptions;

    fn engine(threshold: f64) -> QueryEngine {
        let corpus = vec!["SMITH", "SMYTH", "JONES", "LEE", "", "LEE", "JOHANSSON"];
        let index = ReferenceIndex::build(corpus, &IndexOptions::default()).unwrap();
        QueryEngine::new(
            Arc::new(index),
            MatchConfig::default().with_threshold(threshold),
        )
        .unwrap()
    }

    #[test]
    fn exact_match_scores_one() {
        let matches = engine(0.85).query("SMITH").unwrap();
        let exact = matches.iter().find(|m| m.text == "SMITH").unwrap();
        assert_eq!(exact.score, 1.0);
    }

    #[test]
    fn near_match_passes_threshold() {
        let matches = engine(0.85).query("SMITH").unwrap();
        let near = matches.iter().find(|m| m.text == "SMYTH").unwrap();
        assert!(near.score >= 0.85);
        assert!(!matches.iter().any(|m| m.text == "JONES"));
    }

    #[test]
    fn empty_query_returns_empty_set() {
        for threshold in [0.0, 0.5, 1.0] {
            assert!(engine(0.8)
                .query_with_threshold("", threshold)
                .unwrap()
                .is_empty());
        }
    }

    #[test]
    fn duplicates_yield_one_record_per_id() {
        let matches = engine(0.9).query("LEE").unwrap();
        let lees: Vec<_> = matches.iter().filter(|m| m.text == "LEE").collect();
        assert_eq!(lees.len(), 2);
        assert_ne!(lees[0].id, lees[1].id);
        assert!(lees.iter().all(|m| m.score == 1.0));
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let engine = engine(0.8);
        assert!(matches!(
            engine.query_with_threshold("SMITH", 1.5),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            engine.query_with_threshold("SMITH", -0.1),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            engine.query_with_threshold("SMITH", f64::NAN),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let index = Arc::new(ReferenceIndex::build(vec!["A"], &IndexOptions::default()).unwrap());
        let result = QueryEngine::new(index, MatchConfig::default().with_threshold(2.0));
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn pruned_equals_exhaustive() {
        let engine = engine(0.8);
        for query in ["SMITH", "LEE", "JOHNSON", "QQQ"] {
            for threshold in [0.0, 0.6, 0.85, 1.0] {
                let pruned = engine.query_with_threshold(query, threshold).unwrap();
                let full = engine.query_exhaustive(query, threshold).unwrap();
                assert_eq!(pruned, full, "mismatch for {query} at {threshold}");
            }
        }
    }
}
