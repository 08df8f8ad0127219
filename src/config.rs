//! Configuration for index builds, queries and batch runs.
//!
//! All knobs travel in explicit structs passed to the operation that
//! uses them; there is no process-wide mutable state. Every struct is
//! validated up front, before any work begins.

use crate::error::{Error, Result};

fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(4)
}

/// Configuration shared by the query engine and the batch coordinator.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    /// Minimum similarity a candidate must reach to be reported.
    pub threshold: f64,
    /// Winkler prefix boost factor (standard value 0.1).
    pub prefix_weight: f64,
    /// Maximum common-prefix length eligible for the boost.
    pub prefix_cap: usize,
    /// Worker threads for batch fan-out.
    pub worker_count: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: 0.8,
            prefix_weight: 0.1,
            prefix_cap: 4,
            worker_count: default_worker_count(),
        }
    }
}

impl MatchConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_prefix_weight(mut self, prefix_weight: f64) -> Self {
        self.prefix_weight = prefix_weight;
        self
    }

    #[must_use]
    pub fn with_prefix_cap(mut self, prefix_cap: usize) -> Self {
        self.prefix_cap = prefix_cap;
        self
    }

    #[must_use]
    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    /// Reject out-of-domain values before any work begins.
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(Error::InvalidArgument(format!(
                "threshold must be in [0.0, 1.0], got {}",
                self.threshold
            )));
        }
        if !self.prefix_weight.is_finite() || self.prefix_weight < 0.0 {
            return Err(Error::InvalidArgument(format!(
                "prefix_weight must be a finite non-negative number, got {}",
                self.prefix_weight
            )));
        }
        if self.prefix_cap == 0 {
            return Err(Error::InvalidArgument(
                "prefix_cap must be at least 1".to_string(),
            ));
        }
        // Keeps the boosted score within [0.0, 1.0].
        if self.prefix_cap as f64 * self.prefix_weight > 1.0 {
            return Err(Error::InvalidArgument(format!(
                "prefix_cap * prefix_weight must not exceed 1.0, got {} * {}",
                self.prefix_cap, self.prefix_weight
            )));
        }
        if self.worker_count == 0 {
            return Err(Error::InvalidArgument(
                "worker_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Options for the one-shot index build.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexOptions {
    /// Worker threads for the sharded build phase.
    pub worker_count: usize,
    /// Upper bound on total corpus bytes accepted by a build.
    pub max_corpus_bytes: Option<usize>,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            worker_count: default_worker_count(),
            max_corpus_bytes: None,
        }
    }
}

impl IndexOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    #[must_use]
    pub fn with_max_corpus_bytes(mut self, max_corpus_bytes: usize) -> Self {
        self.max_corpus_bytes = Some(max_corpus_bytes);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.worker_count == 0 {
            return Err(Error::InvalidArgument(
                "worker_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(MatchConfig::default().validate().is_ok());
        assert!(IndexOptions::default().validate().is_ok());
    }

    #[test]
    fn threshold_domain() {
        assert!(MatchConfig::new().with_threshold(0.0).validate().is_ok());
        assert!(MatchConfig::new().with_threshold(1.0).validate().is_ok());
        assert!(MatchConfig::new().with_threshold(-0.1).validate().is_err());
        assert!(MatchConfig::new().with_threshold(1.1).validate().is_err());
        assert!(MatchConfig::new().with_threshold(f64::NAN).validate().is_err());
    }

    #[test]
    fn prefix_boost_domain() {
        assert!(MatchConfig::new().with_prefix_weight(-0.1).validate().is_err());
        assert!(MatchConfig::new().with_prefix_cap(0).validate().is_err());
        // 4 * 0.3 > 1.0 would allow scores above 1.0
        assert!(MatchConfig::new().with_prefix_weight(0.3).validate().is_err());
        assert!(MatchConfig::new()
            .with_prefix_weight(0.25)
            .validate()
            .is_ok());
    }

    #[test]
    fn worker_count_domain() {
        assert!(MatchConfig::new().with_worker_count(0).validate().is_err());
        assert!(IndexOptions::new().with_worker_count(0).validate().is_err());
        assert!(MatchConfig::new().with_worker_count(1).validate().is_ok());
    }
}
