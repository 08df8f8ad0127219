//! String similarity algorithms.
//!
//! Standalone functions for one-off comparisons, plus a trait-based
//! interface so callers can stay generic over the metric.

pub mod jaro;

pub use jaro::{
    jaro_similarity, jaro_winkler_similarity, jaro_winkler_similarity_params, Jaro, JaroWinkler,
};

/// Trait for all similarity metrics.
/// Returns a value between 0.0 (completely different) and 1.0 (identical).
pub trait Similarity: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f64;

    /// Convenience method for distance (1.0 - similarity)
    fn distance(&self, a: &str, b: &str) -> f64 {
        1.0 - self.similarity(a, b)
    }

    /// Name of the algorithm for debugging/logging
    fn name(&self) -> &'static str;
}
