//! Jaro and Jaro-Winkler similarity.
//!
//! The kernel compares Unicode code points and keeps its scratch
//! buffers on the stack for typical name lengths, so it can run inside
//! a tight per-candidate loop without heap allocation.

use smallvec::{smallvec, SmallVec};

use super::Similarity;
use crate::config::MatchConfig;

/// Scratch capacity held inline; longer strings spill to the heap.
const INLINE_CHARS: usize = 32;

type CharBuf = SmallVec<[char; INLINE_CHARS]>;
type FlagBuf = SmallVec<[bool; INLINE_CHARS]>;

/// Jaro similarity over two pre-split character sequences.
///
/// A character in `a` matches one in `b` if they are equal and within
/// `max(|a|, |b|) / 2 - 1` positions of each other (window 0 when that
/// is negative). Two empty sequences compare as identical (1.0); one
/// empty side scores 0.0.
pub fn jaro_chars(a: &[char], b: &[char]) -> f64 {
    let a_len = a.len();
    let b_len = b.len();

    if a_len == 0 && b_len == 0 {
        return 1.0;
    }
    if a_len == 0 || b_len == 0 {
        return 0.0;
    }

    let window = (a_len.max(b_len) / 2).saturating_sub(1);

    let mut a_matched: FlagBuf = smallvec![false; a_len];
    let mut b_matched: FlagBuf = smallvec![false; b_len];

    let mut matches = 0usize;
    for i in 0..a_len {
        let lo = i.saturating_sub(window);
        let hi = (i + window + 1).min(b_len);
        for j in lo..hi {
            if b_matched[j] || a[i] != b[j] {
                continue;
            }
            a_matched[i] = true;
            b_matched[j] = true;
            matches += 1;
            break;
        }
    }

    if matches == 0 {
        return 0.0;
    }

    // Transpositions: half the matched pairs that sit in a different
    // relative order between the two matched subsequences.
    let mut transpositions = 0usize;
    let mut k = 0usize;
    for i in 0..a_len {
        if !a_matched[i] {
            continue;
        }
        while !b_matched[k] {
            k += 1;
        }
        if a[i] != b[k] {
            transpositions += 1;
        }
        k += 1;
    }

    let m = matches as f64;
    let t = (transpositions / 2) as f64;
    (m / a_len as f64 + m / b_len as f64 + (m - t) / m) / 3.0
}

/// Jaro-Winkler over pre-split character sequences.
///
/// `jw = jaro + l * p * (1 - jaro)` where `l` is the common prefix
/// length capped at `prefix_cap` and `p` is `prefix_weight`, clamped so
/// `l * p <= 1` keeps the result within [0.0, 1.0].
pub fn jaro_winkler_chars(a: &[char], b: &[char], prefix_weight: f64, prefix_cap: usize) -> f64 {
    let jaro = jaro_chars(a, b);
    if jaro == 0.0 {
        return 0.0;
    }

    let prefix_weight = prefix_weight.clamp(0.0, 1.0 / prefix_cap.max(1) as f64);
    let prefix_len = a
        .iter()
        .zip(b.iter())
        .take(prefix_cap)
        .take_while(|(x, y)| x == y)
        .count();

    jaro + prefix_len as f64 * prefix_weight * (1.0 - jaro)
}

/// Calculate Jaro similarity between two strings.
/// Returns a value between 0.0 and 1.0.
#[inline]
#[must_use]
pub fn jaro_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    let a_chars: CharBuf = a.chars().collect();
    let b_chars: CharBuf = b.chars().collect();
    jaro_chars(&a_chars, &b_chars)
}

/// Calculate Jaro-Winkler similarity with custom boost parameters.
#[inline]
#[must_use]
pub fn jaro_winkler_similarity_params(
    a: &str,
    b: &str,
    prefix_weight: f64,
    prefix_cap: usize,
) -> f64 {
    if a == b {
        return 1.0;
    }
    let a_chars: CharBuf = a.chars().collect();
    let b_chars: CharBuf = b.chars().collect();
    jaro_winkler_chars(&a_chars, &b_chars, prefix_weight, prefix_cap)
}

/// Calculate Jaro-Winkler similarity with the standard parameters
/// (prefix weight 0.1, prefix cap 4).
#[inline]
#[must_use]
pub fn jaro_winkler_similarity(a: &str, b: &str) -> f64 {
    jaro_winkler_similarity_params(a, b, 0.1, 4)
}

/// Jaro similarity calculator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Jaro;

impl Jaro {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Similarity for Jaro {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        jaro_similarity(a, b)
    }

    fn name(&self) -> &'static str {
        "jaro"
    }
}

/// Jaro-Winkler similarity calculator.
///
/// Extends Jaro similarity by giving extra weight to common prefixes,
/// which suits person names and other short identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct JaroWinkler {
    /// Prefix boost factor (typically 0.1).
    pub prefix_weight: f64,
    /// Maximum prefix length eligible for the boost (typically 4).
    pub prefix_cap: usize,
}

impl Default for JaroWinkler {
    fn default() -> Self {
        Self {
            prefix_weight: 0.1,
            prefix_cap: 4,
        }
    }
}

impl JaroWinkler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the boost parameters from a [`MatchConfig`].
    #[must_use]
    pub fn from_config(config: &MatchConfig) -> Self {
        Self {
            prefix_weight: config.prefix_weight,
            prefix_cap: config.prefix_cap,
        }
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
}

impl Similarity for JaroWinkler {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        jaro_winkler_similarity_params(a, b, self.prefix_weight, self.prefix_cap)
    }

    fn name(&self) -> &'static str {
        "jaro_winkler"
    }
}
