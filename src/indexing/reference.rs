//! Build-once reference index over a name corpus.
//!
//! The index never promises that a retrieved candidate is a match,
//! only that every true match is retrieved; exact scores are always
//! re-checked by the kernel. Two cheap signals prune the space:
//!
//! - per-character posting lists: a pair with any matched character
//!   shares at least one character, so for any positive threshold the
//!   union of the query's posting lists covers every possible match;
//! - cached lengths: with `r = min_len / max_len` and boost budget
//!   `q = prefix_weight * prefix_cap`, no pair can score above
//!   `(2 + r) / 3 + q * (1 - (2 + r) / 3)`, which bounds the window of
//!   entry lengths that can still reach a given threshold.

use ahash::{AHashMap, AHashSet};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::IndexOptions;
use crate::error::{Error, Result};

/// Entries per build shard; each shard produces a partial posting map.
const BUILD_CHUNK: usize = 16 * 1024;

/// A single reference string with its cached character length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub text: String,
    pub len: u32,
}

/// Immutable index over a reference corpus.
///
/// Built exactly once; all query-phase access is read-only, so the
/// index can be shared across threads behind an `Arc` without locking.
/// An entry's identifier is its position in the corpus, and duplicated
/// texts keep their distinct identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceIndex {
    entries: Vec<IndexEntry>,
    /// Character -> ascending ids of entries containing it.
    postings: AHashMap<char, Vec<u32>>,
    max_len: u32,
}

impl ReferenceIndex {
    /// Build an index from a corpus of strings.
    ///
    /// One-shot and deterministic: the corpus is chunked across worker
    /// threads, each builds a partial posting map, and a single-threaded
    /// merge combines the partials in chunk order so posting lists stay
    /// ascending by id. Empty strings are valid, low-value members.
    pub fn build<I, S>(corpus: I, options: &IndexOptions) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        options.validate()?;

        let entries: Vec<IndexEntry> = corpus
            .into_iter()
            .map(|text| {
                let text = text.into();
                let len = text.chars().count() as u32;
                IndexEntry { text, len }
            })
            .collect();

        if entries.len() > u32::MAX as usize {
            return Err(Error::ResourceExhausted(format!(
                "corpus holds {} entries, identifiers are limited to {}",
                entries.len(),
                u32::MAX
            )));
        }
        if let Some(limit) = options.max_corpus_bytes {
            let total: usize = entries.iter().map(|e| e.text.len()).sum();
            if total > limit {
                return Err(Error::ResourceExhausted(format!(
                    "corpus holds {total} bytes, build limit is {limit}"
                )));
            }
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.worker_count)
            .build()
            .map_err(|e| Error::InvalidArgument(format!("failed to start build pool: {e}")))?;

        let partials: Vec<AHashMap<char, Vec<u32>>> = pool.install(|| {
            entries
                .par_chunks(BUILD_CHUNK)
                .enumerate()
                .map(|(chunk_idx, chunk)| {
                    let base = chunk_idx * BUILD_CHUNK;
                    let mut local: AHashMap<char, Vec<u32>> = AHashMap::new();
                    let mut seen: AHashSet<char> = AHashSet::new();
                    for (offset, entry) in chunk.iter().enumerate() {
                        let id = (base + offset) as u32;
                        seen.clear();
                        for c in entry.text.chars() {
                            if seen.insert(c) {
                                local.entry(c).or_default().push(id);
                            }
                        }
                    }
                    local
                })
                .collect()
        });

        // Merge barrier: partials arrive in chunk order, so extending
        // keeps every posting list ascending.
        let mut postings: AHashMap<char, Vec<u32>> = AHashMap::new();
        for partial in partials {
            for (c, ids) in partial {
                postings.entry(c).or_default().extend(ids);
            }
        }

        let max_len = entries.iter().map(|e| e.len).max().unwrap_or(0);
        info!(
            entries = entries.len(),
            distinct_chars = postings.len(),
            "reference index built"
        );

        Ok(Self {
            entries,
            postings,
            max_len,
        })
    }

    /// Build from raw byte records, e.g. straight out of an external
    /// loader. Fails fast with `InvalidInput` on the first entry that
    /// is not valid UTF-8 text; no partial index is returned.
    pub fn build_from_bytes<I, B>(corpus: I, options: &IndexOptions) -> Result<Self>
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let mut texts = Vec::new();
        for (id, raw) in corpus.into_iter().enumerate() {
            let text = std::str::from_utf8(raw.as_ref()).map_err(|e| {
                Error::InvalidInput(format!("corpus entry {id} is not valid UTF-8 text: {e}"))
            })?;
            texts.push(text.to_owned());
        }
        Self::build(texts, options)
    }

    /// Ids of every entry that could reach `threshold` against `query`.
    /// Always a superset of the true matches; ascending order.
    pub fn candidates(
        &self,
        query: &str,
        threshold: f64,
        prefix_weight: f64,
        prefix_cap: usize,
    ) -> Vec<u32> {
        if self.entries.is_empty() {
            return Vec::new();
        }
        // At threshold zero every entry is a match by definition.
        if threshold <= 0.0 {
            return (0..self.entries.len() as u32).collect();
        }

        let query_len = query.chars().count();
        if query_len == 0 {
            return Vec::new();
        }

        let (min_len, max_len) =
            self.admissible_lengths(query_len, threshold, prefix_weight, prefix_cap);

        let mut distinct: AHashSet<char> = AHashSet::new();
        let mut seen: AHashSet<u32> = AHashSet::new();
        let mut out = Vec::new();
        for c in query.chars() {
            if !distinct.insert(c) {
                continue;
            }
            if let Some(ids) = self.postings.get(&c) {
                for &id in ids {
                    let len = self.entries[id as usize].len as usize;
                    if len < min_len || len > max_len {
                        continue;
                    }
                    if seen.insert(id) {
                        out.push(id);
                    }
                }
            }
        }
        out.sort_unstable();
        out
    }

    /// Window of entry lengths that can still reach `threshold`.
    ///
    /// Derived from the score bound, not a fixed heuristic: solves
    /// `(2 + r)/3 + q*(1 - (2 + r)/3) >= t` for the length ratio `r`.
    /// Bounds are rounded outward so floating point error can only
    /// widen the window, never drop a reachable length.
    fn admissible_lengths(
        &self,
        query_len: usize,
        threshold: f64,
        prefix_weight: f64,
        prefix_cap: usize,
    ) -> (usize, usize) {
        let full = (1, self.max_len as usize);
        let q = (prefix_weight * prefix_cap as f64).clamp(0.0, 1.0);
        if q >= 1.0 || threshold <= q {
            return full;
        }
        let jaro_floor = (threshold - q) / (1.0 - q);
        let ratio_floor = 3.0 * jaro_floor - 2.0;
        if ratio_floor <= 0.0 {
            return full;
        }
        let lo = (query_len as f64 * ratio_floor).floor() as usize;
        let hi = (query_len as f64 / ratio_floor).ceil() as usize;
        (lo.max(1), hi.min(self.max_len as usize))
    }

    /// Number of entries in the corpus.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by identifier.
    pub fn get(&self, id: u32) -> Option<&IndexEntry> {
        self.entries.get(id as usize)
    }

    pub(crate) fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }
}
