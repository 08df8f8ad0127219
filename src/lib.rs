//! namelink - fast fuzzy name matching for record linkage.
//!
//! Given a large reference corpus and a stream of query strings, finds
//! every reference entry whose Jaro-Winkler similarity to a query meets
//! a threshold. The corpus is indexed once; queries then run against an
//! immutable structure that prunes candidates conservatively before
//! exact scoring, so no true match is ever lost to pruning.
//!
//! # Features
//! - Jaro and Jaro-Winkler similarity with a configurable prefix boost
//! - Build-once reference index with character and length pruning
//! - Parallel batch execution with cancellation and streaming output
//!
//! # Example
//! ```
//! use std::sync::Arc;
//! use namelink::{IndexOptions, MatchConfig, QueryEngine, ReferenceIndex};
//!
//! let index = ReferenceIndex::build(["SMITH", "SMYTH", "JONES"], &IndexOptions::default())?;
//! let config = MatchConfig::default().with_threshold(0.85);
//! let engine = QueryEngine::new(Arc::new(index), config)?;
//!
//! let matches = engine.query("SMITH")?;
//! assert!(matches.iter().any(|m| m.text == "SMITH" && m.score == 1.0));
//! assert!(matches.iter().any(|m| m.text == "SMYTH"));
//! assert!(!matches.iter().any(|m| m.text == "JONES"));
//! # Ok::<(), namelink::Error>(())
//! ```

pub mod algorithms;
pub mod batch;
pub mod config;
pub mod engine;
pub mod error;
pub mod indexing;

pub use algorithms::{jaro_similarity, jaro_winkler_similarity, Jaro, JaroWinkler, Similarity};
pub use batch::{BatchCoordinator, BatchOutcome, CancellationToken};
pub use config::{IndexOptions, MatchConfig};
pub use engine::{MatchRecord, QueryEngine};
pub use error::{Error, Result};
pub use indexing::{IndexEntry, ReferenceIndex};
