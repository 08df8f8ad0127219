//! Index structures for pruning candidate lookups.

pub mod reference;

pub use reference::{IndexEntry, ReferenceIndex};
