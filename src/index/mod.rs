//! The inverted index and its corpus ingester.
//!
//! - [`inverted`] - positional index, ranked exact/prefix search
//! - [`builder`] - deterministic corpus walk feeding per-file local
//!   indexes into a shared one

pub mod builder;
pub mod inverted;

pub use builder::CorpusBuilder;
pub use inverted::{InvertedIndex, SearchResult};
