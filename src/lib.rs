//! # Quarry - Concurrent Text Indexing and Search
//!
//! Quarry builds a positional inverted index over a corpus of plain-text
//! files (and, optionally, crawled web pages) and answers exact or prefix
//! search queries ranked by term frequency normalised by document length.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`text`] - Normalisation and Snowball stemming; one pipeline feeds
//!   both ingestion and queries, which keeps query keys deterministic
//! - [`index`] - The inverted index, ranked search, and the corpus builder
//! - [`sync`] - The writer-preference reader/writer lock and the work
//!   queue the parallel paths run on
//! - [`query`] - Query-file processing with per-mode result memoisation
//! - [`output`] - The pretty JSON emitter (its bytes are an external
//!   contract)
//! - [`web`] - The bounded crawler and its fetcher/HTML collaborators
//!
//! ## Quick Start
//!
//! ```ignore
//! use quarry::index::{CorpusBuilder, InvertedIndex};
//! use quarry::sync::{ReadWriteLock, WorkQueue};
//! use std::sync::Arc;
//!
//! let index = Arc::new(ReadWriteLock::new(InvertedIndex::new()));
//! let pool = WorkQueue::new(8);
//! CorpusBuilder::new(Arc::clone(&index)).build_with("corpus".as_ref(), &pool)?;
//!
//! let results = index.read().search(&quarry::text::unique_stems("hello"), false);
//! ```
//!
//! The index itself knows nothing about threads. Concurrent use always
//! goes through [`sync::ReadWriteLock`], with per-task local indexes
//! merged in under one short write section.

pub mod index;
pub mod output;
pub mod query;
pub mod sync;
pub mod text;
pub mod web;
