//! Web ingestion.
//!
//! - [`fetch`] - the page-fetching collaborator and its HTTP impl
//! - [`html`] - tag stripping and link extraction
//! - [`crawler`] - bounded BFS feeding pages into the shared index

pub mod crawler;
pub mod fetch;
pub mod html;

pub use crawler::WebCrawler;
pub use fetch::{Fetch, HttpFetcher};
