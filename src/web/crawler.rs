//! Bounded-breadth web ingestion.

use crate::index::inverted::InvertedIndex;
use crate::sync::{ReadWriteLock, WorkQueue};
use crate::text;
use crate::web::fetch::Fetch;
use crate::web::html;
use ahash::AHashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use url::Url;

/// Crawls outward from a seed URL, feeding each fetched page through the
/// same local-index-then-merge path as the corpus ingester.
///
/// The visited set doubles as the visit limit. It is locked only for
/// the mark-or-skip check and never across a fetch, so slow pages block
/// nothing but their own worker.
pub struct WebCrawler {
    index: Arc<ReadWriteLock<InvertedIndex>>,
    queue: Arc<WorkQueue>,
    fetcher: Box<dyn Fetch>,
    visited: Mutex<AHashSet<Url>>,
    limit: usize,
}

impl WebCrawler {
    /// `limit` caps the number of URLs visited, clamped so the seed
    /// itself always qualifies.
    pub fn new(
        index: Arc<ReadWriteLock<InvertedIndex>>,
        queue: Arc<WorkQueue>,
        fetcher: Box<dyn Fetch>,
        limit: usize,
    ) -> Self {
        Self {
            index,
            queue,
            fetcher,
            visited: Mutex::new(AHashSet::new()),
            limit: limit.max(1),
        }
    }

    fn visited_set(&self) -> MutexGuard<'_, AHashSet<Url>> {
        self.visited.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Crawl from `seed` until the link frontier or the visit limit is
    /// exhausted, then wait for the pool to go quiet.
    pub fn crawl(self: Arc<Self>, seed: Url) {
        let crawler = Arc::clone(&self);
        self.queue.execute(move || crawler.visit(seed));
        self.queue.finish();
    }

    fn visit(self: Arc<Self>, url: Url) {
        {
            let mut visited = self.visited_set();
            if visited.len() >= self.limit || !visited.insert(url.clone()) {
                return;
            }
        }
        let body = match self.fetcher.fetch(&url) {
            Ok(Some(body)) => body,
            Ok(None) => return,
            Err(err) => {
                eprintln!("Unable to fetch {url}: {err:#}");
                return;
            }
        };
        let links = html::extract_links(&url, &body);
        let stems = text::parse(&html::strip_html(&body));
        if !stems.is_empty() {
            let mut local = InvertedIndex::new();
            local.add_all(&stems, url.as_str());
            self.index.write().merge(local);
        }
        for link in links {
            let crawler = Arc::clone(&self);
            self.queue.execute(move || crawler.visit(link));
        }
    }

    /// The URLs marked visited so far, in no particular order.
    pub fn visited(&self) -> Vec<Url> {
        self.visited_set().iter().cloned().collect()
    }
}
