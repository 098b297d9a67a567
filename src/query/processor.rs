//! The query processor.
//!
//! Each raw query line is normalised to a canonical key (sorted unique
//! stems, space-joined) and the ranked results are memoised per key,
//! once per mode; an exact hit says nothing about a prefix hit.
//! The memo has its own mutex, separate from the index lock, and the
//! ordering rule is fixed: take the index read lock, search, release it,
//! then take the memo mutex to store. Two racing misses may both search;
//! the second store is a benign overwrite of an identical list.

use crate::index::inverted::{InvertedIndex, SearchResult};
use crate::sync::{ReadWriteLock, WorkQueue};
use crate::text;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Memo = BTreeMap<String, Vec<SearchResult>>;

/// Runs query lines against the shared index, memoising result lists
/// per canonical query key.
pub struct QueryProcessor {
    index: Arc<ReadWriteLock<InvertedIndex>>,
    exact: Mutex<Memo>,
    partial: Mutex<Memo>,
    /// Memo misses, i.e. searches that actually hit the index.
    searches: AtomicUsize,
}

impl QueryProcessor {
    pub fn new(index: Arc<ReadWriteLock<InvertedIndex>>) -> Self {
        Self {
            index,
            exact: Mutex::new(Memo::new()),
            partial: Mutex::new(Memo::new()),
            searches: AtomicUsize::new(0),
        }
    }

    fn memo(&self, partial: bool) -> MutexGuard<'_, Memo> {
        let memo = if partial { &self.partial } else { &self.exact };
        memo.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Process one raw query line, consulting the memo first. Lines with
    /// no searchable stems return an empty list and leave no memo entry.
    pub fn process_line(&self, line: &str, partial: bool) -> Vec<SearchResult> {
        let stems = text::unique_stems(line);
        if stems.is_empty() {
            return Vec::new();
        }
        let key = text::query_key(&stems);
        if let Some(results) = self.memo(partial).get(&key) {
            return results.clone();
        }
        let results = {
            let index = self.index.read();
            self.searches.fetch_add(1, Ordering::Relaxed);
            index.search(&stems, partial)
        };
        self.memo(partial).insert(key, results.clone());
        results
    }

    /// Feed a query file through the processor: one pool task per
    /// non-blank raw line when a pool is given, inline otherwise.
    /// Returns once every line has been processed.
    pub fn process_file(
        self: Arc<Self>,
        path: &Path,
        partial: bool,
        pool: Option<&WorkQueue>,
    ) -> Result<()> {
        let file =
            File::open(path).with_context(|| format!("unable to open {}", path.display()))?;
        let reader = BufReader::new(file);
        for line in reader.lines() {
            let line = line.with_context(|| format!("unable to read {}", path.display()))?;
            if line.trim().is_empty() {
                continue;
            }
            match pool {
                Some(pool) => {
                    let processor = Arc::clone(&self);
                    pool.execute(move || {
                        processor.process_line(&line, partial);
                    });
                }
                None => {
                    self.process_line(&line, partial);
                }
            }
        }
        if let Some(pool) = pool {
            pool.finish();
        }
        Ok(())
    }

    /// Snapshot of the memo for one mode, in query-key order.
    pub fn results(&self, partial: bool) -> BTreeMap<String, Vec<SearchResult>> {
        self.memo(partial).clone()
    }

    /// How many lines searched the index instead of hitting the memo.
    pub fn searches(&self) -> usize {
        self.searches.load(Ordering::Relaxed)
    }
}
