//! Corpus ingestion.
//!
//! Walks a corpus root in deterministic lexicographic order and indexes
//! every `.txt`/`.text` file. Each file is stemmed into a fresh local
//! index with no locking at all; the shared index is only written during
//! the merge, which keeps the exclusive section short when files are
//! processed in parallel.

use crate::index::inverted::InvertedIndex;
use crate::sync::{ReadWriteLock, WorkQueue};
use crate::text;
use anyhow::{ensure, Result};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Builds the shared index from a corpus root, either inline or by
/// fanning one task per file out to a work queue.
pub struct CorpusBuilder {
    index: Arc<ReadWriteLock<InvertedIndex>>,
}

impl CorpusBuilder {
    pub fn new(index: Arc<ReadWriteLock<InvertedIndex>>) -> Self {
        Self { index }
    }

    /// Index every text file under `root` on the calling thread.
    pub fn build(&self, root: &Path) -> Result<()> {
        for path in text_files(root)? {
            match index_file(&path) {
                Ok(local) => self.index.write().merge(local),
                Err(err) => eprintln!("Unable to index {}: {err:#}", path.display()),
            }
        }
        Ok(())
    }

    /// Index every text file under `root`, one task per file, and wait
    /// for the pool to go quiet before returning.
    pub fn build_with(&self, root: &Path, pool: &WorkQueue) -> Result<()> {
        for path in text_files(root)? {
            let index = Arc::clone(&self.index);
            pool.execute(move || match index_file(&path) {
                Ok(local) => index.write().merge(local),
                Err(err) => eprintln!("Unable to index {}: {err:#}", path.display()),
            });
        }
        pool.finish();
        Ok(())
    }
}

/// Stem a single file into a fresh, unshared index keyed by the path as
/// given. The caller merges the result into the shared index.
pub fn index_file(path: &Path) -> Result<InvertedIndex> {
    let stems = text::stem_file(path)?;
    let mut local = InvertedIndex::new();
    local.add_all(&stems, &path.to_string_lossy());
    Ok(local)
}

/// Collect the `.txt`/`.text` files under `root` in deterministic
/// lexicographic order. `root` may itself be a single file. Symlinks are
/// followed (the walker detects cycles) and no ignore-file filtering
/// applies to a corpus.
pub fn text_files(root: &Path) -> Result<Vec<PathBuf>> {
    ensure!(root.exists(), "no such path: {}", root.display());
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(true)
        .sort_by_file_path(|a, b| a.cmp(b))
        .build();
    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                eprintln!("Unable to walk {}: {err}", root.display());
                continue;
            }
        };
        let is_file = entry.file_type().is_some_and(|kind| kind.is_file());
        if is_file && text::is_text_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
