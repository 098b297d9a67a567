//! Text normalisation and stemming.
//!
//! Everything that turns raw text into index terms lives here: Unicode
//! decomposition, the alphabetic filter, whitespace splitting, and the
//! Snowball English stemmer. The corpus ingester, the crawler, and the
//! query processor all run the same pipeline, so two inputs that reduce
//! to the same stems always produce the same query key.

use anyhow::{Context, Result};
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

static STEMMER: OnceLock<Stemmer> = OnceLock::new();

fn stemmer() -> &'static Stemmer {
    STEMMER.get_or_init(|| Stemmer::create(Algorithm::English))
}

/// Decompose to NFD, drop everything that is neither alphabetic nor
/// whitespace (digits, punctuation, symbols, detached combining marks),
/// and lowercase what remains.
fn clean(text: &str) -> String {
    text.nfd()
        .filter(|c| c.is_alphabetic() || c.is_whitespace())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

fn push_stems(line: &str, stems: &mut Vec<String>) {
    let cleaned = clean(line);
    for word in cleaned.split_whitespace() {
        stems.push(stemmer().stem(word).into_owned());
    }
}

/// Parse a line into cleaned, stemmed words in document order.
pub fn parse(line: &str) -> Vec<String> {
    let mut stems = Vec::new();
    push_stems(line, &mut stems);
    stems
}

/// Parse a whole file into stems in document order, streaming line by
/// line. A stem's 1-based position is its index in the result plus one.
pub fn stem_file(path: &Path) -> Result<Vec<String>> {
    let file =
        File::open(path).with_context(|| format!("unable to open {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut stems = Vec::new();
    for line in reader.lines() {
        let line = line.with_context(|| format!("unable to read {}", path.display()))?;
        push_stems(&line, &mut stems);
    }
    Ok(stems)
}

/// Parse a line into a sorted set of unique stems.
pub fn unique_stems(line: &str) -> BTreeSet<String> {
    parse(line).into_iter().collect()
}

/// Canonical key for a processed query: the sorted unique stems joined
/// by single spaces. An empty key means the line held nothing searchable.
pub fn query_key(stems: &BTreeSet<String>) -> String {
    stems.iter().map(String::as_str).collect::<Vec<_>>().join(" ")
}

/// True for files the corpus ingester indexes: a case-insensitive
/// `.txt` or `.text` suffix.
pub fn is_text_file(path: &Path) -> bool {
    let name = path.to_string_lossy().to_lowercase();
    name.ends_with(".txt") || name.ends_with(".text")
}
