//! The positional inverted index.
//!
//! `InvertedIndex` keeps two ordered maps: `postings` (term → location →
//! positions) and `lengths` (location → token count). Iteration order is
//! the natural key order and is part of the external contract: the JSON
//! emitter walks these maps directly, so the ordering here decides output
//! bytes. The type knows nothing about threads; shared use goes through
//! [`crate::sync::ReadWriteLock`].

use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

/// Positional inverted index with per-location token counts.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct InvertedIndex {
    /// term → location → 1-based positions of the term in that location
    postings: BTreeMap<String, BTreeMap<String, BTreeSet<u32>>>,
    /// location → total token count observed when the location was indexed
    lengths: BTreeMap<String, usize>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one position for a stem at a location. Does not touch the
    /// length table; callers indexing a whole document use [`add_all`].
    ///
    /// [`add_all`]: InvertedIndex::add_all
    pub fn add(&mut self, stem: &str, location: &str, position: u32) {
        self.postings
            .entry(stem.to_string())
            .or_default()
            .entry(location.to_string())
            .or_default()
            .insert(position);
    }

    /// Index a whole document: record its token count, then add every
    /// stem with its 1-based position. An empty stem list leaves the
    /// index untouched.
    pub fn add_all(&mut self, stems: &[String], location: &str) {
        if stems.is_empty() {
            return;
        }
        self.lengths.insert(location.to_string(), stems.len());
        for (i, stem) in stems.iter().enumerate() {
            self.add(stem, location, (i + 1) as u32);
        }
    }

    /// Fold another index into this one. Position sets are unioned. A
    /// location length is taken from `other` when absent here; when both
    /// sides carry one, the larger value wins. Two shards carrying
    /// different lengths for one location means the same document was
    /// indexed twice, which is worth a warning.
    pub fn merge(&mut self, other: InvertedIndex) {
        for (stem, locations) in other.postings {
            match self.postings.entry(stem) {
                Entry::Vacant(slot) => {
                    slot.insert(locations);
                }
                Entry::Occupied(mut slot) => {
                    let ours = slot.get_mut();
                    for (location, positions) in locations {
                        ours.entry(location).or_default().extend(positions);
                    }
                }
            }
        }
        for (location, length) in other.lengths {
            match self.lengths.entry(location) {
                Entry::Vacant(slot) => {
                    slot.insert(length);
                }
                Entry::Occupied(mut slot) => {
                    if *slot.get() != length {
                        eprintln!(
                            "warning: conflicting token counts for {} ({} vs {}); keeping the larger",
                            slot.key(),
                            slot.get(),
                            length
                        );
                        if length > *slot.get() {
                            *slot.get_mut() = length;
                        }
                    }
                }
            }
        }
    }

    pub fn contains_stem(&self, stem: &str) -> bool {
        self.postings.contains_key(stem)
    }

    pub fn contains_location(&self, stem: &str, location: &str) -> bool {
        self.postings
            .get(stem)
            .is_some_and(|locations| locations.contains_key(location))
    }

    pub fn contains_position(&self, stem: &str, location: &str, position: u32) -> bool {
        self.postings
            .get(stem)
            .and_then(|locations| locations.get(location))
            .is_some_and(|positions| positions.contains(&position))
    }

    pub fn contains_count(&self, location: &str) -> bool {
        self.lengths.contains_key(location)
    }

    /// Number of distinct stems in the index.
    pub fn num_stems(&self) -> usize {
        self.postings.len()
    }

    /// Number of locations a stem appears in, zero when absent.
    pub fn num_locations(&self, stem: &str) -> usize {
        self.postings.get(stem).map_or(0, BTreeMap::len)
    }

    /// Number of positions recorded for a stem at a location.
    pub fn num_positions(&self, stem: &str, location: &str) -> usize {
        self.postings
            .get(stem)
            .and_then(|locations| locations.get(location))
            .map_or(0, BTreeSet::len)
    }

    /// Number of locations with a recorded token count.
    pub fn num_counts(&self) -> usize {
        self.lengths.len()
    }

    /// The stems in the index, in key order.
    pub fn stems(&self) -> impl Iterator<Item = &str> {
        self.postings.keys().map(String::as_str)
    }

    /// The locations a stem appears in, in key order.
    pub fn locations<'a>(&'a self, stem: &str) -> impl Iterator<Item = &'a str> {
        self.postings
            .get(stem)
            .into_iter()
            .flat_map(|locations| locations.keys())
            .map(String::as_str)
    }

    /// The positions of a stem at a location, ascending.
    pub fn positions<'a>(&'a self, stem: &str, location: &str) -> impl Iterator<Item = u32> + 'a {
        self.postings
            .get(stem)
            .and_then(|locations| locations.get(location))
            .into_iter()
            .flatten()
            .copied()
    }

    /// The per-location token counts, in location order.
    pub fn counts(&self) -> impl Iterator<Item = (&str, usize)> {
        self.lengths.iter().map(|(location, &count)| (location.as_str(), count))
    }

    /// The token count for one location, if it was ever indexed.
    pub fn count(&self, location: &str) -> Option<usize> {
        self.lengths.get(location).copied()
    }

    /// Empty both maps.
    pub fn clear(&mut self) {
        self.postings.clear();
        self.lengths.clear();
    }

    /// Search for a set of query stems. `partial` widens each stem to
    /// the contiguous run of index terms it prefixes.
    pub fn search(&self, queries: &BTreeSet<String>, partial: bool) -> Vec<SearchResult> {
        if partial {
            self.partial_search(queries)
        } else {
            self.exact_search(queries)
        }
    }

    /// Exact-term search: each query stem contributes the size of its
    /// position set per location.
    pub fn exact_search(&self, queries: &BTreeSet<String>) -> Vec<SearchResult> {
        let mut matches: BTreeMap<&str, usize> = BTreeMap::new();
        for stem in queries {
            if let Some(locations) = self.postings.get(stem) {
                for (location, positions) in locations {
                    *matches.entry(location).or_insert(0) += positions.len();
                }
            }
        }
        self.rank(matches)
    }

    /// Prefix search: every index term starting with a query stem
    /// contributes. Terms sharing a prefix form a contiguous key range,
    /// so this never scans the whole postings map.
    pub fn partial_search(&self, queries: &BTreeSet<String>) -> Vec<SearchResult> {
        let mut matches: BTreeMap<&str, usize> = BTreeMap::new();
        for stem in queries {
            let range = (Bound::Included(stem.as_str()), Bound::Unbounded);
            for (_, locations) in self
                .postings
                .range::<str, _>(range)
                .take_while(|(term, _)| term.starts_with(stem.as_str()))
            {
                for (location, positions) in locations {
                    *matches.entry(location).or_insert(0) += positions.len();
                }
            }
        }
        self.rank(matches)
    }

    fn rank(&self, matches: BTreeMap<&str, usize>) -> Vec<SearchResult> {
        let mut results: Vec<SearchResult> = matches
            .into_iter()
            .map(|(location, count)| {
                // Any posted location has a recorded length; falling back
                // to the match count keeps the score finite regardless.
                let length = self.lengths.get(location).copied().unwrap_or(count);
                SearchResult::new(location.to_string(), count, length)
            })
            .collect();
        results.sort();
        results
    }
}

/// One ranked hit: a location, how many query-term occurrences it holds,
/// and that count normalised by the location's token count.
#[derive(Debug, Clone)]
pub struct SearchResult {
    location: String,
    count: usize,
    score: f64,
}

impl SearchResult {
    /// Build a result row, materialising the score from the location
    /// length captured at construction time.
    pub fn new(location: String, count: usize, length: usize) -> Self {
        let score = count as f64 / length as f64;
        Self { location, count, score }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn score(&self) -> f64 {
        self.score
    }
}

impl Ord for SearchResult {
    /// Larger score first, then larger count, then caseless location
    /// ascending.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.count.cmp(&self.count))
            .then_with(|| caseless_cmp(&self.location, &other.location))
    }
}

impl PartialOrd for SearchResult {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SearchResult {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchResult {}

/// Case-insensitive ordering without allocating lowercased copies.
fn caseless_cmp(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(|c| c.to_lowercase())
        .cmp(b.chars().flat_map(|c| c.to_lowercase()))
}
