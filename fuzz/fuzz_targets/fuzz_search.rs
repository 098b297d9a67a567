#![no_main]

use libfuzzer_sys::fuzz_target;
use quarry::index::InvertedIndex;

fuzz_target!(|data: &[u8]| {
    // Index the first line, query with the second; neither search mode
    // may panic, and every result row must respect the core invariants.
    if let Ok(text) = std::str::from_utf8(data) {
        let mut lines = text.lines();
        let document = lines.next().unwrap_or("");
        let query = lines.next().unwrap_or("");

        let mut index = InvertedIndex::new();
        index.add_all(&quarry::text::parse(document), "fuzz.txt");
        let stems = quarry::text::unique_stems(query);

        for partial in [false, true] {
            let results = index.search(&stems, partial);
            for row in &results {
                assert!(row.count() >= 1);
                assert!(row.score() > 0.0);
            }
            // Sorted, and at most one row per location.
            assert!(results.windows(2).all(|pair| pair[0] <= pair[1]));
            let mut locations: Vec<&str> = results.iter().map(|r| r.location()).collect();
            locations.sort_unstable();
            locations.dedup();
            assert_eq!(locations.len(), results.len());
        }
    }
});
