#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The normaliser must be total over arbitrary text and only ever
    // produce non-empty stems.
    if let Ok(text) = std::str::from_utf8(data) {
        for stem in quarry::text::parse(text) {
            assert!(!stem.is_empty());
        }
        let stems = quarry::text::unique_stems(text);
        let key = quarry::text::query_key(&stems);
        assert_eq!(key.is_empty(), stems.is_empty());
    }
});
