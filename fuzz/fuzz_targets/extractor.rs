#![no_main]

use libfuzzer_sys::fuzz_target;

use quake_ingest::extractor::extract;

fuzz_target!(|data: &[u8]| {
    let html = String::from_utf8_lossy(data);

    // The extractor should never panic regardless of input
    if let Ok(text) = extract(&html) {
        assert!(!text.contains("  "));
        assert_eq!(text.trim(), text);
    }
});
