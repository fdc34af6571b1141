#![no_main]
use leignore_core::normalize::{normalize_content, normalize_path};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Content normalization is idempotent for arbitrary bytes
    let once = normalize_content(data).into_owned();
    let twice = normalize_content(&once).into_owned();
    assert_eq!(once, twice);

    // Path normalization is idempotent for arbitrary strings
    if let Ok(s) = std::str::from_utf8(data) {
        let once = normalize_path(s).into_owned();
        let twice = normalize_path(&once).into_owned();
        assert_eq!(once, twice);
    }
});
