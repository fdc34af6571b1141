#![no_main]
use leignore_core::Matcher;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Input splits at the first NUL: pattern content before, candidate after
    let Some(split) = data.iter().position(|&b| b == b'\0') else {
        return;
    };
    let (patterns, rest) = data.split_at(split);
    let path = String::from_utf8_lossy(&rest[1..]);

    let matcher = Matcher::new();
    matcher.add_patterns("", patterns);

    // Must terminate within the backtrack budget and never panic
    let _ = matcher.is_match(&path, false);
    let _ = matcher.is_match(&path, true);
    let _ = matcher.match_with_reason(&path, false);
});
