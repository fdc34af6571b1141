#![no_main]
use leignore_core::Matcher;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Parsing is total: every line either becomes a rule, a warning, or is
    // skipped. Never a panic, never an aborted batch.
    let matcher = Matcher::new();
    let warnings = matcher.add_patterns("", data);
    let _ = warnings.len();
    let _ = matcher.rule_count();
    let _ = matcher.is_match("src/some/file.txt", false);
});
