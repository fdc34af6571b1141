//! Ignore-pattern parsing: normalized content in, ordered rules out
//!
//! Each line is processed independently; a malformed line yields a
//! [`ParseWarning`] and is excluded from the rule set without aborting the
//! rest of the batch.

use crate::normalize::{normalize_base_path, normalize_content, trim_trailing_whitespace};
use crate::types::{ParseWarning, Rule, Segment, WarningKind};

/// Outcome of parsing one line.
enum ParsedLine {
    Rule(Rule),
    Warning(ParseWarning),
    Skip,
}

/// Parse ignore content into rules.
///
/// Content is normalized first (BOM, line endings), then each line is parsed
/// on its own. Rules come back in line order, and that order is the
/// evaluation priority later (last matching rule wins).
pub(crate) fn parse_lines(base_path: &str, content: &[u8]) -> (Vec<Rule>, Vec<ParseWarning>) {
    let content = normalize_content(content);
    let base_path = normalize_base_path(base_path);
    let text = String::from_utf8_lossy(&content);

    let mut rules = Vec::new();
    let mut warnings = Vec::new();

    for (i, raw_line) in text.split('\n').enumerate() {
        match parse_line(raw_line, i + 1, &base_path) {
            ParsedLine::Rule(rule) => rules.push(rule),
            ParsedLine::Warning(warning) => {
                tracing::warn!("skipped ignore pattern: {}", warning);
                warnings.push(warning);
            }
            ParsedLine::Skip => {}
        }
    }

    (rules, warnings)
}

/// Parse a single line. Empty lines and comments are skipped silently.
fn parse_line(raw: &str, line_number: usize, base_path: &str) -> ParsedLine {
    // Step 1: trim trailing whitespace (backslash-escaped spaces survive)
    let trimmed = trim_trailing_whitespace(raw);
    let mut line: &str = trimmed.as_ref();

    if line.is_empty() {
        return ParsedLine::Skip;
    }
    if line.starts_with('#') {
        return ParsedLine::Skip;
    }

    // Kept for diagnostics and warning messages
    let original = line.to_string();
    let warn = |kind: WarningKind| {
        ParsedLine::Warning(ParseWarning {
            pattern: original.clone(),
            kind,
            line: line_number,
            base_path: base_path.to_string(),
        })
    };

    // Step 2: negation and the \! / \# escapes.
    // \! must be checked before ! so an escaped bang stays literal, and \#
    // after negation so !\#foo still works.
    let mut negate = false;
    if line.starts_with("\\!") {
        line = &line[1..];
    } else if let Some(rest) = line.strip_prefix('!') {
        negate = true;
        line = rest;
    }
    if line.starts_with("\\#") {
        line = &line[1..];
    }

    // Step 3: trailing unescaped / marks a directory-only pattern
    let mut dir_only = false;
    if has_unescaped_slash_suffix(line) {
        dir_only = true;
        line = &line[..line.len() - 1];
    }

    // Step 4: a trailing unescaped backslash never matches anything
    if ends_with_unescaped_backslash(line) {
        return warn(WarningKind::TrailingBackslash);
    }

    // Step 5: nothing left after stripping markers
    if line.is_empty() {
        return warn(WarningKind::EmptyPattern);
    }

    // Step 6: anchoring. A leading / anchors explicitly; an inner / anchors
    // implicitly unless the pattern floats via a **/ prefix.
    let mut anchored = false;
    if let Some(rest) = line.strip_prefix('/') {
        anchored = true;
        line = rest;
        if line.is_empty() {
            return warn(WarningKind::EmptyAfterAnchor);
        }
    } else if line.contains('/') && !line.starts_with("**/") {
        anchored = true;
    }

    // Step 7: split into segments, dropping empties from duplicate slashes
    let segments: Vec<Segment> = line
        .split('/')
        .filter(|part| !part.is_empty())
        .map(Segment::classify)
        .collect();

    ParsedLine::Rule(Rule {
        pattern: original,
        base_path: base_path.to_string(),
        segments,
        line: line_number,
        negate,
        dir_only,
        anchored,
    })
}

/// True when the line ends with a `/` whose immediately preceding run of
/// backslashes has even length (i.e. the slash itself is not escaped).
fn has_unescaped_slash_suffix(line: &str) -> bool {
    let bytes = line.as_bytes();
    if bytes.last() != Some(&b'/') {
        return false;
    }
    let mut backslashes = 0;
    let mut i = bytes.len() - 1;
    while i > 0 && bytes[i - 1] == b'\\' {
        backslashes += 1;
        i -= 1;
    }
    backslashes % 2 == 0
}

/// True when the line ends with an odd run of backslashes.
fn ends_with_unescaped_backslash(line: &str) -> bool {
    let bytes = line.as_bytes();
    let mut backslashes = 0;
    let mut i = bytes.len();
    while i > 0 && bytes[i - 1] == b'\\' {
        backslashes += 1;
        i -= 1;
    }
    backslashes % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(line: &str) -> Option<Rule> {
        let (rules, _) = parse_lines("", line.as_bytes());
        rules.into_iter().next()
    }

    fn parse_warnings(content: &str) -> Vec<ParseWarning> {
        let (_, warnings) = parse_lines("", content.as_bytes());
        warnings
    }

    #[test]
    fn test_comments_and_empty_lines_skipped() {
        let (rules, warnings) = parse_lines("", b"# comment\n\n   \n#another\n*.log\n");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].pattern, "*.log");
        assert_eq!(rules[0].line, 5);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_negation() {
        let rule = parse_one("!important.log").unwrap();
        assert!(rule.negate);
        assert_eq!(rule.pattern, "!important.log");
        assert_eq!(
            rule.segments,
            vec![Segment::Literal("important.log".to_string())]
        );
    }

    #[test]
    fn test_escaped_bang_is_literal() {
        let rule = parse_one("\\!readme").unwrap();
        assert!(!rule.negate);
        assert_eq!(rule.segments, vec![Segment::Literal("!readme".to_string())]);
    }

    #[test]
    fn test_escaped_hash_is_literal() {
        let rule = parse_one("\\#notes").unwrap();
        assert_eq!(rule.segments, vec![Segment::Literal("#notes".to_string())]);
    }

    #[test]
    fn test_negated_escaped_hash() {
        let rule = parse_one("!\\#notes").unwrap();
        assert!(rule.negate);
        assert_eq!(rule.segments, vec![Segment::Literal("#notes".to_string())]);
    }

    #[test]
    fn test_dir_only() {
        let rule = parse_one("build/").unwrap();
        assert!(rule.dir_only);
        assert!(!rule.anchored);
        assert_eq!(rule.segments, vec![Segment::Literal("build".to_string())]);
    }

    #[test]
    fn test_escaped_trailing_slash_is_not_dir_only() {
        let rule = parse_one("foo\\/").unwrap();
        assert!(!rule.dir_only);
    }

    #[test]
    fn test_anchoring() {
        // Leading slash anchors and is stripped
        let rule = parse_one("/root.txt").unwrap();
        assert!(rule.anchored);
        assert_eq!(
            rule.segments,
            vec![Segment::Literal("root.txt".to_string())]
        );

        // Inner slash anchors implicitly
        assert!(parse_one("src/temp").unwrap().anchored);
        assert!(parse_one("foo/**").unwrap().anchored);

        // Bare names and **/ prefixes float
        assert!(!parse_one("foo").unwrap().anchored);
        assert!(!parse_one("**/foo").unwrap().anchored);
        assert!(!parse_one("**/foo/bar").unwrap().anchored);
    }

    #[test]
    fn test_dot_slash_prefix_not_stripped_from_patterns() {
        // Git does not normalize ./ in patterns; it stays literal (and will
        // never match a normalized path).
        let rule = parse_one("./foo").unwrap();
        assert_eq!(
            rule.segments,
            vec![
                Segment::Literal(".".to_string()),
                Segment::Literal("foo".to_string())
            ]
        );
    }

    #[test]
    fn test_segment_classification() {
        let rule = parse_one("src/**/*.log").unwrap();
        assert_eq!(
            rule.segments,
            vec![
                Segment::Literal("src".to_string()),
                Segment::DoubleStar,
                Segment::Wildcard("*.log".to_string()),
            ]
        );
    }

    #[test]
    fn test_duplicate_slashes_dropped() {
        let rule = parse_one("a//b").unwrap();
        assert_eq!(
            rule.segments,
            vec![
                Segment::Literal("a".to_string()),
                Segment::Literal("b".to_string())
            ]
        );
    }

    #[test]
    fn test_warning_trailing_backslash() {
        let warnings = parse_warnings("foo\\");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::TrailingBackslash);
        assert_eq!(warnings[0].pattern, "foo\\");

        // Even backslash runs are fine
        assert!(parse_warnings("foo\\\\").is_empty());
    }

    #[test]
    fn test_warning_empty_after_processing() {
        for line in ["!", "/"] {
            let warnings = parse_warnings(line);
            assert_eq!(warnings.len(), 1, "line {:?}", line);
            assert_eq!(warnings[0].kind, WarningKind::EmptyPattern);
        }
    }

    #[test]
    fn test_warning_empty_after_leading_slash() {
        // "//" loses the trailing slash to dir-only, then the leading one to
        // anchoring, and nothing is left.
        let warnings = parse_warnings("//");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::EmptyAfterAnchor);
    }

    #[test]
    fn test_warnings_do_not_abort_batch() {
        let (rules, warnings) = parse_lines("", b"*.log\nbad\\\n!keep.log\n");
        assert_eq!(rules.len(), 2);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].line, 2);
        assert_eq!(rules[1].line, 3);
    }

    #[test]
    fn test_line_numbers_are_one_indexed() {
        let (rules, _) = parse_lines("", b"first\nsecond\n");
        assert_eq!(rules[0].line, 1);
        assert_eq!(rules[1].line, 2);
    }

    #[test]
    fn test_base_path_attached_and_normalized() {
        let (rules, _) = parse_lines("src/", b"*.tmp\n");
        assert_eq!(rules[0].base_path, "src");
    }

    #[test]
    fn test_warning_carries_base_path() {
        let (_, warnings) = parse_lines("lib", b"foo\\\n");
        assert_eq!(warnings[0].base_path, "lib");
    }

    #[test]
    fn test_crlf_and_bom_content() {
        let mut content = vec![0xEF, 0xBB, 0xBF];
        content.extend_from_slice(b"*.log\r\nbuild/\r\n");
        let (rules, warnings) = parse_lines("", &content);
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].pattern, "*.log");
        assert!(rules[1].dir_only);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_trailing_escaped_space_kept() {
        let rule = parse_one("foo\\ ").unwrap();
        // The escaping backslash is consumed by the trimmer, leaving a
        // pattern with a real trailing space.
        assert_eq!(rule.pattern, "foo ");
        assert_eq!(rule.segments, vec![Segment::Literal("foo ".to_string())]);
    }
}
