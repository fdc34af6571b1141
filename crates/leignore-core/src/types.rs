//! Core type definitions for rules, warnings, and match results

use std::fmt;

use serde::Serialize;

use crate::matching::DEFAULT_MAX_BACKTRACK_ITERATIONS;

/// One `/`-delimited component of a parsed pattern.
///
/// Classification happens once at parse time; matching dispatches on the
/// variant without re-inspecting the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    /// Exact text comparison.
    Literal(String),
    /// Contains `*`, `?`, `\` or `[`; resolved by the glob sub-matcher.
    Wildcard(String),
    /// `**`, matching zero or more whole path segments.
    DoubleStar,
}

impl Segment {
    /// Classify one raw pattern part.
    pub(crate) fn classify(part: &str) -> Self {
        if part == "**" {
            return Self::DoubleStar;
        }
        if part
            .bytes()
            .any(|b| matches!(b, b'*' | b'?' | b'\\' | b'['))
        {
            Self::Wildcard(part.to_string())
        } else {
            Self::Literal(part.to_string())
        }
    }

    #[inline]
    pub(crate) fn is_double_star(&self) -> bool {
        matches!(self, Self::DoubleStar)
    }
}

/// A single parsed ignore-pattern line bound to a scope.
///
/// Rules are immutable once constructed and are evaluated in insertion
/// order; a later matching rule overrides an earlier one.
#[derive(Debug, Clone)]
pub(crate) struct Rule {
    /// Original pattern text, kept for diagnostics.
    pub(crate) pattern: String,
    /// Directory scope relative to the matching root (empty = root).
    pub(crate) base_path: String,
    /// Parsed pattern segments.
    pub(crate) segments: Vec<Segment>,
    /// 1-indexed line number in the source content.
    pub(crate) line: usize,
    /// Pattern started with `!`.
    pub(crate) negate: bool,
    /// Pattern ended with an unescaped `/`.
    pub(crate) dir_only: bool,
    /// Pattern only matches starting at its scope root.
    pub(crate) anchored: bool,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pattern)?;

        let mut flags: Vec<&str> = Vec::new();
        if self.negate {
            flags.push("negate");
        }
        if self.dir_only {
            flags.push("dirOnly");
        }
        if self.anchored {
            flags.push("anchored");
        }
        if !flags.is_empty() {
            write!(f, " [{}]", flags.join(","))?;
        }

        if !self.base_path.is_empty() {
            write!(f, " @{}", self.base_path)?;
        }

        Ok(())
    }
}

/// Why a pattern line was skipped during parsing.
///
/// Fieldless so callers can match on the category without string
/// comparisons; the message text comes from the `Display` impl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[repr(u8)]
pub enum WarningKind {
    /// Odd number of trailing backslashes.
    #[error("trailing backslash is invalid (pattern never matches)")]
    TrailingBackslash,
    /// Nothing left after stripping markers.
    #[error("pattern is empty after processing")]
    EmptyPattern,
    /// Nothing left after stripping the anchoring slash.
    #[error("pattern is empty after removing leading slash")]
    EmptyAfterAnchor,
}

/// A warning for a malformed pattern line that was skipped during parsing.
///
/// Warnings are purely informational; the rest of the batch still parses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseWarning {
    /// The problematic pattern text (trailing whitespace already trimmed).
    pub pattern: String,
    /// Warning category.
    pub kind: WarningKind,
    /// Line number in the source content (1-indexed).
    pub line: usize,
    /// Scope of the pattern batch (empty for root).
    pub base_path: String,
}

impl ParseWarning {
    /// Human-readable warning message.
    #[inline]
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.base_path.is_empty() {
            write!(f, "line {}: {:?}: {}", self.line, self.pattern, self.kind)
        } else {
            write!(
                f,
                "{}: line {}: {:?}: {}",
                self.base_path, self.line, self.pattern, self.kind
            )
        }
    }
}

/// Detailed information about a match decision.
///
/// Computed fresh per query and never stored; zero-valued fields mean no
/// rule matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// Pattern text of the final decisive rule (empty if nothing matched).
    pub rule: String,
    /// Scope of the decisive rule (empty for root).
    pub base_path: String,
    /// Line number of the decisive rule (zero if nothing matched).
    pub line: usize,
    /// Final decision: true if the path should be ignored.
    pub ignored: bool,
    /// Whether any rule matched at all (before considering negation).
    pub matched: bool,
    /// Whether the decisive rule was a negation.
    pub negated: bool,
}

/// Configuration for a [`Matcher`](crate::Matcher).
#[derive(Debug, Clone, Copy)]
pub struct MatcherOptions {
    /// Ceiling on backtracking work per rule evaluation.
    ///
    /// `0` means use [`DEFAULT_MAX_BACKTRACK_ITERATIONS`]; a negative value
    /// disables the limit (not recommended).
    pub max_backtrack_iterations: i64,
    /// Fold case on both pattern and candidate at comparison time.
    ///
    /// Default: false (case-sensitive, matching Git's default behavior).
    pub case_insensitive: bool,
}

impl Default for MatcherOptions {
    fn default() -> Self {
        Self {
            max_backtrack_iterations: DEFAULT_MAX_BACKTRACK_ITERATIONS,
            case_insensitive: false,
        }
    }
}
