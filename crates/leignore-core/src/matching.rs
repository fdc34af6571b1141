//! Segment-level rule matching with a bounded backtracking budget
//!
//! The `**` recursion is the combinatorial hot spot: a pattern like
//! `a/**/b/**/c` against a deep path multiplies skip choices. Every
//! recursive call and every backtracking attempt charges one unit against a
//! per-query [`MatchContext`]; once the budget is gone, matching fails
//! closed instead of hanging.

use crate::glob;
use crate::types::{Rule, Segment};

/// Default ceiling for backtracking work per rule evaluation.
///
/// This is a flat per-query limit, not scaled by pattern complexity.
/// Patterns with several `**` segments may hit it on very deep trees, in
/// which case the query conservatively reports "no match".
pub const DEFAULT_MAX_BACKTRACK_ITERATIONS: i64 = 10_000;

/// Tracks matching work for one top-level query.
pub(crate) struct MatchContext {
    iterations: u64,
    limit: Option<u64>,
}

impl MatchContext {
    /// `0` selects [`DEFAULT_MAX_BACKTRACK_ITERATIONS`]; a negative value
    /// removes the limit.
    pub(crate) fn new(max_iterations: i64) -> Self {
        let limit = match max_iterations {
            0 => Some(DEFAULT_MAX_BACKTRACK_ITERATIONS as u64),
            n if n < 0 => None,
            n => Some(n as u64),
        };
        Self {
            iterations: 0,
            limit,
        }
    }

    /// Charge one unit of work. Returns false once the budget is exhausted;
    /// from then on every matching function fails closed.
    #[inline]
    pub(crate) fn tick(&mut self) -> bool {
        self.iterations += 1;
        match self.limit {
            None => true,
            Some(limit) => {
                if self.iterations == limit + 1 {
                    tracing::debug!(
                        "backtrack budget of {} exhausted; failing closed",
                        limit
                    );
                }
                self.iterations <= limit
            }
        }
    }
}

/// How the pattern must consume the candidate's segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchMode {
    /// Pattern must consume all remaining segments.
    Exact,
    /// Pattern must match a proper prefix: at least one path segment must
    /// remain after it. Used for directory-only rules evaluated against a
    /// file, which must lie strictly inside the directory.
    Prefix,
}

/// Split a normalized path into segments, dropping empties.
pub(crate) fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

/// Match one rule against a normalized path.
///
/// `path_segments` must be `split_path(path)`; callers split once per query
/// and reuse the result across every rule.
pub(crate) fn match_rule(
    rule: &Rule,
    path: &str,
    path_segments: &[&str],
    is_dir: bool,
    case_insensitive: bool,
    max_iterations: i64,
) -> bool {
    // Scope check: the path must live under the rule's base path, which is
    // then stripped before segment comparison.
    let storage: Vec<&str>;
    let remaining: &[&str] = if rule.base_path.is_empty() {
        path_segments
    } else if path == rule.base_path {
        &[]
    } else {
        match path.strip_prefix(rule.base_path.as_str()) {
            Some(rest) if rest.starts_with('/') => {
                storage = split_path(&rest[1..]);
                &storage
            }
            _ => return false,
        }
    };

    if remaining.is_empty() {
        // Only an (impossible for stored rules) empty pattern matches an
        // empty remainder.
        return rule.segments.is_empty();
    }

    let mode = if rule.dir_only && !is_dir {
        MatchMode::Prefix
    } else {
        MatchMode::Exact
    };

    let mut ctx = MatchContext::new(max_iterations);

    if rule.anchored {
        return match_segments(&rule.segments, remaining, mode, case_insensitive, &mut ctx);
    }

    // Floating rules try every start offset.
    let max_start = match mode {
        MatchMode::Prefix => Some(remaining.len() - 1),
        MatchMode::Exact => remaining.len().checked_sub(rule.segments.len()),
    };
    if let Some(max_start) = max_start {
        for start in 0..=max_start {
            if !ctx.tick() {
                return false;
            }
            if match_segments(
                &rule.segments,
                &remaining[start..],
                mode,
                case_insensitive,
                &mut ctx,
            ) {
                return true;
            }
        }
    }

    // A leading ** absorbs the length mismatch the offset bounds assume
    // away (`**/x` must match `x` at depth zero), so try the whole
    // remainder once more.
    if rule.segments.first().is_some_and(Segment::is_double_star) {
        return match_segments(&rule.segments, remaining, mode, case_insensitive, &mut ctx);
    }

    false
}

/// Recursive core shared by both modes; they differ only in the
/// empty-pattern terminal.
fn match_segments(
    pattern: &[Segment],
    path: &[&str],
    mode: MatchMode,
    case_insensitive: bool,
    ctx: &mut MatchContext,
) -> bool {
    if !ctx.tick() {
        return false;
    }

    let Some((segment, rest_pattern)) = pattern.split_first() else {
        return match mode {
            MatchMode::Exact => path.is_empty(),
            MatchMode::Prefix => !path.is_empty(),
        };
    };

    if segment.is_double_star() {
        // ** consumes zero or more leading path segments; try each skip
        // count in order.
        for skip in 0..=path.len() {
            if match_segments(rest_pattern, &path[skip..], mode, case_insensitive, ctx) {
                return true;
            }
            if !ctx.tick() {
                return false;
            }
        }
        return false;
    }

    let Some((first, rest_path)) = path.split_first() else {
        return false;
    };

    if !match_single_segment(segment, first, case_insensitive, ctx) {
        return false;
    }

    match_segments(rest_pattern, rest_path, mode, case_insensitive, ctx)
}

/// Match one non-`**` pattern segment against one path segment.
///
/// Case-insensitive mode folds both sides at comparison time; the pattern is
/// never pre-folded.
fn match_single_segment(
    segment: &Segment,
    path_segment: &str,
    case_insensitive: bool,
    ctx: &mut MatchContext,
) -> bool {
    match segment {
        Segment::DoubleStar => true,
        Segment::Literal(text) => {
            if case_insensitive {
                text.to_lowercase() == path_segment.to_lowercase()
            } else {
                text.as_str() == path_segment
            }
        }
        Segment::Wildcard(text) => {
            if case_insensitive {
                glob::match_glob(&text.to_lowercase(), &path_segment.to_lowercase(), ctx)
            } else {
                glob::match_glob(text, path_segment, ctx)
            }
        }
    }
}
