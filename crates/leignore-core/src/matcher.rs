//! Matcher facade: the rule store, warning sink, and public match contract
//!
//! One reader/writer lock guards the rule sequence and the warning sink.
//! Parsing happens before the write lock is taken, and warning callbacks run
//! after it is released, so readers are never blocked on user code.

use std::sync::Arc;

use parking_lot::RwLock;
use rayon::prelude::*;

use crate::matching::{match_rule, split_path, DEFAULT_MAX_BACKTRACK_ITERATIONS};
use crate::normalize::normalize_path;
use crate::parser::parse_lines;
use crate::types::{MatchResult, MatcherOptions, ParseWarning, Rule};

/// Callback receiving `(base_path, warning)` for each parse warning.
pub type WarningHandler = Arc<dyn Fn(&str, &ParseWarning) + Send + Sync>;

/// Where warnings from the next pattern batch go.
enum WarningMode {
    /// Append to the collected list, drained via [`Matcher::take_warnings`].
    Collect,
    /// Forward to a registered callback; nothing is collected.
    Forward(WarningHandler),
}

struct MatcherState {
    rules: Vec<Rule>,
    warnings: Vec<ParseWarning>,
    mode: WarningMode,
}

/// Holds compiled ignore rules and answers match queries.
///
/// Thread safety: all methods take `&self`; any number of match calls run in
/// parallel under shared read access, and results never depend on their
/// relative ordering because the rule sequence is immutable during reads.
/// For best throughput, batch [`add_patterns`](Matcher::add_patterns) calls
/// before starting concurrent matching; interleaving writers costs lock
/// contention, never correctness.
pub struct Matcher {
    state: RwLock<MatcherState>,
    opts: MatcherOptions,
}

impl Matcher {
    /// Create an empty matcher with default options.
    pub fn new() -> Self {
        Self::with_options(MatcherOptions::default())
    }

    /// Create an empty matcher with custom options.
    ///
    /// A `max_backtrack_iterations` of `0` selects
    /// [`DEFAULT_MAX_BACKTRACK_ITERATIONS`]; a negative value disables the
    /// limit (not recommended).
    pub fn with_options(mut opts: MatcherOptions) -> Self {
        if opts.max_backtrack_iterations == 0 {
            opts.max_backtrack_iterations = DEFAULT_MAX_BACKTRACK_ITERATIONS;
        }
        Self {
            state: RwLock::new(MatcherState {
                rules: Vec::new(),
                warnings: Vec::new(),
                mode: WarningMode::Collect,
            }),
            opts,
        }
    }

    /// Parse ignore content and append its rules.
    ///
    /// `base_path` scopes the batch to a directory relative to the matching
    /// root (empty string = root); callers conventionally add the root batch
    /// first and deeper scopes after, mirroring nested-ignore-file
    /// precedence. Empty content is a no-op.
    ///
    /// Returns the warnings for this batch, unless a warning handler is
    /// registered, in which case warnings go only to the handler and the
    /// returned vec is empty.
    pub fn add_patterns(&self, base_path: &str, content: &[u8]) -> Vec<ParseWarning> {
        if content.is_empty() {
            return Vec::new();
        }

        // Parse before taking the lock
        let (rules, warnings) = parse_lines(base_path, content);

        let mut state = self.state.write();
        state.rules.extend(rules);

        let forward = match &state.mode {
            WarningMode::Forward(handler) => Some(Arc::clone(handler)),
            WarningMode::Collect => None,
        };

        if let Some(handler) = forward {
            // Invoke outside the lock so a handler may re-enter the matcher
            drop(state);
            for warning in &warnings {
                handler(&warning.base_path, warning);
            }
            Vec::new()
        } else {
            state.warnings.extend(warnings.iter().cloned());
            warnings
        }
    }

    /// Register a callback for parse warnings from subsequent
    /// [`add_patterns`](Matcher::add_patterns) calls.
    ///
    /// Warnings already collected stay in the collected list; registering a
    /// handler never moves them retroactively. The handler is invoked
    /// synchronously on the thread calling `add_patterns`, outside the
    /// matcher's lock.
    pub fn set_warning_handler<F>(&self, handler: F)
    where
        F: Fn(&str, &ParseWarning) + Send + Sync + 'static,
    {
        self.state.write().mode = WarningMode::Forward(Arc::new(handler));
    }

    /// Remove a registered warning handler; subsequent batches collect
    /// warnings again.
    pub fn clear_warning_handler(&self) {
        self.state.write().mode = WarningMode::Collect;
    }

    /// All collected parse warnings (a copy). Only populated for batches
    /// parsed while no warning handler was registered.
    pub fn warnings(&self) -> Vec<ParseWarning> {
        self.state.read().warnings.clone()
    }

    /// Drain the collected parse warnings, leaving the list empty.
    pub fn take_warnings(&self) -> Vec<ParseWarning> {
        std::mem::take(&mut self.state.write().warnings)
    }

    /// True if the path should be ignored.
    ///
    /// `path` is relative to the matching root; it is normalized before
    /// evaluation. `is_dir` says whether the candidate is a directory, which
    /// directory-only rules need to know.
    pub fn is_match(&self, path: &str, is_dir: bool) -> bool {
        self.match_with_reason(path, is_dir).ignored
    }

    /// Like [`is_match`](Matcher::is_match), additionally reporting which
    /// rule produced the final decision.
    ///
    /// Every stored rule is evaluated in insertion order and each matching
    /// rule overwrites the running decision — **last match wins**. A path
    /// matched by no rule is never ignored.
    pub fn match_with_reason(&self, path: &str, is_dir: bool) -> MatchResult {
        let normalized = normalize_path(path);
        if normalized.is_empty() {
            return MatchResult::default();
        }
        let segments = split_path(&normalized);

        let state = self.state.read();
        let mut result = MatchResult::default();
        for rule in &state.rules {
            if match_rule(
                rule,
                &normalized,
                &segments,
                is_dir,
                self.opts.case_insensitive,
                self.opts.max_backtrack_iterations,
            ) {
                result.matched = true;
                result.rule.clone_from(&rule.pattern);
                result.base_path.clone_from(&rule.base_path);
                result.line = rule.line;
                result.negated = rule.negate;
                result.ignored = !rule.negate;
            }
        }
        result
    }

    /// Match many candidates in parallel with rayon.
    ///
    /// Results are identical to calling [`is_match`](Matcher::is_match)
    /// sequentially, in input order.
    pub fn match_parallel(&self, candidates: &[(&str, bool)]) -> Vec<bool> {
        candidates
            .par_iter()
            .map(|&(path, is_dir)| self.is_match(path, is_dir))
            .collect()
    }

    /// Number of rules currently loaded.
    pub fn rule_count(&self) -> usize {
        self.state.read().rules.len()
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}
