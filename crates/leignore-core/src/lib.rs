//! # LeIgnore Core
//!
//! Gitignore-style path matching with scoped rules and bounded backtracking.
//!
//! This library turns raw ignore-file bytes into an ordered rule set and
//! answers "should this path be ignored?" with Git-compatible semantics:
//! - **Anchoring**: `/foo` and `a/b` match from the scope root; bare names
//!   and `**/`-prefixed patterns float to any depth
//! - **Negation**: `!pattern` re-includes previously ignored paths,
//!   evaluated last-match-wins
//! - **Directory-only**: `build/` matches the directory and everything
//!   inside it
//! - **Double-star**: `**` spans any number of directories
//! - **Character classes**: `[a-c]`, `[!abc]`, `[[:digit:]]`
//! - **Bounded backtracking**: pathological `**` patterns fail closed
//!   within a configurable iteration budget instead of hanging
//!
//! The core never touches the filesystem: callers hand it already-read
//! bytes tagged with a scope, and query paths against the accumulated rules.
//!
//! ## Example
//!
//! ```
//! use leignore_core::Matcher;
//!
//! let matcher = Matcher::new();
//! matcher.add_patterns("", b"*.log\nbuild/\n!important.log\n");
//!
//! assert!(matcher.is_match("debug.log", false));
//! assert!(!matcher.is_match("important.log", false));
//! assert!(matcher.is_match("build", true));
//! assert!(matcher.is_match("build/output.js", false));
//! ```
//!
//! ## Nested scopes
//!
//! Batches from nested ignore files carry their directory as a scope:
//!
//! ```
//! use leignore_core::Matcher;
//!
//! let matcher = Matcher::new();
//! matcher.add_patterns("", root_content());
//! matcher.add_patterns("src", b"*.tmp\n");
//!
//! assert!(matcher.is_match("src/scratch.tmp", false));
//! assert!(!matcher.is_match("scratch.tmp", false));
//! # fn root_content() -> &'static [u8] { b"*.log\n" }
//! ```
//!
//! ## Thread safety
//!
//! [`Matcher`] is safe for concurrent use: match queries share a read lock
//! and run fully in parallel; `add_patterns` parses outside the lock and
//! holds the write lock only to append.

#![warn(missing_docs, rust_2018_idioms)]

mod glob;
mod matching;
mod parser;

pub mod matcher;
pub mod normalize;
pub mod types;

pub use matcher::{Matcher, WarningHandler};
pub use matching::DEFAULT_MAX_BACKTRACK_ITERATIONS;
pub use types::{MatchResult, MatcherOptions, ParseWarning, WarningKind};
