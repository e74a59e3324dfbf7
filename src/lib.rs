//! Field Backfill: insert missing struct-field initializers into generated
//! test sources.
//!
//! When a struct gains a new field, every hand-written or generated literal of
//! that struct stops compiling. This crate patches the affected source file by
//! appending the missing initializer line after an anchor field, matched with
//! a regular expression rather than a parser.
//!
//! # Architecture
//!
//! The work splits into a pure transform and an I/O shell. [`SubstitutionRule`]
//! holds the pattern/replacement pair and rewrites a string in memory;
//! [`Patcher`] reads the target file, applies the rule, and writes the result
//! back to the same path. Intelligence lives in the rule, not the shell.
//!
//! # Safety
//!
//! - Atomic file writes (tempfile + fsync + rename)
//! - UTF-8 validation before transforming
//! - Per-block idempotence: an inserted line breaks the adjacency the pattern
//!   requires, so re-running makes no further insertions for patched blocks
//!
//! # Example
//!
//! ```no_run
//! use field_backfill::{Patcher, SubstitutionRule};
//!
//! let rule = SubstitutionRule::new(
//!     "convolutional_config",
//!     &["None", "config"],
//!     "symbol_config: None,",
//!     12,
//! )?;
//!
//! let outcome = Patcher::new("tests/operations_tests.rs", rule).apply()?;
//! println!("{:?}", outcome);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod patcher;
pub mod rule;

// Re-exports
pub use patcher::{PatchError, PatchOutcome, Patcher};
pub use rule::{Rewrite, RuleError, SubstitutionRule};
