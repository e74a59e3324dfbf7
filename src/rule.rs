use regex::{Captures, Regex};
use thiserror::Error;

/// Anchor field of the shipped rule: the initializer line the insertion
/// follows.
pub const ANCHOR_FIELD: &str = "convolutional_config";

/// Value tokens that qualify an anchor line for patching. Any other value
/// leaves the block untouched.
pub const PERMITTED_VALUES: [&str; 4] =
    ["None", "config", "interleave_config", "deinterleave_config"];

/// The initializer line the shipped rule inserts (without indentation).
pub const INSERTED_FIELD: &str = "symbol_config: None,";

/// Leading spaces on the inserted line, applied regardless of the block's own
/// indentation level.
pub const INDENT: usize = 12;

/// The pure transform primitive: a pattern/replacement pair applied globally
/// across a text body.
///
/// The pattern matches two adjacent lines: an anchor-field initializer
/// (leading whitespace, `<field>: <value>,` with `<value>` drawn from a fixed
/// token set) immediately followed by a closing-brace line. The replacement
/// reproduces both lines with the configured initializer inserted between
/// them. Any line between the pair defeats the match, which is also what
/// makes the rule idempotent per block: once inserted, the new line breaks
/// adjacency.
#[derive(Debug, Clone)]
pub struct SubstitutionRule {
    pattern: Regex,
    inserted: String,
    indent: usize,
}

#[derive(Error, Debug)]
pub enum RuleError {
    #[error("substitution pattern failed to compile: {0}")]
    Pattern(#[from] regex::Error),
}

/// Result of applying a [`SubstitutionRule`] to a text body.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a Rewrite is only useful for its text and insertion count"]
pub struct Rewrite {
    /// The transformed text. Equal to the input when `insertions` is zero.
    pub text: String,
    /// Number of blocks that received an inserted line.
    pub insertions: usize,
}

impl Rewrite {
    /// Whether the rewrite differs from its input.
    pub fn changed(&self) -> bool {
        self.insertions > 0
    }
}

impl SubstitutionRule {
    /// Build a rule from its parameters.
    ///
    /// `anchor_field` and each permitted value are regex-escaped, so the
    /// parameters are treated as literal tokens, not patterns.
    pub fn new<S: AsRef<str>>(
        anchor_field: &str,
        permitted_values: &[S],
        inserted: &str,
        indent: usize,
    ) -> Result<Self, RuleError> {
        let values = permitted_values
            .iter()
            .map(|v| regex::escape(v.as_ref()))
            .collect::<Vec<_>>()
            .join("|");

        // Group 1: the whole anchor line. Group 2: the adjacent closing-brace
        // line. Nothing may sit between them.
        let pattern = Regex::new(&format!(
            r"(\s+{}: (?:{}),)\n(\s+\}})",
            regex::escape(anchor_field),
            values,
        ))?;

        Ok(Self {
            pattern,
            inserted: inserted.to_string(),
            indent,
        })
    }

    /// Apply the rule to `source`, inserting one line per matching block.
    ///
    /// Pure string-to-string transform; all non-overlapping matches are
    /// rewritten left to right. Zero matches returns the input unchanged.
    pub fn apply(&self, source: &str) -> Rewrite {
        let indent = " ".repeat(self.indent);
        let mut insertions = 0;

        let text = self
            .pattern
            .replace_all(source, |caps: &Captures<'_>| {
                insertions += 1;
                format!("{}\n{}{}\n{}", &caps[1], indent, self.inserted, &caps[2])
            })
            .into_owned();

        Rewrite { text, insertions }
    }
}
