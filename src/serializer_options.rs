//! Dumper options.
//!
//! Example: four-space indentation with every plain string quoted.
//!
//! ```rust
//! use mince_yaml::{Value, dump_options, dump_with_options};
//!
//! let v = Value::Sequence(vec![Value::from("a.js")]);
//! let opts = dump_options! {
//!     indent_step: 4,
//!     force_quotes: true,
//! };
//! assert_eq!(dump_with_options(&v, opts), "---\n- 'a.js'\n");
//! ```

/// Options for [`crate::dump_with_options`].
///
/// Construct `DumpOptions` with the [`dump_options!`](crate::dump_options!) macro to stay
/// compatible with fields added later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DumpOptions {
    /// Spaces per nesting level (2 by default). `0` falls back to the default.
    pub indent_step: usize,
    /// Plain strings longer than this many characters are written as folded (`>`) blocks
    /// wrapped at this column (40 by default). `0` disables folding.
    pub wrap_column: usize,
    /// Quote every string that would otherwise be written plain.
    pub force_quotes: bool,
    /// Write an empty mapping as `{ }` instead of `[ ]`.
    ///
    /// `[ ]` reads back as an empty sequence, so the default loses the difference between
    /// the two.
    pub empty_as_braces: bool,
}

pub(crate) const DEFAULT_INDENT_STEP: usize = 2;
pub(crate) const DEFAULT_WRAP_COLUMN: usize = 40;

impl DumpOptions {
    pub(crate) fn effective_indent_step(&self) -> usize {
        if self.indent_step == 0 {
            DEFAULT_INDENT_STEP
        } else {
            self.indent_step
        }
    }
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            indent_step: DEFAULT_INDENT_STEP,
            wrap_column: DEFAULT_WRAP_COLUMN,
            force_quotes: false,
            empty_as_braces: false,
        }
    }
}
