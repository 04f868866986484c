//! Dumper: value tree to text.
//!
//! The output reads back through [`crate::load`] to the same tree for documents without
//! anchors, with a few documented exceptions: negative integers come back as floats,
//! `.nan`/`.inf` as strings, and empty mappings as empty sequences unless
//! [`DumpOptions::empty_as_braces`] is set.
//!
//! ```rust
//! use mince_yaml::{Key, Mapping, Value};
//!
//! let mut m = Mapping::new();
//! m.insert(Key::from("minify"), Value::Sequence(vec!["a.js".into(), "b.js".into()]));
//! let text = mince_yaml::dump(&Value::Mapping(m));
//! assert_eq!(text, "---\nminify:\n  - a.js\n  - b.js\n");
//! ```

use std::fmt::Write;

use crate::ser_quoting::{StringStyle, key_needs_quotes, quote_key, string_style};
use crate::serializer_options::DumpOptions;
use crate::value::{Key, Mapping, Value};
use crate::wrapping::{write_folded_block, write_literal_block, write_spaces};
use crate::zmij_format::write_float_string;

/// Writes one document to `out`.
pub(crate) struct Dumper<'a, W: Write> {
    out: &'a mut W,
    indent_step: usize,
    options: DumpOptions,
}

/// Leading part of an entry line.
#[derive(Clone, Copy)]
enum Prefix<'k> {
    Item,
    Key(&'k Key),
}

impl<'a, W: Write> Dumper<'a, W> {
    pub(crate) fn new(out: &'a mut W, options: DumpOptions) -> Self {
        Self {
            out,
            indent_step: options.effective_indent_step(),
            options,
        }
    }

    /// `---` followed by the root's entries. A scalar root becomes a one-item sequence.
    pub(crate) fn write_document(&mut self, root: &Value) -> std::fmt::Result {
        self.out.write_str("---\n")?;
        match root {
            Value::Sequence(items) => self.write_sequence(items, 0),
            Value::Mapping(m) => self.write_mapping(m, 0),
            scalar => self.write_entry(Prefix::Item, scalar, 0),
        }
    }

    fn write_sequence(&mut self, items: &[Value], indent: usize) -> std::fmt::Result {
        items
            .iter()
            .try_for_each(|item| self.write_entry(Prefix::Item, item, indent))
    }

    fn write_mapping(&mut self, m: &Mapping, indent: usize) -> std::fmt::Result {
        m.iter()
            .try_for_each(|(k, v)| self.write_entry(Prefix::Key(k), v, indent))
    }

    fn write_prefix(&mut self, prefix: Prefix<'_>, indent: usize) -> std::fmt::Result {
        write_spaces(self.out, indent)?;
        match prefix {
            Prefix::Item => self.out.write_char('-'),
            Prefix::Key(Key::Int(n)) => write!(self.out, "{n}:"),
            Prefix::Key(Key::Str(s)) if key_needs_quotes(s) => {
                write!(self.out, "{}:", quote_key(s))
            }
            Prefix::Key(Key::Str(s)) => write!(self.out, "{s}:"),
        }
    }

    fn write_entry(&mut self, prefix: Prefix<'_>, value: &Value, indent: usize) -> std::fmt::Result {
        self.write_prefix(prefix, indent)?;
        let child_indent = indent + self.indent_step;
        match value {
            Value::Null => self.out.write_char('\n'),
            Value::Sequence(items) if items.is_empty() => self.out.write_str(" [ ]\n"),
            Value::Mapping(m) if m.is_empty() => {
                let empty = if self.options.empty_as_braces { " { }\n" } else { " [ ]\n" };
                self.out.write_str(empty)
            }
            Value::Sequence(items) => {
                self.out.write_char('\n')?;
                self.write_sequence(items, child_indent)
            }
            Value::Mapping(m) => {
                self.out.write_char('\n')?;
                self.write_mapping(m, child_indent)
            }
            Value::Bool(b) => writeln!(self.out, " {b}"),
            Value::Int(n) => writeln!(self.out, " {n}"),
            Value::Float(f) => {
                self.out.write_char(' ')?;
                write_float_string(self.out, *f)?;
                self.out.write_char('\n')
            }
            Value::String(s) => self.write_string(s, indent),
        }
    }

    /// Write the value part of a string entry whose line starts at `indent`.
    fn write_string(&mut self, s: &str, indent: usize) -> std::fmt::Result {
        let body_indent = indent + self.indent_step;
        match string_style(s, &self.options) {
            StringStyle::Plain => writeln!(self.out, " {s}"),
            StringStyle::SingleQuoted => writeln!(self.out, " '{s}'"),
            StringStyle::DoubleQuoted => writeln!(self.out, " \"{s}\""),
            StringStyle::EscapedNewlines => {
                self.out.write_char(' ')?;
                for _ in 0..s.len() {
                    self.out.write_str("\\n")?;
                }
                self.out.write_char('\n')
            }
            StringStyle::Literal => {
                self.out.write_str(" |")?;
                let body_indent = match literal_indent_indicator(s, self.indent_step) {
                    Some(n) => {
                        write!(self.out, "{n}")?;
                        indent + n
                    }
                    None => body_indent,
                };
                if s.ends_with('\n') {
                    self.out.write_char('+')?;
                }
                self.out.write_char('\n')?;
                write_literal_block(self.out, s, body_indent)
            }
            StringStyle::Folded => {
                self.out.write_str(" >\n")?;
                write_folded_block(self.out, s, body_indent, self.options.wrap_column)
            }
        }
    }
}

/// Indentation indicator for a literal block whose text starts every line with
/// whitespace; without it the loader would take that whitespace as indentation.
fn literal_indent_indicator(s: &str, step: usize) -> Option<usize> {
    s.split('\n')
        .filter(|line| !line.trim().is_empty())
        .all(|line| line.starts_with([' ', '\t']))
        .then_some(step.clamp(1, 9))
}
