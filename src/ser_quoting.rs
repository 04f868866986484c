/// Controls quoting and block style choices of the dumper.

use crate::block;
use crate::parse_scalars::resolve;
use crate::serializer_options::DumpOptions;
use crate::value::{Value, is_canonical_index};

/// How one string value is written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StringStyle {
    Plain,
    SingleQuoted,
    DoubleQuoted,
    /// `|` block, `|+` when the text ends with a newline.
    Literal,
    /// `>` block wrapped at the configured column.
    Folded,
    /// Text made only of newlines, written as plain `\n` escapes.
    EscapedNewlines,
}

/// Substrings that change how a plain line is read.
const STRUCTURAL: [&str; 12] = [
    ": ", "- ", "*", "#", "<", ">", "  ", "[", "]", "{", "}", " &",
];

/// Pick the style for a string in value position.
pub(crate) fn string_style(s: &str, options: &DumpOptions) -> StringStyle {
    if !s.is_empty() && s.bytes().all(|b| b == b'\n') {
        return StringStyle::EscapedNewlines;
    }
    if s.contains('\n') {
        return StringStyle::Literal;
    }
    if has_structure(s) || !reads_back_plain(s) || has_surrounding_whitespace(s) {
        return quoted_style(s);
    }
    if options.wrap_column > 0 && s.chars().count() > options.wrap_column && has_break(s) {
        return StringStyle::Folded;
    }
    if options.force_quotes {
        return quoted_style(s);
    }
    StringStyle::Plain
}

/// Single quotes, then double quotes, then a literal block when neither reads back intact.
fn quoted_style(s: &str) -> StringStyle {
    if !s.contains('\'') && !s.contains("\\\"") {
        StringStyle::SingleQuoted
    } else if !s.contains('"') && !s.contains("''") && !s.contains("\\'") {
        StringStyle::DoubleQuoted
    } else {
        StringStyle::Literal
    }
}

fn has_structure(s: &str) -> bool {
    if STRUCTURAL.iter().any(|pattern| s.contains(pattern)) {
        return true;
    }
    if s.ends_with(':') || s.ends_with('|') {
        return true;
    }
    if matches!(
        s.as_bytes().first(),
        Some(b'&' | b'!' | b'%' | b'@' | b'`' | b'|' | b'\'' | b'"')
    ) {
        return true;
    }
    block::detect_header(s).is_some() || block::needs_next_line(s)
}

/// The resolver turns the text back into exactly this string.
fn reads_back_plain(s: &str) -> bool {
    matches!(resolve(s), Value::String(back) if back == s)
}

fn has_surrounding_whitespace(s: &str) -> bool {
    s.trim() != s
}

/// A single space between two non-blank characters, where folding may break the line.
fn has_break(s: &str) -> bool {
    crate::wrapping::break_points(s).next().is_some()
}

/// True when a string key must be quoted to read back as the same key.
pub(crate) fn key_needs_quotes(key: &str) -> bool {
    if key.is_empty() || key == "<<" || is_canonical_index(key) {
        return true;
    }
    if key.trim() != key {
        return true;
    }
    if key.contains([':', '#', '[', ']', '{', '}', '\'', '"', '\n']) {
        return true;
    }
    matches!(
        key.as_bytes()[0],
        b'-' | b'?' | b'&' | b'*' | b'!' | b'|' | b'>' | b'%' | b'@' | b'`'
    )
}

/// Quote a key: double quotes unless the key holds `"` and no `'`.
pub(crate) fn quote_key(key: &str) -> String {
    if key.contains('"') && !key.contains('\'') {
        format!("'{key}'")
    } else {
        format!("\"{}\"", key.replace('"', "\\\""))
    }
}
