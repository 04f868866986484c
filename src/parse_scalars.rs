//! Scalar resolver: raw text fragment to typed [`Value`].
//!
//! Resolution is pure and never fails; text that matches none of the typed
//! forms is kept as a string. Flow collections (`[...]`, `{...}`) and embedded
//! `key: value` pairs are resolved recursively.

use crate::value::{Key, Mapping, Value};

/// Resolve a trimmed scalar or flow collection.
///
/// First match wins:
/// 1. empty text is `Null`;
/// 2. text wrapped in matching quotes is a string, unescaped and never coerced;
/// 3. a trailing ` # comment` is dropped (and quotes are checked again);
/// 4. `[...]` is a flow sequence;
/// 5. a top-level `key: value` not starting with `{` is a single-entry mapping;
/// 6. `{...}` is a flow mapping;
/// 7. `null`, `Null`, `NULL` and `~` are `Null`;
/// 8. `[1-9][0-9]*` is an integer (kept as text when it overflows `i64`);
/// 9. boolean words, case-insensitive;
/// 10. other numerals are floats, except `0` (an integer) and numerals with a leading
///     zero (text);
/// 11. anything else is a string, with the two characters `\n` turned into a newline.
pub(crate) fn resolve(text: &str) -> Value {
    let text = text.trim();
    if text.is_empty() {
        return Value::Null;
    }
    if let Some(s) = unquote(text) {
        return Value::String(s);
    }

    let text = strip_trailing_comment(text);
    if text.is_empty() {
        return Value::Null;
    }
    if let Some(s) = unquote(text) {
        return Value::String(s);
    }

    if let Some(inner) = text.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
        return Value::Sequence(resolve_flow_sequence(inner));
    }

    if !text.starts_with('{') {
        if let Some((key, value)) = split_key_value(text) {
            let mut m = Mapping::with_capacity(1);
            m.insert(parse_key(key), resolve(value));
            return Value::Mapping(m);
        }
    }

    if let Some(inner) = text.strip_prefix('{').and_then(|t| t.strip_suffix('}')) {
        return Value::Mapping(resolve_flow_mapping(inner));
    }

    match text {
        "null" | "Null" | "NULL" | "~" => return Value::Null,
        _ => {}
    }

    if is_positive_integer(text) {
        return match text.parse::<i64>() {
            Ok(n) => Value::Int(n),
            Err(_) => Value::String(text.to_owned()),
        };
    }

    if let Some(b) = parse_bool(text) {
        return Value::Bool(b);
    }

    if is_numeric(text) {
        if text == "0" {
            return Value::Int(0);
        }
        if !is_zero_padded(text) {
            if let Ok(f) = text.parse::<f64>() {
                return Value::Float(f);
            }
        }
        return Value::String(text.to_owned());
    }

    Value::String(text.replace("\\n", "\n"))
}

fn resolve_flow_sequence(inner: &str) -> Vec<Value> {
    let inner = inner.trim();
    if inner.is_empty() {
        return Vec::new();
    }
    let mut parts = split_flow(inner);
    if parts.last().is_some_and(|p| p.trim().is_empty()) {
        parts.pop();
    }
    parts.into_iter().map(resolve).collect()
}

fn resolve_flow_mapping(inner: &str) -> Mapping {
    let mut mapping = Mapping::new();
    let inner = inner.trim();
    if inner.is_empty() {
        return mapping;
    }
    for part in split_flow(inner) {
        match resolve(part) {
            Value::Null => {}
            Value::Mapping(entries) => {
                for (k, v) in entries {
                    mapping.insert(k, v);
                }
            }
            other => {
                mapping.push(other);
            }
        }
    }
    mapping
}

/// Interpret key text: quoted keys are always strings, plain ones may be integers.
pub(crate) fn parse_key(text: &str) -> Key {
    let text = text.trim();
    match unquote(text) {
        Some(s) => Key::Str(s),
        None => Key::from_plain(text),
    }
}

/// Unwrap text fully enclosed in matching single or double quotes.
pub(crate) fn unquote(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    if bytes.len() < 2 {
        return None;
    }
    let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
    if (first != b'"' && first != b'\'') || first != last {
        return None;
    }
    let inner = &text[1..text.len() - 1];
    Some(
        inner
            .replace("\\\"", "\"")
            .replace("''", "'")
            .replace("\\'", "'"),
    )
}

pub(crate) fn parse_bool(text: &str) -> Option<bool> {
    const TRUTHY: [&str; 5] = ["true", "on", "+", "yes", "y"];
    const FALSY: [&str; 5] = ["false", "off", "-", "no", "n"];
    if TRUTHY.iter().any(|t| text.eq_ignore_ascii_case(t)) {
        Some(true)
    } else if FALSY.iter().any(|t| text.eq_ignore_ascii_case(t)) {
        Some(false)
    } else {
        None
    }
}

/// `[1-9][0-9]*`
fn is_positive_integer(text: &str) -> bool {
    let bytes = text.as_bytes();
    matches!(bytes.first(), Some(b'1'..=b'9')) && bytes.iter().all(u8::is_ascii_digit)
}

/// `[+-]? (digits [. digits?] | . digits) ([eE] [+-]? digits)?`
pub(crate) fn is_numeric(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = i - int_start;
    let mut frac_digits = 0;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        frac_digits = i - frac_start;
    }
    if int_digits == 0 && frac_digits == 0 {
        return false;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }
    i == bytes.len()
}

/// Numerals that start with `0` (after an optional sign) other than `0` itself,
/// as in `007`, `-012` or `0.5`.
fn is_zero_padded(text: &str) -> bool {
    let unsigned = text.trim_start_matches(['+', '-']);
    unsigned.starts_with('0') && unsigned != "0"
}

/// Quote and bracket state while walking a line byte by byte.
///
/// A quote only opens at the start of a token (after whitespace, `[`, `{`, `,`
/// or `:`), so apostrophes inside plain words do not start a quoted run.
#[derive(Default)]
pub(crate) struct Nesting {
    quote: Option<u8>,
    depth: usize,
    prev: Option<u8>,
}

impl Nesting {
    /// Feed one byte. Returns `true` when the byte sits outside any quotes.
    pub(crate) fn step(&mut self, b: u8) -> bool {
        let outside = match self.quote {
            Some(q) => {
                let escaped = q == b'"' && self.prev == Some(b'\\');
                if b == q && !escaped {
                    self.quote = None;
                }
                false
            }
            None => match b {
                b'"' | b'\'' if self.at_token_start(b) => {
                    self.quote = Some(b);
                    false
                }
                b'[' | b'{' => {
                    self.depth += 1;
                    true
                }
                b']' | b'}' => {
                    self.depth = self.depth.saturating_sub(1);
                    true
                }
                _ => true,
            },
        };
        self.prev = Some(b);
        outside
    }

    fn at_token_start(&self, quote: u8) -> bool {
        match self.prev {
            None => true,
            // `''` inside a single-quoted run closes and immediately reopens.
            Some(p) if p == quote => true,
            Some(p) => matches!(p, b' ' | b'\t' | b'[' | b'{' | b',' | b':'),
        }
    }

    pub(crate) fn top_level(&self) -> bool {
        self.depth == 0
    }
}

/// Remove a whitespace-preceded `#...` tail found outside quotes.
pub(crate) fn strip_trailing_comment(text: &str) -> &str {
    let mut nesting = Nesting::default();
    let bytes = text.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        let outside = nesting.step(b);
        if outside && b == b'#' && i > 0 && (bytes[i - 1] == b' ' || bytes[i - 1] == b'\t') {
            return text[..i].trim_end();
        }
    }
    text
}

/// Split flow collection content on top-level commas.
fn split_flow(inner: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut nesting = Nesting::default();
    let mut start = 0;
    for (i, b) in inner.bytes().enumerate() {
        let outside = nesting.step(b);
        if outside && b == b',' && nesting.top_level() {
            parts.push(inner[start..i].trim());
            start = i + 1;
        }
    }
    parts.push(inner[start..].trim());
    parts
}

/// Split `key: value` on the first top-level `": "`, or a trailing `:`.
///
/// Returns trimmed `(key, value)`; the key may still be quoted.
pub(crate) fn split_key_value(text: &str) -> Option<(&str, &str)> {
    let bytes = text.as_bytes();
    let mut nesting = Nesting::default();
    for (i, &b) in bytes.iter().enumerate() {
        let outside = nesting.step(b);
        if !(outside && b == b':' && nesting.top_level()) || i == 0 {
            continue;
        }
        match bytes.get(i + 1) {
            Some(b' ') | Some(b'\t') | None => {
                return Some((text[..i].trim(), text[i + 1..].trim()));
            }
            _ => {}
        }
    }
    None
}
