//! Structural classification of one logical line.
//!
//! The classifier sees a line with its indentation removed, block headers
//! already replaced by a placeholder and line comments stripped. It extracts an
//! anchor or alias token, then decides which construct the rest represents.

use crate::parse_scalars::{parse_key, resolve, split_key_value};
use crate::value::{Key, Value};

/// What a line contributes to the tree.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Unit {
    /// `- key:`: a sequence item holding `{key: []}`. Deeper `- item` lines at
    /// `key_offset` (relative to the line indentation) or beyond fill the sequence.
    MappedSequence { key: Key, key_offset: usize },
    /// `key:`: the value comes from deeper lines, `Null` until then.
    MappedValue { key: Key, merge: bool },
    /// `- value`
    Item(Value),
    /// `[a, b]` on its own line: each element is added positionally.
    FlowItems(Vec<Value>),
    /// `key: value`
    Pair { key: Key, value: Value, merge: bool },
    /// A bare scalar without key or dash.
    Scalar(Value),
    /// Nothing left once the anchor or alias token was removed.
    Empty,
    /// `<<` with its source already resolved; never produced by [`classify`].
    Merge(Value),
}

/// Anchor or alias token found on the line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Group {
    Anchor(String),
    Alias(String),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Classified {
    pub(crate) unit: Unit,
    pub(crate) group: Option<Group>,
    /// Byte offset of the group token within the classified text.
    pub(crate) group_offset: usize,
}

/// Classify `content` (indentation and comments already removed).
pub(crate) fn classify(content: &str) -> Classified {
    let content = content.trim();
    let (group, group_offset, line) = match find_group(content) {
        Some((group, start, end)) => (Some(group), start, strip_range(content, start, end)),
        None => (None, 0, content.to_owned()),
    };
    log::trace!("classify {line:?} group={group:?}");
    Classified {
        unit: classify_structure(&line),
        group,
        group_offset,
    }
}

fn classify_structure(line: &str) -> Unit {
    if line.is_empty() {
        return Unit::Empty;
    }
    let is_marker = line.starts_with("---");

    if line.starts_with('-') && line.ends_with(':') && !is_marker && line.len() > 1 {
        let rest = line[1..line.len() - 1].trim();
        let key_offset = line.len() - line[1..].trim_start().len();
        return Unit::MappedSequence {
            key: parse_key(rest),
            key_offset,
        };
    }

    if let Some(key_text) = line.strip_suffix(':') {
        let key_text = key_text.trim();
        return Unit::MappedValue {
            key: parse_key(key_text),
            merge: key_text == "<<",
        };
    }

    if line.starts_with('-') && !is_marker {
        return Unit::Item(resolve(&line[1..]));
    }

    if line.starts_with('[') && line.ends_with(']') {
        return match resolve(line) {
            Value::Sequence(items) => Unit::FlowItems(items),
            other => Unit::Scalar(other),
        };
    }

    match split_key_value(line) {
        Some((key_text, value_text)) => Unit::Pair {
            key: parse_key(key_text),
            value: resolve(value_text),
            merge: key_text == "<<",
        },
        None => Unit::Scalar(resolve(line)),
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

/// Length of the `&name` / `*name` token starting at `start`, if one is there.
fn token_at(bytes: &[u8], start: usize) -> Option<usize> {
    if !matches!(bytes.get(start), Some(b'&' | b'*')) {
        return None;
    }
    let name_len = bytes[start + 1..]
        .iter()
        .take_while(|b| is_name_byte(**b))
        .count();
    let end = start + 1 + name_len;
    let bounded = matches!(bytes.get(end), None | Some(b' ' | b'\t'));
    (name_len > 0 && bounded).then_some(end)
}

/// Locate one anchor or alias token: at the start of the line, at its end, or
/// right after a `key: ` / `- ` prefix (which covers `<<: *name`).
fn find_group(line: &str) -> Option<(Group, usize, usize)> {
    let bytes = line.as_bytes();
    if !line.contains(['&', '*']) {
        return None;
    }

    let mut candidates: Vec<usize> = vec![0];
    if let Some(pos) = line.rfind([' ', '\t']) {
        candidates.push(pos + 1);
    }
    if let Some(rest) = line.strip_prefix('-') {
        candidates.push(line.len() - rest.trim_start().len());
    }
    if let Some((key, _)) = split_key_value(line) {
        let after_colon = line[key.len()..].find(':').map(|c| key.len() + c + 1);
        if let Some(colon_end) = after_colon {
            let value_start = colon_end + (line[colon_end..].len() - line[colon_end..].trim_start().len());
            candidates.push(value_start);
        }
    }

    candidates.into_iter().find_map(|start| {
        let end = token_at(bytes, start)?;
        let name = line[start + 1..end].to_owned();
        let group = if bytes[start] == b'&' {
            Group::Anchor(name)
        } else {
            Group::Alias(name)
        };
        Some((group, start, end))
    })
}

/// Remove `line[start..end]`, keeping one space between what remains on either side.
fn strip_range(line: &str, start: usize, end: usize) -> String {
    let before = line[..start].trim_end();
    let after = line[end..].trim_start();
    match (before.is_empty(), after.is_empty()) {
        (true, _) => after.to_owned(),
        (false, true) => before.to_owned(),
        (false, false) => format!("{before} {after}"),
    }
}
