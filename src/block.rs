//! Block scalars (`|`, `>`) and flow sequences spanning several lines.

use crate::scanner::Line;

/// Stand-in for the block text while the header line is classified.
///
/// Uses private-use characters so it cannot collide with real input and always
/// resolves as a plain string.
pub(crate) const PLACEHOLDER: &str = "\u{E000}block\u{E001}";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BlockStyle {
    /// `|`: line breaks kept.
    Literal,
    /// `>`: lines joined with spaces.
    Folded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Chomping {
    /// `-`
    Strip,
    /// no indicator
    Clip,
    /// `+`
    Keep,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct BlockHeader {
    pub(crate) style: BlockStyle,
    pub(crate) chomping: Chomping,
    /// Explicit indentation indicator (`|2`): content column relative to the owner.
    pub(crate) indent: Option<usize>,
}

/// Recognize a block scalar header at the end of `content`.
///
/// Returns the header and the content with the indicator replaced by [`PLACEHOLDER`].
/// The indicator must stand alone (start of line or after whitespace) and may be
/// followed by a chomping indicator and an indentation digit, in either order. A `>`
/// closing an HTML-like `<...>` tag is text, not a header.
pub(crate) fn detect_header(content: &str) -> Option<(BlockHeader, String)> {
    let mut body = content.trim_end();
    let mut chomping = None;
    let mut indent = None;
    for _ in 0..2 {
        match *body.as_bytes().last()? {
            b'-' if chomping.is_none() => chomping = Some(Chomping::Strip),
            b'+' if chomping.is_none() => chomping = Some(Chomping::Keep),
            d @ b'1'..=b'9' if indent.is_none() => indent = Some(usize::from(d - b'0')),
            _ => break,
        }
        body = &body[..body.len() - 1];
    }
    let chomping = chomping.unwrap_or(Chomping::Clip);
    let style = match body.as_bytes().last()? {
        b'|' => BlockStyle::Literal,
        b'>' => BlockStyle::Folded,
        _ => return None,
    };
    let prefix = &body[..body.len() - 1];
    if !(prefix.is_empty() || prefix.ends_with([' ', '\t'])) {
        return None;
    }
    if style == BlockStyle::Folded && prefix.contains('<') {
        return None;
    }
    let prefix = prefix.trim_end();
    let replaced = if prefix.is_empty() {
        PLACEHOLDER.to_owned()
    } else {
        format!("{prefix} {PLACEHOLDER}")
    };
    Some((
        BlockHeader {
            style,
            chomping,
            indent,
        },
        replaced,
    ))
}

/// Column of the entry owning a header line, relative to the line indentation.
///
/// For `- key: |` this is the key, so sibling keys of the item end the block. Every
/// other header is owned by the line itself.
pub(crate) fn owner_offset(replaced: &str) -> usize {
    match replaced.strip_prefix('-') {
        Some(rest) if rest.starts_with([' ', '\t']) && rest.trim() != PLACEHOLDER => {
            replaced.len() - rest.trim_start().len()
        }
        _ => 0,
    }
}

/// Number of lines after a header at `header_indent` that belong to its block.
///
/// Blank lines and lines indented deeper than the header continue the block.
pub(crate) fn continuation_len(rest: &[Line<'_>], header_indent: usize) -> usize {
    rest.iter()
        .take_while(|line| line.is_blank() || line.indent > header_indent)
        .count()
}

/// Build the block text from its continuation lines; `owner` is the column of the
/// entry the block belongs to.
pub(crate) fn assemble(header: BlockHeader, lines: &[Line<'_>], owner: usize) -> String {
    let column = match header.indent {
        Some(n) => owner + n,
        None => lines
            .iter()
            .filter(|l| !l.is_blank())
            .map(|l| l.indent)
            .min()
            .unwrap_or(0),
    };
    // Whitespace reaching past the content column is text, not an empty line.
    let is_empty = |l: &Line<'_>| match header.style {
        BlockStyle::Literal => l.is_blank() && l.raw.len() <= column,
        BlockStyle::Folded => l.is_blank(),
    };
    let trailing_blanks = lines.iter().rev().take_while(|l| is_empty(l)).count();
    let content = &lines[..lines.len() - trailing_blanks];

    let body = match header.style {
        BlockStyle::Literal => literal_body(content, column),
        BlockStyle::Folded => folded_body(content),
    };

    match header.chomping {
        Chomping::Strip | Chomping::Clip => body,
        Chomping::Keep => {
            let mut text = body;
            text.push('\n');
            text.extend(std::iter::repeat_n('\n', trailing_blanks));
            text
        }
    }
}

/// Lines keep their text after up to `column` bytes of indentation are removed.
fn literal_body(lines: &[Line<'_>], column: usize) -> String {
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&line.raw[line.indent.min(column)..]);
    }
    out
}

/// Non-blank lines joined by single spaces; each blank line becomes a newline.
fn folded_body(lines: &[Line<'_>]) -> String {
    let mut out = String::new();
    for line in lines {
        let text = line.raw.trim();
        if text.is_empty() {
            out.truncate(out.trim_end_matches([' ', '\t']).len());
            out.push('\n');
        } else {
            out.push_str(text);
            out.push(' ');
        }
    }
    out.truncate(out.trim_end_matches([' ', '\t']).len());
    out
}

/// True when a flow sequence opened on this line is not closed yet.
///
/// Applies to lines starting with `[` and to `key: [` lines.
pub(crate) fn needs_next_line(line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() || line.ends_with(']') {
        return false;
    }
    if line.starts_with('[') {
        return true;
    }
    match line.find(':') {
        Some(colon) if colon > 0 => line[colon + 1..].trim_start().starts_with('['),
        _ => false,
    }
}
