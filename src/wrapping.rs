//! Block scalar bodies for the dumper.

use std::fmt::Write;

/// Byte offsets of spaces where a folded block may break the line.
///
/// Only a single ASCII space between two non-blank characters qualifies. The loader
/// joins folded lines with exactly one space after trimming them, so breaking anywhere
/// else would change the text.
pub(crate) fn break_points(s: &str) -> impl Iterator<Item = usize> + '_ {
    let bytes = s.as_bytes();
    bytes.iter().enumerate().filter_map(move |(i, &b)| {
        let inside = i > 0 && i + 1 < bytes.len();
        (b == b' '
            && inside
            && !bytes[i - 1].is_ascii_whitespace()
            && !bytes[i + 1].is_ascii_whitespace())
        .then_some(i)
    })
}

/// Greedy word wrap: lines of at most `wrap_col` characters where possible. A word
/// longer than `wrap_col` gets a line of its own.
pub(crate) fn wrap_words(s: &str, wrap_col: usize) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut line_start = 0;
    let mut line_chars = 0;
    let mut word_start = 0;

    let mut words: Vec<(usize, usize)> = Vec::new();
    for space in break_points(s) {
        words.push((word_start, space));
        word_start = space + 1;
    }
    words.push((word_start, s.len()));

    for (start, end) in words {
        let word_chars = s[start..end].chars().count();
        if line_chars == 0 {
            line_start = start;
            line_chars = word_chars;
        } else if line_chars + 1 + word_chars <= wrap_col {
            line_chars += 1 + word_chars;
        } else {
            lines.push(&s[line_start..start - 1]);
            line_start = start;
            line_chars = word_chars;
        }
    }
    lines.push(&s[line_start..]);
    lines
}

/// Write a folded block body, one wrapped line per row, each indented by `indent` spaces.
pub(crate) fn write_folded_block<W: Write>(
    out: &mut W,
    s: &str,
    indent: usize,
    wrap_col: usize,
) -> std::fmt::Result {
    for line in wrap_words(s, wrap_col) {
        write_spaces(out, indent)?;
        out.write_str(line)?;
        out.write_char('\n')?;
    }
    Ok(())
}

/// Write a literal block body. Blank lines are written empty.
///
/// A text ending with a newline loses that newline here; the caller marks the header
/// with `+` so the loader restores it.
pub(crate) fn write_literal_block<W: Write>(
    out: &mut W,
    s: &str,
    indent: usize,
) -> std::fmt::Result {
    let body = s.strip_suffix('\n').unwrap_or(s);
    for line in body.split('\n') {
        if !line.is_empty() {
            write_spaces(out, indent)?;
            out.write_str(line)?;
        }
        out.write_char('\n')?;
    }
    Ok(())
}

pub(crate) fn write_spaces<W: Write>(out: &mut W, n: usize) -> std::fmt::Result {
    for _ in 0..n {
        out.write_char(' ')?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breaks_only_at_single_spaces() {
        let points: Vec<usize> = break_points("a b  c d\te").collect();
        assert_eq!(points, vec![1, 6]);
    }

    #[test]
    fn wraps_greedily() {
        assert_eq!(
            wrap_words("hello world again", 11),
            vec!["hello world", "again"]
        );
        assert_eq!(wrap_words("tiny", 2), vec!["tiny"]);
        assert_eq!(
            wrap_words("averyveryverylongword b", 5),
            vec!["averyveryverylongword", "b"]
        );
    }

    #[test]
    fn folded_block_lines_are_indented() {
        let mut out = String::new();
        write_folded_block(&mut out, "hello world", 2, 8).unwrap();
        assert_eq!(out, "  hello\n  world\n");
    }

    #[test]
    fn literal_block_keeps_blank_lines_empty() {
        let mut out = String::new();
        write_literal_block(&mut out, "a\n\nb\n", 4).unwrap();
        assert_eq!(out, "    a\n\n    b\n");
    }
}
