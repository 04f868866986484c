//! Annotated source excerpts for error reporting.

use annotate_snippets::{
    AnnotationKind, Level, Renderer, Snippet as AnnotateSnippet, renderer::DecorStyle,
};

use crate::location::Location;

/// Lines of context shown above and below the offending line.
const CONTEXT_LINES: usize = 2;

/// Render `msg` as an excerpt of `text` pointing at `location`.
///
/// Returns `None` when the location is unknown or falls outside `text`, so the caller
/// can fall back to the plain message.
#[cold]
#[inline(never)]
pub(crate) fn render(text: &str, path: &str, msg: &str, location: &Location) -> Option<String> {
    if !location.is_known() {
        return None;
    }
    // Line numbers are counted after the BOM is dropped.
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);

    let row = location.line as usize;
    let col = location.column as usize;

    let starts = line_starts(text);
    if row == 0 || row > starts.len() {
        return None;
    }
    let start = line_col_to_byte_offset(text, &starts, row, col)?;

    // One character under the caret, or an empty span at end of line.
    let end = match text.as_bytes().get(start) {
        Some(b'\n') | Some(b'\r') | None => start,
        _ => next_char_boundary(text, start).unwrap_or(start),
    };

    let total_lines = starts.len();
    let window_start_row = row.saturating_sub(CONTEXT_LINES).max(1);
    let window_end_row = row.saturating_add(CONTEXT_LINES).min(total_lines);

    let window_start = starts[window_start_row - 1];
    let window_end = if window_end_row < total_lines {
        starts[window_end_row]
    } else {
        text.len()
    };
    let window_text = &text[window_start..window_end];
    let local_start = start.saturating_sub(window_start).min(window_text.len());
    let local_end = end.saturating_sub(window_start).min(window_text.len());

    let report = &[Level::ERROR
        .primary_title(format!("line {row} column {col}: {msg}"))
        .element(
            AnnotateSnippet::source(window_text)
                .line_start(window_start_row)
                .path(path)
                .fold(false)
                .annotation(
                    AnnotationKind::Primary
                        .span(local_start..local_end)
                        .label(msg),
                ),
        )];

    // Plain ASCII output keeps messages stable and free of escape sequences.
    let renderer = Renderer::plain().decor_style(DecorStyle::Ascii);
    Some(renderer.render(report).to_string())
}

/// Byte offsets at which each line of `text` starts.
fn line_starts(text: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (i, b) in text.bytes().enumerate() {
        if b == b'\n' && i + 1 < text.len() {
            starts.push(i + 1);
        }
    }
    starts
}

/// Convert a 1-based (row, character column) pair into a byte offset.
fn line_col_to_byte_offset(text: &str, starts: &[usize], row: usize, col: usize) -> Option<usize> {
    let line_start = *starts.get(row - 1)?;
    let line_end = starts.get(row).copied().unwrap_or(text.len());
    let line = &text[line_start..line_end];
    match line.char_indices().nth(col.saturating_sub(1)) {
        Some((i, _)) => Some(line_start + i),
        // Column past the last character: point at the line end.
        None => Some(line_end),
    }
}

fn next_char_boundary(text: &str, start: usize) -> Option<usize> {
    text.get(start..)?
        .chars()
        .next()
        .map(|ch| start + ch.len_utf8())
}
