//! Line scanner: turns raw input into indented lines.
//!
//! Line endings are normalized (`\r\n` and lone `\r` both become `\n`) and a
//! leading byte order mark is dropped, so column and line numbers reported in
//! errors refer to what a text editor shows.

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use encoding_rs_io::DecodeReaderBytesBuilder;

use crate::error::Error;

/// One physical input line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Line<'a> {
    /// 1-based line number.
    pub(crate) number: usize,
    /// Width of the leading whitespace (spaces and tabs), in bytes.
    pub(crate) indent: usize,
    /// The whole line, indentation included, without the line terminator.
    pub(crate) raw: &'a str,
}

impl<'a> Line<'a> {
    fn new(number: usize, raw: &'a str) -> Self {
        Self {
            number,
            indent: leading_whitespace(raw),
            raw,
        }
    }

    /// The line with indentation removed.
    pub(crate) fn content(&self) -> &'a str {
        &self.raw[self.indent..]
    }

    pub(crate) fn is_blank(&self) -> bool {
        self.raw.trim().is_empty()
    }

    /// Comment lines and the `---` marker carry no data.
    pub(crate) fn is_ignorable(&self) -> bool {
        let content = self.content();
        content.starts_with('#') || content.trim() == "---" || self.is_blank()
    }
}

pub(crate) fn leading_whitespace(text: &str) -> usize {
    text.bytes().take_while(|b| *b == b' ' || *b == b'\t').count()
}

/// Normalize line endings and strip a leading BOM.
pub(crate) fn normalize(input: &str) -> Cow<'_, str> {
    let input = input.strip_prefix('\u{FEFF}').unwrap_or(input);
    if input.contains('\r') {
        Cow::Owned(input.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(input)
    }
}

/// Split normalized text into numbered lines. A final newline does not start an extra line.
pub(crate) fn split_lines(text: &str) -> Vec<Line<'_>> {
    text.split_terminator('\n')
        .enumerate()
        .map(|(i, raw)| Line::new(i + 1, raw))
        .collect()
}

/// Read a whole file, decoding UTF-8 or UTF-16 (BOM sniffed) into a `String`.
pub(crate) fn read_file(path: &Path) -> Result<String, Error> {
    let file = File::open(path).map_err(|cause| match cause.kind() {
        io::ErrorKind::NotFound => Error::NotFound {
            path: path.to_path_buf(),
        },
        _ => Error::ReadFailure {
            path: path.to_path_buf(),
            cause,
        },
    })?;

    // `None` sniffs the BOM and falls back to UTF-8.
    let mut decoder = DecodeReaderBytesBuilder::new().encoding(None).build(file);
    let mut text = String::new();
    decoder
        .read_to_string(&mut text)
        .map_err(|cause| Error::ReadFailure {
            path: path.to_path_buf(),
            cause,
        })?;
    log::debug!("read {} bytes from {}", text.len(), path.display());
    Ok(text)
}
