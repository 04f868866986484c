//! Loader and dumper for a small, forgiving YAML subset used by build manifests.
//!
//! The subset covers indentation-nested mappings and sequences, flow collections,
//! quoted and block scalars, comments, anchors, aliases and merge keys. Scalars are
//! typed heuristically: `yes` is a boolean, `12` an integer, `007` stays text.
//!
//! ```rust
//! use mince_yaml::{Value, dump, load};
//!
//! let v = load("minify:\n  - a.js\n  - b.js\nlevel: 2\n").unwrap();
//! assert_eq!(v["minify"][0].as_str(), Some("a.js"));
//! assert_eq!(v["level"], Value::Int(2));
//! assert_eq!(load(&dump(&v)).unwrap(), v);
//! ```

use std::path::Path;

pub use crate::budget::{Budget, BudgetBreach, BudgetReport, check_budget};
pub use crate::de::from_value;
pub use crate::error::Error;
pub use crate::location::Location;
pub use crate::manifest::{Combine, Manifest};
pub use crate::options::Options;
pub use crate::serializer_options::DumpOptions;
pub use crate::value::{Key, Mapping, Value, ValueIndex};

mod anchors;
mod block;
pub mod budget;
mod builder;
mod classify;
mod de;
mod error;
mod loader;
mod location;
mod macros;
mod manifest;
pub mod options;
mod parse_scalars;
mod scanner;
mod ser;
mod ser_quoting;
mod serializer_options;
mod snippet;
mod value;
mod wrapping;
mod zmij_format;

/// Load `text` with default [`Options`].
///
/// An empty document (or one holding only comments) loads as an empty mapping.
pub fn load(text: &str) -> Result<Value, Error> {
    load_with_options(text, Options::default())
}

/// Load `text` with explicit options.
///
/// ```rust
/// use mince_yaml::{Error, options::DuplicateKeyPolicy};
///
/// let options = mince_yaml::options! { duplicate_keys: DuplicateKeyPolicy::Error };
/// let err = mince_yaml::load_with_options("a: 1\na: 2\n", options).unwrap_err();
/// assert!(matches!(err, Error::DuplicateKey { .. }));
/// ```
pub fn load_with_options(text: &str, options: Options) -> Result<Value, Error> {
    loader::Loader::new(options).run(text).result
}

/// Read and decode a file the way [`load_file`] does, without parsing it.
///
/// UTF-8 and UTF-16 (with a byte order mark) are accepted.
pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String, Error> {
    scanner::read_file(path.as_ref())
}

/// Load a whole file with default [`Options`].
///
/// Fails with [`Error::NotFound`] when the file does not exist and with
/// [`Error::ReadFailure`] when it cannot be read or decoded.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Value, Error> {
    load_file_with_options(path, Options::default())
}

/// Load a whole file with explicit options.
pub fn load_file_with_options<P: AsRef<Path>>(path: P, options: Options) -> Result<Value, Error> {
    let text = read_to_string(path.as_ref())?;
    log::debug!("loading {} ({} bytes)", path.as_ref().display(), text.len());
    load_with_options(&text, options)
}

/// Dump `value` with default [`DumpOptions`].
pub fn dump(value: &Value) -> String {
    dump_with_options(value, DumpOptions::default())
}

/// Dump `value` with explicit options.
pub fn dump_with_options(value: &Value, options: DumpOptions) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = dump_to_fmt_writer(&mut out, value, options);
    out
}

/// Dump `value` into any [`std::fmt::Write`]; only the writer's own errors are returned.
pub fn dump_to_fmt_writer<W: std::fmt::Write>(
    out: &mut W,
    value: &Value,
    options: DumpOptions,
) -> std::fmt::Result {
    ser::Dumper::new(out, options).write_document(value)
}

/// Load `text` and deserialize it into `T`.
///
/// ```rust
/// use std::collections::BTreeMap;
///
/// let m: BTreeMap<String, Vec<String>> =
///     mince_yaml::from_str("combine:\n  - a.css\n  - b.css\n").unwrap();
/// assert_eq!(m["combine"], vec!["a.css", "b.css"]);
/// ```
pub fn from_str<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, Error> {
    from_value(load(text)?)
}

/// Like [`from_str`], with explicit options.
pub fn from_str_with_options<T: serde::de::DeserializeOwned>(
    text: &str,
    options: Options,
) -> Result<T, Error> {
    from_value(load_with_options(text, options)?)
}
