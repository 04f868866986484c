//! Defines error and its location
use std::fmt;
use std::path::PathBuf;

use serde::de;

use crate::budget::BudgetBreach;
use crate::location::Location;

/// Error type for loading, file access and typed conversion.
///
/// Dumping never fails, so there is no serializer counterpart.
#[derive(Debug)]
pub enum Error {
    /// Free-form error with optional source location (serde and manifest type errors).
    Message { msg: String, location: Location },
    /// The document mixes positional (`- item`) and named (`key: value`) entries at the root.
    InconsistentRootKeys { location: Location },
    /// `*name` refers to an anchor that was never defined (or not yet committed).
    UnresolvedAlias { name: String, location: Location },
    /// A key appeared twice in one mapping while duplicates are rejected.
    DuplicateKey { key: String, location: Location },
    /// A budget limit was exceeded.
    Budget {
        breach: BudgetBreach,
        location: Location,
    },
    /// The file passed to `load_file` does not exist.
    NotFound { path: PathBuf },
    /// The file exists but could not be read or decoded.
    ReadFailure {
        path: PathBuf,
        cause: std::io::Error,
    },
}

impl Error {
    /// Construct a `Message` error with no known location.
    pub(crate) fn msg<S: Into<String>>(s: S) -> Self {
        Error::Message {
            msg: s.into(),
            location: Location::UNKNOWN,
        }
    }

    /// Attach/override a concrete location to this error and return it.
    ///
    /// File errors do not carry a location and are returned unchanged.
    pub(crate) fn with_location(mut self, set_location: Location) -> Self {
        match &mut self {
            Error::Message { location, .. }
            | Error::InconsistentRootKeys { location }
            | Error::UnresolvedAlias { location, .. }
            | Error::DuplicateKey { location, .. }
            | Error::Budget { location, .. } => {
                *location = set_location;
            }
            Error::NotFound { .. } | Error::ReadFailure { .. } => {}
        }
        self
    }

    /// If the error has a known location, return it.
    pub fn location(&self) -> Option<Location> {
        match self {
            Error::Message { location, .. }
            | Error::InconsistentRootKeys { location }
            | Error::UnresolvedAlias { location, .. }
            | Error::DuplicateKey { location, .. }
            | Error::Budget { location, .. } => {
                if location.is_known() {
                    Some(*location)
                } else {
                    None
                }
            }
            Error::NotFound { .. } | Error::ReadFailure { .. } => None,
        }
    }

    /// Render this error against the text it was produced from.
    ///
    /// Errors with a location inside `source` get a small annotated excerpt around the
    /// offending line; everything else falls back to the plain `Display` text.
    ///
    /// ```
    /// let yaml = "a: 1\nb: *missing\n";
    /// let err = mince_yaml::load(yaml).unwrap_err();
    /// let rendered = err.render(yaml);
    /// assert!(rendered.contains("missing"));
    /// assert!(rendered.contains("b: *missing"));
    /// ```
    pub fn render(&self, source: &str) -> String {
        self.render_with_path(source, "<input>")
    }

    /// Like [`Error::render`], with a file name shown in the excerpt header.
    pub fn render_with_path(&self, source: &str, path: &str) -> String {
        match self.location() {
            Some(location) => crate::snippet::render(source, path, &self.message(), &location)
                .unwrap_or_else(|| self.to_string()),
            None => self.to_string(),
        }
    }

    /// The message text without the location suffix.
    fn message(&self) -> String {
        match self {
            Error::Message { msg, .. } => msg.clone(),
            Error::InconsistentRootKeys { .. } => {
                "document root mixes sequence items and mapping keys".to_owned()
            }
            Error::UnresolvedAlias { name, .. } => {
                format!("alias *{name} does not refer to a known anchor")
            }
            Error::DuplicateKey { key, .. } => format!("duplicate mapping key: {key}"),
            Error::Budget { breach, .. } => format!("budget breached: {breach}"),
            Error::NotFound { path } => format!("file not found: {}", path.display()),
            Error::ReadFailure { path, cause } => {
                format!("failed to read {}: {cause}", path.display())
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location() {
            Some(location) => fmt_with_location(f, &self.message(), &location),
            None => f.write_str(&self.message()),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ReadFailure { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

impl de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::msg(msg.to_string())
    }
}

/// Print a message optionally suffixed with "at line X, column Y".
fn fmt_with_location(f: &mut fmt::Formatter<'_>, msg: &str, location: &Location) -> fmt::Result {
    if location.is_known() {
        write!(
            f,
            "{msg} at line {}, column {}",
            location.line, location.column
        )
    } else {
        write!(f, "{msg}")
    }
}

/// Convert a budget breach report into a user-facing error.
pub(crate) fn budget_error(breach: BudgetBreach) -> Error {
    Error::Budget {
        breach,
        location: Location::UNKNOWN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_appends_known_location() {
        let err = Error::UnresolvedAlias {
            name: "base".into(),
            location: Location::new(3, 4),
        };
        assert_eq!(
            err.to_string(),
            "alias *base does not refer to a known anchor at line 3, column 4"
        );
    }

    #[test]
    fn with_location_leaves_file_errors_alone() {
        let err = Error::NotFound {
            path: PathBuf::from("missing.yml"),
        }
        .with_location(Location::new(1, 1));
        assert!(err.location().is_none());
        assert_eq!(err.to_string(), "file not found: missing.yml");
    }

    #[test]
    fn serde_custom_has_no_location() {
        let err = <Error as de::Error>::custom("boom");
        assert!(err.location().is_none());
        assert_eq!(err.to_string(), "boom");
    }
}
