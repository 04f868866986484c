//! Source location utilities.

/// Row/column location within the source document (1-indexed, character-based).
///
/// # Example
///
/// ```
/// let err = mince_yaml::load("- a\nb: c\n").unwrap_err();
/// let loc = err.location().expect("root mismatch carries a location");
/// assert_eq!((loc.line(), loc.column()), (2, 1));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Location {
    /// 1-indexed row number in the input.
    pub(crate) line: u32,
    /// 1-indexed column number in the input.
    pub(crate) column: u32,
}

impl Location {
    /// Sentinel value meaning "location unknown".
    pub const UNKNOWN: Self = Self { line: 0, column: 0 };

    /// Create a new location record from 1-indexed coordinates.
    pub(crate) const fn new(line: usize, column: usize) -> Self {
        // Error reporting only; documents beyond 4G lines are not a concern.
        Self {
            line: line as u32,
            column: column as u32,
        }
    }

    #[inline]
    pub fn line(&self) -> u64 {
        self.line as u64
    }

    #[inline]
    pub fn column(&self) -> u64 {
        self.column as u64
    }

    #[inline]
    pub fn is_known(&self) -> bool {
        *self != Self::UNKNOWN
    }
}
