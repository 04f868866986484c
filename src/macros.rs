//! Public macros for constructing option structs without relying on struct literal syntax.
//!
//! Option structs may gain fields over time; building them from `Default` keeps call
//! sites compiling when that happens.

/// Construct [`crate::Options`] from `Default` and a list of field assignments.
///
/// ```rust
/// use mince_yaml::options::{DuplicateKeyPolicy, UnresolvedAliasPolicy};
///
/// let options = mince_yaml::options! {
///     duplicate_keys: DuplicateKeyPolicy::Error,
///     unresolved_aliases: UnresolvedAliasPolicy::Null,
/// };
/// assert!(options.budget.is_some());
/// ```
#[macro_export]
macro_rules! options {
    ( $( $field:ident : $value:expr ),* $(,)? ) => {{
        let mut opt = $crate::Options::default();
        $(
            opt.$field = $value;
        )*
        opt
    }};
}

/// Construct [`crate::Budget`] from `Default` and a list of field assignments.
///
/// ```rust
/// let budget = mince_yaml::budget! {
///     max_aliases: 10,
///     max_depth: 64,
/// };
/// assert_eq!(budget.max_aliases, 10);
/// ```
#[macro_export]
macro_rules! budget {
    ( $( $field:ident : $value:expr ),* $(,)? ) => {{
        let mut budget = $crate::Budget::default();
        $(
            budget.$field = $value;
        )*
        budget
    }};
}

/// Construct [`crate::DumpOptions`] from `Default` and a list of field assignments.
///
/// ```rust
/// let opts = mince_yaml::dump_options! {
///     indent_step: 4,
///     force_quotes: true,
/// };
/// assert_eq!(opts.wrap_column, 40);
/// ```
#[macro_export]
macro_rules! dump_options {
    ( $( $field:ident : $value:expr ),* $(,)? ) => {{
        let mut opt = $crate::DumpOptions::default();
        $(
            opt.$field = $value;
        )*
        opt
    }};
}
