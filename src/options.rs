use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::budget::{Budget, BudgetReport};

/// Duplicate key handling policy for mappings.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuplicateKeyPolicy {
    /// Error out on encountering a duplicate key.
    Error,
    /// First key wins: later duplicates are skipped.
    FirstWins,
    /// Last key wins: a later duplicate replaces the value, keeping the key's position.
    LastWins,
}

/// What to do with `*name` when no anchor `&name` has been committed yet.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnresolvedAliasPolicy {
    /// Fail the load with [`crate::Error::UnresolvedAlias`].
    Error,
    /// Log a warning and store `Null` in place of the alias.
    Null,
}

/// Loader configuration options.
///
/// Use this to configure duplicate-key and unresolved-alias policies and the
/// per-load [`Budget`].
///
/// ```rust
/// use mince_yaml::options::DuplicateKeyPolicy;
///
/// let options = mince_yaml::options! {
///     budget: Some(mince_yaml::budget! {
///         max_lines: 100,
///     }),
///     duplicate_keys: DuplicateKeyPolicy::FirstWins,
/// };
///
/// let v = mince_yaml::load_with_options("a: 1\na: 2\n", options).unwrap();
/// assert_eq!(v["a"].as_i64(), Some(1));
/// ```
#[derive(Clone)]
pub struct Options {
    /// Resource limits enforced while loading. `None` disables enforcement.
    pub budget: Option<Budget>,
    /// Optional callback invoked with the final budget report, both on success and
    /// when the budget was breached.
    pub budget_report: Option<fn(&BudgetReport)>,
    /// Closure form of [`Options::budget_report`]; see [`Options::with_budget_report`].
    pub budget_report_cb: Option<BudgetReportCallback>,
    /// Policy for keys repeated within one mapping. Default: [`DuplicateKeyPolicy::LastWins`].
    pub duplicate_keys: DuplicateKeyPolicy,
    /// Policy for aliases without a matching anchor. Default: [`UnresolvedAliasPolicy::Error`].
    pub unresolved_aliases: UnresolvedAliasPolicy,
}

pub type BudgetReportCallback = Rc<std::cell::RefCell<dyn FnMut(BudgetReport) + 'static>>;

impl Options {
    /// Registers a budget-report callback. Any closure can be used, including ones that
    /// capture state from the surrounding scope.
    ///
    /// ```rust
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    ///
    /// let seen = Rc::new(Cell::new(0));
    /// let sink = seen.clone();
    /// let options = mince_yaml::Options::default()
    ///     .with_budget_report(move |report| sink.set(report.lines));
    /// mince_yaml::load_with_options("a: 1\nb: 2\n", options).unwrap();
    /// assert_eq!(seen.get(), 2);
    /// ```
    pub fn with_budget_report<F>(mut self, cb: F) -> Self
    where
        F: FnMut(BudgetReport) + 'static,
    {
        self.budget_report_cb = Some(Rc::new(std::cell::RefCell::new(cb)));
        self
    }

    pub(crate) fn deliver_report(&self, report: &BudgetReport) {
        if let Some(hook) = self.budget_report {
            hook(report);
        }
        if let Some(cb) = &self.budget_report_cb {
            (cb.borrow_mut())(report.clone());
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            budget: Some(Budget::default()),
            budget_report: None,
            budget_report_cb: None,
            duplicate_keys: DuplicateKeyPolicy::LastWins,
            unresolved_aliases: UnresolvedAliasPolicy::Error,
        }
    }
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("budget", &self.budget)
            .field("budget_report", &self.budget_report)
            .field(
                "budget_report_cb",
                &if self.budget_report_cb.is_some() { "set" } else { "none" },
            )
            .field("duplicate_keys", &self.duplicate_keys)
            .field("unresolved_aliases", &self.unresolved_aliases)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_default() {
        let opts = Options::default();
        assert!(opts.budget.is_some());
        assert!(opts.budget_report.is_none());
        assert!(opts.budget_report_cb.is_none());
        assert_eq!(opts.duplicate_keys, DuplicateKeyPolicy::LastWins);
        assert_eq!(opts.unresolved_aliases, UnresolvedAliasPolicy::Error);
    }

    #[test]
    fn test_options_debug_format() {
        let opts = Options::default();
        let debug_str = format!("{:?}", opts);
        assert!(debug_str.contains("Options"));
        assert!(debug_str.contains("budget_report_cb: \"none\""));

        let opts_with_cb = opts.with_budget_report(|_| {});
        let debug_str_cb = format!("{:?}", opts_with_cb);
        assert!(debug_str_cb.contains("budget_report_cb: \"set\""));
    }
}
