//! Per-load resource budget.
//!
//! The loader reports every line, nesting level, anchor, alias expansion, merge key and
//! scalar it handles to a [`BudgetEnforcer`], which stops the load as soon as a limit is
//! exceeded. This keeps hostile inputs (alias bombs, absurd nesting, huge scalars) from
//! exhausting memory or CPU.

use std::fmt;

use ahash::AHashSet;

use crate::error::Error;
use crate::value::{Key, Mapping, Value};

/// Budgets for a single `load` call.
///
/// The defaults are permissive for typical configuration files while stopping
/// obviously resource-amplifying inputs.
///
/// ```rust
/// use mince_yaml::{Budget, Options};
///
/// let yaml = "minify:\n  - a.js\n  - b.js\n";
///
/// let mut options = Options::default();
/// options.budget = Some(Budget::default());
///
/// let v = mince_yaml::load_with_options(yaml, options).unwrap();
/// assert_eq!(v["minify"][1].as_str(), Some("b.js"));
/// ```
#[derive(Clone, Debug)]
pub struct Budget {
    /// Maximum number of physical input lines.
    ///
    /// Default: 1,000,000
    pub max_lines: usize,
    /// Maximum length of the path stack (structural nesting depth).
    ///
    /// Default: 2,000
    pub max_depth: usize,
    /// Maximum number of anchor (`&name`) definitions.
    ///
    /// Default: 50,000
    pub max_anchors: usize,
    /// Maximum number of alias (`*name`) references.
    ///
    /// Default: 50,000
    pub max_aliases: usize,
    /// Maximum total number of nodes copied by alias expansion.
    ///
    /// Default: 1,000,000
    pub max_alias_nodes: usize,
    /// Maximum number of merge keys (`<<`).
    ///
    /// Default: 10,000
    pub max_merge_keys: usize,
    /// Maximum total bytes of scalar text, block scalars included.
    ///
    /// Default: 67,108,864 (64 MiB)
    pub max_total_scalar_bytes: usize,
    /// If `true`, reject documents that use far more aliases than anchors.
    ///
    /// Default: true
    pub enforce_alias_anchor_ratio: bool,
    /// Minimum number of aliases before the ratio heuristic is evaluated.
    ///
    /// Default: 100
    pub alias_anchor_min_aliases: usize,
    /// A breach occurs when `aliases > alias_anchor_ratio_multiplier * anchors`.
    ///
    /// Default: 10
    pub alias_anchor_ratio_multiplier: usize,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            max_lines: 1_000_000,
            max_depth: 2_000,
            max_anchors: 50_000,
            max_aliases: 50_000,
            max_alias_nodes: 1_000_000,
            max_merge_keys: 10_000,
            max_total_scalar_bytes: 64 * 1024 * 1024,
            enforce_alias_anchor_ratio: true,
            alias_anchor_min_aliases: 100,
            alias_anchor_ratio_multiplier: 10,
        }
    }
}

/// What tripped the budget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BudgetBreach {
    /// More input lines than [`Budget::max_lines`].
    Lines { lines: usize },
    /// Path stack deeper than [`Budget::max_depth`].
    Depth { depth: usize },
    /// More anchor definitions than [`Budget::max_anchors`].
    Anchors { anchors: usize },
    /// More alias references than [`Budget::max_aliases`].
    Aliases { aliases: usize },
    /// Alias expansion copied more nodes than [`Budget::max_alias_nodes`].
    AliasNodes { nodes: usize },
    /// More merge keys than [`Budget::max_merge_keys`].
    MergeKeys { merge_keys: usize },
    /// Scalar text exceeded [`Budget::max_total_scalar_bytes`].
    ScalarBytes { total_scalar_bytes: usize },
    /// Aliases outnumber anchors beyond [`Budget::alias_anchor_ratio_multiplier`].
    AliasAnchorRatio { aliases: usize, anchors: usize },
}

impl fmt::Display for BudgetBreach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetBreach::Lines { lines } => write!(f, "too many lines ({lines})"),
            BudgetBreach::Depth { depth } => write!(f, "nesting too deep ({depth})"),
            BudgetBreach::Anchors { anchors } => write!(f, "too many anchors ({anchors})"),
            BudgetBreach::Aliases { aliases } => write!(f, "too many aliases ({aliases})"),
            BudgetBreach::AliasNodes { nodes } => {
                write!(f, "alias expansion copied too many nodes ({nodes})")
            }
            BudgetBreach::MergeKeys { merge_keys } => {
                write!(f, "too many merge keys ({merge_keys})")
            }
            BudgetBreach::ScalarBytes { total_scalar_bytes } => {
                write!(f, "scalar text too large ({total_scalar_bytes} bytes)")
            }
            BudgetBreach::AliasAnchorRatio { aliases, anchors } => {
                write!(f, "{aliases} aliases for {anchors} anchors")
            }
        }
    }
}

/// Summary of a load (even if no breach).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BudgetReport {
    /// `Some(..)` if a limit was exceeded.
    pub breached: Option<BudgetBreach>,
    /// Physical lines seen.
    pub lines: usize,
    /// Deepest path stack reached.
    pub max_depth: usize,
    /// Distinct anchor names defined.
    pub anchors: usize,
    /// Alias references resolved.
    pub aliases: usize,
    /// Nodes copied by alias expansion.
    pub alias_nodes: usize,
    /// Merge keys applied.
    pub merge_keys: usize,
    /// Sum of scalar text lengths in bytes, saturating.
    pub total_scalar_bytes: usize,
}

impl BudgetReport {
    /// The report as a mapping, ready to be dumped next to the document.
    pub fn to_value(&self) -> Value {
        let count = |n: usize| Value::Int(i64::try_from(n).unwrap_or(i64::MAX));
        let mut m = Mapping::new();
        m.insert(
            Key::from("breached"),
            match &self.breached {
                Some(breach) => Value::String(breach.to_string()),
                None => Value::Null,
            },
        );
        m.insert(Key::from("lines"), count(self.lines));
        m.insert(Key::from("max_depth"), count(self.max_depth));
        m.insert(Key::from("anchors"), count(self.anchors));
        m.insert(Key::from("aliases"), count(self.aliases));
        m.insert(Key::from("alias_nodes"), count(self.alias_nodes));
        m.insert(Key::from("merge_keys"), count(self.merge_keys));
        m.insert(Key::from("total_scalar_bytes"), count(self.total_scalar_bytes));
        Value::Mapping(m)
    }
}

/// Stateful helper that enforces a [`Budget`] while the loader walks the input.
#[derive(Debug)]
pub(crate) struct BudgetEnforcer {
    budget: Budget,
    report: BudgetReport,
    defined_anchors: AHashSet<String>,
}

impl BudgetEnforcer {
    pub(crate) fn new(budget: Budget) -> Self {
        Self {
            budget,
            report: BudgetReport::default(),
            defined_anchors: AHashSet::with_capacity(64),
        }
    }

    pub(crate) fn observe_line(&mut self) -> Result<(), BudgetBreach> {
        self.report.lines += 1;
        if self.report.lines > self.budget.max_lines {
            return Err(BudgetBreach::Lines {
                lines: self.report.lines,
            });
        }
        Ok(())
    }

    pub(crate) fn observe_depth(&mut self, depth: usize) -> Result<(), BudgetBreach> {
        if depth > self.report.max_depth {
            self.report.max_depth = depth;
        }
        if self.report.max_depth > self.budget.max_depth {
            return Err(BudgetBreach::Depth {
                depth: self.report.max_depth,
            });
        }
        Ok(())
    }

    pub(crate) fn record_anchor(&mut self, name: &str) -> Result<(), BudgetBreach> {
        if self.defined_anchors.insert(name.to_owned()) {
            let count = self.defined_anchors.len();
            self.report.anchors = count;
            if count > self.budget.max_anchors {
                return Err(BudgetBreach::Anchors { anchors: count });
            }
        }
        Ok(())
    }

    /// Count one alias reference that copies `nodes` nodes.
    pub(crate) fn record_alias(&mut self, nodes: usize) -> Result<(), BudgetBreach> {
        self.report.aliases += 1;
        if self.report.aliases > self.budget.max_aliases {
            return Err(BudgetBreach::Aliases {
                aliases: self.report.aliases,
            });
        }
        self.report.alias_nodes = self.report.alias_nodes.saturating_add(nodes);
        if self.report.alias_nodes > self.budget.max_alias_nodes {
            return Err(BudgetBreach::AliasNodes {
                nodes: self.report.alias_nodes,
            });
        }
        Ok(())
    }

    pub(crate) fn record_merge(&mut self) -> Result<(), BudgetBreach> {
        self.report.merge_keys += 1;
        if self.report.merge_keys > self.budget.max_merge_keys {
            return Err(BudgetBreach::MergeKeys {
                merge_keys: self.report.merge_keys,
            });
        }
        Ok(())
    }

    pub(crate) fn record_scalar(&mut self, len: usize) -> Result<(), BudgetBreach> {
        self.report.total_scalar_bytes = self.report.total_scalar_bytes.saturating_add(len);
        if self.report.total_scalar_bytes > self.budget.max_total_scalar_bytes {
            return Err(BudgetBreach::ScalarBytes {
                total_scalar_bytes: self.report.total_scalar_bytes,
            });
        }
        Ok(())
    }

    /// Consume the enforcer after a breach was already detected.
    pub(crate) fn into_report(mut self, breach: BudgetBreach) -> BudgetReport {
        self.report.breached = Some(breach);
        self.report
    }

    /// Finish a successful walk, applying the alias/anchor ratio heuristic.
    pub(crate) fn finalize(mut self) -> BudgetReport {
        if self.budget.enforce_alias_anchor_ratio
            && self.report.aliases >= self.budget.alias_anchor_min_aliases
            && (self.report.anchors == 0
                || self.report.aliases
                    > self
                        .budget
                        .alias_anchor_ratio_multiplier
                        .saturating_mul(self.report.anchors))
        {
            self.report.breached = Some(BudgetBreach::AliasAnchorRatio {
                aliases: self.report.aliases,
                anchors: self.report.anchors,
            });
        }
        self.report
    }
}

/// Load `input` under `budget` and return the resulting report.
///
/// Returns:
/// - `Ok(report)`: `report.breached.is_none()` means **within budget**.
/// - `Err(Error)`: the text failed to load for a reason other than the budget.
///
/// ```rust
/// use mince_yaml::{Budget, BudgetBreach, check_budget};
///
/// let mut budget = Budget::default();
/// budget.max_aliases = 1;
/// let report = check_budget("a: &x 1\nb: *x\nc: *x\n", &budget).unwrap();
/// assert!(matches!(report.breached, Some(BudgetBreach::Aliases { .. })));
/// ```
pub fn check_budget(input: &str, budget: &Budget) -> Result<BudgetReport, Error> {
    let outcome = crate::loader::Loader::new(crate::Options {
        budget: Some(budget.clone()),
        ..crate::Options::default()
    })
    .run(input);
    match outcome.result {
        Ok(_) | Err(Error::Budget { .. }) => Ok(outcome.report.unwrap_or_default()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiny_yaml_ok() {
        let report = check_budget("a: [1, 2, 3]\n", &Budget::default()).unwrap();
        assert!(report.breached.is_none());
        assert_eq!(report.lines, 1);
        assert!(report.total_scalar_bytes > 0);
    }

    #[test]
    fn alias_bomb_trips_alias_limit() {
        let y = "root: &A [1, 2]\na: *A\nb: *A\nc: *A\nd: *A\ne: *A\n";
        let mut b = Budget::default();
        b.max_aliases = 3;
        let rep = check_budget(y, &b).unwrap();
        assert!(matches!(rep.breached, Some(BudgetBreach::Aliases { aliases: 4 })));
    }

    #[test]
    fn deep_nesting_trips_depth() {
        let mut y = String::new();
        for level in 0..50 {
            y.push_str(&" ".repeat(level));
            y.push_str("k:\n");
        }
        let mut b = Budget::default();
        b.max_depth = 20;
        let rep = check_budget(&y, &b).unwrap();
        assert!(matches!(rep.breached, Some(BudgetBreach::Depth { depth: 21 })));
    }

    #[test]
    fn anchors_limit_trips() {
        let y = "a: &A 1\nb: &B 2\nc: &C 3\n";
        let mut b = Budget::default();
        b.max_anchors = 2;
        let rep = check_budget(y, &b).unwrap();
        assert_eq!(rep.breached, Some(BudgetBreach::Anchors { anchors: 3 }));
    }

    #[test]
    fn merge_key_limit_trips() {
        let mut y = String::from("base: &B\n  k: 1\nitems:\n");
        for idx in 0..3 {
            y.push_str(&format!("  item{idx}:\n    <<: *B\n    extra: {idx}\n"));
        }
        let mut b = Budget::default();
        b.max_merge_keys = 2;
        let rep = check_budget(&y, &b).unwrap();
        assert_eq!(rep.breached, Some(BudgetBreach::MergeKeys { merge_keys: 3 }));
        assert_eq!(rep.merge_keys, 3);
    }

    #[test]
    fn scalar_bytes_trip() {
        let mut b = Budget::default();
        b.max_total_scalar_bytes = 8;
        let rep = check_budget("a: 0123456789abcdef\n", &b).unwrap();
        assert!(matches!(rep.breached, Some(BudgetBreach::ScalarBytes { .. })));
    }

    #[test]
    fn alias_anchor_ratio_trips_when_excessive() {
        let yaml = "root: &A [1]\na: *A\nb: *A\nc: *A\n";
        let mut budget = Budget::default();
        budget.alias_anchor_min_aliases = 1;
        budget.alias_anchor_ratio_multiplier = 2;
        let report = check_budget(yaml, &budget).unwrap();
        assert_eq!(
            report.breached,
            Some(BudgetBreach::AliasAnchorRatio {
                aliases: 3,
                anchors: 1
            })
        );
    }

    #[test]
    fn alias_anchor_ratio_respects_minimum_alias_threshold() {
        let yaml = "root: &A [1]\na: *A\nb: *A\nc: *A\n";
        let mut budget = Budget::default();
        budget.alias_anchor_min_aliases = 5;
        budget.alias_anchor_ratio_multiplier = 1;
        let report = check_budget(yaml, &budget).unwrap();
        assert!(report.breached.is_none());
        assert_eq!(report.aliases, 3);
        assert_eq!(report.anchors, 1);
    }

    #[test]
    fn report_renders_as_mapping() {
        let report = BudgetReport {
            lines: 3,
            ..BudgetReport::default()
        };
        let v = report.to_value();
        assert_eq!(v["lines"], Value::Int(3));
        assert!(v["breached"].is_null());
    }
}
