//! Anchor table and merge-key handling.
//!
//! An anchor records *where* a value was stored, not the value itself. An alias
//! copies whatever lives at that path when the alias is read, so a value whose
//! children are added after the anchor line (the usual `base: &B` followed by
//! indented keys) is copied complete.

use ahash::AHashMap;

use crate::value::{Key, Mapping, Value};

/// Anchor name to tree path, valid for one load.
#[derive(Debug, Default)]
pub(crate) struct AnchorRegistry {
    paths: AHashMap<String, Vec<Key>>,
}

impl AnchorRegistry {
    /// Bind `name` to `path`. A redefined anchor points at its latest location.
    pub(crate) fn record(&mut self, name: &str, path: Vec<Key>) {
        log::trace!("anchor &{name} at {path:?}");
        self.paths.insert(name.to_owned(), path);
    }

    /// Deep copy of the subtree bound to `name`, read from `root` now.
    ///
    /// `None` when the anchor is unknown or its path no longer exists.
    pub(crate) fn resolve(&self, name: &str, root: &Value) -> Option<Value> {
        let path = self.paths.get(name)?;
        let value = root.at_path(path)?.clone();
        log::debug!("alias *{name} copies {} node(s)", value.node_count());
        Some(value)
    }
}

/// Merge `source` into `target` the way `<<` does.
///
/// Mapping entries are added only for keys `target` does not have yet. A
/// sequence of mappings is merged element by element, so earlier elements win.
/// Anything else cannot be merged and is skipped with a warning.
pub(crate) fn merge_into(target: &mut Mapping, source: Value) {
    match source {
        Value::Mapping(entries) => merge_mapping(target, entries),
        Value::Sequence(items) => {
            for item in items {
                match item {
                    Value::Mapping(entries) => merge_mapping(target, entries),
                    other => log::warn!(
                        "ignoring {} element in merge sequence; only mappings can be merged",
                        other.type_name()
                    ),
                }
            }
        }
        other => log::warn!(
            "ignoring merge of {}; only mappings can be merged",
            other.type_name()
        ),
    }
}

fn merge_mapping(target: &mut Mapping, entries: Mapping) {
    for (k, v) in entries {
        if !target.contains_key(&k) {
            target.insert(k, v);
        }
    }
}
