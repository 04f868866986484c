//! Tree builder: places classified lines into the result by indentation.
//!
//! The builder keeps a path stack of `(indent, key)` entries from the root to the
//! most recently inserted node. A new line at indentation `i` belongs under the
//! deepest entry indented less than `i`; the container is reached by walking the
//! stack from the root and is mutated in place.

use ahash::AHashSet;
use smallvec::SmallVec;

use crate::anchors;
use crate::error::Error;
use crate::location::Location;
use crate::options::DuplicateKeyPolicy;
use crate::value::{Key, Mapping, Value};

/// Where a value goes in its container.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Slot {
    /// Appended: next sequence index or next integer key.
    Positional,
    Named(Key),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EntryKind {
    Plain,
    /// A `key:` line whose value is filled by the lines below it. Sequence items
    /// at the same indentation may still attach to it.
    Open,
    /// Skipped duplicate; everything beneath it is dropped too.
    Discarded,
}

#[derive(Clone, Debug)]
struct PathEntry {
    indent: usize,
    key: Key,
    kind: EntryKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RootKind {
    Sequence,
    Mapping,
}

pub(crate) struct Builder {
    root: Value,
    root_kind: Option<RootKind>,
    path: SmallVec<[PathEntry; 16]>,
    duplicate_keys: DuplicateKeyPolicy,
    /// `(container path, key)` entries that came from `<<`; a written key replaces them.
    merged: AHashSet<(Vec<Key>, Key)>,
}

impl Builder {
    pub(crate) fn new(duplicate_keys: DuplicateKeyPolicy) -> Self {
        Self {
            root: Value::Mapping(Mapping::new()),
            root_kind: None,
            path: SmallVec::new(),
            duplicate_keys,
            merged: AHashSet::new(),
        }
    }

    pub(crate) fn root(&self) -> &Value {
        &self.root
    }

    pub(crate) fn depth(&self) -> usize {
        self.path.len()
    }

    pub(crate) fn finish(self) -> Value {
        self.root
    }

    /// Insert `value` for a line at `indent` and make it the newest path entry.
    ///
    /// `item` marks `- ...` lines, which may attach to an open `key:` at the same
    /// indentation. `open` marks `key:` lines awaiting children. Returns the full
    /// path of the stored value, or `None` when the line was dropped as a duplicate.
    pub(crate) fn add(
        &mut self,
        indent: usize,
        slot: Slot,
        value: Value,
        item: bool,
        open: bool,
    ) -> Result<Option<Vec<Key>>, Error> {
        self.unwind(indent, item);
        if self.is_discarding() {
            self.push_discarded(indent);
            return Ok(None);
        }

        let mut keys = self.parent_keys();
        let key = match self.insert(&keys, slot, value)? {
            Some(key) => key,
            None => {
                self.push_discarded(indent);
                return Ok(None);
            }
        };

        self.path.push(PathEntry {
            indent,
            key: key.clone(),
            kind: if open { EntryKind::Open } else { EntryKind::Plain },
        });
        keys.push(key);
        Ok(Some(keys))
    }

    /// Add every element of a line-level flow sequence positionally, without
    /// opening a path entry. Returns the container path.
    pub(crate) fn add_all(
        &mut self,
        indent: usize,
        items: Vec<Value>,
    ) -> Result<Option<Vec<Key>>, Error> {
        self.unwind(indent, false);
        if self.is_discarding() {
            return Ok(None);
        }
        let keys = self.parent_keys();
        for item in items {
            self.insert(&keys, Slot::Positional, item)?;
        }
        Ok(Some(keys))
    }

    /// Open `key` at `indent` below the newest entry, for `- key:` lines.
    pub(crate) fn schedule(&mut self, indent: usize, key: Key) {
        if self.is_discarding() {
            return;
        }
        self.path.push(PathEntry {
            indent,
            key,
            kind: EntryKind::Open,
        });
    }

    /// Merge `source` into the container of a `<<` line at `indent`.
    pub(crate) fn merge(&mut self, indent: usize, source: Value) -> Result<(), Error> {
        self.unwind(indent, false);
        if self.is_discarding() {
            return Ok(());
        }
        let keys = self.parent_keys();
        if keys.is_empty() {
            self.claim_root(RootKind::Mapping)?;
        }
        let container = self.container(&keys)?;
        let mut mapping = into_mapping(std::mem::take(container));
        let before = mapping.len();
        anchors::merge_into(&mut mapping, source);
        let added: Vec<Key> = mapping.keys().skip(before).cloned().collect();
        *container = Value::Mapping(mapping);
        for key in added {
            self.merged.insert((keys.clone(), key));
        }
        Ok(())
    }

    /// Drop path entries that cannot be the parent of a line at `indent`.
    fn unwind(&mut self, indent: usize, item: bool) {
        while let Some(last) = self.path.last() {
            if last.indent < indent {
                break;
            }
            if item && last.indent == indent && last.kind == EntryKind::Open && self.last_accepts_items() {
                break;
            }
            self.path.pop();
        }
    }

    /// Compact `key:\n- item` style: the open key still holds nothing or a sequence.
    fn last_accepts_items(&self) -> bool {
        let keys: Vec<Key> = self.path.iter().map(|e| e.key.clone()).collect();
        matches!(
            self.root.at_path(&keys),
            Some(Value::Null | Value::Sequence(_))
        )
    }

    fn is_discarding(&self) -> bool {
        self.path.iter().any(|e| e.kind == EntryKind::Discarded)
    }

    fn push_discarded(&mut self, indent: usize) {
        self.path.push(PathEntry {
            indent,
            key: Key::Int(0),
            kind: EntryKind::Discarded,
        });
    }

    fn parent_keys(&self) -> Vec<Key> {
        self.path.iter().map(|e| e.key.clone()).collect()
    }

    fn container(&mut self, keys: &[Key]) -> Result<&mut Value, Error> {
        self.root
            .at_path_mut(keys)
            .ok_or_else(|| Error::msg("parent node is no longer present in the document"))
    }

    fn claim_root(&mut self, kind: RootKind) -> Result<(), Error> {
        match self.root_kind {
            None => {
                log::debug!("document root is a {kind:?}");
                self.root_kind = Some(kind);
                if kind == RootKind::Sequence {
                    self.root = Value::Sequence(Vec::new());
                }
                Ok(())
            }
            Some(existing) if existing == kind => Ok(()),
            Some(_) => Err(Error::InconsistentRootKeys {
                location: Location::UNKNOWN,
            }),
        }
    }

    /// Store `value` in the container at `keys`; returns the key used.
    fn insert(&mut self, keys: &[Key], slot: Slot, value: Value) -> Result<Option<Key>, Error> {
        if keys.is_empty() {
            let kind = match slot {
                Slot::Positional => RootKind::Sequence,
                Slot::Named(_) => RootKind::Mapping,
            };
            self.claim_root(kind)?;
        }
        let policy = match &slot {
            Slot::Named(key) if self.merged.remove(&(keys.to_vec(), key.clone())) => {
                log::debug!("{key} overrides a merged entry");
                DuplicateKeyPolicy::LastWins
            }
            _ => self.duplicate_keys,
        };
        let container = self.container(keys)?;
        match slot {
            Slot::Positional => Ok(Some(push_positional(container, value))),
            Slot::Named(key) => {
                let mut mapping = into_mapping(std::mem::take(container));
                let replaced = mapping.contains_key(&key);
                let result = insert_named(&mut mapping, key, value, policy);
                *container = Value::Mapping(mapping);
                if replaced {
                    if let Ok(Some(key)) = &result {
                        self.forget_merges_below(keys, key);
                    }
                }
                result
            }
        }
    }

    /// A replaced value takes the merge records of its old subtree with it.
    fn forget_merges_below(&mut self, keys: &[Key], key: &Key) {
        self.merged.retain(|(path, _)| {
            !(path.len() > keys.len() && path.starts_with(keys) && &path[keys.len()] == key)
        });
    }
}

fn push_positional(container: &mut Value, value: Value) -> Key {
    match container {
        Value::Sequence(items) => {
            items.push(value);
            Key::Int(items.len() as u64 - 1)
        }
        Value::Mapping(mapping) => mapping.push(value),
        other => {
            if !other.is_null() {
                log::debug!("replacing {} with a sequence", other.type_name());
            }
            *other = Value::Sequence(vec![value]);
            Key::Int(0)
        }
    }
}

/// View any node as a mapping: sequences keep their items under integer keys,
/// placeholders and scalars become empty.
fn into_mapping(value: Value) -> Mapping {
    match value {
        Value::Mapping(mapping) => mapping,
        Value::Sequence(items) => {
            log::debug!("converting sequence of {} item(s) to a mapping", items.len());
            Mapping::from_sequence(items)
        }
        Value::Null => Mapping::new(),
        other => {
            log::debug!("replacing {} with a mapping", other.type_name());
            Mapping::new()
        }
    }
}

fn insert_named(
    mapping: &mut Mapping,
    key: Key,
    value: Value,
    policy: DuplicateKeyPolicy,
) -> Result<Option<Key>, Error> {
    if mapping.contains_key(&key) {
        match policy {
            DuplicateKeyPolicy::Error => {
                return Err(Error::DuplicateKey {
                    key: key.to_string(),
                    location: Location::UNKNOWN,
                });
            }
            DuplicateKeyPolicy::FirstWins => {
                log::debug!("skipping duplicate key {key}");
                return Ok(None);
            }
            DuplicateKeyPolicy::LastWins => {}
        }
    }
    mapping.insert(key.clone(), value);
    Ok(Some(key))
}
