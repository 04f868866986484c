//! Value tree produced by the loader and consumed by the dumper.
//!
//! A loaded document is a plain owned tree: [`Value`] nodes, with [`Mapping`]
//! keeping its entries in insertion order. Nothing in the tree is shared, so
//! callers are free to mutate what `load` returns.

use std::collections::HashMap;
use std::fmt;
use std::ops;

use ahash::RandomState;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A mapping key: either a string or a non-negative integer.
///
/// Unquoted key text that is a canonical decimal integer (`0`, `7`, `42`,
/// but not `007` or `-1`) is read as [`Key::Int`]; every other key, including
/// any quoted key, is a [`Key::Str`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Int(u64),
    Str(String),
}

impl Key {
    /// Interpret unquoted key text, turning canonical integers into [`Key::Int`].
    pub(crate) fn from_plain(text: &str) -> Key {
        if is_canonical_index(text) {
            if let Ok(n) = text.parse::<u64>() {
                return Key::Int(n);
            }
        }
        Key::Str(text.to_owned())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Str(s) => Some(s),
            Key::Int(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<u64> {
        match self {
            Key::Int(n) => Some(*n),
            Key::Str(_) => None,
        }
    }
}

/// `0`, or a digit run without a leading zero.
pub(crate) fn is_canonical_index(text: &str) -> bool {
    let bytes = text.as_bytes();
    match bytes {
        [] => false,
        [b'0'] => true,
        [b'1'..=b'9', rest @ ..] => rest.iter().all(u8::is_ascii_digit),
        _ => false,
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(n) => write!(f, "{n}"),
            Key::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Str(value.to_owned())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Str(value)
    }
}

impl From<u64> for Key {
    fn from(value: u64) -> Self {
        Key::Int(value)
    }
}

impl From<usize> for Key {
    fn from(value: usize) -> Self {
        Key::Int(value as u64)
    }
}

/// Ordered mapping with unique keys.
///
/// Entries keep the order in which keys were first inserted. Re-inserting an
/// existing key replaces its value without moving it.
#[derive(Clone, Default)]
pub struct Mapping {
    entries: Vec<(Key, Value)>,
    index: HashMap<Key, usize, RandomState>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
        }
    }

    /// Build a mapping from a sequence, keyed by position (`0`, `1`, ...).
    pub fn from_sequence(items: Vec<Value>) -> Self {
        let mut mapping = Self::with_capacity(items.len());
        for (i, item) in items.into_iter().enumerate() {
            mapping.insert(Key::Int(i as u64), item);
        }
        mapping
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &Key) -> Option<&mut Value> {
        match self.index.get(key) {
            Some(&i) => Some(&mut self.entries[i].1),
            None => None,
        }
    }

    pub fn contains_key(&self, key: &Key) -> bool {
        self.index.contains_key(key)
    }

    /// Insert or replace. Returns the previous value for an existing key.
    pub fn insert(&mut self, key: Key, value: Value) -> Option<Value> {
        if let Some(&i) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[i].1, value));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    /// Next free positional key: one past the largest integer key, or `0`.
    pub fn next_index(&self) -> u64 {
        self.entries
            .iter()
            .filter_map(|(k, _)| k.as_int())
            .max()
            .map_or(0, |n| n.saturating_add(1))
    }

    /// Append `value` under [`Mapping::next_index`] and return the key used.
    pub fn push(&mut self, value: Value) -> Key {
        let key = Key::Int(self.next_index());
        self.insert(key.clone(), value);
        key
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&Key, &mut Value)> {
        self.entries.iter_mut().map(|(k, v)| (&*k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl FromIterator<(Key, Value)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (Key, Value)>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        for (k, v) in iter {
            mapping.insert(k, v);
        }
        mapping
    }
}

impl IntoIterator for Mapping {
    type Item = (Key, Value);
    type IntoIter = std::vec::IntoIter<(Key, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// A loaded document node.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Mapping(Mapping),
}

static NULL: Value = Value::Null;

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Floats, and integers widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Look up a child by mapping key or sequence position.
    ///
    /// ```rust
    /// let v = mince_yaml::load("combine:\n  out.css:\n    - a.css\n").unwrap();
    /// let first = v.get("combine").and_then(|c| c.get("out.css")).and_then(|s| s.get(0));
    /// assert_eq!(first.and_then(|f| f.as_str()), Some("a.css"));
    /// ```
    pub fn get<I: ValueIndex>(&self, index: I) -> Option<&Value> {
        index.index_into(self)
    }

    /// Child lookup by an already-built [`Key`]; integer keys also address sequences.
    pub(crate) fn child(&self, key: &Key) -> Option<&Value> {
        match (self, key) {
            (Value::Mapping(m), _) => m.get(key),
            (Value::Sequence(items), Key::Int(i)) => items.get(*i as usize),
            _ => None,
        }
    }

    pub(crate) fn child_mut(&mut self, key: &Key) -> Option<&mut Value> {
        match (self, key) {
            (Value::Mapping(m), _) => m.get_mut(key),
            (Value::Sequence(items), Key::Int(i)) => items.get_mut(*i as usize),
            _ => None,
        }
    }

    /// Follow `keys` from this node.
    pub(crate) fn at_path(&self, keys: &[Key]) -> Option<&Value> {
        keys.iter().try_fold(self, |node, key| node.child(key))
    }

    pub(crate) fn at_path_mut(&mut self, keys: &[Key]) -> Option<&mut Value> {
        keys.iter().try_fold(self, |node, key| node.child_mut(key))
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Value::Sequence(_) | Value::Mapping(_))
    }

    /// Short human-readable kind, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }

    /// Number of nodes in this subtree, the node itself included.
    pub fn node_count(&self) -> usize {
        match self {
            Value::Sequence(items) => 1 + items.iter().map(Value::node_count).sum::<usize>(),
            Value::Mapping(m) => 1 + m.values().map(Value::node_count).sum::<usize>(),
            _ => 1,
        }
    }
}

/// Types usable with [`Value::get`] and `value[...]`.
pub trait ValueIndex {
    fn index_into<'v>(&self, v: &'v Value) -> Option<&'v Value>;
}

impl ValueIndex for str {
    fn index_into<'v>(&self, v: &'v Value) -> Option<&'v Value> {
        v.as_mapping()?.get(&Key::Str(self.to_owned()))
    }
}

impl ValueIndex for String {
    fn index_into<'v>(&self, v: &'v Value) -> Option<&'v Value> {
        self.as_str().index_into(v)
    }
}

impl ValueIndex for usize {
    fn index_into<'v>(&self, v: &'v Value) -> Option<&'v Value> {
        v.child(&Key::Int(*self as u64))
    }
}

impl ValueIndex for Key {
    fn index_into<'v>(&self, v: &'v Value) -> Option<&'v Value> {
        v.child(self)
    }
}

impl<T: ValueIndex + ?Sized> ValueIndex for &T {
    fn index_into<'v>(&self, v: &'v Value) -> Option<&'v Value> {
        (**self).index_into(v)
    }
}

impl<I: ValueIndex> ops::Index<I> for Value {
    type Output = Value;

    /// Missing children index to `Null` instead of panicking.
    fn index(&self, index: I) -> &Value {
        index.index_into(self).unwrap_or(&NULL)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<Mapping> for Value {
    fn from(m: Mapping) -> Self {
        Value::Mapping(m)
    }
}

// ------------------------------------------------------------
// Serde: Value as a serde data model citizen
// ------------------------------------------------------------

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Key::Int(n) => s.serialize_u64(*n),
            Key::Str(k) => s.serialize_str(k),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => s.serialize_unit(),
            Value::Bool(b) => s.serialize_bool(*b),
            Value::Int(n) => s.serialize_i64(*n),
            Value::Float(f) => s.serialize_f64(*f),
            Value::String(text) => s.serialize_str(text),
            Value::Sequence(items) => s.collect_seq(items),
            Value::Mapping(m) => {
                let mut map = s.serialize_map(Some(m.len()))?;
                for (k, v) in m.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        struct KeyVisitor;

        impl<'de> Visitor<'de> for KeyVisitor {
            type Value = Key;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or non-negative integer key")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Key, E> {
                Ok(Key::Int(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Key, E> {
                u64::try_from(v)
                    .map(Key::Int)
                    .map_err(|_| E::custom(format!("negative mapping key {v}")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Key, E> {
                Ok(Key::Str(v.to_owned()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Key, E> {
                Ok(Key::Str(v))
            }
        }

        d.deserialize_any(KeyVisitor)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("any value")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
                Ok(Value::Bool(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
                Ok(Value::Int(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
                Ok(match i64::try_from(v) {
                    Ok(n) => Value::Int(n),
                    Err(_) => Value::Float(v as f64),
                })
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
                Ok(Value::Float(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
                Ok(Value::String(v.to_owned()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
                Ok(Value::String(v))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E: de::Error>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Value, D::Error> {
                Value::deserialize(d)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
                let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
                while let Some(item) = seq.next_element()? {
                    items.push(item);
                }
                Ok(Value::Sequence(items))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
                let mut mapping = Mapping::with_capacity(map.size_hint().unwrap_or(0).min(4096));
                while let Some((k, v)) = map.next_entry::<Key, Value>()? {
                    mapping.insert(k, v);
                }
                Ok(Value::Mapping(mapping))
            }
        }

        d.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_index_detection() {
        assert!(is_canonical_index("0"));
        assert!(is_canonical_index("42"));
        assert!(!is_canonical_index("007"));
        assert!(!is_canonical_index("-1"));
        assert!(!is_canonical_index("1a"));
        assert!(!is_canonical_index(""));
    }

    #[test]
    fn plain_keys_become_integers_only_when_canonical() {
        assert_eq!(Key::from_plain("3"), Key::Int(3));
        assert_eq!(Key::from_plain("03"), Key::Str("03".into()));
        assert_eq!(Key::from_plain("a"), Key::Str("a".into()));
        // Beyond u64 stays textual.
        assert_eq!(
            Key::from_plain("99999999999999999999999"),
            Key::Str("99999999999999999999999".into())
        );
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut m = Mapping::new();
        m.insert("a".into(), Value::Int(1));
        m.insert("b".into(), Value::Int(2));
        assert_eq!(m.insert("a".into(), Value::Int(3)), Some(Value::Int(1)));
        let keys: Vec<_> = m.keys().cloned().collect();
        assert_eq!(keys, vec![Key::from("a"), Key::from("b")]);
        assert_eq!(m.get(&"a".into()), Some(&Value::Int(3)));
    }

    #[test]
    fn push_uses_next_integer_key() {
        let mut m = Mapping::new();
        m.insert("name".into(), Value::Null);
        assert_eq!(m.push(Value::Int(1)), Key::Int(0));
        m.insert(Key::Int(7), Value::Null);
        assert_eq!(m.push(Value::Int(2)), Key::Int(8));
    }

    #[test]
    fn indexing_missing_children_yields_null() {
        let v = Value::Mapping(Mapping::from_sequence(vec![Value::from("x")]));
        assert_eq!(v["nope"], Value::Null);
        assert_eq!(v[0], Value::from("x"));
        assert_eq!(v[0]["deeper"], Value::Null);
    }

    #[test]
    fn node_count_covers_subtree() {
        let v = Value::Sequence(vec![
            Value::Int(1),
            Value::Mapping([(Key::from("a"), Value::Null)].into_iter().collect()),
        ]);
        assert_eq!(v.node_count(), 4);
    }
}
