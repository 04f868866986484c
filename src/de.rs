//! Serde deserializer over a loaded [`Value`] tree.
//!
//! Supported:
//! - Scalars: bool, integers (integral floats included, since `-3` loads as a float),
//!   floats, strings, chars. Numbers and booleans are accepted where a string is expected.
//! - `Null` as `None` / unit.
//! - Nested sequences and mappings; integer keys are offered as numbers or as text,
//!   whichever the target asks for.
//! - Externally tagged enums: `Variant` or `{ Variant: value }`.

use serde::de::{
    self, DeserializeOwned, DeserializeSeed, EnumAccess, IntoDeserializer, MapAccess, SeqAccess,
    VariantAccess, Visitor,
};

use crate::error::Error;
use crate::value::{Key, Mapping, Value};

/// Deserialize `T` from an owned tree.
///
/// ```rust
/// use serde::Deserialize;
///
/// #[derive(Deserialize, Debug, PartialEq)]
/// struct Job {
///     minify: Vec<String>,
///     level: Option<u8>,
/// }
///
/// let v = mince_yaml::load("minify:\n  - a.js\n").unwrap();
/// let job: Job = mince_yaml::from_value(v).unwrap();
/// assert_eq!(job, Job { minify: vec!["a.js".into()], level: None });
/// ```
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    T::deserialize(Deser::new(value))
}

pub(crate) struct Deser {
    value: Value,
}

impl Deser {
    pub(crate) fn new(value: Value) -> Self {
        Self { value }
    }

    fn invalid_type(&self, expected: &dyn de::Expected) -> Error {
        let unexpected = match &self.value {
            Value::Null => de::Unexpected::Unit,
            Value::Bool(b) => de::Unexpected::Bool(*b),
            Value::Int(n) => de::Unexpected::Signed(*n),
            Value::Float(f) => de::Unexpected::Float(*f),
            Value::String(s) => de::Unexpected::Str(s),
            Value::Sequence(_) => de::Unexpected::Seq,
            Value::Mapping(_) => de::Unexpected::Map,
        };
        de::Error::invalid_type(unexpected, expected)
    }

    /// Integer view: `Int` as is, floats only when integral.
    fn integer(&self) -> Option<i64> {
        match self.value {
            Value::Int(n) => Some(n),
            Value::Float(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
                Some(f as i64)
            }
            _ => None,
        }
    }
}

macro_rules! deserialize_integer {
    ($method:ident, $visit:ident, $ty:ty) => {
        fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
            match self.integer().map(<$ty>::try_from) {
                Some(Ok(n)) => visitor.$visit(n),
                Some(Err(_)) => Err(de::Error::custom(format!(
                    "integer {} out of range for {}",
                    self.integer().unwrap_or_default(),
                    stringify!($ty)
                ))),
                None => Err(self.invalid_type(&visitor)),
            }
        }
    };
}

impl<'de> de::Deserializer<'de> for Deser {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Int(n) => visitor.visit_i64(n),
            Value::Float(f) => visitor.visit_f64(f),
            Value::String(s) => visitor.visit_string(s),
            Value::Sequence(items) => visit_sequence(items, visitor),
            Value::Mapping(m) => visit_mapping(m, visitor),
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.value {
            Value::Bool(b) => visitor.visit_bool(b),
            _ => Err(self.invalid_type(&visitor)),
        }
    }

    deserialize_integer!(deserialize_i8, visit_i8, i8);
    deserialize_integer!(deserialize_i16, visit_i16, i16);
    deserialize_integer!(deserialize_i32, visit_i32, i32);
    deserialize_integer!(deserialize_i64, visit_i64, i64);
    deserialize_integer!(deserialize_u8, visit_u8, u8);
    deserialize_integer!(deserialize_u16, visit_u16, u16);
    deserialize_integer!(deserialize_u32, visit_u32, u32);
    deserialize_integer!(deserialize_u64, visit_u64, u64);

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        self.deserialize_f64(visitor)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.value.as_f64() {
            Some(f) => visitor.visit_f64(f),
            None => Err(self.invalid_type(&visitor)),
        }
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        let mut chars = self.value.as_str().map(str::chars);
        match chars.as_mut().map(|c| (c.next(), c.next())) {
            Some((Some(c), None)) => visitor.visit_char(c),
            _ => Err(self.invalid_type(&visitor)),
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        self.deserialize_string(visitor)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.value {
            Value::String(s) => visitor.visit_string(s),
            Value::Bool(b) => visitor.visit_string(b.to_string()),
            Value::Int(n) => visitor.visit_string(n.to_string()),
            Value::Float(f) => visitor.visit_string(f.to_string()),
            _ => Err(self.invalid_type(&visitor)),
        }
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.value {
            Value::String(s) => visitor.visit_byte_buf(s.into_bytes()),
            Value::Sequence(items) => visit_sequence(items, visitor),
            _ => Err(self.invalid_type(&visitor)),
        }
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.value {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.value {
            Value::Null => visitor.visit_unit(),
            _ => Err(self.invalid_type(&visitor)),
        }
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.value {
            Value::Sequence(items) => visit_sequence(items, visitor),
            // A mapping built from positional entries of a converted sequence.
            Value::Mapping(m) if m.keys().all(|k| matches!(k, Key::Int(_))) => {
                visit_sequence(m.into_iter().map(|(_, v)| v).collect(), visitor)
            }
            _ => Err(self.invalid_type(&visitor)),
        }
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value, Error> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, Error> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.value {
            Value::Mapping(m) => visit_mapping(m, visitor),
            _ => Err(self.invalid_type(&visitor)),
        }
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        match self.value {
            Value::String(variant) => visitor.visit_enum(EnumDeser {
                variant,
                value: None,
            }),
            Value::Mapping(m) if m.len() == 1 => {
                let Some((key, value)) = m.into_iter().next() else {
                    return Err(Error::msg(format!("empty mapping for enum {name}")));
                };
                visitor.visit_enum(EnumDeser {
                    variant: key.to_string(),
                    value: Some(value),
                })
            }
            _ => Err(Error::msg(format!(
                "expected a variant name or a single-entry mapping for enum {name}"
            ))),
        }
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        self.deserialize_string(visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_unit()
    }
}

fn visit_sequence<'de, V: Visitor<'de>>(items: Vec<Value>, visitor: V) -> Result<V::Value, Error> {
    let len = items.len();
    let mut access = SeqDeser {
        items: items.into_iter(),
    };
    let value = visitor.visit_seq(&mut access)?;
    match access.items.len() {
        0 => Ok(value),
        left => Err(de::Error::invalid_length(len, &format!("{} elements", len - left).as_str())),
    }
}

fn visit_mapping<'de, V: Visitor<'de>>(m: Mapping, visitor: V) -> Result<V::Value, Error> {
    visitor.visit_map(MapDeser {
        entries: m.into_iter(),
        pending: None,
    })
}

struct SeqDeser {
    items: std::vec::IntoIter<Value>,
}

impl<'de> SeqAccess<'de> for SeqDeser {
    type Error = Error;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, Error> {
        self.items
            .next()
            .map(|item| seed.deserialize(Deser::new(item)))
            .transpose()
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

struct MapDeser<I> {
    entries: I,
    pending: Option<(Key, Value)>,
}

impl<'de, I: Iterator<Item = (Key, Value)>> MapAccess<'de> for MapDeser<I> {
    type Error = Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>, Error> {
        let Some((key, value)) = self.entries.next() else {
            return Ok(None);
        };
        let out = seed.deserialize(KeyDeser { key: key.clone() })?;
        self.pending = Some((key, value));
        Ok(Some(out))
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, Error> {
        let Some((key, value)) = self.pending.take() else {
            return Err(Error::msg("mapping value requested before its key"));
        };
        seed.deserialize(Deser::new(value))
            .map_err(|e| match e {
                Error::Message { msg, location } => Error::Message {
                    msg: format!("{key}: {msg}"),
                    location,
                },
                other => other,
            })
    }
}

/// Mapping keys: integers are offered as numbers to `deserialize_any` and as text to
/// string-typed targets.
struct KeyDeser {
    key: Key,
}

impl<'de> de::Deserializer<'de> for KeyDeser {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.key {
            Key::Int(n) => visitor.visit_u64(n),
            Key::Str(s) => visitor.visit_string(s),
        }
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_string(self.key.to_string())
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        self.deserialize_string(visitor)
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        self.deserialize_string(visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        visitor.visit_enum(self.key.to_string().into_deserializer())
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error> {
        visitor.visit_newtype_struct(self)
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char bytes byte_buf
        option unit unit_struct seq tuple tuple_struct map struct ignored_any
    }
}

struct EnumDeser {
    variant: String,
    value: Option<Value>,
}

impl<'de> EnumAccess<'de> for EnumDeser {
    type Error = Error;
    type Variant = VariantDeser;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, VariantDeser), Error> {
        let name: de::value::StringDeserializer<Error> = self.variant.into_deserializer();
        let variant = seed.deserialize(name)?;
        Ok((variant, VariantDeser { value: self.value }))
    }
}

struct VariantDeser {
    value: Option<Value>,
}

impl<'de> VariantAccess<'de> for VariantDeser {
    type Error = Error;

    fn unit_variant(self) -> Result<(), Error> {
        match self.value {
            None | Some(Value::Null) => Ok(()),
            Some(other) => Err(Error::msg(format!(
                "unit variant cannot hold a {}",
                other.type_name()
            ))),
        }
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value, Error> {
        seed.deserialize(Deser::new(self.value.unwrap_or_default()))
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value, Error> {
        de::Deserializer::deserialize_seq(Deser::new(self.value.unwrap_or_default()), visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        de::Deserializer::deserialize_map(Deser::new(self.value.unwrap_or_default()), visitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    fn load<T: DeserializeOwned>(text: &str) -> Result<T, Error> {
        from_value(crate::load(text)?)
    }

    #[derive(Debug, Deserialize, PartialEq)]
    enum Mode {
        Fast,
        Level(u8),
        Custom { name: String },
    }

    #[test]
    fn structs_and_options() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Cfg {
            name: String,
            retries: u32,
            ratio: f64,
            enabled: bool,
            missing: Option<String>,
        }
        let cfg: Cfg = load("name: app\nretries: 3\nratio: .5\nenabled: yes\nmissing:\n").unwrap();
        assert_eq!(
            cfg,
            Cfg {
                name: "app".into(),
                retries: 3,
                ratio: 0.5,
                enabled: true,
                missing: None
            }
        );
    }

    #[test]
    fn negative_numbers_fit_integer_targets() {
        let n: i32 = from_value(Value::Float(-3.0)).unwrap();
        assert_eq!(n, -3);
        assert!(from_value::<i32>(Value::Float(-3.5)).is_err());
        assert!(from_value::<u8>(Value::Int(300)).is_err());
    }

    #[test]
    fn integer_keys_as_text_or_numbers() {
        let by_text: BTreeMap<String, String> = load("0: zero\nx: ex\n").unwrap();
        assert_eq!(by_text.get("0").map(String::as_str), Some("zero"));
        let by_number: BTreeMap<u32, String> = load("0: zero\n7: seven\n").unwrap();
        assert_eq!(by_number.get(&7).map(String::as_str), Some("seven"));
    }

    #[test]
    fn enums() {
        let modes: Vec<Mode> = load("- Fast\n- Level: 3\n- Custom:\n    name: x\n").unwrap();
        assert_eq!(
            modes,
            vec![Mode::Fast, Mode::Level(3), Mode::Custom { name: "x".into() }]
        );
    }

    #[test]
    fn type_errors_name_the_key() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Cfg {
            retries: u32,
        }
        let err = load::<Cfg>("retries: [1]\n").unwrap_err();
        assert!(err.to_string().contains("retries"), "{err}");
    }

    #[test]
    fn scalars_read_as_strings() {
        let v: Vec<String> = load("- 12\n- true\n- text\n").unwrap();
        assert_eq!(v, vec!["12", "true", "text"]);
    }
}
