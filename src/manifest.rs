//! Typed view of a build manifest: which files to minify and which to combine.
//!
//! ```rust
//! use mince_yaml::{Manifest, load};
//!
//! let v = load("minify: app.js\ncombine:\n  all.css:\n    - a.css\n    - b.css\n").unwrap();
//! let manifest = Manifest::from_value(&v).unwrap();
//! assert_eq!(manifest.minify, vec!["app.js"]);
//! assert_eq!(manifest.combine[0].0, "all.css");
//! assert_eq!(manifest.combine[0].1, vec!["a.css", "b.css"]);
//! ```

use std::fmt;
use std::path::Path;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::error::Error;
use crate::value::Value;

/// The recognised top-level keys of a manifest. Other keys are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Manifest {
    /// Files to minify in place.
    #[serde(default, deserialize_with = "one_or_many")]
    pub minify: Vec<String>,
    /// Destination file to its sources, in document order.
    #[serde(default)]
    pub combine: Combine,
}

/// Ordered `destination -> sources` list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Combine(pub Vec<(String, Vec<String>)>);

impl std::ops::Deref for Combine {
    type Target = [(String, Vec<String>)];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Manifest {
    /// Read the manifest keys from a loaded document.
    pub fn from_value(value: &Value) -> Result<Self, Error> {
        if !matches!(value, Value::Mapping(_)) {
            return Err(Error::msg(format!(
                "manifest root must be a mapping, found {}",
                value.type_name()
            )));
        }
        crate::from_value(value.clone())
    }

    /// Load `path` and read the manifest keys from it.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Self::from_value(&crate::load_file(path)?)
    }
}

/// A single path, a list of paths (null items dropped), or nothing.
fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Paths {
        One(String),
        Many(Vec<Option<String>>),
    }

    Ok(match Option::<Paths>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(Paths::One(path)) => vec![path],
        Some(Paths::Many(paths)) => paths.into_iter().flatten().collect(),
    })
}

#[derive(Deserialize)]
struct Sources(#[serde(deserialize_with = "one_or_many")] Vec<String>);

impl<'de> Deserialize<'de> for Combine {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CombineVisitor;

        impl<'de> Visitor<'de> for CombineVisitor {
            type Value = Combine;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of destination files to source files")
            }

            fn visit_none<E: de::Error>(self) -> Result<Combine, E> {
                Ok(Combine::default())
            }

            fn visit_unit<E: de::Error>(self) -> Result<Combine, E> {
                Ok(Combine::default())
            }

            fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Combine, D::Error> {
                d.deserialize_map(self)
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Combine, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(destination) = map.next_key::<String>()? {
                    let Sources(sources) = map.next_value()?;
                    entries.push((destination, sources));
                }
                Ok(Combine(entries))
            }
        }

        deserializer.deserialize_option(CombineVisitor)
    }
}
