//! Argument shapes accepted by insert and remove.

use serde_json::Value;

use super::ServiceError;
use crate::format::type_name;

/// Translations to insert for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translations {
    Single { base: String, translated: String },
    /// `[base, translated]` pairs, inserted in order.
    PairList(Vec<[String; 2]>),
    /// Base → translated entries in object insertion order.
    PairMap(Vec<(String, String)>),
}

impl Translations {
    #[must_use]
    pub fn single(base: impl Into<String>, translated: impl Into<String>) -> Self {
        Self::Single { base: base.into(), translated: translated.into() }
    }

    /// Builds translations from the dynamic `(strings, translated)` argument pair.
    ///
    /// - a string with a string translation inserts one record
    /// - an array of `[base, translated]` string pairs
    /// - an object mapping base strings to translations
    ///
    /// # Errors
    /// [`ServiceError::InvalidArgument`] for any other shape.
    pub fn from_json(strings: &Value, translated: Option<&Value>) -> Result<Self, ServiceError> {
        match strings {
            Value::String(base) => match translated {
                Some(Value::String(translated)) => Ok(Self::single(base.as_str(), translated.as_str())),
                other => Err(ServiceError::InvalidArgument {
                    expected: "string translation",
                    found: other.map_or("undefined", type_name),
                }),
            },
            _ => Self::try_from(strings),
        }
    }

    /// Number of records this input inserts.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Single { .. } => 1,
            Self::PairList(pairs) => pairs.len(),
            Self::PairMap(entries) => entries.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(base, translated)` pairs in insertion order.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(String, String)> {
        match self {
            Self::Single { base, translated } => vec![(base, translated)],
            Self::PairList(pairs) => {
                pairs.into_iter().map(|[base, translated]| (base, translated)).collect()
            }
            Self::PairMap(entries) => entries,
        }
    }
}

impl TryFrom<&Value> for Translations {
    type Error = ServiceError;

    /// Converts the bulk shapes: an array of pairs or an object.
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Array(items) => items.iter().map(pair_from_json).collect::<Result<_, _>>().map(Self::PairList),
            Value::Object(map) => map
                .iter()
                .map(|(base, translated)| match translated {
                    Value::String(translated) => Ok((base.clone(), translated.clone())),
                    other => Err(ServiceError::InvalidArgument {
                        expected: "string translation",
                        found: type_name(other),
                    }),
                })
                .collect::<Result<_, _>>()
                .map(Self::PairMap),
            other => Err(ServiceError::InvalidArgument {
                expected: "string|object|array",
                found: type_name(other),
            }),
        }
    }
}

/// One `[base, translated]` entry of a pair-list payload.
fn pair_from_json(item: &Value) -> Result<[String; 2], ServiceError> {
    match item.as_array().map(Vec::as_slice) {
        Some([Value::String(base), Value::String(translated)]) => {
            Ok([base.clone(), translated.clone()])
        }
        _ => Err(ServiceError::InvalidArgument {
            expected: "[baseString, translatedString] pair",
            found: type_name(item),
        }),
    }
}

/// What [`I18n::remove`](super::I18n::remove) deletes within one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveTarget {
    /// Every record of the language.
    Language,
    Single(String),
    /// Each listed base string, in order.
    List(Vec<String>),
}

impl RemoveTarget {
    /// Builds a target from the optional dynamic `strings` argument.
    ///
    /// Absent, `null` and `""` select the whole language.
    ///
    /// # Errors
    /// [`ServiceError::InvalidArgument`] unless the argument is a string or an array of strings.
    pub fn from_json(strings: Option<&Value>) -> Result<Self, ServiceError> {
        match strings {
            None | Some(Value::Null) => Ok(Self::Language),
            Some(Value::String(base)) if base.is_empty() => Ok(Self::Language),
            Some(Value::String(base)) => Ok(Self::Single(base.clone())),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(base) => Ok(base.clone()),
                    other => Err(ServiceError::InvalidArgument {
                        expected: "string",
                        found: type_name(other),
                    }),
                })
                .collect::<Result<_, _>>()
                .map(Self::List),
            Some(other) => Err(ServiceError::InvalidArgument {
                expected: "string|array",
                found: type_name(other),
            }),
        }
    }
}
