//! JSON value types and display formatting.
//!
//! This module defines [`JsonValue`], the immutable snapshot type handed to
//! consumers, and the live, mutable container nodes the snapshot builder
//! mutates while a value is still streaming in.
use std::fmt;

use indexmap::IndexMap;

/// An ordered JSON object: iteration order follows first-insertion order,
/// and a later write to an existing key overwrites its value in place
/// without moving it to the end.
pub type JsonObject = IndexMap<String, JsonValue>;

/// A JSON value as defined by [RFC 8259], with the one deliberate deviation
/// that duplicate object keys are resolved last-write-wins rather than
/// rejected.
///
/// [RFC 8259]: https://datatracker.ietf.org/doc/html/rfc8259
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JsonValue {
    /// `null`.
    Null,
    /// `true` or `false`.
    Boolean(bool),
    /// Any JSON number, represented as a double-precision float.
    Number(f64),
    /// A JSON string.
    String(String),
    /// A JSON array.
    Array(Vec<JsonValue>),
    /// A JSON object, preserving insertion order.
    Object(JsonObject),
}

impl Default for JsonValue {
    fn default() -> Self {
        Self::Null
    }
}

impl From<bool> for JsonValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<f64> for JsonValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<String> for JsonValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<JsonValue>> for JsonValue {
    fn from(v: Vec<JsonValue>) -> Self {
        Self::Array(v)
    }
}

impl From<JsonObject> for JsonValue {
    fn from(v: JsonObject) -> Self {
        Self::Object(v)
    }
}

impl JsonValue {
    /// Returns `true` if the value is [`JsonValue::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if the value is [`JsonValue::Boolean`].
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Boolean(..))
    }

    /// Returns `true` if the value is [`JsonValue::Number`].
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(..))
    }

    /// Returns `true` if the value is [`JsonValue::String`].
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(..))
    }

    /// Returns `true` if the value is [`JsonValue::Array`].
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(..))
    }

    /// Returns `true` if the value is [`JsonValue::Object`].
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(..))
    }

    /// Borrows the value as a `&str`, if it is a [`JsonValue::String`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(feature = "serde")]
impl JsonValue {
    /// Converts to a [`serde_json::Value`], preserving object key order.
    /// Used by the decode-into-`T` facade, which round-trips a snapshot
    /// through `serde_json` rather than implementing `serde::Deserialize`
    /// directly against the live parser state.
    pub(crate) fn to_serde_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Boolean(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Array(items) => {
                serde_json::Value::Array(items.iter().map(Self::to_serde_json).collect())
            }
            Self::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_serde_json())).collect(),
            ),
        }
    }
}

/// Writes `src` as the body of a JSON string literal (without surrounding
/// quotes), escaping control characters and the two characters JSON
/// requires escaped.
pub(crate) fn write_escaped_string<W: fmt::Write>(src: &str, f: &mut W) -> fmt::Result {
    for c in src.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\u{08}' => f.write_str("\\b")?,
            '\u{0C}' => f.write_str("\\f")?,
            c if (c as u32) <= 0x1F => write!(f, "\\u{:04X}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    Ok(())
}

impl fmt::Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Boolean(b) => f.write_str(if *b { "true" } else { "false" }),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => {
                f.write_char('"')?;
                write_escaped_string(s, f)?;
                f.write_char('"')
            }
            Self::Array(items) => {
                f.write_char('[')?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_char(']')
            }
            Self::Object(map) => {
                f.write_char('{')?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    f.write_char('"')?;
                    write_escaped_string(k, f)?;
                    write!(f, "\":{v}")?;
                }
                f.write_char('}')
            }
        }
    }
}

/// The mutable container nodes the snapshot builder maintains while a value
/// is being assembled. Distinct from [`JsonValue`], which is the immutable
/// snapshot handed to consumers.
pub(crate) mod live {
    use super::{JsonObject, JsonValue};

    /// A growing JSON array.
    #[derive(Debug, Default)]
    pub(crate) struct LiveArray {
        items: Vec<JsonValue>,
    }

    impl LiveArray {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn append(&mut self, value: JsonValue) {
            self.items.push(value);
        }

        /// Replaces the last element.
        ///
        /// # Panics
        ///
        /// Panics if called before any element has been appended; callers
        /// must uphold that invariant (the tokenizer never emits a token
        /// that would mutate an array element before it exists).
        pub(crate) fn replace_last(&mut self, value: JsonValue) {
            *self.items.last_mut().expect("replace_last before append") = value;
        }

        pub(crate) fn to_value(&self) -> JsonValue {
            JsonValue::Array(self.items.clone())
        }
    }

    /// A growing JSON object. Backed by an insertion-ordered map so that a
    /// repeated key overwrites its value without moving to the end.
    #[derive(Debug, Default)]
    pub(crate) struct LiveObject {
        map: JsonObject,
    }

    impl LiveObject {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn set(&mut self, key: String, value: JsonValue) {
            self.map.insert(key, value);
        }

        pub(crate) fn to_value(&self) -> JsonValue {
            JsonValue::Object(self.map.clone())
        }
    }
}
