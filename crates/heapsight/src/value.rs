//! Snapshot value representation.
//!
//! A tracer value is either a primitive (none, bool, number, string) or a
//! reference to a heap object. References travel on the wire as plain strings
//! carrying the reserved [`REF_PREFIX`], so recognition is purely lexical.
//! One level of inline sequence nesting ([`Value::Seq`]) is kept because
//! adjacency-list payloads store arrays of references directly inside object
//! attributes.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Reserved prefix marking a wire string as a heap reference rather than text.
pub const REF_PREFIX: &str = "obj";

/// Identifier of a heap object, unique within a single [`Step`](crate::Step).
///
/// Identifiers are opaque strings minted by the upstream tracer. A reference
/// that resolves to no object in the same step is dangling: it is rendered as
/// a "missing" marker and never dereferenced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Returns true when a raw string uses the reserved reference prefix.
///
/// The prefix alone is not a reference; at least one more character must
/// follow (`"obj"` is text, `"obj1"` is a reference).
#[must_use]
pub fn is_reference(raw: &str) -> bool {
    raw.len() > REF_PREFIX.len() && raw.starts_with(REF_PREFIX)
}

/// A single tracer value: a primitive, a heap reference, or a one-level
/// inline sequence of values.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The tracer's null/none marker (JSON `null`).
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Reference to a heap object by identifier.
    Ref(ObjectId),
    /// Inline sequence, e.g. an adjacency list stored directly in an
    /// attribute. Elements are themselves [`Value`]s.
    Seq(Vec<Value>),
}

impl Value {
    /// Converts a raw JSON value into a tracer value.
    ///
    /// Strings carrying the reserved prefix become [`Value::Ref`]; JSON
    /// objects do not occur inside tracer values and degrade to their textual
    /// rendering rather than failing ingest.
    #[must_use]
    pub fn from_json(raw: &serde_json::Value) -> Self {
        match raw {
            serde_json::Value::Null => Self::None,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map_or_else(|| Self::Float(n.as_f64().unwrap_or(0.0)), Self::Int),
            serde_json::Value::String(s) if is_reference(s) => Self::Ref(ObjectId::new(s.clone())),
            serde_json::Value::String(s) => Self::Str(s.clone()),
            serde_json::Value::Array(items) => Self::Seq(items.iter().map(Self::from_json).collect()),
            serde_json::Value::Object(_) => Self::Str(raw.to_string()),
        }
    }

    /// Returns the referenced object id if this value is a reference.
    #[must_use]
    pub fn as_ref_id(&self) -> Option<&ObjectId> {
        if let Self::Ref(id) = self { Some(id) } else { None }
    }

    /// Whether this value terminates a pointer walk.
    ///
    /// Tracers emit the end of a chain either as JSON `null` or as the
    /// literal string `"None"`, so both count.
    #[must_use]
    pub fn is_null_marker(&self) -> bool {
        match self {
            Self::None => true,
            Self::Str(s) => s == "None" || s.eq_ignore_ascii_case("null"),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
            Self::Ref(id) => write!(f, "{id}"),
            Self::Seq(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::None => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::Float(n) => serializer.serialize_f64(*n),
            Self::Str(s) => serializer.serialize_str(s),
            Self::Ref(id) => serializer.serialize_str(id.as_str()),
            Self::Seq(items) => items.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::from_json(&raw))
    }
}
