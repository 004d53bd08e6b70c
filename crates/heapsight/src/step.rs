//! The snapshot model consumed from the upstream tracer.
//!
//! A [`Step`] is one unit of replay: the call stack at one executed line plus
//! every heap object alive at that moment. Steps are produced wholesale by
//! the tracer, consumed once, and never mutated; nothing carries over between
//! steps. The tracer's wire format is camelCase JSON, and the `objects`
//! collection arrives either as an ordered array of `{id, type, value}`
//! records or as a map of `id -> {type, value}` — both normalize to the same
//! ordered `Vec<HeapObject>`.

use ahash::{AHashMap, AHashSet};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer, ser::SerializeStruct};

use crate::{
    error::SnapshotError,
    value::{ObjectId, Value},
};

/// Declared type tag of a heap object.
///
/// Tags are matched case-insensitively; anything the tracer invents beyond
/// the known set lands in [`ObjectKind::Other`] and still renders generically.
#[derive(Debug, Clone, PartialEq, Eq, strum::EnumString)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum ObjectKind {
    Array,
    List,
    Tuple,
    Set,
    Vector,
    Dict,
    Instance,
    Class,
    Module,
    /// Synthetic object minted by the router to show a local variable as a
    /// heap-like box. Never supplied by the tracer.
    #[strum(serialize = "variable-mirror")]
    VariableMirror,
    #[strum(default)]
    Other(String),
}

impl ObjectKind {
    /// Whether this tag names an ordered sequence type.
    #[must_use]
    pub fn is_sequence(&self) -> bool {
        matches!(
            self,
            Self::Array | Self::List | Self::Tuple | Self::Set | Self::Vector
        )
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Array => f.write_str("array"),
            Self::List => f.write_str("list"),
            Self::Tuple => f.write_str("tuple"),
            Self::Set => f.write_str("set"),
            Self::Vector => f.write_str("vector"),
            Self::Dict => f.write_str("dict"),
            Self::Instance => f.write_str("instance"),
            Self::Class => f.write_str("class"),
            Self::Module => f.write_str("module"),
            Self::VariableMirror => f.write_str("variable-mirror"),
            Self::Other(tag) => f.write_str(tag),
        }
    }
}

/// Payload of a heap object, shaped by its declared kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Ordered elements of a sequence type (array/list/tuple/set).
    Sequence(Vec<Value>),
    /// Attribute or key/value mapping of dict/instance/class/module objects,
    /// in tracer order.
    Mapping(IndexMap<String, Value>),
    /// A bare value. Used by variable mirrors and by malformed objects whose
    /// declared kind promised structure the payload does not have.
    Scalar(Value),
}

impl Payload {
    /// Converts a raw JSON payload. Arrays become sequences, objects become
    /// mappings, anything else is kept as a scalar so a malformed object
    /// still renders instead of failing ingest.
    #[must_use]
    pub fn from_json(raw: &serde_json::Value) -> Self {
        match raw {
            serde_json::Value::Array(items) => Self::Sequence(items.iter().map(Value::from_json).collect()),
            serde_json::Value::Object(map) => Self::Mapping(
                map.iter()
                    .map(|(key, value)| (key.clone(), Value::from_json(value)))
                    .collect(),
            ),
            other => Self::Scalar(Value::from_json(other)),
        }
    }

    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Value]> {
        if let Self::Sequence(items) = self { Some(items) } else { None }
    }

    #[must_use]
    pub fn as_mapping(&self) -> Option<&IndexMap<String, Value>> {
        if let Self::Mapping(fields) = self { Some(fields) } else { None }
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Sequence(items) => items.serialize(serializer),
            Self::Mapping(fields) => fields.serialize(serializer),
            Self::Scalar(value) => value.serialize(serializer),
        }
    }
}

/// One heap object within a step.
#[derive(Debug, Clone, PartialEq)]
pub struct HeapObject {
    /// Identifier, unique within the step.
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub payload: Payload,
    /// Variable name shown on mirrors; `None` for tracer-supplied objects.
    pub label: Option<String>,
}

impl HeapObject {
    pub fn new(id: impl Into<ObjectId>, kind: ObjectKind, payload: Payload) -> Self {
        Self {
            id: id.into(),
            kind,
            payload,
            label: None,
        }
    }

    /// Builds the synthetic mirror object for a local variable so that even
    /// a primitive local renders as a heap-like box.
    pub fn mirror(name: impl Into<String>, value: Value) -> Self {
        let name = name.into();
        Self {
            id: ObjectId::new(format!("mirror-{name}")),
            kind: ObjectKind::VariableMirror,
            payload: Payload::Scalar(value),
            label: Some(name),
        }
    }

    #[must_use]
    pub fn is_mirror(&self) -> bool {
        self.kind == ObjectKind::VariableMirror
    }
}

impl Serialize for HeapObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = 3 + usize::from(self.label.is_some());
        let mut state = serializer.serialize_struct("HeapObject", fields)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("type", &self.kind.to_string())?;
        state.serialize_field("value", &self.payload)?;
        if let Some(label) = &self.label {
            state.serialize_field("label", label)?;
        }
        state.end()
    }
}

/// Wire form of a heap object record. Missing fields degrade rather than
/// fail: an absent type tag becomes `Other("unknown")`, an absent value an
/// empty scalar.
#[derive(Deserialize)]
struct RawObject {
    id: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    value: serde_json::Value,
    #[serde(default)]
    label: Option<String>,
}

fn parse_kind(raw: Option<String>) -> ObjectKind {
    match raw {
        Some(tag) => tag
            .parse()
            .unwrap_or_else(|_| ObjectKind::Other(tag)),
        None => ObjectKind::Other("unknown".to_owned()),
    }
}

impl From<RawObject> for HeapObject {
    fn from(raw: RawObject) -> Self {
        Self {
            id: ObjectId::new(raw.id),
            kind: parse_kind(raw.kind),
            payload: Payload::from_json(&raw.value),
            label: raw.label,
        }
    }
}

impl<'de> Deserialize<'de> for HeapObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawObject::deserialize(deserializer).map(Into::into)
    }
}

/// One call frame: a function name plus its variables in declaration order.
///
/// Frames are ordered outermost-first. Only the innermost frame acts as the
/// root set for reachability and classification; outer frames stay available
/// for inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub name: String,
    #[serde(default)]
    pub variables: IndexMap<String, Value>,
}

impl Frame {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: IndexMap::new(),
        }
    }
}

/// One execution snapshot from the tracer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    #[serde(default)]
    pub frames: Vec<Frame>,
    #[serde(default, deserialize_with = "deserialize_objects")]
    pub objects: Vec<HeapObject>,
    /// Program output accumulated up to this step.
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub current_line: u32,
    #[serde(default)]
    pub executed_lines: Vec<u32>,
}

impl Step {
    /// Parses one step from the tracer's JSON wire format.
    pub fn from_json_str(raw: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(raw).map_err(Into::into)
    }

    /// The active frame, i.e. the single source of GC roots for this step.
    #[must_use]
    pub fn innermost_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }
}

/// Accepts the tracer's objects as either an ordered array or an id-keyed
/// map, normalizing to an ordered vec. Duplicate ids keep the first record.
fn deserialize_objects<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<HeapObject>, D::Error> {
    #[derive(Deserialize)]
    struct RawPayload {
        #[serde(rename = "type", default)]
        kind: Option<String>,
        #[serde(default)]
        value: serde_json::Value,
        #[serde(default)]
        label: Option<String>,
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ObjectsRepr {
        Seq(Vec<HeapObject>),
        Map(IndexMap<String, RawPayload>),
    }

    let mut objects = match ObjectsRepr::deserialize(deserializer)? {
        ObjectsRepr::Seq(objects) => objects,
        ObjectsRepr::Map(entries) => entries
            .into_iter()
            .map(|(id, raw)| HeapObject {
                id: ObjectId::new(id),
                kind: parse_kind(raw.kind),
                payload: Payload::from_json(&raw.value),
                label: raw.label,
            })
            .collect(),
    };
    let mut seen = AHashSet::new();
    objects.retain(|object| seen.insert(object.id.clone()));
    Ok(objects)
}

/// Indexes objects by id for O(1) reference resolution during traversals.
pub(crate) fn object_index(objects: &[HeapObject]) -> AHashMap<&str, &HeapObject> {
    objects
        .iter()
        .map(|object| (object.id.as_str(), object))
        .collect()
}
