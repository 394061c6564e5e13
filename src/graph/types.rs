//! Core type definitions for the graph store

use serde::{Deserialize, Serialize};
use std::fmt;

use super::property::PropertyValue;

/// Opaque element identifier
///
/// Ids are either caller-supplied or generated by the store. The derived
/// ordering is total: all integer ids sort before all string ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(untagged)]
pub enum ElementId {
    Integer(i64),
    String(String),
}

impl ElementId {
    /// Integer payload, if this is an integer id
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ElementId::Integer(i) => Some(*i),
            ElementId::String(_) => None,
        }
    }

    /// The id as a property value, so predicates can test it like any other key
    pub fn to_property(&self) -> PropertyValue {
        match self {
            ElementId::Integer(i) => PropertyValue::Integer(*i),
            ElementId::String(s) => PropertyValue::String(s.clone()),
        }
    }

    /// Inverse of [`ElementId::to_property`]; floats and booleans are not ids
    pub fn from_property(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Integer(i) => Some(ElementId::Integer(*i)),
            PropertyValue::String(s) => Some(ElementId::String(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementId::Integer(i) => write!(f, "{}", i),
            ElementId::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for ElementId {
    fn from(id: i64) -> Self {
        ElementId::Integer(id)
    }
}

impl From<i32> for ElementId {
    fn from(id: i32) -> Self {
        ElementId::Integer(id as i64)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        ElementId::String(id.to_string())
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        ElementId::String(id)
    }
}

macro_rules! element_id_newtype {
    ($(#[$meta:meta])* $name:ident, $tag:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(pub ElementId);

        impl $name {
            pub fn new(id: impl Into<ElementId>) -> Self {
                $name(id.into())
            }

            pub fn element_id(&self) -> &ElementId {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, "({})"), self.0)
            }
        }

        impl From<ElementId> for $name {
            fn from(id: ElementId) -> Self {
                $name(id)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                $name(id.into())
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                $name(id.into())
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                $name(id.into())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                $name(id.into())
            }
        }
    };
}

element_id_newtype!(
    /// Identifier of a vertex. Vertex and edge ids live in separate spaces.
    VertexId,
    "VertexId"
);

element_id_newtype!(
    /// Identifier of an edge
    EdgeId,
    "EdgeId"
);

/// Vertex or edge label (e.g., "person", "created")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct Label(String);

impl Label {
    pub fn new(label: impl Into<String>) -> Self {
        Label(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Lets label-keyed maps be queried with a plain `&str`
impl std::borrow::Borrow<str> for Label {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label(s)
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label(s.to_string())
    }
}

/// The two kinds of graph elements; indices are scoped per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Vertex,
    Edge,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Vertex => write!(f, "vertex"),
            ElementKind::Edge => write!(f, "edge"),
        }
    }
}
