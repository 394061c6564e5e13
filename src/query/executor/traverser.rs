//! Values flowing between operators
//!
//! Elements are borrowed from the store for the lifetime of the traversal;
//! only projected property values are owned.

use crate::graph::{Edge, PropertyValue, Vertex};
use serde::Serialize;
use std::fmt;

/// One result travelling through the pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Traverser<'g> {
    Vertex(&'g Vertex),
    Edge(&'g Edge),
    Value(PropertyValue),
}

impl<'g> Traverser<'g> {
    pub fn as_vertex(&self) -> Option<&'g Vertex> {
        match self {
            Traverser::Vertex(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_edge(&self) -> Option<&'g Edge> {
        match self {
            Traverser::Edge(e) => Some(*e),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<&PropertyValue> {
        match self {
            Traverser::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Shorthand for reading `count()` results
    pub fn as_integer(&self) -> Option<i64> {
        self.as_value().and_then(PropertyValue::as_integer)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Traverser::Vertex(_) => "vertex",
            Traverser::Edge(_) => "edge",
            Traverser::Value(v) => v.type_name(),
        }
    }
}

impl fmt::Display for Traverser<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Traverser::Vertex(v) => write!(f, "v[{}]", v.id.element_id()),
            Traverser::Edge(e) => write!(
                f,
                "e[{}][{}-{}->{}]",
                e.id.element_id(),
                e.out_v.element_id(),
                e.label,
                e.in_v.element_id()
            ),
            Traverser::Value(v) => write!(f, "{}", v),
        }
    }
}

impl<'g> From<&'g Vertex> for Traverser<'g> {
    fn from(vertex: &'g Vertex) -> Self {
        Traverser::Vertex(vertex)
    }
}

impl<'g> From<&'g Edge> for Traverser<'g> {
    fn from(edge: &'g Edge) -> Self {
        Traverser::Edge(edge)
    }
}

impl From<PropertyValue> for Traverser<'_> {
    fn from(value: PropertyValue) -> Self {
        Traverser::Value(value)
    }
}
