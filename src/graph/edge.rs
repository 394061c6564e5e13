//! Edge implementation for the property graph
//!
//! Edges are directed (out-vertex -> in-vertex), labelled, and carry
//! single-valued properties.

use super::property::{PropertyMap, PropertyValue};
use super::types::{EdgeId, Label, VertexId};
use serde::{Deserialize, Serialize};

/// A directed edge in the property graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier for this edge
    pub id: EdgeId,

    /// Edge label (e.g., "knows", "created")
    pub label: Label,

    /// Tail vertex (edge goes FROM this vertex)
    pub out_v: VertexId,

    /// Head vertex (edge goes TO this vertex)
    pub in_v: VertexId,

    /// Properties associated with this edge
    properties: PropertyMap,
}

impl Edge {
    /// Create a new directed edge without properties
    pub fn new(id: EdgeId, out_v: VertexId, label: impl Into<Label>, in_v: VertexId) -> Self {
        Edge {
            id,
            label: label.into(),
            out_v,
            in_v,
            properties: PropertyMap::new(),
        }
    }

    /// Get a property value
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Check if property exists
    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Property keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(|k| k.as_str())
    }

    /// Iterate over (key, value) pairs
    pub fn properties(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Get number of properties
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// The endpoint opposite `vertex`; a self-loop returns the same vertex
    pub fn other_vertex(&self, vertex: &VertexId) -> &VertexId {
        if &self.out_v == vertex {
            &self.in_v
        } else {
            &self.out_v
        }
    }

    /// Check if this edge touches a vertex at either end
    pub fn is_incident_to(&self, vertex: &VertexId) -> bool {
        &self.out_v == vertex || &self.in_v == vertex
    }

    pub(crate) fn set_property(&mut self, key: String, value: PropertyValue) -> Option<PropertyValue> {
        self.properties.insert(key, value)
    }

    pub(crate) fn remove_property(&mut self, key: &str) -> Option<PropertyValue> {
        self.properties.shift_remove(key)
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Edge {}

impl std::hash::Hash for Edge {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_edge() {
        let edge = Edge::new(EdgeId::new(7), VertexId::new(1), "knows", VertexId::new(2));

        assert_eq!(edge.id, EdgeId::new(7));
        assert_eq!(edge.out_v, VertexId::new(1));
        assert_eq!(edge.in_v, VertexId::new(2));
        assert_eq!(edge.label.as_str(), "knows");
    }

    #[test]
    fn test_edge_properties_are_single_valued() {
        let mut edge = Edge::new(EdgeId::new(8), VertexId::new(1), "knows", VertexId::new(4));

        assert_eq!(edge.set_property("weight".to_string(), 0.5.into()), None);
        let old = edge.set_property("weight".to_string(), 1.0.into());
        assert_eq!(old, Some(PropertyValue::Float(0.5)));
        assert_eq!(edge.property("weight").unwrap().as_float(), Some(1.0));
        assert_eq!(edge.property_count(), 1);

        assert!(edge.remove_property("weight").is_some());
        assert!(!edge.has_property("weight"));
    }

    #[test]
    fn test_other_vertex() {
        let edge = Edge::new(EdgeId::new(9), VertexId::new(1), "created", VertexId::new(3));
        assert_eq!(edge.other_vertex(&VertexId::new(1)), &VertexId::new(3));
        assert_eq!(edge.other_vertex(&VertexId::new(3)), &VertexId::new(1));
        assert!(edge.is_incident_to(&VertexId::new(3)));
        assert!(!edge.is_incident_to(&VertexId::new(2)));

        let self_loop = Edge::new(EdgeId::new(10), VertexId::new(5), "self", VertexId::new(5));
        assert_eq!(self_loop.other_vertex(&VertexId::new(5)), &VertexId::new(5));
    }
}
