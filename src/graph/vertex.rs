//! Vertex implementation for the property graph
//!
//! Vertex properties are multi-valued: each key maps to an ordered sequence
//! of values. Mutation goes through [`GraphStore`](super::GraphStore) so
//! that indices stay in step with the data.

use super::property::{MultiPropertyMap, PropertyValue};
use super::types::{Label, VertexId};
use serde::{Deserialize, Serialize};

/// A vertex in the property graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vertex {
    /// Unique identifier for this vertex
    pub id: VertexId,

    /// Vertex label
    pub label: Label,

    /// Properties: key -> values in insertion order
    properties: MultiPropertyMap,
}

impl Vertex {
    /// Create a new vertex without properties
    pub fn new(id: VertexId, label: impl Into<Label>) -> Self {
        Vertex {
            id,
            label: label.into(),
            properties: MultiPropertyMap::new(),
        }
    }

    /// First value of a property, if present
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key).and_then(|values| values.first())
    }

    /// All values of a property (empty if the key is absent)
    pub fn values(&self, key: &str) -> &[PropertyValue] {
        self.properties
            .get(key)
            .map(|values| values.as_slice())
            .unwrap_or_default()
    }

    /// Check if property exists
    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Property keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(|k| k.as_str())
    }

    /// Iterate over (key, values) pairs
    pub fn properties(&self) -> impl Iterator<Item = (&str, &[PropertyValue])> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Get number of property keys
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Append a value to a key (list cardinality)
    pub(crate) fn append_property(&mut self, key: String, value: PropertyValue) {
        self.properties.entry(key).or_default().push(value);
    }

    /// Replace all values of a key with one value (single cardinality).
    /// Returns the displaced values.
    pub(crate) fn replace_property(&mut self, key: String, value: PropertyValue) -> Vec<PropertyValue> {
        self.properties.insert(key, vec![value]).unwrap_or_default()
    }

    /// Remove a key and all its values
    pub(crate) fn remove_property(&mut self, key: &str) -> Vec<PropertyValue> {
        self.properties.shift_remove(key).unwrap_or_default()
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Vertex {}

impl std::hash::Hash for Vertex {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_vertex() {
        let vertex = Vertex::new(VertexId::new(1), "person");
        assert_eq!(vertex.id, VertexId::new(1));
        assert_eq!(vertex.label.as_str(), "person");
        assert_eq!(vertex.property_count(), 0);
    }

    #[test]
    fn test_multi_valued_properties() {
        let mut vertex = Vertex::new(VertexId::new(2), "person");
        vertex.append_property("location".to_string(), "santa cruz".into());
        vertex.append_property("location".to_string(), "brussels".into());

        assert_eq!(vertex.values("location").len(), 2);
        assert_eq!(vertex.property("location").unwrap().as_string(), Some("santa cruz"));
        assert_eq!(vertex.property_count(), 1);
    }

    #[test]
    fn test_replace_and_remove() {
        let mut vertex = Vertex::new(VertexId::new(3), "person");
        vertex.append_property("age".to_string(), 29.into());
        vertex.append_property("age".to_string(), 30.into());

        let displaced = vertex.replace_property("age".to_string(), 31.into());
        assert_eq!(displaced.len(), 2);
        assert_eq!(vertex.values("age"), &[PropertyValue::Integer(31)]);

        let removed = vertex.remove_property("age");
        assert_eq!(removed, vec![PropertyValue::Integer(31)]);
        assert!(!vertex.has_property("age"));
        assert!(vertex.values("age").is_empty());
    }

    #[test]
    fn test_key_order_is_insertion_order() {
        let mut vertex = Vertex::new(VertexId::new(4), "person");
        vertex.append_property("name".to_string(), "marko".into());
        vertex.append_property("age".to_string(), 29.into());
        vertex.append_property("city".to_string(), "santa fe".into());

        let keys: Vec<_> = vertex.keys().collect();
        assert_eq!(keys, vec!["name", "age", "city"]);
    }

    #[test]
    fn test_vertex_equality() {
        let v1 = Vertex::new(VertexId::new(7), "person");
        let v2 = Vertex::new(VertexId::new(7), "software");
        let v3 = Vertex::new(VertexId::new(8), "person");

        assert_eq!(v1, v2); // Same ID
        assert_ne!(v1, v3); // Different ID
    }
}
