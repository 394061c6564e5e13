//! Behaviour shared by vertices and edges
//!
//! Scans, indices and `has` containers are written once against [`Element`]
//! and instantiated for both kinds.

use super::edge::Edge;
use super::property::PropertyValue;
use super::store::GraphStore;
use super::table::ElementTable;
use super::types::{EdgeId, ElementId, ElementKind, Label, VertexId};
use super::vertex::Vertex;
use std::fmt;
use std::hash::Hash;

pub trait Element: fmt::Debug + Send + Sync {
    /// Kind-specific id newtype
    type Id: Clone + Eq + Hash + Ord + fmt::Debug + fmt::Display + From<ElementId> + Send + Sync;

    const KIND: ElementKind;

    fn id(&self) -> &Self::Id;

    fn element_id(&self) -> &ElementId;

    fn label(&self) -> &Label;

    /// Values stored under `key`; empty when the key is absent
    fn values(&self, key: &str) -> &[PropertyValue];

    /// Every (key, value) pair, one entry per value
    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &PropertyValue)> + '_>;

    /// The store table holding elements of this kind
    fn table(store: &GraphStore) -> &ElementTable<Self>
    where
        Self: Sized;
}

impl Element for Vertex {
    type Id = VertexId;

    const KIND: ElementKind = ElementKind::Vertex;

    fn id(&self) -> &VertexId {
        &self.id
    }

    fn element_id(&self) -> &ElementId {
        self.id.element_id()
    }

    fn label(&self) -> &Label {
        &self.label
    }

    fn values(&self, key: &str) -> &[PropertyValue] {
        Vertex::values(self, key)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &PropertyValue)> + '_> {
        Box::new(
            self.properties()
                .flat_map(|(key, values)| values.iter().map(move |value| (key, value))),
        )
    }

    fn table(store: &GraphStore) -> &ElementTable<Self> {
        store.vertex_table()
    }
}

impl Element for Edge {
    type Id = EdgeId;

    const KIND: ElementKind = ElementKind::Edge;

    fn id(&self) -> &EdgeId {
        &self.id
    }

    fn element_id(&self) -> &ElementId {
        self.id.element_id()
    }

    fn label(&self) -> &Label {
        &self.label
    }

    fn values(&self, key: &str) -> &[PropertyValue] {
        self.property(key).map(std::slice::from_ref).unwrap_or_default()
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &PropertyValue)> + '_> {
        Box::new(self.properties())
    }

    fn table(store: &GraphStore) -> &ElementTable<Self> {
        store.edge_table()
    }
}
