//! In-memory graph storage implementation
//!
//! The store owns all vertices, edges and properties together with every
//! index derived from them. Each mutation updates the primary id index, the
//! label index, any property index and the adjacency lists before it
//! returns, so a traversal can never observe a half-applied change.
//!
//! Reads take `&self` and may run from several threads at once; mutation
//! takes `&mut self`.

use super::edge::Edge;
use super::features::{FeatureCategory, Features};
use super::property::PropertyValue;
use super::table::ElementTable;
use super::types::{EdgeId, ElementKind, Label, VertexId};
use super::vertex::Vertex;
use crate::config::{Cardinality, GraphConfig};
use crate::query::predicate::P;
use crate::query::GraphTraversalSource;
use rustc_hash::FxHashMap;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, trace};

/// Errors that can occur during graph operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Vertex {0} not found")]
    VertexNotFound(VertexId),

    #[error("Edge {0} not found")]
    EdgeNotFound(EdgeId),

    #[error("Vertex {0} already exists")]
    VertexAlreadyExists(VertexId),

    #[error("Edge {0} already exists")]
    EdgeAlreadyExists(EdgeId),

    #[error("Invalid {label} edge: vertex {vertex} does not exist")]
    DanglingEdge { label: Label, vertex: VertexId },

    #[error("Unknown {category} feature: {name}")]
    UnknownFeature { category: FeatureCategory, name: String },
}

impl GraphError {
    /// An id lookup missed
    pub fn is_no_such_element(&self) -> bool {
        matches!(self, GraphError::VertexNotFound(_) | GraphError::EdgeNotFound(_))
    }

    /// A caller-supplied id collided with an existing element
    pub fn is_duplicate_id(&self) -> bool {
        matches!(
            self,
            GraphError::VertexAlreadyExists(_) | GraphError::EdgeAlreadyExists(_)
        )
    }

    /// An edge referenced a vertex that does not exist
    pub fn is_dangling_reference(&self) -> bool {
        matches!(self, GraphError::DanglingEdge { .. })
    }
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Snapshot of store sizes and access counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphStatistics {
    pub vertex_count: usize,
    pub edge_count: usize,
    /// Vertices handed to traversal scans (positional or by id)
    pub vertices_scanned: u64,
    /// Edges handed to traversal scans (positional or by id)
    pub edges_scanned: u64,
    /// Candidate sets answered from an id, label or property index
    pub index_lookups: u64,
}

/// In-memory graph storage
///
/// - vertices / edges: id -> element, insertion ordered, plus label and
///   property indices
/// - outgoing: VertexId -> [EdgeId] (adjacency list for outgoing edges)
/// - incoming: VertexId -> [EdgeId] (adjacency list for incoming edges)
#[derive(Debug)]
pub struct GraphStore {
    config: GraphConfig,
    features: Features,
    vertices: ElementTable<Vertex>,
    edges: ElementTable<Edge>,
    outgoing: FxHashMap<VertexId, Vec<EdgeId>>,
    incoming: FxHashMap<VertexId, Vec<EdgeId>>,
}

impl GraphStore {
    /// Create a new empty graph store with default configuration
    pub fn new() -> Self {
        Self::open(GraphConfig::default())
    }

    /// Create a new empty graph store; indices named by the configuration
    /// are declared up front
    pub fn open(config: GraphConfig) -> Self {
        let mut store = Self {
            features: Features::new(&config),
            vertices: ElementTable::new(config.vertex_id_strategy),
            edges: ElementTable::new(config.edge_id_strategy),
            outgoing: FxHashMap::default(),
            incoming: FxHashMap::default(),
            config,
        };
        for key in store.config.vertex_indices.clone() {
            store.vertices.create_index(&key);
        }
        for key in store.config.edge_indices.clone() {
            store.edges.create_index(&key);
        }
        info!(
            vertex_indices = ?store.config.vertex_indices,
            edge_indices = ?store.config.edge_indices,
            "opened graph store"
        );
        store
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn features(&self) -> &Features {
        &self.features
    }

    /// Start a traversal over this store
    pub fn traversal(&self) -> GraphTraversalSource<'_> {
        GraphTraversalSource::new(self)
    }

    pub(crate) fn vertex_table(&self) -> &ElementTable<Vertex> {
        &self.vertices
    }

    pub(crate) fn edge_table(&self) -> &ElementTable<Edge> {
        &self.edges
    }

    // ---- vertices ----

    /// Create a vertex with a store-generated id
    pub fn add_vertex(&mut self, label: impl Into<Label>, properties: Vec<(&str, PropertyValue)>) -> VertexId {
        let id = self.vertices.generate_id();
        self.insert_vertex(id, label.into(), properties)
    }

    /// Create a vertex with a caller-supplied id
    pub fn add_vertex_with_id(
        &mut self,
        id: impl Into<VertexId>,
        label: impl Into<Label>,
        properties: Vec<(&str, PropertyValue)>,
    ) -> GraphResult<VertexId> {
        let id = id.into();
        if self.vertices.contains(&id) {
            return Err(GraphError::VertexAlreadyExists(id));
        }
        Ok(self.insert_vertex(id, label.into(), properties))
    }

    fn insert_vertex(&mut self, id: VertexId, label: Label, properties: Vec<(&str, PropertyValue)>) -> VertexId {
        let mut vertex = Vertex::new(id.clone(), label);
        for (key, value) in properties {
            match self.config.vertex_property_cardinality {
                Cardinality::List => vertex.append_property(key.to_string(), value),
                Cardinality::Single => {
                    vertex.replace_property(key.to_string(), value);
                }
            }
        }
        trace!(vertex = %id, label = %vertex.label, "added vertex");
        self.vertices.insert(vertex);
        id
    }

    /// Get a vertex by id
    pub fn vertex(&self, id: &VertexId) -> GraphResult<&Vertex> {
        self.vertices
            .get(id)
            .ok_or_else(|| GraphError::VertexNotFound(id.clone()))
    }

    pub fn has_vertex(&self, id: &VertexId) -> bool {
        self.vertices.contains(id)
    }

    /// Vertices for the given ids, in the given order; absent ids are skipped
    pub fn vertices_by_id(&self, ids: &[VertexId]) -> Vec<&Vertex> {
        ids.iter().filter_map(|id| self.vertices.get(id)).collect()
    }

    /// All vertices in store order
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Add a value to a vertex property. With list cardinality the value is
    /// appended; with single cardinality it replaces all earlier values.
    pub fn set_vertex_property(
        &mut self,
        id: &VertexId,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> GraphResult<()> {
        let key = key.into();
        let value = value.into();
        let vertex = self
            .vertices
            .elements
            .get_mut(id)
            .ok_or_else(|| GraphError::VertexNotFound(id.clone()))?;

        trace!(vertex = %id, key = %key, value = %value, "set vertex property");
        self.vertices.indices.index_insert(&key, &value, id.clone());
        match self.config.vertex_property_cardinality {
            Cardinality::List => vertex.append_property(key, value),
            Cardinality::Single => {
                let displaced = vertex.replace_property(key.clone(), value);
                for old in &displaced {
                    self.vertices.indices.index_remove(&key, old, id);
                }
            }
        }
        Ok(())
    }

    /// Remove a vertex property key with all its values
    pub fn remove_vertex_property(&mut self, id: &VertexId, key: &str) -> GraphResult<Vec<PropertyValue>> {
        let vertex = self
            .vertices
            .elements
            .get_mut(id)
            .ok_or_else(|| GraphError::VertexNotFound(id.clone()))?;

        let removed = vertex.remove_property(key);
        for value in &removed {
            self.vertices.indices.index_remove(key, value, id);
        }
        trace!(vertex = %id, key, removed = removed.len(), "removed vertex property");
        Ok(removed)
    }

    /// Delete a vertex and every edge incident to it
    pub fn remove_vertex(&mut self, id: &VertexId) -> GraphResult<Vertex> {
        if !self.vertices.contains(id) {
            return Err(GraphError::VertexNotFound(id.clone()));
        }

        let mut incident: Vec<EdgeId> = self
            .outgoing
            .remove(id)
            .into_iter()
            .chain(self.incoming.remove(id))
            .flatten()
            .collect();
        // self-loops appear in both lists
        incident.sort();
        incident.dedup();

        for edge_id in &incident {
            self.detach_edge(edge_id);
        }

        let vertex = self
            .vertices
            .remove(id)
            .ok_or_else(|| GraphError::VertexNotFound(id.clone()))?;
        trace!(vertex = %id, edges = incident.len(), "removed vertex");
        Ok(vertex)
    }

    // ---- edges ----

    /// Create an edge with a store-generated id
    pub fn add_edge(
        &mut self,
        out_v: &VertexId,
        label: impl Into<Label>,
        in_v: &VertexId,
        properties: Vec<(&str, PropertyValue)>,
    ) -> GraphResult<EdgeId> {
        let label = label.into();
        self.check_endpoints(out_v, &label, in_v)?;
        let id = self.edges.generate_id();
        Ok(self.insert_edge(id, out_v.clone(), label, in_v.clone(), properties))
    }

    /// Create an edge with a caller-supplied id
    pub fn add_edge_with_id(
        &mut self,
        id: impl Into<EdgeId>,
        out_v: &VertexId,
        label: impl Into<Label>,
        in_v: &VertexId,
        properties: Vec<(&str, PropertyValue)>,
    ) -> GraphResult<EdgeId> {
        let id = id.into();
        let label = label.into();
        if self.edges.contains(&id) {
            return Err(GraphError::EdgeAlreadyExists(id));
        }
        self.check_endpoints(out_v, &label, in_v)?;
        Ok(self.insert_edge(id, out_v.clone(), label, in_v.clone(), properties))
    }

    fn check_endpoints(&self, out_v: &VertexId, label: &Label, in_v: &VertexId) -> GraphResult<()> {
        for vertex in [out_v, in_v] {
            if !self.vertices.contains(vertex) {
                return Err(GraphError::DanglingEdge {
                    label: label.clone(),
                    vertex: vertex.clone(),
                });
            }
        }
        Ok(())
    }

    fn insert_edge(
        &mut self,
        id: EdgeId,
        out_v: VertexId,
        label: Label,
        in_v: VertexId,
        properties: Vec<(&str, PropertyValue)>,
    ) -> EdgeId {
        let mut edge = Edge::new(id.clone(), out_v.clone(), label, in_v.clone());
        for (key, value) in properties {
            edge.set_property(key.to_string(), value);
        }
        trace!(edge = %id, out_v = %out_v, label = %edge.label, in_v = %in_v, "added edge");

        self.outgoing.entry(out_v).or_default().push(id.clone());
        self.incoming.entry(in_v).or_default().push(id.clone());
        self.edges.insert(edge);
        id
    }

    /// Get an edge by id
    pub fn edge(&self, id: &EdgeId) -> GraphResult<&Edge> {
        self.edges
            .get(id)
            .ok_or_else(|| GraphError::EdgeNotFound(id.clone()))
    }

    pub fn has_edge(&self, id: &EdgeId) -> bool {
        self.edges.contains(id)
    }

    /// Edges for the given ids, in the given order; absent ids are skipped
    pub fn edges_by_id(&self, ids: &[EdgeId]) -> Vec<&Edge> {
        ids.iter().filter_map(|id| self.edges.get(id)).collect()
    }

    /// All edges in store order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Set an edge property, returning the value it replaced
    pub fn set_edge_property(
        &mut self,
        id: &EdgeId,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> GraphResult<Option<PropertyValue>> {
        let key = key.into();
        let value = value.into();
        let edge = self
            .edges
            .elements
            .get_mut(id)
            .ok_or_else(|| GraphError::EdgeNotFound(id.clone()))?;

        trace!(edge = %id, key = %key, value = %value, "set edge property");
        self.edges.indices.index_insert(&key, &value, id.clone());
        let old = edge.set_property(key.clone(), value);
        if let Some(old) = &old {
            self.edges.indices.index_remove(&key, old, id);
        }
        Ok(old)
    }

    pub fn remove_edge_property(&mut self, id: &EdgeId, key: &str) -> GraphResult<Option<PropertyValue>> {
        let edge = self
            .edges
            .elements
            .get_mut(id)
            .ok_or_else(|| GraphError::EdgeNotFound(id.clone()))?;

        let removed = edge.remove_property(key);
        if let Some(value) = &removed {
            self.edges.indices.index_remove(key, value, id);
        }
        trace!(edge = %id, key, "removed edge property");
        Ok(removed)
    }

    /// Delete an edge
    pub fn remove_edge(&mut self, id: &EdgeId) -> GraphResult<Edge> {
        let edge = self
            .detach_edge(id)
            .ok_or_else(|| GraphError::EdgeNotFound(id.clone()))?;
        trace!(edge = %id, "removed edge");
        Ok(edge)
    }

    /// Remove an edge from its table and both adjacency lists
    fn detach_edge(&mut self, id: &EdgeId) -> Option<Edge> {
        let edge = self.edges.remove(id)?;
        if let Some(out) = self.outgoing.get_mut(&edge.out_v) {
            out.retain(|e| e != id);
        }
        if let Some(inc) = self.incoming.get_mut(&edge.in_v) {
            inc.retain(|e| e != id);
        }
        Some(edge)
    }

    /// Ids of edges leaving a vertex, in insertion order
    pub fn out_edge_ids(&self, vertex: &VertexId) -> &[EdgeId] {
        self.outgoing.get(vertex).map(Vec::as_slice).unwrap_or_default()
    }

    /// Ids of edges entering a vertex, in insertion order
    pub fn in_edge_ids(&self, vertex: &VertexId) -> &[EdgeId] {
        self.incoming.get(vertex).map(Vec::as_slice).unwrap_or_default()
    }

    /// Get outgoing edges for a vertex
    pub fn out_edges(&self, vertex: &VertexId) -> Vec<&Edge> {
        self.out_edge_ids(vertex)
            .iter()
            .filter_map(|id| self.edges.get(id))
            .collect()
    }

    /// Get incoming edges for a vertex
    pub fn in_edges(&self, vertex: &VertexId) -> Vec<&Edge> {
        self.in_edge_ids(vertex)
            .iter()
            .filter_map(|id| self.edges.get(id))
            .collect()
    }

    // ---- indices ----

    /// Declare a property index and backfill it. Returns false if the key
    /// was already indexed.
    pub fn create_index(&mut self, kind: ElementKind, key: &str) -> bool {
        match kind {
            ElementKind::Vertex => self.vertices.create_index(key),
            ElementKind::Edge => self.edges.create_index(key),
        }
    }

    /// Drop a property index. Returns false if none existed.
    pub fn drop_index(&mut self, kind: ElementKind, key: &str) -> bool {
        let dropped = match kind {
            ElementKind::Vertex => self.vertices.drop_index(key),
            ElementKind::Edge => self.edges.drop_index(key),
        };
        debug!(%kind, key, dropped, "drop index");
        dropped
    }

    pub fn is_indexed(&self, kind: ElementKind, key: &str) -> bool {
        match kind {
            ElementKind::Vertex => self.vertices.is_indexed(key),
            ElementKind::Edge => self.edges.is_indexed(key),
        }
    }

    /// Indexed property keys of one kind, sorted
    pub fn indexed_keys(&self, kind: ElementKind) -> Vec<String> {
        match kind {
            ElementKind::Vertex => self.vertices.indexed_keys(),
            ElementKind::Edge => self.edges.indexed_keys(),
        }
    }

    /// Vertex ids satisfying `key <predicate>` per the property index, in
    /// store order; `None` if no index serves the predicate. The result may
    /// be a superset and must be post-filtered.
    pub fn vertex_ids_by_property(&self, key: &str, predicate: &P) -> Option<Vec<VertexId>> {
        self.vertices.ids_by_property(key, predicate)
    }

    /// Edge counterpart of [`GraphStore::vertex_ids_by_property`]
    pub fn edge_ids_by_property(&self, key: &str, predicate: &P) -> Option<Vec<EdgeId>> {
        self.edges.ids_by_property(key, predicate)
    }

    // ---- store-wide ----

    /// Remove every element; index declarations survive
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.outgoing.clear();
        self.incoming.clear();
        info!("cleared graph store");
    }

    pub fn stats(&self) -> GraphStatistics {
        GraphStatistics {
            vertex_count: self.vertices.len(),
            edge_count: self.edges.len(),
            vertices_scanned: self.vertices.scanned(),
            edges_scanned: self.edges.scanned(),
            index_lookups: self.vertices.index_lookups() + self.edges.index_lookups(),
        }
    }

    /// Whether the store supports a named feature
    pub fn supports(&self, category: FeatureCategory, name: &str) -> GraphResult<bool> {
        self.features.supports(category, name)
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}
