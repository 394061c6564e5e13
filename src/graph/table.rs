//! Per-kind element storage
//!
//! An [`ElementTable`] owns the elements of one kind together with every
//! structure derived from them: the insertion-ordered primary id index, the
//! label index and the property indices. Inserting or removing through the
//! table keeps all of them in step.

use super::element::Element;
use super::property::PropertyValue;
use super::types::{ElementId, Label};
use crate::config::IdStrategy;
use crate::index::IndexManager;
use crate::query::predicate::P;
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug)]
pub struct ElementTable<E: Element> {
    /// Primary index; iteration order is store order
    pub(super) elements: IndexMap<E::Id, E, FxBuildHasher>,
    pub(super) labels: FxHashMap<Label, FxHashSet<E::Id>>,
    pub(super) indices: IndexManager<E::Id>,
    id_strategy: IdStrategy,
    next_id: i64,
    /// Elements handed out to scans
    scanned: AtomicU64,
    /// Candidate sets answered from an index
    index_lookups: AtomicU64,
}

impl<E: Element> ElementTable<E> {
    pub fn new(id_strategy: IdStrategy) -> Self {
        Self {
            elements: IndexMap::with_hasher(FxBuildHasher),
            labels: FxHashMap::default(),
            indices: IndexManager::new(),
            id_strategy,
            next_id: 1,
            scanned: AtomicU64::new(0),
            index_lookups: AtomicU64::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: &E::Id) -> Option<&E> {
        self.elements.get(id)
    }

    pub fn contains(&self, id: &E::Id) -> bool {
        self.elements.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.elements.values()
    }

    /// Element at a store position, counted as scanned
    pub fn scan_at(&self, position: usize) -> Option<&E> {
        let element = self.elements.get_index(position).map(|(_, e)| e)?;
        self.scanned.fetch_add(1, Ordering::Relaxed);
        Some(element)
    }

    /// Element by id, counted as scanned
    pub fn scan_id(&self, id: &E::Id) -> Option<&E> {
        let element = self.elements.get(id)?;
        self.scanned.fetch_add(1, Ordering::Relaxed);
        Some(element)
    }

    pub fn scanned(&self) -> u64 {
        self.scanned.load(Ordering::Relaxed)
    }

    pub fn index_lookups(&self) -> u64 {
        self.index_lookups.load(Ordering::Relaxed)
    }

    /// Next free store-generated id
    pub fn generate_id(&mut self) -> E::Id {
        match self.id_strategy {
            IdStrategy::Sequential => loop {
                let id = E::Id::from(ElementId::Integer(self.next_id));
                self.next_id += 1;
                if !self.elements.contains_key(&id) {
                    return id;
                }
            },
            IdStrategy::Uuid => loop {
                let id = E::Id::from(ElementId::String(Uuid::new_v4().to_string()));
                if !self.elements.contains_key(&id) {
                    return id;
                }
            },
        }
    }

    /// Add an element and index it. The caller has checked the id is free.
    pub fn insert(&mut self, element: E) {
        let id = element.id().clone();
        self.labels
            .entry(element.label().clone())
            .or_default()
            .insert(id.clone());
        for (key, value) in element.entries() {
            self.indices.index_insert(key, value, id.clone());
        }
        self.elements.insert(id, element);
    }

    /// Remove an element and unindex it; survivors keep their relative order
    pub fn remove(&mut self, id: &E::Id) -> Option<E> {
        let element = self.elements.shift_remove(id)?;
        if let Some(ids) = self.labels.get_mut(element.label()) {
            ids.remove(id);
            if ids.is_empty() {
                self.labels.remove(element.label());
            }
        }
        for (key, value) in element.entries() {
            self.indices.index_remove(key, value, id);
        }
        Some(element)
    }

    pub fn clear(&mut self) {
        self.elements.clear();
        self.labels.clear();
        self.indices.clear();
        self.next_id = 1;
    }

    /// Create a property index and backfill it from the current elements
    pub fn create_index(&mut self, key: &str) -> bool {
        if !self.indices.create_index(key) {
            return false;
        }
        let mut backfilled = 0usize;
        for (id, element) in &self.elements {
            for value in element.values(key) {
                self.indices.index_insert(key, value, id.clone());
                backfilled += 1;
            }
        }
        debug!(kind = %E::KIND, key, backfilled, "backfilled property index");
        true
    }

    pub fn drop_index(&mut self, key: &str) -> bool {
        self.indices.drop_index(key)
    }

    pub fn is_indexed(&self, key: &str) -> bool {
        self.indices.has_index(key)
    }

    pub fn indexed_keys(&self) -> Vec<String> {
        self.indices.indexed_keys()
    }

    /// Candidates for a property container, or `None` if no index serves it
    pub fn ids_by_property(&self, key: &str, predicate: &P) -> Option<Vec<E::Id>> {
        let ids = self.indices.lookup(key, predicate)?;
        Some(self.in_store_order(ids))
    }

    /// Candidates for a label container (`eq`/`within` only)
    pub fn ids_by_label(&self, predicate: &P) -> Option<Vec<E::Id>> {
        if !matches!(predicate, P::Eq(_) | P::Within(_)) {
            return None;
        }
        let mut ids = Vec::new();
        for value in predicate.operands() {
            if let Some(members) = value.as_string().and_then(|s| self.labels.get(s)) {
                ids.extend(members.iter().cloned());
            }
        }
        Some(self.in_store_order(ids))
    }

    /// Candidates for an id container (`eq`/`within` only), via the primary index
    pub fn ids_by_id(&self, predicate: &P) -> Option<Vec<E::Id>> {
        if !matches!(predicate, P::Eq(_) | P::Within(_)) {
            return None;
        }
        let ids = predicate
            .operands()
            .iter()
            .filter_map(id_for_value)
            .map(E::Id::from)
            .filter(|id| self.elements.contains_key(id))
            .collect();
        Some(self.in_store_order(ids))
    }

    /// Deduplicate and order by store position
    fn in_store_order(&self, ids: Vec<E::Id>) -> Vec<E::Id> {
        self.index_lookups.fetch_add(1, Ordering::Relaxed);
        let mut positioned: Vec<(usize, E::Id)> = ids
            .into_iter()
            .filter_map(|id| self.elements.get_index_of(&id).map(|pos| (pos, id)))
            .collect();
        positioned.sort_by_key(|(pos, _)| *pos);
        positioned.dedup_by_key(|(pos, _)| *pos);
        positioned.into_iter().map(|(_, id)| id).collect()
    }
}

/// The id a predicate operand can equal. Integral floats match integer ids
/// because id containers compare numerically.
fn id_for_value(value: &PropertyValue) -> Option<ElementId> {
    match value {
        PropertyValue::Float(f) if f.fract() == 0.0 && f.abs() < 9.2e18 => {
            Some(ElementId::Integer(*f as i64))
        }
        other => ElementId::from_property(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Vertex, VertexId};

    fn table_with(ids: &[i64]) -> ElementTable<Vertex> {
        let mut table = ElementTable::new(IdStrategy::Sequential);
        for &id in ids {
            table.insert(Vertex::new(VertexId::new(id), "person"));
        }
        table
    }

    #[test]
    fn test_sequential_ids_skip_taken() {
        let mut table = table_with(&[1, 2]);
        assert_eq!(table.generate_id(), VertexId::new(3));
        assert_eq!(table.generate_id(), VertexId::new(4));
    }

    #[test]
    fn test_uuid_ids() {
        let mut table: ElementTable<Vertex> = ElementTable::new(IdStrategy::Uuid);
        let id = table.generate_id();
        assert!(matches!(id.element_id(), ElementId::String(s) if s.len() == 36));
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut table = table_with(&[5, 3, 9, 1]);
        table.remove(&VertexId::new(3));

        let order: Vec<_> = table.iter().map(|v| v.id.clone()).collect();
        assert_eq!(order, vec![VertexId::new(5), VertexId::new(9), VertexId::new(1)]);
        assert!(table.ids_by_label(&P::eq("person")).unwrap().len() == 3);
    }

    #[test]
    fn test_id_lookup_in_store_order() {
        let table = table_with(&[5, 3, 9]);
        let ids = table.ids_by_id(&P::within([9, 5, 42, 5])).unwrap();
        assert_eq!(ids, vec![VertexId::new(5), VertexId::new(9)]);

        let ids = table.ids_by_id(&P::eq(3.0)).unwrap();
        assert_eq!(ids, vec![VertexId::new(3)]);

        assert!(table.ids_by_id(&P::neq(3)).is_none());
    }

    #[test]
    fn test_scan_counters() {
        let table = table_with(&[1, 2, 3]);
        assert!(table.scan_at(0).is_some());
        assert!(table.scan_at(3).is_none());
        assert!(table.scan_id(&VertexId::new(2)).is_some());
        assert_eq!(table.scanned(), 2);

        table.ids_by_label(&P::eq("person"));
        assert_eq!(table.index_lookups(), 1);
    }
}
