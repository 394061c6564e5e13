//! Manager for property indices
//!
//! One manager per element kind. Handles creation, deletion, maintenance,
//! and lookup of the property indices for that kind.

use super::property_index::PropertyIndex;
use crate::graph::PropertyValue;
use crate::query::predicate::P;
use rustc_hash::FxHashMap;
use std::hash::Hash;
use tracing::debug;

/// Manager for all property indices of one element kind
#[derive(Debug, Clone)]
pub struct IndexManager<I> {
    indices: FxHashMap<String, PropertyIndex<I>>,
}

impl<I> IndexManager<I>
where
    I: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            indices: FxHashMap::default(),
        }
    }

    /// Create an empty index for a property key.
    /// Returns false if the key was already indexed.
    pub fn create_index(&mut self, property: &str) -> bool {
        if self.indices.contains_key(property) {
            return false;
        }
        debug!(property, "creating property index");
        self.indices.insert(property.to_string(), PropertyIndex::new());
        true
    }

    /// Drop an index. Returns false if none existed.
    pub fn drop_index(&mut self, property: &str) -> bool {
        let dropped = self.indices.remove(property).is_some();
        if dropped {
            debug!(property, "dropped property index");
        }
        dropped
    }

    /// Update index when a property value is added
    pub fn index_insert(&mut self, property: &str, value: &PropertyValue, id: I) {
        if let Some(index) = self.indices.get_mut(property) {
            index.insert(value, id);
        }
    }

    /// Update index when a property value is removed (or old value replaced)
    pub fn index_remove(&mut self, property: &str, value: &PropertyValue, id: &I) {
        if let Some(index) = self.indices.get_mut(property) {
            index.remove(value, id);
        }
    }

    /// Check if an index exists
    pub fn has_index(&self, property: &str) -> bool {
        self.indices.contains_key(property)
    }

    /// Get index for querying
    pub fn get_index(&self, property: &str) -> Option<&PropertyIndex<I>> {
        self.indices.get(property)
    }

    /// Candidate ids for `property` satisfying `predicate`, when an index
    /// exists and can serve the predicate
    pub fn lookup(&self, property: &str, predicate: &P) -> Option<Vec<I>> {
        self.indices.get(property)?.lookup(predicate)
    }

    /// Indexed property keys, sorted
    pub fn indexed_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.indices.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn clear(&mut self) {
        for index in self.indices.values_mut() {
            *index = PropertyIndex::new();
        }
    }
}

impl<I> Default for IndexManager<I>
where
    I: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_drop() {
        let mut manager: IndexManager<u64> = IndexManager::new();
        assert!(manager.create_index("name"));
        assert!(!manager.create_index("name"));
        assert!(manager.has_index("name"));

        assert!(manager.drop_index("name"));
        assert!(!manager.drop_index("name"));
        assert!(!manager.has_index("name"));
    }

    #[test]
    fn test_maintenance_ignores_unindexed_keys() {
        let mut manager: IndexManager<u64> = IndexManager::new();
        manager.create_index("name");

        manager.index_insert("name", &"marko".into(), 1);
        manager.index_insert("age", &29.into(), 1);

        assert_eq!(manager.lookup("name", &P::eq("marko")), Some(vec![1]));
        assert_eq!(manager.lookup("age", &P::eq(29)), None);

        manager.index_remove("name", &"marko".into(), &1);
        assert_eq!(manager.lookup("name", &P::eq("marko")), Some(vec![]));
    }

    #[test]
    fn test_clear_keeps_definitions() {
        let mut manager: IndexManager<u64> = IndexManager::new();
        manager.create_index("name");
        manager.create_index("age");
        manager.index_insert("name", &"vadas".into(), 2);

        manager.clear();
        assert_eq!(manager.indexed_keys(), vec!["age".to_string(), "name".to_string()]);
        assert!(manager.get_index("name").map(|i| i.is_empty()).unwrap_or(false));
    }
}
