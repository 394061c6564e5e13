//! Store configuration
//!
//! A [`GraphConfig`] is handed to [`GraphStore::open`](crate::GraphStore::open).
//! It can be built in code or loaded from YAML:
//!
//! ```yaml
//! vertex_id_strategy: uuid
//! vertex_property_cardinality: single
//! vertex_indices: [name, age]
//! optimize: true
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// How the store generates ids when the caller does not supply one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Integers counting up from 1, skipping ids already taken
    #[default]
    Sequential,
    /// Random UUID v4 strings
    Uuid,
}

/// What `set_vertex_property` does with an existing key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    /// Append, keeping earlier values
    #[default]
    List,
    /// Replace all earlier values
    Single,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub vertex_id_strategy: IdStrategy,
    pub edge_id_strategy: IdStrategy,
    pub vertex_property_cardinality: Cardinality,
    /// Vertex property keys indexed when the store is opened
    pub vertex_indices: Vec<String>,
    /// Edge property keys indexed when the store is opened
    pub edge_indices: Vec<String>,
    /// Apply traversal strategies before the first pull
    pub optimize: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            vertex_id_strategy: IdStrategy::Sequential,
            edge_id_strategy: IdStrategy::Sequential,
            vertex_property_cardinality: Cardinality::List,
            vertex_indices: Vec::new(),
            edge_indices: Vec::new(),
            optimize: true,
        }
    }
}

impl GraphConfig {
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn with_vertex_index(mut self, key: impl Into<String>) -> Self {
        self.vertex_indices.push(key.into());
        self
    }

    pub fn with_edge_index(mut self, key: impl Into<String>) -> Self {
        self.edge_indices.push(key.into());
        self
    }

    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.vertex_property_cardinality = cardinality;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = GraphConfig::default();
        assert_eq!(config.vertex_id_strategy, IdStrategy::Sequential);
        assert_eq!(config.vertex_property_cardinality, Cardinality::List);
        assert!(config.optimize);
        assert!(config.vertex_indices.is_empty());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = GraphConfig::from_yaml_str(
            "vertex_id_strategy: uuid\nvertex_indices: [name, age]\n",
        )
        .unwrap();

        assert_eq!(config.vertex_id_strategy, IdStrategy::Uuid);
        assert_eq!(config.edge_id_strategy, IdStrategy::Sequential);
        assert_eq!(config.vertex_indices, vec!["name", "age"]);
        assert!(config.optimize);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = GraphConfig::from_yaml_str("vertex_property_cardinality: many\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "vertex_property_cardinality: single").unwrap();
        writeln!(file, "optimize: false").unwrap();

        let config = GraphConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.vertex_property_cardinality, Cardinality::Single);
        assert!(!config.optimize);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = GraphConfig::from_yaml_file(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
