//! Capability queries
//!
//! Compliance harnesses ask the store what it supports (e.g.
//! `supports(Vertex, "supportsUserSuppliedIds")`) and skip tests whose
//! requirements are not met instead of failing them.

use super::store::{GraphError, GraphResult};
use crate::config::{Cardinality, GraphConfig};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureCategory {
    Graph,
    Vertex,
    Edge,
    VertexProperty,
    EdgeProperty,
}

impl fmt::Display for FeatureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeatureCategory::Graph => "graph",
            FeatureCategory::Vertex => "vertex",
            FeatureCategory::Edge => "edge",
            FeatureCategory::VertexProperty => "vertex property",
            FeatureCategory::EdgeProperty => "edge property",
        };
        write!(f, "{}", name)
    }
}

const GRAPH_FEATURES: &[(&str, bool)] = &[
    ("transactions", false),
    ("threadedtransactions", false),
    ("persistence", false),
    ("computer", false),
    ("concurrentaccess", false),
    ("ioread", false),
    ("iowrite", false),
];

const ELEMENT_FEATURES: &[(&str, bool)] = &[
    ("usersuppliedids", true),
    ("numericids", true),
    ("stringids", true),
    ("uuidids", false),
    ("customids", false),
    ("anyids", false),
    ("addproperty", true),
    ("removeproperty", true),
];

const VERTEX_FEATURES: &[(&str, bool)] = &[
    ("addvertices", true),
    ("removevertices", true),
    ("metaproperties", false),
];

const EDGE_FEATURES: &[(&str, bool)] = &[("addedges", true), ("removeedges", true)];

const PROPERTY_FEATURES: &[(&str, bool)] = &[
    ("properties", true),
    ("booleanvalues", true),
    ("integervalues", true),
    ("longvalues", true),
    ("doublevalues", true),
    ("floatvalues", true),
    ("stringvalues", true),
    ("bytevalues", false),
    ("mapvalues", false),
    ("serializablevalues", false),
    ("uniformlistvalues", false),
    ("mixedlistvalues", false),
    ("booleanarrayvalues", false),
    ("integerarrayvalues", false),
    ("longarrayvalues", false),
    ("doublearrayvalues", false),
    ("floatarrayvalues", false),
    ("stringarrayvalues", false),
];

/// Feature set of one store, derived from its configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Features {
    multi_properties: bool,
}

impl Features {
    pub fn new(config: &GraphConfig) -> Self {
        Self {
            multi_properties: config.vertex_property_cardinality == Cardinality::List,
        }
    }

    /// Whether the store supports a named feature. Names are matched
    /// case-insensitively, with or without a `supports` prefix, ignoring
    /// `-`, `_` and spaces.
    pub fn supports(&self, category: FeatureCategory, name: &str) -> GraphResult<bool> {
        let normalized = normalize(name);

        if category == FeatureCategory::Vertex && normalized == "multiproperties" {
            return Ok(self.multi_properties);
        }

        let tables: &[&[(&str, bool)]] = match category {
            FeatureCategory::Graph => &[GRAPH_FEATURES],
            FeatureCategory::Vertex => &[VERTEX_FEATURES, ELEMENT_FEATURES],
            FeatureCategory::Edge => &[EDGE_FEATURES, ELEMENT_FEATURES],
            FeatureCategory::VertexProperty | FeatureCategory::EdgeProperty => &[PROPERTY_FEATURES],
        };

        tables
            .iter()
            .flat_map(|table| table.iter())
            .find(|(feature, _)| *feature == normalized)
            .map(|(_, supported)| *supported)
            .ok_or_else(|| GraphError::UnknownFeature {
                category,
                name: name.to_string(),
            })
    }
}

fn normalize(name: &str) -> String {
    let squashed: String = name
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect();
    match squashed.strip_prefix("supports") {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => squashed,
    }
}
