//! Samyama Traversal
//!
//! An in-memory property graph store with a lazily evaluated, pull-based
//! traversal engine and a rewrite layer that pushes filters into indexed
//! lookups.
//!
//! # Architecture
//!
//! - `graph`: vertices, edges, multi-valued properties, and the store that
//!   owns them together with the id, label and property indices
//! - `index`: B-Tree property indices, one manager per element kind
//! - `query`: three-valued predicates, the step pipeline, the pushdown
//!   strategy and the Volcano-style operators that execute it
//! - `config`: store configuration, loadable from YAML
//!
//! # Semantics
//!
//! - Predicates evaluate to TRUE, FALSE or ERROR. Filters keep an element only
//!   on TRUE, so NaN never satisfies `gt`, `gte`, `lt` or `lte`.
//! - Traversals pull one result at a time; `limit(n)` stops pulling upstream
//!   once it has emitted `n` results.
//! - Optimized and unoptimized traversals produce the same results in the
//!   same order.
//!
//! ## Example Usage
//!
//! ```rust
//! use samyama_traversal::{ElementKind, GraphStore, P};
//!
//! let mut store = GraphStore::new();
//! store.create_index(ElementKind::Vertex, "name");
//!
//! let marko = store.add_vertex("person", vec![("name", "marko".into()), ("age", 29.into())]);
//! let lop = store.add_vertex("software", vec![("name", "lop".into()), ("height", 173.into())]);
//! store.add_edge(&marko, "created", &lop, vec![("weight", 0.6.into())]).unwrap();
//!
//! let heights = store
//!     .traversal()
//!     .v()
//!     .has("name", "marko")
//!     .out(&["created"])
//!     .values("height")
//!     .to_list()
//!     .unwrap();
//! assert_eq!(heights[0].as_integer(), Some(173));
//!
//! let adults = store.traversal().v().has("age", P::gte(18)).count().next().unwrap();
//! assert_eq!(adults.as_integer(), Some(1));
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod graph;
pub mod index;
pub mod query;

// Re-export main types for convenience
pub use config::{Cardinality, ConfigError, ConfigResult, GraphConfig, IdStrategy};

pub use graph::{
    Edge, EdgeId, Element, ElementId, ElementKind, FeatureCategory, Features, GraphError,
    GraphResult, GraphStatistics, GraphStore, Label, PropertyValue, Vertex, VertexId,
};

pub use query::{
    ExecutionError, ExecutionResult, GraphStepStrategy, GraphTraversal, GraphTraversalSource,
    HasContainer, HasKey, Step, Ternary, TraversalStrategies, TraversalStrategy, Traverser, P,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.1.0");
    }
}
