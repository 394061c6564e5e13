//! Core graph database implementation
//!
//! This module implements the property graph data model with:
//! - Vertices with one label and multi-valued properties
//! - Directed, labelled edges with single-valued properties
//! - Multiple edges between the same vertices, including self-loops
//! - In-memory storage with an insertion-ordered primary index, a label
//!   index and optional property indices per element kind

pub mod edge;
pub mod element;
pub mod features;
pub mod property;
pub mod store;
pub mod table;
pub mod types;
pub mod vertex;

// Re-export main types
pub use edge::Edge;
pub use element::Element;
pub use features::{FeatureCategory, Features};
pub use property::{MultiPropertyMap, PropertyMap, PropertyValue};
pub use store::{GraphError, GraphResult, GraphStatistics, GraphStore};
pub use table::ElementTable;
pub use types::{EdgeId, ElementId, ElementKind, Label, VertexId};
pub use vertex::Vertex;
