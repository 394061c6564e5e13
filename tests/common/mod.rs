//! Shared fixtures for the integration tests

#![allow(dead_code)]

use samyama_traversal::{
    EdgeId, FeatureCategory, GraphConfig, GraphStore, GraphTraversal, VertexId,
};

/// Open a fresh store for one test; the store is dropped with the test
pub fn open(config: GraphConfig) -> GraphStore {
    let mut store = GraphStore::open(config);
    // A provider may hand back a store with leftover state
    store.clear();
    store
}

/// Skip the calling test unless the store supports every named feature
pub fn requires(store: &GraphStore, features: &[(FeatureCategory, &str)]) -> bool {
    features.iter().all(|(category, name)| {
        store
            .supports(*category, name)
            .unwrap_or_else(|e| panic!("invalid feature requirement: {}", e))
    })
}

/// Evaluate `traversal.count()` and unwrap the number
pub fn count(traversal: GraphTraversal<'_>) -> i64 {
    let mut traversal = traversal.count();
    traversal
        .next()
        .expect("count always yields a value")
        .as_integer()
        .expect("count yields an integer")
}

/// The six-vertex "modern" toy graph
pub struct Modern {
    pub marko: VertexId,
    pub vadas: VertexId,
    pub lop: VertexId,
    pub josh: VertexId,
    pub ripple: VertexId,
    pub peter: VertexId,
    pub edges: Vec<EdgeId>,
}

pub fn load_modern(store: &mut GraphStore) -> Modern {
    let person = |name: &str, age: i64| vec![("name", name.into()), ("age", age.into())];
    let software = |name: &str| vec![("name", name.into()), ("lang", "java".into())];

    let marko = store.add_vertex_with_id(1, "person", person("marko", 29)).unwrap();
    let vadas = store.add_vertex_with_id(2, "person", person("vadas", 27)).unwrap();
    let lop = store.add_vertex_with_id(3, "software", software("lop")).unwrap();
    let josh = store.add_vertex_with_id(4, "person", person("josh", 32)).unwrap();
    let ripple = store.add_vertex_with_id(5, "software", software("ripple")).unwrap();
    let peter = store.add_vertex_with_id(6, "person", person("peter", 35)).unwrap();

    let edges = [
        (7, &marko, "knows", &vadas, 0.5),
        (8, &marko, "knows", &josh, 1.0),
        (9, &marko, "created", &lop, 0.4),
        (10, &josh, "created", &ripple, 1.0),
        (11, &josh, "created", &lop, 0.4),
        (12, &peter, "created", &lop, 0.2),
    ]
    .into_iter()
    .map(|(id, out_v, label, in_v, weight)| {
        store
            .add_edge_with_id(id, out_v, label, in_v, vec![("weight", weight.into())])
            .unwrap()
    })
    .collect();

    Modern { marko, vadas, lop, josh, ripple, peter, edges }
}

/// Names of the vertices a traversal yields, in order
pub fn names(traversal: GraphTraversal<'_>) -> Vec<String> {
    traversal
        .values("name")
        .to_list()
        .unwrap()
        .into_iter()
        .filter_map(|t| t.as_value().and_then(|v| v.as_string()).map(str::to_string))
        .collect()
}
