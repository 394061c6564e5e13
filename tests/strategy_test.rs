mod common;

use common::{count, load_modern, names};
use samyama_traversal::{
    GraphStepStrategy, GraphStore, Step, TraversalStrategies, TraversalStrategy, P,
};
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn test_has_steps_fold_into_graph_step() {
    let store = GraphStore::new();
    let traversal = store
        .traversal()
        .v()
        .has("name", "marko")
        .has_id(1)
        .out(&["created"])
        .has("lang", "java");

    assert_eq!(
        traversal.to_string(),
        "[GraphStep(vertex,[]), HasStep([name.eq(marko)]), HasStep([~id.eq(1)]), \
         VertexStep(OUT,[created],vertex), HasStep([lang.eq(java)])]"
    );

    let traversal = traversal.apply_strategies();
    assert_eq!(
        traversal.to_string(),
        "[GraphStep(vertex,[],[name.eq(marko), ~id.eq(1)]), \
         VertexStep(OUT,[created],vertex), HasStep([lang.eq(java)])]"
    );

    // A second application changes nothing
    let mut steps = traversal.steps().to_vec();
    GraphStepStrategy.apply(&mut steps);
    assert_eq!(steps, traversal.steps());
}

#[test]
fn test_without_strategies_keeps_steps() {
    let store = GraphStore::new();
    let traversal = store
        .traversal()
        .without_strategies()
        .v()
        .has("name", "marko")
        .apply_strategies();
    assert_eq!(traversal.steps().len(), 2);

    let traversal = store.traversal().v().has("name", "marko").without_strategies();
    assert_eq!(traversal.steps().len(), 2);
    assert!(matches!(traversal.steps()[1], Step::Has(_)));
}

#[test]
fn test_later_container_can_drive_index() {
    let mut store = GraphStore::new();
    store.create_index(samyama_traversal::ElementKind::Vertex, "name");
    load_modern(&mut store);

    // age is not indexed, name is: the name container picks the candidates
    let before = store.stats();
    let found = names(store.traversal().v().has("age", P::gt(30)).has("name", "josh"));
    let after = store.stats();

    assert_eq!(found, vec!["josh"]);
    assert_eq!(after.index_lookups, before.index_lookups + 1);
    assert_eq!(after.vertices_scanned - before.vertices_scanned, 1);
}

#[test]
fn test_id_and_label_containers_use_store_lookups() {
    let mut store = GraphStore::new();
    load_modern(&mut store);

    let before = store.stats();
    assert_eq!(count(store.traversal().v().has_id(P::within([2, 4]))), 2);
    assert_eq!(count(store.traversal().v().has_label("software")), 2);
    let after = store.stats();

    assert_eq!(after.index_lookups, before.index_lookups + 2);
    assert_eq!(after.vertices_scanned - before.vertices_scanned, 4);
}

#[test]
fn test_step_added_after_pull_is_pushed_down() {
    let mut store = GraphStore::new();
    store.create_index(samyama_traversal::ElementKind::Vertex, "name");
    load_modern(&mut store);

    let mut traversal = store.traversal().v();
    assert!(traversal.has_next().unwrap());

    let traversal = traversal.has("name", "marko").apply_strategies();
    assert_eq!(
        traversal.to_string(),
        "[GraphStep(vertex,[],[name.eq(marko)])]"
    );

    let before = store.stats();
    assert_eq!(names(traversal), vec!["marko"]);
    assert_eq!(store.stats().index_lookups, before.index_lookups + 1);
}

static APPLIED: AtomicUsize = AtomicUsize::new(0);

/// Drops every limit step; only used to observe when strategies run
#[derive(Debug)]
struct DropLimits;

impl TraversalStrategy for DropLimits {
    fn name(&self) -> &'static str {
        "DropLimits"
    }

    fn apply(&self, steps: &mut Vec<Step>) {
        APPLIED.fetch_add(1, Ordering::SeqCst);
        steps.retain(|step| !matches!(step, Step::Limit(_)));
    }
}

#[test]
fn test_custom_strategy_runs_once_before_first_pull() {
    let mut store = GraphStore::new();
    load_modern(&mut store);

    let strategies = TraversalStrategies::default().with(DropLimits);
    assert_eq!(strategies.names(), vec!["GraphStepStrategy", "DropLimits"]);

    let source = store.traversal().with_strategies(strategies);
    let mut traversal = source.v().has_label("person").limit(1);
    assert_eq!(APPLIED.load(Ordering::SeqCst), 0);

    assert!(traversal.has_next().unwrap());
    assert_eq!(APPLIED.load(Ordering::SeqCst), 1);
    assert_eq!(traversal.steps().len(), 1);

    let all = traversal.to_list().unwrap();
    assert_eq!(all.len(), 4);
    assert_eq!(APPLIED.load(Ordering::SeqCst), 1);
}

#[test]
fn test_empty_strategy_set() {
    let mut store = GraphStore::new();
    load_modern(&mut store);

    let source = store.traversal().with_strategies(TraversalStrategies::empty());
    let traversal = source.v().has("name", "vadas").apply_strategies();
    assert_eq!(traversal.steps().len(), 2);
    assert_eq!(count(traversal), 1);
}
