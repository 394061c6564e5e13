//! Fluent traversal API
//!
//! ```no_run
//! use samyama_traversal::{GraphStore, P};
//!
//! let store = GraphStore::new();
//! let names = store
//!     .traversal()
//!     .v()
//!     .has("age", P::gt(30))
//!     .out(&["created"])
//!     .values("name")
//!     .to_list()?;
//! # Ok::<(), samyama_traversal::ExecutionError>(())
//! ```
//!
//! Nothing runs until the first pull. At that point the strategies are
//! applied once, the steps are planned into operators, and results are then
//! produced one at a time.

use super::executor::{ExecutionError, ExecutionResult, OperatorBox, TraversalPlanner, Traverser};
use super::predicate::P;
use super::step::{Direction, GraphStep, HasContainer, HasKey, Step, VertexStep};
use super::strategy::TraversalStrategies;
use crate::graph::{ElementId, ElementKind, GraphStore};
use std::fmt;

/// Entry point for traversals over one store: `g` in `g.V()...`
#[derive(Debug, Clone)]
pub struct GraphTraversalSource<'g> {
    store: &'g GraphStore,
    strategies: TraversalStrategies,
    optimize: bool,
}

impl<'g> GraphTraversalSource<'g> {
    pub fn new(store: &'g GraphStore) -> Self {
        Self {
            store,
            strategies: TraversalStrategies::default(),
            optimize: store.config().optimize,
        }
    }

    /// Use a custom strategy set for traversals spawned from this source
    pub fn with_strategies(mut self, strategies: TraversalStrategies) -> Self {
        self.strategies = strategies;
        self
    }

    /// Spawn traversals that run their steps exactly as written
    pub fn without_strategies(mut self) -> Self {
        self.optimize = false;
        self
    }

    /// All vertices
    pub fn v(&self) -> GraphTraversal<'g> {
        self.spawn(GraphStep::new(ElementKind::Vertex, Vec::new()))
    }

    /// Vertices with the given ids, in the given order
    pub fn v_ids<I, T>(&self, ids: I) -> GraphTraversal<'g>
    where
        I: IntoIterator<Item = T>,
        T: Into<ElementId>,
    {
        self.spawn(GraphStep::new(
            ElementKind::Vertex,
            ids.into_iter().map(Into::into).collect(),
        ))
    }

    /// All edges
    pub fn e(&self) -> GraphTraversal<'g> {
        self.spawn(GraphStep::new(ElementKind::Edge, Vec::new()))
    }

    /// Edges with the given ids, in the given order
    pub fn e_ids<I, T>(&self, ids: I) -> GraphTraversal<'g>
    where
        I: IntoIterator<Item = T>,
        T: Into<ElementId>,
    {
        self.spawn(GraphStep::new(
            ElementKind::Edge,
            ids.into_iter().map(Into::into).collect(),
        ))
    }

    fn spawn(&self, source: GraphStep) -> GraphTraversal<'g> {
        GraphTraversal {
            store: self.store,
            steps: vec![Step::Graph(source)],
            strategies: self.strategies.clone(),
            optimize: self.optimize,
            applied: false,
            root: None,
            pending: None,
        }
    }
}

/// A pipeline of steps plus its execution cursor
pub struct GraphTraversal<'g> {
    store: &'g GraphStore,
    steps: Vec<Step>,
    strategies: TraversalStrategies,
    optimize: bool,
    /// Strategies have run over `steps`
    applied: bool,
    /// Operator chain, built on the first pull
    root: Option<OperatorBox<'g>>,
    /// Result fetched by `has_next` and not yet returned
    pending: Option<Traverser<'g>>,
}

impl<'g> GraphTraversal<'g> {
    fn add_step(mut self, step: Step) -> Self {
        // a traversal extended after it started pulling starts over, and the
        // new step gets its own chance to be rewritten
        self.root = None;
        self.pending = None;
        self.applied = false;
        self.steps.push(step);
        self
    }

    fn vertex_step(self, direction: Direction, labels: &[&str], returns: ElementKind) -> Self {
        self.add_step(Step::Vertex(VertexStep {
            direction,
            labels: labels.iter().map(|l| l.to_string()).collect(),
            returns,
        }))
    }

    /// Keep elements whose property `key` satisfies the predicate. A bare
    /// value means equality.
    pub fn has(self, key: impl Into<String>, predicate: impl Into<P>) -> Self {
        self.add_step(Step::Has(HasContainer::property(key, predicate)))
    }

    /// Keep elements whose id satisfies the predicate
    pub fn has_id(self, predicate: impl Into<P>) -> Self {
        self.add_step(Step::Has(HasContainer::new(HasKey::Id, predicate.into())))
    }

    /// Keep elements whose label satisfies the predicate
    pub fn has_label(self, predicate: impl Into<P>) -> Self {
        self.add_step(Step::Has(HasContainer::new(HasKey::Label, predicate.into())))
    }

    /// Adjacent vertices over outgoing edges with one of `labels` (any, if empty)
    pub fn out(self, labels: &[&str]) -> Self {
        self.vertex_step(Direction::Out, labels, ElementKind::Vertex)
    }

    /// Adjacent vertices over incoming edges
    pub fn in_(self, labels: &[&str]) -> Self {
        self.vertex_step(Direction::In, labels, ElementKind::Vertex)
    }

    pub fn both(self, labels: &[&str]) -> Self {
        self.vertex_step(Direction::Both, labels, ElementKind::Vertex)
    }

    /// Outgoing edges
    pub fn out_e(self, labels: &[&str]) -> Self {
        self.vertex_step(Direction::Out, labels, ElementKind::Edge)
    }

    pub fn in_e(self, labels: &[&str]) -> Self {
        self.vertex_step(Direction::In, labels, ElementKind::Edge)
    }

    pub fn both_e(self, labels: &[&str]) -> Self {
        self.vertex_step(Direction::Both, labels, ElementKind::Edge)
    }

    /// Tail vertex of each edge
    pub fn out_v(self) -> Self {
        self.add_step(Step::EdgeVertex(Direction::Out))
    }

    /// Head vertex of each edge
    pub fn in_v(self) -> Self {
        self.add_step(Step::EdgeVertex(Direction::In))
    }

    pub fn both_v(self) -> Self {
        self.add_step(Step::EdgeVertex(Direction::Both))
    }

    /// Values of a property
    pub fn values(self, key: impl Into<String>) -> Self {
        self.add_step(Step::Properties(key.into()))
    }

    pub fn limit(self, n: usize) -> Self {
        self.add_step(Step::Limit(n))
    }

    pub fn count(self) -> Self {
        self.add_step(Step::Count)
    }

    /// The current pipeline
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Run the strategies now rather than at the first pull
    pub fn apply_strategies(mut self) -> Self {
        self.ensure_strategies();
        self
    }

    /// Run the steps exactly as written
    pub fn without_strategies(mut self) -> Self {
        self.optimize = false;
        self
    }

    fn ensure_strategies(&mut self) {
        if self.optimize && !self.applied {
            self.strategies.apply(&mut self.steps);
            self.applied = true;
        }
    }

    fn root(&mut self) -> ExecutionResult<&mut OperatorBox<'g>> {
        if self.root.is_none() {
            self.ensure_strategies();
            self.root = Some(TraversalPlanner::new().plan(&self.steps)?);
        }
        self.root
            .as_mut()
            .ok_or_else(|| ExecutionError::PlanningError("traversal has no plan".to_string()))
    }

    /// Whether another result is available. May pull one result ahead.
    pub fn has_next(&mut self) -> ExecutionResult<bool> {
        if self.pending.is_none() {
            let store = self.store;
            self.pending = self.root()?.next(store)?;
        }
        Ok(self.pending.is_some())
    }

    /// The next result, or [`ExecutionError::NoSuchElement`] when exhausted
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> ExecutionResult<Traverser<'g>> {
        self.try_next()?.ok_or(ExecutionError::NoSuchElement)
    }

    /// The next result, or `None` when exhausted
    pub fn try_next(&mut self) -> ExecutionResult<Option<Traverser<'g>>> {
        if let Some(pending) = self.pending.take() {
            return Ok(Some(pending));
        }
        let store = self.store;
        self.root()?.next(store)
    }

    /// Every remaining result
    pub fn to_list(mut self) -> ExecutionResult<Vec<Traverser<'g>>> {
        let mut results = Vec::new();
        while let Some(traverser) = self.try_next()? {
            results.push(traverser);
        }
        Ok(results)
    }

    /// Standard iterator over the remaining results
    pub fn iter(self) -> TraversalIter<'g> {
        TraversalIter {
            traversal: self,
            failed: false,
        }
    }
}

impl fmt::Debug for GraphTraversal<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphTraversal")
            .field("steps", &self.steps)
            .field("optimize", &self.optimize)
            .field("applied", &self.applied)
            .field("started", &self.root.is_some())
            .finish()
    }
}

impl fmt::Display for GraphTraversal<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", step)?;
        }
        write!(f, "]")
    }
}

/// Iterator adapter returned by [`GraphTraversal::iter`]. Stops after the
/// first error.
pub struct TraversalIter<'g> {
    traversal: GraphTraversal<'g>,
    failed: bool,
}

impl<'g> Iterator for TraversalIter<'g> {
    type Item = ExecutionResult<Traverser<'g>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.traversal.try_next() {
            Ok(Some(traverser)) => Some(Ok(traverser)),
            Ok(None) => None,
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

impl<'g> IntoIterator for GraphTraversal<'g> {
    type Item = ExecutionResult<Traverser<'g>>;
    type IntoIter = TraversalIter<'g>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::VertexId;

    fn store() -> GraphStore {
        let mut store = GraphStore::new();
        let marko = store
            .add_vertex_with_id(1, "person", vec![("name", "marko".into()), ("age", 29.into())])
            .unwrap();
        let lop = store
            .add_vertex_with_id(3, "software", vec![("name", "lop".into()), ("lang", "java".into())])
            .unwrap();
        let josh = store
            .add_vertex_with_id(4, "person", vec![("name", "josh".into()), ("age", 32.into())])
            .unwrap();
        store.add_edge_with_id(9, &marko, "created", &lop, vec![("weight", 0.4.into())]).unwrap();
        store.add_edge_with_id(8, &marko, "knows", &josh, vec![("weight", 1.0.into())]).unwrap();
        store
    }

    fn names(traversal: GraphTraversal<'_>) -> Vec<String> {
        traversal
            .to_list()
            .unwrap()
            .iter()
            .map(|t| t.to_string())
            .collect()
    }

    #[test]
    fn test_lazy_until_first_pull() {
        let store = store();
        let traversal = store.traversal().v().has("name", "marko").out(&[]);
        // built, not yet rewritten
        assert_eq!(traversal.steps().len(), 3);
        let traversal = traversal.apply_strategies();
        assert_eq!(traversal.steps().len(), 2);
        assert_eq!(traversal.to_string(), "[GraphStep(vertex,[],[name.eq(marko)]), VertexStep(OUT,[],vertex)]");
    }

    #[test]
    fn test_has_next_and_next() {
        let store = store();
        let mut traversal = store.traversal().v_ids([4, 1]);

        assert!(traversal.has_next().unwrap());
        assert!(traversal.has_next().unwrap());
        assert_eq!(traversal.next().unwrap().as_vertex().map(|v| v.id.clone()), Some(VertexId::new(4)));
        assert_eq!(traversal.next().unwrap().as_vertex().map(|v| v.id.clone()), Some(VertexId::new(1)));
        assert!(!traversal.has_next().unwrap());
        assert_eq!(traversal.next().unwrap_err(), ExecutionError::NoSuchElement);
    }

    #[test]
    fn test_navigation() {
        let store = store();
        let g = store.traversal();
        assert_eq!(names(g.v_ids([1]).out(&["created"]).values("name")), vec!["lop"]);
        assert_eq!(names(g.v_ids([4]).in_(&[]).values("name")), vec!["marko"]);
        assert_eq!(names(g.v_ids([1]).both(&[])), vec!["v[3]", "v[4]"]);
        assert_eq!(names(g.v_ids([1]).out_e(&["knows"]).in_v()), vec!["v[4]"]);
        assert_eq!(names(g.v_ids([3]).in_e(&[]).out_v().values("age")), vec!["29"]);
        assert_eq!(names(g.e().has("weight", P::gt(0.5)).both_v()), vec!["v[1]", "v[4]"]);
        assert_eq!(names(g.v_ids([4]).both_e(&[])), vec!["e[8][1-knows->4]"]);
    }

    #[test]
    fn test_has_id_and_label() {
        let store = store();
        let g = store.traversal();
        assert_eq!(names(g.v().has_label("person").values("name")), vec!["marko", "josh"]);
        assert_eq!(names(g.v().has_id(P::within([3, 4]))), vec!["v[3]", "v[4]"]);
        assert_eq!(names(g.e().has_label("created")), vec!["e[9][1-created->3]"]);
    }

    #[test]
    fn test_count_and_limit() {
        let store = store();
        let g = store.traversal();
        let mut count = g.v().count();
        assert_eq!(count.next().unwrap().as_integer(), Some(3));
        assert!(!count.has_next().unwrap());

        assert_eq!(names(g.v().limit(2)), vec!["v[1]", "v[3]"]);
        assert_eq!(names(g.v().limit(0)), Vec::<String>::new());
    }

    #[test]
    fn test_iterator_adapter_stops_on_error() {
        let store = store();
        let results: Vec<_> = store.traversal().v().values("name").out(&[]).iter().collect();
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(ExecutionError::TypeError(_))));

        let ok: ExecutionResult<Vec<_>> = store.traversal().v().into_iter().collect();
        assert_eq!(ok.unwrap().len(), 3);
    }

    #[test]
    fn test_without_strategies_keeps_steps() {
        let store = store();
        let traversal = store.traversal().v().has("name", "josh").without_strategies().apply_strategies();
        assert_eq!(traversal.steps().len(), 2);
        assert_eq!(names(traversal), vec!["v[4]"]);
    }
}
