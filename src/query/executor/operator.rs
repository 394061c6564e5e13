//! Physical operators for traversal execution (Volcano iterator model)
//!
//! Every operator is an explicit state machine: whatever it needs to resume
//! (cursor positions, counters, buffered neighbours) lives in the operator,
//! and it pulls from its input only when it has nothing left to emit.

use super::traverser::Traverser;
use super::{ExecutionError, ExecutionResult};
use crate::graph::{Edge, EdgeId, Element, ElementKind, ElementTable, GraphStore, PropertyValue, Vertex};
use crate::query::step::{accepts_all, Direction, HasContainer, HasKey, VertexStep};
use tracing::debug;

/// Physical operator trait - all operators implement this
pub trait PhysicalOperator<'g>: Send {
    /// Get the next traverser, or `None` when exhausted
    fn next(&mut self, store: &'g GraphStore) -> ExecutionResult<Option<Traverser<'g>>>;

    /// Reset the operator to start from the beginning
    fn reset(&mut self);
}

/// Type alias for boxed operators
pub type OperatorBox<'g> = Box<dyn PhysicalOperator<'g> + 'g>;

fn unexpected(operator: &str, expected: &str, got: &Traverser<'_>) -> ExecutionError {
    ExecutionError::TypeError(format!(
        "{} expects a {} but got a {}",
        operator,
        expected,
        got.type_name()
    ))
}

#[derive(Debug)]
enum ScanCursor<I> {
    /// Not started; the access path is chosen on the first pull
    Pending,
    /// Position in the explicit id list
    Ids(usize),
    /// Index candidates (store order) and position
    Candidates(Vec<I>, usize),
    /// Store position of a full scan
    Full(usize),
}

/// Source operator for `V(ids...)` / `E(ids...)`
///
/// With explicit ids, emits those elements in the given order, skipping ids
/// that do not exist. Otherwise the first container an index can answer
/// drives the scan; with none, every element is visited in store order.
/// Every container is evaluated on every emitted element regardless of the
/// access path, so an index may safely over-approximate.
pub struct GraphScanOperator<E: Element> {
    ids: Vec<E::Id>,
    containers: Vec<HasContainer>,
    cursor: ScanCursor<E::Id>,
}

impl<E: Element> GraphScanOperator<E> {
    pub fn new(ids: Vec<E::Id>, containers: Vec<HasContainer>) -> Self {
        Self {
            ids,
            containers,
            cursor: ScanCursor::Pending,
        }
    }

    fn open(&self, table: &ElementTable<E>) -> ScanCursor<E::Id> {
        if !self.ids.is_empty() {
            return ScanCursor::Ids(0);
        }
        for container in &self.containers {
            let candidates = match &container.key {
                HasKey::Id => table.ids_by_id(&container.predicate),
                HasKey::Label => table.ids_by_label(&container.predicate),
                HasKey::Property(key) => table.ids_by_property(key, &container.predicate),
            };
            if let Some(ids) = candidates {
                debug!(
                    kind = %E::KIND,
                    container = %container,
                    candidates = ids.len(),
                    "index drives graph step"
                );
                return ScanCursor::Candidates(ids, 0);
            }
        }
        if !self.containers.is_empty() {
            debug!(kind = %E::KIND, containers = self.containers.len(), "no usable index, full scan");
        }
        ScanCursor::Full(0)
    }
}

impl<'g, E> PhysicalOperator<'g> for GraphScanOperator<E>
where
    E: Element + 'g,
    &'g E: Into<Traverser<'g>>,
{
    fn next(&mut self, store: &'g GraphStore) -> ExecutionResult<Option<Traverser<'g>>> {
        let table = E::table(store);
        if matches!(self.cursor, ScanCursor::Pending) {
            self.cursor = self.open(table);
        }

        loop {
            let element = match &mut self.cursor {
                ScanCursor::Pending => return Ok(None),
                ScanCursor::Ids(pos) => {
                    let Some(id) = self.ids.get(*pos) else {
                        return Ok(None);
                    };
                    *pos += 1;
                    match table.scan_id(id) {
                        Some(element) => element,
                        None => continue,
                    }
                }
                ScanCursor::Candidates(ids, pos) => {
                    let Some(id) = ids.get(*pos) else {
                        return Ok(None);
                    };
                    *pos += 1;
                    match table.scan_id(id) {
                        Some(element) => element,
                        None => continue,
                    }
                }
                ScanCursor::Full(pos) => {
                    let Some(element) = table.scan_at(*pos) else {
                        return Ok(None);
                    };
                    *pos += 1;
                    element
                }
            };

            if accepts_all(&self.containers, element) {
                return Ok(Some(element.into()));
            }
        }
    }

    fn reset(&mut self) {
        self.cursor = ScanCursor::Pending;
    }
}

/// Filter operator: `has(key, predicate)` outside the source step
pub struct HasFilterOperator<'g> {
    input: OperatorBox<'g>,
    container: HasContainer,
}

impl<'g> HasFilterOperator<'g> {
    pub fn new(input: OperatorBox<'g>, container: HasContainer) -> Self {
        Self { input, container }
    }
}

impl<'g> PhysicalOperator<'g> for HasFilterOperator<'g> {
    fn next(&mut self, store: &'g GraphStore) -> ExecutionResult<Option<Traverser<'g>>> {
        while let Some(traverser) = self.input.next(store)? {
            let keep = match &traverser {
                Traverser::Vertex(v) => self.container.accepts(*v),
                Traverser::Edge(e) => self.container.accepts(*e),
                Traverser::Value(_) => return Err(unexpected("has()", "vertex or edge", &traverser)),
            };
            if keep {
                return Ok(Some(traverser));
            }
        }
        Ok(None)
    }

    fn reset(&mut self) {
        self.input.reset();
    }
}

/// Incident edges of the vertex currently being expanded
struct Incident<'g> {
    outgoing: &'g [EdgeId],
    incoming: &'g [EdgeId],
    pos: usize,
}

impl<'g> Incident<'g> {
    /// Next incident edge id, flagged true when it leaves the vertex
    fn next(&mut self) -> Option<(&'g EdgeId, bool)> {
        let (outgoing, incoming) = (self.outgoing, self.incoming);
        let pos = self.pos;
        self.pos += 1;
        match outgoing.get(pos) {
            Some(id) => Some((id, true)),
            None => incoming.get(pos - outgoing.len()).map(|id| (id, false)),
        }
    }
}

/// Expand operator: `out/in/both` and `outE/inE/bothE`
///
/// `both` walks the outgoing list then the incoming list, so a self-loop
/// is reached twice.
pub struct VertexExpandOperator<'g> {
    input: OperatorBox<'g>,
    step: VertexStep,
    current: Option<Incident<'g>>,
}

impl<'g> VertexExpandOperator<'g> {
    pub fn new(input: OperatorBox<'g>, step: VertexStep) -> Self {
        Self {
            input,
            step,
            current: None,
        }
    }

    fn follows(&self, edge: &Edge) -> bool {
        self.step.labels.is_empty() || self.step.labels.iter().any(|l| l == edge.label.as_str())
    }
}

impl<'g> PhysicalOperator<'g> for VertexExpandOperator<'g> {
    fn next(&mut self, store: &'g GraphStore) -> ExecutionResult<Option<Traverser<'g>>> {
        loop {
            if let Some(incident) = self.current.as_mut() {
                match incident.next() {
                    Some((edge_id, leaving)) => {
                        let Some(edge) = store.edge_table().get(edge_id) else {
                            continue;
                        };
                        if !self.follows(edge) {
                            continue;
                        }
                        match self.step.returns {
                            ElementKind::Edge => return Ok(Some(Traverser::Edge(edge))),
                            ElementKind::Vertex => {
                                let neighbour = if leaving { &edge.in_v } else { &edge.out_v };
                                if let Some(vertex) = store.vertex_table().get(neighbour) {
                                    return Ok(Some(Traverser::Vertex(vertex)));
                                }
                            }
                        }
                        continue;
                    }
                    None => self.current = None,
                }
            }

            let Some(traverser) = self.input.next(store)? else {
                return Ok(None);
            };
            let vertex = traverser
                .as_vertex()
                .ok_or_else(|| unexpected("vertex step", "vertex", &traverser))?;
            let outgoing: &'g [EdgeId] = match self.step.direction {
                Direction::Out | Direction::Both => store.out_edge_ids(&vertex.id),
                Direction::In => &[],
            };
            let incoming: &'g [EdgeId] = match self.step.direction {
                Direction::In | Direction::Both => store.in_edge_ids(&vertex.id),
                Direction::Out => &[],
            };
            self.current = Some(Incident {
                outgoing,
                incoming,
                pos: 0,
            });
        }
    }

    fn reset(&mut self) {
        self.input.reset();
        self.current = None;
    }
}

/// Endpoint operator: `outV/inV/bothV`
pub struct EdgeVertexOperator<'g> {
    input: OperatorBox<'g>,
    direction: Direction,
    /// Second endpoint of a `bothV` still to emit
    pending: Option<&'g Vertex>,
}

impl<'g> EdgeVertexOperator<'g> {
    pub fn new(input: OperatorBox<'g>, direction: Direction) -> Self {
        Self {
            input,
            direction,
            pending: None,
        }
    }
}

impl<'g> PhysicalOperator<'g> for EdgeVertexOperator<'g> {
    fn next(&mut self, store: &'g GraphStore) -> ExecutionResult<Option<Traverser<'g>>> {
        if let Some(vertex) = self.pending.take() {
            return Ok(Some(Traverser::Vertex(vertex)));
        }
        loop {
            let Some(traverser) = self.input.next(store)? else {
                return Ok(None);
            };
            let edge = traverser
                .as_edge()
                .ok_or_else(|| unexpected("edge vertex step", "edge", &traverser))?;
            let vertices = store.vertex_table();
            let (first, second) = match self.direction {
                Direction::Out => (vertices.get(&edge.out_v), None),
                Direction::In => (vertices.get(&edge.in_v), None),
                Direction::Both => (vertices.get(&edge.out_v), vertices.get(&edge.in_v)),
            };
            match (first, second) {
                (Some(first), second) => {
                    self.pending = second;
                    return Ok(Some(Traverser::Vertex(first)));
                }
                (None, Some(second)) => return Ok(Some(Traverser::Vertex(second))),
                (None, None) => continue,
            }
        }
    }

    fn reset(&mut self) {
        self.input.reset();
        self.pending = None;
    }
}

/// Projection operator: `values(key)`. Elements without the key emit
/// nothing; multi-valued vertex properties emit every value.
pub struct PropertiesOperator<'g> {
    input: OperatorBox<'g>,
    key: String,
    values: &'g [PropertyValue],
    pos: usize,
}

impl<'g> PropertiesOperator<'g> {
    pub fn new(input: OperatorBox<'g>, key: String) -> Self {
        Self {
            input,
            key,
            values: &[],
            pos: 0,
        }
    }
}

impl<'g> PhysicalOperator<'g> for PropertiesOperator<'g> {
    fn next(&mut self, store: &'g GraphStore) -> ExecutionResult<Option<Traverser<'g>>> {
        loop {
            if let Some(value) = self.values.get(self.pos) {
                self.pos += 1;
                return Ok(Some(Traverser::Value(value.clone())));
            }

            let Some(traverser) = self.input.next(store)? else {
                return Ok(None);
            };
            self.values = match &traverser {
                Traverser::Vertex(v) => Element::values(*v, &self.key),
                Traverser::Edge(e) => Element::values(*e, &self.key),
                Traverser::Value(_) => return Err(unexpected("values()", "vertex or edge", &traverser)),
            };
            self.pos = 0;
        }
    }

    fn reset(&mut self) {
        self.input.reset();
        self.values = &[];
        self.pos = 0;
    }
}

/// Limit operator: emits at most `limit` traversers, then stops pulling
pub struct LimitOperator<'g> {
    /// Input operator
    input: OperatorBox<'g>,
    /// Maximum number of traversers
    limit: usize,
    /// Current count
    count: usize,
}

impl<'g> LimitOperator<'g> {
    /// Create a new limit operator
    pub fn new(input: OperatorBox<'g>, limit: usize) -> Self {
        Self { input, limit, count: 0 }
    }
}

impl<'g> PhysicalOperator<'g> for LimitOperator<'g> {
    fn next(&mut self, store: &'g GraphStore) -> ExecutionResult<Option<Traverser<'g>>> {
        if self.count >= self.limit {
            return Ok(None);
        }

        if let Some(traverser) = self.input.next(store)? {
            self.count += 1;
            Ok(Some(traverser))
        } else {
            Ok(None)
        }
    }

    fn reset(&mut self) {
        self.input.reset();
        self.count = 0;
    }
}

/// Count operator: drains its input and emits one integer
pub struct CountOperator<'g> {
    input: OperatorBox<'g>,
    done: bool,
}

impl<'g> CountOperator<'g> {
    pub fn new(input: OperatorBox<'g>) -> Self {
        Self { input, done: false }
    }
}

impl<'g> PhysicalOperator<'g> for CountOperator<'g> {
    fn next(&mut self, store: &'g GraphStore) -> ExecutionResult<Option<Traverser<'g>>> {
        if self.done {
            return Ok(None);
        }
        let mut count: i64 = 0;
        while self.input.next(store)?.is_some() {
            count += 1;
        }
        self.done = true;
        Ok(Some(Traverser::Value(PropertyValue::Integer(count))))
    }

    fn reset(&mut self) {
        self.input.reset();
        self.done = false;
    }
}
