//! Traversal steps
//!
//! A traversal is a `Vec<Step>` rooted at a [`GraphStep`]. Steps are plain
//! data; the planner turns them into pull-based operators.

use super::predicate::{Ternary, P};
use crate::graph::{Element, ElementId, ElementKind, PropertyValue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a `has` container tests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HasKey {
    /// The element id
    Id,
    /// The element label
    Label,
    /// A property key
    Property(String),
}

impl fmt::Display for HasKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HasKey::Id => write!(f, "~id"),
            HasKey::Label => write!(f, "~label"),
            HasKey::Property(key) => write!(f, "{}", key),
        }
    }
}

/// The atomic filter unit produced by `has(...)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HasContainer {
    pub key: HasKey,
    pub predicate: P,
}

impl HasContainer {
    pub fn new(key: HasKey, predicate: P) -> Self {
        Self { key, predicate }
    }

    pub fn property(key: impl Into<String>, predicate: impl Into<P>) -> Self {
        Self::new(HasKey::Property(key.into()), predicate.into())
    }

    /// Three-valued test of one element. A missing property is FALSE; a
    /// multi-valued property is TRUE if any value is.
    pub fn test<E: Element>(&self, element: &E) -> Ternary {
        match &self.key {
            HasKey::Id => self.predicate.test(&element.element_id().to_property()),
            HasKey::Label => self
                .predicate
                .test(&PropertyValue::String(element.label().as_str().to_string())),
            HasKey::Property(key) => self.predicate.test_any(element.values(key)),
        }
    }

    /// Boolean filter decision; ERROR counts as FALSE
    pub fn accepts<E: Element>(&self, element: &E) -> bool {
        self.test(element).is_true()
    }
}

impl fmt::Display for HasContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.key, self.predicate)
    }
}

/// Keep an element only if every container accepts it
pub fn accepts_all<E: Element>(containers: &[HasContainer], element: &E) -> bool {
    Ternary::all(containers.iter().map(|c| c.test(element))).is_true()
}

/// Edge direction relative to a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Out,
    In,
    Both,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Out => write!(f, "OUT"),
            Direction::In => write!(f, "IN"),
            Direction::Both => write!(f, "BOTH"),
        }
    }
}

/// Source step: `V(ids...)` / `E(ids...)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphStep {
    pub kind: ElementKind,
    /// Explicit ids; empty means every element of `kind`
    pub ids: Vec<ElementId>,
    /// Filters folded in by the pushdown strategy
    pub has_containers: Vec<HasContainer>,
}

impl GraphStep {
    pub fn new(kind: ElementKind, ids: Vec<ElementId>) -> Self {
        Self {
            kind,
            ids,
            has_containers: Vec::new(),
        }
    }
}

/// Expansion step: `out/in/both` (vertices) or `outE/inE/bothE` (edges)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexStep {
    pub direction: Direction,
    /// Edge labels to follow; empty follows every edge
    pub labels: Vec<String>,
    /// Emit the adjacent vertices, or the edges themselves
    pub returns: ElementKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Step {
    Graph(GraphStep),
    Has(HasContainer),
    Vertex(VertexStep),
    /// `outV/inV/bothV`: endpoints of an edge
    EdgeVertex(Direction),
    /// `values(key)`
    Properties(String),
    Limit(usize),
    Count,
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    write!(f, "[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    write!(f, "]")
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Graph(step) => {
                write!(f, "GraphStep({},", step.kind)?;
                write_list(f, &step.ids)?;
                if !step.has_containers.is_empty() {
                    write!(f, ",")?;
                    write_list(f, &step.has_containers)?;
                }
                write!(f, ")")
            }
            Step::Has(container) => write!(f, "HasStep([{}])", container),
            Step::Vertex(step) => {
                write!(f, "VertexStep({},", step.direction)?;
                write_list(f, &step.labels)?;
                write!(f, ",{})", step.returns)
            }
            Step::EdgeVertex(direction) => write!(f, "EdgeVertexStep({})", direction),
            Step::Properties(key) => write!(f, "PropertiesStep([{}],value)", key),
            Step::Limit(n) => write!(f, "LimitStep({})", n),
            Step::Count => write!(f, "CountStep"),
        }
    }
}
