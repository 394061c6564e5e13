//! Traversal execution engine using the Volcano iterator model
//!
//! The planner turns a step list into a chain of [`PhysicalOperator`]s; the
//! traversal pulls one result at a time from the root of the chain.

pub mod operator;
pub mod planner;
pub mod traverser;

pub use operator::{OperatorBox, PhysicalOperator};
pub use planner::TraversalPlanner;
pub use traverser::Traverser;

use crate::graph::GraphError;
use thiserror::Error;

/// Execution errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionError {
    /// `next()` on a traversal with no result left
    #[error("No such element: the traversal is exhausted")]
    NoSuchElement,

    /// Graph store error
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Planning error
    #[error("Planning error: {0}")]
    PlanningError(String),

    /// Type error
    #[error("Type error: {0}")]
    TypeError(String),
}

pub type ExecutionResult<T> = Result<T, ExecutionError>;
