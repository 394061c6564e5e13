//! Traversal processing module
//!
//! - `predicate`: three-valued comparison predicates
//! - `step`: the step pipeline as plain data
//! - `strategy`: rewrites applied before execution (filter pushdown)
//! - `executor`: pull-based operators and the planner that builds them
//! - `traversal`: the fluent API tying it together
//!
//! Architecture follows the Volcano iterator model: each operator pulls
//! from its input only when asked for a result.

pub mod executor;
pub mod predicate;
pub mod step;
pub mod strategy;
pub mod traversal;

// Re-export main types
pub use executor::{ExecutionError, ExecutionResult, Traverser};
pub use predicate::{Ternary, P};
pub use step::{Direction, GraphStep, HasContainer, HasKey, Step, VertexStep};
pub use strategy::{GraphStepStrategy, TraversalStrategies, TraversalStrategy};
pub use traversal::{GraphTraversal, GraphTraversalSource, TraversalIter};
