//! Traversal planner - converts a step list into an operator chain

use super::operator::{
    CountOperator, EdgeVertexOperator, GraphScanOperator, HasFilterOperator, LimitOperator,
    OperatorBox, PropertiesOperator, VertexExpandOperator,
};
use super::{ExecutionError, ExecutionResult};
use crate::graph::{Edge, ElementKind, Vertex};
use crate::query::step::{GraphStep, Step};

/// Traversal planner
#[derive(Debug, Clone, Copy, Default)]
pub struct TraversalPlanner;

impl TraversalPlanner {
    pub fn new() -> Self {
        Self
    }

    /// Build the operator chain for a pipeline. The first step must be the
    /// source `GraphStep`; every later step wraps the chain built so far.
    pub fn plan<'g>(&self, steps: &[Step]) -> ExecutionResult<OperatorBox<'g>> {
        let Some((Step::Graph(source), rest)) = steps.split_first() else {
            return Err(ExecutionError::PlanningError(
                "traversal must start with a graph step".to_string(),
            ));
        };

        let mut operator = Self::plan_source(source);
        for step in rest {
            let next: OperatorBox<'g> = match step {
                Step::Graph(_) => {
                    return Err(ExecutionError::PlanningError(
                        "graph step is only valid at the start of a traversal".to_string(),
                    ))
                }
                Step::Has(container) => Box::new(HasFilterOperator::new(operator, container.clone())),
                Step::Vertex(vertex_step) => Box::new(VertexExpandOperator::new(operator, vertex_step.clone())),
                Step::EdgeVertex(direction) => Box::new(EdgeVertexOperator::new(operator, *direction)),
                Step::Properties(key) => Box::new(PropertiesOperator::new(operator, key.clone())),
                Step::Limit(n) => Box::new(LimitOperator::new(operator, *n)),
                Step::Count => Box::new(CountOperator::new(operator)),
            };
            operator = next;
        }
        Ok(operator)
    }

    fn plan_source<'g>(source: &GraphStep) -> OperatorBox<'g> {
        let containers = source.has_containers.clone();
        let operator: OperatorBox<'g> = match source.kind {
            ElementKind::Vertex => {
                let ids = source.ids.iter().cloned().map(Into::into).collect();
                Box::new(GraphScanOperator::<Vertex>::new(ids, containers))
            }
            ElementKind::Edge => {
                let ids = source.ids.iter().cloned().map(Into::into).collect();
                Box::new(GraphScanOperator::<Edge>::new(ids, containers))
            }
        };
        operator
    }
}
