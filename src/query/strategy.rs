//! Traversal rewrite strategies
//!
//! Strategies rewrite a step list in place before the first pull. The
//! default set holds one: [`GraphStepStrategy`], which pushes `has` filters
//! into the source step so it can answer them from an index.
//!
//! Before:
//! ```text
//! GraphStep(vertex,[])
//!   HasStep([name.eq(marko)])
//!   HasStep([~id.eq(1)])
//!   VertexStep(OUT,[created],vertex)
//! ```
//!
//! After:
//! ```text
//! GraphStep(vertex,[],[name.eq(marko), ~id.eq(1)])
//!   VertexStep(OUT,[created],vertex)
//! ```

use super::step::Step;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A pipeline rewrite. Rewrites never fail: anything a strategy cannot
/// improve is left as it was.
pub trait TraversalStrategy: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, steps: &mut Vec<Step>);
}

/// Folds the run of `HasStep`s directly after a `GraphStep` into the
/// GraphStep's container list. Idempotent: once folded, the GraphStep is
/// followed by a non-has step and there is nothing left to move.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphStepStrategy;

impl TraversalStrategy for GraphStepStrategy {
    fn name(&self) -> &'static str {
        "GraphStepStrategy"
    }

    fn apply(&self, steps: &mut Vec<Step>) {
        if !matches!(steps.first(), Some(Step::Graph(_))) {
            return;
        }
        let run = steps
            .iter()
            .skip(1)
            .take_while(|step| matches!(step, Step::Has(_)))
            .count();
        if run == 0 {
            return;
        }
        let folded: Vec<Step> = steps.drain(1..=run).collect();

        if let Some(Step::Graph(graph)) = steps.first_mut() {
            for step in folded {
                if let Step::Has(container) = step {
                    graph.has_containers.push(container);
                }
            }
            debug!(
                folded = run,
                containers = graph.has_containers.len(),
                "pushed has containers into graph step"
            );
        }
    }
}

/// Ordered set of strategies applied to a traversal
#[derive(Debug, Clone)]
pub struct TraversalStrategies {
    strategies: Vec<Arc<dyn TraversalStrategy>>,
}

impl TraversalStrategies {
    /// No strategies at all
    pub fn empty() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    pub fn with(mut self, strategy: impl TraversalStrategy + 'static) -> Self {
        self.strategies.push(Arc::new(strategy));
        self
    }

    pub fn apply(&self, steps: &mut Vec<Step>) {
        for strategy in &self.strategies {
            strategy.apply(steps);
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl Default for TraversalStrategies {
    fn default() -> Self {
        Self::empty().with(GraphStepStrategy)
    }
}
