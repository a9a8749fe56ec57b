//! Resolution strategies

use tracing::debug;

use super::{ResolutionError, ResolutionResult};
use crate::rdf::Graph;
use crate::urn::ModelUrn;

/// Capability to load the graph that defines a model element
///
/// Implementations may block on I/O or subprocesses. Timeouts and retries are
/// their own business; the engine calls each strategy once per element.
pub trait ResolutionStrategy: Send + Sync {
    /// Load the graph defining `urn`
    fn apply(&self, urn: &ModelUrn) -> ResolutionResult<Graph>;
}

impl<F> ResolutionStrategy for F
where
    F: Fn(&ModelUrn) -> ResolutionResult<Graph> + Send + Sync,
{
    fn apply(&self, urn: &ModelUrn) -> ResolutionResult<Graph> {
        self(urn)
    }
}

/// Ordered composition of strategies; the first success wins
///
/// If every strategy fails, the first error other than `NotFound` is
/// reported, so that a broken file is not hidden behind a later miss.
#[derive(Default)]
pub struct FirstSuccess {
    strategies: Vec<Box<dyn ResolutionStrategy>>,
}

impl FirstSuccess {
    /// Create an empty composition (resolves nothing)
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a strategy
    pub fn with(mut self, strategy: impl ResolutionStrategy + 'static) -> Self {
        self.push(strategy);
        self
    }

    /// Append a strategy in place
    pub fn push(&mut self, strategy: impl ResolutionStrategy + 'static) {
        self.strategies.push(Box::new(strategy));
    }

    /// Number of composed strategies
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// True if no strategy was added
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl ResolutionStrategy for FirstSuccess {
    fn apply(&self, urn: &ModelUrn) -> ResolutionResult<Graph> {
        let mut first_error = None;
        for (index, strategy) in self.strategies.iter().enumerate() {
            match strategy.apply(urn) {
                Ok(graph) => return Ok(graph),
                Err(ResolutionError::NotFound(_)) => {
                    debug!("Strategy #{} does not know {}", index, urn);
                }
                Err(err) => {
                    debug!("Strategy #{} failed for {}: {}", index, urn, err);
                    first_error.get_or_insert(err);
                }
            }
        }
        Err(first_error.unwrap_or_else(|| ResolutionError::NotFound(urn.clone())))
    }
}
