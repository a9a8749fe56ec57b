//! Resolution Engine
//!
//! Turns a root element URN into a closed graph by following every model
//! element URN mentioned in the loaded triples, across files and namespaces.
//!
//! The traversal is level by level. Each level is processed in `ModelUrn`
//! order, which makes the result (including prefix conflicts between
//! siblings, settled first-imported-wins) independent of fetch timing. With
//! `parallel(true)` the strategy calls of a level run on the rayon pool while
//! merges are still committed one by one in that order.
//!
//! # Example
//!
//! ```rust,ignore
//! use aspect_model::resolve::{FileSystemStrategy, Resolver};
//! use aspect_model::ModelUrn;
//!
//! let strategy = FileSystemStrategy::new("models");
//! let root = ModelUrn::parse("urn:samm:com.example:1.0.0#Movement")?;
//! let graph = Resolver::new().resolve(&root, &strategy)?;
//! ```

mod command;
mod fs;
mod strategy;

pub use command::CommandStrategy;
pub use fs::FileSystemStrategy;
pub use strategy::{FirstSuccess, ResolutionStrategy};

use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, info};

use crate::rdf::{Graph, NamedNode, RdfSubject, Triple};
use crate::urn::ModelUrn;

/// Resolution errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// No strategy could find the element
    #[error("Model element not found: {0}")]
    NotFound(ModelUrn),

    /// The element exists but could not be read or parsed
    #[error("Failed to load {urn}: {message}")]
    Io {
        /// Element being loaded
        urn: ModelUrn,
        /// Cause
        message: String,
    },
}

impl ResolutionError {
    /// Build an I/O error for an element
    pub fn io(urn: &ModelUrn, message: impl Into<String>) -> Self {
        ResolutionError::Io {
            urn: urn.clone(),
            message: message.into(),
        }
    }
}

pub type ResolutionResult<T> = Result<T, ResolutionError>;

/// URNs already handled during one resolution run
#[derive(Debug, Default)]
pub struct VisitedSet {
    urns: FxHashSet<ModelUrn>,
}

impl VisitedSet {
    /// Mark a URN visited. Returns false if it already was.
    pub fn insert(&mut self, urn: &ModelUrn) -> bool {
        if self.urns.contains(urn) {
            return false;
        }
        self.urns.insert(urn.clone())
    }

    /// True if the URN was visited
    pub fn contains(&self, urn: &ModelUrn) -> bool {
        self.urns.contains(urn)
    }

    /// Number of visited URNs
    pub fn len(&self) -> usize {
        self.urns.len()
    }

    /// True if nothing was visited yet
    pub fn is_empty(&self) -> bool {
        self.urns.is_empty()
    }
}

/// True if the graph holds a definition of the element: a type assertion,
/// or a legacy `refines` statement
pub fn defines(graph: &Graph, element: &NamedNode) -> bool {
    let subject = RdfSubject::NamedNode(element.clone());
    if !graph.types_of(&subject).is_empty() {
        return true;
    }
    graph.triples_with_subject(&subject).iter().any(|t| {
        let predicate = t.predicate.as_named_node();
        predicate.local_name() == "refines"
            && ModelUrn::try_from(predicate)
                .map(|urn| urn.is_meta_model())
                .unwrap_or(false)
    })
}

/// True for URNs the engine should try to fetch
fn is_resolvable(urn: &ModelUrn) -> bool {
    !urn.is_meta_model() && urn.name().is_some()
}

/// Element URNs mentioned by a batch of triples
fn referenced_urns<'a>(triples: impl Iterator<Item = &'a Triple>) -> BTreeSet<ModelUrn> {
    triples
        .flat_map(|t| t.named_nodes())
        // Non-URN IRIs (xsd, rdf, http links) are silently dropped
        .filter_map(|node| ModelUrn::try_from(node).ok())
        .filter(is_resolvable)
        .collect()
}

/// Transitive reference resolver
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    parallel: bool,
}

impl Resolver {
    /// Create a sequential resolver
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the elements of one traversal level concurrently
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Resolve a root element and everything it references
    pub fn resolve<S>(&self, root: &ModelUrn, strategy: &S) -> ResolutionResult<Graph>
    where
        S: ResolutionStrategy + ?Sized,
    {
        if !is_resolvable(root) {
            return Err(ResolutionError::NotFound(root.clone()));
        }
        let mut frontier = BTreeSet::new();
        frontier.insert(root.clone());
        self.run(Graph::new(), frontier, strategy)
    }

    /// Resolve the references of an already loaded graph
    pub fn resolve_graph<S>(&self, graph: Graph, strategy: &S) -> ResolutionResult<Graph>
    where
        S: ResolutionStrategy + ?Sized,
    {
        let frontier = referenced_urns(graph.iter());
        self.run(graph, frontier, strategy)
    }

    fn run<S>(
        &self,
        mut acc: Graph,
        mut frontier: BTreeSet<ModelUrn>,
        strategy: &S,
    ) -> ResolutionResult<Graph>
    where
        S: ResolutionStrategy + ?Sized,
    {
        let mut visited = VisitedSet::default();
        let mut lookups = 0usize;

        while !frontier.is_empty() {
            let level: Vec<ModelUrn> = std::mem::take(&mut frontier)
                .into_iter()
                .filter(|urn| visited.insert(urn))
                .collect();

            // Prefetch everything not yet defined at the start of the level
            let mut prefetched: Vec<Option<ResolutionResult<Graph>>> = if self.parallel {
                level
                    .par_iter()
                    .map(|urn| {
                        if defines(&acc, &urn.to_named_node()) {
                            None
                        } else {
                            debug!("Fetching {}", urn);
                            Some(strategy.apply(urn))
                        }
                    })
                    .collect()
            } else {
                level.iter().map(|_| None).collect()
            };

            for (urn, prefetched) in level.iter().zip(prefetched.iter_mut()) {
                if defines(&acc, &urn.to_named_node()) {
                    debug!("{} already defined, not descending", urn);
                    continue;
                }
                let loaded = match prefetched.take() {
                    Some(result) => result?,
                    None => {
                        debug!("Fetching {}", urn);
                        strategy.apply(urn)?
                    }
                };
                lookups += 1;

                let added = acc.merge(loaded);
                for next in referenced_urns(added.iter()) {
                    if !visited.contains(&next) {
                        frontier.insert(next);
                    }
                }
            }
        }

        info!(
            "Resolved {} element URNs with {} lookups ({} triples)",
            visited.len(),
            lookups,
            acc.len()
        );
        Ok(acc)
    }
}

/// Resolve a root element sequentially
pub fn resolve<S>(root: &ModelUrn, strategy: &S) -> ResolutionResult<Graph>
where
    S: ResolutionStrategy + ?Sized,
{
    Resolver::new().resolve(root, strategy)
}
