//! Version Migration Engine
//!
//! Brings a resolved graph to the latest meta-model revision:
//! 1. legacy dialect normalization (no-op for current graphs)
//! 2. version detection over the meta-model IRIs in the triples
//! 3. application of the migration steps from the detected revision on,
//!    ordered by source version and priority

mod legacy;
mod rewrite;
mod step;

pub use legacy::{has_legacy_vocabulary, normalize as normalize_legacy};
pub use rewrite::{is_curie, rewrite_graph, NamespaceMap};
pub use step::{
    default_chain, MigrationChain, MigrationStep, MoveVocabularyTerms, NamespaceVersionBump,
    RemoveMetaAttribute, MOVED_UNIT_TERMS,
};

use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, info};

use crate::rdf::{Graph, NamedNode};
use crate::urn::{ModelUrn, Version};
use crate::vocab::SammVersion;

/// Migration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MigrationError {
    /// The graph mixes meta-model revisions
    #[error("Model uses more than one meta model version: {}", join(.0))]
    MixedVersions(Vec<Version>),

    /// The graph uses a revision this library does not know
    #[error("Unsupported meta model version: {0}")]
    InvalidVersion(Version),
}

fn join(versions: &[Version]) -> String {
    versions
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type MigrationResult<T> = Result<T, MigrationError>;

fn meta_model_version(node: &NamedNode) -> Option<Version> {
    ModelUrn::try_from(node)
        .ok()
        .filter(|urn| urn.is_meta_model())
        .map(|urn| urn.version())
}

/// Meta-model versions referenced by the triples, ascending
pub fn referenced_versions(graph: &Graph) -> BTreeSet<Version> {
    let mut versions = BTreeSet::new();
    for triple in graph.iter() {
        versions.extend(triple.named_nodes().filter_map(meta_model_version));
        if let Some(literal) = triple.object.as_literal() {
            versions.extend(meta_model_version(&literal.datatype()));
        }
    }
    versions
}

/// Detect the meta-model revision of a graph
///
/// A graph without meta-model IRIs counts as latest.
pub fn detect_version(graph: &Graph) -> MigrationResult<SammVersion> {
    let versions = referenced_versions(graph);
    let mut iter = versions.iter();
    match (iter.next(), iter.next()) {
        (None, _) => Ok(SammVersion::latest()),
        (Some(version), None) => {
            SammVersion::from_version(version).ok_or(MigrationError::InvalidVersion(*version))
        }
        (Some(_), Some(_)) => Err(MigrationError::MixedVersions(versions.into_iter().collect())),
    }
}

/// Applies a migration chain up to a target revision
#[derive(Debug)]
pub struct Migrator {
    chain: MigrationChain,
    target: SammVersion,
}

impl Default for Migrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Migrator {
    /// Migrator with the default chain, targeting the latest revision
    pub fn new() -> Self {
        Self::with_chain(default_chain())
    }

    /// Migrator with a custom chain
    pub fn with_chain(chain: MigrationChain) -> Self {
        Self {
            chain,
            target: SammVersion::latest(),
        }
    }

    pub fn chain(&self) -> &MigrationChain {
        &self.chain
    }

    pub fn target(&self) -> SammVersion {
        self.target
    }

    /// Migrate a graph to the target revision
    pub fn migrate(&self, graph: Graph) -> MigrationResult<Graph> {
        let graph = legacy::normalize(graph);
        let detected = detect_version(&graph)?;
        debug!("Detected meta model version {}", detected);
        if detected >= self.target {
            return Ok(graph);
        }

        let mut graph = graph;
        for step in self.chain.select(detected, self.target) {
            info!(
                "Migrating {} -> {}: {}",
                step.source_version(),
                step.target_version(),
                step.description()
            );
            graph = step.migrate(graph);
        }
        Ok(graph)
    }
}

/// Migrate a graph to the latest revision with the default chain
pub fn migrate(graph: Graph) -> MigrationResult<Graph> {
    Migrator::new().migrate(graph)
}
