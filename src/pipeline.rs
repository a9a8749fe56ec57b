//! Load pipeline
//!
//! Resolution, then migration, then validation. Resolution and migration
//! failures abort the load; violations do not, a model can be loaded but
//! invalid.

use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::config::{ConfigError, PipelineConfig};
use crate::migrate::{MigrationError, Migrator};
use crate::model::{self, ModelElement};
use crate::rdf::{Graph, ParseError, RdfParser};
use crate::resolve::{ResolutionError, ResolutionStrategy, Resolver};
use crate::urn::{ModelUrn, UrnSyntaxError};
use crate::validate::{ClassHierarchy, ShapeError, ShapeRegistry, ValidationReport, Validator};

/// Errors that abort a load
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Urn(#[from] UrnSyntaxError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Migration(#[from] MigrationError),

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result of a successful load
#[derive(Debug, Clone)]
pub struct LoadedModel {
    /// Closed graph at the latest meta-model revision
    pub graph: Graph,
    pub report: ValidationReport,
    pub elements: Vec<ModelElement>,
}

impl LoadedModel {
    pub fn is_valid(&self) -> bool {
        self.report.is_valid()
    }
}

/// Resolver, migration chain and shapes, set up once and reused for many loads
pub struct Pipeline {
    strategy: Box<dyn ResolutionStrategy>,
    resolver: Resolver,
    migrator: Migrator,
    validator: Validator,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("resolver", &self.resolver)
            .field("migrator", &self.migrator)
            .field("validator", &self.validator)
            .finish()
    }
}

impl Pipeline {
    /// Build a pipeline from configuration
    pub fn new(config: &PipelineConfig) -> PipelineResult<Self> {
        let mut registry = ShapeRegistry::bundled()?;
        if let Some(path) = &config.shapes_path {
            registry.extend(ShapeRegistry::from_file(path)?);
        }
        let validator =
            Validator::new(registry).with_default_language(config.default_language.clone());

        Ok(Self {
            strategy: Box::new(config.build_strategy()?),
            resolver: Resolver::new().parallel(config.parallel_resolution),
            migrator: Migrator::new(),
            validator,
        })
    }

    /// Pipeline with the bundled shapes around a custom strategy
    pub fn with_strategy(strategy: impl ResolutionStrategy + 'static) -> PipelineResult<Self> {
        Ok(Self {
            strategy: Box::new(strategy),
            resolver: Resolver::new(),
            migrator: Migrator::new(),
            validator: Validator::bundled()?,
        })
    }

    /// Replace the validator
    pub fn validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    /// Replace the resolver
    pub fn resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replace the migrator
    pub fn migrator(mut self, migrator: Migrator) -> Self {
        self.migrator = migrator;
        self
    }

    /// Resolve an element without migrating it
    pub fn resolve(&self, urn: &ModelUrn) -> PipelineResult<Graph> {
        Ok(self.resolver.resolve(urn, self.strategy.as_ref())?)
    }

    /// Resolve the references of a loaded graph without migrating it
    pub fn resolve_graph(&self, graph: Graph) -> PipelineResult<Graph> {
        Ok(self.resolver.resolve_graph(graph, self.strategy.as_ref())?)
    }

    /// Migrate a graph to the latest revision
    pub fn migrate(&self, graph: Graph) -> PipelineResult<Graph> {
        Ok(self.migrator.migrate(graph)?)
    }

    /// Validate a graph
    pub fn validate(&self, graph: &Graph) -> ValidationReport {
        self.validator.validate(graph)
    }

    /// Load an element by URN
    pub fn load(&self, urn: &ModelUrn) -> PipelineResult<LoadedModel> {
        info!("Loading {}", urn);
        let graph = self.resolve(urn)?;
        self.finish(graph)
    }

    /// Load a URN given as text
    pub fn load_urn(&self, urn: &str) -> PipelineResult<LoadedModel> {
        self.load(&ModelUrn::parse(urn)?)
    }

    /// Load a model file and everything it references
    pub fn load_file(&self, path: &Path) -> PipelineResult<LoadedModel> {
        info!("Loading {}", path.display());
        let graph = RdfParser::parse_file(path)?;
        self.load_graph(graph)
    }

    /// Load an in-memory graph and everything it references
    pub fn load_graph(&self, graph: Graph) -> PipelineResult<LoadedModel> {
        let graph = self.resolve_graph(graph)?;
        self.finish(graph)
    }

    fn finish(&self, graph: Graph) -> PipelineResult<LoadedModel> {
        let graph = self.migrate(graph)?;
        let report = self.validate(&graph);

        let mut hierarchy: ClassHierarchy = self.validator.registry().hierarchy().clone();
        hierarchy.extend_from(&graph);
        let elements = model::elements(&graph, &hierarchy);

        info!(
            "Loaded {} elements, {} violations",
            elements.len(),
            report.len()
        );
        Ok(LoadedModel {
            graph,
            report,
            elements,
        })
    }
}
