//! Aspect Model loading
//!
//! Loads semantic aspect models (RDF/Turtle, SAMM meta-model) into a closed,
//! current and checked graph.
//!
//! # Architecture
//!
//! - `rdf`: graph store (triples, prefixes, Turtle I/O)
//! - `urn`: model element identifiers and versions
//! - `resolve`: transitive closure over element references, with pluggable
//!   lookup strategies
//! - `migrate`: legacy dialect normalization and meta-model version migration
//! - `validate`: SHACL shape evaluation producing violations and fixes
//! - `model`: typed element listing of a loaded graph
//! - `pipeline`: resolution, migration and validation wired together
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use aspect_model::{Pipeline, PipelineConfig};
//!
//! let config = PipelineConfig {
//!     model_roots: vec!["models".into()],
//!     ..PipelineConfig::default()
//! };
//! let pipeline = Pipeline::new(&config).unwrap();
//! let loaded = pipeline
//!     .load_urn("urn:samm:com.example:1.0.0#Movement")
//!     .unwrap();
//!
//! for entry in loaded.report.entries() {
//!     println!("{}: {}", entry.error_code, entry.message);
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod migrate;
pub mod model;
pub mod pipeline;
pub mod rdf;
pub mod resolve;
pub mod urn;
pub mod validate;
pub mod vocab;

// Re-export main types for convenience
pub use rdf::{
    BlankNode, Graph, Literal, NamedNode, PrefixMap, RdfFormat, RdfObject, RdfParser,
    RdfPredicate, RdfSerializer, RdfSubject, Triple,
};

pub use urn::{ModelUrn, UrnSyntaxError, Version};

pub use resolve::{
    resolve, CommandStrategy, FileSystemStrategy, FirstSuccess, ResolutionError,
    ResolutionResult, ResolutionStrategy, Resolver,
};

pub use migrate::{migrate, MigrationChain, MigrationError, MigrationResult, MigrationStep, Migrator};

pub use validate::{
    apply_fixes, validate, AppliesTo, Fix, ShapeError, ShapeRegistry, ValidationReport,
    Validator, Violation, ViolationKind,
};

pub use model::{ElementKind, ModelElement};

pub use config::{ConfigError, PipelineConfig};

pub use pipeline::{LoadedModel, Pipeline, PipelineError, PipelineResult};

pub use vocab::SammVersion;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), "0.1.0");
    }
}
