//! File system resolution strategy
//!
//! Models are persisted as `<root>/<namespace>/<version>/<ElementName>.ttl`,
//! one top-level element per file.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::{defines, ResolutionError, ResolutionResult, ResolutionStrategy};
use crate::rdf::{Graph, RdfParser};
use crate::urn::ModelUrn;

/// Loads element definitions from a directory tree of Turtle files
#[derive(Debug, Clone)]
pub struct FileSystemStrategy {
    root: PathBuf,
}

impl FileSystemStrategy {
    /// Create a strategy rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Models root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the files of a namespace version
    pub fn version_dir(&self, urn: &ModelUrn) -> PathBuf {
        self.root
            .join(urn.namespace())
            .join(urn.version().to_string())
    }

    /// Expected file of an element
    pub fn element_path(&self, urn: &ModelUrn) -> Option<PathBuf> {
        urn.name()
            .map(|name| self.version_dir(urn).join(format!("{}.ttl", name)))
    }

    fn load(&self, urn: &ModelUrn, path: &Path) -> ResolutionResult<Graph> {
        RdfParser::parse_file(path)
            .map_err(|e| ResolutionError::io(urn, format!("{}: {}", path.display(), e)))
    }

    /// Look through every Turtle file of the version directory
    fn scan(&self, urn: &ModelUrn, skip: Option<&Path>) -> ResolutionResult<Graph> {
        let dir = self.version_dir(urn);
        if !dir.is_dir() {
            return Err(ResolutionError::NotFound(urn.clone()));
        }
        let entries =
            fs::read_dir(&dir).map_err(|e| ResolutionError::io(urn, format!("{}: {}", dir.display(), e)))?;

        let mut candidates: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("ttl"))
            .filter(|path| Some(path.as_path()) != skip)
            .collect();
        candidates.sort();

        let element = urn.to_named_node();
        for path in candidates {
            match RdfParser::parse_file(&path) {
                Ok(graph) if defines(&graph, &element) => {
                    debug!("Found {} in {}", urn, path.display());
                    return Ok(graph);
                }
                Ok(_) => {}
                Err(e) => warn!("Skipping unparsable model file {}: {}", path.display(), e),
            }
        }
        Err(ResolutionError::NotFound(urn.clone()))
    }
}

impl ResolutionStrategy for FileSystemStrategy {
    fn apply(&self, urn: &ModelUrn) -> ResolutionResult<Graph> {
        let path = self
            .element_path(urn)
            .ok_or_else(|| ResolutionError::NotFound(urn.clone()))?;

        if path.is_file() {
            let graph = self.load(urn, &path)?;
            if defines(&graph, &urn.to_named_node()) {
                return Ok(graph);
            }
            debug!("{} does not define {}, scanning", path.display(), urn);
            return self.scan(urn, Some(&path));
        }
        self.scan(urn, None)
    }
}
