//! Namespace and prefix management
//!
//! Prefix tables travel with every graph. They are needed for compact IRI
//! notation in Turtle output, for short-URI rendering of violation messages
//! and for expanding `curie` literals during migration.

use indexmap::IndexMap;
use thiserror::Error;

use super::types::{RdfObject, RdfSubject};

/// Prefix errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrefixError {
    /// Unknown prefix
    #[error("Unknown prefix: {0}")]
    UnknownPrefix(String),

    /// Not a compact IRI
    #[error("Not a compact IRI: {0}")]
    InvalidCurie(String),
}

pub type PrefixResult<T> = Result<T, PrefixError>;

/// Ordered prefix -> namespace IRI table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixMap {
    prefixes: IndexMap<String, String>,
}

impl PrefixMap {
    /// Create an empty prefix map
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a prefix map with the W3C vocabularies every model uses
    pub fn with_defaults() -> Self {
        let mut map = Self::new();
        map.insert("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#");
        map.insert("rdfs", "http://www.w3.org/2000/01/rdf-schema#");
        map.insert("xsd", "http://www.w3.org/2001/XMLSchema#");
        map.insert("sh", "http://www.w3.org/ns/shacl#");
        map
    }

    /// Set a prefix, replacing any previous namespace
    pub fn insert(&mut self, prefix: impl Into<String>, iri: impl Into<String>) {
        self.prefixes.insert(prefix.into(), iri.into());
    }

    /// Set a prefix only if it is not declared yet. Returns true if inserted.
    pub fn insert_if_absent(&mut self, prefix: &str, iri: &str) -> bool {
        if self.prefixes.contains_key(prefix) {
            return false;
        }
        self.prefixes.insert(prefix.to_string(), iri.to_string());
        true
    }

    /// Merge another table, first declaration wins
    pub fn merge(&mut self, other: &PrefixMap) {
        for (prefix, iri) in other.iter() {
            self.insert_if_absent(prefix, iri);
        }
    }

    /// Get the namespace for a prefix
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }

    /// Number of declared prefixes
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// True if no prefix is declared
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Iterate over (prefix, namespace) pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(p, i)| (p.as_str(), i.as_str()))
    }

    /// Rewrite every namespace IRI through `f`, keeping prefix names
    pub fn map_namespaces(&self, mut f: impl FnMut(&str) -> String) -> PrefixMap {
        PrefixMap {
            prefixes: self
                .prefixes
                .iter()
                .map(|(p, i)| (p.clone(), f(i)))
                .collect(),
        }
    }

    /// Expand a compact IRI (`prefix:local`) to a full IRI
    pub fn expand(&self, curie: &str) -> PrefixResult<String> {
        let (prefix, local) = curie
            .split_once(':')
            .ok_or_else(|| PrefixError::InvalidCurie(curie.to_string()))?;
        let iri = self
            .get(prefix)
            .ok_or_else(|| PrefixError::UnknownPrefix(prefix.to_string()))?;
        Ok(format!("{}{}", iri, local))
    }

    /// Compact an IRI using the longest matching namespace
    pub fn compact(&self, iri: &str) -> Option<String> {
        self.prefixes
            .iter()
            .filter(|(_, ns)| !ns.is_empty() && iri.starts_with(ns.as_str()))
            .max_by_key(|(_, ns)| ns.len())
            .map(|(prefix, ns)| format!("{}:{}", prefix, &iri[ns.len()..]))
    }

    /// Render an IRI in short form, falling back to `<iri>`
    pub fn render_iri(&self, iri: &str) -> String {
        self.compact(iri).unwrap_or_else(|| format!("<{}>", iri))
    }

    /// Render a subject for human-readable messages
    pub fn render_subject(&self, subject: &RdfSubject) -> String {
        match subject {
            RdfSubject::NamedNode(n) => self.render_iri(n.as_str()),
            RdfSubject::BlankNode(b) => b.to_string(),
        }
    }

    /// Render an object for human-readable messages
    pub fn render_object(&self, object: &RdfObject) -> String {
        match object {
            RdfObject::NamedNode(n) => self.render_iri(n.as_str()),
            RdfObject::BlankNode(b) => b.to_string(),
            RdfObject::Literal(l) if l.is_plain_string() => format!("\"{}\"", l.value()),
            RdfObject::Literal(l) => match l.language() {
                Some(lang) => format!("\"{}\"@{}", l.value(), lang),
                None => format!(
                    "\"{}\"^^{}",
                    l.value(),
                    self.render_iri(l.datatype().as_str())
                ),
            },
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PrefixMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        PrefixMap {
            prefixes: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
