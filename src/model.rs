//! Typed element view
//!
//! A flat, typed listing of the model elements of a validated graph, for
//! generators and tooling that do not want to walk triples themselves.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::rdf::{Graph, NamedNode, RdfSubject};
use crate::urn::ModelUrn;
use crate::validate::ClassHierarchy;
use crate::vocab::Samm;

/// Kind of a model element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    Aspect,
    Property,
    Operation,
    Event,
    Characteristic,
    Constraint,
    Entity,
    AbstractEntity,
    Unit,
    QuantityKind,
    /// Typed with something outside the meta-model, e.g. an entity instance
    Other,
}

impl ElementKind {
    /// Kinds with a meta-model class, most specific checks first
    const CLASSES: [(ElementKind, &'static str); 10] = [
        (ElementKind::Aspect, "Aspect"),
        (ElementKind::Property, "Property"),
        (ElementKind::Operation, "Operation"),
        (ElementKind::Event, "Event"),
        (ElementKind::Constraint, "Constraint"),
        (ElementKind::Characteristic, "Characteristic"),
        (ElementKind::AbstractEntity, "AbstractEntity"),
        (ElementKind::Entity, "Entity"),
        (ElementKind::Unit, "Unit"),
        (ElementKind::QuantityKind, "QuantityKind"),
    ];

    /// Classify a set of asserted types
    pub fn classify(types: &[&NamedNode], hierarchy: &ClassHierarchy) -> Self {
        let samm = Samm::latest();
        Self::CLASSES
            .iter()
            .find(|(_, local)| {
                let class = samm.meta(local);
                types.iter().any(|t| hierarchy.is_subclass_of(t, &class))
            })
            .map(|(kind, _)| *kind)
            .unwrap_or(ElementKind::Other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Aspect => "Aspect",
            ElementKind::Property => "Property",
            ElementKind::Operation => "Operation",
            ElementKind::Event => "Event",
            ElementKind::Characteristic => "Characteristic",
            ElementKind::Constraint => "Constraint",
            ElementKind::Entity => "Entity",
            ElementKind::AbstractEntity => "AbstractEntity",
            ElementKind::Unit => "Unit",
            ElementKind::QuantityKind => "QuantityKind",
            ElementKind::Other => "Other",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named element of a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelElement {
    pub urn: ModelUrn,
    pub kind: ElementKind,
    /// `samm:preferredName` by language tag
    pub preferred_names: BTreeMap<String, String>,
    /// `samm:description` by language tag
    pub descriptions: BTreeMap<String, String>,
    /// `samm:see` references
    pub see: Vec<String>,
}

impl ModelElement {
    /// Preferred name in a language, falling back to the local name
    pub fn display_name(&self, language: &str) -> &str {
        self.preferred_names
            .get(language)
            .map(String::as_str)
            .or_else(|| self.urn.name())
            .unwrap_or_default()
    }
}

fn by_language(graph: &Graph, subject: &RdfSubject, predicate: &NamedNode) -> BTreeMap<String, String> {
    graph
        .objects(subject, predicate)
        .into_iter()
        .filter_map(|o| o.as_literal())
        .map(|l| (l.language().unwrap_or_default().to_string(), l.value().to_string()))
        .collect()
}

/// Every typed model element of a graph, in order of first appearance
///
/// Meta-model URNs, blank nodes and non-URN subjects are skipped.
pub fn elements(graph: &Graph, hierarchy: &ClassHierarchy) -> Vec<ModelElement> {
    let samm = Samm::latest();
    let preferred_name = samm.meta("preferredName");
    let description = samm.meta("description");
    let see = samm.meta("see");

    let mut result = Vec::new();
    for subject in graph.subjects() {
        let Some(node) = subject.as_named_node() else {
            continue;
        };
        let Ok(urn) = ModelUrn::try_from(node) else {
            continue;
        };
        if urn.is_meta_model() {
            continue;
        }
        let types = graph.types_of(subject);
        if types.is_empty() {
            continue;
        }
        result.push(ModelElement {
            kind: ElementKind::classify(&types, hierarchy),
            preferred_names: by_language(graph, subject, &preferred_name),
            descriptions: by_language(graph, subject, &description),
            see: graph
                .objects(subject, &see)
                .into_iter()
                .map(|o| o.lexical_form().to_string())
                .collect(),
            urn,
        });
    }
    result
}
