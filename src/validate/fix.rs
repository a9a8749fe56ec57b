//! Machine-applicable fixes

use serde::Serialize;

use crate::rdf::{Graph, NamedNode, PrefixMap, RdfObject, RdfSubject, Triple};

/// A graph edit resolving one violation
///
/// Applying a fix twice has the same effect as applying it once.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fix {
    /// Replace the object of one statement
    ReplaceValue {
        subject: RdfSubject,
        predicate: NamedNode,
        old: RdfObject,
        new: RdfObject,
    },
}

impl Fix {
    /// Apply the edit in place
    pub fn apply(&self, graph: &mut Graph) {
        match self {
            Fix::ReplaceValue {
                subject,
                predicate,
                old,
                new,
            } => {
                let old = Triple::new(subject.clone(), predicate.clone().into(), old.clone());
                if graph.remove(&old) {
                    graph.insert(Triple::new(subject.clone(), predicate.clone().into(), new.clone()));
                }
            }
        }
    }

    /// Short human-readable summary
    pub fn describe(&self, prefixes: &PrefixMap) -> String {
        match self {
            Fix::ReplaceValue {
                subject,
                predicate,
                old,
                new,
            } => format!(
                "Replace {} with {} on {} {}",
                prefixes.render_object(old),
                prefixes.render_object(new),
                prefixes.render_subject(subject),
                prefixes.render_iri(predicate.as_str())
            ),
        }
    }
}

/// Serializable form of a fix for report renderers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixEntry {
    pub kind: &'static str,
    pub description: String,
}

impl FixEntry {
    pub fn new(fix: &Fix, prefixes: &PrefixMap) -> Self {
        let kind = match fix {
            Fix::ReplaceValue { .. } => "replace-value",
        };
        Self {
            kind,
            description: fix.describe(prefixes),
        }
    }
}

/// Apply fixes to a copy of the graph. An empty list returns an equal graph.
pub fn apply_fixes<'a>(graph: &Graph, fixes: impl IntoIterator<Item = &'a Fix>) -> Graph {
    let mut fixed = graph.clone();
    for fix in fixes {
        fix.apply(&mut fixed);
    }
    fixed
}
