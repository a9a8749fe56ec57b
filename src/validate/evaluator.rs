//! Embedded expression evaluation
//!
//! Scripted predicates (`sh:js`) and SPARQL constraints (`sh:sparql`) are
//! not evaluated by this crate. A host plugs in an [`ExpressionEvaluator`];
//! without one those constraints are skipped.

use std::collections::BTreeMap;
use thiserror::Error;

use crate::rdf::{Graph, NamedNode, PrefixMap, RdfObject, RdfSubject};

/// Evaluator failure, reported as an `EvaluationFailure` violation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct EvaluatorError(pub String);

pub type EvaluatorResult<T> = Result<T, EvaluatorError>;

/// Expression attached to a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expression<'a> {
    /// Name of a scripted predicate function
    Script { function: &'a str },
    /// SPARQL SELECT query
    Sparql { query: &'a str },
}

/// Variables bound for one evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bindings {
    /// Focus node (`$this`)
    pub this: RdfSubject,
    /// Current value node, if the expression runs per value
    pub value: Option<RdfObject>,
    /// Property path of the shape (`$PATH`)
    pub path: Option<NamedNode>,
}

/// Result of one evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationOutcome {
    /// True if the data satisfies the expression
    pub passed: bool,
    /// Named values for message interpolation
    pub captures: BTreeMap<String, String>,
}

impl EvaluationOutcome {
    pub fn pass() -> Self {
        Self {
            passed: true,
            captures: BTreeMap::new(),
        }
    }

    pub fn fail() -> Self {
        Self::default()
    }

    /// Add a named capture
    pub fn with_capture(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.captures.insert(name.into(), value.into());
        self
    }
}

/// Host-provided evaluator for scripted and SPARQL constraints
pub trait ExpressionEvaluator: Send + Sync {
    fn evaluate(
        &self,
        expression: Expression<'_>,
        bindings: &Bindings,
        graph: &Graph,
    ) -> EvaluatorResult<EvaluationOutcome>;
}

/// Replace `{$name}` and `{?name}` placeholders in a shape message
///
/// Captures win over bindings. `this`, `value` and `PATH` fall back to the
/// bound terms in short form. Unknown placeholders are left as they are.
pub fn interpolate(
    message: &str,
    captures: &BTreeMap<String, String>,
    bindings: &Bindings,
    prefixes: &PrefixMap,
) -> String {
    let lookup = |name: &str| -> Option<String> {
        if let Some(value) = captures.get(name) {
            return Some(value.clone());
        }
        match name {
            "this" => Some(prefixes.render_subject(&bindings.this)),
            "value" => bindings.value.as_ref().map(|v| prefixes.render_object(v)),
            "PATH" => bindings.path.as_ref().map(|p| prefixes.render_iri(p.as_str())),
            _ => None,
        }
    };

    let mut out = String::with_capacity(message.len());
    let mut rest = message;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let placeholder = tail
            .find('}')
            .map(|end| &tail[..=end])
            .filter(|p| p.len() > 3 && (p.starts_with("{$") || p.starts_with("{?")));
        match placeholder.and_then(|p| lookup(&p[2..p.len() - 1]).map(|v| (p, v))) {
            Some((p, value)) => {
                out.push_str(&value);
                rest = &tail[p.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
