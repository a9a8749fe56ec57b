//! Constraint components
//!
//! Parsing of the SHACL constraint predicates of one shape node, and their
//! evaluation against the value nodes of a focus element.

use regex::{Regex, RegexBuilder};
use std::cmp::Ordering;
use tracing::debug;

use super::evaluator::{interpolate, Bindings, Expression, ExpressionEvaluator};
use super::fix::Fix;
use super::shape::{ClassHierarchy, ShapeError, ShapeResult};
use super::violation::{Violation, ViolationContext, ViolationKind};
use crate::rdf::{Graph, Literal, NamedNode, PrefixMap, RdfObject, RdfSubject, Triple};
use crate::urn::ModelUrn;
use crate::vocab::{rdf, sh, xsd};

/// A single constraint of a shape
#[derive(Debug, Clone)]
pub enum Constraint {
    Class(NamedNode),
    Datatype(NamedNode),
    MinCount(usize),
    MaxCount(usize),
    MinLength(usize),
    MaxLength(usize),
    Pattern {
        pattern: String,
        flags: Option<String>,
        regex: Regex,
    },
    In(Vec<RdfObject>),
    MinExclusive(Literal),
    MaxExclusive(Literal),
    MinInclusive(Literal),
    MaxInclusive(Literal),
    Equals(NamedNode),
    Disjoint(NamedNode),
    LessThan(NamedNode),
    LessThanOrEquals(NamedNode),
    /// Holds if the nested constraints do not
    Not(Vec<Constraint>),
    Scripted {
        function: String,
        message: Option<String>,
    },
    Sparql {
        query: String,
        message: Option<String>,
    },
    UniqueLang,
}

impl Constraint {
    /// Short SHACL-like rendering, used in `Not` messages
    pub fn describe(&self, prefixes: &PrefixMap) -> String {
        let iri = |n: &NamedNode| prefixes.render_iri(n.as_str());
        match self {
            Constraint::Class(c) => format!("sh:class {}", iri(c)),
            Constraint::Datatype(d) => format!("sh:datatype {}", iri(d)),
            Constraint::MinCount(n) => format!("sh:minCount {}", n),
            Constraint::MaxCount(n) => format!("sh:maxCount {}", n),
            Constraint::MinLength(n) => format!("sh:minLength {}", n),
            Constraint::MaxLength(n) => format!("sh:maxLength {}", n),
            Constraint::Pattern { pattern, .. } => format!("sh:pattern \"{}\"", pattern),
            Constraint::In(values) => format!(
                "sh:in ({})",
                values
                    .iter()
                    .map(|v| prefixes.render_object(v))
                    .collect::<Vec<_>>()
                    .join(" ")
            ),
            Constraint::MinExclusive(l) => format!("sh:minExclusive {}", l.value()),
            Constraint::MaxExclusive(l) => format!("sh:maxExclusive {}", l.value()),
            Constraint::MinInclusive(l) => format!("sh:minInclusive {}", l.value()),
            Constraint::MaxInclusive(l) => format!("sh:maxInclusive {}", l.value()),
            Constraint::Equals(p) => format!("sh:equals {}", iri(p)),
            Constraint::Disjoint(p) => format!("sh:disjoint {}", iri(p)),
            Constraint::LessThan(p) => format!("sh:lessThan {}", iri(p)),
            Constraint::LessThanOrEquals(p) => format!("sh:lessThanOrEquals {}", iri(p)),
            Constraint::Not(nested) => format!("sh:not [ {} ]", describe_all(nested, prefixes)),
            Constraint::Scripted { function, .. } => format!("sh:js {}", function),
            Constraint::Sparql { .. } => "sh:sparql".to_string(),
            Constraint::UniqueLang => "sh:uniqueLang true".to_string(),
        }
    }

    /// `sh:minCount` or `sh:maxCount`
    pub fn is_cardinality(&self) -> bool {
        matches!(self, Constraint::MinCount(_) | Constraint::MaxCount(_))
    }

    /// Evaluate against the value nodes of a context
    pub fn evaluate(&self, ctx: &EvaluationContext<'_>, out: &mut Vec<Violation>) {
        match self {
            Constraint::Class(class) => {
                for value in ctx.values {
                    let actual: Vec<NamedNode> = value
                        .to_subject()
                        .map(|s| ctx.graph.types_of(&s).into_iter().cloned().collect())
                        .unwrap_or_default();
                    // Predefined meta-model instances (samm-c:Text, unit:metre) are never in the graph
                    if actual.is_empty() && is_meta_model_instance(value) {
                        continue;
                    }
                    if !actual.iter().any(|t| ctx.hierarchy.is_subclass_of(t, class)) {
                        out.push(ctx.value_violation(
                            ViolationKind::ClassType {
                                allowed: class.clone(),
                                value: value.clone(),
                                actual,
                            },
                            value,
                        ));
                    }
                }
            }
            Constraint::Datatype(datatype) => {
                for value in ctx.values {
                    if let Some(violation) = check_datatype(ctx, datatype, value) {
                        out.push(violation);
                    }
                }
            }
            Constraint::MinCount(min) => {
                if ctx.values.len() < *min {
                    out.push(ctx.violation(
                        ViolationKind::MinCount {
                            allowed: *min,
                            actual: ctx.values.len(),
                        },
                        Vec::new(),
                    ));
                }
            }
            Constraint::MaxCount(max) => {
                if ctx.values.len() > *max {
                    out.push(ctx.violation(
                        ViolationKind::MaxCount {
                            allowed: *max,
                            actual: ctx.values.len(),
                        },
                        ctx.statements(ctx.values.iter()),
                    ));
                }
            }
            Constraint::MinLength(min) => {
                for value in ctx.values {
                    let length = text_length(value);
                    if length.map_or(true, |l| l < *min) {
                        out.push(ctx.value_violation(
                            ViolationKind::MinLength {
                                allowed: *min,
                                actual: length.unwrap_or(0),
                                value: value.clone(),
                            },
                            value,
                        ));
                    }
                }
            }
            Constraint::MaxLength(max) => {
                for value in ctx.values {
                    let length = text_length(value);
                    if length.map_or(true, |l| l > *max) {
                        out.push(ctx.value_violation(
                            ViolationKind::MaxLength {
                                allowed: *max,
                                actual: length.unwrap_or(0),
                                value: value.clone(),
                            },
                            value,
                        ));
                    }
                }
            }
            Constraint::Pattern {
                pattern,
                flags,
                regex,
            } => {
                for value in ctx.values {
                    let matches = !value.is_blank_node() && regex.is_match(value.lexical_form());
                    if !matches {
                        out.push(ctx.value_violation(
                            ViolationKind::Pattern {
                                pattern: pattern.clone(),
                                flags: flags.clone(),
                                value: value.clone(),
                            },
                            value,
                        ));
                    }
                }
            }
            Constraint::In(allowed) => {
                for value in ctx.values.iter().filter(|v| !allowed.contains(v)) {
                    out.push(ctx.value_violation(
                        ViolationKind::ValueFromList {
                            allowed: allowed.clone(),
                            value: value.clone(),
                        },
                        value,
                    ));
                }
            }
            Constraint::MinExclusive(bound) => {
                range(ctx, bound, out, |o| o == Ordering::Greater, |bound, value| {
                    ViolationKind::MinExclusive { bound, value }
                })
            }
            Constraint::MaxExclusive(bound) => {
                range(ctx, bound, out, |o| o == Ordering::Less, |bound, value| {
                    ViolationKind::MaxExclusive { bound, value }
                })
            }
            Constraint::MinInclusive(bound) => {
                range(ctx, bound, out, |o| o != Ordering::Less, |bound, value| {
                    ViolationKind::MinInclusive { bound, value }
                })
            }
            Constraint::MaxInclusive(bound) => {
                range(ctx, bound, out, |o| o != Ordering::Greater, |bound, value| {
                    ViolationKind::MaxInclusive { bound, value }
                })
            }
            Constraint::Equals(other) => {
                let others = ctx.other_values(other);
                for value in ctx.values.iter().filter(|v| !others.contains(v)) {
                    out.push(ctx.value_violation(
                        ViolationKind::Equals {
                            other: other.clone(),
                            value: value.clone(),
                        },
                        value,
                    ));
                }
                for value in others.iter().filter(|v| !ctx.values.contains(v)) {
                    out.push(ctx.violation(
                        ViolationKind::Equals {
                            other: other.clone(),
                            value: value.clone(),
                        },
                        vec![Triple::new(ctx.element.clone(), other.clone().into(), value.clone())],
                    ));
                }
            }
            Constraint::Disjoint(other) => {
                let others = ctx.other_values(other);
                for value in ctx.values.iter().filter(|v| others.contains(v)) {
                    out.push(ctx.value_violation(
                        ViolationKind::Disjoint {
                            other: other.clone(),
                            value: value.clone(),
                        },
                        value,
                    ));
                }
            }
            Constraint::LessThan(other) => {
                compare_with(ctx, other, out, |o| o == Ordering::Less, |other, value, other_value| {
                    ViolationKind::LessThan {
                        other,
                        value,
                        other_value,
                    }
                })
            }
            Constraint::LessThanOrEquals(other) => compare_with(
                ctx,
                other,
                out,
                |o| o != Ordering::Greater,
                |other, value, other_value| ViolationKind::LessThanOrEquals {
                    other,
                    value,
                    other_value,
                },
            ),
            // Cardinality-only nesting looks at the value set as a whole,
            // anything else at one value node at a time
            Constraint::Not(nested) if nested.iter().all(Constraint::is_cardinality) => {
                let mut inner = Vec::new();
                for constraint in nested {
                    constraint.evaluate(ctx, &mut inner);
                }
                if inner.is_empty() {
                    out.push(ctx.violation(
                        ViolationKind::Not {
                            nested: describe_all(nested, ctx.graph.prefixes()),
                        },
                        ctx.statements(ctx.values.iter()),
                    ));
                }
            }
            Constraint::Not(nested) => {
                for value in ctx.values {
                    let single = EvaluationContext {
                        values: std::slice::from_ref(value),
                        ..*ctx
                    };
                    let mut inner = Vec::new();
                    for constraint in nested {
                        constraint.evaluate(&single, &mut inner);
                    }
                    if inner.is_empty() {
                        out.push(ctx.value_violation(
                            ViolationKind::Not {
                                nested: describe_all(nested, ctx.graph.prefixes()),
                            },
                            value,
                        ));
                    }
                }
            }
            Constraint::Scripted { function, message } => {
                let Some(evaluator) = ctx.evaluator else {
                    debug!("No expression evaluator, skipping sh:js {}", function);
                    return;
                };
                for value in ctx.values {
                    let bindings = ctx.bindings(Some(value));
                    let default = format!("Scripted predicate {} failed for {{$this}}", function);
                    let template = message.as_deref().or(ctx.message).unwrap_or(&default);
                    let result = evaluator.evaluate(Expression::Script { function: function.as_str() }, &bindings, ctx.graph);
                    if let Some(violation) = ctx.expression_result(result, &bindings, template, value, |message| {
                        ViolationKind::ScriptedPredicate {
                            function: function.clone(),
                            message,
                        }
                    }) {
                        out.push(violation);
                    }
                }
            }
            Constraint::Sparql { query, message } => {
                let Some(evaluator) = ctx.evaluator else {
                    debug!("No expression evaluator, skipping sh:sparql");
                    return;
                };
                let bindings = ctx.bindings(None);
                let template = message
                    .as_deref()
                    .or(ctx.message)
                    .unwrap_or("SPARQL constraint failed for {$this}");
                let result = evaluator.evaluate(Expression::Sparql { query: query.as_str() }, &bindings, ctx.graph);
                let statements = ctx.statements(ctx.values.iter());
                match result {
                    Ok(outcome) if outcome.passed => {}
                    Ok(outcome) => {
                        let message =
                            interpolate(template, &outcome.captures, &bindings, ctx.graph.prefixes());
                        out.push(ctx.violation(ViolationKind::SparqlConstraint { message }, statements));
                    }
                    Err(e) => out.push(ctx.violation(
                        ViolationKind::EvaluationFailure { reason: e.to_string() },
                        statements,
                    )),
                }
            }
            Constraint::UniqueLang => {
                let mut seen: Vec<(&str, Vec<&RdfObject>)> = Vec::new();
                for value in ctx.values {
                    let Some(language) = value.as_literal().and_then(|l| l.language()) else {
                        continue;
                    };
                    match seen.iter_mut().find(|(l, _)| *l == language) {
                        Some((_, values)) => values.push(value),
                        None => seen.push((language, vec![value])),
                    }
                }
                for (language, values) in seen.into_iter().filter(|(_, v)| v.len() > 1) {
                    out.push(ctx.violation(
                        ViolationKind::UniqueLanguage {
                            language: language.to_string(),
                        },
                        ctx.statements(values.into_iter()),
                    ));
                }
            }
        }
    }
}

fn describe_all(constraints: &[Constraint], prefixes: &PrefixMap) -> String {
    constraints
        .iter()
        .map(|c| c.describe(prefixes))
        .collect::<Vec<_>>()
        .join(" ; ")
}

fn is_meta_model_instance(value: &RdfObject) -> bool {
    value
        .as_named_node()
        .and_then(|n| ModelUrn::try_from(n).ok())
        .map(|urn| urn.is_meta_model())
        .unwrap_or(false)
}

fn text_length(value: &RdfObject) -> Option<usize> {
    (!value.is_blank_node()).then(|| value.lexical_form().chars().count())
}

/// Order two literals: numerically for numeric XSD types, lexically for
/// equal datatypes, otherwise incomparable
pub fn compare_values(left: &RdfObject, right: &RdfObject) -> Option<Ordering> {
    let (left, right) = (left.as_literal()?, right.as_literal()?);
    let (ld, rd) = (left.datatype(), right.datatype());
    if xsd::is_numeric(ld.as_str()) && xsd::is_numeric(rd.as_str()) {
        let l: f64 = left.value().trim().parse().ok()?;
        let r: f64 = right.value().trim().parse().ok()?;
        return l.partial_cmp(&r);
    }
    if ld == rd && left.language() == right.language() {
        return Some(left.value().cmp(right.value()));
    }
    None
}

fn range(
    ctx: &EvaluationContext<'_>,
    bound: &Literal,
    out: &mut Vec<Violation>,
    holds: impl Fn(Ordering) -> bool,
    kind: impl Fn(Literal, RdfObject) -> ViolationKind,
) {
    let bound_value = RdfObject::Literal(bound.clone());
    for value in ctx.values {
        if !compare_values(value, &bound_value).map_or(false, &holds) {
            out.push(ctx.value_violation(kind(bound.clone(), value.clone()), value));
        }
    }
}

fn compare_with(
    ctx: &EvaluationContext<'_>,
    other: &NamedNode,
    out: &mut Vec<Violation>,
    holds: impl Fn(Ordering) -> bool,
    kind: impl Fn(NamedNode, RdfObject, RdfObject) -> ViolationKind,
) {
    let others = ctx.other_values(other);
    for value in ctx.values {
        for other_value in &others {
            if !compare_values(value, other_value).map_or(false, &holds) {
                out.push(ctx.value_violation(
                    kind(other.clone(), value.clone(), other_value.clone()),
                    value,
                ));
            }
        }
    }
}

fn check_datatype(ctx: &EvaluationContext<'_>, allowed: &NamedNode, value: &RdfObject) -> Option<Violation> {
    let Some(literal) = value.as_literal() else {
        return Some(ctx.value_violation(
            ViolationKind::Datatype {
                allowed: allowed.clone(),
                value: value.clone(),
                actual: None,
            },
            value,
        ));
    };
    let actual = literal.datatype();
    if &actual == allowed {
        return None;
    }

    // string vs. langString mismatches can be repaired mechanically
    let replacement = match (allowed.as_str(), actual.as_str()) {
        (rdf::LANG_STRING, xsd::STRING) => {
            Literal::new_language_tagged_literal(literal.value(), ctx.default_language).ok()
        }
        (xsd::STRING, rdf::LANG_STRING) => Some(Literal::new_simple_literal(literal.value())),
        _ => None,
    };

    let mut violation = ctx.value_violation(
        ViolationKind::Datatype {
            allowed: allowed.clone(),
            value: value.clone(),
            actual: Some(actual),
        },
        value,
    );
    if let (Some(new), Some(property)) = (replacement, ctx.property) {
        violation = violation.with_fix(Fix::ReplaceValue {
            subject: ctx.element.clone(),
            predicate: property.clone(),
            old: value.clone(),
            new: new.into(),
        });
    }
    Some(violation)
}

/// Read-only view handed to constraints while evaluating one shape on one
/// focus element
pub struct EvaluationContext<'a> {
    /// The full graph being validated
    pub graph: &'a Graph,
    pub hierarchy: &'a ClassHierarchy,
    /// Focus element
    pub element: &'a RdfSubject,
    /// Path of the property shape, None for node shapes
    pub property: Option<&'a NamedNode>,
    /// Value nodes: objects of the path, or the focus element itself
    pub values: &'a [RdfObject],
    /// `sh:message` of the enclosing shape
    pub message: Option<&'a str>,
    pub default_language: &'a str,
    pub evaluator: Option<&'a dyn ExpressionEvaluator>,
}

impl<'a> EvaluationContext<'a> {
    /// Statements linking the element to the given values via the property
    pub fn statements<'v>(&self, values: impl Iterator<Item = &'v RdfObject>) -> Vec<Triple> {
        match self.property {
            Some(property) => values
                .map(|v| Triple::new(self.element.clone(), property.clone().into(), v.clone()))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn violation(&self, kind: ViolationKind, statements: Vec<Triple>) -> Violation {
        Violation::new(
            ViolationContext {
                element: self.element.clone(),
                property: self.property.cloned(),
                statements,
            },
            kind,
        )
    }

    fn value_violation(&self, kind: ViolationKind, value: &RdfObject) -> Violation {
        self.violation(kind, self.statements(std::iter::once(value)))
    }

    fn other_values(&self, other: &NamedNode) -> Vec<RdfObject> {
        self.graph
            .objects(self.element, other)
            .into_iter()
            .cloned()
            .collect()
    }

    fn bindings(&self, value: Option<&RdfObject>) -> Bindings {
        Bindings {
            this: self.element.clone(),
            value: value.cloned(),
            path: self.property.cloned(),
        }
    }

    fn expression_result(
        &self,
        result: super::evaluator::EvaluatorResult<super::evaluator::EvaluationOutcome>,
        bindings: &Bindings,
        template: &str,
        value: &RdfObject,
        kind: impl FnOnce(String) -> ViolationKind,
    ) -> Option<Violation> {
        match result {
            Ok(outcome) if outcome.passed => None,
            Ok(outcome) => {
                let message = interpolate(template, &outcome.captures, bindings, self.graph.prefixes());
                Some(self.value_violation(kind(message), value))
            }
            Err(e) => Some(self.value_violation(
                ViolationKind::EvaluationFailure { reason: e.to_string() },
                value,
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

fn shape_name(node: &RdfSubject) -> String {
    node.to_string()
}

fn invalid(node: &RdfSubject, constraint: &str, value: &RdfObject) -> ShapeError {
    ShapeError::InvalidValue {
        shape: shape_name(node),
        constraint: constraint.to_string(),
        value: value.to_string(),
    }
}

fn count(node: &RdfSubject, constraint: &str, value: &RdfObject) -> ShapeResult<usize> {
    value
        .as_literal()
        .and_then(|l| l.value().trim().parse::<usize>().ok())
        .ok_or_else(|| invalid(node, constraint, value))
}

fn iri(node: &RdfSubject, constraint: &str, value: &RdfObject) -> ShapeResult<NamedNode> {
    value
        .as_named_node()
        .cloned()
        .ok_or_else(|| invalid(node, constraint, value))
}

fn literal(node: &RdfSubject, constraint: &str, value: &RdfObject) -> ShapeResult<Literal> {
    value
        .as_literal()
        .cloned()
        .ok_or_else(|| invalid(node, constraint, value))
}

fn string(shapes: &Graph, node: &RdfSubject, local: &str) -> Option<String> {
    shapes
        .object(node, &sh::term(local))
        .and_then(|o| o.as_literal())
        .map(|l| l.value().to_string())
}

/// Translate `sh:flags` into inline regex flags
fn build_regex(pattern: &str, flags: Option<&str>) -> ShapeResult<Regex> {
    let mut builder = RegexBuilder::new(pattern);
    for flag in flags.unwrap_or_default().chars() {
        match flag {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'x' => builder.ignore_whitespace(true),
            // Other XPath flags have no regex counterpart
            _ => &mut builder,
        };
    }
    builder.build().map_err(|e| ShapeError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// Parse the constraint predicates declared directly on a shape node
pub fn parse_constraints(shapes: &Graph, node: &RdfSubject) -> ShapeResult<Vec<Constraint>> {
    let mut constraints = Vec::new();
    for triple in shapes.triples_with_subject(node) {
        let Some(local) = triple.predicate.as_str().strip_prefix(sh::NS) else {
            continue;
        };
        let value = &triple.object;
        let constraint = match local {
            "class" => Constraint::Class(iri(node, local, value)?),
            "datatype" => Constraint::Datatype(iri(node, local, value)?),
            "minCount" => Constraint::MinCount(count(node, local, value)?),
            "maxCount" => Constraint::MaxCount(count(node, local, value)?),
            "minLength" => Constraint::MinLength(count(node, local, value)?),
            "maxLength" => Constraint::MaxLength(count(node, local, value)?),
            "pattern" => {
                let pattern = literal(node, local, value)?.value().to_string();
                let flags = string(shapes, node, "flags");
                let regex = build_regex(&pattern, flags.as_deref())?;
                Constraint::Pattern {
                    pattern,
                    flags,
                    regex,
                }
            }
            "in" => Constraint::In(shapes.list(value)),
            "minExclusive" => Constraint::MinExclusive(literal(node, local, value)?),
            "maxExclusive" => Constraint::MaxExclusive(literal(node, local, value)?),
            "minInclusive" => Constraint::MinInclusive(literal(node, local, value)?),
            "maxInclusive" => Constraint::MaxInclusive(literal(node, local, value)?),
            "equals" => Constraint::Equals(iri(node, local, value)?),
            "disjoint" => Constraint::Disjoint(iri(node, local, value)?),
            "lessThan" => Constraint::LessThan(iri(node, local, value)?),
            "lessThanOrEquals" => Constraint::LessThanOrEquals(iri(node, local, value)?),
            "not" => {
                let nested = value.to_subject().ok_or_else(|| invalid(node, local, value))?;
                Constraint::Not(parse_constraints(shapes, &nested)?)
            }
            "js" => {
                let js = value.to_subject().ok_or_else(|| invalid(node, local, value))?;
                let function = string(shapes, &js, "jsFunctionName")
                    .ok_or_else(|| invalid(node, "jsFunctionName", value))?;
                Constraint::Scripted {
                    function,
                    message: string(shapes, &js, "message"),
                }
            }
            "sparql" => {
                let sparql = value.to_subject().ok_or_else(|| invalid(node, local, value))?;
                let query = string(shapes, &sparql, "select")
                    .ok_or_else(|| invalid(node, "select", value))?;
                Constraint::Sparql {
                    query,
                    message: string(shapes, &sparql, "message"),
                }
            }
            "uniqueLang" => match value.lexical_form() {
                "true" | "1" => Constraint::UniqueLang,
                "false" | "0" => continue,
                _ => return Err(invalid(node, local, value)),
            },
            _ => continue,
        };
        constraints.push(constraint);
    }
    Ok(constraints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::{RdfFormat, RdfParser};

    fn shapes(body: &str) -> (Graph, RdfSubject) {
        let text = format!(
            "@prefix sh: <http://www.w3.org/ns/shacl#> .\n\
             @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .\n\
             @prefix ex: <urn:samm:com.example:1.0.0#> .\n\
             ex:shape {} .",
            body
        );
        let graph = RdfParser::parse(&text, RdfFormat::Turtle).unwrap();
        let node: RdfSubject = NamedNode::new("urn:samm:com.example:1.0.0#shape").unwrap().into();
        (graph, node)
    }

    #[test]
    fn test_parse_constraints() {
        let (graph, node) = shapes(
            "sh:minCount 1 ; sh:maxCount 2 ; sh:pattern \"^a\" ; sh:flags \"i\" ; \
             sh:in ( ex:a ex:b ) ; sh:uniqueLang true ; sh:not [ sh:minCount 3 ]",
        );
        let constraints = parse_constraints(&graph, &node).unwrap();
        assert_eq!(constraints.len(), 6);
        match &constraints[2] {
            Constraint::Pattern { regex, .. } => assert!(regex.is_match("Abc")),
            other => panic!("unexpected {:?}", other),
        }
        match &constraints[3] {
            Constraint::In(values) => assert_eq!(values.len(), 2),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(&constraints[5], Constraint::Not(n) if n.len() == 1));
    }

    #[test]
    fn test_invalid_count() {
        let (graph, node) = shapes("sh:minCount \"many\"");
        assert!(matches!(
            parse_constraints(&graph, &node),
            Err(ShapeError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_invalid_pattern() {
        let (graph, node) = shapes("sh:pattern \"(\"");
        assert!(matches!(
            parse_constraints(&graph, &node),
            Err(ShapeError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_compare_values() {
        let int = |v: &str| -> RdfObject {
            Literal::new_typed_literal(v, NamedNode::new(xsd::INTEGER).unwrap()).into()
        };
        let dec = |v: &str| -> RdfObject {
            Literal::new_typed_literal(v, NamedNode::new("http://www.w3.org/2001/XMLSchema#decimal").unwrap())
                .into()
        };
        assert_eq!(compare_values(&int("10"), &int("9")), Some(Ordering::Greater));
        assert_eq!(compare_values(&int("2"), &dec("2.5")), Some(Ordering::Less));
        let text: RdfObject = Literal::new_simple_literal("b").into();
        assert_eq!(compare_values(&text, &Literal::new_simple_literal("a").into()), Some(Ordering::Greater));
        assert_eq!(compare_values(&text, &int("1")), None);
    }
}
