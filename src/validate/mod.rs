//! Constraint Validation Engine
//!
//! Evaluates the shapes of a [`ShapeRegistry`] against a (migrated) model
//! graph. Validation never stops at the first problem: every violation is
//! collected into a [`ValidationReport`], in subject order, then shape
//! order, then constraint order.
//!
//! ```rust,ignore
//! use aspect_model::validate::{apply_fixes, Validator};
//!
//! let validator = Validator::bundled()?;
//! let report = validator.validate(&graph);
//! if !report.is_valid() {
//!     let fixed = apply_fixes(&graph, report.fixes());
//! }
//! ```

mod constraint;
mod evaluator;
mod fix;
mod shape;
mod violation;

pub use constraint::{compare_values, parse_constraints, Constraint, EvaluationContext};
pub use evaluator::{
    interpolate, Bindings, EvaluationOutcome, EvaluatorError, EvaluatorResult, Expression,
    ExpressionEvaluator,
};
pub use fix::{apply_fixes, Fix, FixEntry};
pub use shape::{
    ClassHierarchy, NodeShape, PropertyShape, ShapeError, ShapeRegistry, ShapeResult,
};
pub use violation::{AppliesTo, ReportEntry, Violation, ViolationContext, ViolationKind};

use indexmap::IndexSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use crate::rdf::{Graph, NamedNode, PrefixMap, RdfObject, RdfSubject};
use crate::urn::ModelUrn;

/// Language tag added by the `string` to `langString` fix
pub const DEFAULT_LANGUAGE: &str = "en";

/// Shape-based validator
#[derive(Clone)]
pub struct Validator {
    registry: ShapeRegistry,
    default_language: String,
    evaluator: Option<Arc<dyn ExpressionEvaluator>>,
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("shapes", &self.registry.len())
            .field("default_language", &self.default_language)
            .field("evaluator", &self.evaluator.is_some())
            .finish()
    }
}

impl Validator {
    pub fn new(registry: ShapeRegistry) -> Self {
        Self {
            registry,
            default_language: DEFAULT_LANGUAGE.to_string(),
            evaluator: None,
        }
    }

    /// Validator over the bundled shapes of the latest meta-model
    pub fn bundled() -> ShapeResult<Self> {
        Ok(Self::new(ShapeRegistry::bundled()?))
    }

    /// Language tag proposed when a plain string must become a `langString`
    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = language.into();
        self
    }

    /// Evaluator for `sh:js` and `sh:sparql` constraints. Without one those
    /// constraints are skipped.
    pub fn with_evaluator(mut self, evaluator: Arc<dyn ExpressionEvaluator>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    pub fn registry(&self) -> &ShapeRegistry {
        &self.registry
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Validate a graph
    pub fn validate(&self, graph: &Graph) -> ValidationReport {
        // Shape hierarchy plus whatever the model declares itself
        let mut hierarchy = self.registry.hierarchy().clone();
        hierarchy.extend_from(graph);

        let mut violations = Vec::new();
        let mut focus_nodes = 0usize;

        for subject in graph.subjects() {
            let types = graph.types_of(subject);
            if types.is_empty() {
                continue;
            }
            let shapes = self.registry.shapes_for(&types, &hierarchy);
            if shapes.is_empty() {
                continue;
            }
            focus_nodes += 1;
            for shape in shapes {
                self.validate_shape(graph, &hierarchy, subject, shape, &mut violations);
            }
        }

        missing_types(graph, &mut violations);

        info!(
            "Validated {} elements: {} violations",
            focus_nodes,
            violations.len()
        );
        ValidationReport {
            violations,
            prefixes: graph.prefixes().clone(),
        }
    }

    fn validate_shape(
        &self,
        graph: &Graph,
        hierarchy: &ClassHierarchy,
        subject: &RdfSubject,
        shape: &NodeShape,
        out: &mut Vec<Violation>,
    ) {
        debug!("Checking {} against {}", subject, shape.id);

        let focus = [RdfObject::from(subject.clone())];
        let ctx = EvaluationContext {
            graph,
            hierarchy,
            element: subject,
            property: None,
            values: &focus,
            message: shape.message.as_deref(),
            default_language: &self.default_language,
            evaluator: self.evaluator.as_deref(),
        };
        for constraint in &shape.constraints {
            constraint.evaluate(&ctx, out);
        }

        for property in &shape.properties {
            let values: Vec<RdfObject> = graph
                .objects(subject, &property.path)
                .into_iter()
                .cloned()
                .collect();
            let ctx = EvaluationContext {
                graph,
                hierarchy,
                element: subject,
                property: Some(&property.path),
                values: &values,
                message: property.message.as_deref().or(shape.message.as_deref()),
                default_language: &self.default_language,
                evaluator: self.evaluator.as_deref(),
            };
            for constraint in &property.constraints {
                constraint.evaluate(&ctx, out);
            }
        }
    }
}

/// Model element URN that is not part of the meta-model
fn model_element(node: &NamedNode) -> bool {
    ModelUrn::try_from(node)
        .map(|urn| !urn.is_meta_model() && urn.name().is_some())
        .unwrap_or(false)
}

/// Flag model elements used with meta-model predicates but never typed
fn missing_types(graph: &Graph, out: &mut Vec<Violation>) {
    let mut untyped: IndexSet<NamedNode> = IndexSet::new();
    let mut check = |node: &NamedNode| {
        if model_element(node) && graph.types_of(&RdfSubject::NamedNode(node.clone())).is_empty() {
            untyped.insert(node.clone());
        }
    };

    for triple in graph.iter() {
        let predicate = triple.predicate.as_named_node();
        let meta = ModelUrn::try_from(predicate)
            .map(|urn| urn.is_meta_model())
            .unwrap_or(false);
        if !meta {
            continue;
        }
        if let Some(subject) = triple.subject.as_named_node() {
            check(subject);
        }
        match &triple.object {
            RdfObject::NamedNode(object) => check(object),
            RdfObject::BlankNode(_) => {
                // Lists such as `samm:properties ( :a :b )`
                for member in graph.list(&triple.object) {
                    if let Some(node) = member.as_named_node() {
                        check(node);
                    }
                }
            }
            RdfObject::Literal(_) => {}
        }
    }

    for node in untyped {
        debug!("{} has no type", node);
        out.push(Violation::new(
            ViolationContext {
                element: node.into(),
                property: None,
                statements: Vec::new(),
            },
            ViolationKind::MissingType,
        ));
    }
}

/// Ordered result of one validation run
#[derive(Debug, Clone)]
pub struct ValidationReport {
    violations: Vec<Violation>,
    prefixes: PrefixMap,
}

impl ValidationReport {
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// True when no violation was found
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Every fix of every violation, in report order
    pub fn fixes(&self) -> impl Iterator<Item = &Fix> {
        self.violations.iter().flat_map(|v| v.fixes.iter())
    }

    /// Violations with a given error code
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Violation> {
        self.violations.iter().filter(move |v| v.error_code() == code)
    }

    /// Serializable rows with messages rendered using the model's prefixes
    pub fn entries(&self) -> Vec<ReportEntry> {
        self.violations
            .iter()
            .map(|v| v.entry(&self.prefixes))
            .collect()
    }

    pub fn prefixes(&self) -> &PrefixMap {
        &self.prefixes
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}

/// Validate a graph against the bundled shapes
pub fn validate(graph: &Graph) -> ShapeResult<ValidationReport> {
    Ok(Validator::bundled()?.validate(graph))
}
