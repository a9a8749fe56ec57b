//! Violations
//!
//! A violation is a result, not an error: validation always runs to the end
//! and reports every violation it finds. Each one carries the element it was
//! found on, a stable error code, a message rendered with the graph's
//! prefixes and optional fixes.

use serde::Serialize;

use super::fix::{Fix, FixEntry};
use crate::rdf::{Literal, NamedNode, PrefixMap, RdfObject, RdfSubject, Triple};

/// What a violation is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppliesTo {
    /// The element as a whole
    WholeElement,
    /// A single property of the element
    OnlyProperty,
}

/// Where a violation was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViolationContext {
    /// Focus element
    pub element: RdfSubject,
    /// Property the shape constrains, if any
    pub property: Option<NamedNode>,
    /// Statements that caused the violation (may be empty, e.g. for a missing value)
    pub statements: Vec<Triple>,
}

/// Closed set of violation kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    ClassType {
        allowed: NamedNode,
        value: RdfObject,
        actual: Vec<NamedNode>,
    },
    Datatype {
        allowed: NamedNode,
        value: RdfObject,
        actual: Option<NamedNode>,
    },
    MinCount {
        allowed: usize,
        actual: usize,
    },
    MaxCount {
        allowed: usize,
        actual: usize,
    },
    MinLength {
        allowed: usize,
        actual: usize,
        value: RdfObject,
    },
    MaxLength {
        allowed: usize,
        actual: usize,
        value: RdfObject,
    },
    Pattern {
        pattern: String,
        flags: Option<String>,
        value: RdfObject,
    },
    ValueFromList {
        allowed: Vec<RdfObject>,
        value: RdfObject,
    },
    MinExclusive {
        bound: Literal,
        value: RdfObject,
    },
    MaxExclusive {
        bound: Literal,
        value: RdfObject,
    },
    MinInclusive {
        bound: Literal,
        value: RdfObject,
    },
    MaxInclusive {
        bound: Literal,
        value: RdfObject,
    },
    /// A value present on one property but not on the other
    Equals {
        other: NamedNode,
        value: RdfObject,
    },
    Disjoint {
        other: NamedNode,
        value: RdfObject,
    },
    LessThan {
        other: NamedNode,
        value: RdfObject,
        other_value: RdfObject,
    },
    LessThanOrEquals {
        other: NamedNode,
        value: RdfObject,
        other_value: RdfObject,
    },
    /// The nested constraints unexpectedly held
    Not {
        nested: String,
    },
    ScriptedPredicate {
        function: String,
        message: String,
    },
    SparqlConstraint {
        message: String,
    },
    UniqueLanguage {
        language: String,
    },
    MissingType,
    EvaluationFailure {
        reason: String,
    },
}

impl ViolationKind {
    /// Stable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            ViolationKind::ClassType { .. } => "ERR_CLASS_TYPE",
            ViolationKind::Datatype { .. } => "ERR_TYPE",
            ViolationKind::MinCount { .. } => "ERR_MIN_COUNT",
            ViolationKind::MaxCount { .. } => "ERR_MAX_COUNT",
            ViolationKind::MinLength { .. } => "ERR_MIN_LENGTH",
            ViolationKind::MaxLength { .. } => "ERR_MAX_LENGTH",
            ViolationKind::Pattern { .. } => "ERR_PATTERN",
            ViolationKind::ValueFromList { .. } => "ERR_VALUE_FROM_LIST",
            ViolationKind::MinExclusive { .. } => "ERR_MIN_EXCLUSIVE",
            ViolationKind::MaxExclusive { .. } => "ERR_MAX_EXCLUSIVE",
            ViolationKind::MinInclusive { .. } => "ERR_MIN_INCLUSIVE",
            ViolationKind::MaxInclusive { .. } => "ERR_MAX_INCLUSIVE",
            ViolationKind::Equals { .. } => "ERR_EQUALS",
            ViolationKind::Disjoint { .. } => "ERR_DISJOINT",
            ViolationKind::LessThan { .. } => "ERR_LESS_THAN",
            ViolationKind::LessThanOrEquals { .. } => "ERR_LESS_THAN_OR_EQUALS",
            ViolationKind::Not { .. } => "ERR_NOT",
            ViolationKind::ScriptedPredicate { .. } => "ERR_SCRIPTED_PREDICATE",
            ViolationKind::SparqlConstraint { .. } => "ERR_SPARQL_CONSTRAINT",
            ViolationKind::UniqueLanguage { .. } => "ERR_UNIQUE_LANGUAGE",
            ViolationKind::MissingType => "ERR_MISSING_TYPE",
            ViolationKind::EvaluationFailure { .. } => "ERR_EVALUATION_FAILURE",
        }
    }
}

/// One constraint violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub context: ViolationContext,
    pub kind: ViolationKind,
    pub fixes: Vec<Fix>,
}

impl Violation {
    pub fn new(context: ViolationContext, kind: ViolationKind) -> Self {
        Self {
            context,
            kind,
            fixes: Vec::new(),
        }
    }

    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fixes.push(fix);
        self
    }

    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    pub fn element(&self) -> &RdfSubject {
        &self.context.element
    }

    pub fn property(&self) -> Option<&NamedNode> {
        self.context.property.as_ref()
    }

    /// Violations on a constrained property point at that property only
    pub fn applies_to(&self) -> AppliesTo {
        match (&self.kind, &self.context.property) {
            (ViolationKind::MissingType, _) => AppliesTo::WholeElement,
            (_, Some(_)) => AppliesTo::OnlyProperty,
            (_, None) => AppliesTo::WholeElement,
        }
    }

    /// Render the message with short URIs
    pub fn message(&self, prefixes: &PrefixMap) -> String {
        let element = prefixes.render_subject(&self.context.element);
        let property = self
            .context
            .property
            .as_ref()
            .map(|p| prefixes.render_iri(p.as_str()))
            .unwrap_or_else(|| "the element".to_string());
        let iri = |n: &NamedNode| prefixes.render_iri(n.as_str());
        let obj = |o: &RdfObject| prefixes.render_object(o);

        match &self.kind {
            ViolationKind::ClassType {
                allowed,
                value,
                actual,
            } => {
                let actual = if actual.is_empty() {
                    "no type".to_string()
                } else {
                    actual.iter().map(iri).collect::<Vec<_>>().join(", ")
                };
                format!(
                    "Property {} on {} has value {} of type {}, but only {} is allowed",
                    property,
                    element,
                    obj(value),
                    actual,
                    iri(allowed)
                )
            }
            ViolationKind::Datatype {
                allowed,
                value,
                actual,
            } => match (allowed.as_str(), actual.as_ref().map(|a| a.as_str())) {
                (crate::vocab::rdf::LANG_STRING, Some(crate::vocab::xsd::STRING)) => format!(
                    "Property {} on {} has value {} without a language tag, but a language tag is required",
                    property,
                    element,
                    obj(value)
                ),
                (crate::vocab::xsd::STRING, Some(crate::vocab::rdf::LANG_STRING)) => format!(
                    "Property {} on {} has value {} with a language tag, but no language tag is allowed",
                    property,
                    element,
                    obj(value)
                ),
                (_, Some(actual)) => format!(
                    "Property {} on {} uses data type {}, but only {} is allowed",
                    property,
                    element,
                    prefixes.render_iri(actual),
                    iri(allowed)
                ),
                (_, None) => format!(
                    "Property {} on {} has value {}, but a literal of type {} is required",
                    property,
                    element,
                    obj(value),
                    iri(allowed)
                ),
            },
            ViolationKind::MinCount { allowed, actual } => format!(
                "Property {} on {} is used {} times, but at least {} are required",
                property, element, actual, allowed
            ),
            ViolationKind::MaxCount { allowed, actual } => format!(
                "Property {} on {} is used {} times, but at most {} are allowed",
                property, element, actual, allowed
            ),
            ViolationKind::MinLength {
                allowed,
                actual,
                value,
            } => format!(
                "Property {} on {} has value {} of length {}, but the minimum length is {}",
                property,
                element,
                obj(value),
                actual,
                allowed
            ),
            ViolationKind::MaxLength {
                allowed,
                actual,
                value,
            } => format!(
                "Property {} on {} has value {} of length {}, but the maximum length is {}",
                property,
                element,
                obj(value),
                actual,
                allowed
            ),
            ViolationKind::Pattern {
                pattern,
                flags,
                value,
            } => format!(
                "Property {} on {} has value {} which does not match the pattern {}{}",
                property,
                element,
                obj(value),
                pattern,
                flags
                    .as_ref()
                    .map(|f| format!(" (flags: {})", f))
                    .unwrap_or_default()
            ),
            ViolationKind::ValueFromList { allowed, value } => format!(
                "Property {} on {} has value {}, but only one of {} is allowed",
                property,
                element,
                obj(value),
                allowed.iter().map(obj).collect::<Vec<_>>().join(", ")
            ),
            ViolationKind::MinExclusive { bound, value } => format!(
                "Property {} on {} has value {}, but it must be greater than {}",
                property,
                element,
                obj(value),
                bound.value()
            ),
            ViolationKind::MaxExclusive { bound, value } => format!(
                "Property {} on {} has value {}, but it must be less than {}",
                property,
                element,
                obj(value),
                bound.value()
            ),
            ViolationKind::MinInclusive { bound, value } => format!(
                "Property {} on {} has value {}, but it must be at least {}",
                property,
                element,
                obj(value),
                bound.value()
            ),
            ViolationKind::MaxInclusive { bound, value } => format!(
                "Property {} on {} has value {}, but it must be at most {}",
                property,
                element,
                obj(value),
                bound.value()
            ),
            ViolationKind::Equals { other, value } => format!(
                "Property {} on {} must have the same values as {}, but {} differs",
                property,
                element,
                iri(other),
                obj(value)
            ),
            ViolationKind::Disjoint { other, value } => format!(
                "Property {} on {} must not share values with {}, but both have {}",
                property,
                element,
                iri(other),
                obj(value)
            ),
            ViolationKind::LessThan {
                other,
                value,
                other_value,
            } => format!(
                "Property {} on {} has value {} which is not less than {} of {}",
                property,
                element,
                obj(value),
                obj(other_value),
                iri(other)
            ),
            ViolationKind::LessThanOrEquals {
                other,
                value,
                other_value,
            } => format!(
                "Property {} on {} has value {} which is not less than or equal to {} of {}",
                property,
                element,
                obj(value),
                obj(other_value),
                iri(other)
            ),
            ViolationKind::Not { nested } => format!(
                "Property {} on {} was expected to violate {}, but it conforms",
                property, element, nested
            ),
            ViolationKind::ScriptedPredicate { message, .. } => message.clone(),
            ViolationKind::SparqlConstraint { message } => message.clone(),
            ViolationKind::UniqueLanguage { language } => format!(
                "Property {} on {} has more than one value with language tag \"{}\"",
                property, element, language
            ),
            ViolationKind::MissingType => format!("{} is used without a type", element),
            ViolationKind::EvaluationFailure { reason } => format!(
                "Could not evaluate a constraint of {} on {}: {}",
                property, element, reason
            ),
        }
    }

    /// Serializable report row
    pub fn entry(&self, prefixes: &PrefixMap) -> ReportEntry {
        ReportEntry {
            error_code: self.error_code(),
            message: self.message(prefixes),
            applies_to: self.applies_to(),
            element: prefixes.render_subject(&self.context.element),
            property: self
                .context
                .property
                .as_ref()
                .map(|p| prefixes.render_iri(p.as_str())),
            fixes: self.fixes.iter().map(|f| FixEntry::new(f, prefixes)).collect(),
        }
    }
}

/// One row of a rendered validation report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub error_code: &'static str,
    pub message: String,
    pub applies_to: AppliesTo,
    pub element: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fixes: Vec<FixEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(property: bool) -> ViolationContext {
        ViolationContext {
            element: NamedNode::new("urn:samm:com.example:1.0.0#Movement").unwrap().into(),
            property: property.then(|| {
                NamedNode::new("urn:samm:org.eclipse.esmf.samm:meta-model:2.1.0#properties").unwrap()
            }),
            statements: Vec::new(),
        }
    }

    fn prefixes() -> PrefixMap {
        vec![
            ("", "urn:samm:com.example:1.0.0#"),
            ("samm", "urn:samm:org.eclipse.esmf.samm:meta-model:2.1.0#"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_min_count_message() {
        let violation = Violation::new(
            context(true),
            ViolationKind::MinCount {
                allowed: 1,
                actual: 0,
            },
        );
        assert_eq!(violation.error_code(), "ERR_MIN_COUNT");
        assert_eq!(violation.applies_to(), AppliesTo::OnlyProperty);
        assert_eq!(
            violation.message(&prefixes()),
            "Property samm:properties on :Movement is used 0 times, but at least 1 are required"
        );
    }

    #[test]
    fn test_missing_type_applies_to_element() {
        let violation = Violation::new(context(true), ViolationKind::MissingType);
        assert_eq!(violation.applies_to(), AppliesTo::WholeElement);
        assert_eq!(violation.message(&prefixes()), ":Movement is used without a type");
    }

    #[test]
    fn test_entry_serializes() {
        let violation = Violation::new(context(false), ViolationKind::MissingType);
        let json = serde_json::to_value(violation.entry(&prefixes())).unwrap();
        assert_eq!(json["error_code"], "ERR_MISSING_TYPE");
        assert_eq!(json["applies_to"], "whole-element");
        assert!(json.get("property").is_none());
    }
}
