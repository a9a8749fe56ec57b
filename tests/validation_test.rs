use aspect_model::rdf::{Graph, Literal, NamedNode, RdfFormat, RdfObject, RdfParser, RdfSubject};
use aspect_model::validate::{
    apply_fixes, validate, AppliesTo, Bindings, EvaluationOutcome, EvaluatorError,
    EvaluatorResult, Expression, ExpressionEvaluator, Fix, ShapeRegistry, Validator,
    ViolationKind,
};
use std::sync::Arc;

const PREFIXES: &str = r#"
@prefix samm: <urn:samm:org.eclipse.esmf.samm:meta-model:2.1.0#> .
@prefix samm-c: <urn:samm:org.eclipse.esmf.samm:characteristic:2.1.0#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
@prefix sh: <http://www.w3.org/ns/shacl#> .
@prefix : <urn:samm:com.example:1.0.0#> .
"#;

fn model(body: &str) -> Graph {
    RdfParser::parse(&format!("{}{}", PREFIXES, body), RdfFormat::Turtle).unwrap()
}

fn node(local: &str) -> NamedNode {
    NamedNode::new(format!("urn:samm:com.example:1.0.0#{}", local)).unwrap()
}

#[test]
fn test_min_count_with_zero_values() {
    let shapes = ShapeRegistry::parse(&format!(
        "{}:ThingShape a sh:NodeShape ; sh:targetClass :Thing ;\n\
         sh:property [ sh:path :label ; sh:minCount 1 ] .",
        PREFIXES
    ))
    .unwrap();
    let graph = model(":thing a :Thing .");

    let report = Validator::new(shapes).validate(&graph);

    assert_eq!(report.len(), 1);
    let violation = &report.violations()[0];
    assert!(matches!(
        violation.kind,
        ViolationKind::MinCount { allowed: 1, actual: 0 }
    ));
    assert_eq!(violation.element(), &RdfSubject::NamedNode(node("thing")));
    assert_eq!(violation.property(), Some(&node("label")));
    assert_eq!(violation.applies_to(), AppliesTo::OnlyProperty);
}

#[test]
fn test_string_instead_of_lang_string_is_fixable() {
    let graph = model(
        ":Movement a samm:Aspect ;\n\
         samm:preferredName \"hello\" ;\n\
         samm:properties ( ) ;\n\
         samm:operations ( ) .",
    );
    let report = validate(&graph).unwrap();

    assert_eq!(report.len(), 1);
    let violation = &report.violations()[0];
    assert_eq!(violation.error_code(), "ERR_TYPE");
    assert_eq!(violation.fixes.len(), 1);
    let Fix::ReplaceValue { new, .. } = &violation.fixes[0];
    assert_eq!(
        new,
        &RdfObject::from(Literal::new_language_tagged_literal("hello", "en").unwrap())
    );

    let fixed = apply_fixes(&graph, report.fixes());
    let again = validate(&fixed).unwrap();
    assert!(again.is_valid(), "{:?}", again.entries());

    // Applying the fixes once more changes nothing
    assert_eq!(apply_fixes(&fixed, report.fixes()), fixed);
}

#[test]
fn test_validation_collects_all_violations() {
    let graph = model(
        ":Movement a samm:Aspect ;\n\
         samm:preferredName \"a\"@en, \"b\"@en ;\n\
         samm:properties ( :speed ) ;\n\
         samm:characteristic samm-c:Text .\n\
         :speed a samm:Property ;\n\
         samm:payloadName \"1speed\" .",
    );
    let report = validate(&graph).unwrap();
    let mut codes: Vec<&str> = report.violations().iter().map(|v| v.error_code()).collect();
    codes.sort();
    assert_eq!(
        codes,
        vec!["ERR_MIN_COUNT", "ERR_NOT", "ERR_PATTERN", "ERR_UNIQUE_LANGUAGE"]
    );
}

#[test]
fn test_range_and_value_constraints() {
    let graph = model(
        ":Range a samm-c:RangeConstraint ;\n\
         samm-c:minValue 10 ;\n\
         samm-c:maxValue 5 ;\n\
         samm-c:lowerBoundDefinition samm-c:AT_MOST .\n\
         :Fixed a samm-c:FixedPointConstraint ;\n\
         samm-c:scale \"0\"^^xsd:positiveInteger ;\n\
         samm-c:integer \"2\"^^xsd:positiveInteger .",
    );
    let report = validate(&graph).unwrap();
    let mut codes: Vec<&str> = report.violations().iter().map(|v| v.error_code()).collect();
    codes.sort();
    assert_eq!(
        codes,
        vec!["ERR_LESS_THAN_OR_EQUALS", "ERR_MIN_INCLUSIVE", "ERR_VALUE_FROM_LIST"]
    );
}

#[test]
fn test_either_sides_must_differ() {
    let graph = model(
        ":Result a samm-c:Either ;\n\
         samm-c:left :Side ;\n\
         samm-c:right :Side .\n\
         :Side a samm:Characteristic .",
    );
    let report = validate(&graph).unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report.violations()[0].error_code(), "ERR_DISJOINT");
}

#[test]
fn test_messages_use_short_uris() {
    let graph = model(":Movement a samm:Aspect ; samm:properties ( ) ; samm:operations ( ) ; samm:description \"x\" .");
    let report = validate(&graph).unwrap();
    let entries = report.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].element, ":Movement");
    assert_eq!(entries[0].property.as_deref(), Some("samm:description"));
    assert!(entries[0].message.contains("samm:description"), "{}", entries[0].message);
    assert_eq!(entries[0].fixes.len(), 1);
}

/// Evaluator accepting only values listed in its allow-list
struct AllowList(Vec<&'static str>);

impl ExpressionEvaluator for AllowList {
    fn evaluate(
        &self,
        expression: Expression<'_>,
        bindings: &Bindings,
        _graph: &Graph,
    ) -> EvaluatorResult<EvaluationOutcome> {
        match expression {
            Expression::Script { function: "allowed" } => {
                let value = bindings
                    .value
                    .as_ref()
                    .map(|v| v.lexical_form().to_string())
                    .unwrap_or_default();
                if self.0.contains(&value.as_str()) {
                    Ok(EvaluationOutcome::pass())
                } else {
                    Ok(EvaluationOutcome::fail().with_capture("value", value))
                }
            }
            Expression::Script { function } => {
                Err(EvaluatorError(format!("unknown function {}", function)))
            }
            Expression::Sparql { .. } => Ok(EvaluationOutcome::pass()),
        }
    }
}

const SCRIPTED_SHAPES: &str = r#"
:ThingShape a sh:NodeShape ;
    sh:targetClass :Thing ;
    sh:property [
        sh:path :code ;
        sh:js [ sh:jsFunctionName "allowed" ] ;
        sh:message "Code {$value} is not allowed" ;
    ] ;
    sh:property [
        sh:path :other ;
        sh:js [ sh:jsFunctionName "missing" ] ;
    ] .
"#;

#[test]
fn test_scripted_constraints_use_evaluator() {
    let shapes = ShapeRegistry::parse(&format!("{}{}", PREFIXES, SCRIPTED_SHAPES)).unwrap();
    let graph = model(":thing a :Thing ; :code \"A\", \"B\" ; :other \"x\" .");

    let validator = Validator::new(shapes).with_evaluator(Arc::new(AllowList(vec!["A"])));
    let report = validator.validate(&graph);

    let messages: Vec<(String, String)> = report
        .entries()
        .into_iter()
        .map(|e| (e.error_code.to_string(), e.message))
        .collect();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].0, "ERR_SCRIPTED_PREDICATE");
    assert_eq!(messages[0].1, "Code B is not allowed");
    assert_eq!(messages[1].0, "ERR_EVALUATION_FAILURE");
}

#[test]
fn test_scripted_constraints_skipped_without_evaluator() {
    let shapes = ShapeRegistry::parse(&format!("{}{}", PREFIXES, SCRIPTED_SHAPES)).unwrap();
    let graph = model(":thing a :Thing ; :code \"B\" .");
    assert!(Validator::new(shapes).validate(&graph).is_valid());
}

const NEGATED_DATATYPE: &str = r#"
:ThingShape a sh:NodeShape ;
    sh:targetClass :Thing ;
    sh:property [
        sh:path :v ;
        sh:not [ sh:datatype xsd:string ] ;
    ] .
"#;

#[test]
fn test_not_without_values_is_valid() {
    let shapes = ShapeRegistry::parse(&format!("{}{}", PREFIXES, NEGATED_DATATYPE)).unwrap();
    let graph = model(":thing a :Thing .");
    let report = Validator::new(shapes).validate(&graph);
    assert!(report.is_valid(), "{:?}", report.entries());
}

#[test]
fn test_not_reports_each_conforming_value() {
    let shapes = ShapeRegistry::parse(&format!("{}{}", PREFIXES, NEGATED_DATATYPE)).unwrap();
    let graph = model(":thing a :Thing ; :v \"a\", 5, \"b\" .");
    let report = Validator::new(shapes).validate(&graph);

    assert_eq!(report.len(), 2);
    let values: Vec<RdfObject> = report
        .violations()
        .iter()
        .map(|v| {
            assert_eq!(v.error_code(), "ERR_NOT");
            assert_eq!(v.context.statements.len(), 1);
            v.context.statements[0].object.clone()
        })
        .collect();
    assert_eq!(
        values,
        vec![
            RdfObject::from(Literal::new_simple_literal("a")),
            RdfObject::from(Literal::new_simple_literal("b")),
        ]
    );
}
