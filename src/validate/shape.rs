//! Shape registry
//!
//! Node shapes and their property shapes, read from a SHACL graph, plus the
//! `rdfs:subClassOf` hierarchy declared alongside them.

use indexmap::IndexSet;
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use super::constraint::{parse_constraints, Constraint};
use crate::rdf::{Graph, NamedNode, ParseError, RdfFormat, RdfObject, RdfParser, RdfSubject};
use crate::vocab::{rdf, rdfs, sh};

/// Shapes for the latest meta-model revision
const BUNDLED_SHAPES: &str = include_str!("../shapes/samm-shapes.ttl");

/// Malformed shape graph
#[derive(Error, Debug)]
pub enum ShapeError {
    /// Shape file could not be parsed
    #[error("Failed to parse shapes: {0}")]
    Parse(#[from] ParseError),

    /// A constraint has a value of the wrong kind
    #[error("Invalid value {value} for sh:{constraint} on shape {shape}")]
    InvalidValue {
        shape: String,
        constraint: String,
        value: String,
    },

    /// `sh:pattern` is not a valid regular expression
    #[error("Invalid pattern {pattern}: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Property shape without a plain predicate path
    #[error("Property shape {0} needs an IRI sh:path")]
    UnsupportedPath(String),
}

pub type ShapeResult<T> = Result<T, ShapeError>;

/// Constraints on the values of one property
#[derive(Debug, Clone)]
pub struct PropertyShape {
    pub id: RdfSubject,
    pub path: NamedNode,
    pub constraints: Vec<Constraint>,
    pub message: Option<String>,
}

/// Constraints on instances of the target classes
#[derive(Debug, Clone)]
pub struct NodeShape {
    pub id: RdfSubject,
    pub targets: Vec<NamedNode>,
    /// Constraints on the focus node itself
    pub constraints: Vec<Constraint>,
    pub properties: Vec<PropertyShape>,
    pub message: Option<String>,
}

/// `rdfs:subClassOf` edges
#[derive(Debug, Clone, Default)]
pub struct ClassHierarchy {
    parents: FxHashMap<NamedNode, Vec<NamedNode>>,
}

impl ClassHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `class rdfs:subClassOf parent`
    pub fn insert(&mut self, class: NamedNode, parent: NamedNode) {
        let parents = self.parents.entry(class).or_default();
        if !parents.contains(&parent) {
            parents.push(parent);
        }
    }

    /// Add every `rdfs:subClassOf` statement of a graph
    pub fn extend_from(&mut self, graph: &Graph) {
        let sub_class_of = rdfs::sub_class_of();
        for triple in graph.iter() {
            if triple.predicate.as_named_node() != &sub_class_of {
                continue;
            }
            if let (Some(class), Some(parent)) =
                (triple.subject.as_named_node(), triple.object.as_named_node())
            {
                self.insert(class.clone(), parent.clone());
            }
        }
    }

    /// Reflexive, transitive subclass test; cycles are tolerated
    pub fn is_subclass_of(&self, class: &NamedNode, ancestor: &NamedNode) -> bool {
        let mut stack = vec![class];
        let mut seen: FxHashSet<&NamedNode> = FxHashSet::default();
        while let Some(current) = stack.pop() {
            if current == ancestor {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(parents) = self.parents.get(current) {
                stack.extend(parents.iter());
            }
        }
        false
    }
}

/// All node shapes known to a validator
#[derive(Debug, Clone, Default)]
pub struct ShapeRegistry {
    shapes: Vec<NodeShape>,
    hierarchy: ClassHierarchy,
}

impl ShapeRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the node shapes of a SHACL graph
    ///
    /// Node shapes are the subjects typed `sh:NodeShape` or carrying
    /// `sh:targetClass`, in order of first appearance.
    pub fn from_graph(graph: &Graph) -> ShapeResult<Self> {
        let node_shape = RdfObject::NamedNode(sh::term("NodeShape"));
        let target_class = sh::term("targetClass");
        let rdf_type = rdf::type_();

        let mut ids: IndexSet<RdfSubject> = IndexSet::new();
        for triple in graph.iter() {
            let predicate = triple.predicate.as_named_node();
            if (predicate == &rdf_type && triple.object == node_shape) || predicate == &target_class {
                ids.insert(triple.subject.clone());
            }
        }

        let mut shapes = Vec::with_capacity(ids.len());
        for id in ids {
            shapes.push(parse_node_shape(graph, id)?);
        }

        let mut hierarchy = ClassHierarchy::new();
        hierarchy.extend_from(graph);

        debug!("Loaded {} node shapes", shapes.len());
        Ok(Self { shapes, hierarchy })
    }

    /// Parse shapes from Turtle text
    pub fn parse(text: &str) -> ShapeResult<Self> {
        Self::from_graph(&RdfParser::parse(text, RdfFormat::Turtle)?)
    }

    /// Parse a shapes file
    pub fn from_file(path: &Path) -> ShapeResult<Self> {
        let registry = Self::from_graph(&RdfParser::parse_file(path)?)?;
        info!("Loaded {} shapes from {}", registry.len(), path.display());
        Ok(registry)
    }

    /// The shapes shipped with this crate
    pub fn bundled() -> ShapeResult<Self> {
        Self::parse(BUNDLED_SHAPES)
    }

    /// Add the shapes and class hierarchy of another registry
    pub fn extend(&mut self, other: ShapeRegistry) {
        self.shapes.extend(other.shapes);
        for (class, parents) in other.hierarchy.parents {
            for parent in parents {
                self.hierarchy.insert(class.clone(), parent);
            }
        }
    }

    pub fn shapes(&self) -> &[NodeShape] {
        &self.shapes
    }

    pub fn hierarchy(&self) -> &ClassHierarchy {
        &self.hierarchy
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Shapes targeting any of the given classes, directly or through a superclass
    pub fn shapes_for<'a>(
        &'a self,
        types: &[&NamedNode],
        hierarchy: &ClassHierarchy,
    ) -> Vec<&'a NodeShape> {
        self.shapes
            .iter()
            .filter(|shape| {
                shape.targets.iter().any(|target| {
                    types.iter().any(|t| hierarchy.is_subclass_of(t, target))
                })
            })
            .collect()
    }
}

fn message(graph: &Graph, node: &RdfSubject) -> Option<String> {
    graph
        .object(node, &sh::term("message"))
        .and_then(|o| o.as_literal())
        .map(|l| l.value().to_string())
}

fn parse_node_shape(graph: &Graph, id: RdfSubject) -> ShapeResult<NodeShape> {
    let targets = graph
        .objects(&id, &sh::term("targetClass"))
        .into_iter()
        .filter_map(|o| o.as_named_node().cloned())
        .collect();

    let mut properties = Vec::new();
    for object in graph.objects(&id, &sh::term("property")) {
        let Some(property) = object.to_subject() else {
            continue;
        };
        properties.push(parse_property_shape(graph, property)?);
    }

    Ok(NodeShape {
        constraints: parse_constraints(graph, &id)?,
        message: message(graph, &id),
        targets,
        properties,
        id,
    })
}

fn parse_property_shape(graph: &Graph, id: RdfSubject) -> ShapeResult<PropertyShape> {
    let path = graph
        .object(&id, &sh::term("path"))
        .and_then(|o| o.as_named_node().cloned())
        .ok_or_else(|| ShapeError::UnsupportedPath(id.to_string()))?;

    Ok(PropertyShape {
        constraints: parse_constraints(graph, &id)?,
        message: message(graph, &id),
        path,
        id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPES: &str = r#"
@prefix sh: <http://www.w3.org/ns/shacl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix ex: <urn:samm:com.example:1.0.0#> .

ex:Special rdfs:subClassOf ex:Base .

ex:BaseShape a sh:NodeShape ;
    sh:targetClass ex:Base ;
    sh:property [
        sh:path ex:name ;
        sh:minCount 1 ;
        sh:message "needs a name" ;
    ] .
"#;

    fn node(local: &str) -> NamedNode {
        NamedNode::new(format!("urn:samm:com.example:1.0.0#{}", local)).unwrap()
    }

    #[test]
    fn test_from_graph() {
        let registry = ShapeRegistry::parse(SHAPES).unwrap();
        assert_eq!(registry.len(), 1);
        let shape = &registry.shapes()[0];
        assert_eq!(shape.targets, vec![node("Base")]);
        assert_eq!(shape.properties.len(), 1);
        assert_eq!(shape.properties[0].path, node("name"));
        assert_eq!(shape.properties[0].message.as_deref(), Some("needs a name"));
    }

    #[test]
    fn test_shapes_for_subclass() {
        let registry = ShapeRegistry::parse(SHAPES).unwrap();
        let special = node("Special");
        let other = node("Other");
        assert_eq!(registry.shapes_for(&[&special], registry.hierarchy()).len(), 1);
        assert!(registry.shapes_for(&[&other], registry.hierarchy()).is_empty());
    }

    #[test]
    fn test_hierarchy_cycle_terminates() {
        let mut hierarchy = ClassHierarchy::new();
        hierarchy.insert(node("A"), node("B"));
        hierarchy.insert(node("B"), node("A"));
        assert!(hierarchy.is_subclass_of(&node("A"), &node("B")));
        assert!(!hierarchy.is_subclass_of(&node("A"), &node("C")));
    }

    #[test]
    fn test_missing_path() {
        let text = "@prefix sh: <http://www.w3.org/ns/shacl#> .\n\
                    <urn:x:a:1.0.0#S> sh:targetClass <urn:x:a:1.0.0#C> ; sh:property [ sh:minCount 1 ] .";
        assert!(matches!(
            ShapeRegistry::parse(text),
            Err(ShapeError::UnsupportedPath(_))
        ));
    }

    #[test]
    fn test_bundled_shapes_parse() {
        let registry = ShapeRegistry::bundled().unwrap();
        assert!(!registry.is_empty());
    }
}
