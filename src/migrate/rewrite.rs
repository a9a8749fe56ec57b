//! URI rewriting over whole graphs

use crate::rdf::{Graph, Literal, NamedNode, RdfObject, RdfPredicate, RdfSubject, Triple};

/// Source namespace -> target namespace table
///
/// Lookups try the longest source namespace first, so overlapping entries
/// (`...:unit:1.0.0#` next to `...:unit:1.0.0#kilogram`) behave predictably.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceMap {
    entries: Vec<(String, String)>,
}

impl NamespaceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mapping. A later entry for the same source replaces the earlier one.
    pub fn insert(&mut self, source: impl Into<String>, target: impl Into<String>) {
        let source = source.into();
        let target = target.into();
        self.entries.retain(|(s, _)| *s != source);
        self.entries.push((source, target));
        self.entries
            .sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrite an IRI, or None if no source namespace matches
    pub fn rewrite(&self, iri: &str) -> Option<String> {
        self.entries.iter().find_map(|(source, target)| {
            iri.strip_prefix(source.as_str())
                .map(|rest| format!("{}{}", target, rest))
        })
    }
}

/// Rewrite every IRI of a graph through `rewrite`
///
/// Covers subjects, predicates, IRI objects, literal datatypes, the lexical
/// value of `curie` literals and the namespaces of the prefix table. Blank
/// nodes and all other literals are kept as they are.
pub fn rewrite_graph<F>(graph: &Graph, rewrite: F) -> Graph
where
    F: Fn(&str) -> Option<String>,
{
    let node = |n: &NamedNode| match rewrite(n.as_str()) {
        Some(iri) => NamedNode::from_vocab(&iri),
        None => n.clone(),
    };

    let mut out = graph.map_triples(|triple| {
        let subject = match &triple.subject {
            RdfSubject::NamedNode(n) => RdfSubject::NamedNode(node(n)),
            blank => blank.clone(),
        };
        let predicate = RdfPredicate::from(node(triple.predicate.as_named_node()));
        let object = match &triple.object {
            RdfObject::NamedNode(n) => RdfObject::NamedNode(node(n)),
            RdfObject::Literal(l) => RdfObject::Literal(rewrite_literal(l, &rewrite)),
            blank => blank.clone(),
        };
        Some(Triple::new(subject, predicate, object))
    });

    let prefixes = graph
        .prefixes()
        .map_namespaces(|ns| rewrite(ns).unwrap_or_else(|| ns.to_string()));
    out.set_prefixes(prefixes);
    out
}

fn rewrite_literal<F>(literal: &Literal, rewrite: &F) -> Literal
where
    F: Fn(&str) -> Option<String>,
{
    if literal.language().is_some() {
        return literal.clone();
    }
    let datatype = literal.datatype();
    let Some(new_datatype) = rewrite(datatype.as_str()) else {
        return literal.clone();
    };
    let value = if is_curie(&datatype) {
        rewrite(literal.value()).unwrap_or_else(|| literal.value().to_string())
    } else {
        literal.value().to_string()
    };
    Literal::new_typed_literal(value, NamedNode::from_vocab(&new_datatype))
}

/// True for the `curie` datatype of any meta-model revision
pub fn is_curie(datatype: &NamedNode) -> bool {
    datatype.local_name() == "curie"
        && crate::urn::ModelUrn::try_from(datatype)
            .map(|urn| urn.is_meta_model())
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::{BlankNode, PrefixMap};

    const OLD: &str = "urn:samm:org.eclipse.esmf.samm:meta-model:2.0.0#";
    const NEW: &str = "urn:samm:org.eclipse.esmf.samm:meta-model:2.1.0#";

    fn map() -> NamespaceMap {
        let mut map = NamespaceMap::new();
        map.insert(OLD, NEW);
        map
    }

    #[test]
    fn test_longest_source_wins() {
        let mut map = NamespaceMap::new();
        map.insert("urn:x:a:1.0.0#", "urn:x:a:2.0.0#");
        map.insert("urn:x:a:1.0.0#Special", "urn:x:b:2.0.0#Special");
        assert_eq!(map.len(), 2);
        assert_eq!(
            map.rewrite("urn:x:a:1.0.0#Special").as_deref(),
            Some("urn:x:b:2.0.0#Special")
        );
        assert_eq!(
            map.rewrite("urn:x:a:1.0.0#Other").as_deref(),
            Some("urn:x:a:2.0.0#Other")
        );
        assert_eq!(map.rewrite("urn:y:1.0.0#Other"), None);
    }

    #[test]
    fn test_rewrite_graph_positions() {
        let map = map();
        let blank = BlankNode::from_id("b0").unwrap();
        let curie = NamedNode::new(format!("{}curie", OLD)).unwrap();
        let triples = vec![
            Triple::new(
                NamedNode::new("urn:samm:com.example:1.0.0#speed").unwrap().into(),
                RdfPredicate::new(format!("{}characteristic", OLD)).unwrap(),
                NamedNode::new(format!("{}Trait", OLD)).unwrap().into(),
            ),
            Triple::new(
                blank.clone().into(),
                RdfPredicate::new(format!("{}value", OLD)).unwrap(),
                Literal::new_typed_literal(format!("{}Aspect", OLD), curie).into(),
            ),
        ];
        let mut prefixes = PrefixMap::new();
        prefixes.insert("samm", OLD);
        let graph = Graph::from_triples(triples, prefixes);

        let out = rewrite_graph(&graph, |iri| map.rewrite(iri));

        assert_eq!(out.len(), 2);
        assert_eq!(out.prefixes().get("samm"), Some(NEW));
        for triple in out.iter() {
            assert!(triple.predicate.as_str().starts_with(NEW));
        }
        let literal = out
            .objects(&blank.into(), &NamedNode::new(format!("{}value", NEW)).unwrap())
            .into_iter()
            .find_map(|o| o.as_literal().cloned())
            .unwrap();
        assert_eq!(literal.value(), format!("{}Aspect", NEW));
        assert_eq!(literal.datatype().as_str(), format!("{}curie", NEW));
    }

    #[test]
    fn test_plain_literals_untouched() {
        let map = map();
        let triple = Triple::new(
            NamedNode::new("urn:samm:com.example:1.0.0#speed").unwrap().into(),
            RdfPredicate::new(format!("{}description", OLD)).unwrap(),
            Literal::new_simple_literal(format!("{}Aspect", OLD)).into(),
        );
        let graph: Graph = vec![triple].into_iter().collect();
        let out = rewrite_graph(&graph, |iri| map.rewrite(iri));
        let object = &out.iter().next().unwrap().object;
        assert_eq!(object.lexical_form(), format!("{}Aspect", OLD));
    }
}
