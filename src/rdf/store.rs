//! In-memory triple graph
//!
//! `Graph` is the value every stage of the pipeline hands to the next one:
//! an insertion-ordered triple set with a subject index plus the prefix
//! table of the documents it was built from.

use indexmap::{IndexMap, IndexSet};
use rustc_hash::{FxHashMap, FxHashSet};

use super::namespace::PrefixMap;
use super::types::{BlankNode, NamedNode, RdfObject, RdfPredicate, RdfSubject, Triple};
use crate::vocab::rdf;

/// Triple graph with SP -> O index and prefix table
///
/// Iteration follows insertion order so that every engine run over the same
/// input produces the same output order. Equality compares triple *sets* and
/// prefix tables and ignores order.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// All triples (primary storage)
    triples: IndexSet<Triple>,

    /// SPO index: Subject -> Predicate -> Objects
    spo_index: FxHashMap<RdfSubject, IndexMap<RdfPredicate, IndexSet<RdfObject>>>,

    /// Prefix declarations
    prefixes: PrefixMap,
}

impl Graph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph with the given prefix table
    pub fn with_prefixes(prefixes: PrefixMap) -> Self {
        Self {
            prefixes,
            ..Self::default()
        }
    }

    /// Build a graph from triples and a prefix table
    pub fn from_triples(triples: impl IntoIterator<Item = Triple>, prefixes: PrefixMap) -> Self {
        let mut graph = Self::with_prefixes(prefixes);
        for triple in triples {
            graph.insert(triple);
        }
        graph
    }

    /// Insert a triple. Returns false if it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        if self.triples.contains(&triple) {
            return false;
        }
        self.spo_index
            .entry(triple.subject.clone())
            .or_default()
            .entry(triple.predicate.clone())
            .or_default()
            .insert(triple.object.clone());
        self.triples.insert(triple)
    }

    /// Remove a triple. Returns false if it was not present.
    pub fn remove(&mut self, triple: &Triple) -> bool {
        if !self.triples.shift_remove(triple) {
            return false;
        }
        if let Some(preds) = self.spo_index.get_mut(&triple.subject) {
            if let Some(objs) = preds.get_mut(&triple.predicate) {
                objs.shift_remove(&triple.object);
                if objs.is_empty() {
                    preds.shift_remove(&triple.predicate);
                }
            }
            if preds.is_empty() {
                self.spo_index.remove(&triple.subject);
            }
        }
        true
    }

    /// Check if a triple exists in the graph
    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// Get the total number of triples
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Check if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Iterate over all triples in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Prefix declarations
    pub fn prefixes(&self) -> &PrefixMap {
        &self.prefixes
    }

    /// Replace the prefix table
    pub fn set_prefixes(&mut self, prefixes: PrefixMap) {
        self.prefixes = prefixes;
    }

    /// True if the subject appears in at least one triple
    pub fn has_subject(&self, subject: &RdfSubject) -> bool {
        self.spo_index.contains_key(subject)
    }

    /// All triples with the given subject, grouped by predicate in order of
    /// first appearance
    pub fn triples_with_subject(&self, subject: &RdfSubject) -> Vec<Triple> {
        let Some(preds) = self.spo_index.get(subject) else {
            return Vec::new();
        };
        preds
            .iter()
            .flat_map(|(predicate, objects)| {
                objects.iter().map(move |object| {
                    Triple::new(subject.clone(), predicate.clone(), object.clone())
                })
            })
            .collect()
    }

    /// Every blank node in subject or object position
    pub fn blank_nodes(&self) -> FxHashSet<&BlankNode> {
        let mut nodes = FxHashSet::default();
        for triple in &self.triples {
            if let RdfSubject::BlankNode(b) = &triple.subject {
                nodes.insert(b);
            }
            if let RdfObject::BlankNode(b) = &triple.object {
                nodes.insert(b);
            }
        }
        nodes
    }

    /// Objects of `subject predicate ?o`, in insertion order
    pub fn objects(&self, subject: &RdfSubject, predicate: &NamedNode) -> Vec<&RdfObject> {
        self.spo_index
            .get(subject)
            .and_then(|preds| preds.get(&RdfPredicate::from(predicate.clone())))
            .map(|objs| objs.iter().collect())
            .unwrap_or_default()
    }

    /// First object of `subject predicate ?o`
    pub fn object(&self, subject: &RdfSubject, predicate: &NamedNode) -> Option<&RdfObject> {
        self.objects(subject, predicate).into_iter().next()
    }

    /// Asserted `rdf:type`s of a node
    pub fn types_of(&self, subject: &RdfSubject) -> Vec<&NamedNode> {
        self.objects(subject, &rdf::type_())
            .into_iter()
            .filter_map(RdfObject::as_named_node)
            .collect()
    }

    /// Subjects carrying `rdf:type class`, in order of first appearance
    pub fn subjects_with_type(&self, class: &NamedNode) -> Vec<RdfSubject> {
        let rdf_type = rdf::type_();
        let class = RdfObject::NamedNode(class.clone());
        let mut subjects: IndexSet<RdfSubject> = IndexSet::new();
        for triple in &self.triples {
            if triple.predicate.as_named_node() == &rdf_type && triple.object == class {
                subjects.insert(triple.subject.clone());
            }
        }
        subjects.into_iter().collect()
    }

    /// Distinct subjects, in order of first appearance
    pub fn subjects(&self) -> Vec<&RdfSubject> {
        let mut seen: IndexSet<&RdfSubject> = IndexSet::new();
        for triple in &self.triples {
            seen.insert(&triple.subject);
        }
        seen.into_iter().collect()
    }

    /// Read an RDF collection (`rdf:first` / `rdf:rest`) starting at `head`.
    ///
    /// Stops at `rdf:nil`, at a malformed cell, or when a cell repeats.
    pub fn list(&self, head: &RdfObject) -> Vec<RdfObject> {
        let first = rdf::first();
        let rest = rdf::rest();
        let nil = RdfObject::NamedNode(rdf::nil());
        let mut items = Vec::new();
        let mut visited: IndexSet<RdfSubject> = IndexSet::new();
        let mut cursor = head.clone();
        while cursor != nil {
            let Some(cell) = cursor.to_subject() else { break };
            if !visited.insert(cell.clone()) {
                break;
            }
            match self.object(&cell, &first) {
                Some(item) => items.push(item.clone()),
                None => break,
            }
            match self.object(&cell, &rest) {
                Some(next) => cursor = next.clone(),
                None => break,
            }
        }
        items
    }

    /// Merge another graph into this one.
    ///
    /// Blank nodes of `other` whose label is already taken here are renamed
    /// apart with a numeric suffix, so lists and anonymous nodes of separate
    /// documents never fuse. Labels are kept when free, which makes the result
    /// depend only on the merge order. Triples are then set-unioned; prefixes
    /// already declared here are never overwritten. Returns the triples that
    /// were new to this graph.
    pub fn merge(&mut self, other: Graph) -> Vec<Triple> {
        self.prefixes.merge(&other.prefixes);
        let renames = self.blank_node_renames(&other);

        let mut added = Vec::new();
        for triple in other.triples {
            let triple = if renames.is_empty() {
                triple
            } else {
                rename_blank_nodes(triple, &renames)
            };
            if !self.triples.contains(&triple) {
                added.push(triple.clone());
                self.insert(triple);
            }
        }
        added
    }

    /// Fresh labels for the blank nodes of `other` that clash with ours
    fn blank_node_renames(&self, other: &Graph) -> FxHashMap<BlankNode, BlankNode> {
        let mut renames = FxHashMap::default();
        let incoming = other.blank_nodes();
        if incoming.is_empty() {
            return renames;
        }
        let ours = self.blank_nodes();
        let mut clashing: Vec<&BlankNode> = incoming
            .iter()
            .copied()
            .filter(|b| ours.contains(b))
            .collect();
        if clashing.is_empty() {
            return renames;
        }
        clashing.sort_by(|a, b| a.as_str().cmp(b.as_str()));

        let mut taken: FxHashSet<BlankNode> = ours.into_iter().cloned().collect();
        taken.extend(incoming.iter().map(|b| (*b).clone()));
        for node in clashing {
            let fresh = (1..)
                .map(|n| node.with_suffix(n))
                .find(|candidate| !taken.contains(candidate))
                .unwrap_or_else(|| node.clone());
            taken.insert(fresh.clone());
            renames.insert(node.clone(), fresh);
        }
        renames
    }

    /// Build a new graph by mapping every triple, keeping the prefix table
    pub fn map_triples(&self, mut f: impl FnMut(&Triple) -> Option<Triple>) -> Graph {
        let mut out = Graph::with_prefixes(self.prefixes.clone());
        for triple in &self.triples {
            if let Some(mapped) = f(triple) {
                out.insert(mapped);
            }
        }
        out
    }
}

fn rename_blank_nodes(triple: Triple, renames: &FxHashMap<BlankNode, BlankNode>) -> Triple {
    let subject = match triple.subject {
        RdfSubject::BlankNode(b) => RdfSubject::BlankNode(renames.get(&b).cloned().unwrap_or(b)),
        named => named,
    };
    let object = match triple.object {
        RdfObject::BlankNode(b) => RdfObject::BlankNode(renames.get(&b).cloned().unwrap_or(b)),
        other => other,
    };
    Triple::new(subject, triple.predicate, object)
}

impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.triples == other.triples && self.prefixes == other.prefixes
    }
}

impl Eq for Graph {}

impl FromIterator<Triple> for Graph {
    fn from_iter<T: IntoIterator<Item = Triple>>(iter: T) -> Self {
        Graph::from_triples(iter, PrefixMap::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::{BlankNode, Literal};

    fn node(local: &str) -> NamedNode {
        NamedNode::new(format!("urn:samm:com.example:1.0.0#{}", local)).unwrap()
    }

    fn triple(s: &str, p: &str, o: &str) -> Triple {
        Triple::new(node(s).into(), node(p).into(), node(o).into())
    }

    #[test]
    fn test_insert_and_contains() {
        let mut graph = Graph::new();
        let t = triple("a", "b", "c");

        assert!(graph.insert(t.clone()));
        assert!(!graph.insert(t.clone()));
        assert_eq!(graph.len(), 1);
        assert!(graph.contains(&t));
    }

    #[test]
    fn test_remove_updates_index() {
        let mut graph = Graph::new();
        let t = triple("a", "b", "c");
        graph.insert(t.clone());

        assert!(graph.remove(&t));
        assert!(!graph.remove(&t));
        assert!(graph.is_empty());
        assert!(graph.objects(&node("a").into(), &node("b")).is_empty());
        assert!(!graph.has_subject(&node("a").into()));
    }

    #[test]
    fn test_objects_and_types() {
        let mut graph = Graph::new();
        let speed: RdfSubject = node("speed").into();
        graph.insert(Triple::new(
            speed.clone(),
            rdf::type_().into(),
            node("Property").into(),
        ));
        graph.insert(Triple::new(
            speed.clone(),
            node("preferredName").into(),
            Literal::new_language_tagged_literal("Speed", "en").unwrap().into(),
        ));

        assert_eq!(graph.types_of(&speed), vec![&node("Property")]);
        assert_eq!(graph.objects(&speed, &node("preferredName")).len(), 1);
        assert_eq!(graph.subjects_with_type(&node("Property")), vec![speed]);
    }

    #[test]
    fn test_merge_reports_new_triples_only() {
        let mut left: Graph = vec![triple("a", "b", "c")].into_iter().collect();
        let right: Graph = vec![triple("a", "b", "c"), triple("x", "y", "z")]
            .into_iter()
            .collect();

        let added = left.merge(right);
        assert_eq!(added, vec![triple("x", "y", "z")]);
        assert_eq!(left.len(), 2);
    }

    fn list_graph(owner: &str, predicate: &str, member: &str) -> Graph {
        let cell = BlankNode::from_id("l0").unwrap();
        vec![
            Triple::new(node(owner).into(), node(predicate).into(), cell.clone().into()),
            Triple::new(cell.clone().into(), rdf::first().into(), node(member).into()),
            Triple::new(cell.into(), rdf::rest().into(), rdf::nil().into()),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_merge_renames_clashing_blank_nodes() {
        let mut graph = list_graph("A", "properties", "p");
        let added = graph.merge(list_graph("B", "parameters", "q"));

        assert_eq!(added.len(), 3);
        assert_eq!(graph.len(), 6);
        let a_head = graph.object(&node("A").into(), &node("properties")).unwrap().clone();
        let b_head = graph.object(&node("B").into(), &node("parameters")).unwrap().clone();
        assert_ne!(a_head, b_head);
        assert_eq!(graph.list(&a_head), vec![node("p").into()]);
        assert_eq!(graph.list(&b_head), vec![node("q").into()]);
        assert_eq!(b_head.lexical_form(), "l0_1");
    }

    #[test]
    fn test_merge_renaming_is_deterministic() {
        let merged = || {
            let mut graph = list_graph("A", "properties", "p");
            graph.merge(list_graph("B", "parameters", "q"));
            graph.merge(list_graph("C", "parameters", "r"));
            graph
        };
        let graph = merged();
        assert_eq!(graph, merged());
        let c_head = graph.object(&node("C").into(), &node("parameters")).unwrap();
        assert_eq!(c_head.lexical_form(), "l0_2");
        assert_eq!(graph.list(c_head), vec![node("r").into()]);
    }

    #[test]
    fn test_triples_with_subject_uses_index() {
        let mut graph = Graph::new();
        graph.insert(triple("a", "b", "c"));
        graph.insert(triple("x", "y", "z"));
        graph.insert(triple("a", "b", "d"));
        graph.insert(triple("a", "e", "f"));

        assert_eq!(
            graph.triples_with_subject(&node("a").into()),
            vec![triple("a", "b", "c"), triple("a", "b", "d"), triple("a", "e", "f")]
        );
        assert!(graph.triples_with_subject(&node("q").into()).is_empty());
    }

    #[test]
    fn test_equality_ignores_order() {
        let a: Graph = vec![triple("a", "b", "c"), triple("x", "y", "z")]
            .into_iter()
            .collect();
        let b: Graph = vec![triple("x", "y", "z"), triple("a", "b", "c")]
            .into_iter()
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_list() {
        let mut graph = Graph::new();
        let head = BlankNode::from_id("l0").unwrap();
        let tail = BlankNode::from_id("l1").unwrap();
        graph.insert(Triple::new(head.clone().into(), rdf::first().into(), node("A").into()));
        graph.insert(Triple::new(head.clone().into(), rdf::rest().into(), tail.clone().into()));
        graph.insert(Triple::new(tail.clone().into(), rdf::first().into(), node("B").into()));
        graph.insert(Triple::new(tail.into(), rdf::rest().into(), rdf::nil().into()));

        let items = graph.list(&head.into());
        assert_eq!(items, vec![node("A").into(), node("B").into()]);
    }
}
