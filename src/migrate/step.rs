//! Migration steps and the default chain

use rustc_hash::FxHashMap;
use std::fmt;
use tracing::debug;

use super::rewrite::{rewrite_graph, NamespaceMap};
use crate::rdf::Graph;
use crate::vocab::{MetaNamespace, Samm, SammVersion};

/// One graph rewrite between two meta-model revisions
pub trait MigrationStep: Send + Sync {
    /// Revision the step expects
    fn source_version(&self) -> SammVersion;

    /// Revision the step produces
    fn target_version(&self) -> SammVersion;

    /// Order among steps with the same source version (lower runs first)
    fn priority(&self) -> u32 {
        100
    }

    /// Human-readable summary for logs and audit trails
    fn description(&self) -> String;

    /// Rewrite the graph
    fn migrate(&self, graph: Graph) -> Graph;
}

impl fmt::Debug for dyn MigrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MigrationStep({} -> {}, priority {}: {})",
            self.source_version(),
            self.target_version(),
            self.priority(),
            self.description()
        )
    }
}

/// Renames every meta-model namespace from one revision to the next
pub struct NamespaceVersionBump {
    from: SammVersion,
    to: SammVersion,
    map: NamespaceMap,
}

impl NamespaceVersionBump {
    pub fn new(from: SammVersion, to: SammVersion) -> Self {
        let (source, target) = (Samm::new(from), Samm::new(to));
        let mut map = NamespaceMap::new();
        for kind in MetaNamespace::ALL {
            map.insert(source.namespace(kind), target.namespace(kind));
        }
        Self { from, to, map }
    }
}

impl MigrationStep for NamespaceVersionBump {
    fn source_version(&self) -> SammVersion {
        self.from
    }

    fn target_version(&self) -> SammVersion {
        self.to
    }

    fn description(&self) -> String {
        format!("Change meta model version {} to {}", self.from, self.to)
    }

    fn migrate(&self, graph: Graph) -> Graph {
        rewrite_graph(&graph, |iri| self.map.rewrite(iri))
    }
}

/// Drops every statement using a meta-model attribute that was removed
pub struct RemoveMetaAttribute {
    version: SammVersion,
    target: SammVersion,
    attribute: &'static str,
}

impl RemoveMetaAttribute {
    pub fn new(version: SammVersion, target: SammVersion, attribute: &'static str) -> Self {
        Self {
            version,
            target,
            attribute,
        }
    }
}

impl MigrationStep for RemoveMetaAttribute {
    fn source_version(&self) -> SammVersion {
        self.version
    }

    fn target_version(&self) -> SammVersion {
        self.target
    }

    fn priority(&self) -> u32 {
        10
    }

    fn description(&self) -> String {
        format!("Remove samm:{} attribute", self.attribute)
    }

    fn migrate(&self, graph: Graph) -> Graph {
        let removed = Samm::new(self.version).meta(self.attribute);
        let mut dropped = 0usize;
        let out = graph.map_triples(|t| {
            if t.predicate.as_named_node() == &removed {
                dropped += 1;
                None
            } else {
                Some(t.clone())
            }
        });
        debug!("Dropped {} samm:{} statements", dropped, self.attribute);
        out
    }
}

/// Unit vocabulary terms that moved from `unit:` into `samm:`
pub const MOVED_UNIT_TERMS: [&str; 8] = [
    "Unit",
    "QuantityKind",
    "symbol",
    "commonCode",
    "referenceUnit",
    "conversionFactor",
    "numericConversionFactor",
    "quantityKind",
];

/// Moves an explicit allow-list of local names from one sub-vocabulary to another
pub struct MoveVocabularyTerms {
    version: SammVersion,
    target: SammVersion,
    from: MetaNamespace,
    to: MetaNamespace,
    terms: &'static [&'static str],
    // Exact IRIs: `unit:Unit` must not capture `unit:UnitReference`
    moves: FxHashMap<String, String>,
}

impl MoveVocabularyTerms {
    pub fn new(
        version: SammVersion,
        target: SammVersion,
        from: MetaNamespace,
        to: MetaNamespace,
        terms: &'static [&'static str],
    ) -> Self {
        let samm = Samm::new(version);
        let moves = terms
            .iter()
            .map(|term| {
                (
                    format!("{}{}", samm.namespace(from), term),
                    format!("{}{}", samm.namespace(to), term),
                )
            })
            .collect();
        Self {
            version,
            target,
            from,
            to,
            terms,
            moves,
        }
    }

    /// Unit vocabulary move of the 1.0.0 -> 2.0.0 migration
    pub fn unit_terms() -> Self {
        Self::new(
            SammVersion::V1_0_0,
            SammVersion::V2_0_0,
            MetaNamespace::Unit,
            MetaNamespace::MetaModel,
            &MOVED_UNIT_TERMS,
        )
    }
}

impl MigrationStep for MoveVocabularyTerms {
    fn source_version(&self) -> SammVersion {
        self.version
    }

    fn target_version(&self) -> SammVersion {
        self.target
    }

    fn priority(&self) -> u32 {
        20
    }

    fn description(&self) -> String {
        format!(
            "Move {} terms from {}: to {}:",
            self.terms.len(),
            self.from.prefix(),
            self.to.prefix()
        )
    }

    fn migrate(&self, graph: Graph) -> Graph {
        rewrite_graph(&graph, |iri| self.moves.get(iri).cloned())
    }
}

/// Ordered set of migration steps
#[derive(Default)]
pub struct MigrationChain {
    steps: Vec<Box<dyn MigrationStep>>,
}

impl MigrationChain {
    /// An empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a step
    pub fn with_step(mut self, step: impl MigrationStep + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// All steps, in insertion order
    pub fn steps(&self) -> impl Iterator<Item = &dyn MigrationStep> {
        self.steps.iter().map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps needed to bring a graph of `detected` up to `target`, in
    /// application order: sorted by source version, then priority
    pub fn select(&self, detected: SammVersion, target: SammVersion) -> Vec<&dyn MigrationStep> {
        let mut selected: Vec<&dyn MigrationStep> = self
            .steps()
            .filter(|s| s.source_version() >= detected && s.target_version() <= target)
            .collect();
        selected.sort_by_key(|s| (s.source_version(), s.priority()));
        selected
    }
}

impl fmt::Debug for MigrationChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.steps.iter()).finish()
    }
}

/// The chain from 1.0.0 to the latest revision
pub fn default_chain() -> MigrationChain {
    MigrationChain::new()
        .with_step(NamespaceVersionBump::new(SammVersion::V1_0_0, SammVersion::V2_0_0))
        .with_step(RemoveMetaAttribute::new(
            SammVersion::V1_0_0,
            SammVersion::V2_0_0,
            "name",
        ))
        .with_step(MoveVocabularyTerms::unit_terms())
        .with_step(NamespaceVersionBump::new(SammVersion::V2_0_0, SammVersion::V2_1_0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::{Literal, NamedNode, RdfPredicate, Triple};

    fn triple(s: &str, p: NamedNode, o: NamedNode) -> Triple {
        Triple::new(NamedNode::new(s).unwrap().into(), RdfPredicate::from(p), o.into())
    }

    #[test]
    fn test_default_chain_order() {
        let chain = default_chain();
        let order: Vec<(SammVersion, u32)> = chain
            .select(SammVersion::V1_0_0, SammVersion::latest())
            .iter()
            .map(|s| (s.source_version(), s.priority()))
            .collect();
        assert_eq!(
            order,
            vec![
                (SammVersion::V1_0_0, 10),
                (SammVersion::V1_0_0, 20),
                (SammVersion::V1_0_0, 100),
                (SammVersion::V2_0_0, 100),
            ]
        );
        assert_eq!(chain.select(SammVersion::V2_0_0, SammVersion::latest()).len(), 1);
        assert!(chain.select(SammVersion::V2_1_0, SammVersion::latest()).is_empty());
    }

    #[test]
    fn test_remove_name_attribute() {
        let samm = Samm::new(SammVersion::V1_0_0);
        let mut graph = Graph::new();
        graph.insert(triple("urn:samm:com.example:1.0.0#speed", samm.meta("name"), samm.meta("Property")));
        graph.insert(Triple::new(
            NamedNode::new("urn:samm:com.example:1.0.0#speed").unwrap().into(),
            RdfPredicate::from(samm.meta("preferredName")),
            Literal::new_language_tagged_literal("Speed", "en").unwrap().into(),
        ));
        let step = RemoveMetaAttribute::new(SammVersion::V1_0_0, SammVersion::V2_0_0, "name");
        let out = step.migrate(graph);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_move_unit_terms_exact_names_only() {
        let samm = Samm::new(SammVersion::V1_0_0);
        let mut graph = Graph::new();
        graph.insert(triple(
            "urn:samm:com.example:1.0.0#kg",
            crate::vocab::rdf::type_(),
            samm.iri(MetaNamespace::Unit, "Unit"),
        ));
        graph.insert(triple(
            "urn:samm:com.example:1.0.0#kg",
            samm.iri(MetaNamespace::Unit, "symbol"),
            samm.iri(MetaNamespace::Unit, "kilogram"),
        ));
        graph.insert(triple(
            "urn:samm:com.example:1.0.0#kg",
            samm.meta("see"),
            samm.iri(MetaNamespace::Unit, "UnitReference"),
        ));

        let out = MoveVocabularyTerms::unit_terms().migrate(graph);

        let iris: Vec<String> = out
            .iter()
            .flat_map(|t| t.named_nodes().map(|n| n.as_str().to_string()).collect::<Vec<_>>())
            .collect();
        assert!(iris.contains(&samm.meta("Unit").as_str().to_string()));
        assert!(iris.contains(&samm.meta("symbol").as_str().to_string()));
        assert!(iris.contains(&samm.iri(MetaNamespace::Unit, "kilogram").as_str().to_string()));
        assert!(iris.contains(&samm.iri(MetaNamespace::Unit, "UnitReference").as_str().to_string()));
    }

    #[test]
    fn test_version_bump() {
        let from = Samm::new(SammVersion::V2_0_0);
        let to = Samm::latest();
        let mut graph = Graph::with_prefixes(from.prefixes());
        graph.insert(triple(
            "urn:samm:com.example:1.0.0#Movement",
            crate::vocab::rdf::type_(),
            from.meta("Aspect"),
        ));
        let out = NamespaceVersionBump::new(SammVersion::V2_0_0, SammVersion::V2_1_0).migrate(graph);
        assert_eq!(out.prefixes(), &to.prefixes());
        assert!(out.iter().all(|t| t.object.as_named_node() == Some(&to.meta("Aspect"))));
    }
}
