//! Legacy dialect normalization
//!
//! Graphs written against the pre-rename vocabulary use
//! `urn:bamm:io.openmanufacturing:<kind>:<release>#` namespaces, `bamm`
//! prefixes and `urn:bamm:` element URNs, sometimes in the four-segment form.
//! Normalization maps all of them onto the current dialect of the matching
//! revision; the regular chain takes it from there.

use tracing::info;

use super::rewrite::{rewrite_graph, NamespaceMap};
use crate::rdf::{Graph, PrefixMap};
use crate::urn::ModelUrn;
use crate::vocab::{self, LegacyRelease, MetaNamespace, Samm, LEGACY_NAMESPACE, LEGACY_SCHEME, SAMM_SCHEME};

fn legacy_vocabulary_prefix() -> String {
    format!("urn:{}:{}:", LEGACY_SCHEME, LEGACY_NAMESPACE)
}

/// True if any IRI of the graph belongs to the legacy vocabulary
pub fn has_legacy_vocabulary(graph: &Graph) -> bool {
    let marker = legacy_vocabulary_prefix();
    graph.iter().any(|t| {
        t.named_nodes().any(|n| n.as_str().starts_with(&marker))
            || t.object
                .as_literal()
                .map(|l| l.datatype().as_str().starts_with(&marker))
                .unwrap_or(false)
    })
}

/// Vocabulary namespace table of one legacy release
fn release_map(release: LegacyRelease) -> NamespaceMap {
    let successor = Samm::new(release.successor());
    let mut map = NamespaceMap::new();
    for kind in MetaNamespace::ALL {
        map.insert(release.namespace(kind), successor.namespace(kind));
    }
    map
}

/// Rewrite a legacy user URN (or namespace IRI) into the current scheme
fn rewrite_user_iri(iri: &str) -> Option<String> {
    if let Ok(urn) = ModelUrn::parse(iri) {
        if urn.scheme() != LEGACY_SCHEME || vocab::is_meta_namespace(urn.namespace()) {
            return None;
        }
        if urn.is_legacy() {
            return Some(urn.to_current_form().to_string());
        }
    }
    let rest = iri.strip_prefix(&format!("urn:{}:", LEGACY_SCHEME))?;
    if rest.starts_with(&format!("{}:", LEGACY_NAMESPACE)) {
        return None;
    }
    Some(format!("urn:{}:{}", SAMM_SCHEME, rest))
}

/// Rename `bamm`, `bamm-c`, ... prefixes to their current names
fn rename_prefixes(prefixes: &PrefixMap) -> PrefixMap {
    let mut renamed = PrefixMap::new();
    for (prefix, namespace) in prefixes.iter() {
        let name = match prefix.strip_prefix(LEGACY_SCHEME) {
            Some(suffix) if suffix.is_empty() || suffix.starts_with('-') => {
                format!("{}{}", SAMM_SCHEME, suffix)
            }
            _ => prefix.to_string(),
        };
        renamed.insert_if_absent(&name, namespace);
    }
    renamed
}

/// Map a legacy-dialect graph onto the current dialect. A graph without
/// legacy vocabulary is returned unchanged.
pub fn normalize(graph: Graph) -> Graph {
    if !has_legacy_vocabulary(&graph) {
        return graph;
    }
    info!("Legacy vocabulary found, normalizing to the current dialect");

    let mut graph = graph;
    for release in LegacyRelease::ALL {
        let map = release_map(release);
        graph = rewrite_graph(&graph, |iri| map.rewrite(iri));
    }
    let mut graph = rewrite_graph(&graph, rewrite_user_iri);
    let prefixes = rename_prefixes(graph.prefixes());
    graph.set_prefixes(prefixes);
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::{RdfFormat, RdfParser};
    use crate::vocab::SammVersion;

    const LEGACY: &str = r#"
@prefix bamm: <urn:bamm:io.openmanufacturing:meta-model:2.0.0#> .
@prefix bamm-c: <urn:bamm:io.openmanufacturing:characteristic:2.0.0#> .
@prefix : <urn:bamm:com.example:1.0.0#> .

:Movement a bamm:Aspect ;
    bamm:properties ( :speed ) .
:speed a bamm:Property ;
    bamm:characteristic bamm-c:Text .
"#;

    #[test]
    fn test_normalize_legacy_graph() {
        let graph = RdfParser::parse(LEGACY, RdfFormat::Turtle).unwrap();
        assert!(has_legacy_vocabulary(&graph));

        let out = normalize(graph);
        let samm = Samm::new(SammVersion::V2_0_0);

        assert!(!has_legacy_vocabulary(&out));
        assert_eq!(out.prefixes().get("samm"), Some(samm.namespace(MetaNamespace::MetaModel).as_str()));
        assert_eq!(out.prefixes().get("samm-c"), Some(samm.namespace(MetaNamespace::Characteristic).as_str()));
        assert_eq!(out.prefixes().get(""), Some("urn:samm:com.example:1.0.0#"));
        let movement = crate::rdf::NamedNode::new("urn:samm:com.example:1.0.0#Movement").unwrap();
        assert_eq!(out.types_of(&movement.into()), vec![&samm.meta("Aspect")]);
    }

    #[test]
    fn test_four_segment_urns() {
        assert_eq!(
            rewrite_user_iri("urn:bamm:com.example:aspect-model:Movement:1.0.0").as_deref(),
            Some("urn:samm:com.example:1.0.0#Movement")
        );
        assert_eq!(
            rewrite_user_iri("urn:bamm:com.example:1.0.0#speed").as_deref(),
            Some("urn:samm:com.example:1.0.0#speed")
        );
        assert_eq!(rewrite_user_iri("urn:samm:com.example:1.0.0#speed"), None);
        assert_eq!(rewrite_user_iri("http://example.org/x"), None);
    }

    #[test]
    fn test_current_graph_unchanged() {
        let text = "@prefix samm: <urn:samm:org.eclipse.esmf.samm:meta-model:2.1.0#> .\n\
                    <urn:samm:com.example:1.0.0#Movement> a samm:Aspect .";
        let graph = RdfParser::parse(text, RdfFormat::Turtle).unwrap();
        assert_eq!(normalize(graph.clone()), graph);
    }
}
