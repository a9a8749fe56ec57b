use aspect_model::migrate::{
    default_chain, detect_version, has_legacy_vocabulary, migrate, normalize_legacy,
    MigrationChain, MigrationError, MigrationStep, Migrator, NamespaceVersionBump,
};
use aspect_model::rdf::{Graph, RdfFormat, RdfParser};
use aspect_model::{SammVersion, Version};

fn parse(text: &str) -> Graph {
    RdfParser::parse(text, RdfFormat::Turtle).unwrap()
}

const LEGACY_MODEL: &str = r#"
@prefix bamm: <urn:bamm:io.openmanufacturing:meta-model:2.0.0#> .
@prefix bamm-c: <urn:bamm:io.openmanufacturing:characteristic:2.0.0#> .
@prefix unit: <urn:bamm:io.openmanufacturing:unit:2.0.0#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
@prefix : <urn:bamm:com.example:1.0.0#> .

:Movement a bamm:Aspect ;
    bamm:preferredName "Movement"@en ;
    bamm:properties ( :speed :label ) ;
    bamm:operations ( ) .
:speed a bamm:Property ;
    bamm:characteristic :Speed .
:label a bamm:Property ;
    bamm:characteristic bamm-c:Text .
:Speed a bamm-c:Measurement ;
    bamm:dataType xsd:float ;
    bamm-c:unit unit:kilometrePerHour .
"#;

const CURRENT_MODEL: &str = r#"
@prefix samm: <urn:samm:org.eclipse.esmf.samm:meta-model:2.1.0#> .
@prefix samm-c: <urn:samm:org.eclipse.esmf.samm:characteristic:2.1.0#> .
@prefix unit: <urn:samm:org.eclipse.esmf.samm:unit:2.1.0#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
@prefix : <urn:samm:com.example:1.0.0#> .

:Movement a samm:Aspect ;
    samm:preferredName "Movement"@en ;
    samm:properties ( :speed :label ) ;
    samm:operations ( ) .
:speed a samm:Property ;
    samm:characteristic :Speed .
:label a samm:Property ;
    samm:characteristic samm-c:Text .
:Speed a samm-c:Measurement ;
    samm:dataType xsd:float ;
    samm-c:unit unit:kilometrePerHour .
"#;

#[test]
fn test_legacy_model_migrates_to_latest() {
    let legacy = parse(LEGACY_MODEL);
    assert!(has_legacy_vocabulary(&legacy));

    let migrated = migrate(legacy).unwrap();
    let expected = parse(CURRENT_MODEL);
    // Blank nodes of the lists differ, compare everything else
    assert_eq!(migrated.len(), expected.len());
    assert_eq!(detect_version(&migrated), Ok(SammVersion::latest()));
    assert!(!has_legacy_vocabulary(&migrated));
    assert_eq!(
        migrated.prefixes().get("samm-c"),
        Some("urn:samm:org.eclipse.esmf.samm:characteristic:2.1.0#")
    );
    assert_eq!(migrated.prefixes().get(""), Some("urn:samm:com.example:1.0.0#"));

    let named: Vec<_> = expected
        .iter()
        .filter(|t| !t.subject.is_blank_node() && !t.object.is_blank_node())
        .collect();
    for triple in named {
        assert!(migrated.contains(triple), "missing {:?}", triple);
    }
}

#[test]
fn test_migration_is_idempotent() {
    let once = migrate(parse(LEGACY_MODEL)).unwrap();
    let twice = migrate(once.clone()).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_latest_model_is_unchanged() {
    let current = parse(CURRENT_MODEL);
    assert_eq!(normalize_legacy(current.clone()), current);
    assert_eq!(migrate(current.clone()).unwrap(), current);
}

#[test]
fn test_four_segment_legacy_urns() {
    let graph = parse(
        "<urn:bamm:com.example:aspect-model:Movement:1.0.0> \
         a <urn:bamm:io.openmanufacturing:meta-model:1.0.0#Aspect> .",
    );
    let migrated = migrate(graph).unwrap();
    let expected = parse(
        "<urn:samm:com.example:1.0.0#Movement> \
         a <urn:samm:org.eclipse.esmf.samm:meta-model:2.1.0#Aspect> .",
    );
    assert_eq!(
        migrated.iter().collect::<Vec<_>>(),
        expected.iter().collect::<Vec<_>>()
    );
}

#[test]
fn test_mixed_versions_are_rejected() {
    let graph = parse(
        "<urn:samm:com.example:1.0.0#a> a <urn:samm:org.eclipse.esmf.samm:meta-model:1.0.0#Aspect> .\n\
         <urn:samm:com.example:1.0.0#b> a <urn:samm:org.eclipse.esmf.samm:meta-model:2.1.0#Property> .",
    );
    assert!(matches!(
        migrate(graph),
        Err(MigrationError::MixedVersions(_))
    ));
}

#[test]
fn test_unknown_version_is_rejected() {
    let graph = parse(
        "<urn:samm:com.example:1.0.0#a> a <urn:samm:org.eclipse.esmf.samm:meta-model:3.0.0#Aspect> .",
    );
    assert_eq!(
        migrate(graph),
        Err(MigrationError::InvalidVersion(Version::new(3, 0, 0)))
    );
}

#[test]
fn test_chain_selection_from_intermediate_version() {
    let chain = default_chain();
    let steps: Vec<_> = chain
        .select(SammVersion::V2_0_0, SammVersion::latest())
        .into_iter()
        .map(|s| (s.source_version(), s.target_version()))
        .collect();
    assert_eq!(steps, vec![(SammVersion::V2_0_0, SammVersion::V2_1_0)]);
}

#[test]
fn test_custom_chain() {
    // A chain without the attribute removal keeps samm:name
    let chain = MigrationChain::new()
        .with_step(NamespaceVersionBump::new(SammVersion::V1_0_0, SammVersion::V2_0_0))
        .with_step(NamespaceVersionBump::new(SammVersion::V2_0_0, SammVersion::V2_1_0));
    let graph = parse(
        "@prefix samm: <urn:samm:org.eclipse.esmf.samm:meta-model:1.0.0#> .\n\
         <urn:samm:com.example:1.0.0#a> a samm:Aspect ; samm:name \"a\" .",
    );
    let migrated = Migrator::with_chain(chain).migrate(graph).unwrap();
    assert_eq!(migrated.len(), 2);
    assert_eq!(detect_version(&migrated), Ok(SammVersion::V2_1_0));
}
