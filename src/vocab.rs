//! Vocabularies
//!
//! IRIs of the W3C vocabularies the engines rely on, and the versioned
//! meta-model namespaces (`samm`, `samm-c`, `samm-e`, `unit`) together with
//! their legacy pre-rename (`bamm`) predecessors.

use std::fmt;
use std::str::FromStr;

use crate::rdf::{NamedNode, PrefixMap};
use crate::urn::Version;

/// RDF vocabulary
pub mod rdf {
    use crate::rdf::NamedNode;

    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
    pub const REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
    pub const NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

    pub fn type_() -> NamedNode {
        NamedNode::from_vocab(TYPE)
    }

    pub fn first() -> NamedNode {
        NamedNode::from_vocab(FIRST)
    }

    pub fn rest() -> NamedNode {
        NamedNode::from_vocab(REST)
    }

    pub fn nil() -> NamedNode {
        NamedNode::from_vocab(NIL)
    }

    pub fn lang_string() -> NamedNode {
        NamedNode::from_vocab(LANG_STRING)
    }
}

/// RDF Schema vocabulary
pub mod rdfs {
    use crate::rdf::NamedNode;

    pub const SUB_CLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";

    pub fn sub_class_of() -> NamedNode {
        NamedNode::from_vocab(SUB_CLASS_OF)
    }
}

/// XML Schema datatypes
pub mod xsd {
    use crate::rdf::NamedNode;

    pub const NS: &str = "http://www.w3.org/2001/XMLSchema#";
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

    const NUMERIC: &[&str] = &[
        "decimal",
        "integer",
        "int",
        "long",
        "short",
        "byte",
        "float",
        "double",
        "nonNegativeInteger",
        "positiveInteger",
        "nonPositiveInteger",
        "negativeInteger",
        "unsignedLong",
        "unsignedInt",
        "unsignedShort",
        "unsignedByte",
    ];

    pub fn string() -> NamedNode {
        NamedNode::from_vocab(STRING)
    }

    /// True for the XSD datatypes whose values compare numerically
    pub fn is_numeric(datatype: &str) -> bool {
        datatype
            .strip_prefix(NS)
            .map(|local| NUMERIC.contains(&local))
            .unwrap_or(false)
    }
}

/// SHACL vocabulary
pub mod sh {
    use crate::rdf::NamedNode;

    pub const NS: &str = "http://www.w3.org/ns/shacl#";

    /// `sh:<local>`
    pub fn term(local: &str) -> NamedNode {
        NamedNode::from_vocab(&format!("{}{}", NS, local))
    }
}

/// Namespace segment of the current meta-model vocabularies
pub const SAMM_NAMESPACE: &str = "org.eclipse.esmf.samm";

/// Namespace segment of the legacy pre-rename vocabularies
pub const LEGACY_NAMESPACE: &str = "io.openmanufacturing";

/// URN scheme of the current dialect
pub const SAMM_SCHEME: &str = "samm";

/// URN scheme of the legacy dialect
pub const LEGACY_SCHEME: &str = "bamm";

/// The sub-vocabularies of the meta-model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetaNamespace {
    /// Core elements: Aspect, Property, Characteristic, ...
    MetaModel,
    /// Characteristic and constraint catalog
    Characteristic,
    /// Shared entities
    Entity,
    /// Unit catalog
    Unit,
}

impl MetaNamespace {
    /// All sub-vocabularies
    pub const ALL: [MetaNamespace; 4] = [
        MetaNamespace::MetaModel,
        MetaNamespace::Characteristic,
        MetaNamespace::Entity,
        MetaNamespace::Unit,
    ];

    /// The URN segment naming this sub-vocabulary
    pub fn segment(&self) -> &'static str {
        match self {
            MetaNamespace::MetaModel => "meta-model",
            MetaNamespace::Characteristic => "characteristic",
            MetaNamespace::Entity => "entity",
            MetaNamespace::Unit => "unit",
        }
    }

    /// Conventional prefix in the current dialect
    pub fn prefix(&self) -> &'static str {
        match self {
            MetaNamespace::MetaModel => "samm",
            MetaNamespace::Characteristic => "samm-c",
            MetaNamespace::Entity => "samm-e",
            MetaNamespace::Unit => "unit",
        }
    }

    /// Look a sub-vocabulary up by URN segment
    pub fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ns| ns.segment() == segment)
    }
}

/// Known revisions of the meta-model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SammVersion {
    V1_0_0,
    V2_0_0,
    V2_1_0,
}

impl SammVersion {
    /// All known revisions, ascending
    pub const ALL: [SammVersion; 3] = [SammVersion::V1_0_0, SammVersion::V2_0_0, SammVersion::V2_1_0];

    /// The revision every graph is migrated to
    pub fn latest() -> Self {
        SammVersion::V2_1_0
    }

    /// The semantic version of this revision
    pub fn version(&self) -> Version {
        match self {
            SammVersion::V1_0_0 => Version::new(1, 0, 0),
            SammVersion::V2_0_0 => Version::new(2, 0, 0),
            SammVersion::V2_1_0 => Version::new(2, 1, 0),
        }
    }

    /// Map a semantic version onto a known revision
    pub fn from_version(version: &Version) -> Option<Self> {
        Self::ALL.into_iter().find(|v| &v.version() == version)
    }

    /// True if this is the latest revision
    pub fn is_latest(&self) -> bool {
        *self == Self::latest()
    }
}

impl fmt::Display for SammVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.version())
    }
}

impl FromStr for SammVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let version: Version = s.parse().map_err(|e| format!("{}", e))?;
        Self::from_version(&version).ok_or_else(|| format!("unknown meta-model version {}", s))
    }
}

/// Historical releases of the legacy dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LegacyRelease {
    V1_0_0,
    V2_0_0,
}

impl LegacyRelease {
    /// All legacy releases, ascending
    pub const ALL: [LegacyRelease; 2] = [LegacyRelease::V1_0_0, LegacyRelease::V2_0_0];

    /// The semantic version of this release
    pub fn version(&self) -> Version {
        match self {
            LegacyRelease::V1_0_0 => Version::new(1, 0, 0),
            LegacyRelease::V2_0_0 => Version::new(2, 0, 0),
        }
    }

    /// The current-dialect revision this release was renamed to
    pub fn successor(&self) -> SammVersion {
        match self {
            LegacyRelease::V1_0_0 => SammVersion::V1_0_0,
            LegacyRelease::V2_0_0 => SammVersion::V2_0_0,
        }
    }

    /// Namespace IRI of a sub-vocabulary in this release
    pub fn namespace(&self, kind: MetaNamespace) -> String {
        format!(
            "urn:{}:{}:{}:{}#",
            LEGACY_SCHEME,
            LEGACY_NAMESPACE,
            kind.segment(),
            self.version()
        )
    }
}

/// Meta-model vocabulary of one revision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Samm {
    version: SammVersion,
}

impl Samm {
    /// Vocabulary of the given revision
    pub fn new(version: SammVersion) -> Self {
        Self { version }
    }

    /// Vocabulary of the latest revision
    pub fn latest() -> Self {
        Self::new(SammVersion::latest())
    }

    /// Revision of this vocabulary
    pub fn version(&self) -> SammVersion {
        self.version
    }

    /// Namespace IRI of a sub-vocabulary, ending in `#`
    pub fn namespace(&self, kind: MetaNamespace) -> String {
        format!(
            "urn:{}:{}:{}:{}#",
            SAMM_SCHEME,
            SAMM_NAMESPACE,
            kind.segment(),
            self.version
        )
    }

    /// IRI of an element of a sub-vocabulary
    pub fn iri(&self, kind: MetaNamespace, local: &str) -> NamedNode {
        NamedNode::from_vocab(&format!("{}{}", self.namespace(kind), local))
    }

    /// `samm:<local>`
    pub fn meta(&self, local: &str) -> NamedNode {
        self.iri(MetaNamespace::MetaModel, local)
    }

    /// `samm-c:<local>`
    pub fn characteristic(&self, local: &str) -> NamedNode {
        self.iri(MetaNamespace::Characteristic, local)
    }

    /// The `samm:curie` datatype
    pub fn curie(&self) -> NamedNode {
        self.meta("curie")
    }

    /// The prefix table of this revision
    pub fn prefixes(&self) -> PrefixMap {
        let mut map = PrefixMap::with_defaults();
        for kind in MetaNamespace::ALL {
            map.insert(kind.prefix(), self.namespace(kind));
        }
        map
    }

    /// The sub-vocabulary an IRI belongs to, if it is one of this revision
    pub fn classify(&self, iri: &str) -> Option<MetaNamespace> {
        MetaNamespace::ALL
            .into_iter()
            .find(|kind| iri.starts_with(&self.namespace(*kind)))
    }
}

/// True for URN namespaces whose elements are always available and never
/// resolved from model files
pub fn is_meta_namespace(namespace: &str) -> bool {
    namespace == SAMM_NAMESPACE || namespace == LEGACY_NAMESPACE
}
