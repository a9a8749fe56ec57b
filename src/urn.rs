//! URN & namespace model
//!
//! Model elements are addressed by URNs of the form
//! `urn:<scheme>:<namespace>:<version>#<name>`. Meta-model vocabularies add an
//! element-type segment (`urn:samm:org.eclipse.esmf.samm:meta-model:2.1.0#Aspect`),
//! and the legacy dialect used a four-segment form without fragment
//! (`urn:bamm:com.example:aspect-model:Movement:1.0.0`).

use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

use crate::rdf::NamedNode;
use crate::vocab::{self, MetaNamespace, SAMM_SCHEME};

/// Malformed identifier
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UrnSyntaxError {
    /// Does not match any URN form
    #[error("Invalid model element URN: {0}")]
    InvalidUrn(String),

    /// Malformed version segment
    #[error("Invalid version: {0}")]
    InvalidVersion(String),
}

pub type UrnResult<T> = Result<T, UrnSyntaxError>;

/// Semantic version, compared numerically per segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Create a version
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = UrnSyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || UrnSyntaxError::InvalidVersion(s.to_string());
        let mut parts = s.split('.');
        let mut next = || -> UrnResult<u64> {
            let part = parts.next().ok_or_else(invalid)?;
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse().map_err(|_| invalid())
        };
        let version = Version::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(version)
    }
}

const NAMESPACE: &str = r"[a-zA-Z][a-zA-Z0-9_-]*(?:\.[a-zA-Z0-9_-]+)*";
const VERSION: &str = r"\d+\.\d+\.\d+";
const NAME: &str = r"[a-zA-Z_][a-zA-Z0-9_-]*";
const SCHEME: &str = r"[a-z][a-z0-9-]*";

fn current_form() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^urn:({SCHEME}):({NAMESPACE}):({VERSION})(?:#({NAME}))?$"
        ))
        .expect("current URN pattern is valid")
    })
}

fn element_type_form() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^urn:({SCHEME}):({NAMESPACE}):([a-z][a-z-]*):({VERSION})(?:#({NAME}))?$"
        ))
        .expect("element type URN pattern is valid")
    })
}

fn legacy_form() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^urn:({SCHEME}):({NAMESPACE}):([a-z][a-z-]*):({NAME}):({VERSION})$"
        ))
        .expect("legacy URN pattern is valid")
    })
}

/// Which textual form a URN was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum UrnForm {
    /// `urn:scheme:ns:version#name`
    Current,
    /// `urn:scheme:ns:type:version#name`
    ElementType,
    /// `urn:scheme:ns:type:name:version`
    Legacy,
}

/// Identifier of a model element
///
/// Immutable. Ordered by namespace, then version (numerically), then name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelUrn {
    scheme: String,
    namespace: String,
    element_type: Option<String>,
    version: Version,
    name: Option<String>,
    form: UrnForm,
}

impl ModelUrn {
    /// Parse a URN in any of the accepted forms
    pub fn parse(text: &str) -> UrnResult<Self> {
        let invalid = || UrnSyntaxError::InvalidUrn(text.to_string());

        if let Some(caps) = current_form().captures(text) {
            return Ok(Self {
                scheme: caps[1].to_string(),
                namespace: caps[2].to_string(),
                element_type: None,
                version: caps[3].parse()?,
                name: caps.get(4).map(|m| m.as_str().to_string()),
                form: UrnForm::Current,
            });
        }
        if let Some(caps) = element_type_form().captures(text) {
            return Ok(Self {
                scheme: caps[1].to_string(),
                namespace: caps[2].to_string(),
                element_type: Some(caps[3].to_string()),
                version: caps[4].parse()?,
                name: caps.get(5).map(|m| m.as_str().to_string()),
                form: UrnForm::ElementType,
            });
        }
        if let Some(caps) = legacy_form().captures(text) {
            return Ok(Self {
                scheme: caps[1].to_string(),
                namespace: caps[2].to_string(),
                element_type: Some(caps[3].to_string()),
                version: caps[5].parse()?,
                name: Some(caps[4].to_string()),
                form: UrnForm::Legacy,
            });
        }
        Err(invalid())
    }

    /// Build a current-form URN
    pub fn new(
        scheme: impl Into<String>,
        namespace: impl Into<String>,
        version: Version,
        name: Option<String>,
    ) -> Self {
        Self {
            scheme: scheme.into(),
            namespace: namespace.into(),
            element_type: None,
            version,
            name,
            form: UrnForm::Current,
        }
    }

    /// URN scheme (`samm`, `bamm`, ...)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Reverse-domain namespace
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Version segment
    pub fn version(&self) -> Version {
        self.version
    }

    /// Local element name, if the URN addresses an element
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Element type segment (`meta-model`, `characteristic`, legacy `aspect-model`, ...)
    pub fn element_type(&self) -> Option<&str> {
        self.element_type.as_deref()
    }

    /// True for the legacy four-segment form
    pub fn is_legacy(&self) -> bool {
        self.form == UrnForm::Legacy
    }

    /// True if this URN belongs to a meta-model vocabulary
    pub fn is_meta_model(&self) -> bool {
        self.form == UrnForm::ElementType
            && vocab::is_meta_namespace(&self.namespace)
            && self
                .element_type
                .as_deref()
                .and_then(MetaNamespace::from_segment)
                .is_some()
    }

    /// Same element in another version
    pub fn with_version(&self, version: Version) -> Self {
        Self {
            version,
            ..self.clone()
        }
    }

    /// Same element in the current `#name` form and current scheme
    pub fn to_current_form(&self) -> Self {
        match self.form {
            UrnForm::Legacy => Self::new(
                SAMM_SCHEME,
                self.namespace.clone(),
                self.version,
                self.name.clone(),
            ),
            UrnForm::Current | UrnForm::ElementType => self.clone(),
        }
    }

    /// The URN as an RDF named node
    pub fn to_named_node(&self) -> NamedNode {
        NamedNode::from_vocab(&self.to_string())
    }
}

impl fmt::Display for ModelUrn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.form {
            UrnForm::Current => write!(f, "urn:{}:{}:{}", self.scheme, self.namespace, self.version)?,
            UrnForm::ElementType => write!(
                f,
                "urn:{}:{}:{}:{}",
                self.scheme,
                self.namespace,
                self.element_type.as_deref().unwrap_or_default(),
                self.version
            )?,
            UrnForm::Legacy => {
                return write!(
                    f,
                    "urn:{}:{}:{}:{}:{}",
                    self.scheme,
                    self.namespace,
                    self.element_type.as_deref().unwrap_or_default(),
                    self.name.as_deref().unwrap_or_default(),
                    self.version
                );
            }
        }
        if let Some(name) = &self.name {
            write!(f, "#{}", name)?;
        }
        Ok(())
    }
}

impl FromStr for ModelUrn {
    type Err = UrnSyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&NamedNode> for ModelUrn {
    type Error = UrnSyntaxError;

    fn try_from(node: &NamedNode) -> Result<Self, Self::Error> {
        Self::parse(node.as_str())
    }
}

impl Ord for ModelUrn {
    fn cmp(&self, other: &Self) -> Ordering {
        self.namespace
            .cmp(&other.namespace)
            .then(self.version.cmp(&other.version))
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.scheme.cmp(&other.scheme))
            .then_with(|| self.element_type.cmp(&other.element_type))
            .then_with(|| self.form.cmp(&other.form))
    }
}

impl PartialOrd for ModelUrn {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
