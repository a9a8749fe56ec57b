//! Graph Store
//!
//! The triple layer every engine builds on:
//! - RDF terms and triples (wrapping oxrdf)
//! - `Graph`, an indexed triple set carrying its prefix table
//! - Turtle / N-Triples parsing and serialization (rio)
//!
//! # Example
//!
//! ```rust
//! use aspect_model::rdf::{Graph, NamedNode, RdfPredicate, Literal, Triple};
//!
//! let mut graph = Graph::new();
//! let subject = NamedNode::new("urn:samm:com.example:1.0.0#speed").unwrap();
//! let predicate = RdfPredicate::new("urn:samm:org.eclipse.esmf.samm:meta-model:2.1.0#preferredName").unwrap();
//! let object = Literal::new_language_tagged_literal("Speed", "en").unwrap();
//!
//! graph.insert(Triple::new(subject.clone().into(), predicate, object.into()));
//! assert_eq!(graph.triples_with_subject(&subject.into()).len(), 1);
//! ```

mod namespace;
mod serialization;
mod store;
mod types;

pub use types::{
    BlankNode, Literal, NamedNode, RdfError, RdfObject, RdfPredicate, RdfResult, RdfSubject,
    Triple,
};

pub use store::Graph;

pub use namespace::{PrefixError, PrefixMap, PrefixResult};

pub use serialization::{
    ParseError, ParseResult, RdfFormat, RdfParser, RdfSerializer, SerializeError,
    SerializeResult,
};
