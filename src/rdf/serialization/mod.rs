//! RDF serialization formats
//!
//! Supports:
//! - Turtle (TTL), the format model files are persisted in
//! - N-Triples (NT)

mod turtle;

pub use turtle::{TurtleParserWrapper, TurtleSerializerWrapper};

use super::Graph;
use std::path::Path;
use thiserror::Error;

/// RDF serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    /// Turtle format (.ttl)
    Turtle,
    /// N-Triples format (.nt)
    NTriples,
}

impl RdfFormat {
    /// Guess the format from a file extension, defaulting to Turtle
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("nt") => RdfFormat::NTriples,
            _ => RdfFormat::Turtle,
        }
    }
}

/// Parse errors
#[derive(Error, Debug)]
pub enum ParseError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Syntax error reported by the parser
    #[error("Syntax error: {0}")]
    Syntax(#[from] rio_turtle::TurtleError),

    /// A parsed term could not be converted
    #[error("Invalid term: {0}")]
    Term(String),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Serialization errors
#[derive(Error, Debug)]
pub enum SerializeError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),
}

pub type SerializeResult<T> = Result<T, SerializeError>;

/// RDF parser
pub struct RdfParser;

impl RdfParser {
    /// Parse RDF data from a string
    pub fn parse(input: &str, format: RdfFormat) -> ParseResult<Graph> {
        match format {
            RdfFormat::Turtle => TurtleParserWrapper::parse(input),
            RdfFormat::NTriples => TurtleParserWrapper::parse_ntriples(input),
        }
    }

    /// Parse RDF data from a file, format chosen by extension
    pub fn parse_file(path: &Path) -> ParseResult<Graph> {
        let input = std::fs::read_to_string(path)?;
        Self::parse(&input, RdfFormat::from_path(path))
    }
}

/// RDF serializer
pub struct RdfSerializer;

impl RdfSerializer {
    /// Serialize a graph to a string
    pub fn serialize(graph: &Graph, format: RdfFormat) -> SerializeResult<String> {
        match format {
            RdfFormat::Turtle => TurtleSerializerWrapper::serialize(graph),
            RdfFormat::NTriples => TurtleSerializerWrapper::serialize_ntriples(graph),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let graph = RdfParser::parse("", RdfFormat::Turtle).unwrap();
        assert!(graph.is_empty());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(RdfFormat::from_path(Path::new("a/B.ttl")), RdfFormat::Turtle);
        assert_eq!(RdfFormat::from_path(Path::new("a/B.nt")), RdfFormat::NTriples);
    }

    #[test]
    fn test_syntax_error() {
        let result = RdfParser::parse("<urn:a:b> <urn:a:c> .", RdfFormat::Turtle);
        assert!(matches!(result, Err(ParseError::Syntax(_))));
    }
}
