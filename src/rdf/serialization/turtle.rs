//! Turtle and N-Triples implementation on top of rio

use super::{ParseError, ParseResult, SerializeError, SerializeResult};
use crate::rdf::{
    BlankNode, Graph, Literal, NamedNode, PrefixMap, RdfObject, RdfPredicate, RdfSubject, Triple,
};
use rio_api::formatter::TriplesFormatter;
use rio_api::model as rio;
use rio_api::parser::TriplesParser;
use rio_turtle::{NTriplesFormatter, NTriplesParser, TurtleFormatter, TurtleParser};
use std::fmt::Write as _;

/// Turtle parser
pub struct TurtleParserWrapper;

impl TurtleParserWrapper {
    /// Parse a Turtle document, keeping its `@prefix` declarations
    pub fn parse(input: &str) -> ParseResult<Graph> {
        let mut parser = TurtleParser::new(input.as_bytes(), None);
        let triples = collect_triples(&mut parser)?;

        // The parser hands prefixes out as a hash map; sort for stable output
        let mut declared: Vec<(&String, &String)> = parser.prefixes().iter().collect();
        declared.sort();
        let prefixes: PrefixMap = declared
            .into_iter()
            .map(|(p, iri)| (p.clone(), iri.clone()))
            .collect();

        Ok(Graph::from_triples(triples, prefixes))
    }

    /// Parse an N-Triples document
    pub fn parse_ntriples(input: &str) -> ParseResult<Graph> {
        let mut parser = NTriplesParser::new(input.as_bytes());
        let triples = collect_triples(&mut parser)?;
        Ok(Graph::from_triples(triples, PrefixMap::new()))
    }
}

fn collect_triples<P>(parser: &mut P) -> ParseResult<Vec<Triple>>
where
    P: TriplesParser,
    ParseError: From<P::Error>,
{
    let mut triples = Vec::new();
    parser.parse_all(&mut |t| -> ParseResult<()> {
        let subject = convert_subject(t.subject)?;
        let predicate = convert_predicate(t.predicate)?;
        let object = convert_object(t.object)?;
        triples.push(Triple::new(subject, predicate, object));
        Ok(())
    })?;
    Ok(triples)
}

/// Turtle serializer
pub struct TurtleSerializerWrapper;

impl TurtleSerializerWrapper {
    /// Serialize a graph to Turtle: prefix declarations, then triples
    pub fn serialize(graph: &Graph) -> SerializeResult<String> {
        let mut header = String::new();
        for (prefix, iri) in graph.prefixes().iter() {
            // Writing into a String cannot fail
            let _ = writeln!(header, "@prefix {}: <{}> .", prefix, iri);
        }
        if !header.is_empty() {
            header.push('\n');
        }

        let mut output = Vec::new();
        let mut formatter = TurtleFormatter::new(&mut output);
        for triple in graph.iter() {
            write_triple(&mut formatter, triple)?;
        }
        formatter.finish()?;

        let body = String::from_utf8(output).map_err(|e| SerializeError::Serialize(e.to_string()))?;
        Ok(header + &body)
    }

    /// Serialize a graph to N-Triples
    pub fn serialize_ntriples(graph: &Graph) -> SerializeResult<String> {
        let mut output = Vec::new();
        let mut formatter = NTriplesFormatter::new(&mut output);
        for triple in graph.iter() {
            write_triple(&mut formatter, triple)?;
        }
        formatter.finish()?;
        String::from_utf8(output).map_err(|e| SerializeError::Serialize(e.to_string()))
    }
}

fn write_triple<F>(formatter: &mut F, triple: &Triple) -> Result<(), std::io::Error>
where
    F: TriplesFormatter<Error = std::io::Error>,
{
    let subject = match &triple.subject {
        RdfSubject::NamedNode(n) => rio::Subject::NamedNode(rio::NamedNode { iri: n.as_str() }),
        RdfSubject::BlankNode(b) => rio::Subject::BlankNode(rio::BlankNode { id: b.as_str() }),
    };
    let predicate = rio::NamedNode {
        iri: triple.predicate.as_str(),
    };

    let datatype;
    let object = match &triple.object {
        RdfObject::NamedNode(n) => rio::Term::NamedNode(rio::NamedNode { iri: n.as_str() }),
        RdfObject::BlankNode(b) => rio::Term::BlankNode(rio::BlankNode { id: b.as_str() }),
        RdfObject::Literal(l) => match l.language() {
            Some(language) => rio::Term::Literal(rio::Literal::LanguageTaggedString {
                value: l.value(),
                language,
            }),
            None if l.is_plain_string() => {
                rio::Term::Literal(rio::Literal::Simple { value: l.value() })
            }
            None => {
                datatype = l.datatype();
                rio::Term::Literal(rio::Literal::Typed {
                    value: l.value(),
                    datatype: rio::NamedNode {
                        iri: datatype.as_str(),
                    },
                })
            }
        },
    };

    formatter.format(&rio::Triple {
        subject,
        predicate,
        object,
    })
}

fn convert_subject(s: rio::Subject) -> ParseResult<RdfSubject> {
    match s {
        rio::Subject::NamedNode(n) => Ok(RdfSubject::NamedNode(convert_named_node(n)?)),
        rio::Subject::BlankNode(b) => Ok(RdfSubject::BlankNode(
            BlankNode::from_id(b.id).map_err(|e| ParseError::Term(e.to_string()))?,
        )),
        _ => Err(ParseError::Term("quoted triples are not supported".to_string())),
    }
}

fn convert_predicate(p: rio::NamedNode) -> ParseResult<RdfPredicate> {
    Ok(RdfPredicate::from(convert_named_node(p)?))
}

fn convert_named_node(n: rio::NamedNode) -> ParseResult<NamedNode> {
    NamedNode::new(n.iri).map_err(|e| ParseError::Term(e.to_string()))
}

fn convert_object(o: rio::Term) -> ParseResult<RdfObject> {
    match o {
        rio::Term::NamedNode(n) => Ok(RdfObject::NamedNode(convert_named_node(n)?)),
        rio::Term::BlankNode(b) => Ok(RdfObject::BlankNode(
            BlankNode::from_id(b.id).map_err(|e| ParseError::Term(e.to_string()))?,
        )),
        rio::Term::Literal(l) => match l {
            rio::Literal::Simple { value } => {
                Ok(RdfObject::Literal(Literal::new_simple_literal(value)))
            }
            rio::Literal::LanguageTaggedString { value, language } => Ok(RdfObject::Literal(
                Literal::new_language_tagged_literal(value, language)
                    .map_err(|e| ParseError::Term(e.to_string()))?,
            )),
            rio::Literal::Typed { value, datatype } => Ok(RdfObject::Literal(
                Literal::new_typed_literal(value, convert_named_node(datatype)?),
            )),
        },
        _ => Err(ParseError::Term("quoted triples are not supported".to_string())),
    }
}
