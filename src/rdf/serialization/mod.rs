//! RDF serialization formats
//!
//! Supports:
//! - RDF/XML
//! - Turtle (TTL)
//! - N-Triples (NT)

mod rio;

use super::Triple;
use rio_api::parser::TriplesParser;
use rio_turtle::{NTriplesFormatter, NTriplesParser, TurtleFormatter, TurtleParser};
use rio_xml::{RdfXmlFormatter, RdfXmlParser};
use std::fmt;
use std::io::{BufRead, Cursor, Write};
use std::str::FromStr;
use thiserror::Error;

/// RDF serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RdfFormat {
    /// RDF/XML format (.rdf)
    #[default]
    RdfXml,
    /// Turtle format (.ttl)
    Turtle,
    /// N-Triples format (.nt)
    NTriples,
}

impl FromStr for RdfFormat {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xml" | "rdf" | "rdfxml" | "rdf/xml" => Ok(RdfFormat::RdfXml),
            "turtle" | "ttl" => Ok(RdfFormat::Turtle),
            "nt" | "ntriples" | "n-triples" => Ok(RdfFormat::NTriples),
            other => Err(ParseError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for RdfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RdfFormat::RdfXml => "xml",
            RdfFormat::Turtle => "turtle",
            RdfFormat::NTriples => "ntriples",
        };
        f.write_str(name)
    }
}

/// Parse errors
#[derive(Error, Debug)]
pub enum ParseError {
    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Unknown format name
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// Invalid base IRI
    #[error("Invalid base IRI {0}: {1}")]
    InvalidBase(String, String),
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
    pub fn parse(input: &str, format: RdfFormat) -> ParseResult<Vec<Triple>> {
        let mut triples = Vec::new();
        Self::parse_reader(Cursor::new(input), format, None, &mut |t| {
            triples.push(t);
            Ok::<_, ParseError>(())
        })?;
        Ok(triples)
    }

    /// Stream triples from `reader` into `on_triple`.
    ///
    /// Blank node labels in the document are replaced by fresh blank
    /// nodes, so two parses of the same document never share nodes.
    /// Errors from `on_triple` stop parsing and are returned unchanged.
    pub fn parse_reader<R, E>(
        reader: R,
        format: RdfFormat,
        base: Option<&str>,
        on_triple: &mut impl FnMut(Triple) -> Result<(), E>,
    ) -> Result<(), E>
    where
        R: BufRead,
        E: From<ParseError>,
    {
        let base = base
            .map(|iri| {
                oxiri::Iri::parse(iri.to_string())
                    .map_err(|e| ParseError::InvalidBase(iri.to_string(), e.to_string()))
            })
            .transpose()?;
        let mut blank_nodes = rio::BlankNodeMap::default();
        let mut callback = |t: rio_api::model::Triple<'_>| -> Result<(), rio::Step<E>> {
            let triple = rio::convert_triple(t, &mut blank_nodes).map_err(rio::Step::Parse)?;
            on_triple(triple).map_err(rio::Step::Sink)
        };

        let result = match format {
            RdfFormat::RdfXml => RdfXmlParser::new(reader, base).parse_all(&mut callback),
            RdfFormat::Turtle => TurtleParser::new(reader, base).parse_all(&mut callback),
            RdfFormat::NTriples => NTriplesParser::new(reader).parse_all(&mut callback),
        };

        result.map_err(|step| match step {
            rio::Step::Parse(e) => E::from(e),
            rio::Step::Sink(e) => e,
        })
    }
}

/// RDF serializer
pub struct RdfSerializer;

impl RdfSerializer {
    /// Serialize triples to a string
    pub fn serialize<'a>(
        triples: impl IntoIterator<Item = &'a Triple>,
        format: RdfFormat,
    ) -> SerializeResult<String> {
        let output = Self::serialize_to(triples, format, Vec::new())?;
        String::from_utf8(output).map_err(|e| SerializeError::Serialize(e.to_string()))
    }

    /// Serialize triples into a writer, returning it when done
    pub fn serialize_to<'a, W: Write>(
        triples: impl IntoIterator<Item = &'a Triple>,
        format: RdfFormat,
        writer: W,
    ) -> SerializeResult<W> {
        match format {
            RdfFormat::RdfXml => {
                let mut formatter = RdfXmlFormatter::new(writer)?;
                for triple in triples {
                    rio::format_triple(&mut formatter, triple)?;
                }
                Ok(formatter.finish()?)
            }
            RdfFormat::Turtle => {
                let mut formatter = TurtleFormatter::new(writer);
                for triple in triples {
                    rio::format_triple(&mut formatter, triple)?;
                }
                Ok(formatter.finish()?)
            }
            RdfFormat::NTriples => {
                let mut formatter = NTriplesFormatter::new(writer);
                for triple in triples {
                    rio::format_triple(&mut formatter, triple)?;
                }
                Ok(formatter.finish()?)
            }
        }
    }
}
