//! Conversions between rio's borrowed model and the crate's RDF types

use super::{ParseError, SerializeError};
use crate::rdf::vocab::XSD_STRING;
use crate::rdf::{BlankNode, Literal, NamedNode, RdfObject, RdfPredicate, RdfSubject, Triple};
use rio_api::formatter::TriplesFormatter;
use rio_api::model::{
    BlankNode as RioBlankNode, Literal as RioLiteral, NamedNode as RioNamedNode,
    Subject as RioSubject, Term as RioTerm, Triple as RioTriple,
};
use rustc_hash::FxHashMap;

/// Outcome of one parser callback: the document was bad, or the
/// consumer refused the triple.
pub(super) enum Step<E> {
    Parse(ParseError),
    Sink(E),
}

impl<E> From<rio_turtle::TurtleError> for Step<E> {
    fn from(e: rio_turtle::TurtleError) -> Self {
        Step::Parse(ParseError::Parse(e.to_string()))
    }
}

impl<E> From<rio_xml::RdfXmlError> for Step<E> {
    fn from(e: rio_xml::RdfXmlError) -> Self {
        Step::Parse(ParseError::Parse(e.to_string()))
    }
}

/// Document blank node label -> fresh blank node
#[derive(Default)]
pub(super) struct BlankNodeMap(FxHashMap<String, BlankNode>);

impl BlankNodeMap {
    fn resolve(&mut self, label: &str) -> BlankNode {
        self.0.entry(label.to_string()).or_default().clone()
    }
}

fn named_node(n: RioNamedNode<'_>) -> Result<NamedNode, ParseError> {
    NamedNode::new(n.iri).map_err(|e| ParseError::Parse(e.to_string()))
}

fn convert_subject(
    s: RioSubject<'_>,
    blank_nodes: &mut BlankNodeMap,
) -> Result<RdfSubject, ParseError> {
    match s {
        RioSubject::NamedNode(n) => Ok(RdfSubject::NamedNode(named_node(n)?)),
        RioSubject::BlankNode(b) => Ok(RdfSubject::BlankNode(blank_nodes.resolve(b.id))),
        _ => Err(ParseError::Parse("Unsupported subject type".to_string())),
    }
}

fn convert_object(o: RioTerm<'_>, blank_nodes: &mut BlankNodeMap) -> Result<RdfObject, ParseError> {
    match o {
        RioTerm::NamedNode(n) => Ok(RdfObject::NamedNode(named_node(n)?)),
        RioTerm::BlankNode(b) => Ok(RdfObject::BlankNode(blank_nodes.resolve(b.id))),
        RioTerm::Literal(RioLiteral::Simple { value }) => {
            Ok(RdfObject::Literal(Literal::new_simple_literal(value)))
        }
        RioTerm::Literal(RioLiteral::LanguageTaggedString { value, language }) => {
            Literal::new_language_tagged_literal(value, language)
                .map(RdfObject::Literal)
                .map_err(|e| ParseError::Parse(e.to_string()))
        }
        RioTerm::Literal(RioLiteral::Typed { value, datatype }) => Ok(RdfObject::Literal(
            Literal::new_typed_literal(value, named_node(datatype)?),
        )),
        _ => Err(ParseError::Parse("Unsupported object type".to_string())),
    }
}

pub(super) fn convert_triple(
    t: RioTriple<'_>,
    blank_nodes: &mut BlankNodeMap,
) -> Result<Triple, ParseError> {
    Ok(Triple::new(
        convert_subject(t.subject, blank_nodes)?,
        RdfPredicate::from(named_node(t.predicate)?),
        convert_object(t.object, blank_nodes)?,
    ))
}

pub(super) fn format_triple<F: TriplesFormatter>(
    formatter: &mut F,
    triple: &Triple,
) -> Result<(), SerializeError> {
    let subject = match &triple.subject {
        RdfSubject::NamedNode(n) => RioSubject::NamedNode(RioNamedNode { iri: n.as_str() }),
        RdfSubject::BlankNode(b) => RioSubject::BlankNode(RioBlankNode { id: b.as_str() }),
    };
    let predicate = RioNamedNode {
        iri: triple.predicate.as_named_node().as_str(),
    };

    // Owned datatype has to outlive the borrowed rio literal below.
    let datatype = match &triple.object {
        RdfObject::Literal(l) => Some(l.datatype()),
        _ => None,
    };
    let object = match &triple.object {
        RdfObject::NamedNode(n) => RioTerm::NamedNode(RioNamedNode { iri: n.as_str() }),
        RdfObject::BlankNode(b) => RioTerm::BlankNode(RioBlankNode { id: b.as_str() }),
        RdfObject::Literal(l) => RioTerm::Literal(match (l.language(), &datatype) {
            (Some(language), _) => RioLiteral::LanguageTaggedString {
                value: l.value(),
                language,
            },
            (None, Some(dt)) if dt.as_str() != XSD_STRING => RioLiteral::Typed {
                value: l.value(),
                datatype: RioNamedNode { iri: dt.as_str() },
            },
            (None, _) => RioLiteral::Simple { value: l.value() },
        }),
    };

    formatter
        .format(&RioTriple {
            subject,
            predicate,
            object,
        })
        .map_err(|e| SerializeError::Serialize(e.to_string()))
}
