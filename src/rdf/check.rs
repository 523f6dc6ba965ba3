//! Term position checks
//!
//! Each check narrows an untyped [`RdfTerm`] to the typed value legal in
//! one position of a quad, or fails with the offending value and its
//! variant. The checks are pure and never touch a backend.

use super::types::{
    ContextId, RdfObject, RdfPredicate, RdfSubject, RdfTerm, TermKind, TermPattern, TermTriple,
    Triple, TriplePattern,
};
use std::fmt;
use thiserror::Error;

/// Position a term occupies in a triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermPosition {
    Subject,
    Predicate,
    Object,
}

impl fmt::Display for TermPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TermPosition::Subject => "subject",
            TermPosition::Predicate => "predicate",
            TermPosition::Object => "object",
        };
        f.write_str(name)
    }
}

/// A subject, predicate or object has a variant not allowed in its position
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{value}:{kind} is not a valid {position}")]
pub struct TermTypeError {
    pub position: TermPosition,
    pub value: String,
    pub kind: TermKind,
}

impl TermTypeError {
    fn new(position: TermPosition, term: &RdfTerm) -> Self {
        Self {
            position,
            value: term.to_string(),
            kind: term.kind(),
        }
    }
}

/// A context identifier is neither a named node nor a blank node
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{value}:{kind} is not a valid context identifier")]
pub struct ContextTypeError {
    pub value: String,
    pub kind: TermKind,
}

pub fn check_subject(term: &RdfTerm) -> Result<RdfSubject, TermTypeError> {
    match term {
        RdfTerm::NamedNode(n) => Ok(RdfSubject::NamedNode(n.clone())),
        RdfTerm::BlankNode(b) => Ok(RdfSubject::BlankNode(b.clone())),
        RdfTerm::Literal(_) => Err(TermTypeError::new(TermPosition::Subject, term)),
    }
}

pub fn check_predicate(term: &RdfTerm) -> Result<RdfPredicate, TermTypeError> {
    match term {
        RdfTerm::NamedNode(n) => Ok(RdfPredicate::from(n.clone())),
        RdfTerm::BlankNode(_) | RdfTerm::Literal(_) => {
            Err(TermTypeError::new(TermPosition::Predicate, term))
        }
    }
}

/// Every variant is a legal object; the `Result` keeps the checks uniform.
pub fn check_object(term: &RdfTerm) -> Result<RdfObject, TermTypeError> {
    Ok(match term {
        RdfTerm::NamedNode(n) => RdfObject::NamedNode(n.clone()),
        RdfTerm::BlankNode(b) => RdfObject::BlankNode(b.clone()),
        RdfTerm::Literal(l) => RdfObject::Literal(l.clone()),
    })
}

pub fn check_context(term: &RdfTerm) -> Result<ContextId, ContextTypeError> {
    match term {
        RdfTerm::NamedNode(n) => Ok(ContextId::NamedNode(n.clone())),
        RdfTerm::BlankNode(b) => Ok(ContextId::BlankNode(b.clone())),
        RdfTerm::Literal(_) => Err(ContextTypeError {
            value: term.to_string(),
            kind: term.kind(),
        }),
    }
}

/// Check all three positions of a triple
pub fn check_triple(triple: &TermTriple) -> Result<Triple, TermTypeError> {
    Ok(Triple::new(
        check_subject(&triple.subject)?,
        check_predicate(&triple.predicate)?,
        check_object(&triple.object)?,
    ))
}

/// Check every bound field of a pattern; wildcards pass through
pub fn check_pattern(pattern: &TermPattern) -> Result<TriplePattern, TermTypeError> {
    Ok(TriplePattern::new(
        pattern.subject.try_map(check_subject)?,
        pattern.predicate.try_map(check_predicate)?,
        pattern.object.try_map(check_object)?,
    ))
}

/// Check an optional context; `None` means "every context"
pub fn check_optional_context(
    context: Option<&RdfTerm>,
) -> Result<Option<ContextId>, ContextTypeError> {
    context.map(check_context).transpose()
}
