//! RDF type definitions
//!
//! Wrapper types around the oxrdf primitives, plus the position-typed
//! views (subject, predicate, object, context) the store works with.

use oxrdf::{BlankNode as OxBlankNode, Literal as OxLiteral, NamedNode as OxNamedNode};
use std::fmt;
use thiserror::Error;

/// RDF errors
#[derive(Error, Debug)]
pub enum RdfError {
    /// Invalid IRI
    #[error("Invalid IRI: {0}")]
    InvalidIri(String),

    /// Invalid blank node
    #[error("Invalid blank node: {0}")]
    InvalidBlankNode(String),

    /// Invalid literal
    #[error("Invalid literal: {0}")]
    InvalidLiteral(String),
}

pub type RdfResult<T> = Result<T, RdfError>;

/// Named node (IRI)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedNode(OxNamedNode);

impl NamedNode {
    /// Create a new named node from an IRI string
    pub fn new(iri: &str) -> RdfResult<Self> {
        OxNamedNode::new(iri)
            .map(Self)
            .map_err(|e| RdfError::InvalidIri(format!("{iri}: {e}")))
    }

    /// Create a named node without validating the IRI.
    ///
    /// Only for IRIs known to be valid, such as vocabulary constants.
    pub fn new_unchecked(iri: impl Into<String>) -> Self {
        Self(OxNamedNode::new_unchecked(iri))
    }

    /// Get the IRI string
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for NamedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.as_str())
    }
}

/// Blank node (anonymous node)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlankNode(OxBlankNode);

impl BlankNode {
    /// Create a new blank node with a unique identifier
    pub fn new() -> Self {
        Self(OxBlankNode::default())
    }

    /// Create a blank node from a string identifier
    pub fn from_str(s: &str) -> RdfResult<Self> {
        OxBlankNode::new(s)
            .map(Self)
            .map_err(|e| RdfError::InvalidBlankNode(e.to_string()))
    }

    /// Get the blank node identifier
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for BlankNode {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.as_str())
    }
}

/// RDF literal value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal(OxLiteral);

impl Literal {
    /// Create a simple literal (plain string)
    pub fn new_simple_literal(value: impl Into<String>) -> Self {
        Self(OxLiteral::new_simple_literal(value))
    }

    /// Create a literal with language tag
    pub fn new_language_tagged_literal(
        value: impl Into<String>,
        language: impl Into<String>,
    ) -> RdfResult<Self> {
        OxLiteral::new_language_tagged_literal(value, language)
            .map(Self)
            .map_err(|e| RdfError::InvalidLiteral(e.to_string()))
    }

    /// Create a typed literal
    pub fn new_typed_literal(value: impl Into<String>, datatype: NamedNode) -> Self {
        Self(OxLiteral::new_typed_literal(value, datatype.0))
    }

    /// Get the lexical value
    pub fn value(&self) -> &str {
        self.0.value()
    }

    /// Get the language tag if present
    pub fn language(&self) -> Option<&str> {
        self.0.language()
    }

    /// Get the datatype
    pub fn datatype(&self) -> NamedNode {
        NamedNode(self.0.datatype().into_owned())
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(lang) = self.language() {
            write!(f, "\"{}\"@{}", self.value(), lang)
        } else {
            write!(f, "\"{}\"^^{}", self.value(), self.datatype())
        }
    }
}

/// Variant tag of an [`RdfTerm`], carried by validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermKind {
    NamedNode,
    BlankNode,
    Literal,
}

impl fmt::Display for TermKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TermKind::NamedNode => "NamedNode",
            TermKind::BlankNode => "BlankNode",
            TermKind::Literal => "Literal",
        };
        f.write_str(name)
    }
}

/// RDF term (any RDF value)
///
/// This is the untyped form callers hand to the store; the checks in
/// [`crate::rdf::check`] narrow it to the position it occupies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RdfTerm {
    /// Named node (IRI)
    NamedNode(NamedNode),
    /// Blank node
    BlankNode(BlankNode),
    /// Literal value
    Literal(Literal),
}

impl RdfTerm {
    /// Variant tag of this term
    pub fn kind(&self) -> TermKind {
        match self {
            RdfTerm::NamedNode(_) => TermKind::NamedNode,
            RdfTerm::BlankNode(_) => TermKind::BlankNode,
            RdfTerm::Literal(_) => TermKind::Literal,
        }
    }
}

impl fmt::Display for RdfTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RdfTerm::NamedNode(n) => write!(f, "{}", n),
            RdfTerm::BlankNode(b) => write!(f, "{}", b),
            RdfTerm::Literal(l) => write!(f, "{}", l),
        }
    }
}

impl From<NamedNode> for RdfTerm {
    fn from(node: NamedNode) -> Self {
        RdfTerm::NamedNode(node)
    }
}

impl From<BlankNode> for RdfTerm {
    fn from(node: BlankNode) -> Self {
        RdfTerm::BlankNode(node)
    }
}

impl From<Literal> for RdfTerm {
    fn from(lit: Literal) -> Self {
        RdfTerm::Literal(lit)
    }
}

/// RDF subject (NamedNode or BlankNode)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RdfSubject {
    /// Named node (IRI)
    NamedNode(NamedNode),
    /// Blank node
    BlankNode(BlankNode),
}

impl fmt::Display for RdfSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RdfSubject::NamedNode(n) => write!(f, "{}", n),
            RdfSubject::BlankNode(b) => write!(f, "{}", b),
        }
    }
}

impl From<NamedNode> for RdfSubject {
    fn from(node: NamedNode) -> Self {
        RdfSubject::NamedNode(node)
    }
}

impl From<BlankNode> for RdfSubject {
    fn from(node: BlankNode) -> Self {
        RdfSubject::BlankNode(node)
    }
}

impl From<RdfSubject> for RdfTerm {
    fn from(subject: RdfSubject) -> Self {
        match subject {
            RdfSubject::NamedNode(n) => RdfTerm::NamedNode(n),
            RdfSubject::BlankNode(b) => RdfTerm::BlankNode(b),
        }
    }
}

/// RDF predicate (always a NamedNode)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RdfPredicate(NamedNode);

impl RdfPredicate {
    /// Create a new predicate from an IRI
    pub fn new(iri: &str) -> RdfResult<Self> {
        Ok(Self(NamedNode::new(iri)?))
    }

    /// Get the underlying named node
    pub fn as_named_node(&self) -> &NamedNode {
        &self.0
    }
}

impl fmt::Display for RdfPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<NamedNode> for RdfPredicate {
    fn from(node: NamedNode) -> Self {
        RdfPredicate(node)
    }
}

impl From<RdfPredicate> for NamedNode {
    fn from(pred: RdfPredicate) -> Self {
        pred.0
    }
}

impl From<RdfPredicate> for RdfTerm {
    fn from(pred: RdfPredicate) -> Self {
        RdfTerm::NamedNode(pred.0)
    }
}

/// RDF object (NamedNode, BlankNode, or Literal)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RdfObject {
    /// Named node (IRI)
    NamedNode(NamedNode),
    /// Blank node
    BlankNode(BlankNode),
    /// Literal value
    Literal(Literal),
}

impl fmt::Display for RdfObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RdfObject::NamedNode(n) => write!(f, "{}", n),
            RdfObject::BlankNode(b) => write!(f, "{}", b),
            RdfObject::Literal(l) => write!(f, "{}", l),
        }
    }
}

impl From<NamedNode> for RdfObject {
    fn from(node: NamedNode) -> Self {
        RdfObject::NamedNode(node)
    }
}

impl From<BlankNode> for RdfObject {
    fn from(node: BlankNode) -> Self {
        RdfObject::BlankNode(node)
    }
}

impl From<Literal> for RdfObject {
    fn from(lit: Literal) -> Self {
        RdfObject::Literal(lit)
    }
}

impl From<RdfSubject> for RdfObject {
    fn from(subject: RdfSubject) -> Self {
        match subject {
            RdfSubject::NamedNode(n) => RdfObject::NamedNode(n),
            RdfSubject::BlankNode(b) => RdfObject::BlankNode(b),
        }
    }
}

impl From<RdfObject> for RdfTerm {
    fn from(object: RdfObject) -> Self {
        match object {
            RdfObject::NamedNode(n) => RdfTerm::NamedNode(n),
            RdfObject::BlankNode(b) => RdfTerm::BlankNode(b),
            RdfObject::Literal(l) => RdfTerm::Literal(l),
        }
    }
}

/// Context identifier: the name of one partition of the quad space.
///
/// Same shape as a subject; a literal can never name a context.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContextId {
    /// Named node (IRI)
    NamedNode(NamedNode),
    /// Blank node
    BlankNode(BlankNode),
}

impl ContextId {
    /// Mint a fresh, globally unique blank-node identifier
    pub fn fresh() -> Self {
        ContextId::BlankNode(BlankNode::new())
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextId::NamedNode(n) => write!(f, "{}", n),
            ContextId::BlankNode(b) => write!(f, "{}", b),
        }
    }
}

impl From<NamedNode> for ContextId {
    fn from(node: NamedNode) -> Self {
        ContextId::NamedNode(node)
    }
}

impl From<BlankNode> for ContextId {
    fn from(node: BlankNode) -> Self {
        ContextId::BlankNode(node)
    }
}

impl From<RdfSubject> for ContextId {
    fn from(subject: RdfSubject) -> Self {
        match subject {
            RdfSubject::NamedNode(n) => ContextId::NamedNode(n),
            RdfSubject::BlankNode(b) => ContextId::BlankNode(b),
        }
    }
}

impl From<ContextId> for RdfSubject {
    fn from(id: ContextId) -> Self {
        match id {
            ContextId::NamedNode(n) => RdfSubject::NamedNode(n),
            ContextId::BlankNode(b) => RdfSubject::BlankNode(b),
        }
    }
}

impl From<ContextId> for RdfTerm {
    fn from(id: ContextId) -> Self {
        RdfSubject::from(id).into()
    }
}

/// RDF triple (subject-predicate-object)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    /// Subject
    pub subject: RdfSubject,
    /// Predicate
    pub predicate: RdfPredicate,
    /// Object
    pub object: RdfObject,
}

impl Triple {
    /// Create a new triple
    pub fn new(subject: RdfSubject, predicate: RdfPredicate, object: RdfObject) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

/// RDF quad (triple + owning context), the backend's storage unit
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quad {
    /// Subject
    pub subject: RdfSubject,
    /// Predicate
    pub predicate: RdfPredicate,
    /// Object
    pub object: RdfObject,
    /// Owning context
    pub context: ContextId,
}

impl Quad {
    /// Create a quad from a triple and its context
    pub fn from_triple(triple: Triple, context: ContextId) -> Self {
        Self {
            subject: triple.subject,
            predicate: triple.predicate,
            object: triple.object,
            context,
        }
    }

    /// Get the triple part (without context)
    pub fn as_triple(&self) -> Triple {
        Triple {
            subject: self.subject.clone(),
            predicate: self.predicate.clone(),
            object: self.object.clone(),
        }
    }

    /// Split into triple and context
    pub fn into_parts(self) -> (Triple, ContextId) {
        (
            Triple::new(self.subject, self.predicate, self.object),
            self.context,
        )
    }
}

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} .",
            self.subject, self.predicate, self.object, self.context
        )
    }
}

/// One field of a pattern: either a wildcard or a concrete value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Slot<T> {
    /// Match any term
    #[default]
    Any,
    /// Match exactly this term
    Bound(T),
}

impl<T> Slot<T> {
    /// Whether `value` satisfies this slot
    pub fn matches(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        match self {
            Slot::Any => true,
            Slot::Bound(bound) => bound == value,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Slot::Any)
    }

    /// Apply a fallible conversion to the bound value, keeping wildcards
    pub fn try_map<U, E>(&self, f: impl FnOnce(&T) -> Result<U, E>) -> Result<Slot<U>, E> {
        match self {
            Slot::Any => Ok(Slot::Any),
            Slot::Bound(bound) => f(bound).map(Slot::Bound),
        }
    }
}

impl<T> From<T> for Slot<T> {
    fn from(value: T) -> Self {
        Slot::Bound(value)
    }
}

/// Typed triple pattern, as the backend sees it
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TriplePattern {
    pub subject: Slot<RdfSubject>,
    pub predicate: Slot<RdfPredicate>,
    pub object: Slot<RdfObject>,
}

impl TriplePattern {
    /// Create a new triple pattern
    pub fn new(
        subject: Slot<RdfSubject>,
        predicate: Slot<RdfPredicate>,
        object: Slot<RdfObject>,
    ) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// The all-wildcard pattern
    pub fn any() -> Self {
        Self::default()
    }

    /// Check if a triple matches this pattern
    pub fn matches(&self, triple: &Triple) -> bool {
        self.subject.matches(&triple.subject)
            && self.predicate.matches(&triple.predicate)
            && self.object.matches(&triple.object)
    }
}

impl From<&Triple> for TriplePattern {
    fn from(triple: &Triple) -> Self {
        Self {
            subject: Slot::Bound(triple.subject.clone()),
            predicate: Slot::Bound(triple.predicate.clone()),
            object: Slot::Bound(triple.object.clone()),
        }
    }
}

/// Triple of untyped terms, validated by the store before use
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TermTriple {
    pub subject: RdfTerm,
    pub predicate: RdfTerm,
    pub object: RdfTerm,
}

impl TermTriple {
    pub fn new(
        subject: impl Into<RdfTerm>,
        predicate: impl Into<RdfTerm>,
        object: impl Into<RdfTerm>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

impl From<Triple> for TermTriple {
    fn from(triple: Triple) -> Self {
        Self {
            subject: triple.subject.into(),
            predicate: triple.predicate.into(),
            object: triple.object.into(),
        }
    }
}

/// Pattern of untyped terms, validated by the store before use
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TermPattern {
    pub subject: Slot<RdfTerm>,
    pub predicate: Slot<RdfTerm>,
    pub object: Slot<RdfTerm>,
}

impl TermPattern {
    pub fn new(subject: Slot<RdfTerm>, predicate: Slot<RdfTerm>, object: Slot<RdfTerm>) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// The all-wildcard pattern
    pub fn any() -> Self {
        Self::default()
    }
}

impl From<&TermTriple> for TermPattern {
    fn from(triple: &TermTriple) -> Self {
        Self {
            subject: Slot::Bound(triple.subject.clone()),
            predicate: Slot::Bound(triple.predicate.clone()),
            object: Slot::Bound(triple.object.clone()),
        }
    }
}

impl From<TriplePattern> for TermPattern {
    fn from(pattern: TriplePattern) -> Self {
        let TriplePattern {
            subject,
            predicate,
            object,
        } = pattern;
        Self {
            subject: match subject {
                Slot::Any => Slot::Any,
                Slot::Bound(s) => Slot::Bound(s.into()),
            },
            predicate: match predicate {
                Slot::Any => Slot::Any,
                Slot::Bound(p) => Slot::Bound(p.into()),
            },
            object: match object {
                Slot::Any => Slot::Any,
                Slot::Bound(o) => Slot::Bound(o.into()),
            },
        }
    }
}
