//! RDF data model for the information store
//!
//! - Terms (named nodes, blank nodes, literals) and their position-typed
//!   forms (subject, predicate, object, context)
//! - Triples, quads and wildcard patterns
//! - Position checks applied before anything reaches a backend
//! - Reserved bookkeeping vocabulary
//! - RDF/XML, Turtle and N-Triples parsing and serialization
//!
//! # Example
//!
//! ```rust
//! use infostore::rdf::{check_subject, Literal, NamedNode, RdfTerm};
//!
//! let alice: RdfTerm = NamedNode::new("http://example.org/alice").unwrap().into();
//! assert!(check_subject(&alice).is_ok());
//!
//! let name: RdfTerm = Literal::new_simple_literal("Alice").into();
//! assert!(check_subject(&name).is_err());
//! ```

mod check;
mod serialization;
mod types;
pub mod vocab;

pub use types::{
    BlankNode, ContextId, Literal, NamedNode, Quad, RdfError, RdfObject, RdfPredicate, RdfResult,
    RdfSubject, RdfTerm, Slot, TermKind, TermPattern, TermTriple, Triple, TriplePattern,
};

pub use check::{
    check_context, check_object, check_optional_context, check_pattern, check_predicate,
    check_subject, check_triple, ContextTypeError, TermPosition, TermTypeError,
};

pub use serialization::{
    ParseError, ParseResult, RdfFormat, RdfParser, RdfSerializer, SerializeError, SerializeResult,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rdf_module_exports() {
        let _pattern: TriplePattern = TriplePattern::any();
        let _format: RdfFormat = RdfFormat::default();
        let _id: ContextId = ContextId::fresh();
    }
}
