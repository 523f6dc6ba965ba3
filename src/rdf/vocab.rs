//! Reserved vocabulary for context bookkeeping triples

use super::types::{NamedNode, RdfObject, RdfPredicate};

/// Namespace of the bookkeeping vocabulary
pub const INFORMATION_STORE_NS: &str = "http://rdflib.net/2002/InformationStore#";

/// `rdf:type`
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// Class of every context created by `load`
pub const CONTEXT: &str = "http://rdflib.net/2002/InformationStore#Context";

/// Links a loaded context to the absolute location it was read from
pub const SOURCE: &str = "http://rdflib.net/2002/InformationStore#source";

pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

pub fn rdf_type() -> RdfPredicate {
    NamedNode::new_unchecked(RDF_TYPE).into()
}

pub fn context_class() -> RdfObject {
    NamedNode::new_unchecked(CONTEXT).into()
}

pub fn source() -> RdfPredicate {
    NamedNode::new_unchecked(SOURCE).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_iris_are_valid() {
        for iri in [RDF_TYPE, CONTEXT, SOURCE, XSD_STRING] {
            assert!(NamedNode::new(iri).is_ok(), "{iri}");
        }
        assert!(CONTEXT.starts_with(INFORMATION_STORE_NS));
        assert!(SOURCE.starts_with(INFORMATION_STORE_NS));
    }
}
