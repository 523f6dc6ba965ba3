//! Infostore
//!
//! A context-aware RDF information store. Triples live in named
//! partitions (contexts) of a quad backend; each document loaded from a
//! location gets its own context, tagged with its source, and reloading
//! a location replaces its context instead of duplicating it.
//!
//! # Layers
//!
//! - [`rdf`]: terms, triples, patterns, position checks and RDF syntaxes
//! - [`backend`]: quad storage, in memory or on RocksDB
//! - [`context`]: single-context views over a backend
//! - [`store`]: the [`InformationStore`] entry point and document loading
//! - [`config`]: YAML configuration for building a store
//!
//! ## Example Usage
//!
//! ```rust
//! use infostore::backend::MemoryBackend;
//! use infostore::rdf::{check_triple, NamedNode, RdfTerm, TermTriple};
//! use infostore::InformationStore;
//!
//! let mut store = InformationStore::new(MemoryBackend::new());
//! let n = |iri: &str| NamedNode::new(iri).unwrap();
//!
//! // Write through a view of one context
//! let graph: RdfTerm = n("http://example.org/people").into();
//! let knows = TermTriple::new(
//!     n("http://example.org/alice"),
//!     n("http://xmlns.com/foaf/0.1/knows"),
//!     n("http://example.org/bob"),
//! );
//! let mut people = store.get_context(&graph).unwrap();
//! people.add(&check_triple(&knows).unwrap()).unwrap();
//! assert_eq!(people.len().unwrap(), 1);
//!
//! // Drop the whole context at once
//! store.remove_context(&graph).unwrap();
//! assert!(store.is_empty().unwrap());
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod config;
pub mod context;
pub mod rdf;
pub mod store;

// Re-export main types for convenience
pub use backend::{
    BackendError, BackendResult, MemoryBackend, QuadBackend, RocksBackend,
};

pub use config::{BackendKind, ConfigError, ConfigResult, StoreConfig};

pub use context::{Context, ContextBackend, TripleSink};

pub use rdf::{
    BlankNode, ContextId, Literal, NamedNode, RdfFormat, RdfObject, RdfPredicate, RdfSubject,
    RdfTerm, Slot, TermPattern, TermTriple, Triple, TriplePattern,
};

pub use store::{
    DocumentLoader, InformationStore, LoadError, LoadResult, RioLoader, StoreError, StoreResult,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.1.0");
    }
}
