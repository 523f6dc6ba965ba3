//! Quad storage backends
//!
//! A backend stores (subject, predicate, object, context) quads and
//! answers single-pattern queries over one context or all of them. It is
//! the only place contexts exist: views and adapters built on top never
//! cache anything.
//!
//! Query results are lazy iterators that borrow the backend, so the
//! borrow checker rejects mutating a backend while one of its iterators
//! is still alive. Calling a query method again restarts it.

pub mod memory;
pub mod rocks;

pub use memory::MemoryBackend;
pub use rocks::RocksBackend;

use crate::rdf::{ContextId, Triple, TriplePattern};
use std::path::Path;
use thiserror::Error;

/// Backend errors
#[derive(Error, Debug)]
pub enum BackendError {
    /// RocksDB error
    #[error("RocksDB error: {0}")]
    RocksDb(#[from] rocksdb::Error),

    /// Key encoding error
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Column family error
    #[error("Column family error: {0}")]
    ColumnFamily(String),

    /// Stored data could not be decoded into a quad
    #[error("Corrupt quad: {0}")]
    Corrupt(String),

    /// Storage has not been attached with `open`
    #[error("Backend is not open")]
    NotOpen,

    /// The backend does not provide this operation
    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Lazy sequence of triples borrowed from a backend
pub type TripleIter<'a> = Box<dyn Iterator<Item = BackendResult<Triple>> + 'a>;

/// Lazy sequence of context identifiers borrowed from a backend
pub type ContextIter<'a> = Box<dyn Iterator<Item = BackendResult<ContextId>> + 'a>;

/// Quad-capable storage engine
pub trait QuadBackend {
    /// Attach persistent storage at `path`
    fn open(&mut self, path: &Path) -> BackendResult<()>;

    /// Flush and detach persistent storage, if any
    fn close(&mut self) -> BackendResult<()> {
        Ok(())
    }

    /// Insert one quad; inserting an existing quad is a no-op
    fn add(&mut self, triple: &Triple, context: &ContextId) -> BackendResult<()>;

    /// Delete every quad matching `pattern`, in `context` or in all contexts
    fn remove(&mut self, pattern: &TriplePattern, context: Option<&ContextId>)
        -> BackendResult<()>;

    /// Triples matching `pattern` in `context`, or in all contexts.
    ///
    /// Without a context each distinct triple is yielded once even when
    /// several contexts hold it.
    fn triples(
        &self,
        pattern: &TriplePattern,
        context: Option<&ContextId>,
    ) -> BackendResult<TripleIter<'_>>;

    /// Contexts holding at least one quad matching `pattern`, or every
    /// non-empty context when no pattern is given.
    ///
    /// Cost depends on which fields the pattern binds and is not bounded
    /// by the number of contexts: with no predicate bound a backend may
    /// walk every quad in the store.
    fn contexts(&self, pattern: Option<&TriplePattern>) -> BackendResult<ContextIter<'_>>;

    /// Delete every quad in `context`
    fn remove_context(&mut self, context: &ContextId) -> BackendResult<()>;
}

impl<B: QuadBackend + ?Sized> QuadBackend for Box<B> {
    fn open(&mut self, path: &Path) -> BackendResult<()> {
        (**self).open(path)
    }

    fn close(&mut self) -> BackendResult<()> {
        (**self).close()
    }

    fn add(&mut self, triple: &Triple, context: &ContextId) -> BackendResult<()> {
        (**self).add(triple, context)
    }

    fn remove(
        &mut self,
        pattern: &TriplePattern,
        context: Option<&ContextId>,
    ) -> BackendResult<()> {
        (**self).remove(pattern, context)
    }

    fn triples(
        &self,
        pattern: &TriplePattern,
        context: Option<&ContextId>,
    ) -> BackendResult<TripleIter<'_>> {
        (**self).triples(pattern, context)
    }

    fn contexts(&self, pattern: Option<&TriplePattern>) -> BackendResult<ContextIter<'_>> {
        (**self).contexts(pattern)
    }

    fn remove_context(&mut self, context: &ContextId) -> BackendResult<()> {
        (**self).remove_context(context)
    }
}
