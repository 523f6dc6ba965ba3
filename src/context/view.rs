//! Triple-store facade over one context

use super::adapter::ContextBackend;
use crate::backend::{BackendResult, QuadBackend, TripleIter};
use crate::rdf::{
    ContextId, RdfFormat, RdfObject, RdfPredicate, RdfSerializer, RdfSubject, Slot, Triple,
    TriplePattern,
};
use crate::store::loader::{DocumentLoader, LoadResult};
use crate::store::StoreResult;

/// Anything a document loader can pour triples into
pub trait TripleSink {
    fn add(&mut self, triple: Triple) -> BackendResult<()>;
}

/// A context seen as a plain triple store.
///
/// The view borrows the backend and owns only the identifier, so views
/// built from the same backend and identifier always see the same
/// triples. Terms are not validated here; the
/// [`InformationStore`](crate::store::InformationStore) checks them
/// before handing out a view.
pub struct Context<'a, B: QuadBackend + ?Sized> {
    backend: ContextBackend<'a, B>,
}

impl<'a, B: QuadBackend + ?Sized> Context<'a, B> {
    pub fn new(backend: &'a mut B, identifier: ContextId) -> Self {
        Self {
            backend: ContextBackend::new(backend, identifier),
        }
    }

    pub fn identifier(&self) -> &ContextId {
        self.backend.identifier()
    }

    pub fn add(&mut self, triple: &Triple) -> BackendResult<()> {
        self.backend.add(triple)
    }

    /// Remove every triple of this context matching `pattern`
    pub fn remove(&mut self, pattern: &TriplePattern) -> BackendResult<()> {
        self.backend.remove(pattern)
    }

    pub fn triples(&self, pattern: &TriplePattern) -> BackendResult<TripleIter<'_>> {
        self.backend.triples(pattern)
    }

    /// Number of triples; walks the whole context
    pub fn len(&self) -> BackendResult<usize> {
        self.backend.count()
    }

    pub fn is_empty(&self) -> BackendResult<bool> {
        Ok(self.triples(&TriplePattern::any())?.next().is_none())
    }

    pub fn contains(&self, triple: &Triple) -> BackendResult<bool> {
        Ok(self.triples(&TriplePattern::from(triple))?.next().is_some())
    }

    /// Subjects of triples with the given predicate and object
    pub fn subjects(
        &self,
        predicate: Slot<RdfPredicate>,
        object: Slot<RdfObject>,
    ) -> BackendResult<impl Iterator<Item = BackendResult<RdfSubject>> + '_> {
        let pattern = TriplePattern::new(Slot::Any, predicate, object);
        Ok(self.triples(&pattern)?.map(|t| t.map(|t| t.subject)))
    }

    /// Objects of triples with the given subject and predicate
    pub fn objects(
        &self,
        subject: Slot<RdfSubject>,
        predicate: Slot<RdfPredicate>,
    ) -> BackendResult<impl Iterator<Item = BackendResult<RdfObject>> + '_> {
        let pattern = TriplePattern::new(subject, predicate, Slot::Any);
        Ok(self.triples(&pattern)?.map(|t| t.map(|t| t.object)))
    }

    /// Parse `location` with `loader` and add its triples to this context
    pub fn load_from(
        &mut self,
        loader: &dyn DocumentLoader,
        location: &str,
        format: RdfFormat,
    ) -> LoadResult<()> {
        loader.load(location, format, self)
    }

    /// Write this context's triples in `format`
    pub fn serialize(&self, format: RdfFormat) -> StoreResult<String> {
        let triples = self.triples(&TriplePattern::any())?.collect::<BackendResult<Vec<_>>>()?;
        Ok(RdfSerializer::serialize(&triples, format)?)
    }
}

impl<B: QuadBackend + ?Sized> TripleSink for Context<'_, B> {
    fn add(&mut self, triple: Triple) -> BackendResult<()> {
        self.backend.add(&triple)
    }
}

impl TripleSink for Vec<Triple> {
    fn add(&mut self, triple: Triple) -> BackendResult<()> {
        self.push(triple);
        Ok(())
    }
}
