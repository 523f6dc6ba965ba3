//! Context-backend adapter
//!
//! Binds a backend to one context identifier and forwards triple-level
//! calls as quad-level calls with that identifier filled in. It holds no
//! state beyond the binding and performs no validation.

use crate::backend::{BackendResult, QuadBackend, TripleIter};
use crate::rdf::{ContextId, Triple, TriplePattern};

pub struct ContextBackend<'a, B: QuadBackend + ?Sized> {
    backend: &'a mut B,
    identifier: ContextId,
}

impl<'a, B: QuadBackend + ?Sized> ContextBackend<'a, B> {
    pub fn new(backend: &'a mut B, identifier: ContextId) -> Self {
        Self {
            backend,
            identifier,
        }
    }

    pub fn identifier(&self) -> &ContextId {
        &self.identifier
    }

    pub fn add(&mut self, triple: &Triple) -> BackendResult<()> {
        self.backend.add(triple, &self.identifier)
    }

    pub fn remove(&mut self, pattern: &TriplePattern) -> BackendResult<()> {
        self.backend.remove(pattern, Some(&self.identifier))
    }

    pub fn triples(&self, pattern: &TriplePattern) -> BackendResult<TripleIter<'_>> {
        self.backend.triples(pattern, Some(&self.identifier))
    }

    /// Number of triples in the context.
    ///
    /// Walks the whole context on every call: O(size of context), never
    /// cached.
    pub fn count(&self) -> BackendResult<usize> {
        let mut count = 0;
        for triple in self.triples(&TriplePattern::any())? {
            triple?;
            count += 1;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::rdf::NamedNode;

    fn triple(o: &str) -> Triple {
        let n = |local: &str| NamedNode::new(&format!("http://example.org/{local}")).unwrap();
        Triple::new(n("s").into(), n("p").into(), n(o).into())
    }

    #[test]
    fn test_writes_are_scoped_to_identifier() {
        let mut backend = MemoryBackend::new();
        let g = ContextId::fresh();
        let h = ContextId::fresh();

        ContextBackend::new(&mut backend, g.clone()).add(&triple("a")).unwrap();
        ContextBackend::new(&mut backend, h.clone()).add(&triple("b")).unwrap();

        let adapter = ContextBackend::new(&mut backend, g.clone());
        assert_eq!(adapter.count().unwrap(), 1);
        assert_eq!(adapter.identifier(), &g);
    }

    #[test]
    fn test_two_adapters_observe_same_content() {
        let mut backend = MemoryBackend::new();
        let g = ContextId::fresh();

        ContextBackend::new(&mut backend, g.clone()).add(&triple("a")).unwrap();
        assert_eq!(ContextBackend::new(&mut backend, g.clone()).count().unwrap(), 1);

        ContextBackend::new(&mut backend, g.clone())
            .remove(&TriplePattern::from(&triple("a")))
            .unwrap();
        assert_eq!(ContextBackend::new(&mut backend, g).count().unwrap(), 0);
    }
}
