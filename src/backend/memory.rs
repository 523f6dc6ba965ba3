//! In-memory quad backend
//!
//! Each context keeps its own triple set with subject, predicate and
//! object indexes, so a pattern with any bound field starts from the
//! matching index bucket instead of a full scan.

use super::{BackendError, BackendResult, ContextIter, QuadBackend, TripleIter};
use crate::rdf::{ContextId, RdfObject, RdfPredicate, RdfSubject, Slot, Triple, TriplePattern};
use indexmap::{IndexMap, IndexSet};
use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};
use std::hash::Hash;
use std::iter;
use std::path::Path;
use tracing::debug;

type TripleSet = IndexSet<Triple, FxBuildHasher>;

/// Triples of one context with per-position indexes
#[derive(Debug, Clone, Default)]
struct ContextGraph {
    triples: TripleSet,
    by_subject: FxHashMap<RdfSubject, FxHashSet<Triple>>,
    by_predicate: FxHashMap<RdfPredicate, FxHashSet<Triple>>,
    by_object: FxHashMap<RdfObject, FxHashSet<Triple>>,
}

impl ContextGraph {
    fn insert(&mut self, triple: &Triple) -> bool {
        if !self.triples.insert(triple.clone()) {
            return false;
        }
        index_insert(&mut self.by_subject, &triple.subject, triple);
        index_insert(&mut self.by_predicate, &triple.predicate, triple);
        index_insert(&mut self.by_object, &triple.object, triple);
        true
    }

    fn remove(&mut self, triple: &Triple) -> bool {
        if !self.triples.swap_remove(triple) {
            return false;
        }
        index_remove(&mut self.by_subject, &triple.subject, triple);
        index_remove(&mut self.by_predicate, &triple.predicate, triple);
        index_remove(&mut self.by_object, &triple.object, triple);
        true
    }

    fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    fn len(&self) -> usize {
        self.triples.len()
    }

    /// Triples matching `pattern`, starting from the most selective index
    fn matching(&self, pattern: TriplePattern) -> Box<dyn Iterator<Item = &Triple> + '_> {
        let candidates: Box<dyn Iterator<Item = &Triple> + '_> =
            match (&pattern.subject, &pattern.predicate, &pattern.object) {
                (Slot::Bound(s), _, _) => bucket(&self.by_subject, s),
                (_, _, Slot::Bound(o)) => bucket(&self.by_object, o),
                (_, Slot::Bound(p), _) => bucket(&self.by_predicate, p),
                _ => Box::new(self.triples.iter()),
            };
        Box::new(candidates.filter(move |t| pattern.matches(t)))
    }
}

fn index_insert<K: Hash + Eq + Clone>(
    index: &mut FxHashMap<K, FxHashSet<Triple>>,
    key: &K,
    triple: &Triple,
) {
    index.entry(key.clone()).or_default().insert(triple.clone());
}

fn index_remove<K: Hash + Eq>(
    index: &mut FxHashMap<K, FxHashSet<Triple>>,
    key: &K,
    triple: &Triple,
) {
    if let Some(set) = index.get_mut(key) {
        set.remove(triple);
        if set.is_empty() {
            index.remove(key);
        }
    }
}

fn bucket<'a, K: Hash + Eq>(
    index: &'a FxHashMap<K, FxHashSet<Triple>>,
    key: &K,
) -> Box<dyn Iterator<Item = &'a Triple> + 'a> {
    match index.get(key) {
        Some(set) => Box::new(set.iter()),
        None => Box::new(iter::empty()),
    }
}

/// Quad backend held entirely in memory
///
/// Contexts are kept in first-write order; a context whose last triple
/// is removed is dropped, so it is indistinguishable from one that never
/// existed.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    graphs: IndexMap<ContextId, ContextGraph, FxBuildHasher>,
}

impl MemoryBackend {
    /// Create a new empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of quads across all contexts
    pub fn quad_count(&self) -> usize {
        self.graphs.values().map(ContextGraph::len).sum()
    }

    /// Number of non-empty contexts
    pub fn context_count(&self) -> usize {
        self.graphs.len()
    }

    fn remove_in(&mut self, context: &ContextId, pattern: &TriplePattern) -> usize {
        let Some(graph) = self.graphs.get_mut(context) else {
            return 0;
        };
        let doomed: Vec<Triple> = graph.matching(pattern.clone()).cloned().collect();
        for triple in &doomed {
            graph.remove(triple);
        }
        if graph.is_empty() {
            self.graphs.shift_remove(context);
        }
        doomed.len()
    }
}

impl QuadBackend for MemoryBackend {
    fn open(&mut self, _path: &Path) -> BackendResult<()> {
        Err(BackendError::Unsupported(
            "the in-memory backend has no persistent storage",
        ))
    }

    fn add(&mut self, triple: &Triple, context: &ContextId) -> BackendResult<()> {
        if self
            .graphs
            .entry(context.clone())
            .or_default()
            .insert(triple)
        {
            debug!("Added {} to {}", triple, context);
        }
        Ok(())
    }

    fn remove(
        &mut self,
        pattern: &TriplePattern,
        context: Option<&ContextId>,
    ) -> BackendResult<()> {
        let removed = match context {
            Some(context) => self.remove_in(context, pattern),
            None => {
                let contexts: Vec<ContextId> = self.graphs.keys().cloned().collect();
                contexts
                    .iter()
                    .map(|context| self.remove_in(context, pattern))
                    .sum::<usize>()
            }
        };
        debug!("Removed {} quads", removed);
        Ok(())
    }

    fn triples(
        &self,
        pattern: &TriplePattern,
        context: Option<&ContextId>,
    ) -> BackendResult<TripleIter<'_>> {
        let pattern = pattern.clone();
        match context {
            Some(context) => match self.graphs.get(context) {
                Some(graph) => Ok(Box::new(graph.matching(pattern).cloned().map(Ok))),
                None => Ok(Box::new(iter::empty())),
            },
            None => {
                let mut seen = FxHashSet::default();
                Ok(Box::new(
                    self.graphs
                        .values()
                        .flat_map(move |graph| graph.matching(pattern.clone()))
                        .filter(move |triple| seen.insert(*triple))
                        .cloned()
                        .map(Ok),
                ))
            }
        }
    }

    fn contexts(&self, pattern: Option<&TriplePattern>) -> BackendResult<ContextIter<'_>> {
        let pattern = pattern.cloned();
        Ok(Box::new(
            self.graphs
                .iter()
                .filter(move |(_, graph)| match &pattern {
                    Some(pattern) => graph.matching(pattern.clone()).next().is_some(),
                    None => true,
                })
                .map(|(context, _)| Ok(context.clone())),
        ))
    }

    fn remove_context(&mut self, context: &ContextId) -> BackendResult<()> {
        if let Some(graph) = self.graphs.shift_remove(context) {
            debug!("Removed context {} ({} quads)", context, graph.len());
        }
        Ok(())
    }
}
