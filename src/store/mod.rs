//! Information store
//!
//! A context-aware triple store over a [`QuadBackend`]. Every quad lives in
//! exactly one context; documents loaded from a location each get a fresh
//! context tagged with where they came from, and loading the same location
//! again replaces that context instead of adding a second copy.
//!
//! Every entry point checks its terms before touching the backend, so a
//! rejected call leaves the store unchanged.
//!
//! # Example
//!
//! ```rust
//! use infostore::backend::MemoryBackend;
//! use infostore::rdf::{NamedNode, RdfTerm, TermPattern, TermTriple};
//! use infostore::InformationStore;
//!
//! let mut store = InformationStore::new(MemoryBackend::new());
//! let n = |iri: &str| NamedNode::new(iri).unwrap();
//! let graph: RdfTerm = n("http://example.org/g").into();
//!
//! let triple = TermTriple::new(
//!     n("http://example.org/a"),
//!     n("http://example.org/b"),
//!     n("http://example.org/c"),
//! );
//! store.add(&triple, &graph).unwrap();
//!
//! let found = store.triples(&TermPattern::any(), Some(&graph)).unwrap().count();
//! assert_eq!(found, 1);
//! ```

pub mod loader;
pub mod location;

pub use loader::{DocumentLoader, LoadError, LoadResult, RioLoader};
pub use location::LocationError;

use crate::backend::{BackendError, BackendResult, MemoryBackend, QuadBackend, RocksBackend};
use crate::config::{BackendKind, ConfigError, StoreConfig};
use crate::context::Context;
use crate::rdf::{
    check_context, check_optional_context, check_pattern, check_triple, vocab, ContextId,
    ContextTypeError, NamedNode, RdfError, RdfFormat, RdfObject, RdfSerializer, RdfSubject,
    RdfTerm, SerializeError, Slot, TermPattern, TermTriple, TermTypeError, Triple, TriplePattern,
};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Information store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    TermType(#[from] TermTypeError),

    #[error(transparent)]
    ContextType(#[from] ContextTypeError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Location(#[from] LocationError),

    #[error(transparent)]
    Rdf(#[from] RdfError),

    #[error(transparent)]
    Serialize(#[from] SerializeError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Context-aware triple store.
///
/// The store owns its backend for its whole lifetime. Views returned by
/// [`get_context`](Self::get_context) and the iterators returned by
/// queries borrow it, so none of them can outlive the store or overlap a
/// mutation.
pub struct InformationStore<B: QuadBackend = Box<dyn QuadBackend>> {
    backend: B,
    loader: Box<dyn DocumentLoader>,
    base: Option<String>,
}

impl<B: QuadBackend> InformationStore<B> {
    /// Create a store over `backend`, loading documents with [`RioLoader`]
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            loader: Box::new(RioLoader::new()),
            base: None,
        }
    }

    /// Replace the document loader used by [`load`](Self::load)
    pub fn with_loader(mut self, loader: impl DocumentLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    /// Resolve relative load locations against `base` instead of the
    /// working directory
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Attach persistent storage at `path`
    pub fn open(&mut self, path: impl AsRef<Path>) -> StoreResult<()> {
        let path = path.as_ref();
        info!("Opening information store at: {}", path.display());
        self.backend.open(path)?;
        Ok(())
    }

    /// Flush and detach persistent storage
    pub fn close(&mut self) -> StoreResult<()> {
        self.backend.close()?;
        info!("Information store closed");
        Ok(())
    }

    /// View of the context named `identifier`.
    ///
    /// Contexts exist lazily: the view is valid even when nothing has been
    /// written under this identifier yet.
    pub fn get_context(&mut self, identifier: &RdfTerm) -> StoreResult<Context<'_, B>> {
        let id = check_context(identifier)?;
        Ok(Context::new(&mut self.backend, id))
    }

    /// Delete every quad in the context; a no-op for unknown contexts
    pub fn remove_context(&mut self, identifier: &RdfTerm) -> StoreResult<()> {
        let id = check_context(identifier)?;
        self.backend.remove_context(&id)?;
        Ok(())
    }

    /// Load the document at `location` into a fresh context.
    ///
    /// Contexts previously loaded from the same absolute location are
    /// removed first. The new context holds two bookkeeping triples,
    /// `(id, rdf:type, Context)` and `(id, source, location)`, followed by
    /// the document's triples. A failing parse leaves the partial context
    /// in place; its source triple lets the next load of the location
    /// find and replace it.
    pub fn load(&mut self, location: &str, format: RdfFormat) -> StoreResult<ContextId> {
        let location = location::absolutize(location, self.base.as_deref())?;
        let source = NamedNode::new(&location)?;

        let by_source = TriplePattern::new(
            Slot::Any,
            Slot::Bound(vocab::source()),
            Slot::Bound(source.clone().into()),
        );
        let stale = self
            .backend
            .contexts(Some(&by_source))?
            .collect::<BackendResult<Vec<_>>>()?;
        for id in &stale {
            info!("Replacing context {} loaded from {}", id, location);
            self.backend.remove_context(id)?;
        }

        let id = ContextId::fresh();
        let subject = RdfSubject::from(id.clone());
        self.backend.add(
            &Triple::new(subject.clone(), vocab::rdf_type(), vocab::context_class()),
            &id,
        )?;
        self.backend
            .add(&Triple::new(subject, vocab::source(), source.into()), &id)?;

        let mut context = Context::new(&mut self.backend, id.clone());
        context.load_from(self.loader.as_ref(), &location, format)?;

        info!("Loaded {} ({}) into context {}", location, format, id);
        Ok(id)
    }

    /// Add one triple to `context`; there is no default context
    pub fn add(&mut self, triple: &TermTriple, context: &RdfTerm) -> StoreResult<()> {
        let triple = check_triple(triple)?;
        let context = check_context(context)?;
        self.backend.add(&triple, &context)?;
        Ok(())
    }

    /// Remove triples matching `pattern` from `context`, or from every
    /// context. Removing nothing is not an error.
    pub fn remove(&mut self, pattern: &TermPattern, context: Option<&RdfTerm>) -> StoreResult<()> {
        let pattern = check_pattern(pattern)?;
        let context = check_optional_context(context)?;
        self.backend.remove(&pattern, context.as_ref())?;
        Ok(())
    }

    /// Triples matching `pattern` in `context`, or across the whole store
    pub fn triples(
        &self,
        pattern: &TermPattern,
        context: Option<&RdfTerm>,
    ) -> StoreResult<impl Iterator<Item = StoreResult<Triple>> + '_> {
        let pattern = check_pattern(pattern)?;
        let context = check_optional_context(context)?;
        Ok(self
            .backend
            .triples(&pattern, context.as_ref())?
            .map(|t| t.map_err(StoreError::from)))
    }

    /// Contexts holding a triple that matches `pattern`, or every
    /// non-empty context
    pub fn contexts(
        &self,
        pattern: Option<&TermPattern>,
    ) -> StoreResult<impl Iterator<Item = StoreResult<ContextId>> + '_> {
        let pattern = pattern.map(check_pattern).transpose()?;
        Ok(self
            .backend
            .contexts(pattern.as_ref())?
            .map(|c| c.map_err(StoreError::from)))
    }

    /// Subjects of triples with the given predicate and object, across
    /// all contexts
    pub fn subjects(
        &self,
        predicate: Slot<RdfTerm>,
        object: Slot<RdfTerm>,
    ) -> StoreResult<impl Iterator<Item = StoreResult<RdfSubject>> + '_> {
        let pattern = TermPattern::new(Slot::Any, predicate, object);
        Ok(self.triples(&pattern, None)?.map(|t| t.map(|t| t.subject)))
    }

    /// Objects of triples with the given subject and predicate, across
    /// all contexts
    pub fn objects(
        &self,
        subject: Slot<RdfTerm>,
        predicate: Slot<RdfTerm>,
    ) -> StoreResult<impl Iterator<Item = StoreResult<RdfObject>> + '_> {
        let pattern = TermPattern::new(subject, predicate, Slot::Any);
        Ok(self.triples(&pattern, None)?.map(|t| t.map(|t| t.object)))
    }

    pub fn contains(&self, triple: &TermTriple, context: Option<&RdfTerm>) -> StoreResult<bool> {
        let pattern = TermPattern::from(triple);
        match self.triples(&pattern, context)?.next() {
            Some(found) => found.map(|_| true),
            None => Ok(false),
        }
    }

    /// Number of triples in `context`, or of distinct triples in the
    /// store. Walks every match on each call.
    pub fn len(&self, context: Option<&RdfTerm>) -> StoreResult<usize> {
        let mut count = 0;
        for triple in self.triples(&TermPattern::any(), context)? {
            triple?;
            count += 1;
        }
        Ok(count)
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.contexts(None)?.next().is_none())
    }

    /// Write the triples of one context in `format`
    pub fn serialize(&self, context: &RdfTerm, format: RdfFormat) -> StoreResult<String> {
        let context = check_context(context)?;
        let triples = self
            .backend
            .triples(&TriplePattern::any(), Some(&context))?
            .collect::<BackendResult<Vec<_>>>()?;
        Ok(RdfSerializer::serialize(&triples, format)?)
    }
}

impl InformationStore<Box<dyn QuadBackend>> {
    /// Build a store from configuration, opening persistent storage when
    /// the backend needs it
    pub fn from_config(config: &StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        let backend: Box<dyn QuadBackend> = match (config.backend, &config.path) {
            (BackendKind::Memory, _) => Box::new(MemoryBackend::new()),
            (BackendKind::RocksDb, Some(path)) => Box::new(RocksBackend::open_at(path)?),
            (BackendKind::RocksDb, None) => {
                return Err(ConfigError::MissingPath(BackendKind::RocksDb).into())
            }
        };
        info!("Information store backend: {}", config.backend);

        let mut store = InformationStore::new(backend);
        if let Some(base) = &config.base {
            store = store.with_base(base.clone());
        }
        Ok(store)
    }
}
