//! RocksDB quad backend
//!
//! Quads are stored twice, once per column family:
//! - `cspo`: context, subject, predicate, object. Serves every
//!   context-scoped query and whole-context deletion.
//! - `pocs`: predicate, object, context, subject. Serves cross-context
//!   lookups with a bound predicate, such as finding the contexts loaded
//!   from one source.
//!
//! A key is the concatenation of its bincode-encoded terms and the value
//! is empty. Because bincode length-prefixes strings, the encoding of any
//! run of leading terms is a byte prefix of every key that starts with
//! them, so bound leading fields become prefix scans.

use super::{BackendError, BackendResult, ContextIter, QuadBackend, TripleIter};
use crate::rdf::{
    BlankNode, ContextId, Literal, NamedNode, Quad, RdfObject, RdfPredicate, RdfSubject, Slot,
    TriplePattern, Triple,
};
use rocksdb::{
    ColumnFamily, ColumnFamilyDescriptor, Direction, IteratorMode, Options, WriteBatch, DB,
};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CF_CSPO: &str = "cspo";
const CF_POCS: &str = "pocs";

/// Serialized term for key encoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum StoredTerm {
    Named(String),
    Blank(String),
    Literal {
        value: String,
        datatype: String,
        language: Option<String>,
    },
}

impl StoredTerm {
    fn from_subject(subject: &RdfSubject) -> Self {
        match subject {
            RdfSubject::NamedNode(n) => StoredTerm::Named(n.as_str().to_string()),
            RdfSubject::BlankNode(b) => StoredTerm::Blank(b.as_str().to_string()),
        }
    }

    fn from_predicate(predicate: &RdfPredicate) -> Self {
        StoredTerm::Named(predicate.as_named_node().as_str().to_string())
    }

    fn from_object(object: &RdfObject) -> Self {
        match object {
            RdfObject::NamedNode(n) => StoredTerm::Named(n.as_str().to_string()),
            RdfObject::BlankNode(b) => StoredTerm::Blank(b.as_str().to_string()),
            RdfObject::Literal(l) => StoredTerm::Literal {
                value: l.value().to_string(),
                datatype: l.datatype().as_str().to_string(),
                language: l.language().map(str::to_string),
            },
        }
    }

    fn from_context(context: &ContextId) -> Self {
        match context {
            ContextId::NamedNode(n) => StoredTerm::Named(n.as_str().to_string()),
            ContextId::BlankNode(b) => StoredTerm::Blank(b.as_str().to_string()),
        }
    }

    fn into_subject(self) -> BackendResult<RdfSubject> {
        match self {
            StoredTerm::Named(iri) => Ok(RdfSubject::NamedNode(named(&iri)?)),
            StoredTerm::Blank(id) => Ok(RdfSubject::BlankNode(blank(&id)?)),
            StoredTerm::Literal { .. } => Err(BackendError::Corrupt(
                "literal stored as subject".to_string(),
            )),
        }
    }

    fn into_predicate(self) -> BackendResult<RdfPredicate> {
        match self {
            StoredTerm::Named(iri) => Ok(named(&iri)?.into()),
            _ => Err(BackendError::Corrupt(
                "non-IRI stored as predicate".to_string(),
            )),
        }
    }

    fn into_object(self) -> BackendResult<RdfObject> {
        match self {
            StoredTerm::Named(iri) => Ok(RdfObject::NamedNode(named(&iri)?)),
            StoredTerm::Blank(id) => Ok(RdfObject::BlankNode(blank(&id)?)),
            StoredTerm::Literal {
                value,
                datatype,
                language,
            } => {
                let literal = match language {
                    Some(language) => Literal::new_language_tagged_literal(value, language)
                        .map_err(|e| BackendError::Corrupt(e.to_string()))?,
                    None => Literal::new_typed_literal(value, named(&datatype)?),
                };
                Ok(RdfObject::Literal(literal))
            }
        }
    }

    fn into_context(self) -> BackendResult<ContextId> {
        self.into_subject().map(ContextId::from)
    }
}

fn named(iri: &str) -> BackendResult<NamedNode> {
    NamedNode::new(iri).map_err(|e| BackendError::Corrupt(e.to_string()))
}

fn blank(id: &str) -> BackendResult<BlankNode> {
    BlankNode::from_str(id).map_err(|e| BackendError::Corrupt(e.to_string()))
}

fn encode(terms: &[StoredTerm]) -> BackendResult<Vec<u8>> {
    let mut key = Vec::new();
    for term in terms {
        bincode::serialize_into(&mut key, term)?;
    }
    Ok(key)
}

fn decode(key: &[u8]) -> BackendResult<[StoredTerm; 4]> {
    let mut rest = key;
    let mut next = || bincode::deserialize_from::<_, StoredTerm>(&mut rest);
    let terms = [next()?, next()?, next()?, next()?];
    if !rest.is_empty() {
        return Err(BackendError::Corrupt(format!(
            "{} trailing bytes in key",
            rest.len()
        )));
    }
    Ok(terms)
}

fn column_family<'a>(db: &'a DB, name: &str) -> BackendResult<&'a ColumnFamily> {
    db.cf_handle(name)
        .ok_or_else(|| BackendError::ColumnFamily(name.to_string()))
}

/// Index a scan runs over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Index {
    Cspo,
    Pocs,
}

impl Index {
    fn cf_name(self) -> &'static str {
        match self {
            Index::Cspo => CF_CSPO,
            Index::Pocs => CF_POCS,
        }
    }

    fn key(self, quad: &Quad) -> BackendResult<Vec<u8>> {
        let c = StoredTerm::from_context(&quad.context);
        let s = StoredTerm::from_subject(&quad.subject);
        let p = StoredTerm::from_predicate(&quad.predicate);
        let o = StoredTerm::from_object(&quad.object);
        match self {
            Index::Cspo => encode(&[c, s, p, o]),
            Index::Pocs => encode(&[p, o, c, s]),
        }
    }

    fn decode(self, key: &[u8]) -> BackendResult<Quad> {
        let [a, b, c, d] = decode(key)?;
        let (context, subject, predicate, object) = match self {
            Index::Cspo => (a, b, c, d),
            Index::Pocs => (c, d, a, b),
        };
        Ok(Quad {
            subject: subject.into_subject()?,
            predicate: predicate.into_predicate()?,
            object: object.into_object()?,
            context: context.into_context()?,
        })
    }
}

/// Pick the index and the longest key prefix the bound fields allow.
///
/// Without a context or a bound predicate there is no usable prefix and
/// the scan covers all of `cspo`: O(quads in the store).
fn plan(pattern: &TriplePattern, context: Option<&ContextId>) -> (Index, Vec<StoredTerm>) {
    let mut prefix = Vec::new();
    match (context, &pattern.predicate) {
        (Some(context), _) => {
            prefix.push(StoredTerm::from_context(context));
            if let Slot::Bound(s) = &pattern.subject {
                prefix.push(StoredTerm::from_subject(s));
                if let Slot::Bound(p) = &pattern.predicate {
                    prefix.push(StoredTerm::from_predicate(p));
                    if let Slot::Bound(o) = &pattern.object {
                        prefix.push(StoredTerm::from_object(o));
                    }
                }
            }
            (Index::Cspo, prefix)
        }
        (None, Slot::Bound(p)) => {
            prefix.push(StoredTerm::from_predicate(p));
            if let Slot::Bound(o) = &pattern.object {
                prefix.push(StoredTerm::from_object(o));
            }
            (Index::Pocs, prefix)
        }
        (None, Slot::Any) => (Index::Cspo, prefix),
    }
}

/// RocksDB-based persistent quad backend
///
/// Created detached; [`QuadBackend::open`] attaches the database.
#[derive(Default)]
pub struct RocksBackend {
    db: Option<DB>,
    path: Option<PathBuf>,
}

impl RocksBackend {
    /// Create a backend with no storage attached
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend and attach storage at `path`
    pub fn open_at(path: impl AsRef<Path>) -> BackendResult<Self> {
        let mut backend = Self::new();
        backend.open(path.as_ref())?;
        Ok(backend)
    }

    /// Path of the attached database
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn db(&self) -> BackendResult<&DB> {
        self.db.as_ref().ok_or(BackendError::NotOpen)
    }

    /// Column family options for both quad indexes
    fn index_cf_options() -> Options {
        let mut opts = Options::default();
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        opts
    }

    /// Quads whose key in `index` starts with `prefix` and that match `pattern`
    fn scan<'a>(
        &'a self,
        index: Index,
        prefix: Vec<u8>,
        pattern: TriplePattern,
        context: Option<ContextId>,
    ) -> BackendResult<Box<dyn Iterator<Item = BackendResult<Quad>> + 'a>> {
        let db = self.db()?;
        let cf = column_family(db, index.cf_name())?;
        let iter = db.iterator_cf(&cf, IteratorMode::From(prefix.as_slice(), Direction::Forward));

        let scoped = iter
            .map(|item| item.map_err(BackendError::from))
            .take_while(move |item| match item {
                Ok((key, _)) => key.starts_with(&prefix),
                Err(_) => true,
            })
            .map(move |item| item.and_then(|(key, _)| index.decode(&key)))
            .filter(move |item| match item {
                Ok(quad) => {
                    pattern.subject.matches(&quad.subject)
                        && pattern.predicate.matches(&quad.predicate)
                        && pattern.object.matches(&quad.object)
                        && context.as_ref().map_or(true, |c| c == &quad.context)
                }
                Err(_) => true,
            });
        Ok(Box::new(scoped))
    }

    fn quads(
        &self,
        pattern: &TriplePattern,
        context: Option<&ContextId>,
    ) -> BackendResult<Box<dyn Iterator<Item = BackendResult<Quad>> + '_>> {
        let (index, prefix) = plan(pattern, context);
        let prefix = encode(&prefix)?;
        self.scan(index, prefix, pattern.clone(), context.cloned())
    }

    /// Delete every quad yielded by `quads` from both indexes in one batch
    fn delete_all(
        &self,
        quads: impl Iterator<Item = BackendResult<Quad>>,
    ) -> BackendResult<usize> {
        let db = self.db()?;
        let cspo = column_family(db, CF_CSPO)?;
        let pocs = column_family(db, CF_POCS)?;

        let mut batch = WriteBatch::default();
        let mut count = 0;
        for quad in quads {
            let quad = quad?;
            batch.delete_cf(&cspo, Index::Cspo.key(&quad)?);
            batch.delete_cf(&pocs, Index::Pocs.key(&quad)?);
            count += 1;
        }
        db.write(batch)?;
        Ok(count)
    }
}

impl QuadBackend for RocksBackend {
    fn open(&mut self, path: &Path) -> BackendResult<()> {
        info!("Opening quad storage at: {}", path.display());

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_write_buffer_size(64 * 1024 * 1024); // 64 MB
        opts.set_max_write_buffer_number(3);
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        opts.set_wal_recovery_mode(rocksdb::DBRecoveryMode::PointInTime);

        let cf_descriptors = vec![
            ColumnFamilyDescriptor::new("default", Options::default()),
            ColumnFamilyDescriptor::new(CF_CSPO, Self::index_cf_options()),
            ColumnFamilyDescriptor::new(CF_POCS, Self::index_cf_options()),
        ];

        let db = DB::open_cf_descriptors(&opts, path, cf_descriptors)?;
        self.db = Some(db);
        self.path = Some(path.to_path_buf());

        info!("Quad storage opened successfully");
        Ok(())
    }

    fn close(&mut self) -> BackendResult<()> {
        if let Some(db) = self.db.take() {
            db.flush()?;
            info!("Closed quad storage at: {:?}", self.path);
        }
        self.path = None;
        Ok(())
    }

    fn add(&mut self, triple: &Triple, context: &ContextId) -> BackendResult<()> {
        let db = self.db()?;
        let cspo = column_family(db, CF_CSPO)?;
        let pocs = column_family(db, CF_POCS)?;

        let quad = Quad::from_triple(triple.clone(), context.clone());
        let mut batch = WriteBatch::default();
        batch.put_cf(&cspo, Index::Cspo.key(&quad)?, b"");
        batch.put_cf(&pocs, Index::Pocs.key(&quad)?, b"");
        db.write(batch)?;

        debug!("Stored {}", quad);
        Ok(())
    }

    fn remove(
        &mut self,
        pattern: &TriplePattern,
        context: Option<&ContextId>,
    ) -> BackendResult<()> {
        // Keys are collected before the batch is written
        let doomed: Vec<BackendResult<Quad>> = self.quads(pattern, context)?.collect();
        let count = self.delete_all(doomed.into_iter())?;
        debug!("Removed {} quads", count);
        Ok(())
    }

    fn triples(
        &self,
        pattern: &TriplePattern,
        context: Option<&ContextId>,
    ) -> BackendResult<TripleIter<'_>> {
        let quads = self.quads(pattern, context)?;
        if context.is_some() {
            return Ok(Box::new(quads.map(|quad| quad.map(|q| q.into_parts().0))));
        }
        let mut seen = FxHashSet::default();
        Ok(Box::new(
            quads
                .map(|quad| quad.map(|q| q.into_parts().0))
                .filter(move |triple| match triple {
                    Ok(triple) => seen.insert(triple.clone()),
                    Err(_) => true,
                }),
        ))
    }

    fn contexts(&self, pattern: Option<&TriplePattern>) -> BackendResult<ContextIter<'_>> {
        let pattern = pattern.cloned().unwrap_or_default();
        let mut seen = FxHashSet::default();
        Ok(Box::new(
            self.quads(&pattern, None)?
                .map(|quad| quad.map(|q| q.context))
                .filter(move |context| match context {
                    Ok(context) => seen.insert(context.clone()),
                    Err(_) => true,
                }),
        ))
    }

    fn remove_context(&mut self, context: &ContextId) -> BackendResult<()> {
        let doomed: Vec<BackendResult<Quad>> =
            self.quads(&TriplePattern::any(), Some(context))?.collect();
        let count = self.delete_all(doomed.into_iter())?;
        if count > 0 {
            debug!("Removed context {} ({} quads)", context, count);
        }
        Ok(())
    }
}

impl Drop for RocksBackend {
    fn drop(&mut self) {
        if let Some(db) = &self.db {
            let _ = db.flush();
        }
    }
}
