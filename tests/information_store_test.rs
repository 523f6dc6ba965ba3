use infostore::context::TripleSink;
use infostore::rdf::{
    check_context, check_object, check_predicate, check_subject, check_triple, vocab, BlankNode,
    ContextId, Literal, NamedNode, RdfFormat, RdfParser, RdfTerm, Slot, TermPattern, TermTriple,
    Triple,
};
use infostore::store::location::directory_iri;
use infostore::{
    DocumentLoader, InformationStore, LoadError, LoadResult, MemoryBackend, StoreError,
    StoreResult,
};
use rustc_hash::FxHashMap;
use std::collections::HashSet;
use std::io::Cursor;
use tempfile::TempDir;

const DOC_RDF: &str = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:ex="http://ex.org/">
  <rdf:Description rdf:about="http://ex.org/a">
    <ex:b rdf:resource="http://ex.org/c"/>
  </rdf:Description>
</rdf:RDF>
"#;

/// Serves documents from memory instead of the network
#[derive(Default)]
struct StubLoader {
    documents: FxHashMap<String, String>,
}

impl StubLoader {
    fn with(mut self, location: &str, body: &str) -> Self {
        self.documents.insert(location.to_string(), body.to_string());
        self
    }
}

impl DocumentLoader for StubLoader {
    fn load(
        &self,
        location: &str,
        format: RdfFormat,
        sink: &mut dyn TripleSink,
    ) -> LoadResult<()> {
        let body = self
            .documents
            .get(location)
            .ok_or_else(|| LoadError::InvalidLocation(location.to_string()))?;
        RdfParser::parse_reader(Cursor::new(body), format, Some(location), &mut |t: Triple| {
            sink.add(t).map_err(LoadError::from)
        })
    }
}

fn iri(value: &str) -> NamedNode {
    NamedNode::new(value).unwrap()
}

fn ex(local: &str) -> NamedNode {
    iri(&format!("http://ex.org/{local}"))
}

fn collect(store: &InformationStore<MemoryBackend>, context: &ContextId) -> HashSet<Triple> {
    store
        .triples(&TermPattern::any(), Some(&context.clone().into()))
        .unwrap()
        .collect::<StoreResult<_>>()
        .unwrap()
}

fn contexts(store: &InformationStore<MemoryBackend>) -> Vec<ContextId> {
    store
        .contexts(None)
        .unwrap()
        .collect::<StoreResult<_>>()
        .unwrap()
}

#[test]
fn test_position_checks() {
    let literal: RdfTerm = Literal::new_simple_literal("hello").into();
    let typed: RdfTerm = Literal::new_typed_literal(
        "42",
        iri("http://www.w3.org/2001/XMLSchema#integer"),
    )
    .into();
    for l in [&literal, &typed] {
        assert!(check_subject(l).is_err());
        assert!(check_predicate(l).is_err());
        assert!(check_context(l).is_err());
        assert!(check_object(l).is_ok());
    }

    let u: RdfTerm = ex("u").into();
    assert!(check_subject(&u).is_ok());
    assert!(check_predicate(&u).is_ok());
    assert!(check_context(&u).is_ok());

    let b: RdfTerm = BlankNode::new().into();
    assert!(check_subject(&b).is_ok());
    assert!(check_context(&b).is_ok());
    assert!(check_predicate(&b).is_err());
}

#[test]
fn test_load_scenario() {
    let location = "http://ex.org/doc.rdf";
    let loader = StubLoader::default().with(location, DOC_RDF);
    let mut store = InformationStore::new(MemoryBackend::new()).with_loader(loader);

    let format: RdfFormat = "xml".parse().unwrap();
    let first = store.load(location, format).unwrap();

    let subject = RdfTerm::from(first.clone());
    let expected: HashSet<Triple> = [
        TermTriple::new(subject.clone(), iri(vocab::RDF_TYPE), iri(vocab::CONTEXT)),
        TermTriple::new(subject, iri(vocab::SOURCE), iri(location)),
        TermTriple::new(ex("a"), ex("b"), ex("c")),
    ]
    .iter()
    .map(|t| check_triple(t).unwrap())
    .collect();

    assert_eq!(contexts(&store), vec![first.clone()]);
    assert_eq!(collect(&store, &first), expected);

    // Reloading swaps in a new identifier with the same shape
    let second = store.load(location, format).unwrap();
    assert_ne!(first, second);
    assert_eq!(contexts(&store), vec![second.clone()]);
    assert_eq!(collect(&store, &second).len(), 3);
    assert!(collect(&store, &first).is_empty());
}

#[test]
fn test_reload_keeps_one_context_per_source() {
    let loader = StubLoader::default()
        .with("http://ex.org/one.rdf", DOC_RDF)
        .with("http://ex.org/two.rdf", DOC_RDF);
    let mut store = InformationStore::new(MemoryBackend::new()).with_loader(loader);

    for _ in 0..3 {
        store.load("http://ex.org/one.rdf", RdfFormat::RdfXml).unwrap();
        store.load("http://ex.org/two.rdf", RdfFormat::RdfXml).unwrap();
    }

    assert_eq!(contexts(&store).len(), 2);
    for location in ["http://ex.org/one.rdf", "http://ex.org/two.rdf"] {
        let pattern = TermPattern::new(
            Slot::Any,
            Slot::Bound(iri(vocab::SOURCE).into()),
            Slot::Bound(iri(location).into()),
        );
        assert_eq!(store.contexts(Some(&pattern)).unwrap().count(), 1);
    }
}

#[test]
fn test_failed_load_is_replaced_by_next_load() {
    let location = "http://ex.org/doc.rdf";
    let broken = "<http://ex.org/a> <http://ex.org/b> <http://ex.org/c> .\n\
                  <http://ex.org/a> oops .\n";
    let mut store = InformationStore::new(MemoryBackend::new())
        .with_loader(StubLoader::default().with(location, broken));

    let err = store.load(location, RdfFormat::NTriples).unwrap_err();
    assert!(matches!(err, StoreError::Load(LoadError::Parse(_))));
    // The partial context keeps its bookkeeping triples and the parsed prefix
    let partial = contexts(&store);
    assert_eq!(partial.len(), 1);
    assert_eq!(collect(&store, &partial[0]).len(), 3);

    let mut store = InformationStore::new(store.into_backend())
        .with_loader(StubLoader::default().with(location, DOC_RDF));
    let id = store.load(location, RdfFormat::RdfXml).unwrap();
    assert_eq!(contexts(&store), vec![id.clone()]);
    assert_eq!(collect(&store, &id).len(), 3);
}

#[test]
fn test_unknown_location_fails_without_network() {
    let mut store =
        InformationStore::new(MemoryBackend::new()).with_loader(StubLoader::default());
    let err = store
        .load("http://ex.org/missing.rdf", RdfFormat::RdfXml)
        .unwrap_err();
    assert!(matches!(err, StoreError::Load(LoadError::InvalidLocation(_))));
}

#[test]
fn test_remove_context_clears_everything() {
    let mut store = InformationStore::new(MemoryBackend::new())
        .with_loader(StubLoader::default().with("http://ex.org/doc.rdf", DOC_RDF));
    let id = store.load("http://ex.org/doc.rdf", RdfFormat::RdfXml).unwrap();

    store.remove_context(&id.clone().into()).unwrap();
    assert!(collect(&store, &id).is_empty());
    assert!(contexts(&store).is_empty());
}

#[test]
fn test_add_then_query() {
    let mut store = InformationStore::new(MemoryBackend::new());
    let g: RdfTerm = ex("g").into();
    let t = TermTriple::new(ex("s"), ex("p"), Literal::new_simple_literal("o"));

    store.add(&t, &g).unwrap();
    assert_eq!(
        store.triples(&TermPattern::from(&t), Some(&g)).unwrap().count(),
        1
    );
    assert!(store.triples(&TermPattern::from(&t), None).unwrap().count() >= 1);
}

#[test]
fn test_remove_twice_is_idempotent() {
    let mut store = InformationStore::new(MemoryBackend::new());
    let g: RdfTerm = ex("g").into();
    let t = TermTriple::new(ex("s"), ex("p"), ex("o"));
    store.add(&t, &g).unwrap();

    store.remove(&TermPattern::from(&t), Some(&g)).unwrap();
    store.remove(&TermPattern::from(&t), Some(&g)).unwrap();
    assert!(!store.contains(&t, None).unwrap());
}

#[test]
fn test_contexts_track_non_empty_partitions() {
    let mut store = InformationStore::new(MemoryBackend::new());
    let t = TermTriple::new(ex("s"), ex("p"), ex("o"));
    let named: RdfTerm = ex("g").into();
    let blank: RdfTerm = BlankNode::new().into();

    store.add(&t, &named).unwrap();
    store.add(&t, &blank).unwrap();
    let found: HashSet<ContextId> = contexts(&store).into_iter().collect();
    let expected: HashSet<ContextId> = [&named, &blank]
        .into_iter()
        .map(|c| check_context(c).unwrap())
        .collect();
    assert_eq!(found, expected);

    // Draining a context through remove makes it disappear
    store.remove(&TermPattern::any(), Some(&named)).unwrap();
    assert_eq!(contexts(&store), vec![check_context(&blank).unwrap()]);
    // The triple is still visible once across the store
    assert_eq!(store.len(None).unwrap(), 1);
}

#[test]
fn test_load_file_relative_to_base() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("doc.ttl"),
        "@prefix ex: <http://ex.org/> .\nex:a ex:b [ ex:c \"d\" ] .\n",
    )
    .unwrap();

    let mut store =
        InformationStore::new(MemoryBackend::new()).with_base(directory_iri(dir.path()));
    let first = store.load("doc.ttl", RdfFormat::Turtle).unwrap();
    let blank_before: Vec<_> = collect(&store, &first)
        .into_iter()
        .filter(|t| t.predicate.as_named_node() == &ex("c"))
        .map(|t| t.subject)
        .collect();
    assert_eq!(blank_before.len(), 1);
    assert_eq!(collect(&store, &first).len(), 4);

    let second = store.load("doc.ttl", RdfFormat::Turtle).unwrap();
    let blank_after: Vec<_> = collect(&store, &second)
        .into_iter()
        .filter(|t| t.predicate.as_named_node() == &ex("c"))
        .map(|t| t.subject)
        .collect();
    assert_eq!(contexts(&store), vec![second]);
    assert_ne!(blank_before, blank_after);
}

#[test]
fn test_load_relative_location_with_space() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("my doc.nt"),
        "<http://ex.org/a> <http://ex.org/b> <http://ex.org/c> .\n",
    )
    .unwrap();

    let base = directory_iri(dir.path());
    let mut store = InformationStore::new(MemoryBackend::new()).with_base(base.clone());
    let id = store.load("my doc.nt", RdfFormat::NTriples).unwrap();
    assert_eq!(collect(&store, &id).len(), 3);

    let source = TermTriple::new(
        RdfTerm::from(id.clone()),
        iri(vocab::SOURCE),
        iri(&format!("{base}my%20doc.nt")),
    );
    assert!(store.contains(&source, Some(&id.into())).unwrap());

    // Reloading by the same relative name replaces the context
    store.load("my doc.nt", RdfFormat::NTriples).unwrap();
    assert_eq!(contexts(&store).len(), 1);
}
