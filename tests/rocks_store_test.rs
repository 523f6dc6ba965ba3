use infostore::rdf::{
    vocab, Literal, NamedNode, RdfFormat, RdfObject, RdfTerm, Slot, TermPattern, TermTriple,
};
use infostore::store::location::{directory_iri, file_iri};
use infostore::{
    BackendError, ContextId, InformationStore, RocksBackend, StoreConfig, StoreError, StoreResult,
};
use tempfile::TempDir;

fn ex(local: &str) -> NamedNode {
    NamedNode::new(&format!("http://ex.org/{local}")).unwrap()
}

fn write_doc(dir: &TempDir, name: &str, body: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, body).unwrap();
    file_iri(&path)
}

#[test]
fn test_operations_before_open_fail() {
    let mut store = InformationStore::new(RocksBackend::new());
    let g: RdfTerm = ex("g").into();
    let t = TermTriple::new(ex("s"), ex("p"), ex("o"));

    let err = store.add(&t, &g).unwrap_err();
    assert!(matches!(err, StoreError::Backend(BackendError::NotOpen)));
}

#[test]
fn test_load_survives_reopen() {
    let data = TempDir::new().unwrap();
    let docs = TempDir::new().unwrap();
    let location = write_doc(
        &docs,
        "people.ttl",
        "@prefix ex: <http://ex.org/> .\nex:alice ex:name \"Alice\"@en ; ex:knows ex:bob .\n",
    );

    let id = {
        let mut store = InformationStore::new(RocksBackend::new());
        store.open(data.path()).unwrap();
        let id = store.load(&location, RdfFormat::Turtle).unwrap();
        store.close().unwrap();
        id
    };

    let mut store = InformationStore::new(RocksBackend::new());
    store.open(data.path()).unwrap();
    let contexts: Vec<ContextId> = store
        .contexts(None)
        .unwrap()
        .collect::<StoreResult<_>>()
        .unwrap();
    assert_eq!(contexts, vec![id.clone()]);
    assert_eq!(store.len(Some(&id.clone().into())).unwrap(), 4);

    let names = store
        .objects(Slot::Bound(ex("alice").into()), Slot::Bound(ex("name").into()))
        .unwrap()
        .collect::<StoreResult<Vec<_>>>()
        .unwrap();
    assert_eq!(
        names,
        vec![RdfObject::from(
            Literal::new_language_tagged_literal("Alice", "en").unwrap()
        )]
    );

    // Reloading after reopen still finds the stored source
    let replaced = store.load(&location, RdfFormat::Turtle).unwrap();
    assert_ne!(replaced, id);
    assert_eq!(store.contexts(None).unwrap().count(), 1);
    assert_eq!(store.len(Some(&id.into())).unwrap(), 0);
}

#[test]
fn test_store_from_config_file() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("store.yaml");
    std::fs::write(
        &config_path,
        format!(
            "backend: rocksdb\npath: {}\nbase: {}\n",
            dir.path().join("db").display(),
            directory_iri(dir.path()),
        ),
    )
    .unwrap();
    let location = write_doc(
        &dir,
        "doc.nt",
        "<http://ex.org/a> <http://ex.org/b> <http://ex.org/c> .\n",
    );

    let config = StoreConfig::from_file(&config_path).unwrap();
    let mut store = InformationStore::from_config(&config).unwrap();
    let id = store.load("doc.nt", RdfFormat::NTriples).unwrap();

    let source: RdfTerm = NamedNode::new(vocab::SOURCE).unwrap().into();
    let pattern = TermPattern::new(Slot::Bound(id.clone().into()), Slot::Bound(source), Slot::Any);
    let located: Vec<_> = store
        .triples(&pattern, Some(&id.into()))
        .unwrap()
        .collect::<StoreResult<_>>()
        .unwrap();
    assert_eq!(located.len(), 1);
    assert_eq!(located[0].object.to_string(), format!("<{location}>"));
}

#[test]
fn test_remove_across_contexts() {
    let data = TempDir::new().unwrap();
    let mut store = InformationStore::new(RocksBackend::open_at(data.path()).unwrap());
    let t = TermTriple::new(ex("s"), ex("p"), ex("o"));
    for g in ["g1", "g2", "g3"] {
        store.add(&t, &ex(g).into()).unwrap();
    }
    assert_eq!(store.len(None).unwrap(), 1);
    assert_eq!(store.contexts(None).unwrap().count(), 3);

    let pattern = TermPattern::new(Slot::Bound(ex("s").into()), Slot::Any, Slot::Any);
    store.remove(&pattern, None).unwrap();
    assert_eq!(store.contexts(None).unwrap().count(), 0);
    assert!(store.is_empty().unwrap());
}
