use anyhow::Result;
use infostore::rdf::{vocab, NamedNode, RdfFormat, RdfTerm, Slot, TermPattern};
use infostore::store::location::file_iri;
use infostore::{InformationStore, MemoryBackend};

const DOCUMENT: &str = r#"
@prefix ex: <http://example.org/> .
@prefix foaf: <http://xmlns.com/foaf/0.1/> .

ex:alice foaf:name "Alice" ;
    foaf:knows ex:bob .
ex:bob foaf:name "Bob" .
"#;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    println!("Infostore v{}", infostore::version());
    println!("==========================================");
    println!();

    let path = std::env::temp_dir().join(format!("infostore-demo-{}.ttl", std::process::id()));
    std::fs::write(&path, DOCUMENT)?;
    let location = file_iri(&path);

    let mut store = InformationStore::new(MemoryBackend::new());

    for round in 1..=2 {
        let id = store.load(&location, RdfFormat::Turtle)?;
        println!("=== Load {round} ===");
        println!("✓ Loaded {location}");
        println!("  context:  {id}");
        println!("  contexts: {}", store.contexts(None)?.count());
        println!("  triples:  {}", store.len(None)?);
        println!();
    }

    println!("=== Contents ===");
    for triple in store.triples(&TermPattern::any(), None)? {
        let triple = triple?;
        println!("  {} {} {} .", triple.subject, triple.predicate, triple.object);
    }
    println!();

    let source: RdfTerm = NamedNode::new(vocab::SOURCE)?.into();
    let loaded_from: RdfTerm = NamedNode::new(&location)?.into();
    let pattern = TermPattern::new(Slot::Any, Slot::Bound(source), Slot::Bound(loaded_from));
    for id in store.contexts(Some(&pattern))? {
        let id = id?;
        println!("=== Context {id} as N-Triples ===");
        print!("{}", store.serialize(&id.into(), RdfFormat::NTriples)?);
    }

    std::fs::remove_file(&path)?;
    Ok(())
}
