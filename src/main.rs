use anyhow::Result;
use samyama_traversal::{ElementKind, GraphConfig, GraphStore};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    println!("Samyama Traversal v{}", samyama_traversal::version());
    println!("==========================================");
    println!();

    let mut store = GraphStore::open(GraphConfig::default().with_vertex_index("name"));

    let marko = store.add_vertex("person", vec![("name", "marko".into()), ("age", 29.into())]);
    let lop = store.add_vertex(
        "software",
        vec![("name", "lop".into()), ("lang", "java".into()), ("height", 173.into())],
    );
    let jay = store.add_vertex(
        "software",
        vec![("name", "jay".into()), ("lang", "python".into()), ("height", 160.into())],
    );
    store.add_edge(&marko, "created", &lop, vec![("weight", 0.6.into())])?;
    store.add_edge(&marko, "created", &jay, vec![("weight", 0.7.into())])?;
    println!(
        "✓ Loaded {} vertices and {} edges",
        store.vertex_count(),
        store.edge_count()
    );

    // g.V().has("name", "marko").out("created").values("height").limit(10)
    let traversal = store
        .traversal()
        .v()
        .has("name", "marko")
        .out(&["created"])
        .values("height")
        .limit(10)
        .apply_strategies();
    println!("Plan: {}", traversal);

    let heights = traversal.to_list()?;
    println!("Result: {}", serde_json::to_string(&heights)?);

    println!("Stats: {}", serde_json::to_string(&store.stats())?);
    println!(
        "Indexed vertex keys: {:?}",
        store.indexed_keys(ElementKind::Vertex)
    );
    Ok(())
}
