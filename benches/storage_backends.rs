use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use indexgraph::graph::*;
use rand::Rng;
use static_init::dynamic;

#[dynamic]
static VERTEX_SIZE: usize = std::env::var("VERTEX_SIZE")
    .unwrap_or("10000".to_string())
    .parse()
    .unwrap();
#[dynamic]
static EDGE_SIZE: usize = std::env::var("EDGE_SIZE")
    .unwrap_or("100000".to_string())
    .parse()
    .unwrap();

/// The matrix needs quadratic memory, so it is benched on fewer vertices.
const MATRIX_VERTEX_LIMIT: usize = 2000;

criterion_group!(benches, array, linked, hashtable, matrix, csr);
criterion_main!(benches);

fn array(c: &mut Criterion) {
    cases(c, "array", IndexGraphFactory::directed().storage(StorageKind::Array));
}

fn linked(c: &mut Criterion) {
    cases(c, "linked", IndexGraphFactory::directed().storage(StorageKind::Linked));
}

fn hashtable(c: &mut Criterion) {
    cases(
        c,
        "hashtable",
        IndexGraphFactory::directed().storage(StorageKind::Hashtable),
    );
}

fn matrix(c: &mut Criterion) {
    let factory = IndexGraphFactory::directed()
        .allow_parallel_edges(false)
        .storage(StorageKind::Matrix);
    cases(c, "matrix", factory);
}

fn csr(c: &mut Criterion) {
    let vertex_size = *VERTEX_SIZE;
    let edge_size = *EDGE_SIZE;
    let g = random_graph(&IndexGraphFactory::directed(), vertex_size, edge_size).immutable_copy();
    queries(c, "csr", &g);
    c.bench_function("csr/build_immutable", |b| {
        b.iter(|| {
            let mut builder = IndexGraphBuilder::new(true);
            for _ in 0..vertex_size {
                let _ = builder.add_vertex();
            }
            for e in g.iter_edges() {
                let _ = builder.add_edge(e.source, e.target);
            }
            black_box(builder.build_immutable())
        })
    });
}

fn cases(c: &mut Criterion, prefix: &str, factory: IndexGraphFactory) {
    let mut vertex_size = *VERTEX_SIZE;
    if factory.choose_storage().ok() == Some(StorageKind::Matrix) {
        vertex_size = vertex_size.min(MATRIX_VERTEX_LIMIT);
    }
    println!("VERTEX_SIZE: {}", vertex_size);
    let edge_size = *EDGE_SIZE;
    println!("EDGE_SIZE: {}", edge_size);
    c.bench_function(&(prefix.to_string() + "/add_vertex"), |b| {
        b.iter(|| add_vertices(&factory, vertex_size))
    });
    c.bench_function(&(prefix.to_string() + "/add_vertex and add_edge"), |b| {
        b.iter(|| random_graph(&factory, vertex_size, edge_size))
    });

    let g = random_graph(&factory, vertex_size, edge_size);
    queries(c, prefix, &g);
    c.bench_function(&(prefix.to_string() + "/remove_edges"), |b| {
        b.iter_batched(|| g.clone(), remove_edges, BatchSize::LargeInput)
    });
    c.bench_function(&(prefix.to_string() + "/remove_vertices"), |b| {
        b.iter_batched(|| g.clone(), remove_vertices, BatchSize::LargeInput)
    });
}

fn queries(c: &mut Criterion, prefix: &str, g: &IndexGraph) {
    c.bench_function(&(prefix.to_string() + "/iter_vertices"), |b| {
        b.iter(|| iter_vertices(g))
    });
    c.bench_function(&(prefix.to_string() + "/iter_edges"), |b| {
        b.iter(|| iter_edges(g))
    });
    c.bench_function(&(prefix.to_string() + "/out_edges"), |b| {
        b.iter(|| out_edges(g))
    });
    c.bench_function(&(prefix.to_string() + "/edges_connecting"), |b| {
        b.iter(|| edges_connecting(g))
    });
}

fn add_vertices(factory: &IndexGraphFactory, vertex_size: usize) {
    let mut g = factory.new_graph().unwrap();
    for _ in 0..vertex_size {
        let _ = g.add_vertex();
    }
}

/// Random edges; with parallel edges forbidden, repeated pairs are skipped.
fn random_graph(factory: &IndexGraphFactory, vertex_size: usize, edge_size: usize) -> IndexGraph {
    let mut g = factory.new_graph().unwrap();
    let mut vertices = vec![];
    for _ in 0..vertex_size {
        vertices.push(g.add_vertex().unwrap());
    }
    for _ in 0..edge_size {
        let v0 = vertices[rand::thread_rng().gen::<usize>() % vertices.len()];
        let v1 = vertices[rand::thread_rng().gen::<usize>() % vertices.len()];
        let _ = g.add_edge(&v0, &v1);
    }
    g
}

fn iter_vertices(g: &IndexGraph) {
    for x in g.iter_vertices() {
        black_box(x.to_raw());
    }
}

fn iter_edges(g: &IndexGraph) {
    for x in g.iter_edges() {
        black_box(x.id.to_raw());
    }
}

fn out_edges(g: &IndexGraph) {
    let v = VertexId(rand::thread_rng().gen::<usize>() % g.vertex_size());
    for x in g.out_edges(&v).unwrap() {
        black_box(x.target);
    }
}

fn edges_connecting(g: &IndexGraph) {
    let n = g.vertex_size();
    let v0 = VertexId(rand::thread_rng().gen::<usize>() % n);
    let v1 = VertexId(rand::thread_rng().gen::<usize>() % n);
    black_box(g.edges_connecting(&v0, &v1).unwrap().count());
}

fn remove_edges(mut g: IndexGraph) {
    while g.edge_size() > 0 {
        let e = EdgeId(rand::thread_rng().gen::<usize>() % g.edge_size());
        let _ = black_box(g.remove_edge(&e));
    }
}

fn remove_vertices(mut g: IndexGraph) {
    while g.vertex_size() > 0 {
        let v = VertexId(rand::thread_rng().gen::<usize>() % g.vertex_size());
        let _ = black_box(g.remove_vertex(&v));
    }
}
