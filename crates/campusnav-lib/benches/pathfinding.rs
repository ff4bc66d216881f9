use campusnav_lib::{
    k_shortest_paths, route_through, shortest_path, CampusGraphStore, CostModel, Graph,
};
use criterion::{criterion_group, criterion_main, Criterion};
use once_cell::sync::Lazy;
use std::hint::black_box;
use std::path::PathBuf;

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures/campus")
}

static STORE: Lazy<CampusGraphStore> = Lazy::new(|| {
    CampusGraphStore::load(&fixture_root(), &CostModel::default()).expect("fixture loads")
});

fn hall() -> &'static Graph {
    STORE.graph_for("hall", false).expect("hall campus present")
}

fn benchmark_pathfinding(c: &mut Criterion) {
    let graph = hall();

    c.bench_function("dijkstra_h2_209_h2_260", |b| {
        b.iter(|| {
            let path = shortest_path(graph, "h2_209", "h2_260").expect("route exists");
            black_box(path.distance)
        });
    });

    c.bench_function("yen_k5_h2_209_h1_exit_main", |b| {
        b.iter(|| {
            let paths = k_shortest_paths(graph, "h2_209", "h1_exit_main", 5).expect("route exists");
            black_box(paths.len())
        });
    });

    c.bench_function("route_through_three_stops", |b| {
        b.iter(|| {
            let report = route_through(graph, "h2_209", &["h2_260", "h1_110", "h2_231"]);
            black_box(report.total_distance)
        });
    });

    let accessible = STORE
        .graph_for("hall", true)
        .expect("hall accessibility subgraph");
    c.bench_function("dijkstra_accessible_h2_260_h1_exit_main", |b| {
        b.iter(|| {
            let path = shortest_path(accessible, "h2_260", "h1_exit_main").expect("route exists");
            black_box(path.distance)
        });
    });
}

criterion_group!(benches, benchmark_pathfinding);
criterion_main!(benches);
