use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use netgraph::{Gfid, NetworkGraph};

/// Square grid of `side * side` vertices with bidirectional unit-cost edges.
fn make_grid_graph(side: i64) -> NetworkGraph {
    let mut graph = NetworkGraph::new();
    let mut connector = 0;

    for row in 0..side {
        for col in 0..side {
            let vertex = row * side + col;
            if col + 1 < side {
                graph
                    .add_edge(Gfid::new(1_000_000 + connector), Gfid::new(vertex), Gfid::new(vertex + 1), true, 1.0, 1.0)
                    .unwrap();
                connector += 1;
            }
            if row + 1 < side {
                graph
                    .add_edge(Gfid::new(1_000_000 + connector), Gfid::new(vertex), Gfid::new(vertex + side), true, 1.0, 1.0)
                    .unwrap();
                connector += 1;
            }
        }
    }

    graph
}

fn bench_shortest_path(c: &mut Criterion) {
    let mut g = c.benchmark_group("shortest path");

    for side in [10, 30, 100] {
        g.bench_with_input(BenchmarkId::new("grid", side), &side, |b, side| {
            let graph = make_grid_graph(*side);
            let end = Gfid::new(side * side - 1);
            b.iter(|| black_box(graph.dijkstra_shortest_path(Gfid::new(0), end)))
        });
    }
}

fn bench_k_shortest_paths(c: &mut Criterion) {
    let mut g = c.benchmark_group("k shortest paths");

    for side in [5, 10, 20] {
        g.bench_with_input(BenchmarkId::new("grid", side), &side, |b, side| {
            let graph = make_grid_graph(*side);
            let end = Gfid::new(side * side - 1);
            b.iter(|| black_box(graph.k_shortest_paths(Gfid::new(0), end, 4)))
        });
    }
}

fn bench_connected_components(c: &mut Criterion) {
    let mut g = c.benchmark_group("reachability");

    for side in [10, 30, 100] {
        g.bench_with_input(BenchmarkId::new("grid", side), &side, |b, side| {
            let graph = make_grid_graph(*side);
            b.iter(|| black_box(graph.connected_components(&[Gfid::new(0)])))
        });
    }
}

criterion_group!(
    benches,
    bench_shortest_path,
    bench_k_shortest_paths,
    bench_connected_components
);
criterion_main!(benches);
