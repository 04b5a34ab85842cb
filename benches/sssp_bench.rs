//! Single-source shortest path benchmarks
//!
//! Compares the three monotone queues against the binary-heap reference on
//! seeded random graphs, over a range of maximum edge weights and branching
//! factors.
//!
//! ## Real road networks
//!
//! If `data/USA-road-d.NY.gr` exists, it is benchmarked as well. Download it from
//! <http://www.diag.uniroma1.it/challenge9/download.shtml>:
//!
//! ```sh
//! mkdir -p data && cd data
//! wget http://www.diag.uniroma1.it/challenge9/data/USA-road-d/USA-road-d.NY.gr.gz
//! gunzip USA-road-d.NY.gr.gz
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use monotone_heaps::fib_radix::FibRadixHeap;
use monotone_heaps::graph::Graph;
use monotone_heaps::kary_radix::KaryRadixHeap;
use monotone_heaps::pathfinding::{reference_shortest_paths, shortest_paths};
use monotone_heaps::radix::RadixHeap;
use monotone_heaps::QueueParams;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

const ROAD_NETWORK: &str = "data/USA-road-d.NY.gr";

fn random_graph(n: usize, avg_degree: usize, max_weight: u64, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = Graph::new(n, max_weight);
    // A ring keeps every vertex reachable.
    for v in 0..n {
        let weight = rng.gen_range(0..=max_weight);
        graph.add_edge(v, (v + 1) % n, weight).unwrap();
    }
    for _ in 0..n * avg_degree.saturating_sub(1) {
        let from = rng.gen_range(0..n);
        let to = rng.gen_range(0..n);
        graph.add_edge(from, to, rng.gen_range(0..=max_weight)).unwrap();
    }
    graph
}

fn bench_graph(c: &mut Criterion, group_name: &str, graph: &Graph) {
    let mut group = c.benchmark_group(group_name);
    group.sample_size(10);
    let params = QueueParams::for_graph(graph);

    group.bench_function("binary_heap_reference", |b| {
        b.iter(|| black_box(reference_shortest_paths(graph, 0).unwrap()));
    });
    group.bench_function("radix", |b| {
        b.iter(|| black_box(shortest_paths::<RadixHeap>(graph, 0, params).unwrap()));
    });
    for k in [2, 4, 8] {
        let params = params.with_branching(k);
        group.bench_with_input(BenchmarkId::new("kary_radix", k), &params, |b, &params| {
            b.iter(|| black_box(shortest_paths::<KaryRadixHeap>(graph, 0, params).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("fib_radix", k), &params, |b, &params| {
            b.iter(|| black_box(shortest_paths::<FibRadixHeap>(graph, 0, params).unwrap()));
        });
    }
    group.finish();
}

fn benchmark_weight_ranges(c: &mut Criterion) {
    for max_weight in [10u64, 1_000, 100_000] {
        let graph = random_graph(20_000, 4, max_weight, 12345);
        bench_graph(c, &format!("random_C={max_weight}"), &graph);
    }
}

fn benchmark_road_network(c: &mut Criterion) {
    if !Path::new(ROAD_NETWORK).exists() {
        eprintln!("skipping road network benchmark: {ROAD_NETWORK} not found");
        return;
    }
    let file = match File::open(ROAD_NETWORK) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("skipping road network benchmark: {err}");
            return;
        }
    };
    match Graph::from_dimacs_reader(BufReader::new(file)) {
        Ok(graph) => bench_graph(c, "road_network_NY", &graph),
        Err(err) => eprintln!("skipping road network benchmark: {err}"),
    }
}

criterion_group!(benches, benchmark_weight_ranges, benchmark_road_network);
criterion_main!(benches);
