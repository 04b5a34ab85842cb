//! End-to-end scenarios run against every queue backend

use monotone_heaps::fib_radix::FibRadixHeap;
use monotone_heaps::graph::Graph;
use monotone_heaps::kary_radix::KaryRadixHeap;
use monotone_heaps::pathfinding::{
    reference_shortest_paths, shortest_paths, shortest_paths_with_stats,
};
use monotone_heaps::radix::RadixHeap;
use monotone_heaps::{Key, Label, MonotoneQueue, QueueParams};

// ============================================================================
// Helpers
// ============================================================================

fn six_vertex_graph() -> Graph {
    Graph::from_adjacency(
        vec![
            vec![(1, 12), (3, 14), (4, 20), (2, 0)],
            vec![(0, 12), (3, 4)],
            vec![(0, 0), (4, 8)],
            vec![(0, 14), (1, 4), (4, 5), (5, 3)],
            vec![(0, 20), (2, 8), (3, 5), (5, 9)],
            vec![(3, 3), (4, 9)],
        ],
        20,
    )
    .unwrap()
}

fn drain<Q: MonotoneQueue>(queue: &mut Q) -> Vec<(Label, Key)> {
    let mut out = Vec::new();
    while !queue.is_empty() {
        out.push(queue.delete_min().unwrap());
    }
    out
}

fn all_decreased_to_zero<Q: MonotoneQueue>(params: QueueParams) {
    let n = params.vertex_count;
    let c = params.max_weight;
    let mut queue = Q::with_params(params).unwrap();
    for label in 0..n {
        queue.insert(label, c).unwrap();
    }
    for label in 0..n {
        queue.decrease(label, 0).unwrap();
    }

    let drained = drain(&mut queue);
    assert!(drained.iter().all(|&(_, key)| key == 0));
    let mut labels: Vec<Label> = drained.iter().map(|&(label, _)| label).collect();
    labels.sort_unstable();
    assert_eq!(labels, (0..n).collect::<Vec<_>>());
}

fn wide_keys<Q: MonotoneQueue>(params: QueueParams) {
    let mut queue = Q::with_params(params).unwrap();
    for (label, key) in [(0, 1), (1, 999), (2, 500), (3, 250)] {
        queue.insert(label, key).unwrap();
    }
    let keys: Vec<Key> = drain(&mut queue).into_iter().map(|(_, key)| key).collect();
    assert_eq!(keys, vec![1, 250, 500, 999]);
}

// ============================================================================
// Scenario A: six-vertex graph
// ============================================================================

#[test]
fn test_six_vertex_graph_all_backends() {
    let graph = six_vertex_graph();
    let params = QueueParams::for_graph(&graph);
    // 0 -> 2 -> 4 -> 3 -> 5 beats every direct edge.
    let expected: Vec<Key> = vec![0, 12, 0, 13, 8, 16];

    assert_eq!(reference_shortest_paths(&graph, 0).unwrap(), expected);
    assert_eq!(shortest_paths::<RadixHeap>(&graph, 0, params).unwrap(), expected);
    assert_eq!(shortest_paths::<KaryRadixHeap>(&graph, 0, params).unwrap(), expected);
    assert_eq!(shortest_paths::<FibRadixHeap>(&graph, 0, params).unwrap(), expected);
}

// ============================================================================
// Scenario B: single vertex, zero weights
// ============================================================================

#[test]
fn test_single_vertex_graph() {
    let graph = Graph::new(1, 0);
    let params = QueueParams::for_graph(&graph);

    let (dist, stats) = shortest_paths_with_stats::<RadixHeap>(&graph, 0, params).unwrap();
    assert_eq!(dist, vec![0]);
    assert_eq!(stats.delete_mins, 1);

    let (dist, stats) = shortest_paths_with_stats::<KaryRadixHeap>(&graph, 0, params).unwrap();
    assert_eq!(dist, vec![0]);
    assert_eq!(stats.delete_mins, 1);

    let (dist, stats) = shortest_paths_with_stats::<FibRadixHeap>(&graph, 0, params).unwrap();
    assert_eq!(dist, vec![0]);
    assert_eq!(stats.delete_mins, 1);
}

// ============================================================================
// Scenario C: everything decreased to zero
// ============================================================================

#[test]
fn test_all_decreased_to_zero_radix() {
    all_decreased_to_zero::<RadixHeap>(QueueParams::new(50, 20));
}

#[test]
fn test_all_decreased_to_zero_kary() {
    for k in [2, 3, 8] {
        all_decreased_to_zero::<KaryRadixHeap>(QueueParams::new(50, 20).with_branching(k));
    }
}

#[test]
fn test_all_decreased_to_zero_fib() {
    for k in [2, 3, 8] {
        all_decreased_to_zero::<FibRadixHeap>(QueueParams::new(50, 20).with_branching(k));
    }
}

// ============================================================================
// Scenario D: keys spread over a wide range
// ============================================================================

#[test]
fn test_wide_keys_radix() {
    wide_keys::<RadixHeap>(QueueParams::new(4, 1000));
}

#[test]
fn test_wide_keys_kary() {
    wide_keys::<KaryRadixHeap>(QueueParams::new(4, 1000).with_branching(4));
}

#[test]
fn test_wide_keys_fib() {
    wide_keys::<FibRadixHeap>(QueueParams::new(4, 1000).with_branching(4));
}
