//! Dijkstra's single-source shortest paths over any [`MonotoneQueue`]
//!
//! The engine is generic over the queue backend and relies on `decrease`
//! instead of lazy deletion: a vertex is inserted the first time it is
//! reached and decreased on every later improvement. Unreached vertices keep
//! the sentinel distance `n*C + 1`.
//!
//! # Example
//!
//! ```rust
//! use monotone_heaps::graph::Graph;
//! use monotone_heaps::pathfinding::shortest_paths;
//! use monotone_heaps::radix::RadixHeap;
//! use monotone_heaps::QueueParams;
//!
//! let graph = Graph::from_edges(3, &[(0, 1, 4), (1, 2, 1), (0, 2, 9)]).unwrap();
//! let params = QueueParams::for_graph(&graph);
//! let dist = shortest_paths::<RadixHeap>(&graph, 0, params).unwrap();
//! assert_eq!(dist, vec![0, 4, 5]);
//! ```

use crate::config::QueueParams;
use crate::graph::Graph;
use crate::traits::{Key, Label, MonotoneQueue, QueueError};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use tracing::debug;

/// Distance per vertex, indexed by label.
pub type Distances = Vec<Key>;

/// Queue traffic of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub inserts: usize,
    pub decreases: usize,
    pub delete_mins: usize,
    /// Pops whose key was already beaten by a recorded distance.
    pub stale_pops: usize,
}

fn check_inputs(graph: &Graph, source: Label, params: &QueueParams) -> Result<(), QueueError> {
    if source >= graph.vertex_count() {
        return Err(QueueError::LabelOutOfRange {
            label: source,
            capacity: graph.vertex_count(),
        });
    }
    if params.vertex_count < graph.vertex_count() {
        return Err(QueueError::InvalidParams("queue has fewer labels than the graph has vertices"));
    }
    if params.max_weight < graph.max_weight() {
        return Err(QueueError::InvalidParams("queue max weight is below the graph's max weight"));
    }
    Ok(())
}

/// Distances from `source` to every vertex, using queue backend `Q`.
///
/// # Errors
/// `LabelOutOfRange` for a bad source, `InvalidParams` if `params` does not
/// cover the graph, or whatever the queue reports.
pub fn shortest_paths<Q: MonotoneQueue>(
    graph: &Graph,
    source: Label,
    params: QueueParams,
) -> Result<Distances, QueueError> {
    shortest_paths_with_stats::<Q>(graph, source, params).map(|(dist, _)| dist)
}

/// Like [`shortest_paths`], also reporting queue traffic.
pub fn shortest_paths_with_stats<Q: MonotoneQueue>(
    graph: &Graph,
    source: Label,
    params: QueueParams,
) -> Result<(Distances, SearchStats), QueueError> {
    check_inputs(graph, source, &params)?;
    let sentinel = params.sentinel();
    let mut queue = Q::with_params(params)?;
    let mut dist = vec![sentinel; graph.vertex_count()];
    let mut stats = SearchStats::default();

    debug!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        source,
        "shortest path search started"
    );

    dist[source] = 0;
    queue.insert(source, 0)?;
    stats.inserts += 1;

    while !queue.is_empty() {
        let (u, d) = queue.delete_min()?;
        stats.delete_mins += 1;
        if dist[u] < d {
            stats.stale_pops += 1;
            continue;
        }

        for &(v, weight) in graph.neighbors(u) {
            let candidate = d + weight;
            if candidate >= dist[v] {
                continue;
            }
            if dist[v] == sentinel {
                queue.insert(v, candidate)?;
                stats.inserts += 1;
            } else {
                queue.decrease(v, candidate)?;
                stats.decreases += 1;
            }
            dist[v] = candidate;
        }
    }

    debug!(
        inserts = stats.inserts,
        decreases = stats.decreases,
        delete_mins = stats.delete_mins,
        "shortest path search finished"
    );
    Ok((dist, stats))
}

/// Baseline Dijkstra on `std`'s binary heap with lazy deletion.
///
/// Uses the same `n*C + 1` sentinel for unreachable vertices.
pub fn reference_shortest_paths(graph: &Graph, source: Label) -> Result<Distances, QueueError> {
    let params = QueueParams::for_graph(graph);
    check_inputs(graph, source, &params)?;
    let mut dist = vec![params.sentinel(); graph.vertex_count()];
    let mut heap = BinaryHeap::new();

    dist[source] = 0;
    heap.push(Reverse((0, source)));
    while let Some(Reverse((d, u))) = heap.pop() {
        if dist[u] < d {
            continue;
        }
        for &(v, weight) in graph.neighbors(u) {
            let candidate = d + weight;
            if candidate < dist[v] {
                dist[v] = candidate;
                heap.push(Reverse((candidate, v)));
            }
        }
    }
    Ok(dist)
}
