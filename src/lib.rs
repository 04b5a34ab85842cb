//! Monotone priority queues for Dijkstra's algorithm
//!
//! This crate provides radix-heap style priority queues specialized for
//! single-source shortest paths with non-negative integer edge weights bounded
//! by `C`, together with a generic Dijkstra engine that drives them.
//!
//! # Features
//!
//! - **Radix Heap**: `ceil(log2(C + 1)) + 2` buckets; O(log C) amortized delete-min
//! - **K-ary Radix Heap**: buckets split into `K` segments; redistribution drains
//!   one segment at a time
//! - **Fib-Radix Heap**: a Fibonacci forest over the K-ary heap's classes, with
//!   cascading cuts and rank consolidation
//! - **Pathfinding**: Dijkstra over any [`MonotoneQueue`], plus a binary-heap
//!   reference implementation
//!
//! All queues are *monotone*: keys below the last extracted minimum are
//! rejected. Labels are dense integers in `[0, n)`, and every key must stay
//! below the `n*C + 1` sentinel.
//!
//! # Example
//!
//! ```rust
//! use monotone_heaps::fib_radix::FibRadixHeap;
//! use monotone_heaps::graph::Graph;
//! use monotone_heaps::pathfinding::shortest_paths;
//! use monotone_heaps::QueueParams;
//!
//! let graph = Graph::from_edges(4, &[(0, 1, 5), (0, 2, 1), (2, 1, 2), (1, 3, 7)]).unwrap();
//! let params = QueueParams::for_graph(&graph).with_branching(4);
//!
//! let dist = shortest_paths::<FibRadixHeap>(&graph, 0, params).unwrap();
//! assert_eq!(dist, vec![0, 3, 1, 10]);
//! ```

pub mod config;
pub mod fib_radix;
pub mod graph;
mod handles;
pub mod kary_radix;
pub mod pathfinding;
pub mod radix;
pub mod traits;

pub use config::{KeyOverflow, QueueParams};
pub use fib_radix::FibRadixHeap;
pub use graph::{Graph, GraphError};
pub use kary_radix::KaryRadixHeap;
pub use radix::RadixHeap;
pub use traits::{Key, Label, MonotoneQueue, QueueError};
