//! Directed graphs with bounded non-negative integer weights
//!
//! Vertices are dense labels in `[0, n)`. The largest allowed weight `C` is
//! fixed at construction and sizes every queue built for the graph via
//! [`QueueParams::for_graph`](crate::config::QueueParams::for_graph).
//!
//! Graphs can also be read from the 9th DIMACS challenge `.gr` format:
//!
//! ```text
//! c comment
//! p sp <n> <m>
//! a <u> <v> <w>
//! ```
//!
//! with 1-based vertex ids; `C` is taken to be the largest arc weight.

use crate::traits::Label;
use std::io::BufRead;

/// Errors from building or parsing a [`Graph`]
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("vertex {vertex} is outside 0..{vertex_count}")]
    VertexOutOfRange { vertex: Label, vertex_count: usize },
    #[error("edge weight {weight} exceeds the maximum weight {max_weight}")]
    WeightTooLarge { weight: u64, max_weight: u64 },
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("no `p sp` problem line before the first arc")]
    MissingProblemLine,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Adjacency-list graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    max_weight: u64,
    adjacency: Vec<Vec<(Label, u64)>>,
    edge_count: usize,
}

impl Graph {
    /// Graph with `vertex_count` vertices, no edges, and weights up to `max_weight`.
    pub fn new(vertex_count: usize, max_weight: u64) -> Self {
        Graph {
            max_weight,
            adjacency: vec![Vec::new(); vertex_count],
            edge_count: 0,
        }
    }

    /// Adds the directed edge `from -> to`.
    pub fn add_edge(&mut self, from: Label, to: Label, weight: u64) -> Result<(), GraphError> {
        let vertex_count = self.vertex_count();
        for vertex in [from, to] {
            if vertex >= vertex_count {
                return Err(GraphError::VertexOutOfRange {
                    vertex,
                    vertex_count,
                });
            }
        }
        if weight > self.max_weight {
            return Err(GraphError::WeightTooLarge {
                weight,
                max_weight: self.max_weight,
            });
        }
        self.adjacency[from].push((to, weight));
        self.edge_count += 1;
        Ok(())
    }

    /// Builds a graph from per-vertex `(target, weight)` lists.
    ///
    /// ```rust
    /// use monotone_heaps::graph::Graph;
    ///
    /// let graph = Graph::from_adjacency(vec![vec![(1, 3)], vec![]], 5).unwrap();
    /// assert_eq!(graph.vertex_count(), 2);
    /// assert_eq!(graph.neighbors(0), &[(1, 3)]);
    /// ```
    pub fn from_adjacency(
        adjacency: Vec<Vec<(Label, u64)>>,
        max_weight: u64,
    ) -> Result<Self, GraphError> {
        let mut graph = Graph::new(adjacency.len(), max_weight);
        for (from, edges) in adjacency.into_iter().enumerate() {
            for (to, weight) in edges {
                graph.add_edge(from, to, weight)?;
            }
        }
        Ok(graph)
    }

    /// Builds a graph from `(from, to, weight)` triples; `C` is the largest weight.
    pub fn from_edges(vertex_count: usize, edges: &[(Label, Label, u64)]) -> Result<Self, GraphError> {
        let max_weight = edges.iter().map(|&(_, _, w)| w).max().unwrap_or(0);
        let mut graph = Graph::new(vertex_count, max_weight);
        for &(from, to, weight) in edges {
            graph.add_edge(from, to, weight)?;
        }
        Ok(graph)
    }

    /// Parses DIMACS `.gr` text.
    pub fn parse_dimacs(text: &str) -> Result<Self, GraphError> {
        Self::from_dimacs_reader(text.as_bytes())
    }

    /// Reads DIMACS `.gr` input line by line.
    pub fn from_dimacs_reader<R: BufRead>(reader: R) -> Result<Self, GraphError> {
        let mut vertex_count: Option<usize> = None;
        let mut arcs: Vec<(Label, Label, u64)> = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let number = index + 1;
            let mut fields = line.split_whitespace();
            match fields.next() {
                None | Some("c") => {}
                Some("p") => {
                    if fields.next() != Some("sp") {
                        return Err(parse_error(number, "expected `p sp <n> <m>`"));
                    }
                    let n = parse_field(fields.next(), number, "vertex count")?;
                    let m: usize = parse_field(fields.next(), number, "arc count")?;
                    vertex_count = Some(n);
                    arcs.reserve(m);
                }
                Some("a") => {
                    let n = vertex_count.ok_or(GraphError::MissingProblemLine)?;
                    let from = parse_vertex(fields.next(), number, n)?;
                    let to = parse_vertex(fields.next(), number, n)?;
                    let weight = parse_field(fields.next(), number, "arc weight")?;
                    arcs.push((from, to, weight));
                }
                Some(other) => {
                    return Err(parse_error(number, &format!("unknown line type `{other}`")));
                }
            }
        }

        let n = vertex_count.ok_or(GraphError::MissingProblemLine)?;
        Self::from_edges(n, &arcs)
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Largest allowed edge weight `C`.
    pub fn max_weight(&self) -> u64 {
        self.max_weight
    }

    /// Outgoing `(target, weight)` pairs of `vertex`.
    pub fn neighbors(&self, vertex: Label) -> &[(Label, u64)] {
        &self.adjacency[vertex]
    }
}

fn parse_error(line: usize, message: &str) -> GraphError {
    GraphError::Parse {
        line,
        message: message.to_string(),
    }
}

fn parse_field<T: std::str::FromStr>(
    field: Option<&str>,
    line: usize,
    what: &str,
) -> Result<T, GraphError> {
    let field = field.ok_or_else(|| parse_error(line, &format!("missing {what}")))?;
    field
        .parse()
        .map_err(|_| parse_error(line, &format!("invalid {what} `{field}`")))
}

/// Parses a 1-based vertex id into a label.
fn parse_vertex(field: Option<&str>, line: usize, vertex_count: usize) -> Result<Label, GraphError> {
    let id: usize = parse_field(field, line, "vertex id")?;
    if id == 0 || id > vertex_count {
        return Err(GraphError::VertexOutOfRange {
            vertex: id,
            vertex_count,
        });
    }
    Ok(id - 1)
}
