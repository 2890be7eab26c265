use super::{GraphError, Matching};
use ahash::{HashSet, HashSetExt};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// An undirected edge described by its endpoints.
/// The smaller endpoint is always stored first, so `Edge::new(1, 0) == Edge::new(0, 1)`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct Edge(usize, usize);

impl Edge {
    /// Creates a new edge between two vertices.
    #[must_use]
    pub const fn new(first: usize, second: usize) -> Self {
        if first <= second {
            Self(first, second)
        } else {
            Self(second, first)
        }
    }

    /// Returns both endpoints, smaller first.
    #[must_use]
    pub const fn endpoints(self) -> (usize, usize) {
        (self.0, self.1)
    }

    /// Returns whether the vertex is one of the endpoints.
    #[must_use]
    pub const fn contains(self, vertex: usize) -> bool {
        self.0 == vertex || self.1 == vertex
    }

    /// Returns the endpoint opposite to `vertex`, or `None` if the edge does not touch it.
    #[must_use]
    pub const fn other(self, vertex: usize) -> Option<usize> {
        if self.0 == vertex {
            Some(self.1)
        } else if self.1 == vertex {
            Some(self.0)
        } else {
            None
        }
    }

    const fn is_loop(self) -> bool {
        self.0 == self.1
    }
}

impl From<(usize, usize)> for Edge {
    fn from((first, second): (usize, usize)) -> Self {
        Self::new(first, second)
    }
}

impl From<Edge> for (usize, usize) {
    fn from(edge: Edge) -> Self {
        edge.endpoints()
    }
}

impl Display for Edge {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.0, self.1)
    }
}

/// A simple undirected graph.
///
/// Vertices are identified by indices into an arena. An index is either occupied by a vertex
/// or a hole, which lets a contracted graph keep the identities of the vertices it shares with
/// its parent while allocating fresh identities past the parent's capacity.
/// Parallel edges are collapsed on insertion and self-loops are rejected.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "GraphData", into = "GraphData")]
pub struct Graph {
    adjacency: Vec<Option<Vec<usize>>>,
    edges: Vec<Edge>,
    edge_set: HashSet<Edge>,
}

impl Graph {
    /// Creates a graph with vertices `0..vertex_count` and no edges.
    #[must_use]
    pub fn new(vertex_count: usize) -> Self {
        Self {
            adjacency: vec![Some(Vec::new()); vertex_count],
            edges: Vec::new(),
            edge_set: HashSet::new(),
        }
    }

    /// Creates a graph with the given vertex identities and no edges.
    #[must_use]
    pub fn with_vertices(vertices: impl IntoIterator<Item = usize>) -> Self {
        let mut graph = Self::default();
        for vertex in vertices {
            if vertex >= graph.adjacency.len() {
                graph.adjacency.resize(vertex + 1, None);
            }
            graph.adjacency[vertex].get_or_insert_with(Vec::new);
        }
        graph
    }

    /// Creates a graph with vertices `0..vertex_count` and the given edges.
    ///
    /// # Errors
    /// - If an edge references a vertex outside of `0..vertex_count`.
    /// - If an edge is a self-loop.
    pub fn from_edges<E>(vertex_count: usize, edges: impl IntoIterator<Item = E>) -> Result<Self, GraphError>
    where
        E: Into<Edge>,
    {
        let mut graph = Self::new(vertex_count);
        for edge in edges {
            let (first, second) = edge.into().endpoints();
            graph.add_edge(first, second)?;
        }
        Ok(graph)
    }

    /// Adds a fresh vertex and returns its identity.
    /// The identity is never used by any vertex of the graph, present or removed.
    pub fn add_vertex(&mut self) -> usize {
        self.adjacency.push(Some(Vec::new()));
        self.adjacency.len() - 1
    }

    /// Adds an edge to the graph.
    /// Returns `false` if the edge was already present.
    ///
    /// # Errors
    /// - If one of the endpoints is not a vertex of the graph.
    /// - If both endpoints are the same vertex.
    pub fn add_edge(&mut self, first: usize, second: usize) -> Result<bool, GraphError> {
        let edge = Edge::new(first, second);
        if edge.is_loop() {
            return Err(GraphError::SelfLoop(first));
        }

        for vertex in [first, second] {
            if !self.contains_vertex(vertex) {
                return Err(GraphError::MissingVertex(vertex));
            }
        }

        if !self.edge_set.insert(edge) {
            return Ok(false);
        }

        self.edges.push(edge);
        for (from, to) in [(first, second), (second, first)] {
            if let Some(neighbors) = self.adjacency[from].as_mut() {
                neighbors.push(to);
            }
        }
        Ok(true)
    }

    /// Returns whether the vertex exists.
    #[must_use]
    pub fn contains_vertex(&self, vertex: usize) -> bool {
        self.adjacency.get(vertex).is_some_and(Option::is_some)
    }

    /// Returns whether the edge exists.
    #[must_use]
    pub fn has_edge(&self, first: usize, second: usize) -> bool {
        self.edge_set.contains(&Edge::new(first, second))
    }

    /// Returns the vertices in ascending order.
    pub fn vertices(&self) -> impl Iterator<Item = usize> + '_ {
        let iter = self.adjacency.iter().enumerate();
        iter.filter_map(|(vertex, neighbors)| neighbors.as_ref().map(|_| vertex))
    }

    /// Returns the neighbors of a vertex in insertion order.
    /// Unknown vertices have no neighbors.
    #[must_use]
    pub fn neighbors(&self, vertex: usize) -> &[usize] {
        self.adjacency
            .get(vertex)
            .and_then(Option::as_deref)
            .unwrap_or_default()
    }

    /// Returns the edges in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.adjacency.iter().filter(|vertex| vertex.is_some()).count()
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns one past the largest vertex identity ever allocated.
    /// Per-vertex tables indexed by identity must have at least this length.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.adjacency.len()
    }

    /// Returns whether the graph has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adjacency.iter().all(Option::is_none)
    }
}

/// Serialized form of a graph.
#[derive(Clone, Debug, Deserialize, Serialize)]
struct GraphData {
    vertices: Vec<usize>,
    edges: Vec<Edge>,
}

impl TryFrom<GraphData> for Graph {
    type Error = GraphError;

    fn try_from(data: GraphData) -> Result<Self, Self::Error> {
        let mut graph = Self::with_vertices(data.vertices);
        for edge in data.edges {
            let (first, second) = edge.endpoints();
            graph.add_edge(first, second)?;
        }
        Ok(graph)
    }
}

impl From<Graph> for GraphData {
    fn from(graph: Graph) -> Self {
        Self {
            vertices: graph.vertices().collect(),
            edges: graph.edges,
        }
    }
}

/// An instance of the matching problem: a graph and a matching to start from.
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, Eq, Serialize, PartialEq)]
pub struct Instance {
    pub graph: Graph,
    #[serde(default)]
    pub matching: Matching,
}

impl Instance {
    /// Creates a new instance starting from the empty matching.
    #[must_use]
    pub fn new(graph: Graph) -> Self {
        let matching = Matching::new();
        Self { graph, matching }
    }

    /// Creates a new instance starting from the given matching.
    #[must_use]
    pub const fn with_matching(graph: Graph, matching: Matching) -> Self {
        Self { graph, matching }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn edge_should_normalize() {
        assert_eq!(Edge::new(3, 1), Edge::new(1, 3));
        assert_eq!(Edge::new(3, 1).endpoints(), (1, 3));
        assert_eq!(Edge::new(3, 1).other(3), Some(1));
        assert_eq!(Edge::new(3, 1).other(2), None);
        assert!(Edge::new(3, 1).contains(1));
    }

    #[test]
    fn graph_should_reject_invalid_edges() {
        let mut graph = Graph::new(3);
        assert_eq!(graph.add_edge(1, 1), Err(GraphError::SelfLoop(1)));
        assert_eq!(graph.add_edge(0, 3), Err(GraphError::MissingVertex(3)));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn graph_should_collapse_parallel_edges() -> anyhow::Result<()> {
        let graph = Graph::from_edges(3, [(0, 1), (1, 0), (1, 2), (0, 1)])?;
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.neighbors(1), &[0, 2]);
        assert!(graph.has_edge(2, 1));
        assert!(!graph.has_edge(0, 2));
        Ok(())
    }

    #[test]
    fn graph_should_keep_holes() -> anyhow::Result<()> {
        let mut graph = Graph::with_vertices([0, 4, 2]);
        assert_eq!(graph.vertices().collect::<Vec<_>>(), vec![0, 2, 4]);
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.capacity(), 5);
        assert!(!graph.contains_vertex(1));
        assert!(graph.neighbors(1).is_empty());
        assert_eq!(graph.add_edge(1, 2), Err(GraphError::MissingVertex(1)));

        let fresh = graph.add_vertex();
        assert_eq!(fresh, 5);
        assert!(graph.add_edge(fresh, 4)?);
        Ok(())
    }

    #[test]
    fn empty_graph_should_be_empty() {
        let graph = Graph::default();
        assert!(graph.is_empty());
        assert_eq!(graph.vertices().count(), 0);
        assert!(Graph::with_vertices([]).is_empty());
        assert!(!Graph::new(1).is_empty());
    }

    #[test]
    fn instance_should_serialize() -> anyhow::Result<()> {
        let graph = Graph::from_edges(4, [(0, 1), (1, 2), (2, 3)])?;
        let matching = Matching::from_edges([(1, 2)])?;
        let instance = Instance::with_matching(graph, matching);

        let serialized = crate::data::to_string(&instance)?;
        let mut reader = std::io::Cursor::new(serialized);
        let deserialized: Instance = crate::data::deserialize(&mut reader)?;

        assert_eq!(instance, deserialized);

        Ok(())
    }

    #[test]
    fn instance_should_default_to_empty_matching() -> anyhow::Result<()> {
        let json = r#"{ "graph": { "vertices": [0, 1], "edges": [[1, 0]] } }"#;
        let instance: Instance = crate::data::deserialize(&mut std::io::Cursor::new(json))?;
        assert!(instance.matching.is_empty());
        assert!(instance.graph.has_edge(0, 1));
        Ok(())
    }

    #[test]
    fn graph_with_self_loop_should_not_deserialize() {
        let json = r#"{ "vertices": [0, 1], "edges": [[1, 1]] }"#;
        let graph: anyhow::Result<Graph> = crate::data::deserialize(&mut std::io::Cursor::new(json));
        assert!(graph.is_err());
    }
}
