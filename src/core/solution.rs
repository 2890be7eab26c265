use super::{Edge, Graph, StructuralError};
use ahash::{HashSet, HashSetExt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A set of pairwise vertex-disjoint edges.
/// Every mutation keeps the disjointness invariant.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "Vec<Edge>", into = "Vec<Edge>")]
pub struct Matching {
    mate: BTreeMap<usize, usize>,
}

impl Matching {
    /// Creates an empty matching.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mate: BTreeMap::new(),
        }
    }

    /// Creates a matching from a list of edges.
    ///
    /// # Errors
    /// - If two edges share a vertex.
    /// - If an edge is a self-loop.
    pub fn from_edges<E>(edges: impl IntoIterator<Item = E>) -> Result<Self, StructuralError>
    where
        E: Into<Edge>,
    {
        let mut matching = Self::new();
        for edge in edges {
            matching.insert(edge.into())?;
        }
        Ok(matching)
    }

    fn insert(&mut self, edge: Edge) -> Result<(), StructuralError> {
        let (first, second) = edge.endpoints();
        if first == second {
            return Err(StructuralError::SelfLoop(edge));
        }

        for vertex in [first, second] {
            if let Some(partner) = self.partner(vertex) {
                return Err(StructuralError::SharedVertex {
                    vertex,
                    first: Edge::new(vertex, partner),
                    second: edge,
                });
            }
        }

        self.mate.insert(first, second);
        self.mate.insert(second, first);
        Ok(())
    }

    /// Returns the vertex matched with `vertex`, if any.
    #[must_use]
    pub fn partner(&self, vertex: usize) -> Option<usize> {
        self.mate.get(&vertex).copied()
    }

    /// Returns whether the vertex is covered by the matching.
    #[must_use]
    pub fn is_matched(&self, vertex: usize) -> bool {
        self.mate.contains_key(&vertex)
    }

    /// Returns whether the vertex is not covered by the matching.
    #[must_use]
    pub fn is_exposed(&self, vertex: usize) -> bool {
        !self.is_matched(vertex)
    }

    /// Returns whether the edge between the two vertices is matched.
    #[must_use]
    pub fn contains(&self, first: usize, second: usize) -> bool {
        self.partner(first) == Some(second)
    }

    /// Returns the matched edges in ascending order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        let iter = self.mate.iter().filter(|(vertex, partner)| vertex < partner);
        iter.map(|(&vertex, &partner)| Edge::new(vertex, partner))
    }

    /// Returns the number of matched edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mate.len() / 2
    }

    /// Returns whether no edge is matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mate.is_empty()
    }

    /// Flips every edge of an augmenting path, growing the matching by one edge.
    /// The matching is left untouched if the path is not augmenting.
    ///
    /// # Errors
    /// - If the path does not alternate between unmatched and matched edges,
    ///   starting and ending with unmatched ones at exposed vertices.
    pub fn toggle(&mut self, path: &AugmentingPath) -> Result<(), StructuralError> {
        if !path.alternates(self) {
            return Err(StructuralError::NotAugmenting(path.0.clone()));
        }

        // Every vertex of the path lies on exactly one even-indexed edge, so
        // overwriting those mates also drops the odd-indexed ones.
        for pair in path.0.chunks_exact(2) {
            self.mate.insert(pair[0], pair[1]);
            self.mate.insert(pair[1], pair[0]);
        }
        Ok(())
    }

    /// Checks that every matched edge belongs to the graph and no vertex is matched twice.
    ///
    /// # Errors
    /// - If a matched edge is not an edge of the graph.
    /// - If a vertex is matched to two different vertices.
    pub fn validate(&self, graph: &Graph) -> Result<(), StructuralError> {
        for (&vertex, &partner) in &self.mate {
            if self.partner(partner) != Some(vertex) {
                let second = Edge::new(partner, self.partner(partner).unwrap_or(partner));
                return Err(StructuralError::SharedVertex {
                    vertex: partner,
                    first: Edge::new(vertex, partner),
                    second,
                });
            }
            if !graph.has_edge(vertex, partner) {
                return Err(StructuralError::MissingEdge(Edge::new(vertex, partner)));
            }
        }
        Ok(())
    }

    /// Returns whether the matching is a valid matching of the graph.
    #[must_use]
    pub fn is_valid(&self, graph: &Graph) -> bool {
        self.validate(graph).is_ok()
    }
}

impl TryFrom<Vec<Edge>> for Matching {
    type Error = StructuralError;

    fn try_from(edges: Vec<Edge>) -> Result<Self, Self::Error> {
        Self::from_edges(edges)
    }
}

impl From<Matching> for Vec<Edge> {
    fn from(matching: Matching) -> Self {
        matching.edges().collect()
    }
}

/// An alternating path between two exposed vertices.
/// Its first, third, fifth... edges are unmatched and the others are matched.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct AugmentingPath(Vec<usize>);

impl AugmentingPath {
    /// Wraps a sequence of vertices. No check is performed until the path is used.
    #[must_use]
    pub const fn new(vertices: Vec<usize>) -> Self {
        Self(vertices)
    }

    /// Returns the vertices of the path in order.
    #[must_use]
    pub fn vertices(&self) -> &[usize] {
        &self.0
    }

    /// Returns the edges of the path in order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.0.windows(2).map(|pair| Edge::new(pair[0], pair[1]))
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// Returns whether the path has no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns whether the vertex lies on the path.
    #[must_use]
    pub fn contains(&self, vertex: usize) -> bool {
        self.0.contains(&vertex)
    }

    /// Checks that the path is augmenting for the matching in the graph.
    ///
    /// # Errors
    /// - If an edge of the path is not in the graph.
    /// - If the path does not alternate or its endpoints are matched.
    pub fn check(&self, graph: &Graph, matching: &Matching) -> Result<(), StructuralError> {
        if let Some(edge) = self.edges().find(|edge| {
            let (first, second) = edge.endpoints();
            !graph.has_edge(first, second)
        }) {
            return Err(StructuralError::MissingEdge(edge));
        }

        if self.alternates(matching) {
            Ok(())
        } else {
            Err(StructuralError::NotAugmenting(self.0.clone()))
        }
    }

    fn alternates(&self, matching: &Matching) -> bool {
        let (Some(&first), Some(&last)) = (self.0.first(), self.0.last()) else {
            return false;
        };

        if self.0.len() % 2 != 0 || matching.is_matched(first) || matching.is_matched(last) {
            return false;
        }

        let mut seen = HashSet::with_capacity(self.0.len());
        if !self.0.iter().all(|&vertex| seen.insert(vertex)) {
            return false;
        }

        let mut pairs = self.0.windows(2).enumerate();
        pairs.all(|(i, pair)| matching.contains(pair[0], pair[1]) == (i % 2 == 1))
    }
}

impl From<AugmentingPath> for Vec<usize> {
    fn from(path: AugmentingPath) -> Self {
        path.0
    }
}
