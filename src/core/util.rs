use super::{Graph, Matching};
use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::RangeInclusive;

/// Generates a random graph in the `G(n, p)` model.
/// The number of vertices is drawn uniformly from `vertices` and every pair of vertices is
/// joined with the given probability.
///
/// # Panics
/// - If the range of vertices is empty.
pub fn random_graph(vertices: RangeInclusive<usize>, probability: f64, rng: &mut impl Rng) -> Graph {
    let n = rng.gen_range(vertices);
    let mut graph = Graph::new(n);

    for first in 0..n {
        for second in first + 1..n {
            if rng.gen_bool(probability.clamp(0.0, 1.0)) {
                graph
                    .add_edge(first, second)
                    .unwrap_or_else(|_| unreachable!("Both vertices are in the graph"));
            }
        }
    }

    graph
}

/// Builds a maximal (not necessarily maximum) matching by scanning the edges in random order.
/// Used to seed matchers with a non-trivial starting point.
pub fn random_maximal_matching(graph: &Graph, rng: &mut impl Rng) -> Matching {
    let mut edges = graph.edges().to_vec();
    edges.shuffle(rng);

    let mut covered = vec![false; graph.capacity()];
    let chosen = edges.into_iter().filter(|edge| {
        let (first, second) = edge.endpoints();
        if covered[first] || covered[second] {
            return false;
        }
        covered[first] = true;
        covered[second] = true;
        true
    });

    Matching::from_edges(chosen.collect::<Vec<_>>())
        .unwrap_or_else(|_| unreachable!("Chosen edges are disjoint"))
}
