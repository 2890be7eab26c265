use super::forest::BlossomDescriptor;
use crate::core::{AugmentingPath, Error, Graph, Matching};
use log::debug;
use std::iter::once;

/// An odd alternating cycle collapsed into a pseudo-vertex of a reduced graph.
///
/// `cycle[0]` is the base. Consecutive vertices of the cycle are adjacent, as are the last one
/// and the base. The edges `cycle[i]-cycle[i + 1]` with odd `i` are matched, the others are not.
#[derive(Clone, Debug)]
pub struct Blossom {
    cycle: Vec<usize>,
    pseudo: usize,
}

impl Blossom {
    /// Returns the base of the blossom.
    #[must_use]
    pub fn base(&self) -> usize {
        self.cycle[0]
    }

    /// Returns the vertices of the odd cycle, base first.
    #[must_use]
    pub fn cycle(&self) -> &[usize] {
        &self.cycle
    }

    /// Returns the identity of the vertex replacing the blossom in the reduced graph.
    #[must_use]
    pub const fn pseudo(&self) -> usize {
        self.pseudo
    }

    /// Returns the even-length arc of the cycle leading from `entry` to the base.
    /// Its first edge is matched, so the arc can be entered through an unmatched edge.
    fn arc_to_base(&self, entry: usize) -> Option<Vec<usize>> {
        let position = self.cycle.iter().position(|&vertex| vertex == entry)?;
        let arc = if position % 2 == 0 {
            self.cycle[..=position].iter().rev().copied().collect()
        } else {
            let forward = self.cycle[position..].iter().copied();
            forward.chain(once(self.base())).collect()
        };
        Some(arc)
    }
}

/// A graph and matching with one blossom contracted, along with the mapping needed to lift
/// paths back into the graph the blossom was contracted from.
#[derive(Clone, Debug)]
pub struct Contraction {
    pub graph: Graph,
    pub matching: Matching,
    pub blossom: Blossom,
}

impl Contraction {
    /// Contracts the blossom closed by the descriptor.
    /// The input graph and matching are left untouched.
    ///
    /// # Errors
    /// - If the descriptor does not describe a blossom of the graph and matching.
    pub fn new(graph: &Graph, matching: &Matching, descriptor: &BlossomDescriptor) -> Result<Self, Error> {
        let cycle = blossom_cycle(descriptor);
        let pseudo = graph.capacity();
        let blossom = Blossom { cycle, pseudo };

        let mut inside = vec![false; graph.capacity()];
        for &vertex in blossom.cycle() {
            inside[vertex] = true;
        }
        let outside = graph.vertices().filter(|&vertex| !inside[vertex]);

        let mut reduced = Graph::with_vertices(outside.chain(once(pseudo)));
        let project = |vertex: usize| if inside[vertex] { pseudo } else { vertex };
        for edge in graph.edges() {
            let (first, second) = edge.endpoints();
            let (first, second) = (project(first), project(second));
            if first != second {
                reduced.add_edge(first, second)?;
            }
        }

        let base = blossom.base();
        let kept = matching.edges().filter_map(|edge| {
            let (first, second) = edge.endpoints();
            match (inside[first], inside[second]) {
                (false, false) => Some((first, second)),
                (true, false) if first == base => Some((pseudo, second)),
                (false, true) if second == base => Some((first, pseudo)),
                _ => None,
            }
        });
        let reduced_matching = Matching::from_edges(kept.collect::<Vec<_>>())?;

        debug!(
            "Contracted blossom {:?} with base {base} into {pseudo}",
            blossom.cycle()
        );

        Ok(Self {
            graph: reduced,
            matching: reduced_matching,
            blossom,
        })
    }

    /// Lifts an augmenting path of the reduced graph into the graph the blossom was contracted
    /// from. Paths avoiding the pseudo-vertex are returned unchanged.
    ///
    /// The matched edge at the pseudo-vertex, if any, leaves through the base. The other path
    /// edge enters the blossom at the base when possible, and otherwise at the first cycle
    /// vertex adjacent to the outer endpoint; the even arc from there to the base is spliced in.
    ///
    /// # Errors
    /// - `InconclusiveLift` if the entry and exit of the blossom cannot be paired into a valid
    ///   augmenting path of the unreduced graph.
    pub fn lift(&self, graph: &Graph, matching: &Matching, path: &AugmentingPath) -> Result<AugmentingPath, Error> {
        let pseudo = self.blossom.pseudo();
        if !path.contains(pseudo) {
            return Ok(path.clone());
        }

        let inconclusive = || Error::InconclusiveLift {
            pseudo,
            blossom: self.blossom.cycle().to_vec(),
            path: path.vertices().to_vec(),
        };

        let mut vertices = path.vertices().to_vec();
        let mut position = vertices.iter().position(|&v| v == pseudo).ok_or_else(inconclusive)?;

        // Orient the path so the blossom is entered from the prefix and left towards the suffix.
        let exit = self.matching.partner(pseudo);
        let leaves_backwards = match exit {
            Some(exit) => position > 0 && vertices[position - 1] == exit,
            None => position == 0,
        };
        if leaves_backwards {
            vertices.reverse();
            position = vertices.len() - 1 - position;
        }

        let consistent = match exit {
            Some(exit) => vertices.get(position + 1) == Some(&exit),
            None => position + 1 == vertices.len(),
        };
        if position == 0 || !consistent {
            return Err(inconclusive());
        }

        let outer = vertices[position - 1];
        let base = self.blossom.base();
        let entry = if graph.has_edge(outer, base) {
            Some(base)
        } else {
            let mut cycle = self.blossom.cycle().iter().copied();
            cycle.find(|&vertex| graph.has_edge(outer, vertex))
        };
        let arc = entry
            .and_then(|entry| self.blossom.arc_to_base(entry))
            .ok_or_else(inconclusive)?;

        let suffix = vertices.split_off(position + 1);
        vertices.truncate(position);
        vertices.extend(arc);
        vertices.extend(suffix);

        let lifted = AugmentingPath::new(vertices);
        lifted.check(graph, matching).map_err(|_| inconclusive())?;

        debug!("Lifted path through {pseudo}: {:?}", lifted.vertices());
        Ok(lifted)
    }
}

/// Returns the odd cycle closed by the descriptor, starting at the nearest common ancestor of
/// its two outer vertices, then down to `v`, then from `w` back up.
fn blossom_cycle(descriptor: &BlossomDescriptor) -> Vec<usize> {
    let mut v_path = descriptor.forest.path_to_root(descriptor.v);
    let mut w_path = descriptor.forest.path_to_root(descriptor.w);
    v_path.reverse();
    w_path.reverse();

    let common = v_path
        .iter()
        .zip(&w_path)
        .take_while(|(first, second)| first == second)
        .count();

    let base = v_path[common - 1];
    let down = v_path[common..].iter().copied();
    let up = w_path[common..].iter().rev().copied();

    once(base).chain(down).chain(up).collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::algo::forest::{build, Search};
    use crate::core::Edge;

    fn contract(graph: &Graph, matching: &Matching) -> anyhow::Result<Contraction> {
        match build(graph, matching) {
            Search::Blossom(descriptor) => Ok(Contraction::new(graph, matching, &descriptor)?),
            other => Err(anyhow::anyhow!("Expected blossom, got {other:?}")),
        }
    }

    /// Triangle 0-1-2 with 1-2 matched and its base 0 matched to 3.
    /// Exposed 5 sees the base and 1, exposed 6 only sees 2, exposed 4 hangs on 3.
    fn matched_triangle() -> anyhow::Result<(Graph, Matching, Contraction)> {
        let edges = [(0, 1), (1, 2), (2, 0), (0, 3), (3, 4), (0, 5), (1, 5), (2, 6)];
        let graph = Graph::from_edges(7, edges)?;
        let matching = Matching::from_edges([(1, 2), (0, 3)])?;
        let contraction = Contraction {
            graph: Graph::from_edges(8, [(7, 3), (3, 4), (7, 5), (7, 6)])?,
            matching: Matching::from_edges([(7, 3)])?,
            blossom: Blossom {
                cycle: vec![0, 1, 2],
                pseudo: 7,
            },
        };
        Ok((graph, matching, contraction))
    }

    #[test]
    fn triangle_should_contract_to_single_vertex() -> anyhow::Result<()> {
        let graph = Graph::from_edges(3, [(0, 1), (1, 2), (0, 2)])?;
        let matching = Matching::from_edges([(1, 2)])?;
        let contraction = contract(&graph, &matching)?;

        assert_eq!(contraction.blossom.cycle(), &[0, 2, 1]);
        assert_eq!(contraction.blossom.base(), 0);
        assert_eq!(contraction.blossom.pseudo(), 3);
        assert_eq!(contraction.graph.vertices().collect::<Vec<_>>(), vec![3]);
        assert_eq!(contraction.graph.edge_count(), 0);
        assert!(contraction.matching.is_empty());
        Ok(())
    }

    #[test]
    fn contraction_should_repoint_crossing_edges() -> anyhow::Result<()> {
        let edges = [(0, 1), (1, 2), (2, 0), (2, 3), (3, 6), (1, 4), (4, 5)];
        let graph = Graph::from_edges(7, edges)?;
        let matching = Matching::from_edges([(1, 2), (4, 5), (3, 6)])?;
        let contraction = contract(&graph, &matching)?;

        assert_eq!(contraction.blossom.cycle(), &[0, 2, 1]);
        assert_eq!(contraction.blossom.pseudo(), 7);
        let vertices: Vec<_> = contraction.graph.vertices().collect();
        assert_eq!(vertices, vec![3, 4, 5, 6, 7]);

        let mut edges = contraction.graph.edges().to_vec();
        edges.sort_unstable();
        let expected = vec![Edge::new(3, 6), Edge::new(3, 7), Edge::new(4, 5), Edge::new(4, 7)];
        assert_eq!(edges, expected);

        let matched: Vec<_> = contraction.matching.edges().collect();
        assert_eq!(matched, vec![Edge::new(3, 6), Edge::new(4, 5)]);

        // The caller's instance is untouched.
        assert_eq!(graph.edge_count(), 7);
        assert_eq!(matching.len(), 3);
        Ok(())
    }

    #[test]
    fn matched_base_should_be_repointed() -> anyhow::Result<()> {
        // Stem 0-1=2 leading to the triangle 2-3-4 with 3-4 matched.
        let graph = Graph::from_edges(5, [(0, 1), (1, 2), (2, 3), (3, 4), (4, 2)])?;
        let matching = Matching::from_edges([(1, 2), (3, 4)])?;
        let contraction = contract(&graph, &matching)?;

        assert_eq!(contraction.blossom.cycle(), &[2, 4, 3]);
        assert_eq!(contraction.blossom.base(), 2);
        let pseudo = contraction.blossom.pseudo();
        assert_eq!(pseudo, 5);
        assert_eq!(contraction.graph.edges(), &[Edge::new(0, 1), Edge::new(1, 5)]);
        assert!(contraction.matching.contains(1, pseudo));
        assert_eq!(contraction.matching.len(), 1);
        assert!(contraction.matching.is_valid(&contraction.graph));
        Ok(())
    }

    #[test]
    fn path_avoiding_blossom_should_be_unchanged() -> anyhow::Result<()> {
        let (graph, matching, contraction) = matched_triangle()?;
        let path = AugmentingPath::new(vec![5, 1]);
        assert_eq!(contraction.lift(&graph, &matching, &path)?, path);
        Ok(())
    }

    #[test]
    fn lift_should_enter_through_base_when_possible() -> anyhow::Result<()> {
        let (graph, matching, contraction) = matched_triangle()?;

        let lifted = contraction.lift(&graph, &matching, &AugmentingPath::new(vec![5, 7, 3, 4]))?;
        assert_eq!(lifted.vertices(), &[5, 0, 3, 4]);
        let lifted = contraction.lift(&graph, &matching, &AugmentingPath::new(vec![4, 3, 7, 5]))?;
        assert_eq!(lifted.vertices(), &[5, 0, 3, 4]);
        Ok(())
    }

    #[test]
    fn lift_should_leave_through_base_after_entering_elsewhere() -> anyhow::Result<()> {
        let (graph, matching, contraction) = matched_triangle()?;

        let lifted = contraction.lift(&graph, &matching, &AugmentingPath::new(vec![6, 7, 3, 4]))?;
        assert_eq!(lifted.vertices(), &[6, 2, 1, 0, 3, 4]);
        assert!(lifted.check(&graph, &matching).is_ok());
        Ok(())
    }

    #[test]
    fn lift_should_walk_even_arc_to_exposed_base() -> anyhow::Result<()> {
        // Blossom 0-1-2-3-4 with 1-2 and 3-4 matched, exposed 5 hanging on 3.
        let edges = [(0, 1), (1, 2), (2, 3), (3, 4), (4, 0), (3, 5)];
        let graph = Graph::from_edges(6, edges)?;
        let matching = Matching::from_edges([(1, 2), (3, 4)])?;
        let contraction = Contraction {
            graph: Graph::from_edges(7, [(5, 6)])?,
            matching: Matching::new(),
            blossom: Blossom {
                cycle: vec![0, 1, 2, 3, 4],
                pseudo: 6,
            },
        };

        let lifted = contraction.lift(&graph, &matching, &AugmentingPath::new(vec![5, 6]))?;
        assert_eq!(lifted.vertices(), &[5, 3, 4, 0]);
        let lifted = contraction.lift(&graph, &matching, &AugmentingPath::new(vec![6, 5]))?;
        assert_eq!(lifted.vertices(), &[5, 3, 4, 0]);
        Ok(())
    }

    #[test]
    fn arc_should_have_even_length() {
        let blossom = Blossom {
            cycle: vec![10, 11, 12, 13, 14],
            pseudo: 15,
        };
        assert_eq!(blossom.arc_to_base(10), Some(vec![10]));
        assert_eq!(blossom.arc_to_base(11), Some(vec![11, 12, 13, 14, 10]));
        assert_eq!(blossom.arc_to_base(12), Some(vec![12, 11, 10]));
        assert_eq!(blossom.arc_to_base(13), Some(vec![13, 14, 10]));
        assert_eq!(blossom.arc_to_base(14), Some(vec![14, 13, 12, 11, 10]));
        assert_eq!(blossom.arc_to_base(9), None);
    }

    #[test]
    fn lift_without_entry_edge_should_be_inconclusive() -> anyhow::Result<()> {
        let graph = Graph::from_edges(5, [(0, 1), (1, 2), (2, 0), (3, 4)])?;
        let matching = Matching::from_edges([(1, 2)])?;
        let contraction = Contraction {
            graph: Graph::from_edges(6, [(3, 5), (3, 4)])?,
            matching: Matching::new(),
            blossom: Blossom {
                cycle: vec![0, 1, 2],
                pseudo: 5,
            },
        };

        let result = contraction.lift(&graph, &matching, &AugmentingPath::new(vec![3, 5]));
        let expected = Error::InconclusiveLift {
            pseudo: 5,
            blossom: vec![0, 1, 2],
            path: vec![3, 5],
        };
        assert_eq!(result, Err(expected));
        Ok(())
    }

    #[test]
    fn lift_with_exit_off_base_should_be_inconclusive() -> anyhow::Result<()> {
        let (graph, matching, contraction) = matched_triangle()?;

        // The pseudo-vertex is matched to 3, yet the path ends there as if it were exposed.
        let path = AugmentingPath::new(vec![4, 3, 5, 7]);
        let result = contraction.lift(&graph, &matching, &path);
        assert!(matches!(result, Err(Error::InconclusiveLift { pseudo: 7, .. })));

        // Neither neighbor on the path is the partner of the pseudo-vertex.
        let path = AugmentingPath::new(vec![6, 7, 5, 1]);
        let result = contraction.lift(&graph, &matching, &path);
        assert!(matches!(result, Err(Error::InconclusiveLift { pseudo: 7, .. })));
        Ok(())
    }
}
