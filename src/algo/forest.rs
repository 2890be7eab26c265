use crate::core::{AugmentingPath, Edge, Graph, Matching};
use ahash::{HashSet, HashSetExt};
use log::trace;
use std::collections::VecDeque;

/// Position of a vertex in the alternating forest.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Node {
    pub parent: usize,
    pub root: usize,
    pub layer: usize,
}

impl Node {
    /// Returns whether the vertex is outer (even layer).
    #[must_use]
    pub const fn is_outer(&self) -> bool {
        self.layer % 2 == 0
    }
}

/// Alternating forest grown from every exposed vertex.
/// Roots are their own parents. Even layers are reached through matched edges and odd layers
/// through unmatched ones.
#[derive(Clone, Debug)]
pub struct Forest {
    nodes: Vec<Option<Node>>,
}

impl Forest {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: vec![None; capacity],
        }
    }

    fn plant(&mut self, root: usize) {
        self.nodes[root] = Some(Node {
            parent: root,
            root,
            layer: 0,
        });
    }

    fn attach(&mut self, child: usize, parent: Node, parent_id: usize) -> Node {
        let node = Node {
            parent: parent_id,
            root: parent.root,
            layer: parent.layer + 1,
        };
        self.nodes[child] = Some(node);
        node
    }

    /// Returns the forest node of a vertex, if it was reached.
    #[must_use]
    pub fn node(&self, vertex: usize) -> Option<Node> {
        self.nodes.get(vertex).copied().flatten()
    }

    /// Returns the vertices from `vertex` up to its root, both included.
    /// Returns an empty path for vertices outside of the forest.
    #[must_use]
    pub fn path_to_root(&self, mut vertex: usize) -> Vec<usize> {
        let mut path = Vec::new();
        while let Some(node) = self.node(vertex) {
            path.push(vertex);
            if node.parent == vertex {
                break;
            }
            vertex = node.parent;
        }
        path
    }
}

/// Two outer vertices of the same tree joined by an unmatched edge.
/// Together with the tree paths to their common ancestor they close an odd cycle.
#[derive(Clone, Debug)]
pub struct BlossomDescriptor {
    pub v: usize,
    pub w: usize,
    pub forest: Forest,
}

/// Outcome of growing an alternating forest.
#[derive(Clone, Debug)]
pub enum Search {
    /// An augmenting path between two different trees.
    Augmenting(AugmentingPath),
    /// No augmenting path was seen, but the first blossom found is returned for contraction.
    Blossom(BlossomDescriptor),
    /// Neither an augmenting path nor a blossom exists.
    Exhausted,
}

/// Grows an alternating forest breadth-first from all exposed vertices.
///
/// The first augmenting path found ends the search. A blossom is only remembered and returned
/// once the whole forest is grown without finding an augmenting path.
pub fn build(graph: &Graph, matching: &Matching) -> Search {
    let mut forest = Forest::with_capacity(graph.capacity());
    let mut queue: VecDeque<usize> = graph.vertices().filter(|&v| matching.is_exposed(v)).collect();
    for &root in &queue {
        forest.plant(root);
    }

    let mut marked = vec![false; graph.capacity()];
    let mut explored = HashSet::new();
    let mut blossom = None;

    while let Some(v) = queue.pop_front() {
        if std::mem::replace(&mut marked[v], true) {
            continue;
        }
        let Some(v_node) = forest.node(v) else {
            unreachable!("Only forest vertices are queued");
        };

        for &w in graph.neighbors(v) {
            if matching.contains(v, w) || !explored.insert(Edge::new(v, w)) {
                continue;
            }

            match forest.node(w) {
                None => {
                    let Some(x) = matching.partner(w) else {
                        unreachable!("Exposed vertices are planted as roots");
                    };
                    let w_node = forest.attach(w, v_node, v);
                    forest.attach(x, w_node, w);
                    queue.push_back(x);
                    trace!("Forest grows {v} -> {w} => {x}");
                }
                Some(w_node) if !w_node.is_outer() => {}
                Some(w_node) if w_node.root != v_node.root => {
                    let mut path = forest.path_to_root(v);
                    path.reverse();
                    path.extend(forest.path_to_root(w));
                    trace!("Augmenting path between roots {} and {}", v_node.root, w_node.root);
                    return Search::Augmenting(AugmentingPath::new(path));
                }
                Some(_) => {
                    if blossom.is_none() {
                        trace!("Blossom closed by {v}-{w} in tree {}", v_node.root);
                        blossom = Some((v, w));
                    }
                }
            }
        }
    }

    match blossom {
        Some((v, w)) => Search::Blossom(BlossomDescriptor { v, w, forest }),
        None => Search::Exhausted,
    }
}
