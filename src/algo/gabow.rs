use crate::core::{Error, Graph, Matcher, Matching};
use log::trace;
use std::iter::once;

/// Edge list of a graph with every edge split into two endpoints.
/// Endpoint `2k` is the first vertex of edge `k` and `2k + 1` the second one,
/// so `p ^ 1` is always the opposite endpoint of `p`.
#[derive(Clone, Debug, Default)]
struct Network {
    edges: Vec<(usize, usize)>,
    endpoints: Vec<usize>,
    neighbors: Vec<Vec<usize>>,
}

impl Network {
    fn new(graph: &Graph) -> Self {
        let mut network = Self {
            edges: Vec::with_capacity(graph.edge_count()),
            endpoints: Vec::with_capacity(graph.edge_count() * 2),
            neighbors: vec![Vec::new(); graph.capacity()],
        };

        for edge in graph.edges() {
            let (from, to) = edge.endpoints();
            network.edges.push((from, to));
            network.neighbors[to].push(network.endpoints.len());
            network.endpoints.push(from);
            network.neighbors[from].push(network.endpoints.len());
            network.endpoints.push(to);
        }

        network
    }

    fn vertex_count(&self) -> usize {
        self.neighbors.len()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Label {
    Free,
    Outer,
    Inner,
}

/// Finds a maximum cardinality matching with Gabow's `O(n^3)` variant of Edmonds' algorithm.
/// Blossoms are kept as nested vertex sets during a stage and expanded before the next one.
/// The search starts from the seed, which must be a valid matching of the graph.
#[must_use]
pub fn gabow(graph: &Graph, seed: &Matching) -> Matching {
    if graph.edge_count() == 0 {
        return Matching::new();
    }

    let network = Network::new(graph);
    let n = network.vertex_count();

    let mut mate = vec![None; n];
    for (k, &(from, to)) in network.edges.iter().enumerate() {
        if seed.contains(from, to) {
            mate[from] = Some(2 * k + 1);
            mate[to] = Some(2 * k);
        }
    }

    let algorithm = Algorithm {
        network: &network,
        n,
        mate,
        label: vec![Label::Free; n * 2],
        label_end: vec![None; n * 2],
        breadcrumb: vec![false; n * 2],
        blossom: (0..n).collect(),
        blossom_parent: vec![None; n * 2],
        blossom_children: vec![None; n * 2],
        blossom_base: (0..n).map(Some).chain(std::iter::repeat(None).take(n)).collect(),
        blossom_endpoints: vec![None; n * 2],
        unused_blossom: (n..n * 2).collect(),
        queue: Vec::new(),
    };

    let pairs = algorithm.run().into_iter().enumerate();
    let pairs = pairs.filter_map(|(v, mate)| mate.filter(|&w| v < w).map(|w| (v, w)));
    Matching::from_edges(pairs).unwrap_or_else(|_| cannot_happen())
}

/// Returns the size of a maximum matching of the graph.
#[must_use]
pub fn reference_maximum_matching_size(graph: &Graph) -> usize {
    gabow(graph, &Matching::new()).len()
}

#[derive(Debug)]
struct Algorithm<'a> {
    network: &'a Network,
    n: usize,
    mate: Vec<Option<usize>>,
    label: Vec<Label>,
    label_end: Vec<Option<usize>>,
    breadcrumb: Vec<bool>,
    blossom: Vec<usize>,
    blossom_parent: Vec<Option<usize>>,
    blossom_children: Vec<Option<Vec<usize>>>,
    blossom_base: Vec<Option<usize>>,
    blossom_endpoints: Vec<Option<Vec<usize>>>,
    unused_blossom: Vec<usize>,
    queue: Vec<usize>,
}

impl Algorithm<'_> {
    fn children(&self, b: usize) -> &[usize] {
        self.blossom_children[b].as_deref().unwrap_or_else(cannot_happen)
    }

    fn endpoints_of(&self, b: usize) -> &[usize] {
        self.blossom_endpoints[b].as_deref().unwrap_or_else(cannot_happen)
    }

    fn assign_label(&mut self, vertex: usize, label: Label, endpoint: Option<usize>) {
        let blossom = self.blossom[vertex];

        self.label[vertex] = label;
        self.label[blossom] = label;
        self.label_end[vertex] = endpoint;
        self.label_end[blossom] = endpoint;

        match label {
            Label::Outer => {
                let leaves = blossom_leaves(blossom, self.n, &self.blossom_children);
                self.queue.extend(leaves);
            }
            Label::Inner => {
                let base = self.blossom_base[blossom].unwrap_or_else(cannot_happen);
                let mate = self.mate[base].unwrap_or_else(cannot_happen);
                self.assign_label(self.network.endpoints[mate], Label::Outer, Some(mate ^ 1));
            }
            Label::Free => {}
        }
    }

    /// Walks up from both outer vertices in turns until the paths meet.
    /// Returns the base of the new blossom, or `None` if the roots differ.
    fn scan_blossom(&mut self, v: usize, w: usize) -> Option<usize> {
        let mut path = Vec::new();
        let mut base = None;
        let mut v = Some(v);
        let mut w = Some(w);

        while let Some(vertex) = v {
            let b = self.blossom[vertex];
            if self.breadcrumb[b] {
                base = self.blossom_base[b];
                break;
            }

            path.push(b);
            self.breadcrumb[b] = true;

            v = self.label_end[b].map(|endpoint| {
                let t = self.blossom[self.network.endpoints[endpoint]];
                self.network.endpoints[self.label_end[t].unwrap_or_else(cannot_happen)]
            });

            if w.is_some() {
                std::mem::swap(&mut v, &mut w);
            }
        }

        for b in path {
            self.breadcrumb[b] = false;
        }

        base
    }

    fn add_blossom(&mut self, base: usize, edge: usize) {
        let (mut v, mut w) = self.network.edges[edge];
        let bb = self.blossom[base];
        let mut bv = self.blossom[v];
        let mut bw = self.blossom[w];

        let blossom = self.unused_blossom.pop().unwrap_or_else(cannot_happen);

        self.blossom_base[blossom] = Some(base);
        self.blossom_parent[blossom] = None;
        self.blossom_parent[bb] = Some(blossom);

        let mut path = Vec::new();
        let mut endpoints = Vec::new();

        while bv != bb {
            self.blossom_parent[bv] = Some(blossom);
            path.push(bv);

            let endpoint = self.label_end[bv].unwrap_or_else(cannot_happen);
            endpoints.push(endpoint);

            v = self.network.endpoints[endpoint];
            bv = self.blossom[v];
        }

        path.push(bb);
        path.reverse();
        endpoints.reverse();
        endpoints.push(2 * edge);

        while bw != bb {
            self.blossom_parent[bw] = Some(blossom);
            path.push(bw);

            let endpoint = self.label_end[bw].unwrap_or_else(cannot_happen);
            endpoints.push(endpoint ^ 1);

            w = self.network.endpoints[endpoint];
            bw = self.blossom[w];
        }

        trace!("Blossom {blossom} with base {base} and {} children", path.len());

        self.label[blossom] = Label::Outer;
        self.label_end[blossom] = self.label_end[bb];
        self.blossom_children[blossom] = Some(path);
        self.blossom_endpoints[blossom] = Some(endpoints);

        for v in blossom_leaves(blossom, self.n, &self.blossom_children) {
            if self.label[self.blossom[v]] == Label::Inner {
                self.queue.push(v);
            }
            self.blossom[v] = blossom;
        }
    }

    fn expand_blossom(&mut self, b: usize) {
        let children = self.blossom_children[b].take().unwrap_or_else(cannot_happen);
        for s in children {
            self.blossom_parent[s] = None;
            if s < self.n {
                self.blossom[s] = s;
            } else {
                self.expand_blossom(s);
            }
        }

        self.label[b] = Label::Free;
        self.label_end[b] = None;
        self.blossom_endpoints[b] = None;
        self.blossom_base[b] = None;
        self.unused_blossom.push(b);
    }

    /// Swaps matched and unmatched edges inside the blossom so that `vertex` becomes its base.
    fn augment_blossom(&mut self, blossom: usize, vertex: usize) {
        let mut t = vertex;
        while self.blossom_parent[t] != Some(blossom) {
            t = self.blossom_parent[t].unwrap_or_else(cannot_happen);
        }

        if t >= self.n {
            self.augment_blossom(t, vertex);
        }

        let len = self.children(blossom).len();
        let i = self.children(blossom).iter().position(|&x| x == t);
        let i = i.unwrap_or_else(cannot_happen);

        // Walk the even-length side of the cycle back to the base.
        let forward = i % 2 == 1;
        let step = |j: usize| if forward { (j + 1) % len } else { j - 1 };

        let mut j = i;
        while j != 0 {
            j = step(j);
            let p = if forward {
                self.endpoints_of(blossom)[j]
            } else {
                self.endpoints_of(blossom)[j - 1] ^ 1
            };

            let t = self.children(blossom)[j];
            if t >= self.n {
                self.augment_blossom(t, self.network.endpoints[p]);
            }

            j = step(j);

            let t = self.children(blossom)[j];
            if t >= self.n {
                self.augment_blossom(t, self.network.endpoints[p ^ 1]);
            }

            self.mate[self.network.endpoints[p]] = Some(p ^ 1);
            self.mate[self.network.endpoints[p ^ 1]] = Some(p);
        }

        let children = self.blossom_children[blossom].as_mut();
        children.unwrap_or_else(cannot_happen).rotate_left(i);
        let endpoints = self.blossom_endpoints[blossom].as_mut();
        endpoints.unwrap_or_else(cannot_happen).rotate_left(i);
        let first = self.children(blossom)[0];
        self.blossom_base[blossom] = self.blossom_base[first];
    }

    fn augment_matching(&mut self, edge: usize) {
        let (v, w) = self.network.edges[edge];
        for (mut s, mut p) in [(v, 2 * edge + 1), (w, 2 * edge)] {
            loop {
                let bs = self.blossom[s];
                if bs >= self.n {
                    self.augment_blossom(bs, s);
                }

                self.mate[s] = Some(p);

                let Some(bs_endpoint) = self.label_end[bs] else {
                    break;
                };

                let t = self.network.endpoints[bs_endpoint];
                let bt = self.blossom[t];
                let t_endpoint = self.label_end[bt].unwrap_or_else(cannot_happen);

                s = self.network.endpoints[t_endpoint];
                let j = self.network.endpoints[t_endpoint ^ 1];

                if bt >= self.n {
                    self.augment_blossom(bt, j);
                }

                self.mate[j] = self.label_end[bt];

                p = t_endpoint ^ 1;
            }
        }
    }

    /// Grows the forest from every exposed vertex until an augmenting edge is found.
    /// Returns whether the matching was augmented.
    fn stage(&mut self) -> bool {
        self.label.fill(Label::Free);
        self.queue.clear();

        for v in 0..self.n {
            if self.mate[v].is_none() && self.label[self.blossom[v]] == Label::Free {
                self.assign_label(v, Label::Outer, None);
            }
        }

        while let Some(v) = self.queue.pop() {
            for &p in &self.network.neighbors[v] {
                let k = p / 2;
                let w = self.network.endpoints[p];
                if self.blossom[v] == self.blossom[w] {
                    continue;
                }

                match self.label[self.blossom[w]] {
                    Label::Free => self.assign_label(w, Label::Inner, Some(p ^ 1)),
                    Label::Outer => {
                        if let Some(base) = self.scan_blossom(v, w) {
                            self.add_blossom(base, k);
                        } else {
                            self.augment_matching(k);
                            return true;
                        }
                    }
                    Label::Inner => {}
                }
            }
        }

        false
    }

    fn run(mut self) -> Vec<Option<usize>> {
        for stage in 0..self.n {
            if !self.stage() {
                trace!("No augmenting path in stage {stage}");
                break;
            }

            for b in self.n..self.n * 2 {
                if self.blossom_parent[b].is_none() && self.blossom_base[b].is_some() {
                    self.expand_blossom(b);
                }
            }
        }

        for vertex in 0..self.n {
            if let Some(mate) = self.mate[vertex].as_mut() {
                *mate = self.network.endpoints[*mate];
            }
        }

        self.mate
    }
}

fn cannot_happen<T>() -> T {
    unreachable!("This should not happen");
}

type BlossomIterator<'a> = Box<dyn Iterator<Item = usize> + 'a>;

fn blossom_leaves(b: usize, n: usize, children: &[Option<Vec<usize>>]) -> BlossomIterator {
    if b < n {
        Box::new(once(b))
    } else {
        let b_children = children[b].as_ref().unwrap_or_else(cannot_happen);
        Box::new(b_children.iter().flat_map(move |&t| {
            if t < n {
                Box::new(once(t))
            } else {
                blossom_leaves(t, n, children)
            }
        }))
    }
}

/// Gabow's algorithm for maximum cardinality matching.
#[derive(Clone, Debug, Default)]
pub struct Gabow;

impl Matcher for Gabow {
    fn matching(&mut self, graph: &Graph, seed: &Matching) -> Result<Matching, Error> {
        seed.validate(graph)?;
        Ok(gabow(graph, seed))
    }

    fn name(&self) -> &'static str {
        "Gabow"
    }
}

#[allow(unsafe_code)]
#[linkme::distributed_slice(super::MATCHERS)]
static INSTANCE: fn() -> Box<dyn Matcher> = || Box::new(Gabow);
