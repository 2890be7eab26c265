use super::blossom::Contraction;
use super::forest::{build, Search};
use crate::core::{AugmentingPath, Error, Graph, Matcher, Matching, Step};
use log::debug;

/// Searches for an augmenting path, contracting blossoms recursively.
///
/// A blossom met before any augmenting path is contracted and the search continues in the
/// reduced graph. A path found there is lifted back through the blossom. Every level works on
/// its own reduced graph and matching; `graph` and `matching` are never modified.
///
/// # Errors
/// - If a blossom cannot be contracted or a path cannot be lifted back.
pub fn find_augmenting_path(
    graph: &Graph,
    matching: &Matching,
    steps: &mut Vec<Step>,
    depth: usize,
) -> Result<Option<AugmentingPath>, Error> {
    let descriptor = match build(graph, matching) {
        Search::Augmenting(path) => return Ok(Some(path)),
        Search::Exhausted => return Ok(None),
        Search::Blossom(descriptor) => descriptor,
    };

    let contraction = Contraction::new(graph, matching, &descriptor)?;
    let blossom = &contraction.blossom;
    steps.push(Step::Contract {
        depth,
        base: blossom.base(),
        blossom: blossom.cycle().to_vec(),
        pseudo: blossom.pseudo(),
    });

    let reduced = find_augmenting_path(&contraction.graph, &contraction.matching, steps, depth + 1)?;
    let Some(path) = reduced else {
        return Ok(None);
    };

    let lifted = contraction.lift(graph, matching, &path)?;
    steps.push(Step::Lift {
        depth,
        pseudo: blossom.pseudo(),
        path: lifted.clone(),
    });
    Ok(Some(lifted))
}

/// Computes a maximum matching of the graph starting from the seed, recording every step.
///
/// # Errors
/// - If the seed is not a valid matching of the graph. Nothing is recorded in this case.
/// - If a blossom lift is inconclusive. The computation is aborted without a partial result.
pub fn traced_maximum_matching(graph: &Graph, seed: &Matching, steps: &mut Vec<Step>) -> Result<Matching, Error> {
    seed.validate(graph)?;

    let mut matching = seed.clone();
    steps.push(Step::Seed { size: matching.len() });

    while let Some(path) = find_augmenting_path(graph, &matching, steps, 0)? {
        matching.toggle(&path)?;
        debug!("Augmented along {:?} to {} edges", path.vertices(), matching.len());
        steps.push(Step::Augment {
            path,
            size: matching.len(),
        });
    }

    steps.push(Step::Finish { size: matching.len() });
    Ok(matching)
}

/// Computes a maximum matching of the graph starting from the seed.
///
/// # Errors
/// - If the seed is not a valid matching of the graph.
/// - If a blossom lift is inconclusive.
pub fn maximum_matching(graph: &Graph, seed: &Matching) -> Result<Matching, Error> {
    traced_maximum_matching(graph, seed, &mut Vec::new())
}

/// Edmonds' blossom algorithm with explicit contraction of blossoms into pseudo-vertices.
#[derive(Clone, Debug, Default)]
pub struct Edmonds {
    steps: Vec<Step>,
}

impl Matcher for Edmonds {
    fn matching(&mut self, graph: &Graph, seed: &Matching) -> Result<Matching, Error> {
        self.steps.clear();
        traced_maximum_matching(graph, seed, &mut self.steps)
    }

    fn name(&self) -> &'static str {
        "Edmonds"
    }

    fn steps(&self) -> &[Step] {
        &self.steps
    }
}

#[allow(unsafe_code)]
#[linkme::distributed_slice(super::MATCHERS)]
static INSTANCE: fn() -> Box<dyn Matcher> = || Box::<Edmonds>::default();
