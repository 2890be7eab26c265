mod error;
mod problem;
mod solution;
mod trace;
mod util;

pub use error::*;
pub use problem::*;
pub use solution::*;
pub use trace::*;
pub use util::*;

/// Computes maximum matchings.
pub trait Matcher {
    /// Computes a maximum matching of the graph, growing it from the given seed matching.
    ///
    /// # Errors
    /// - If the seed is not a valid matching of the graph.
    /// - If the matcher cannot vouch for the maximality of its answer.
    fn matching(&mut self, graph: &Graph, seed: &Matching) -> Result<Matching, Error>;

    /// Returns the name of the matcher.
    fn name(&self) -> &'static str;

    /// Returns the steps recorded during the last computation.
    fn steps(&self) -> &[Step] {
        &[]
    }
}
