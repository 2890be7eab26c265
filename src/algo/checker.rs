use super::gabow::reference_maximum_matching_size;
use crate::core::{Graph, Matching};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result};

/// Outcome of checking a matching against an independent maximum matching computation.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Verdict {
    pub valid: bool,
    pub size: usize,
    pub reference: usize,
}

impl Verdict {
    /// Returns whether the matching is valid and as large as the reference.
    #[must_use]
    pub const fn is_maximum(&self) -> bool {
        self.valid && self.size == self.reference
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        if !self.valid {
            write!(f, "Is not matching!")
        } else if self.size == self.reference {
            write!(f, "The max matching is {}", self.size)
        } else {
            write!(f, "Got {} but the max matching is {}!", self.size, self.reference)
        }
    }
}

/// Returns whether the matching is a valid matching of the graph.
#[must_use]
pub fn validate(graph: &Graph, matching: &Matching) -> bool {
    matching.is_valid(graph)
}

/// Checks the matching against the reference maximum matching size.
/// The reference is only computed for valid matchings.
#[must_use]
pub fn check(graph: &Graph, matching: &Matching) -> Verdict {
    let valid = validate(graph, matching);
    let reference = if valid {
        reference_maximum_matching_size(graph)
    } else {
        0
    };

    Verdict {
        valid,
        size: matching.len(),
        reference,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn check_should_report_maximum() -> anyhow::Result<()> {
        let graph = Graph::from_edges(4, [(0, 1), (1, 2), (2, 3)])?;
        let verdict = check(&graph, &Matching::from_edges([(0, 1), (2, 3)])?);
        assert!(verdict.is_maximum());
        assert_eq!(verdict.to_string(), "The max matching is 2");
        Ok(())
    }

    #[test]
    fn check_should_report_smaller_matching() -> anyhow::Result<()> {
        let graph = Graph::from_edges(4, [(0, 1), (1, 2), (2, 3)])?;
        let verdict = check(&graph, &Matching::from_edges([(1, 2)])?);
        assert!(!verdict.is_maximum());
        assert_eq!(verdict.to_string(), "Got 1 but the max matching is 2!");
        Ok(())
    }

    #[test]
    fn check_should_report_invalid_matching() -> anyhow::Result<()> {
        let graph = Graph::from_edges(4, [(0, 1), (1, 2), (2, 3)])?;
        let matching = Matching::from_edges([(0, 3)])?;
        assert!(!validate(&graph, &matching));
        let verdict = check(&graph, &matching);
        assert!(!verdict.is_maximum());
        assert_eq!(verdict.to_string(), "Is not matching!");
        Ok(())
    }
}
