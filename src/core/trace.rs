use super::AugmentingPath;
use serde::Serialize;

/// A recorded step of a matching computation.
/// Steps of nested contractions carry the depth of the graph they were taken in, 0 being the
/// input graph.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    /// The computation starts from a seed matching of the given size.
    Seed { size: usize },
    /// The matching was grown along the path.
    Augment { path: AugmentingPath, size: usize },
    /// A blossom was contracted into a pseudo-vertex.
    Contract {
        depth: usize,
        base: usize,
        blossom: Vec<usize>,
        pseudo: usize,
    },
    /// A path of a reduced graph was lifted through its pseudo-vertex.
    Lift {
        depth: usize,
        pseudo: usize,
        path: AugmentingPath,
    },
    /// No augmenting path remains.
    Finish { size: usize },
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn steps_should_serialize_with_kind() -> anyhow::Result<()> {
        let step = Step::Augment {
            path: AugmentingPath::new(vec![0, 1]),
            size: 1,
        };
        let json = crate::data::to_string(&step)?;
        assert_eq!(json, r#"{"kind":"augment","path":[0,1],"size":1}"#);
        let json = crate::data::to_string(&Step::Finish { size: 3 })?;
        assert_eq!(json, r#"{"kind":"finish","size":3}"#);
        Ok(())
    }
}
