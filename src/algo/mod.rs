mod blossom;
mod checker;
mod edmonds;
mod forest;
mod gabow;

pub use blossom::{Blossom, Contraction};
pub use checker::{check, validate, Verdict};
pub use edmonds::{find_augmenting_path, maximum_matching, traced_maximum_matching, Edmonds};
pub use forest::{build, BlossomDescriptor, Forest, Node, Search};
pub use gabow::{gabow, reference_maximum_matching_size, Gabow};

/// Every matcher of the crate, registered next to its implementation.
#[allow(unsafe_code)]
#[linkme::distributed_slice]
pub static MATCHERS: [fn() -> Box<dyn crate::core::Matcher>];
