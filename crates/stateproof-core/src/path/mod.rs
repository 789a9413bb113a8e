//! Merkle authentication paths
//!
//! A path runs from a leaf (or a pre-hashed interior start point) up to some
//! ancestor, one sibling per level. Paths in an aggregated bundle link to each
//! other through `next_path_index` instead of repeating shared ancestors.

mod builder;
mod types;

pub use builder::MerklePathBuilder;
pub use types::{fold_siblings, MerklePath, PathContent, SiblingNode, NO_NEXT_PATH};
