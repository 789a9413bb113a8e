//! Merkle path value types

use crate::hash::{join_hash, leaf_hash, single_child_hash, to_hex, Hash};
use crate::source::SiblingHash;
use std::fmt;

/// `next_path_index` of a path whose fold yields the aggregate root.
pub const NO_NEXT_PATH: i32 = -1;

/// What a path starts from. Exactly one kind, or none for an interior
/// segment whose value is derived from the paths feeding into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathContent {
    /// Raw state item bytes
    Leaf(Vec<u8>),
    /// Raw timestamp bytes
    TimestampLeaf(Vec<u8>),
    /// Pre-hashed interior starting point
    StartHash(Hash),
}

impl PathContent {
    /// The digest this content contributes at the bottom of the path.
    pub fn base_hash(&self) -> Hash {
        match self {
            PathContent::Leaf(bytes) | PathContent::TimestampLeaf(bytes) => leaf_hash(bytes),
            PathContent::StartHash(hash) => *hash,
        }
    }

    /// True for the two leaf kinds.
    pub fn is_leaf(&self) -> bool {
        !matches!(self, PathContent::StartHash(_))
    }
}

/// One level of an authentication path.
///
/// `is_left` is set when the sibling is the left operand of the join and the
/// running value the right one. A `None` hash marks a single-child level, where
/// the running value is promoted with [`single_child_hash`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiblingNode {
    pub is_left: bool,
    pub hash: Option<Hash>,
}

impl SiblingNode {
    /// Sibling on the left: `join(sibling, current)`.
    pub fn left(hash: Hash) -> Self {
        Self {
            is_left: true,
            hash: Some(hash),
        }
    }

    /// Sibling on the right: `join(current, sibling)`.
    pub fn right(hash: Hash) -> Self {
        Self {
            is_left: false,
            hash: Some(hash),
        }
    }

    /// A level with no sibling at all.
    pub fn single_child() -> Self {
        Self {
            is_left: false,
            hash: None,
        }
    }

    /// Convert from the state layer's convention. The direction flag is
    /// inverted here and nowhere else.
    pub fn from_source(sibling: &SiblingHash) -> Self {
        Self {
            is_left: !sibling.is_left,
            hash: Some(sibling.hash),
        }
    }

    /// Combine the running value with this sibling.
    pub fn combine(&self, current: &Hash) -> Hash {
        match &self.hash {
            None => single_child_hash(current),
            Some(sibling) if self.is_left => join_hash(sibling, current),
            Some(sibling) => join_hash(current, sibling),
        }
    }
}

impl fmt::Display for SiblingNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.hash {
            None => write!(f, "single-child"),
            Some(hash) => {
                let side = if self.is_left { "L" } else { "R" };
                write!(f, "{}:{}", side, to_hex(&hash[..8]))
            }
        }
    }
}

/// Fold a starting digest upward through `siblings`, nearest first.
pub fn fold_siblings(start: Hash, siblings: &[SiblingNode]) -> Hash {
    siblings
        .iter()
        .fold(start, |current, sibling| sibling.combine(&current))
}

/// Immutable snapshot of one authentication path inside a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerklePath {
    pub content: Option<PathContent>,
    /// Nearest-the-leaf first
    pub siblings: Vec<SiblingNode>,
    /// [`NO_NEXT_PATH`] or the index of the path this one feeds into
    pub next_path_index: i32,
}

impl MerklePath {
    /// True if the path starts from a leaf or timestamp leaf.
    pub fn has_leaf(&self) -> bool {
        self.content.as_ref().is_some_and(PathContent::is_leaf)
    }

    /// True if this path's fold is the aggregate root.
    pub fn is_terminal(&self) -> bool {
        self.next_path_index == NO_NEXT_PATH
    }

    /// Digest contributed by the content, if any.
    pub fn base_hash(&self) -> Option<Hash> {
        self.content.as_ref().map(PathContent::base_hash)
    }

    /// Fold of the content through all siblings, if the path has content.
    pub fn root_hash(&self) -> Option<Hash> {
        self.base_hash()
            .map(|base| fold_siblings(base, &self.siblings))
    }
}
