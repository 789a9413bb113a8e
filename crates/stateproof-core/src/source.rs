//! Single-leaf proofs as supplied by the state layer.

use crate::hash::Hash;

/// One sibling of a [`SourceProof`], in the state layer's convention.
///
/// `is_left` is set when the node on the proven path is the left child at
/// this level, i.e. the sibling sits to its right. This is the complement of
/// [`crate::path::SiblingNode::is_left`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiblingHash {
    pub is_left: bool,
    pub hash: Hash,
}

impl SiblingHash {
    pub fn new(is_left: bool, hash: Hash) -> Self {
        Self { is_left, hash }
    }
}

/// Inclusion proof for one leaf, owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceProof {
    /// Raw leaf item bytes (unhashed)
    pub leaf_item: Vec<u8>,

    /// Siblings ordered nearest-the-leaf first
    pub siblings: Vec<SiblingHash>,

    /// Leaf digest, then each ancestor up to and including the root.
    /// May be empty when the caller does not have the chain at hand.
    pub ancestor_hashes: Vec<Hash>,
}

impl SourceProof {
    pub fn new(
        leaf_item: impl Into<Vec<u8>>,
        siblings: Vec<SiblingHash>,
        ancestor_hashes: Vec<Hash>,
    ) -> Self {
        Self {
            leaf_item: leaf_item.into(),
            siblings,
            ancestor_hashes,
        }
    }

    /// The root this proof claims, if it carries an ancestor chain.
    pub fn stated_root(&self) -> Option<&Hash> {
        self.ancestor_hashes.last()
    }
}
