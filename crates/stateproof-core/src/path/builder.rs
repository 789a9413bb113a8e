//! Incremental builder for a single Merkle path.

use tracing::warn;

use super::types::{fold_siblings, MerklePath, PathContent, SiblingNode, NO_NEXT_PATH};
use crate::error::{ProofError, ProofResult};
use crate::hash::{join_hash, single_child_hash, to_hex, Hash};
use crate::source::SourceProof;

/// Builder for one authentication path, later merged into an aggregate.
///
/// Siblings are kept nearest-the-leaf first. Alongside them the builder keeps
/// every intermediate digest: index 0 is the base (leaf hash or start hash),
/// the last entry is the root. The cache is rebuilt whenever the content or
/// sibling list is replaced and extended in place on append, so any ancestor
/// is available without refolding while paths are being merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerklePathBuilder {
    content: Option<PathContent>,
    siblings: Vec<SiblingNode>,
    inner_hashes: Vec<Hash>,
    next_path_index: i32,
}

impl Default for MerklePathBuilder {
    fn default() -> Self {
        Self {
            content: None,
            siblings: Vec::new(),
            inner_hashes: Vec::new(),
            next_path_index: NO_NEXT_PATH,
        }
    }
}

impl MerklePathBuilder {
    /// An empty builder. Set a leaf or start hash before reading hashes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a state-layer proof, inverting each sibling's direction flag.
    ///
    /// If the proof carries an ancestor chain whose root agrees with the root
    /// implied by leaf and siblings, that chain becomes the cached inner hash
    /// list. Keeping the caller's intermediate digests lets a later merge
    /// notice a chain that disagrees with another proof at the branch point.
    pub fn from_source_proof(proof: &SourceProof) -> ProofResult<Self> {
        let mut builder = Self::new();
        builder
            .set_sibling_nodes(proof.siblings.iter().map(SiblingNode::from_source).collect())
            .set_leaf(proof.leaf_item.clone());

        let chain = &proof.ancestor_hashes;
        if chain.is_empty() {
            return Ok(builder);
        }

        let expected = builder.siblings.len() + 1;
        if chain.len() != expected {
            return Err(ProofError::InvalidArgument(format!(
                "ancestor chain has {} hashes, expected {}",
                chain.len(),
                expected
            )));
        }

        if chain.last() == builder.inner_hashes.last() {
            builder.inner_hashes = chain.clone();
        } else {
            warn!(
                stated_root = %to_hex(chain[chain.len() - 1].as_slice()),
                "source proof root does not match leaf and siblings, ignoring ancestor chain"
            );
        }
        Ok(builder)
    }

    /// Set a state item leaf. Clears any other content kind.
    pub fn set_leaf(&mut self, leaf: impl Into<Vec<u8>>) -> &mut Self {
        self.set_content(PathContent::Leaf(leaf.into()))
    }

    /// Set a timestamp leaf. Clears any other content kind.
    pub fn set_timestamp_leaf(&mut self, leaf: impl Into<Vec<u8>>) -> &mut Self {
        self.set_content(PathContent::TimestampLeaf(leaf.into()))
    }

    /// Start from a pre-computed interior digest. Clears any leaf.
    pub fn set_start_hash(&mut self, hash: Hash) -> &mut Self {
        self.set_content(PathContent::StartHash(hash))
    }

    /// Same as [`set_start_hash`](Self::set_start_hash); used when building
    /// ancestor-only paths from scratch.
    pub fn set_hash(&mut self, hash: Hash) -> &mut Self {
        self.set_start_hash(hash)
    }

    fn set_content(&mut self, content: PathContent) -> &mut Self {
        self.content = Some(content);
        self.recompute_inner_hashes();
        self
    }

    /// Replace the sibling list (leaf to root order).
    pub fn set_sibling_nodes(&mut self, siblings: Vec<SiblingNode>) -> &mut Self {
        self.siblings = siblings;
        self.recompute_inner_hashes();
        self
    }

    /// Append one sibling above the current root.
    pub fn append_sibling_node(&mut self, sibling: SiblingNode) -> &mut Self {
        self.append_sibling_nodes([sibling])
    }

    /// Append siblings above the current root, continuing leaf to root order.
    pub fn append_sibling_nodes(
        &mut self,
        siblings: impl IntoIterator<Item = SiblingNode>,
    ) -> &mut Self {
        for sibling in siblings {
            if let Some(current) = self.inner_hashes.last() {
                let next = sibling.combine(current);
                self.inner_hashes.push(next);
            }
            self.siblings.push(sibling);
        }
        self
    }

    pub fn set_next_path_index(&mut self, index: i32) -> &mut Self {
        self.next_path_index = index;
        self
    }

    pub fn next_path_index(&self) -> i32 {
        self.next_path_index
    }

    pub fn content(&self) -> Option<&PathContent> {
        self.content.as_ref()
    }

    pub fn sibling_nodes(&self) -> &[SiblingNode] {
        &self.siblings
    }

    pub fn sibling_count(&self) -> usize {
        self.siblings.len()
    }

    /// True if the path starts from a leaf or timestamp leaf. A start-hash
    /// builder reports false.
    pub fn has_leaf(&self) -> bool {
        self.content.as_ref().is_some_and(PathContent::is_leaf)
    }

    /// True if any content kind is set.
    pub fn has_base_hash(&self) -> bool {
        self.content.is_some()
    }

    /// Root reached by folding the content through every sibling.
    /// `None` until some content is set.
    pub fn root_hash(&self) -> Option<Hash> {
        self.inner_hashes.last().copied()
    }

    /// Intermediate digest `index` levels above the base (0 is the base).
    pub fn inner_node_hash(&self, index: usize) -> Option<Hash> {
        self.inner_hashes.get(index).copied()
    }

    /// All cached digests, base first and root last.
    pub fn inner_node_hashes(&self) -> &[Hash] {
        &self.inner_hashes
    }

    /// New leafless builder for the ascent from `depth` levels above the base
    /// to the same root.
    ///
    /// Its start hash is the digest after folding the first `depth` siblings,
    /// and it keeps the siblings from index `depth` onward.
    pub fn prefix_merkle_path_builder(&self, depth: usize) -> ProofResult<Self> {
        if depth > self.siblings.len() {
            return Err(ProofError::InvalidArgument(format!(
                "prefix depth {} exceeds {} siblings",
                depth,
                self.siblings.len()
            )));
        }
        let start = self.inner_node_hash(depth).ok_or_else(|| {
            ProofError::InvalidState("cannot take a prefix of a path without content".into())
        })?;

        let mut prefix = Self::new();
        prefix
            .set_start_hash(start)
            .set_sibling_nodes(self.siblings[depth..].to_vec());
        Ok(prefix)
    }

    /// New builder with the same content and the `depth` root-most siblings
    /// dropped: the leaf-side fragment below a shared branch point.
    pub fn prune_from_root(&self, depth: usize) -> ProofResult<Self> {
        if depth > self.siblings.len() {
            return Err(ProofError::InvalidArgument(format!(
                "cannot prune {} siblings from a path of {}",
                depth,
                self.siblings.len()
            )));
        }
        let keep = self.siblings.len() - depth;

        let mut pruned = Self::new();
        pruned.content = self.content.clone();
        pruned.set_sibling_nodes(self.siblings[..keep].to_vec());
        Ok(pruned)
    }

    /// Root this path would reach if its base were the parent of `child` alone.
    pub fn compute_root_hash_from_single_child(&self, child: &Hash) -> Hash {
        self.fold_from(single_child_hash(child))
    }

    /// Root this path would reach if its base were `join(left, right)`.
    pub fn compute_root_hash_from_both_children(&self, left: &Hash, right: &Hash) -> Hash {
        self.fold_from(join_hash(left, right))
    }

    /// Snapshot into an immutable path. Repeated calls yield equal paths.
    pub fn build(&self) -> MerklePath {
        MerklePath {
            content: self.content.clone(),
            siblings: self.siblings.clone(),
            next_path_index: self.next_path_index,
        }
    }

    fn fold_from(&self, base: Hash) -> Hash {
        fold_siblings(base, &self.siblings)
    }

    fn recompute_inner_hashes(&mut self) {
        self.inner_hashes.clear();
        let Some(content) = &self.content else {
            return;
        };
        let mut current = content.base_hash();
        self.inner_hashes.reserve(self.siblings.len() + 1);
        self.inner_hashes.push(current);
        for sibling in &self.siblings {
            current = sibling.combine(&current);
            self.inner_hashes.push(current);
        }
    }
}
