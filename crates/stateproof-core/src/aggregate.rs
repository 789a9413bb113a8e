//! Aggregation of single-leaf proofs into one compact bundle.
//!
//! Proofs are merged into a binary tree of path segments. Each node owns the
//! segment shared by everything beneath it, from its branch point up to its
//! parent's branch point (or the root). Shared ancestors are therefore stored
//! once, and building the bundle flattens the tree into paths linked through
//! `next_path_index`.

use tracing::debug;

use crate::bundle::ProofBundle;
use crate::error::{ProofError, ProofResult};
use crate::hash::{join_hash, to_hex, Hash};
use crate::path::{MerklePath, MerklePathBuilder, NO_NEXT_PATH};
use crate::signature::RootSigner;
use crate::source::SourceProof;

/// Arena index of the merge tree's root node.
const ROOT: usize = 0;

/// One node of the merge tree. Children are arena indices.
#[derive(Debug, Clone)]
struct MergeNode {
    path: MerklePathBuilder,
    left: Option<usize>,
    right: Option<usize>,
}

impl MergeNode {
    fn new(path: MerklePathBuilder) -> Self {
        Self {
            path,
            left: None,
            right: None,
        }
    }

    fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    fn root_hash(&self) -> Option<Hash> {
        self.path.root_hash()
    }
}

/// What a successful merge did to the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MergeOutcome {
    /// The path was already present
    Duplicate,
    /// A node was split; `shared` siblings sit above the new branch point
    Branched { shared: usize },
}

/// Builds an aggregated [`ProofBundle`] from many single-leaf proofs.
///
/// Single writer: callers serialize access to one instance.
#[derive(Debug, Clone, Default)]
pub struct ProofAggregator {
    nodes: Vec<MergeNode>,
    aggregated_root: Option<Hash>,
    signature: Option<Vec<u8>>,
}

impl ProofAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a state-layer proof.
    ///
    /// The first proof fixes the aggregate root. Later proofs must share it;
    /// their common upper segment is stored once and the divergent lower
    /// fragments link into it. Adding a proof that is already present is a
    /// no-op.
    pub fn add_proof(&mut self, proof: &SourceProof) -> ProofResult<&mut Self> {
        let path = MerklePathBuilder::from_source_proof(proof)?;
        self.add_merkle_path(path)
    }

    /// Add an already converted single-leaf path.
    pub fn add_merkle_path(&mut self, path: MerklePathBuilder) -> ProofResult<&mut Self> {
        if path.root_hash().is_none() {
            return Err(ProofError::InvalidArgument(
                "path has no leaf or start hash".into(),
            ));
        }

        if self.nodes.is_empty() {
            debug!(siblings = path.sibling_count(), "first path fixes the aggregate root");
            self.nodes.push(MergeNode::new(path));
            self.refresh_root();
            return Ok(self);
        }

        match self.merge(path)? {
            MergeOutcome::Duplicate => debug!("path already present, ignoring"),
            MergeOutcome::Branched { shared } => {
                debug!(shared, nodes = self.nodes.len(), "merged path at branch point")
            }
        }
        self.refresh_root();
        Ok(self)
    }

    /// Continue the aggregate upward past its current root.
    ///
    /// `extension` carries only siblings, ordered from the current root
    /// upward, in the same direction convention as any other path: each one
    /// is combined with the running value exactly as [`MerklePathBuilder`]
    /// folds its own siblings.
    pub fn extend_root(&mut self, extension: &MerklePathBuilder) -> ProofResult<&mut Self> {
        if self.nodes.is_empty() {
            return Err(ProofError::InvalidState(
                "cannot extend root: no existing root path".into(),
            ));
        }
        if extension.has_base_hash() {
            return Err(ProofError::InvalidArgument(
                "root extension must not contain a leaf or hash".into(),
            ));
        }
        if extension.sibling_count() == 0 {
            return Ok(self);
        }

        self.nodes[ROOT]
            .path
            .append_sibling_nodes(extension.sibling_nodes().iter().copied());
        self.refresh_root();
        debug!(levels = extension.sibling_count(), "extended aggregate root");
        Ok(self)
    }

    /// Use `signature` in the built bundle instead of the raw root bytes.
    pub fn with_signature(&mut self, signature: impl Into<Vec<u8>>) -> &mut Self {
        self.signature = Some(signature.into());
        self
    }

    /// Sign the current aggregate root with an external signer.
    pub fn sign_with<S: RootSigner + ?Sized>(&mut self, signer: &S) -> ProofResult<&mut Self> {
        let root = self.aggregated_root_hash()?;
        self.signature = Some(signer.sign(&root));
        Ok(self)
    }

    /// Current aggregate root.
    pub fn aggregated_root_hash(&self) -> ProofResult<Hash> {
        self.aggregated_root
            .ok_or_else(|| ProofError::InvalidState("no proofs have been added".into()))
    }

    /// Number of paths the built bundle will contain.
    pub fn path_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Snapshot the paths and signature into a bundle.
    ///
    /// Paths are emitted in post-order (left subtree, right subtree, node),
    /// so children precede their parent and the last path is the root.
    pub fn build(&self) -> ProofResult<ProofBundle> {
        let root = self.aggregated_root.ok_or_else(|| {
            ProofError::InvalidState(
                "at least one path must be added before building a state proof".into(),
            )
        })?;

        let mut paths = Vec::with_capacity(self.nodes.len());
        self.flatten(ROOT, &mut paths)?;

        let signature = self.signature.clone().unwrap_or_else(|| root.to_vec());
        Ok(ProofBundle::new(paths, signature))
    }

    fn refresh_root(&mut self) {
        self.aggregated_root = self.nodes.get(ROOT).and_then(MergeNode::root_hash);
    }

    /// Walk down from the root, descending while the new path matches a node's
    /// whole segment, and split the first node it diverges from.
    fn merge(&mut self, mut path: MerklePathBuilder) -> ProofResult<MergeOutcome> {
        let mut index = ROOT;
        loop {
            let node = &self.nodes[index];
            if node.root_hash() != path.root_hash() {
                return Err(ProofError::StructuralConflict(format!(
                    "cannot merge paths with different root hashes ({} vs {})",
                    short_hex(node.root_hash()),
                    short_hex(path.root_hash())
                )));
            }

            let matched = match_length(&node.path, &path);
            if matched < node.path.sibling_count() {
                self.branch_in_node(index, matched, &path)?;
                return Ok(MergeOutcome::Branched { shared: matched });
            }

            if node.is_leaf() {
                if path.sibling_count() == matched {
                    return Ok(MergeOutcome::Duplicate);
                }
                return Err(ProofError::StructuralConflict(
                    "path continues below an existing leaf".into(),
                ));
            }
            if path.sibling_count() == matched {
                return Err(ProofError::StructuralConflict(
                    "path ends at an interior branch point".into(),
                ));
            }

            // Drop the matched segment and the branch level itself
            let pruned = path.prune_from_root(matched + 1)?;
            let pruned_root = pruned.root_hash();
            let next = [node.left, node.right]
                .into_iter()
                .flatten()
                .find(|&child| self.nodes[child].root_hash() == pruned_root);

            match next {
                Some(child) => {
                    index = child;
                    path = pruned;
                }
                None => {
                    return Err(ProofError::StructuralConflict(
                        "cannot merge pruned path, it matches neither branch".into(),
                    ));
                }
            }
        }
    }

    /// Split node `index` where `path` diverges from it, `matched` siblings
    /// below the node's top.
    ///
    /// The node keeps the shared upper segment, now starting at the branch
    /// point. The node's old lower part (with its children) and the new
    /// path's lower part become its two children.
    fn branch_in_node(
        &mut self,
        index: usize,
        matched: usize,
        path: &MerklePathBuilder,
    ) -> ProofResult<()> {
        let (shared, existing, incoming, existing_is_left) = {
            let tree = &self.nodes[index].path;
            if path.sibling_count() <= matched {
                return Err(ProofError::StructuralConflict(
                    "path ends above the branch point".into(),
                ));
            }
            let tree_branch = tree.sibling_count() - 1 - matched;
            let new_branch = path.sibling_count() - 1 - matched;
            let tree_sibling = tree.sibling_nodes()[tree_branch];
            let new_sibling = path.sibling_nodes()[new_branch];

            if tree_sibling.hash.is_none()
                || new_sibling.hash.is_none()
                || tree_sibling.is_left == new_sibling.is_left
            {
                return Err(ProofError::StructuralConflict(
                    "branch siblings at match point are not each other's complement".into(),
                ));
            }

            let shared = tree.prefix_merkle_path_builder(tree_branch + 1)?;
            let existing = tree.prune_from_root(matched + 1)?;
            let incoming = path.prune_from_root(matched + 1)?;
            // A right-hand sibling means the existing fragment is the left child
            let existing_is_left = !tree_sibling.is_left;

            let branch_point = match (existing.root_hash(), incoming.root_hash()) {
                (Some(e), Some(n)) if existing_is_left => join_hash(&e, &n),
                (Some(e), Some(n)) => join_hash(&n, &e),
                _ => {
                    return Err(ProofError::StructuralConflict(
                        "branch fragments have no content".into(),
                    ));
                }
            };

            if tree.inner_node_hash(tree_branch + 1) != Some(branch_point)
                || path.inner_node_hash(new_branch + 1) != Some(branch_point)
            {
                return Err(ProofError::StructuralConflict(
                    "incompatible inner node hashes for branching at match point".into(),
                ));
            }
            (shared, existing, incoming, existing_is_left)
        };

        let existing_index = self.nodes.len();
        let incoming_index = existing_index + 1;
        let node = &self.nodes[index];
        let existing_node = MergeNode {
            path: existing,
            left: node.left,
            right: node.right,
        };
        self.nodes.push(existing_node);
        self.nodes.push(MergeNode::new(incoming));

        let node = &mut self.nodes[index];
        node.path = shared;
        if existing_is_left {
            node.left = Some(existing_index);
            node.right = Some(incoming_index);
        } else {
            node.left = Some(incoming_index);
            node.right = Some(existing_index);
        }
        Ok(())
    }

    /// Append the subtree at `index` to `out` in post-order, returning the
    /// position of the node's own path.
    fn flatten(&self, index: usize, out: &mut Vec<MerklePath>) -> ProofResult<usize> {
        let node = &self.nodes[index];
        let mut children = Vec::with_capacity(2);
        for child in [node.left, node.right].into_iter().flatten() {
            children.push(self.flatten(child, out)?);
        }

        let position = out.len();
        let link = i32::try_from(position).map_err(|_| {
            ProofError::InvalidState(format!("path index {} does not fit the wire format", position))
        })?;

        let mut path = node.path.build();
        path.next_path_index = NO_NEXT_PATH;
        out.push(path);
        for child in children {
            out[child].next_path_index = link;
        }
        Ok(position)
    }
}

/// Number of levels, counted down from the top of both paths, at which the
/// sibling and the inner hash above it agree.
fn match_length(tree: &MerklePathBuilder, path: &MerklePathBuilder) -> usize {
    let tree_siblings = tree.sibling_nodes();
    let path_siblings = path.sibling_nodes();
    let mut matched = 0;
    while matched < tree_siblings.len() && matched < path_siblings.len() {
        let t = tree_siblings.len() - 1 - matched;
        let p = path_siblings.len() - 1 - matched;
        if tree_siblings[t] != path_siblings[p]
            || tree.inner_node_hash(t + 1) != path.inner_node_hash(p + 1)
        {
            break;
        }
        matched += 1;
    }
    matched
}

fn short_hex(hash: Option<Hash>) -> String {
    match hash {
        Some(h) => to_hex(&h[..8]),
        None => "none".into(),
    }
}
