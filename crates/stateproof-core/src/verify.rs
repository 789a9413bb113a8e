//! Recomputation and checking of aggregated proofs.

use std::collections::VecDeque;

use tracing::debug;

use crate::bundle::ProofBundle;
use crate::config::ProofLimits;
use crate::error::{ProofError, ProofResult};
use crate::hash::{join_hash, single_child_hash, to_hex, Hash};
use crate::path::{fold_siblings, MerklePath, PathContent, NO_NEXT_PATH};
use crate::signature::{SelfAttesting, SignatureVerifier};

/// Verifier for [`ProofBundle`]s.
///
/// The root is rebuilt from the paths alone: leaf paths fold their leaf hash
/// through their siblings, interior paths start from the join of the paths
/// that link into them. The result is then handed to the signature verifier.
///
/// Structural problems (empty bundle, dangling or cyclic links, paths with
/// nothing to fold) are errors. A bundle that is well formed but does not
/// reproduce its root or signature verifies as `Ok(false)`.
///
/// # Example
///
/// ```rust
/// use stateproof_core::{ProofAggregator, ProofVerifier, SiblingHash, SourceProof};
/// use stateproof_core::hash::{join_hash, leaf_hash};
///
/// let sibling = leaf_hash(b"neighbour");
/// let root = join_hash(&leaf_hash(b"item"), &sibling);
/// let proof = SourceProof::new(b"item".to_vec(), vec![SiblingHash::new(true, sibling)], vec![]);
///
/// let mut aggregator = ProofAggregator::new();
/// aggregator.add_proof(&proof).unwrap();
/// let bundle = aggregator.build().unwrap();
///
/// let verifier = ProofVerifier::new();
/// assert!(verifier.verify(&bundle).unwrap());
/// assert!(verifier.verify_against_root(&bundle, &root).unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProofVerifier<V = SelfAttesting> {
    limits: ProofLimits,
    signatures: V,
}

impl ProofVerifier<SelfAttesting> {
    /// Verifier for self-attesting bundles (signature = root bytes).
    pub fn new() -> Self {
        Self::default()
    }
}

impl<V: SignatureVerifier> ProofVerifier<V> {
    /// Verifier that delegates signature checks to an external collaborator.
    pub fn with_signature_verifier(signatures: V) -> Self {
        Self {
            limits: ProofLimits::default(),
            signatures,
        }
    }

    pub fn with_limits(mut self, limits: ProofLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> &ProofLimits {
        &self.limits
    }

    /// Verify a bundle against its own signature.
    pub fn verify(&self, bundle: &ProofBundle) -> ProofResult<bool> {
        if !bundle.has_signature() {
            debug!("bundle carries no signature");
            return Ok(false);
        }

        let Some(root) = self.compute_root_hash(bundle.paths())? else {
            return Ok(false);
        };

        let valid = self.signatures.verify(&root, bundle.signature());
        if !valid {
            debug!(root = %to_hex(&root), "signature does not match recomputed root");
        }
        Ok(valid)
    }

    /// Verify a bundle against a caller-supplied root, ignoring its signature.
    pub fn verify_against_root(
        &self,
        bundle: &ProofBundle,
        expected_root: &[u8],
    ) -> ProofResult<bool> {
        Ok(self
            .compute_root_hash(bundle.paths())?
            .is_some_and(|root| root.as_slice() == expected_root))
    }

    /// Rebuild the aggregate root from `paths`.
    ///
    /// Returns `Ok(None)` when the paths are well formed but inconsistent: an
    /// interior start hash that its children do not reproduce, or terminal
    /// paths that disagree on the root.
    pub fn compute_root_hash(&self, paths: &[MerklePath]) -> ProofResult<Option<Hash>> {
        let children = self.link_children(paths)?;

        // Kahn's algorithm over child -> parent links; children always
        // resolve before the path they feed into.
        let mut pending: Vec<usize> = children.iter().map(Vec::len).collect();
        let mut ready: VecDeque<usize> = (0..paths.len()).filter(|&i| pending[i] == 0).collect();
        let mut folded: Vec<Option<Hash>> = vec![None; paths.len()];
        let mut resolved = 0;

        while let Some(index) = ready.pop_front() {
            resolved += 1;
            let path = &paths[index];

            let base = match children[index].as_slice() {
                [] => path.base_hash().ok_or_else(|| no_content(index))?,
                [only] => single_child_hash(&resolved_hash(&folded, *only)?),
                [left, right] => join_hash(
                    &resolved_hash(&folded, *left)?,
                    &resolved_hash(&folded, *right)?,
                ),
                more => {
                    return Err(ProofError::MalformedBundle(format!(
                        "path {} has {} children, expected at most 2",
                        index,
                        more.len()
                    )));
                }
            };

            if !children[index].is_empty() {
                if let Some(PathContent::StartHash(declared)) = &path.content {
                    if declared != &base {
                        debug!(path = index, "start hash is not reproduced by its children");
                        return Ok(None);
                    }
                }
            }

            folded[index] = Some(fold_siblings(base, &path.siblings));

            if path.next_path_index != NO_NEXT_PATH {
                let parent = path.next_path_index as usize;
                pending[parent] -= 1;
                if pending[parent] == 0 {
                    ready.push_back(parent);
                }
            }
        }

        if resolved < paths.len() {
            return Err(ProofError::MalformedBundle(
                "cycle in next_path_index links".into(),
            ));
        }

        let mut roots = paths
            .iter()
            .zip(&folded)
            .filter(|(path, _)| path.is_terminal())
            .map(|(_, hash)| *hash);

        let Some(first) = roots.next().flatten() else {
            return Err(ProofError::MalformedBundle("no terminal path".into()));
        };
        if roots.any(|other| other != Some(first)) {
            debug!("terminal paths disagree on the root");
            return Ok(None);
        }
        Ok(Some(first))
    }

    /// Validate links and shape, returning each path's children in index order.
    fn link_children(&self, paths: &[MerklePath]) -> ProofResult<Vec<Vec<usize>>> {
        if paths.is_empty() {
            return Err(ProofError::MalformedBundle(
                "cannot compute root hash from empty path list".into(),
            ));
        }
        if paths.len() > self.limits.max_paths {
            return Err(ProofError::MalformedBundle(format!(
                "{} paths exceed the limit of {}",
                paths.len(),
                self.limits.max_paths
            )));
        }

        let mut children = vec![Vec::new(); paths.len()];
        for (index, path) in paths.iter().enumerate() {
            if path.siblings.len() > self.limits.max_siblings_per_path {
                return Err(ProofError::MalformedBundle(format!(
                    "path {} has {} siblings, limit is {}",
                    index,
                    path.siblings.len(),
                    self.limits.max_siblings_per_path
                )));
            }
            match path.next_path_index {
                NO_NEXT_PATH => {}
                next if next >= 0 && (next as usize) < paths.len() && next as usize != index => {
                    children[next as usize].push(index);
                }
                next => {
                    return Err(ProofError::MalformedBundle(format!(
                        "path {} links to invalid index {}",
                        index, next
                    )));
                }
            }
        }

        for (index, kids) in children.iter().enumerate() {
            if kids.len() > 2 {
                return Err(ProofError::MalformedBundle(format!(
                    "path {} has {} children, expected at most 2",
                    index,
                    kids.len()
                )));
            }
            if !kids.is_empty() && paths[index].has_leaf() {
                return Err(ProofError::MalformedBundle(format!(
                    "leaf path {} cannot have children",
                    index
                )));
            }
            if kids.is_empty() && paths[index].content.is_none() {
                return Err(no_content(index));
            }
        }
        Ok(children)
    }
}

fn no_content(index: usize) -> ProofError {
    ProofError::MalformedBundle(format!("path {} has no leaf or start hash", index))
}

fn resolved_hash(folded: &[Option<Hash>], index: usize) -> ProofResult<Hash> {
    folded[index].ok_or_else(|| {
        ProofError::MalformedBundle(format!("path {} was not resolved before its parent", index))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::leaf_hash;
    use crate::path::SiblingNode;

    fn leaf_path(item: &[u8], siblings: Vec<SiblingNode>, next: i32) -> MerklePath {
        MerklePath {
            content: Some(PathContent::Leaf(item.to_vec())),
            siblings,
            next_path_index: next,
        }
    }

    fn interior_path(start: Option<Hash>, next: i32) -> MerklePath {
        MerklePath {
            content: start.map(PathContent::StartHash),
            siblings: vec![],
            next_path_index: next,
        }
    }

    /// Two leaves joined under one interior path.
    fn pair_bundle() -> (Vec<MerklePath>, Hash) {
        let root = join_hash(&leaf_hash(b"a"), &leaf_hash(b"b"));
        let paths = vec![
            leaf_path(b"a", vec![], 2),
            leaf_path(b"b", vec![], 2),
            interior_path(Some(root), NO_NEXT_PATH),
        ];
        (paths, root)
    }

    #[test]
    fn single_leaf_self_attesting() {
        let sibling = leaf_hash(b"s");
        let root = join_hash(&sibling, &leaf_hash(b"a"));
        let bundle = ProofBundle::new(
            vec![leaf_path(b"a", vec![SiblingNode::left(sibling)], NO_NEXT_PATH)],
            root.to_vec(),
        );
        assert!(ProofVerifier::new().verify(&bundle).unwrap());
    }

    #[test]
    fn children_join_in_index_order() {
        let (paths, root) = pair_bundle();
        let verifier = ProofVerifier::new();
        assert_eq!(verifier.compute_root_hash(&paths).unwrap(), Some(root));
    }

    #[test]
    fn interior_path_without_start_hash_is_derived() {
        let (mut paths, root) = pair_bundle();
        paths[2].content = None;
        assert_eq!(ProofVerifier::new().compute_root_hash(&paths).unwrap(), Some(root));
    }

    #[test]
    fn single_child_is_promoted() {
        let child = leaf_hash(b"a");
        let paths = vec![leaf_path(b"a", vec![], 1), interior_path(None, NO_NEXT_PATH)];
        assert_eq!(
            ProofVerifier::new().compute_root_hash(&paths).unwrap(),
            Some(single_child_hash(&child))
        );
    }

    #[test]
    fn wrong_start_hash_is_invalid_not_malformed() {
        let (mut paths, _) = pair_bundle();
        paths[2].content = Some(PathContent::StartHash(leaf_hash(b"bogus")));
        assert_eq!(ProofVerifier::new().compute_root_hash(&paths).unwrap(), None);
    }

    #[test]
    fn missing_signature_is_false() {
        let (paths, _) = pair_bundle();
        let bundle = ProofBundle::new(paths, Vec::new());
        assert!(!ProofVerifier::new().verify(&bundle).unwrap());
    }

    #[test]
    fn wrong_signature_is_false() {
        let (paths, _) = pair_bundle();
        let bundle = ProofBundle::new(paths, vec![0u8; 48]);
        assert!(!ProofVerifier::new().verify(&bundle).unwrap());
    }

    #[test]
    fn empty_bundle_is_malformed() {
        let bundle = ProofBundle::new(vec![], vec![1u8]);
        assert!(matches!(
            ProofVerifier::new().verify(&bundle),
            Err(ProofError::MalformedBundle(_))
        ));
    }

    #[test]
    fn path_without_content_or_children_is_malformed() {
        let paths = vec![interior_path(None, NO_NEXT_PATH)];
        let err = ProofVerifier::new().compute_root_hash(&paths).unwrap_err();
        assert!(err.to_string().contains("no leaf or start hash"));
    }

    #[test]
    fn out_of_range_link_is_malformed() {
        let paths = vec![leaf_path(b"a", vec![], 5)];
        assert!(ProofVerifier::new().compute_root_hash(&paths).is_err());

        let self_link = vec![leaf_path(b"a", vec![], 0)];
        assert!(ProofVerifier::new().compute_root_hash(&self_link).is_err());
    }

    #[test]
    fn cycle_is_malformed() {
        let h = leaf_hash(b"x");
        let paths = vec![
            leaf_path(b"a", vec![], 1),
            interior_path(Some(h), 2),
            interior_path(Some(h), 1),
        ];
        let err = ProofVerifier::new().compute_root_hash(&paths).unwrap_err();
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn leaf_with_children_is_malformed() {
        let paths = vec![leaf_path(b"a", vec![], 1), leaf_path(b"b", vec![], NO_NEXT_PATH)];
        assert!(matches!(
            ProofVerifier::new().compute_root_hash(&paths),
            Err(ProofError::MalformedBundle(_))
        ));
    }

    #[test]
    fn three_children_is_malformed() {
        let paths = vec![
            leaf_path(b"a", vec![], 3),
            leaf_path(b"b", vec![], 3),
            leaf_path(b"c", vec![], 3),
            interior_path(None, NO_NEXT_PATH),
        ];
        assert!(ProofVerifier::new().compute_root_hash(&paths).is_err());
    }

    #[test]
    fn disagreeing_terminals_are_invalid() {
        let paths = vec![
            leaf_path(b"a", vec![], NO_NEXT_PATH),
            leaf_path(b"b", vec![], NO_NEXT_PATH),
        ];
        assert_eq!(ProofVerifier::new().compute_root_hash(&paths).unwrap(), None);
    }

    #[test]
    fn limits_are_enforced() {
        let (paths, _) = pair_bundle();
        let verifier = ProofVerifier::new().with_limits(ProofLimits {
            max_paths: 2,
            max_siblings_per_path: 256,
        });
        assert!(matches!(
            verifier.compute_root_hash(&paths),
            Err(ProofError::MalformedBundle(_))
        ));

        let deep = vec![leaf_path(b"a", vec![SiblingNode::single_child(); 3], NO_NEXT_PATH)];
        let verifier = ProofVerifier::new().with_limits(ProofLimits {
            max_paths: 8,
            max_siblings_per_path: 2,
        });
        assert!(verifier.compute_root_hash(&deep).is_err());
    }

    #[test]
    fn against_root_ignores_signature() {
        let (paths, root) = pair_bundle();
        let bundle = ProofBundle::new(paths, Vec::new());
        let verifier = ProofVerifier::new();
        assert!(verifier.verify_against_root(&bundle, &root).unwrap());
        assert!(!verifier.verify_against_root(&bundle, &leaf_hash(b"other")).unwrap());
    }

    struct RejectAll;

    impl SignatureVerifier for RejectAll {
        fn verify(&self, _root: &Hash, _signature: &[u8]) -> bool {
            false
        }
    }

    #[test]
    fn external_verifier_decides() {
        let (paths, root) = pair_bundle();
        let bundle = ProofBundle::new(paths, root.to_vec());
        let verifier = ProofVerifier::with_signature_verifier(RejectAll);
        assert!(!verifier.verify(&bundle).unwrap());
    }
}
