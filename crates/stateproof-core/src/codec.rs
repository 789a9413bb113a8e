//! Conversion between proof types and their protobuf wire form.
//!
//! Wire types come from `stateproof-proto`; this module owns the mapping and
//! the digest-length checks the generated types cannot express.

use prost::Message;
use stateproof_proto::{merkle_path::Content, wire};

use crate::bundle::ProofBundle;
use crate::error::{ProofError, ProofResult};
use crate::hash::{hash_from_slice, HASH_LEN};
use crate::path::{MerklePath, PathContent, SiblingNode};

impl From<&SiblingNode> for wire::SiblingNode {
    fn from(sibling: &SiblingNode) -> Self {
        wire::SiblingNode {
            is_left: sibling.is_left,
            hash: sibling.hash.map(|h| h.to_vec()).unwrap_or_default(),
        }
    }
}

impl TryFrom<wire::SiblingNode> for SiblingNode {
    type Error = ProofError;

    fn try_from(sibling: wire::SiblingNode) -> ProofResult<Self> {
        let hash = if sibling.hash.is_empty() {
            None
        } else {
            Some(hash_from_slice(&sibling.hash).ok_or_else(|| {
                ProofError::MalformedBundle(format!(
                    "sibling hash has {} bytes, expected 0 or {}",
                    sibling.hash.len(),
                    HASH_LEN
                ))
            })?)
        };
        Ok(SiblingNode {
            is_left: sibling.is_left,
            hash,
        })
    }
}

impl From<&MerklePath> for wire::MerklePath {
    fn from(path: &MerklePath) -> Self {
        let content = path.content.as_ref().map(|c| match c {
            PathContent::Leaf(bytes) => Content::Leaf(bytes.clone()),
            PathContent::TimestampLeaf(bytes) => Content::TimestampLeaf(bytes.clone()),
            PathContent::StartHash(hash) => Content::StartHash(hash.to_vec()),
        });
        wire::MerklePath {
            content,
            siblings: path.siblings.iter().map(Into::into).collect(),
            next_path_index: path.next_path_index,
        }
    }
}

impl TryFrom<wire::MerklePath> for MerklePath {
    type Error = ProofError;

    fn try_from(path: wire::MerklePath) -> ProofResult<Self> {
        let content = match path.content {
            None => None,
            Some(Content::Leaf(bytes)) => Some(PathContent::Leaf(bytes)),
            Some(Content::TimestampLeaf(bytes)) => Some(PathContent::TimestampLeaf(bytes)),
            Some(Content::StartHash(bytes)) => {
                let hash = hash_from_slice(&bytes).ok_or_else(|| {
                    ProofError::MalformedBundle(format!(
                        "start hash has {} bytes, expected {}",
                        bytes.len(),
                        HASH_LEN
                    ))
                })?;
                Some(PathContent::StartHash(hash))
            }
        };
        let siblings = path
            .siblings
            .into_iter()
            .map(SiblingNode::try_from)
            .collect::<ProofResult<Vec<_>>>()?;
        Ok(MerklePath {
            content,
            siblings,
            next_path_index: path.next_path_index,
        })
    }
}

impl From<&ProofBundle> for wire::ProofBundle {
    fn from(bundle: &ProofBundle) -> Self {
        wire::ProofBundle {
            paths: bundle.paths().iter().map(Into::into).collect(),
            signature: bundle.signature().to_vec(),
        }
    }
}

impl TryFrom<wire::ProofBundle> for ProofBundle {
    type Error = ProofError;

    fn try_from(bundle: wire::ProofBundle) -> ProofResult<Self> {
        let paths = bundle
            .paths
            .into_iter()
            .map(MerklePath::try_from)
            .collect::<ProofResult<Vec<_>>>()?;
        Ok(ProofBundle::new(paths, bundle.signature))
    }
}

impl ProofBundle {
    /// Protobuf encoding of the bundle.
    pub fn encode_to_vec(&self) -> Vec<u8> {
        wire::ProofBundle::from(self).encode_to_vec()
    }

    /// Decode a protobuf-encoded bundle, checking every digest length.
    pub fn decode(bytes: &[u8]) -> ProofResult<Self> {
        let bundle = wire::ProofBundle::decode(bytes)
            .map_err(|e| ProofError::MalformedBundle(format!("undecodable bundle: {}", e)))?;
        ProofBundle::try_from(bundle)
    }
}
