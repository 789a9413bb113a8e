//! The aggregated proof artifact.

use crate::path::MerklePath;

/// One or more Merkle paths plus a signature over their common root.
///
/// Paths are ordered so that every path precedes the path it links to via
/// `next_path_index`, and a left child precedes its right sibling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofBundle {
    paths: Vec<MerklePath>,
    signature: Vec<u8>,
}

impl ProofBundle {
    pub fn new(paths: Vec<MerklePath>, signature: impl Into<Vec<u8>>) -> Self {
        Self {
            paths,
            signature: signature.into(),
        }
    }

    pub fn paths(&self) -> &[MerklePath] {
        &self.paths
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    pub fn has_signature(&self) -> bool {
        !self.signature.is_empty()
    }

    /// Paths whose fold is the aggregate root.
    pub fn terminal_paths(&self) -> impl Iterator<Item = &MerklePath> {
        self.paths.iter().filter(|p| p.is_terminal())
    }

    pub fn into_parts(self) -> (Vec<MerklePath>, Vec<u8>) {
        (self.paths, self.signature)
    }
}
