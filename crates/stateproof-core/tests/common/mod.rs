//! Balanced test tree that hands out state-layer proofs

#![allow(dead_code)]

use stateproof_core::hash::{join_hash, leaf_hash, Hash};
use stateproof_core::{SiblingHash, SourceProof};

/// Perfect binary tree over `2^depth` leaves named "leaf-0", "leaf-1", ...
pub struct TestTree {
    items: Vec<Vec<u8>>,
    /// levels[0] are leaf digests, the last level holds only the root
    levels: Vec<Vec<Hash>>,
}

impl TestTree {
    pub fn new(depth: u32) -> Self {
        Self::with_prefix("leaf", depth)
    }

    /// Same shape, different leaf names, so a different root.
    pub fn with_prefix(prefix: &str, depth: u32) -> Self {
        let items: Vec<Vec<u8>> = (0..1usize << depth)
            .map(|i| format!("{}-{}", prefix, i).into_bytes())
            .collect();

        let mut levels = vec![items.iter().map(|item| leaf_hash(item)).collect::<Vec<_>>()];
        while levels[levels.len() - 1].len() > 1 {
            let next = levels[levels.len() - 1]
                .chunks(2)
                .map(|pair| join_hash(&pair[0], &pair[1]))
                .collect();
            levels.push(next);
        }
        Self { items, levels }
    }

    pub fn root(&self) -> Hash {
        self.levels[self.levels.len() - 1][0]
    }

    pub fn item(&self, index: usize) -> &[u8] {
        &self.items[index]
    }

    pub fn leaf_count(&self) -> usize {
        self.items.len()
    }

    /// Digest of the node `level` levels above leaf `index`.
    pub fn node(&self, level: usize, index: usize) -> Hash {
        self.levels[level][index >> level]
    }

    /// Proof for one leaf, with the full ancestor chain.
    pub fn proof(&self, index: usize) -> SourceProof {
        let mut siblings = Vec::new();
        let mut chain = Vec::new();
        for (level, hashes) in self.levels.iter().enumerate() {
            let position = index >> level;
            chain.push(hashes[position]);
            if hashes.len() > 1 {
                // state-layer flag: proven node is the left child
                siblings.push(SiblingHash::new(position % 2 == 0, hashes[position ^ 1]));
            }
        }
        SourceProof::new(self.items[index].clone(), siblings, chain)
    }

    /// Proof for one leaf without the ancestor chain.
    pub fn bare_proof(&self, index: usize) -> SourceProof {
        let mut proof = self.proof(index);
        proof.ancestor_hashes.clear();
        proof
    }
}
