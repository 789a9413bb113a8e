//! Stateproof Core
//!
//! Compact multi-leaf state proofs over a SHA-384 Merkle tree.
//!
//! - [`path`] - single authentication paths and their builder
//! - [`aggregate`] - merges many single-leaf proofs into one [`ProofBundle`]
//! - [`verify`] - rebuilds the root from a bundle and checks its signature
//! - [`codec`] - protobuf wire encoding of bundles
//!
//! # Example
//!
//! ```rust
//! use stateproof_core::{ProofAggregator, ProofBundle, ProofVerifier, SiblingHash, SourceProof};
//! use stateproof_core::hash::leaf_hash;
//!
//! let a = SourceProof::new(b"a".to_vec(), vec![SiblingHash::new(true, leaf_hash(b"b"))], vec![]);
//! let b = SourceProof::new(b"b".to_vec(), vec![SiblingHash::new(false, leaf_hash(b"a"))], vec![]);
//!
//! let mut aggregator = ProofAggregator::new();
//! aggregator.add_proof(&a).unwrap().add_proof(&b).unwrap();
//! let bytes = aggregator.build().unwrap().encode_to_vec();
//!
//! let bundle = ProofBundle::decode(&bytes).unwrap();
//! assert!(ProofVerifier::new().verify(&bundle).unwrap());
//! ```

pub mod aggregate;
pub mod bundle;
pub mod codec;
pub mod config;
pub mod error;
pub mod hash;
pub mod path;
pub mod signature;
pub mod source;
pub mod verify;

// Re-export main types at crate root
pub use aggregate::ProofAggregator;
pub use bundle::ProofBundle;
pub use config::ProofLimits;
pub use error::{ProofError, ProofResult};
pub use hash::{Hash, HASH_LEN};
pub use path::{MerklePath, MerklePathBuilder, PathContent, SiblingNode, NO_NEXT_PATH};
pub use signature::{RootSigner, SelfAttesting, SignatureVerifier};
pub use source::{SiblingHash, SourceProof};
pub use verify::ProofVerifier;
