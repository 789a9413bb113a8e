//! # Stateproof
//!
//! Compact aggregated proofs that a set of state items belongs to one signed
//! Merkle root.
//! - **core**: path builder, aggregator, verifier and wire codec (re-exported
//!   from `stateproof-core`)
//! - **error**: facade error type
//! - **tracing**: logging setup with proof prefixes
//!
//! ## Usage
//!
//! ```rust
//! use stateproof::{aggregate, verify_encoded, SiblingHash, SourceProof};
//! use stateproof::hash::leaf_hash;
//!
//! let left = SourceProof::new(b"left".to_vec(), vec![SiblingHash::new(true, leaf_hash(b"right"))], vec![]);
//! let right = SourceProof::new(b"right".to_vec(), vec![SiblingHash::new(false, leaf_hash(b"left"))], vec![]);
//!
//! let bundle = aggregate(&[left, right]).unwrap();
//! assert!(verify_encoded(&bundle.encode_to_vec()).unwrap());
//! ```

pub mod error;
pub mod tracing;

pub use error::{Error, Result};
pub use stateproof_core::*;

use ::tracing::debug;
use crate::tracing::prefix;

/// Aggregate `proofs` into one self-attested bundle.
pub fn aggregate(proofs: &[SourceProof]) -> Result<ProofBundle> {
    if proofs.is_empty() {
        return Err(Error::Config("no proofs to aggregate".into()));
    }

    let mut aggregator = ProofAggregator::new();
    for proof in proofs {
        aggregator.add_proof(proof)?;
    }
    let bundle = aggregator.build()?;
    debug!(
        "{} aggregated {} proofs into {} paths",
        prefix::AGGREGATE,
        proofs.len(),
        bundle.paths().len()
    );
    Ok(bundle)
}

/// Decode and verify a self-attested bundle with default limits.
pub fn verify_encoded(bytes: &[u8]) -> Result<bool> {
    verify_encoded_with_limits(bytes, &ProofLimits::default())
}

/// Decode and verify a self-attested bundle under `limits`.
pub fn verify_encoded_with_limits(bytes: &[u8], limits: &ProofLimits) -> Result<bool> {
    let bundle = ProofBundle::decode(bytes)?;
    debug!(
        "{} decoded {} paths from {} bytes",
        prefix::CODEC,
        bundle.paths().len(),
        bytes.len()
    );

    let valid = ProofVerifier::new().with_limits(*limits).verify(&bundle)?;
    debug!("{} bundle valid: {}", prefix::VERIFY, valid);
    Ok(valid)
}

/// Parse verification limits from JSON, rejecting limits that admit nothing.
pub fn load_limits(json: &str) -> Result<ProofLimits> {
    let limits: ProofLimits = serde_json::from_str(json)?;
    if limits.max_paths == 0 {
        return Err(Error::Config("max_paths must be at least 1".into()));
    }
    Ok(limits)
}
