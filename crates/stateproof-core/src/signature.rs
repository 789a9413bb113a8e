//! Signing collaborators for aggregate roots.
//!
//! Key material lives outside this crate. The aggregator asks a
//! [`RootSigner`] for signature bytes over the root it computed, and the
//! verifier hands the recomputed root to a [`SignatureVerifier`].

use crate::hash::Hash;

/// Produces signature bytes over an aggregate root.
pub trait RootSigner {
    fn sign(&self, root: &Hash) -> Vec<u8>;
}

/// Checks signature bytes against a recomputed aggregate root.
pub trait SignatureVerifier {
    fn verify(&self, root: &Hash, signature: &[u8]) -> bool;
}

/// Self-attesting mode: the signature is the raw root bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelfAttesting;

impl RootSigner for SelfAttesting {
    fn sign(&self, root: &Hash) -> Vec<u8> {
        root.to_vec()
    }
}

impl SignatureVerifier for SelfAttesting {
    fn verify(&self, root: &Hash, signature: &[u8]) -> bool {
        root.as_slice() == signature
    }
}
