//! Proof error types

use thiserror::Error;

/// Errors raised while building, encoding or verifying state proofs.
///
/// A proof that is well formed but does not check out is not an error:
/// verification reports that as `Ok(false)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProofError {
    /// Required input is present but unusable
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation invoked before its preconditions hold
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Two proofs cannot coexist in one aggregate
    #[error("structural conflict: {0}")]
    StructuralConflict(String),

    /// Bundle cannot be interpreted (empty, dangling links, cycles, bad digests)
    #[error("malformed bundle: {0}")]
    MalformedBundle(String),
}

/// Result type for proof operations
pub type ProofResult<T> = Result<T, ProofError>;
