//! Error type for the stateproof facade.

use stateproof_core::ProofError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Aggregation, decoding or verification failure
    #[error(transparent)]
    Proof(#[from] ProofError),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias using the facade Error.
pub type Result<T> = std::result::Result<T, Error>;
