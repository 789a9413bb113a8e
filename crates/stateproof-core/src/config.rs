//! Verification limits

use serde::{Deserialize, Serialize};

use crate::error::{ProofError, ProofResult};

/// Upper bounds applied to bundles before any hashing is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProofLimits {
    /// Maximum number of paths in one bundle (default: 4096)
    pub max_paths: usize,
    /// Maximum number of siblings on one path (default: 256)
    pub max_siblings_per_path: usize,
}

impl Default for ProofLimits {
    fn default() -> Self {
        Self {
            max_paths: 4096,
            max_siblings_per_path: 256,
        }
    }
}

impl ProofLimits {
    /// Parse limits from JSON. Missing fields keep their defaults.
    pub fn from_json(input: &str) -> ProofResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ProofError::InvalidArgument(format!("invalid limits JSON: {}", e)))
    }
}
