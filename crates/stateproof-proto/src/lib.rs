//! Protocol Buffer wire types for aggregated state proofs.
//!
//! Types are generated at build time from `proto/stateproof.proto` with serde
//! support so bundles can also be dumped as JSON for diagnostics.
//! Uses protoc-bin-vendored to avoid requiring protoc installation.

// Include generated proto code from build.rs output
pub mod wire {
    include!(concat!(env!("OUT_DIR"), "/stateproof.rs"));
}

// Re-export the wire types at crate root for convenience
pub use wire::merkle_path;
pub use wire::{MerklePath, ProofBundle, SiblingNode};

#[cfg(test)]
mod test;
