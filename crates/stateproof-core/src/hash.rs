//! Domain-separated SHA-384 primitives.
//!
//! Every node value in a proof is produced by exactly one of these functions.
//! A one-byte prefix keeps leaf, single-child and join digests in disjoint
//! domains, so leaf bytes can never be replayed as an interior node.

use sha2::{Digest, Sha384};

/// Length in bytes of every digest handled by this crate.
pub const HASH_LEN: usize = 48;

/// A SHA-384 digest.
pub type Hash = [u8; HASH_LEN];

const LEAF_PREFIX: u8 = 0x00;
const SINGLE_CHILD_PREFIX: u8 = 0x01;
const INTERNAL_PREFIX: u8 = 0x02;

/// Hash raw item bytes as a leaf: `SHA384(0x00 || bytes)`.
pub fn leaf_hash(bytes: &[u8]) -> Hash {
    let mut h = Sha384::new();
    h.update([LEAF_PREFIX]);
    h.update(bytes);
    finish(h)
}

/// Hash of a parent with exactly one child: `SHA384(0x01 || child)`.
pub fn single_child_hash(child: &Hash) -> Hash {
    let mut h = Sha384::new();
    h.update([SINGLE_CHILD_PREFIX]);
    h.update(child);
    finish(h)
}

/// Join two child digests, left then right: `SHA384(0x02 || left || right)`.
pub fn join_hash(left: &Hash, right: &Hash) -> Hash {
    let mut h = Sha384::new();
    h.update([INTERNAL_PREFIX]);
    h.update(left);
    h.update(right);
    finish(h)
}

/// Canonical hash of a structurally empty subtree (two zero digests joined).
pub fn empty_subtree_hash() -> Hash {
    join_hash(&[0u8; HASH_LEN], &[0u8; HASH_LEN])
}

fn finish(h: Sha384) -> Hash {
    let mut out = [0u8; HASH_LEN];
    out.copy_from_slice(&h.finalize());
    out
}

/// Copy a slice into a digest, or `None` if the length is wrong.
pub fn hash_from_slice(bytes: &[u8]) -> Option<Hash> {
    bytes.try_into().ok()
}

/// Lowercase hex rendering for logs and error messages.
pub fn to_hex(bytes: &[u8]) -> String {
    const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        s.push(HEX_CHARS[(b >> 4) as usize] as char);
        s.push(HEX_CHARS[(b & 0x0f) as usize] as char);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_hash_is_prefixed_sha384() {
        let mut h = Sha384::new();
        h.update([0x00u8]);
        h.update(b"item");
        assert_eq!(leaf_hash(b"item").as_slice(), h.finalize().as_slice());
    }

    #[test]
    fn join_is_order_sensitive() {
        let a = leaf_hash(b"a");
        let b = leaf_hash(b"b");
        assert_ne!(join_hash(&a, &b), join_hash(&b, &a));
    }

    #[test]
    fn domains_do_not_collide() {
        let child = leaf_hash(b"x");
        let mut concat = Vec::with_capacity(2 * HASH_LEN);
        concat.extend_from_slice(&child);
        concat.extend_from_slice(&child);

        // Same payload, different domain tag
        assert_ne!(leaf_hash(&child), single_child_hash(&child));
        assert_ne!(leaf_hash(&concat), join_hash(&child, &child));
    }

    #[test]
    fn empty_subtree_is_stable() {
        assert_eq!(empty_subtree_hash(), empty_subtree_hash());
        assert_eq!(
            empty_subtree_hash(),
            join_hash(&[0u8; HASH_LEN], &[0u8; HASH_LEN])
        );
        assert_ne!(empty_subtree_hash(), [0u8; HASH_LEN]);
    }

    #[test]
    fn hash_from_slice_checks_length() {
        assert!(hash_from_slice(&[0u8; HASH_LEN]).is_some());
        assert!(hash_from_slice(&[0u8; 32]).is_none());
        assert!(hash_from_slice(&[]).is_none());
    }

    #[test]
    fn hex_rendering() {
        assert_eq!(to_hex(&[0x00, 0xab, 0x10]), "00ab10");
        assert_eq!(to_hex(&leaf_hash(b"")).len(), 96);
    }
}
