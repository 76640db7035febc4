//! Merkle root computation over transaction ids.
//!
//! Pairs are combined with SHA-256; an odd leaf at the end of a level is
//! paired with itself.

use sha2::{Digest, Sha256};

use crate::entities::Hash;

/// Compute the merkle root of an ordered list of leaf hashes.
///
/// An empty list yields the all-zero hash (no valid block is empty, so this
/// only appears in degenerate inputs the caller rejects elsewhere).
pub fn merkle_root(leaves: &[Hash]) -> Hash {
    if leaves.is_empty() {
        return [0u8; 32];
    }

    let mut layer: Vec<Hash> = leaves.to_vec();
    while layer.len() > 1 {
        let mut next = Vec::with_capacity(layer.len().div_ceil(2));
        for pair in layer.chunks(2) {
            let left = pair[0];
            let right = if pair.len() == 2 { pair[1] } else { pair[0] };
            let mut hasher = Sha256::new();
            hasher.update(left);
            hasher.update(right);
            next.push(hasher.finalize().into());
        }
        layer = next;
    }
    layer[0]
}
