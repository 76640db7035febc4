//! Short transaction ID derivation and the per-block candidate index.

use sha2::{Digest, Sha256};
use shared_types::{BlockHeader, Hash, Transaction};
use siphasher::sip::SipHasher24;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hasher;
use std::sync::Arc;

use super::value_objects::ExtraTxnCache;

/// Short transaction ID (6 bytes = 48 bits) for compact block relay.
///
/// Deliberately short for bandwidth: collisions are expected at scale
/// (birthday bound) and handled, never assumed away.
pub type ShortTxId = [u8; 6];

/// Per-announcement SipHash key pair for short ID computation.
///
/// Derived once from the block header and the sender's random nonce, so a
/// short ID is meaningless outside its announcement and an adversary who has
/// not seen the header+nonce cannot engineer collisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShortIdKey {
    k0: u64,
    k1: u64,
}

impl ShortIdKey {
    /// Derive the key pair: the first 16 bytes of
    /// `SHA-256(header_hash || nonce)` as two little-endian u64 words.
    pub fn derive(header: &BlockHeader, nonce: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(header.hash());
        hasher.update(nonce.to_le_bytes());
        let digest = hasher.finalize();

        let mut k0 = [0u8; 8];
        let mut k1 = [0u8; 8];
        k0.copy_from_slice(&digest[0..8]);
        k1.copy_from_slice(&digest[8..16]);
        Self {
            k0: u64::from_le_bytes(k0),
            k1: u64::from_le_bytes(k1),
        }
    }
}

/// Calculate the short transaction ID for a witness-inclusive identity.
///
/// Formula: `SipHash-2-4(k0, k1, wtxid)[0:6]`, little-endian.
pub fn calculate_short_id(key: &ShortIdKey, wtxid: &Hash) -> ShortTxId {
    let mut hasher = SipHasher24::new_with_keys(key.k0, key.k1);
    hasher.write(wtxid);
    let full_hash = hasher.finish();

    let mut short_id = [0u8; 6];
    short_id.copy_from_slice(&full_hash.to_le_bytes()[..6]);
    short_id
}

/// Which pool a candidate transaction came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CandidateSource {
    /// The verified-pending transaction pool.
    Primary,
    /// The bounded overflow cache of recently seen transactions.
    Overflow,
}

/// Result of a short ID lookup against the candidate index.
///
/// Ambiguity is a first-class outcome, distinct from absence: an ambiguous
/// short ID must resolve to "unknown" and be re-requested, never to either
/// candidate.
#[derive(Clone, Debug)]
pub enum ShortIdLookup {
    /// No local transaction hashes to this short ID.
    Unresolved,
    /// Two or more distinct local transactions hash to this short ID.
    Ambiguous,
    /// Exactly one unambiguous local candidate.
    Resolved(Arc<Transaction>),
}

#[derive(Clone, Debug)]
enum CandidateEntry {
    Unique {
        wtxid: Hash,
        tx: Arc<Transaction>,
        source: CandidateSource,
    },
    Ambiguous,
}

/// Short ID → candidate transaction index for one announcement.
///
/// Built fresh per reconstruction attempt: the key changes with every
/// announcement, so entries are never reusable across blocks. Build is
/// O(P + E) over the primary and overflow pools; lookups are O(1).
#[derive(Debug)]
pub struct CandidateIndex {
    key: ShortIdKey,
    entries: HashMap<ShortTxId, CandidateEntry>,
}

impl CandidateIndex {
    /// Build the index from a primary pool snapshot and the overflow cache.
    ///
    /// The same transaction appearing in both pools (by wtxid) is
    /// deduplicated and keeps its first provenance. Two *distinct*
    /// transactions sharing a short ID poison that entry as ambiguous.
    pub fn build(
        primary: &[(Arc<Transaction>, u64)],
        overflow: &ExtraTxnCache,
        key: &ShortIdKey,
    ) -> Self {
        let mut index = Self {
            key: *key,
            entries: HashMap::with_capacity(primary.len() + overflow.len()),
        };
        for (tx, _fee) in primary {
            index.insert(tx.wtxid(), Arc::clone(tx), CandidateSource::Primary);
        }
        for (wtxid, tx) in overflow.iter() {
            index.insert(*wtxid, Arc::clone(tx), CandidateSource::Overflow);
        }
        index
    }

    /// Look up a short ID from an announcement.
    pub fn lookup(&self, short_id: &ShortTxId) -> ShortIdLookup {
        match self.entries.get(short_id) {
            None => ShortIdLookup::Unresolved,
            Some(CandidateEntry::Ambiguous) => ShortIdLookup::Ambiguous,
            Some(CandidateEntry::Unique { tx, .. }) => ShortIdLookup::Resolved(Arc::clone(tx)),
        }
    }

    /// Provenance of the unique candidate for a short ID, if any.
    pub fn provenance(&self, short_id: &ShortTxId) -> Option<CandidateSource> {
        match self.entries.get(short_id) {
            Some(CandidateEntry::Unique { source, .. }) => Some(*source),
            _ => None,
        }
    }

    /// Number of distinct short IDs indexed (including ambiguous ones).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the index holds no candidates.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, wtxid: Hash, tx: Arc<Transaction>, source: CandidateSource) {
        let short_id = calculate_short_id(&self.key, &wtxid);
        self.insert_raw(short_id, wtxid, tx, source);
    }

    fn insert_raw(
        &mut self,
        short_id: ShortTxId,
        wtxid: Hash,
        tx: Arc<Transaction>,
        source: CandidateSource,
    ) {
        match self.entries.entry(short_id) {
            Entry::Vacant(slot) => {
                slot.insert(CandidateEntry::Unique { wtxid, tx, source });
            }
            Entry::Occupied(mut slot) => {
                let same_tx = matches!(
                    slot.get(),
                    CandidateEntry::Unique { wtxid: existing, .. } if *existing == wtxid
                );
                // Same transaction in both pools is a dedup, not a collision.
                // Anything else poisons the entry: the stored candidate is
                // discarded so an ambiguous ID can never resolve wrongly.
                if !same_tx {
                    slot.insert(CandidateEntry::Ambiguous);
                }
            }
        }
    }
}
