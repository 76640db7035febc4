//! Configuration and bounded caches for reconstruction.

use shared_types::{Hash, Transaction};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

/// Default capacity of the overflow transaction cache.
pub const DEFAULT_EXTRA_POOL_CAPACITY: usize = 100;

/// Default upper bound on the announced slot count per block.
pub const DEFAULT_MAX_BLOCK_SLOTS: usize = 16_384;

/// Reconstruction engine configuration.
#[derive(Clone, Debug)]
pub struct ReconstructionConfig {
    /// Maximum total slot count (prefilled + short IDs) accepted per
    /// announcement. DoS guard; enforced at decode time before any pool
    /// access. Capped below `u16::MAX` since slot indices are 16-bit.
    pub max_block_slots: usize,
    /// Capacity of the overflow transaction cache (oldest evicted first).
    pub extra_pool_capacity: usize,
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        Self {
            max_block_slots: DEFAULT_MAX_BLOCK_SLOTS,
            extra_pool_capacity: DEFAULT_EXTRA_POOL_CAPACITY,
        }
    }
}

/// Bounded cache of recently seen transactions not (yet) in the primary pool.
///
/// Senders prefill their announcements assuming the receiver holds recently
/// relayed transactions; this cache makes those reachable as reconstruction
/// candidates. Fixed capacity, oldest entry evicted first, entries keyed by
/// witness-inclusive identity. Re-inserting a known wtxid is a no-op.
#[derive(Debug)]
pub struct ExtraTxnCache {
    capacity: usize,
    ring: VecDeque<(Hash, Arc<Transaction>)>,
    known: HashSet<Hash>,
}

impl ExtraTxnCache {
    /// Create a cache holding at most `capacity` transactions.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ring: VecDeque::with_capacity(capacity),
            known: HashSet::with_capacity(capacity),
        }
    }

    /// Insert a transaction, evicting the oldest entry when full.
    ///
    /// Returns false if the transaction was already cached (or capacity is
    /// zero) and nothing changed.
    pub fn insert(&mut self, tx: Arc<Transaction>) -> bool {
        if self.capacity == 0 {
            return false;
        }
        let wtxid = tx.wtxid();
        if !self.known.insert(wtxid) {
            return false;
        }
        if self.ring.len() == self.capacity {
            if let Some((oldest, _)) = self.ring.pop_front() {
                self.known.remove(&oldest);
            }
        }
        self.ring.push_back((wtxid, tx));
        true
    }

    /// True if a transaction with this wtxid is cached.
    pub fn contains(&self, wtxid: &Hash) -> bool {
        self.known.contains(wtxid)
    }

    /// Iterate entries oldest-first as (wtxid, transaction).
    pub fn iter(&self) -> impl Iterator<Item = (&Hash, &Arc<Transaction>)> {
        self.ring.iter().map(|(wtxid, tx)| (wtxid, tx))
    }

    /// Number of cached transactions.
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// True if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Reconstruction metrics for monitoring.
#[derive(Clone, Debug, Default)]
pub struct ReconstructionMetrics {
    /// Announcements decoded and swept.
    pub blocks_attempted: u64,
    /// Blocks fully assembled and merkle-validated.
    pub blocks_completed: u64,
    /// Short-ID slots filled from local pools without network traffic.
    pub txs_recovered_locally: u64,
    /// Slots that had to be re-requested from the sender.
    pub txs_requested: u64,
    /// Finalize failures (merkle mismatch, duplicates, bad coinbase).
    pub finalize_failures: u64,
}
