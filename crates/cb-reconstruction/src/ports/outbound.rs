//! Outbound ports (SPI) for the reconstruction engine.

use shared_types::Transaction;
use std::sync::Arc;

/// Read-only view of the verified-pending transaction pool.
///
/// `snapshot` must return a consistent view taken under the pool's own
/// synchronization: reference-counted handles that stay valid even if the
/// pool is mutated afterwards, so the candidate index never races with
/// concurrent relay or eviction.
pub trait MempoolView: Send + Sync {
    /// Snapshot of (transaction, fee) pairs. No ordering is required.
    fn snapshot(&self) -> Vec<(Arc<Transaction>, u64)>;
}
