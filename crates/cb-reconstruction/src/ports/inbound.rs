//! Inbound ports (API) for the reconstruction engine.

use shared_types::{Block, Transaction};
use std::sync::Arc;

use crate::domain::{
    CompactBlock, ReconstructionError, ReconstructionMetrics, ReconstructionState,
};

/// Primary API for compact block reconstruction.
///
/// Called by the peer-connection layer: it hands in announcements, fetches
/// whatever the engine reports missing, and feeds the results back.
pub trait BlockReconstructionApi: Send + Sync {
    /// Decode an announcement and resolve as many slots as possible from the
    /// local pools.
    ///
    /// Returns the in-flight state together with the ordered list of slot
    /// indices that must be fetched from the sender (empty = ready to
    /// finalize immediately). Pool snapshots are released before returning,
    /// so the caller may await the network freely while holding the state.
    fn begin_reconstruction(
        &self,
        compact: CompactBlock,
    ) -> Result<(ReconstructionState, Vec<u16>), ReconstructionError>;

    /// Bind previously missing transactions (in missing-index order) and
    /// produce the final merkle-validated block.
    fn complete(
        &self,
        state: ReconstructionState,
        supplied: Vec<Arc<Transaction>>,
    ) -> Result<Block, ReconstructionError>;

    /// Record a recently relayed transaction in the overflow cache so it can
    /// serve as a reconstruction candidate before it reaches the mempool.
    fn add_extra_txn(&self, tx: Arc<Transaction>);

    /// Current reconstruction metrics.
    fn metrics(&self) -> ReconstructionMetrics;
}
