//! # Block Reconstruction Service
//!
//! Orchestrates one reconstruction attempt end to end: decode the
//! announcement, snapshot the candidate pools, build the per-block index,
//! run the match sweep, and later finalize with whatever the caller fetched.
//!
//! ## Locking Discipline
//!
//! The mempool snapshot and the overflow-cache read lock are held only for
//! index build + sweep, never across the network wait for missing
//! transactions. Finalization touches no pool at all. Multiple blocks may be
//! reconstructed concurrently; each attempt takes its own snapshot.

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::{
    CandidateIndex, CompactBlock, ExtraTxnCache, ReconstructionConfig, ReconstructionError,
    ReconstructionMetrics, ReconstructionState,
};
use crate::ports::inbound::BlockReconstructionApi;
use crate::ports::outbound::MempoolView;
use shared_types::{Block, Transaction};

/// Compact block reconstruction service.
///
/// Thread-safe; share across tasks via `Arc`. Generic over the mempool port
/// implemented by the node runtime.
pub struct BlockReconstructionService<M: MempoolView> {
    /// Service configuration.
    config: ReconstructionConfig,
    /// Primary pool port (verified-pending transactions).
    mempool: Arc<M>,
    /// Bounded overflow cache of recently relayed transactions.
    extra_pool: RwLock<ExtraTxnCache>,
    /// Reconstruction metrics for monitoring.
    metrics: RwLock<ReconstructionMetrics>,
}

impl<M: MempoolView> BlockReconstructionService<M> {
    pub fn new(config: ReconstructionConfig, mempool: Arc<M>) -> Self {
        Self {
            extra_pool: RwLock::new(ExtraTxnCache::new(config.extra_pool_capacity)),
            metrics: RwLock::new(ReconstructionMetrics::default()),
            config,
            mempool,
        }
    }

    /// Service configuration.
    pub fn config(&self) -> &ReconstructionConfig {
        &self.config
    }

    /// Number of transactions currently held in the overflow cache.
    pub fn extra_pool_len(&self) -> usize {
        self.extra_pool.read().len()
    }
}

impl<M: MempoolView> BlockReconstructionApi for BlockReconstructionService<M> {
    fn begin_reconstruction(
        &self,
        compact: CompactBlock,
    ) -> Result<(ReconstructionState, Vec<u16>), ReconstructionError> {
        let block_hash = compact.block_hash();
        let short_id_slots = compact.short_ids.len();
        let mut state = ReconstructionState::decode(&compact, &self.config).inspect_err(|err| {
            warn!(block = ?&block_hash[..4], %err, "rejected malformed compact block");
        })?;

        // Snapshot both pools, build, sweep, release. Nothing below may
        // block on I/O while these are held.
        let missing = {
            let primary = self.mempool.snapshot();
            let extra = self.extra_pool.read();
            let index = CandidateIndex::build(&primary, &extra, state.key());
            state.reconstruct(&index)
        };

        {
            let mut metrics = self.metrics.write();
            metrics.blocks_attempted += 1;
            metrics.txs_recovered_locally += (short_id_slots - missing.len()) as u64;
            metrics.txs_requested += missing.len() as u64;
        }
        debug!(
            block = ?&block_hash[..4],
            slots = state.slot_count(),
            missing = missing.len(),
            "compact block sweep complete"
        );
        Ok((state, missing))
    }

    fn complete(
        &self,
        state: ReconstructionState,
        supplied: Vec<Arc<Transaction>>,
    ) -> Result<Block, ReconstructionError> {
        let block_hash = state.header().hash();
        match state.finalize(supplied) {
            Ok(block) => {
                self.metrics.write().blocks_completed += 1;
                debug!(
                    block = ?&block_hash[..4],
                    txs = block.transactions.len(),
                    "block reconstructed"
                );
                Ok(block)
            }
            Err(err) => {
                if err.is_consensus_adjacent() {
                    self.metrics.write().finalize_failures += 1;
                    warn!(block = ?&block_hash[..4], %err, "block failed finalization");
                }
                Err(err)
            }
        }
    }

    fn add_extra_txn(&self, tx: Arc<Transaction>) {
        self.extra_pool.write().insert(tx);
    }

    fn metrics(&self) -> ReconstructionMetrics {
        self.metrics.read().clone()
    }
}
