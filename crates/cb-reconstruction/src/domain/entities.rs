//! Wire entities for compact block relay.
//!
//! A [`CompactBlock`] substitutes most transaction bodies with 6-byte short
//! IDs. Positions the sender assumes the receiver lacks (always the
//! coinbase) are carried in full as [`PrefilledTx`] entries. Missing
//! transactions are fetched with [`BlockTxnRequest`] / [`BlockTxnResponse`].

use serde::{Deserialize, Serialize};
use shared_types::{Block, BlockHeader, Hash, Transaction};

use super::errors::ReconstructionError;
use super::services::{calculate_short_id, ShortIdKey, ShortTxId};

/// Transaction included in full within a compact block announcement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefilledTx {
    /// Position in the block's transaction list.
    pub index: u16,
    /// Full transaction at that position.
    pub tx: Transaction,
}

/// Compact block announcement: header, nonce, short IDs, prefilled slots.
///
/// The nonce is chosen randomly by the sender per announcement; together
/// with the header it keys the short ID computation, so the same block
/// announced twice carries unrelated short ID lists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactBlock {
    /// Header of the announced block.
    pub header: BlockHeader,
    /// Random nonce for short ID keying.
    pub nonce: u64,
    /// Short IDs for every non-prefilled slot, in block order.
    pub short_ids: Vec<ShortTxId>,
    /// Prefilled transactions at fixed positions (strictly increasing).
    pub prefilled: Vec<PrefilledTx>,
}

impl CompactBlock {
    /// Encode a full block as a compact announcement.
    ///
    /// `prefill_indices` selects positions carried in full; index 0 (the
    /// coinbase) is always prefilled regardless. Out-of-range indices are
    /// ignored. Every other position gets a short ID in block order.
    ///
    /// Fails with `TooManySlots` when the block has more positions than the
    /// wire format's `u16` slot indices can address.
    pub fn from_block(
        block: &Block,
        nonce: u64,
        prefill_indices: &[usize],
    ) -> Result<Self, ReconstructionError> {
        if block.transactions.len() > usize::from(u16::MAX) {
            return Err(ReconstructionError::TooManySlots {
                declared: block.transactions.len(),
                max: usize::from(u16::MAX),
            });
        }
        let key = ShortIdKey::derive(&block.header, nonce);

        let mut prefill: Vec<usize> = prefill_indices
            .iter()
            .copied()
            .filter(|&i| i < block.transactions.len())
            .collect();
        prefill.push(0);
        prefill.sort_unstable();
        prefill.dedup();

        let mut prefilled = Vec::with_capacity(prefill.len());
        let mut short_ids = Vec::with_capacity(block.transactions.len() - prefill.len());
        let mut next_prefill = prefill.iter().peekable();
        for (position, tx) in block.transactions.iter().enumerate() {
            if next_prefill.peek() == Some(&&position) {
                next_prefill.next();
                prefilled.push(PrefilledTx {
                    index: position as u16,
                    tx: tx.clone(),
                });
            } else {
                short_ids.push(calculate_short_id(&key, &tx.wtxid()));
            }
        }

        Ok(Self {
            header: block.header,
            nonce,
            short_ids,
            prefilled,
        })
    }

    /// Hash of the announced block.
    pub fn block_hash(&self) -> Hash {
        self.header.hash()
    }

    /// Total number of transaction slots the announcement declares.
    pub fn slot_count(&self) -> usize {
        self.short_ids.len() + self.prefilled.len()
    }
}

/// Request for missing transactions during reconstruction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockTxnRequest {
    /// Hash of the block being reconstructed.
    pub block_hash: Hash,
    /// Missing slot indices, strictly increasing.
    pub indices: Vec<u16>,
}

/// Response carrying the requested transactions, in requested-index order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockTxnResponse {
    /// Hash of the block being reconstructed.
    pub block_hash: Hash,
    /// Transactions for the requested indices, in order.
    pub transactions: Vec<Transaction>,
}
