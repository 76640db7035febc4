//! The reconstruction state machine: decode, match sweep, finalize.
//!
//! Lifecycle of one announcement:
//!
//! 1. [`ReconstructionState::decode`] validates the announcement structure
//!    and lays out the slot sequence. Cheap; never touches any pool.
//! 2. [`ReconstructionState::reconstruct`] sweeps pending slots against a
//!    [`CandidateIndex`] and reports which slot indices are still missing.
//! 3. [`ReconstructionState::finalize`] binds fetched transactions into the
//!    missing slots, verifies the merkle root and structural invariants, and
//!    yields the assembled block.
//!
//! If the announcement goes stale the state is simply dropped; nothing here
//! mutates shared pools.

use shared_types::{merkle_root, Block, BlockHeader, Hash, Transaction};
use std::collections::HashSet;
use std::sync::Arc;

use super::entities::CompactBlock;
use super::errors::ReconstructionError;
use super::services::{CandidateIndex, ShortIdKey, ShortIdLookup, ShortTxId};
use super::value_objects::ReconstructionConfig;

/// One transaction position in the block being reconstructed.
#[derive(Clone, Debug)]
pub enum Slot {
    /// Full transaction carried verbatim in the announcement.
    Prefilled(Arc<Transaction>),
    /// Short ID decoded, not yet matched against local pools.
    Pending(ShortTxId),
    /// Short ID matched exactly one unambiguous local candidate.
    Resolved(Arc<Transaction>),
    /// No local candidate, or the match was ambiguous; must be fetched.
    Missing,
}

/// In-flight reconstruction attempt for one announced block.
///
/// Created by decode, mutated only by the match sweep, consumed by finalize.
#[derive(Debug)]
pub struct ReconstructionState {
    header: BlockHeader,
    key: ShortIdKey,
    slots: Vec<Slot>,
    unresolved: usize,
}

impl ReconstructionState {
    /// Validate an announcement and lay out its slot sequence.
    ///
    /// Rejects, in order: empty announcements, slot counts above the
    /// configured maximum, out-of-range or non-increasing prefilled indices,
    /// and verbatim duplicate short IDs (a well-formed sender never emits
    /// the same identifier twice).
    pub fn decode(
        compact: &CompactBlock,
        config: &ReconstructionConfig,
    ) -> Result<Self, ReconstructionError> {
        let slot_count = compact.slot_count();
        if slot_count == 0 {
            return Err(ReconstructionError::EmptyBlock);
        }
        // Slot indices travel as u16 on the wire.
        let max_slots = config.max_block_slots.min(usize::from(u16::MAX));
        if slot_count > max_slots {
            return Err(ReconstructionError::TooManySlots {
                declared: slot_count,
                max: max_slots,
            });
        }

        let mut last_index: Option<u16> = None;
        for prefilled in &compact.prefilled {
            if usize::from(prefilled.index) >= slot_count {
                return Err(ReconstructionError::PrefilledOutOfRange {
                    index: prefilled.index,
                    slots: slot_count,
                });
            }
            if last_index.is_some_and(|last| prefilled.index <= last) {
                return Err(ReconstructionError::NonIncreasingPrefilled {
                    index: prefilled.index,
                });
            }
            last_index = Some(prefilled.index);
        }

        let mut seen = HashSet::with_capacity(compact.short_ids.len());
        for short_id in &compact.short_ids {
            if !seen.insert(*short_id) {
                return Err(ReconstructionError::DuplicateShortId {
                    short_id: *short_id,
                });
            }
        }

        let key = ShortIdKey::derive(&compact.header, compact.nonce);

        // Lay out short-ID slots, then splice the prefilled entries in at
        // their declared positions. In-range, strictly increasing indices
        // guarantee the k-th entry lands at an index no greater than
        // short_ids.len() + k, so every insert position is valid.
        let mut slots: Vec<Slot> = compact
            .short_ids
            .iter()
            .map(|short_id| Slot::Pending(*short_id))
            .collect();
        let unresolved = slots.len();
        for entry in &compact.prefilled {
            slots.insert(
                usize::from(entry.index),
                Slot::Prefilled(Arc::new(entry.tx.clone())),
            );
        }

        Ok(Self {
            header: compact.header,
            key,
            slots,
            unresolved,
        })
    }

    /// Lookup sweep: resolve every pending slot against the candidate index.
    ///
    /// An unambiguous candidate binds the slot; absence or ambiguity marks
    /// it missing. Returns the ordered list of slot indices that still need
    /// their transaction fetched (empty = fully assembled). Idempotent, and
    /// never mutates any pool.
    pub fn reconstruct(&mut self, index: &CandidateIndex) -> Vec<u16> {
        for slot in self.slots.iter_mut() {
            if let Slot::Pending(short_id) = slot {
                match index.lookup(short_id) {
                    ShortIdLookup::Resolved(tx) => {
                        *slot = Slot::Resolved(tx);
                        self.unresolved -= 1;
                    }
                    ShortIdLookup::Unresolved | ShortIdLookup::Ambiguous => {
                        *slot = Slot::Missing;
                    }
                }
            }
        }
        self.missing_indices()
    }

    /// Ordered indices of slots not yet bound to a transaction.
    pub fn missing_indices(&self) -> Vec<u16> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| matches!(slot, Slot::Missing | Slot::Pending(_)))
            .map(|(position, _)| position as u16)
            .collect()
    }

    /// Bind fetched transactions and assemble the validated block.
    ///
    /// `supplied` must match the last reported missing-index list in length
    /// and order. Verifies the coinbase shape at slot 0, the header merkle
    /// root, and the absence of duplicate transactions across slots (only
    /// checkable after full assembly, since a duplicate may span a resolved
    /// slot and a supplied one).
    pub fn finalize(
        mut self,
        supplied: Vec<Arc<Transaction>>,
    ) -> Result<Block, ReconstructionError> {
        let missing = self.missing_indices();
        if supplied.len() != missing.len() {
            return Err(ReconstructionError::WrongTransactionCount {
                supplied: supplied.len(),
                expected: missing.len(),
            });
        }
        for (slot_index, tx) in missing.into_iter().zip(supplied) {
            self.slots[usize::from(slot_index)] = Slot::Resolved(tx);
            self.unresolved -= 1;
        }

        let mut transactions = Vec::with_capacity(self.slots.len());
        for slot in &self.slots {
            match slot {
                Slot::Prefilled(tx) | Slot::Resolved(tx) => {
                    transactions.push(tx.as_ref().clone());
                }
                Slot::Pending(_) | Slot::Missing => {
                    return Err(ReconstructionError::WrongTransactionCount {
                        supplied: 0,
                        expected: self.unresolved,
                    })
                }
            }
        }

        match transactions.first() {
            Some(tx) if tx.is_coinbase() => {}
            _ => return Err(ReconstructionError::BadCoinbase),
        }
        if transactions.iter().skip(1).any(Transaction::is_coinbase) {
            return Err(ReconstructionError::BadCoinbase);
        }

        let txids: Vec<Hash> = transactions.iter().map(Transaction::txid).collect();
        let computed = merkle_root(&txids);
        if computed != self.header.merkle_root {
            return Err(ReconstructionError::MerkleMismatch {
                expected: self.header.merkle_root,
                computed,
            });
        }

        let mut seen = HashSet::with_capacity(transactions.len());
        for (position, tx) in transactions.iter().enumerate() {
            if !seen.insert(tx.wtxid()) {
                return Err(ReconstructionError::DuplicateTransaction {
                    slot: position as u16,
                });
            }
        }

        Ok(Block {
            header: self.header,
            transactions,
        })
    }

    /// Header of the block being reconstructed.
    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    /// Short ID key for this announcement.
    pub fn key(&self) -> &ShortIdKey {
        &self.key
    }

    /// Total number of transaction slots.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots not yet bound to a transaction.
    pub fn unresolved_count(&self) -> usize {
        self.unresolved
    }

    /// True once every slot is bound (finalize will only check, not fetch).
    pub fn is_complete(&self) -> bool {
        self.unresolved == 0
    }

    /// Read-only view of the slot sequence.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }
}
