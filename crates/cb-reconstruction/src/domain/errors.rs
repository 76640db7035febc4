//! Error types for compact block reconstruction.

use shared_types::Hash;
use thiserror::Error;

use super::services::ShortTxId;

/// Compact block reconstruction errors.
///
/// Structural errors are rejected at decode time, before any pool access,
/// and indicate a malformed announcement the caller should penalize.
/// Consensus-adjacent errors surface at finalize time and may indicate a
/// malicious full block rather than a malformed announcement; the caller's
/// response (block-level ban vs. re-request) differs, so they are distinct
/// variants, never folded together.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ReconstructionError {
    #[error("announcement declares zero transaction slots")]
    EmptyBlock,

    #[error("announcement declares {declared} slots (max {max})")]
    TooManySlots { declared: usize, max: usize },

    #[error("prefilled index {index} out of range for {slots} slots")]
    PrefilledOutOfRange { index: u16, slots: usize },

    #[error("prefilled indices not strictly increasing at index {index}")]
    NonIncreasingPrefilled { index: u16 },

    #[error("short ID {short_id:?} announced more than once")]
    DuplicateShortId { short_id: ShortTxId },

    #[error("supplied {supplied} transactions for {expected} missing slots")]
    WrongTransactionCount { supplied: usize, expected: usize },

    #[error("slot 0 is not a well-formed coinbase")]
    BadCoinbase,

    #[error("assembled merkle root does not match the header")]
    MerkleMismatch { expected: Hash, computed: Hash },

    #[error("duplicate transaction occupies slot {slot}")]
    DuplicateTransaction { slot: u16 },
}

impl ReconstructionError {
    /// Decode-time structural errors attributable to a malformed
    /// announcement (peer-penalty territory).
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::EmptyBlock
                | Self::TooManySlots { .. }
                | Self::PrefilledOutOfRange { .. }
                | Self::NonIncreasingPrefilled { .. }
                | Self::DuplicateShortId { .. }
        )
    }

    /// Finalize-time failures that may indicate a malicious full block.
    pub fn is_consensus_adjacent(&self) -> bool {
        matches!(
            self,
            Self::MerkleMismatch { .. } | Self::DuplicateTransaction { .. } | Self::BadCoinbase
        )
    }
}
