//! # Compact Block Reconstruction Subsystem
//!
//! Rebuilds a full block from a compact announcement (header + 6-byte short
//! transaction IDs) plus transactions the node already holds, avoiding
//! retransmission of transaction bodies.
//!
//! ## Architecture Role
//!
//! ```text
//! [Peer Connection Layer] ──CompactBlock──→ [Reconstruction Engine]
//!                                                  │
//!                             decode → index local pools → match sweep
//!                                                  │
//!                          ┌───── all slots resolved? ─────┐
//!                          ↓ yes                           ↓ no
//!                     finalize block          emit missing slot indices
//!                          ↑                               │
//!                          └── caller fetches via BlockTxnRequest ──┘
//! ```
//!
//! ## Safety Properties
//!
//! - Short IDs are keyed per announcement (SipHash under a header+nonce
//!   derived key), so collisions cannot be precomputed by an adversary.
//! - A short ID matched by two distinct local transactions is treated as
//!   unresolved and re-requested, never guessed.
//! - Finalization verifies the merkle root and rejects duplicate
//!   transactions before the block is handed to consensus validation.

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::*;
pub use ports::inbound::BlockReconstructionApi;
pub use ports::outbound::MempoolView;
pub use service::BlockReconstructionService;
