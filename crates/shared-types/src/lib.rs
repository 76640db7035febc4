//! # Shared Types
//!
//! Core blockchain entities shared across subsystems: hashes, block headers,
//! witness-carrying transactions, blocks, and merkle-root computation.

pub mod entities;
pub mod merkle;

pub use entities::{Block, BlockHeader, Hash, Transaction, TxInput, TxOutput};
pub use merkle::merkle_root;
