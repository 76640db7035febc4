//! # Core Domain Entities
//!
//! Defines the core chain entities: `BlockHeader`, `Transaction` (with
//! segregated witness data), and `Block`.
//!
//! ## Transaction Identity
//!
//! A transaction has two identities:
//!
//! - [`Transaction::txid`]: hash of the transaction *excluding* witness data.
//!   The header merkle root commits to txids.
//! - [`Transaction::wtxid`]: hash *including* witness data. Relay-level
//!   protocols (compact block short IDs, duplicate detection) key on wtxids,
//!   since two transactions may differ only in witness content.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A 32-byte SHA-256 hash.
pub type Hash = [u8; 32];

/// The header of a block containing metadata and the transaction commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BlockHeader {
    /// Protocol version for this block.
    pub version: u32,
    /// Hash of the parent block (creates the chain linkage).
    pub parent_hash: Hash,
    /// Merkle root of all transaction ids in the block.
    pub merkle_root: Hash,
    /// Unix timestamp when the block was proposed.
    pub timestamp: u64,
    /// Difficulty target in compact form.
    pub bits: u32,
    /// Proof value found by the block producer.
    pub proof: u64,
}

impl BlockHeader {
    /// Compute the block hash over all header fields.
    pub fn hash(&self) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(self.version.to_le_bytes());
        hasher.update(self.parent_hash);
        hasher.update(self.merkle_root);
        hasher.update(self.timestamp.to_le_bytes());
        hasher.update(self.bits.to_le_bytes());
        hasher.update(self.proof.to_le_bytes());
        hasher.finalize().into()
    }
}

/// A transaction input spending a previous output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInput {
    /// Txid of the output being spent (all zeroes for a coinbase).
    pub prev_txid: Hash,
    /// Output index being spent (`u32::MAX` for a coinbase).
    pub prev_vout: u32,
    /// Unlocking script.
    pub script_sig: Vec<u8>,
    /// Segregated witness stack for this input.
    pub witness: Vec<Vec<u8>>,
}

/// A transaction output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    /// Value in base units.
    pub value: u64,
    /// Locking script.
    pub script_pubkey: Vec<u8>,
}

/// A transaction with optional segregated witness data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction format version.
    pub version: u32,
    /// Inputs (exactly one, all-zero prevout, for a coinbase).
    pub inputs: Vec<TxInput>,
    /// Outputs.
    pub outputs: Vec<TxOutput>,
    /// Earliest time/height this transaction may be mined.
    pub lock_time: u32,
}

impl Transaction {
    /// Witness-excluded identity. Commits to everything except witness stacks.
    pub fn txid(&self) -> Hash {
        self.hash_with(false)
    }

    /// Witness-inclusive identity.
    pub fn wtxid(&self) -> Hash {
        self.hash_with(true)
    }

    /// True if this transaction has the coinbase input shape.
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1
            && self.inputs[0].prev_txid == [0u8; 32]
            && self.inputs[0].prev_vout == u32::MAX
    }

    /// True if any input carries witness data.
    pub fn has_witness(&self) -> bool {
        self.inputs.iter().any(|input| !input.witness.is_empty())
    }

    fn hash_with(&self, include_witness: bool) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(self.version.to_le_bytes());
        hasher.update((self.inputs.len() as u64).to_le_bytes());
        for input in &self.inputs {
            hasher.update(input.prev_txid);
            hasher.update(input.prev_vout.to_le_bytes());
            hasher.update((input.script_sig.len() as u64).to_le_bytes());
            hasher.update(&input.script_sig);
            if include_witness {
                hasher.update((input.witness.len() as u64).to_le_bytes());
                for item in &input.witness {
                    hasher.update((item.len() as u64).to_le_bytes());
                    hasher.update(item);
                }
            }
        }
        hasher.update((self.outputs.len() as u64).to_le_bytes());
        for output in &self.outputs {
            hasher.update(output.value.to_le_bytes());
            hasher.update((output.script_pubkey.len() as u64).to_le_bytes());
            hasher.update(&output.script_pubkey);
        }
        hasher.update(self.lock_time.to_le_bytes());
        hasher.finalize().into()
    }
}

/// A full block: header plus ordered transactions (coinbase first).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// The block header.
    pub header: BlockHeader,
    /// All transactions in block order.
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// The block hash (header hash).
    pub fn hash(&self) -> Hash {
        self.header.hash()
    }

    /// Merkle root recomputed from the transaction list.
    pub fn compute_merkle_root(&self) -> Hash {
        let txids: Vec<Hash> = self.transactions.iter().map(Transaction::txid).collect();
        crate::merkle::merkle_root(&txids)
    }
}
