//! # Domain Layer for Compact Block Reconstruction
//!
//! Pure business logic with no I/O dependencies. This is the innermost layer
//! of the hexagonal architecture.
//!
//! ## Contents
//!
//! - **entities**: Wire entities (`CompactBlock`, `PrefilledTx`, `BlockTxnRequest`)
//! - **value_objects**: Configuration and bounded caches (`ReconstructionConfig`, `ExtraTxnCache`)
//! - **services**: Short ID derivation and the per-block `CandidateIndex`
//! - **reconstruction**: The slot state machine (`ReconstructionState`)
//! - **errors**: `ReconstructionError`
//!
//! ## Design Principles
//!
//! 1. **No I/O**: All functions are pure and synchronous
//! 2. **No pool mutation**: Reconstruction only ever reads candidate pools
//! 3. **Testable**: All logic can be unit tested without mocks

mod entities;
mod errors;
mod reconstruction;
mod services;
mod value_objects;

pub use entities::*;
pub use errors::*;
pub use reconstruction::*;
pub use services::*;
pub use value_objects::*;
