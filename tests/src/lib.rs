//! # Compact Block Relay Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Deterministic transaction/block builders
//! │
//! └── integration/      # End-to-end reconstruction flows
//!     ├── reconstruction_flows.rs   # Happy paths and scale scenarios
//!     └── adversarial.rs            # Malformed and malicious inputs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p cb-tests
//!
//! # By category
//! cargo test -p cb-tests integration::
//!
//! # Benchmarks
//! cargo bench -p cb-tests
//! ```
