//! # Envelope Guard Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── benchmarks/       # Criterion bench bodies, driven from benches/
//! │   └── envelope.rs
//! │
//! └── integration/      # End-to-end flows across crates
//!     ├── flows.rs      # Client signs, verifier accepts/rejects
//!     └── concurrency.rs# Versioned ledger races on replay records
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p eg-tests
//!
//! # By category
//! cargo test -p eg-tests integration::flows
//! cargo test -p eg-tests integration::concurrency
//!
//! # Benchmarks
//! cargo bench -p eg-tests
//! ```

pub mod benchmarks;
pub mod integration;
