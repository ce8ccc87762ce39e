//! # Envelope Guard Benchmarks
//!
//! Bench bodies shared by `benches/envelope_benchmarks.rs`.
