//! # Envelope Guard Benchmarks
//!
//! | Path | Measured |
//! |------|----------|
//! | Canonical digest | normalization + SHA-256 by payload size |
//! | Signature | Ed25519 sign and base58 verify |
//! | Full call | decode, binding checks, replay write, verify |

use criterion::{criterion_group, criterion_main};
use eg_tests::benchmarks::envelope::{
    bench_canonical_digest, bench_signature_verify, bench_verify_call,
};

criterion_group!(
    benches,
    bench_canonical_digest,
    bench_signature_verify,
    bench_verify_call
);
criterion_main!(benches);
