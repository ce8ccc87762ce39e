//! # Shared Crypto - Envelope Cryptographic Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `signatures` | Ed25519 | Detached envelope signatures |
//! | `hashing` | SHA-256 | Canonical digests and replay keys |
//! | `encoding` | Base58 | Text form of keys and signatures |
//!
//! ## Security Properties
//!
//! - **Ed25519**: Deterministic nonces, no RNG dependency at sign time
//! - **Fail Closed**: Malformed keys and signatures surface as `CryptoError`, never panics
//! - **Secret Hygiene**: Exported secret bytes are wrapped in `Zeroizing`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod encoding;
pub mod errors;
pub mod hashing;
pub mod signatures;

// Re-exports
pub use encoding::{b58_decode, b58_encode};
pub use errors::CryptoError;
pub use hashing::{sha256, sha256_many, Hash};
pub use signatures::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
