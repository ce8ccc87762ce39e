//! # Envelope Authentication
//!
//! Verifies the signed envelope attached to a state-changing contract call and
//! guarantees that one authenticated request executes at most once.
//!
//! ## Architecture
//!
//! This crate follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): canonical encoding, signatures, replay records
//! - **Ports Layer** (`ports/`): verification API and the state/serializer/clock SPI
//! - **Adapters** (`adapters/`): in-memory and versioned stores, serializers, clocks
//! - **Service Layer** (`service.rs`): the ordered verification pipeline
//! - **Middleware** (`middleware.rs`): handler wrapping and identity publishing
//!
//! ## Security Notes
//!
//! - **Binding**: an envelope is valid for one channel, contract and method only
//! - **Replay Protection**: the replay record is a read-then-write on ledger
//!   state. Concurrent duplicates are stopped by the host ledger's commit-time
//!   read conflict check, not by this crate.
//! - **Nonce Burning**: the replay record is written before the signature is
//!   checked; a forged envelope consumes its nonce

pub mod adapters;
pub mod client;
pub mod domain;
pub mod middleware;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::{
    FailingStateStore, FixedTimeSource, GenericSerializer, InMemoryStateStore, ReadWriteSet,
    SystemTimeSource, TxSimulation, VersionedLedger,
};
pub use client::{build_call_args, create_nonce, sign_envelope, EnvelopeRequest};
pub use domain::canonical::{digest, encode, normalize_payload, CanonicalFields};
pub use domain::config::{ConfigError, EnvelopeConfig, SerializationTarget};
pub use domain::errors::{CommitError, EnvelopeError, SerializationError, StoreError};
pub use domain::replay::{composite_key, Freshness, ReplayGuard, ReplayKey};
pub use domain::signature::{generate_keypair, sign, sign_with_secret, verify, verify_base58};
pub use middleware::{CallContext, EnvelopeMiddleware};
pub use ports::inbound::EnvelopeVerificationApi;
pub use ports::outbound::{EnvelopeSerializer, StateStore, TimeSource, Timestamp};
pub use service::EnvelopeVerifier;
