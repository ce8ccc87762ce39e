//! # Envelope Errors
//!
//! Flat rejection taxonomy for envelope verification plus the errors of the
//! collaborators it talks to (state store, serializer, ledger commit).
//!
//! Every `EnvelopeError` is terminal for the call that produced it. Recovery,
//! such as resubmitting with a fresh nonce, is up to the caller.

use thiserror::Error;

/// Errors from the key-value state store collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A composite key namespace or part contains a forbidden code point.
    #[error("Invalid composite key component: {0:?}")]
    InvalidKeyComponent(String),

    /// Reading state failed.
    #[error("State read failed: {0}")]
    ReadFailed(String),

    /// Writing state failed.
    #[error("State write failed: {0}")]
    WriteFailed(String),

    /// An in-memory store lock was poisoned by a panicking writer.
    #[error("State lock poisoned")]
    LockPoisoned,
}

/// Serializer failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Serialization error: {message}")]
pub struct SerializationError {
    pub message: String,
}

impl SerializationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors surfaced when committing a simulated transaction to a versioned ledger.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommitError {
    /// A key read during simulation changed before commit.
    #[error("MVCC read conflict on key {key:?}")]
    MvccReadConflict { key: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Reasons an envelope is rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnvelopeError {
    /// Call arguments do not include an envelope.
    #[error("Envelope signature not found: call has {arg_count} arguments, need 3")]
    MissingSignature { arg_count: usize },

    /// Envelope bytes do not decode into an `Envelope`.
    #[error("Envelope decode failed: {0}")]
    DecodeError(#[from] SerializationError),

    /// Deadline set and already in the past.
    #[error("Envelope deadline expired: deadline {deadline} < now {now}")]
    Expired { deadline: i64, now: u64 },

    /// Envelope was signed for a different method than the one dispatched.
    #[error("Invalid method: envelope is for {envelope:?}, call is {dispatched:?}")]
    InvalidMethod { envelope: String, dispatched: String },

    /// Envelope was signed for a different channel than the current one.
    #[error("Invalid channel: envelope is for {envelope:?}, current is {current:?}")]
    InvalidChannel { envelope: String, current: String },

    /// A replay record for this request already exists.
    #[error("Transaction already executed")]
    AlreadyExecuted,

    /// Cryptographic verification failed.
    #[error("Envelope signature check failed")]
    SignatureInvalid,

    /// The state store failed while checking or writing the replay record.
    #[error("State store error: {0}")]
    StoreError(#[from] StoreError),
}

impl EnvelopeError {
    /// Stable label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingSignature { .. } => "missing_signature",
            Self::DecodeError(_) => "decode_error",
            Self::Expired { .. } => "expired",
            Self::InvalidMethod { .. } => "invalid_method",
            Self::InvalidChannel { .. } => "invalid_channel",
            Self::AlreadyExecuted => "already_executed",
            Self::SignatureInvalid => "signature_invalid",
            Self::StoreError(_) => "store_error",
        }
    }
}
