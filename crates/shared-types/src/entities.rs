//! # Call Entities
//!
//! Positional call arguments, handler kinds and the authenticated identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte hash (SHA-256).
pub type Hash = [u8; 32];

// =============================================================================
// CALL ARGUMENTS
// =============================================================================

/// Position of the method name in the call arguments.
pub const METHOD_NAME_POS: usize = 0;
/// Position of the opaque payload in the call arguments.
pub const PAYLOAD_POS: usize = 1;
/// Position of the serialized envelope in the call arguments.
pub const ENVELOPE_POS: usize = 2;
/// Minimum number of arguments a signed call carries.
pub const SIGNED_ARG_COUNT: usize = 3;

/// Ordered byte-string arguments of a contract call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CallArgs(Vec<Vec<u8>>);

impl CallArgs {
    /// Build a signed call: `[method, payload, envelope]`.
    pub fn new(method: impl Into<Vec<u8>>, payload: impl Into<Vec<u8>>, envelope: Vec<u8>) -> Self {
        Self(vec![method.into(), payload.into(), envelope])
    }

    /// Build a call without an envelope: `[method, payload]`.
    pub fn unsigned(method: impl Into<Vec<u8>>, payload: impl Into<Vec<u8>>) -> Self {
        Self(vec![method.into(), payload.into()])
    }

    pub fn method(&self) -> Option<&[u8]> {
        self.get(METHOD_NAME_POS)
    }

    pub fn payload(&self) -> Option<&[u8]> {
        self.get(PAYLOAD_POS)
    }

    pub fn envelope(&self) -> Option<&[u8]> {
        self.get(ENVELOPE_POS)
    }

    /// Returns true if the call carries an envelope argument.
    #[must_use]
    pub fn is_signed(&self) -> bool {
        self.0.len() >= SIGNED_ARG_COUNT
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Vec<u8>] {
        &self.0
    }

    fn get(&self, pos: usize) -> Option<&[u8]> {
        self.0.get(pos).map(Vec::as_slice)
    }
}

impl From<Vec<Vec<u8>>> for CallArgs {
    fn from(args: Vec<Vec<u8>>) -> Self {
        Self(args)
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// Kind of contract handler a call is routed to.
///
/// Only `Invoke` handlers change state, so only they require an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandlerType {
    /// State-changing entry point.
    Invoke,
    /// Read-only entry point.
    Query,
}

// =============================================================================
// IDENTITY
// =============================================================================

/// The authenticated caller of a call: the base58 public key that signed it.
///
/// Owned by the call context for the duration of one call; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    public_key: String,
}

impl Identity {
    pub fn new(public_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
        }
    }

    /// Base58-encoded public key of the signer.
    pub fn public_key(&self) -> &str {
        &self.public_key
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.public_key)
    }
}
