//! # Call `Envelope`
//!
//! The signed wrapper attached as the third argument of every state-changing call.
//!
//! ## Security Properties
//!
//! - **Binding**: `method`, `channel` and `chaincode` pin the envelope to exactly one
//!   contract entry point on one ledger.
//! - **One-Time Use**: `nonce` together with the binding fields identifies the
//!   request for replay protection.
//! - **Logical Expiry**: `deadline` bounds how long a signed envelope may be submitted.
//! - **Detached Signature**: `public_key` and `signature` are base58 text; the
//!   signature covers the canonical encoding, not these wire bytes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The signed envelope for one contract call.
///
/// Field names follow the front-end JSON format (`publicKey` in camelCase, with
/// `public_key` accepted on input). Fields absent from the JSON decode as empty.
///
/// An `Envelope` is decoded once per call and only ever borrowed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// Contract method this envelope authorizes.
    #[serde(default)]
    pub method: String,

    /// Ledger channel the call targets.
    #[serde(default)]
    pub channel: String,

    /// Contract identifier.
    #[serde(default)]
    pub chaincode: String,

    /// Caller-chosen uniqueness token. Not required to be monotonic.
    #[serde(default)]
    pub nonce: String,

    /// Optional expiry. `None` and the Unix epoch both mean "no expiry".
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,

    /// Base58-encoded raw Ed25519 public key (32 bytes).
    #[serde(default, alias = "public_key")]
    pub public_key: String,

    /// Base58-encoded detached Ed25519 signature (64 bytes).
    #[serde(default)]
    pub signature: String,
}

/// Returns true for exactly the Unix epoch, the wire form of "no deadline".
///
/// Instants inside the first second after the epoch are real deadlines.
#[must_use]
pub fn is_zero_deadline(deadline: &DateTime<Utc>) -> bool {
    deadline.timestamp() == 0 && deadline.timestamp_subsec_nanos() == 0
}

impl Envelope {
    /// The deadline that actually applies, treating the zero timestamp as unset.
    pub fn effective_deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline.filter(|d| !is_zero_deadline(d))
    }

    /// Returns true if `now_secs` (Unix seconds) is past the deadline.
    ///
    /// Comparison is in whole seconds: an envelope is still valid during the
    /// second its deadline falls in.
    #[must_use]
    pub fn is_expired_at(&self, now_secs: u64) -> bool {
        match self.effective_deadline() {
            Some(deadline) => {
                let now = i64::try_from(now_secs).unwrap_or(i64::MAX);
                deadline.timestamp() < now
            }
            None => false,
        }
    }
}
