//! # Canonical Encoding
//!
//! Deterministic byte form of the fields an envelope signature covers.
//!
//! ## Layout
//!
//! ```text
//! normalize(payload) ++ nonce ++ channel ++ chaincode ++ method ++ deadline ++ base58(public_key)
//! ```
//!
//! No delimiters separate the fields. Adding, removing or reordering a field
//! invalidates every signature issued so far.

use chrono::{DateTime, Utc};
use shared_crypto::{b58_encode, sha256, Hash};
use shared_types::{is_zero_deadline, Envelope};
use std::borrow::Cow;

/// Deadline rendering: UTC, millisecond precision (truncated), literal `Z`.
pub const DEADLINE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Separator the upstream JSON encoder sometimes emits between string values.
const SPACED_SEPARATOR: &[u8] = b"\", \"";
/// Separator it is collapsed to.
const COMPACT_SEPARATOR: &[u8] = b"\",\"";

/// The signed fields of one call, borrowed from the envelope and payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalFields<'a> {
    pub payload: &'a [u8],
    pub nonce: &'a str,
    pub channel: &'a str,
    pub chaincode: &'a str,
    pub method: &'a str,
    pub deadline: Option<DateTime<Utc>>,
}

impl<'a> CanonicalFields<'a> {
    /// Signed fields of a decoded envelope for the given call payload.
    pub fn from_envelope(envelope: &'a Envelope, payload: &'a [u8]) -> Self {
        Self {
            payload,
            nonce: &envelope.nonce,
            channel: &envelope.channel,
            chaincode: &envelope.chaincode,
            method: &envelope.method,
            deadline: envelope.deadline,
        }
    }
}

/// Collapse every `", "` (quote, comma, space, quote) into `","`.
///
/// This compensates for one formatting choice of the upstream JSON re-encoder so
/// that the same JSON value hashes the same way on both ends. It is not JSON
/// canonicalization: other whitespace is untouched, and the sequence is also
/// collapsed when it appears inside a string value.
///
/// Matches are found left to right without overlap.
pub fn normalize_payload(payload: &[u8]) -> Cow<'_, [u8]> {
    if !payload
        .windows(SPACED_SEPARATOR.len())
        .any(|window| window == SPACED_SEPARATOR)
    {
        return Cow::Borrowed(payload);
    }

    let mut normalized = Vec::with_capacity(payload.len());
    let mut rest = payload;
    while !rest.is_empty() {
        if rest.starts_with(SPACED_SEPARATOR) {
            normalized.extend_from_slice(COMPACT_SEPARATOR);
            rest = &rest[SPACED_SEPARATOR.len()..];
        } else {
            normalized.push(rest[0]);
            rest = &rest[1..];
        }
    }
    Cow::Owned(normalized)
}

/// Render a deadline for the canonical form. Unset and zero deadlines render empty.
pub fn format_deadline(deadline: Option<DateTime<Utc>>) -> String {
    match deadline {
        Some(d) if !is_zero_deadline(&d) => d.format(DEADLINE_FORMAT).to_string(),
        _ => String::new(),
    }
}

/// Canonical byte encoding of the signed fields.
pub fn encode(fields: &CanonicalFields<'_>, public_key: &[u8]) -> Vec<u8> {
    let payload = normalize_payload(fields.payload);
    let deadline = format_deadline(fields.deadline);
    let public_key = b58_encode(public_key);

    let mut encoded = Vec::with_capacity(
        payload.len()
            + fields.nonce.len()
            + fields.channel.len()
            + fields.chaincode.len()
            + fields.method.len()
            + deadline.len()
            + public_key.len(),
    );
    encoded.extend_from_slice(&payload);
    encoded.extend_from_slice(fields.nonce.as_bytes());
    encoded.extend_from_slice(fields.channel.as_bytes());
    encoded.extend_from_slice(fields.chaincode.as_bytes());
    encoded.extend_from_slice(fields.method.as_bytes());
    encoded.extend_from_slice(deadline.as_bytes());
    encoded.extend_from_slice(public_key.as_bytes());
    encoded
}

/// SHA-256 of the canonical encoding. This is the message that gets signed.
pub fn digest(fields: &CanonicalFields<'_>, public_key: &[u8]) -> Hash {
    sha256(&encode(fields, public_key))
}
