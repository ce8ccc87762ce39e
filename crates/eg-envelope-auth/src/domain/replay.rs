//! # Replay Guard
//!
//! One-time-use records for authenticated requests.
//!
//! ## Protocol
//!
//! ```text
//! key = base64(sha256(payload ++ public_key_b58 ++ nonce ++ channel ++ chaincode ++ method))
//! composite = \0 namespace \0 key \0
//!
//! get(composite) == None  → put(composite, sentinel), Fresh
//! get(composite) == Some  → AlreadySeen (no write)
//! ```
//!
//! The guard is a read followed by a write, not a compare-and-swap. Two
//! concurrent executions of the same envelope both observe `Fresh`; only the
//! host ledger's commit-time read/write conflict check stops the second one.
//!
//! The key covers a different field set than the signature digest: it uses the
//! raw payload and omits the deadline. Records are never updated or deleted.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::config::EnvelopeConfig;
use super::errors::StoreError;
use crate::ports::outbound::StateStore;
use shared_crypto::sha256_many;
use shared_types::Envelope;

/// Lowest code point, used as the composite key separator.
const COMPOSITE_KEY_SEPARATOR: char = '\u{0}';
/// Highest code point, reserved by ledgers for range-scan bounds.
const MAX_UNICODE_RUNE: char = '\u{10FFFF}';

/// Outcome of a replay check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// No record existed; one has now been written.
    Fresh,
    /// A record already exists; nothing was written.
    AlreadySeen,
}

/// Derived identifier of one logical request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReplayKey(String);

impl ReplayKey {
    /// Derive the key from the identifying fields of a request.
    pub fn derive(
        payload: &[u8],
        public_key: &str,
        nonce: &str,
        channel: &str,
        chaincode: &str,
        method: &str,
    ) -> Self {
        let hashed = sha256_many(&[
            payload,
            public_key.as_bytes(),
            nonce.as_bytes(),
            channel.as_bytes(),
            chaincode.as_bytes(),
            method.as_bytes(),
        ]);
        Self(STANDARD.encode(hashed))
    }

    /// Key for a decoded envelope and its call payload.
    pub fn for_envelope(envelope: &Envelope, payload: &[u8]) -> Self {
        Self::derive(
            payload,
            &envelope.public_key,
            &envelope.nonce,
            &envelope.channel,
            &envelope.chaincode,
            &envelope.method,
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Build a namespaced composite key: `\0 namespace \0 part \0 ...`.
///
/// Namespace and parts must not contain `U+0000` or `U+10FFFF`.
pub fn composite_key(namespace: &str, parts: &[&str]) -> Result<String, StoreError> {
    validate_key_component(namespace)?;
    let mut key = String::with_capacity(
        2 + namespace.len() + parts.iter().map(|p| p.len() + 1).sum::<usize>(),
    );
    key.push(COMPOSITE_KEY_SEPARATOR);
    key.push_str(namespace);
    key.push(COMPOSITE_KEY_SEPARATOR);
    for part in parts {
        validate_key_component(part)?;
        key.push_str(part);
        key.push(COMPOSITE_KEY_SEPARATOR);
    }
    Ok(key)
}

fn validate_key_component(component: &str) -> Result<(), StoreError> {
    if component.contains([COMPOSITE_KEY_SEPARATOR, MAX_UNICODE_RUNE]) {
        return Err(StoreError::InvalidKeyComponent(component.to_string()));
    }
    Ok(())
}

/// Checks and consumes replay records in a `StateStore`.
#[derive(Debug, Clone)]
pub struct ReplayGuard {
    namespace: String,
    sentinel: Vec<u8>,
}

impl ReplayGuard {
    pub fn new(namespace: impl Into<String>, sentinel: impl Into<Vec<u8>>) -> Self {
        Self {
            namespace: namespace.into(),
            sentinel: sentinel.into(),
        }
    }

    pub fn from_config(config: &EnvelopeConfig) -> Self {
        Self::new(config.nonce_namespace.clone(), config.sentinel.clone())
    }

    /// Write a record for `key` unless one exists.
    pub fn check_and_consume<S: StateStore + ?Sized>(
        &self,
        store: &mut S,
        key: &ReplayKey,
    ) -> Result<Freshness, StoreError> {
        let composite = store.create_composite_key(&self.namespace, &[key.as_str()])?;
        if store.get_state(&composite)?.is_some() {
            return Ok(Freshness::AlreadySeen);
        }
        store.put_state(&composite, &self.sentinel)?;
        Ok(Freshness::Fresh)
    }

    /// Returns true if a record for `key` exists. Never writes.
    pub fn is_consumed<S: StateStore + ?Sized>(
        &self,
        store: &S,
        key: &ReplayKey,
    ) -> Result<bool, StoreError> {
        let composite = store.create_composite_key(&self.namespace, &[key.as_str()])?;
        Ok(store.get_state(&composite)?.is_some())
    }
}
