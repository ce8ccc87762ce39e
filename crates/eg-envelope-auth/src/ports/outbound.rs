//! # Outbound Ports (Driven Ports / SPI)
//!
//! Traits for the collaborators envelope verification depends on.

use crate::domain::errors::{SerializationError, StoreError};
use crate::domain::replay;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Unix timestamp in whole seconds.
pub type Timestamp = u64;

/// Key-value world state of the current transaction.
///
/// Writes made through `put_state` belong to the executing transaction and
/// become durable only if the host ledger commits it.
pub trait StateStore {
    /// Identifier of the channel the transaction executes on.
    fn channel_id(&self) -> &str;

    /// Build a namespaced composite key.
    ///
    /// # Errors
    /// * `StoreError::InvalidKeyComponent` - a component contains `U+0000` or `U+10FFFF`
    fn create_composite_key(&self, namespace: &str, parts: &[&str]) -> Result<String, StoreError> {
        replay::composite_key(namespace, parts)
    }

    /// Read a value. `Ok(None)` means the key is absent.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write a value.
    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError>;
}

/// Decoder for envelope bytes carried in call arguments.
pub trait EnvelopeSerializer: Send + Sync {
    /// Decode bytes into `T`.
    fn from_bytes<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, SerializationError>;

    /// Encode `T` into bytes.
    fn to_bytes<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, SerializationError>;
}

/// Source of the current time.
pub trait TimeSource: Send + Sync {
    /// Current Unix time in seconds.
    fn now(&self) -> Timestamp;
}
