//! # Envelope Configuration
//!
//! ## Compatibility Note
//!
//! `nonce_namespace` and `sentinel` shape the replay records written to the
//! ledger. Changing either on a live ledger makes previously consumed envelopes
//! look fresh again.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default composite-key namespace for replay records.
pub const DEFAULT_NONCE_NAMESPACE: &str = "nonce";
/// Default value stored in a replay record.
pub const DEFAULT_SENTINEL: &[u8] = b"0";
/// Default call-context parameter holding the verified public key.
pub const DEFAULT_IDENTITY_PARAM: &str = "envelopePubkey";

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Nonce namespace must not be empty")]
    EmptyNamespace,

    #[error("Replay sentinel must not be empty")]
    EmptySentinel,

    #[error("Identity parameter name must not be empty")]
    EmptyIdentityParam,

    #[error("Unknown envelope format: {0:?} (expected \"json\" or \"binary\")")]
    UnknownFormat(String),
}

/// Wire format envelopes are decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerializationTarget {
    /// JSON, as produced by browser and mobile clients.
    #[default]
    Json,
    /// Compact binary (bincode).
    Binary,
}

impl FromStr for SerializationTarget {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "binary" | "bincode" => Ok(Self::Binary),
            _ => Err(ConfigError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for SerializationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Binary => f.write_str("binary"),
        }
    }
}

/// Configuration for envelope verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvelopeConfig {
    /// Composite-key namespace of replay records (default: `nonce`).
    pub nonce_namespace: String,

    /// Value written into each replay record (default: `b"0"`).
    pub sentinel: Vec<u8>,

    /// Call-context parameter the verified public key is published under.
    pub identity_param: String,

    /// Envelope wire format.
    pub format: SerializationTarget,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            nonce_namespace: DEFAULT_NONCE_NAMESPACE.to_string(),
            sentinel: DEFAULT_SENTINEL.to_vec(),
            identity_param: DEFAULT_IDENTITY_PARAM.to_string(),
            format: SerializationTarget::Json,
        }
    }
}

impl EnvelopeConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `EG_NONCE_NAMESPACE`: Replay record namespace (default: nonce)
    /// - `EG_IDENTITY_PARAM`: Context parameter for the signer (default: envelopePubkey)
    /// - `EG_ENVELOPE_FORMAT`: `json` or `binary` (default: json)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(namespace) = lookup("EG_NONCE_NAMESPACE") {
            config.nonce_namespace = namespace;
        }
        if let Some(param) = lookup("EG_IDENTITY_PARAM") {
            config.identity_param = param;
        }
        if let Some(format) = lookup("EG_ENVELOPE_FORMAT") {
            config.format = format.parse()?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Check that every field is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nonce_namespace.is_empty() {
            return Err(ConfigError::EmptyNamespace);
        }
        if self.sentinel.is_empty() {
            return Err(ConfigError::EmptySentinel);
        }
        if self.identity_param.is_empty() {
            return Err(ConfigError::EmptyIdentityParam);
        }
        Ok(())
    }

    /// Set the replay record namespace.
    pub fn with_nonce_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.nonce_namespace = namespace.into();
        self
    }

    /// Set the replay record value.
    pub fn with_sentinel(mut self, sentinel: impl Into<Vec<u8>>) -> Self {
        self.sentinel = sentinel.into();
        self
    }

    /// Set the identity parameter name.
    pub fn with_identity_param(mut self, param: impl Into<String>) -> Self {
        self.identity_param = param.into();
        self
    }

    /// Set the envelope wire format.
    pub fn with_format(mut self, format: SerializationTarget) -> Self {
        self.format = format;
        self
    }
}
