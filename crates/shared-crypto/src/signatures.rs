//! # Ed25519 Signatures
//!
//! Twisted Edwards curve signatures with deterministic nonces.
//!
//! ## Security Properties
//!
//! - No RNG dependency at sign time (deterministic nonce from message)
//! - Length and point checks fail closed with `CryptoError`
//! - `SigningKey` wipes its own secret on drop; exported secrets are `Zeroizing`

use crate::encoding::{b58_decode, b58_encode};
use crate::CryptoError;
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use std::fmt;
use zeroize::Zeroizing;

/// Raw public key length in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;
/// Detached signature length in bytes.
pub const SIGNATURE_LENGTH: usize = 64;
/// Secret seed length in bytes.
pub const SEED_LENGTH: usize = 32;
/// Length of the `seed || public key` secret form.
pub const KEYPAIR_LENGTH: usize = 64;

/// Ed25519 public key (32 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ed25519PublicKey([u8; PUBLIC_KEY_LENGTH]);

impl Ed25519PublicKey {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Result<Self, CryptoError> {
        // Validate it's a valid point
        VerifyingKey::from_bytes(&bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self(bytes))
    }

    /// Create from a slice of any length, rejecting anything but 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let array: [u8; PUBLIC_KEY_LENGTH] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidKeyLength {
                    expected: PUBLIC_KEY_LENGTH,
                    actual: bytes.len(),
                })?;
        Self::from_bytes(array)
    }

    /// Decode from base58 text.
    pub fn from_base58(text: &str) -> Result<Self, CryptoError> {
        Self::from_slice(&b58_decode(text)?)
    }

    /// Encode as base58 text.
    pub fn to_base58(&self) -> String {
        b58_encode(&self.0)
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }

    /// Verify a signature.
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> Result<(), CryptoError> {
        let verifying_key =
            VerifyingKey::from_bytes(&self.0).map_err(|_| CryptoError::InvalidPublicKey)?;

        let sig = ed25519_dalek::Signature::from_bytes(&signature.0);

        verifying_key
            .verify(message, &sig)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }
}

/// Ed25519 signature (64 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ed25519Signature([u8; SIGNATURE_LENGTH]);

impl Ed25519Signature {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Create from a slice of any length, rejecting anything but 64 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let array: [u8; SIGNATURE_LENGTH] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidSignatureLength {
                    expected: SIGNATURE_LENGTH,
                    actual: bytes.len(),
                })?;
        Ok(Self(array))
    }

    /// Decode from base58 text.
    pub fn from_base58(text: &str) -> Result<Self, CryptoError> {
        Self::from_slice(&b58_decode(text)?)
    }

    /// Encode as base58 text.
    pub fn to_base58(&self) -> String {
        b58_encode(&self.0)
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }
}

/// Ed25519 keypair.
pub struct Ed25519KeyPair {
    signing_key: SigningKey,
}

impl Ed25519KeyPair {
    /// Generate random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Create from secret seed (32 bytes).
    pub fn from_seed(seed: [u8; SEED_LENGTH]) -> Self {
        let signing_key = SigningKey::from_bytes(&seed);
        Self { signing_key }
    }

    /// Create from secret bytes: a 32-byte seed or the 64-byte `seed || public key` form.
    ///
    /// The 64-byte form is rejected if its public half does not belong to the seed.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        match bytes.len() {
            SEED_LENGTH => {
                let mut seed = Zeroizing::new([0u8; SEED_LENGTH]);
                seed.copy_from_slice(bytes);
                Ok(Self::from_seed(*seed))
            }
            KEYPAIR_LENGTH => {
                let mut keypair = Zeroizing::new([0u8; KEYPAIR_LENGTH]);
                keypair.copy_from_slice(bytes);
                let signing_key = SigningKey::from_keypair_bytes(&keypair)
                    .map_err(|_| CryptoError::InvalidPrivateKey)?;
                Ok(Self { signing_key })
            }
            actual => Err(CryptoError::InvalidKeyLength {
                expected: KEYPAIR_LENGTH,
                actual,
            }),
        }
    }

    /// Decode secret bytes from base58 text (see [`Self::from_secret_bytes`]).
    pub fn from_base58(text: &str) -> Result<Self, CryptoError> {
        let bytes = Zeroizing::new(b58_decode(text)?);
        Self::from_secret_bytes(&bytes)
    }

    /// Get public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        let verifying_key = self.signing_key.verifying_key();
        Ed25519PublicKey(verifying_key.to_bytes())
    }

    /// Sign a message (deterministic - no RNG needed).
    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        let sig = self.signing_key.sign(message);
        Ed25519Signature(sig.to_bytes())
    }

    /// Get secret seed (for serialization).
    pub fn to_seed(&self) -> Zeroizing<[u8; SEED_LENGTH]> {
        Zeroizing::new(self.signing_key.to_bytes())
    }

    /// Get the 64-byte `seed || public key` form.
    pub fn to_keypair_bytes(&self) -> Zeroizing<[u8; KEYPAIR_LENGTH]> {
        Zeroizing::new(self.signing_key.to_keypair_bytes())
    }

    /// Encode the 64-byte secret form as base58 text.
    pub fn to_base58(&self) -> Zeroizing<String> {
        Zeroizing::new(b58_encode(&self.to_keypair_bytes()[..]))
    }
}

impl fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ed25519KeyPair")
            .field("public_key", &self.public_key().to_base58())
            .finish_non_exhaustive()
    }
}
