//! # Envelope Signature Scheme (Ed25519)
//!
//! Signs and verifies the canonical digest of an envelope's fields.
//!
//! ## Security Notes
//!
//! - **Deterministic**: Ed25519 needs no randomness at sign time
//! - **Fail Closed**: undecodable base58, wrong lengths and invalid points are
//!   verification failures, never panics
//! - **Key Binding**: the signer's public key is itself part of the digest

use super::canonical::{digest, CanonicalFields};
use shared_crypto::{
    b58_decode, CryptoError, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature,
};

/// Generate a fresh keypair from the OS-seeded thread RNG.
pub fn generate_keypair() -> (Ed25519PublicKey, Ed25519KeyPair) {
    let keypair = Ed25519KeyPair::generate();
    (keypair.public_key(), keypair)
}

/// Sign the canonical digest of `fields`.
///
/// Returns the signer's public key alongside the detached signature.
pub fn sign(
    fields: &CanonicalFields<'_>,
    keypair: &Ed25519KeyPair,
) -> (Ed25519PublicKey, Ed25519Signature) {
    let public_key = keypair.public_key();
    let hashed = digest(fields, public_key.as_bytes());
    (public_key, keypair.sign(&hashed))
}

/// Sign with raw secret bytes (32-byte seed or 64-byte `seed || public key`).
pub fn sign_with_secret(
    fields: &CanonicalFields<'_>,
    private_key: &[u8],
) -> Result<(Ed25519PublicKey, Ed25519Signature), CryptoError> {
    let keypair = Ed25519KeyPair::from_secret_bytes(private_key)?;
    Ok(sign(fields, &keypair))
}

/// Verify a detached signature over `fields` with raw key and signature bytes.
pub fn verify(
    fields: &CanonicalFields<'_>,
    public_key: &[u8],
    signature: &[u8],
) -> Result<(), CryptoError> {
    let key = Ed25519PublicKey::from_slice(public_key)?;
    let signature = Ed25519Signature::from_slice(signature)?;
    let hashed = digest(fields, public_key);
    key.verify(&hashed, &signature)
}

/// Verify with the base58 text forms carried by an envelope.
pub fn verify_base58(
    fields: &CanonicalFields<'_>,
    public_key: &str,
    signature: &str,
) -> Result<(), CryptoError> {
    let public_key = b58_decode(public_key)?;
    let signature = b58_decode(signature)?;
    verify(fields, &public_key, &signature)
}
