//! # Base58 Text Encoding
//!
//! Keys and signatures cross the envelope boundary as base58 text (Bitcoin alphabet).

use crate::CryptoError;

/// Encode raw bytes as base58 text.
pub fn b58_encode(bytes: &[u8]) -> String {
    bs58::encode(bytes).into_string()
}

/// Decode base58 text into raw bytes.
pub fn b58_decode(text: &str) -> Result<Vec<u8>, CryptoError> {
    bs58::decode(text)
        .into_vec()
        .map_err(|e| CryptoError::InvalidEncoding(e.to_string()))
}
