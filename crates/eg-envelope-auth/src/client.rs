//! # Client Envelope Construction
//!
//! Helpers for callers that build and sign envelopes. The verifier never uses
//! these; they live here so both sides share one canonical encoding.

use crate::domain::canonical::CanonicalFields;
use crate::domain::errors::SerializationError;
use crate::domain::signature;
use crate::ports::outbound::{EnvelopeSerializer, TimeSource};
use chrono::{DateTime, Utc};
use shared_crypto::Ed25519KeyPair;
use shared_types::{CallArgs, Envelope};

/// Nonce derived from the current Unix time, as decimal text.
///
/// Two envelopes for the same call signed within one second get the same
/// nonce and therefore the same replay key.
pub fn create_nonce<T: TimeSource + ?Sized>(time: &T) -> String {
    time.now().to_string()
}

/// The fields a client signs for one call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnvelopeRequest {
    pub payload: Vec<u8>,
    pub nonce: String,
    pub channel: String,
    pub chaincode: String,
    pub method: String,
    pub deadline: Option<DateTime<Utc>>,
}

impl EnvelopeRequest {
    pub fn new(
        channel: impl Into<String>,
        chaincode: impl Into<String>,
        method: impl Into<String>,
        payload: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            payload: payload.into(),
            channel: channel.into(),
            chaincode: chaincode.into(),
            method: method.into(),
            ..Self::default()
        }
    }

    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = nonce.into();
        self
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Borrow the request as canonical fields.
    pub fn fields(&self) -> CanonicalFields<'_> {
        CanonicalFields {
            payload: &self.payload,
            nonce: &self.nonce,
            channel: &self.channel,
            chaincode: &self.chaincode,
            method: &self.method,
            deadline: self.deadline,
        }
    }
}

/// Sign `request` and package the result as an envelope.
pub fn sign_envelope(request: &EnvelopeRequest, keypair: &Ed25519KeyPair) -> Envelope {
    let (public_key, signature) = signature::sign(&request.fields(), keypair);
    Envelope {
        method: request.method.clone(),
        channel: request.channel.clone(),
        chaincode: request.chaincode.clone(),
        nonce: request.nonce.clone(),
        deadline: request.deadline,
        public_key: public_key.to_base58(),
        signature: signature.to_base58(),
    }
}

/// Build the `[method, payload, envelope]` argument list for a signed call.
pub fn build_call_args<Z: EnvelopeSerializer + ?Sized>(
    serializer: &Z,
    request: &EnvelopeRequest,
    envelope: &Envelope,
) -> Result<CallArgs, SerializationError> {
    let encoded = serializer.to_bytes(envelope)?;
    Ok(CallArgs::new(
        request.method.as_bytes(),
        request.payload.clone(),
        encoded,
    ))
}
