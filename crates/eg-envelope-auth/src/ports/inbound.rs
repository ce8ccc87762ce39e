//! # Inbound Ports (Driving Ports / API)
//!
//! The verification API offered to contract method dispatchers.

use crate::domain::errors::EnvelopeError;
use crate::ports::outbound::StateStore;
use shared_types::{CallArgs, Envelope, Identity};

/// Primary Envelope Verification API.
pub trait EnvelopeVerificationApi {
    /// Verify the envelope carried in `args`.
    ///
    /// The dispatched method is the argument at position 0. On success the replay record for the request has been written to
    /// `store` and the signer's identity is returned.
    ///
    /// # Errors
    /// * `EnvelopeError::MissingSignature` - fewer than three call arguments
    /// * Any rejection from [`Self::verify_envelope`]
    fn verify_call<S: StateStore + ?Sized>(
        &self,
        store: &mut S,
        args: &CallArgs,
    ) -> Result<Identity, EnvelopeError>;

    /// Decode `envelope` and verify it against the call payload.
    ///
    /// # Errors
    /// * `EnvelopeError::DecodeError` - envelope bytes do not decode
    /// * Any rejection from [`Self::verify_decoded`]
    fn verify_envelope<S: StateStore + ?Sized>(
        &self,
        store: &mut S,
        method: &str,
        payload: &[u8],
        envelope: &[u8],
    ) -> Result<Identity, EnvelopeError>;

    /// Verify an already decoded envelope against the call payload.
    ///
    /// # Errors
    /// * `EnvelopeError::Expired` - deadline set and in the past
    /// * `EnvelopeError::InvalidMethod` - envelope names another method
    /// * `EnvelopeError::InvalidChannel` - envelope names another channel
    /// * `EnvelopeError::AlreadyExecuted` - replay record exists
    /// * `EnvelopeError::StoreError` - state read or write failed
    /// * `EnvelopeError::SignatureInvalid` - signature does not verify
    fn verify_decoded<S: StateStore + ?Sized>(
        &self,
        store: &mut S,
        method: &str,
        payload: &[u8],
        envelope: &Envelope,
    ) -> Result<Identity, EnvelopeError>;
}
