//! # Envelope Verification Service
//!
//! Application service layer that implements the `EnvelopeVerificationApi` trait.
//!
//! ## Check Order
//!
//! ```text
//! presence → decode → deadline → method → channel → replay record → signature
//! ```
//!
//! Every check is terminal. The replay record is written before the signature
//! is checked, so an envelope with a bad signature still consumes its nonce for
//! that channel, contract and method.

use crate::adapters::{GenericSerializer, SystemTimeSource};
use crate::domain::canonical::CanonicalFields;
use crate::domain::config::{ConfigError, EnvelopeConfig};
use crate::domain::errors::EnvelopeError;
use crate::domain::replay::{Freshness, ReplayGuard, ReplayKey};
use crate::domain::signature;
use crate::ports::inbound::EnvelopeVerificationApi;
use crate::ports::outbound::{EnvelopeSerializer, StateStore, TimeSource};
use eg_telemetry::{
    HistogramTimer, ENVELOPES_REJECTED, ENVELOPES_VERIFIED, ENVELOPE_VERIFY_DURATION,
    REPLAY_KEYS_WRITTEN,
};
use shared_types::{CallArgs, Envelope, Identity};
use tracing::{debug, error, warn};

/// Envelope Verification Service.
///
/// Holds no per-call state; one instance serves every call of a contract.
pub struct EnvelopeVerifier<Z: EnvelopeSerializer, T: TimeSource> {
    config: EnvelopeConfig,
    guard: ReplayGuard,
    serializer: Z,
    time: T,
}

impl<Z: EnvelopeSerializer, T: TimeSource> EnvelopeVerifier<Z, T> {
    /// Create a verifier.
    ///
    /// # Arguments
    /// * `config` - Replay namespace, sentinel and identity parameter
    /// * `serializer` - Decoder for envelope bytes
    /// * `time` - Clock used for deadline checks
    pub fn new(config: EnvelopeConfig, serializer: Z, time: T) -> Self {
        let guard = ReplayGuard::from_config(&config);
        Self {
            config,
            guard,
            serializer,
            time,
        }
    }

    pub fn config(&self) -> &EnvelopeConfig {
        &self.config
    }

    pub fn serializer(&self) -> &Z {
        &self.serializer
    }

    pub fn time_source(&self) -> &T {
        &self.time
    }

    /// Returns true if a replay record exists for `envelope` and `payload`.
    pub fn is_consumed<S: StateStore + ?Sized>(
        &self,
        store: &S,
        envelope: &Envelope,
        payload: &[u8],
    ) -> Result<bool, EnvelopeError> {
        let key = ReplayKey::for_envelope(envelope, payload);
        Ok(self.guard.is_consumed(store, &key)?)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Envelope, EnvelopeError> {
        self.serializer
            .from_bytes::<Envelope>(bytes)
            .map_err(|e| self.reject(e.into(), None))
    }

    fn check<S: StateStore + ?Sized>(
        &self,
        store: &mut S,
        method: &[u8],
        payload: &[u8],
        envelope: &Envelope,
    ) -> Result<Identity, EnvelopeError> {
        let now = self.time.now();
        if let Some(deadline) = envelope
            .effective_deadline()
            .filter(|_| envelope.is_expired_at(now))
        {
            return Err(self.reject(
                EnvelopeError::Expired {
                    deadline: deadline.timestamp(),
                    now,
                },
                Some(envelope),
            ));
        }

        // Dispatched method bytes are compared as-is, never decoded
        if envelope.method.as_bytes() != method {
            return Err(self.reject(
                EnvelopeError::InvalidMethod {
                    envelope: envelope.method.clone(),
                    dispatched: String::from_utf8_lossy(method).into_owned(),
                },
                Some(envelope),
            ));
        }

        let current = store.channel_id();
        if envelope.channel != current {
            let err = EnvelopeError::InvalidChannel {
                envelope: envelope.channel.clone(),
                current: current.to_string(),
            };
            return Err(self.reject(err, Some(envelope)));
        }

        let key = ReplayKey::for_envelope(envelope, payload);
        match self.guard.check_and_consume(store, &key) {
            Ok(Freshness::Fresh) => {
                REPLAY_KEYS_WRITTEN.inc();
                debug!(replay_key = key.as_str(), "Replay record written");
            }
            Ok(Freshness::AlreadySeen) => {
                return Err(self.reject(EnvelopeError::AlreadyExecuted, Some(envelope)));
            }
            Err(e) => return Err(self.reject(e.into(), Some(envelope))),
        }

        let fields = CanonicalFields::from_envelope(envelope, payload);
        if let Err(e) =
            signature::verify_base58(&fields, &envelope.public_key, &envelope.signature)
        {
            debug!(error = %e, "Signature check detail");
            return Err(self.reject(EnvelopeError::SignatureInvalid, Some(envelope)));
        }

        ENVELOPES_VERIFIED.inc();
        debug!(
            method = envelope.method.as_str(),
            channel = envelope.channel.as_str(),
            chaincode = envelope.chaincode.as_str(),
            nonce = envelope.nonce.as_str(),
            signer = envelope.public_key.as_str(),
            "Envelope verified"
        );
        Ok(Identity::new(envelope.public_key.clone()))
    }

    /// Log and count a rejection, then hand the error back.
    fn reject(&self, err: EnvelopeError, envelope: Option<&Envelope>) -> EnvelopeError {
        ENVELOPES_REJECTED.with_label_values(&[err.kind()]).inc();

        let (method, channel, chaincode, nonce) = envelope
            .map(|e| {
                (
                    e.method.as_str(),
                    e.channel.as_str(),
                    e.chaincode.as_str(),
                    e.nonce.as_str(),
                )
            })
            .unwrap_or_default();

        match &err {
            EnvelopeError::StoreError(_) => error!(
                method,
                channel,
                chaincode,
                nonce,
                reason = err.kind(),
                error = %err,
                "Envelope check failed on state store"
            ),
            _ => warn!(
                method,
                channel,
                chaincode,
                nonce,
                reason = err.kind(),
                error = %err,
                "Envelope rejected"
            ),
        }
        err
    }
}

impl EnvelopeVerifier<GenericSerializer, SystemTimeSource> {
    /// Verifier with the configured wire format and the system clock.
    ///
    /// # Errors
    /// * `ConfigError` - the configuration fails validation
    pub fn from_config(config: EnvelopeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let serializer = GenericSerializer::new(config.format);
        Ok(Self::new(config, serializer, SystemTimeSource))
    }
}

impl<Z: EnvelopeSerializer, T: TimeSource> EnvelopeVerificationApi for EnvelopeVerifier<Z, T> {
    fn verify_call<S: StateStore + ?Sized>(
        &self,
        store: &mut S,
        args: &CallArgs,
    ) -> Result<Identity, EnvelopeError> {
        let _timer = HistogramTimer::new(&ENVELOPE_VERIFY_DURATION);

        let (Some(method), Some(payload), Some(envelope)) =
            (args.method(), args.payload(), args.envelope())
        else {
            return Err(self.reject(
                EnvelopeError::MissingSignature {
                    arg_count: args.len(),
                },
                None,
            ));
        };

        let envelope = self.decode(envelope)?;
        self.check(store, method, payload, &envelope)
    }

    fn verify_envelope<S: StateStore + ?Sized>(
        &self,
        store: &mut S,
        method: &str,
        payload: &[u8],
        envelope: &[u8],
    ) -> Result<Identity, EnvelopeError> {
        let _timer = HistogramTimer::new(&ENVELOPE_VERIFY_DURATION);
        let envelope = self.decode(envelope)?;
        self.check(store, method.as_bytes(), payload, &envelope)
    }

    fn verify_decoded<S: StateStore + ?Sized>(
        &self,
        store: &mut S,
        method: &str,
        payload: &[u8],
        envelope: &Envelope,
    ) -> Result<Identity, EnvelopeError> {
        let _timer = HistogramTimer::new(&ENVELOPE_VERIFY_DURATION);
        self.check(store, method.as_bytes(), payload, envelope)
    }
}
