//! # Envelope Middleware
//!
//! Runs envelope verification in front of state-changing contract handlers and
//! publishes the signer to the call context.
//!
//! Only `Invoke` handlers are authenticated. `Query` handlers cannot write
//! state, so they pass through without an envelope.

use crate::domain::errors::EnvelopeError;
use crate::ports::inbound::EnvelopeVerificationApi;
use crate::ports::outbound::{EnvelopeSerializer, StateStore, TimeSource};
use crate::service::EnvelopeVerifier;
use shared_types::{CallArgs, HandlerType, Identity};
use std::collections::HashMap;

/// Per-call execution context handed to contract handlers.
#[derive(Debug)]
pub struct CallContext<S: StateStore> {
    handler_type: HandlerType,
    args: CallArgs,
    store: S,
    params: HashMap<String, String>,
    identity: Option<Identity>,
}

impl<S: StateStore> CallContext<S> {
    pub fn new(handler_type: HandlerType, args: CallArgs, store: S) -> Self {
        Self {
            handler_type,
            args,
            store,
            params: HashMap::new(),
            identity: None,
        }
    }

    pub fn handler_type(&self) -> HandlerType {
        self.handler_type
    }

    pub fn args(&self) -> &CallArgs {
        &self.args
    }

    /// Method name at argument position 0, if it is valid UTF-8.
    pub fn method(&self) -> Option<&str> {
        self.args.method().and_then(|m| std::str::from_utf8(m).ok())
    }

    pub fn payload(&self) -> Option<&[u8]> {
        self.args.payload()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn set_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.insert(name.into(), value.into());
    }

    /// The verified signer, once the middleware has accepted the envelope.
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Give the store back, e.g. to commit a simulated transaction.
    pub fn into_store(self) -> S {
        self.store
    }
}

/// Verification middleware for contract handlers.
pub struct EnvelopeMiddleware<Z: EnvelopeSerializer, T: TimeSource> {
    verifier: EnvelopeVerifier<Z, T>,
}

impl<Z: EnvelopeSerializer, T: TimeSource> EnvelopeMiddleware<Z, T> {
    pub fn new(verifier: EnvelopeVerifier<Z, T>) -> Self {
        Self { verifier }
    }

    pub fn verifier(&self) -> &EnvelopeVerifier<Z, T> {
        &self.verifier
    }

    /// Verify the call's envelope and publish the signer.
    ///
    /// Returns `Ok(None)` for handlers that are not authenticated.
    pub fn authenticate<S: StateStore>(
        &self,
        ctx: &mut CallContext<S>,
    ) -> Result<Option<Identity>, EnvelopeError> {
        if ctx.handler_type != HandlerType::Invoke {
            return Ok(None);
        }

        let identity = self.verifier.verify_call(&mut ctx.store, &ctx.args)?;
        ctx.set_param(
            self.verifier.config().identity_param.clone(),
            identity.public_key(),
        );
        ctx.identity = Some(identity.clone());
        Ok(Some(identity))
    }

    /// Authenticate, then run `next`. `next` is not called if verification fails.
    pub fn wrap<S, R, E, F>(&self, ctx: &mut CallContext<S>, next: F) -> Result<R, E>
    where
        S: StateStore,
        E: From<EnvelopeError>,
        F: FnOnce(&mut CallContext<S>) -> Result<R, E>,
    {
        self.authenticate(ctx)?;
        next(ctx)
    }
}
