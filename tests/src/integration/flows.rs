//! # Integration Test Flows
//!
//! A client builds and signs envelopes with `eg-envelope-auth::client`, the
//! wire bytes travel as call arguments, and the verifier decides.
//!
//! ## Flows Tested:
//!
//! 1. **Sign → Verify → Replay**: first call accepted, exact resubmission rejected
//! 2. **Field Binding**: every signed field is covered by the signature
//! 3. **Pre-write Rejections**: expiry and binding checks leave state untouched
//! 4. **Middleware → Ledger**: identity published, replay record committed
//! 5. **Telemetry**: outcomes visible in the Prometheus exposition

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    use eg_envelope_auth::{
        build_call_args, create_nonce, sign_envelope, CallContext, EnvelopeConfig, EnvelopeError,
        EnvelopeMiddleware, EnvelopeRequest, EnvelopeSerializer, EnvelopeVerificationApi,
        EnvelopeVerifier, FixedTimeSource, GenericSerializer, InMemoryStateStore, StateStore,
        VersionedLedger,
    };
    use shared_crypto::Ed25519KeyPair;
    use shared_types::{CallArgs, Envelope, HandlerType};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const NOW: u64 = 1_700_000_000;

    fn verifier() -> EnvelopeVerifier<GenericSerializer, FixedTimeSource> {
        EnvelopeVerifier::new(
            EnvelopeConfig::default(),
            GenericSerializer::json(),
            FixedTimeSource::new(NOW),
        )
    }

    fn transfer(nonce: &str) -> EnvelopeRequest {
        EnvelopeRequest::new("mychannel", "mycc", "transfer", br#"{"amount": 10}"#.to_vec())
            .with_nonce(nonce)
    }

    fn call_args(request: &EnvelopeRequest, envelope: &Envelope) -> CallArgs {
        build_call_args(&GenericSerializer::json(), request, envelope).unwrap()
    }

    // =============================================================================
    // SIGN → VERIFY → REPLAY
    // =============================================================================

    #[test]
    fn test_transfer_scenario() {
        let verifier = verifier();
        let keypair = Ed25519KeyPair::generate();
        let mut store = InMemoryStateStore::new("mychannel");

        // First submission
        let first = transfer("1700000000");
        let args = call_args(&first, &sign_envelope(&first, &keypair));
        let identity = verifier.verify_call(&mut store, &args).unwrap();
        assert_eq!(identity.public_key(), keypair.public_key().to_base58());

        // Exact resubmission
        assert_eq!(
            verifier.verify_call(&mut store, &args),
            Err(EnvelopeError::AlreadyExecuted)
        );

        // Retry with a fresh nonce and signature
        let retry = transfer("1700000001");
        let args = call_args(&retry, &sign_envelope(&retry, &keypair));
        assert!(verifier.verify_call(&mut store, &args).is_ok());
    }

    #[test]
    fn test_nonce_from_clock() {
        let clock = FixedTimeSource::new(NOW);
        let verifier = verifier();
        let keypair = Ed25519KeyPair::generate();
        let mut store = InMemoryStateStore::new("mychannel");

        let request = transfer(&create_nonce(&clock));
        assert_eq!(request.nonce, "1700000000");

        let args = call_args(&request, &sign_envelope(&request, &keypair));
        assert!(verifier.verify_call(&mut store, &args).is_ok());
    }

    #[test]
    fn test_same_nonce_other_method_is_independent() {
        let verifier = verifier();
        let keypair = Ed25519KeyPair::generate();
        let mut store = InMemoryStateStore::new("mychannel");

        let send = transfer("7");
        let burn = EnvelopeRequest {
            method: "burn".into(),
            ..send.clone()
        };

        for request in [&send, &burn] {
            let args = call_args(request, &sign_envelope(request, &keypair));
            assert!(verifier.verify_call(&mut store, &args).is_ok());
        }
        assert_eq!(store.len(), 2);
    }

    // =============================================================================
    // FIELD BINDING
    // =============================================================================

    #[test]
    fn test_signature_binds_every_field() {
        let verifier = verifier();
        let keypair = Ed25519KeyPair::generate();
        let request = transfer("1700000000");
        let envelope = sign_envelope(&request, &keypair);
        let later = Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap();

        // (dispatched method, store channel, payload, envelope)
        let cases: Vec<(&str, &str, Vec<u8>, Envelope)> = vec![
            (
                "transfer",
                "mychannel",
                br#"{"amount": 11}"#.to_vec(),
                envelope.clone(),
            ),
            (
                "transfer",
                "mychannel",
                request.payload.clone(),
                Envelope {
                    nonce: "1700000001".into(),
                    ..envelope.clone()
                },
            ),
            (
                "transfer",
                "otherchannel",
                request.payload.clone(),
                Envelope {
                    channel: "otherchannel".into(),
                    ..envelope.clone()
                },
            ),
            (
                "transfer",
                "mychannel",
                request.payload.clone(),
                Envelope {
                    chaincode: "othercc".into(),
                    ..envelope.clone()
                },
            ),
            (
                "mint",
                "mychannel",
                request.payload.clone(),
                Envelope {
                    method: "mint".into(),
                    ..envelope.clone()
                },
            ),
            (
                "transfer",
                "mychannel",
                request.payload.clone(),
                Envelope {
                    deadline: Some(later),
                    ..envelope.clone()
                },
            ),
            (
                "transfer",
                "mychannel",
                request.payload.clone(),
                Envelope {
                    public_key: Ed25519KeyPair::generate().public_key().to_base58(),
                    ..envelope.clone()
                },
            ),
        ];

        for (method, channel, payload, tampered) in cases {
            let mut store = InMemoryStateStore::new(channel);
            assert_eq!(
                verifier.verify_decoded(&mut store, method, &payload, &tampered),
                Err(EnvelopeError::SignatureInvalid),
                "{tampered:?}"
            );
        }
    }

    #[test]
    fn test_spaced_payload_scenario() {
        let verifier = verifier();
        let keypair = Ed25519KeyPair::generate();
        let signed = EnvelopeRequest::new("mychannel", "mycc", "tag", br#"["a", "b"]"#.to_vec())
            .with_nonce("1");
        let envelope = sign_envelope(&signed, &keypair);

        // Upstream re-encoded the payload compactly before dispatch
        let args = CallArgs::new(
            "tag",
            br#"["a","b"]"#.to_vec(),
            GenericSerializer::json().to_bytes(&envelope).unwrap(),
        );
        let mut store = InMemoryStateStore::new("mychannel");

        assert!(verifier.verify_call(&mut store, &args).is_ok());
    }

    // =============================================================================
    // PRE-WRITE REJECTIONS
    // =============================================================================

    #[test]
    fn test_expired_regardless_of_signature() {
        let verifier = verifier();
        let keypair = Ed25519KeyPair::generate();
        let request = transfer("1").with_deadline(Utc.timestamp_opt(NOW as i64 - 60, 0).unwrap());
        let envelope = sign_envelope(&request, &keypair);
        let unsigned = Envelope {
            signature: String::new(),
            ..envelope.clone()
        };

        for env in [&envelope, &unsigned] {
            let mut store = InMemoryStateStore::new("mychannel");
            assert!(matches!(
                verifier.verify_call(&mut store, &call_args(&request, env)),
                Err(EnvelopeError::Expired { .. })
            ));
            assert!(store.is_empty());
        }
    }

    #[test]
    fn test_mismatched_method_with_valid_signature() {
        let verifier = verifier();
        let keypair = Ed25519KeyPair::generate();
        let mint = EnvelopeRequest {
            method: "mint".into(),
            ..transfer("1")
        };
        let envelope = sign_envelope(&mint, &keypair);

        // Dispatcher routes the call to `transfer`
        let args = CallArgs::new(
            "transfer",
            mint.payload.clone(),
            GenericSerializer::json().to_bytes(&envelope).unwrap(),
        );
        let mut store = InMemoryStateStore::new("mychannel");

        assert_eq!(
            verifier.verify_call(&mut store, &args),
            Err(EnvelopeError::InvalidMethod {
                envelope: "mint".into(),
                dispatched: "transfer".into(),
            })
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_front_end_json_is_accepted() {
        let verifier = verifier();
        let keypair = Ed25519KeyPair::generate();
        let request = transfer("1");
        let envelope = sign_envelope(&request, &keypair);

        // Hand-written JSON in the shape a browser client sends
        let json = serde_json::json!({
            "method": envelope.method,
            "channel": envelope.channel,
            "chaincode": envelope.chaincode,
            "nonce": envelope.nonce,
            "publicKey": envelope.public_key,
            "signature": envelope.signature,
            "clientVersion": "1.2.3",
        });
        let args = CallArgs::new(
            "transfer",
            request.payload.clone(),
            serde_json::to_vec(&json).unwrap(),
        );
        let mut store = InMemoryStateStore::new("mychannel");

        assert!(verifier.verify_call(&mut store, &args).is_ok());
    }

    // =============================================================================
    // MIDDLEWARE → LEDGER
    // =============================================================================

    #[test]
    fn test_middleware_commits_replay_record() {
        let ledger = VersionedLedger::new("mychannel");
        let middleware = EnvelopeMiddleware::new(verifier());
        let keypair = Ed25519KeyPair::generate();
        let request = transfer("1700000000");
        let args = call_args(&request, &sign_envelope(&request, &keypair));

        let mut ctx = CallContext::new(HandlerType::Invoke, args.clone(), ledger.simulate());
        let signer = middleware
            .wrap(&mut ctx, |ctx| {
                let signer = ctx.param("envelopePubkey").unwrap_or_default().to_string();
                ctx.store_mut().put_state("balance", b"90")?;
                Ok::<_, EnvelopeError>(signer)
            })
            .unwrap();
        ctx.into_store().commit().unwrap();

        assert_eq!(signer, keypair.public_key().to_base58());
        assert_eq!(ledger.get_committed("balance").unwrap(), Some(b"90".to_vec()));

        // Resubmission in a later transaction sees the committed record
        let mut ctx = CallContext::new(HandlerType::Invoke, args, ledger.simulate());
        assert_eq!(
            middleware.authenticate(&mut ctx),
            Err(EnvelopeError::AlreadyExecuted)
        );
    }

    // =============================================================================
    // TELEMETRY
    // =============================================================================

    #[test]
    fn test_outcomes_in_metrics_exposition() {
        eg_telemetry::register_metrics().unwrap();
        let verifier = verifier();
        let keypair = Ed25519KeyPair::generate();
        let mut store = InMemoryStateStore::new("mychannel");
        let request = transfer("metrics");
        let args = call_args(&request, &sign_envelope(&request, &keypair));

        verifier.verify_call(&mut store, &args).unwrap();
        let _ = verifier.verify_call(&mut store, &args);

        let text = eg_telemetry::encode_metrics().unwrap();
        assert!(text.contains("eg_envelope_verified_total"));
        assert!(text.contains("eg_replay_keys_written_total"));
        assert!(text.contains(r#"eg_envelope_rejected_total{reason="already_executed"}"#));
    }

    // =============================================================================
    // SERIALIZER CONTRACT
    // =============================================================================

    fn arb_envelope() -> impl Strategy<Value = Envelope> {
        (
            "[a-zA-Z]{0,12}",
            "[a-z0-9-]{0,12}",
            "[a-z0-9]{0,12}",
            "[0-9]{0,12}",
            proptest::option::of(0i64..4_102_444_800),
            "[1-9A-HJ-NP-Za-km-z]{0,44}",
            "[1-9A-HJ-NP-Za-km-z]{0,88}",
        )
            .prop_map(
                |(method, channel, chaincode, nonce, deadline, public_key, signature)| Envelope {
                    method,
                    channel,
                    chaincode,
                    nonce,
                    deadline: deadline.and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
                    public_key,
                    signature,
                },
            )
    }

    proptest! {
        #[test]
        fn prop_json_decode_encode_roundtrip(envelope in arb_envelope()) {
            let serializer = GenericSerializer::json();
            let bytes = serializer.to_bytes(&envelope).unwrap();
            let decoded: Envelope = serializer.from_bytes(&bytes).unwrap();
            prop_assert_eq!(decoded, envelope);
        }

        #[test]
        fn prop_binary_decode_encode_roundtrip(envelope in arb_envelope()) {
            let serializer = GenericSerializer::binary();
            let bytes = serializer.to_bytes(&envelope).unwrap();
            let decoded: Envelope = serializer.from_bytes(&bytes).unwrap();
            prop_assert_eq!(decoded, envelope);
        }

        #[test]
        fn prop_signed_call_verifies_exactly_once(
            payload in proptest::collection::vec(any::<u8>(), 0..256),
            nonce in "\\PC{0,24}",
            chaincode in "\\PC{0,24}",
            method in "\\PC{0,24}",
            deadline_secs in (NOW as i64 + 1)..4_102_444_800,
            deadline_millis in 0u32..1000,
        ) {
            let verifier = verifier();
            let keypair = Ed25519KeyPair::generate();
            let mut store = InMemoryStateStore::new("mychannel");

            let deadline = Utc
                .timestamp_opt(deadline_secs, deadline_millis * 1_000_000)
                .unwrap();
            let request = EnvelopeRequest::new("mychannel", chaincode, method, payload)
                .with_nonce(nonce)
                .with_deadline(deadline);
            let args = call_args(&request, &sign_envelope(&request, &keypair));

            let identity = verifier.verify_call(&mut store, &args).unwrap();
            prop_assert_eq!(identity.public_key(), keypair.public_key().to_base58());
            prop_assert_eq!(
                verifier.verify_call(&mut store, &args),
                Err(EnvelopeError::AlreadyExecuted)
            );
            prop_assert_eq!(store.len(), 1);
        }
    }
}
