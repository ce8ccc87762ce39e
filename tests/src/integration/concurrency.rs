//! # Concurrent Execution Tests
//!
//! The replay guard is a read followed by a write. These tests run the same
//! envelope through several simulations of one `VersionedLedger` before any of
//! them commit and check that commit-time conflict detection lets exactly one
//! through.

#[cfg(test)]
mod tests {
    use std::thread;

    use eg_envelope_auth::{
        build_call_args, sign_envelope, CommitError, EnvelopeConfig, EnvelopeError,
        EnvelopeRequest, EnvelopeVerificationApi, EnvelopeVerifier, FixedTimeSource,
        GenericSerializer, ReadWriteSet, VersionedLedger,
    };
    use shared_crypto::Ed25519KeyPair;
    use shared_types::CallArgs;

    fn verifier() -> EnvelopeVerifier<GenericSerializer, FixedTimeSource> {
        EnvelopeVerifier::new(
            EnvelopeConfig::default(),
            GenericSerializer::json(),
            FixedTimeSource::new(1_700_000_000),
        )
    }

    fn signed_transfer(keypair: &Ed25519KeyPair, nonce: &str) -> CallArgs {
        let request =
            EnvelopeRequest::new("mychannel", "mycc", "transfer", br#"{"amount": 10}"#.to_vec())
                .with_nonce(nonce);
        let envelope = sign_envelope(&request, keypair);
        build_call_args(&GenericSerializer::json(), &request, &envelope).unwrap()
    }

    #[test]
    fn test_two_simulations_one_commit() {
        let ledger = VersionedLedger::new("mychannel");
        let verifier = verifier();
        let args = signed_transfer(&Ed25519KeyPair::generate(), "1700000000");

        // Both endorsements run before either commits; both see no record
        let mut first = ledger.simulate();
        let mut second = ledger.simulate();
        assert!(verifier.verify_call(&mut first, &args).is_ok());
        assert!(verifier.verify_call(&mut second, &args).is_ok());

        assert!(first.commit().is_ok());
        assert!(matches!(
            second.commit(),
            Err(CommitError::MvccReadConflict { .. })
        ));

        // Any later execution sees the committed record
        let mut third = ledger.simulate();
        assert_eq!(
            verifier.verify_call(&mut third, &args),
            Err(EnvelopeError::AlreadyExecuted)
        );
    }

    #[test]
    fn test_parallel_endorsements_commit_once() {
        const ENDORSERS: usize = 8;

        let ledger = VersionedLedger::new("mychannel");
        let verifier = verifier();
        let args = signed_transfer(&Ed25519KeyPair::generate(), "1700000000");

        let rwsets: Vec<ReadWriteSet> = thread::scope(|scope| {
            let handles: Vec<_> = (0..ENDORSERS)
                .map(|_| {
                    scope.spawn(|| {
                        let mut tx = ledger.simulate();
                        verifier.verify_call(&mut tx, &args).unwrap();
                        tx.into_rwset()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let committed = rwsets
            .into_iter()
            .map(|rwset| ledger.commit(rwset))
            .filter(Result::is_ok)
            .count();

        assert_eq!(committed, 1);
        assert_eq!(ledger.height().unwrap(), 1);
    }

    #[test]
    fn test_distinct_nonces_do_not_conflict() {
        let ledger = VersionedLedger::new("mychannel");
        let verifier = verifier();
        let keypair = Ed25519KeyPair::generate();

        let mut first = ledger.simulate();
        let mut second = ledger.simulate();
        verifier
            .verify_call(&mut first, &signed_transfer(&keypair, "1"))
            .unwrap();
        verifier
            .verify_call(&mut second, &signed_transfer(&keypair, "2"))
            .unwrap();

        assert!(first.commit().is_ok());
        assert!(second.commit().is_ok());
    }

    #[test]
    fn test_replay_within_one_transaction() {
        let ledger = VersionedLedger::new("mychannel");
        let verifier = verifier();
        let args = signed_transfer(&Ed25519KeyPair::generate(), "1");

        // A transaction reads its own pending replay record
        let mut tx = ledger.simulate();
        verifier.verify_call(&mut tx, &args).unwrap();
        assert_eq!(
            verifier.verify_call(&mut tx, &args),
            Err(EnvelopeError::AlreadyExecuted)
        );
    }
}
