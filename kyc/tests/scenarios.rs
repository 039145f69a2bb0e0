//! End-to-end lifecycle scenarios over the in-memory backend.

use std::sync::Arc;
use vouch_crypto::sha256_hex;
use vouch_kyc::{KycEngine, KycError, RequestEngine, TokenEngine, VerifierRegistry};
use vouch_nullables::NullClock;
use vouch_rewards::RewardLedger;
use vouch_store::{
    AuditStore, CredentialStore, ProfileStore, RequestStatus, RequestStore, RewardStore,
    TokenStore, UserProfile, VerifierRecord, VerifierStatus, WebhookStore,
};
use vouch_store_memory::MemoryStore;
use vouch_types::{RequestId, ServiceParams, UserId, VerifierId};
use vouch_webhooks::Outbox;

const API_KEY: &str = "verifier-secret";

fn system() -> (Arc<MemoryStore>, NullClock, KycEngine, VerifierRegistry) {
    let store = Arc::new(MemoryStore::new());
    let params = ServiceParams::default();

    store
        .put_verifier(&VerifierRecord {
            id: VerifierId::new("vrf_1"),
            name: "Acme Checks".into(),
            api_key_hash: sha256_hex(API_KEY),
            callback_url: "https://acme.test/hook".into(),
            status: VerifierStatus::Active,
        })
        .unwrap();
    store
        .put_profile(
            &UserProfile::new(UserId::new("u1"))
                .with_attribute("fullName", "Ada Lovelace")
                .with_attribute("idNumber", "A12345")
                .with_attribute("dob", "1815-12-10"),
        )
        .unwrap();

    let engine = KycEngine::new(
        RequestEngine::new(store.clone(), params.clone()),
        TokenEngine::new(store.clone(), params.clone()),
        Outbox::new(store.clone(), store.clone()),
        RewardLedger::new(store.clone(), params.clone()),
        store.clone(),
        store.clone(),
    );
    let registry = VerifierRegistry::new(store.clone(), store.clone());
    let clock = NullClock::new(1_000_000);

    (store, clock, engine, registry)
}

fn user() -> UserId {
    UserId::new("u1")
}

#[test]
fn full_lifecycle_submit_approve_redeem() {
    let (store, clock, engine, registry) = system();
    let verifier = registry.authenticate(API_KEY).unwrap();

    let request_id = engine
        .submit(
            &verifier,
            &user(),
            vec!["Full Name".into(), "DOB".into()],
            clock.now(),
        )
        .unwrap();

    clock.advance(30);
    let code = engine.approve(&request_id, &user(), clock.now()).unwrap();
    assert_eq!(code.len(), 64);

    let request = store.get_request(&request_id).unwrap().unwrap();
    assert_eq!(request.status, RequestStatus::Approved);

    // Approval enqueued exactly one webhook, due immediately.
    let due = store.due_events(clock.now(), 20).unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].payload["requestId"], request_id.as_str());

    clock.advance(60);
    let redemption = engine
        .redeem(&verifier, &code, Some("203.0.113.9".into()), clock.now())
        .unwrap();

    assert!(!redemption.degraded);
    assert_eq!(redemption.user_id, user());
    assert_eq!(redemption.verified_fields.len(), 2);
    assert_eq!(redemption.verified_fields["fullName"], "Ada Lovelace");
    assert_eq!(redemption.verified_fields["dob"], "1815-12-10");

    let logs = store.recent_verifications(10).unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].request_id, request_id);
    assert_eq!(logs[0].source_ip.as_deref(), Some("203.0.113.9"));

    let account = store.get_account(&user()).unwrap().unwrap();
    assert_eq!(account.points, 10);
    assert_eq!(account.total_verifications, 1);
}

#[test]
fn denied_request_cannot_be_approved() {
    let (store, clock, engine, registry) = system();
    let verifier = registry.authenticate(API_KEY).unwrap();

    let request_id = engine
        .submit(&verifier, &user(), vec!["Full Name".into()], clock.now())
        .unwrap();

    engine.deny(&request_id, &user(), clock.now()).unwrap();

    let result = engine.approve(&request_id, &user(), clock.now());
    assert!(matches!(result, Err(KycError::InvalidArgument(_))));

    // No token was ever minted, no webhook enqueued.
    assert!(store.get_token_for_request(&request_id).unwrap().is_none());
    assert!(!store.event_exists_for_request(&request_id).unwrap());
}

#[test]
fn approval_requires_the_request_subject() {
    let (_, clock, engine, registry) = system();
    let verifier = registry.authenticate(API_KEY).unwrap();

    let request_id = engine
        .submit(&verifier, &user(), vec!["Full Name".into()], clock.now())
        .unwrap();

    let result = engine.approve(&request_id, &UserId::new("intruder"), clock.now());
    assert!(matches!(result, Err(KycError::PermissionDenied(_))));
}

#[test]
fn request_window_closes_after_ten_minutes() {
    let (_, clock, engine, registry) = system();
    let verifier = registry.authenticate(API_KEY).unwrap();

    let request_id = engine
        .submit(&verifier, &user(), vec!["Full Name".into()], clock.now())
        .unwrap();

    clock.advance(600);
    let result = engine.approve(&request_id, &user(), clock.now());
    assert!(matches!(result, Err(KycError::Expired)));
}

#[test]
fn token_expires_after_five_minutes() {
    let (store, clock, engine, registry) = system();
    let verifier = registry.authenticate(API_KEY).unwrap();

    let request_id = engine
        .submit(&verifier, &user(), vec!["Full Name".into()], clock.now())
        .unwrap();
    let code = engine.approve(&request_id, &user(), clock.now()).unwrap();

    clock.advance(300);
    let result = engine.redeem(&verifier, &code, None, clock.now());
    assert!(matches!(result, Err(KycError::Expired)));

    let token = store.get_token_for_request(&request_id).unwrap().unwrap();
    assert!(token.expired);
    assert!(!token.used);

    // No reward was credited for the failed redemption.
    assert!(store.get_account(&user()).unwrap().is_none());
}

#[test]
fn a_token_redeems_exactly_once() {
    let (store, clock, engine, registry) = system();
    let verifier = registry.authenticate(API_KEY).unwrap();

    let request_id = engine
        .submit(&verifier, &user(), vec!["Full Name".into()], clock.now())
        .unwrap();
    let code = engine.approve(&request_id, &user(), clock.now()).unwrap();

    clock.advance(10);
    engine.redeem(&verifier, &code, None, clock.now()).unwrap();

    let result = engine.redeem(&verifier, &code, None, clock.now());
    assert!(matches!(result, Err(KycError::InvalidToken)));

    // One audit record, one reward credit.
    assert_eq!(store.recent_verifications(10).unwrap().len(), 1);
    let account = store.get_account(&user()).unwrap().unwrap();
    assert_eq!(account.points, 10);
}

#[test]
fn redeemed_request_cannot_be_reapproved() {
    let (store, clock, engine, registry) = system();
    let verifier = registry.authenticate(API_KEY).unwrap();

    let request_id = engine
        .submit(&verifier, &user(), vec!["Full Name".into()], clock.now())
        .unwrap();
    let code = engine.approve(&request_id, &user(), clock.now()).unwrap();

    clock.advance(10);
    engine.redeem(&verifier, &code, None, clock.now()).unwrap();

    // The consent was consumed; a second approval would mint a fresh code
    // and re-open it.
    let result = engine.approve(&request_id, &user(), clock.now());
    assert!(matches!(result, Err(KycError::InvalidArgument(_))));

    // No second token, no second webhook, no second credit.
    let token = store.get_token_for_request(&request_id).unwrap().unwrap();
    assert!(token.used);
    assert_eq!(store.due_events(clock.now(), 20).unwrap().len(), 1);
    assert_eq!(store.get_account(&user()).unwrap().unwrap().points, 10);
}

#[test]
fn completed_approval_refuses_to_run_again() {
    let (store, clock, engine, registry) = system();
    let verifier = registry.authenticate(API_KEY).unwrap();

    let request_id = engine
        .submit(&verifier, &user(), vec!["Full Name".into()], clock.now())
        .unwrap();
    engine.approve(&request_id, &user(), clock.now()).unwrap();

    let result = engine.approve(&request_id, &user(), clock.now());
    assert!(matches!(result, Err(KycError::InvalidArgument(_))));

    // Still exactly one webhook event.
    assert_eq!(store.due_events(clock.now(), 20).unwrap().len(), 1);
}

#[test]
fn interrupted_approval_converges_on_retry() {
    let (store, clock, engine, registry) = system();
    let verifier = registry.authenticate(API_KEY).unwrap();

    let request_id = engine
        .submit(&verifier, &user(), vec!["Full Name".into()], clock.now())
        .unwrap();

    // Simulate a crash after the token mint but before the status update
    // and webhook enqueue.
    let params = ServiceParams::default();
    let tokens = TokenEngine::new(store.clone(), params);
    let request = store.get_request(&request_id).unwrap().unwrap();
    let (orphan, _) = tokens.issue(&request, clock.now()).unwrap();

    // The retry supersedes the orphaned token and completes the saga.
    let code = engine.approve(&request_id, &user(), clock.now()).unwrap();

    let request = store.get_request(&request_id).unwrap().unwrap();
    assert_eq!(request.status, RequestStatus::Approved);
    assert_eq!(store.due_events(clock.now(), 20).unwrap().len(), 1);

    // The orphan is expired, not resurrected; the fresh code redeems.
    let orphan = store.get_token_by_hash(&orphan.token_hash).unwrap().unwrap();
    assert!(orphan.expired);

    let redemption = engine.redeem(&verifier, &code, None, clock.now()).unwrap();
    assert!(!redemption.degraded);
}

#[test]
fn wrong_verifier_cannot_redeem_and_rightful_one_still_can() {
    let (store, clock, engine, registry) = system();
    store
        .put_verifier(&VerifierRecord {
            id: VerifierId::new("vrf_2"),
            name: "Other Platform".into(),
            api_key_hash: sha256_hex("other-secret"),
            callback_url: "https://other.test/hook".into(),
            status: VerifierStatus::Active,
        })
        .unwrap();

    let verifier = registry.authenticate(API_KEY).unwrap();
    let other = registry.authenticate("other-secret").unwrap();

    let request_id = engine
        .submit(&verifier, &user(), vec!["Full Name".into()], clock.now())
        .unwrap();
    let code = engine.approve(&request_id, &user(), clock.now()).unwrap();

    let result = engine.redeem(&other, &code, None, clock.now());
    assert!(matches!(result, Err(KycError::VerifierMismatch)));

    let redemption = engine.redeem(&verifier, &code, None, clock.now()).unwrap();
    assert_eq!(redemption.request_id, request_id);
}

#[test]
fn redemption_without_a_profile_yields_empty_fields() {
    let (_, clock, engine, registry) = system();
    let verifier = registry.authenticate(API_KEY).unwrap();
    let ghost = UserId::new("u_no_profile");

    let request_id = engine
        .submit(&verifier, &ghost, vec!["Full Name".into()], clock.now())
        .unwrap();
    let code = engine.approve(&request_id, &ghost, clock.now()).unwrap();

    let redemption = engine.redeem(&verifier, &code, None, clock.now()).unwrap();
    assert!(redemption.verified_fields.is_empty());
    assert!(!redemption.degraded);
}

#[test]
fn approving_an_unknown_request_is_not_found() {
    let (_, clock, engine, _) = system();
    let result = engine.approve(&RequestId::new("req_missing"), &user(), clock.now());
    assert!(matches!(result, Err(KycError::NotFound(_))));
}
