//! Contract Test: Present
//!
//! Constraints verified:
//! - Present issues exactly one create, with the zone and name resolved
//!   from the challenge
//! - The created record is TXT, priority 0, carrying the proof value
//! - Present does not check for existing records (not idempotent)
//! - Errors from the record API are returned with the zone and record name
//!   attached
//! - The per-call deadline turns a slow call into a timeout error

mod common;

use acme_dns_core::{ChallengeContext, Error, Operation, Reconciler};
use common::*;
use std::sync::Arc;
use std::time::Duration;

fn challenge() -> ChallengeContext {
    ChallengeContext::new("example.com.", "_acme-challenge.example.com.", "key")
}

#[tokio::test]
async fn present_creates_one_txt_record() {
    let api = Arc::new(MockRecordApi::new());
    let reconciler = Reconciler::new(api.clone());

    reconciler.present(&challenge()).await.unwrap();

    let calls = api.calls();
    assert_eq!(calls.len(), 1, "Present must issue exactly one call");
    match &calls[0] {
        ApiCall::Create { zone, record } => {
            assert_eq!(zone, "example.com");
            assert_eq!(record.name, "_acme-challenge");
            assert_eq!(record.record_type, "TXT");
            assert_eq!(record.data, "key");
            assert_eq!(record.ttl, 120);
            assert_eq!(record.priority, 0);
        }
        other => panic!("expected create, got {:?}", other),
    }
}

#[tokio::test]
async fn present_uses_configured_ttl() {
    let api = Arc::new(MockRecordApi::new());
    let reconciler = Reconciler::new(api.clone()).with_ttl(60);

    reconciler.present(&challenge()).await.unwrap();

    assert!(matches!(
        &api.calls()[0],
        ApiCall::Create { record, .. } if record.ttl == 60
    ));
}

#[tokio::test]
async fn present_at_zone_apex_uses_at_sign() {
    let api = Arc::new(MockRecordApi::new());
    let reconciler = Reconciler::new(api.clone());

    reconciler
        .present(&ChallengeContext::new("example.com.", "example.com.", "key"))
        .await
        .unwrap();

    assert!(matches!(
        &api.calls()[0],
        ApiCall::Create { record, .. } if record.name == "@"
    ));
}

#[tokio::test]
async fn present_twice_creates_two_records() {
    let api = Arc::new(MockRecordApi::new());
    let reconciler = Reconciler::new(api.clone());

    reconciler.present(&challenge()).await.unwrap();
    reconciler.present(&challenge()).await.unwrap();

    assert_eq!(api.records_in("example.com").len(), 2);
}

#[tokio::test]
async fn present_propagates_api_error() {
    let api = Arc::new(MockRecordApi::new().with_failure_on_create(409));
    let reconciler = Reconciler::new(api.clone());

    let err = reconciler.present(&challenge()).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Api {
            operation: Operation::Create,
            status: 409,
            ..
        }
    ));
    assert!(api.records_in("example.com").is_empty());
}

#[tokio::test]
async fn present_error_names_zone_and_record() {
    let api = Arc::new(MockRecordApi::new().with_failure_on_create(500));
    let reconciler = Reconciler::new(api.clone());

    let err = reconciler.present(&challenge()).await.unwrap_err();

    let target = err.target().expect("record-call errors carry a target");
    assert_eq!(target.zone, "example.com");
    assert_eq!(target.record_name, "_acme-challenge");
    assert!(
        err.to_string()
            .contains("of _acme-challenge in zone example.com")
    );
}

#[tokio::test]
async fn present_accepts_unbounded_timeout() {
    let api = Arc::new(MockRecordApi::new());
    let reconciler = Reconciler::new(api.clone()).with_timeout(Duration::MAX);

    reconciler.present(&challenge()).await.unwrap();

    assert_eq!(api.records_in("example.com").len(), 1);
}

#[tokio::test(start_paused = true)]
async fn present_times_out_after_deadline() {
    let api = Arc::new(MockRecordApi::new().with_delay(Duration::from_secs(30)));
    let reconciler = Reconciler::new(api.clone()).with_timeout(Duration::from_secs(15));

    let err = reconciler.present(&challenge()).await.unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(err.operation(), Some(Operation::Create));
    // The in-flight create was cancelled before it stored anything
    assert!(api.records_in("example.com").is_empty());
}
