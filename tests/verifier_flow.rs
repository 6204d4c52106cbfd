mod common;

use common::{state, LogBuffer, RecordingNotifier, BASE_URL, START_PAY};
use payment_relay::domain::payment::{NotificationStatus, VerifyQuery};
use payment_relay::error::RelayError;
use payment_relay::gateways::mock::{GatewayCall, MockGateway};

fn callback(status: &str) -> VerifyQuery {
    VerifyQuery {
        authority: Some("A1".to_string()),
        status: Some(status.to_string()),
        order_id: Some("ord-1".to_string()),
        amount: Some("100000".to_string()),
        duration: Some("30".to_string()),
    }
}

#[tokio::test]
async fn cancelled_payment_skips_gateway() {
    let gateway = MockGateway::new("ALWAYS_SUCCESS", START_PAY).with_ref_id("REF1");
    let notifier = RecordingNotifier::answering(200);
    let state = state(&gateway, notifier.clone());

    let target = state.verifier.verify(&callback("cancel")).await.unwrap();
    assert_eq!(target, format!("{BASE_URL}/payment-failed?reason=cancelled"));
    assert!(gateway.calls().is_empty());
    assert!(notifier.payloads().is_empty());
}

#[tokio::test]
async fn verified_and_recorded_redirects_to_success() {
    let gateway = MockGateway::new("ALWAYS_SUCCESS", START_PAY).with_ref_id("REF1");
    let notifier = RecordingNotifier::answering(200);
    let state = state(&gateway, notifier.clone());

    let target = state.verifier.verify(&callback("OK")).await.unwrap();
    assert_eq!(target, format!("{BASE_URL}/payment-success?ref_id=REF1"));

    match gateway.calls().as_slice() {
        [GatewayCall::Verify(req)] => {
            assert_eq!(req.merchant_code, "merchant-1");
            assert_eq!(req.status, "OK");
            assert_eq!(req.amount, 100_000);
            assert_eq!(req.authority, "A1");
        }
        other => panic!("unexpected calls {other:?}"),
    }

    let payloads = notifier.payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].order_id, "ord-1");
    assert_eq!(payloads[0].status, NotificationStatus::Completed);
    assert_eq!(payloads[0].ref_id, "REF1");
    assert_eq!(payloads[0].amount, 100_000);
    assert_eq!(payloads[0].duration, 30);
}

#[tokio::test]
async fn unrecorded_payment_shows_reference_for_support() {
    let gateway = MockGateway::new("ALWAYS_SUCCESS", START_PAY).with_ref_id("REF1");
    let state = state(&gateway, RecordingNotifier::answering(500));

    let err = state.verifier.verify(&callback("OK")).await.unwrap_err();
    match &err {
        RelayError::NotificationFailed { ref_id, status, .. } => {
            assert_eq!(ref_id, "REF1");
            assert_eq!(*status, Some(500));
        }
        other => panic!("unexpected error {other:?}"),
    }
    let html = err.page().render();
    assert!(html.contains("REF1"));
    assert!(!html.contains("payment-success"));
}

#[tokio::test]
async fn unrecorded_payment_logs_downstream_status_and_body() {
    let logs = LogBuffer::default();
    let _guard = tracing::subscriber::set_default(logs.subscriber());

    let gateway = MockGateway::new("ALWAYS_SUCCESS", START_PAY).with_ref_id("REF1");
    let state = state(&gateway, RecordingNotifier::answering(500));
    state.verifier.verify(&callback("OK")).await.unwrap_err();

    let line = logs
        .contents()
        .lines()
        .find(|l| l.contains("downstream did not record it"))
        .map(str::to_string)
        .expect("reconciliation event logged");
    assert!(line.contains("ERROR"));
    assert!(line.contains("status=500"));
    assert!(line.contains("ref_id=REF1"));
    assert!(line.contains(r#"body={"status":"code 500"}"#));
}

#[tokio::test]
async fn unreachable_downstream_still_reports_reference() {
    let gateway = MockGateway::new("ALWAYS_SUCCESS", START_PAY).with_ref_id("REF9");
    let state = state(&gateway, RecordingNotifier::unreachable());

    let err = state.verifier.verify(&callback("OK")).await.unwrap_err();
    assert!(matches!(&err, RelayError::NotificationFailed { ref_id, status: None, .. } if ref_id == "REF9"));
}

#[tokio::test]
async fn refused_verification_redirects_with_reason() {
    let gateway = MockGateway::new("ALWAYS_FAILURE", START_PAY);
    let notifier = RecordingNotifier::answering(200);
    let state = state(&gateway, notifier.clone());

    let target = state.verifier.verify(&callback("OK")).await.unwrap();
    assert_eq!(
        target,
        format!("{BASE_URL}/payment-failed?reason=verification_failed&error=-9")
    );
    assert!(notifier.payloads().is_empty());
}

#[tokio::test]
async fn verify_transport_failure_is_terminal() {
    let gateway = MockGateway::new("ALWAYS_TIMEOUT", START_PAY);
    let notifier = RecordingNotifier::answering(200);
    let state = state(&gateway, notifier.clone());

    let err = state.verifier.verify(&callback("OK")).await.unwrap_err();
    assert!(matches!(err, RelayError::GatewayUnavailable { stage: "payment verification", .. }));
    assert!(notifier.payloads().is_empty());
}

#[tokio::test]
async fn incomplete_callback_is_rejected_before_status_check() {
    let gateway = MockGateway::new("ALWAYS_SUCCESS", START_PAY);
    let state = state(&gateway, RecordingNotifier::answering(200));

    let mut q = callback("cancel");
    q.amount = None;
    let err = state.verifier.verify(&q).await.unwrap_err();
    assert!(matches!(err, RelayError::IncompleteCallback("amount")));
    assert!(gateway.calls().is_empty());
}
