use actix_web::{http::StatusCode, web, web::ServiceConfig};
use crowdfund_engine::{
    db_types::{OrderCode, TransactionStatus},
    events::EventProducers,
    traits::{ContributionDbError, TransitionResult},
    ContributionFlowApi,
};
use fund_common::Secret;
use midtrans_tools::helpers::notification_signature;
use mockall::predicate::eq;

use super::{
    helpers::{post_request, transaction},
    mocks::{MockDatabase, MockGateway},
};
use crate::{integrations::NotificationVerifier, routes::NotificationRoute};

const SERVER_KEY: &str = "SB-Mid-server-TEST";

fn configure(db: MockDatabase, verify: bool) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let api = ContributionFlowApi::new(db, MockGateway::new(), EventProducers::default());
        let verifier = NotificationVerifier::new(Secret::new(SERVER_KEY.to_string()), verify);
        cfg.service(NotificationRoute::<MockDatabase, MockGateway>::new())
            .app_data(web::Data::new(api))
            .app_data(web::Data::new(verifier));
    }
}

fn code(id: i64) -> OrderCode {
    transaction(id, 1, 7, TransactionStatus::Pending).code
}

fn settlement_body(order_id: &str) -> String {
    let signature = notification_signature(order_id, "200", "50000.00", SERVER_KEY);
    format!(
        r#"{{"order_id":"{order_id}","transaction_status":"settlement","fraud_status":"accept","status_code":"200",
        "gross_amount":"50000.00","signature_key":"{signature}","payment_type":"bank_transfer"}}"#
    )
}

#[actix_web::test]
async fn settlement_marks_the_transaction_paid() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDatabase::new();
    db.expect_transition_transaction()
        .with(eq(code(3)), eq(TransactionStatus::Paid))
        .times(1)
        .returning(|_, _| Ok(TransitionResult::Applied(transaction(3, 1, 7, TransactionStatus::Paid))));
    let body = settlement_body(code(3).as_str());
    let (status, json) = post_request("", "/transactions/notification", &body, configure(db, true)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["meta"]["status"], "success");
    assert_eq!(json["data"]["outcome"], "applied");
    assert_eq!(json["data"]["status"], "paid");
    assert_eq!(json["data"]["order_id"], code(3).as_str());
}

#[actix_web::test]
async fn redelivered_settlement_is_acknowledged() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDatabase::new();
    db.expect_transition_transaction()
        .times(1)
        .returning(|_, _| Ok(TransitionResult::AlreadyFinal(transaction(3, 1, 7, TransactionStatus::Paid))));
    let body = settlement_body(code(3).as_str());
    let (status, json) = post_request("", "/transactions/notification", &body, configure(db, true)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["outcome"], "already_final");
}

#[actix_web::test]
async fn challenge_leaves_the_transaction_pending() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDatabase::new();
    db.expect_transition_transaction().never();
    db.expect_fetch_transaction_by_code()
        .with(eq(code(3)))
        .returning(|_| Ok(Some(transaction(3, 1, 7, TransactionStatus::Pending))));
    let body = format!(
        r#"{{"order_id":"{}","transaction_status":"capture","fraud_status":"challenge"}}"#,
        code(3).as_str()
    );
    let (status, json) = post_request("", "/transactions/notification", &body, configure(db, false)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["outcome"], "unchanged");
    assert_eq!(json["data"]["status"], "pending");
}

#[actix_web::test]
async fn unknown_status_is_rejected() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDatabase::new();
    db.expect_transition_transaction().never();
    let body = format!(r#"{{"order_id":"{}","transaction_status":"refund"}}"#, code(3).as_str());
    let (status, json) = post_request("", "/transactions/notification", &body, configure(db, false)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["data"]["errors"].as_str().unwrap().contains("refund"));
}

#[actix_web::test]
async fn unknown_order_is_not_found() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDatabase::new();
    db.expect_transition_transaction()
        .returning(|code, _| Err(ContributionDbError::TransactionNotFound(code.clone())));
    let body = settlement_body("CF-does-not-exist");
    let (status, json) = post_request("", "/transactions/notification", &body, configure(db, true)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["meta"]["code"], 404);
}

#[actix_web::test]
async fn forged_notification_is_rejected() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDatabase::new();
    db.expect_transition_transaction().never();
    let body = settlement_body(code(3).as_str()).replace("50000.00", "5000000.00");
    let (status, json) = post_request("", "/transactions/notification", &body, configure(db, true)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["data"]["errors"], "Authentication Error. The notification signature is missing or invalid.");
}

#[actix_web::test]
async fn unsigned_notification_is_accepted_when_checks_are_off() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDatabase::new();
    db.expect_transition_transaction()
        .with(eq(code(4)), eq(TransactionStatus::Expire))
        .times(1)
        .returning(|_, _| Ok(TransitionResult::Applied(transaction(4, 1, 7, TransactionStatus::Expire))));
    let body = format!(r#"{{"order_id":"{}","transaction_status":"expire"}}"#, code(4).as_str());
    let (status, json) = post_request("", "/transactions/notification", &body, configure(db, false)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "expire");
}

#[actix_web::test]
async fn malformed_notification() {
    let _ = env_logger::try_init().ok();
    let body = r#"{"status":"settlement"}"#;
    let (status, json) =
        post_request("", "/transactions/notification", body, configure(MockDatabase::new(), false)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["meta"]["status"], "error");
}
