use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{TimeZone, Utc};
use crowdfund_engine::{
    db_types::{OrderCode, Rupiah, Transaction, TransactionStatus, TransactionWithCampaign},
    events::EventProducers,
    traits::{CheckoutHandle, PaymentProviderError, TransitionResult},
    ContributionFlowApi,
    TransactionsApi,
};
use mockall::predicate::{always, eq};

use super::{
    helpers::{alice_token, campaign, get_request, owner_token, post_request, transaction},
    mocks::{MockDatabase, MockGateway},
};
use crate::routes::{CampaignTransactionsRoute, CreateTransactionRoute, MyTransactionsRoute, TransactionByIdRoute};

fn configure_create(db: MockDatabase, gateway: MockGateway) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let api = ContributionFlowApi::new(db, gateway, EventProducers::default());
        cfg.service(CreateTransactionRoute::<MockDatabase, MockGateway>::new()).app_data(web::Data::new(api));
    }
}

fn configure_reads(db: MockDatabase) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let api = TransactionsApi::new(db);
        cfg.service(MyTransactionsRoute::<MockDatabase>::new())
            .service(TransactionByIdRoute::<MockDatabase>::new())
            .service(CampaignTransactionsRoute::<MockDatabase>::new())
            .app_data(web::Data::new(api));
    }
}

fn pending_from_insert(db: &mut MockDatabase) {
    db.expect_insert_pending_transaction()
        .withf(|tx| tx.user_id == 7 && tx.campaign_id == 1 && tx.amount == Rupiah::from(50_000))
        .times(1)
        .returning(|tx| {
            let now = Utc::now();
            Ok(Transaction {
                id: 11,
                campaign_id: tx.campaign_id,
                user_id: tx.user_id,
                backer_name: tx.backer_name,
                amount: tx.amount,
                status: TransactionStatus::Pending,
                code: tx.code,
                payment_url: None,
                created_at: now,
                updated_at: now,
            })
        });
}

#[actix_web::test]
async fn create_transaction_requires_a_token() {
    let _ = env_logger::try_init().ok();
    let body = r#"{"campaign_id": 1, "amount": 50000}"#;
    let (status, json) =
        post_request("", "/transactions", body, configure_create(MockDatabase::new(), MockGateway::new())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["meta"]["status"], "error");
    assert_eq!(json["meta"]["code"], 401);
    assert_eq!(json["data"]["errors"], "Authentication Error. No bearer token was provided.");
}

#[actix_web::test]
async fn create_transaction_rejects_tampered_tokens() {
    let _ = env_logger::try_init().ok();
    let mut token = alice_token();
    token.replace_range(token.len() - 10..token.len() - 5, "00000");
    let body = r#"{"campaign_id": 1, "amount": 50000}"#;
    let (status, _) =
        post_request(&token, "/transactions", body, configure_create(MockDatabase::new(), MockGateway::new())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn create_transaction() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDatabase::new();
    db.expect_fetch_campaign().with(eq(1)).returning(|id| Ok(Some(campaign(id, 2))));
    pending_from_insert(&mut db);
    db.expect_attach_payment_url().times(1).returning(|code, url| {
        let mut tx = transaction(11, 1, 7, TransactionStatus::Pending);
        tx.code = code.clone();
        tx.payment_url = Some(url.to_string());
        Ok(tx)
    });
    let mut gateway = MockGateway::new();
    gateway
        .expect_create_payment_request()
        .withf(|req| req.backer.email == "alice@example.com" && req.item_name == "Campaign 1")
        .times(1)
        .returning(|req| {
            Ok(CheckoutHandle {
                token: "snap-token-123".into(),
                redirect_url: format!("https://app.sandbox.midtrans.com/snap/v2/vtweb/{}", req.order_id),
            })
        });
    let body = r#"{"campaign_id": 1, "amount": 50000}"#;
    let (status, json) = post_request(&alice_token(), "/transactions", body, configure_create(db, gateway)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["meta"]["status"], "success");
    assert_eq!(json["meta"]["message"], "Success to create transaction");
    let data = &json["data"];
    assert_eq!(data["token"], "snap-token-123");
    assert_eq!(data["status"], "pending");
    assert_eq!(data["amount"], 50_000);
    assert_eq!(data["user_id"], 7);
    let code = data["code"].as_str().unwrap();
    assert!(code.starts_with("CF-"));
    assert!(data["payment_url"].as_str().unwrap().ends_with(code));
}

#[actix_web::test]
async fn create_transaction_with_a_malformed_body() {
    let _ = env_logger::try_init().ok();
    let body = r#"{"campaign_id": 1, "amount": "lots"}"#;
    let (status, json) = post_request(
        &alice_token(),
        "/transactions",
        body,
        configure_create(MockDatabase::new(), MockGateway::new()),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["meta"]["message"], "Unprocessable Entity");
}

#[actix_web::test]
async fn create_transaction_with_zero_amount() {
    let _ = env_logger::try_init().ok();
    let body = r#"{"campaign_id": 1, "amount": 0}"#;
    let (status, json) = post_request(
        &alice_token(),
        "/transactions",
        body,
        configure_create(MockDatabase::new(), MockGateway::new()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["data"]["errors"].as_str().unwrap().contains("must be positive"));
}

#[actix_web::test]
async fn create_transaction_for_unknown_campaign() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDatabase::new();
    db.expect_fetch_campaign().returning(|_| Ok(None));
    db.expect_insert_pending_transaction().never();
    let body = r#"{"campaign_id": 99, "amount": 50000}"#;
    let (status, json) =
        post_request(&alice_token(), "/transactions", body, configure_create(db, MockGateway::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["data"]["errors"].as_str().unwrap().contains("Campaign 99 does not exist"));
}

#[actix_web::test]
async fn gateway_rejection_cancels_the_transaction() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDatabase::new();
    db.expect_fetch_campaign().returning(|id| Ok(Some(campaign(id, 2))));
    pending_from_insert(&mut db);
    db.expect_transition_transaction().with(always(), eq(TransactionStatus::Cancelled)).times(1).returning(
        |code, _| {
            let mut tx = transaction(11, 1, 7, TransactionStatus::Cancelled);
            tx.code = code.clone();
            Ok(TransitionResult::Applied(tx))
        },
    );
    db.expect_attach_payment_url().never();
    let mut gateway = MockGateway::new();
    gateway.expect_name().return_const("mock".to_string());
    gateway.expect_create_payment_request().times(1).returning(|_| {
        Err(PaymentProviderError::Rejected { status: 401, message: "Access denied due to unauthorized".into() })
    });
    let body = r#"{"campaign_id": 1, "amount": 50000}"#;
    let (status, json) = post_request(&alice_token(), "/transactions", body, configure_create(db, gateway)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["meta"]["status"], "error");
    assert!(json["data"]["errors"].as_str().unwrap().contains("Access denied"));
}

#[actix_web::test]
async fn fetch_my_transactions() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDatabase::new();
    db.expect_fetch_transactions_for_user().with(eq(7)).times(1).returning(|_| {
        Ok(vec![TransactionWithCampaign {
            id: 4,
            campaign_id: 1,
            amount: Rupiah::from(75_000),
            status: TransactionStatus::Paid,
            code: OrderCode::from("CF-4"),
            created_at: Utc.with_ymd_and_hms(2024, 10, 2, 14, 30, 0).unwrap(),
            campaign_name: "Clean water".into(),
            campaign_slug: "clean-water-2".into(),
            campaign_image: Some("images/water.jpg".into()),
        }])
    });
    let (status, json) = get_request(&alice_token(), "/transactions", configure_reads(db)).await;
    assert_eq!(status, StatusCode::OK);
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["status"], "paid");
    assert_eq!(data[0]["amount"], 75_000);
    assert_eq!(data[0]["campaign"]["name"], "Clean water");
    assert_eq!(data[0]["campaign"]["image_url"], "images/water.jpg");
    assert_eq!(data[0]["created_at"], "2024-10-02T14:30:00Z");
}

#[actix_web::test]
async fn campaign_owner_sees_campaign_transactions() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDatabase::new();
    db.expect_fetch_campaign().with(eq(1)).returning(|id| Ok(Some(campaign(id, 2))));
    db.expect_fetch_transactions_for_campaign().with(eq(1)).times(1).returning(|_| {
        Ok(vec![transaction(6, 1, 7, TransactionStatus::Paid), transaction(5, 1, 8, TransactionStatus::Pending)])
    });
    let (status, json) = get_request(&owner_token(), "/campaigns/1/transactions", configure_reads(db)).await;
    assert_eq!(status, StatusCode::OK);
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["id"], 6);
    assert_eq!(data[0]["name"], "Alice");
    assert_eq!(data[1]["status"], "pending");
}

#[actix_web::test]
async fn other_users_cannot_see_campaign_transactions() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDatabase::new();
    db.expect_fetch_campaign().with(eq(1)).returning(|id| Ok(Some(campaign(id, 2))));
    db.expect_fetch_transactions_for_campaign().never();
    let (status, json) = get_request(&alice_token(), "/campaigns/1/transactions", configure_reads(db)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["data"]["errors"], "Insufficient Permissions. User 7 is not the owner of campaign 1");
}

#[actix_web::test]
async fn transactions_for_missing_campaign() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDatabase::new();
    db.expect_fetch_campaign().returning(|_| Ok(None));
    let (status, _) = get_request(&owner_token(), "/campaigns/42/transactions", configure_reads(db)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn transaction_by_id_is_private() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDatabase::new();
    db.expect_fetch_transaction_by_id()
        .with(eq(5))
        .returning(|id| Ok(Some(transaction(id, 1, 9, TransactionStatus::Paid))));
    db.expect_fetch_campaign().with(eq(1)).returning(|id| Ok(Some(campaign(id, 2))));
    let (status, json) = get_request(&alice_token(), "/transactions/5", configure_reads(db)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["data"]["errors"], "The data was not found. Transaction 5 does not exist");
}

#[actix_web::test]
async fn campaign_owner_can_fetch_a_transaction() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDatabase::new();
    db.expect_fetch_transaction_by_id()
        .with(eq(5))
        .returning(|id| Ok(Some(transaction(id, 1, 9, TransactionStatus::Paid))));
    db.expect_fetch_campaign().with(eq(1)).returning(|id| Ok(Some(campaign(id, 2))));
    let (status, json) = get_request(&owner_token(), "/transactions/5", configure_reads(db)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["id"], 5);
    assert_eq!(json["data"]["status"], "paid");
}

#[actix_web::test]
async fn transaction_by_id_with_a_bad_path() {
    let _ = env_logger::try_init().ok();
    let (status, json) = get_request(&alice_token(), "/transactions/abc", configure_reads(MockDatabase::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["meta"]["status"], "error");
}
