use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::Utc;
use crowdfund_engine::{db_types::CampaignImage, CampaignApi};
use mockall::predicate::eq;

use super::{
    helpers::{campaign, get_request},
    mocks::MockDatabase,
};
use crate::routes::{CampaignByIdRoute, CampaignBySlugRoute, CampaignsRoute};

fn configure(db: MockDatabase) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let api = CampaignApi::new(db);
        cfg.service(CampaignsRoute::<MockDatabase>::new())
            .service(CampaignBySlugRoute::<MockDatabase>::new())
            .service(CampaignByIdRoute::<MockDatabase>::new())
            .app_data(web::Data::new(api));
    }
}

fn image(id: i64, campaign_id: i64, file_name: &str, is_primary: bool) -> CampaignImage {
    let now = Utc::now();
    CampaignImage { id, campaign_id, file_name: file_name.into(), is_primary, created_at: now, updated_at: now }
}

#[actix_web::test]
async fn list_all_campaigns() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDatabase::new();
    db.expect_fetch_campaigns().with(eq(None)).times(1).returning(|_| Ok(vec![campaign(2, 5), campaign(1, 2)]));
    let (status, json) = get_request("", "/campaigns", configure(db)).await;
    assert_eq!(status, StatusCode::OK);
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["id"], 2);
    assert_eq!(data[1]["current_amount"], 1_500_000);
    assert_eq!(data[1]["percent_funded"], 75);
}

#[actix_web::test]
async fn list_campaigns_for_an_owner() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDatabase::new();
    db.expect_fetch_campaigns().with(eq(Some(2))).times(1).returning(|_| Ok(vec![campaign(1, 2)]));
    let (status, json) = get_request("", "/campaigns?user_id=2", configure(db)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"][0]["user_id"], 2);
}

#[actix_web::test]
async fn list_campaigns_with_a_bad_query() {
    let _ = env_logger::try_init().ok();
    let (status, json) = get_request("", "/campaigns?user_id=bob", configure(MockDatabase::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["meta"]["status"], "error");
}

#[actix_web::test]
async fn campaign_detail() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDatabase::new();
    db.expect_fetch_campaign().with(eq(1)).returning(|id| Ok(Some(campaign(id, 2))));
    db.expect_fetch_campaign_images()
        .with(eq(1))
        .returning(|id| Ok(vec![image(3, id, "images/well.jpg", true), image(2, id, "images/site.jpg", false)]));
    let (status, json) = get_request("", "/campaigns/1", configure(db)).await;
    assert_eq!(status, StatusCode::OK);
    let data = &json["data"];
    assert_eq!(data["name"], "Campaign 1");
    assert_eq!(data["image_url"], "images/well.jpg");
    assert_eq!(data["perks"], serde_json::json!(["Sticker", "T-shirt"]));
    assert_eq!(data["current_amount_idr"], "Rp.1.500.000,00");
    assert_eq!(data["backer_count"], 3);
    assert_eq!(data["images"].as_array().unwrap().len(), 2);
    assert_eq!(data["images"][1]["is_primary"], false);
}

#[actix_web::test]
async fn campaign_by_slug() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDatabase::new();
    db.expect_fetch_campaign_by_slug()
        .withf(|slug| slug.to_string() == "campaign-1-2")
        .returning(|_| Ok(Some(campaign(1, 2))));
    db.expect_fetch_campaign_images().returning(|_| Ok(vec![]));
    let (status, json) = get_request("", "/campaigns/slug/campaign-1-2", configure(db)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["id"], 1);
    assert_eq!(json["data"]["image_url"], "");
}

#[actix_web::test]
async fn missing_campaign() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDatabase::new();
    db.expect_fetch_campaign().returning(|_| Ok(None));
    let (status, json) = get_request("", "/campaigns/404", configure(db)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["data"]["errors"], "The data was not found. Campaign 404 does not exist");
}
