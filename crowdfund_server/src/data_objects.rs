use actix_web::http::StatusCode;
use chrono::{DateTime, Utc};
use crowdfund_engine::{
    campaign_objects::CampaignDetail,
    contribution_objects::{NewContribution, NotificationOutcome},
    db_types::{Campaign, Transaction, TransactionStatus, TransactionWithCampaign},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

//-------------------------------------------------  Envelope  ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub message: String,
    pub code: u16,
    pub status: String,
}

/// Every JSON response is wrapped in this envelope. `meta.status` is either `success` or `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse<T = Value> {
    pub meta: Meta,
    pub data: T,
}

impl<T: Serialize> JsonResponse<T> {
    pub fn success<S: Into<String>>(message: S, data: T) -> Self {
        let meta = Meta { message: message.into(), code: StatusCode::OK.as_u16(), status: "success".to_string() };
        Self { meta, data }
    }
}

impl JsonResponse<Value> {
    pub fn error<S: Into<String>>(status: StatusCode, errors: S) -> Self {
        let message = status.canonical_reason().unwrap_or("Error").to_string();
        let meta = Meta { message, code: status.as_u16(), status: "error".to_string() };
        Self { meta, data: serde_json::json!({ "errors": errors.into() }) }
    }
}

//-------------------------------------------------  Requests  ---------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransactionRequest {
    pub campaign_id: i64,
    pub amount: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CampaignQuery {
    pub user_id: Option<i64>,
}

/// The body of a Midtrans HTTP notification. Only `order_id` and `transaction_status` are required; the rest are
/// needed for signature verification or are logged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MidtransNotification {
    pub order_id: String,
    pub transaction_status: String,
    #[serde(alias = "fraud_status", default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub status_code: Option<String>,
    #[serde(default)]
    pub gross_amount: Option<String>,
    #[serde(default)]
    pub signature_key: Option<String>,
    #[serde(default)]
    pub payment_type: Option<String>,
}

//-------------------------------------------------  Formatters  -------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFormatter {
    pub id: i64,
    pub campaign_id: i64,
    pub user_id: i64,
    pub amount: i64,
    pub status: TransactionStatus,
    pub code: String,
    pub payment_url: String,
}

impl From<Transaction> for TransactionFormatter {
    fn from(tx: Transaction) -> Self {
        Self {
            id: tx.id,
            campaign_id: tx.campaign_id,
            user_id: tx.user_id,
            amount: tx.amount.value(),
            status: tx.status,
            code: tx.code.0,
            payment_url: tx.payment_url.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContributionFormatter {
    #[serde(flatten)]
    pub transaction: TransactionFormatter,
    pub token: String,
}

impl From<NewContribution> for NewContributionFormatter {
    fn from(c: NewContribution) -> Self {
        Self { transaction: c.transaction.into(), token: c.checkout.token }
    }
}

/// A transaction as the campaign owner sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignTransactionFormatter {
    pub id: i64,
    pub name: String,
    pub amount: i64,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Transaction> for CampaignTransactionFormatter {
    fn from(tx: Transaction) -> Self {
        Self {
            id: tx.id,
            name: tx.backer_name,
            amount: tx.amount.value(),
            status: tx.status,
            created_at: tx.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignSummary {
    pub name: String,
    pub slug: String,
    pub image_url: String,
}

/// A transaction as the backer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTransactionFormatter {
    pub id: i64,
    pub amount: i64,
    pub status: TransactionStatus,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub campaign: CampaignSummary,
}

impl From<TransactionWithCampaign> for UserTransactionFormatter {
    fn from(tx: TransactionWithCampaign) -> Self {
        let campaign = CampaignSummary {
            name: tx.campaign_name,
            slug: tx.campaign_slug,
            image_url: tx.campaign_image.unwrap_or_default(),
        };
        Self {
            id: tx.id,
            amount: tx.amount.value(),
            status: tx.status,
            code: tx.code.0,
            created_at: tx.created_at,
            campaign,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignFormatter {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub short_description: String,
    pub goal_amount: i64,
    pub current_amount: i64,
    pub backer_count: i64,
    pub percent_funded: i64,
    pub slug: String,
}

impl From<Campaign> for CampaignFormatter {
    fn from(c: Campaign) -> Self {
        Self {
            percent_funded: c.percent_funded(),
            id: c.id,
            user_id: c.user_id,
            name: c.name,
            short_description: c.short_description,
            goal_amount: c.goal_amount.value(),
            current_amount: c.current_amount.value(),
            backer_count: c.backer_count,
            slug: c.slug,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignImageFormatter {
    pub image_url: String,
    pub is_primary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignDetailFormatter {
    #[serde(flatten)]
    pub campaign: CampaignFormatter,
    pub description: String,
    /// Display form of the raised amount, e.g. `Rp.1.500.000,00`
    pub current_amount_idr: String,
    pub goal_amount_idr: String,
    pub image_url: String,
    pub perks: Vec<String>,
    pub images: Vec<CampaignImageFormatter>,
}

impl From<CampaignDetail> for CampaignDetailFormatter {
    fn from(detail: CampaignDetail) -> Self {
        let image_url = detail.primary_image().map(|i| i.file_name.clone()).unwrap_or_default();
        let CampaignDetail { campaign, images } = detail;
        let perks = campaign.perk_list();
        let description = campaign.description.clone();
        let current_amount_idr = campaign.current_amount.to_string();
        let goal_amount_idr = campaign.goal_amount.to_string();
        let images = images
            .into_iter()
            .map(|i| CampaignImageFormatter { image_url: i.file_name, is_primary: i.is_primary })
            .collect();
        Self {
            campaign: campaign.into(),
            description,
            current_amount_idr,
            goal_amount_idr,
            image_url,
            perks,
            images,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationResult {
    pub order_id: String,
    pub outcome: String,
    pub status: TransactionStatus,
}

impl From<NotificationOutcome> for NotificationResult {
    fn from(outcome: NotificationOutcome) -> Self {
        let label = outcome.label().to_string();
        let tx = outcome.transaction();
        Self { order_id: tx.code.to_string(), outcome: label, status: tx.status }
    }
}
