use thiserror::Error;

use crate::db_types::{Campaign, CampaignImage};

/// Read-only queries over campaigns.
#[allow(async_fn_in_trait)]
pub trait CampaignManagement {
    async fn fetch_campaign(&self, id: i64) -> Result<Option<Campaign>, CampaignQueryError>;

    async fn fetch_campaign_by_slug(&self, slug: &str) -> Result<Option<Campaign>, CampaignQueryError>;

    /// All campaigns, or only those owned by `owner` if it is given. Newest first.
    async fn fetch_campaigns(&self, owner: Option<i64>) -> Result<Vec<Campaign>, CampaignQueryError>;

    /// The campaign's images, primary image first.
    async fn fetch_campaign_images(&self, campaign_id: i64) -> Result<Vec<CampaignImage>, CampaignQueryError>;
}

#[derive(Debug, Clone, Error)]
pub enum CampaignQueryError {
    #[error("Internal database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for CampaignQueryError {
    fn from(e: sqlx::Error) -> Self {
        CampaignQueryError::DatabaseError(e.to_string())
    }
}
