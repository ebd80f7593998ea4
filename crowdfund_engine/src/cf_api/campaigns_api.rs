use std::fmt::Debug;

use crate::{
    cf_api::campaign_objects::CampaignDetail,
    db_types::Campaign,
    traits::{CampaignManagement, CampaignQueryError},
};

/// Read-only access to campaigns, as backers browse them.
pub struct CampaignApi<B> {
    db: B,
}

impl<B: Debug> Debug for CampaignApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CampaignApi ({:?})", self.db)
    }
}

impl<B> CampaignApi<B>
where B: CampaignManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// All campaigns, newest first. If `owner` is given, only that user's campaigns are returned.
    pub async fn campaigns(&self, owner: Option<i64>) -> Result<Vec<Campaign>, CampaignQueryError> {
        self.db.fetch_campaigns(owner).await
    }

    pub async fn campaign_by_id(&self, id: i64) -> Result<Option<CampaignDetail>, CampaignQueryError> {
        match self.db.fetch_campaign(id).await? {
            Some(campaign) => self.with_images(campaign).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn campaign_by_slug(&self, slug: &str) -> Result<Option<CampaignDetail>, CampaignQueryError> {
        match self.db.fetch_campaign_by_slug(slug).await? {
            Some(campaign) => self.with_images(campaign).await.map(Some),
            None => Ok(None),
        }
    }

    async fn with_images(&self, campaign: Campaign) -> Result<CampaignDetail, CampaignQueryError> {
        let images = self.db.fetch_campaign_images(campaign.id).await?;
        Ok(CampaignDetail { campaign, images })
    }
}
