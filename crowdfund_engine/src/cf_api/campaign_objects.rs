use serde::{Deserialize, Serialize};

use crate::db_types::{Campaign, CampaignImage};

/// A campaign together with its images, primary image first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignDetail {
    pub campaign: Campaign,
    pub images: Vec<CampaignImage>,
}

impl CampaignDetail {
    pub fn primary_image(&self) -> Option<&CampaignImage> {
        self.images.iter().find(|i| i.is_primary)
    }
}
