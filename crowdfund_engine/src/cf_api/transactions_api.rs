//! Read-side queries over contributions, with the ownership rules applied.

use std::fmt::Debug;

use log::*;

use crate::{
    cf_api::errors::TransactionApiError,
    db_types::{Transaction, TransactionWithCampaign},
    traits::{CampaignManagement, TransactionManagement},
};

pub struct TransactionsApi<B> {
    db: B,
}

impl<B: Debug> Debug for TransactionsApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TransactionsApi ({:?})", self.db)
    }
}

impl<B> TransactionsApi<B>
where B: TransactionManagement + CampaignManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Lists the transactions of a campaign, newest first. Only the campaign owner may see them.
    pub async fn transactions_for_campaign(
        &self,
        campaign_id: i64,
        requester: i64,
    ) -> Result<Vec<Transaction>, TransactionApiError> {
        let campaign =
            self.db.fetch_campaign(campaign_id).await?.ok_or(TransactionApiError::CampaignNotFound(campaign_id))?;
        if campaign.user_id != requester {
            debug!("💸️ User #{requester} asked for the transactions of campaign #{campaign_id}, owned by someone else");
            return Err(TransactionApiError::NotCampaignOwner { campaign_id, user_id: requester });
        }
        let txs = self.db.fetch_transactions_for_campaign(campaign_id).await?;
        trace!("💸️ {} transactions found for campaign #{campaign_id}", txs.len());
        Ok(txs)
    }

    /// Lists the backer's own contributions, newest first, each with a summary of the campaign it supports.
    pub async fn transactions_for_user(&self, user_id: i64) -> Result<Vec<TransactionWithCampaign>, TransactionApiError> {
        let txs = self.db.fetch_transactions_for_user(user_id).await?;
        trace!("💸️ {} transactions found for user #{user_id}", txs.len());
        Ok(txs)
    }

    /// A single transaction is visible to the backer who made it and to the owner of the campaign it supports.
    /// Anyone else gets `TransactionNotFound`, so transaction ids cannot be probed.
    pub async fn transaction_by_id(&self, id: i64, requester: i64) -> Result<Transaction, TransactionApiError> {
        let tx = self.db.fetch_transaction_by_id(id).await?.ok_or(TransactionApiError::TransactionNotFound(id))?;
        if tx.user_id == requester {
            return Ok(tx);
        }
        let owner = self.db.fetch_campaign(tx.campaign_id).await?.map(|c| c.user_id);
        if owner == Some(requester) {
            Ok(tx)
        } else {
            debug!("💸️ User #{requester} may not view transaction #{id}");
            Err(TransactionApiError::TransactionNotFound(id))
        }
    }
}
