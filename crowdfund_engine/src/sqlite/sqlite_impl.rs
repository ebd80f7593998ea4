//! `SqliteDatabase` is a concrete implementation of a contribution engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use chrono::Duration;
use log::*;
use sqlx::{migrate::MigrateError, SqlitePool};

use super::db::{campaigns, db_url, new_pool, transactions};
use crate::{
    db_types::{
        Campaign,
        CampaignImage,
        NewCampaign,
        NewCampaignImage,
        NewTransaction,
        OrderCode,
        Transaction,
        TransactionStatus,
        TransactionWithCampaign,
    },
    traits::{
        CampaignManagement,
        CampaignQueryError,
        ContributionDatabase,
        ContributionDbError,
        TransactionManagement,
        TransactionQueryError,
        TransitionResult,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl ContributionDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn insert_pending_transaction(&self, tx: NewTransaction) -> Result<Transaction, ContributionDbError> {
        if !tx.amount.is_positive() {
            return Err(ContributionDbError::InvalidAmount(tx.amount));
        }
        let campaign_id = tx.campaign_id;
        let mut db_tx = self.pool.begin().await?;
        let tx = match transactions::insert_transaction(tx, &mut db_tx).await {
            Ok(tx) => tx,
            Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
                debug!("🗃️ Campaign #{campaign_id} does not exist. Transaction not created");
                return Err(ContributionDbError::CampaignNotFound(campaign_id));
            },
            Err(e) => return Err(e.into()),
        };
        db_tx.commit().await?;
        Ok(tx)
    }

    async fn attach_payment_url(&self, code: &OrderCode, url: &str) -> Result<Transaction, ContributionDbError> {
        let mut db_tx = self.pool.begin().await?;
        let tx = transactions::update_payment_url(code, url, &mut db_tx)
            .await?
            .ok_or_else(|| ContributionDbError::TransactionNotFound(code.clone()))?;
        db_tx.commit().await?;
        Ok(tx)
    }

    /// In a single atomic transaction:
    /// * conditionally moves the transaction from `pending` to `new_status`,
    /// * if nothing matched, reads the row back to tell an unknown code from an already-final transaction,
    /// * if the new status is `Paid`, increments the campaign ledger. The increment must touch exactly one row,
    ///   otherwise the whole unit is rolled back.
    ///
    /// Any failure after the status update, including the commit itself, leaves the transaction `pending` and is
    /// reported as [`ContributionDbError::LedgerUpdateFailed`] or [`ContributionDbError::TransitionRolledBack`].
    async fn transition_transaction(
        &self,
        code: &OrderCode,
        new_status: TransactionStatus,
    ) -> Result<TransitionResult, ContributionDbError> {
        if new_status == TransactionStatus::Pending {
            return Err(ContributionDbError::ForbiddenTransition {
                code: code.clone(),
                from: TransactionStatus::Pending,
                to: new_status,
            });
        }
        let mut db_tx = self.pool.begin().await?;
        let updated = match transactions::transition_pending(code, new_status, &mut db_tx).await? {
            Some(tx) => tx,
            None => {
                let existing = transactions::fetch_transaction_by_code(code, &mut db_tx)
                    .await?
                    .ok_or_else(|| ContributionDbError::TransactionNotFound(code.clone()))?;
                debug!("🗃️ Transaction [{code}] is already {}. {new_status} is not applied.", existing.status);
                return Ok(TransitionResult::AlreadyFinal(existing));
            },
        };
        if new_status == TransactionStatus::Paid {
            let campaign_id = updated.campaign_id;
            let rows = campaigns::increment_ledger(campaign_id, updated.amount, &mut db_tx).await.map_err(|e| {
                error!("🗃️ Ledger update for campaign #{campaign_id} failed while settling [{code}]. {e}");
                ContributionDbError::LedgerUpdateFailed(campaign_id)
            })?;
            if rows != 1 {
                error!(
                    "🗃️ Ledger update for campaign #{campaign_id} affected {rows} rows while settling [{code}]. \
                     Rolling back."
                );
                if let Err(e) = db_tx.rollback().await {
                    warn!("🗃️ Explicit rollback for [{code}] failed. The transaction is dropped instead. {e}");
                }
                return Err(ContributionDbError::LedgerUpdateFailed(campaign_id));
            }
            debug!("🗃️ Campaign #{campaign_id} credited with {} from [{code}]", updated.amount);
        }
        db_tx.commit().await.map_err(|e| {
            error!("🗃️ Could not commit {new_status} for [{code}]. Nothing was changed. {e}");
            ContributionDbError::TransitionRolledBack(code.clone(), e.to_string())
        })?;
        debug!("🗃️ Transaction [{code}] is now {new_status}");
        Ok(TransitionResult::Applied(updated))
    }

    async fn expire_transactions(&self, older_than: Duration) -> Result<Vec<Transaction>, ContributionDbError> {
        let mut db_tx = self.pool.begin().await?;
        let expired = transactions::expire_pending(older_than, &mut db_tx).await?;
        db_tx.commit().await?;
        trace!("🗃️ {} pending transactions older than {}s expired", expired.len(), older_than.num_seconds());
        Ok(expired)
    }

    async fn close(&mut self) -> Result<(), ContributionDbError> {
        self.pool.close().await;
        Ok(())
    }
}

impl TransactionManagement for SqliteDatabase {
    async fn fetch_transaction_by_id(&self, id: i64) -> Result<Option<Transaction>, TransactionQueryError> {
        let mut conn = self.pool.acquire().await?;
        let tx = transactions::fetch_transaction_by_id(id, &mut conn).await?;
        Ok(tx)
    }

    async fn fetch_transaction_by_code(&self, code: &OrderCode) -> Result<Option<Transaction>, TransactionQueryError> {
        let mut conn = self.pool.acquire().await?;
        let tx = transactions::fetch_transaction_by_code(code, &mut conn).await?;
        Ok(tx)
    }

    async fn fetch_transactions_for_campaign(
        &self,
        campaign_id: i64,
    ) -> Result<Vec<Transaction>, TransactionQueryError> {
        let mut conn = self.pool.acquire().await?;
        let txs = transactions::fetch_transactions_for_campaign(campaign_id, &mut conn).await?;
        Ok(txs)
    }

    async fn fetch_transactions_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<TransactionWithCampaign>, TransactionQueryError> {
        let mut conn = self.pool.acquire().await?;
        let txs = transactions::fetch_transactions_for_user(user_id, &mut conn).await?;
        Ok(txs)
    }
}

impl CampaignManagement for SqliteDatabase {
    async fn fetch_campaign(&self, id: i64) -> Result<Option<Campaign>, CampaignQueryError> {
        let mut conn = self.pool.acquire().await?;
        let campaign = campaigns::fetch_campaign(id, &mut conn).await?;
        Ok(campaign)
    }

    async fn fetch_campaign_by_slug(&self, slug: &str) -> Result<Option<Campaign>, CampaignQueryError> {
        let mut conn = self.pool.acquire().await?;
        let campaign = campaigns::fetch_campaign_by_slug(slug, &mut conn).await?;
        Ok(campaign)
    }

    async fn fetch_campaigns(&self, owner: Option<i64>) -> Result<Vec<Campaign>, CampaignQueryError> {
        let mut conn = self.pool.acquire().await?;
        let result = campaigns::fetch_campaigns(owner, &mut conn).await?;
        Ok(result)
    }

    async fn fetch_campaign_images(&self, campaign_id: i64) -> Result<Vec<CampaignImage>, CampaignQueryError> {
        let mut conn = self.pool.acquire().await?;
        let images = campaigns::fetch_images(campaign_id, &mut conn).await?;
        Ok(images)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Brings the schema up to date. The migrations are embedded in the binary.
    pub async fn run_migrations(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Inserts a campaign. Campaign management is owned by another service; this entry point exists for seeding and
    /// tests.
    pub async fn insert_campaign(&self, campaign: NewCampaign) -> Result<Campaign, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let campaign = campaigns::insert_campaign(campaign, &mut tx).await?;
        tx.commit().await?;
        Ok(campaign)
    }

    /// Adds an image to a campaign, demoting the current primary image if the new one is primary.
    pub async fn add_campaign_image(&self, image: NewCampaignImage) -> Result<CampaignImage, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let image = campaigns::insert_image(image, &mut tx).await?;
        tx.commit().await?;
        Ok(image)
    }
}
