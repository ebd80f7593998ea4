use thiserror::Error;

use crate::db_types::{OrderCode, Transaction, TransactionWithCampaign};

/// Read-only queries over contribution transactions. Lists are ordered newest first.
#[allow(async_fn_in_trait)]
pub trait TransactionManagement {
    async fn fetch_transaction_by_id(&self, id: i64) -> Result<Option<Transaction>, TransactionQueryError>;

    async fn fetch_transaction_by_code(&self, code: &OrderCode) -> Result<Option<Transaction>, TransactionQueryError>;

    async fn fetch_transactions_for_campaign(&self, campaign_id: i64)
        -> Result<Vec<Transaction>, TransactionQueryError>;

    /// The user's transactions, each with the supported campaign's name, slug and primary image.
    async fn fetch_transactions_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<TransactionWithCampaign>, TransactionQueryError>;
}

#[derive(Debug, Clone, Error)]
pub enum TransactionQueryError {
    #[error("Internal database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for TransactionQueryError {
    fn from(e: sqlx::Error) -> Self {
        TransactionQueryError::DatabaseError(e.to_string())
    }
}
