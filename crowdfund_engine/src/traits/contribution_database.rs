use chrono::Duration;
use thiserror::Error;

use crate::{
    db_types::{NewTransaction, OrderCode, Rupiah, Transaction, TransactionStatus},
    traits::{data_objects::TransitionResult, CampaignManagement, TransactionManagement},
};

/// The write side of the contribution engine.
///
/// Implementations must guarantee:
/// * A transaction leaves `pending` at most once. Every transition is conditional on the current status being
///   `pending`.
/// * The transition to `paid` and the campaign ledger increment are a single atomic unit.
/// * Campaign ledger totals have no other write path.
#[allow(async_fn_in_trait)]
pub trait ContributionDatabase: Clone + TransactionManagement + CampaignManagement {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Stores a new `pending` transaction. Fails with [`ContributionDbError::CampaignNotFound`] if the campaign does
    /// not exist, in which case nothing is written.
    async fn insert_pending_transaction(&self, tx: NewTransaction) -> Result<Transaction, ContributionDbError>;

    /// Records the gateway checkout URL against the transaction.
    async fn attach_payment_url(&self, code: &OrderCode, url: &str) -> Result<Transaction, ContributionDbError>;

    /// Moves a pending transaction to `new_status`.
    ///
    /// When `new_status` is `Paid`, the campaign's `current_amount` is increased by the transaction amount and its
    /// `backer_count` by one, in the same database transaction. If the ledger cannot be updated, the status change is
    /// rolled back and [`ContributionDbError::LedgerUpdateFailed`] is returned.
    ///
    /// A transaction that is already final is returned untouched as [`TransitionResult::AlreadyFinal`].
    async fn transition_transaction(
        &self,
        code: &OrderCode,
        new_status: TransactionStatus,
    ) -> Result<TransitionResult, ContributionDbError>;

    /// Expires every pending transaction created more than `older_than` ago, and returns the ones that changed.
    async fn expire_transactions(&self, older_than: Duration) -> Result<Vec<Transaction>, ContributionDbError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), ContributionDbError>;
}

#[derive(Debug, Clone, Error)]
pub enum ContributionDbError {
    #[error("Internal database error: {0}")]
    DatabaseError(String),
    #[error("Campaign {0} does not exist")]
    CampaignNotFound(i64),
    #[error("No transaction exists for order code {0}")]
    TransactionNotFound(OrderCode),
    #[error("Contribution amount must be positive, but was {0}")]
    InvalidAmount(Rupiah),
    #[error("Transaction {code} cannot move from {from} to {to}")]
    ForbiddenTransition { code: OrderCode, from: TransactionStatus, to: TransactionStatus },
    #[error("The ledger for campaign {0} could not be updated. The transaction status change was rolled back.")]
    LedgerUpdateFailed(i64),
    #[error("The status change for transaction {0} could not be committed and was rolled back. {1}")]
    TransitionRolledBack(OrderCode, String),
}

impl From<sqlx::Error> for ContributionDbError {
    fn from(e: sqlx::Error) -> Self {
        ContributionDbError::DatabaseError(e.to_string())
    }
}
