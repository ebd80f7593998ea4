use thiserror::Error;

use crate::traits::{CampaignQueryError, ContributionDbError, TransactionQueryError};

/// Errors surfaced by the contribution flow. Every variant is a local failure of a single request.
#[derive(Debug, Clone, Error)]
pub enum ContributionFlowError {
    #[error("Invalid contribution request. {0}")]
    Validation(String),
    #[error("Not found. {0}")]
    NotFound(String),
    #[error("Payment gateway error. {0}")]
    Gateway(String),
    #[error("Unrecognised notification status. {0}")]
    InvalidStatus(String),
    #[error("The contribution could not be applied atomically and nothing was changed. Retry the request. {0}")]
    Consistency(String),
    #[error("Database error. {0}")]
    Database(String),
}

impl From<ContributionDbError> for ContributionFlowError {
    fn from(e: ContributionDbError) -> Self {
        match e {
            ContributionDbError::DatabaseError(s) => Self::Database(s),
            ContributionDbError::CampaignNotFound(_) | ContributionDbError::InvalidAmount(_) => {
                Self::Validation(e.to_string())
            },
            ContributionDbError::TransactionNotFound(_) => Self::NotFound(e.to_string()),
            ContributionDbError::ForbiddenTransition { .. }
            | ContributionDbError::LedgerUpdateFailed(_)
            | ContributionDbError::TransitionRolledBack(..) => Self::Consistency(e.to_string()),
        }
    }
}

impl From<TransactionQueryError> for ContributionFlowError {
    fn from(e: TransactionQueryError) -> Self {
        Self::Database(e.to_string())
    }
}

impl From<CampaignQueryError> for ContributionFlowError {
    fn from(e: CampaignQueryError) -> Self {
        Self::Database(e.to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum TransactionApiError {
    #[error("User {user_id} is not the owner of campaign {campaign_id}")]
    NotCampaignOwner { campaign_id: i64, user_id: i64 },
    #[error("Campaign {0} does not exist")]
    CampaignNotFound(i64),
    #[error("Transaction {0} does not exist")]
    TransactionNotFound(i64),
    #[error("Database error. {0}")]
    DatabaseError(String),
}

impl From<TransactionQueryError> for TransactionApiError {
    fn from(e: TransactionQueryError) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

impl From<CampaignQueryError> for TransactionApiError {
    fn from(e: CampaignQueryError) -> Self {
        Self::DatabaseError(e.to_string())
    }
}
