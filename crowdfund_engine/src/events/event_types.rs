use serde::{Deserialize, Serialize};

use crate::db_types::{Rupiah, Transaction, TransactionStatus};

/// A pending transaction was stored and the gateway returned a checkout for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionCreatedEvent {
    pub transaction: Transaction,
}

impl TransactionCreatedEvent {
    pub fn new(transaction: Transaction) -> Self {
        Self { transaction }
    }
}

/// A contribution was paid and credited to the campaign ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionPaidEvent {
    pub transaction: Transaction,
    pub campaign_id: i64,
    pub amount: Rupiah,
}

impl ContributionPaidEvent {
    pub fn new(transaction: Transaction) -> Self {
        let campaign_id = transaction.campaign_id;
        let amount = transaction.amount;
        Self { transaction, campaign_id, amount }
    }
}

/// A transaction was closed without payment, i.e. it was cancelled or expired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionClosedEvent {
    pub transaction: Transaction,
    pub status: TransactionStatus,
}

impl TransactionClosedEvent {
    pub fn new(transaction: Transaction) -> Self {
        let status = transaction.status;
        Self { transaction, status }
    }
}
