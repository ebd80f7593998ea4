use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    db_types::{Transaction, TransactionStatus},
    traits::CheckoutHandle,
};

/// The result of starting a contribution: the stored pending transaction and the gateway's checkout for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContribution {
    pub transaction: Transaction,
    pub checkout: CheckoutHandle,
}

/// The closed set of notification states the engine understands.
///
/// Raw gateway strings are mapped into this enum as soon as they arrive. Nothing downstream sees the raw values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationStatus {
    /// `capture` with fraud status `accept`: card payment captured.
    Captured,
    /// `capture` with fraud status `challenge`: held for manual fraud review. A later notification settles it.
    Challenged,
    /// `settlement`: funds have settled.
    Settled,
    /// `pending`: the buyer has not paid yet.
    Pending,
    /// `cancel`
    Cancelled,
    /// `deny`
    Denied,
    /// `expire`
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transaction_status '{transaction_status}' with payment status '{payment_status}' is not recognised")]
pub struct UnknownNotificationStatus {
    pub transaction_status: String,
    pub payment_status: String,
}

impl NotificationStatus {
    pub fn from_gateway(
        transaction_status: &str,
        payment_status: Option<&str>,
    ) -> Result<Self, UnknownNotificationStatus> {
        let tx_status = transaction_status.trim().to_ascii_lowercase();
        let pay_status = payment_status.map(|s| s.trim().to_ascii_lowercase());
        match (tx_status.as_str(), pay_status.as_deref()) {
            ("capture", Some("accept")) => Ok(Self::Captured),
            ("capture", Some("challenge")) => Ok(Self::Challenged),
            ("settlement", _) => Ok(Self::Settled),
            ("pending", _) => Ok(Self::Pending),
            ("cancel", _) => Ok(Self::Cancelled),
            ("deny", _) => Ok(Self::Denied),
            ("expire", _) => Ok(Self::Expired),
            _ => Err(UnknownNotificationStatus {
                transaction_status: transaction_status.to_string(),
                payment_status: payment_status.unwrap_or_default().to_string(),
            }),
        }
    }

    /// The status the transaction moves to, or `None` if the notification does not change anything.
    pub fn target_status(&self) -> Option<TransactionStatus> {
        match self {
            Self::Captured | Self::Settled => Some(TransactionStatus::Paid),
            Self::Cancelled | Self::Denied => Some(TransactionStatus::Cancelled),
            Self::Expired => Some(TransactionStatus::Expire),
            Self::Pending | Self::Challenged => None,
        }
    }
}

/// What a notification did to its transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// The transaction moved out of `pending`. Paid transactions have been credited to the campaign ledger.
    Applied(Transaction),
    /// The transaction was already final. Nothing changed; this is normal for redelivered webhooks.
    AlreadyFinal(Transaction),
    /// The notification does not call for a status change (e.g. `pending`, or a fraud challenge).
    Unchanged(Transaction),
}

impl NotificationOutcome {
    pub fn transaction(&self) -> &Transaction {
        match self {
            Self::Applied(tx) | Self::AlreadyFinal(tx) | Self::Unchanged(tx) => tx,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Applied(_) => "applied",
            Self::AlreadyFinal(_) => "already_final",
            Self::Unchanged(_) => "unchanged",
        }
    }
}
