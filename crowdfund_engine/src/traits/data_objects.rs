use serde::{Deserialize, Serialize};

use crate::db_types::{Backer, OrderCode, Rupiah, Transaction};

/// The result of a conditional status transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionResult {
    /// The transaction was pending and has been moved to the requested status.
    Applied(Transaction),
    /// The transaction had already reached a final status. Nothing was changed.
    AlreadyFinal(Transaction),
}

impl TransitionResult {
    pub fn transaction(&self) -> &Transaction {
        match self {
            TransitionResult::Applied(tx) | TransitionResult::AlreadyFinal(tx) => tx,
        }
    }

    pub fn into_transaction(self) -> Transaction {
        match self {
            TransitionResult::Applied(tx) | TransitionResult::AlreadyFinal(tx) => tx,
        }
    }
}

/// What the payment gateway needs in order to open a checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub order_id: OrderCode,
    pub gross_amount: Rupiah,
    pub backer: Backer,
    /// Shown to the buyer on the checkout page.
    pub item_name: String,
}

/// The gateway's answer to a payment request: a token for embedded checkouts and a URL for redirects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutHandle {
    pub token: String,
    pub redirect_url: String,
}
