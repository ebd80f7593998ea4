use std::{fmt::Debug, time::Duration};

use log::*;
use tokio::time::timeout;

use crate::{
    cf_api::{
        contribution_objects::{NewContribution, NotificationOutcome, NotificationStatus},
        errors::ContributionFlowError,
    },
    db_types::{Backer, NewTransaction, OrderCode, Rupiah, Transaction, TransactionStatus},
    events::{ContributionPaidEvent, EventProducers, TransactionClosedEvent, TransactionCreatedEvent},
    helpers::new_order_code,
    traits::{ContributionDatabase, PaymentProvider, PaymentRequest, TransitionResult},
};

pub const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(10);

/// `ContributionFlowApi` is the primary API for the contribution lifecycle: starting a contribution against a
/// campaign, and reconciling the payment gateway's asynchronous notifications against it.
pub struct ContributionFlowApi<B, P> {
    db: B,
    provider: P,
    producers: EventProducers,
    gateway_timeout: Duration,
}

impl<B, P> Debug for ContributionFlowApi<B, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ContributionFlowApi (gateway timeout: {:?})", self.gateway_timeout)
    }
}

impl<B, P> ContributionFlowApi<B, P> {
    pub fn new(db: B, provider: P, producers: EventProducers) -> Self {
        Self { db, provider, producers, gateway_timeout: DEFAULT_GATEWAY_TIMEOUT }
    }

    /// Bounds how long `create_transaction` waits for the payment gateway.
    pub fn with_gateway_timeout(mut self, gateway_timeout: Duration) -> Self {
        self.gateway_timeout = gateway_timeout;
        self
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl<B> ContributionFlowApi<B, ()> {
    /// An API instance with no payment gateway, for flows that never open a checkout (e.g. the expiry worker,
    /// or replaying notifications).
    pub fn without_provider(db: B, producers: EventProducers) -> Self {
        Self::new(db, (), producers)
    }
}

impl<B, P> ContributionFlowApi<B, P>
where
    B: ContributionDatabase,
    P: PaymentProvider,
{
    /// Starts a contribution of `amount` from `backer` to campaign `campaign_id`.
    ///
    /// The amount and the campaign are validated before anything is written. A `pending` transaction is then stored
    /// under a fresh order code, and the payment gateway is asked for a checkout. That call is bounded by the
    /// gateway timeout.
    ///
    /// If the gateway fails or times out, the pending transaction is cancelled and a
    /// [`ContributionFlowError::Gateway`] error is returned. No orphaned `pending` transactions are left behind.
    pub async fn create_transaction(
        &self,
        campaign_id: i64,
        backer: Backer,
        amount: Rupiah,
    ) -> Result<NewContribution, ContributionFlowError> {
        if !amount.is_positive() {
            debug!("🔄️💸️ Rejecting contribution of {amount} from user #{} to campaign #{campaign_id}", backer.id);
            return Err(ContributionFlowError::Validation(format!(
                "Contribution amount must be positive, but was {amount}"
            )));
        }
        let campaign = self.db.fetch_campaign(campaign_id).await?.ok_or_else(|| {
            debug!("🔄️💸️ Contribution from user #{} refers to unknown campaign #{campaign_id}", backer.id);
            ContributionFlowError::Validation(format!("Campaign {campaign_id} does not exist"))
        })?;
        let new_tx = NewTransaction::new(campaign_id, &backer, amount, new_order_code());
        let tx = self.db.insert_pending_transaction(new_tx).await?;
        debug!("🔄️💸️ Pending transaction [{}] of {amount} created for campaign #{campaign_id}", tx.code);
        let request =
            PaymentRequest { order_id: tx.code.clone(), gross_amount: tx.amount, backer, item_name: campaign.name };
        let checkout = match timeout(self.gateway_timeout, self.provider.create_payment_request(request)).await {
            Ok(Ok(checkout)) => checkout,
            Ok(Err(e)) => {
                warn!("🔄️💸️ {} could not open a checkout for [{}]. {e}", self.provider.name(), tx.code);
                return Err(self.cancel_after_gateway_failure(tx, e.to_string()).await);
            },
            Err(_) => {
                let ms = self.gateway_timeout.as_millis();
                warn!("🔄️💸️ {} did not respond within {ms} ms for [{}]", self.provider.name(), tx.code);
                let reason = format!("The payment gateway did not respond within {ms} ms");
                return Err(self.cancel_after_gateway_failure(tx, reason).await);
            },
        };
        let tx = self.db.attach_payment_url(&tx.code, &checkout.redirect_url).await?;
        info!("🔄️💸️ Checkout opened for [{}]: {amount} to campaign #{campaign_id}", tx.code);
        for producer in &self.producers.transaction_created_producer {
            producer.publish_event(TransactionCreatedEvent::new(tx.clone())).await;
        }
        Ok(NewContribution { transaction: tx, checkout })
    }

    async fn cancel_after_gateway_failure(&self, tx: Transaction, reason: String) -> ContributionFlowError {
        match self.db.transition_transaction(&tx.code, TransactionStatus::Cancelled).await {
            Ok(TransitionResult::Applied(cancelled)) => {
                debug!("🔄️💸️ Transaction [{}] cancelled after gateway failure", cancelled.code);
                self.call_transaction_closed_hook(cancelled).await;
            },
            Ok(TransitionResult::AlreadyFinal(existing)) => {
                warn!(
                    "🔄️💸️ Transaction [{}] was already {} when the gateway failure was handled",
                    existing.code, existing.status
                );
            },
            Err(e) => {
                error!(
                    "🔄️💸️ Transaction [{}] could not be cancelled after a gateway failure and remains pending. The \
                     expiry worker will close it. {e}",
                    tx.code
                );
            },
        }
        ContributionFlowError::Gateway(reason)
    }
}

impl<B, P> ContributionFlowApi<B, P>
where B: ContributionDatabase
{
    /// Applies a raw gateway notification. The status strings are mapped to a [`NotificationStatus`] first; anything
    /// unrecognised fails with [`ContributionFlowError::InvalidStatus`] before the database is touched.
    pub async fn process_gateway_notification(
        &self,
        order_id: &OrderCode,
        transaction_status: &str,
        payment_status: Option<&str>,
    ) -> Result<NotificationOutcome, ContributionFlowError> {
        let status = NotificationStatus::from_gateway(transaction_status, payment_status).map_err(|e| {
            warn!("🔄️📨️ Notification for [{order_id}] rejected. {e}");
            ContributionFlowError::InvalidStatus(e.to_string())
        })?;
        self.process_notification(order_id, status).await
    }

    /// Reconciles a notification against the transaction with the given order code.
    ///
    /// * Unknown order codes fail with [`ContributionFlowError::NotFound`] and change nothing.
    /// * Transactions that are already final are left untouched and reported as
    ///   [`NotificationOutcome::AlreadyFinal`]. Redelivering a notification is always safe.
    /// * A paid notification marks the transaction `paid` and credits the campaign ledger as one atomic unit.
    /// * Cancel, deny and expire notifications close the transaction without touching the ledger.
    pub async fn process_notification(
        &self,
        order_id: &OrderCode,
        status: NotificationStatus,
    ) -> Result<NotificationOutcome, ContributionFlowError> {
        trace!("🔄️📨️ Notification {status:?} received for [{order_id}]");
        let target = match status.target_status() {
            Some(target) => target,
            None => {
                let tx = self
                    .db
                    .fetch_transaction_by_code(order_id)
                    .await?
                    .ok_or_else(|| ContributionFlowError::NotFound(format!("No transaction for order {order_id}")))?;
                debug!("🔄️📨️ {status:?} notification for [{order_id}] requires no change. It is {}", tx.status);
                let outcome = if tx.status.is_final() {
                    NotificationOutcome::AlreadyFinal(tx)
                } else {
                    NotificationOutcome::Unchanged(tx)
                };
                return Ok(outcome);
            },
        };
        match self.db.transition_transaction(order_id, target).await? {
            TransitionResult::Applied(tx) => {
                info!("🔄️📨️ Transaction [{order_id}] is now {}", tx.status);
                if tx.status == TransactionStatus::Paid {
                    self.call_contribution_paid_hook(tx.clone()).await;
                } else {
                    self.call_transaction_closed_hook(tx.clone()).await;
                }
                Ok(NotificationOutcome::Applied(tx))
            },
            TransitionResult::AlreadyFinal(tx) => {
                info!(
                    "🔄️📨️ Duplicate or late notification for [{order_id}]. It is already {}; {target} was ignored",
                    tx.status
                );
                Ok(NotificationOutcome::AlreadyFinal(tx))
            },
        }
    }

    /// Expires pending transactions created more than `older_than` ago. Expired transactions are final, so a
    /// settlement that arrives later is ignored.
    pub async fn expire_stale_transactions(
        &self,
        older_than: chrono::Duration,
    ) -> Result<Vec<Transaction>, ContributionFlowError> {
        let expired = self.db.expire_transactions(older_than).await?;
        for tx in &expired {
            self.call_transaction_closed_hook(tx.clone()).await;
        }
        Ok(expired)
    }

    async fn call_contribution_paid_hook(&self, tx: Transaction) {
        for producer in &self.producers.contribution_paid_producer {
            debug!("🔄️📨️ Notifying contribution paid hook subscribers");
            producer.publish_event(ContributionPaidEvent::new(tx.clone())).await;
        }
    }

    async fn call_transaction_closed_hook(&self, tx: Transaction) {
        for producer in &self.producers.transaction_closed_producer {
            debug!("🔄️📨️ Notifying transaction closed hook subscribers");
            producer.publish_event(TransactionClosedEvent::new(tx.clone())).await;
        }
    }
}
