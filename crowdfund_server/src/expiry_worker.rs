use chrono::Duration;
use crowdfund_engine::{db_types::Transaction, events::EventProducers, ContributionFlowApi, SqliteDatabase};
use log::*;
use tokio::task::JoinHandle;

const EXPIRY_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);

/// Starts the expiry worker. Do not await the returned JoinHandle, as it will run indefinitely.
pub fn start_expiry_worker(db: SqliteDatabase, producers: EventProducers, unpaid_expiry: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(EXPIRY_INTERVAL);
        let api = ContributionFlowApi::without_provider(db, producers);
        info!("🕰️ Unpaid transaction expiry worker started. Timeout: {}h", unpaid_expiry.num_hours());
        loop {
            timer.tick().await;
            trace!("🕰️ Running unpaid transaction expiry job");
            match api.expire_stale_transactions(unpaid_expiry).await {
                Ok(expired) if expired.is_empty() => trace!("🕰️ No transactions expired"),
                Ok(expired) => {
                    info!("🕰️ {} transactions expired", expired.len());
                    debug!("🕰️ Expired transactions: {}", transaction_list(&expired));
                },
                Err(e) => {
                    error!("🕰️ Error running unpaid transaction expiry job: {e}");
                },
            }
        }
    })
}

fn transaction_list(txs: &[Transaction]) -> String {
    txs.iter()
        .map(|t| format!("[{}] campaign: {} user: {} amount: {}", t.code, t.campaign_id, t.user_id, t.amount))
        .collect::<Vec<String>>()
        .join(", ")
}
