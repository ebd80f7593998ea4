use chrono::Duration;
use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::db_types::{NewTransaction, OrderCode, Transaction, TransactionStatus, TransactionWithCampaign};

/// Inserts a new transaction in `pending` status. This is not atomic. You can embed this call inside a transaction if
/// you need to ensure atomicity, and pass `&mut *tx` as the connection argument.
pub async fn insert_transaction(tx: NewTransaction, conn: &mut SqliteConnection) -> Result<Transaction, sqlx::Error> {
    let tx: Transaction = sqlx::query_as(
        r#"
            INSERT INTO transactions (
                campaign_id,
                user_id,
                backer_name,
                amount,
                code
            ) VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(tx.campaign_id)
    .bind(tx.user_id)
    .bind(tx.backer_name)
    .bind(tx.amount)
    .bind(tx.code)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Transaction [{}] inserted with id {}", tx.code, tx.id);
    Ok(tx)
}

pub async fn fetch_transaction_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Transaction>, sqlx::Error> {
    let tx = sqlx::query_as("SELECT * FROM transactions WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(tx)
}

pub async fn fetch_transaction_by_code(
    code: &OrderCode,
    conn: &mut SqliteConnection,
) -> Result<Option<Transaction>, sqlx::Error> {
    let tx =
        sqlx::query_as("SELECT * FROM transactions WHERE code = $1").bind(code.as_str()).fetch_optional(conn).await?;
    Ok(tx)
}

/// All transactions for the campaign, newest first.
pub async fn fetch_transactions_for_campaign(
    campaign_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Transaction>, sqlx::Error> {
    let txs = sqlx::query_as("SELECT * FROM transactions WHERE campaign_id = $1 ORDER BY created_at DESC, id DESC")
        .bind(campaign_id)
        .fetch_all(conn)
        .await?;
    Ok(txs)
}

/// All transactions made by the user, newest first, with a summary of each campaign attached.
pub async fn fetch_transactions_for_user(
    user_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<TransactionWithCampaign>, sqlx::Error> {
    let txs = sqlx::query_as(
        r#"
        SELECT
            transactions.id as id,
            transactions.campaign_id as campaign_id,
            amount,
            status,
            code,
            transactions.created_at as created_at,
            campaigns.name as campaign_name,
            campaigns.slug as campaign_slug,
            campaign_images.file_name as campaign_image
        FROM transactions
            JOIN campaigns ON transactions.campaign_id = campaigns.id
            LEFT JOIN campaign_images ON campaign_images.campaign_id = campaigns.id AND campaign_images.is_primary = TRUE
        WHERE transactions.user_id = $1
        ORDER BY transactions.created_at DESC, transactions.id DESC"#,
    )
    .bind(user_id)
    .fetch_all(conn)
    .await?;
    Ok(txs)
}

pub(crate) async fn update_payment_url(
    code: &OrderCode,
    url: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Transaction>, sqlx::Error> {
    let tx = sqlx::query_as(
        "UPDATE transactions SET payment_url = $1, updated_at = CURRENT_TIMESTAMP WHERE code = $2 RETURNING *",
    )
    .bind(url)
    .bind(code.as_str())
    .fetch_optional(conn)
    .await?;
    Ok(tx)
}

/// Moves the transaction to `status`, but only if it is currently `pending`.
///
/// Returns `None` when no row matched, either because the code is unknown or because the transaction is already
/// final. Concurrent callers racing on the same code therefore see exactly one `Some`.
pub(crate) async fn transition_pending(
    code: &OrderCode,
    status: TransactionStatus,
    conn: &mut SqliteConnection,
) -> Result<Option<Transaction>, sqlx::Error> {
    let tx = sqlx::query_as(
        "UPDATE transactions SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE code = $2 AND status = 'pending' \
         RETURNING *",
    )
    .bind(status)
    .bind(code.as_str())
    .fetch_optional(conn)
    .await?;
    trace!("🗃️ Conditional transition of [{code}] to {status}: {}", if tx.is_some() { "applied" } else { "no match" });
    Ok(tx)
}

pub(crate) async fn expire_pending(
    limit: Duration,
    conn: &mut SqliteConnection,
) -> Result<Vec<Transaction>, sqlx::Error> {
    let txs = sqlx::query_as(
        r#"
        UPDATE transactions SET status = 'expire', updated_at = CURRENT_TIMESTAMP
        WHERE status = 'pending' AND (unixepoch(CURRENT_TIMESTAMP) - unixepoch(created_at)) > $1
        RETURNING *"#,
    )
    .bind(limit.num_seconds())
    .fetch_all(conn)
    .await?;
    Ok(txs)
}
