use chrono::Duration;
use crowdfund_engine::{
    db_types::{Campaign, NewCampaign, OrderCode, Rupiah},
    SqliteDatabase,
};
use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};

pub async fn prepare_test_env(url: &str) -> SqliteDatabase {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
    create_database(url).await;
    let db = SqliteDatabase::new_with_url(url, 5).await.expect("Error creating connection to database");
    db.run_migrations().await.expect("Error running DB migrations");
    db
}

pub fn random_db_path() -> String {
    let dir = std::env::temp_dir();
    format!("sqlite://{}/cf_test_store_{}.db", dir.display(), rand::random::<u64>())
}

pub async fn create_database(url: &str) {
    if Sqlite::database_exists(url).await.unwrap_or(false) {
        if let Err(e) = Sqlite::drop_database(url).await {
            warn!("Error dropping database {url}: {e:?}");
        }
    }
    Sqlite::create_database(url).await.expect("Error creating database");
    info!("Created Sqlite database {url}");
}

pub async fn drop_database(url: &str) {
    if let Err(e) = Sqlite::drop_database(url).await {
        warn!("Error dropping database {url}: {e:?}");
    }
}

pub async fn seed_campaign(db: &SqliteDatabase, owner: i64, name: &str, goal: i64) -> Campaign {
    let campaign = NewCampaign::new(owner, name, Rupiah::from(goal))
        .with_short_description(format!("{name}, in short"))
        .with_perks("sticker, thank-you card");
    db.insert_campaign(campaign).await.expect("Error seeding campaign")
}

/// Pushes a transaction's creation time into the past, so that expiry can be exercised without waiting.
pub async fn backdate_transaction(db: &SqliteDatabase, code: &OrderCode, age: Duration) {
    let modifier = format!("-{} seconds", age.num_seconds());
    sqlx::query("UPDATE transactions SET created_at = datetime('now', $1) WHERE code = $2")
        .bind(modifier)
        .bind(code.as_str())
        .execute(db.pool())
        .await
        .expect("Error backdating transaction");
}

pub async fn campaign_ledger(db: &SqliteDatabase, campaign_id: i64) -> (i64, i64) {
    sqlx::query_as("SELECT current_amount, backer_count FROM campaigns WHERE id = $1")
        .bind(campaign_id)
        .fetch_one(db.pool())
        .await
        .expect("Error fetching campaign ledger")
}

pub async fn paid_sum(db: &SqliteDatabase, campaign_id: i64) -> (i64, i64) {
    sqlx::query_as(
        "SELECT COALESCE(SUM(amount), 0), COUNT(*) FROM transactions WHERE campaign_id = $1 AND status = 'paid'",
    )
    .bind(campaign_id)
    .fetch_one(db.pool())
    .await
    .expect("Error summing paid transactions")
}

/// Makes every write to a campaign's raised amount fail, until [`allow_ledger_writes`] is called.
pub async fn fail_ledger_writes(db: &SqliteDatabase) {
    sqlx::query(
        "CREATE TRIGGER fail_ledger_writes BEFORE UPDATE OF current_amount ON campaigns BEGIN SELECT RAISE(ABORT, \
         'ledger write failed'); END",
    )
    .execute(db.pool())
    .await
    .expect("Error creating ledger trigger");
}

/// Silently skips every ledger write, so the update affects no rows.
pub async fn skip_ledger_writes(db: &SqliteDatabase) {
    sqlx::query(
        "CREATE TRIGGER skip_ledger_writes BEFORE UPDATE OF current_amount ON campaigns BEGIN SELECT RAISE(IGNORE); \
         END",
    )
    .execute(db.pool())
    .await
    .expect("Error creating ledger trigger");
}

pub async fn allow_ledger_writes(db: &SqliteDatabase) {
    for trigger in ["fail_ledger_writes", "skip_ledger_writes"] {
        sqlx::query(&format!("DROP TRIGGER IF EXISTS {trigger}"))
            .execute(db.pool())
            .await
            .expect("Error dropping ledger trigger");
    }
}
