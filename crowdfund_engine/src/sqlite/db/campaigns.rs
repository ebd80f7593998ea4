use log::{debug, trace};
use sqlx::{QueryBuilder, SqliteConnection};

use crate::db_types::{Campaign, CampaignImage, NewCampaign, NewCampaignImage, Rupiah};

/// Inserts a new campaign. The ledger totals always start at zero.
pub async fn insert_campaign(campaign: NewCampaign, conn: &mut SqliteConnection) -> Result<Campaign, sqlx::Error> {
    let slug = campaign.slug();
    let campaign: Campaign = sqlx::query_as(
        r#"
            INSERT INTO campaigns (
                user_id,
                name,
                short_description,
                description,
                perks,
                goal_amount,
                slug
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *;
        "#,
    )
    .bind(campaign.user_id)
    .bind(campaign.name)
    .bind(campaign.short_description)
    .bind(campaign.description)
    .bind(campaign.perks)
    .bind(campaign.goal_amount)
    .bind(slug)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Campaign [{}] inserted with id {}", campaign.slug, campaign.id);
    Ok(campaign)
}

/// Adds an image to a campaign. If the new image is primary, any existing primary image is demoted first, so call
/// this inside a transaction.
pub async fn insert_image(image: NewCampaignImage, conn: &mut SqliteConnection) -> Result<CampaignImage, sqlx::Error> {
    if image.is_primary {
        let demoted = sqlx::query(
            "UPDATE campaign_images SET is_primary = FALSE, updated_at = CURRENT_TIMESTAMP WHERE campaign_id = $1 AND \
             is_primary = TRUE",
        )
        .bind(image.campaign_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();
        trace!("🗃️ {demoted} primary images demoted for campaign #{}", image.campaign_id);
    }
    let image = sqlx::query_as(
        "INSERT INTO campaign_images (campaign_id, file_name, is_primary) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(image.campaign_id)
    .bind(image.file_name)
    .bind(image.is_primary)
    .fetch_one(conn)
    .await?;
    Ok(image)
}

pub async fn fetch_campaign(id: i64, conn: &mut SqliteConnection) -> Result<Option<Campaign>, sqlx::Error> {
    let campaign = sqlx::query_as("SELECT * FROM campaigns WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(campaign)
}

pub async fn fetch_campaign_by_slug(slug: &str, conn: &mut SqliteConnection) -> Result<Option<Campaign>, sqlx::Error> {
    let campaign = sqlx::query_as("SELECT * FROM campaigns WHERE slug = $1").bind(slug).fetch_optional(conn).await?;
    Ok(campaign)
}

/// Fetches all campaigns, optionally restricted to a single owner. Newest campaigns come first.
pub async fn fetch_campaigns(owner: Option<i64>, conn: &mut SqliteConnection) -> Result<Vec<Campaign>, sqlx::Error> {
    let mut builder = QueryBuilder::new("SELECT * FROM campaigns");
    if let Some(user_id) = owner {
        builder.push(" WHERE user_id = ");
        builder.push_bind(user_id);
    }
    builder.push(" ORDER BY created_at DESC, id DESC");
    trace!("🗃️ Executing query: {}", builder.sql());
    let campaigns = builder.build_query_as::<Campaign>().fetch_all(conn).await?;
    Ok(campaigns)
}

pub async fn fetch_images(campaign_id: i64, conn: &mut SqliteConnection) -> Result<Vec<CampaignImage>, sqlx::Error> {
    let images = sqlx::query_as(
        "SELECT * FROM campaign_images WHERE campaign_id = $1 ORDER BY is_primary DESC, id ASC",
    )
    .bind(campaign_id)
    .fetch_all(conn)
    .await?;
    Ok(images)
}

/// Adds `amount` to the campaign's raised total and one to its backer count.
///
/// This is the only statement in the crate that writes `current_amount` or `backer_count`. Returns the number of rows
/// affected, which is 0 if the campaign does not exist.
pub(crate) async fn increment_ledger(
    campaign_id: i64,
    amount: Rupiah,
    conn: &mut SqliteConnection,
) -> Result<u64, sqlx::Error> {
    let rows = sqlx::query(
        r#"
            UPDATE campaigns SET
                current_amount = current_amount + $1,
                backer_count = backer_count + 1,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $2
        "#,
    )
    .bind(amount)
    .bind(campaign_id)
    .execute(conn)
    .await?
    .rows_affected();
    trace!("🗃️ Ledger for campaign #{campaign_id} incremented by {amount}. {rows} rows affected");
    Ok(rows)
}
