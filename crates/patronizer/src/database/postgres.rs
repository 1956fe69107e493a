use sqlx::PgPool;

use patronizer_models::{
	id::{
		marker::{ NotificationMarker, PageMarker, PatronMarker, TierMarker, UserMarker },
		PatronizerId
	},
	row::{
		CampaignRow, CampaignUpsert, NewNotification, NewPage, NotificationRow,
		PageRow, PatronRow, PatronUpsert, TierRow, TierUpsert
	}
};

use super::Database;
use crate::Result;

const CAMPAIGN_COLUMNS: &str = "id, page_id, patreon_id, creation_name, summary, pledge_url, patron_count, earnings_visibility, is_monthly, is_charge_upfront, image_url, image_small_url, last_sync_at";
const TIER_COLUMNS: &str = "id, campaign_id, patreon_id, title, description, amount_cents, patron_count, discord_role_ids, benefits";
const PATRON_COLUMNS: &str = "id, campaign_id, patreon_id, full_name, email, image_url, url, social_connections, status, last_charge_date, last_charge_status, lifetime_support_cents, pledge_relationship_start, next_charge_date, last_sync_at";
const PAGE_COLUMNS: &str = "id, user_id, name, client_id, client_secret, deleted, deleted_at, created_at";
const NOTIFICATION_COLUMNS: &str = "id, user_id, title, message, kind, link, read, created_at";

#[derive(Clone)]
pub struct PostgresDatabase {
	pool: PgPool
}

impl PostgresDatabase {
	pub fn new(pool: PgPool) -> Self {
		Self { pool }
	}

	pub async fn connect(url: &str) -> Result<Self> {
		Ok(Self::new(PgPool::connect(url).await?))
	}

	pub fn pool(&self) -> &PgPool {
		&self.pool
	}
}

impl Database for PostgresDatabase {
	async fn upsert_campaign(&self, campaign: &CampaignUpsert) -> Result<()> {
		sqlx::query(
			"
			INSERT INTO patreon_campaigns (page_id, patreon_id, creation_name, summary, pledge_url, patron_count, earnings_visibility, is_monthly, is_charge_upfront, image_url, image_small_url, last_sync_at)
			VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
			ON CONFLICT (page_id)
			DO UPDATE SET patreon_id = $2, creation_name = $3, summary = $4, pledge_url = $5, patron_count = $6, earnings_visibility = $7, is_monthly = $8, is_charge_upfront = $9, image_url = $10, image_small_url = $11, last_sync_at = $12
			"
		)
			.bind(campaign.page_id.value)
			.bind(&campaign.patreon_id)
			.bind(&campaign.creation_name)
			.bind(&campaign.summary)
			.bind(&campaign.pledge_url)
			.bind(campaign.patron_count)
			.bind(&campaign.earnings_visibility)
			.bind(campaign.is_monthly)
			.bind(campaign.is_charge_upfront)
			.bind(&campaign.image_url)
			.bind(&campaign.image_small_url)
			.bind(campaign.last_sync_at)
			.execute(&self.pool)
			.await?;

		Ok(())
	}

	async fn campaign(&self, page_id: PatronizerId<PageMarker>) -> Result<Option<CampaignRow>> {
		let query = format!("SELECT {CAMPAIGN_COLUMNS} FROM patreon_campaigns WHERE page_id = $1");
		Ok(sqlx::query_as::<_, CampaignRow>(&query)
			.bind(page_id.value)
			.fetch_optional(&self.pool)
			.await?
		)
	}

	async fn upsert_tier(&self, tier: &TierUpsert) -> Result<()> {
		sqlx::query(
			"
			INSERT INTO patreon_tiers (campaign_id, patreon_id, title, description, amount_cents, patron_count, discord_role_ids, benefits)
			VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
			ON CONFLICT (campaign_id, patreon_id)
			DO UPDATE SET title = $3, description = $4, amount_cents = $5, patron_count = $6, discord_role_ids = $7, benefits = $8
			"
		)
			.bind(&tier.campaign_id)
			.bind(&tier.patreon_id)
			.bind(&tier.title)
			.bind(&tier.description)
			.bind(tier.amount_cents)
			.bind(tier.patron_count)
			.bind(&tier.discord_role_ids)
			.bind(&tier.benefits)
			.execute(&self.pool)
			.await?;

		Ok(())
	}

	async fn tiers(&self, campaign_id: &str) -> Result<Vec<TierRow>> {
		let query = format!("SELECT {TIER_COLUMNS} FROM patreon_tiers WHERE campaign_id = $1 ORDER BY amount_cents");
		Ok(sqlx::query_as::<_, TierRow>(&query)
			.bind(campaign_id)
			.fetch_all(&self.pool)
			.await?
		)
	}

	async fn find_tier(&self, patreon_id: &str) -> Result<Option<PatronizerId<TierMarker>>> {
		Ok(sqlx::query_scalar::<_, PatronizerId<TierMarker>>(
			"SELECT id FROM patreon_tiers WHERE patreon_id = $1"
		)
			.bind(patreon_id)
			.fetch_optional(&self.pool)
			.await?
		)
	}

	async fn upsert_patron(&self, patron: &PatronUpsert) -> Result<Option<PatronizerId<PatronMarker>>> {
		Ok(sqlx::query_scalar::<_, PatronizerId<PatronMarker>>(
			"
			INSERT INTO patrons (campaign_id, patreon_id, full_name, email, image_url, url, social_connections, status, last_charge_date, last_charge_status, lifetime_support_cents, pledge_relationship_start, next_charge_date, last_sync_at)
			VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
			ON CONFLICT (campaign_id, patreon_id)
			DO UPDATE SET full_name = $3, email = $4, image_url = $5, url = $6, social_connections = $7, status = $8, last_charge_date = $9, last_charge_status = $10, lifetime_support_cents = $11, pledge_relationship_start = $12, next_charge_date = $13, last_sync_at = $14
			RETURNING id
			"
		)
			.bind(&patron.campaign_id)
			.bind(&patron.patreon_id)
			.bind(&patron.full_name)
			.bind(&patron.email)
			.bind(&patron.image_url)
			.bind(&patron.url)
			.bind(&patron.social_connections)
			.bind(&patron.status)
			.bind(patron.last_charge_date)
			.bind(&patron.last_charge_status)
			.bind(patron.lifetime_support_cents)
			.bind(patron.pledge_relationship_start)
			.bind(patron.next_charge_date)
			.bind(patron.last_sync_at)
			.fetch_optional(&self.pool)
			.await?
		)
	}

	async fn patrons(&self, campaign_id: &str) -> Result<Vec<PatronRow>> {
		let query = format!("SELECT {PATRON_COLUMNS} FROM patrons WHERE campaign_id = $1 ORDER BY patreon_id");
		Ok(sqlx::query_as::<_, PatronRow>(&query)
			.bind(campaign_id)
			.fetch_all(&self.pool)
			.await?
		)
	}

	async fn link_patron_tier(&self, patron_id: PatronizerId<PatronMarker>, tier_id: PatronizerId<TierMarker>) -> Result<()> {
		sqlx::query(
			"
			INSERT INTO patron_tiers (patron_id, tier_id)
			VALUES ($1, $2)
			ON CONFLICT (patron_id, tier_id)
			DO NOTHING
			"
		)
			.bind(patron_id.value)
			.bind(tier_id.value)
			.execute(&self.pool)
			.await?;

		Ok(())
	}

	async fn patron_tiers(&self, patron_id: PatronizerId<PatronMarker>) -> Result<Vec<PatronizerId<TierMarker>>> {
		Ok(sqlx::query_scalar::<_, PatronizerId<TierMarker>>(
			"SELECT tier_id FROM patron_tiers WHERE patron_id = $1 ORDER BY tier_id"
		)
			.bind(patron_id.value)
			.fetch_all(&self.pool)
			.await?
		)
	}

	async fn unlink_stale_patron_tiers(&self, patron_id: PatronizerId<PatronMarker>, entitled: &[PatronizerId<TierMarker>]) -> Result<u64> {
		let entitled: Vec<_> = entitled
			.iter()
			.map(|id| id.value)
			.collect();
		let result = sqlx::query(
			"DELETE FROM patron_tiers WHERE patron_id = $1 AND NOT (tier_id = ANY($2))"
		)
			.bind(patron_id.value)
			.bind(&entitled)
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected())
	}

	async fn insert_page(&self, page: &NewPage) -> Result<PageRow> {
		let query = format!(
			"
			INSERT INTO patreon_pages (user_id, name, client_id, client_secret, deleted)
			VALUES ($1, $2, $3, $4, FALSE)
			RETURNING {PAGE_COLUMNS}
			"
		);
		Ok(sqlx::query_as::<_, PageRow>(&query)
			.bind(page.user_id.value)
			.bind(&page.name)
			.bind(&page.client_id)
			.bind(&page.client_secret)
			.fetch_one(&self.pool)
			.await?
		)
	}

	async fn soft_delete_page(&self, page_id: PatronizerId<PageMarker>) -> Result<bool> {
		let result = sqlx::query(
			"UPDATE patreon_pages SET deleted = TRUE, deleted_at = NOW() WHERE id = $1 AND NOT deleted"
		)
			.bind(page_id.value)
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}

	async fn pages(&self, user_id: PatronizerId<UserMarker>) -> Result<Vec<PageRow>> {
		let query = format!("SELECT {PAGE_COLUMNS} FROM patreon_pages WHERE user_id = $1 AND NOT deleted ORDER BY created_at DESC");
		Ok(sqlx::query_as::<_, PageRow>(&query)
			.bind(user_id.value)
			.fetch_all(&self.pool)
			.await?
		)
	}

	async fn insert_notification(&self, notification: &NewNotification) -> Result<NotificationRow> {
		let query = format!(
			"
			INSERT INTO notifications (user_id, title, message, kind, link, read)
			VALUES ($1, $2, $3, $4, $5, FALSE)
			RETURNING {NOTIFICATION_COLUMNS}
			"
		);
		Ok(sqlx::query_as::<_, NotificationRow>(&query)
			.bind(notification.user_id.value)
			.bind(&notification.title)
			.bind(&notification.message)
			.bind(notification.kind.as_str())
			.bind(&notification.link)
			.fetch_one(&self.pool)
			.await?
		)
	}

	async fn mark_notification_read(&self, id: PatronizerId<NotificationMarker>) -> Result<bool> {
		let result = sqlx::query(
			"UPDATE notifications SET read = TRUE WHERE id = $1 AND NOT read"
		)
			.bind(id.value)
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}

	async fn mark_all_notifications_read(&self, user_id: PatronizerId<UserMarker>) -> Result<u64> {
		let result = sqlx::query(
			"UPDATE notifications SET read = TRUE WHERE user_id = $1 AND NOT read"
		)
			.bind(user_id.value)
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected())
	}
}
