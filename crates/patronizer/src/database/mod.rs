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

use crate::Result;

pub mod memory;
pub mod postgres;

pub use memory::MemoryDatabase;
pub use postgres::PostgresDatabase;

// Upsert/select contract against the relational store. The schema is
// owned elsewhere; everything here is keyed on the stable identity
// tuples (page for campaigns, campaign + patreon id for tiers and
// patrons) so repeated syncs are idempotent.
#[allow(async_fn_in_trait)]
pub trait Database: Send + Sync {
	async fn upsert_campaign(&self, campaign: &CampaignUpsert) -> Result<()>;
	async fn campaign(&self, page_id: PatronizerId<PageMarker>) -> Result<Option<CampaignRow>>;

	async fn upsert_tier(&self, tier: &TierUpsert) -> Result<()>;
	async fn tiers(&self, campaign_id: &str) -> Result<Vec<TierRow>>;
	async fn find_tier(&self, patreon_id: &str) -> Result<Option<PatronizerId<TierMarker>>>;

	async fn upsert_patron(&self, patron: &PatronUpsert) -> Result<Option<PatronizerId<PatronMarker>>>;
	async fn patrons(&self, campaign_id: &str) -> Result<Vec<PatronRow>>;

	async fn link_patron_tier(&self, patron_id: PatronizerId<PatronMarker>, tier_id: PatronizerId<TierMarker>) -> Result<()>;
	async fn patron_tiers(&self, patron_id: PatronizerId<PatronMarker>) -> Result<Vec<PatronizerId<TierMarker>>>;
	async fn unlink_stale_patron_tiers(&self, patron_id: PatronizerId<PatronMarker>, entitled: &[PatronizerId<TierMarker>]) -> Result<u64>;

	async fn insert_page(&self, page: &NewPage) -> Result<PageRow>;
	async fn soft_delete_page(&self, page_id: PatronizerId<PageMarker>) -> Result<bool>;
	async fn pages(&self, user_id: PatronizerId<UserMarker>) -> Result<Vec<PageRow>>;

	async fn insert_notification(&self, notification: &NewNotification) -> Result<NotificationRow>;
	async fn mark_notification_read(&self, id: PatronizerId<NotificationMarker>) -> Result<bool>;
	async fn mark_all_notifications_read(&self, user_id: PatronizerId<UserMarker>) -> Result<u64>;
}
