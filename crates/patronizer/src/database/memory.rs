use chrono::Utc;
use dashmap::DashMap;

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

// Same contract as the postgres gateway, held in dashmaps. Used by the
// test-suite and for dry-running a sync without a database around.
#[derive(Default)]
pub struct MemoryDatabase {
	campaigns: DashMap<PatronizerId<PageMarker>, CampaignRow>,
	tiers: DashMap<(String, String), TierRow>,
	patrons: DashMap<(String, String), PatronRow>,
	links: DashMap<PatronizerId<PatronMarker>, Vec<PatronizerId<TierMarker>>>,
	pages: DashMap<PatronizerId<PageMarker>, PageRow>,
	notifications: DashMap<PatronizerId<NotificationMarker>, NotificationRow>
}

impl MemoryDatabase {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn notifications(&self, user_id: PatronizerId<UserMarker>) -> Vec<NotificationRow> {
		let mut rows: Vec<_> = self.notifications
			.iter()
			.filter(|entry| entry.user_id == user_id)
			.map(|entry| entry.value().clone())
			.collect();
		rows.sort_by_key(|row| row.created_at);
		rows
	}
}

impl Database for MemoryDatabase {
	async fn upsert_campaign(&self, campaign: &CampaignUpsert) -> Result<()> {
		// upserts keep the row id stable across syncs
		let id = self.campaigns
			.get(&campaign.page_id)
			.map(|existing| existing.id)
			.unwrap_or_else(PatronizerId::random);
		self.campaigns.insert(campaign.page_id, CampaignRow {
			id,
			page_id: campaign.page_id,
			patreon_id: campaign.patreon_id.clone(),
			creation_name: campaign.creation_name.clone(),
			summary: campaign.summary.clone(),
			pledge_url: campaign.pledge_url.clone(),
			patron_count: campaign.patron_count,
			earnings_visibility: campaign.earnings_visibility.clone(),
			is_monthly: campaign.is_monthly,
			is_charge_upfront: campaign.is_charge_upfront,
			image_url: campaign.image_url.clone(),
			image_small_url: campaign.image_small_url.clone(),
			last_sync_at: campaign.last_sync_at
		});

		Ok(())
	}

	async fn campaign(&self, page_id: PatronizerId<PageMarker>) -> Result<Option<CampaignRow>> {
		Ok(self.campaigns.get(&page_id).map(|row| row.value().clone()))
	}

	async fn upsert_tier(&self, tier: &TierUpsert) -> Result<()> {
		let key = (tier.campaign_id.clone(), tier.patreon_id.clone());
		let id = self.tiers
			.get(&key)
			.map(|existing| existing.id)
			.unwrap_or_else(PatronizerId::random);
		self.tiers.insert(key, TierRow {
			id,
			campaign_id: tier.campaign_id.clone(),
			patreon_id: tier.patreon_id.clone(),
			title: tier.title.clone(),
			description: tier.description.clone(),
			amount_cents: tier.amount_cents,
			patron_count: tier.patron_count,
			discord_role_ids: tier.discord_role_ids.clone(),
			benefits: tier.benefits.clone()
		});

		Ok(())
	}

	async fn tiers(&self, campaign_id: &str) -> Result<Vec<TierRow>> {
		let mut rows: Vec<_> = self.tiers
			.iter()
			.filter(|entry| entry.campaign_id == campaign_id)
			.map(|entry| entry.value().clone())
			.collect();
		rows.sort_by_key(|row| row.amount_cents);
		Ok(rows)
	}

	async fn find_tier(&self, patreon_id: &str) -> Result<Option<PatronizerId<TierMarker>>> {
		Ok(self.tiers
			.iter()
			.find(|entry| entry.patreon_id == patreon_id)
			.map(|entry| entry.id)
		)
	}

	async fn upsert_patron(&self, patron: &PatronUpsert) -> Result<Option<PatronizerId<PatronMarker>>> {
		let key = (patron.campaign_id.clone(), patron.patreon_id.clone());
		let id = self.patrons
			.get(&key)
			.map(|existing| existing.id)
			.unwrap_or_else(PatronizerId::random);
		self.patrons.insert(key, PatronRow {
			id,
			campaign_id: patron.campaign_id.clone(),
			patreon_id: patron.patreon_id.clone(),
			full_name: patron.full_name.clone(),
			email: patron.email.clone(),
			image_url: patron.image_url.clone(),
			url: patron.url.clone(),
			social_connections: patron.social_connections.clone(),
			status: patron.status.clone(),
			last_charge_date: patron.last_charge_date,
			last_charge_status: patron.last_charge_status.clone(),
			lifetime_support_cents: patron.lifetime_support_cents,
			pledge_relationship_start: patron.pledge_relationship_start,
			next_charge_date: patron.next_charge_date,
			last_sync_at: patron.last_sync_at
		});

		Ok(Some(id))
	}

	async fn patrons(&self, campaign_id: &str) -> Result<Vec<PatronRow>> {
		let mut rows: Vec<_> = self.patrons
			.iter()
			.filter(|entry| entry.campaign_id == campaign_id)
			.map(|entry| entry.value().clone())
			.collect();
		rows.sort_by(|a, b| a.patreon_id.cmp(&b.patreon_id));
		Ok(rows)
	}

	async fn link_patron_tier(&self, patron_id: PatronizerId<PatronMarker>, tier_id: PatronizerId<TierMarker>) -> Result<()> {
		let mut links = self.links.entry(patron_id).or_default();
		if !links.contains(&tier_id) {
			links.push(tier_id);
		}

		Ok(())
	}

	async fn patron_tiers(&self, patron_id: PatronizerId<PatronMarker>) -> Result<Vec<PatronizerId<TierMarker>>> {
		let mut links = self.links
			.get(&patron_id)
			.map(|links| links.value().clone())
			.unwrap_or_default();
		links.sort();
		Ok(links)
	}

	async fn unlink_stale_patron_tiers(&self, patron_id: PatronizerId<PatronMarker>, entitled: &[PatronizerId<TierMarker>]) -> Result<u64> {
		let Some(mut links) = self.links.get_mut(&patron_id) else {
			return Ok(0);
		};
		let before = links.len();
		links.retain(|tier_id| entitled.contains(tier_id));

		Ok((before - links.len()) as u64)
	}

	async fn insert_page(&self, page: &NewPage) -> Result<PageRow> {
		let row = PageRow {
			id: PatronizerId::random(),
			user_id: page.user_id,
			name: page.name.clone(),
			client_id: page.client_id.clone(),
			client_secret: page.client_secret.clone(),
			deleted: false,
			deleted_at: None,
			created_at: Utc::now()
		};
		self.pages.insert(row.id, row.clone());

		Ok(row)
	}

	async fn soft_delete_page(&self, page_id: PatronizerId<PageMarker>) -> Result<bool> {
		Ok(match self.pages.get_mut(&page_id) {
			Some(mut page) if !page.deleted => {
				page.deleted = true;
				page.deleted_at = Some(Utc::now());
				true
			},
			_ => false
		})
	}

	async fn pages(&self, user_id: PatronizerId<UserMarker>) -> Result<Vec<PageRow>> {
		let mut rows: Vec<_> = self.pages
			.iter()
			.filter(|entry| entry.user_id == user_id && !entry.deleted)
			.map(|entry| entry.value().clone())
			.collect();
		rows.sort_by_key(|row| std::cmp::Reverse(row.created_at));
		Ok(rows)
	}

	async fn insert_notification(&self, notification: &NewNotification) -> Result<NotificationRow> {
		let row = NotificationRow {
			id: PatronizerId::random(),
			user_id: notification.user_id,
			title: notification.title.clone(),
			message: notification.message.clone(),
			kind: notification.kind.as_str().to_owned(),
			link: notification.link.clone(),
			read: false,
			created_at: Utc::now()
		};
		self.notifications.insert(row.id, row.clone());

		Ok(row)
	}

	async fn mark_notification_read(&self, id: PatronizerId<NotificationMarker>) -> Result<bool> {
		Ok(match self.notifications.get_mut(&id) {
			Some(mut notification) if !notification.read => {
				notification.read = true;
				true
			},
			_ => false
		})
	}

	async fn mark_all_notifications_read(&self, user_id: PatronizerId<UserMarker>) -> Result<u64> {
		let mut marked = 0;
		for mut entry in self.notifications.iter_mut() {
			if entry.user_id == user_id && !entry.read {
				entry.read = true;
				marked += 1;
			}
		}

		Ok(marked)
	}
}
