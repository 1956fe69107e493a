use chrono::{ DateTime, Utc };
use serde::{ Deserialize, Serialize };
use sqlx::FromRow;

use crate::{
	id::{
		marker::{ CampaignMarker, NotificationMarker, PageMarker, PatronMarker, TierMarker, UserMarker },
		PatronizerId
	},
	patreon
};

#[derive(Clone, Debug, FromRow, Serialize)]
pub struct PageRow {
	pub id: PatronizerId<PageMarker>,
	pub user_id: PatronizerId<UserMarker>,
	pub name: String,
	pub client_id: String,
	pub client_secret: String,
	pub deleted: bool,
	pub deleted_at: Option<DateTime<Utc>>,
	pub created_at: DateTime<Utc>
}

#[derive(Clone, Debug)]
pub struct NewPage {
	pub user_id: PatronizerId<UserMarker>,
	pub name: String,
	pub client_id: String,
	pub client_secret: String
}

#[derive(Clone, Debug, FromRow, Serialize)]
pub struct CampaignRow {
	pub id: PatronizerId<CampaignMarker>,
	pub page_id: PatronizerId<PageMarker>,
	pub patreon_id: String,
	pub creation_name: Option<String>,
	pub summary: Option<String>,
	pub pledge_url: Option<String>,
	pub patron_count: i64,
	pub earnings_visibility: Option<String>,
	pub is_monthly: bool,
	pub is_charge_upfront: bool,
	pub image_url: Option<String>,
	pub image_small_url: Option<String>,
	pub last_sync_at: DateTime<Utc>
}

#[derive(Clone, Debug)]
pub struct CampaignUpsert {
	pub page_id: PatronizerId<PageMarker>,
	pub patreon_id: String,
	pub creation_name: Option<String>,
	pub summary: Option<String>,
	pub pledge_url: Option<String>,
	pub patron_count: i64,
	pub earnings_visibility: Option<String>,
	pub is_monthly: bool,
	pub is_charge_upfront: bool,
	pub image_url: Option<String>,
	pub image_small_url: Option<String>,
	pub last_sync_at: DateTime<Utc>
}

impl CampaignUpsert {
	pub fn from_api(page_id: PatronizerId<PageMarker>, campaign: &patreon::Campaign, last_sync_at: DateTime<Utc>) -> Self {
		let attributes = &campaign.attributes;
		Self {
			page_id,
			patreon_id: campaign.id.clone(),
			creation_name: attributes.creation_name.clone(),
			summary: attributes.summary.clone(),
			pledge_url: attributes.pledge_url.clone(),
			patron_count: attributes.patron_count.unwrap_or(0),
			earnings_visibility: attributes.earnings_visibility.clone(),
			is_monthly: attributes.is_monthly.unwrap_or(false),
			is_charge_upfront: attributes.is_charge_upfront.unwrap_or(false),
			image_url: attributes.image_url.clone(),
			image_small_url: attributes.image_small_url.clone(),
			last_sync_at
		}
	}
}

#[derive(Clone, Debug, FromRow, Serialize)]
pub struct TierRow {
	pub id: PatronizerId<TierMarker>,
	pub campaign_id: String,
	pub patreon_id: String,
	pub title: Option<String>,
	pub description: Option<String>,
	pub amount_cents: i64,
	pub patron_count: i64,
	pub discord_role_ids: Option<Vec<String>>,
	pub benefits: Option<serde_json::Value>
}

#[derive(Clone, Debug)]
pub struct TierUpsert {
	pub campaign_id: String,
	pub patreon_id: String,
	pub title: Option<String>,
	pub description: Option<String>,
	pub amount_cents: i64,
	pub patron_count: i64,
	pub discord_role_ids: Option<Vec<String>>,
	pub benefits: Option<serde_json::Value>
}

impl TierUpsert {
	pub fn from_api(campaign_id: &str, tier: &patreon::Tier) -> Self {
		let attributes = &tier.attributes;
		Self {
			campaign_id: campaign_id.to_owned(),
			patreon_id: tier.id.clone(),
			title: attributes.title.clone(),
			description: attributes.description.clone(),
			amount_cents: attributes.amount_cents.unwrap_or(0),
			patron_count: attributes.patron_count.unwrap_or(0),
			discord_role_ids: attributes.discord_role_ids.clone(),
			benefits: attributes.benefits.clone()
		}
	}
}

#[derive(Clone, Debug, FromRow, Serialize)]
pub struct PatronRow {
	pub id: PatronizerId<PatronMarker>,
	pub campaign_id: String,
	pub patreon_id: String,
	pub full_name: Option<String>,
	pub email: Option<String>,
	pub image_url: Option<String>,
	pub url: Option<String>,
	pub social_connections: Option<serde_json::Value>,
	pub status: Option<String>,
	pub last_charge_date: Option<DateTime<Utc>>,
	pub last_charge_status: Option<String>,
	pub lifetime_support_cents: i64,
	pub pledge_relationship_start: Option<DateTime<Utc>>,
	pub next_charge_date: Option<DateTime<Utc>>,
	pub last_sync_at: DateTime<Utc>
}

#[derive(Clone, Debug)]
pub struct PatronUpsert {
	pub campaign_id: String,
	pub patreon_id: String,
	pub full_name: Option<String>,
	pub email: Option<String>,
	pub image_url: Option<String>,
	pub url: Option<String>,
	pub social_connections: Option<serde_json::Value>,
	pub status: Option<String>,
	pub last_charge_date: Option<DateTime<Utc>>,
	pub last_charge_status: Option<String>,
	pub lifetime_support_cents: i64,
	pub pledge_relationship_start: Option<DateTime<Utc>>,
	pub next_charge_date: Option<DateTime<Utc>>,
	pub last_sync_at: DateTime<Utc>
}

impl PatronUpsert {
	pub fn from_api(campaign_id: &str, member: &patreon::Member, user: &patreon::User, last_sync_at: DateTime<Utc>) -> Self {
		let attributes = &member.attributes;
		Self {
			campaign_id: campaign_id.to_owned(),
			patreon_id: user.id.clone(),
			full_name: user.attributes.full_name.clone(),
			email: user.attributes.email.clone(),
			image_url: user.attributes.image_url.clone(),
			url: user.attributes.url.clone(),
			social_connections: user.attributes.social_connections.clone(),
			status: attributes.patron_status.clone(),
			last_charge_date: attributes.last_charge_date,
			last_charge_status: attributes.last_charge_status.clone(),
			lifetime_support_cents: attributes.lifetime_support_cents.unwrap_or(0),
			pledge_relationship_start: attributes.pledge_relationship_start,
			next_charge_date: attributes.next_charge_date,
			last_sync_at
		}
	}
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
	Info,
	Success,
	Warning,
	Error
}

impl NotificationKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Info => "info",
			Self::Success => "success",
			Self::Warning => "warning",
			Self::Error => "error"
		}
	}
}

#[derive(Clone, Debug, FromRow, Serialize)]
pub struct NotificationRow {
	pub id: PatronizerId<NotificationMarker>,
	pub user_id: PatronizerId<UserMarker>,
	pub title: String,
	pub message: String,
	pub kind: String,
	pub link: Option<String>,
	pub read: bool,
	pub created_at: DateTime<Utc>
}

#[derive(Clone, Debug)]
pub struct NewNotification {
	pub user_id: PatronizerId<UserMarker>,
	pub title: String,
	pub message: String,
	pub kind: NotificationKind,
	pub link: Option<String>
}
