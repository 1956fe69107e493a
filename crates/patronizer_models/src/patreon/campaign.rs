use chrono::{ DateTime, Utc };
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Campaign {
	pub id: String,
	#[serde(default)]
	pub attributes: CampaignAttributes
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct CampaignAttributes {
	pub summary: Option<String>,
	pub creation_name: Option<String>,
	pub pay_per_name: Option<String>,
	pub one_liner: Option<String>,
	pub main_video_embed: Option<String>,
	pub main_video_url: Option<String>,
	pub image_url: Option<String>,
	pub image_small_url: Option<String>,
	pub created_at: Option<DateTime<Utc>>,
	pub published_at: Option<DateTime<Utc>>,
	pub pledge_url: Option<String>,
	pub patron_count: Option<i64>,
	pub discord_server_id: Option<String>,
	pub google_analytics_id: Option<String>,
	pub earnings_visibility: Option<String>,
	pub is_monthly: Option<bool>,
	pub is_charge_upfront: Option<bool>
}
