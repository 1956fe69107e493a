use chrono::{ DateTime, Utc };
use serde::Serialize;

use crate::patreon::User;

#[derive(Clone, Debug, Serialize)]
pub struct CampaignStats {
	pub total_revenue: f64,
	pub active_patrons: i64,
	pub average_pledge: f64,
	pub retention_rate: f64,
	// true when the member pagination stopped early; the numbers below
	// then cover only the pages that were fetched
	pub truncated: bool,
	pub recent_activity: Vec<ActivityEntry>,
	pub top_patrons: Vec<TopPatron>
}

#[derive(Clone, Debug, Serialize)]
pub struct ActivityEntry {
	pub patron: User,
	pub amount: f64,
	pub timestamp: DateTime<Utc>
}

#[derive(Clone, Debug, Serialize)]
pub struct TopPatron {
	pub patron: User,
	pub amount_cents: i64,
	pub months_supporting: i64
}
