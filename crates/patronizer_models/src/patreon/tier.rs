use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Tier {
	pub id: String,
	#[serde(default)]
	pub attributes: TierAttributes
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct TierAttributes {
	pub title: Option<String>,
	pub description: Option<String>,
	pub amount_cents: Option<i64>,
	pub patron_count: Option<i64>,
	pub discord_role_ids: Option<Vec<String>>,
	pub benefits: Option<serde_json::Value>
}
