use chrono::{ DateTime, Utc };
use serde::{ Deserialize, Serialize };

use super::{ Relationship, ResourceRef };

pub const ACTIVE_PATRON: &str = "active_patron";

#[derive(Clone, Debug, Deserialize)]
pub struct Member {
	pub id: String,
	#[serde(default)]
	pub attributes: MemberAttributes,
	#[serde(default)]
	pub relationships: Option<MemberRelationships>
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct MemberAttributes {
	pub patron_status: Option<String>,
	pub last_charge_date: Option<DateTime<Utc>>,
	pub last_charge_status: Option<String>,
	pub lifetime_support_cents: Option<i64>,
	pub currently_entitled_amount_cents: Option<i64>,
	pub pledge_relationship_start: Option<DateTime<Utc>>,
	pub next_charge_date: Option<DateTime<Utc>>
}

// Both relationships distinguish "absent" (field missing from the
// response) from "present but empty" (data: null / []).
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct MemberRelationships {
	pub user: Option<Relationship<ResourceRef>>,
	pub currently_entitled_tiers: Option<Relationship<Vec<ResourceRef>>>
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct User {
	pub id: String,
	#[serde(default)]
	pub attributes: UserAttributes
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct UserAttributes {
	pub full_name: Option<String>,
	pub email: Option<String>,
	pub image_url: Option<String>,
	pub thumb_url: Option<String>,
	pub url: Option<String>,
	pub social_connections: Option<serde_json::Value>
}

impl Member {
	pub fn is_active(&self) -> bool {
		self.attributes.patron_status.as_deref() == Some(ACTIVE_PATRON)
	}

	pub fn entitled_cents(&self) -> i64 {
		self.attributes.currently_entitled_amount_cents.unwrap_or(0)
	}

	pub fn user_id(&self) -> Option<&str> {
		self.relationships
			.as_ref()?
			.user
			.as_ref()?
			.data
			.as_ref()
			.map(|reference| reference.id.as_str())
	}

	pub fn entitled_tier_ids(&self) -> impl Iterator<Item = &str> {
		self.relationships
			.as_ref()
			.and_then(|relationships| relationships.currently_entitled_tiers.as_ref())
			.and_then(|relationship| relationship.data.as_deref())
			.unwrap_or_default()
			.iter()
			.map(|reference| reference.id.as_str())
	}
}
