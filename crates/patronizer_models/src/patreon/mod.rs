use serde::Deserialize;
use std::collections::HashMap;

pub mod campaign;
pub mod member;
pub mod tier;

pub use campaign::Campaign;
pub use member::{ Member, User };
pub use tier::Tier;

// JSON:API collection envelope; a response without a `data` array is
// rejected at the deserialisation boundary.
#[derive(Clone, Debug, Deserialize)]
pub struct Document<T> {
	pub data: Vec<T>,
	#[serde(default)]
	pub included: Option<Vec<IncludedResource>>,
	#[serde(default)]
	pub links: Option<Links>
}

// Envelope for endpoints returning a single resource object.
#[derive(Clone, Debug, Deserialize)]
pub struct SingleDocument<T> {
	#[serde(default)]
	pub data: Option<T>
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Links {
	#[serde(default)]
	pub next: Option<String>
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum IncludedResource {
	User(member::User),
	Tier(tier::Tier),
	#[serde(other)]
	Other
}

// Relationship linkage is resource identifiers only; the full records
// live in `included`.
#[derive(Clone, Debug, Deserialize)]
pub struct Relationship<T> {
	#[serde(default)]
	pub data: Option<T>
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ResourceRef {
	pub id: String
}

pub fn included_users(included: &[IncludedResource]) -> HashMap<&str, &member::User> {
	included
		.iter()
		.filter_map(|resource| match resource {
			IncludedResource::User(user) => Some((user.id.as_str(), user)),
			_ => None
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn included_resources_are_tagged_by_type() {
		let raw = serde_json::json!([
			{ "type": "user", "id": "32", "attributes": { "full_name": "June" } },
			{ "type": "tier", "id": "77", "attributes": { "title": "Gold", "amount_cents": 500 } },
			{ "type": "benefit", "id": "9" }
		]);
		let included: Vec<IncludedResource> = serde_json::from_value(raw).unwrap();
		assert!(matches!(&included[0], IncludedResource::User(user) if user.id == "32"));
		assert!(matches!(&included[1], IncludedResource::Tier(tier) if tier.id == "77"));
		assert!(matches!(&included[2], IncludedResource::Other));

		let users = included_users(&included);
		assert_eq!(users.len(), 1);
		assert_eq!(users["32"].attributes.full_name.as_deref(), Some("June"));
	}

	#[test]
	fn document_requires_a_data_array() {
		let missing = serde_json::json!({ "links": {} });
		assert!(serde_json::from_value::<Document<Tier>>(missing).is_err());

		let single = serde_json::json!({ "data": { "id": "1", "attributes": {} } });
		assert!(serde_json::from_value::<Document<Campaign>>(single.clone()).is_err());
		assert!(serde_json::from_value::<SingleDocument<Campaign>>(single).is_ok());
	}
}
