use chrono::{ DateTime, Utc };
use std::cmp::Reverse;

use patronizer_models::{
	patreon::{ included_users, Campaign, Member, SingleDocument },
	stats::{ ActivityEntry, CampaignStats, TopPatron }
};

use crate::{
	backend::Backend,
	client::{ PageSet, PatreonClient },
	error::ErrorKind,
	Result
};

const RECENT_ACTIVITY_LIMIT: usize = 10;
const TOP_PATRON_LIMIT: usize = 10;
const DAYS_PER_SUPPORT_MONTH: i64 = 30;

const MEMBER_STATS_FIELDS: &str = "patron_status,lifetime_support_cents,currently_entitled_amount_cents,pledge_relationship_start";
const USER_STATS_FIELDS: &str = "full_name,email,image_url,thumb_url,url";

impl<B: Backend> PatreonClient<B> {
	// Read-only aggregate view over one campaign; nothing is persisted.
	pub async fn stats(&self, campaign_id: &str) -> Result<CampaignStats> {
		let campaign_endpoint = format!("/campaigns/{campaign_id}");
		let members_endpoint = format!("/campaigns/{campaign_id}/members");

		let (campaign, members) = futures::join!(
			self.request::<SingleDocument<Campaign>>(&campaign_endpoint, &[("fields[campaign]", "patron_count")]),
			self.fetch_all_pages::<Member>(&members_endpoint, &[
				("include", "user,currently_entitled_tiers"),
				("fields[member]", MEMBER_STATS_FIELDS),
				("fields[user]", USER_STATS_FIELDS)
			])
		);

		let campaign = match campaign {
			Ok(document) => match document.data {
				Some(campaign) => campaign,
				None => return Err(ErrorKind::CampaignNotFound.into())
			},
			Err(error) => {
				return Err(match error.kind {
					ErrorKind::CampaignNotFound => error,
					kind => ErrorKind::StatsFetch(kind.to_string()).into()
				});
			}
		};

		Ok(compute_stats(campaign.attributes.patron_count.unwrap_or(0), &members, Utc::now()))
	}
}

// Revenue and retention are computed over every fetched member, active
// or not; when the page set is truncated the denominators cover only
// what was fetched, and the flag is passed through for the caller.
pub fn compute_stats(patron_count: i64, members: &PageSet<Member>, now: DateTime<Utc>) -> CampaignStats {
	let users = included_users(&members.included);
	let active: Vec<&Member> = members.items
		.iter()
		.filter(|member| member.is_active())
		.collect();

	let total_revenue = active
		.iter()
		.map(|member| member.entitled_cents())
		.sum::<i64>() as f64 / 100.0;
	let average_pledge = if patron_count > 0 {
		total_revenue / patron_count as f64
	} else { 0.0 };
	let retention_rate = if members.items.is_empty() {
		0.0
	} else {
		active.len() as f64 / members.items.len() as f64 * 100.0
	};

	let mut started: Vec<&Member> = members.items
		.iter()
		.filter(|member| {
			member.attributes.pledge_relationship_start.is_some()
				&& member.user_id().is_some_and(|id| users.contains_key(id))
		})
		.collect();
	started.sort_by_key(|member| Reverse(member.attributes.pledge_relationship_start));
	let recent_activity = started
		.iter()
		.take(RECENT_ACTIVITY_LIMIT)
		.map(|member| ActivityEntry {
			patron: (*users[member.user_id().unwrap()]).clone(),
			amount: member.entitled_cents() as f64 / 100.0,
			timestamp: member.attributes.pledge_relationship_start.unwrap()
		})
		.collect();

	let mut biggest: Vec<&&Member> = active
		.iter()
		.filter(|member| member.user_id().is_some_and(|id| users.contains_key(id)))
		.collect();
	biggest.sort_by_key(|member| Reverse(member.entitled_cents()));
	let top_patrons = biggest
		.iter()
		.take(TOP_PATRON_LIMIT)
		.map(|member| TopPatron {
			patron: (*users[member.user_id().unwrap()]).clone(),
			amount_cents: member.entitled_cents(),
			months_supporting: member.attributes.pledge_relationship_start
				.map(|start| (now - start).num_days() / DAYS_PER_SUPPORT_MONTH)
				.unwrap_or(0)
		})
		.collect();

	CampaignStats {
		total_revenue,
		active_patrons: patron_count,
		average_pledge,
		retention_rate,
		truncated: members.truncated,
		recent_activity,
		top_patrons
	}
}
