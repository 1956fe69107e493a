use chrono::Utc;
use futures::try_join;

use patronizer_models::{
	patreon::{ included_users, Member, Tier },
	row::{ CampaignUpsert, PatronUpsert, TierUpsert }
};

use crate::{
	backend::Backend,
	client::PatreonClient,
	database::Database,
	error::ErrorKind,
	Result
};

const MEMBER_PAGE_SIZE: &str = "100";
const TIER_FIELDS: &str = "title,description,amount_cents,patron_count,discord_role_ids,benefits";
const MEMBER_FIELDS: &str = "patron_status,last_charge_date,last_charge_status,lifetime_support_cents,currently_entitled_amount_cents,pledge_relationship_start,next_charge_date";
const MEMBER_USER_FIELDS: &str = "full_name,email,image_url,url,social_connections";

// What a sync run actually did. The best-effort paths (pagination,
// per-member skips) surface here instead of disappearing.
#[derive(Debug, Default)]
pub struct SyncReport {
	pub campaign_patreon_id: String,
	pub tiers_synced: usize,
	pub tiers_truncated: bool,
	pub patrons_synced: usize,
	pub patrons_skipped: usize,
	pub links_created: usize,
	pub links_removed: u64,
	pub members_truncated: bool
}

#[derive(Debug, Default)]
struct PatronOutcome {
	synced: usize,
	skipped: usize,
	links_created: usize,
	links_removed: u64,
	truncated: bool
}

impl<B: Backend> PatreonClient<B> {
	pub async fn sync_campaign<D: Database>(&self, database: &D) -> Result<SyncReport> {
		let Some(page_id) = self.credential.page_id else {
			return Err(ErrorKind::MissingPageId.into());
		};

		let campaign = self.campaign().await?;
		database
			.upsert_campaign(&CampaignUpsert::from_api(page_id, &campaign, Utc::now()))
			.await?;
		tracing::info!(%page_id, campaign = %campaign.id, "campaign stored, syncing tiers and patrons");

		let (tiers, patrons) = try_join!(
			self.sync_tiers(database, &campaign.id),
			self.sync_patrons(database, &campaign.id)
		)?;

		let report = SyncReport {
			campaign_patreon_id: campaign.id,
			tiers_synced: tiers.0,
			tiers_truncated: tiers.1,
			patrons_synced: patrons.synced,
			patrons_skipped: patrons.skipped,
			links_created: patrons.links_created,
			links_removed: patrons.links_removed,
			members_truncated: patrons.truncated
		};
		tracing::info!(
			campaign = %report.campaign_patreon_id,
			tiers = report.tiers_synced,
			patrons = report.patrons_synced,
			skipped = report.patrons_skipped,
			"campaign sync finished"
		);

		Ok(report)
	}

	// A single failing tier upsert aborts the whole sync.
	async fn sync_tiers<D: Database>(&self, database: &D, campaign_id: &str) -> Result<(usize, bool)> {
		let pages = self
			.fetch_all_pages::<Tier>(
				&format!("/campaigns/{campaign_id}/tiers"),
				&[("fields[tier]", TIER_FIELDS)]
			)
			.await;

		for tier in &pages.items {
			database
				.upsert_tier(&TierUpsert::from_api(campaign_id, tier))
				.await?;
		}

		Ok((pages.items.len(), pages.truncated))
	}

	// Patron sync is deliberately lenient: one malformed member must not
	// cost the rest of the page set.
	async fn sync_patrons<D: Database>(&self, database: &D, campaign_id: &str) -> Result<PatronOutcome> {
		let pages = self
			.fetch_all_pages::<Member>(
				&format!("/campaigns/{campaign_id}/members"),
				&[
					("page[size]", MEMBER_PAGE_SIZE),
					("include", "user,currently_entitled_tiers"),
					("fields[member]", MEMBER_FIELDS),
					("fields[user]", MEMBER_USER_FIELDS)
				]
			)
			.await;
		let users = included_users(&pages.included);

		let mut outcome = PatronOutcome {
			truncated: pages.truncated,
			..PatronOutcome::default()
		};
		for member in &pages.items {
			// a member with no linked user cannot be reconciled to a patron row
			let Some(user) = member.user_id().and_then(|id| users.get(id)).copied() else {
				outcome.skipped += 1;
				continue;
			};

			let upsert = PatronUpsert::from_api(campaign_id, member, user, Utc::now());
			let patron_id = match database.upsert_patron(&upsert).await {
				Ok(Some(id)) => id,
				Ok(None) => {
					outcome.skipped += 1;
					continue;
				},
				Err(error) => {
					tracing::warn!(member = %member.id, "skipping patron after failed upsert: {error}");
					outcome.skipped += 1;
					continue;
				}
			};
			outcome.synced += 1;

			let mut entitled = Vec::new();
			for tier_id in member.entitled_tier_ids() {
				// the tier may not have synced yet, or may have been removed
				let Ok(Some(local_tier)) = database.find_tier(tier_id).await else {
					continue;
				};
				if database.link_patron_tier(patron_id, local_tier).await.is_ok() {
					outcome.links_created += 1;
					entitled.push(local_tier);
				}
			}

			// drop assignments for tiers the patron is no longer entitled to
			match database.unlink_stale_patron_tiers(patron_id, &entitled).await {
				Ok(removed) => outcome.links_removed += removed,
				Err(error) => tracing::warn!(%patron_id, "failed to drop stale tier links: {error}")
			}
		}

		Ok(outcome)
	}
}
