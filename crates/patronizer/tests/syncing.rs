use assert_matches::assert_matches;
use serde_json::json;

use patronizer::{ Database, ErrorKind, MemoryDatabase };
use patronizer_models::id::PatronizerId;

mod common;
use common::*;

#[tokio::test]
async fn sync_requires_a_page_id() {
	let backend = MockBackend::new();
	let database = MemoryDatabase::new();
	let client = client(&backend);

	let error = client.sync_campaign(&database).await.unwrap_err();
	assert_matches!(error.kind, ErrorKind::MissingPageId);
	assert_eq!(backend.proxy_calls(), 0);
}

#[tokio::test]
async fn members_without_a_user_relationship_are_skipped() {
	let backend = MockBackend::new();
	backend.route("/campaigns?", vec![
		Ok(page_of(json!([campaign_resource("11", 2)]), None, None))
	]);
	backend.route("/tiers?", vec![
		Ok(page_of(json!([tier_resource("t1", "Bronze", 300)]), None, None))
	]);
	backend.route("/members?", vec![
		Ok(page_of(
			json!([
				member_resource("m1", Some("u1"), "active_patron", 300, &["t1"]),
				member_resource("m2", None, "active_patron", 300, &["t1"])
			]),
			None,
			Some(json!([user_resource("u1", "June Holloway"), tier_resource("t1", "Bronze", 300)]))
		))
	]);

	let database = MemoryDatabase::new();
	let page_id = PatronizerId::random();
	let report = client_with_page(&backend, page_id)
		.sync_campaign(&database)
		.await
		.unwrap();

	assert_eq!(report.patrons_synced, 1);
	assert_eq!(report.patrons_skipped, 1);
	assert_eq!(report.links_created, 1);

	let patrons = database.patrons("11").await.unwrap();
	assert_eq!(patrons.len(), 1);
	assert_eq!(patrons[0].patreon_id, "u1");
	assert_eq!(patrons[0].full_name.as_deref(), Some("June Holloway"));

	let tiers = database.tiers("11").await.unwrap();
	assert_eq!(tiers.len(), 1);
	let links = database.patron_tiers(patrons[0].id).await.unwrap();
	assert_eq!(links, vec![tiers[0].id]);
}

#[tokio::test]
async fn resyncing_unchanged_data_is_idempotent() {
	let backend = MockBackend::new();
	let campaign_page = page_of(json!([campaign_resource("11", 3)]), None, None);
	let tiers_page = page_of(
		json!([tier_resource("t1", "Bronze", 300), tier_resource("t2", "Gold", 900)]),
		None,
		None
	);
	let members_page = page_of(
		json!([
			member_resource("m1", Some("u1"), "active_patron", 300, &["t1"]),
			member_resource("m2", Some("u2"), "active_patron", 900, &["t2"])
		]),
		None,
		Some(json!([user_resource("u1", "June Holloway"), user_resource("u2", "Ada Voss")]))
	);
	backend.route("/campaigns?", vec![Ok(campaign_page.clone()), Ok(campaign_page)]);
	backend.route("/tiers?", vec![Ok(tiers_page.clone()), Ok(tiers_page)]);
	backend.route("/members?", vec![Ok(members_page.clone()), Ok(members_page)]);

	let database = MemoryDatabase::new();
	let page_id = PatronizerId::random();
	let client = client_with_page(&backend, page_id);

	client.sync_campaign(&database).await.unwrap();
	let campaign_before = database.campaign(page_id).await.unwrap().unwrap();
	let tiers_before = database.tiers("11").await.unwrap();
	let patrons_before = database.patrons("11").await.unwrap();

	let report = client.sync_campaign(&database).await.unwrap();
	let campaign_after = database.campaign(page_id).await.unwrap().unwrap();
	let tiers_after = database.tiers("11").await.unwrap();
	let patrons_after = database.patrons("11").await.unwrap();

	assert_eq!(report.tiers_synced, 2);
	assert_eq!(report.patrons_synced, 2);
	assert_eq!(report.patrons_skipped, 0);

	// stable upsert keys mean stable rows, not duplicates
	assert_eq!(campaign_after.id, campaign_before.id);
	assert_eq!(campaign_after.patreon_id, campaign_before.patreon_id);
	assert!(campaign_after.last_sync_at >= campaign_before.last_sync_at);

	assert_eq!(tiers_after.len(), tiers_before.len());
	for (before, after) in tiers_before.iter().zip(&tiers_after) {
		assert_eq!(before.id, after.id);
		assert_eq!(before.title, after.title);
		assert_eq!(before.amount_cents, after.amount_cents);
	}

	assert_eq!(patrons_after.len(), patrons_before.len());
	for (before, after) in patrons_before.iter().zip(&patrons_after) {
		assert_eq!(before.id, after.id);
		assert_eq!(before.patreon_id, after.patreon_id);
		assert_eq!(before.full_name, after.full_name);
		assert_eq!(before.lifetime_support_cents, after.lifetime_support_cents);
	}
}

#[tokio::test]
async fn downgraded_patrons_lose_their_stale_tier_links() {
	let backend = MockBackend::new();
	let campaign_page = page_of(json!([campaign_resource("11", 1)]), None, None);
	let tiers_page = page_of(
		json!([tier_resource("t1", "Bronze", 300), tier_resource("t2", "Gold", 900)]),
		None,
		None
	);
	backend.route("/campaigns?", vec![Ok(campaign_page.clone()), Ok(campaign_page)]);
	backend.route("/tiers?", vec![Ok(tiers_page.clone()), Ok(tiers_page)]);
	backend.route("/members?", vec![
		Ok(page_of(
			json!([member_resource("m1", Some("u1"), "active_patron", 900, &["t2"])]),
			None,
			Some(json!([user_resource("u1", "June Holloway")]))
		)),
		Ok(page_of(
			json!([member_resource("m1", Some("u1"), "active_patron", 300, &["t1"])]),
			None,
			Some(json!([user_resource("u1", "June Holloway")]))
		))
	]);

	let database = MemoryDatabase::new();
	let page_id = PatronizerId::random();
	let client = client_with_page(&backend, page_id);

	client.sync_campaign(&database).await.unwrap();
	let patrons = database.patrons("11").await.unwrap();
	let tiers = database.tiers("11").await.unwrap();
	let gold = tiers.iter().find(|tier| tier.patreon_id == "t2").unwrap();
	assert_eq!(database.patron_tiers(patrons[0].id).await.unwrap(), vec![gold.id]);

	let report = client.sync_campaign(&database).await.unwrap();
	assert_eq!(report.links_removed, 1);

	let bronze = tiers.iter().find(|tier| tier.patreon_id == "t1").unwrap();
	assert_eq!(database.patron_tiers(patrons[0].id).await.unwrap(), vec![bronze.id]);
}

#[tokio::test]
async fn truncated_member_pages_still_sync_what_arrived() {
	let backend = MockBackend::new();
	backend.route("/campaigns?", vec![
		Ok(page_of(json!([campaign_resource("11", 2)]), None, None))
	]);
	backend.route("/tiers?", vec![
		Ok(page_of(json!([tier_resource("t1", "Bronze", 300)]), None, None))
	]);
	let page_two = format!("{}/campaigns/11/members?page%5Bcursor%5D=2", patronizer::PATREON_API_BASE);
	backend.route("/members?", vec![
		Ok(page_of(
			json!([member_resource("m1", Some("u1"), "active_patron", 300, &["t1"])]),
			Some(&page_two),
			Some(json!([user_resource("u1", "June Holloway")]))
		)),
		Err(status_error(502, "bad gateway"))
	]);

	let database = MemoryDatabase::new();
	let report = client_with_page(&backend, PatronizerId::random())
		.sync_campaign(&database)
		.await
		.unwrap();

	assert!(report.members_truncated);
	assert_eq!(report.patrons_synced, 1);
	assert_eq!(database.patrons("11").await.unwrap().len(), 1);
}
