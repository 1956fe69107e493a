use patronizer_models::{
	id::{
		marker::{ PageMarker, UserMarker },
		PatronizerId
	},
	row::{ NewNotification, NewPage, NotificationKind, PageRow }
};

use crate::{
	backend::Backend,
	client::{ Credential, PatreonClient },
	database::Database,
	notifications::create_notification,
	Result
};

// Connecting a page validates the credentials against patreon before
// anything is stored, then runs a full first sync so the dashboard has
// rows to read straight away.
pub async fn add_page<B: Backend + Clone, D: Database>(
	backend: &B,
	database: &D,
	session: Option<String>,
	page: NewPage
) -> Result<PageRow> {
	let probe = PatreonClient::new(backend.clone(), session.clone(), Credential {
		client_id: page.client_id.clone(),
		client_secret: page.client_secret.clone(),
		page_id: None
	});
	probe.validate_credentials().await?;

	let row = database.insert_page(&page).await?;
	tracing::info!(page = %row.id, name = %row.name, "patreon page connected");

	let client = PatreonClient::new(backend.clone(), session, Credential {
		client_id: row.client_id.clone(),
		client_secret: row.client_secret.clone(),
		page_id: Some(row.id)
	});
	let report = client.sync_campaign(database).await?;

	create_notification(database, &NewNotification {
		user_id: row.user_id,
		title: "Patreon page connected".into(),
		message: format!(
			"Synced {} patrons across {} tiers for {}.",
			report.patrons_synced, report.tiers_synced, row.name
		),
		kind: NotificationKind::Success,
		link: None
	}).await?;

	Ok(row)
}

// Removal is a soft-delete; synced campaign, tier and patron rows stay
// behind untouched.
pub async fn remove_page<D: Database>(database: &D, page_id: PatronizerId<PageMarker>) -> Result<bool> {
	let removed = database.soft_delete_page(page_id).await?;
	if removed {
		tracing::info!(page = %page_id, "patreon page removed");
	}

	Ok(removed)
}

pub async fn list_pages<D: Database>(database: &D, user_id: PatronizerId<UserMarker>) -> Result<Vec<PageRow>> {
	database.pages(user_id).await
}
