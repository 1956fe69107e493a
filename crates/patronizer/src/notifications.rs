use patronizer_models::{
	id::{
		marker::{ NotificationMarker, UserMarker },
		PatronizerId
	},
	row::{ NewNotification, NotificationRow }
};

use crate::{ database::Database, Result };

pub async fn create_notification<D: Database>(database: &D, notification: &NewNotification) -> Result<NotificationRow> {
	database.insert_notification(notification).await
}

pub async fn mark_notification_read<D: Database>(database: &D, id: PatronizerId<NotificationMarker>) -> Result<bool> {
	database.mark_notification_read(id).await
}

pub async fn mark_all_notifications_read<D: Database>(database: &D, user_id: PatronizerId<UserMarker>) -> Result<u64> {
	database.mark_all_notifications_read(user_id).await
}
