use parking_lot::Mutex;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use patronizer_models::{
	id::{ marker::PageMarker, PatronizerId },
	patreon::{ Campaign, Document, IncludedResource }
};

use crate::{
	backend::{ Backend, BackendError },
	error::ErrorKind,
	Error, Result
};

pub const PATREON_API_BASE: &str = "https://www.patreon.com/api/oauth2/v2";

const MAX_RETRIES: u32 = 3;
const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

const CAMPAIGN_FIELDS: &str = "summary,creation_name,pay_per_name,one_liner,main_video_embed,main_video_url,image_url,image_small_url,created_at,published_at,pledge_url,patron_count,discord_server_id,google_analytics_id,earnings_visibility,is_monthly,is_charge_upfront";

#[derive(Clone, Debug)]
pub struct Credential {
	pub client_id: String,
	pub client_secret: String,
	pub page_id: Option<PatronizerId<PageMarker>>
}

// Accumulated pages from cursor pagination. Pagination is best-effort:
// a failing page stops the walk and leaves `truncated` set, so callers
// must not assume totality.
#[derive(Debug)]
pub struct PageSet<T> {
	pub items: Vec<T>,
	pub included: Vec<IncludedResource>,
	pub truncated: bool,
	pub failure: Option<Error>
}

impl<T> Default for PageSet<T> {
	fn default() -> Self {
		Self {
			items: Vec::new(),
			included: Vec::new(),
			truncated: false,
			failure: None
		}
	}
}

pub struct PatreonClient<B: Backend> {
	pub(crate) backend: B,
	pub(crate) credential: Credential,
	session: Option<String>,
	access_token: Mutex<Option<String>>
}

impl<B: Backend> PatreonClient<B> {
	pub fn new(backend: B, session: Option<String>, credential: Credential) -> Self {
		Self {
			backend,
			credential,
			session,
			access_token: Mutex::new(None)
		}
	}

	pub fn credential(&self) -> &Credential {
		&self.credential
	}

	pub fn reset_access_token(&self) {
		*self.access_token.lock() = None;
	}

	fn session(&self) -> Result<&str> {
		self.session
			.as_deref()
			.ok_or_else(|| ErrorKind::MissingSession.into())
	}

	fn clear_token_on_failure<T>(&self, result: Result<T>) -> Result<T> {
		if result.is_err() {
			self.reset_access_token();
		}
		result
	}

	pub async fn access_token(&self) -> Result<String> {
		if let Some(token) = self.access_token.lock().clone() {
			return Ok(token);
		}

		match self.acquire_access_token().await {
			Ok(token) => {
				*self.access_token.lock() = Some(token.clone());
				Ok(token)
			},
			Err(error) => {
				self.reset_access_token();
				Err(error)
			}
		}
	}

	async fn acquire_access_token(&self) -> Result<String> {
		let session = self.session()?;
		let response = self.backend
			.fetch_token(session, &self.credential.client_id, &self.credential.client_secret)
			.await
			.map_err(token_error)?;

		response.access_token
			.ok_or_else(|| ErrorKind::Authentication("invalid token response from patreon".into()).into())
	}

	pub async fn request<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<T> {
		let url = Url::parse_with_params(&format!("{PATREON_API_BASE}{endpoint}"), params)?;
		self.request_url(url.as_str()).await
	}

	pub async fn request_url<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
		let mut attempt = 0;
		loop {
			match self.dispatch(url).await {
				Ok(value) => {
					return serde_json::from_value(value)
						.map_err(|error| ErrorKind::InvalidResponse(error.to_string()).into());
				},
				Err(error) if error.kind.is_retryable() && attempt < MAX_RETRIES => {
					attempt += 1;
					tracing::warn!(url, attempt, "retrying after network failure: {error}");
					tokio::time::sleep(RETRY_BASE_DELAY * attempt).await;
				},
				Err(error) => return Err(error)
			}
		}
	}

	async fn dispatch(&self, url: &str) -> Result<Value> {
		let session = self.session()?;
		let access_token = self.access_token().await?;
		let value = self.backend
			.proxy(session, url, &access_token)
			.await
			.map_err(|error| self.proxy_error(error))?;
		if value.is_null() {
			return Err(ErrorKind::EmptyResponse.into());
		}

		Ok(value)
	}

	fn proxy_error(&self, error: BackendError) -> Error {
		match error {
			BackendError::Status { status, message } => {
				let message = message.unwrap_or_else(|| "failed to fetch from the patreon api".into());
				if status == StatusCode::UNAUTHORIZED {
					// the cached token is presumed expired or revoked
					self.reset_access_token();
					ErrorKind::Authentication(message).into()
				} else {
					ErrorKind::Api(message).into()
				}
			},
			BackendError::Network(reason) => ErrorKind::Network(reason).into(),
			BackendError::Invalid(reason) => ErrorKind::InvalidResponse(reason).into()
		}
	}

	pub async fn fetch_all_pages<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, &str)]) -> PageSet<T> {
		let mut set = PageSet::default();
		let mut next = match Url::parse_with_params(&format!("{PATREON_API_BASE}{endpoint}"), params) {
			Ok(url) => url.to_string(),
			Err(error) => {
				set.truncated = true;
				set.failure = Some(error.into());
				return set;
			}
		};

		loop {
			match self.request_url::<Document<T>>(&next).await {
				Ok(document) => {
					set.items.extend(document.data);
					if let Some(included) = document.included {
						set.included.extend(included);
					}
					match document.links.and_then(|links| links.next) {
						Some(url) => next = url,
						None => break
					}
				},
				Err(error) => {
					tracing::warn!(endpoint, fetched = set.items.len(), "stopping pagination early: {error}");
					set.truncated = true;
					set.failure = Some(error);
					break;
				}
			}
		}

		set
	}

	pub async fn validate_credentials(&self) -> Result<()> {
		let result = self.try_validate().await;
		// any failure here is treated as an invalid-credential signal
		self.clear_token_on_failure(result)
	}

	async fn try_validate(&self) -> Result<()> {
		self.access_token().await?;

		let document: Document<Campaign> = self
			.request("/campaigns", &[("fields[campaign]", "creation_name")])
			.await?;
		if document.data.is_empty() {
			return Err(ErrorKind::NoCampaign.into());
		}

		Ok(())
	}

	pub async fn campaign(&self) -> Result<Campaign> {
		let document: Document<Campaign> = self
			.request("/campaigns", &[
				("include", "tiers,benefits"),
				("fields[campaign]", CAMPAIGN_FIELDS)
			])
			.await?;

		document.data
			.into_iter()
			.next()
			.ok_or_else(|| ErrorKind::CampaignNotFound.into())
	}
}

fn token_error(error: BackendError) -> Error {
	match error {
		BackendError::Status { message, .. } =>
			ErrorKind::Authentication(message.unwrap_or_else(|| "failed to get access token".into())).into(),
		BackendError::Network(reason) => ErrorKind::Network(reason).into(),
		BackendError::Invalid(reason) => ErrorKind::Authentication(reason).into()
	}
}
