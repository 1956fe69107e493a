use reqwest::{ Response, StatusCode };
use serde::{ Deserialize, Serialize };
use serde_json::Value;

use patronizer_util::send_authed;

// endpoint routes on the functions host
const TOKEN_ROUTE: &str = "get-patreon-token";
const PROXY_ROUTE: &str = "patreon-proxy";

pub const FUNCTIONS_URL_VAR: &str = "PATRONIZER_FUNCTIONS_URL";

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
	#[error("{}", .message.as_deref().unwrap_or("request rejected by the backend"))]
	Status {
		status: StatusCode,
		message: Option<String>
	},

	#[error("network failure: {0}")]
	Network(String),

	#[error("unreadable response from the backend: {0}")]
	Invalid(String)
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
	#[serde(default)]
	pub access_token: Option<String>
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
	#[serde(default)]
	error: Option<String>
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenRequest<'a> {
	client_id: &'a str,
	client_secret: &'a str
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProxyRequest<'a> {
	url: &'a str,
	access_token: &'a str
}

// The token broker and api proxy endpoints, kept behind a trait so the
// client can be exercised against a scripted stand-in.
#[allow(async_fn_in_trait)]
pub trait Backend: Send + Sync {
	async fn fetch_token(&self, session: &str, client_id: &str, client_secret: &str) -> Result<TokenResponse, BackendError>;
	async fn proxy(&self, session: &str, url: &str, access_token: &str) -> Result<Value, BackendError>;
}

#[derive(Clone, Debug)]
pub struct HttpBackend {
	functions_url: String
}

impl HttpBackend {
	pub fn new(functions_url: impl Into<String>) -> Self {
		Self {
			functions_url: functions_url.into()
		}
	}

	pub fn from_env() -> Result<Self, std::env::VarError> {
		Ok(Self::new(std::env::var(FUNCTIONS_URL_VAR)?))
	}

	fn route(&self, route: &str) -> String {
		format!("{}/{route}", self.functions_url.trim_end_matches('/'))
	}
}

impl Backend for HttpBackend {
	async fn fetch_token(&self, session: &str, client_id: &str, client_secret: &str) -> Result<TokenResponse, BackendError> {
		let response = send_authed(self.route(TOKEN_ROUTE), session, &TokenRequest { client_id, client_secret })
			.await
			.map_err(network_error)?;
		if !response.status().is_success() {
			return Err(status_error(response).await);
		}

		response
			.json()
			.await
			.map_err(|error| BackendError::Invalid(error.to_string()))
	}

	async fn proxy(&self, session: &str, url: &str, access_token: &str) -> Result<Value, BackendError> {
		let response = send_authed(self.route(PROXY_ROUTE), session, &ProxyRequest { url, access_token })
			.await
			.map_err(network_error)?;
		if !response.status().is_success() {
			return Err(status_error(response).await);
		}

		response
			.json()
			.await
			.map_err(|error| BackendError::Invalid(error.to_string()))
	}
}

fn network_error(error: reqwest::Error) -> BackendError {
	BackendError::Network(error.to_string())
}

async fn status_error(response: Response) -> BackendError {
	let status = response.status();
	let message = response
		.json::<ErrorBody>()
		.await
		.unwrap_or_default()
		.error;

	BackendError::Status { status, message }
}
