#![allow(dead_code)]

use parking_lot::Mutex;
use serde_json::{ json, Value };
use std::{
	collections::VecDeque,
	ops::Deref,
	sync::{
		atomic::{ AtomicUsize, Ordering },
		Arc
	}
};

use patronizer::{ Backend, BackendError, Credential, PatreonClient, TokenResponse };
use patronizer_models::id::{ marker::PageMarker, PatronizerId };

struct Route {
	pattern: String,
	queue: VecDeque<Result<Value, BackendError>>
}

// Scripted stand-in for the functions host. Proxy responses are routed
// by substring match on the requested patreon url, so concurrently
// running sync stages each drain their own queue.
#[derive(Default)]
pub struct MockBackend {
	tokens: Mutex<VecDeque<Result<TokenResponse, BackendError>>>,
	routes: Mutex<Vec<Route>>,
	pub token_calls: AtomicUsize,
	pub proxy_calls: AtomicUsize,
	pub proxied_urls: Mutex<Vec<String>>
}

// Cloneable, shared handle to a `MockBackend`. The orphan rule forbids
// implementing the foreign `Backend` trait directly for `Arc<MockBackend>`
// (neither the trait nor `Arc` is local, and `Arc` is not `#[fundamental]`),
// so the shared handle is a local newtype instead.
#[derive(Clone)]
pub struct SharedBackend(Arc<MockBackend>);

impl Deref for SharedBackend {
	type Target = MockBackend;

	fn deref(&self) -> &MockBackend {
		&self.0
	}
}

impl MockBackend {
	pub fn new() -> SharedBackend {
		SharedBackend(Arc::new(Self::default()))
	}

	pub fn push_token(&self, token: Result<TokenResponse, BackendError>) {
		self.tokens.lock().push_back(token);
	}

	pub fn route(&self, pattern: &str, responses: Vec<Result<Value, BackendError>>) {
		self.routes.lock().push(Route {
			pattern: pattern.to_owned(),
			queue: responses.into_iter().collect()
		});
	}

	pub fn token_calls(&self) -> usize {
		self.token_calls.load(Ordering::SeqCst)
	}

	pub fn proxy_calls(&self) -> usize {
		self.proxy_calls.load(Ordering::SeqCst)
	}
}

impl Backend for SharedBackend {
	async fn fetch_token(&self, _session: &str, _client_id: &str, _client_secret: &str) -> Result<TokenResponse, BackendError> {
		let calls = self.token_calls.fetch_add(1, Ordering::SeqCst) + 1;
		match self.tokens.lock().pop_front() {
			Some(scripted) => scripted,
			None => Ok(TokenResponse {
				access_token: Some(format!("token-{calls}"))
			})
		}
	}

	async fn proxy(&self, _session: &str, url: &str, _access_token: &str) -> Result<Value, BackendError> {
		self.proxy_calls.fetch_add(1, Ordering::SeqCst);
		self.proxied_urls.lock().push(url.to_owned());

		let mut routes = self.routes.lock();
		for route in routes.iter_mut() {
			if url.contains(&route.pattern) {
				if let Some(response) = route.queue.pop_front() {
					return response;
				}
			}
		}
		panic!("no scripted response for {url}");
	}
}

pub fn status_error(status: u16, message: &str) -> BackendError {
	BackendError::Status {
		status: reqwest::StatusCode::from_u16(status).unwrap(),
		message: Some(message.to_owned())
	}
}

pub fn network_error() -> BackendError {
	BackendError::Network("error sending request: connection refused".to_owned())
}

pub fn credential(page_id: Option<PatronizerId<PageMarker>>) -> Credential {
	Credential {
		client_id: "client-id".to_owned(),
		client_secret: "client-secret".to_owned(),
		page_id
	}
}

pub fn client(backend: &SharedBackend) -> PatreonClient<SharedBackend> {
	PatreonClient::new(backend.clone(), Some("session-jwt".to_owned()), credential(None))
}

pub fn client_with_page(backend: &SharedBackend, page_id: PatronizerId<PageMarker>) -> PatreonClient<SharedBackend> {
	PatreonClient::new(backend.clone(), Some("session-jwt".to_owned()), credential(Some(page_id)))
}

pub fn page_of(data: Value, next: Option<&str>, included: Option<Value>) -> Value {
	let mut page = json!({ "data": data });
	if let Some(next) = next {
		page["links"] = json!({ "next": next });
	}
	if let Some(included) = included {
		page["included"] = included;
	}
	page
}

pub fn campaign_resource(id: &str, patron_count: i64) -> Value {
	json!({
		"id": id,
		"type": "campaign",
		"attributes": {
			"creation_name": "weekly watercolours",
			"summary": "painting, slowly",
			"pledge_url": "/join/watercolours",
			"patron_count": patron_count,
			"earnings_visibility": "public",
			"is_monthly": true,
			"is_charge_upfront": false,
			"image_url": "https://c10.patreonusercontent.com/full.png",
			"image_small_url": "https://c10.patreonusercontent.com/small.png"
		}
	})
}

pub fn tier_resource(id: &str, title: &str, amount_cents: i64) -> Value {
	json!({
		"id": id,
		"type": "tier",
		"attributes": {
			"title": title,
			"description": "a reward level",
			"amount_cents": amount_cents,
			"patron_count": 3,
			"discord_role_ids": ["123"],
			"benefits": []
		}
	})
}

pub fn member_resource(id: &str, user_id: Option<&str>, status: &str, amount_cents: i64, tier_ids: &[&str]) -> Value {
	let mut member = json!({
		"id": id,
		"type": "member",
		"attributes": {
			"patron_status": status,
			"currently_entitled_amount_cents": amount_cents,
			"lifetime_support_cents": amount_cents * 4,
			"pledge_relationship_start": "2024-11-02T09:30:00Z",
			"last_charge_date": "2025-07-01T00:00:00Z",
			"last_charge_status": "Paid"
		},
		"relationships": {
			"currently_entitled_tiers": {
				"data": tier_ids
					.iter()
					.map(|tier_id| json!({ "id": tier_id, "type": "tier" }))
					.collect::<Vec<_>>()
			}
		}
	});
	if let Some(user_id) = user_id {
		member["relationships"]["user"] = json!({ "data": { "id": user_id, "type": "user" } });
	}
	member
}

pub fn user_resource(id: &str, full_name: &str) -> Value {
	json!({
		"id": id,
		"type": "user",
		"attributes": {
			"full_name": full_name,
			"email": format!("{full_name}@example.net").replace(' ', "."),
			"image_url": "https://c10.patreonusercontent.com/avatar.png",
			"url": format!("https://www.patreon.com/user?u={id}"),
			"social_connections": { "discord": null }
		}
	})
}
