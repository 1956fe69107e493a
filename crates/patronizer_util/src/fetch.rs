use once_cell::sync::Lazy;
use reqwest::{
	header::AUTHORIZATION,
	Client, IntoUrl, RequestBuilder, Response
};
use serde::Serialize;

pub static HTTP: Lazy<Client> = Lazy::new(Client::new);

pub fn post_authed<U: IntoUrl, B: Serialize + ?Sized>(url: U, bearer: &str, body: &B) -> RequestBuilder {
	HTTP.post(url)
		.header(AUTHORIZATION, format!("Bearer {bearer}"))
		.json(body)
}

pub async fn send_authed<U: IntoUrl, B: Serialize + ?Sized>(url: U, bearer: &str, body: &B) -> Result<Response, reqwest::Error> {
	post_authed(url, bearer, body)
		.send()
		.await
}
