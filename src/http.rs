//! Transport primitives for integration backend calls.
//!
//! The module exposes [`BackendHttpClient`] alongside [`BackendRequest`] and
//! [`BackendResponse`] so downstream crates can plug in custom HTTP stacks. Implementations only
//! move bytes: they report the status code, the body, and any `Retry-After` hint, and leave every
//! classification decision to [`crate::exchange`]. A non-2xx status is a successful transport
//! call; only network or IO failures surface as [`TransportError`].

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
#[cfg(feature = "reqwest")] use reqwest::header::{HeaderMap, RETRY_AFTER};
#[cfg(feature = "reqwest")] use time::format_description::well_known::Rfc2822;
// self
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by [`BackendHttpClient::send`].
pub type HttpFuture<'a> =
	Pin<Box<dyn Future<Output = Result<BackendResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports used by [`crate::exchange::HttpCredentialExchange`].
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared behind an
/// `Arc` by several exchange clients, and the returned future must be `Send` so coordinator
/// tasks can be spawned onto a multi-threaded runtime.
pub trait BackendHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Dispatches `request` and buffers the response body.
	fn send(&self, request: BackendRequest) -> HttpFuture<'_>;
}

/// HTTP methods used by the integration backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendMethod {
	/// `GET`, used by the health probe.
	Get,
	/// `POST` with a URL-encoded form body.
	Post,
}

/// Request issued against the integration backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendRequest {
	/// HTTP method.
	pub method: BackendMethod,
	/// Absolute endpoint URL.
	pub url: Url,
	/// Form fields, sent as `application/x-www-form-urlencoded` for `POST`.
	pub form: Vec<(String, String)>,
}
impl BackendRequest {
	/// Builds a bodyless `GET`.
	pub fn get(url: Url) -> Self {
		Self { method: BackendMethod::Get, url, form: Vec::new() }
	}

	/// Builds a form `POST`.
	pub fn post_form<'a, I>(url: Url, fields: I) -> Self
	where
		I: IntoIterator<Item = (&'a str, &'a str)>,
	{
		let form =
			fields.into_iter().map(|(key, value)| (key.to_owned(), value.to_owned())).collect();

		Self { method: BackendMethod::Post, url, form }
	}
}

/// Buffered backend response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendResponse {
	/// HTTP status code.
	pub status: u16,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl BackendResponse {
	/// Returns true for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Returns true when the body holds nothing but whitespace.
	pub fn is_blank(&self) -> bool {
		self.body.iter().all(u8::is_ascii_whitespace)
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
/// Backend endpoints answer directly, so configure any custom [`ReqwestClient`] without
/// redirect following to keep a misconfigured backend from bouncing form posts elsewhere.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl BackendHttpClient for ReqwestHttpClient {
	fn send(&self, request: BackendRequest) -> HttpFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let builder = match request.method {
				BackendMethod::Get => client.get(request.url),
				BackendMethod::Post => client.post(request.url).form(&request.form),
			};
			let response = builder.send().await?;
			let status = response.status().as_u16();
			let retry_after = parse_retry_after(response.headers());
			let body = response.bytes().await?.to_vec();

			Ok(BackendResponse { status, retry_after, body })
		})
	}
}

#[cfg(feature = "reqwest")]
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX)));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}
