//! Shared fixtures for integration tests.

#![allow(dead_code)]

// std
use std::sync::atomic::{AtomicUsize, Ordering};
// crates.io
use parking_lot::Mutex;
use tokio::sync::Notify;
// self
use integration_connect::{
	auth::{Credentials, Identity},
	error::{Error, Result},
	exchange::{CredentialExchange, ExchangeFuture},
	provider::ProviderDescriptor,
	url::Url,
};
#[cfg(feature = "reqwest")]
use integration_connect::{http::ReqwestHttpClient, reqwest::Client as ReqwestClient};

pub use std::{collections::BTreeMap, sync::Arc, time::Duration};

type Reply<T> = Arc<dyn Fn(&ProviderDescriptor) -> Result<T> + Send + Sync>;

/// Builds the identity used by the UI walkthroughs.
pub fn test_identity() -> Identity {
	Identity::parse("TestUser", "TestOrg").expect("Test identity should be valid.")
}

/// Builds a credential map from string pairs.
pub fn credentials(pairs: &[(&str, &str)]) -> Credentials {
	Credentials::from_map(
		pairs
			.iter()
			.map(|(key, value)| ((*key).to_owned(), serde_json::Value::from(*value)))
			.collect(),
	)
	.expect("Credential fixture should be non-empty.")
}

#[cfg(feature = "reqwest")]
/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by `httpmock`.
pub fn test_reqwest_http_client() -> ReqwestHttpClient {
	let client = ReqwestClient::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	ReqwestHttpClient::with_client(client)
}

/// In-process [`CredentialExchange`] whose replies are scripted per test.
///
/// By default the consent URL is `https://consent.test/{provider}` and the exchange yields
/// `{"access_token": "abc"}`. Gates park the next call until the test releases them.
#[derive(Clone)]
pub struct ScriptedExchange(Arc<Script>);
struct Script {
	authorize: Mutex<Reply<Url>>,
	credentials: Mutex<Reply<Credentials>>,
	authorize_gate: Mutex<Option<Arc<Notify>>>,
	credentials_gate: Mutex<Option<Arc<Notify>>>,
	authorize_calls: AtomicUsize,
	credentials_calls: AtomicUsize,
}
impl ScriptedExchange {
	pub fn new() -> Self {
		Self(Arc::new(Script {
			authorize: Mutex::new(Arc::new(|provider: &ProviderDescriptor| {
				Ok(Url::parse(&format!("https://consent.test/{}", provider.id))
					.expect("Scripted consent URL should parse."))
			})),
			credentials: Mutex::new(Arc::new(|_: &ProviderDescriptor| {
				Ok(credentials(&[("access_token", "abc")]))
			})),
			authorize_gate: Mutex::new(None),
			credentials_gate: Mutex::new(None),
			authorize_calls: AtomicUsize::new(0),
			credentials_calls: AtomicUsize::new(0),
		}))
	}

	pub fn authorize_with(
		&self,
		reply: impl 'static + Fn(&ProviderDescriptor) -> Result<Url> + Send + Sync,
	) {
		*self.0.authorize.lock() = Arc::new(reply);
	}

	pub fn credentials_with(
		&self,
		reply: impl 'static + Fn(&ProviderDescriptor) -> Result<Credentials> + Send + Sync,
	) {
		*self.0.credentials.lock() = Arc::new(reply);
	}

	pub fn fail_credentials(&self, reason: &'static str) {
		self.credentials_with(move |_| Err(Error::NotAuthorized { reason: reason.into() }));
	}

	/// Parks the next authorization URL request until the returned handle is notified.
	pub fn gate_next_authorize(&self) -> Arc<Notify> {
		let gate = Arc::new(Notify::new());

		*self.0.authorize_gate.lock() = Some(gate.clone());

		gate
	}

	/// Parks the next credential exchange until the returned handle is notified.
	pub fn gate_next_credentials(&self) -> Arc<Notify> {
		let gate = Arc::new(Notify::new());

		*self.0.credentials_gate.lock() = Some(gate.clone());

		gate
	}

	pub fn authorize_calls(&self) -> usize {
		self.0.authorize_calls.load(Ordering::SeqCst)
	}

	pub fn credentials_calls(&self) -> usize {
		self.0.credentials_calls.load(Ordering::SeqCst)
	}
}
impl Default for ScriptedExchange {
	fn default() -> Self {
		Self::new()
	}
}
impl CredentialExchange for ScriptedExchange {
	fn request_authorization_url<'a>(
		&'a self,
		provider: &'a ProviderDescriptor,
		_identity: &'a Identity,
	) -> ExchangeFuture<'a, Url> {
		Box::pin(async move {
			self.0.authorize_calls.fetch_add(1, Ordering::SeqCst);

			let gate = self.0.authorize_gate.lock().take();

			if let Some(gate) = gate {
				gate.notified().await;
			}

			let reply = self.0.authorize.lock().clone();

			reply(provider)
		})
	}

	fn exchange_for_credentials<'a>(
		&'a self,
		provider: &'a ProviderDescriptor,
		_identity: &'a Identity,
	) -> ExchangeFuture<'a, Credentials> {
		Box::pin(async move {
			self.0.credentials_calls.fetch_add(1, Ordering::SeqCst);

			let gate = self.0.credentials_gate.lock().take();

			if let Some(gate) = gate {
				gate.notified().await;
			}

			let reply = self.0.credentials.lock().clone();

			reply(provider)
		})
	}
}
