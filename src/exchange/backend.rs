//! [`CredentialExchange`] backed by the integration service's HTTP API.
//!
//! Every provider exposes the same endpoints under `/integrations/{provider}/`:
//! `authorize` returns the consent URL, `credentials` hands out (and consumes) the grant stored
//! by the OAuth callback, and `load` turns credentials into [`IntegrationItem`]s. All of them take
//! URL-encoded form bodies.

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	auth::{Credentials, Identity},
	error::{ConfigError, TransientError},
	exchange::{CredentialExchange, ExchangeErrorContext, ExchangeFuture, ExchangeStage},
	http::{BackendHttpClient, BackendRequest, BackendResponse},
	item::IntegrationItem,
	obs::{self, FlowOutcome, FlowSpan},
	provider::{Capability, ProviderDescriptor},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Default backend location used by local deployments.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

#[cfg(feature = "reqwest")]
/// Exchange client specialized for the crate's default reqwest transport.
pub type ReqwestCredentialExchange = HttpCredentialExchange<ReqwestHttpClient>;

/// Credential exchange client for the integration backend.
#[derive(Clone)]
pub struct HttpCredentialExchange<C>
where
	C: ?Sized + BackendHttpClient,
{
	/// HTTP client used for every backend request.
	pub http_client: Arc<C>,
	base_url: Url,
}
impl<C> HttpCredentialExchange<C>
where
	C: ?Sized + BackendHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(
		base_url: Url,
		http_client: impl Into<Arc<C>>,
	) -> Result<Self, ConfigError> {
		if base_url.cannot_be_a_base() {
			return Err(ConfigError::CannotBeABase { url: base_url.to_string() });
		}

		Ok(Self { http_client: http_client.into(), base_url })
	}

	/// Backend root all endpoints are resolved against.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Checks that the backend answers its health probe.
	pub async fn ping(&self) -> Result<()> {
		let stage = ExchangeStage::Ping;
		let probe = async {
			let response = self.http_client.send(BackendRequest::get(self.base_url.clone())).await?;

			ensure_success(stage, response).map(|_| ())
		};

		observe(stage, None, probe).await
	}

	/// Loads the provider's items with previously exchanged credentials.
	pub async fn load_items(
		&self,
		provider: &ProviderDescriptor,
		credentials: &Credentials,
	) -> Result<Vec<IntegrationItem>> {
		const STAGE: ExchangeStage = ExchangeStage::Load;

		observe(STAGE, Some(provider), async {
			if !provider.supports(Capability::LoadItems) {
				return Err(Error::InvalidRequest {
					reason: format!("{provider} does not support loading items"),
				});
			}

			let encoded = credentials.to_json_string().map_err(ConfigError::CredentialsEncode)?;
			let url = self.endpoint(provider, STAGE)?;
			let response = self
				.http_client
				.send(BackendRequest::post_form(url, [("credentials", encoded.as_str())]))
				.await?;
			let response = ensure_success(STAGE, response)?;

			if response.is_blank() {
				return Ok(Vec::new());
			}

			parse_json::<Option<Vec<IntegrationItem>>>(&response).map(Option::unwrap_or_default)
		})
		.await
	}

	fn endpoint(&self, provider: &ProviderDescriptor, stage: ExchangeStage) -> Result<Url> {
		let mut url = self.base_url.clone();

		url.path_segments_mut()
			.map_err(|_| ConfigError::CannotBeABase { url: self.base_url.to_string() })?
			.pop_if_empty()
			.extend(["integrations", provider.id.as_ref(), stage.as_str()]);

		Ok(url)
	}

	async fn post_identity(
		&self,
		stage: ExchangeStage,
		provider: &ProviderDescriptor,
		identity: &Identity,
	) -> Result<BackendResponse> {
		if !provider.supports(Capability::Authorize) {
			return Err(Error::InvalidRequest {
				reason: format!("{provider} does not support authorization"),
			});
		}

		let url = self.endpoint(provider, stage)?;
		let response =
			self.http_client.send(BackendRequest::post_form(url, identity.form_fields())).await?;

		ensure_success(stage, response)
	}

	async fn authorization_url(
		&self,
		provider: &ProviderDescriptor,
		identity: &Identity,
	) -> Result<Url> {
		let response = self.post_identity(ExchangeStage::Authorize, provider, identity).await?;
		// FastAPI serializes the returned string as JSON; plain-text backends send it raw.
		let raw = serde_json::from_slice::<String>(&response.body)
			.unwrap_or_else(|_| String::from_utf8_lossy(&response.body).into_owned());
		let raw = raw.trim();

		if raw.is_empty() {
			return Err(TransientError::Backend {
				message: "authorize endpoint returned an empty URL".into(),
				status: Some(response.status),
				retry_after: None,
			}
			.into());
		}

		Url::parse(raw).map_err(|e| Error::InvalidRequest {
			reason: format!("authorization URL `{raw}` is invalid ({e})"),
		})
	}

	async fn credentials(
		&self,
		provider: &ProviderDescriptor,
		identity: &Identity,
	) -> Result<Credentials> {
		let response = self.post_identity(ExchangeStage::Credentials, provider, identity).await?;
		let no_grant = || Error::NotAuthorized {
			reason: format!("no {provider} authorization was completed for {identity}"),
		};

		if response.is_blank() {
			return Err(no_grant());
		}

		parse_json::<Option<BTreeMap<String, Value>>>(&response)?
			.and_then(Credentials::from_map)
			.ok_or_else(no_grant)
	}
}
#[cfg(feature = "reqwest")]
impl HttpCredentialExchange<ReqwestHttpClient> {
	/// Creates a client with its own reqwest transport.
	pub fn new(base_url: &str) -> Result<Self, ConfigError> {
		Self::with_http_client(Url::parse(base_url)?, ReqwestHttpClient::default())
	}

	/// Creates a client for [`DEFAULT_BACKEND_URL`].
	pub fn localhost() -> Result<Self, ConfigError> {
		Self::new(DEFAULT_BACKEND_URL)
	}
}
impl<C> CredentialExchange for HttpCredentialExchange<C>
where
	C: ?Sized + BackendHttpClient,
{
	fn request_authorization_url<'a>(
		&'a self,
		provider: &'a ProviderDescriptor,
		identity: &'a Identity,
	) -> ExchangeFuture<'a, Url> {
		Box::pin(observe(
			ExchangeStage::Authorize,
			Some(provider),
			self.authorization_url(provider, identity),
		))
	}

	fn exchange_for_credentials<'a>(
		&'a self,
		provider: &'a ProviderDescriptor,
		identity: &'a Identity,
	) -> ExchangeFuture<'a, Credentials> {
		Box::pin(observe(
			ExchangeStage::Credentials,
			Some(provider),
			self.credentials(provider, identity),
		))
	}
}
impl<C> Debug for HttpCredentialExchange<C>
where
	C: ?Sized + BackendHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("HttpCredentialExchange").field("base_url", &self.base_url.as_str()).finish()
	}
}

async fn observe<T, F>(
	stage: ExchangeStage,
	provider: Option<&ProviderDescriptor>,
	fut: F,
) -> Result<T>
where
	F: Future<Output = Result<T>>,
{
	let span = FlowSpan::new(stage.as_str(), provider.map(|descriptor| descriptor.id.as_ref()));

	obs::record_flow_outcome(stage.as_str(), FlowOutcome::Attempt);

	let result = span.instrument(fut).await;

	obs::record_result(stage.as_str(), &result);

	result
}

fn ensure_success(stage: ExchangeStage, response: BackendResponse) -> Result<BackendResponse> {
	if response.is_success() {
		Ok(response)
	} else {
		Err(ExchangeErrorContext::from_response(stage, response.status, &response.body)
			.with_retry_after(response.retry_after)
			.into_error())
	}
}

fn parse_json<T>(response: &BackendResponse) -> Result<T>
where
	T: for<'de> Deserialize<'de>,
{
	let mut deserializer = serde_json::Deserializer::from_slice(&response.body);

	serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
		TransientError::ResponseParse { source, status: Some(response.status) }.into()
	})
}
