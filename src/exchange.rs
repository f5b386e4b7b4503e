//! Credential exchange contracts and the HTTP-backed implementation.
//!
//! [`CredentialExchange`] is the coordinator's only view of the credential-issuing service: one
//! call that yields the provider's consent URL and one that turns a completed consent into
//! [`Credentials`]. Neither call keeps local state. Calling
//! [`CredentialExchange::exchange_for_credentials`] only makes sense after the consent window
//! closed; the coordinator enforces that ordering.

pub mod backend;
pub mod classify;

pub use backend::*;
pub use classify::*;

// self
use crate::{
	_prelude::*,
	auth::{Credentials, Identity},
	provider::ProviderDescriptor,
};

/// Boxed future returned by [`CredentialExchange`] operations.
pub type ExchangeFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Contract implemented by credential-issuing services.
pub trait CredentialExchange
where
	Self: Send + Sync,
{
	/// Requests the URL of the provider's consent page for `identity`.
	///
	/// Fails with an [`ErrorKind::ServiceUnavailable`](crate::error::ErrorKind) error on
	/// transport or 5xx failures, and with [`Error::InvalidRequest`] when the backend rejects
	/// the provider or identity.
	fn request_authorization_url<'a>(
		&'a self,
		provider: &'a ProviderDescriptor,
		identity: &'a Identity,
	) -> ExchangeFuture<'a, Url>;

	/// Collects the credentials granted during the consent step.
	///
	/// Fails with [`Error::NotAuthorized`] when the backend holds no grant for `identity`.
	fn exchange_for_credentials<'a>(
		&'a self,
		provider: &'a ProviderDescriptor,
		identity: &'a Identity,
	) -> ExchangeFuture<'a, Credentials>;
}
impl<T> CredentialExchange for Arc<T>
where
	T: ?Sized + CredentialExchange,
{
	fn request_authorization_url<'a>(
		&'a self,
		provider: &'a ProviderDescriptor,
		identity: &'a Identity,
	) -> ExchangeFuture<'a, Url> {
		(**self).request_authorization_url(provider, identity)
	}

	fn exchange_for_credentials<'a>(
		&'a self,
		provider: &'a ProviderDescriptor,
		identity: &'a Identity,
	) -> ExchangeFuture<'a, Credentials> {
		(**self).exchange_for_credentials(provider, identity)
	}
}

/// Backend endpoints, used to tag errors and observability output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExchangeStage {
	/// `POST /integrations/{provider}/authorize`.
	Authorize,
	/// `POST /integrations/{provider}/credentials`.
	Credentials,
	/// `POST /integrations/{provider}/load`.
	Load,
	/// `GET /`.
	Ping,
}
impl ExchangeStage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ExchangeStage::Authorize => "authorize",
			ExchangeStage::Credentials => "credentials",
			ExchangeStage::Load => "load",
			ExchangeStage::Ping => "ping",
		}
	}
}
impl Display for ExchangeStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
