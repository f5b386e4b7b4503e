//! Crate-level error types shared across the registry, exchange client, and coordinator.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Temporary backend failure; the user may retry by reconnecting.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Consent surface could not be opened or inspected.
	#[error(transparent)]
	Surface(#[from] crate::surface::SurfaceError),

	/// Backend rejected the request because of bad caller input.
	#[error("Request was rejected: {reason}.")]
	InvalidRequest {
		/// Backend- or crate-supplied reason string.
		reason: String,
	},
	/// The user never completed the provider's consent step.
	#[error("Authorization was not completed: {reason}.")]
	NotAuthorized {
		/// Backend- or crate-supplied reason string.
		reason: String,
	},
	/// Provider identifier is not registered.
	#[error("Provider `{provider}` is not registered.")]
	NotFound {
		/// Identifier that failed to resolve.
		provider: String,
	},
	/// A newer handshake (or a cancellation) replaced the one this call belonged to.
	#[error("Handshake was superseded before it completed.")]
	Superseded,
}
impl Error {
	/// Collapses the error into the coarse taxonomy surfaced to the presentation layer.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Config(_) | Self::InvalidRequest { .. } => ErrorKind::InvalidRequest,
			Self::Transient(_) | Self::Transport(_) | Self::Surface(_) =>
				ErrorKind::ServiceUnavailable,
			Self::NotAuthorized { .. } => ErrorKind::NotAuthorized,
			Self::NotFound { .. } => ErrorKind::NotFound,
			Self::Superseded => ErrorKind::Superseded,
		}
	}
}

/// Coarse error categories used by session state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
	/// Bad caller input; not retryable without correction.
	InvalidRequest,
	/// Transient backend or network failure; the user may retry.
	ServiceUnavailable,
	/// Consent was not completed; the user must restart the handshake.
	NotAuthorized,
	/// Unknown provider identifier.
	NotFound,
	/// Handshake was replaced by a newer one.
	Superseded,
}
impl ErrorKind {
	/// Returns a stable label suitable for logs or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ErrorKind::InvalidRequest => "invalid_request",
			ErrorKind::ServiceUnavailable => "service_unavailable",
			ErrorKind::NotAuthorized => "not_authorized",
			ErrorKind::NotFound => "not_found",
			ErrorKind::Superseded => "superseded",
		}
	}
}
impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Backend base URL cannot be parsed or joined.
	#[error("Backend URL is invalid.")]
	InvalidBackendUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Backend base URL cannot carry path segments (e.g. `mailto:`).
	#[error("Backend URL `{url}` cannot be used as a base.")]
	CannotBeABase {
		/// Offending URL.
		url: String,
	},
	/// Identifier validation failed.
	#[error(transparent)]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
	/// Provider descriptor validation failed.
	#[error(transparent)]
	InvalidDescriptor(#[from] crate::provider::ProviderDescriptorError),
	/// Provider registry could not be assembled.
	#[error(transparent)]
	InvalidRegistry(#[from] crate::provider::RegistryError),
	/// Credentials could not be serialized for the load endpoint.
	#[error("Credentials could not be serialized.")]
	CredentialsEncode(#[source] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<url::ParseError> for ConfigError {
	fn from(e: url::ParseError) -> Self {
		Self::InvalidBackendUrl { source: e }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Temporary failure variants (safe to retry with a fresh handshake).
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Backend returned an unexpected but non-fatal response.
	#[error("Integration backend returned an unexpected response: {message}.")]
	Backend {
		/// Backend- or crate-supplied message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Backend responded with JSON that could not be parsed.
	#[error("Integration backend returned malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the integration backend.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the integration backend.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn kinds_collapse_transport_and_backend_failures() {
		let transient = Error::from(TransientError::Backend {
			message: "bad gateway".into(),
			status: Some(502),
			retry_after: None,
		});
		let io = Error::from(TransportError::from(std::io::Error::other("reset")));

		assert_eq!(transient.kind(), ErrorKind::ServiceUnavailable);
		assert_eq!(io.kind(), ErrorKind::ServiceUnavailable);
		assert_eq!(
			Error::NotAuthorized { reason: "No credentials found".into() }.kind(),
			ErrorKind::NotAuthorized
		);
		assert_eq!(Error::NotFound { provider: "dropbox".into() }.kind(), ErrorKind::NotFound);
	}

	#[test]
	fn messages_carry_reasons() {
		let err = Error::NotAuthorized { reason: "No credentials found".into() };

		assert_eq!(err.to_string(), "Authorization was not completed: No credentials found.");
		assert_eq!(ErrorKind::ServiceUnavailable.to_string(), "service_unavailable");
	}
}
