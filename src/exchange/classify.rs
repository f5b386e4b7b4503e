//! Maps failed backend responses onto the crate's error taxonomy.
//!
//! Classification works on [`ExchangeErrorContext`], which keeps only primitive data (stage,
//! status, FastAPI `detail`, body preview) so custom transports get the same mapping as the
//! reqwest one.

// crates.io
use serde_json::Value;
// self
use crate::{_prelude::*, error::TransientError, exchange::ExchangeStage};

/// Canonical categories for failed backend calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExchangeErrorKind {
	/// Backend rejected the provider or identity.
	InvalidRequest,
	/// Backend holds no grant for the identity.
	NotAuthorized,
	/// Failure is temporary; a fresh handshake may succeed.
	Transient,
}

/// Context collected for a failed backend call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExchangeErrorContext {
	/// Endpoint that failed.
	pub stage: ExchangeStage,
	/// HTTP status code returned by the backend, when available.
	pub http_status: Option<u16>,
	/// FastAPI-style `detail` field, flattened to text.
	pub detail: Option<String>,
	/// Preview of the response body for payloads without a `detail`.
	pub body_preview: Option<String>,
	/// Retry-After hint from upstream.
	pub retry_after: Option<Duration>,
}
impl ExchangeErrorContext {
	const BODY_PREVIEW_LIMIT: usize = 256;

	/// Creates a new context scoped to the provided stage.
	pub fn new(stage: ExchangeStage) -> Self {
		Self { stage, http_status: None, detail: None, body_preview: None, retry_after: None }
	}

	/// Builds a context from a response body, extracting `detail` when the body is JSON.
	pub fn from_response(stage: ExchangeStage, status: u16, body: &[u8]) -> Self {
		let ctx = Self::new(stage).with_http_status(status);

		match serde_json::from_slice::<Value>(body).ok().and_then(extract_detail) {
			Some(detail) => ctx.with_detail(detail),
			None => {
				let text = String::from_utf8_lossy(body);
				let text = text.trim();

				if text.is_empty() { ctx } else { ctx.with_body_preview(text) }
			},
		}
	}

	/// Adds an HTTP status code.
	pub fn with_http_status(mut self, status: u16) -> Self {
		self.http_status = Some(status);

		self
	}

	/// Adds the backend's `detail` message.
	pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
		self.detail = Some(truncate_preview(detail.into()));

		self
	}

	/// Adds a body preview for payloads without a `detail`.
	pub fn with_body_preview(mut self, body: impl Into<String>) -> Self {
		self.body_preview = Some(truncate_preview(body.into()));

		self
	}

	/// Adds a Retry-After hint.
	pub fn with_retry_after(mut self, retry_after: Option<Duration>) -> Self {
		self.retry_after = retry_after;

		self
	}

	/// Classifies the failure.
	///
	/// 429, 5xx, and a missing status are transient. Any other 4xx from the credentials endpoint
	/// means no grant exists; from other endpoints it means the request itself was bad. Requests
	/// that never got a response are not classified here; they surface as [`Error::Transport`].
	pub fn classify(&self) -> ExchangeErrorKind {
		match self.http_status {
			Some(429) => ExchangeErrorKind::Transient,
			Some(code) if (400..500).contains(&code) => match self.stage {
				ExchangeStage::Credentials => ExchangeErrorKind::NotAuthorized,
				_ => ExchangeErrorKind::InvalidRequest,
			},
			_ => ExchangeErrorKind::Transient,
		}
	}

	/// Human-readable summary: the backend's detail, its body, or the bare status.
	pub fn message(&self) -> String {
		if let Some(detail) = self.detail.as_ref().or(self.body_preview.as_ref()) {
			return detail.trim_end_matches('.').to_owned();
		}

		match self.http_status {
			Some(status) => format!("{} endpoint answered with HTTP {status}", self.stage),
			None => format!("{} endpoint failed", self.stage),
		}
	}

	/// Converts the context into the crate error matching [`ExchangeErrorContext::classify`].
	pub fn into_error(self) -> Error {
		match self.classify() {
			ExchangeErrorKind::InvalidRequest => Error::InvalidRequest { reason: self.message() },
			ExchangeErrorKind::NotAuthorized => Error::NotAuthorized { reason: self.message() },
			ExchangeErrorKind::Transient => TransientError::Backend {
				message: self.message(),
				status: self.http_status,
				retry_after: self.retry_after,
			}
			.into(),
		}
	}
}

// FastAPI puts a string, an object, or a list of validation errors under `detail`.
fn extract_detail(body: Value) -> Option<String> {
	match body {
		Value::Object(mut map) => match map.remove("detail")? {
			Value::String(text) => Some(text),
			Value::Null => None,
			other => Some(other.to_string()),
		},
		_ => None,
	}
}

fn truncate_preview(body: String) -> String {
	if body.chars().count() <= ExchangeErrorContext::BODY_PREVIEW_LIMIT {
		return body;
	}

	let mut buf = String::new();

	for (idx, ch) in body.chars().enumerate() {
		if idx >= ExchangeErrorContext::BODY_PREVIEW_LIMIT {
			buf.push('…');

			break;
		}
		buf.push(ch);
	}

	buf
}
