//! Handshake configuration.

// std
use std::time::Duration as StdDuration;
// self
use crate::{_prelude::*, surface::WindowFeatures};

/// Tunables for the handshake coordinator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandshakeConfig {
	/// Delay between checks of the consent window, in milliseconds.
	pub poll_interval_ms: u64,
	/// Presentation hints for the consent window.
	pub window: WindowFeatures,
}
impl HandshakeConfig {
	/// Default poll period.
	pub const DEFAULT_POLL_INTERVAL_MS: u64 = 200;

	/// Overrides the poll period; sub-millisecond values round up to one millisecond.
	pub fn with_poll_interval(mut self, interval: StdDuration) -> Self {
		self.poll_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX).max(1);

		self
	}

	/// Overrides the consent window hints.
	pub fn with_window(mut self, window: WindowFeatures) -> Self {
		self.window = window;

		self
	}

	/// Poll period as a [`std::time::Duration`], never zero.
	pub fn poll_interval(&self) -> StdDuration {
		StdDuration::from_millis(self.poll_interval_ms.max(1))
	}
}
impl Default for HandshakeConfig {
	fn default() -> Self {
		Self { poll_interval_ms: Self::DEFAULT_POLL_INTERVAL_MS, window: WindowFeatures::default() }
	}
}
