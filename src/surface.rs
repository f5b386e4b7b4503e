//! Consent surface contracts: the window a provider's consent page is shown in.
//!
//! Browsers can only detect consent completion by noticing that the popup closed, so the
//! coordinator polls [`ConsentWindow::is_closed`]. Environments without popups map their own
//! completion signal (redirect callback, deep link) onto the same contract; [`SignalSurface`] is
//! the built-in adapter for that.

pub mod signal;

pub use signal::*;

// self
use crate::_prelude::*;

/// Opens consent windows for authorization URLs.
pub trait ConsentSurface
where
	Self: Send + Sync,
{
	/// Shows `url` to the user and returns a handle used to detect closure.
	fn open(
		&self,
		url: &Url,
		features: &WindowFeatures,
	) -> Result<Box<dyn ConsentWindow>, SurfaceError>;
}

/// Handle to an open consent window.
///
/// The coordinator owns the handle exclusively while the session awaits user action and calls
/// [`ConsentWindow::close`] before dropping it.
pub trait ConsentWindow
where
	Self: Send,
{
	/// Returns true once the window is gone, whether or not the user consented.
	///
	/// Polled while the coordinator holds its session lock; implementations must not call back
	/// into the [`Coordinator`](crate::handshake::Coordinator).
	fn is_closed(&self) -> bool;

	/// Closes the window if it is still open. Must be idempotent.
	///
	/// Called after the coordinator released its session lock, so implementations may call back
	/// into it, e.g. [`Coordinator::cancel`](crate::handshake::Coordinator::cancel).
	fn close(&mut self);
}

/// Presentation hints for the consent window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowFeatures {
	/// Window title; the coordinator fills in `<Provider> Authorization` when empty.
	pub title: String,
	/// Width in CSS pixels.
	pub width: u32,
	/// Height in CSS pixels.
	pub height: u32,
}
impl WindowFeatures {
	/// Returns a copy titled after the provider when no title was configured.
	pub fn titled_for(&self, display_name: &str) -> Self {
		let mut features = self.clone();

		if features.title.is_empty() {
			features.title = format!("{display_name} Authorization");
		}

		features
	}
}
impl Default for WindowFeatures {
	fn default() -> Self {
		Self { title: String::new(), width: 600, height: 600 }
	}
}

/// Failures raised by consent surfaces.
#[derive(Debug, ThisError)]
pub enum SurfaceError {
	/// The environment refused to open a window (e.g. popup blocker).
	#[error("Consent window for {url} could not be opened: {reason}.")]
	Blocked {
		/// URL that was being opened.
		url: String,
		/// Surface-supplied reason.
		reason: String,
	},
	/// The surface failed for another reason.
	#[error("Consent surface failed.")]
	Other {
		/// Underlying failure.
		#[source]
		source: Box<dyn std::error::Error + Send + Sync>,
	},
}
impl SurfaceError {
	/// Wraps an arbitrary surface failure.
	pub fn other(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Other { source: Box::new(src) }
	}
}
