//! Consent surface driven by an out-of-band completion signal.

// std
use std::sync::atomic::{AtomicBool, Ordering};
// self
use crate::{
	_prelude::*,
	surface::{ConsentSurface, ConsentWindow, SurfaceError, WindowFeatures},
};

/// Shared flag flipped when a consent window is closed.
#[derive(Clone, Debug, Default)]
pub struct ConsentSignal(Arc<AtomicBool>);
impl ConsentSignal {
	/// Marks the window as closed. Later calls are no-ops.
	pub fn close(&self) {
		self.0.store(true, Ordering::Release);
	}

	/// Returns true once [`ConsentSignal::close`] was called by anyone holding the signal.
	pub fn is_closed(&self) -> bool {
		self.0.load(Ordering::Acquire)
	}
}

/// Record of a window opened through a [`SignalSurface`].
#[derive(Clone, Debug)]
pub struct OpenedWindow {
	/// Authorization URL the window was opened with.
	pub url: Url,
	/// Presentation hints passed by the coordinator.
	pub features: WindowFeatures,
	/// Signal that closes the window.
	pub signal: ConsentSignal,
}

#[derive(Debug, Default)]
struct SurfaceLog {
	opened: Vec<OpenedWindow>,
	blocked: Option<String>,
}

/// Surface that hands out [`ConsentSignal`]s instead of real windows.
///
/// The host application shows the URL however it likes (system browser, embedded view, QR code)
/// and calls [`ConsentSignal::close`] when its redirect handler or deep link fires. Clones share
/// the same log, so one clone can live in the coordinator and another in the callback handler.
#[derive(Clone, Debug, Default)]
pub struct SignalSurface(Arc<Mutex<SurfaceLog>>);
impl SignalSurface {
	/// Makes subsequent [`ConsentSurface::open`] calls fail with [`SurfaceError::Blocked`].
	pub fn block(&self, reason: impl Into<String>) {
		self.0.lock().blocked = Some(reason.into());
	}

	/// Re-enables window opening after [`SignalSurface::block`].
	pub fn unblock(&self) {
		self.0.lock().blocked = None;
	}

	/// Every window opened so far, oldest first.
	pub fn opened(&self) -> Vec<OpenedWindow> {
		self.0.lock().opened.clone()
	}

	/// Signal of the most recently opened window.
	pub fn latest(&self) -> Option<ConsentSignal> {
		self.0.lock().opened.last().map(|window| window.signal.clone())
	}

	/// Signal of the most recent window whose URL carries `state` as a query parameter.
	pub fn find_by_state(&self, state: &str) -> Option<ConsentSignal> {
		self.0
			.lock()
			.opened
			.iter()
			.rev()
			.find(|window| {
				window.url.query_pairs().any(|(key, value)| key == "state" && value == state)
			})
			.map(|window| window.signal.clone())
	}
}
impl ConsentSurface for SignalSurface {
	fn open(
		&self,
		url: &Url,
		features: &WindowFeatures,
	) -> Result<Box<dyn ConsentWindow>, SurfaceError> {
		let mut log = self.0.lock();

		if let Some(reason) = log.blocked.as_ref() {
			return Err(SurfaceError::Blocked { url: url.to_string(), reason: reason.clone() });
		}

		let signal = ConsentSignal::default();

		log.opened.push(OpenedWindow {
			url: url.clone(),
			features: features.clone(),
			signal: signal.clone(),
		});

		Ok(Box::new(SignalWindow(signal)))
	}
}

struct SignalWindow(ConsentSignal);
impl ConsentWindow for SignalWindow {
	fn is_closed(&self) -> bool {
		self.0.is_closed()
	}

	fn close(&mut self) {
		self.0.close();
	}
}
