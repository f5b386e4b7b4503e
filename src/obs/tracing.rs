// self
use crate::{
	_prelude::*,
	handshake::{SessionId, SessionStatus},
};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// A span builder used by backend calls and handshake stages.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Creates a new span tagged with the provided stage and provider.
	pub fn new(stage: &'static str, provider: Option<&str>) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"integration_connect.handshake",
				stage,
				provider = provider.unwrap_or("-")
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (stage, provider);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a debug event for a session transition.
pub fn trace_transition(session: SessionId, from: SessionStatus, to: SessionStatus) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(
			session = session.get(),
			from = from.as_str(),
			to = to.as_str(),
			"session transition"
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (session, from, to);
	}
}

/// Emits a debug event for a callback that arrived after its session was replaced.
pub fn trace_stale_callback(session: SessionId, current: SessionId, callback: &'static str) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(
			session = session.get(),
			current = current.get(),
			callback,
			"discarding late callback"
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (session, current, callback);
	}
}
