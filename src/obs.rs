//! Optional observability helpers for handshakes and backend calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `integration_connect.handshake` with the
//!   `stage` and `provider` fields, plus debug events for session transitions and discarded late
//!   callbacks.
//! - Enable `metrics` to increment the `integration_connect_handshake_total` counter for every
//!   attempt/success/failure, labeled by `stage` + `outcome`, and
//!   `integration_connect_transition_total` for every session transition, labeled by `to`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to an instrumented stage.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Records success or failure for a finished stage.
pub fn record_result<T>(stage: &'static str, result: &Result<T>) {
	match result {
		Ok(_) => record_flow_outcome(stage, FlowOutcome::Success),
		Err(_) => record_flow_outcome(stage, FlowOutcome::Failure),
	}
}
