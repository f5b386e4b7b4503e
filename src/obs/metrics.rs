// self
use crate::{handshake::SessionStatus, obs::FlowOutcome};

/// Records a stage outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(stage: &'static str, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"integration_connect_handshake_total",
			"stage" => stage,
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (stage, outcome);
	}
}

/// Counts session transitions by target status (when enabled).
pub fn record_transition(to: SessionStatus) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("integration_connect_transition_total", "to" => to.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = to;
	}
}
