// self
use crate::{http::Verb, obs::CallOutcome};

/// Records a verb-level call outcome via the global metrics recorder (when enabled).
pub fn record_request_outcome(verb: Verb, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"hackpsu_api_request_total",
			"verb" => verb.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (verb, outcome);
	}
}

/// Records a credential refresh outcome via the global metrics recorder (when enabled).
pub fn record_refresh_outcome(outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("hackpsu_api_refresh_total", "outcome" => outcome.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}
