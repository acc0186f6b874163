// self
use crate::{_prelude::*, auth::CredentialError, http::Verb};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// Span wrapper used around every request and refresh.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a span for one request.
	pub fn request(verb: Verb, path: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("hackpsu_api.request", verb = verb.as_str(), path);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (verb, path);

			Self {}
		}
	}

	/// Creates a span for one credential refresh.
	pub fn refresh(coalesced: bool) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("hackpsu_api.refresh", coalesced);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = coalesced;

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
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

/// Notes that a 401 was not retried because the attached token still looked valid or the
/// retry budget was spent.
pub fn note_refresh_declined(status: u16, retried: bool) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(status, retried, "Authorization failure is not eligible for a refresh.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (status, retried);
	}
}

/// Notes that a refresh reused a token another call stored while this one waited.
pub fn note_refresh_coalesced() {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!("Reusing a token refreshed by a concurrent call.");
	}
}

/// Notes that the credential source could not produce a token.
pub fn note_credential_failure(err: &CredentialError) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(error = %err, "Credential source failed during refresh.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = err;
	}
}
