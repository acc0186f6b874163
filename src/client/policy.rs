//! Refresh decision for a failed call.
//!
//! The decision is pure: it looks at the token snapshot taken when the request was
//! dispatched, the response status, and which attempt produced that response. It never
//! consults the live cache or the server's reason for the rejection, so a token that still
//! looks valid locally is not refreshed even if the API revoked it. That case fails fast
//! instead.

// crates.io
use http::StatusCode;
// self
use crate::{_prelude::*, auth::TokenSnapshot};

/// Which dispatch of a request produced a response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attempt {
	/// Original dispatch; one retry is still available.
	First,
	/// Dispatch after a refresh; the retry budget is spent.
	Retry,
}
impl Attempt {
	/// Returns `true` once the single permitted retry has been used.
	pub const fn is_retry(self) -> bool {
		matches!(self, Attempt::Retry)
	}
}

/// Decides whether a response warrants refreshing the credential and dispatching again.
///
/// Returns `true` only when all of these hold:
/// - `attempt` is [`Attempt::First`],
/// - `status` is 401,
/// - the snapshot has no token, its token has no expiry, or that expiry is not after `now`.
pub fn should_refresh(
	snapshot: &TokenSnapshot,
	status: StatusCode,
	attempt: Attempt,
	now: OffsetDateTime,
) -> bool {
	if attempt.is_retry() || status != StatusCode::UNAUTHORIZED {
		return false;
	}

	snapshot.is_stale_at(now)
}
