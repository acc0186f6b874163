// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for the refresh-on-401 path of one client and all of its clones.
///
/// `attempts` splits into `successes` and `failures`; `coalesced` is the share of successes
/// served from another call's refresh. `retries` counts requests dispatched a second time,
/// and `declined` counts 401 responses returned without a refresh.
#[derive(Debug, Default)]
pub struct RefreshMetrics {
	attempts: AtomicU64,
	success: AtomicU64,
	failure: AtomicU64,
	coalesced: AtomicU64,
	retries: AtomicU64,
	declined: AtomicU64,
}
impl RefreshMetrics {
	/// Refreshes started.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Refreshes that produced a token, coalesced reuses included.
	pub fn successes(&self) -> u64 {
		self.success.load(Ordering::Relaxed)
	}

	/// Refreshes where the credential source failed.
	pub fn failures(&self) -> u64 {
		self.failure.load(Ordering::Relaxed)
	}

	/// Refreshes satisfied by a token another call had just stored.
	pub fn coalesced(&self) -> u64 {
		self.coalesced.load(Ordering::Relaxed)
	}

	/// Requests re-dispatched with a refreshed token.
	pub fn retries(&self) -> u64 {
		self.retries.load(Ordering::Relaxed)
	}

	/// 401 responses handed back without a refresh, either because the token still looked
	/// valid or because the request had already been retried.
	pub fn declined(&self) -> u64 {
		self.declined.load(Ordering::Relaxed)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_success(&self) {
		self.success.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failure.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_coalesced(&self) {
		self.coalesced.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_retry(&self) {
		self.retries.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_declined(&self) {
		self.declined.fetch_add(1, Ordering::Relaxed);
	}
}
