//! Token cache contract and the built-in in-memory cache.
//!
//! The cache is the only state shared by every in-flight request. Reads happen when a request
//! is dispatched and writes happen when any request refreshes, so implementations must make
//! each `set` visible to all later `get` calls as soon as it returns.

pub mod memory;

pub use memory::MemoryTokenCache;

// self
use crate::auth::BearerToken;

/// Process-wide holder of the current bearer token.
///
/// Semantics are last-write-wins. `clear` is idempotent.
pub trait TokenCache
where
	Self: Send + Sync,
{
	/// Replaces the held token.
	fn set(&self, token: BearerToken);

	/// Returns a copy of the held token, if any.
	fn get(&self) -> Option<BearerToken>;

	/// Drops the held token.
	fn clear(&self);
}
