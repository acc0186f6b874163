//! Thread-safe in-memory [`TokenCache`] implementation.

// self
use crate::{_prelude::*, auth::BearerToken, cache::TokenCache};

/// Token cache that keeps the current token in-process behind a read-write lock.
///
/// Clones share the same slot, so one cache can be handed to several clients.
#[derive(Clone, Debug, Default)]
pub struct MemoryTokenCache(Arc<RwLock<Option<BearerToken>>>);
impl MemoryTokenCache {
	/// Creates a cache pre-seeded with `token`.
	pub fn with_token(token: BearerToken) -> Self {
		Self(Arc::new(RwLock::new(Some(token))))
	}
}
impl TokenCache for MemoryTokenCache {
	fn set(&self, token: BearerToken) {
		*self.0.write() = Some(token);
	}

	fn get(&self) -> Option<BearerToken> {
		self.0.read().clone()
	}

	fn clear(&self) {
		self.0.write().take();
	}
}
