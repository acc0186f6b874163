//! Credential sources: where fresh bearer tokens come from when the cached one is rejected.

pub mod session;

pub use session::*;

// self
use crate::{_prelude::*, auth::BearerToken, error::TransportError};

/// Boxed future returned by [`CredentialSource::current_token`].
pub type CredentialFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, CredentialError>> + 'a + Send>>;

/// Identity provider contract consulted by the client during a refresh.
pub trait CredentialSource
where
	Self: Send + Sync,
{
	/// Produces a bearer token for the active session.
	///
	/// Fails with [`CredentialError::NoSession`] when nobody is signed in.
	fn current_token(&self) -> CredentialFuture<'_, BearerToken>;

	/// Ends the active session so later calls fail with [`CredentialError::NoSession`].
	fn sign_out(&self) {}
}

/// Errors raised while obtaining a bearer token.
#[derive(Debug, ThisError)]
pub enum CredentialError {
	/// No session is active.
	#[error("No active session is available to mint a token.")]
	NoSession,
	/// The identity provider refused the exchange.
	#[error("Identity provider rejected the token exchange with HTTP {status}: {message}.")]
	Exchange {
		/// Provider-supplied message, or a generic summary.
		message: String,
		/// HTTP status code returned by the provider.
		status: u16,
	},
	/// The identity provider could not be reached.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The identity provider answered with JSON of the wrong shape.
	#[error("Identity provider returned malformed JSON.")]
	Decode {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// A token was produced but cannot be used.
	#[error("Token is malformed: {reason}.")]
	MalformedToken {
		/// What was wrong with the token.
		reason: String,
	},
}

/// Credential source backed by a single, externally managed token.
///
/// Useful for service accounts and tests. [`sign_out`](CredentialSource::sign_out) drops the
/// token; [`replace`](Self::replace) installs a new one.
#[derive(Debug, Default)]
pub struct StaticCredentialSource(RwLock<Option<BearerToken>>);
impl StaticCredentialSource {
	/// Creates a source that always returns `token`.
	pub fn new(token: BearerToken) -> Self {
		Self(RwLock::new(Some(token)))
	}

	/// Creates a source with no session.
	pub fn empty() -> Self {
		Self::default()
	}

	/// Swaps in a new token.
	pub fn replace(&self, token: BearerToken) {
		*self.0.write() = Some(token);
	}
}
impl CredentialSource for StaticCredentialSource {
	fn current_token(&self) -> CredentialFuture<'_, BearerToken> {
		let token = self.0.read().clone();

		Box::pin(async move { token.ok_or(CredentialError::NoSession) })
	}

	fn sign_out(&self) {
		self.0.write().take();
	}
}
