//! Bearer token values, redacted secrets, and dispatch-time snapshots.

// crates.io
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
// self
use crate::{_prelude::*, auth::CredentialError};

/// Redacted secret wrapper keeping credential material out of logs.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a raw secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the raw value. Never log the result.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("TokenSecret(<redacted>)")
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Opaque bearer credential plus the instant it stops being valid.
///
/// Tokens are replaced wholesale on refresh and never mutated in place, so the type only
/// offers constructors and read accessors.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BearerToken {
	secret: TokenSecret,
	expires_at: Option<OffsetDateTime>,
}
impl BearerToken {
	/// Creates a token with a known expiry instant.
	pub fn new(secret: impl Into<String>, expires_at: OffsetDateTime) -> Self {
		Self { secret: TokenSecret::new(secret), expires_at: Some(expires_at) }
	}

	/// Creates a token whose expiry is unknown.
	///
	/// Such tokens always count as stale when the API rejects them.
	pub fn without_expiry(secret: impl Into<String>) -> Self {
		Self { secret: TokenSecret::new(secret), expires_at: None }
	}

	/// Parses a compact JWT and takes the expiry from its `exp` claim, if present.
	///
	/// The signature is not verified; the API does that. Only the payload shape is checked.
	pub fn from_jwt(raw: impl Into<String>) -> Result<Self, CredentialError> {
		#[derive(Deserialize)]
		struct Claims {
			exp: Option<i64>,
		}

		let raw = raw.into();
		let segments = raw.splitn(3, '.').collect::<Vec<_>>();
		let payload = match segments.as_slice() {
			[_, payload, signature] if !payload.is_empty() && !signature.contains('.') => *payload,
			_ => {
				return Err(CredentialError::MalformedToken {
					reason: "JWT must have three segments".into(),
				});
			},
		};
		let decoded = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).map_err(|e| {
			CredentialError::MalformedToken { reason: format!("JWT payload is not base64url: {e}") }
		})?;
		let claims = serde_json::from_slice::<Claims>(&decoded).map_err(|e| {
			CredentialError::MalformedToken { reason: format!("JWT payload is not JSON: {e}") }
		})?;
		let expires_at = claims
			.exp
			.map(OffsetDateTime::from_unix_timestamp)
			.transpose()
			.map_err(|_| CredentialError::MalformedToken { reason: "JWT exp is out of range".into() })?;

		Ok(Self { secret: TokenSecret::new(raw), expires_at })
	}

	/// Returns the secret. Callers must avoid logging the exposed value.
	pub fn secret(&self) -> &TokenSecret {
		&self.secret
	}

	/// Returns the expiry instant, if known.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.expires_at
	}

	/// Returns `true` when the expiry is unknown or not after `now`.
	pub fn is_stale_at(&self, now: OffsetDateTime) -> bool {
		match self.expires_at {
			Some(instant) => instant <= now,
			None => true,
		}
	}

	/// Formats the `Authorization` header value.
	pub(crate) fn authorization(&self) -> String {
		format!("Bearer {}", self.secret.expose())
	}
}
impl Debug for BearerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BearerToken")
			.field("secret", &"<redacted>")
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Copy of the cached token taken when a request is dispatched.
///
/// Refresh decisions read this snapshot, never a live re-read of the cache, so a refresh made
/// by a concurrent call does not change how this call is judged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenSnapshot(Option<BearerToken>);
impl TokenSnapshot {
	/// Wraps an optional token.
	pub fn new(token: Option<BearerToken>) -> Self {
		Self(token)
	}

	/// Returns the captured token, if any.
	pub fn token(&self) -> Option<&BearerToken> {
		self.0.as_ref()
	}

	/// Returns `true` when the token is absent, has no expiry, or expired at or before `now`.
	pub fn is_stale_at(&self, now: OffsetDateTime) -> bool {
		self.0.as_ref().is_none_or(|token| token.is_stale_at(now))
	}

	/// Returns `true` when `current` is a different token than the one captured.
	pub fn is_superseded_by(&self, current: &BearerToken) -> bool {
		self.0.as_ref().is_none_or(|captured| captured.secret != current.secret)
	}
}
impl From<Option<BearerToken>> for TokenSnapshot {
	fn from(token: Option<BearerToken>) -> Self {
		Self(token)
	}
}
