//! Session-backed credential source that trades a long-lived refresh token for short-lived
//! ID tokens at a secure-token endpoint.
//!
//! The exchange is a form-encoded `grant_type=refresh_token` POST. Providers answer with
//! `expires_in` either as a JSON number or as a numeric string, so both are accepted. A
//! rotated refresh token replaces the stored one only if the session was not signed out or
//! replaced while the exchange was in flight.

// crates.io
use http::{
	HeaderMap, HeaderValue, Method,
	header::{ACCEPT, CONTENT_TYPE},
};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::{BearerToken, CredentialError, CredentialFuture, CredentialSource, TokenSecret},
	config::SessionConfig,
	http::{OutboundRequest, Transport},
};

/// Credential source that owns the signed-in user's session refresh token.
pub struct SessionCredentialSource<T>
where
	T: ?Sized + Transport,
{
	transport: Arc<T>,
	config: SessionConfig,
	refresh_token: Arc<Mutex<Option<TokenSecret>>>,
}
impl<T> SessionCredentialSource<T>
where
	T: ?Sized + Transport,
{
	/// Creates a source with no active session.
	pub fn new(config: SessionConfig, transport: impl Into<Arc<T>>) -> Self {
		Self { transport: transport.into(), config, refresh_token: Default::default() }
	}

	/// Starts (or replaces) the session with a refresh token obtained at sign-in.
	pub fn sign_in(&self, refresh_token: impl Into<String>) {
		*self.refresh_token.lock() = Some(TokenSecret::new(refresh_token));
	}

	/// Returns `true` while a session refresh token is held.
	pub fn is_signed_in(&self) -> bool {
		self.refresh_token.lock().is_some()
	}

	async fn exchange(&self) -> Result<BearerToken, CredentialError> {
		let used = self.refresh_token.lock().clone().ok_or(CredentialError::NoSession)?;
		let body = form_urlencoded::Serializer::new(String::new())
			.append_pair("grant_type", "refresh_token")
			.append_pair("refresh_token", used.expose())
			.finish();
		let mut headers = HeaderMap::new();

		headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/x-www-form-urlencoded"));
		headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

		let request = OutboundRequest {
			method: Method::POST,
			url: self.config.keyed_endpoint(),
			headers,
			body: Some(body.into_bytes()),
		};
		let response = self.transport.execute(request).await?;

		if !response.status.is_success() {
			let status = response.status.as_u16();

			// The provider refused this refresh token, so the session is over.
			if matches!(status, 400 | 401 | 403) {
				self.forget_if_current(&used);
			}

			return Err(CredentialError::Exchange {
				message: provider_message(&response.body)
					.unwrap_or_else(|| "token exchange failed".into()),
				status,
			});
		}

		let mut de = serde_json::Deserializer::from_slice(&response.body);
		let payload: SessionTokenResponse = serde_path_to_error::deserialize(&mut de)
			.map_err(|source| CredentialError::Decode { source })?;
		let raw = payload.id_token.or(payload.access_token).ok_or_else(|| {
			CredentialError::MalformedToken { reason: "response carries no token".into() }
		})?;
		let expires_in = payload.expires_in.seconds()?;

		if expires_in <= 0 {
			return Err(CredentialError::MalformedToken {
				reason: "expires_in must be positive".into(),
			});
		}
		if let Some(rotated) = payload.refresh_token {
			let mut guard = self.refresh_token.lock();

			if guard.as_ref() == Some(&used) {
				*guard = Some(TokenSecret::new(rotated));
			}
		}

		Ok(BearerToken::new(raw, expiry_after(OffsetDateTime::now_utc(), expires_in)?))
	}

	fn forget_if_current(&self, used: &TokenSecret) {
		let mut guard = self.refresh_token.lock();

		if guard.as_ref() == Some(used) {
			guard.take();
		}
	}
}
impl<T> CredentialSource for SessionCredentialSource<T>
where
	T: ?Sized + Transport,
{
	fn current_token(&self) -> CredentialFuture<'_, BearerToken> {
		Box::pin(self.exchange())
	}

	fn sign_out(&self) {
		self.refresh_token.lock().take();
	}
}
impl<T> Debug for SessionCredentialSource<T>
where
	T: ?Sized + Transport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SessionCredentialSource")
			.field("config", &self.config)
			.field("signed_in", &self.is_signed_in())
			.finish()
	}
}

#[derive(Deserialize)]
struct SessionTokenResponse {
	#[serde(default)]
	id_token: Option<String>,
	#[serde(default)]
	access_token: Option<String>,
	#[serde(default)]
	refresh_token: Option<String>,
	expires_in: ExpiresIn,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExpiresIn {
	Number(i64),
	Text(String),
}
impl ExpiresIn {
	fn seconds(&self) -> Result<i64, CredentialError> {
		match self {
			Self::Number(value) => Ok(*value),
			Self::Text(raw) => raw.trim().parse().map_err(|_| CredentialError::MalformedToken {
				reason: format!("expires_in `{raw}` is not a number"),
			}),
		}
	}
}

fn expiry_after(now: OffsetDateTime, seconds: i64) -> Result<OffsetDateTime, CredentialError> {
	now.checked_add(Duration::seconds(seconds)).ok_or_else(|| CredentialError::MalformedToken {
		reason: "expires_in is out of range".into(),
	})
}

fn provider_message(body: &[u8]) -> Option<String> {
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum ErrorBody {
		Nested { error: NestedError },
		Flat { error: String, error_description: Option<String> },
	}
	#[derive(Deserialize)]
	struct NestedError {
		message: String,
	}

	match serde_json::from_slice::<ErrorBody>(body).ok()? {
		ErrorBody::Nested { error } => Some(error.message),
		ErrorBody::Flat { error, error_description } => Some(match error_description {
			Some(description) => format!("{error}: {description}"),
			None => error,
		}),
	}
}
