//! Authenticated request client with a single refresh-and-retry on authorization failure.
//!
//! [`ApiClient::send`] snapshots the [`TokenCache`], attaches the token as a bearer
//! credential, and dispatches through the configured [`Transport`]. A 401 is judged by
//! [`policy::should_refresh`] against that snapshot. When a refresh is warranted the client
//! asks the [`CredentialSource`] for a new token, stores it in the cache for every later
//! call, and dispatches once more. Whatever the second dispatch returns is final. When the
//! credential source fails, the original 401 response is returned untouched.
//!
//! The typed verb helpers in [`verbs`] sit on top of `send` and turn statuses into
//! [`Error`] variants.

pub mod policy;
pub mod verbs;

mod metrics;

pub use metrics::RefreshMetrics;
pub use policy::{Attempt, should_refresh};

// crates.io
use http::{
	HeaderMap, HeaderName, HeaderValue, StatusCode,
	header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
// self
use crate::{
	_prelude::*,
	auth::{BearerToken, CredentialError, CredentialSource, TokenSnapshot},
	cache::TokenCache,
	config::ClientConfig,
	error::{ConfigError, TransportError},
	http::{OutboundRequest, Transport, TransportResponse, Verb},
	obs::{self, CallOutcome, CallSpan},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestApiClient = ApiClient<ReqwestTransport>;

/// Immutable description of one outbound call.
///
/// The request carries no retry state; [`Attempt`] is threaded through dispatch instead, so
/// one value can be sent any number of times, from any number of tasks.
#[derive(Clone, Debug)]
pub struct PendingRequest {
	verb: Verb,
	path: String,
	body: Option<Vec<u8>>,
	headers: HeaderMap,
}
impl PendingRequest {
	/// Creates a body-less request for `path` (relative to the API root, query allowed).
	pub fn new(verb: Verb, path: impl Into<String>) -> Self {
		Self { verb, path: path.into(), body: None, headers: HeaderMap::new() }
	}

	/// Serializes `body` as the JSON payload.
	pub fn with_json<B>(mut self, body: &B) -> Result<Self>
	where
		B: ?Sized + Serialize,
	{
		self.body = Some(serde_json::to_vec(body).map_err(TransportError::Encode)?);

		Ok(self)
	}

	/// Adds an extra header. `Authorization` is always overwritten at dispatch.
	pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);

		self
	}

	/// Returns the verb.
	pub fn verb(&self) -> Verb {
		self.verb
	}

	/// Returns the relative path.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Returns the serialized body, if any.
	pub fn body(&self) -> Option<&[u8]> {
		self.body.as_deref()
	}

	fn to_outbound(&self, url: Url, token: Option<&BearerToken>) -> Result<OutboundRequest> {
		let mut headers = self.headers.clone();

		headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

		if self.body.is_some() && !headers.contains_key(CONTENT_TYPE) {
			headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		}

		match token {
			Some(token) => {
				let mut value = HeaderValue::try_from(token.authorization())
					.map_err(|source| ConfigError::InvalidHeader { name: "authorization", source })?;

				value.set_sensitive(true);
				headers.insert(AUTHORIZATION, value);
			},
			None => {
				headers.remove(AUTHORIZATION);
			},
		}

		Ok(OutboundRequest { method: self.verb.method(), url, headers, body: self.body.clone() })
	}
}

/// Client for the HackPSU API.
///
/// The client owns the transport, a handle to the shared token cache, and the credential
/// source. Cloning is cheap and clones share all three, so a refresh done through one clone
/// benefits every other.
pub struct ApiClient<T>
where
	T: ?Sized + Transport,
{
	/// Transport used for every outbound call.
	pub transport: Arc<T>,
	/// Shared token cache read at dispatch and written on refresh.
	pub cache: Arc<dyn TokenCache>,
	/// Identity provider consulted on refresh.
	pub credentials: Arc<dyn CredentialSource>,
	/// Validated client settings.
	pub config: ClientConfig,
	/// Shared counters for refresh outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
	refresh_guard: Arc<AsyncMutex<()>>,
}
impl<T> ApiClient<T>
where
	T: ?Sized + Transport,
{
	/// Creates a client over a caller-provided transport.
	pub fn with_transport(
		config: ClientConfig,
		cache: Arc<dyn TokenCache>,
		credentials: Arc<dyn CredentialSource>,
		transport: impl Into<Arc<T>>,
	) -> Self {
		Self {
			transport: transport.into(),
			cache,
			credentials,
			config,
			refresh_metrics: Default::default(),
			refresh_guard: Default::default(),
		}
	}

	/// Dispatches `request` with the cached token, refreshing and retrying once on a
	/// qualifying 401.
	///
	/// Any status is returned as-is; only transport failures and configuration problems
	/// surface as errors here.
	pub async fn send(&self, request: &PendingRequest) -> Result<TransportResponse> {
		let span = CallSpan::request(request.verb, &request.path);

		span.instrument(async move {
			let url = self.config.resolve(&request.path)?;
			let mut snapshot = TokenSnapshot::new(self.cache.get());
			let mut attempt = Attempt::First;

			loop {
				let outbound = request.to_outbound(url.clone(), snapshot.token())?;
				let response = self.transport.execute(outbound).await?;

				if response.status != StatusCode::UNAUTHORIZED {
					return Ok(response);
				}
				if !should_refresh(&snapshot, response.status, attempt, OffsetDateTime::now_utc())
				{
					obs::note_refresh_declined(response.status.as_u16(), attempt.is_retry());
					self.refresh_metrics.record_declined();

					return Ok(response);
				}

				match self.refresh(&snapshot).await {
					Ok(token) => {
						snapshot = TokenSnapshot::new(Some(token));
						attempt = Attempt::Retry;
						self.refresh_metrics.record_retry();
					},
					Err(_) => return Ok(response),
				}
			}
		})
		.await
	}

	/// Clears the cached token and ends the credential source's session.
	pub fn sign_out(&self) {
		self.cache.clear();
		self.credentials.sign_out();
	}

	async fn refresh(&self, snapshot: &TokenSnapshot) -> Result<BearerToken, CredentialError> {
		let coalesce = self.config.coalesce_refreshes;
		let span = CallSpan::refresh(coalesce);

		self.refresh_metrics.record_attempt();
		obs::record_refresh_outcome(CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				if !coalesce {
					return self.fetch_and_store().await;
				}

				let _singleflight = self.refresh_guard.lock().await;

				// A token stored since the snapshot was minted while this call waited, with or
				// without an expiry.
				match self.cache.get() {
					Some(current) if snapshot.is_superseded_by(&current) => {
						obs::note_refresh_coalesced();
						self.refresh_metrics.record_coalesced();

						Ok(current)
					},
					_ => self.fetch_and_store().await,
				}
			})
			.await;

		match &result {
			Ok(_) => {
				self.refresh_metrics.record_success();
				obs::record_refresh_outcome(CallOutcome::Success);
			},
			Err(err) => {
				obs::note_credential_failure(err);
				self.refresh_metrics.record_failure();
				obs::record_refresh_outcome(CallOutcome::Failure);
			},
		}

		result
	}

	async fn fetch_and_store(&self) -> Result<BearerToken, CredentialError> {
		let token = self.credentials.current_token().await?;

		self.cache.set(token.clone());

		Ok(token)
	}
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestTransport> {
	/// Creates a client that provisions its own reqwest transport from `config`.
	pub fn new(
		config: ClientConfig,
		cache: Arc<dyn TokenCache>,
		credentials: Arc<dyn CredentialSource>,
	) -> Result<Self> {
		let transport = ReqwestTransport::from_config(&config)?;

		Ok(Self::with_transport(config, cache, credentials, transport))
	}
}
impl<T> Clone for ApiClient<T>
where
	T: ?Sized + Transport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			cache: self.cache.clone(),
			credentials: self.credentials.clone(),
			config: self.config.clone(),
			refresh_metrics: self.refresh_metrics.clone(),
			refresh_guard: self.refresh_guard.clone(),
		}
	}
}
impl<T> Debug for ApiClient<T>
where
	T: ?Sized + Transport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("config", &self.config)
			.field("token_cached", &self.cache.get().is_some())
			.finish()
	}
}
