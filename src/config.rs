//! Client and session configuration with validating builders.
//!
//! Both configs deserialize from any serde format (durations as whole seconds) and run the
//! same validation as their builders, so a config file can never produce a client that the
//! builder would have refused.

// self
use crate::{_prelude::*, error::ConfigError};

/// Settings for [`ApiClient`](crate::client::ApiClient).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ClientConfigRepr", into = "ClientConfigRepr")]
pub struct ClientConfig {
	/// API root every request path is joined onto. Always ends with `/`.
	pub base_url: Url,
	/// Per-request transport timeout.
	pub timeout: Duration,
	/// Optional `User-Agent` override.
	pub user_agent: Option<String>,
	/// Coalesces concurrent refreshes into a single credential-source call when enabled.
	///
	/// Waiters reuse whichever token replaced the one they were rejected with.
	pub coalesce_refreshes: bool,
}
impl ClientConfig {
	/// Default per-request timeout.
	pub const DEFAULT_TIMEOUT: Duration = Duration::seconds(30);

	/// Returns a builder for the provided API root.
	pub fn builder(base_url: Url) -> ClientConfigBuilder {
		ClientConfigBuilder::new(base_url)
	}

	/// Resolves a request path (optionally carrying a query string) against the base URL.
	///
	/// Leading slashes are ignored so `/users` and `users` both land under the base path.
	/// Absolute URLs and paths that climb out of the base path are refused, so the cached
	/// bearer token only ever travels to the configured API.
	pub fn resolve(&self, path: &str) -> Result<Url, ConfigError> {
		let outside = |reason| ConfigError::PathOutsideBase { path: path.to_owned(), reason };
		let relative = path.trim_start_matches('/');

		if Url::parse(relative).is_ok() {
			return Err(outside("absolute URLs are not accepted"));
		}

		let url = self
			.base_url
			.join(relative)
			.map_err(|source| ConfigError::InvalidPath { path: path.to_owned(), source })?;

		if url.origin() != self.base_url.origin() {
			return Err(outside("origin differs from the base URL"));
		}
		if !url.path().starts_with(self.base_url.path()) {
			return Err(outside("path climbs above the base path"));
		}

		Ok(url)
	}
}

/// Builder for [`ClientConfig`].
#[derive(Clone, Debug)]
pub struct ClientConfigBuilder {
	base_url: Url,
	timeout: Duration,
	user_agent: Option<String>,
	coalesce_refreshes: bool,
}
impl ClientConfigBuilder {
	fn new(base_url: Url) -> Self {
		Self {
			base_url,
			timeout: ClientConfig::DEFAULT_TIMEOUT,
			user_agent: None,
			coalesce_refreshes: false,
		}
	}

	/// Overrides the per-request timeout (defaults to 30 seconds).
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Sets a custom `User-Agent`.
	pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = Some(user_agent.into());

		self
	}

	/// Enables or disables refresh coalescing (disabled by default).
	pub fn coalesce_refreshes(mut self, enabled: bool) -> Self {
		self.coalesce_refreshes = enabled;

		self
	}

	/// Validates the settings and produces a [`ClientConfig`].
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let base_url = normalize_base(self.base_url)?;

		if !self.timeout.is_positive() {
			return Err(ConfigError::NonPositiveTimeout);
		}

		Ok(ClientConfig {
			base_url,
			timeout: self.timeout,
			user_agent: self.user_agent,
			coalesce_refreshes: self.coalesce_refreshes,
		})
	}
}

#[derive(Serialize, Deserialize)]
struct ClientConfigRepr {
	base_url: Url,
	#[serde(default = "default_timeout_secs")]
	timeout_secs: u32,
	#[serde(default)]
	user_agent: Option<String>,
	#[serde(default)]
	coalesce_refreshes: bool,
}
impl TryFrom<ClientConfigRepr> for ClientConfig {
	type Error = ConfigError;

	fn try_from(repr: ClientConfigRepr) -> Result<Self, Self::Error> {
		let mut builder = ClientConfig::builder(repr.base_url)
			.timeout(Duration::seconds(repr.timeout_secs.into()))
			.coalesce_refreshes(repr.coalesce_refreshes);

		if let Some(user_agent) = repr.user_agent {
			builder = builder.user_agent(user_agent);
		}

		builder.build()
	}
}
impl From<ClientConfig> for ClientConfigRepr {
	fn from(config: ClientConfig) -> Self {
		Self {
			base_url: config.base_url,
			timeout_secs: u32::try_from(config.timeout.whole_seconds()).unwrap_or(u32::MAX),
			user_agent: config.user_agent,
			coalesce_refreshes: config.coalesce_refreshes,
		}
	}
}

fn default_timeout_secs() -> u32 {
	ClientConfig::DEFAULT_TIMEOUT.whole_seconds() as u32
}

/// Settings for [`SessionCredentialSource`](crate::auth::SessionCredentialSource).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
	/// Secure-token endpoint that trades a session refresh token for an ID token.
	pub token_endpoint: Url,
	/// Public project key appended as the `key` query parameter.
	pub api_key: String,
}
impl SessionConfig {
	/// Default Firebase secure-token endpoint used by the HackPSU identity project.
	pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://securetoken.googleapis.com/v1/token";

	/// Builds a config for the default endpoint.
	pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
		let token_endpoint = Url::parse(Self::DEFAULT_TOKEN_ENDPOINT).map_err(|source| {
			ConfigError::InvalidPath { path: Self::DEFAULT_TOKEN_ENDPOINT.into(), source }
		})?;

		Ok(Self { token_endpoint, api_key: api_key.into() })
	}

	/// Overrides the token endpoint.
	pub fn with_token_endpoint(mut self, endpoint: Url) -> Self {
		self.token_endpoint = endpoint;

		self
	}

	/// Returns the endpoint with the `key` query parameter applied.
	pub(crate) fn keyed_endpoint(&self) -> Url {
		let mut url = self.token_endpoint.clone();

		url.query_pairs_mut().append_pair("key", &self.api_key);

		url
	}
}
impl Debug for SessionConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SessionConfig")
			.field("token_endpoint", &self.token_endpoint.as_str())
			.field("api_key_set", &!self.api_key.is_empty())
			.finish()
	}
}

fn normalize_base(mut url: Url) -> Result<Url, ConfigError> {
	if !matches!(url.scheme(), "http" | "https") {
		return Err(ConfigError::InvalidBaseUrl {
			url: url.to_string(),
			reason: "scheme must be http or https",
		});
	}
	if url.cannot_be_a_base() {
		return Err(ConfigError::InvalidBaseUrl {
			url: url.to_string(),
			reason: "URL cannot be a base",
		});
	}
	if url.query().is_some() || url.fragment().is_some() {
		return Err(ConfigError::InvalidBaseUrl {
			url: url.to_string(),
			reason: "base URL must not carry a query or fragment",
		});
	}
	if !url.path().ends_with('/') {
		let path = format!("{}/", url.path());

		url.set_path(&path);
	}

	Ok(url)
}
