//! Client-level error types shared by the request pipeline, verb helpers, and resources.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error returned by [`ApiClient`](crate::client::ApiClient) calls.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem detected before dispatch.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The call could not be completed (network, timeout, body codec).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// An authorization failure persisted after the single permitted refresh, or the request
	/// was not eligible for a refresh at all.
	#[error("The API rejected the credential with HTTP {status}.")]
	AuthRefreshExhausted {
		/// Status code of the final response.
		status: u16,
	},
	/// The API answered with a status other than the verb's expected success code.
	#[error("The API returned unexpected HTTP status {observed}.")]
	UnexpectedStatus {
		/// Status code observed on the final response.
		observed: u16,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
}
impl Error {
	/// Returns the HTTP status attached to the error, when one exists.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::AuthRefreshExhausted { status } => Some(*status),
			Self::UnexpectedStatus { observed, .. } => Some(*observed),
			Self::Transport(TransportError::Decode { status, .. }) => *status,
			_ => None,
		}
	}

	/// Returns `true` when the caller should treat the session as signed out.
	pub fn is_unauthenticated(&self) -> bool {
		matches!(self, Self::AuthRefreshExhausted { .. })
	}
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL cannot carry relative API paths.
	#[error("Base URL `{url}` is not usable: {reason}.")]
	InvalidBaseUrl {
		/// Offending URL.
		url: String,
		/// Why the URL was rejected.
		reason: &'static str,
	},
	/// Request path could not be joined onto the base URL.
	#[error("Request path `{path}` is invalid.")]
	InvalidPath {
		/// Offending path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request path would resolve outside the API root.
	#[error("Request path `{path}` leaves the API base URL: {reason}.")]
	PathOutsideBase {
		/// Offending path.
		path: String,
		/// Why the resolved URL was refused.
		reason: &'static str,
	},
	/// A resource identifier cannot be used as a single path segment.
	#[error("Path segment `{segment}` is not a usable identifier.")]
	InvalidPathSegment {
		/// Offending segment.
		segment: String,
	},
	/// A header value contains characters HTTP does not allow.
	#[error("Header `{name}` has an invalid value.")]
	InvalidHeader {
		/// Header name.
		name: &'static str,
		/// Underlying validation failure.
		#[source]
		source: http::header::InvalidHeaderValue,
	},
	/// Request timeout must be positive.
	#[error("Request timeout must be positive.")]
	NonPositiveTimeout,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures. None of these are retried.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying HTTP client gave up waiting for the API.
	#[error("The API did not respond before the request timed out.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Request body could not be serialized to JSON.
	#[error("Request body could not be encoded as JSON.")]
	Encode(#[source] serde_json::Error),
	/// Response body could not be decoded into the expected shape.
	#[error("The API returned a body that does not match the expected shape.")]
	Decode {
		/// Structured parsing failure, including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}
