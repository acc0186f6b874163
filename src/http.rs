//! Transport primitives for API calls.
//!
//! [`Transport`] is the client's only dependency on an HTTP stack. It receives a fully
//! assembled [`OutboundRequest`] (URL, headers including `Authorization`, body) and
//! returns the raw [`TransportResponse`]. Status interpretation, retries, and decoding all
//! live above this layer, so a transport must never retry or inspect status codes itself.
//! Implementations report timeouts as [`TransportError::Timeout`] so the client can tell
//! them apart from authorization failures.

// crates.io
use http::{HeaderMap, Method, StatusCode, header::RETRY_AFTER};
use time::format_description::well_known::Rfc2822;
// self
use crate::{_prelude::*, error::TransportError};
#[cfg(feature = "reqwest")] use crate::{config::ClientConfig, error::ConfigError};

/// Boxed future returned by [`Transport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<TransportResponse, TransportError>> + 'a + Send>>;

/// HTTP stack abstraction used for every outbound call.
pub trait Transport
where
	Self: 'static + Send + Sync,
{
	/// Executes one request and returns the response without interpreting its status.
	fn execute(&self, request: OutboundRequest) -> TransportFuture<'_>;
}

/// HTTP verbs exposed by the typed facade, each bound to one expected success code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verb {
	/// `GET`, expects 200.
	Get,
	/// `POST`, expects 201.
	Post,
	/// `PUT`, expects 200.
	Put,
	/// `PATCH`, expects 200.
	Patch,
	/// `DELETE`, expects 204.
	Delete,
}
impl Verb {
	/// Returns the status code that counts as success for this verb.
	pub const fn expected_status(self) -> StatusCode {
		match self {
			Verb::Get | Verb::Put | Verb::Patch => StatusCode::OK,
			Verb::Post => StatusCode::CREATED,
			Verb::Delete => StatusCode::NO_CONTENT,
		}
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Verb::Get => "get",
			Verb::Post => "post",
			Verb::Put => "put",
			Verb::Patch => "patch",
			Verb::Delete => "delete",
		}
	}

	/// Maps the verb to its HTTP method.
	pub fn method(self) -> Method {
		match self {
			Verb::Get => Method::GET,
			Verb::Post => Method::POST,
			Verb::Put => Method::PUT,
			Verb::Patch => Method::PATCH,
			Verb::Delete => Method::DELETE,
		}
	}
}
impl Display for Verb {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Fully assembled request handed to a [`Transport`].
#[derive(Clone, Debug)]
pub struct OutboundRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute target URL.
	pub url: Url,
	/// Request headers, including `Authorization` when a token is attached.
	pub headers: HeaderMap,
	/// Raw request body.
	pub body: Option<Vec<u8>>,
}
impl OutboundRequest {
	/// Returns the `Authorization` header value, if one is attached and is valid UTF-8.
	pub fn authorization(&self) -> Option<&str> {
		self.headers.get(http::header::AUTHORIZATION).and_then(|value| value.to_str().ok())
	}
}

/// Raw response returned by a [`Transport`].
#[derive(Clone, Debug)]
pub struct TransportResponse {
	/// HTTP status code.
	pub status: StatusCode,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl TransportResponse {
	/// Builds a response with no Retry-After hint.
	pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
		Self { status, retry_after: None, body: body.into() }
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a reqwest client honoring the configured timeout and user agent.
	pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
		let mut builder = ReqwestClient::builder().timeout(config.timeout.unsigned_abs());

		if let Some(user_agent) = &config.user_agent {
			builder = builder.user_agent(user_agent.as_str());
		}

		Ok(Self(builder.build()?))
	}
}
#[cfg(feature = "reqwest")]
impl Transport for ReqwestTransport {
	fn execute(&self, request: OutboundRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			let OutboundRequest { method, url, headers, body } = request;
			let mut builder = self.0.request(method, url).headers(headers);

			if let Some(body) = body {
				builder = builder.body(body);
			}

			let response = builder.send().await?;
			let status = response.status();
			let retry_after = parse_retry_after(response.headers());
			let body = response.bytes().await?.to_vec();

			Ok(TransportResponse { status, retry_after, body })
		})
	}
}

/// Reads a `Retry-After` header given either as delta-seconds or as an RFC 2822 date.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u32>() {
		return Some(Duration::seconds(secs.into()));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}
