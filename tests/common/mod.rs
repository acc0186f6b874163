//! Fakes shared by the integration tests: a closure-driven transport and a counting
//! credential source.

#![allow(dead_code)]

// std
use std::{
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration as StdDuration,
};
// crates.io
use http::StatusCode;
use parking_lot::Mutex;
use time::{Duration, OffsetDateTime};
use url::Url;
// self
use hackpsu_api::{
	auth::{BearerToken, CredentialError, CredentialFuture, CredentialSource},
	cache::{MemoryTokenCache, TokenCache},
	client::ApiClient,
	config::ClientConfig,
	error::TransportError,
	http::{OutboundRequest, Transport, TransportFuture, TransportResponse},
};

type Responder =
	dyn Fn(&OutboundRequest) -> Result<TransportResponse, TransportError> + Send + Sync;

/// Transport that answers every request through a closure and records what it saw.
pub struct FnTransport {
	respond: Box<Responder>,
	seen: Mutex<Vec<OutboundRequest>>,
}
impl FnTransport {
	pub fn new(
		respond: impl Fn(&OutboundRequest) -> Result<TransportResponse, TransportError>
		+ Send
		+ Sync
		+ 'static,
	) -> Self {
		Self { respond: Box::new(respond), seen: Mutex::new(Vec::new()) }
	}

	/// Answers 200 with `body` when the bearer matches `accepted`, 401 otherwise.
	pub fn accepting(accepted: &'static str, body: &'static str) -> Self {
		Self::new(move |request| {
			if request.authorization() == Some(accepted) {
				Ok(TransportResponse::new(StatusCode::OK, body))
			} else {
				Ok(TransportResponse::new(StatusCode::UNAUTHORIZED, "{}"))
			}
		})
	}

	/// Always answers with `status` and `body`.
	pub fn fixed(status: StatusCode, body: &'static str) -> Self {
		Self::new(move |_| Ok(TransportResponse::new(status, body)))
	}

	pub fn calls(&self) -> usize {
		self.seen.lock().len()
	}

	pub fn authorizations(&self) -> Vec<Option<String>> {
		self.seen.lock().iter().map(|request| request.authorization().map(str::to_owned)).collect()
	}

	pub fn seen(&self) -> Vec<OutboundRequest> {
		self.seen.lock().clone()
	}
}
impl Transport for FnTransport {
	fn execute(&self, request: OutboundRequest) -> TransportFuture<'_> {
		let result = (self.respond)(&request);

		self.seen.lock().push(request);

		Box::pin(async move { result })
	}
}

/// Credential source that hands out one token (or fails) and counts calls.
pub struct CountingSource {
	token: Option<BearerToken>,
	delay: StdDuration,
	calls: AtomicUsize,
	signed_out: AtomicUsize,
}
impl CountingSource {
	pub fn issuing(token: BearerToken) -> Self {
		Self { token: Some(token), delay: StdDuration::ZERO, calls: AtomicUsize::new(0), signed_out: AtomicUsize::new(0) }
	}

	pub fn without_session() -> Self {
		Self { token: None, delay: StdDuration::ZERO, calls: AtomicUsize::new(0), signed_out: AtomicUsize::new(0) }
	}

	pub fn with_delay(mut self, delay: StdDuration) -> Self {
		self.delay = delay;

		self
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn sign_outs(&self) -> usize {
		self.signed_out.load(Ordering::SeqCst)
	}
}
impl CredentialSource for CountingSource {
	fn current_token(&self) -> CredentialFuture<'_, BearerToken> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move {
			if !self.delay.is_zero() {
				tokio::time::sleep(self.delay).await;
			}

			self.token.clone().ok_or(CredentialError::NoSession)
		})
	}

	fn sign_out(&self) {
		self.signed_out.fetch_add(1, Ordering::SeqCst);
	}
}

pub fn config() -> ClientConfig {
	config_with(false)
}

pub fn config_with(coalesce: bool) -> ClientConfig {
	ClientConfig::builder(
		Url::parse("https://api.hackpsu.test/v3").expect("Base URL fixture should parse."),
	)
	.coalesce_refreshes(coalesce)
	.build()
	.expect("Client config fixture should build.")
}

pub fn fresh(secret: &str) -> BearerToken {
	BearerToken::new(secret, OffsetDateTime::now_utc() + Duration::hours(1))
}

pub fn expired(secret: &str) -> BearerToken {
	BearerToken::new(secret, OffsetDateTime::now_utc() - Duration::minutes(1))
}

/// Wires a client over the fakes and returns handles to each of them.
pub fn build_client(
	transport: FnTransport,
	source: CountingSource,
	cached: Option<BearerToken>,
	coalesce: bool,
) -> (ApiClient<FnTransport>, Arc<FnTransport>, Arc<CountingSource>, Arc<MemoryTokenCache>) {
	let transport = Arc::new(transport);
	let source = Arc::new(source);
	let cache = Arc::new(MemoryTokenCache::default());

	if let Some(token) = cached {
		cache.set(token);
	}

	let client = ApiClient::with_transport(
		config_with(coalesce),
		cache.clone() as Arc<dyn TokenCache>,
		source.clone() as Arc<dyn CredentialSource>,
		transport.clone(),
	);

	(client, transport, source, cache)
}
