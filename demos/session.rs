//! Demonstrates signing in with a session refresh token, letting the client mint an ID token on
//! the first 401, and reading the schedule with the cached token afterwards.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use hackpsu_api::{
	auth::SessionCredentialSource,
	cache::MemoryTokenCache,
	client::ReqwestApiClient,
	config::{ClientConfig, SessionConfig},
	http::ReqwestTransport,
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/token");
			then.status(200).header("content-type", "application/json").body(
				r#"{"id_token":"demo-id-token","refresh_token":"demo-session-2","expires_in":"3600"}"#,
			);
		})
		.await;
	let _unauthorized = server
		.mock_async(|when, then| {
			when.method(GET).path("/events").header_missing("authorization");
			then.status(401);
		})
		.await;
	let events_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/events").header("authorization", "Bearer demo-id-token");
			then.status(200).header("content-type", "application/json").body(
				r#"[{"id":"e1","name":"Opening Ceremony","type":"activity","startTime":1743868800000,"endTime":1743872400000}]"#,
			);
		})
		.await;
	let session = Arc::new(SessionCredentialSource::<ReqwestTransport>::new(
		SessionConfig::new("demo-api-key")?.with_token_endpoint(Url::parse(&server.url("/v1/token"))?),
		ReqwestTransport::default(),
	));
	let config = ClientConfig::builder(Url::parse(&server.base_url())?).build()?;
	let client =
		ReqwestApiClient::new(config, Arc::new(MemoryTokenCache::default()), session.clone())?;

	session.sign_in("demo-session-1");

	for event in client.events().list().await? {
		println!("{} starts at {:?}.", event.name, event.starts_at());
	}

	// The second call reuses the cached token and never touches the token endpoint.
	let again = client.events().list().await?;

	println!("Fetched {} event(s) again.", again.len());

	token_mock.assert_calls_async(1).await;
	events_mock.assert_calls_async(2).await;

	client.sign_out();

	Ok(())
}
