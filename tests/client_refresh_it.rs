mod common;

// std
use std::time::Duration as StdDuration;
// crates.io
use http::StatusCode;
use serde_json::{Value, json};
// self
use common::*;
use hackpsu_api::{
	auth::BearerToken,
	cache::TokenCache,
	client::PendingRequest,
	error::{ConfigError, Error, TransportError},
	http::{TransportResponse, Verb},
};

#[tokio::test]
async fn absent_token_refreshes_once_and_retries_with_fresh_bearer() {
	let (client, transport, source, cache) = build_client(
		FnTransport::accepting("Bearer T1", r#"{"id":1}"#),
		CountingSource::issuing(fresh("T1")),
		None,
		false,
	);
	let body: Value = client.get("/users/1").await.expect("Retry with T1 should succeed.");

	assert_eq!(body, json!({"id": 1}));
	assert_eq!(transport.authorizations(), vec![None, Some("Bearer T1".to_owned())]);
	assert_eq!(source.calls(), 1);
	assert_eq!(
		cache.get().map(|token| token.secret().expose().to_owned()),
		Some("T1".into()),
		"Refreshed token must be stored for later calls."
	);
	assert_eq!(client.refresh_metrics.attempts(), 1);
	assert_eq!(client.refresh_metrics.successes(), 1);
	assert_eq!(client.refresh_metrics.retries(), 1);
	assert_eq!(client.refresh_metrics.declined(), 0);
}

#[tokio::test]
async fn expired_and_expiry_less_tokens_are_refreshed() {
	for stale in [expired("old"), BearerToken::without_expiry("old")] {
		let (client, transport, source, _) = build_client(
			FnTransport::accepting("Bearer new", "[]"),
			CountingSource::issuing(fresh("new")),
			Some(stale),
			false,
		);
		let body: Value = client.get("/events").await.expect("Stale token should be refreshed.");

		assert_eq!(body, json!([]));
		assert_eq!(
			transport.authorizations(),
			vec![Some("Bearer old".to_owned()), Some("Bearer new".to_owned())]
		);
		assert_eq!(source.calls(), 1);
	}
}

#[tokio::test]
async fn second_unauthorized_is_final() {
	// The source keeps minting a token the API also rejects.
	let (client, transport, source, _) = build_client(
		FnTransport::fixed(StatusCode::UNAUTHORIZED, "{}"),
		CountingSource::issuing(expired("also-bad")),
		None,
		false,
	);
	let err = client.get::<Value>("/users/info/me").await.expect_err("Second 401 must surface.");

	assert!(matches!(err, Error::AuthRefreshExhausted { status: 401 }));
	assert_eq!(transport.calls(), 2, "Exactly one retry is allowed.");
	assert_eq!(source.calls(), 1);
	assert_eq!(client.refresh_metrics.retries(), 1);
	assert_eq!(client.refresh_metrics.declined(), 1, "The retry's 401 is final.");
}

#[tokio::test]
async fn credential_source_failure_propagates_original_unauthorized() {
	let (client, transport, source, cache) = build_client(
		FnTransport::fixed(StatusCode::UNAUTHORIZED, "{}"),
		CountingSource::without_session(),
		None,
		false,
	);
	let response = client
		.send(&PendingRequest::new(Verb::Get, "/users/info/me"))
		.await
		.expect("Transport succeeded, so send returns the response.");

	assert_eq!(response.status, StatusCode::UNAUTHORIZED);
	assert_eq!(transport.calls(), 1, "No retry without a fresh token.");
	assert_eq!(source.calls(), 1);
	assert!(cache.get().is_none());
	assert_eq!(client.refresh_metrics.failures(), 1);

	let err = client.delete("/users/5").await.expect_err("Unauthenticated delete must fail.");

	assert!(err.is_unauthenticated());
}

#[tokio::test]
async fn success_never_refreshes_even_with_stale_token() {
	let (client, transport, source, _) = build_client(
		FnTransport::fixed(StatusCode::OK, r#"{"ok":true}"#),
		CountingSource::issuing(fresh("unused")),
		Some(expired("stale")),
		false,
	);
	let _: Value = client.get("/hackathons/active").await.expect("200 should decode.");

	assert_eq!(transport.calls(), 1);
	assert_eq!(source.calls(), 0);
	assert_eq!(client.refresh_metrics.attempts(), 0);
}

#[tokio::test]
async fn unexpired_token_rejected_by_api_is_not_refreshed() {
	let (client, transport, source, _) = build_client(
		FnTransport::fixed(StatusCode::UNAUTHORIZED, "{}"),
		CountingSource::issuing(fresh("replacement")),
		Some(fresh("revoked")),
		false,
	);
	let err = client.get::<Value>("/users/info/me").await.expect_err("401 must surface.");

	assert!(matches!(err, Error::AuthRefreshExhausted { status: 401 }));
	assert_eq!(transport.authorizations(), vec![Some("Bearer revoked".to_owned())]);
	assert_eq!(source.calls(), 0);
	assert_eq!(client.refresh_metrics.declined(), 1);
	assert_eq!(client.refresh_metrics.attempts(), 0);
}

#[tokio::test]
async fn non_auth_failures_are_not_refreshed() {
	let (client, transport, source, _) = build_client(
		FnTransport::fixed(StatusCode::FORBIDDEN, "{}"),
		CountingSource::issuing(fresh("unused")),
		None,
		false,
	);
	let err = client.get::<Value>("/users/1").await.expect_err("403 must surface.");

	assert!(matches!(err, Error::UnexpectedStatus { observed: 403, .. }));
	assert_eq!(transport.calls(), 1);
	assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn timeouts_propagate_without_retry() {
	let (client, transport, source, _) = build_client(
		FnTransport::new(|_| {
			Err(TransportError::timeout(std::io::Error::new(
				std::io::ErrorKind::TimedOut,
				"deadline elapsed",
			)))
		}),
		CountingSource::issuing(fresh("unused")),
		None,
		false,
	);
	let err = client.get::<Value>("/sponsors").await.expect_err("Timeout must surface.");

	assert!(matches!(err, Error::Transport(TransportError::Timeout { .. })));
	assert_eq!(transport.calls(), 1);
	assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn delete_expects_no_content() {
	let (client, _, _, _) = build_client(
		FnTransport::fixed(StatusCode::NO_CONTENT, ""),
		CountingSource::without_session(),
		Some(fresh("T")),
		false,
	);

	client.delete("/users/5").await.expect("204 should be accepted.");

	let (client, _, _, _) = build_client(
		FnTransport::fixed(StatusCode::OK, "{}"),
		CountingSource::without_session(),
		Some(fresh("T")),
		false,
	);
	let err = client.delete("/users/5").await.expect_err("200 is not a delete success.");

	assert!(matches!(err, Error::UnexpectedStatus { observed: 200, .. }));
}

#[tokio::test]
async fn post_expects_created_and_sends_json() {
	let (client, transport, _, _) = build_client(
		FnTransport::new(|request| {
			let status = if request.method == http::Method::POST {
				StatusCode::CREATED
			} else {
				StatusCode::METHOD_NOT_ALLOWED
			};

			Ok(TransportResponse::new(status, request.body.clone().unwrap_or_default()))
		}),
		CountingSource::without_session(),
		Some(fresh("T")),
		false,
	);
	let echoed: Value =
		client.post("/users", &json!({"firstName":"Nittany"})).await.expect("201 should decode.");

	assert_eq!(echoed, json!({"firstName": "Nittany"}));

	let seen = transport.seen();

	assert_eq!(seen[0].url.as_str(), "https://api.hackpsu.test/v3/users");
	assert_eq!(seen[0].headers[http::header::CONTENT_TYPE], "application/json");

	let err = client
		.put::<_, Value>("/users/1", &json!({}))
		.await
		.expect_err("405 is not a put success.");

	assert_eq!(err.status(), Some(405));
}

#[tokio::test]
async fn coalesced_refreshes_call_the_source_once() {
	let (client, transport, source, _) = build_client(
		FnTransport::accepting("Bearer fresh", "{}"),
		CountingSource::issuing(fresh("fresh")).with_delay(StdDuration::from_millis(50)),
		Some(expired("stale")),
		true,
	);
	let (a, b, c) = tokio::join!(
		client.get::<Value>("/events"),
		client.get::<Value>("/sponsors"),
		client.get::<Value>("/hackathons/active"),
	);

	a.expect("First concurrent call should succeed.");
	b.expect("Second concurrent call should succeed.");
	c.expect("Third concurrent call should succeed.");

	assert_eq!(source.calls(), 1, "Concurrent refreshes must coalesce.");
	assert_eq!(transport.calls(), 6);
	assert_eq!(client.refresh_metrics.coalesced(), 2);
}

#[tokio::test]
async fn sign_out_clears_cache_and_session() {
	let (client, _, source, cache) = build_client(
		FnTransport::fixed(StatusCode::OK, "{}"),
		CountingSource::without_session(),
		Some(fresh("T")),
		false,
	);

	client.sign_out();
	client.sign_out();

	assert!(cache.get().is_none());
	assert_eq!(source.sign_outs(), 2);
}

#[tokio::test]
async fn paths_outside_the_api_never_reach_the_transport() {
	let (client, transport, source, _) = build_client(
		FnTransport::fixed(StatusCode::OK, "{}"),
		CountingSource::issuing(fresh("unused")),
		Some(fresh("SECRET")),
		false,
	);

	for path in [
		"https://evil.example/steal",
		"\\\\evil.example/steal",
		"/users/../../admin",
	] {
		let err = client.get::<Value>(path).await.expect_err("Foreign path must be refused.");

		assert!(
			matches!(err, Error::Config(ConfigError::PathOutsideBase { .. })),
			"`{path}` produced {err:?}."
		);
	}

	let err = client.users().delete("..").await.expect_err("Dot segment id must be refused.");

	assert!(matches!(err, Error::Config(ConfigError::InvalidPathSegment { .. })));
	assert_eq!(transport.calls(), 0, "The bearer token must not leave the process.");
	assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn coalesced_refreshes_reuse_tokens_without_expiry() {
	let (client, transport, source, _) = build_client(
		FnTransport::accepting("Bearer opaque", "{}"),
		CountingSource::issuing(BearerToken::without_expiry("opaque"))
			.with_delay(StdDuration::from_millis(50)),
		Some(expired("stale")),
		true,
	);
	let (a, b) = tokio::join!(client.get::<Value>("/events"), client.get::<Value>("/sponsors"));

	a.expect("First concurrent call should succeed.");
	b.expect("Second concurrent call should succeed.");

	assert_eq!(source.calls(), 1, "A token without expiry still satisfies waiting refreshes.");
	assert_eq!(transport.calls(), 4);
	assert_eq!(client.refresh_metrics.coalesced(), 1);
}
