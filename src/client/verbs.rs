//! Typed verb helpers: one expected success status per verb, JSON decoding on success.
//!
//! | Verb     | Expected | Returns         |
//! |----------|----------|-----------------|
//! | `get`    | 200      | decoded body    |
//! | `post`   | 201      | decoded body    |
//! | `put`    | 200      | decoded body    |
//! | `patch`  | 200      | decoded body    |
//! | `delete` | 204      | `()`            |
//!
//! A 401 that survives the request client becomes [`Error::AuthRefreshExhausted`]; any other
//! mismatch becomes [`Error::UnexpectedStatus`]. Decode failures keep their JSON path and are
//! never retried.

// crates.io
use http::StatusCode;
// self
use crate::{
	_prelude::*,
	client::{ApiClient, PendingRequest},
	error::TransportError,
	http::{Transport, TransportResponse, Verb},
	obs::{self, CallOutcome},
};

impl<T> ApiClient<T>
where
	T: ?Sized + Transport,
{
	/// `GET path`, expecting 200 and a JSON body.
	pub async fn get<R>(&self, path: &str) -> Result<R>
	where
		R: DeserializeOwned,
	{
		let response = self.execute(PendingRequest::new(Verb::Get, path)).await?;

		decode(&response)
	}

	/// `POST path` with a JSON body, expecting 201 and a JSON body.
	pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
	where
		B: ?Sized + Serialize,
		R: DeserializeOwned,
	{
		let request = PendingRequest::new(Verb::Post, path).with_json(body)?;

		decode(&self.execute(request).await?)
	}

	/// `PUT path` with a JSON body, expecting 200 and a JSON body.
	pub async fn put<B, R>(&self, path: &str, body: &B) -> Result<R>
	where
		B: ?Sized + Serialize,
		R: DeserializeOwned,
	{
		let request = PendingRequest::new(Verb::Put, path).with_json(body)?;

		decode(&self.execute(request).await?)
	}

	/// `PATCH path` with a JSON body, expecting 200 and a JSON body.
	pub async fn patch<B, R>(&self, path: &str, body: &B) -> Result<R>
	where
		B: ?Sized + Serialize,
		R: DeserializeOwned,
	{
		let request = PendingRequest::new(Verb::Patch, path).with_json(body)?;

		decode(&self.execute(request).await?)
	}

	/// `DELETE path`, expecting 204 and no body.
	pub async fn delete(&self, path: &str) -> Result<()> {
		self.execute(PendingRequest::new(Verb::Delete, path)).await.map(|_| ())
	}

	/// Sends a prepared request and checks its status against the verb's expected code.
	pub async fn execute(&self, request: PendingRequest) -> Result<TransportResponse> {
		let verb = request.verb();

		obs::record_request_outcome(verb, CallOutcome::Attempt);

		let result = match self.send(&request).await {
			Ok(response) => expect_status(verb, response),
			Err(err) => Err(err),
		};

		match &result {
			Ok(_) => obs::record_request_outcome(verb, CallOutcome::Success),
			Err(_) => obs::record_request_outcome(verb, CallOutcome::Failure),
		}

		result
	}
}

fn expect_status(verb: Verb, response: TransportResponse) -> Result<TransportResponse> {
	if response.status == verb.expected_status() {
		return Ok(response);
	}
	if response.status == StatusCode::UNAUTHORIZED {
		return Err(Error::AuthRefreshExhausted { status: response.status.as_u16() });
	}

	Err(Error::UnexpectedStatus {
		observed: response.status.as_u16(),
		retry_after: response.retry_after,
	})
}

fn decode<R>(response: &TransportResponse) -> Result<R>
where
	R: DeserializeOwned,
{
	let mut de = serde_json::Deserializer::from_slice(&response.body);

	serde_path_to_error::deserialize(&mut de).map_err(|source| {
		TransportError::Decode { source, status: Some(response.status.as_u16()) }.into()
	})
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[derive(Debug, Deserialize)]
	struct User {
		#[allow(dead_code)]
		id: u32,
	}

	#[test]
	fn expected_status_passes_through() {
		let response = TransportResponse::new(StatusCode::CREATED, b"{}".to_vec());

		assert!(expect_status(Verb::Post, response).is_ok());
	}

	#[test]
	fn unauthorized_maps_to_exhausted_and_others_to_unexpected() {
		let unauthorized = TransportResponse::new(StatusCode::UNAUTHORIZED, Vec::new());
		let mut throttled = TransportResponse::new(StatusCode::TOO_MANY_REQUESTS, Vec::new());

		throttled.retry_after = Some(Duration::seconds(3));

		assert!(matches!(
			expect_status(Verb::Get, unauthorized),
			Err(Error::AuthRefreshExhausted { status: 401 })
		));
		assert!(matches!(
			expect_status(Verb::Get, throttled),
			Err(Error::UnexpectedStatus { observed: 429, retry_after: Some(_) })
		));
	}

	#[test]
	fn decode_errors_keep_the_json_path() {
		let response = TransportResponse::new(StatusCode::OK, br#"{"id":"one"}"#.to_vec());
		let err = decode::<User>(&response).expect_err("String id should not decode into u32.");

		match err {
			Error::Transport(TransportError::Decode { source, status }) => {
				assert_eq!(source.path().to_string(), "id");
				assert_eq!(status, Some(200));
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}
}
