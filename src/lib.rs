//! Typed async client for the HackPSU API: a process-wide bearer-token cache, a
//! refresh-on-401 retry that fires at most once per request, and verb helpers that check
//! each verb's success status before decoding the body.
//!
//! ```no_run
//! # async fn demo() -> hackpsu_api::error::Result<()> {
//! use std::sync::Arc;
//!
//! use hackpsu_api::{
//! 	auth::StaticCredentialSource, cache::MemoryTokenCache, client::ReqwestApiClient,
//! 	config::ClientConfig, url::Url,
//! };
//!
//! let config = ClientConfig::builder(Url::parse("https://api.hackpsu.org/").unwrap()).build()?;
//! let client = ReqwestApiClient::new(
//! 	config,
//! 	Arc::new(MemoryTokenCache::default()),
//! 	Arc::new(StaticCredentialSource::empty()),
//! )?;
//! let hackathon = client.hackathons().active().await?;
//!
//! println!("{}", hackathon.name);
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod obs;

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
