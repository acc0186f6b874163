//! Typed HackPSU resources built on the verb helpers.
//!
//! Each accessor on [`ApiClient`] returns a lightweight handle that borrows the client, so
//! resource calls share its token cache, credential source, and retry behavior.

pub mod event;
pub mod hackathon;
pub mod sponsor;
pub mod user;

pub use event::*;
pub use hackathon::*;
pub use sponsor::*;
pub use user::*;

// self
use crate::{_prelude::*, client::ApiClient, error::ConfigError, http::Transport};

impl<T> ApiClient<T>
where
	T: ?Sized + Transport,
{
	/// Hackathon lookups.
	pub fn hackathons(&self) -> Hackathons<'_, T> {
		Hackathons { client: self }
	}

	/// Schedule events.
	pub fn events(&self) -> Events<'_, T> {
		Events { client: self }
	}

	/// Sponsor listings.
	pub fn sponsors(&self) -> Sponsors<'_, T> {
		Sponsors { client: self }
	}

	/// User profiles.
	pub fn users(&self) -> Users<'_, T> {
		Users { client: self }
	}

	/// Hackathon registrations.
	pub fn registrations(&self) -> Registrations<'_, T> {
		Registrations { client: self }
	}
}

/// Converts a millisecond Unix timestamp, as the API encodes instants, into an
/// [`OffsetDateTime`].
pub fn from_epoch_millis(millis: i64) -> Option<OffsetDateTime> {
	OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).ok()
}

/// Joins path segments, percent-encoding each one.
///
/// Empty and dot-only segments are refused: URL normalization would collapse them and aim
/// the request at a different resource.
pub(crate) fn path<'a>(segments: impl IntoIterator<Item = &'a str>) -> Result<String, ConfigError> {
	segments.into_iter().try_fold(String::new(), |mut acc, segment| {
		if matches!(segment, "" | "." | "..") {
			return Err(ConfigError::InvalidPathSegment { segment: segment.to_owned() });
		}

		acc.push('/');
		acc.push_str(&urlencoding::encode(segment));

		Ok(acc)
	})
}
