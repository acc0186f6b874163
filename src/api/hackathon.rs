//! Hackathon lookups.

// self
use crate::{_prelude::*, api::from_epoch_millis, client::ApiClient, http::Transport};

/// One HackPSU event weekend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hackathon {
	/// Stable identifier.
	pub id: String,
	/// Display name, e.g. `HackPSU Spring 2025`.
	pub name: String,
	/// Start instant in Unix milliseconds.
	pub start_time: i64,
	/// End instant in Unix milliseconds.
	pub end_time: i64,
	/// Whether this is the hackathon currently accepting registrations.
	#[serde(default)]
	pub active: bool,
}
impl Hackathon {
	/// Start instant, if representable.
	pub fn starts_at(&self) -> Option<OffsetDateTime> {
		from_epoch_millis(self.start_time)
	}

	/// End instant, if representable.
	pub fn ends_at(&self) -> Option<OffsetDateTime> {
		from_epoch_millis(self.end_time)
	}
}

/// Handle returned by [`ApiClient::hackathons`].
pub struct Hackathons<'a, T>
where
	T: ?Sized + Transport,
{
	pub(crate) client: &'a ApiClient<T>,
}
impl<T> Hackathons<'_, T>
where
	T: ?Sized + Transport,
{
	/// Fetches the active hackathon.
	pub async fn active(&self) -> Result<Hackathon> {
		self.client.get("/hackathons/active").await
	}

	/// Lists every hackathon.
	pub async fn list(&self) -> Result<Vec<Hackathon>> {
		self.client.get("/hackathons").await
	}
}
