//! Schedule events.

// crates.io
use url::form_urlencoded;
// self
use crate::{_prelude::*, api::from_epoch_millis, client::ApiClient, http::Transport};

/// Kind of schedule entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
	/// General activity.
	Activity,
	/// Meal or snack.
	Food,
	/// Hands-on workshop.
	Workshop,
	/// Check-in desk.
	CheckIn,
	/// Any kind this client does not know yet.
	#[serde(other)]
	Other,
}

/// Room or area where an event takes place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
	/// Stable identifier.
	pub id: i64,
	/// Display name.
	pub name: String,
}

/// One entry on the event schedule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
	/// Stable identifier.
	pub id: String,
	/// Title.
	pub name: String,
	/// Kind of entry.
	#[serde(rename = "type")]
	pub kind: EventKind,
	/// Longer description.
	#[serde(default)]
	pub description: Option<String>,
	/// Where it happens.
	#[serde(default)]
	pub location: Option<Location>,
	/// Icon URL.
	#[serde(default)]
	pub icon: Option<String>,
	/// Start instant in Unix milliseconds.
	pub start_time: i64,
	/// End instant in Unix milliseconds.
	pub end_time: i64,
	/// Workshop presenters.
	#[serde(default)]
	pub ws_presenter_names: Option<String>,
	/// Workshop skill level.
	#[serde(default)]
	pub ws_skill_level: Option<String>,
	/// Hackathon the event belongs to.
	#[serde(default)]
	pub hackathon_id: Option<String>,
}
impl Event {
	/// Start instant, if representable.
	pub fn starts_at(&self) -> Option<OffsetDateTime> {
		from_epoch_millis(self.start_time)
	}

	/// End instant, if representable.
	pub fn ends_at(&self) -> Option<OffsetDateTime> {
		from_epoch_millis(self.end_time)
	}
}

/// Handle returned by [`ApiClient::events`].
pub struct Events<'a, T>
where
	T: ?Sized + Transport,
{
	pub(crate) client: &'a ApiClient<T>,
}
impl<T> Events<'_, T>
where
	T: ?Sized + Transport,
{
	/// Lists the schedule of the active hackathon, ordered by start time.
	pub async fn list(&self) -> Result<Vec<Event>> {
		self.fetch("/events".into()).await
	}

	/// Lists the schedule of a specific hackathon, ordered by start time.
	pub async fn for_hackathon(&self, hackathon_id: &str) -> Result<Vec<Event>> {
		let query = form_urlencoded::Serializer::new(String::new())
			.append_pair("hackathonId", hackathon_id)
			.finish();

		self.fetch(format!("/events?{query}")).await
	}

	async fn fetch(&self, path: String) -> Result<Vec<Event>> {
		let mut events: Vec<Event> = self.client.get(&path).await?;

		events.sort_by_key(|event| event.start_time);

		Ok(events)
	}
}
