//! Sponsor listings shown on the marketing site.

// self
use crate::{_prelude::*, client::ApiClient, http::Transport};

/// One sponsor and its branding assets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sponsor {
	/// Stable identifier.
	pub id: i64,
	/// Company name.
	pub name: String,
	/// Tier label (e.g. `gold`).
	pub level: String,
	/// Company website.
	#[serde(default)]
	pub link: Option<String>,
	/// Logo variant for dark backgrounds.
	#[serde(default)]
	pub dark_logo: Option<String>,
	/// Logo variant for light backgrounds.
	#[serde(default)]
	pub light_logo: Option<String>,
	/// Display order within the tier.
	#[serde(default)]
	pub order: i32,
	/// Hackathon the sponsorship belongs to.
	#[serde(default)]
	pub hackathon_id: Option<String>,
}

/// Handle returned by [`ApiClient::sponsors`].
pub struct Sponsors<'a, T>
where
	T: ?Sized + Transport,
{
	pub(crate) client: &'a ApiClient<T>,
}
impl<T> Sponsors<'_, T>
where
	T: ?Sized + Transport,
{
	/// Lists sponsors sorted by their display order.
	pub async fn list(&self) -> Result<Vec<Sponsor>> {
		let mut sponsors: Vec<Sponsor> = self.client.get("/sponsors").await?;

		sponsors.sort_by_key(|sponsor| sponsor.order);

		Ok(sponsors)
	}
}
