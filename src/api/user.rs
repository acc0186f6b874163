//! User profiles and hackathon registrations.

// self
use crate::{_prelude::*, api::path, client::ApiClient, http::Transport};

/// Attendee profile as stored by the API.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
	/// Identity-provider subject; doubles as the API identifier.
	pub id: String,
	/// Given name.
	pub first_name: String,
	/// Family name.
	pub last_name: String,
	/// Contact email.
	pub email: String,
	/// Gender, free-form.
	#[serde(default)]
	pub gender: Option<String>,
	/// T-shirt size code.
	#[serde(default)]
	pub shirt_size: Option<String>,
	/// Dietary restriction, if any.
	#[serde(default)]
	pub dietary_restriction: Option<String>,
	/// Allergies, if any.
	#[serde(default)]
	pub allergies: Option<String>,
	/// University name.
	#[serde(default)]
	pub university: Option<String>,
	/// Major.
	#[serde(default)]
	pub major: Option<String>,
	/// Phone number.
	#[serde(default)]
	pub phone: Option<String>,
	/// Country of residence.
	#[serde(default)]
	pub country: Option<String>,
	/// Race or ethnicity, free-form.
	#[serde(default)]
	pub race: Option<String>,
	/// Resume URL, when one was uploaded.
	#[serde(default)]
	pub resume: Option<String>,
}

/// Partial profile update; only `Some` fields are sent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
	/// New given name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub first_name: Option<String>,
	/// New family name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub last_name: Option<String>,
	/// New T-shirt size code.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub shirt_size: Option<String>,
	/// New dietary restriction.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub dietary_restriction: Option<String>,
	/// New allergies.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub allergies: Option<String>,
	/// New university.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub university: Option<String>,
	/// New major.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub major: Option<String>,
	/// New phone number.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub phone: Option<String>,
	/// New country.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub country: Option<String>,
}
impl UserPatch {
	/// Returns `true` when no field would be sent.
	pub fn is_empty(&self) -> bool {
		*self == Self::default()
	}
}

/// Answers submitted when registering for a hackathon.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
	/// Accepted the event rules.
	pub agreed_to_rules: bool,
	/// Accepted the MLH code of conduct.
	pub mlh_coc: bool,
	/// Accepted the MLH data-sharing policy.
	pub mlh_dcp: bool,
	/// Age at the time of the event.
	pub age: u8,
	/// Academic year, e.g. `sophomore`.
	pub academic_year: String,
	/// Institution type, e.g. `university`.
	pub educational_institution_type: String,
	/// Self-reported coding experience.
	#[serde(default)]
	pub coding_experience: Option<String>,
	/// First hackathon ever.
	#[serde(default)]
	pub first_hackathon: bool,
	/// Requests travel reimbursement.
	#[serde(default)]
	pub travel_reimbursement: bool,
	/// Driving to the venue.
	#[serde(default)]
	pub driving: bool,
	/// Military veteran status, free-form.
	#[serde(default)]
	pub veteran: Option<String>,
	/// How they heard about the event.
	#[serde(default)]
	pub referral: Option<String>,
	/// Planned project idea.
	#[serde(default)]
	pub project: Option<String>,
	/// What they hope to get out of the event.
	#[serde(default)]
	pub expectations: Option<String>,
	/// Allows MLH to email them.
	#[serde(default)]
	pub share_email_mlh: bool,
	/// Hackathon the registration belongs to; filled in by the API.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub hackathon_id: Option<String>,
}

/// Handle returned by [`ApiClient::users`].
pub struct Users<'a, T>
where
	T: ?Sized + Transport,
{
	pub(crate) client: &'a ApiClient<T>,
}
impl<T> Users<'_, T>
where
	T: ?Sized + Transport,
{
	/// Fetches the profile of the signed-in user.
	pub async fn me(&self) -> Result<User> {
		self.client.get("/users/info/me").await
	}

	/// Fetches a profile by identifier.
	pub async fn get(&self, id: &str) -> Result<User> {
		self.client.get(&path(["users", id])?).await
	}

	/// Creates the signed-in user's profile.
	pub async fn create(&self, user: &User) -> Result<User> {
		self.client.post("/users", user).await
	}

	/// Replaces a profile wholesale.
	pub async fn replace(&self, id: &str, user: &User) -> Result<User> {
		self.client.put(&path(["users", id])?, user).await
	}

	/// Applies a partial update.
	pub async fn update(&self, id: &str, patch: &UserPatch) -> Result<User> {
		self.client.patch(&path(["users", id])?, patch).await
	}

	/// Deletes a profile.
	pub async fn delete(&self, id: &str) -> Result<()> {
		self.client.delete(&path(["users", id])?).await
	}
}

/// Handle returned by [`ApiClient::registrations`].
pub struct Registrations<'a, T>
where
	T: ?Sized + Transport,
{
	pub(crate) client: &'a ApiClient<T>,
}
impl<T> Registrations<'_, T>
where
	T: ?Sized + Transport,
{
	/// Registers a user for the active hackathon.
	pub async fn register(&self, user_id: &str, registration: &Registration) -> Result<Registration> {
		self.client.post(&path(["users", user_id, "register"])?, registration).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn patch_skips_unset_fields() {
		let patch = UserPatch { major: Some("Computer Science".into()), ..Default::default() };

		assert!(!patch.is_empty());
		assert!(UserPatch::default().is_empty());
		assert_eq!(
			serde_json::to_string(&patch).expect("Patch should serialize."),
			r#"{"major":"Computer Science"}"#
		);
	}

	#[test]
	fn user_tolerates_missing_optional_fields() {
		let user: User = serde_json::from_str(
			r#"{"id":"u1","firstName":"Nittany","lastName":"Lion","email":"nl@psu.edu","extra":1}"#,
		)
		.expect("Minimal user payload should decode.");

		assert_eq!(user.first_name, "Nittany");
		assert_eq!(user.university, None);
	}
}
