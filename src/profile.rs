//! Normalized user profiles built from the Tampere SSO `/user/` document.
//!
//! [`parse`] is best-effort: it reads whichever recognized fields are present and
//! leaves the rest absent. A field whose JSON type does not match (a numeric `id`,
//! an `emails` value that is not an array, ...) is dropped rather than coerced.

// crates.io
use serde_json::Value;
// self
use crate::_prelude::*;

/// JSON object as returned by the provider.
pub type JsonObject = serde_json::Map<String, Value>;

/// Identifier stamped on every profile produced by this crate.
pub const PROVIDER_NAME: &str = "tampere";

/// Single email address attached to a profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileEmail {
	/// Email address.
	pub value: String,
}

/// Provider-agnostic user profile.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedProfile {
	/// Always [`PROVIDER_NAME`].
	pub provider: &'static str,
	/// Provider-issued user identifier (UUID).
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// Account handle.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub username: Option<String>,
	/// Full name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub display_name: Option<String>,
	/// Email addresses in provider order.
	pub emails: Vec<ProfileEmail>,
	/// Response body the profile was parsed from.
	#[serde(rename = "_raw")]
	pub raw: String,
	/// Parsed response body, for provider-specific fields that are not normalized.
	#[serde(rename = "_json")]
	pub json: JsonObject,
}
impl NormalizedProfile {
	/// Attaches the source document to the profile.
	pub fn with_source(mut self, raw: impl Into<String>, json: JsonObject) -> Self {
		self.raw = raw.into();
		self.json = json;

		self
	}

	/// First email address, if any.
	pub fn primary_email(&self) -> Option<&str> {
		self.emails.first().map(|email| email.value.as_str())
	}
}

/// Maps a provider profile document into a [`NormalizedProfile`].
///
/// The returned profile carries an empty source; the adapter attaches the raw body
/// and document with [`NormalizedProfile::with_source`].
pub fn parse(json: &JsonObject) -> NormalizedProfile {
	NormalizedProfile {
		provider: PROVIDER_NAME,
		id: string_field(json, "id").or_else(|| string_field(json, "uuid")),
		username: string_field(json, "username"),
		display_name: display_name(json),
		emails: emails(json),
		raw: String::new(),
		json: JsonObject::new(),
	}
}

fn string_field(json: &JsonObject, key: &str) -> Option<String> {
	json.get(key)?.as_str().filter(|value| !value.is_empty()).map(str::to_owned)
}

fn display_name(json: &JsonObject) -> Option<String> {
	let explicit =
		string_field(json, "displayName").or_else(|| string_field(json, "display_name"));

	if explicit.is_some() {
		return explicit;
	}

	match (string_field(json, "first_name"), string_field(json, "last_name")) {
		(Some(first), Some(last)) => Some(format!("{first} {last}")),
		(Some(name), None) | (None, Some(name)) => Some(name),
		(None, None) => None,
	}
}

fn emails(json: &JsonObject) -> Vec<ProfileEmail> {
	if let Some(entries) = json.get("emails").and_then(Value::as_array) {
		return entries
			.iter()
			.filter_map(|entry| match entry {
				Value::String(value) => Some(value.as_str()),
				Value::Object(object) => object.get("value").and_then(Value::as_str),
				_ => None,
			})
			.filter(|value| !value.is_empty())
			.map(|value| ProfileEmail { value: value.to_owned() })
			.collect();
	}

	string_field(json, "email").map(|value| vec![ProfileEmail { value }]).unwrap_or_default()
}
