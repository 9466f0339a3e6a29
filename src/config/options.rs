// self
use crate::{
	_prelude::*,
	auth::Secret,
	config::{ProviderConfig, ProviderConfigBuilder},
	error::ConfigError,
};

/// Loosely typed option bag mirroring the provider's documented option names.
///
/// Hosts that keep provider settings in JSON/TOML can deserialize this struct and
/// convert it with [`ProviderOptions::into_config`]. Unknown keys are ignored so a
/// shared settings object can carry options meant for other components.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProviderOptions {
	/// OAuth 2.0 client identifier.
	#[serde(rename = "clientID")]
	pub client_id: String,
	/// Client secret.
	#[serde(rename = "clientSecret")]
	pub client_secret: Option<Secret>,
	/// Redirect URI registered with the provider.
	#[serde(rename = "callbackURL")]
	pub callback_url: Option<String>,
	/// Authorization endpoint override.
	#[serde(rename = "authorizationURL")]
	pub authorization_url: Option<String>,
	/// Token endpoint override.
	#[serde(rename = "tokenURL")]
	pub token_url: Option<String>,
	/// User profile endpoint override.
	#[serde(rename = "userProfileURL")]
	pub user_profile_url: Option<String>,
	/// Application token endpoint override.
	#[serde(rename = "appTokenURL")]
	pub app_token_url: Option<String>,
	/// Scope separator override; must be a single character.
	#[serde(rename = "scopeSeparator")]
	pub scope_separator: Option<String>,
	/// Extra headers sent with every request.
	#[serde(rename = "customHeaders")]
	pub custom_headers: BTreeMap<String, String>,
	/// `User-Agent` override, ignored when `customHeaders` already sets one.
	#[serde(rename = "userAgent")]
	pub user_agent: Option<String>,
}
impl ProviderOptions {
	/// Validates the options and produces an immutable [`ProviderConfig`].
	pub fn into_config(self) -> Result<ProviderConfig, ConfigError> {
		self.into_builder()?.build()
	}

	/// Converts the options into a [`ProviderConfigBuilder`] for further adjustment.
	pub fn into_builder(self) -> Result<ProviderConfigBuilder, ConfigError> {
		let mut builder = ProviderConfigBuilder::new(self.client_id);

		builder.client_secret = self.client_secret;
		builder.callback_url = parse_url("callbackURL", self.callback_url)?;
		builder.authorization_url = parse_url("authorizationURL", self.authorization_url)?;
		builder.token_url = parse_url("tokenURL", self.token_url)?;
		builder.user_profile_url = parse_url("userProfileURL", self.user_profile_url)?;
		builder.app_token_url = parse_url("appTokenURL", self.app_token_url)?;
		builder.scope_separator = parse_separator(self.scope_separator)?;
		builder.custom_headers = self.custom_headers.into_iter().collect();
		builder.user_agent = self.user_agent.filter(|value| !value.is_empty());

		Ok(builder)
	}
}
impl TryFrom<ProviderOptions> for ProviderConfig {
	type Error = ConfigError;

	fn try_from(options: ProviderOptions) -> Result<Self, Self::Error> {
		options.into_config()
	}
}

// Empty strings behave like missing options.
fn parse_url(field: &'static str, value: Option<String>) -> Result<Option<Url>, ConfigError> {
	match value.as_deref().map(str::trim) {
		None | Some("") => Ok(None),
		Some(raw) =>
			Url::parse(raw).map(Some).map_err(|source| ConfigError::InvalidUrl { field, source }),
	}
}

fn parse_separator(value: Option<String>) -> Result<Option<char>, ConfigError> {
	let Some(value) = value.filter(|value| !value.is_empty()) else {
		return Ok(None);
	};
	let mut chars = value.chars();

	match (chars.next(), chars.next()) {
		(Some(separator), None) => Ok(Some(separator)),
		_ => Err(ConfigError::ScopeSeparatorLength { value }),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::config::DEFAULT_USER_PROFILE_URL;

	#[test]
	fn options_use_provider_option_names() {
		let options: ProviderOptions = serde_json::from_value(serde_json::json!({
			"clientID": "portal",
			"clientSecret": "s3cret",
			"callbackURL": "https://portal.example.com/auth/tampere/callback",
			"appTokenURL": "https://sso.example.com/jwt-token/",
			"scopeSeparator": " ",
			"customHeaders": { "X-Portal": "yes" },
			"userAgent": "portal/2.0",
			"unrelatedOption": true
		}))
		.expect("Options should deserialize.");
		let config = options.into_config().expect("Options should convert into a configuration.");

		assert_eq!(config.client.client_id, "portal");
		assert_eq!(config.client.client_secret.as_ref().map(Secret::expose), Some("s3cret"));
		assert_eq!(config.endpoints.app_token.as_str(), "https://sso.example.com/jwt-token/");
		assert_eq!(config.endpoints.user_profile.as_str(), DEFAULT_USER_PROFILE_URL);
		assert_eq!(config.scope_separator, ' ');
		assert_eq!(config.user_agent(), Some("portal/2.0"));
		assert!(config.custom_headers.contains_key("x-portal"));
	}

	#[test]
	fn empty_options_fall_back_to_defaults() {
		let options = ProviderOptions {
			client_id: "portal".into(),
			token_url: Some(String::new()),
			scope_separator: Some(String::new()),
			..Default::default()
		};
		let config = options.into_config().expect("Empty options should use defaults.");

		assert_eq!(config.endpoints.token.as_str(), "https://auth.tampere.fi/oauth2/token/");
		assert_eq!(config.scope_separator, ',');
	}

	#[test]
	fn malformed_options_are_rejected() {
		let options = ProviderOptions {
			client_id: "portal".into(),
			token_url: Some("not a url".into()),
			..Default::default()
		};

		assert!(matches!(
			options.into_config(),
			Err(ConfigError::InvalidUrl { field: "tokenURL", .. })
		));

		let options = ProviderOptions {
			client_id: "portal".into(),
			scope_separator: Some(", ".into()),
			..Default::default()
		};

		assert!(matches!(options.into_config(), Err(ConfigError::ScopeSeparatorLength { .. })));
	}
}
