// crates.io
use oauth2::http::{
	HeaderMap, HeaderName, HeaderValue,
	header::{InvalidHeaderValue, USER_AGENT},
};
// self
use crate::{
	_prelude::*,
	auth::Secret,
	config::{
		ClientCredentials, DEFAULT_APP_TOKEN_URL, DEFAULT_AUTHORIZATION_URL,
		DEFAULT_SCOPE_SEPARATOR, DEFAULT_TOKEN_URL, DEFAULT_USER_AGENT, DEFAULT_USER_PROFILE_URL,
		ProviderConfig, ProviderEndpoints,
	},
	error::ConfigError,
};

/// Builder for [`ProviderConfig`] values.
///
/// Explicit overrides win; anything left unset falls back to the built-in default
/// when [`build`](ProviderConfigBuilder::build) runs.
#[derive(Clone, Debug)]
pub struct ProviderConfigBuilder {
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// Optional client secret.
	pub client_secret: Option<Secret>,
	/// Optional redirect URI.
	pub callback_url: Option<Url>,
	/// Authorization endpoint override.
	pub authorization_url: Option<Url>,
	/// Token endpoint override.
	pub token_url: Option<Url>,
	/// User profile endpoint override.
	pub user_profile_url: Option<Url>,
	/// Application token endpoint override.
	pub app_token_url: Option<Url>,
	/// Scope separator override.
	pub scope_separator: Option<char>,
	/// Custom headers in insertion order.
	pub custom_headers: Vec<(String, String)>,
	/// `User-Agent` override used when no custom `User-Agent` header is supplied.
	pub user_agent: Option<String>,
}
impl ProviderConfigBuilder {
	/// Creates a new builder seeded with the provided client identifier.
	pub fn new(client_id: impl Into<String>) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: None,
			callback_url: None,
			authorization_url: None,
			token_url: None,
			user_profile_url: None,
			app_token_url: None,
			scope_separator: None,
			custom_headers: Vec::new(),
			user_agent: None,
		}
	}

	/// Sets the client secret.
	pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(Secret::new(secret));

		self
	}

	/// Sets the redirect URI.
	pub fn callback_url(mut self, url: Url) -> Self {
		self.callback_url = Some(url);

		self
	}

	/// Overrides the authorization endpoint.
	pub fn authorization_url(mut self, url: Url) -> Self {
		self.authorization_url = Some(url);

		self
	}

	/// Overrides the token endpoint.
	pub fn token_url(mut self, url: Url) -> Self {
		self.token_url = Some(url);

		self
	}

	/// Overrides the user profile endpoint.
	pub fn user_profile_url(mut self, url: Url) -> Self {
		self.user_profile_url = Some(url);

		self
	}

	/// Overrides the application token endpoint.
	pub fn app_token_url(mut self, url: Url) -> Self {
		self.app_token_url = Some(url);

		self
	}

	/// Overrides the scope separator.
	pub fn scope_separator(mut self, separator: char) -> Self {
		self.scope_separator = Some(separator);

		self
	}

	/// Adds a custom header sent with every request.
	pub fn custom_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.custom_headers.push((name.into(), value.into()));

		self
	}

	/// Overrides the default `User-Agent`.
	pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = Some(user_agent.into());

		self
	}

	/// Consumes the builder, applies defaults, and validates the resulting configuration.
	pub fn build(self) -> Result<ProviderConfig, ConfigError> {
		if self.client_id.trim().is_empty() {
			return Err(ConfigError::MissingClientId);
		}

		let endpoints = ProviderEndpoints {
			authorization: or_default(
				self.authorization_url,
				"authorizationURL",
				DEFAULT_AUTHORIZATION_URL,
			)?,
			token: or_default(self.token_url, "tokenURL", DEFAULT_TOKEN_URL)?,
			user_profile: or_default(
				self.user_profile_url,
				"userProfileURL",
				DEFAULT_USER_PROFILE_URL,
			)?,
			app_token: or_default(self.app_token_url, "appTokenURL", DEFAULT_APP_TOKEN_URL)?,
		};

		validate_endpoint("authorization", &endpoints.authorization)?;
		validate_endpoint("token", &endpoints.token)?;
		validate_endpoint("user profile", &endpoints.user_profile)?;
		validate_endpoint("application token", &endpoints.app_token)?;

		let scope_separator = self.scope_separator.unwrap_or(DEFAULT_SCOPE_SEPARATOR);

		validate_scope_separator(scope_separator)?;

		let custom_headers = build_headers(self.custom_headers, self.user_agent)?;
		let client = ClientCredentials {
			client_id: self.client_id,
			client_secret: self.client_secret,
			callback_url: self.callback_url,
		};

		Ok(ProviderConfig { endpoints, scope_separator, custom_headers, client })
	}
}

fn or_default(
	value: Option<Url>,
	field: &'static str,
	default: &str,
) -> Result<Url, ConfigError> {
	match value {
		Some(url) => Ok(url),
		None => Url::parse(default).map_err(|source| ConfigError::InvalidUrl { field, source }),
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ConfigError> {
	match url.scheme() {
		"https" => Ok(()),
		"http" if is_loopback(url) => Ok(()),
		_ => Err(ConfigError::InsecureEndpoint { endpoint: name, url: url.to_string() }),
	}
}

// Plain HTTP stays allowed for loopback hosts (local mock servers, native-app redirects).
fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
		Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
		None => false,
	}
}

fn validate_scope_separator(separator: char) -> Result<(), ConfigError> {
	if separator.is_control() {
		Err(ConfigError::InvalidScopeSeparator { separator })
	} else {
		Ok(())
	}
}

fn build_headers(
	pairs: Vec<(String, String)>,
	user_agent: Option<String>,
) -> Result<HeaderMap, ConfigError> {
	let mut headers = HeaderMap::new();

	for (name, value) in pairs {
		// An empty User-Agent counts as unset so the fallback below applies.
		if value.is_empty() && name.eq_ignore_ascii_case(USER_AGENT.as_str()) {
			continue;
		}

		let header_name = HeaderName::from_bytes(name.as_bytes())
			.map_err(|_| ConfigError::InvalidHeaderName { name: name.clone() })?;
		let header_value = HeaderValue::from_str(&value)
			.map_err(|_: InvalidHeaderValue| ConfigError::InvalidHeaderValue { name })?;

		headers.insert(header_name, header_value);
	}

	if !headers.contains_key(USER_AGENT) {
		let value = user_agent
			.filter(|value| !value.is_empty())
			.unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned());
		let header_value = HeaderValue::from_str(&value).map_err(|_| {
			ConfigError::InvalidHeaderValue { name: USER_AGENT.as_str().to_owned() }
		})?;

		headers.insert(USER_AGENT, header_value);
	}

	Ok(headers)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Failed to parse test URL.")
	}

	#[test]
	fn overrides_win_over_defaults() {
		let config = ProviderConfig::builder("client")
			.authorization_url(url("https://sso.example.com/authorize"))
			.token_url(url("https://sso.example.com/token"))
			.user_profile_url(url("https://sso.example.com/me"))
			.app_token_url(url("https://sso.example.com/jwt"))
			.scope_separator(' ')
			.build()
			.expect("Overridden configuration should build.");

		assert_eq!(config.endpoints.authorization.as_str(), "https://sso.example.com/authorize");
		assert_eq!(config.endpoints.token.as_str(), "https://sso.example.com/token");
		assert_eq!(config.endpoints.user_profile.as_str(), "https://sso.example.com/me");
		assert_eq!(config.endpoints.app_token.as_str(), "https://sso.example.com/jwt");
		assert_eq!(config.scope_separator, ' ');
	}

	#[test]
	fn user_agent_precedence() {
		let from_option = ProviderConfig::builder("client")
			.user_agent("portal/1.0")
			.build()
			.expect("Configuration with a user agent should build.");

		assert_eq!(from_option.user_agent(), Some("portal/1.0"));

		let from_header = ProviderConfig::builder("client")
			.user_agent("portal/1.0")
			.custom_header("user-agent", "header-wins")
			.custom_header("X-Tenant", "tampere")
			.build()
			.expect("Configuration with custom headers should build.");

		assert_eq!(from_header.user_agent(), Some("header-wins"));
		assert_eq!(
			from_header.custom_headers.get("x-tenant").and_then(|value| value.to_str().ok()),
			Some("tampere")
		);
	}

	#[test]
	fn empty_user_agent_falls_back_to_default() {
		let from_option = ProviderConfig::builder("client")
			.user_agent("")
			.build()
			.expect("Configuration with an empty user agent should build.");

		assert_eq!(from_option.user_agent(), Some(DEFAULT_USER_AGENT));

		let from_header = ProviderConfig::builder("client")
			.user_agent("portal/1.0")
			.custom_header("User-Agent", "")
			.build()
			.expect("Configuration with an empty User-Agent header should build.");

		assert_eq!(from_header.user_agent(), Some("portal/1.0"));

		let both_empty = ProviderConfig::builder("client")
			.user_agent("")
			.custom_header("user-agent", "")
			.build()
			.expect("Configuration with empty user agents should build.");

		assert_eq!(both_empty.user_agent(), Some(DEFAULT_USER_AGENT));
	}

	#[test]
	fn rejects_insecure_endpoints_and_bad_input() {
		let err = ProviderConfig::builder("client")
			.user_profile_url(url("http://sso.example.com/user/"))
			.build()
			.expect_err("Plain HTTP endpoints should be rejected.");

		assert!(matches!(err, ConfigError::InsecureEndpoint { endpoint: "user profile", .. }));

		let err = ProviderConfig::builder("client")
			.scope_separator('\n')
			.build()
			.expect_err("Control characters should be rejected as separators.");

		assert!(matches!(err, ConfigError::InvalidScopeSeparator { separator: '\n' }));

		let err = ProviderConfig::builder("client")
			.custom_header("bad header", "value")
			.build()
			.expect_err("Header names with spaces should be rejected.");

		assert!(matches!(err, ConfigError::InvalidHeaderName { .. }));

		let err = ProviderConfig::builder(" ").build().expect_err("Blank client ids are invalid.");

		assert!(matches!(err, ConfigError::MissingClientId));
	}

	#[test]
	fn loopback_endpoints_may_use_plain_http() {
		let config = ProviderConfig::builder("client")
			.user_profile_url(url("http://127.0.0.1:8080/user/"))
			.app_token_url(url("http://localhost:8080/jwt-token/"))
			.build()
			.expect("Loopback endpoints should be accepted.");

		assert_eq!(config.endpoints.user_profile.port(), Some(8080));
	}
}
