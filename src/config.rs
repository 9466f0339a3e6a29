//! Provider configuration: endpoint defaults, scope separator, custom headers, and the
//! client credentials handed to the `oauth2` collaborator.
//!
//! A [`ProviderConfig`] is assembled once through [`ProviderConfigBuilder`] (or from
//! deserialized [`ProviderOptions`]) and is read-only afterwards. Every option the
//! caller leaves unset falls back to the City of Tampere SSO defaults below.

/// Builder API for assembling provider configurations.
pub mod builder;
/// Serde-facing option bag using the provider's option names.
pub mod options;

pub use builder::*;
pub use options::*;

// crates.io
use oauth2::http::{HeaderMap, header::USER_AGENT};
// self
use crate::{_prelude::*, auth::Secret};

/// Default authorization endpoint.
pub const DEFAULT_AUTHORIZATION_URL: &str = "https://auth.tampere.fi/oauth2/authorize/";
/// Default token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://auth.tampere.fi/oauth2/token/";
/// Default user profile endpoint.
pub const DEFAULT_USER_PROFILE_URL: &str = "https://auth.tampere.fi/user/";
/// Default application (JWT) token endpoint.
pub const DEFAULT_APP_TOKEN_URL: &str = "https://auth.tampere.fi/jwt-token/";
/// Default separator used to join requested scopes.
pub const DEFAULT_SCOPE_SEPARATOR: char = ',';
/// Default `User-Agent` header value.
pub const DEFAULT_USER_AGENT: &str = env!("CARGO_PKG_NAME");

/// Endpoint set used by the adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderEndpoints {
	/// Authorization endpoint the user agent is redirected to.
	pub authorization: Url,
	/// Token endpoint used for the authorization code exchange.
	pub token: Url,
	/// User profile resource.
	pub user_profile: Url,
	/// Application token resource.
	pub app_token: Url,
}

/// Client registration handed to the `oauth2` collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientCredentials {
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// Client secret for confidential clients.
	pub client_secret: Option<Secret>,
	/// Redirect URI registered with the provider.
	pub callback_url: Option<Url>,
}

/// Immutable provider configuration owned by a [`TampereProvider`](crate::provider::TampereProvider).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderConfig {
	/// Endpoint definitions.
	pub endpoints: ProviderEndpoints,
	/// Character used to join scopes in the authorization request.
	pub scope_separator: char,
	/// Headers attached to every outgoing request; always carries `User-Agent`.
	pub custom_headers: HeaderMap,
	/// Client registration.
	pub client: ClientCredentials,
}
impl ProviderConfig {
	/// Creates a new builder for the provided client identifier.
	pub fn builder(client_id: impl Into<String>) -> ProviderConfigBuilder {
		ProviderConfigBuilder::new(client_id)
	}

	/// Effective `User-Agent` header value.
	pub fn user_agent(&self) -> Option<&str> {
		self.custom_headers.get(USER_AGENT).and_then(|value| value.to_str().ok())
	}

	/// Joins `scopes` with the configured separator, skipping empty entries.
	pub fn format_scope<'a, I>(&self, scopes: I) -> Option<String>
	where
		I: IntoIterator<Item = &'a str>,
	{
		let mut buf = String::new();

		for scope in scopes.into_iter().map(str::trim).filter(|scope| !scope.is_empty()) {
			if !buf.is_empty() {
				buf.push(self.scope_separator);
			}

			buf.push_str(scope);
		}

		if buf.is_empty() { None } else { Some(buf) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_match_tampere_sso() {
		let config = ProviderConfig::builder("client")
			.build()
			.expect("Default configuration should build.");

		assert_eq!(config.endpoints.authorization.as_str(), DEFAULT_AUTHORIZATION_URL);
		assert_eq!(config.endpoints.token.as_str(), DEFAULT_TOKEN_URL);
		assert_eq!(config.endpoints.user_profile.as_str(), DEFAULT_USER_PROFILE_URL);
		assert_eq!(config.endpoints.app_token.as_str(), DEFAULT_APP_TOKEN_URL);
		assert_eq!(config.scope_separator, ',');
		assert_eq!(config.user_agent(), Some("tampere-oauth2"));
	}

	#[test]
	fn scope_formatting_uses_separator() {
		let config = ProviderConfig::builder("client")
			.build()
			.expect("Default configuration should build.");

		assert_eq!(config.format_scope(["read", " write ", ""]), Some("read,write".into()));
		assert_eq!(config.format_scope([]), None);

		let spaced = ProviderConfig::builder("client")
			.scope_separator(' ')
			.build()
			.expect("Space separated configuration should build.");

		assert_eq!(spaced.format_scope(["email", "profile"]), Some("email profile".into()));
	}
}
