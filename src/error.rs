//! Adapter-level error types shared across configuration, transport, and profile handling.

// self
use crate::_prelude::*;

/// Adapter-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical adapter error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Authorization code exchange failed inside the OAuth 2.0 collaborator.
	#[error(transparent)]
	TokenExchange(#[from] TokenExchangeError),

	/// User profile endpoint could not be reached or rejected the request.
	#[error("Failed to fetch user profile.")]
	ProfileFetch {
		/// Underlying transport failure.
		#[source]
		source: TransportError,
	},
	/// User profile endpoint returned a body that is not a JSON object.
	#[error("Failed to parse user profile.")]
	ProfileParse {
		/// Structured parsing failure.
		#[source]
		source: serde_json::Error,
	},
	/// Application token endpoint could not be reached or rejected the request.
	#[error("Failed to fetch app token for app {}.", display_target_app(.target_app))]
	AppTokenFetch {
		/// Target application requested by the caller, if any.
		target_app: Option<String>,
		/// Underlying transport failure.
		#[source]
		source: TransportError,
	},
	/// Application token endpoint returned a body that is not a JSON object.
	#[error("Failed to parse app token.")]
	AppTokenParse {
		/// Structured parsing failure.
		#[source]
		source: serde_json::Error,
	},
	/// Caller-supplied verification callback rejected the authenticated user.
	#[error("Verification callback failed.")]
	Verify {
		/// Error returned by the callback.
		#[source]
		source: BoxError,
	},
}
impl Error {
	/// Wraps a verification callback failure.
	pub fn verify(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Verify { source: Box::new(src) }
	}

	/// Coarse classification so callers can tell an unreachable provider from a garbled one.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Config(_) => ErrorKind::Config,
			Self::TokenExchange(TokenExchangeError::Transport(_))
			| Self::ProfileFetch { .. }
			| Self::AppTokenFetch { .. } => ErrorKind::Transport,
			Self::TokenExchange(TokenExchangeError::Rejected { .. }) => ErrorKind::Rejected,
			Self::TokenExchange(_) | Self::ProfileParse { .. } | Self::AppTokenParse { .. } =>
				ErrorKind::Parse,
			Self::Verify { .. } => ErrorKind::Verify,
		}
	}
}

fn display_target_app(target_app: &Option<String>) -> &str {
	target_app.as_deref().unwrap_or("<none>")
}

/// Error categories surfaced by [`Error::kind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// Invalid local configuration.
	Config,
	/// Network or HTTP-layer failure.
	Transport,
	/// Provider answered, but with a body that could not be understood.
	Parse,
	/// Provider answered with an OAuth 2.0 error response.
	Rejected,
	/// Verification callback failure.
	Verify,
}

/// Configuration and validation failures raised while building the adapter.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A configured endpoint or callback URL cannot be parsed.
	#[error("The {field} option is not a valid URL.")]
	InvalidUrl {
		/// Option name that carried the value.
		field: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoints must use HTTPS.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Endpoint label.
		endpoint: &'static str,
		/// Offending URL.
		url: String,
	},
	/// Scope separators must be printable.
	#[error("Scope separator must be a printable character.")]
	InvalidScopeSeparator {
		/// Invalid separator that was supplied.
		separator: char,
	},
	/// Scope separator options must hold exactly one character.
	#[error("Scope separator must be exactly one character, got {value:?}.")]
	ScopeSeparatorLength {
		/// Supplied option value.
		value: String,
	},
	/// Custom header name is not a valid HTTP header name.
	#[error("Custom header name {name:?} is invalid.")]
	InvalidHeaderName {
		/// Offending header name.
		name: String,
	},
	/// Custom header value is not a valid HTTP header value.
	#[error("Custom header {name:?} carries an invalid value.")]
	InvalidHeaderValue {
		/// Header whose value was rejected.
		name: String,
	},
	/// Client identifier is required by the OAuth 2.0 collaborator.
	#[error("Client identifier must not be empty.")]
	MissingClientId,
}

/// Failures raised by the authorization code exchange.
#[derive(Debug, ThisError)]
pub enum TokenExchangeError {
	/// Token endpoint could not be reached.
	#[error(transparent)]
	Transport(TransportError),
	/// Token endpoint answered with an OAuth 2.0 error response.
	#[error("Token endpoint rejected the authorization code: {error}.")]
	Rejected {
		/// OAuth `error` field.
		error: String,
		/// OAuth `error_description` field, when supplied.
		description: Option<String>,
	},
	/// Token endpoint responded with malformed JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	Parse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Collaborator reported a failure outside the categories above.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	Other {
		/// Collaborator-supplied message.
		message: String,
	},
}

/// Transport-level failures (network, HTTP status, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the {endpoint} endpoint.")]
	Network {
		/// Endpoint label.
		endpoint: &'static str,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request timed out before the endpoint answered.
	#[error("Request to the {endpoint} endpoint timed out.")]
	Timeout {
		/// Endpoint label.
		endpoint: &'static str,
	},
	/// Endpoint answered with a non-success HTTP status.
	#[error("The {endpoint} endpoint returned HTTP {status}.")]
	Status {
		/// Endpoint label.
		endpoint: &'static str,
		/// HTTP status code.
		status: u16,
		/// Truncated response body for diagnostics.
		body_preview: Option<String>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// HTTP request construction failed.
	#[error("HTTP request for the {endpoint} endpoint could not be built.")]
	Request {
		/// Endpoint label.
		endpoint: &'static str,
		/// Underlying builder failure.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the {endpoint} endpoint.")]
	Io {
		/// Endpoint label.
		endpoint: &'static str,
		/// IO failure.
		#[source]
		source: std::io::Error,
	},
	/// Transport reported a free-form failure.
	#[error("HTTP client error occurred while calling the {endpoint} endpoint: {message}.")]
	Other {
		/// Endpoint label.
		endpoint: &'static str,
		/// Transport-supplied message.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(
		endpoint: &'static str,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { endpoint, source: Box::new(src) }
	}

	/// Endpoint label attached to the failure.
	pub fn endpoint(&self) -> &'static str {
		match self {
			Self::Network { endpoint, .. }
			| Self::Timeout { endpoint }
			| Self::Status { endpoint, .. }
			| Self::Request { endpoint, .. }
			| Self::Io { endpoint, .. }
			| Self::Other { endpoint, .. } => endpoint,
		}
	}

	/// HTTP status code, when the endpoint answered at all.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status { status, .. } => Some(*status),
			_ => None,
		}
	}
}
