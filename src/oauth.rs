//! Bridge to the `oauth2` crate, which owns the authorization code handshake.
//!
//! The adapter adds nothing to the handshake itself: [`HandshakeClient`] only
//! configures a [`BasicClient`] from the provider configuration, joins scopes with
//! the provider's separator, and maps `oauth2` failures into the adapter's taxonomy.

// crates.io
use oauth2::{
	AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken,
	EndpointNotSet, EndpointSet, HttpClientError, RedirectUrl, RequestTokenError, TokenResponse,
	TokenUrl,
	basic::{BasicClient, BasicRequestTokenError, BasicTokenResponse},
	http::HeaderMap,
};
// self
use crate::{
	_prelude::*,
	auth::{Secret, TokenGrant},
	config::ProviderConfig,
	error::{TokenExchangeError, TransportError},
	http::{ProviderHttpClient, ResponseMetadata, ResponseMetadataSlot, WithHeaders},
	obs::OperationKind,
};

type ConfiguredBasicClient =
	BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Maps HTTP transport failures into adapter [`TransportError`] values.
///
/// The adapter wraps the mapped error with operation context
/// ([`Error::ProfileFetch`], [`Error::AppTokenFetch`], [`Error::TokenExchange`]).
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a [`TransportError`].
	fn map_transport_error(
		&self,
		operation: OperationKind,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> TransportError;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		operation: OperationKind,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> TransportError {
		let endpoint = operation.endpoint();

		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(endpoint, meta, *inner),
			other => map_generic_transport_error(endpoint, other),
		}
	}
}

/// Maps the transport-agnostic [`HttpClientError`] variants.
///
/// Custom mappers can delegate here for everything except their own transport errors.
pub fn map_generic_transport_error<E>(
	endpoint: &'static str,
	err: HttpClientError<E>,
) -> TransportError
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::Network { endpoint, source: inner },
		HttpClientError::Http(inner) => TransportError::Request { endpoint, source: Box::new(inner) },
		HttpClientError::Io(source) => TransportError::Io { endpoint, source },
		HttpClientError::Other(message) => TransportError::Other { endpoint, message },
		_ => TransportError::Other { endpoint, message: "unknown HTTP client failure".into() },
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(
	endpoint: &'static str,
	meta: Option<&ResponseMetadata>,
	err: ReqwestError,
) -> TransportError {
	if err.is_timeout() {
		return TransportError::Timeout { endpoint };
	}
	if err.is_builder() {
		return TransportError::Request { endpoint, source: Box::new(err) };
	}
	if let Some(status) = err.status().map(|code| code.as_u16()) {
		return TransportError::Status {
			endpoint,
			status,
			body_preview: None,
			retry_after: meta.and_then(|value| value.retry_after),
		};
	}

	TransportError::network(endpoint, err)
}

fn meta_status(meta: Option<&ResponseMetadata>) -> Option<u16> {
	meta.and_then(|value| value.status)
}

/// `oauth2` client configured for the provider's authorization and token endpoints.
#[derive(Clone, Debug)]
pub(crate) struct HandshakeClient {
	oauth_client: ConfiguredBasicClient,
}
impl HandshakeClient {
	pub(crate) fn from_config(config: &ProviderConfig) -> Self {
		let auth_url = AuthUrl::from_url(config.endpoints.authorization.clone());
		let token_url = TokenUrl::from_url(config.endpoints.token.clone());
		let mut oauth_client = BasicClient::new(ClientId::new(config.client.client_id.clone()))
			.set_auth_uri(auth_url)
			.set_token_uri(token_url)
			// Client credentials travel in the form body, as the provider expects.
			.set_auth_type(AuthType::RequestBody);

		if let Some(secret) = &config.client.client_secret {
			oauth_client =
				oauth_client.set_client_secret(ClientSecret::new(secret.expose().to_owned()));
		}
		if let Some(callback) = &config.client.callback_url {
			oauth_client = oauth_client.set_redirect_uri(RedirectUrl::from_url(callback.clone()));
		}

		Self { oauth_client }
	}

	/// Builds the authorization redirect URL carrying `state` and the joined scopes.
	pub(crate) fn authorize_url(&self, scope: Option<String>, state: &str) -> Url {
		let mut request = self.oauth_client.authorize_url(|| CsrfToken::new(state.to_owned()));

		if let Some(scope) = scope {
			request = request.add_extra_param("scope", scope);
		}

		let (url, _state) = request.url();

		url
	}

	/// Exchanges an authorization code through the given transport.
	pub(crate) async fn exchange_code<C, M>(
		&self,
		http_client: &C,
		mapper: &M,
		headers: &HeaderMap,
		code: &str,
	) -> Result<TokenGrant>
	where
		C: ?Sized + ProviderHttpClient,
		M: ?Sized + TransportErrorMapper<C::TransportError>,
	{
		let meta = ResponseMetadataSlot::default();
		let handle = WithHeaders::new(http_client.with_metadata(meta.clone()), headers.clone());
		let response = self
			.oauth_client
			.exchange_code(AuthorizationCode::new(code.to_owned()))
			.request_async(&handle)
			.await
			.map_err(|err| map_request_error(meta.take(), err, mapper))?;

		Ok(map_token_response(response))
	}
}

fn map_token_response(response: BasicTokenResponse) -> TokenGrant {
	let expires_in = response
		.expires_in()
		.and_then(|lifetime| i64::try_from(lifetime.as_secs()).ok())
		.filter(|secs| *secs > 0)
		.map(Duration::seconds);

	TokenGrant {
		access_token: Secret::new(response.access_token().secret().to_owned()),
		refresh_token: response.refresh_token().map(|token| Secret::new(token.secret().to_owned())),
		token_type: response.token_type().as_ref().to_owned(),
		expires_in,
		scopes: response
			.scopes()
			.map(|scopes| scopes.iter().map(|scope| scope.to_string()).collect()),
		issued_at: OffsetDateTime::now_utc(),
	}
}

fn map_request_error<E, M>(
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<E>>,
	mapper: &M,
) -> Error
where
	E: 'static + Send + Sync + StdError,
	M: ?Sized + TransportErrorMapper<E>,
{
	let error = match err {
		RequestTokenError::ServerResponse(response) => TokenExchangeError::Rejected {
			error: response.error().as_ref().to_owned(),
			description: response.error_description().cloned(),
		},
		RequestTokenError::Request(error) => TokenExchangeError::Transport(
			mapper.map_transport_error(OperationKind::AuthorizationCode, meta.as_ref(), error),
		),
		RequestTokenError::Parse(source, _body) =>
			TokenExchangeError::Parse { source, status: meta_status(meta.as_ref()) },
		RequestTokenError::Other(message) => TokenExchangeError::Other { message },
	};

	error.into()
}
