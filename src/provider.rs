//! The Tampere SSO adapter.
//!
//! [`TampereProvider`] owns an immutable [`ProviderConfig`], an `oauth2` client for
//! the authorization code handshake, and a [`ProviderHttpClient`] transport. On top
//! of the handshake it issues two authenticated GET requests:
//!
//! - [`TampereProvider::fetch_user_profile`] reads `/user/` and normalizes it through
//!   [`profile::parse`].
//! - [`TampereProvider::fetch_application_token`] reads `/jwt-token/`, optionally
//!   scoped to a `target_app`, and returns the bare `token` field.
//!
//! Both calls are single-shot: no caching, no retries, no shared mutable state, so
//! they can run concurrently from any number of tasks.

// crates.io
use oauth2::{
	AsyncHttpClient,
	http::{
		Method, Request,
		header::{ACCEPT, AUTHORIZATION},
	},
};
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	auth::TokenGrant,
	config::ProviderConfig,
	error::TransportError,
	http::{ProviderHttpClient, ResponseMetadataSlot, WithHeaders, parse_retry_after},
	oauth::{HandshakeClient, TransportErrorMapper},
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
	profile::{self, JsonObject, NormalizedProfile, PROVIDER_NAME},
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

const BODY_PREVIEW_LIMIT: usize = 256;

#[cfg(feature = "reqwest")]
/// Adapter specialized for the crate's default reqwest transport stack.
pub type ReqwestTampereProvider = TampereProvider<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// City of Tampere SSO adapter.
pub struct TampereProvider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	config: ProviderConfig,
	handshake: HandshakeClient,
	http_client: Arc<C>,
	transport_mapper: Arc<M>,
}
impl<C, M> TampereProvider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates an adapter that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		config: ProviderConfig,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		let handshake = HandshakeClient::from_config(&config);

		Self {
			config,
			handshake,
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
		}
	}

	/// Name hosts use to route to this adapter (`"tampere"`).
	pub fn name(&self) -> &'static str {
		PROVIDER_NAME
	}

	/// Read-only configuration the adapter was built with.
	pub fn config(&self) -> &ProviderConfig {
		&self.config
	}

	/// Authorization endpoint.
	pub fn authorization_url(&self) -> &Url {
		&self.config.endpoints.authorization
	}

	/// Token endpoint.
	pub fn token_url(&self) -> &Url {
		&self.config.endpoints.token
	}

	/// User profile endpoint.
	pub fn user_profile_url(&self) -> &Url {
		&self.config.endpoints.user_profile
	}

	/// Application token endpoint.
	pub fn app_token_url(&self) -> &Url {
		&self.config.endpoints.app_token
	}

	/// Builds the URL the user agent should be redirected to.
	///
	/// `state` is passed through untouched; generating and checking it is the host's job.
	pub fn authorize_url<'a, I>(&self, scopes: I, state: &str) -> Url
	where
		I: IntoIterator<Item = &'a str>,
	{
		self.handshake.authorize_url(self.config.format_scope(scopes), state)
	}

	/// Exchanges an authorization code for tokens through the `oauth2` crate.
	pub async fn exchange_code(&self, code: &str) -> Result<TokenGrant> {
		const KIND: OperationKind = OperationKind::AuthorizationCode;

		let span = OperationSpan::new(KIND, "exchange_code");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span
			.instrument(self.handshake.exchange_code(
				self.http_client.as_ref(),
				self.transport_mapper.as_ref(),
				&self.config.custom_headers,
				code,
			))
			.await;

		record_result(KIND, &result);

		result
	}

	/// Fetches and normalizes the profile of the user owning `access_token`.
	pub async fn fetch_user_profile(&self, access_token: &str) -> Result<NormalizedProfile> {
		const KIND: OperationKind = OperationKind::UserProfile;

		let span = OperationSpan::new(KIND, "fetch_user_profile");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span
			.instrument(async {
				let body = self
					.get(KIND, self.config.endpoints.user_profile.clone(), access_token)
					.await
					.map_err(|source| Error::ProfileFetch { source })?;
				let json = serde_json::from_slice::<JsonObject>(&body)
					.map_err(|source| Error::ProfileParse { source })?;
				let raw = String::from_utf8_lossy(&body).into_owned();

				Ok(profile::parse(&json).with_source(raw, json))
			})
			.await;

		record_result(KIND, &result);

		result
	}

	/// Fetches an application token (JWT) for `target_app`, or for the default audience
	/// when `target_app` is `None`.
	///
	/// Returns `Ok(None)` when the provider answers with valid JSON that lacks a string
	/// `token` field.
	pub async fn fetch_application_token(
		&self,
		access_token: &str,
		target_app: Option<&str>,
	) -> Result<Option<String>> {
		const KIND: OperationKind = OperationKind::AppToken;

		let span = OperationSpan::new(KIND, "fetch_application_token");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span
			.instrument(async {
				let mut url = self.config.endpoints.app_token.clone();

				if let Some(app) = target_app {
					url.query_pairs_mut().append_pair("target_app", app);
				}

				let body = self.get(KIND, url, access_token).await.map_err(|source| {
					Error::AppTokenFetch { target_app: target_app.map(str::to_owned), source }
				})?;
				let json = serde_json::from_slice::<JsonObject>(&body)
					.map_err(|source| Error::AppTokenParse { source })?;

				Ok(json.get("token").and_then(Value::as_str).map(str::to_owned))
			})
			.await;

		record_result(KIND, &result);

		result
	}

	/// Issues an authenticated GET and returns the body of a successful response.
	async fn get(
		&self,
		operation: OperationKind,
		url: Url,
		access_token: &str,
	) -> Result<Vec<u8>, TransportError> {
		let endpoint = operation.endpoint();
		let request = Request::builder()
			.method(Method::GET)
			.uri(url.as_str())
			.header(AUTHORIZATION, format!("Bearer {access_token}"))
			.header(ACCEPT, "application/json")
			.body(Vec::new())
			.map_err(|e| TransportError::Request { endpoint, source: Box::new(e) })?;
		let meta = ResponseMetadataSlot::default();
		let handle = WithHeaders::new(
			self.http_client.with_metadata(meta.clone()),
			self.config.custom_headers.clone(),
		);
		let response = handle.call(request).await.map_err(|e| {
			self.transport_mapper.map_transport_error(operation, meta.take().as_ref(), e)
		})?;
		let status = response.status();

		if !status.is_success() {
			let retry_after = meta
				.take()
				.and_then(|value| value.retry_after)
				.or_else(|| parse_retry_after(response.headers()));

			return Err(TransportError::Status {
				endpoint,
				status: status.as_u16(),
				body_preview: body_preview(response.body()),
				retry_after,
			});
		}

		Ok(response.into_body())
	}
}
#[cfg(feature = "reqwest")]
impl TampereProvider<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates an adapter backed by its own reqwest transport.
	pub fn new(config: ProviderConfig) -> Self {
		Self::with_http_client(
			config,
			ReqwestHttpClient::default(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}
}
impl<C, M> Clone for TampereProvider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			config: self.config.clone(),
			handshake: self.handshake.clone(),
			http_client: Arc::clone(&self.http_client),
			transport_mapper: Arc::clone(&self.transport_mapper),
		}
	}
}
impl<C, M> Debug for TampereProvider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TampereProvider")
			.field("name", &PROVIDER_NAME)
			.field("endpoints", &self.config.endpoints)
			.field("client_id", &self.config.client.client_id)
			.field("client_secret_set", &self.config.client.client_secret.is_some())
			.finish()
	}
}

fn record_result<T>(kind: OperationKind, result: &Result<T>) {
	match result {
		Ok(_) => obs::record_operation_outcome(kind, OperationOutcome::Success),
		Err(e) => {
			obs::record_operation_outcome(kind, OperationOutcome::Failure);
			obs::log_failure(kind, e);
		},
	}
}

fn body_preview(body: &[u8]) -> Option<String> {
	if body.is_empty() {
		return None;
	}

	let text = String::from_utf8_lossy(body);
	let preview = match text.char_indices().nth(BODY_PREVIEW_LIMIT) {
		Some((idx, _)) => &text[..idx],
		None => &text,
	};

	Some(preview.to_owned())
}
