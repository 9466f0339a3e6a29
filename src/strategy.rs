//! Host-facing login strategy: the adapter paired with a verification callback.
//!
//! A host framework registers a [`TampereStrategy`] under [`TampereStrategy::name`],
//! redirects users to [`TampereStrategy::authorize_url`], and hands the returned
//! authorization code to [`TampereStrategy::authenticate`]. The strategy exchanges the
//! code, loads the normalized profile, and lets the [`Verify`] callback turn both into
//! the host's own user value.

// self
use crate::{
	_prelude::*,
	auth::TokenGrant,
	http::ProviderHttpClient,
	oauth::TransportErrorMapper,
	profile::NormalizedProfile,
	provider::TampereProvider,
};

/// Verification callback invoked after a successful login.
///
/// Implemented for any `Fn(TokenGrant, NormalizedProfile) -> impl Future<Output = Result<U, E>>`
/// closure, so most hosts never implement it by hand.
pub trait Verify
where
	Self: Send + Sync,
{
	/// Host-defined user value produced by the callback.
	type User;
	/// Error returned when the host refuses the login.
	type Error: 'static + Send + Sync + StdError;

	/// Maps the issued tokens and profile to a host user.
	fn verify(
		&self,
		grant: TokenGrant,
		profile: NormalizedProfile,
	) -> impl Future<Output = Result<Self::User, Self::Error>> + Send;
}
impl<F, Fut, U, E> Verify for F
where
	F: Send + Sync + Fn(TokenGrant, NormalizedProfile) -> Fut,
	Fut: Send + Future<Output = Result<U, E>>,
	E: 'static + Send + Sync + StdError,
{
	type Error = E;
	type User = U;

	fn verify(
		&self,
		grant: TokenGrant,
		profile: NormalizedProfile,
	) -> impl Future<Output = Result<Self::User, Self::Error>> + Send {
		self(grant, profile)
	}
}

/// Adapter plus verification callback, as registered with a host framework.
pub struct TampereStrategy<V, C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	provider: TampereProvider<C, M>,
	verify: V,
}
impl<V, C, M> TampereStrategy<V, C, M>
where
	V: Verify,
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Pairs an adapter with the host's verification callback.
	pub fn new(provider: TampereProvider<C, M>, verify: V) -> Self {
		Self { provider, verify }
	}

	/// Name hosts use to route to this strategy (`"tampere"`).
	pub fn name(&self) -> &'static str {
		self.provider.name()
	}

	/// Underlying adapter, for direct profile or application token calls.
	pub fn provider(&self) -> &TampereProvider<C, M> {
		&self.provider
	}

	/// Builds the authorization redirect URL.
	pub fn authorize_url<'a, I>(&self, scopes: I, state: &str) -> Url
	where
		I: IntoIterator<Item = &'a str>,
	{
		self.provider.authorize_url(scopes, state)
	}

	/// Completes a login: code exchange, profile fetch, then the verification callback.
	pub async fn authenticate(&self, code: &str) -> Result<V::User> {
		let grant = self.provider.exchange_code(code).await?;
		let profile = self.provider.fetch_user_profile(grant.access_token.expose()).await?;

		self.verify.verify(grant, profile).await.map_err(Error::verify)
	}
}
impl<V, C, M> Debug for TampereStrategy<V, C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TampereStrategy").field("provider", &self.provider).finish()
	}
}
