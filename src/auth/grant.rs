//! Token grant issued by the authorization code exchange.

// self
use crate::{_prelude::*, auth::Secret};

/// Tokens issued by the authorization code exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenGrant {
	/// Access token presented to the profile and application token endpoints.
	pub access_token: Secret,
	/// Refresh token, when the provider issued one.
	pub refresh_token: Option<Secret>,
	/// Token type reported by the provider (normally `bearer`).
	pub token_type: String,
	/// Lifetime reported through `expires_in`.
	pub expires_in: Option<Duration>,
	/// Scopes echoed back by the provider, if any.
	pub scopes: Option<Vec<String>>,
	/// Instant the grant was received.
	pub issued_at: OffsetDateTime,
}
impl TokenGrant {
	/// Absolute expiry, when the provider reported a lifetime.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.expires_in.map(|lifetime| self.issued_at + lifetime)
	}

	/// Returns `true` once `now` is at or beyond the reported expiry.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		self.expires_at().is_some_and(|expires_at| now >= expires_at)
	}
}
