//! Optional observability helpers for adapter operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `tampere_oauth2.operation` with the
//!   `operation` and `stage` fields.
//! - Enable `metrics` to increment the `tampere_oauth2_operation_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Provider calls observed by the adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Authorization code exchange delegated to `oauth2`.
	AuthorizationCode,
	/// User profile fetch.
	UserProfile,
	/// Application token fetch.
	AppToken,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::AuthorizationCode => "authorization_code",
			OperationKind::UserProfile => "user_profile",
			OperationKind::AppToken => "app_token",
		}
	}

	/// Label of the endpoint the operation talks to.
	pub const fn endpoint(self) -> &'static str {
		match self {
			OperationKind::AuthorizationCode => "token",
			OperationKind::UserProfile => "user profile",
			OperationKind::AppToken => "application token",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to an adapter operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
