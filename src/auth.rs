//! Credential value types: redacted secrets and the token grant returned by the handshake.

pub mod grant;
pub mod secret;

pub use grant::*;
pub use secret::*;
