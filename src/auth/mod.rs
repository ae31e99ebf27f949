//! Authentication module
//!
//! Supports: Static headers, OAuth2 client credentials
//!
//! The `Authenticator` resolves the credentials for every upstream call and
//! caches the OAuth2 access token until shortly before it expires.

mod authenticator;
mod types;

pub use authenticator::{Authenticator, Credentials};
pub use types::{AuthConfig, AuthMode, CachedToken};
