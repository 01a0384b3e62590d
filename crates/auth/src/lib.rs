//! `hipnosis-auth` — boundary to the external identity provider.
//!
//! This crate is intentionally decoupled from HTTP and storage: it turns a
//! bearer token into an [`ExternalUserId`] and builds login/logout URLs.

pub mod claims;
pub mod jwt;
pub mod principal;
pub mod urls;

pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtError, JwtValidator};
pub use principal::ExternalUserId;
pub use urls::AuthUrls;
