//! Request extractors for identity.
//!
//! - [`auth::AuthUser`] -- Resolves the tenant user id from a bearer token or
//!   the `x-user-id` header.

pub mod auth;
