//! Authentication extractors.
//!
//! - [`auth::AuthUser`] -- the caller behind a valid Bearer token.
//! - [`rbac::RequireAdmin`] -- requires an administrator role.

pub mod auth;
pub mod rbac;
