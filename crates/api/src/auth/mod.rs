//! Bearer-token verification for the admin surface.
//!
//! Tokens are issued by the admin console; this server only verifies them.

pub mod jwt;
