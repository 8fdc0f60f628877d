//! Axum routing layer for the sso-baiteda integration.
//!
//! The host application builds a [`sso_baiteda::SsoCoordinator`], wraps it
//! in an [`SsoState`] together with its session layer, and nests
//! [`sso_router`] wherever its authentication routes live.

mod admin;
mod auth;
mod deauth;
mod error;
mod router;
mod session;

pub use router::{SsoState, sso_router};
pub use session::SESSION_COOKIE_NAME;
