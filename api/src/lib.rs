//! Storefront API: the credential/session authentication core plus the
//! catalog and user-management glue around it.
//!
//! The auth core is `services::{passwords, tokens, auth, middleware}`; the
//! rest of the crate is handlers over the data-access layer.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod services;

pub use error::ApiError;
pub use routes::configure_routes;
