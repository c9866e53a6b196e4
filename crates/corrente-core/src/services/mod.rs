//! Typed endpoint functions, one module per backend resource.
//!
//! Every function takes the shared [`ApiClient`](crate::api::ApiClient) and
//! returns [`ApiError`](crate::api::ApiError) so callers can surface the
//! server's message verbatim.

pub mod auth;
pub mod cep;
pub mod donations;
pub mod queue;
pub mod reports;
pub mod users;
