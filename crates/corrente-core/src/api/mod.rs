//! HTTP client layer: bearer-token requests and error normalization.

mod client;
mod errors;

pub use client::ApiClient;
pub use errors::{ApiError, ApiErrorKind};
