//! Response envelopes shared by every endpoint.

use serde::{Deserialize, Serialize};

use crate::user::User;

fn default_success() -> bool {
    true
}

/// Standard `{ success, data, message }` wrapper returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Missing `success` is treated as success; failures always set it.
    #[serde(default = "default_success")]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }
}

/// Server-side paged collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(alias = "donations", alias = "users", alias = "results")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
}

/// Payload of a successful login or registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthPayload {
    pub user: User,
    #[serde(rename = "accessToken", alias = "access_token", alias = "token")]
    pub access_token: String,
}
