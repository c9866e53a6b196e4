//! Admin user management endpoints.

use corrente_types::{User, UserStatus};
use serde::Serialize;

use crate::api::{ApiClient, ApiError};

#[derive(Serialize)]
struct StatusChange {
    status: UserStatus,
}

pub async fn admin_list(client: &ApiClient) -> Result<Vec<User>, ApiError> {
    client.get("/users/admin").await
}

pub async fn get(client: &ApiClient, user_id: &str) -> Result<User, ApiError> {
    client.get(&format!("/users/{user_id}")).await
}

pub async fn set_status(
    client: &ApiClient,
    user_id: &str,
    status: UserStatus,
) -> Result<User, ApiError> {
    client
        .patch(&format!("/users/{user_id}/status"), &StatusChange { status })
        .await
}
