//! `/queue/*` endpoints (admin queue CRUD).

use corrente_types::{NewQueueEntry, QueueEntry, QueueUpdate};
use reqwest::Method;

use crate::api::{ApiClient, ApiError};

pub async fn list(client: &ApiClient) -> Result<Vec<QueueEntry>, ApiError> {
    client.get("/queue").await
}

pub async fn by_level(client: &ApiClient, level: u32) -> Result<Vec<QueueEntry>, ApiError> {
    client.get(&format!("/queue/level/{level}")).await
}

pub async fn create(client: &ApiClient, entry: &NewQueueEntry) -> Result<QueueEntry, ApiError> {
    client.post("/queue", entry).await
}

pub async fn update(
    client: &ApiClient,
    entry_id: &str,
    update: &QueueUpdate,
) -> Result<QueueEntry, ApiError> {
    client.put(&format!("/queue/{entry_id}"), update).await
}

pub async fn remove(client: &ApiClient, entry_id: &str) -> Result<Option<String>, ApiError> {
    client
        .command::<()>(Method::DELETE, &format!("/queue/{entry_id}"), None)
        .await
}
