//! `/donations/*` endpoints: inbox/outbox, comprovantes, level progress and
//! the admin operations.

use corrente_types::{
    AcceptUpgradeRequest, Comprovante, Donation, LevelStats, Page, UserProgress,
};
use reqwest::Method;
use serde::Serialize;

use crate::api::{ApiClient, ApiError};

/// Filters for the server-side admin search. Values are sent unmodified.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DonationSearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Serialize)]
struct ComprovanteUpload<'a> {
    comprovante: &'a str,
}

/// Donations the current user is due to receive.
pub async fn to_receive(client: &ApiClient) -> Result<Vec<Donation>, ApiError> {
    client.get("/donations/to-receive").await
}

/// Donations the current user is due to send.
pub async fn to_send(client: &ApiClient) -> Result<Vec<Donation>, ApiError> {
    client.get("/donations/to-send").await
}

pub async fn my_level_progress(client: &ApiClient) -> Result<UserProgress, ApiError> {
    client.get("/donations/my-level-progress").await
}

pub async fn accept_upgrade(
    client: &ApiClient,
    from_level: u32,
    to_level: u32,
) -> Result<Option<String>, ApiError> {
    let body = AcceptUpgradeRequest {
        from_level,
        to_level,
    };
    client
        .command(Method::POST, "/donations/accept-upgrade", Some(&body))
        .await
}

/// Receiver confirms that the payment arrived.
pub async fn confirm(client: &ApiClient, donation_id: &str) -> Result<Option<String>, ApiError> {
    client
        .command::<()>(Method::PATCH, &format!("/donations/{donation_id}/confirm"), None)
        .await
}

/// Uploads a payment proof (base64 data URL embedded in JSON).
pub async fn upload_comprovante(
    client: &ApiClient,
    donation_id: &str,
    data_url: &str,
) -> Result<Option<String>, ApiError> {
    client
        .command(
            Method::POST,
            &format!("/donations/{donation_id}/comprovante"),
            Some(&ComprovanteUpload {
                comprovante: data_url,
            }),
        )
        .await
}

pub async fn comprovante(client: &ApiClient, donation_id: &str) -> Result<Comprovante, ApiError> {
    client
        .get(&format!("/donations/{donation_id}/comprovante"))
        .await
}

pub async fn admin_all(client: &ApiClient) -> Result<Vec<Donation>, ApiError> {
    client.get("/donations/admin/all").await
}

pub async fn admin_search(
    client: &ApiClient,
    search: &DonationSearch,
) -> Result<Page<Donation>, ApiError> {
    client
        .get_with_query("/donations/admin/search", search)
        .await
}

pub async fn generate_monthly_pull(client: &ApiClient) -> Result<Option<String>, ApiError> {
    client
        .command::<()>(Method::POST, "/donations/admin/generate-monthly-pull", None)
        .await
}

pub async fn level_stats(client: &ApiClient, level: u32) -> Result<LevelStats, ApiError> {
    client
        .get(&format!("/donations/admin/level-stats/{level}"))
        .await
}
