//! `/reports/*` endpoints (disputes over donations).

use corrente_types::{NewReport, Report};
use serde::Serialize;

use crate::api::{ApiClient, ApiError};

#[derive(Serialize)]
struct Resolution<'a> {
    resolution: &'a str,
}

pub async fn create(client: &ApiClient, report: &NewReport) -> Result<Report, ApiError> {
    client.post("/reports", report).await
}

pub async fn mine(client: &ApiClient) -> Result<Vec<Report>, ApiError> {
    client.get("/reports/my").await
}

pub async fn admin_list(client: &ApiClient) -> Result<Vec<Report>, ApiError> {
    client.get("/reports/admin").await
}

pub async fn resolve(
    client: &ApiClient,
    report_id: &str,
    resolution: &str,
) -> Result<Report, ApiError> {
    client
        .patch(
            &format!("/reports/{report_id}/resolve"),
            &Resolution { resolution },
        )
        .await
}
