//! `/auth/*` endpoints.

use corrente_types::{AuthPayload, User};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, ApiError};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Registration payload: the wizard draft without its UI-only fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub cpf: String,
    pub birth_date: String,
    pub cep: String,
    pub address: String,
    pub address_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub bank: String,
    pub agency: String,
    pub account: String,
    pub pix_key_type: String,
    pub pix_key: String,
    pub pix_owner_name: String,
    pub pix_copy_paste: String,
    pub pix_qr_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub btc_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub btc_qr_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usdt_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usdt_qr_code: Option<String>,
    pub password: String,
}

/// `/auth/profile` answers either the user itself or `{ "user": .. }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProfileData {
    Wrapped { user: User },
    Plain(User),
}

#[derive(Serialize)]
struct VerificationCode<'a> {
    code: &'a str,
}

pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<AuthPayload, ApiError> {
    client
        .post_public("/auth/login", &LoginRequest { email, password })
        .await
}

pub async fn register(
    client: &ApiClient,
    request: &RegistrationRequest,
) -> Result<AuthPayload, ApiError> {
    client.post_public("/auth/register", request).await
}

pub async fn profile(client: &ApiClient) -> Result<User, ApiError> {
    let data: ProfileData = client.get("/auth/profile").await?;
    Ok(match data {
        ProfileData::Wrapped { user } | ProfileData::Plain(user) => user,
    })
}

pub async fn verify_email(client: &ApiClient, code: &str) -> Result<Option<String>, ApiError> {
    client
        .command(Method::POST, "/auth/verify-email", Some(&VerificationCode { code }))
        .await
}

pub async fn verify_phone(client: &ApiClient, code: &str) -> Result<Option<String>, ApiError> {
    client
        .command(Method::POST, "/auth/verify-phone", Some(&VerificationCode { code }))
        .await
}

pub async fn resend_email_verification(client: &ApiClient) -> Result<Option<String>, ApiError> {
    client
        .command::<()>(Method::POST, "/auth/resend-email-verification", None)
        .await
}

pub async fn resend_phone_verification(client: &ApiClient) -> Result<Option<String>, ApiError> {
    client
        .command::<()>(Method::POST, "/auth/resend-phone-verification", None)
        .await
}
