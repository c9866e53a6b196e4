//! User profile types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
    Blocked,
    #[serde(other)]
    Unknown,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
            UserStatus::Blocked => "blocked",
            UserStatus::Unknown => "unknown",
        }
    }
}

/// Full profile as returned by `/auth/profile` and the admin user endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, alias = "first_name")]
    pub first_name: String,
    #[serde(default, alias = "last_name")]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub cpf: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default, alias = "current_level")]
    pub current_level: u32,
    #[serde(default, alias = "email_verified")]
    pub email_verified: bool,
    #[serde(default, alias = "phone_verified")]
    pub phone_verified: bool,
    #[serde(default, alias = "pix_key", skip_serializing_if = "Option::is_none")]
    pub pix_key: Option<String>,
    #[serde(default, alias = "pix_key_type", skip_serializing_if = "Option::is_none")]
    pub pix_key_type: Option<String>,
    #[serde(default, alias = "btc_address", skip_serializing_if = "Option::is_none")]
    pub btc_address: Option<String>,
    #[serde(default, alias = "usdt_address", skip_serializing_if = "Option::is_none")]
    pub usdt_address: Option<String>,
    #[serde(default, alias = "created_at", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Compact user reference embedded in donations, queue entries and reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "pix_key", skip_serializing_if = "Option::is_none")]
    pub pix_key: Option<String>,
}
