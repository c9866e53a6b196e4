//! Queue entries (admin queue management).

use serde::{Deserialize, Serialize};

use crate::user::UserSummary;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEntry {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub user: Option<UserSummary>,
    #[serde(default, alias = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub position: u32,
    #[serde(default, alias = "donationNumber")]
    pub donation_number: u32,
    #[serde(default = "default_active", alias = "isActive")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl QueueEntry {
    pub fn user_name(&self) -> &str {
        self.user.as_ref().map_or("", |u| u.name.as_str())
    }

    pub fn user_email(&self) -> &str {
        self.user.as_ref().map_or("", |u| u.email.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQueueEntry {
    pub user_id: String,
    pub level: u32,
    pub donation_number: u32,
}

/// Partial update; absent fields are left untouched by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct QueueUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donation_number: Option<u32>,
}

impl QueueUpdate {
    pub fn is_empty(&self) -> bool {
        self.position.is_none() && self.level.is_none() && self.donation_number.is_none()
    }
}
