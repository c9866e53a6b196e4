//! Donation, comprovante and level-progress types.
//!
//! Kinds and statuses are server-defined labels. Unknown values deserialize
//! into catch-all variants so a newer backend never breaks listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::user::UserSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DonationKind {
    #[serde(rename = "PULL")]
    Pull,
    #[serde(rename = "CASCADE_N1")]
    CascadeN1,
    #[serde(rename = "UPGRADE_N2")]
    UpgradeN2,
    #[serde(rename = "REINJECTION_N2")]
    ReinjectionN2,
    #[serde(rename = "UPGRADE_N3")]
    UpgradeN3,
    #[serde(rename = "REINJECTION_N3")]
    ReinjectionN3,
    #[serde(other)]
    Other,
}

impl DonationKind {
    pub fn label(&self) -> &'static str {
        match self {
            DonationKind::Pull => "Monthly pull",
            DonationKind::CascadeN1 => "Cascade N1",
            DonationKind::UpgradeN2 => "Upgrade N2",
            DonationKind::ReinjectionN2 => "Reinjection N2",
            DonationKind::UpgradeN3 => "Upgrade N3",
            DonationKind::ReinjectionN3 => "Reinjection N3",
            DonationKind::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DonationStatus {
    PendingPayment,
    PendingConfirmation,
    Confirmed,
    Expired,
    Cancelled,
    Reported,
    #[serde(other)]
    Unknown,
}

impl DonationStatus {
    /// Wire value, also used as the filter parameter for server-side search.
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationStatus::PendingPayment => "PENDING_PAYMENT",
            DonationStatus::PendingConfirmation => "PENDING_CONFIRMATION",
            DonationStatus::Confirmed => "CONFIRMED",
            DonationStatus::Expired => "EXPIRED",
            DonationStatus::Cancelled => "CANCELLED",
            DonationStatus::Reported => "REPORTED",
            DonationStatus::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub donor: Option<UserSummary>,
    #[serde(default)]
    pub receiver: Option<UserSummary>,
    #[serde(default)]
    pub amount: f64,
    #[serde(rename = "type", alias = "kind")]
    pub kind: DonationKind,
    pub status: DonationStatus,
    #[serde(default, alias = "comprovante_url", skip_serializing_if = "Option::is_none")]
    pub comprovante_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default, alias = "created_at", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Donation {
    pub fn donor_name(&self) -> &str {
        self.donor.as_ref().map_or("", |u| u.name.as_str())
    }

    pub fn receiver_name(&self) -> &str {
        self.receiver.as_ref().map_or("", |u| u.name.as_str())
    }
}

/// Payment proof attached to a donation (base64 data URL).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comprovante {
    #[serde(default, alias = "donationId")]
    pub donation_id: String,
    pub comprovante: String,
    #[serde(default, alias = "uploadedAt", skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// Server-computed progress for one level. Nothing here is derived locally
/// except the display percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub level: u32,
    #[serde(default, alias = "donationsReceived")]
    pub donations_received: u32,
    #[serde(default, alias = "donationsRequired")]
    pub donations_required: u32,
    #[serde(default, alias = "totalReceived")]
    pub total_received: f64,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, alias = "canUpgrade")]
    pub can_upgrade: bool,
    #[serde(default, alias = "nextLevel", skip_serializing_if = "Option::is_none")]
    pub next_level: Option<u32>,
}

impl LevelProgress {
    /// Percentage of required donations received, capped at 100.
    pub fn percent(&self) -> u8 {
        if self.donations_required == 0 {
            return if self.completed { 100 } else { 0 };
        }
        let pct = u64::from(self.donations_received) * 100 / u64::from(self.donations_required);
        pct.min(100) as u8
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProgress {
    #[serde(default, alias = "currentLevel")]
    pub current_level: u32,
    #[serde(default)]
    pub levels: Vec<LevelProgress>,
}

impl UserProgress {
    /// The first level the server marks as ready to upgrade.
    pub fn upgrade_offer(&self) -> Option<(u32, u32)> {
        self.levels
            .iter()
            .find(|l| l.can_upgrade)
            .map(|l| (l.level, l.next_level.unwrap_or(l.level + 1)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptUpgradeRequest {
    pub from_level: u32,
    pub to_level: u32,
}

/// Admin totals for a level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LevelStats {
    pub level: u32,
    #[serde(alias = "totalUsers")]
    pub total_users: u64,
    #[serde(alias = "inQueue")]
    pub in_queue: u64,
    #[serde(alias = "completedUsers")]
    pub completed_users: u64,
    #[serde(alias = "totalDonations")]
    pub total_donations: u64,
    #[serde(alias = "totalAmount")]
    pub total_amount: f64,
}
