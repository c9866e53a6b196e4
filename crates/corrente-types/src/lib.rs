//! Shared wire types for the Corrente API (users, donations, queue, reports).

pub mod donation;
pub mod envelope;
pub mod queue;
pub mod report;
pub mod user;

pub use donation::{
    AcceptUpgradeRequest, Comprovante, Donation, DonationKind, DonationStatus, LevelProgress,
    LevelStats, UserProgress,
};
pub use envelope::{ApiResponse, AuthPayload, Page};
pub use queue::{NewQueueEntry, QueueEntry, QueueUpdate};
pub use report::{NewReport, Report, ReportStatus};
pub use user::{User, UserRole, UserStatus, UserSummary};
