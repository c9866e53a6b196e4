//! Payment-proof (comprovante) flows.
//!
//! Two small reducers, one per side of a donation:
//!
//! - [`UploadFlow`]: the donor picks an image and sends it
//!   (`Idle → FileSelected → Uploading → Uploaded`).
//! - [`ReviewFlow`]: the receiver inspects the proof and either confirms the
//!   payment or reports a problem
//!   (`Viewing → Confirming → Confirmed`, or
//!   `Viewing → Reporting → SubmittingReport → Reported`).
//!
//! Reducers never do I/O; they return effects and expect the outcome back as
//! `*Succeeded` / `*Failed` events. A failure returns to the last interactive
//! state with the error banner set.

use corrente_types::NewReport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    FileSelected { data_url: String },
    Uploading { data_url: String },
    Uploaded,
}

#[derive(Debug, Clone)]
pub enum UploadEvent {
    /// A file was read and encoded as a data URL.
    Select(String),
    Clear,
    Submit,
    Succeeded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEffect {
    Upload { donation_id: String, data_url: String },
}

#[derive(Debug, Clone)]
pub struct UploadFlow {
    donation_id: String,
    state: UploadState,
    error: Option<String>,
}

impl UploadFlow {
    pub fn new(donation_id: impl Into<String>) -> Self {
        Self {
            donation_id: donation_id.into(),
            state: UploadState::Idle,
            error: None,
        }
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn update(&mut self, event: UploadEvent) -> Option<UploadEffect> {
        match (event, &self.state) {
            (UploadEvent::Select(data_url), UploadState::Idle | UploadState::FileSelected { .. }) => {
                self.error = None;
                self.state = UploadState::FileSelected { data_url };
                None
            }
            (UploadEvent::Clear, UploadState::FileSelected { .. }) => {
                self.error = None;
                self.state = UploadState::Idle;
                None
            }
            (UploadEvent::Submit, UploadState::FileSelected { data_url }) => {
                let data_url = data_url.clone();
                self.error = None;
                self.state = UploadState::Uploading {
                    data_url: data_url.clone(),
                };
                Some(UploadEffect::Upload {
                    donation_id: self.donation_id.clone(),
                    data_url,
                })
            }
            (UploadEvent::Submit, UploadState::Idle) => {
                self.error = Some("Select a payment proof image first".to_string());
                None
            }
            (UploadEvent::Succeeded, UploadState::Uploading { .. }) => {
                self.state = UploadState::Uploaded;
                None
            }
            (UploadEvent::Failed(message), UploadState::Uploading { data_url }) => {
                self.state = UploadState::FileSelected {
                    data_url: data_url.clone(),
                };
                self.error = Some(message);
                None
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewState {
    Viewing,
    Confirming,
    Confirmed,
    Reporting { reason: String, description: String },
    SubmittingReport { reason: String, description: String },
    Reported,
}

#[derive(Debug, Clone)]
pub enum ReviewEvent {
    Confirm,
    ConfirmSucceeded,
    ConfirmFailed(String),
    OpenReport,
    EditReason(String),
    EditDescription(String),
    CancelReport,
    SubmitReport,
    ReportSucceeded,
    ReportFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewEffect {
    Confirm { donation_id: String },
    SubmitReport(NewReport),
}

#[derive(Debug, Clone)]
pub struct ReviewFlow {
    donation_id: String,
    state: ReviewState,
    error: Option<String>,
}

impl ReviewFlow {
    pub fn new(donation_id: impl Into<String>) -> Self {
        Self {
            donation_id: donation_id.into(),
            state: ReviewState::Viewing,
            error: None,
        }
    }

    pub fn state(&self) -> &ReviewState {
        &self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the flow reached a final state.
    pub fn is_done(&self) -> bool {
        matches!(self.state, ReviewState::Confirmed | ReviewState::Reported)
    }

    pub fn update(&mut self, event: ReviewEvent) -> Option<ReviewEffect> {
        match event {
            ReviewEvent::Confirm => self.confirm(),
            ReviewEvent::ConfirmSucceeded => {
                if self.state == ReviewState::Confirming {
                    self.state = ReviewState::Confirmed;
                }
                None
            }
            ReviewEvent::ConfirmFailed(message) => {
                if self.state == ReviewState::Confirming {
                    self.state = ReviewState::Viewing;
                    self.error = Some(message);
                }
                None
            }
            ReviewEvent::OpenReport => {
                if self.state == ReviewState::Viewing {
                    self.error = None;
                    self.state = ReviewState::Reporting {
                        reason: String::new(),
                        description: String::new(),
                    };
                }
                None
            }
            ReviewEvent::EditReason(value) => {
                if let ReviewState::Reporting { reason, .. } = &mut self.state {
                    *reason = value;
                }
                None
            }
            ReviewEvent::EditDescription(value) => {
                if let ReviewState::Reporting { description, .. } = &mut self.state {
                    *description = value;
                }
                None
            }
            ReviewEvent::CancelReport => {
                if matches!(self.state, ReviewState::Reporting { .. }) {
                    self.error = None;
                    self.state = ReviewState::Viewing;
                }
                None
            }
            ReviewEvent::SubmitReport => self.submit_report(),
            ReviewEvent::ReportSucceeded => {
                if matches!(self.state, ReviewState::SubmittingReport { .. }) {
                    self.state = ReviewState::Reported;
                }
                None
            }
            ReviewEvent::ReportFailed(message) => {
                if let ReviewState::SubmittingReport {
                    reason,
                    description,
                } = &self.state
                {
                    self.state = ReviewState::Reporting {
                        reason: reason.clone(),
                        description: description.clone(),
                    };
                    self.error = Some(message);
                }
                None
            }
        }
    }

    fn confirm(&mut self) -> Option<ReviewEffect> {
        if self.state != ReviewState::Viewing {
            return None;
        }
        self.error = None;
        self.state = ReviewState::Confirming;
        Some(ReviewEffect::Confirm {
            donation_id: self.donation_id.clone(),
        })
    }

    fn submit_report(&mut self) -> Option<ReviewEffect> {
        let ReviewState::Reporting {
            reason,
            description,
        } = &self.state
        else {
            return None;
        };

        if reason.trim().is_empty() {
            self.error = Some("Describe the reason for the report".to_string());
            return None;
        }

        let report = NewReport {
            donation_id: self.donation_id.clone(),
            reason: reason.trim().to_string(),
            description: description.trim().to_string(),
        };
        self.state = ReviewState::SubmittingReport {
            reason: reason.clone(),
            description: description.clone(),
        };
        self.error = None;
        Some(ReviewEffect::SubmitReport(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE: &str = "data:image/png;base64,iVBORw0KGgo=";

    #[test]
    fn test_upload_happy_path() {
        let mut flow = UploadFlow::new("d1");
        assert!(flow.update(UploadEvent::Select(IMAGE.to_string())).is_none());

        let effect = flow.update(UploadEvent::Submit);
        assert_eq!(
            effect,
            Some(UploadEffect::Upload {
                donation_id: "d1".to_string(),
                data_url: IMAGE.to_string(),
            })
        );
        assert!(matches!(flow.state(), UploadState::Uploading { .. }));

        flow.update(UploadEvent::Succeeded);
        assert_eq!(flow.state(), &UploadState::Uploaded);
    }

    #[test]
    fn test_upload_failure_keeps_selected_file() {
        let mut flow = UploadFlow::new("d1");
        flow.update(UploadEvent::Select(IMAGE.to_string()));
        flow.update(UploadEvent::Submit);
        flow.update(UploadEvent::Failed("Donation is not pending payment".to_string()));

        assert_eq!(
            flow.state(),
            &UploadState::FileSelected {
                data_url: IMAGE.to_string()
            }
        );
        assert_eq!(flow.error(), Some("Donation is not pending payment"));

        assert!(flow.update(UploadEvent::Submit).is_some());
        assert!(flow.error().is_none());
    }

    #[test]
    fn test_upload_without_file_is_rejected() {
        let mut flow = UploadFlow::new("d1");
        assert!(flow.update(UploadEvent::Submit).is_none());
        assert_eq!(flow.state(), &UploadState::Idle);
        assert!(flow.error().is_some());
    }

    #[test]
    fn test_upload_ignores_resubmit_while_uploading() {
        let mut flow = UploadFlow::new("d1");
        flow.update(UploadEvent::Select(IMAGE.to_string()));
        flow.update(UploadEvent::Submit);
        assert!(flow.update(UploadEvent::Submit).is_none());
        assert!(flow.update(UploadEvent::Select("other".to_string())).is_none());
        assert!(matches!(flow.state(), UploadState::Uploading { .. }));
    }

    #[test]
    fn test_review_confirm() {
        let mut flow = ReviewFlow::new("d1");
        assert_eq!(
            flow.update(ReviewEvent::Confirm),
            Some(ReviewEffect::Confirm {
                donation_id: "d1".to_string()
            })
        );
        assert!(flow.update(ReviewEvent::Confirm).is_none());

        flow.update(ReviewEvent::ConfirmSucceeded);
        assert_eq!(flow.state(), &ReviewState::Confirmed);
        assert!(flow.is_done());
    }

    #[test]
    fn test_review_confirm_failure_returns_to_viewing() {
        let mut flow = ReviewFlow::new("d1");
        flow.update(ReviewEvent::Confirm);
        flow.update(ReviewEvent::ConfirmFailed("Forbidden".to_string()));
        assert_eq!(flow.state(), &ReviewState::Viewing);
        assert_eq!(flow.error(), Some("Forbidden"));
    }

    #[test]
    fn test_report_requires_reason() {
        let mut flow = ReviewFlow::new("d1");
        flow.update(ReviewEvent::OpenReport);
        flow.update(ReviewEvent::EditReason("   ".to_string()));
        assert!(flow.update(ReviewEvent::SubmitReport).is_none());
        assert!(flow.error().is_some());
        assert!(matches!(flow.state(), ReviewState::Reporting { .. }));
    }

    #[test]
    fn test_report_submission_and_retry() {
        let mut flow = ReviewFlow::new("d1");
        flow.update(ReviewEvent::OpenReport);
        flow.update(ReviewEvent::EditReason("Proof is blurry".to_string()));
        flow.update(ReviewEvent::EditDescription("Cannot read the amount".to_string()));

        let Some(ReviewEffect::SubmitReport(report)) = flow.update(ReviewEvent::SubmitReport)
        else {
            panic!("expected report effect");
        };
        assert_eq!(report.donation_id, "d1");
        assert_eq!(report.reason, "Proof is blurry");

        flow.update(ReviewEvent::ReportFailed("Already reported".to_string()));
        assert_eq!(
            flow.state(),
            &ReviewState::Reporting {
                reason: "Proof is blurry".to_string(),
                description: "Cannot read the amount".to_string(),
            }
        );
        assert_eq!(flow.error(), Some("Already reported"));

        flow.update(ReviewEvent::SubmitReport);
        flow.update(ReviewEvent::ReportSucceeded);
        assert_eq!(flow.state(), &ReviewState::Reported);
    }

    #[test]
    fn test_cancel_report_returns_to_viewing() {
        let mut flow = ReviewFlow::new("d1");
        flow.update(ReviewEvent::OpenReport);
        flow.update(ReviewEvent::CancelReport);
        assert_eq!(flow.state(), &ReviewState::Viewing);
        assert!(flow.update(ReviewEvent::Confirm).is_some());
    }
}
