//! Candidate registration, tier classification, and the admin triage surface.
//!
//! Submissions are validated, classified once on creation, and stored newest first.
//! Result emails are optional; without a configured sender the rest of the workflow
//! behaves the same.

pub mod domain;
pub mod export;
pub mod notify;
pub mod router;
pub mod service;
pub mod store;
pub mod summary;
pub mod tiering;
pub(crate) mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    CandidateDraft, CandidateFilter, CandidateId, CandidateRecord, CandidateView,
    RegistrationSubmission, SkillSet,
};
pub use export::{export_candidates, CsvExport, ExportFormat};
pub use notify::{NotificationSender, NotifyError, SmtpNotifier, TierResultMessage};
pub use router::{candidate_admin_router, candidate_router};
pub use service::{CandidateService, CandidateServiceError};
pub use store::CandidateStore;
pub use summary::{DashboardSummary, TierCount};
pub use tiering::{classify, InvalidTier, Tier, TierDefinition, TIER_DEFINITIONS};
pub use validation::{RegistrationGuard, ValidationError};
