use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use super::domain::{CandidateFilter, CandidateId, CandidateRecord, RegistrationSubmission};
use super::export::{export_candidates, CsvExport, ExportFormat};
use super::notify::{NotificationSender, NotifyError, TierResultMessage};
use super::store::CandidateStore;
use super::summary::DashboardSummary;
use super::validation::{RegistrationGuard, ValidationError};

/// Service composing registration validation, the candidate store, and the optional notifier.
pub struct CandidateService<N> {
    guard: RegistrationGuard,
    store: Arc<CandidateStore>,
    notifier: Option<Arc<N>>,
}

impl<N> CandidateService<N>
where
    N: NotificationSender + 'static,
{
    pub fn new(store: Arc<CandidateStore>, notifier: Option<Arc<N>>) -> Self {
        if notifier.is_none() {
            info!("result notifications disabled; no sender configured");
        }

        Self {
            guard: RegistrationGuard,
            store,
            notifier,
        }
    }

    pub fn store(&self) -> &Arc<CandidateStore> {
        &self.store
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notifier.is_some()
    }

    /// Validate, classify, and store a submission, then try to email the result.
    pub fn register(
        &self,
        submission: RegistrationSubmission,
    ) -> Result<CandidateRecord, CandidateServiceError> {
        let draft = self.guard.draft_from_submission(submission)?;
        let record = self.store.create(draft, Utc::now());

        if let Some(notifier) = &self.notifier {
            if let Err(err) = notifier.send(&TierResultMessage::for_candidate(&record)) {
                warn!(id = %record.id, error = %err, "tier result email failed; registration kept");
            }
        }

        Ok(record)
    }

    /// Matching candidates, newest registration first.
    pub fn list(&self, filter: &CandidateFilter) -> Vec<CandidateRecord> {
        let mut records: Vec<CandidateRecord> = self
            .store
            .load()
            .into_iter()
            .filter(|record| filter.matches(record))
            .collect();
        records.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        records
    }

    pub fn get(&self, id: CandidateId) -> Result<CandidateRecord, CandidateServiceError> {
        self.store
            .get_by_id(id)
            .ok_or(CandidateServiceError::NotFound(id))
    }

    pub fn delete(&self, id: CandidateId) -> Result<(), CandidateServiceError> {
        if self.store.remove(id) {
            info!(%id, "candidate deleted");
            Ok(())
        } else {
            Err(CandidateServiceError::NotFound(id))
        }
    }

    /// Re-send the tier result email for a stored candidate.
    pub fn notify(&self, id: CandidateId) -> Result<(), CandidateServiceError> {
        let record = self.get(id)?;
        let notifier = self
            .notifier
            .as_ref()
            .ok_or(CandidateServiceError::NotificationsDisabled)?;
        notifier.send(&TierResultMessage::for_candidate(&record))?;
        Ok(())
    }

    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary::from_records(&self.list(&CandidateFilter::default()))
    }

    pub fn export(
        &self,
        filter: &CandidateFilter,
        format: ExportFormat,
        today: NaiveDate,
    ) -> Result<CsvExport, CandidateServiceError> {
        let records = self.list(filter);
        Ok(export_candidates(&records, format, today)?)
    }
}

/// Error raised by the candidate service.
#[derive(Debug, thiserror::Error)]
pub enum CandidateServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("candidate {0} not found")]
    NotFound(CandidateId),
    #[error("email not configured; set SMTP_USER and SMTP_PASS to enable notifications")]
    NotificationsDisabled,
    #[error(transparent)]
    Notify(#[from] NotifyError),
    #[error("export failed: {0}")]
    Export(#[from] csv::Error),
}
