use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use axum::http::header;
use axum::response::Response;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::config::AdminSeedConfig;
use crate::storage::StorageBackend;
use crate::workflows::admins::{AdminStore, CredentialHasher};
use crate::workflows::candidates::{
    CandidateDraft, CandidateId, CandidateRecord, CandidateService, CandidateStore,
    NotificationSender, NotifyError, RegistrationSubmission, SkillSet, TierResultMessage,
};

pub(super) fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn draft(name: &str, skills: SkillSet) -> CandidateDraft {
    CandidateDraft {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        contact: Some("+15550100".to_string()),
        skills,
    }
}

pub(super) fn record(id: u64, name: &str, skills: SkillSet, created_at: DateTime<Utc>) -> CandidateRecord {
    CandidateRecord::new(CandidateId(id), draft(name, skills), created_at)
}

pub(super) fn full_stack() -> SkillSet {
    SkillSet {
        knows_html_css_js: true,
        knows_react_next: true,
        can_build_crud: true,
        can_build_auth: true,
        ..SkillSet::default()
    }
}

pub(super) fn architect() -> SkillSet {
    SkillSet {
        knows_golang: true,
        knows_cloud_infra: true,
        ..full_stack()
    }
}

pub(super) fn submission() -> RegistrationSubmission {
    RegistrationSubmission {
        name: "  Ada Lovelace ".to_string(),
        email: "ada@example.com".to_string(),
        contact: Some("   ".to_string()),
        skills: SkillSet {
            knows_backend_frameworks: true,
            ..full_stack()
        },
    }
}

pub(super) fn memory_store() -> Arc<CandidateStore> {
    Arc::new(CandidateStore::with_seed(StorageBackend::Memory, Vec::new()))
}

pub(super) fn build_service() -> (
    CandidateService<MemoryNotifier>,
    Arc<CandidateStore>,
    Arc<MemoryNotifier>,
) {
    let store = memory_store();
    let notifier = Arc::new(MemoryNotifier::default());
    let service = CandidateService::new(store.clone(), Some(notifier.clone()));
    (service, store, notifier)
}

pub(super) fn admin_store() -> Arc<AdminStore> {
    let hasher = CredentialHasher::with_cost(64, 1).expect("cheap argon2 params");
    Arc::new(
        AdminStore::with_hasher(StorageBackend::Memory, &AdminSeedConfig::default(), hasher)
            .expect("admin store opens"),
    )
}

pub(super) fn seed_admin_auth() -> (header::HeaderName, String) {
    (
        header::AUTHORIZATION,
        format!("Basic {}", STANDARD.encode("sirneo:Neo@2025")),
    )
}

#[derive(Default)]
pub(super) struct MemoryNotifier {
    sent: Mutex<Vec<TierResultMessage>>,
}

impl MemoryNotifier {
    pub(super) fn sent(&self) -> Vec<TierResultMessage> {
        self.sent.lock().expect("notifier mutex poisoned").clone()
    }
}

impl NotificationSender for MemoryNotifier {
    fn send(&self, message: &TierResultMessage) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .expect("notifier mutex poisoned")
            .push(message.clone());
        Ok(())
    }
}

pub(super) struct FailingNotifier;

impl NotificationSender for FailingNotifier {
    fn send(&self, _message: &TierResultMessage) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("relay offline".to_string()))
    }
}

/// Accepts every message after holding the calling thread, like a relay that answers slowly.
pub(super) struct SlowNotifier(pub(super) Duration);

impl NotificationSender for SlowNotifier {
    fn send(&self, _message: &TierResultMessage) -> Result<(), NotifyError> {
        thread::sleep(self.0);
        Ok(())
    }
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    serde_json::from_slice(&read_body(response).await).expect("json payload")
}
