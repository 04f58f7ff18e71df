use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use talent_tier::config::{AppConfig, SmtpConfig};
use talent_tier::storage::StorageBackend;
use talent_tier::workflows::candidates::{
    CandidateService, CandidateStore, SmtpNotifier, Tier,
};
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Build the SMTP sender when configured. A broken relay config disables email instead of failing startup.
pub(crate) fn smtp_notifier(config: Option<&SmtpConfig>) -> Option<Arc<SmtpNotifier>> {
    let config = config?;
    match SmtpNotifier::from_config(config) {
        Ok(notifier) => {
            info!(host = %config.host, port = config.port, "result emails enabled");
            Some(Arc::new(notifier))
        }
        Err(err) => {
            warn!(error = %err, "smtp configuration rejected; result emails disabled");
            None
        }
    }
}

/// Candidate service for one-shot CLI commands. Never sends email.
pub(crate) fn offline_candidate_service(config: &AppConfig) -> CandidateService<SmtpNotifier> {
    let backend = StorageBackend::detect(&config.storage);
    CandidateService::new(Arc::new(CandidateStore::open(backend)), None)
}

pub(crate) fn parse_tier(raw: &str) -> Result<Tier, String> {
    let value = raw
        .trim()
        .parse::<u8>()
        .map_err(|err| format!("failed to parse '{raw}' as a tier number ({err})"))?;
    Tier::try_from(value).map_err(|err| err.to_string())
}
