//! Integration scenarios for candidate registration, persistence, and admin triage.
//!
//! Everything goes through the public service facade and the HTTP routers, backed by a
//! temporary data directory so restarts can be simulated by reopening the stores.

mod common {
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde_json::Value;

    use talent_tier::config::AdminSeedConfig;
    use talent_tier::storage::StorageBackend;
    use talent_tier::workflows::admins::{admin_account_router, AdminStore, CredentialHasher};
    use talent_tier::workflows::candidates::{
        candidate_admin_router, candidate_router, CandidateService, CandidateStore,
        NotificationSender, NotifyError, TierResultMessage,
    };

    #[derive(Default)]
    pub(super) struct RecordingNotifier {
        sent: Mutex<Vec<TierResultMessage>>,
    }

    impl RecordingNotifier {
        pub(super) fn subjects(&self) -> Vec<String> {
            self.sent
                .lock()
                .expect("notifier mutex poisoned")
                .iter()
                .map(|message| message.subject.clone())
                .collect()
        }
    }

    impl NotificationSender for RecordingNotifier {
        fn send(&self, message: &TierResultMessage) -> Result<(), NotifyError> {
            self.sent
                .lock()
                .expect("notifier mutex poisoned")
                .push(message.clone());
            Ok(())
        }
    }

    pub(super) struct Deployment {
        pub(super) service: Arc<CandidateService<RecordingNotifier>>,
        pub(super) admins: Arc<AdminStore>,
        pub(super) notifier: Arc<RecordingNotifier>,
    }

    impl Deployment {
        pub(super) fn router(&self) -> axum::Router {
            candidate_router(self.service.clone())
                .merge(candidate_admin_router(
                    self.service.clone(),
                    self.admins.clone(),
                ))
                .merge(admin_account_router(self.admins.clone()))
        }
    }

    pub(super) fn deploy(data_dir: &Path) -> Deployment {
        let backend = StorageBackend::file(data_dir);
        let hasher = CredentialHasher::with_cost(64, 1).expect("cheap argon2 params");
        let admins = Arc::new(
            AdminStore::with_hasher(backend.clone(), &AdminSeedConfig::default(), hasher)
                .expect("admin store opens"),
        );
        let notifier = Arc::new(RecordingNotifier::default());
        let service = Arc::new(CandidateService::new(
            Arc::new(CandidateStore::open(backend)),
            Some(notifier.clone()),
        ));
        Deployment {
            service,
            admins,
            notifier,
        }
    }

    pub(super) fn basic(username: &str, password: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
    }

    pub(super) async fn read_json_body(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }
}

mod persistence {
    use super::common::*;
    use talent_tier::config::{StorageConfig, StorageMode};
    use talent_tier::storage::StorageBackend;
    use talent_tier::workflows::candidates::{
        CandidateFilter, CandidateStore, RegistrationSubmission, SkillSet, Tier,
    };

    fn submission(name: &str, email: &str, skills: SkillSet) -> RegistrationSubmission {
        RegistrationSubmission {
            name: name.to_string(),
            email: email.to_string(),
            contact: None,
            skills,
        }
    }

    #[test]
    fn registrations_survive_a_restart_newest_first() {
        let temp = tempfile::tempdir().expect("tempdir");

        let first = deploy(temp.path());
        let crud = first
            .service
            .register(submission(
                "Grace Hopper",
                "grace@example.com",
                SkillSet {
                    can_build_crud: true,
                    ..SkillSet::default()
                },
            ))
            .expect("registered");
        let lead = first
            .service
            .register(submission(
                "Ken Thompson",
                "ken@example.com",
                SkillSet {
                    knows_golang: true,
                    knows_cloud_infra: true,
                    ..SkillSet::default()
                },
            ))
            .expect("registered");
        assert_eq!(crud.id.0 + 1, lead.id.0);

        let restarted = deploy(temp.path());
        let listed = restarted.service.list(&CandidateFilter::default());
        let names: Vec<&str> = listed.iter().map(|record| record.name.as_str()).collect();
        assert_eq!(names, vec!["Ken Thompson", "Grace Hopper", "John Doe"]);
        assert_eq!(listed[0].tier(), Tier::ARCHITECT);
        assert_eq!(listed[0].created_at, lead.created_at);
        assert_eq!(
            first.notifier.subjects(),
            vec![
                "Your Skills Assessment Results - Tier 1".to_string(),
                "Your Skills Assessment Results - Tier 5".to_string(),
            ]
        );
    }

    #[test]
    fn unwritable_data_directory_falls_back_to_memory() {
        let temp = tempfile::tempdir().expect("tempdir");
        let blocker = temp.path().join("occupied");
        std::fs::write(&blocker, b"file, not a directory").expect("write blocker");

        let backend = StorageBackend::detect(&StorageConfig {
            data_dir: blocker.join("data"),
            mode: StorageMode::Auto,
        });
        assert_eq!(backend, StorageBackend::Memory);

        let store = CandidateStore::open(backend);
        assert!(!store.is_durable());
        assert_eq!(store.load().len(), 1);
    }
}

mod routing {
    use super::common::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    #[tokio::test]
    async fn candidate_lifecycle_through_the_api() {
        let temp = tempfile::tempdir().expect("tempdir");
        let deployment = deploy(temp.path());
        let router = deployment.router();

        let response = router
            .clone()
            .oneshot(
                Request::post("/api/v1/candidates")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::to_vec(&json!({
                            "name": "Ada Lovelace",
                            "email": "ada@example.com",
                            "contact": "+44 20 7946 0000",
                            "knowsGolang": true
                        }))
                        .expect("encode"),
                    ))
                    .expect("request"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = read_json_body(response).await;
        assert_eq!(created["tier"], 4);
        let id = created["id"].as_u64().expect("numeric id");

        let response = router
            .clone()
            .oneshot(
                Request::delete(format!("/api/v1/candidates/{id}"))
                    .header(header::AUTHORIZATION, basic("sirneo", "wrong"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = router
            .clone()
            .oneshot(
                Request::delete(format!("/api/v1/candidates/{id}"))
                    .header(header::AUTHORIZATION, basic("sirneo", "Neo@2025"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = router
            .oneshot(
                Request::get(format!("/api/v1/candidates/{id}"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn new_admin_can_manage_candidates_but_not_remove_the_seed() {
        let temp = tempfile::tempdir().expect("tempdir");
        let deployment = deploy(temp.path());
        let router = deployment.router();

        let response = router
            .clone()
            .oneshot(
                Request::post("/api/v1/admin/accounts")
                    .header(header::AUTHORIZATION, basic("sirneo", "Neo@2025"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::to_vec(&json!({
                            "name": "Trinity",
                            "email": "trinity@example.com",
                            "username": "trinity",
                            "password": "Follow@White"
                        }))
                        .expect("encode"),
                    ))
                    .expect("request"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = router
            .clone()
            .oneshot(
                Request::get("/api/v1/admin/summary")
                    .header(header::AUTHORIZATION, basic("trinity", "Follow@White"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        let summary = read_json_body(response).await;
        assert_eq!(summary["totalCandidates"], 1);

        let response = router
            .oneshot(
                Request::delete("/api/v1/admin/accounts/1")
                    .header(header::AUTHORIZATION, basic("trinity", "Follow@White"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(deployment.admins.load().len(), 2);
    }
}
